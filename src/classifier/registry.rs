//! 分类器 - 有序匹配器注册表
//!
//! 按注册顺序询问每个匹配器是否认领来源；第一个认领者独占该事件，
//! 它提取失败也不会落到后续匹配器（一个应用一个解析器，避免重复处理）。

use std::sync::Arc;

use tracing::{debug, info};

use super::matcher::Matcher;
use super::patterns::{ChatAppMatcher, PaymentAppMatcher};
use super::result::ClassificationResult;

/// 通知分类器
pub struct Classifier {
    /// 所有注册的匹配器（顺序即优先级）
    matchers: Vec<Arc<dyn Matcher>>,
}

impl Classifier {
    /// 创建空分类器
    pub fn new() -> Self {
        Self {
            matchers: Vec::new(),
        }
    }

    /// 创建带内置匹配器的分类器（Nequi、Bancolombia、DaviPlata、WhatsApp）
    pub fn with_builtin_matchers() -> Self {
        let mut classifier = Self::new();
        classifier.register(Arc::new(PaymentAppMatcher::nequi()));
        classifier.register(Arc::new(PaymentAppMatcher::bancolombia()));
        classifier.register(Arc::new(PaymentAppMatcher::daviplata()));
        classifier.register(Arc::new(ChatAppMatcher::whatsapp()));
        classifier
    }

    /// 注册匹配器（追加到队尾，支持运行时扩展）
    pub fn register(&mut self, matcher: Arc<dyn Matcher>) {
        info!(matcher = matcher.name(), "Registering notification matcher");
        self.matchers.push(matcher);
    }

    /// 分类一个事件
    ///
    /// 未识别的来源返回 `None`（常规情况，非错误）；
    /// 认领者提取失败同样返回 `None`，记为非致命的分类未命中。
    pub fn classify(
        &self,
        source_id: &str,
        title: &str,
        body: &str,
    ) -> Option<ClassificationResult> {
        let matcher = self
            .matchers
            .iter()
            .find(|m| m.recognizes_source(source_id));

        let Some(matcher) = matcher else {
            debug!(source_id = %source_id, "Unrecognized notification source");
            return None;
        };

        match matcher.extract(title, body) {
            Some(result) => Some(result),
            None => {
                debug!(
                    matcher = matcher.name(),
                    source_id = %source_id,
                    "Classification miss (owned source, no extraction)"
                );
                None
            }
        }
    }

    /// 已注册匹配器数量
    pub fn matcher_count(&self) -> usize {
        self.matchers.len()
    }

    /// 已注册匹配器名称
    pub fn matcher_names(&self) -> Vec<&str> {
        self.matchers.iter().map(|m| m.name()).collect()
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::with_builtin_matchers()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::matcher::CustomMatcher;
    use crate::classifier::result::MessageCategory;

    #[test]
    fn test_builtin_registry() {
        let classifier = Classifier::with_builtin_matchers();
        assert_eq!(classifier.matcher_count(), 4);
        assert_eq!(
            classifier.matcher_names(),
            vec!["payment-nequi", "payment-bancolombia", "payment-daviplata", "chat-whatsapp"]
        );
    }

    #[test]
    fn test_classify_nequi_payment() {
        let classifier = Classifier::with_builtin_matchers();
        let result = classifier
            .classify("com.example.nequi", "ANA MARIA te envió 50.000, ¡lo mejor!", "")
            .unwrap();

        assert_eq!(result.category, MessageCategory::Payment);
        assert_eq!(result.sender.as_deref(), Some("ANA MARIA"));
        assert_eq!(result.amount_text.as_deref(), Some("50.000"));
    }

    #[test]
    fn test_unrecognized_source_is_none() {
        let classifier = Classifier::with_builtin_matchers();
        assert!(classifier
            .classify("com.android.systemui", "Batería baja", "")
            .is_none());
    }

    #[test]
    fn test_owned_source_does_not_fall_through() {
        let mut classifier = Classifier::new();
        // 第一个匹配器认领所有来源但从不提取
        classifier.register(Arc::new(CustomMatcher::new(
            "claims-everything",
            Box::new(|_| true),
            Box::new(|_, _| None),
        )));
        // 第二个匹配器本可以提取
        classifier.register(Arc::new(CustomMatcher::new(
            "would-extract",
            Box::new(|_| true),
            Box::new(|title, _| {
                Some(ClassificationResult::new(
                    title.to_string(),
                    "Fallback",
                    MessageCategory::Other,
                ))
            }),
        )));

        // 来源被第一个匹配器独占，提取失败不落到第二个
        assert!(classifier.classify("com.anything", "title", "body").is_none());
    }

    #[test]
    fn test_registration_order_is_priority() {
        let mut classifier = Classifier::new();
        classifier.register(Arc::new(CustomMatcher::new(
            "first",
            Box::new(|s| s.contains("app")),
            Box::new(|_, _| {
                Some(ClassificationResult::new("first", "First", MessageCategory::Other))
            }),
        )));
        classifier.register(Arc::new(CustomMatcher::new(
            "second",
            Box::new(|s| s.contains("app")),
            Box::new(|_, _| {
                Some(ClassificationResult::new("second", "Second", MessageCategory::Other))
            }),
        )));

        let result = classifier.classify("com.app", "t", "b").unwrap();
        assert_eq!(result.canonical_message, "first");
    }

    #[test]
    fn test_runtime_custom_matcher() {
        let mut classifier = Classifier::with_builtin_matchers();
        classifier.register(Arc::new(
            CustomMatcher::new(
                "custom-bank",
                Box::new(|s| s.contains("mibanco")),
                Box::new(|title, _| {
                    Some(ClassificationResult::new(
                        title.to_string(),
                        "MiBanco",
                        MessageCategory::Payment,
                    ))
                }),
            )
            .with_metadata_extractor(Box::new(|_, body| (None, Some(body.to_string())))),
        ));

        let result = classifier
            .classify("com.mibanco.app", "Pago recibido", "80.000")
            .unwrap();
        assert_eq!(result.amount_text.as_deref(), Some("80.000"));
    }

    #[test]
    fn test_classify_is_idempotent() {
        let classifier = Classifier::with_builtin_matchers();
        let a = classifier.classify("com.whatsapp", "Juan", "hola");
        let b = classifier.classify("com.whatsapp", "Juan", "hola");

        assert_eq!(
            a.map(|r| r.canonical_message),
            b.map(|r| r.canonical_message)
        );
    }
}
