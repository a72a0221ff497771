//! 匹配器 trait 定义
//!
//! 每个来源应用由一个匹配器独占：`recognizes_source` 判定归属，
//! `extract` 从标题/正文提取结构化结果。提取失败返回 `None`，
//! 属于常规未命中而非错误。

use super::result::ClassificationResult;

/// 通知匹配器 trait
///
/// 约定：`recognizes_source` 必须无副作用且开销低（注册表按序对每个
/// 事件调用）；`extract` 允许返回 `None`（来源认领但文本不匹配）。
pub trait Matcher: Send + Sync {
    /// 匹配器名称（用于日志和注册表展示）
    fn name(&self) -> &str;

    /// 是否认领该来源应用
    fn recognizes_source(&self, source_id: &str) -> bool;

    /// 从标题/正文提取分类结果
    fn extract(&self, title: &str, body: &str) -> Option<ClassificationResult>;
}

/// 来源判定函数类型
pub type SourcePredicate = Box<dyn Fn(&str) -> bool + Send + Sync>;
/// 提取函数类型
pub type ExtractFn = Box<dyn Fn(&str, &str) -> Option<ClassificationResult> + Send + Sync>;
/// 元数据提取函数类型：返回 (发送人, 金额原文)
pub type MetadataFn = Box<dyn Fn(&str, &str) -> (Option<String>, Option<String>) + Send + Sync>;

/// 调用方自定义匹配器
///
/// 由来源判定 + 提取函数 + 可选元数据提取函数组装，
/// 支持在不修改内置匹配器的前提下运行时扩展。
pub struct CustomMatcher {
    name: String,
    predicate: SourcePredicate,
    extractor: ExtractFn,
    metadata: Option<MetadataFn>,
}

impl CustomMatcher {
    /// 创建自定义匹配器
    pub fn new(name: impl Into<String>, predicate: SourcePredicate, extractor: ExtractFn) -> Self {
        Self {
            name: name.into(),
            predicate,
            extractor,
            metadata: None,
        }
    }

    /// 设置元数据提取函数（链式调用）
    ///
    /// 仅在提取结果缺少对应字段时补充，不覆盖提取函数已给出的值。
    pub fn with_metadata_extractor(mut self, metadata: MetadataFn) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

impl Matcher for CustomMatcher {
    fn name(&self) -> &str {
        &self.name
    }

    fn recognizes_source(&self, source_id: &str) -> bool {
        (self.predicate)(source_id)
    }

    fn extract(&self, title: &str, body: &str) -> Option<ClassificationResult> {
        let mut result = (self.extractor)(title, body)?;

        if let Some(metadata) = &self.metadata {
            let (sender, amount_text) = metadata(title, body);
            if result.sender.is_none() {
                result.sender = sender;
            }
            if result.amount_text.is_none() {
                result.amount_text = amount_text;
            }
        }

        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::result::MessageCategory;

    fn sample_matcher() -> CustomMatcher {
        CustomMatcher::new(
            "custom-bank",
            Box::new(|source_id| source_id.contains("custombank")),
            Box::new(|title, _body| {
                Some(
                    ClassificationResult::new(title.to_string(), "CustomBank", MessageCategory::Payment),
                )
            }),
        )
    }

    #[test]
    fn test_custom_matcher_predicate() {
        let matcher = sample_matcher();

        assert!(matcher.recognizes_source("com.custombank.app"));
        assert!(!matcher.recognizes_source("com.whatsapp"));
        assert_eq!(matcher.name(), "custom-bank");
    }

    #[test]
    fn test_custom_matcher_extract() {
        let matcher = sample_matcher();
        let result = matcher.extract("Pago recibido", "").unwrap();

        assert_eq!(result.canonical_message, "Pago recibido");
        assert_eq!(result.category, MessageCategory::Payment);
        assert!(result.sender.is_none());
    }

    #[test]
    fn test_metadata_extractor_fills_missing_fields() {
        let matcher = sample_matcher().with_metadata_extractor(Box::new(|_, body| {
            (Some("PEDRO".to_string()), Some(body.to_string()))
        }));

        let result = matcher.extract("Pago recibido", "12.500").unwrap();

        assert_eq!(result.sender.as_deref(), Some("PEDRO"));
        assert_eq!(result.amount_text.as_deref(), Some("12.500"));
    }

    #[test]
    fn test_metadata_extractor_does_not_override() {
        let matcher = CustomMatcher::new(
            "custom",
            Box::new(|_| true),
            Box::new(|_, _| {
                Some(
                    ClassificationResult::new("msg", "App", MessageCategory::Payment)
                        .with_sender("ORIGINAL"),
                )
            }),
        )
        .with_metadata_extractor(Box::new(|_, _| (Some("OVERRIDE".to_string()), None)));

        let result = matcher.extract("t", "b").unwrap();
        // 已有字段不被覆盖
        assert_eq!(result.sender.as_deref(), Some("ORIGINAL"));
    }

    #[test]
    fn test_extract_miss_returns_none() {
        let matcher = CustomMatcher::new("never", Box::new(|_| true), Box::new(|_, _| None));
        assert!(matcher.extract("t", "b").is_none());
    }
}
