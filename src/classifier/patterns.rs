//! 内置匹配器库 - 各来源应用的文本形状识别
//!
//! 支付类匹配器先对 `标题 + " " + 正文` 应用固定形状的
//! 发送人/金额正则（主模式），失败后回退到连接短语切分启发式，
//! 两种尝试都失败才判定未命中。聊天类匹配器只接受私聊形状，
//! 含分隔符的群聊标题（"Grupo: Juan"）一律拒绝。

use regex::Regex;
use tracing::debug;

use super::matcher::Matcher;
use super::result::{ClassificationResult, MessageCategory};

/// 支付应用匹配器（正则 + 连接短语回退）
pub struct PaymentAppMatcher {
    name: String,
    /// 展示名（用于播报文本）
    app_label: String,
    /// 来源识别关键字（对 source_id 做小写包含匹配）
    source_key: String,
    /// 连接短语（如 "te envió"），也是回退切分点
    connector: String,
    /// 主提取正则
    primary: Regex,
}

impl PaymentAppMatcher {
    /// 按连接短语构建匹配器
    ///
    /// 主正则形状：`<发送人> <连接短语> [$]<金额>`，金额保留千分位原文。
    pub fn new(
        app_label: impl Into<String>,
        source_key: impl Into<String>,
        connector: impl Into<String>,
    ) -> Self {
        let app_label = app_label.into();
        let connector = connector.into();
        let connector_pattern: String = connector
            .split_whitespace()
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(r"\s+");
        let pattern = format!(
            r"(?i)(?P<sender>.+?)\s+{connector_pattern}\s+\$?\s*(?P<amount>\d(?:[\d.,]*\d)?)"
        );

        Self {
            name: format!("payment-{}", app_label.to_lowercase()),
            app_label,
            source_key: source_key.into().to_lowercase(),
            connector,
            primary: Regex::new(&pattern).unwrap(),
        }
    }

    /// Nequi 到账消息（"ANA MARIA te envió 50.000, ¡lo mejor!"）
    pub fn nequi() -> Self {
        Self::new("Nequi", "nequi", "te envió")
    }

    /// Bancolombia 转账消息
    pub fn bancolombia() -> Self {
        Self::new("Bancolombia", "bancolombia", "te transfirió")
    }

    /// DaviPlata 到账消息（"ANA MARIA te pasó $50.000"）
    pub fn daviplata() -> Self {
        Self::new("DaviPlata", "daviplata", "te pasó")
    }

    /// 回退启发式：按连接短语切分，左侧为发送人，右侧取首个数字串为金额
    fn split_fallback(&self, combined: &str) -> Option<(String, Option<String>)> {
        let idx = combined.find(&self.connector)?;
        let sender = self.clean_sender(&combined[..idx]);
        if sender.is_empty() {
            return None;
        }
        let amount = first_amount_token(&combined[idx + self.connector.len()..]);
        Some((sender, amount))
    }

    /// 清理发送人：去空白，去掉 "Nequi" / "Nequi:" 这类应用前缀
    ///
    /// 标题与正文拼接后，应用名常出现在发送人之前；只在应用名后
    /// 紧跟冒号或空白时剥离，避免误伤以应用名开头的真实姓名。
    fn clean_sender(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        let label_lower = self.app_label.to_lowercase();
        if trimmed.to_lowercase().starts_with(&label_lower) {
            let rest = &trimmed[label_lower.len()..];
            if rest.starts_with(':') || rest.starts_with(char::is_whitespace) {
                let rest = rest.trim_start().trim_start_matches(':').trim_start();
                if !rest.is_empty() {
                    return rest.to_string();
                }
            }
        }
        trimmed.to_string()
    }

    fn build_result(&self, sender: String, amount: Option<String>) -> ClassificationResult {
        let canonical = match &amount {
            Some(a) => format!("{} {} {} por {}", sender, self.connector, a, self.app_label),
            None => format!("{} {} un pago por {}", sender, self.connector, self.app_label),
        };
        let mut result =
            ClassificationResult::new(canonical, self.app_label.clone(), MessageCategory::Payment)
                .with_sender(sender);
        if let Some(a) = amount {
            result = result.with_amount_text(a);
        }
        result
    }
}

impl Matcher for PaymentAppMatcher {
    fn name(&self) -> &str {
        &self.name
    }

    fn recognizes_source(&self, source_id: &str) -> bool {
        source_id.to_lowercase().contains(&self.source_key)
    }

    fn extract(&self, title: &str, body: &str) -> Option<ClassificationResult> {
        let combined = if body.trim().is_empty() {
            title.to_string()
        } else {
            format!("{} {}", title, body)
        };

        // 主正则
        if let Some(caps) = self.primary.captures(&combined) {
            let sender = self.clean_sender(&caps["sender"]);
            if !sender.is_empty() {
                return Some(self.build_result(sender, Some(caps["amount"].to_string())));
            }
        }

        // 回退：连接短语切分
        if let Some((sender, amount)) = self.split_fallback(&combined) {
            debug!(matcher = %self.name, "Primary pattern missed, connector split succeeded");
            return Some(self.build_result(sender, amount));
        }

        debug!(matcher = %self.name, "No payment shape in notification text");
        None
    }
}

/// 聊天应用匹配器（仅私聊，拒绝群聊形状）
pub struct ChatAppMatcher {
    name: String,
    app_label: String,
    source_key: String,
}

impl ChatAppMatcher {
    pub fn new(app_label: impl Into<String>, source_key: impl Into<String>) -> Self {
        let app_label = app_label.into();
        Self {
            name: format!("chat-{}", app_label.to_lowercase()),
            app_label,
            source_key: source_key.into().to_lowercase(),
        }
    }

    /// WhatsApp 私聊消息（标题即发送人）
    pub fn whatsapp() -> Self {
        Self::new("WhatsApp", "whatsapp")
    }
}

impl Matcher for ChatAppMatcher {
    fn name(&self) -> &str {
        &self.name
    }

    fn recognizes_source(&self, source_id: &str) -> bool {
        source_id.to_lowercase().contains(&self.source_key)
    }

    fn extract(&self, title: &str, _body: &str) -> Option<ClassificationResult> {
        let sender = title.trim();
        if sender.is_empty() {
            return None;
        }
        // 群聊标题形如 "Grupo: Juan"，不播报
        if sender.contains(':') {
            debug!(matcher = %self.name, title = %sender, "Group conversation title, skipping");
            return None;
        }

        let canonical = format!("Nuevo mensaje de {} por {}", sender, self.app_label);
        Some(
            ClassificationResult::new(canonical, self.app_label.clone(), MessageCategory::Chat)
                .with_sender(sender),
        )
    }
}

/// 取文本中首个数字串（允许千分位 `.`/`,`，去掉尾随分隔符）
fn first_amount_token(text: &str) -> Option<String> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let token: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();
    let token = token.trim_end_matches(&['.', ','][..]);
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
