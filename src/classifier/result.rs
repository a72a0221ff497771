//! 分类结果结构
//!
//! 分类器对单个事件产出一次 `ClassificationResult`，
//! 由调用方持有并传递给后续闸门（时间表、金额、去重）。

use serde::{Deserialize, Serialize};

/// 消息类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageCategory {
    /// 支付到账消息
    Payment,
    /// 私聊消息
    Chat,
    /// 其他
    Other,
}

impl MessageCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageCategory::Payment => "payment",
            MessageCategory::Chat => "chat",
            MessageCategory::Other => "other",
        }
    }
}

impl std::fmt::Display for MessageCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 分类结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// 规范化播报文本（下游朗读/展示用）
    pub canonical_message: String,
    /// 来源应用的展示名（如 "Nequi"）
    pub app_label: String,
    /// 消息类别
    pub category: MessageCategory,
    /// 发送人（提取到时已去除首尾空白）
    pub sender: Option<String>,
    /// 金额原文（保留千分位格式，供金额闸门解析）
    pub amount_text: Option<String>,
}

impl ClassificationResult {
    /// 创建基础结果
    pub fn new(
        canonical_message: impl Into<String>,
        app_label: impl Into<String>,
        category: MessageCategory,
    ) -> Self {
        Self {
            canonical_message: canonical_message.into(),
            app_label: app_label.into(),
            category,
            sender: None,
            amount_text: None,
        }
    }

    /// 设置发送人（链式调用）
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    /// 设置金额原文（链式调用）
    pub fn with_amount_text(mut self, amount_text: impl Into<String>) -> Self {
        self.amount_text = Some(amount_text.into());
        self
    }
}
