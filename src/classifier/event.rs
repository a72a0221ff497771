//! 统一通知事件结构
//!
//! 定义从系统通知监听器进入分类管道的事件数据结构。
//! 事件是不可变值对象，只在单次管道执行期间存活，不做持久化。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 进入管道的原始通知事件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationEvent {
    /// 来源应用标识（如 `com.nequi.MobileApp`）
    pub source_id: String,
    /// 通知标题
    pub title: String,
    /// 通知正文
    pub body: String,
    /// 接收时间戳
    pub received_at: DateTime<Utc>,
}

impl NotificationEvent {
    /// 创建新事件，接收时间取当前时刻
    pub fn new(
        source_id: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            title: title.into(),
            body: body.into(),
            received_at: Utc::now(),
        }
    }

    /// 设置接收时间戳（链式调用，主要用于测试和回放）
    pub fn with_received_at(mut self, received_at: DateTime<Utc>) -> Self {
        self.received_at = received_at;
        self
    }
}
