//! 播报去重器 - 抑制与上一条完全相同的播报
//!
//! 单槽去重：只和紧邻的上一条成功播报比较，不维护历史。
//! 状态只存在于进程内，重启即清空。比较与更新是一个原子操作，
//! 避免两个并发的相同事件都通过检查。

use std::sync::Mutex;

use tracing::debug;

/// 播报去重器（每个运行中的服务恰有一个实例）
pub struct AnnouncementDeduplicator {
    /// 上一条成功播报的规范化文本
    last_emitted: Mutex<Option<String>>,
}

impl AnnouncementDeduplicator {
    /// 创建去重器（初始为空槽）
    pub fn new() -> Self {
        Self {
            last_emitted: Mutex::new(None),
        }
    }

    /// 检查是否应该播报，并在返回 `true` 时占用槽位
    ///
    /// 仅当与紧邻上一条播报完全相同时返回 `false`；
    /// 否则返回 `true` 并把本条记为最近播报。
    pub fn should_emit(&self, message: &str) -> bool {
        let mut last = match self.last_emitted.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if last.as_deref() == Some(message) {
            debug!("Duplicate of previous announcement, suppressing");
            return false;
        }

        *last = Some(message.to_string());
        true
    }

    /// 清空槽位（下一条消息必然通过）
    pub fn reset(&self) {
        let mut last = match self.last_emitted.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *last = None;
    }
}

impl Default for AnnouncementDeduplicator {
    fn default() -> Self {
        Self::new()
    }
}
