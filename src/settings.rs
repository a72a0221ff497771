//! 设置快照层 - 向核心提供只读配置
//!
//! 核心不负责持久化：调用方（键值存储、远端同步）实现 `SettingsStore`，
//! 核心只读取快照。更新必须整体换出 `Arc` 快照发布，绝不逐字段修改，
//! 避免并发读取者观察到撕裂的配置；在途事件在其进入时的快照下完成。

use std::fs;
use std::path::Path;
use std::sync::{Arc, RwLock};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::amount::AmountPolicy;
use crate::schedule::ScheduleConfig;

/// 播报设置快照
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnounceSettings {
    /// 周时间表
    #[serde(default)]
    pub schedule: ScheduleConfig,
    /// 金额阈值策略
    #[serde(default)]
    pub amount: AmountPolicy,
}

impl AnnounceSettings {
    /// 从 JSON 文件加载设置
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        let settings: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))?;
        info!(path = %path.display(), "Loaded announce settings");
        Ok(settings)
    }
}

/// 设置存取抽象（对核心只读）
pub trait SettingsStore: Send + Sync {
    /// 当前设置快照
    fn snapshot(&self) -> Arc<AnnounceSettings>;
}

/// 内存设置存储
///
/// `update` 通过整体换出 `Arc` 发布新快照；读取方拿到的快照
/// 在其生命周期内不会改变。
pub struct InMemorySettings {
    current: RwLock<Arc<AnnounceSettings>>,
}

impl InMemorySettings {
    pub fn new(settings: AnnounceSettings) -> Self {
        Self {
            current: RwLock::new(Arc::new(settings)),
        }
    }

    /// 发布新设置（原子快照交换）
    pub fn update(&self, settings: AnnounceSettings) {
        let mut current = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *current = Arc::new(settings);
    }
}

impl Default for InMemorySettings {
    fn default() -> Self {
        Self::new(AnnounceSettings::default())
    }
}

impl SettingsStore for InMemorySettings {
    fn snapshot(&self) -> Arc<AnnounceSettings> {
        let current = match self.current.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        Arc::clone(&*current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use std::io::Write;

    #[test]
    fn test_default_settings_are_unrestricted() {
        let settings = AnnounceSettings::default();
        assert!(!settings.schedule.enabled);
        assert!(!settings.amount.enabled);
    }

    #[test]
    fn test_update_swaps_whole_snapshot() {
        let store = InMemorySettings::default();
        let before = store.snapshot();

        store.update(AnnounceSettings {
            schedule: ScheduleConfig::new(8 * 60, 17 * 60, &[Weekday::Mon]),
            amount: AmountPolicy::with_threshold(100_000),
        });
        let after = store.snapshot();

        // 旧快照不受影响（在途事件继续使用它）
        assert!(!before.schedule.enabled);
        assert!(after.schedule.enabled);
        assert_eq!(after.amount.threshold_minor_units, 100_000);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "schedule": {{
                    "enabled": true,
                    "start_minute": 1320,
                    "end_minute": 360,
                    "enabled_weekdays": [true, false, false, false, false, false, false]
                }},
                "amount": {{ "enabled": true, "threshold_minor_units": 100000 }}
            }}"#
        )
        .unwrap();

        let settings = AnnounceSettings::load_from_file(file.path()).unwrap();
        assert!(settings.schedule.enabled);
        assert_eq!(settings.schedule.start_minute, 1320);
        assert!(settings.schedule.is_enabled_on(Weekday::Mon));
        assert!(!settings.schedule.is_enabled_on(Weekday::Tue));
        assert_eq!(settings.amount.threshold_minor_units, 100_000);
    }

    #[test]
    fn test_load_missing_fields_use_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{}}").unwrap();

        let settings = AnnounceSettings::load_from_file(file.path()).unwrap();
        assert_eq!(settings, AnnounceSettings::default());
    }

    #[test]
    fn test_load_bad_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert!(AnnounceSettings::load_from_file(file.path()).is_err());
        assert!(AnnounceSettings::load_from_file("/nonexistent/settings.json").is_err());
    }
}
