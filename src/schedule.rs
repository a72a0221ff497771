//! 周时间表闸门 - 判定服务此刻是否应处于监听状态
//!
//! 活跃/不活跃两个逻辑状态由配置 + 当前时刻按需推导，不做持久化；
//! 每次告警触发时重新求值。`next_transition` 计算下一次状态翻转时刻，
//! 供调用方安排外部唤醒告警。

use std::fmt;

use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

/// 一天的分钟数
pub const MINUTES_PER_DAY: u16 = 1440;

/// 周时间表配置
///
/// 分钟值是挂钟分钟（与日期无关），窗口允许跨午夜（`end < start`）。
/// 只由配置保存操作修改，对闸门只读。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// 是否启用时间表（false = 不限制，服务始终活跃）
    pub enabled: bool,
    /// 窗口起始分钟 [0, 1440)
    pub start_minute: u16,
    /// 窗口结束分钟 [0, 1440)
    pub end_minute: u16,
    /// 各工作日启用标记，下标 0 = 周一
    pub enabled_weekdays: [bool; 7],
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            start_minute: 0,
            end_minute: 0,
            enabled_weekdays: [false; 7],
        }
    }
}

impl ScheduleConfig {
    /// 创建启用的时间表（分钟值按天长归一化）
    pub fn new(start_minute: u16, end_minute: u16, weekdays: &[Weekday]) -> Self {
        let mut enabled_weekdays = [false; 7];
        for day in weekdays {
            enabled_weekdays[day.num_days_from_monday() as usize] = true;
        }
        Self {
            enabled: true,
            start_minute: start_minute % MINUTES_PER_DAY,
            end_minute: end_minute % MINUTES_PER_DAY,
            enabled_weekdays,
        }
    }

    /// 某个工作日是否启用
    pub fn is_enabled_on(&self, weekday: Weekday) -> bool {
        self.enabled_weekdays[weekday.num_days_from_monday() as usize]
    }

    /// 是否至少启用了一个工作日
    pub fn has_enabled_weekday(&self) -> bool {
        self.enabled_weekdays.iter().any(|&d| d)
    }

    /// 窗口是否跨午夜
    pub fn wraps_midnight(&self) -> bool {
        self.start_minute > self.end_minute
    }
}

impl fmt::Display for ScheduleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.enabled {
            return write!(f, "schedule disabled (always active)");
        }
        write!(
            f,
            "{:02}:{:02}-{:02}:{:02}",
            self.start_minute / 60,
            self.start_minute % 60,
            self.end_minute / 60,
            self.end_minute % 60
        )
    }
}

/// 服务此刻是否应处于活跃（监听）状态
///
/// - 时间表未启用：始终活跃（时间表是可选功能，缺省不静音服务）
/// - 当天工作日未启用：不活跃
/// - 同日窗口（start ≤ end）：`start ≤ now ≤ end` 时活跃
/// - 跨午夜窗口（start > end）：`now ≥ start` 或 `now ≤ end` 时活跃
/// - `start == end`：视为全天窗口（产品决策，不是零长窗口）
pub fn is_active(config: &ScheduleConfig, now: NaiveDateTime) -> bool {
    if !config.enabled {
        return true;
    }
    if !config.is_enabled_on(now.weekday()) {
        return false;
    }

    let now_minute = (now.hour() * 60 + now.minute()) as u16;
    let (start, end) = (config.start_minute, config.end_minute);

    if start == end {
        // 全天窗口
        true
    } else if start < end {
        start <= now_minute && now_minute <= end
    } else {
        now_minute >= start || now_minute <= end
    }
}

/// 下一次 `is_active` 可能翻转的时刻
///
/// 从 `now` 起逐天向前扫描（最多 7 天），收集每个启用工作日的
/// 窗口起点和窗口终点中严格晚于 `now` 的最早者。跨午夜窗口的终点
/// 落在启用日的次日。没有任何工作日启用（或时间表未启用）时返回
/// `None`，调用方应视为"永不活跃"，不再安排无谓的唤醒。
pub fn next_transition(config: &ScheduleConfig, now: NaiveDateTime) -> Option<NaiveDateTime> {
    if !config.enabled || !config.has_enabled_weekday() {
        return None;
    }

    let mut best: Option<NaiveDateTime> = None;
    for offset in 0..=7 {
        let date = now.date() + Duration::days(offset);
        if !config.is_enabled_on(date.weekday()) {
            continue;
        }

        let start_at = date.and_time(minute_to_time(config.start_minute));
        let end_date = if config.wraps_midnight() {
            date + Duration::days(1)
        } else {
            date
        };
        let end_at = end_date.and_time(minute_to_time(config.end_minute));

        for candidate in [start_at, end_at] {
            if candidate > now && best.map_or(true, |b| candidate < b) {
                best = Some(candidate);
            }
        }
    }
    best
}

fn minute_to_time(minute: u16) -> NaiveTime {
    let minute = minute % MINUTES_PER_DAY;
    NaiveTime::from_hms_opt(u32::from(minute) / 60, u32::from(minute) % 60, 0)
        .unwrap_or(NaiveTime::MIN)
}
