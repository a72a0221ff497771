//! Payment Announcer - 支付通知分类与播报决策核心
//!
//! 拦截第三方应用的通知事件，识别支付类消息并提取发送人/金额，
//! 再经周时间表、金额阈值、去重三道闸门决定是否播报。
//! UI、持久化、语音合成、系统告警均为外部协作者；
//! 核心只消费时钟与设置快照，产出决策。

pub mod amount;
pub mod classifier;
pub mod clock;
pub mod deduplicator;
pub mod pipeline;
pub mod schedule;
pub mod settings;

pub use amount::{parse_minor_units, AmountPolicy};
pub use classifier::{
    ChatAppMatcher, ClassificationResult, Classifier, CustomMatcher, Matcher, MessageCategory,
    NotificationEvent, PaymentAppMatcher,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use deduplicator::AnnouncementDeduplicator;
pub use pipeline::{AnnounceDecision, AnnouncementPipeline, AnnouncementSink};
pub use schedule::{is_active, next_transition, ScheduleConfig, MINUTES_PER_DAY};
pub use settings::{AnnounceSettings, InMemorySettings, SettingsStore};
