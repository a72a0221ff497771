//! 播报决策管道 - 串联分类与三道闸门
//!
//! 数据流：原始事件 → 分类器 → 时间表闸门 → 金额闸门 → 去重器 → 下游 sink。
//! 任何一道闸门拦截即短路，只有去重器会改变状态（且只在前面全部放行后）。
//! 每个事件进入时取一次设置快照，全程使用同一份配置。

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::amount;
use crate::classifier::{ClassificationResult, Classifier, NotificationEvent};
use crate::clock::Clock;
use crate::deduplicator::AnnouncementDeduplicator;
use crate::schedule;
use crate::settings::SettingsStore;

/// 单个事件的播报决策
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnounceDecision {
    /// 播报
    Announce,
    /// 服务此刻不在时间表窗口内
    SuppressedBySchedule,
    /// 金额超过阈值
    SuppressedByAmount,
    /// 与上一条播报重复
    SuppressedAsDuplicate,
}

impl AnnounceDecision {
    pub fn is_announce(&self) -> bool {
        matches!(self, AnnounceDecision::Announce)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnnounceDecision::Announce => "announce",
            AnnounceDecision::SuppressedBySchedule => "suppressed_by_schedule",
            AnnounceDecision::SuppressedByAmount => "suppressed_by_amount",
            AnnounceDecision::SuppressedAsDuplicate => "suppressed_as_duplicate",
        }
    }
}

impl std::fmt::Display for AnnounceDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 下游接收端（渲染、持久化、语音播报由调用方实现）
pub trait AnnouncementSink: Send + Sync {
    /// 接收分类结果与决策
    fn on_decision(&self, result: &ClassificationResult, decision: AnnounceDecision);
}

/// 播报决策管道
pub struct AnnouncementPipeline {
    classifier: Classifier,
    settings: Arc<dyn SettingsStore>,
    clock: Arc<dyn Clock>,
    deduplicator: AnnouncementDeduplicator,
    sinks: Vec<Arc<dyn AnnouncementSink>>,
}

impl AnnouncementPipeline {
    /// 创建管道
    pub fn new(
        classifier: Classifier,
        settings: Arc<dyn SettingsStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            classifier,
            settings,
            clock,
            deduplicator: AnnouncementDeduplicator::new(),
            sinks: Vec::new(),
        }
    }

    /// 注册下游 sink
    pub fn add_sink(&mut self, sink: Arc<dyn AnnouncementSink>) {
        self.sinks.push(sink);
    }

    /// 处理一个事件，返回分类结果与决策
    ///
    /// 分类失败（来源未识别或文本未命中）返回 `None`，不通知 sink。
    /// 分类成功时，无论放行还是拦截，都把 (结果, 决策) 交给每个 sink。
    pub fn handle_event(
        &self,
        event: &NotificationEvent,
    ) -> Option<(ClassificationResult, AnnounceDecision)> {
        // 整个事件使用进入时的设置快照
        let settings = self.settings.snapshot();

        let result = self
            .classifier
            .classify(&event.source_id, &event.title, &event.body)?;

        let decision = if !schedule::is_active(&settings.schedule, self.clock.now()) {
            debug!(source_id = %event.source_id, "Outside schedule window, suppressing");
            AnnounceDecision::SuppressedBySchedule
        } else if !amount::permits(&settings.amount, result.amount_text.as_deref()) {
            AnnounceDecision::SuppressedByAmount
        } else if !self.deduplicator.should_emit(&result.canonical_message) {
            AnnounceDecision::SuppressedAsDuplicate
        } else {
            AnnounceDecision::Announce
        };

        for sink in &self.sinks {
            sink.on_decision(&result, decision);
        }

        Some((result, decision))
    }

    /// 分类（不过闸门，无副作用）
    pub fn classify(
        &self,
        source_id: &str,
        title: &str,
        body: &str,
    ) -> Option<ClassificationResult> {
        self.classifier.classify(source_id, title, body)
    }

    /// 服务此刻是否活跃
    pub fn is_service_active(&self) -> bool {
        schedule::is_active(&self.settings.snapshot().schedule, self.clock.now())
    }

    /// 下一次时间表状态翻转时刻（供外部告警调度）
    pub fn next_schedule_transition(&self) -> Option<chrono::NaiveDateTime> {
        schedule::next_transition(&self.settings.snapshot().schedule, self.clock.now())
    }

    /// 金额是否放行
    pub fn should_announce_amount(&self, amount_text: Option<&str>) -> bool {
        amount::permits(&self.settings.snapshot().amount, amount_text)
    }

    /// 去重检查（通过时占用槽位）
    pub fn should_emit(&self, message: &str) -> bool {
        self.deduplicator.should_emit(message)
    }
}
