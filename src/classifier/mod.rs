//! 通知分类层 - 识别支付应用消息格式并提取结构化字段
//!
//! # 设计目标
//! 1. 统一接口：所有匹配器实现 `Matcher` trait
//! 2. 来源独占：一个应用一个解析器，提取失败不落到后续匹配器
//! 3. 运行时扩展：`CustomMatcher` 支持在不改内置库的前提下注册新来源
//! 4. 无状态：分类是纯函数，相同输入产出相同结果

pub mod event;
pub mod matcher;
pub mod patterns;
pub mod registry;
pub mod result;

pub use event::NotificationEvent;
pub use matcher::{CustomMatcher, ExtractFn, Matcher, MetadataFn, SourcePredicate};
pub use patterns::{ChatAppMatcher, PaymentAppMatcher};
pub use registry::Classifier;
pub use result::{ClassificationResult, MessageCategory};
