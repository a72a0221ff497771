//! Payment Announcer CLI
//!
//! 库的命令行试验台：分类单条通知、检查时间表状态、验证金额阈值。
//! 不是产品 UI，只用于调试和联调。

use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use payment_announcer::{
    AnnounceSettings, AnnouncementPipeline, Classifier, Clock, FixedClock, InMemorySettings,
    SystemClock,
};

#[derive(Parser)]
#[command(name = "pan")]
#[command(about = "Payment Announcer - 支付通知分类与播报决策")]
#[command(version)]
struct Cli {
    /// 设置文件路径（JSON，缺省为无限制设置）
    #[arg(long, global = true)]
    settings: Option<String>,

    /// 固定"当前时刻"（格式 2024-03-04T23:00，用于调试时间表）
    #[arg(long, global = true)]
    at: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 对单条通知跑完整管道并打印决策
    Classify {
        /// 来源应用标识
        source: String,
        /// 通知标题
        title: String,
        /// 通知正文
        #[arg(default_value = "")]
        body: String,
        /// 输出 JSON 格式
        #[arg(long)]
        json: bool,
    },
    /// 打印时间表状态与下一次翻转时刻
    Schedule,
    /// 检查金额文本是否放行
    Amount {
        /// 金额原文（如 "50.000"）
        text: String,
    },
}

fn main() -> Result<()> {
    // 通过 RUST_LOG 环境变量控制日志级别，默认为 info
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("payment_announcer=info,pan=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => AnnounceSettings::load_from_file(path)?,
        None => AnnounceSettings::default(),
    };

    let clock: Arc<dyn Clock> = match &cli.at {
        Some(raw) => {
            let now = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
                .map_err(|e| anyhow::anyhow!("Invalid --at value {:?}: {}", raw, e))?;
            Arc::new(FixedClock::new(now))
        }
        None => Arc::new(SystemClock),
    };

    let pipeline = AnnouncementPipeline::new(
        Classifier::with_builtin_matchers(),
        Arc::new(InMemorySettings::new(settings)),
        clock,
    );

    match cli.command {
        Commands::Classify {
            source,
            title,
            body,
            json,
        } => {
            let event = payment_announcer::NotificationEvent::new(source, title, body);
            match pipeline.handle_event(&event) {
                Some((result, decision)) => {
                    if json {
                        println!(
                            "{}",
                            serde_json::to_string_pretty(&serde_json::json!({
                                "result": result,
                                "decision": decision,
                            }))?
                        );
                    } else {
                        println!("决策: {}", decision);
                        println!("播报文本: {}", result.canonical_message);
                        println!("类别: {}", result.category);
                        if let Some(sender) = &result.sender {
                            println!("发送人: {}", sender);
                        }
                        if let Some(amount) = &result.amount_text {
                            println!("金额: {}", amount);
                        }
                    }
                }
                None => {
                    println!("未识别的通知（来源无匹配器或文本未命中）");
                }
            }
        }
        Commands::Schedule => {
            if pipeline.is_service_active() {
                println!("服务当前活跃");
            } else {
                println!("服务当前不活跃");
            }
            match pipeline.next_schedule_transition() {
                Some(instant) => println!("下一次状态翻转: {}", instant.format("%Y-%m-%d %H:%M")),
                None => println!("没有可调度的翻转时刻（时间表未启用或无启用工作日）"),
            }
        }
        Commands::Amount { text } => {
            if pipeline.should_announce_amount(Some(&text)) {
                println!("放行: {}", text);
            } else {
                println!("拦截（超过阈值）: {}", text);
            }
        }
    }

    Ok(())
}
