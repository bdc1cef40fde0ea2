use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use human_panic::setup_panic;
use tracing::{debug, error, info, warn};

// 从 lib.rs 导入模块
use campus_core::config::AppConfig;
use campus_core::errors::CampusError;
use campus_core::evaluation::{Evaluator, extract_text};
use campus_core::runtime::lifetime::{self, startup::StartupContext};

#[derive(Parser)]
#[command(name = "campus-core", version, about = "Campus store and evaluation tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 打开（或恢复）存储，执行迁移并在空库时写入演示数据
    Init,
    /// 对一个文件或一段文本评分，不写入存储
    Evaluate {
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long)]
        text: Option<String>,
    },
    /// 输出各表行数
    Stats,
}

/// 打开存储；失败时按错误类别输出后转成 anyhow
async fn open_campus(config: &AppConfig) -> anyhow::Result<StartupContext> {
    lifetime::startup::prepare_startup(config)
        .await
        .map_err(|e: CampusError| {
            #[cfg(debug_assertions)]
            eprintln!("{}", e.format_colored());

            if e.is_client_error() {
                warn!("{}", e.format_simple());
            } else {
                error!("[{}] {}", e.code(), e.format_simple());
            }
            anyhow::Error::new(e)
        })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    setup_panic!();

    let cli = Cli::parse();

    // 初始化配置
    AppConfig::init().context("Failed to initialize configuration")?;
    let config = AppConfig::get();

    // 初始化日志
    let stdout_log = std::io::stdout();
    let (non_blocking_writer, _guard) = tracing_appender::non_blocking(stdout_log);
    let filter = tracing_subscriber::EnvFilter::new(&config.app.log_level);
    let tracing_format = tracing_subscriber::fmt::format()
        .with_level(true)
        .with_ansi(true);

    let tracing_builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking_writer)
        .event_format(tracing_format);

    if config.is_development() {
        tracing_builder
            .with_file(true)
            .with_line_number(true)
            .init();
    } else {
        tracing_builder.json().init();
    }

    let started = chrono::Utc::now();
    debug!(
        "{} v{} starting ({})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        config.app.system_name
    );

    match cli.command {
        Command::Init => {
            let startup = open_campus(config).await?;
            warn!(
                "Store ready at {} in {} ms",
                startup.store.snapshot_path().display(),
                chrono::Utc::now()
                    .signed_duration_since(started)
                    .num_milliseconds()
            );
        }
        Command::Evaluate { file, text } => {
            let file_name = file
                .as_ref()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned());
            let content = extract_text(file.as_deref(), file_name.as_deref(), text.as_deref()).await;
            if content.is_empty() {
                warn!("No text could be extracted, scoring an empty submission");
            }

            let evaluation = Evaluator::from_config(&config.evaluation)
                .evaluate(&content)
                .await;
            info!("Evaluation source: {}", evaluation.source);
            println!("{}", serde_json::to_string_pretty(&evaluation)?);
        }
        Command::Stats => {
            let startup = open_campus(config).await?;
            for (table, count) in startup.store.table_row_counts().await? {
                println!("{table:<16} {count}");
            }
        }
    }

    Ok(())
}
