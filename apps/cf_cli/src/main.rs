// apps/cf_cli/src/main.rs

//! CoupleFEM 命令行界面
//!
//! 提供流固耦合适配器的离线工具：回放耦合运行、显示接口网格
//! 信息、验证配置文件。
//!
//! # 架构层级
//!
//! 本模块属于 **Layer 4: Application**：仅组合下层 API，
//! 错误统一经 `anyhow` 汇报。

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// CoupleFEM 流固耦合适配器命令行工具
#[derive(Parser)]
#[command(name = "cf_cli")]
#[command(author = "CoupleFEM Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "CoupleFEM co-simulation coupling adapter", long_about = None)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 回放耦合运行
    Run(commands::run::RunArgs),
    /// 显示接口网格信息
    Info(commands::info::InfoArgs),
    /// 验证配置
    Validate(commands::validate::ValidateArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // 执行命令
    match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Info(args) => commands::info::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
    }
}
