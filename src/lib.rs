// src/lib.rs

pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod models;
pub mod server;
pub mod share;
pub mod symbols;
pub mod ui;
pub mod utils;
pub mod workflows;

use crate::{
    cli::{Cli, LogLevel},
    config::AppConfig,
    error::AppResult,
};
use log::debug;
use std::sync::Arc;

/// 未显式指定日志级别时：服务器模式记录 info，客户端模式不记录
pub fn effective_log_level(args: &Cli) -> LogLevel {
    args.log_level
        .unwrap_or(if args.serve { LogLevel::Info } else { LogLevel::Off })
}

/// 库的公共入口点，由 `main.rs` 调用
pub async fn run_from_cli(args: Arc<Cli>) -> AppResult<()> {
    debug!("CLI 参数: {:?}", args);

    let config = AppConfig::new(&args)?;
    debug!("加载的应用配置: {:?}", config);

    if args.serve {
        server::serve(config.server).await
    } else if args.interactive {
        workflows::run_interactive(&config).await
    } else if let Some(platform) = &args.share {
        workflows::run_share(&config, platform, args.share_url.as_deref()).await
    } else if let Some(url) = &args.url {
        workflows::run_single(&config, url, &args.resolution).await
    } else {
        Ok(())
    }
}
