// src/main.rs

use clap::{CommandFactory, FromArgMatches};
use colored::*;
use log::warn;
use std::{env, sync::Arc, time::Duration};
use you2_mp4::{
    cli::{Cli, LogLevel},
    config, constants, effective_log_level, run_from_cli,
};

fn setup_logging(level: LogLevel, to_stderr: bool) {
    let filter = match level {
        LogLevel::Off => return,
        LogLevel::Error => log::LevelFilter::Error,
        LogLevel::Warn => log::LevelFilter::Warn,
        LogLevel::Info => log::LevelFilter::Info,
        LogLevel::Debug => log::LevelFilter::Debug,
        LogLevel::Trace => log::LevelFilter::Trace,
    };

    let app_name = clap::crate_name!();

    // 优先写入配置目录，拿不到主目录时回退到临时目录
    let log_file_path = match config::file::config_dir() {
        Ok(dir) => dir.join(constants::LOG_FILE_NAME),
        Err(_) => {
            eprintln!("警告: 无法获取用户主目录，日志将写入临时目录。");
            env::temp_dir().join(app_name).join(constants::LOG_FILE_NAME)
        }
    };

    if let Some(dir) = log_file_path.parent()
        && let Err(e) = std::fs::create_dir_all(dir)
    {
        eprintln!("警告: 无法创建日志目录 {:?}: {}", dir, e);
    }

    let file_appender = match fern::log_file(&log_file_path) {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!(
                "警告: 无法打开主日志文件 {:?} : {}。将尝试使用备用日志文件。",
                log_file_path, e
            );
            let fallback_path = env::temp_dir().join(format!(
                "{}-{}",
                app_name,
                constants::LOG_FALLBACK_FILE_NAME
            ));
            match fern::log_file(&fallback_path) {
                Ok(fb_file) => {
                    warn!("日志将写入备用文件: {:?}", fallback_path);
                    Some(fb_file)
                }
                Err(e_fb) => {
                    eprintln!(
                        "错误: 无法创建备用日志文件 {:?}: {}。日志将不会被记录到文件。",
                        fallback_path, e_fb
                    );
                    None
                }
            }
        }
    };

    let mut dispatch = fern::Dispatch::new()
        .level(filter)
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}] [{:<5}] [{}:{}] - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.line().unwrap_or(0),
                message
            ))
        });
    if let Some(file) = file_appender {
        dispatch = dispatch.chain(file);
    }
    if to_stderr {
        dispatch = dispatch.chain(std::io::stderr());
    }

    if let Err(e) = dispatch.apply() {
        eprintln!("警告: 日志系统初始化失败: {}", e);
    }
}

#[tokio::main]
async fn main() {
    // 为 Windows 终端启用 ANSI 颜色支持。
    #[cfg(windows)]
    {
        colored::control::set_virtual_terminal(true).ok();
    }

    let bin_name = env::var("CARGO_BIN_NAME").unwrap_or_else(|_| clap::crate_name!().to_string());

    let after_help = format!(
        "示例:\n  # 启动胶水服务器 (端口读取 PORT，默认 3000)\n  {bin} --serve\n\n  # 启动交互模式\n  {bin} -i --base-url \"http://127.0.0.1:3000\"\n\n  # 提交单个链接\n  {bin} --url \"https://youtu.be/xyz789\" -r 720p\n\n  # 生成分享链接\n  {bin} --share twitter --share-url \"https://example.com\"",
        bin = bin_name
    );

    let cmd = Cli::command().after_help(after_help);
    let args = match Cli::from_arg_matches(&cmd.get_matches()) {
        Ok(args) => Arc::new(args),
        Err(e) => e.exit(),
    };

    setup_logging(effective_log_level(&args), args.serve);

    // 服务器模式自行处理 Ctrl+C 并优雅退出
    if !args.serve {
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                println!("\n{} 用户强制中断程序。", "[!]".yellow());
                tokio::time::sleep(Duration::from_millis(100)).await;
                std::process::exit(130);
            }
        });
    }

    if let Err(e) = run_from_cli(args).await {
        eprintln!("\n{} {}", "[X]".red(), format!("程序执行出错: {}", e).red());
        std::process::exit(1);
    }
}
