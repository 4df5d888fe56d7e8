// src/cli.rs

use crate::constants;
use clap::{Parser, ValueEnum, crate_version};

/// 定义日志输出级别
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

// command 属性
#[derive(Parser, Debug, Clone)]
#[command(
    version = crate_version!(),
    about,
    long_about = None,
    arg_required_else_help = true,
    disable_help_flag = true,
    disable_version_flag = true,
)]
#[command(group(
    clap::ArgGroup::new("mode")
        .required(true)
        .args(&["serve", "interactive", "url", "share"]),
))]
pub struct Cli {
    // --- 运行模式 (Mode) ---
    /// 启动胶水服务器 (POST /convert 等接口)
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Mode")]
    pub serve: bool,
    /// 启动交互式会话，逐一输入视频链接
    #[arg(short, long, action = clap::ArgAction::SetTrue, help_heading = "Mode")]
    pub interactive: bool,
    /// 提交单个视频链接并输出预览与下载地址
    #[arg(long, help_heading = "Mode")]
    pub url: Option<String>,
    /// 生成社交平台分享链接 (facebook, twitter, whatsapp, instagram)
    #[arg(long, value_name = "PLATFORM", help_heading = "Mode")]
    pub share: Option<String>,

    // --- 客户端选项 (Client) ---
    /// [单链接模式] 指定清晰度，例如 '720p'
    #[arg(
        short,
        long,
        default_value_t = constants::DEFAULT_RESOLUTION.to_string(),
        help_heading = "Client"
    )]
    pub resolution: String,
    /// [分享模式] 要分享的链接
    #[arg(
        long,
        value_name = "URL",
        requires = "share",
        conflicts_with_all = ["serve", "interactive", "url"],
        help_heading = "Client"
    )]
    pub share_url: Option<String>,
    /// 远程下载服务的基础地址，优先级最高
    #[arg(long, value_name = "URL", help_heading = "Client")]
    pub base_url: Option<String>,
    /// 只打印分享链接，不打开浏览器
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Client")]
    pub no_browser: bool,

    // --- 服务端选项 (Server) ---
    /// 监听端口 (默认读取环境变量 PORT，否则为 3000)
    #[arg(short, long, value_parser = clap::value_parser!(u16), help_heading = "Server")]
    pub port: Option<u16>,
    /// 监听地址
    #[arg(long, help_heading = "Server")]
    pub host: Option<String>,

    // --- 通用选项 (General) ---
    /// 显示此帮助信息并退出
    #[arg(
        short = 'h',
        long,
        action = clap::ArgAction::Help,
        global = true,
        help_heading = "General"
    )]
    _help: Option<bool>,
    /// 显示版本信息并退出
    #[arg(
        short = 'V',
        long,
        action = clap::ArgAction::Version,
        global = true,
        help_heading = "General"
    )]
    _version: Option<bool>,
    /// (隐藏参数) 设置日志输出级别，用于调试
    #[arg(long, value_enum, global = true, hide = true)]
    pub log_level: Option<LogLevel>,
}
