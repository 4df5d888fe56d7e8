// src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("网络请求失败: {0}")]
    Network(#[from] reqwest::Error),
    #[error("网络中间件错误: {0}")]
    NetworkMiddleware(#[from] reqwest_middleware::Error),
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON 解析错误: {0}")]
    Json(#[from] serde_json::Error),
    #[error("无法解析来自 '{url}' 的API响应: {source}")]
    ApiParseFailed {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("配置错误: {0}")]
    Config(String),
    #[error("{0}")] // 只打印内部信息，不加任何前缀
    InvalidInput(String),
    #[error("用户中断")]
    UserInterrupt,
    #[error("未知错误: {0}")]
    Other(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;
