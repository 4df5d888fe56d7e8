// src/config.rs

pub mod file;

use self::file::load_or_create_external_config;
use crate::{
    cli::Cli,
    constants,
    error::{AppError, AppResult},
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::{fmt, time::Duration};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NetworkConfig {
    pub base_url: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub download_url_template: Option<String>,
    pub resolutions: Option<Vec<String>>,
}

/// 对应 `~/.you2-mp4/config.json` 的内容
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExternalConfig {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub server: ServerFileConfig,
}

impl ExternalConfig {
    pub(crate) fn default_app_config() -> Self {
        Self {
            network: NetworkConfig {
                base_url: Some(constants::DEFAULT_BASE_URL.into()),
                connect_timeout_secs: Some(10),
                timeout_secs: Some(60),
                max_retries: Some(2),
            },
            server: ServerFileConfig {
                host: Some(constants::DEFAULT_HOST.into()),
                port: Some(constants::DEFAULT_PORT),
                download_url_template: Some(constants::DOWNLOAD_URL_TEMPLATE.into()),
                resolutions: Some(
                    constants::DEFAULT_RESOLUTIONS.iter().map(|s| s.to_string()).collect(),
                ),
            },
        }
    }
}

#[derive(Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 启动时读取的密钥，目前没有任何接口使用
    pub api_key: Option<String>,
    pub download_url_template: String,
    pub resolutions: Vec<String>,
}

// 不打印密钥本身
impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("download_url_template", &self.download_url_template)
            .field("resolutions", &self.resolutions)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub max_retries: u32,
    pub open_browser: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub client: ClientConfig,
}

impl AppConfig {
    pub fn new(args: &Cli) -> AppResult<Self> {
        let external_config = load_or_create_external_config()?;
        Self::from_sources(external_config, |key| std::env::var(key).ok(), args)
    }

    /// 合并配置来源，优先级: 命令行 > 环境变量 > 配置文件 > 内置默认值
    pub fn from_sources<F>(external: ExternalConfig, env: F, args: &Cli) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_non_empty = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let env_port = match env_non_empty(constants::env::PORT) {
            Some(raw) => Some(raw.trim().parse::<u16>().map_err(|_| {
                AppError::Config(format!(
                    "环境变量 {} 的值 '{}' 不是有效端口",
                    constants::env::PORT,
                    raw
                ))
            })?),
            None => None,
        };
        let port = args
            .port
            .or(env_port)
            .or(external.server.port)
            .unwrap_or(constants::DEFAULT_PORT);

        let host = args
            .host
            .clone()
            .or_else(|| env_non_empty(constants::env::HOST))
            .or(external.server.host)
            .unwrap_or_else(|| constants::DEFAULT_HOST.into());

        let api_key = env_non_empty(constants::env::API_KEY);
        let key_state = if api_key.is_some() { "设置" } else { "缺失" };
        debug!("密钥 {} 已{}", constants::env::API_KEY, key_state);

        let base_url = args
            .base_url
            .clone()
            .or_else(|| env_non_empty(constants::env::BASE_URL))
            .or(external.network.base_url)
            .unwrap_or_else(|| constants::DEFAULT_BASE_URL.into());
        let base_url = base_url.trim_end_matches('/').to_string();
        url::Url::parse(&base_url)
            .map_err(|e| AppError::Config(format!("无效的基础地址 '{}': {}", base_url, e)))?;

        let resolutions = external
            .server
            .resolutions
            .filter(|list| !list.is_empty())
            .unwrap_or_else(|| {
                constants::DEFAULT_RESOLUTIONS
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            });

        Ok(Self {
            server: ServerConfig {
                host,
                port,
                api_key,
                download_url_template: external
                    .server
                    .download_url_template
                    .unwrap_or_else(|| constants::DOWNLOAD_URL_TEMPLATE.into()),
                resolutions,
            },
            client: ClientConfig {
                base_url,
                user_agent: constants::USER_AGENT.into(),
                connect_timeout: Duration::from_secs(
                    external.network.connect_timeout_secs.unwrap_or(10),
                ),
                timeout: Duration::from_secs(external.network.timeout_secs.unwrap_or(60)),
                max_retries: external.network.max_retries.unwrap_or(2),
                open_browser: !args.no_browser,
            },
        })
    }
}

#[cfg(any(test, feature = "testing"))]
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                api_key: None,
                download_url_template: constants::DOWNLOAD_URL_TEMPLATE.to_string(),
                resolutions: constants::DEFAULT_RESOLUTIONS.iter().map(|s| s.to_string()).collect(),
            },
            client: ClientConfig {
                base_url: constants::DEFAULT_BASE_URL.to_string(),
                user_agent: "test-agent/1.0".to_string(),
                connect_timeout: Duration::from_secs(5),
                timeout: Duration::from_secs(15),
                max_retries: 0,
                open_browser: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let args = Cli::parse_from(["you2-mp4", "--serve"]);
        let config =
            AppConfig::from_sources(ExternalConfig::default(), env_from(&[]), &args).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.server.api_key.is_none());
        assert_eq!(config.server.resolutions, vec!["1080p", "720p", "480p", "360p"]);
        assert_eq!(config.client.base_url, "http://127.0.0.1:3000");
        assert!(config.client.open_browser);
    }

    #[test]
    fn test_priority_cli_over_env_over_file() {
        let mut external = ExternalConfig::default_app_config();
        external.server.port = Some(4000);
        external.network.base_url = Some("http://file.example".into());

        // 只有文件
        let args = Cli::parse_from(["you2-mp4", "--serve"]);
        let config = AppConfig::from_sources(external.clone(), env_from(&[]), &args).unwrap();
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.client.base_url, "http://file.example");

        // 环境变量覆盖文件
        let env = env_from(&[("PORT", "5000"), ("YOU2MP4_BASE_URL", "http://env.example/")]);
        let config = AppConfig::from_sources(external.clone(), env, &args).unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.client.base_url, "http://env.example");

        // 命令行覆盖环境变量
        let args = Cli::parse_from([
            "you2-mp4",
            "--serve",
            "--port",
            "6000",
            "--base-url",
            "http://cli.example",
        ]);
        let env = env_from(&[("PORT", "5000"), ("YOU2MP4_BASE_URL", "http://env.example")]);
        let config = AppConfig::from_sources(external, env, &args).unwrap();
        assert_eq!(config.server.port, 6000);
        assert_eq!(config.client.base_url, "http://cli.example");
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let args = Cli::parse_from(["you2-mp4", "--serve"]);
        let env = env_from(&[("PORT", "abc")]);
        let result = AppConfig::from_sources(ExternalConfig::default(), env, &args);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_api_key_is_read_but_not_printed() {
        let args = Cli::parse_from(["you2-mp4", "--serve"]);
        let env = env_from(&[("YOUTUBE_API_KEY", "super-secret")]);
        let config = AppConfig::from_sources(ExternalConfig::default(), env, &args).unwrap();
        assert_eq!(config.server.api_key.as_deref(), Some("super-secret"));
        assert!(!format!("{:?}", config).contains("super-secret"));
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let args = Cli::parse_from(["you2-mp4", "--serve", "--base-url", "not a url"]);
        let result = AppConfig::from_sources(ExternalConfig::default(), env_from(&[]), &args);
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
