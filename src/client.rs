// src/client.rs

use crate::{config::ClientConfig, error::*};
use log::debug;
use reqwest::Response;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::{Serialize, de::DeserializeOwned};

/// 指向单一基础地址的 JSON 客户端
#[derive(Clone)]
pub struct RobustClient {
    plain: reqwest::Client,
    retrying: ClientWithMiddleware,
    base_url: String,
}

impl RobustClient {
    pub fn new(config: &ClientConfig) -> AppResult<Self> {
        let plain = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()?;
        let retry_policy =
            ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let retrying = ClientBuilder::new(plain.clone())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            plain,
            retrying,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 只发送一次，失败即终止
    pub async fn post_json_once<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path);
        debug!("POST (单次) {}", url);
        let res = self.plain.post(&url).json(body).send().await?;
        Self::parse_body(url, res).await
    }

    /// 对瞬时错误按指数退避重试，只用于幂等的查询
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path);
        debug!("POST (可重试) {}", url);
        let res = self.retrying.post(&url).json(body).send().await?;
        Self::parse_body(url, res).await
    }

    // 远程约定把错误放在响应体里，因此不检查 HTTP 状态码
    async fn parse_body<T: DeserializeOwned>(url: String, res: Response) -> AppResult<T> {
        let status = res.status();
        let text = res.text().await?;
        debug!("{} 响应 {}: {}", url, status, text);
        serde_json::from_str(&text).map_err(|source| AppError::ApiParseFailed { url, source })
    }
}
