// src/controller.rs

use crate::{
    client::RobustClient,
    constants::{api, messages},
    error::AppResult,
    models::{DownloadRequest, DownloadResult, HistoryEntry, ResolutionList, ResolutionsRequest},
    share, utils,
};
use async_trait::async_trait;
use log::{debug, error, info};
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use tokio::sync::Mutex as TokioMutex;

/// 页面的抽象：控制器只通过它改变可见状态
pub trait View: Send {
    fn set_message(&mut self, message: &str);
    fn set_preview_source(&mut self, source: &str);
    fn set_preview_visible(&mut self, visible: bool);
    fn append_history(&mut self, entry: HistoryEntry);
    fn show_history(&mut self);
    /// 用新列表替换清晰度选项，保持给定顺序
    fn replace_resolutions(&mut self, resolutions: &[String]);
    /// 在新的浏览上下文中打开目标，空目标不做任何事
    fn open_target(&mut self, target: &str);
}

#[async_trait]
pub trait DownloadService: Send + Sync {
    async fn download(&self, request: &DownloadRequest) -> AppResult<DownloadResult>;
    async fn get_resolutions(&self, url: &str) -> AppResult<ResolutionList>;
}

/// 通过同一个基础地址访问 `/download` 与 `/get_resolutions`
pub struct RemoteService {
    client: RobustClient,
}

impl RemoteService {
    pub fn new(client: RobustClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DownloadService for RemoteService {
    async fn download(&self, request: &DownloadRequest) -> AppResult<DownloadResult> {
        self.client.post_json_once(api::DOWNLOAD, request).await
    }

    async fn get_resolutions(&self, url: &str) -> AppResult<ResolutionList> {
        let body = ResolutionsRequest { url: url.to_string() };
        self.client.post_json(api::GET_RESOLUTIONS, &body).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Ready { preview: String, file: String },
    Rejected(String),
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Skipped,
    Applied(usize),
    Stale,
    Failed,
}

pub struct Controller<S, V> {
    service: Arc<S>,
    view: Arc<TokioMutex<V>>,
    generation: AtomicU64,
}

impl<S: DownloadService, V: View> Controller<S, V> {
    pub fn new(service: Arc<S>, view: Arc<TokioMutex<V>>) -> Self {
        Self {
            service,
            view,
            generation: AtomicU64::new(0),
        }
    }

    pub fn view(&self) -> Arc<TokioMutex<V>> {
        self.view.clone()
    }

    pub async fn submit_download(&self, url: &str, resolution: &str) -> SubmitOutcome {
        if !utils::is_valid_video_url(url) {
            info!("拒绝提交不可识别的链接: '{}'", url);
            self.view.lock().await.set_message(messages::INVALID_URL);
            return SubmitOutcome::Rejected(messages::INVALID_URL.to_string());
        }

        {
            let mut view = self.view.lock().await;
            view.set_message(messages::PROCESSING);
            view.set_preview_visible(false);
        }

        let request = DownloadRequest {
            url: url.to_string(),
            resolution: resolution.to_string(),
        };
        let result = self.service.download(&request).await;

        let mut view = self.view.lock().await;
        match result {
            Ok(data) if data.is_success() => {
                let preview = data.preview.unwrap_or_default();
                let file = data.file.unwrap_or_default();
                info!("下载就绪: {} ({})", file, resolution);
                view.set_message(messages::DOWNLOAD_READY);
                view.set_preview_source(&preview);
                view.set_preview_visible(true);
                view.append_history(HistoryEntry::new(file.clone(), resolution));
                view.show_history();
                SubmitOutcome::Ready { preview, file }
            }
            Ok(data) => {
                let message = data.message.unwrap_or_default();
                info!("远程服务返回状态 '{}': {}", data.status, message);
                view.set_message(&message);
                SubmitOutcome::Rejected(message)
            }
            Err(e) => {
                error!("提交下载请求失败: {}", e);
                view.set_message(messages::GENERIC_ERROR);
                SubmitOutcome::Failed
            }
        }
    }

    /// 每次调用都会作废之前尚未返回的请求，只有最新一代的响应会写入视图
    pub async fn refresh_resolutions(&self, url: &str) -> RefreshOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if url.is_empty() {
            return RefreshOutcome::Skipped;
        }

        let result = self.service.get_resolutions(url).await;

        // 持锁检查代数，保证检查与写入之间不会插入更新的请求
        let mut view = self.view.lock().await;
        match result {
            Ok(list) => {
                if self.generation.load(Ordering::SeqCst) != generation {
                    debug!("丢弃过期的清晰度响应 (第 {} 代)", generation);
                    return RefreshOutcome::Stale;
                }
                view.replace_resolutions(&list.resolutions);
                RefreshOutcome::Applied(list.resolutions.len())
            }
            Err(e) => {
                error!("获取清晰度列表失败: {}", e);
                RefreshOutcome::Failed
            }
        }
    }

    pub async fn share_on_social_media(&self, platform: &str, url: &str) -> String {
        let target = share::share_url(platform, url);
        if target.is_empty() {
            debug!("未知的分享平台 '{}'", platform);
        }
        self.view.lock().await.open_target(&target);
        target
    }
}

/// 记录所有变化的内存视图
#[cfg(any(test, feature = "testing"))]
#[derive(Debug, Default, Clone)]
pub struct MemoryView {
    pub message: Option<String>,
    pub preview_source: Option<String>,
    pub preview_visible: bool,
    pub history: Vec<HistoryEntry>,
    pub history_visible: bool,
    pub resolutions: Vec<String>,
    pub opened: Vec<String>,
}

#[cfg(any(test, feature = "testing"))]
impl View for MemoryView {
    fn set_message(&mut self, message: &str) {
        self.message = Some(message.to_string());
    }

    fn set_preview_source(&mut self, source: &str) {
        self.preview_source = Some(source.to_string());
    }

    fn set_preview_visible(&mut self, visible: bool) {
        self.preview_visible = visible;
    }

    fn append_history(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
    }

    fn show_history(&mut self) {
        self.history_visible = true;
    }

    fn replace_resolutions(&mut self, resolutions: &[String]) {
        self.resolutions = resolutions.to_vec();
    }

    fn open_target(&mut self, target: &str) {
        self.opened.push(target.to_string());
    }
}
