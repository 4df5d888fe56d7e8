// src/models.rs

use serde::{Deserialize, Serialize};

// --- 客户端 <-> 远程下载服务 ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRequest {
    pub url: String,
    pub resolution: String,
}

/// 远程服务的响应，只检查 `status` 字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadResult {
    // 缺失时按非 success 处理
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl DownloadResult {
    pub fn is_success(&self) -> bool {
        self.status == crate::constants::api::STATUS_SUCCESS
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionsRequest {
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionList {
    pub resolutions: Vec<String>,
}

/// 会话内的下载历史条目，页面（视图）关闭即丢弃
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub file: String,
    pub label: String,
}

impl HistoryEntry {
    pub fn new(file: impl Into<String>, resolution: &str) -> Self {
        Self {
            file: file.into(),
            label: format!("Download ({})", resolution),
        }
    }
}

// --- 胶水服务端 ---

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConvertRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerDownloadRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertResponse {
    pub success: bool,
    pub download_url: String,
    pub video_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoInfoResponse {
    pub video_id: String,
}
