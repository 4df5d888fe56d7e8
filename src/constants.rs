// src/constants.rs

pub const UI_WIDTH: usize = 88;
pub const URL_TRUNCATE_LENGTH: usize = 70;
pub const CONFIG_DIR_NAME: &str = concat!(".", clap::crate_name!());
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const LOG_FILE_NAME: &str = concat!(clap::crate_name!(), ".log");
pub const LOG_FALLBACK_FILE_NAME: &str = "fallback.log";
pub const USER_AGENT: &str = concat!(clap::crate_name!(), "/", clap::crate_version!());

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_RESOLUTION: &str = "720p";
pub const DEFAULT_RESOLUTIONS: [&str; 4] = ["1080p", "720p", "480p", "360p"];
pub const DOWNLOAD_URL_TEMPLATE: &str = "https://youtube.com/download/{video_id}.mp4";
/// 16 MiB
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

pub mod env {
    pub const PORT: &str = "PORT";
    pub const HOST: &str = "HOST";
    pub const API_KEY: &str = "YOUTUBE_API_KEY";
    pub const BASE_URL: &str = "YOU2MP4_BASE_URL";
}

pub mod messages {
    pub const PROCESSING: &str = "Processing...";
    pub const DOWNLOAD_READY: &str = "Download ready!";
    pub const GENERIC_ERROR: &str = "An error occurred. Please try again.";
    pub const INVALID_URL: &str = "Invalid URL";
    pub const NO_URL: &str = "No URL provided";
    pub const INVALID_YOUTUBE_URL: &str = "Invalid YouTube URL";
    pub const NOT_FOUND: &str = "Not found";
    pub const INTERNAL_ERROR: &str = "Internal server error";
    pub const PAYLOAD_TOO_LARGE: &str = "Request entity too large";
}

pub mod api {
    pub const CONVERT: &str = "/convert";
    pub const DOWNLOAD: &str = "/download";
    pub const GET_RESOLUTIONS: &str = "/get_resolutions";
    pub const VIDEO_INFO: &str = "/api/video-info";
    pub const STATUS_SUCCESS: &str = "success";
    pub const STATUS_ERROR: &str = "error";
}
