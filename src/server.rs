// src/server.rs

use crate::{
    config::ServerConfig,
    constants::{self, api, messages},
    error::{AppError, AppResult},
    models::{
        ConvertRequest, ConvertResponse, DownloadResult, FailureResponse, ResolutionList,
        ServerDownloadRequest, VideoInfoResponse,
    },
    symbols, utils,
};
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Request, State, rejection::JsonRejection},
    http::{HeaderValue, Method, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::post,
};
use futures::FutureExt;
use log::{debug, error, info, warn};
use serde::de::DeserializeOwned;
use std::{any::Any, future::Future, panic::AssertUnwindSafe, sync::Arc};
use tokio::{net::TcpListener, signal};

#[derive(Clone)]
struct AppState {
    config: Arc<ServerConfig>,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: messages::NOT_FOUND.into(),
        }
    }

    fn payload_too_large() -> Self {
        Self {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: messages::PAYLOAD_TOO_LARGE.into(),
        }
    }

    fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: messages::INTERNAL_ERROR.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

/// 构建全部路由与中间件
pub fn router(config: ServerConfig) -> Router {
    let state = AppState {
        config: Arc::new(config),
    };

    Router::new()
        .route(api::CONVERT, post(convert))
        .route(api::DOWNLOAD, post(download))
        .route(api::GET_RESOLUTIONS, post(get_resolutions))
        .route(api::VIDEO_INFO, post(video_info))
        .fallback(fallback)
        .with_state(state)
        .layer(DefaultBodyLimit::max(constants::MAX_BODY_BYTES))
        .layer(middleware::from_fn(catch_panic))
        .layer(middleware::from_fn(log_request))
        .layer(middleware::from_fn(cors))
}

/// 绑定配置中的地址并一直运行，直到收到 Ctrl+C
pub async fn serve(config: ServerConfig) -> AppResult<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        error!("绑定地址 {} 失败: {}", addr, e);
        AppError::Io(e)
    })?;
    let local_addr = listener.local_addr()?;
    info!("胶水服务器正在监听 http://{}", local_addr);
    println!(
        "{} 服务器正在监听 http://{} (按 {} 退出)",
        *symbols::LISTEN,
        local_addr,
        *symbols::CTRL_C
    );

    serve_with_shutdown(listener, config, shutdown_signal()).await
}

pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    config: ServerConfig,
    shutdown: F,
) -> AppResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(config))
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("胶水服务器已停止");
    Ok(())
}

async fn shutdown_signal() {
    // 只影响优雅退出，不向上传播
    if let Err(err) = signal::ctrl_c().await {
        warn!("无法安装 Ctrl+C 处理器: {}", err);
    }
}

/// 取出请求体；缺失或无法解析时视为没有 url，超过大小上限时返回 413
fn read_payload<T: DeserializeOwned + Default>(
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(JsonRejection::BytesRejection(rejection))
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE =>
        {
            warn!("请求体超过 {} 字节上限", constants::MAX_BODY_BYTES);
            Err(ApiError::payload_too_large())
        }
        Err(rejection) => {
            debug!("请求体无法解析: {}", rejection);
            Ok(T::default())
        }
    }
}

fn download_url_for(config: &ServerConfig, video_id: &str) -> String {
    utils::render_template(&config.download_url_template, &[("video_id", video_id)])
}

async fn convert(
    State(state): State<AppState>,
    payload: Result<Json<ConvertRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let request: ConvertRequest = read_payload(payload)?;
    let Some(url) = request.url.filter(|u| utils::is_valid_video_url(u)) else {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(FailureResponse {
                success: false,
                message: messages::INVALID_URL.into(),
            }),
        )
            .into_response());
    };

    let video_id = utils::extract_video_id(&url);
    let download_url = download_url_for(&state.config, &video_id);
    info!("转换 '{}' -> {}", url, download_url);

    Ok(Json(ConvertResponse {
        success: true,
        download_url,
        video_id,
    })
    .into_response())
}

async fn download(
    State(state): State<AppState>,
    payload: Result<Json<ServerDownloadRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let request: ServerDownloadRequest = read_payload(payload)?;
    let failure = |message: String| {
        (
            StatusCode::BAD_REQUEST,
            Json(DownloadResult {
                status: api::STATUS_ERROR.into(),
                preview: None,
                file: None,
                message: Some(message),
            }),
        )
            .into_response()
    };

    let Some(url) = request.url.filter(|u| utils::is_valid_video_url(u)) else {
        return Ok(failure(messages::INVALID_URL.into()));
    };
    let resolution = request
        .resolution
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| constants::DEFAULT_RESOLUTION.into());
    if !state.config.resolutions.contains(&resolution) {
        return Ok(failure(format!("No {} version available", resolution)));
    }

    let video_id = utils::extract_video_id(&url);
    let file = download_url_for(&state.config, &video_id);
    info!("下载请求 '{}' ({}) -> {}", url, resolution, file);

    Ok(Json(DownloadResult {
        status: api::STATUS_SUCCESS.into(),
        preview: Some(file.clone()),
        file: Some(file),
        message: None,
    })
    .into_response())
}

async fn get_resolutions(
    State(state): State<AppState>,
    payload: Result<Json<ConvertRequest>, JsonRejection>,
) -> Result<Json<ResolutionList>, ApiError> {
    let request: ConvertRequest = read_payload(payload)?;
    match request.url {
        Some(url) if utils::is_valid_video_url(&url) => Ok(Json(ResolutionList {
            resolutions: state.config.resolutions.clone(),
        })),
        _ => Err(ApiError::bad_request(messages::INVALID_URL)),
    }
}

async fn video_info(
    payload: Result<Json<ConvertRequest>, JsonRejection>,
) -> Result<Json<VideoInfoResponse>, ApiError> {
    let request: ConvertRequest = read_payload(payload)?;
    let url = request
        .url
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::bad_request(messages::NO_URL))?;
    let video_id = utils::parse_video_id(&url)
        .ok_or_else(|| ApiError::bad_request(messages::INVALID_YOUTUBE_URL))?;
    Ok(Json(VideoInfoResponse { video_id }))
}

async fn fallback() -> ApiError {
    ApiError::not_found()
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// 处理器中的 panic 转换为 500，进程继续服务
async fn catch_panic(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    match AssertUnwindSafe(next.run(req)).catch_unwind().await {
        Ok(response) => response,
        Err(panic) => {
            error!("处理 {} 时发生 panic: {}", path, panic_message(panic.as_ref()));
            ApiError::internal().into_response()
        }
    }
}

async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let response = next.run(req).await;
    info!("{} {} -> {}", method, path, response.status().as_u16());
    response
}

async fn cors(req: Request, next: Next) -> Response {
    let mut response = if req.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(req).await
    };
    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("content-type"),
    );
    response
}
