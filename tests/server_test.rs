// tests/server_test.rs

use serde_json::{Value, json};
use tokio::net::TcpListener;
use you2_mp4::{config::AppConfig, server};

// 辅助函数：在随机端口上启动胶水服务器，返回基础地址
async fn spawn_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let config = AppConfig::default().server;
    tokio::spawn(server::serve_with_shutdown(listener, config, std::future::pending()));
    format!("http://{}", addr)
}

async fn post(base: &str, path: &str, body: Value) -> (u16, Value) {
    let res = reqwest::Client::new()
        .post(format!("{}{}", base, path))
        .json(&body)
        .send()
        .await
        .expect("request should reach the test server");
    let status = res.status().as_u16();
    (status, res.json().await.expect("response should be JSON"))
}

// --- POST /convert ---

#[tokio::test]
async fn test_convert_watch_url_extracts_video_id() {
    let base = spawn_server().await;
    let (status, body) = post(
        &base,
        "/convert",
        json!({"url": "https://www.youtube.com/watch?v=abc123"}),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["videoId"], "abc123");
    assert!(body["downloadUrl"].as_str().unwrap().ends_with("/abc123.mp4"));
}

#[tokio::test]
async fn test_convert_short_link_uses_last_path_segment() {
    let base = spawn_server().await;
    let (status, body) = post(&base, "/convert", json!({"url": "https://youtu.be/xyz789"})).await;

    assert_eq!(status, 200);
    assert_eq!(body["videoId"], "xyz789");
    assert_eq!(body["downloadUrl"], "https://youtube.com/download/xyz789.mp4");
}

#[tokio::test]
async fn test_convert_accepts_every_recognized_host_shape() {
    let base = spawn_server().await;
    let accepted = [
        "youtube.com/watch?v=a1",
        "http://youtube.com/watch?v=a2",
        "https://www.youtu.be/a3",
        "https://www.youtube-nocookie.com/embed/a4",
        "https://music.youtube.com/watch?v=a5",
    ];
    for url in accepted {
        let (status, body) = post(&base, "/convert", json!({ "url": url })).await;
        assert_eq!(status, 200, "'{}' should be accepted", url);
        assert_eq!(body["success"], true);
    }
}

#[tokio::test]
async fn test_convert_rejects_unrecognized_urls() {
    let base = spawn_server().await;
    let rejected = [
        json!({"url": ""}),
        json!({"url": "https://example.com/watch?v=abc"}),
        json!({"url": "https://www.youtube.com/"}),
        json!({"url": 42}),
        json!({}),
    ];
    for payload in rejected {
        let (status, body) = post(&base, "/convert", payload.clone()).await;
        assert_eq!(status, 400, "{} should be rejected", payload);
        assert_eq!(body, json!({"success": false, "message": "Invalid URL"}));
    }
}

#[tokio::test]
async fn test_convert_without_json_body_is_invalid_input() {
    let base = spawn_server().await;
    let res = reqwest::Client::new()
        .post(format!("{}/convert", base))
        .body("url=https://youtu.be/xyz789")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_body_above_default_axum_limit_is_still_accepted() {
    let base = spawn_server().await;
    // 3 MiB，超过框架默认的 2 MB，但在 16 MiB 上限之内
    let padding = "x".repeat(3 * 1024 * 1024);
    let (status, body) = post(
        &base,
        "/convert",
        json!({"url": "https://youtu.be/xyz789", "padding": padding}),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["videoId"], "xyz789");
}

#[tokio::test]
async fn test_body_over_limit_is_413() {
    let base = spawn_server().await;
    let padding = "x".repeat(17 * 1024 * 1024);
    let (status, body) = post(
        &base,
        "/convert",
        json!({"url": "https://youtu.be/xyz789", "padding": padding}),
    )
    .await;

    assert_eq!(status, 413);
    assert_eq!(body["error"], "Request entity too large");
}

// --- 客户端约定接口 ---

#[tokio::test]
async fn test_download_endpoint_speaks_client_contract() {
    let base = spawn_server().await;
    let (status, body) = post(
        &base,
        "/download",
        json!({"url": "https://youtu.be/xyz789", "resolution": "480p"}),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "success");
    assert_eq!(body["file"], "https://youtube.com/download/xyz789.mp4");
    assert_eq!(body["preview"], body["file"]);

    let (status, body) = post(
        &base,
        "/download",
        json!({"url": "not a video", "resolution": "480p"}),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body, json!({"status": "error", "message": "Invalid URL"}));
}

#[tokio::test]
async fn test_download_rejects_unknown_resolution() {
    let base = spawn_server().await;
    let (status, body) = post(
        &base,
        "/download",
        json!({"url": "https://youtu.be/xyz789", "resolution": "8k"}),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["message"], "No 8k version available");
}

#[tokio::test]
async fn test_get_resolutions_keeps_configured_order() {
    let base = spawn_server().await;
    let (status, body) = post(
        &base,
        "/get_resolutions",
        json!({"url": "https://youtu.be/xyz789"}),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"resolutions": ["1080p", "720p", "480p", "360p"]}));

    let (status, body) = post(&base, "/get_resolutions", json!({"url": ""})).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Invalid URL");
}

// --- 补充接口 ---

#[tokio::test]
async fn test_video_info_uses_strict_parser() {
    let base = spawn_server().await;

    let (status, body) = post(
        &base,
        "/api/video-info",
        json!({"url": "https://www.youtube.com/embed/emb1"}),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"video_id": "emb1"}));

    let (status, body) = post(&base, "/api/video-info", json!({})).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "No URL provided");

    let (status, body) = post(
        &base,
        "/api/video-info",
        json!({"url": "https://m.youtube.com/watch?v=x"}),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Invalid YouTube URL");
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let base = spawn_server().await;
    let res = reqwest::get(format!("{}/nope", base)).await.unwrap();
    assert_eq!(res.status().as_u16(), 404);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"error": "Not found"}));
}

#[tokio::test]
async fn test_cors_preflight_and_headers() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let preflight = client
        .request(reqwest::Method::OPTIONS, format!("{}/convert", base))
        .send()
        .await
        .unwrap();
    assert_eq!(preflight.status().as_u16(), 204);
    assert_eq!(preflight.headers()["access-control-allow-origin"], "*");

    let res = client
        .post(format!("{}/convert", base))
        .json(&json!({"url": "https://youtu.be/xyz789"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
}
