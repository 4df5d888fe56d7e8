// src/workflows.rs

use crate::{
    client::RobustClient,
    config::AppConfig,
    constants,
    controller::{Controller, RefreshOutcome, RemoteService, SubmitOutcome},
    error::{AppError, AppResult},
    share::SharePlatform,
    symbols, ui,
    ui::TerminalView,
    utils,
};
use anyhow::anyhow;
use colored::*;
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::Mutex as TokioMutex;

pub type TerminalController = Controller<RemoteService, TerminalView>;

pub fn build_controller(config: &AppConfig) -> AppResult<TerminalController> {
    let client = RobustClient::new(&config.client)?;
    debug!("客户端基础地址: {}", config.client.base_url);
    Ok(Controller::new(
        Arc::new(RemoteService::new(client)),
        Arc::new(TokioMutex::new(TerminalView::new(config.client.open_browser))),
    ))
}

fn outcome_to_result(outcome: SubmitOutcome) -> AppResult<()> {
    match outcome {
        SubmitOutcome::Ready { .. } => Ok(()),
        SubmitOutcome::Rejected(message) => Err(AppError::InvalidInput(message)),
        SubmitOutcome::Failed => Err(AppError::Other(anyhow!(constants::messages::GENERIC_ERROR))),
    }
}

/// 运行单链接模式（处理 --url）
pub(crate) async fn run_single(config: &AppConfig, url: &str, resolution: &str) -> AppResult<()> {
    let controller = build_controller(config)?;
    ui::print_header("提交视频链接");
    println!("{} 链接: {} | 清晰度: {}", *symbols::INFO, url, resolution.cyan());
    let outcome = controller.submit_download(url, resolution).await;
    outcome_to_result(outcome)
}

/// 运行分享模式（处理 --share）
pub(crate) async fn run_share(
    config: &AppConfig,
    platform: &str,
    url: Option<&str>,
) -> AppResult<()> {
    let controller = build_controller(config)?;
    let target_url = url.unwrap_or(config.client.base_url.as_str());
    let share_url = controller.share_on_social_media(platform, target_url).await;
    if share_url.is_empty() {
        warn!("未知的分享平台 '{}'，忽略", platform);
        let known = SharePlatform::ALL.map(|p| p.tag()).join(", ");
        println!("{} 未知的分享平台 '{}'。可选: {}", *symbols::WARN, platform, known);
    }
    Ok(())
}

/// 运行交互模式
pub(crate) async fn run_interactive(config: &AppConfig) -> AppResult<()> {
    let controller = build_controller(config)?;
    ui::print_header("交互模式");
    println!(
        "在此模式下，你可以逐一输入视频链接。直接按回车或 {} 可随时退出。",
        *symbols::CTRL_C
    );

    loop {
        let url = match ui::prompt("请输入视频链接", None) {
            Ok(input) if !input.is_empty() => input,
            Ok(_) => break,
            Err(_) => return Err(AppError::UserInterrupt),
        };

        let resolution = pick_resolution(&controller, &url).await;
        ui::print_sub_header(&utils::truncate_text(&url, constants::URL_TRUNCATE_LENGTH));
        let outcome = controller.submit_download(&url, &resolution).await;

        match outcome {
            SubmitOutcome::Ready { file, .. } => {
                if ui::confirm("是否分享该下载链接", false) {
                    share_interactively(&controller, &file).await;
                }
            }
            SubmitOutcome::Rejected(message) => {
                info!("交互模式任务 '{}' 被拒绝: {}", url, message);
            }
            SubmitOutcome::Failed => {
                log::error!("交互模式任务 '{}' 失败", url);
            }
        }
    }

    controller.view().lock().await.print_history();
    println!("\n{} 退出交互模式。", *symbols::INFO);
    Ok(())
}

async fn pick_resolution(controller: &TerminalController, url: &str) -> String {
    match controller.refresh_resolutions(url).await {
        RefreshOutcome::Applied(_) => {}
        other => debug!("清晰度列表未更新: {:?}", other),
    }
    let options = controller.view().lock().await.resolutions().to_vec();
    if options.is_empty() {
        println!(
            "{} 无法获取清晰度列表，使用默认值 {}",
            *symbols::WARN,
            constants::DEFAULT_RESOLUTION
        );
        return constants::DEFAULT_RESOLUTION.to_string();
    }
    let default_index = options
        .iter()
        .position(|r| r == constants::DEFAULT_RESOLUTION)
        .unwrap_or(0);
    ui::choose_one(&options, "请选择清晰度", default_index).unwrap_or_else(|| {
        println!("{} 无效的选择，使用 {}", *symbols::WARN, options[default_index]);
        options[default_index].clone()
    })
}

async fn share_interactively(controller: &TerminalController, file: &str) {
    let platforms: Vec<String> = SharePlatform::ALL.iter().map(|p| p.tag().to_string()).collect();
    if let Some(platform) = ui::choose_one(&platforms, "选择分享平台", 0) {
        controller.share_on_social_media(&platform, file).await;
    } else {
        println!("\n{} 无效的选择，已取消分享。", *symbols::ERROR);
    }
}
