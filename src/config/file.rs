// src/config/file.rs

use crate::{
    config::ExternalConfig, // 只需要从父模块导入结构体定义
    constants,
    error::{AppError, AppResult},
};
use anyhow::{Context, anyhow};
use log::{info, warn};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub fn config_dir() -> AppResult<PathBuf> {
    let dir = dirs::home_dir()
        .ok_or_else(|| AppError::Other(anyhow!("无法获取用户主目录")))?
        .join(constants::CONFIG_DIR_NAME);
    Ok(dir)
}

pub(super) fn get_config_path() -> AppResult<PathBuf> {
    Ok(config_dir()?.join(constants::CONFIG_FILE_NAME))
}

pub(crate) fn load_or_create_external_config() -> AppResult<ExternalConfig> {
    let config_path = get_config_path()?;
    load_or_create_at(&config_path)
}

pub fn load_or_create_at(config_path: &Path) -> AppResult<ExternalConfig> {
    if config_path.is_file() {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("读取配置文件 '{}' 失败", config_path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("解析配置文件 '{}' 失败", config_path.display()))
            .map_err(AppError::from)
    } else {
        info!("配置文件 {:?} 不存在，将创建默认配置。", config_path);
        let config = ExternalConfig::default_app_config();

        // 写入失败不影响运行，默认配置仍然可用
        if let Err(e) = write_config(config_path, &config) {
            warn!("无法写入默认配置文件 {:?}: {}", config_path, e);
        }
        Ok(config)
    }
}

fn write_config(config_path: &Path, config: &ExternalConfig) -> AppResult<()> {
    if let Some(dir) = config_path.parent() {
        fs::create_dir_all(dir)?;
    }
    let json_content = serde_json::to_string_pretty(config)?;
    fs::write(config_path, json_content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_default_config_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(constants::CONFIG_FILE_NAME);

        let config = load_or_create_at(&path).unwrap();
        assert!(path.is_file());
        assert_eq!(config.server.port, Some(constants::DEFAULT_PORT));

        // 第二次读取的是刚写入的文件
        let reloaded = load_or_create_at(&path).unwrap();
        assert_eq!(reloaded.network.base_url, config.network.base_url);
    }

    #[test]
    fn test_partial_file_uses_serde_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(constants::CONFIG_FILE_NAME);
        fs::write(&path, r#"{"server": {"port": 8080}}"#).unwrap();

        let config = load_or_create_at(&path).unwrap();
        assert_eq!(config.server.port, Some(8080));
        assert!(config.network.base_url.is_none());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(constants::CONFIG_FILE_NAME);
        fs::write(&path, "{ not json").unwrap();

        assert!(load_or_create_at(&path).is_err());
    }
}
