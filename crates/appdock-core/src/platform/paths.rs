//! Platform-specific path utilities.
//!
//! This module provides functions to get the well-known directories used by
//! the launcher registry:
//! - Application menu/launcher descriptor directory
//! - Default installation directory for AppImage payloads
//! - Icon cache storage location

use crate::config::{AppConfig, PathsConfig};
use crate::error::{AppdockError, Result};
use std::path::PathBuf;

/// Get the per-user application-launcher directory.
///
/// # Platform Behavior
/// - **Linux**: `~/.local/share/applications` (XDG spec)
/// - Other platforms are unsupported: AppImage payloads only exist on Linux.
pub fn apps_dir() -> Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        let home = dirs::home_dir().ok_or_else(|| AppdockError::Config {
            message: "Could not determine home directory".to_string(),
        })?;
        Ok(home.join(".local").join("share").join("applications"))
    }

    #[cfg(not(target_os = "linux"))]
    {
        Err(AppdockError::Config {
            message: "Unsupported platform for launcher descriptors".to_string(),
        })
    }
}

/// Get the default installation directory for AppImage payloads (`~/App`).
pub fn default_install_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| AppdockError::Config {
        message: "Could not determine home directory".to_string(),
    })?;
    Ok(home.join(PathsConfig::DEFAULT_INSTALL_DIR_NAME))
}

/// Get the icon cache directory (`~/.local/share/appdock/icons` on Linux).
pub fn icon_cache_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().ok_or_else(|| AppdockError::Config {
        message: "Could not determine platform data directory".to_string(),
    })?;
    Ok(data_dir
        .join(AppConfig::APP_DATA_DIR_NAME)
        .join(PathsConfig::ICONS_DIR_NAME))
}

/// Get the file extension for launcher descriptors.
pub fn descriptor_extension() -> &'static str {
    PathsConfig::DESCRIPTOR_EXTENSION
}
