//! Centralized configuration for Appdock.
//!
//! This module provides configuration constants for file naming, well-known
//! directories, and network operations.

use std::time::Duration;

/// Application-level configuration.
pub struct AppConfig;

impl AppConfig {
    pub const APP_NAME: &'static str = "Appdock";
    /// Directory name under the platform data dir for Appdock's own files.
    pub const APP_DATA_DIR_NAME: &'static str = "appdock";
}

/// Shared directory and file-naming configuration.
pub struct PathsConfig;

impl PathsConfig {
    /// Extension of launcher descriptor files.
    pub const DESCRIPTOR_EXTENSION: &'static str = "desktop";
    /// Extension given to installed payloads.
    pub const APPIMAGE_EXTENSION: &'static str = "AppImage";
    /// Default install directory under the user's home.
    pub const DEFAULT_INSTALL_DIR_NAME: &'static str = "App";
    /// Icon cache directory name under the app data dir.
    pub const ICONS_DIR_NAME: &'static str = "icons";
}

/// Descriptor content configuration.
pub struct DescriptorConfig;

impl DescriptorConfig {
    /// `Type=` marker written into every descriptor.
    pub const ENTRY_TYPE: &'static str = "Application";
    /// `Categories=` marker written into every descriptor.
    pub const CATEGORY: &'static str = "Development";
}

/// Network-related configuration (icon prefetch).
pub struct NetworkConfig;

impl NetworkConfig {
    pub const FETCH_TIMEOUT: Duration = Duration::from_secs(15);
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);
}
