//! Platform-specific utilities.
//!
//! Appdock targets Linux desktops (AppImage is a Linux packaging format);
//! the functions here resolve the well-known directories the registry and
//! icon cache operate on.

mod paths;

pub use paths::{
    apps_dir, default_install_dir, descriptor_extension, icon_cache_dir,
};
