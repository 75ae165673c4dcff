//! Appdock library - headless core for AppImage install management.
//!
//! This crate provides the launcher registry: the install/edit/delete state
//! machine over the per-user application-launcher directory. Installing an
//! application copies the AppImage payload and an icon into a target
//! directory and writes a freedesktop `.desktop` descriptor; the registry
//! derives its entire record set from those descriptor files. It can be used
//! programmatically without any RPC layer.
//!
//! # Example
//!
//! ```rust,ignore
//! use appdock_library::{InstallRequest, LauncherRegistry};
//!
//! fn main() -> appdock_library::Result<()> {
//!     let registry = LauncherRegistry::new()?;
//!
//!     registry.install(&InstallRequest {
//!         name: "MyApp".into(),
//!         source_executable: "/tmp/src.AppImage".into(),
//!         source_icon: "/tmp/icon.png".into(),
//!         target_dir: "/home/u/App".into(),
//!     })?;
//!
//!     for app in registry.list() {
//!         println!("{} -> {}", app.name, app.descriptor_path.display());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod icon_cache;
pub mod platform;
pub mod registry;

// Re-export commonly used types
pub use error::{AppdockError, Result};
pub use icon_cache::{IconCache, KNOWN_ICONS};
pub use registry::{
    AppListing, DesktopEntry, DesktopEntryBuilder, InstallRequest, InstalledApp,
    LauncherRegistry, ParsedEntry,
};
