//! Launcher registry: the install/edit/delete state machine over the
//! descriptor directory.
//!
//! The registry owns the record-relevant contents of the per-user
//! application-launcher directory. Every record is derived from a
//! `<name>.desktop` file; installing copies the AppImage payload and icon
//! into a target directory and writes the descriptor, updating rewrites the
//! trio (cleaning up the old one on rename), deleting removes it. The
//! directory is never locked against external writers.

mod desktop_entry;

pub use desktop_entry::{DesktopEntry, DesktopEntryBuilder, ParsedEntry};

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use crate::config::PathsConfig;
use crate::error::{AppdockError, Result};
use crate::platform;
use serde::Serialize;
use tracing::{debug, info, warn};

/// One row of `list()`: a display name and the descriptor that defines it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppListing {
    /// Display name, from the descriptor's `Name=` field.
    pub name: String,
    /// Path of the descriptor file; doubles as the record's identity.
    pub descriptor_path: PathBuf,
}

/// User-supplied input for install and update operations.
#[derive(Debug, Clone)]
pub struct InstallRequest {
    /// Display name; also derives the installed file names.
    pub name: String,
    /// Path of the AppImage to copy.
    pub source_executable: PathBuf,
    /// Path of the icon to copy (extension is preserved).
    pub source_icon: PathBuf,
    /// Directory the payload and icon are copied into.
    pub target_dir: PathBuf,
}

/// A fully-installed application record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstalledApp {
    /// Display name.
    pub name: String,
    /// Installed, executable copy of the AppImage payload.
    pub executable_path: PathBuf,
    /// Installed icon copy.
    pub icon_path: PathBuf,
    /// Descriptor file representing this record.
    pub descriptor_path: PathBuf,
}

/// Registry of installed applications, backed by the descriptor directory.
pub struct LauncherRegistry {
    /// Directory holding the `.desktop` descriptor files.
    apps_dir: PathBuf,
}

impl LauncherRegistry {
    /// Create a registry over the platform launcher directory
    /// (`~/.local/share/applications` on Linux).
    pub fn new() -> Result<Self> {
        Ok(Self {
            apps_dir: platform::apps_dir()?,
        })
    }

    /// Create a registry over an explicit descriptor directory.
    pub fn with_apps_dir(apps_dir: impl AsRef<Path>) -> Self {
        Self {
            apps_dir: apps_dir.as_ref().to_path_buf(),
        }
    }

    /// The descriptor directory this registry operates on.
    pub fn apps_dir(&self) -> &Path {
        &self.apps_dir
    }

    /// Descriptor path a given display name maps to.
    pub fn descriptor_path_for(&self, name: &str) -> PathBuf {
        self.apps_dir
            .join(format!("{}.{}", name, PathsConfig::DESCRIPTOR_EXTENSION))
    }

    /// Enumerate installed applications.
    ///
    /// Scans the descriptor directory for `.desktop` files and yields a
    /// `(name, descriptor path)` pair for each one that parses and carries a
    /// `Name=` field. Unreadable or truncated descriptors are skipped, never
    /// an error. Order is directory enumeration order; callers needing a
    /// deterministic order must sort.
    pub fn list(&self) -> Vec<AppListing> {
        let entries = match fs::read_dir(&self.apps_dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Descriptor directory not readable: {}", e);
                return Vec::new();
            }
        };

        let mut listings = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str())
                != Some(PathsConfig::DESCRIPTOR_EXTENSION)
            {
                continue;
            }

            let parsed = match ParsedEntry::parse_file(&path) {
                Ok(parsed) => parsed,
                Err(e) => {
                    debug!("Skipping unreadable descriptor {:?}: {}", path, e);
                    continue;
                }
            };

            match parsed.name() {
                Some(name) => listings.push(AppListing {
                    name: name.to_string(),
                    descriptor_path: path,
                }),
                None => debug!("Skipping descriptor without Name=: {:?}", path),
            }
        }

        listings
    }

    /// Install an application: copy the payload and icon into the target
    /// directory and write the launcher descriptor.
    ///
    /// Validation happens before any filesystem effect. Any I/O error aborts
    /// the operation with the underlying cause attached; a half-completed
    /// copy is left behind (no rollback).
    pub fn install(&self, request: &InstallRequest) -> Result<InstalledApp> {
        validate_request(request)?;

        let name = request.name.trim();

        fs::create_dir_all(&request.target_dir)
            .map_err(|e| AppdockError::io_with_path(e, &request.target_dir))?;

        // Payload copy, with the executable bit set
        let executable_path = request
            .target_dir
            .join(format!("{}.{}", name, PathsConfig::APPIMAGE_EXTENSION));
        copy_file(&request.source_executable, &executable_path)?;
        make_executable(&executable_path)?;

        // Icon copy, extension taken from the source
        let icon_file_name = match request.source_icon.extension() {
            Some(ext) => format!("{}.{}", name, ext.to_string_lossy()),
            None => name.to_string(),
        };
        let icon_path = request.target_dir.join(icon_file_name);
        copy_file(&request.source_icon, &icon_path)?;

        // Launcher descriptor
        let descriptor_path = self.descriptor_path_for(name);
        DesktopEntry::builder()
            .name(name)
            .exec(executable_path.to_string_lossy())
            .icon(icon_path.to_string_lossy())
            .build()
            .write_to_file(&descriptor_path)?;

        info!("Installed {} into {:?}", name, request.target_dir);

        Ok(InstalledApp {
            name: name.to_string(),
            executable_path,
            icon_path,
            descriptor_path,
        })
    }

    /// Update an existing record with new values, renaming it if the name
    /// changed.
    ///
    /// The old descriptor is parsed first, best-effort: if it is unreadable
    /// the operation degrades to a plain install. After the new trio is in
    /// place, a rename removes the old descriptor and the files it referenced,
    /// each step independently best-effort.
    pub fn update(
        &self,
        descriptor_path: &Path,
        request: &InstallRequest,
    ) -> Result<InstalledApp> {
        let old = match ParsedEntry::parse_file(descriptor_path) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!(
                    "Old descriptor {:?} not readable, updating as a fresh install: {}",
                    descriptor_path, e
                );
                None
            }
        };

        let installed = self.install(request)?;

        if installed.descriptor_path != descriptor_path {
            remove_stale_file(descriptor_path, "old descriptor");

            if let Some(old) = old {
                if let Some(exec) = old.exec() {
                    remove_stale_file(Path::new(exec), "old executable");
                }
                if let Some(icon) = old.icon() {
                    remove_stale_file(Path::new(icon), "old icon");
                }
            }
        }

        info!("Updated {} ({:?})", installed.name, installed.descriptor_path);

        Ok(installed)
    }

    /// Delete a record: remove the referenced executable and icon, then the
    /// descriptor itself.
    ///
    /// The executable and icon removals are each independently best-effort;
    /// a missing or locked file never stops the remaining steps. Only a
    /// failure to remove the descriptor itself (the record's identity)
    /// surfaces as the operation error.
    pub fn delete(&self, descriptor_path: &Path) -> Result<()> {
        match ParsedEntry::parse_file(descriptor_path) {
            Ok(parsed) => {
                if let Some(exec) = parsed.exec() {
                    remove_stale_file(Path::new(exec), "executable");
                }
                if let Some(icon) = parsed.icon() {
                    remove_stale_file(Path::new(icon), "icon");
                }
            }
            Err(e) => {
                debug!(
                    "Descriptor {:?} not parseable, skipping payload cleanup: {}",
                    descriptor_path, e
                );
            }
        }

        fs::remove_file(descriptor_path)
            .map_err(|e| AppdockError::io_with_path(e, descriptor_path))?;

        info!("Deleted record {:?}", descriptor_path);

        Ok(())
    }
}

/// Reject requests with empty fields or missing source files before any
/// filesystem effect.
fn validate_request(request: &InstallRequest) -> Result<()> {
    if request.name.trim().is_empty() {
        return Err(AppdockError::Validation {
            field: "name".to_string(),
            message: "must not be empty".to_string(),
        });
    }

    if !request.source_executable.is_file() {
        return Err(AppdockError::FileNotFound(
            request.source_executable.clone(),
        ));
    }

    if !request.source_icon.is_file() {
        return Err(AppdockError::FileNotFound(request.source_icon.clone()));
    }

    Ok(())
}

fn copy_file(source: &Path, dest: &Path) -> Result<()> {
    fs::copy(source, dest).map_err(|e| AppdockError::io_with_path(e, dest))?;
    debug!("Copied {:?} to {:?}", source, dest);
    Ok(())
}

fn make_executable(path: &Path) -> Result<()> {
    let metadata =
        fs::metadata(path).map_err(|e| AppdockError::io_with_path(e, path))?;

    let mut permissions = metadata.permissions();
    permissions.set_mode(0o755);

    fs::set_permissions(path, permissions)
        .map_err(|e| AppdockError::io_with_path(e, path))
}

/// Best-effort removal of a file another record version referenced. Missing
/// files count as already gone; real errors are logged, never surfaced.
fn remove_stale_file(path: &Path, what: &str) {
    if !path.exists() {
        return;
    }
    if let Err(e) = fs::remove_file(path) {
        debug!("Failed to remove {} {:?}: {}", what, path, e);
    } else {
        debug!("Removed {} {:?}", what, path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct TestEnv {
        _temp: TempDir,
        registry: LauncherRegistry,
        target_dir: PathBuf,
        source_executable: PathBuf,
        source_icon: PathBuf,
    }

    fn test_env() -> TestEnv {
        let temp = TempDir::new().unwrap();
        let apps_dir = temp.path().join("applications");
        let target_dir = temp.path().join("App");

        let source_executable = temp.path().join("src.AppImage");
        fs::write(&source_executable, b"ELF payload bytes").unwrap();
        let source_icon = temp.path().join("icon.png");
        fs::write(&source_icon, b"PNG icon bytes").unwrap();

        TestEnv {
            registry: LauncherRegistry::with_apps_dir(&apps_dir),
            _temp: temp,
            target_dir,
            source_executable,
            source_icon,
        }
    }

    fn request(env: &TestEnv, name: &str) -> InstallRequest {
        InstallRequest {
            name: name.to_string(),
            source_executable: env.source_executable.clone(),
            source_icon: env.source_icon.clone(),
            target_dir: env.target_dir.clone(),
        }
    }

    #[test]
    fn test_install_creates_trio() {
        let env = test_env();

        let app = env.registry.install(&request(&env, "MyApp")).unwrap();

        assert_eq!(app.executable_path, env.target_dir.join("MyApp.AppImage"));
        assert_eq!(app.icon_path, env.target_dir.join("MyApp.png"));
        assert_eq!(
            app.descriptor_path,
            env.registry.apps_dir().join("MyApp.desktop")
        );

        // Copies are byte-identical
        assert_eq!(
            fs::read(&app.executable_path).unwrap(),
            fs::read(&env.source_executable).unwrap()
        );
        assert_eq!(
            fs::read(&app.icon_path).unwrap(),
            fs::read(&env.source_icon).unwrap()
        );

        // Executable bit is set on the payload
        let mode = fs::metadata(&app.executable_path)
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o111, 0o111);

        // Descriptor references the installed copies
        let parsed = ParsedEntry::parse_file(&app.descriptor_path).unwrap();
        assert_eq!(parsed.name(), Some("MyApp"));
        assert_eq!(parsed.exec(), app.executable_path.to_str());
        assert_eq!(parsed.icon(), app.icon_path.to_str());
        assert_eq!(parsed.get("Type"), Some("Application"));
        assert_eq!(parsed.get("Categories"), Some("Development;"));
    }

    #[test]
    fn test_install_then_list_shows_one_entry() {
        let env = test_env();

        env.registry.install(&request(&env, "MyApp")).unwrap();

        let listings = env.registry.list();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].name, "MyApp");
        assert_eq!(
            listings[0].descriptor_path,
            env.registry.apps_dir().join("MyApp.desktop")
        );
    }

    #[test]
    fn test_install_is_idempotent_per_name() {
        let env = test_env();

        env.registry.install(&request(&env, "MyApp")).unwrap();
        env.registry.install(&request(&env, "MyApp")).unwrap();

        let listings = env.registry.list();
        assert_eq!(listings.len(), 1, "overwrite, not duplicate");
    }

    #[test]
    fn test_install_trims_name() {
        let env = test_env();

        let app = env.registry.install(&request(&env, "  MyApp  ")).unwrap();

        assert_eq!(app.name, "MyApp");
        assert!(env.registry.apps_dir().join("MyApp.desktop").exists());
    }

    #[test]
    fn test_install_rejects_empty_name_before_any_effect() {
        let env = test_env();

        let err = env.registry.install(&request(&env, "   ")).unwrap_err();
        assert!(matches!(err, AppdockError::Validation { .. }));

        assert!(!env.target_dir.exists(), "no filesystem effect on validation error");
    }

    #[test]
    fn test_install_missing_source_is_error() {
        let env = test_env();

        let mut req = request(&env, "MyApp");
        req.source_executable = env._temp.path().join("nope.AppImage");

        let err = env.registry.install(&req).unwrap_err();
        assert!(matches!(err, AppdockError::FileNotFound(_)));
    }

    #[test]
    fn test_icon_extension_preserved() {
        let env = test_env();

        let svg = env._temp.path().join("icon.svg");
        fs::write(&svg, b"<svg/>").unwrap();

        let mut req = request(&env, "VecApp");
        req.source_icon = svg;

        let app = env.registry.install(&req).unwrap();
        assert_eq!(app.icon_path, env.target_dir.join("VecApp.svg"));
    }

    #[test]
    fn test_list_skips_truncated_descriptor() {
        let env = test_env();

        env.registry.install(&request(&env, "GoodApp")).unwrap();

        // Truncated: no Name= line
        fs::write(
            env.registry.apps_dir().join("broken.desktop"),
            "[Desktop Entry]\nExec=/bin/x\n",
        )
        .unwrap();
        // Not a descriptor at all
        fs::write(env.registry.apps_dir().join("notes.txt"), "hi").unwrap();

        let listings = env.registry.list();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].name, "GoodApp");
    }

    #[test]
    fn test_list_missing_dir_is_empty() {
        let temp = TempDir::new().unwrap();
        let registry = LauncherRegistry::with_apps_dir(temp.path().join("nowhere"));

        assert!(registry.list().is_empty());
    }

    #[test]
    fn test_update_same_name_preserves_identity() {
        let env = test_env();

        let app = env.registry.install(&request(&env, "MyApp")).unwrap();

        fs::write(&env.source_executable, b"new payload bytes").unwrap();
        let updated = env
            .registry
            .update(&app.descriptor_path, &request(&env, "MyApp"))
            .unwrap();

        assert_eq!(updated.descriptor_path, app.descriptor_path);
        assert_eq!(
            fs::read(&updated.executable_path).unwrap(),
            b"new payload bytes"
        );
        assert_eq!(env.registry.list().len(), 1);
    }

    #[test]
    fn test_update_rename_replaces_old_trio() {
        let env = test_env();

        let old = env.registry.install(&request(&env, "OldName")).unwrap();

        let renamed = env
            .registry
            .update(&old.descriptor_path, &request(&env, "NewName"))
            .unwrap();

        assert!(!old.descriptor_path.exists());
        assert!(!old.executable_path.exists());
        assert!(!old.icon_path.exists());

        assert!(renamed.descriptor_path.exists());
        assert!(renamed.executable_path.exists());
        assert!(renamed.icon_path.exists());

        let listings = env.registry.list();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].name, "NewName");
    }

    #[test]
    fn test_update_unreadable_descriptor_degrades_to_install() {
        let env = test_env();

        let ghost = env.registry.apps_dir().join("Ghost.desktop");
        let app = env
            .registry
            .update(&ghost, &request(&env, "MyApp"))
            .unwrap();

        assert!(app.descriptor_path.exists());
        assert_eq!(env.registry.list().len(), 1);
    }

    #[test]
    fn test_delete_removes_trio() {
        let env = test_env();

        let app = env.registry.install(&request(&env, "MyApp")).unwrap();
        env.registry.delete(&app.descriptor_path).unwrap();

        assert!(!app.executable_path.exists());
        assert!(!app.icon_path.exists());
        assert!(!app.descriptor_path.exists());
        assert!(env.registry.list().is_empty());
    }

    #[test]
    fn test_delete_continues_past_missing_executable() {
        let env = test_env();

        let app = env.registry.install(&request(&env, "MyApp")).unwrap();

        // Simulate the payload being removed externally
        fs::remove_file(&app.executable_path).unwrap();

        env.registry.delete(&app.descriptor_path).unwrap();

        assert!(!app.icon_path.exists());
        assert!(!app.descriptor_path.exists());
    }

    #[test]
    fn test_delete_missing_descriptor_is_error() {
        let env = test_env();

        let err = env
            .registry
            .delete(&env.registry.apps_dir().join("nope.desktop"))
            .unwrap_err();

        assert!(matches!(err, AppdockError::Io { .. }));
    }

    #[test]
    fn test_delete_unparseable_descriptor_still_removed() {
        let env = test_env();
        fs::create_dir_all(env.registry.apps_dir()).unwrap();

        let path = env.registry.apps_dir().join("junk.desktop");
        fs::write(&path, b"\xff\xfe not utf8").unwrap();

        env.registry.delete(&path).unwrap();
        assert!(!path.exists());
    }
}
