//! Desktop entry (.desktop file) generation and parsing.
//!
//! Implements the subset of the XDG Desktop Entry Specification the launcher
//! registry produces, plus the tolerant key/value parser shared by list,
//! update, and delete.

use std::collections::HashMap;
use std::fmt::Write as FmtWrite;
use std::fs;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use crate::config::DescriptorConfig;
use crate::error::{AppdockError, Result};
use tracing::debug;

/// A desktop entry representation.
#[derive(Debug, Clone)]
pub struct DesktopEntry {
    /// Entry name (shown in menus).
    pub name: String,
    /// Comment/description.
    pub comment: Option<String>,
    /// Executable command.
    pub exec: String,
    /// Icon name or path.
    pub icon: String,
    /// Whether to run in a terminal.
    pub terminal: bool,
    /// Entry type (usually "Application").
    pub entry_type: String,
    /// Categories (semicolon-separated).
    pub categories: Vec<String>,
}

impl Default for DesktopEntry {
    fn default() -> Self {
        Self {
            name: String::new(),
            comment: None,
            exec: String::new(),
            icon: String::new(),
            terminal: false,
            entry_type: DescriptorConfig::ENTRY_TYPE.to_string(),
            categories: vec![DescriptorConfig::CATEGORY.to_string()],
        }
    }
}

impl DesktopEntry {
    /// Create a new desktop entry builder.
    pub fn builder() -> DesktopEntryBuilder {
        DesktopEntryBuilder::new()
    }

    /// Generate the .desktop file content.
    pub fn to_contents(&self) -> String {
        let mut content = String::new();

        writeln!(content, "[Desktop Entry]").unwrap();
        writeln!(content, "Name={}", self.name).unwrap();

        if let Some(ref comment) = self.comment {
            writeln!(content, "Comment={}", comment).unwrap();
        }

        writeln!(content, "Exec={}", self.exec).unwrap();
        writeln!(content, "Icon={}", self.icon).unwrap();

        if self.terminal {
            writeln!(content, "Terminal=true").unwrap();
        }

        writeln!(content, "Type={}", self.entry_type).unwrap();

        if !self.categories.is_empty() {
            writeln!(content, "Categories={};", self.categories.join(";")).unwrap();
        }

        content
    }

    /// Write the desktop entry to a file.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| AppdockError::Io {
                message: "create directory".to_string(),
                path: Some(parent.to_path_buf()),
                source: Some(e),
            })?;
        }

        // Write content
        let content = self.to_contents();
        let mut file = fs::File::create(path).map_err(|e| AppdockError::Io {
            message: "create desktop file".to_string(),
            path: Some(path.to_path_buf()),
            source: Some(e),
        })?;

        file.write_all(content.as_bytes()).map_err(|e| AppdockError::Io {
            message: "write desktop file".to_string(),
            path: Some(path.to_path_buf()),
            source: Some(e),
        })?;

        // Make executable (required for desktop files to be trusted)
        let metadata = fs::metadata(path).map_err(|e| AppdockError::Io {
            message: "get file metadata".to_string(),
            path: Some(path.to_path_buf()),
            source: Some(e),
        })?;

        let mut permissions = metadata.permissions();
        permissions.set_mode(0o755);

        fs::set_permissions(path, permissions).map_err(|e| AppdockError::Io {
            message: "set permissions".to_string(),
            path: Some(path.to_path_buf()),
            source: Some(e),
        })?;

        debug!("Wrote desktop entry to {:?}", path);

        Ok(())
    }
}

/// Builder for desktop entries.
pub struct DesktopEntryBuilder {
    entry: DesktopEntry,
}

impl DesktopEntryBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            entry: DesktopEntry::default(),
        }
    }

    /// Set the entry name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.entry.name = name.into();
        self
    }

    /// Set the comment.
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.entry.comment = Some(comment.into());
        self
    }

    /// Set the executable command.
    pub fn exec(mut self, exec: impl Into<String>) -> Self {
        self.entry.exec = exec.into();
        self
    }

    /// Set the icon.
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.entry.icon = icon.into();
        self
    }

    /// Set whether to run in terminal.
    pub fn terminal(mut self, terminal: bool) -> Self {
        self.entry.terminal = terminal;
        self
    }

    /// Set the entry type.
    pub fn entry_type(mut self, entry_type: impl Into<String>) -> Self {
        self.entry.entry_type = entry_type.into();
        self
    }

    /// Set categories.
    pub fn categories(mut self, categories: Vec<String>) -> Self {
        self.entry.categories = categories;
        self
    }

    /// Build the desktop entry.
    pub fn build(self) -> DesktopEntry {
        self.entry
    }
}

impl Default for DesktopEntryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A parsed descriptor file: the key/value pairs of its `[Desktop Entry]`
/// section.
///
/// Parsing is deliberately lenient. Blank lines, comments, unknown keys, and
/// foreign sections are ignored; only an unreadable file is an error. Callers
/// decide which missing keys matter.
#[derive(Debug, Clone)]
pub struct ParsedEntry {
    path: PathBuf,
    fields: HashMap<String, String>,
}

impl ParsedEntry {
    /// Parse a descriptor file from disk.
    pub fn parse_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| AppdockError::Descriptor {
            path: path.to_path_buf(),
            message: format!("read desktop file: {}", e),
        })?;

        Ok(Self::parse_str(path, &content))
    }

    /// Parse descriptor content that has already been read.
    pub fn parse_str(path: &Path, content: &str) -> Self {
        let mut fields = HashMap::new();
        let mut in_desktop_entry = false;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                in_desktop_entry = line == "[Desktop Entry]";
                continue;
            }

            if in_desktop_entry {
                if let Some((key, value)) = line.split_once('=') {
                    fields.insert(key.trim().to_string(), value.trim().to_string());
                }
            }
        }

        Self {
            path: path.to_path_buf(),
            fields,
        }
    }

    /// Path of the parsed descriptor file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get an arbitrary field value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// The `Name=` field, if present.
    pub fn name(&self) -> Option<&str> {
        self.get("Name")
    }

    /// The `Exec=` field, if present.
    pub fn exec(&self) -> Option<&str> {
        self.get("Exec")
    }

    /// The `Icon=` field, if present.
    pub fn icon(&self) -> Option<&str> {
        self.get("Icon")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_desktop_entry_builder() {
        let entry = DesktopEntry::builder()
            .name("My App")
            .comment("A test application")
            .exec("/home/u/App/MyApp.AppImage")
            .icon("/home/u/App/MyApp.png")
            .terminal(false)
            .build();

        assert_eq!(entry.name, "My App");
        assert_eq!(entry.comment, Some("A test application".to_string()));
        assert_eq!(entry.exec, "/home/u/App/MyApp.AppImage");
        assert_eq!(entry.icon, "/home/u/App/MyApp.png");
        assert!(!entry.terminal);
        assert_eq!(entry.entry_type, "Application");
        assert_eq!(entry.categories, vec!["Development".to_string()]);
    }

    #[test]
    fn test_desktop_entry_to_contents() {
        let entry = DesktopEntry::builder()
            .name("Test App")
            .exec("/bin/test")
            .icon("test-icon")
            .build();

        let content = entry.to_contents();

        assert!(content.starts_with("[Desktop Entry]\n"));
        assert!(content.contains("Name=Test App\n"));
        assert!(content.contains("Exec=/bin/test\n"));
        assert!(content.contains("Icon=test-icon\n"));
        assert!(content.contains("Type=Application\n"));
        assert!(content.contains("Categories=Development;\n"));
        assert!(!content.contains("Terminal="));
    }

    #[test]
    fn test_write_desktop_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.desktop");

        let entry = DesktopEntry::builder()
            .name("Test")
            .exec("/bin/test")
            .icon("test")
            .build();

        entry.write_to_file(&file_path).unwrap();

        assert!(file_path.exists());

        let content = fs::read_to_string(&file_path).unwrap();
        assert!(content.contains("Name=Test"));

        // Check permissions
        let metadata = fs::metadata(&file_path).unwrap();
        let mode = metadata.permissions().mode();
        assert_eq!(mode & 0o755, 0o755);
    }

    #[test]
    fn test_parse_roundtrip() {
        let entry = DesktopEntry::builder()
            .name("Round Trip")
            .exec("/opt/rt.AppImage")
            .icon("/opt/rt.png")
            .build();

        let parsed = ParsedEntry::parse_str(Path::new("rt.desktop"), &entry.to_contents());

        assert_eq!(parsed.name(), Some("Round Trip"));
        assert_eq!(parsed.exec(), Some("/opt/rt.AppImage"));
        assert_eq!(parsed.icon(), Some("/opt/rt.png"));
        assert_eq!(parsed.get("Type"), Some("Application"));
    }

    #[test]
    fn test_parse_tolerates_noise() {
        let content = "\
# a comment
[Desktop Entry]
Name=Noisy

X-Custom-Key=whatever
Exec=/bin/noisy

[Desktop Action Gallery]
Name=Gallery
";
        let parsed = ParsedEntry::parse_str(Path::new("noisy.desktop"), content);

        assert_eq!(parsed.name(), Some("Noisy"));
        assert_eq!(parsed.exec(), Some("/bin/noisy"));
        assert_eq!(parsed.get("X-Custom-Key"), Some("whatever"));
        assert_eq!(parsed.icon(), None);
    }

    #[test]
    fn test_parse_missing_name() {
        let parsed = ParsedEntry::parse_str(
            Path::new("trunc.desktop"),
            "[Desktop Entry]\nExec=/bin/x\n",
        );

        assert_eq!(parsed.name(), None);
        assert_eq!(parsed.exec(), Some("/bin/x"));
    }

    #[test]
    fn test_parse_unreadable_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.desktop");

        assert!(ParsedEntry::parse_file(&missing).is_err());
    }
}
