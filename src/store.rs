//! JSON file persistence for the tool directory.
//!
//! The whole directory lives in one JSON array. It is loaded wholesale,
//! mutated in memory and rewritten wholesale: the new content is written to a
//! sibling temporary file and renamed over the target, so readers only ever
//! see the old or the new file.

use std::cmp::Ordering;
use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

use crate::tool::Tool;

/// Errors produced by tool store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error reading or writing the tools file.
    #[error("I/O error on tools file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The tools file is not a valid JSON array of tool records.
    #[error("invalid tools file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// JSON serialization error (shouldn't occur for well-formed records).
    #[error("JSON serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    /// Refused to replace a file whose existing content could not be parsed.
    #[error(
        "refusing to overwrite {path}: existing content could not be parsed\n  Suggestion: Repair or move the file, then rerun"
    )]
    WouldClobber { path: PathBuf },
}

/// Outcome of the last [`ToolStore::load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing has been loaded yet.
    NotLoaded,
    /// The file was read and parsed.
    Loaded,
    /// No file exists yet; saving creates it.
    Missing,
    /// The file exists but could not be read or parsed.
    Unreadable,
}

/// Handle on the tools JSON file.
#[derive(Debug)]
pub struct ToolStore {
    path: PathBuf,
    state: LoadState,
}

impl ToolStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: LoadState::NotLoaded,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn load_state(&self) -> LoadState {
        self.state
    }

    /// Loads every tool record from disk.
    ///
    /// Never fails: a missing file yields an empty set, and an unreadable or
    /// unparseable file also yields an empty set but marks the store so that
    /// [`ToolStore::save`] will not overwrite it.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&mut self) -> Vec<Tool> {
        match self.try_load() {
            Ok(tools) => {
                self.state = LoadState::Loaded;
                info!(count = tools.len(), "Loaded existing tools");
                tools
            }
            Err(StoreError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                self.state = LoadState::Missing;
                warn!("Tools file does not exist yet; starting with an empty set");
                Vec::new()
            }
            Err(err) => {
                self.state = LoadState::Unreadable;
                error!(error = %err, "Error loading existing tools; starting with an empty set");
                Vec::new()
            }
        }
    }

    /// Strict variant of [`ToolStore::load`] that surfaces every failure.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on read or parse failure.
    pub fn try_load(&self) -> Result<Vec<Tool>, StoreError> {
        let raw = fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Replaces the tools file with `tools`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::WouldClobber`] when the last load could not parse
    /// the existing file, or an I/O/serialization error when writing fails.
    pub fn save(&self, tools: &[Tool]) -> Result<(), StoreError> {
        if self.state == LoadState::Unreadable {
            return Err(StoreError::WouldClobber {
                path: self.path.clone(),
            });
        }
        self.force_save(tools)
    }

    /// Replaces the tools file regardless of the last load outcome.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on I/O or serialization failure.
    #[instrument(skip(self, tools), fields(path = %self.path.display(), count = tools.len()))]
    pub fn force_save(&self, tools: &[Tool]) -> Result<(), StoreError> {
        let tmp_path = temp_path_for(&self.path);
        let io_err = |source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        };

        let file = fs::File::create(&tmp_path).map_err(io_err)?;
        let write_result = write_pretty(BufWriter::new(file), tools);
        if let Err(err) = write_result {
            // Best-effort cleanup so a partial file is not left behind.
            let _ = fs::remove_file(&tmp_path);
            return Err(err);
        }

        fs::rename(&tmp_path, &self.path).map_err(|source| {
            let _ = fs::remove_file(&tmp_path);
            StoreError::Io {
                path: self.path.clone(),
                source,
            }
        })?;

        info!("Saved tools");
        Ok(())
    }
}

/// Writes `tools` as a 4-space indented JSON array.
fn write_pretty<W: Write>(mut writer: W, tools: &[Tool]) -> Result<(), StoreError> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    tools.serialize(&mut serializer)?;
    writer.write_all(b"\n").map_err(serde_json::Error::io)?;
    writer.flush().map_err(serde_json::Error::io)?;
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Sorts tools by category label, then by name.
///
/// Names compare case-insensitively first; exact-case comparison only breaks
/// ties so the order stays total and deterministic.
pub fn sort_tools(tools: &mut [Tool]) {
    tools.sort_by(compare_tools);
    debug!(count = tools.len(), "Sorted tools by category then name");
}

fn compare_tools(left: &Tool, right: &Tool) -> Ordering {
    left.category
        .as_str()
        .cmp(right.category.as_str())
        .then_with(|| collate(&left.name, &right.name))
}

fn collate(left: &str, right: &str) -> Ordering {
    left.to_lowercase()
        .cmp(&right.to_lowercase())
        .then_with(|| left.cmp(right))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tool::{Category, Pricing};
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn tool(name: &str, category: Category) -> Tool {
        Tool::new(
            name,
            category,
            format!("{name} description"),
            Pricing::Free,
            format!("https://{}.ai", name.to_lowercase()),
        )
    }

    #[test]
    fn test_sort_tools_category_then_name() {
        let mut tools = vec![
            tool("B", Category::Writing),
            tool("B", Category::Chat),
            tool("A", Category::Chat),
        ];
        sort_tools(&mut tools);

        let order: Vec<(&str, &str)> = tools
            .iter()
            .map(|t| (t.category.as_str(), t.name.as_str()))
            .collect();
        assert_eq!(order, vec![("chat", "A"), ("chat", "B"), ("writing", "B")]);
    }

    #[test]
    fn test_sort_tools_names_case_insensitive() {
        let mut tools = vec![
            tool("zeta", Category::Code),
            tool("Alpha", Category::Code),
            tool("beta", Category::Code),
        ];
        sort_tools(&mut tools);
        let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "beta", "zeta"]);
    }

    #[test]
    fn test_sort_tools_uses_category_label_not_enum_order() {
        // enum order puts Productivity before Design; labels put "design" first
        let mut tools = vec![tool("X", Category::Productivity), tool("Y", Category::Design)];
        sort_tools(&mut tools);
        assert_eq!(tools[0].category, Category::Design);
    }

    #[test]
    fn test_save_then_load_round_trips_field_for_field() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ai-tools.json");

        let mut with_extras = tool("Gamma", Category::Design)
            .with_features(vec!["Slides".to_string(), "Docs".to_string()]);
        with_extras.popularity = Some(77);
        with_extras.logo = "https://logo.clearbit.com/gamma.app".to_string();
        with_extras.date_added = Some(Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 0).unwrap());
        let tools = vec![tool("Alpha", Category::Chat), with_extras];

        let mut store = ToolStore::new(&path);
        assert!(store.load().is_empty());
        assert_eq!(store.load_state(), LoadState::Missing);

        store.save(&tools).unwrap();
        let reloaded = store.load();
        assert_eq!(store.load_state(), LoadState::Loaded);
        assert_eq!(reloaded, tools);
    }

    #[test]
    fn test_save_keeps_sponsored_flag_and_empty_icon() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ai-tools.json");
        fs::write(
            &path,
            r#"[{"name":"Featured","category":"chat","description":"Sponsored assistant",
                "icon":"","logo":"","pricing":"paid","url":"https://featured.ai",
                "features":[],"sponsored":true}]"#,
        )
        .unwrap();

        let mut store = ToolStore::new(&path);
        let mut tools = store.load();
        tools[0].popularity = Some(60);
        store.save(&tools).unwrap();

        let saved: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved[0]["sponsored"], true);
        assert_eq!(saved[0]["icon"], "");
        assert_eq!(saved[0]["popularity"], 60);
        assert_eq!(store.load(), tools);
    }

    #[test]
    fn test_save_uses_four_space_indent_and_camel_case() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ai-tools.json");
        let mut entry = tool("Alpha", Category::Chat);
        entry.date_added = Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());

        ToolStore::new(&path).force_save(&[entry]).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\n    {\n        \"name\": \"Alpha\""));
        assert!(raw.contains("\"dateAdded\""));
        assert!(!path.with_file_name("ai-tools.json.tmp").exists());
    }

    #[test]
    fn test_load_unparseable_file_yields_empty_and_blocks_save() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ai-tools.json");
        fs::write(&path, "{ not json").unwrap();

        let mut store = ToolStore::new(&path);
        assert!(store.load().is_empty());
        assert_eq!(store.load_state(), LoadState::Unreadable);

        let err = store.save(&[tool("Alpha", Category::Chat)]).unwrap_err();
        assert!(matches!(err, StoreError::WouldClobber { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn test_force_save_into_missing_directory_reports_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("ai-tools.json");
        let err = ToolStore::new(&path).force_save(&[]).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
