use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE: &str = "ghostdoc.json";

/// Top-level ghostdoc.json schema.
///
/// Built once in `main` and handed to every command by reference.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GhostdocConfig {
    /// Insertion index of the first character in a fresh document.
    #[serde(default = "default_base_offset")]
    pub base_offset: usize,

    #[serde(default = "default_publications")]
    pub publications: BTreeMap<String, Publication>,
}

impl Default for GhostdocConfig {
    fn default() -> Self {
        Self {
            base_offset: default_base_offset(),
            publications: default_publications(),
        }
    }
}

fn default_base_offset() -> usize {
    1
}

fn default_publications() -> BTreeMap<String, Publication> {
    [
        ("forbes", "Forbes"),
        ("entrepreneur", "Entrepreneur"),
        ("fastcompany", "Fast Company"),
    ]
    .into_iter()
    .map(|(key, name)| {
        (
            key.to_string(),
            Publication {
                display_name: Some(name.to_string()),
                folders: Folders::default(),
            },
        )
    })
    .collect()
}

/// A publication articles are ghostwritten for.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    #[serde(default)]
    pub display_name: Option<String>,

    #[serde(default)]
    pub folders: Folders,
}

/// Destination folder ids for exported documents.
#[derive(Debug, Default, Deserialize)]
pub struct Folders {
    #[serde(default)]
    pub drafts: Option<String>,

    #[serde(default)]
    pub finals: Option<String>,
}

/// Which folder an export lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderKind {
    Drafts,
    Finals,
}

/// Document type, the last word of an exported document's title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocKind {
    Draft,
    Final,
    TranscribedAudio,
}

impl DocKind {
    pub fn folder(self) -> FolderKind {
        match self {
            DocKind::Final => FolderKind::Finals,
            DocKind::Draft | DocKind::TranscribedAudio => FolderKind::Drafts,
        }
    }
}

impl fmt::Display for DocKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DocKind::Draft => "Draft",
            DocKind::Final => "Final",
            DocKind::TranscribedAudio => "Transcribed Audio",
        })
    }
}

/// Normalize a publication name to its config key ("Fast Company" -> "fastcompany").
pub fn publication_key(publication: &str) -> String {
    publication
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

impl GhostdocConfig {
    pub fn publication(&self, publication: &str) -> Option<&Publication> {
        self.publications.get(&publication_key(publication))
    }

    /// Display name for a publication, or the name as given when unknown.
    pub fn display_name(&self, publication: &str) -> String {
        self.publication(publication)
            .and_then(|p| p.display_name.clone())
            .unwrap_or_else(|| publication.to_string())
    }

    pub fn folder_id(&self, publication: &str, kind: FolderKind) -> Option<&str> {
        let folders = &self.publication(publication)?.folders;
        match kind {
            FolderKind::Drafts => folders.drafts.as_deref(),
            FolderKind::Finals => folders.finals.as_deref(),
        }
    }

    /// Document title: `<year> <month> <Publication> <type>`.
    pub fn doc_title(&self, year: i32, month: &str, publication: &str, kind: DocKind) -> String {
        format!("{year} {month} {} {kind}", self.display_name(publication))
    }
}

/// Load config from `explicit`, or from ghostdoc.json in `dir`, or return
/// defaults when neither exists.
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<GhostdocConfig> {
    let config_path = match explicit {
        Some(path) => path.to_path_buf(),
        None => dir.join(CONFIG_FILE),
    };

    if config_path.exists() {
        let raw = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config: GhostdocConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;
        tracing::debug!(path = %config_path.display(), "Loaded config");
        Ok(config)
    } else if explicit.is_some() {
        anyhow::bail!("Config file {} does not exist", config_path.display())
    } else {
        Ok(GhostdocConfig::default())
    }
}
