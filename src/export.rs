//! `ghostdoc translate` / `export` / `transcript` / `sanitize` / `batch`.
//!
//! Every export command produces an [`ExportDocument`]: the document title,
//! its destination folder, and the batch update requests that populate it.

use anyhow::{Context, Result};
use colored::Colorize;
use ghostdoc_richtext::{ExportPlan, StyleKind, to_style_operations};
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::{DocKind, FolderKind, GhostdocConfig};

/// Where an exported document goes and what it is called.
#[derive(Debug, Clone)]
pub struct DocTarget {
    pub publication: String,
    pub month: String,
    pub year: i32,
}

/// Serialized result of an export command.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub title: String,
    pub folder: FolderKind,
    pub folder_id: Option<String>,
    pub formatting_applied: bool,
    #[serde(flatten)]
    pub plan: ExportPlan,
}

impl ExportDocument {
    fn new(config: &GhostdocConfig, target: &DocTarget, kind: DocKind, plan: ExportPlan) -> Self {
        let folder = kind.folder();
        let folder_id = config
            .folder_id(&target.publication, folder)
            .map(str::to_string);
        if folder_id.is_none() {
            tracing::warn!(
                publication = %target.publication,
                ?folder,
                "Folder ID not configured"
            );
        }
        Self {
            title: config.doc_title(target.year, &target.month, &target.publication, kind),
            folder,
            folder_id,
            formatting_applied: plan.formatted,
            plan,
        }
    }
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read '{}'", path.display()))
}

/// Pretty JSON rendering of an export command's output.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output")
}

/// Write rendered JSON to `out`, or to stdout when `out` is `None`.
pub fn write_output(json: &str, out: Option<&Path>, quiet: bool) -> Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create '{}'", parent.display()))?;
            }
            std::fs::write(path, format!("{json}\n"))
                .with_context(|| format!("Failed to write '{}'", path.display()))?;
            if !quiet {
                println!("{} {}", "Wrote".green().bold(), path.display());
            }
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn emit_json<T: Serialize>(value: &T, out: Option<&Path>, quiet: bool) -> Result<()> {
    write_output(&to_json(value)?, out, quiet)
}

// ------------------------------------------------------------------
// translate
// ------------------------------------------------------------------

#[derive(Clone, Copy, clap::ValueEnum)]
pub enum TranslateFormat {
    Json,
    Summary,
}

#[derive(Serialize)]
struct Translation<'a> {
    text: &'a str,
    ranges: &'a [ghostdoc_richtext::StyleRange],
    operations: Vec<ghostdoc_richtext::StyleOperation>,
}

pub fn handle_translate(file: &Path, base_offset: usize, format: TranslateFormat) -> Result<()> {
    let html = read_file(file)?;
    let result = ghostdoc_richtext::parse(&html)
        .with_context(|| format!("Failed to parse '{}'", file.display()))?;
    let operations = to_style_operations(&result.ranges, base_offset);

    match format {
        TranslateFormat::Json => emit_json(
            &Translation {
                text: &result.text,
                ranges: &result.ranges,
                operations,
            },
            None,
            true,
        )?,
        TranslateFormat::Summary => {
            println!(
                "{} {} chars, {} ranges, {} operations",
                file.display().to_string().bold(),
                result.text.chars().count(),
                result.ranges.len(),
                operations.len()
            );
            for range in &result.ranges {
                let label = match range.kind {
                    StyleKind::Heading2 | StyleKind::Heading3 => "heading".cyan(),
                    StyleKind::Link => "link".blue(),
                    StyleKind::Blockquote => "quote".dimmed(),
                    _ => "style".green(),
                };
                let kind = serde_json::to_value(range.kind)?;
                let url = range
                    .url
                    .as_deref()
                    .map(|u| format!(" -> {u}"))
                    .unwrap_or_default();
                println!(
                    "  {label} {:<10} {:>5}..{:<5} {:?}{url}",
                    kind.as_str().unwrap_or_default(),
                    range.start,
                    range.end,
                    result.slice(range),
                );
            }
        }
    }
    Ok(())
}

// ------------------------------------------------------------------
// export / transcript
// ------------------------------------------------------------------

/// Inputs of an article export.
pub struct ArticleSource<'a> {
    pub html: &'a Path,
    pub plain: Option<&'a Path>,
    pub is_final: bool,
    /// Insertion index of the first character.
    pub base_offset: usize,
}

pub fn export_article(
    config: &GhostdocConfig,
    target: &DocTarget,
    source: &ArticleSource<'_>,
) -> Result<ExportDocument> {
    let html = read_file(source.html)?;
    let plain = source.plain.map(read_file).transpose()?;

    let plan = ghostdoc_richtext::plan_article_export(
        plain.as_deref(),
        Some(&html),
        source.base_offset,
    );
    let kind = if source.is_final {
        DocKind::Final
    } else {
        DocKind::Draft
    };
    Ok(ExportDocument::new(config, target, kind, plan))
}

pub fn handle_export(
    config: &GhostdocConfig,
    target: &DocTarget,
    source: &ArticleSource<'_>,
    out: Option<&Path>,
    quiet: bool,
) -> Result<()> {
    let document = export_article(config, target, source)?;
    if !quiet && out.is_some() {
        print_document_summary(&document);
    }
    emit_json(&document, out, quiet)
}

pub fn handle_transcript(
    config: &GhostdocConfig,
    target: &DocTarget,
    file: &Path,
    headline: Option<&str>,
    angle: Option<&str>,
    out: Option<&Path>,
    quiet: bool,
) -> Result<()> {
    let transcript = read_file(file)?;
    if transcript.trim().is_empty() {
        anyhow::bail!("No transcription in '{}'", file.display());
    }

    let body = ghostdoc_richtext::transcript_body(headline, angle, &transcript);
    let plan = ghostdoc_richtext::plan_transcript_export(&body, config.base_offset);
    let document = ExportDocument::new(config, target, DocKind::TranscribedAudio, plan);
    if !quiet && out.is_some() {
        print_document_summary(&document);
    }
    emit_json(&document, out, quiet)
}

fn print_document_summary(document: &ExportDocument) {
    let formatting = if document.formatting_applied {
        format!("{} style requests", document.plan.formatting.len()).green()
    } else {
        "unformatted".yellow()
    };
    println!(
        "{} {} ({})",
        "Planned".cyan().bold(),
        document.title,
        formatting
    );
    match &document.folder_id {
        Some(id) => println!("  {} {id}", "folder:".dimmed()),
        None => println!("  {} not configured", "folder:".dimmed()),
    }
}

// ------------------------------------------------------------------
// sanitize
// ------------------------------------------------------------------

pub fn handle_sanitize(file: &Path, in_place: bool, quiet: bool) -> Result<()> {
    let text = read_file(file)?;
    let cleaned = ghostdoc_richtext::sanitize_llm_output(&text);

    if in_place {
        std::fs::write(file, &cleaned)
            .with_context(|| format!("Failed to write '{}'", file.display()))?;
        if !quiet {
            let status = if cleaned == text {
                "Unchanged".dimmed()
            } else {
                "Sanitized".green().bold()
            };
            println!("{status} {}", file.display());
        }
    } else {
        print!("{cleaned}");
    }
    Ok(())
}

// ------------------------------------------------------------------
// batch
// ------------------------------------------------------------------

/// Counts reported by `ghostdoc batch`.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub formatted: usize,
    pub unformatted: usize,
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchReport {
    pub fn print_summary(&self) {
        println!();
        println!(
            "{} {} formatted, {} unformatted",
            "Batch complete:".green().bold(),
            self.formatted,
            self.unformatted
        );
        for (path, err) in &self.failed {
            println!("{} {}: {}", "FAILED:".red(), path.display(), err);
        }
    }
}

/// Export every `*.html` file under `dir` into `out_dir`, mirroring the
/// relative layout with `.json` extensions.
pub fn run_batch(
    config: &GhostdocConfig,
    target: &DocTarget,
    dir: &Path,
    out_dir: &Path,
    is_final: bool,
) -> Result<BatchReport> {
    let mut report = BatchReport::default();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk '{}'", dir.display()))?;
        let path = entry.path();
        let is_html = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"));
        if !entry.file_type().is_file() || !is_html {
            continue;
        }

        let relative = path.strip_prefix(dir).unwrap_or(path);
        let dest = out_dir.join(relative).with_extension("json");
        let source = ArticleSource {
            html: path,
            plain: None,
            is_final,
            base_offset: config.base_offset,
        };

        match export_article(config, target, &source)
            .and_then(|document| emit_json(&document, Some(&dest), true).map(|()| document))
        {
            Ok(document) => {
                tracing::info!(path = %path.display(), formatted = document.formatting_applied, "Exported");
                if document.formatting_applied {
                    report.formatted += 1;
                } else {
                    report.unformatted += 1;
                }
            }
            Err(e) => {
                tracing::error!(path = %path.display(), "Export failed: {e:#}");
                report.failed.push((path.to_path_buf(), format!("{e:#}")));
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn target() -> DocTarget {
        DocTarget {
            publication: "Fast Company".to_string(),
            month: "April".to_string(),
            year: 2026,
        }
    }

    #[test]
    fn export_article_builds_title_and_plan() {
        let dir = tempfile::tempdir().unwrap();
        let html = dir.path().join("a.html");
        std::fs::write(&html, "<h2>Title</h2>Body").unwrap();

        let document = export_article(
            &GhostdocConfig::default(),
            &target(),
            &ArticleSource {
                html: &html,
                plain: None,
                is_final: true,
                base_offset: 1,
            },
        )
        .unwrap();

        assert_eq!(document.title, "2026 April Fast Company Final");
        assert_eq!(document.folder, FolderKind::Finals);
        assert_eq!(document.folder_id, None);
        assert!(document.formatting_applied);
        assert_eq!(document.plan.text, "Title\nBody");
    }

    #[test]
    fn export_document_json_shape() {
        let dir = tempfile::tempdir().unwrap();
        let html = dir.path().join("a.html");
        std::fs::write(&html, "<b>x</b>").unwrap();
        let document = export_article(
            &GhostdocConfig::default(),
            &target(),
            &ArticleSource {
                html: &html,
                plain: None,
                is_final: false,
                base_offset: 1,
            },
        )
        .unwrap();

        let json = serde_json::to_value(&document).unwrap();
        assert_eq!(json["title"], "2026 April Fast Company Draft");
        assert_eq!(json["folder"], "drafts");
        assert_eq!(json["formattingApplied"], true);
        assert_eq!(json["insert"]["requests"][0]["insertText"]["text"], "x");
        assert_eq!(
            json["formatting"]["requests"][0]["updateTextStyle"]["fields"],
            "bold"
        );
    }

    #[test]
    fn export_article_honors_source_base_offset() {
        let dir = tempfile::tempdir().unwrap();
        let html = dir.path().join("a.html");
        std::fs::write(&html, "<i>lean</i>").unwrap();
        let document = export_article(
            &GhostdocConfig::default(),
            &target(),
            &ArticleSource {
                html: &html,
                plain: None,
                is_final: false,
                base_offset: 40,
            },
        )
        .unwrap();

        let json = serde_json::to_value(&document).unwrap();
        assert_eq!(json["insert"]["requests"][0]["insertText"]["location"]["index"], 40);
        let style = &json["formatting"]["requests"][0]["updateTextStyle"];
        assert_eq!(style["range"]["startIndex"], 40);
        assert_eq!(style["range"]["endIndex"], 44);
    }

    #[test]
    fn batch_exports_html_files_and_skips_others() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(src.path().join("nested")).unwrap();
        std::fs::write(src.path().join("one.html"), "<b>bold</b>").unwrap();
        std::fs::write(src.path().join("nested/two.HTML"), "no styles").unwrap();
        std::fs::write(src.path().join("notes.txt"), "<b>ignored</b>").unwrap();

        let report = run_batch(&GhostdocConfig::default(), &target(), src.path(), out.path(), false)
            .unwrap();

        assert_eq!(report.formatted, 1);
        assert_eq!(report.unformatted, 1);
        assert!(report.failed.is_empty());
        assert!(out.path().join("one.json").exists());
        assert!(out.path().join("nested/two.json").exists());
        assert!(!out.path().join("notes.json").exists());
    }
}
