//! `ghostdoc watch`: keep an article's export plan current while it is edited.
//!
//! The draft and its optional plain-text companion are both inputs. A burst of
//! writes is collapsed into one rebuild once the inputs have been quiet for
//! [`SETTLE`], and the plan is only written out when it differs from the last
//! one emitted.

use anyhow::{Context, Result};
use colored::Colorize;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use crate::config::GhostdocConfig;
use crate::export::{ArticleSource, DocTarget, export_article, to_json, write_output};

/// Quiet period after the last write before the plan is rebuilt.
const SETTLE: Duration = Duration::from_millis(200);

/// Receive timeout while no rebuild is pending.
const IDLE_POLL: Duration = Duration::from_secs(1);

/// Trailing-edge debounce over input writes.
#[derive(Debug)]
struct Settle {
    window: Duration,
    last_write: Option<Instant>,
}

impl Settle {
    fn new(window: Duration) -> Self {
        Self {
            window,
            last_write: None,
        }
    }

    fn record(&mut self, now: Instant) {
        self.last_write = Some(now);
    }

    /// How long to block waiting for the next event.
    fn wait(&self, now: Instant) -> Duration {
        match self.last_write {
            Some(at) => (at + self.window).saturating_duration_since(now),
            None => IDLE_POLL,
        }
    }

    /// Returns true once per burst, when it has been quiet for the window.
    fn take_due(&mut self, now: Instant) -> bool {
        match self.last_write {
            Some(at) if now.saturating_duration_since(at) >= self.window => {
                self.last_write = None;
                true
            }
            _ => false,
        }
    }
}

/// Whether `event` writes to one of `inputs` (canonical paths).
fn touches_inputs(event: &Event, inputs: &[PathBuf]) -> bool {
    if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
        return false;
    }
    event.paths.iter().any(|path| {
        let resolved = path.canonicalize().unwrap_or_else(|_| path.clone());
        inputs.contains(&resolved)
    })
}

fn resolve(path: &Path) -> Result<PathBuf> {
    std::fs::canonicalize(path).with_context(|| format!("Cannot watch '{}'", path.display()))
}

/// What a rebuild did with the output.
#[derive(Debug, PartialEq, Eq)]
enum Rebuild {
    Written { formatted: bool, style_requests: usize },
    Unchanged,
}

/// The export being kept current, with the last plan written out.
struct PlanWatch<'a> {
    config: &'a GhostdocConfig,
    target: &'a DocTarget,
    source: &'a ArticleSource<'a>,
    out: Option<&'a Path>,
    last_json: Option<String>,
}

impl PlanWatch<'_> {
    fn rebuild(&mut self) -> Result<Rebuild> {
        let document = export_article(self.config, self.target, self.source)?;
        let json = to_json(&document)?;
        if self.last_json.as_deref() == Some(json.as_str()) {
            return Ok(Rebuild::Unchanged);
        }
        write_output(&json, self.out, true)?;
        self.last_json = Some(json);
        Ok(Rebuild::Written {
            formatted: document.formatting_applied,
            style_requests: document.plan.formatting.len(),
        })
    }
}

/// Status goes to stderr; stdout carries the plan JSON when there is no `--out`.
fn report(outcome: Result<Rebuild>, quiet: bool) {
    match outcome {
        Ok(Rebuild::Unchanged) => tracing::debug!("Plan unchanged, nothing written"),
        Ok(_) if quiet => {}
        Ok(Rebuild::Written {
            formatted: true,
            style_requests,
        }) => eprintln!(
            "{} formatted plan, {style_requests} style requests",
            "Exported".green().bold()
        ),
        Ok(Rebuild::Written { formatted: false, .. }) => eprintln!(
            "{} draft did not parse, exported unformatted",
            "Fell back".yellow().bold()
        ),
        Err(e) => eprintln!("{} {:#}", "Export error:".red().bold(), e),
    }
}

/// Export once, then rebuild the plan each time the draft or its plain
/// companion settles after a write. Runs until interrupted.
pub fn watch_and_export(
    config: &GhostdocConfig,
    target: &DocTarget,
    source: &ArticleSource<'_>,
    out: Option<&Path>,
    quiet: bool,
) -> Result<()> {
    let mut inputs = vec![resolve(source.html)?];
    if let Some(plain) = source.plain {
        inputs.push(resolve(plain)?);
    }
    let dirs: BTreeSet<&Path> = inputs.iter().filter_map(|p| p.parent()).collect();

    let mut session = PlanWatch {
        config,
        target,
        source,
        out,
        last_json: None,
    };
    report(session.rebuild(), quiet);

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) => {
            // The receiver only goes away when the loop below has exited.
            tx.send(event).ok();
        }
        Err(e) => tracing::warn!("Watch error: {e}"),
    })?;
    for dir in &dirs {
        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Cannot watch '{}'", dir.display()))?;
    }

    if !quiet {
        eprintln!(
            "{} {} for changes (Ctrl+C to stop)",
            "Watching".cyan().bold(),
            source.html.display()
        );
    }

    let mut settle = Settle::new(SETTLE);
    loop {
        match rx.recv_timeout(settle.wait(Instant::now())) {
            Ok(event) => {
                if touches_inputs(&event, &inputs) {
                    tracing::debug!(paths = ?event.paths, "Input written");
                    settle.record(Instant::now());
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
        if settle.take_due(Instant::now()) {
            report(session.rebuild(), quiet);
        }
    }

    Ok(())
}
