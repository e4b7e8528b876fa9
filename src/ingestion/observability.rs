//! Import outcome reporting.
//!
//! [`crate::ingestion::import_from_path`] reports to an [`ImportObserver`]: one success or
//! failure per file, one diagnostic per skipped row, and an alert when a failure reaches the
//! configured severity.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{SecondsFormat, Utc};

use crate::error::ImportError;
use crate::types::{ParseDiagnostic, SchemaKind};

use super::unified::InputFormat;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ImportSeverity {
    /// Informational event.
    Info,
    /// Non-fatal problem, e.g. a skipped row.
    Warning,
    /// The import failed because of its input.
    Error,
    /// Infrastructure failure (I/O, unreadable workbook).
    Critical,
}

/// Which file is being imported, and how.
#[derive(Debug, Clone)]
pub struct ImportContext {
    pub path: PathBuf,
    pub format: InputFormat,
}

/// Counts reported on a successful import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportStats {
    /// Schema the rows were read with.
    pub schema: SchemaKind,
    /// Data rows in the sheet (header excluded).
    pub rows_read: usize,
    /// Sales produced.
    pub sales: usize,
    /// Rows that produced no sale.
    pub skipped_rows: usize,
    /// Rows skipped because of a parse problem.
    pub diagnostics: usize,
}

/// Observer interface for import outcomes.
pub trait ImportObserver: Send + Sync {
    /// Called once when a file was imported (even if it yielded zero sales).
    fn on_success(&self, _ctx: &ImportContext, _stats: ImportStats) {}

    /// Called once when a file could not be imported.
    fn on_failure(&self, _ctx: &ImportContext, _severity: ImportSeverity, _error: &ImportError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        self.on_failure(ctx, severity, error)
    }

    /// Called for every row skipped with a parse problem, before `on_success`.
    fn on_diagnostic(&self, _ctx: &ImportContext, _diagnostic: &ParseDiagnostic) {}
}

/// Fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn ImportObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn ImportObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl ImportObserver for CompositeObserver {
    fn on_success(&self, ctx: &ImportContext, stats: ImportStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }

    fn on_diagnostic(&self, ctx: &ImportContext, diagnostic: &ParseDiagnostic) {
        for o in &self.observers {
            o.on_diagnostic(ctx, diagnostic);
        }
    }
}

/// Forwards import events to `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl ImportObserver for TracingObserver {
    fn on_success(&self, ctx: &ImportContext, stats: ImportStats) {
        tracing::info!(
            path = %ctx.path.display(),
            format = ?ctx.format,
            schema = ?stats.schema,
            sales = stats.sales,
            skipped = stats.skipped_rows,
            "import finished"
        );
    }

    fn on_failure(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        tracing::error!(path = %ctx.path.display(), ?severity, error = %error, "import failed");
    }

    fn on_alert(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        tracing::error!(path = %ctx.path.display(), ?severity, error = %error, alert = true, "import failed");
    }

    fn on_diagnostic(&self, ctx: &ImportContext, diagnostic: &ParseDiagnostic) {
        tracing::warn!(
            path = %ctx.path.display(),
            row = diagnostic.row_index,
            message = %diagnostic.message,
            "row skipped"
        );
    }
}

/// Appends import events to a local log file, one line each.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Writes are best-effort; failures to open or write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{} {line}", Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
    }
}

impl ImportObserver for FileObserver {
    fn on_success(&self, ctx: &ImportContext, stats: ImportStats) {
        self.append_line(&format!(
            "ok format={:?} path={} sales={} skipped={}",
            ctx.format,
            ctx.path.display(),
            stats.sales,
            stats.skipped_rows
        ));
    }

    fn on_failure(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        self.append_line(&format!(
            "fail severity={severity:?} format={:?} path={} err={error}",
            ctx.format,
            ctx.path.display()
        ));
    }

    fn on_alert(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        self.append_line(&format!(
            "ALERT severity={severity:?} format={:?} path={} err={error}",
            ctx.format,
            ctx.path.display()
        ));
    }

    fn on_diagnostic(&self, ctx: &ImportContext, diagnostic: &ParseDiagnostic) {
        self.append_line(&format!("row path={} {diagnostic}", ctx.path.display()));
    }
}
