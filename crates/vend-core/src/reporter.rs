//! User-facing output channel
//!
//! Operations report revisions, paths and script output through a
//! [`Reporter`] instead of printing, so the CLI can colour them and tests can
//! inspect them. Diagnostics go to `tracing` as usual.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// What a reported line represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    Path,
    Rev,
    Dirty,
    Changes,
    ShellOutput,
    ShellError,
    Message,
    Success,
    Error,
}

/// Sink for user-facing output.
///
/// Indentation nests output for one source under its heading line.
pub trait Reporter: Send + Sync {
    /// Show `lines` in the given style at the current indentation.
    fn show(&self, lines: &[String], style: Style);

    /// Increase indentation for following lines.
    fn indent(&self);

    /// Decrease indentation, saturating at zero.
    fn dedent(&self);
}

const INDENT: &str = "  ";

fn dedent_counter(level: &AtomicUsize) {
    // Saturating decrement; a failed update means the level was already 0
    let _ = level.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
}

/// Reporter that forwards every line to `tracing` at `info` level.
#[derive(Debug, Default)]
pub struct TracingReporter {
    level: AtomicUsize,
}

impl TracingReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reporter for TracingReporter {
    fn show(&self, lines: &[String], style: Style) {
        let prefix = INDENT.repeat(self.level.load(Ordering::SeqCst));
        for line in lines {
            tracing::info!(?style, "{prefix}{line}");
        }
    }

    fn indent(&self) {
        self.level.fetch_add(1, Ordering::SeqCst);
    }

    fn dedent(&self) {
        dedent_counter(&self.level);
    }
}

/// A line captured by [`RecordingReporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub style: Style,
    pub depth: usize,
    pub line: String,
}

/// Reporter that keeps every line in memory.
///
/// Useful for embedders that render output themselves, and for tests.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    level: AtomicUsize,
    lines: Mutex<Vec<Recorded>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far.
    pub fn recorded(&self) -> Vec<Recorded> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    /// Show everything recorded on `target`, nested under its current
    /// indentation.
    pub fn replay(&self, target: &dyn Reporter) {
        let mut depth = 0;
        for record in self.recorded() {
            while depth < record.depth {
                target.indent();
                depth += 1;
            }
            while depth > record.depth {
                target.dedent();
                depth -= 1;
            }
            target.show(std::slice::from_ref(&record.line), record.style);
        }
        for _ in 0..depth {
            target.dedent();
        }
    }

    /// Text of the lines recorded with `style`.
    pub fn lines_with(&self, style: Style) -> Vec<String> {
        self.recorded()
            .into_iter()
            .filter(|r| r.style == style)
            .map(|r| r.line)
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn show(&self, lines: &[String], style: Style) {
        let depth = self.level.load(Ordering::SeqCst);
        if let Ok(mut recorded) = self.lines.lock() {
            recorded.extend(lines.iter().map(|line| Recorded {
                style,
                depth,
                line: line.clone(),
            }));
        }
    }

    fn indent(&self) {
        self.level.fetch_add(1, Ordering::SeqCst);
    }

    fn dedent(&self) {
        dedent_counter(&self.level);
    }
}
