//! Coloured terminal output for reported lines

use std::sync::atomic::{AtomicUsize, Ordering};

use colored::{ColoredString, Colorize};
use vend_core::{Reporter, Style};

/// Prints reported lines to stdout, indented and coloured by style.
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    level: AtomicUsize,
    quiet: bool,
}

impl ConsoleReporter {
    pub fn new(quiet: bool) -> Self {
        Self {
            level: AtomicUsize::new(0),
            quiet,
        }
    }
}

pub fn paint(line: &str, style: Style) -> ColoredString {
    match style {
        Style::Path => line.normal(),
        Style::Rev => line.blue().bold(),
        Style::Dirty => line.magenta().bold(),
        Style::Changes => line.yellow(),
        Style::ShellOutput => line.cyan(),
        Style::ShellError => line.yellow(),
        Style::Message => line.white().bold(),
        Style::Success => line.green().bold(),
        Style::Error => line.red().bold(),
    }
}

impl Reporter for ConsoleReporter {
    fn show(&self, lines: &[String], style: Style) {
        if self.quiet && style != Style::Error {
            return;
        }
        let prefix = "  ".repeat(self.level.load(Ordering::SeqCst));
        for line in lines {
            if style == Style::Error {
                eprintln!("{prefix}{}", paint(line, style));
            } else {
                println!("{prefix}{}", paint(line, style));
            }
        }
    }

    fn indent(&self) {
        self.level.fetch_add(1, Ordering::SeqCst);
    }

    fn dedent(&self) {
        let _ = self
            .level
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
    }
}
