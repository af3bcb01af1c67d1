//! Console-backed progress reporting.

use console::Term;
use console::style;
use unarc_core::ProgressSink;
use unarc_core::Summary;

/// Progress sink that writes entry lines to stdout and warnings to stderr.
pub struct ConsoleSink {
    stdout: Term,
    stderr: Term,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            stdout: Term::stdout(),
            stderr: Term::stderr(),
        }
    }
}

impl ProgressSink for ConsoleSink {
    fn entry_line(&mut self, line: &str) {
        let _ = self.stdout.write_line(line);
    }

    fn warning(&mut self, message: &str) {
        let _ = self
            .stderr
            .write_line(&format!("{} {message}", style("WARNING:").yellow().bold()));
    }
}

/// Prints the one-line completion summary after a successful verbose
/// extraction. Quiet runs stay silent and signal success via exit code
/// alone.
pub fn print_summary(summary: &Summary) {
    let term = Term::stdout();
    let line = format!(
        "{} files, {} directories, {} symbolic links",
        summary.files, summary.directories, summary.symlinks
    );
    let line = if summary.skipped > 0 {
        format!("{line}, {} skipped", summary.skipped)
    } else {
        line
    };
    if console::colors_enabled() {
        let _ = term.write_line(&format!("{} {line}", style("✓").green().bold()));
    } else {
        let _ = term.write_line(&line);
    }
}
