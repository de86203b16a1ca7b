//! Streaming progress output.
//!
//! When streaming is enabled, deltas are echoed to stderr as they
//! arrive so the user can follow the analysis in real time. Report
//! content always goes through the report module; this is display only.

use std::io::Write;

use colored::Colorize;

/// Echoes streaming analysis text to stderr.
#[derive(Debug, Clone, Copy)]
pub struct StreamPrinter {
    enabled: bool,
}

impl StreamPrinter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Announce the unit about to be analyzed.
    pub fn begin(&self, label: &str) {
        if self.enabled {
            eprintln!("{} {}", "Analyzing".cyan().bold(), label);
        }
    }

    /// Print one streamed delta without a trailing newline.
    pub fn delta(&self, text: &str) {
        if self.enabled {
            eprint!("{text}");
            let _ = std::io::stderr().flush();
        }
    }

    /// Terminate the streamed block.
    pub fn end(&self) {
        if self.enabled {
            eprintln!();
            eprintln!();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_printer_is_silent() {
        // No panics or output side effects to assert on; exercise the paths.
        let printer = StreamPrinter::new(false);
        printer.begin("abc1234");
        printer.delta("chunk");
        printer.end();
    }
}
