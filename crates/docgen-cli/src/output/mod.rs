//! Output formatting

use docgen_core::{Diagnostic, Severity};

use crate::args::MessageFormat;

/// Stream diagnostics are written to
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// Output formatter for diagnostics
pub struct OutputFormatter {
    format: MessageFormat,
    json_stream: Stream,
}

impl OutputFormatter {
    pub fn new(format: MessageFormat) -> Self {
        Self {
            format,
            json_stream: Stream::Stdout,
        }
    }

    /// Redirect JSON diagnostics, e.g. when stdout carries the document
    pub fn with_json_stream(mut self, stream: Stream) -> Self {
        self.json_stream = stream;
        self
    }

    /// Stream the configured format is printed to
    pub fn stream(&self) -> Stream {
        match self.format {
            MessageFormat::Human => Stream::Stderr,
            MessageFormat::Json => self.json_stream,
        }
    }

    /// Print diagnostics in the configured format
    pub fn print_diagnostics(&self, diagnostics: &[Diagnostic]) {
        if diagnostics.is_empty() {
            return;
        }
        let text = self.render(diagnostics);
        match self.stream() {
            Stream::Stdout => print!("{}", text),
            Stream::Stderr => eprint!("{}", text),
        }
    }

    fn render(&self, diagnostics: &[Diagnostic]) -> String {
        match self.format {
            MessageFormat::Human => diagnostics.iter().map(format_human).collect(),
            MessageFormat::Json => format_json(diagnostics),
        }
    }
}

fn format_human(diag: &Diagnostic) -> String {
    let severity_str = match diag.severity {
        Severity::Error => "\x1b[31merror\x1b[0m",
        Severity::Warning => "\x1b[33mwarning\x1b[0m",
    };

    let mut out = format!("{}[{}]: {}\n", severity_str, diag.code(), diag.message);

    if let Some(file) = &diag.file {
        match &diag.span {
            Some(span) => out.push_str(&format!("  --> {}:{}:{}\n", file, span.line, span.column)),
            None => out.push_str(&format!("  --> {}\n", file)),
        }
    }

    if let Some(statement) = &diag.statement {
        let line = diag.span.map(|s| s.line).unwrap_or(0);
        out.push_str("   |\n");
        out.push_str(&format!("{:>3} | {}\n", line, statement));
    }

    if let Some(help) = &diag.help {
        out.push_str(&format!("   = help: {}\n", help));
    }

    out.push('\n');
    out
}

fn format_json(diagnostics: &[Diagnostic]) -> String {
    let entries: Vec<serde_json::Value> = diagnostics
        .iter()
        .map(|d| {
            serde_json::json!({
                "code": d.code(),
                "rule": d.kind.name(),
                "severity": d.severity,
                "message": d.message,
                "file": d.file,
                "span": d.span,
                "statement": d.statement,
                "help": d.help,
            })
        })
        .collect();
    let output = serde_json::json!({ "diagnostics": entries });
    match serde_json::to_string_pretty(&output) {
        Ok(json) => format!("{}\n", json),
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize diagnostics");
            String::new()
        }
    }
}
