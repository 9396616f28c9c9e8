//! Contains the common [`ErrorKind`] trait used by all errors to display user-facing error
//! messages.
//!
//! An [`Error`] pairs an [`ErrorKind`] with the regions of source code it points at. It can be
//! rendered in two ways: as a full [`ariadne`] report with highlighted spans (for terminals), or
//! through its [`Display`](std::fmt::Display) implementation, which only yields the one-line
//! message (for places like HTTP error bodies).

use ariadne::{Color, Label, Report, ReportKind};
use std::{fmt::{self, Debug}, ops::Range};

/// The color to use to highlight expressions.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// Represents any kind of error that can occur during some operation.
pub trait ErrorKind: Debug + Send + Sync {
    /// The main message of the error.
    fn message(&self) -> String;

    /// The messages attached to each span of the error, in the same order as the spans. Spans
    /// without a matching label are still highlighted.
    fn labels(&self) -> Vec<String> {
        Vec::new()
    }

    /// Optional help text shown below the report.
    fn help(&self) -> Option<String> {
        None
    }

    /// Builds the report for this error.
    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)> {
        let offset = spans.first().map_or(0, |span| span.start);
        let mut labels = self.labels().into_iter();
        let mut builder = Report::build(ReportKind::Error, src_id, offset)
            .with_message(self.message())
            .with_labels(
                spans
                    .iter()
                    .map(|span| {
                        let label = Label::new((src_id, span.clone())).with_color(EXPR);
                        match labels.next() {
                            Some(message) if !message.is_empty() => label.with_message(message),
                            _ => label,
                        }
                    })
                    .collect::<Vec<_>>(),
            );

        if let Some(help) = self.help() {
            builder.set_help(help);
        }
        builder.finish()
    }
}

/// An error associated with regions of source code that can be highlighted.
#[derive(Debug)]
pub struct Error {
    /// The regions of the source code that this error originated from.
    pub spans: Vec<Range<usize>>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,

    /// Whether the error is fatal. A parser that attempts several alternatives stops at the first
    /// fatal error instead of trying the next alternative.
    pub fatal: bool,
}

impl Error {
    /// Creates a new, non-fatal error with the given spans and kind.
    pub fn new(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind), fatal: false }
    }

    /// Creates a new fatal error with the given spans and kind.
    pub fn new_fatal(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind), fatal: true }
    }

    /// Build a report from this error kind.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        self.kind.build_report(src_id, &self.spans)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.kind.message())
    }
}

impl std::error::Error for Error {}
