use ariadne::Source;
use std::io;
use thiserror::Error;

/// The text of a student or reference answer is not valid mathematical notation.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The text could not be tokenized or does not follow the grammar.
    #[error("`{text}`: {source}")]
    Syntax {
        /// The text that failed to parse.
        text: String,

        /// The parser's error, with spans into `text`.
        source: cas_error::Error,
    },

    /// The text parsed, but contains a number literal that can't be represented.
    #[error("`{text}`: {source}")]
    Literal {
        /// The text that failed to parse.
        text: String,

        /// The conversion error, with spans into `text`.
        source: cas_error::Error,
    },
}

impl ParseError {
    /// The text that failed to parse. For an equation, this is only the side that failed.
    pub fn text(&self) -> &str {
        match self {
            Self::Syntax { text, .. } | Self::Literal { text, .. } => text,
        }
    }

    /// The underlying spanned error.
    pub fn error(&self) -> &cas_error::Error {
        match self {
            Self::Syntax { source, .. } | Self::Literal { source, .. } => source,
        }
    }

    /// Writes a report of the error, highlighting the offending part of the text.
    pub fn write_report(&self, writer: impl io::Write) -> io::Result<()> {
        self.error()
            .build_report("input")
            .write(("input", Source::from(self.text())), writer)
    }

    /// Reports the error to stderr.
    pub fn report_to_stderr(&self) -> io::Result<()> {
        self.write_report(io::stderr())
    }
}

#[cfg(test)]
mod tests {
    use crate::form::parse;
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn display_names_the_text() {
        let err = parse("x + ").unwrap_err();
        assert!(matches!(err, ParseError::Syntax { .. }));
        assert_eq!(err.text(), "x +");
        assert!(err.to_string().starts_with("`x +`: "));
    }

    #[test]
    fn report_contains_message() {
        let err = parse("(x + 1").unwrap_err();
        let mut buf = Vec::new();
        err.write_report(&mut buf).unwrap();

        let report = String::from_utf8(strip_ansi_escapes::strip(buf)).unwrap();
        assert!(report.contains(&err.error().to_string()));
    }
}
