//! The kinds of errors the parser can report.

use cas_error::ErrorKind;
use crate::tokenizer::TokenKind;

/// An intentionally useless error. This should only be used for non-fatal errors, as it contains
/// no useful information.
#[derive(Debug, Clone, PartialEq)]
pub struct NonFatal;

impl ErrorKind for NonFatal {
    fn message(&self) -> String {
        "an internal non-fatal error occurred while parsing".to_owned()
    }

    fn labels(&self) -> Vec<String> {
        vec!["here".to_owned()]
    }
}

/// The end of the source code was reached unexpectedly.
#[derive(Debug, Clone, PartialEq)]
pub struct UnexpectedEof;

impl ErrorKind for UnexpectedEof {
    fn message(&self) -> String {
        "unexpected end of input".to_owned()
    }

    fn labels(&self) -> Vec<String> {
        vec!["you might need to add another expression here".to_owned()]
    }
}

/// The end of the source code was expected, but something else was found.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectedEof;

impl ErrorKind for ExpectedEof {
    fn message(&self) -> String {
        "expected end of input".to_owned()
    }

    fn labels(&self) -> Vec<String> {
        vec!["I could not understand the remaining expression here".to_owned()]
    }

    fn help(&self) -> Option<String> {
        Some("an answer may contain at most one `=`".to_owned())
    }
}

/// An unexpected token was encountered.
#[derive(Debug, Clone, PartialEq)]
pub struct UnexpectedToken {
    /// The token(s) that were expected.
    pub expected: &'static [TokenKind],

    /// The token that was found.
    pub found: TokenKind,
}

impl ErrorKind for UnexpectedToken {
    fn message(&self) -> String {
        format!("unexpected token: found {:?}", self.found)
    }

    fn labels(&self) -> Vec<String> {
        let expected = self.expected
            .iter()
            .map(|kind| format!("{:?}", kind))
            .collect::<Vec<_>>()
            .join(", ");
        vec![format!("expected one of: {}", expected)]
    }
}

/// A parenthesis was not closed, or a closing parenthesis has no opening partner.
#[derive(Debug, Clone, PartialEq)]
pub struct UnclosedParenthesis {
    /// Whether the unmatched parenthesis is an opening one.
    pub opening: bool,
}

impl ErrorKind for UnclosedParenthesis {
    fn message(&self) -> String {
        if self.opening {
            "unclosed parenthesis".to_owned()
        } else {
            "unmatched closing parenthesis".to_owned()
        }
    }

    fn labels(&self) -> Vec<String> {
        vec!["this parenthesis".to_owned()]
    }

    fn help(&self) -> Option<String> {
        Some(if self.opening {
            "add a closing parenthesis `)` somewhere after this".to_owned()
        } else {
            "add an opening parenthesis `(` somewhere before this".to_owned()
        })
    }
}

/// Parentheses were used without an expression inside.
#[derive(Debug, Clone, PartialEq)]
pub struct EmptyParenthesis;

impl ErrorKind for EmptyParenthesis {
    fn message(&self) -> String {
        "missing expression inside parentheses".to_owned()
    }

    fn labels(&self) -> Vec<String> {
        vec!["add an expression here".to_owned()]
    }
}

/// A built-in function name was used without an argument.
#[derive(Debug, Clone, PartialEq)]
pub struct MissingArgument {
    /// The name of the function.
    pub name: String,
}

impl ErrorKind for MissingArgument {
    fn message(&self) -> String {
        format!("missing argument to the function `{}`", self.name)
    }

    fn labels(&self) -> Vec<String> {
        vec!["this function".to_owned()]
    }

    fn help(&self) -> Option<String> {
        Some(format!("write the argument in parentheses, like `{}(x)`", self.name))
    }
}

/// A built-in function was called with the wrong number of arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct WrongArgumentCount {
    /// The name of the function.
    pub name: String,

    /// The smallest number of arguments the function accepts.
    pub min: usize,

    /// The largest number of arguments the function accepts.
    pub max: usize,

    /// The number of arguments given.
    pub given: usize,
}

impl ErrorKind for WrongArgumentCount {
    fn message(&self) -> String {
        let expected = if self.min == self.max {
            self.min.to_string()
        } else {
            format!("{} to {}", self.min, self.max)
        };
        format!(
            "the function `{}` takes {} argument(s), but {} were given",
            self.name, expected, self.given,
        )
    }

    fn labels(&self) -> Vec<String> {
        vec!["this call".to_owned()]
    }
}

/// The expression is nested too deeply to be parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct TooDeeplyNested;

impl ErrorKind for TooDeeplyNested {
    fn message(&self) -> String {
        "expression is nested too deeply".to_owned()
    }

    fn labels(&self) -> Vec<String> {
        vec!["nesting limit reached here".to_owned()]
    }
}

/// The expression contains too many tokens to be parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct TooLong {
    /// The maximum number of tokens accepted.
    pub limit: usize,
}

impl ErrorKind for TooLong {
    fn message(&self) -> String {
        format!("expression is too long (more than {} tokens)", self.limit)
    }
}
