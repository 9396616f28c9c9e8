pub mod ast;
pub mod error;
pub mod token;

use cas_error::ErrorKind;
use error::{kind, Error};
use super::tokenizer::{tokenize_complete, Token, TokenKind};
use std::{ops::Range, rc::Rc};

pub use token::op::{Associativity, Precedence};

/// The maximum number of non-whitespace tokens accepted by [`Parser::try_parse_full`].
pub const MAX_TOKENS: usize = 2048;

/// The maximum depth of nested sub-expressions.
pub const MAX_DEPTH: usize = 64;

/// Attempts to parse a value from the given stream of tokens, using multiple parsing functions
/// in order. The first function that succeeds is used to parse the value.
///
/// This macro also catches fatal errors and immediately short-circuits the parsing process.
///
/// If every function fails with a non-fatal error, the macro evaluates to the error of the last
/// attempted parsing function.
#[macro_export]
macro_rules! try_parse_catch_fatal {
    ($($expr:expr),+ $(,)?) => {{
        #[allow(unused_assignments, unused_mut)]
        let mut last;
        $(
            match $expr {
                Ok(value) => return Ok(value),
                Err(err) if err.fatal => return Err(err),
                // ignore this error and try the next parser, or return it
                Err(err) => last = err,
            }
        )+
        last
    }};
}

/// A high-level parser for mathematical expressions. This is the type to use to parse an
/// arbitrary piece of text into an abstract syntax tree.
///
/// Cloning the parser is cheap: the token stream is shared, and only the cursor is copied. The
/// parser relies on this to peek ahead.
#[derive(Debug, Clone)]
pub struct Parser<'source> {
    /// The tokens that this parser is currently parsing.
    tokens: Rc<[Token<'source>]>,

    /// The index of the **next** token to be parsed.
    cursor: usize,

    /// The current nesting depth.
    depth: usize,
}

impl<'source> Parser<'source> {
    /// Create a new parser for the given source.
    pub fn new(source: &'source str) -> Self {
        Self {
            tokens: tokenize_complete(source).into(),
            cursor: 0,
            depth: 0,
        }
    }

    /// Creates an error that points at the current token, or the end of the source code if the
    /// cursor is at the end of the stream.
    pub fn error(&self, kind: impl ErrorKind + 'static) -> Error {
        Error::new(vec![self.span()], kind)
    }

    /// Creates a fatal error that points at the current token, or the end of the source code if
    /// the cursor is at the end of the stream.
    pub fn error_fatal(&self, kind: impl ErrorKind + 'static) -> Error {
        Error::new_fatal(vec![self.span()], kind)
    }

    /// Returns a span pointing at the end of the source code.
    pub fn eof_span(&self) -> Range<usize> {
        self.tokens.last().map_or(0..0, |token| token.span.end..token.span.end)
    }

    /// Returns the span of the current non-whitespace token, or the end of the source code if
    /// there is none.
    pub fn span(&self) -> Range<usize> {
        self.tokens[self.cursor.min(self.tokens.len())..]
            .iter()
            .find(|token| !token.is_whitespace())
            .map_or(self.eof_span(), |token| token.span.clone())
    }

    /// Returns the index of the next token to be parsed.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Moves this parser's cursor to the cursor of another parser over the same source.
    pub fn set_cursor(&mut self, other: &Parser) {
        self.cursor = other.cursor;
    }

    /// Returns the previous token. The cursor is not moved. Returns [`None`] if the cursor is at
    /// the beginning of the stream.
    pub fn prev_token(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.cursor.checked_sub(1)?)
    }

    /// Returns the current token. The cursor is not moved. Returns [`None`] if the cursor is at
    /// the end of the stream.
    pub fn current_token(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.cursor)
    }

    /// Advances the cursor past any whitespace tokens.
    pub fn advance_past_whitespace(&mut self) {
        while let Some(token) = self.current_token() {
            if !token.is_whitespace() {
                break;
            }
            self.cursor += 1;
        }
    }

    /// Returns the next token to be parsed, then advances the cursor. Whitespace tokens are
    /// skipped.
    ///
    /// Returns an EOF error if there are no more tokens.
    pub fn next_token(&mut self) -> Result<Token<'source>, Error> {
        self.advance_past_whitespace();
        match self.tokens.get(self.cursor) {
            Some(token) => {
                self.cursor += 1;
                // cloning is cheap: only Range<_> is cloned
                Ok(token.clone())
            },
            None => Err(self.error(kind::UnexpectedEof)),
        }
    }

    /// Returns a fatal error if the nesting limit would be reached `levels` levels below the
    /// current one.
    pub fn check_depth(&self, levels: usize) -> Result<(), Error> {
        if self.depth + levels >= MAX_DEPTH {
            Err(self.error_fatal(kind::TooDeeplyNested))
        } else {
            Ok(())
        }
    }

    /// Runs the given parsing function one nesting level deeper. Returns a fatal error instead
    /// if the nesting limit has been reached.
    pub fn nested<T, F>(&mut self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Parser<'source>) -> Result<T, Error>,
    {
        self.check_depth(0)?;
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Speculatively parses a value from the given stream of tokens. This function can be used
    /// in the [`Parse::parse`] implementation of a type with the given [`Parser`], as it will
    /// automatically backtrack the cursor position if parsing fails.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse<T: Parse>(&mut self) -> Result<T, Error> {
        self.try_parse_with_fn(T::parse)
    }

    /// Speculatively parses a value from the given stream of tokens, using a custom parsing
    /// function to parse the value. This function can be used in the [`Parse::parse`]
    /// implementation of a type with the given [`Parser`], as it will automatically backtrack the
    /// cursor position if parsing fails.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse_with_fn<T, F>(&mut self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Parser<'source>) -> Result<T, Error>,
    {
        let start = self.cursor;
        match f(self) {
            Ok(value) => Ok(value),
            err => {
                self.cursor = start;
                err
            },
        }
    }

    /// Speculatively parses a value from the given stream of tokens, with a validation predicate.
    /// The value must parse successfully, **and** the predicate must return [`Ok`] for this
    /// function to return successfully.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse_then<T: Parse, F>(&mut self, predicate: F) -> Result<T, Error>
    where
        F: FnOnce(&T, &Parser) -> Result<(), Error>,
    {
        let start = self.cursor;

        // closure workaround allows us to use `?` in the closure
        let compute = || {
            let value = T::parse(self)?;
            predicate(&value, self)?;
            Ok(value)
        };

        match compute() {
            Ok(value) => Ok(value),
            err => {
                self.cursor = start;
                err
            },
        }
    }

    /// Attempts to parse a value from the given stream of tokens. All the tokens must be consumed
    /// by the parser; if not, an error is returned.
    pub fn try_parse_full<T: Parse>(&mut self) -> Result<T, Error> {
        let significant = self.tokens.iter().filter(|token| !token.is_whitespace()).count();
        if significant > MAX_TOKENS {
            return Err(Error::new_fatal(vec![0..0], kind::TooLong { limit: MAX_TOKENS }));
        }

        let value = T::parse(self)?;
        self.advance_past_whitespace();
        match self.current_token() {
            None => Ok(value),
            Some(token) if token.kind == TokenKind::CloseParen => {
                Err(self.error_fatal(kind::UnclosedParenthesis { opening: false }))
            },
            Some(_) => Err(self.error(kind::ExpectedEof)),
        }
    }
}

/// Any type that can be parsed from a source of tokens.
pub trait Parse: Sized {
    /// Parses a value from the given stream of tokens, advancing the stream past the consumed
    /// tokens if parsing is successful.
    ///
    /// This function should be used by consumers of the library.
    fn parse(input: &mut Parser) -> Result<Self, Error>;
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    use ast::{
        binary::Binary,
        call::Call,
        expr::Expr,
        literal::{Literal, LitFloat, LitInt, LitSym},
        paren::Paren,
        unary::Unary,
    };
    use token::op::{BinOp, BinOpKind, UnaryOp, UnaryOpKind};

    fn parse(source: &str) -> Expr {
        Parser::new(source).try_parse_full::<Expr>().unwrap()
    }

    fn parse_err(source: &str) -> Error {
        Parser::new(source).try_parse_full::<Expr>().unwrap_err()
    }

    #[test]
    fn literal_int() {
        assert_eq!(parse("16"), Expr::Literal(Literal::Integer(LitInt {
            value: "16".to_string(),
            span: 0..2,
        })));
    }

    #[test]
    fn literal_float() {
        assert_eq!(parse("3.14"), Expr::Literal(Literal::Float(LitFloat {
            value: "3.14".to_string(),
            span: 0..4,
        })));
    }

    #[test]
    fn literal_symbol() {
        assert_eq!(parse("theta"), Expr::Literal(Literal::Symbol(LitSym {
            name: "theta".to_string(),
            span: 0..5,
        })));
    }

    #[test]
    fn surrounding_whitespace() {
        assert_eq!(parse("  x  "), Expr::Literal(Literal::Symbol(LitSym {
            name: "x".to_string(),
            span: 2..3,
        })));
    }

    #[test]
    fn binary_left_associativity() {
        assert_eq!(parse("1 - 2 - 3"), Expr::Binary(Binary {
            lhs: Box::new(Expr::Binary(Binary {
                lhs: Box::new(Expr::Literal(Literal::Integer(LitInt {
                    value: "1".to_string(),
                    span: 0..1,
                }))),
                op: BinOp {
                    kind: BinOpKind::Sub,
                    implicit: false,
                    span: 2..3,
                },
                rhs: Box::new(Expr::Literal(Literal::Integer(LitInt {
                    value: "2".to_string(),
                    span: 4..5,
                }))),
                span: 0..5,
            })),
            op: BinOp {
                kind: BinOpKind::Sub,
                implicit: false,
                span: 6..7,
            },
            rhs: Box::new(Expr::Literal(Literal::Integer(LitInt {
                value: "3".to_string(),
                span: 8..9,
            }))),
            span: 0..9,
        }));
    }

    #[test]
    fn exponent_right_associativity() {
        assert_eq!(parse("2^3^4").to_string(), "2 ^ 3 ^ 4");
        match parse("2^3^4") {
            Expr::Binary(Binary { lhs, op, rhs, .. }) => {
                assert_eq!(op.kind, BinOpKind::Exp);
                assert_eq!(lhs.to_string(), "2");
                assert_eq!(rhs.to_string(), "3 ^ 4");
            },
            other => panic!("expected a binary expression, got {:?}", other),
        }
    }

    #[test]
    fn double_star_is_exponent() {
        assert_eq!(parse("x**2").to_string(), parse("x^2").to_string());
    }

    #[test]
    fn precedence_of_mixed_operators() {
        match parse("1 + 2 * 3 ^ 2") {
            Expr::Binary(Binary { lhs, op, rhs, .. }) => {
                assert_eq!(op.kind, BinOpKind::Add);
                assert_eq!(lhs.to_string(), "1");
                assert_eq!(rhs.to_string(), "2 * 3 ^ 2");
            },
            other => panic!("expected a binary expression, got {:?}", other),
        }
    }

    #[test]
    fn implicit_number_symbol() {
        assert_eq!(parse("2x"), Expr::Binary(Binary {
            lhs: Box::new(Expr::Literal(Literal::Integer(LitInt {
                value: "2".to_string(),
                span: 0..1,
            }))),
            op: BinOp {
                kind: BinOpKind::Mul,
                implicit: true,
                span: 1..1,
            },
            rhs: Box::new(Expr::Literal(Literal::Symbol(LitSym {
                name: "x".to_string(),
                span: 1..2,
            }))),
            span: 0..2,
        }));
    }

    #[test]
    fn implicit_adjacent_symbols() {
        match parse("x y") {
            Expr::Binary(Binary { op, .. }) => {
                assert_eq!(op.kind, BinOpKind::Mul);
                assert!(op.implicit);
            },
            other => panic!("expected a binary expression, got {:?}", other),
        }
    }

    #[test]
    fn implicit_split_names() {
        assert_eq!(parse("xy").to_string(), "x * y");
        assert_eq!(parse("2xy^2").to_string(), "2 * x * y ^ 2");
        assert_eq!(parse("ab(c + 1)").to_string(), "a * b * (c + 1)");
        assert_eq!(parse("v_0 t").to_string(), "v_0 * t");
    }

    #[test]
    fn implicit_parenthesized_groups() {
        assert_eq!(parse("(x-2)(x+2)").to_string(), "(x - 2) * (x + 2)");
        assert_eq!(parse("2(x+1)").to_string(), "2 * (x + 1)");
        assert_eq!(parse("x(x+1)").to_string(), "x * (x + 1)");
    }

    #[test]
    fn implicit_binds_like_multiplication() {
        match parse("1 + 2x^2 y") {
            Expr::Binary(Binary { lhs, op, rhs, .. }) => {
                assert_eq!(op.kind, BinOpKind::Add);
                assert_eq!(lhs.to_string(), "1");
                assert_eq!(rhs.to_string(), "2 * x ^ 2 * y");
            },
            other => panic!("expected a binary expression, got {:?}", other),
        }
    }

    #[test]
    fn unary_negation_binds_looser_than_exponent() {
        assert_eq!(parse("-x^2"), Expr::Unary(Unary {
            operand: Box::new(Expr::Binary(Binary {
                lhs: Box::new(Expr::Literal(Literal::Symbol(LitSym {
                    name: "x".to_string(),
                    span: 1..2,
                }))),
                op: BinOp {
                    kind: BinOpKind::Exp,
                    implicit: false,
                    span: 2..3,
                },
                rhs: Box::new(Expr::Literal(Literal::Integer(LitInt {
                    value: "2".to_string(),
                    span: 3..4,
                }))),
                span: 1..4,
            })),
            op: UnaryOp {
                kind: UnaryOpKind::Neg,
                span: 0..1,
            },
            span: 0..4,
        }));
    }

    #[test]
    fn factorial() {
        assert_eq!(parse("3!"), Expr::Unary(Unary {
            operand: Box::new(Expr::Literal(Literal::Integer(LitInt {
                value: "3".to_string(),
                span: 0..1,
            }))),
            op: UnaryOp {
                kind: UnaryOpKind::Factorial,
                span: 1..2,
            },
            span: 0..2,
        }));
    }

    #[test]
    fn function_call() {
        assert_eq!(parse("sin(x)"), Expr::Call(Call {
            name: LitSym {
                name: "sin".to_string(),
                span: 0..3,
            },
            args: vec![Expr::Literal(Literal::Symbol(LitSym {
                name: "x".to_string(),
                span: 4..5,
            }))],
            span: 0..6,
        }));
    }

    #[test]
    fn function_call_two_args() {
        assert_eq!(parse("log(8, 2)").to_string(), "log(8, 2)");
    }

    #[test]
    fn implicit_application() {
        assert_eq!(parse("sin x^2").to_string(), "sin(x ^ 2)");
        assert_eq!(parse("2 sqrt x").to_string(), "2 * sqrt(x)");
    }

    #[test]
    fn nested_parens() {
        let expr = parse("((x))");
        match expr {
            Expr::Paren(paren) => assert_eq!(paren.into_innermost().to_string(), "x"),
            other => panic!("expected parentheses, got {:?}", other),
        }
    }

    #[test]
    fn paren_struct() {
        assert_eq!(parse("(1)"), Expr::Paren(Paren {
            expr: Box::new(Expr::Literal(Literal::Integer(LitInt {
                value: "1".to_string(),
                span: 1..2,
            }))),
            span: 0..3,
        }));
    }

    #[test]
    fn empty_input() {
        assert_eq!(parse_err("").to_string(), "unexpected end of input");
        assert_eq!(parse_err("   ").to_string(), "unexpected end of input");
    }

    #[test]
    fn unclosed_parenthesis() {
        let err = parse_err("(x + 1");
        assert!(err.fatal);
        assert_eq!(err.to_string(), "unclosed parenthesis");
        assert_eq!(err.spans, vec![0..1]);
    }

    #[test]
    fn unclosed_parenthesis_after_implicit_multiplication() {
        assert_eq!(parse_err("2(x + 1").to_string(), "unclosed parenthesis");
    }

    #[test]
    fn unmatched_closing_parenthesis() {
        let err = parse_err("x + 1)");
        assert_eq!(err.to_string(), "unmatched closing parenthesis");
        assert_eq!(err.spans, vec![5..6]);
    }

    #[test]
    fn empty_parenthesis() {
        assert_eq!(parse_err("2 * ()").to_string(), "missing expression inside parentheses");
    }

    #[test]
    fn dangling_operator() {
        assert_eq!(parse_err("1 +").to_string(), "unexpected end of input");
    }

    #[test]
    fn assign_is_not_an_expression() {
        let err = parse_err("y = 2");
        assert_eq!(err.to_string(), "expected end of input");
        assert_eq!(err.spans, vec![2..3]);
    }

    #[test]
    fn missing_function_argument() {
        assert_eq!(parse_err("sin").to_string(), "missing argument to the function `sin`");
    }

    #[test]
    fn wrong_argument_count() {
        assert_eq!(
            parse_err("sin(x, y)").to_string(),
            "the function `sin` takes 1 argument(s), but 2 were given",
        );
    }

    #[test]
    fn stray_symbol() {
        assert!(parse_err("x $ 2").to_string().starts_with("expected end of input"));
    }

    #[test]
    fn too_deeply_nested() {
        let source = format!("{}x{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert_eq!(parse_err(&source).to_string(), "expression is nested too deeply");
    }

    #[test]
    fn too_deeply_nested_applications() {
        let source = format!("{}x", "sin ".repeat(MAX_DEPTH));
        assert_eq!(parse_err(&source).to_string(), "expression is nested too deeply");

        let source = format!("{}x{}", "sin(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert_eq!(parse_err(&source).to_string(), "expression is nested too deeply");
    }

    #[test]
    fn too_deeply_nested_factorials() {
        let source = format!("3{}", "!".repeat(MAX_DEPTH));
        assert_eq!(parse_err(&source).to_string(), "expression is nested too deeply");
        assert_eq!(parse("3!!").to_string(), "3!!");
    }

    #[test]
    fn nesting_limit_fits_a_small_stack() {
        let sources = [
            format!("{}x{}", "sin(".repeat(250), ")".repeat(250)),
            format!("{}x", "sin ".repeat(250)),
            format!("3{}", "!".repeat(500)),
            format!("{}x", "-".repeat(500)),
            format!("{}x{}", "(".repeat(MAX_DEPTH - 8), ")".repeat(MAX_DEPTH - 8)),
        ];

        let results = std::thread::Builder::new()
            .stack_size(2 * 1024 * 1024)
            .spawn(move || {
                sources
                    .iter()
                    .map(|source| Parser::new(source).try_parse_full::<Expr>().map(|_| ()))
                    .collect::<Vec<_>>()
            })
            .unwrap()
            .join()
            .unwrap();

        for result in &results[..4] {
            assert_eq!(result.as_ref().unwrap_err().to_string(), "expression is nested too deeply");
        }
        assert!(results[4].is_ok());
    }

    #[test]
    fn too_long() {
        let source = vec!["x"; MAX_TOKENS + 1].join(" ");
        assert!(parse_err(&source).to_string().starts_with("expression is too long"));
    }
}
