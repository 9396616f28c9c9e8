pub mod token;

use crate::parser::ast::call::builtin_arity;
use logos::{Lexer, Logos};
pub use token::{Token, TokenKind};

/// Returns an iterator over the token kinds produced by the tokenizer.
pub fn tokenize(input: &str) -> Lexer<TokenKind> {
    TokenKind::lexer(input)
}

/// Greek letter names. These are kept as single symbols, so `theta` is not `t * h * e * t * a`.
const GREEK_NAMES: &[&str] = &[
    "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta", "iota", "kappa",
    "lambda", "mu", "nu", "xi", "omicron", "pi", "rho", "sigma", "tau", "upsilon", "phi", "chi",
    "psi", "omega",
];

/// Returns true if the name is written as a product of single-letter symbols, as in `xy`.
///
/// Built-in function names, Greek letter names and names containing `_` stand for themselves.
pub fn is_splittable(name: &str) -> bool {
    name.chars().nth(1).is_some()
        && !name.contains('_')
        && !GREEK_NAMES.contains(&name)
        && builtin_arity(name).is_none()
}

/// Splits a splittable [`TokenKind::Name`] token into one token per letter. Runs of digits
/// become a single [`TokenKind::Int`] token, so `x2y` is `x`, `2`, `y`.
fn split_name<'source>(token: Token<'source>, tokens: &mut Vec<Token<'source>>) {
    let (start, lexeme) = (token.span.start, token.lexeme);
    let mut chars = lexeme.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        let mut end = offset + c.len_utf8();
        let kind = if c.is_ascii_digit() {
            while let Some(&(next, digit)) = chars.peek() {
                if !digit.is_ascii_digit() {
                    break;
                }
                end = next + digit.len_utf8();
                chars.next();
            }
            TokenKind::Int
        } else {
            TokenKind::Name
        };

        tokens.push(Token {
            span: start + offset..start + end,
            kind,
            lexeme: &lexeme[offset..end],
        });
    }
}

/// Returns an owned array containing all of the tokens produced by the tokenizer. This allows us
/// to backtrack in case of an error.
///
/// Input the lexer cannot match is kept as [`TokenKind::Symbol`] tokens, so the parser can point
/// at it. Names such as `xy` are split into one symbol per letter (see [`is_splittable`]), so
/// the parser sees them as implicit multiplication.
pub fn tokenize_complete(input: &str) -> Box<[Token]> {
    let mut lexer = tokenize(input);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let token = Token {
            span: lexer.span(),
            kind: result.unwrap_or(TokenKind::Symbol),
            lexeme: lexer.slice(),
        };

        if token.kind == TokenKind::Name && is_splittable(token.lexeme) {
            split_name(token, &mut tokens);
        } else {
            tokens.push(token);
        }
    }

    tokens.into_boxed_slice()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    /// Compares the tokens produced by the tokenizer to the raw expected tokens.
    fn compare_tokens<'source, const N: usize>(input: &'source str, expected: [(TokenKind, &'source str); N]) {
        let mut lexer = tokenize(input);

        for (expected_kind, expected_lexeme) in expected.into_iter() {
            assert_eq!(lexer.next(), Some(Ok(expected_kind)));
            assert_eq!(lexer.slice(), expected_lexeme);
        }

        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn basic_expr() {
        compare_tokens(
            "1 + 2",
            [
                (TokenKind::Int, "1"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Add, "+"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Int, "2"),
            ],
        );
    }

    #[test]
    fn implicit_multiplication_tokens() {
        compare_tokens(
            "2x(y1 - 3.5)",
            [
                (TokenKind::Int, "2"),
                (TokenKind::Name, "x"),
                (TokenKind::OpenParen, "("),
                (TokenKind::Name, "y1"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Sub, "-"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Float, "3.5"),
                (TokenKind::CloseParen, ")"),
            ],
        );
    }

    #[test]
    fn power_operators() {
        compare_tokens(
            "x**2^3",
            [
                (TokenKind::Name, "x"),
                (TokenKind::Exp, "**"),
                (TokenKind::Int, "2"),
                (TokenKind::Exp, "^"),
                (TokenKind::Int, "3"),
            ],
        );
    }

    #[test]
    fn scientific_and_bare_decimals() {
        compare_tokens(
            "1e-9 .5 2.",
            [
                (TokenKind::Float, "1e-9"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Float, ".5"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Float, "2."),
            ],
        );
    }

    #[test]
    fn unicode_operators() {
        compare_tokens(
            "3×π−1÷2",
            [
                (TokenKind::Int, "3"),
                (TokenKind::Mul, "×"),
                (TokenKind::Name, "π"),
                (TokenKind::Sub, "−"),
                (TokenKind::Int, "1"),
                (TokenKind::Div, "÷"),
                (TokenKind::Int, "2"),
            ],
        );
    }

    #[test]
    fn equation_and_stray_symbols() {
        compare_tokens(
            "x = 2 $",
            [
                (TokenKind::Name, "x"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Assign, "="),
                (TokenKind::Whitespace, " "),
                (TokenKind::Int, "2"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Symbol, "$"),
            ],
        );
    }

    /// The kinds and lexemes of the tokens kept by [`tokenize_complete`], without whitespace.
    fn complete(input: &str) -> Vec<(TokenKind, &str)> {
        tokenize_complete(input)
            .iter()
            .filter(|token| !token.is_whitespace())
            .map(|token| (token.kind, token.lexeme))
            .collect()
    }

    #[test]
    fn names_split_into_letters() {
        assert_eq!(complete("2xy"), vec![
            (TokenKind::Int, "2"),
            (TokenKind::Name, "x"),
            (TokenKind::Name, "y"),
        ]);
        assert_eq!(complete("ab12c"), vec![
            (TokenKind::Name, "a"),
            (TokenKind::Name, "b"),
            (TokenKind::Int, "12"),
            (TokenKind::Name, "c"),
        ]);
    }

    #[test]
    fn split_spans_point_into_the_name() {
        let tokens = tokenize_complete("1 + xy");
        let spans = tokens.iter().skip(4).map(|token| token.span.clone()).collect::<Vec<_>>();
        assert_eq!(spans, vec![4..5, 5..6]);
    }

    #[test]
    fn names_kept_whole() {
        assert_eq!(complete("sin theta"), vec![
            (TokenKind::Name, "sin"),
            (TokenKind::Name, "theta"),
        ]);
        assert_eq!(complete("pi v_0 x"), vec![
            (TokenKind::Name, "pi"),
            (TokenKind::Name, "v_0"),
            (TokenKind::Name, "x"),
        ]);
        assert!(!is_splittable("log10"));
        assert!(is_splittable("xsin"));
    }
}
