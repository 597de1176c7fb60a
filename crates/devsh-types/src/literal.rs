//! Typed constants parsed from command text.
//!
//! A literal is either a double-quoted string or a base-10 integer. There is
//! no escaping and no other type: anything else is rejected as ambiguous.

use std::fmt;
use std::str::FromStr;

use crate::error::{DevshError, Result};

/// A typed method-call argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// `"text"` with the quotes removed.
    Str(String),
    /// A base-10 integer, optionally negative.
    Int(i64),
}

impl Literal {
    /// Parse a single argument token.
    ///
    /// `"x"` becomes [`Literal::Str`] (provided `x` holds no quote), a token
    /// matching `-?[0-9]+` becomes [`Literal::Int`]. Every other token fails
    /// with [`DevshError::AmbiguousParameterType`].
    pub fn parse(token: &str) -> Result<Self> {
        let parts: Vec<&str> = token.split('"').collect();
        match parts.as_slice() {
            ["", inner, ""] => Ok(Self::Str((*inner).to_string())),
            [bare] => parse_integer(bare)
                .map(Self::Int)
                .ok_or_else(|| DevshError::AmbiguousParameterType(token.to_string())),
            _ => Err(DevshError::AmbiguousParameterType(token.to_string())),
        }
    }

    /// The string payload, if this is a string literal.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            Self::Int(_) => None,
        }
    }

    /// The integer payload, if this is an integer literal.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Str(_) => None,
        }
    }
}

impl FromStr for Literal {
    type Err = DevshError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "\"{s}\""),
            Self::Int(n) => write!(f, "{n}"),
        }
    }
}

/// Strict `-?[0-9]+` integer parse. `str::parse` alone would also accept a
/// leading `+`.
fn parse_integer(s: &str) -> Option<i64> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_string() {
        assert_eq!(Literal::parse("\"slow\"").unwrap(), Literal::Str("slow".into()));
    }

    #[test]
    fn empty_quoted_string() {
        assert_eq!(Literal::parse("\"\"").unwrap(), Literal::Str(String::new()));
    }

    #[test]
    fn quoted_string_keeps_inner_whitespace_and_commas() {
        assert_eq!(
            Literal::parse("\" a, b \"").unwrap(),
            Literal::Str(" a, b ".into())
        );
    }

    #[test]
    fn positive_integer() {
        assert_eq!(Literal::parse("3").unwrap(), Literal::Int(3));
    }

    #[test]
    fn negative_integer() {
        assert_eq!(Literal::parse("-17").unwrap(), Literal::Int(-17));
    }

    #[test]
    fn leading_plus_rejected() {
        assert!(matches!(
            Literal::parse("+5"),
            Err(DevshError::AmbiguousParameterType(_))
        ));
    }

    #[test]
    fn bare_word_rejected() {
        assert!(matches!(
            Literal::parse("slow"),
            Err(DevshError::AmbiguousParameterType(t)) if t == "slow"
        ));
    }

    #[test]
    fn float_rejected() {
        assert!(Literal::parse("1.5").is_err());
    }

    #[test]
    fn lone_minus_rejected() {
        assert!(Literal::parse("-").is_err());
    }

    #[test]
    fn unterminated_quote_rejected() {
        assert!(Literal::parse("\"open").is_err());
    }

    #[test]
    fn text_around_quotes_rejected() {
        assert!(Literal::parse("a\"b\"c").is_err());
    }

    #[test]
    fn embedded_quote_rejected() {
        assert!(Literal::parse("\"a\"b\"").is_err());
    }

    #[test]
    fn overflow_rejected() {
        assert!(Literal::parse("99999999999999999999").is_err());
    }

    #[test]
    fn from_str_matches_parse() {
        let lit: Literal = "\"x\"".parse().unwrap();
        assert_eq!(lit, Literal::Str("x".into()));
    }

    #[test]
    fn accessors() {
        assert_eq!(Literal::Int(4).as_int(), Some(4));
        assert_eq!(Literal::Int(4).as_str(), None);
        assert_eq!(Literal::Str("a".into()).as_str(), Some("a"));
        assert_eq!(Literal::Str("a".into()).as_int(), None);
    }

    #[test]
    fn display_requotes_strings() {
        assert_eq!(Literal::Str("slow".into()).to_string(), "\"slow\"");
        assert_eq!(Literal::Int(-2).to_string(), "-2");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn quoted_tokens_are_strings(inner in "[^\"]{0,40}") {
                let token = format!("\"{inner}\"");
                prop_assert_eq!(Literal::parse(&token).unwrap(), Literal::Str(inner));
            }

            #[test]
            fn digit_tokens_are_integers(token in "-?[0-9]{1,18}") {
                let expected: i64 = token.parse().unwrap();
                prop_assert_eq!(Literal::parse(&token).unwrap(), Literal::Int(expected));
            }

            #[test]
            fn other_tokens_are_ambiguous(token in "[a-zA-Z_.+ ]{1,20}") {
                prop_assert!(matches!(
                    Literal::parse(&token),
                    Err(DevshError::AmbiguousParameterType(_))
                ));
            }
        }
    }
}
