#[cfg(feature = "serde")]
use serde::Serialize;
use thiserror::Error;
///why an expression was rejected
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseFault {
    #[error("expression is empty")]
    Empty,
    #[error("expression is longer than {limit} characters")]
    TooLong { limit: usize },
    #[error("expression nests deeper than {limit} levels")]
    TooDeep { limit: usize },
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
    #[error("unexpected '{0}'")]
    UnexpectedToken(String),
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    #[error("unknown identifier '{0}'")]
    UnknownIdentifier(String),
    #[error("unknown function '{0}'")]
    UnknownFunction(String),
    #[error("'{name}' expects {expected} argument(s), got {found}")]
    Arity {
        name: String,
        expected: &'static str,
        found: usize,
    },
    #[error("function '{0}' needs parenthesized arguments")]
    MissingArguments(String),
    #[error("{0} are not supported")]
    Unsupported(&'static str),
}
impl From<dew_core::ParseError> for ParseFault {
    fn from(e: dew_core::ParseError) -> Self {
        use dew_core::ParseError;
        match e {
            ParseError::UnexpectedChar(c) => ParseFault::UnexpectedChar(c),
            ParseError::UnexpectedEnd => ParseFault::UnexpectedEnd,
            ParseError::InvalidNumber(text) => ParseFault::InvalidNumber(text),
            ParseError::UnexpectedToken(token) => token_fault(&token),
        }
    }
}
///dew names tokens by their debug form, turn them back into source text
fn token_fault(token: &str) -> ParseFault {
    let text = match token {
        "Eof" => return ParseFault::UnexpectedEnd,
        "LParen" => "(",
        "RParen" => ")",
        "Comma" => ",",
        "Plus" => "+",
        "Minus" => "-",
        "Star" => "*",
        "Slash" => "/",
        "Caret" => "^",
        "Assign" => "=",
        "Semicolon" => ";",
        _ => token
            .strip_prefix("Ident(\"")
            .and_then(|t| t.strip_suffix("\")"))
            .or_else(|| {
                token
                    .strip_prefix("Number(")
                    .and_then(|t| t.strip_suffix(')'))
            })
            .unwrap_or(token),
    };
    ParseFault::UnexpectedToken(text.to_string())
}
///per point evaluation failure, never fatal
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalFault {
    #[error("result is not finite")]
    NonFinite,
    #[error("{0}")]
    Undefined(String),
}
impl From<dew_complex::Error> for EvalFault {
    fn from(e: dew_complex::Error) -> Self {
        EvalFault::Undefined(e.to_string())
    }
}
///the expression has no closed form complex derivative
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DerivativeFault {
    #[error("'{0}' is not complex differentiable, using a numeric estimate")]
    NotHolomorphic(String),
}
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseFault),
    #[error("invalid config: {0}")]
    Config(String),
    #[error("unknown preset '{0}'")]
    UnknownPreset(String),
}
pub type Result<T> = std::result::Result<T, Error>;
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn dew_tokens_read_as_source_text() {
        use dew_core::ParseError;
        let fault = |t: &str| ParseFault::from(ParseError::UnexpectedToken(t.to_string()));
        assert_eq!(fault("Eof"), ParseFault::UnexpectedEnd);
        assert_eq!(fault("RParen"), ParseFault::UnexpectedToken(")".to_string()));
        assert_eq!(
            fault("Ident(\"z\")"),
            ParseFault::UnexpectedToken("z".to_string())
        );
        assert_eq!(
            fault("Number(2.0)"),
            ParseFault::UnexpectedToken("2.0".to_string())
        );
    }
}
