//! Error types of the calculus engine.
//!
//! Parsing errors are fatal to a call and reach the caller unchanged. Evaluation
//! errors are mostly handled locally: a pattern builder that hits one is skipped,
//! and the definite-integral path falls back to quadrature before giving up.
//! An unresolved integral is NOT an error, it is the `integral(...)` marker string.
use thiserror::Error;

/// Malformed input text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("empty expression")]
    Empty,
    #[error("unbalanced parentheses in '{0}'")]
    UnbalancedParentheses(String),
    #[error("unknown token '{0}'")]
    UnknownToken(String),
    #[error("unexpected token '{0}'")]
    UnexpectedToken(String),
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("exponent '{0}' must evaluate to a number")]
    NonNumericExponent(String),
    #[error("expression nests deeper than {0} levels")]
    TooDeep(usize),
}

/// Failure while turning a term into a number.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("domain error: {0}")]
    Domain(String),
    #[error("symbol '{0}' has no value")]
    UnboundSymbol(String),
    #[error("{0} bound is required for a definite integral")]
    MissingBound(&'static str),
    #[error("quadrature failed: {0}")]
    Quadrature(String),
}

/// Everything the public entry points can report.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalculusError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),
    #[error("configuration error: {0}")]
    Config(String),
}
