//! Error types for laminate analysis

use thiserror::Error;

/// Main error type for laminate operations
#[derive(Error, Debug)]
pub enum LamError {
    #[error("Invalid material '{name}': {reason}")]
    InvalidMaterial { name: String, reason: String },

    #[error("Invalid stack: {0}")]
    InvalidStack(String),

    #[error("Ply {ply} material '{name}' is a {found} material but the {expected} engine was requested")]
    TypeMismatch {
        ply: usize,
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Resultant vector has {0} components, expected 6")]
    DimensionMismatch(usize),

    #[error("Invalid envelope options: {0}")]
    InvalidOptions(String),

    #[error("Singular matrix while {0} - check material constants")]
    Singular(&'static str),

    #[error("No load applied - call apply_resultants() first")]
    NotAnalyzed,

    #[error("No ply in the stack carries the strength limits required by this criterion")]
    NoStrengthData,

    #[error("Envelope baseline root failed: {0}")]
    RootFinding(#[from] RootError),
}

/// Local, recoverable failure of the bracketed root finder.
///
/// During an envelope sweep this is caught per sample point; only the
/// baseline roots promote it to a fatal [`LamError`].
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum RootError {
    #[error("no sign change over bracket [{lo}, {hi}]")]
    NoBracket { lo: f64, hi: f64 },

    #[error("root not converged after {0} iterations")]
    MaxIterations(usize),
}

/// Result type for laminate operations
pub type LamResult<T> = Result<T, LamError>;
