//! Engine error types

/// Errors reported by the engine
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("initialization string must be {expected} characters long, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("undefined symbol {symbol:?} at cell {index}")]
    UnknownSymbol { symbol: char, index: usize },

    #[error("illegal move {mv}: {reason}")]
    IllegalMove { mv: String, reason: &'static str },
}
