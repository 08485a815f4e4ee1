use thiserror::Error;

/// Input rejected at a setter or configuration boundary.
///
/// None of these are fatal: the engine keeps its previous value and carries on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CardError {
    #[error("expected at least 3 components for a point, got {0}")]
    InvalidPoint(usize),
    #[error("{0} must be a number")]
    NonFinite(&'static str),
    #[error("invalid value {value:?} for option `{name}`")]
    InvalidOption { name: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, CardError>;
