use thiserror::Error;

/// Errors produced by the lookup layer.
///
/// None of these are fatal: the agent answers them through the fallback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("'{0}' is not in the city database")]
    UnknownCity(String),

    #[error("no cities in the database match '{0}'")]
    NoMatches(String),
}
