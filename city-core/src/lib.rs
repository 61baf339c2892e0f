//! Core library for the `city` agent.
//!
//! This crate defines:
//! - The static city database and its weather data
//! - Lookup functions (weather, time, info, forecast, comparison, travel, search)
//! - Keyword-based intent routing
//! - The web fallback abstraction and its providers
//! - Configuration & credentials handling
//!
//! It is used by `city-cli`, but can also be reused by other binaries or services.

pub mod agent;
pub mod config;
pub mod database;
pub mod error;
pub mod fallback;
pub mod lookup;
pub mod model;
mod report;
pub mod router;

pub use agent::Agent;
pub use config::{Config, ProviderConfig};
pub use error::LookupError;
pub use fallback::{Fallback, ProviderId};
pub use model::{Answer, AnswerSource, CityRecord, ComparisonKind, Intent, TimeFormat};
pub use router::{FallbackReason, Route};
