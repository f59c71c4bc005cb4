//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → FailoverConfig (validated, immutable)
//!     → BreakerOptions / SecondaryConfig handed to the fallback client
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - The trip predicate is code, not config: the file only carries the
//!   parameters of the default failure-ratio policy

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{BreakerConfig, FailoverConfig, ObservabilityConfig, SecondaryConfig, TlsConfig};
pub use validation::{validate_config, ValidationError};
