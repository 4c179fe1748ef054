//! pagegen core library: domain types, build inputs, content sources.
//!
//! - [`types`]: newtypes, [`Template`], [`SubstitutionMode`]
//! - [`inputs`]: list and template readers
//! - [`source`]: the [`ContentSource`] collaborator
//! - [`config`]: [`BuildConfig`]
//! - [`error`]: [`InputError`], [`LookupError`], [`ConfigError`]

pub mod config;
pub mod error;
pub mod inputs;
pub mod source;
pub mod types;

pub use config::BuildConfig;
pub use error::{ConfigError, InputError, LookupError};
pub use source::{ContentSource, DirectorySource, MemorySource};
pub use types::{AttributeMap, AttributeName, EntityId, SubstitutionMode, Template};
