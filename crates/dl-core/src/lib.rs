//! dl-core - Core library for sql2dl
//!
//! This crate provides the translator configuration, configuration errors,
//! and the strongly-typed names shared by the IR and the translator.

pub mod config;
pub mod error;
pub mod names;
mod newtype_string;

pub use config::{Config, Dialect, NamingConfig};
pub use error::{CoreError, CoreResult};
pub use names::{RelationName, TableName, TypeName};
