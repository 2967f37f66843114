//! Comment-preserving Hjson configuration panel.
//!
//! This crate backs a small interactive app with a human-editable config
//! file: a dynamically-typed, order-preserving document tree, a defaults
//! overlay merge, a formatting-preserving codec, and a binding layer that
//! keeps interactive controls and document fields in sync.

pub mod binding;
pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod ui;
pub mod value;

pub use config::ConfigDocument;
pub use error::{ConfigError, ConfigResult};
pub use value::Value;
