//! Infrastructure layer.
//!
//! Provides technical concerns that support the application without containing
//! business logic: configuration, filesystem layout and runtime wiring.
//!
//! # Submodules
//!
//! - [`bootstrap`] - Composition root for runtime wiring
//! - [`config`] - Configuration loading and validation
//! - [`paths`] - Default locations under `~/.pricewarden/`

pub mod bootstrap;
pub mod config;
pub mod paths;
