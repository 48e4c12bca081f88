//! Infrastructure configuration modules.

pub mod logging;
pub mod model;
pub mod settings;
