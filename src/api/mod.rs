//! Static portfolio content: data model and loader.

pub mod models;
mod portfolio;

pub use models::*;
pub use portfolio::*;
