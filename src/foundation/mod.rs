//! Shared value types and the error taxonomy.

pub(crate) mod core;
pub(crate) mod error;
pub(crate) mod wire;
