//! Character assets and the resolver consulted by Place execution.

pub mod library;
