//! Timeline data: the serde boundary, compiled frames, and exporter documents.

pub mod document;
pub mod model;
