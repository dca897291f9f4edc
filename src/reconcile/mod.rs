//! Frame reconciliation: diff a declared frame against live children, then
//! execute the resulting command batch.

pub mod plan;
