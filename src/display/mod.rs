//! Live display tree mutated by command execution.

pub mod node;
