//! Commands: the five mutations a frame can apply to a target's children.

pub mod ops;
