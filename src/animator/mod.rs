//! Timeline animators: the `play()` tick, the arena of nested animators, and
//! the [`stage::Stage`] convenience owner.

pub mod arena;
pub(crate) mod player;
pub mod stage;
pub mod timeline_animator;
