//! Stagehand is a frame-driven scene-graph reconciler for exported timeline animations.
//!
//! A timeline declares, frame by frame, which objects exist, where they sit in
//! z-order, how they are transformed and whether they are visible. Each tick a
//! [`TimelineAnimator`] diffs the current frame against the live children of its
//! target [`DisplayNode`] and applies the minimal command batch to get there.
//! Nested timelines run their own animators, and loops reconcile the objects
//! still alive from the previous pass against the ones frame 0 declares.
//!
//! # Tick overview
//!
//! 1. **Children**: spawned nested animators advance first, in spawn order.
//! 2. **Plan**: [`plan_frame`] turns the frame's descriptors into a [`FramePlan`]
//!    (loop-reset Removes, then Place / Move / Remove / UpdateZOrder /
//!    UpdateVisibility in declared order).
//! 3. **Execute**: commands run sequentially against the target's direct children.
//! 4. **Advance**: the frame cursor moves on; it wraps on the following tick.
//!
//! Playback never fails. Malformed data is rejected earlier, when a
//! [`Timeline`] or [`Document`] is built; commands that miss their target at
//! runtime are reported to the [`TraceSink`] and skipped.
//!
//! ```
//! use stagehand::{
//!     Affine, AssetLibrary, CharId, DisplayNode, Frame, FrameCommand, ObjectId, ShapeAsset,
//!     Timeline, TimelineAnimator,
//! };
//!
//! let mut library = AssetLibrary::new();
//! library.insert_shape(CharId(5), ShapeAsset::default());
//!
//! let timeline = Timeline::new(vec![Frame::new(vec![FrameCommand::place(
//!     5,
//!     10,
//!     Affine::translate((50.0, 60.0)),
//! )])]);
//!
//! let mut stage = DisplayNode::container(ObjectId(0));
//! let mut animator = TimelineAnimator::new(timeline.into_shared());
//! animator.play(&mut stage, &library);
//!
//! let placed = stage.child(ObjectId(10)).unwrap();
//! assert_eq!(placed.transform.translate.x, 50.0);
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animator;
mod assets;
mod command;
mod display;
mod foundation;
mod reconcile;
mod timeline;

/// Structured playback events and sinks.
pub mod trace;
/// Matrix parsing and decomposition helpers.
pub mod transform;

pub use animator::arena::{AnimatorArena, AnimatorId, AnimatorState};
pub use animator::stage::Stage;
pub use animator::timeline_animator::{AnimatorOpts, TimelineAnimator};
pub use assets::library::{
    AssetLibrary, BitmapAsset, Resolved, ResourceResolver, ShapeAsset, ShapePath, SoundAsset,
    TextAsset,
};
pub use command::ops::Command;
pub use display::node::{DisplayNode, NodeKind};
pub use foundation::core::{Affine, CharId, NodeTransform, ObjectId, Vec2};
pub use foundation::error::{StagehandError, StagehandResult};
pub use reconcile::plan::{FramePlan, plan_frame};
pub use timeline::document::{Document, DocumentDef, Entry};
pub use timeline::model::{
    CommandDef, Frame, FrameCommand, FrameDef, Timeline, TimelineDef, parse_visibility,
};
pub use trace::{
    CommandEvent, CommandKind, FrameEvent, LogSink, NoopSink, Outcome, RecorderSink, TraceRecord,
    TraceSink,
};
