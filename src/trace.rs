//! Playback reports what it did through a [`TraceSink`] passed into every
//! `play` call. All methods default to no-ops, so a sink only implements the
//! events it cares about.
//!
//! - [`NoopSink`] discards everything.
//! - [`LogSink`] forwards events to `tracing` at `debug`/`trace` level.
//! - [`RecorderSink`] keeps every event as a [`TraceRecord`] for inspection.

use crate::animator::arena::AnimatorId;
use crate::foundation::core::{CharId, ObjectId};

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

/// Which command variant an event refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum CommandKind {
    /// Place.
    Place,
    /// Move.
    Move,
    /// Remove.
    Remove,
    /// UpdateZOrder.
    UpdateZOrder,
    /// UpdateVisibility.
    UpdateVisibility,
}

/// What executing a command did to the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Outcome {
    /// The command changed (or re-asserted) tree state.
    Applied,
    /// No child carries the target id; nothing changed.
    LookupMiss,
    /// The referenced sibling is missing. Place appends, UpdateZOrder leaves the order alone.
    SiblingMiss,
    /// Place of a character the resolver does not know; a placeholder node was inserted.
    Unresolved,
}

/// Emitted once per animator per tick, before its command batch executes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct FrameEvent {
    /// Animator playing the frame.
    pub animator: AnimatorId,
    /// Frame index being reconciled.
    pub frame: usize,
    /// Whether this tick wrapped from the last frame to frame 0.
    pub looped: bool,
    /// Number of loop-reset Removes in the batch.
    pub pruned: usize,
    /// Number of commands in the batch.
    pub commands: usize,
    /// Descriptors skipped because their type is not supported.
    pub unsupported: usize,
}

/// Emitted after each command executes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct CommandEvent {
    /// Animator whose target was mutated.
    pub animator: AnimatorId,
    /// Command variant.
    pub kind: CommandKind,
    /// Target object.
    pub object_id: ObjectId,
    /// Result.
    pub outcome: Outcome,
}

/// Emitted when a nested timeline Place allocates a child animator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SpawnEvent {
    /// Parent animator.
    pub parent: AnimatorId,
    /// Newly allocated animator.
    pub child: AnimatorId,
    /// Hosting display object.
    pub object_id: ObjectId,
    /// Timeline character.
    pub char_id: CharId,
}

/// Why an animator was retired.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum RetireReason {
    /// Its hosting node was removed by a Remove command.
    Removed,
    /// Its hosting node disappeared from the parent's children without a Remove.
    Detached,
}

/// Emitted when an animator slot (and its descendants) is freed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct RetireEvent {
    /// Retired animator.
    pub animator: AnimatorId,
    /// Number of slots freed including descendants.
    pub slots: usize,
    /// Trigger.
    pub reason: RetireReason,
}

/// Emitted when a nested timeline is placed beyond the configured nesting depth.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct NestingLimitEvent {
    /// Animator that executed the Place.
    pub parent: AnimatorId,
    /// Hosting display object (placed without an animator).
    pub object_id: ObjectId,
    /// Depth that would have been reached.
    pub depth: usize,
}

// ---------------------------------------------------------------------------
// Sink trait
// ---------------------------------------------------------------------------

/// Receiver of playback events.
pub trait TraceSink {
    /// An animator is about to execute a frame batch.
    fn on_frame(&mut self, _e: &FrameEvent) {}
    /// A command finished executing.
    fn on_command(&mut self, _e: &CommandEvent) {}
    /// A child animator was spawned.
    fn on_spawn(&mut self, _e: &SpawnEvent) {}
    /// A child animator was retired.
    fn on_retire(&mut self, _e: &RetireEvent) {}
    /// A nested timeline was not animated because of the nesting limit.
    fn on_nesting_limit(&mut self, _e: &NestingLimitEvent) {}
}

/// Sink that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

/// Sink that forwards events to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl TraceSink for LogSink {
    fn on_frame(&mut self, e: &FrameEvent) {
        tracing::trace!(
            animator = ?e.animator,
            frame = e.frame,
            looped = e.looped,
            pruned = e.pruned,
            commands = e.commands,
            "frame"
        );
        if e.unsupported > 0 {
            tracing::debug!(
                animator = ?e.animator,
                frame = e.frame,
                skipped = e.unsupported,
                "unsupported commands skipped"
            );
        }
    }

    fn on_command(&mut self, e: &CommandEvent) {
        if e.outcome != Outcome::Applied {
            tracing::debug!(
                animator = ?e.animator,
                kind = ?e.kind,
                object = e.object_id.0,
                outcome = ?e.outcome,
                "command did not fully apply"
            );
        }
    }

    fn on_spawn(&mut self, e: &SpawnEvent) {
        tracing::debug!(
            parent = ?e.parent,
            child = ?e.child,
            object = e.object_id.0,
            char_id = e.char_id.0,
            "spawned nested animator"
        );
    }

    fn on_retire(&mut self, e: &RetireEvent) {
        tracing::debug!(animator = ?e.animator, slots = e.slots, reason = ?e.reason, "retired animator");
    }

    fn on_nesting_limit(&mut self, e: &NestingLimitEvent) {
        tracing::warn!(
            parent = ?e.parent,
            object = e.object_id.0,
            depth = e.depth,
            "nesting limit reached; clip placed without animator"
        );
    }
}

// ---------------------------------------------------------------------------
// Recorder
// ---------------------------------------------------------------------------

/// One recorded event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum TraceRecord {
    /// See [`TraceSink::on_frame`].
    Frame(FrameEvent),
    /// See [`TraceSink::on_command`].
    Command(CommandEvent),
    /// See [`TraceSink::on_spawn`].
    Spawn(SpawnEvent),
    /// See [`TraceSink::on_retire`].
    Retire(RetireEvent),
    /// See [`TraceSink::on_nesting_limit`].
    NestingLimit(NestingLimitEvent),
}

/// Sink that stores every event in order.
#[derive(Clone, Debug, Default)]
pub struct RecorderSink {
    records: Vec<TraceRecord>,
}

impl RecorderSink {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Events in emission order.
    pub fn records(&self) -> &[TraceRecord] {
        &self.records
    }

    /// Consume the recorder.
    pub fn into_records(self) -> Vec<TraceRecord> {
        self.records
    }

    /// Drop recorded events.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Frame events only.
    pub fn frames(&self) -> impl Iterator<Item = &FrameEvent> {
        self.records.iter().filter_map(|r| match r {
            TraceRecord::Frame(e) => Some(e),
            _ => None,
        })
    }

    /// Command events only.
    pub fn commands(&self) -> impl Iterator<Item = &CommandEvent> {
        self.records.iter().filter_map(|r| match r {
            TraceRecord::Command(e) => Some(e),
            _ => None,
        })
    }
}

impl TraceSink for RecorderSink {
    fn on_frame(&mut self, e: &FrameEvent) {
        self.records.push(TraceRecord::Frame(*e));
    }

    fn on_command(&mut self, e: &CommandEvent) {
        self.records.push(TraceRecord::Command(*e));
    }

    fn on_spawn(&mut self, e: &SpawnEvent) {
        self.records.push(TraceRecord::Spawn(*e));
    }

    fn on_retire(&mut self, e: &RetireEvent) {
        self.records.push(TraceRecord::Retire(*e));
    }

    fn on_nesting_limit(&mut self, e: &NestingLimitEvent) {
        self.records.push(TraceRecord::NestingLimit(*e));
    }
}
