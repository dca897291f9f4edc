use std::sync::Arc;

use crate::animator::arena::{AnimatorArena, AnimatorId, AnimatorState};
use crate::animator::player::Playback;
use crate::assets::library::ResourceResolver;
use crate::display::node::DisplayNode;
use crate::timeline::model::Timeline;
use crate::trace::{LogSink, TraceSink};

/// Options controlling animator playback.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AnimatorOpts {
    /// Deepest nested animator that may be spawned (root is depth 0). Clips
    /// placed deeper are created without an animator, which stops
    /// self-referencing timelines from recursing forever.
    pub max_nesting_depth: usize,
    /// Retire child animators whose hosting node left the target's children
    /// without a Remove command (e.g. the host detached it).
    pub retire_detached: bool,
}

impl Default for AnimatorOpts {
    fn default() -> Self {
        Self {
            max_nesting_depth: 32,
            retire_detached: true,
        }
    }
}

/// Drives one target node through a timeline, frame by frame.
///
/// The animator never owns the target: the host passes it to every
/// [`play`](Self::play) call. Nested timelines placed by the frames spawn child
/// animators stored in an internal [`AnimatorArena`]; each is linked to its
/// hosting node through [`NodeKind::Clip`](crate::NodeKind::Clip).
#[derive(Clone, Debug)]
pub struct TimelineAnimator {
    arena: AnimatorArena,
    root: AnimatorId,
    opts: AnimatorOpts,
}

impl TimelineAnimator {
    /// Animator with default options.
    pub fn new(timeline: Arc<Timeline>) -> Self {
        Self::with_opts(timeline, AnimatorOpts::default())
    }

    /// Animator with explicit options.
    pub fn with_opts(timeline: Arc<Timeline>, opts: AnimatorOpts) -> Self {
        let mut arena = AnimatorArena::new();
        let root = arena.alloc(timeline, None, 0);
        Self { arena, root, opts }
    }

    /// Advance one tick, logging events through `tracing`.
    pub fn play(&mut self, target: &mut DisplayNode, resolver: &dyn ResourceResolver) {
        self.play_with_sink(target, resolver, &mut LogSink);
    }

    /// Advance one tick, reporting events to `sink`.
    ///
    /// Order within the tick: spawned children first (spawn order), then this
    /// animator's loop-reset Removes, then its frame commands. Never fails;
    /// commands whose target is missing are reported and skipped.
    #[tracing::instrument(level = "trace", skip_all, fields(root = ?self.root))]
    pub fn play_with_sink(
        &mut self,
        target: &mut DisplayNode,
        resolver: &dyn ResourceResolver,
        sink: &mut dyn TraceSink,
    ) {
        let mut pb = Playback {
            arena: &mut self.arena,
            resolver,
            sink,
            opts: &self.opts,
        };
        pb.play(self.root, target);
    }

    /// Root animator handle.
    pub fn root(&self) -> AnimatorId {
        self.root
    }

    /// State of the root animator.
    pub fn root_state(&self) -> &AnimatorState {
        // The root slot is allocated in the constructor and never retired.
        match self.arena.get(self.root) {
            Some(s) => s,
            None => unreachable!("root animator slot is never retired"),
        }
    }

    /// Root frame cursor.
    pub fn current_frame(&self) -> usize {
        self.root_state().current_frame()
    }

    /// Root frame count.
    pub fn frame_count(&self) -> usize {
        self.root_state().timeline().frame_count()
    }

    /// Arena holding the root and every live nested animator.
    pub fn arena(&self) -> &AnimatorArena {
        &self.arena
    }

    /// Playback options.
    pub fn opts(&self) -> &AnimatorOpts {
        &self.opts
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animator/timeline_animator.rs"]
mod tests;
