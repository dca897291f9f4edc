//! The per-tick recursion shared by root and nested animators.

use crate::animator::arena::{AnimatorArena, AnimatorId};
use crate::animator::timeline_animator::AnimatorOpts;
use crate::assets::library::ResourceResolver;
use crate::command::ops::ExecCtx;
use crate::display::node::DisplayNode;
use crate::reconcile::plan::{execute_plan, plan_frame};
use crate::trace::{FrameEvent, RetireEvent, RetireReason, TraceSink};

/// Everything one tick needs besides the target node.
pub(crate) struct Playback<'a> {
    pub(crate) arena: &'a mut AnimatorArena,
    pub(crate) resolver: &'a dyn ResourceResolver,
    pub(crate) sink: &'a mut dyn TraceSink,
    pub(crate) opts: &'a AnimatorOpts,
}

impl Playback<'_> {
    /// Tick animator `id` against `target`, its hosting node.
    pub(crate) fn play(&mut self, id: AnimatorId, target: &mut DisplayNode) {
        let Some(state) = self.arena.get(id) else {
            return;
        };
        let timeline = state.timeline.clone();
        let frame_count = timeline.frame_count();
        if frame_count == 0 {
            return;
        }

        // Nested animations advance before this animator places or moves them.
        let children = state.children.clone();
        for child in children {
            match target.animated_child_mut(child) {
                Some(node) => self.play(child, node),
                None if self.opts.retire_detached => {
                    let slots = self.arena.retire(child);
                    if slots > 0 {
                        self.sink.on_retire(&RetireEvent {
                            animator: child,
                            slots,
                            reason: RetireReason::Detached,
                        });
                    }
                }
                None => {}
            }
        }

        let Some(state) = self.arena.get_mut(id) else {
            return;
        };
        let looped = state.current_frame == frame_count;
        if looped {
            state.current_frame = 0;
        }
        let frame_no = state.current_frame;
        let Some(frame) = timeline.frame(frame_no) else {
            return;
        };

        let plan = plan_frame(target, frame, looped);
        self.sink.on_frame(&FrameEvent {
            animator: id,
            frame: frame_no,
            looped,
            pruned: plan.pruned,
            commands: plan.commands.len(),
            unsupported: plan.unsupported,
        });
        let mut ctx = ExecCtx { owner: id, target };
        execute_plan(&plan, &mut ctx, self);

        if let Some(state) = self.arena.get_mut(id) {
            state.current_frame += 1;
        }
    }
}
