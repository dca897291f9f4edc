use std::sync::Arc;

use crate::animator::arena::AnimatorId;
use crate::animator::player::Playback;
use crate::assets::library::Resolved;
use crate::display::node::{DisplayNode, NodeKind};
use crate::foundation::core::{Affine, CharId, ObjectId};
use crate::timeline::model::Timeline;
use crate::trace::{CommandKind, NestingLimitEvent, Outcome, RetireEvent, RetireReason, SpawnEvent};
use crate::transform::affine::decompose;

/// A single mutation of a target node's direct children.
///
/// Commands are built fresh every tick by [`crate::plan_frame`], executed once
/// in order, and dropped.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Instantiate a character as a new child.
    Place {
        /// Character to instantiate.
        char_id: CharId,
        /// Identity stamped on the new node.
        object_id: ObjectId,
        /// Sibling to insert before; `None` appends on top.
        place_after: Option<ObjectId>,
        /// Matrix decomposed into the node's transform.
        matrix: Affine,
    },
    /// Replace an existing child's transform.
    Move {
        /// Target child.
        object_id: ObjectId,
        /// Matrix decomposed into the node's transform.
        matrix: Affine,
    },
    /// Remove every child with the id.
    Remove {
        /// Target child.
        object_id: ObjectId,
    },
    /// Move a child immediately before a sibling.
    UpdateZOrder {
        /// Target child.
        object_id: ObjectId,
        /// Sibling; `None` leaves the position unchanged.
        place_after: Option<ObjectId>,
    },
    /// Set a child's visibility flag.
    UpdateVisibility {
        /// Target child.
        object_id: ObjectId,
        /// New flag.
        visible: bool,
    },
}

/// Execution context: the animator running the batch and the node it targets.
pub(crate) struct ExecCtx<'a> {
    pub(crate) owner: AnimatorId,
    pub(crate) target: &'a mut DisplayNode,
}

impl Command {
    /// Variant tag.
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::Place { .. } => CommandKind::Place,
            Self::Move { .. } => CommandKind::Move,
            Self::Remove { .. } => CommandKind::Remove,
            Self::UpdateZOrder { .. } => CommandKind::UpdateZOrder,
            Self::UpdateVisibility { .. } => CommandKind::UpdateVisibility,
        }
    }

    /// Target object.
    pub fn object_id(&self) -> ObjectId {
        match self {
            Self::Place { object_id, .. }
            | Self::Move { object_id, .. }
            | Self::Remove { object_id }
            | Self::UpdateZOrder { object_id, .. }
            | Self::UpdateVisibility { object_id, .. } => *object_id,
        }
    }

    /// Apply the command to `ctx.target`. Never touches grandchildren, except
    /// through the immediate tick of a freshly spawned nested animator.
    pub(crate) fn execute(&self, ctx: &mut ExecCtx<'_>, pb: &mut Playback<'_>) -> Outcome {
        match *self {
            Self::Place {
                char_id,
                object_id,
                place_after,
                matrix,
            } => place(ctx, pb, char_id, object_id, place_after, matrix),
            Self::Move { object_id, matrix } => match ctx.target.child_mut(object_id) {
                Some(node) => {
                    node.transform = decompose(matrix);
                    Outcome::Applied
                }
                None => Outcome::LookupMiss,
            },
            Self::Remove { object_id } => remove(ctx, pb, object_id),
            Self::UpdateZOrder {
                object_id,
                place_after,
            } => {
                if !ctx.target.contains(object_id) {
                    return Outcome::LookupMiss;
                }
                match place_after {
                    None => Outcome::Applied,
                    Some(sibling) if !ctx.target.contains(sibling) => Outcome::SiblingMiss,
                    Some(sibling) => {
                        ctx.target.move_before(object_id, sibling);
                        Outcome::Applied
                    }
                }
            }
            Self::UpdateVisibility { object_id, visible } => {
                let mut hit = false;
                for node in ctx.target.children_with_id_mut(object_id) {
                    node.visible = visible;
                    hit = true;
                }
                if hit {
                    Outcome::Applied
                } else {
                    Outcome::LookupMiss
                }
            }
        }
    }
}

fn place(
    ctx: &mut ExecCtx<'_>,
    pb: &mut Playback<'_>,
    char_id: CharId,
    object_id: ObjectId,
    place_after: Option<ObjectId>,
    matrix: Affine,
) -> Outcome {
    let resolver = pb.resolver;
    let (kind, nested) = match resolver.resolve(char_id) {
        Some(Resolved::Shape(_)) => (NodeKind::Shape(char_id), None),
        Some(Resolved::Bitmap(_)) => (NodeKind::Bitmap(char_id), None),
        Some(Resolved::Text(_)) => (NodeKind::Text(char_id), None),
        Some(Resolved::Timeline(tl)) => (
            NodeKind::Clip {
                char_id,
                animator: None,
            },
            Some(Arc::clone(tl)),
        ),
        None => (NodeKind::Placeholder(char_id), None),
    };

    let mut outcome = match kind {
        NodeKind::Placeholder(_) => Outcome::Unresolved,
        _ => Outcome::Applied,
    };
    if place_after.is_some_and(|s| !ctx.target.contains(s)) {
        outcome = Outcome::SiblingMiss;
    }

    let mut node = DisplayNode::new(object_id, kind);
    node.transform = decompose(matrix);
    let at = ctx.target.insert_before(node, place_after);

    if let Some(timeline) = nested {
        spawn(ctx, pb, at, char_id, timeline);
    }
    outcome
}

fn spawn(
    ctx: &mut ExecCtx<'_>,
    pb: &mut Playback<'_>,
    at: usize,
    char_id: CharId,
    timeline: Arc<Timeline>,
) {
    let depth = pb.arena.get(ctx.owner).map_or(0, |s| s.depth) + 1;
    let Some(node) = ctx.target.child_at_mut(at) else {
        return;
    };
    if depth > pb.opts.max_nesting_depth {
        pb.sink.on_nesting_limit(&NestingLimitEvent {
            parent: ctx.owner,
            object_id: node.id,
            depth,
        });
        return;
    }

    let child = pb.arena.alloc(timeline, Some(ctx.owner), depth);
    if let Some(owner) = pb.arena.get_mut(ctx.owner) {
        owner.children.push(child);
    }
    node.kind = NodeKind::Clip {
        char_id,
        animator: Some(child),
    };
    pb.sink.on_spawn(&SpawnEvent {
        parent: ctx.owner,
        child,
        object_id: node.id,
        char_id,
    });
    // First tick right away so the clip is not a frame behind its parent.
    pb.play(child, node);
}

fn remove(ctx: &mut ExecCtx<'_>, pb: &mut Playback<'_>, object_id: ObjectId) -> Outcome {
    let removed = ctx.target.remove_all(object_id);
    if removed.is_empty() {
        return Outcome::LookupMiss;
    }
    for animator in removed.iter().filter_map(DisplayNode::animator) {
        let slots = pb.arena.retire(animator);
        if slots > 0 {
            pb.sink.on_retire(&RetireEvent {
                animator,
                slots,
                reason: RetireReason::Removed,
            });
        }
    }
    Outcome::Applied
}

#[cfg(test)]
#[path = "../../tests/unit/command/ops.rs"]
mod tests;
