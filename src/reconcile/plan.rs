use crate::animator::player::Playback;
use crate::command::ops::{Command, ExecCtx};
use crate::display::node::DisplayNode;
use crate::foundation::core::ObjectId;
use crate::timeline::model::{Frame, FrameCommand};
use crate::trace::CommandEvent;

/// Ordered command batch for one animator tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FramePlan {
    /// Loop-reset Removes first, then frame commands in declared order.
    pub commands: Vec<Command>,
    /// How many leading commands are loop-reset Removes.
    pub pruned: usize,
    /// Descriptors dropped because their type is not supported.
    pub unsupported: usize,
}

/// Build the command batch that brings `target`'s children to `frame`.
///
/// `looped` must be set when the animator just wrapped back to frame 0; live
/// children not re-declared by a Place in that frame are then removed first.
///
/// A Place for an id that is live (after the commands already in the batch)
/// reuses the existing node as Move + UpdateZOrder instead of duplicating it.
pub fn plan_frame(target: &DisplayNode, frame: &Frame, looped: bool) -> FramePlan {
    let mut live: Vec<ObjectId> = target.child_ids();
    let mut commands = Vec::with_capacity(frame.commands.len());

    if looped {
        for id in target.children().iter().map(|c| c.id) {
            if frame.places(id) || commands.contains(&Command::Remove { object_id: id }) {
                continue;
            }
            commands.push(Command::Remove { object_id: id });
        }
        live.retain(|id| frame.places(*id));
    }
    let pruned = commands.len();

    let mut unsupported = 0;
    for c in &frame.commands {
        match *c {
            FrameCommand::Place {
                char_id,
                object_id,
                place_after,
                matrix,
            } => {
                if live.contains(&object_id) {
                    commands.push(Command::Move { object_id, matrix });
                    commands.push(Command::UpdateZOrder {
                        object_id,
                        place_after,
                    });
                } else {
                    live.push(object_id);
                    commands.push(Command::Place {
                        char_id,
                        object_id,
                        place_after,
                        matrix,
                    });
                }
            }
            FrameCommand::Move { object_id, matrix } => {
                commands.push(Command::Move { object_id, matrix });
            }
            FrameCommand::Remove { object_id } => {
                live.retain(|id| *id != object_id);
                commands.push(Command::Remove { object_id });
            }
            FrameCommand::UpdateZOrder {
                object_id,
                place_after,
            } => {
                commands.push(Command::UpdateZOrder {
                    object_id,
                    place_after,
                });
            }
            FrameCommand::UpdateVisibility { object_id, visible } => {
                commands.push(Command::UpdateVisibility { object_id, visible });
            }
            FrameCommand::Unsupported { .. } => unsupported += 1,
        }
    }

    FramePlan {
        commands,
        pruned,
        unsupported,
    }
}

/// Execute a batch strictly in order against `ctx.target`.
pub(crate) fn execute_plan(plan: &FramePlan, ctx: &mut ExecCtx<'_>, pb: &mut Playback<'_>) {
    for cmd in &plan.commands {
        let outcome = cmd.execute(ctx, pb);
        pb.sink.on_command(&CommandEvent {
            animator: ctx.owner,
            kind: cmd.kind(),
            object_id: cmd.object_id(),
            outcome,
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reconcile/plan.rs"]
mod tests;
