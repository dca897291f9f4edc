use super::*;
use crate::display::node::NodeKind;
use crate::foundation::core::{Affine, CharId};
use crate::trace::CommandKind;

fn target(ids: &[u32]) -> DisplayNode {
    let mut root = DisplayNode::container(ObjectId(0));
    for id in ids {
        root.push_child(DisplayNode::new(ObjectId(*id), NodeKind::Shape(CharId(1))));
    }
    root
}

fn removes(plan: &FramePlan) -> Vec<u32> {
    plan.commands
        .iter()
        .filter_map(|c| match c {
            Command::Remove { object_id } => Some(object_id.0),
            _ => None,
        })
        .collect()
}

#[test]
fn fresh_place_becomes_place() {
    let frame = Frame::new(vec![FrameCommand::place(5, 10, Affine::IDENTITY)]);
    let plan = plan_frame(&target(&[]), &frame, false);
    assert_eq!(plan.pruned, 0);
    assert_eq!(
        plan.commands,
        vec![Command::Place {
            char_id: CharId(5),
            object_id: ObjectId(10),
            place_after: None,
            matrix: Affine::IDENTITY,
        }]
    );
}

#[test]
fn place_of_live_id_becomes_move_and_zorder() {
    let m = Affine::translate((3.0, 4.0));
    let frame = Frame::new(vec![FrameCommand::place_before(5, 10, 11, m)]);
    let plan = plan_frame(&target(&[10, 11]), &frame, false);
    assert_eq!(
        plan.commands,
        vec![
            Command::Move {
                object_id: ObjectId(10),
                matrix: m,
            },
            Command::UpdateZOrder {
                object_id: ObjectId(10),
                place_after: Some(ObjectId(11)),
            },
        ]
    );
}

#[test]
fn repeated_place_in_one_frame_reuses_first() {
    let frame = Frame::new(vec![
        FrameCommand::place(5, 10, Affine::IDENTITY),
        FrameCommand::place(5, 10, Affine::IDENTITY),
    ]);
    let plan = plan_frame(&target(&[]), &frame, false);
    let kinds: Vec<_> = plan.commands.iter().map(Command::kind).collect();
    assert_eq!(
        kinds,
        vec![CommandKind::Place, CommandKind::Move, CommandKind::UpdateZOrder]
    );
}

#[test]
fn remove_then_place_yields_real_place() {
    let frame = Frame::new(vec![
        FrameCommand::Remove {
            object_id: ObjectId(10),
        },
        FrameCommand::place(5, 10, Affine::IDENTITY),
    ]);
    let plan = plan_frame(&target(&[10]), &frame, false);
    let kinds: Vec<_> = plan.commands.iter().map(Command::kind).collect();
    assert_eq!(kinds, vec![CommandKind::Remove, CommandKind::Place]);
}

#[test]
fn loop_reset_prunes_undeclared_children_in_zorder() {
    let frame = Frame::new(vec![FrameCommand::place(5, 2, Affine::IDENTITY)]);
    let plan = plan_frame(&target(&[3, 1, 2, 7]), &frame, true);
    assert_eq!(plan.pruned, 3);
    assert_eq!(removes(&plan), vec![3, 1, 7]);
    // Object 2 survives and is reused.
    assert_eq!(plan.commands[3].kind(), CommandKind::Move);
}

#[test]
fn loop_reset_removes_duplicate_id_once() {
    let frame = Frame::default();
    let plan = plan_frame(&target(&[4, 4]), &frame, true);
    assert_eq!(plan.pruned, 1);
    assert_eq!(removes(&plan), vec![4]);
}

#[test]
fn loop_reset_then_place_of_new_id() {
    let frame = Frame::new(vec![FrameCommand::place(5, 2, Affine::IDENTITY)]);
    let plan = plan_frame(&target(&[1]), &frame, true);
    let kinds: Vec<_> = plan.commands.iter().map(Command::kind).collect();
    assert_eq!(kinds, vec![CommandKind::Remove, CommandKind::Place]);
}

#[test]
fn no_pruning_without_loop() {
    let plan = plan_frame(&target(&[1, 2]), &Frame::default(), false);
    assert!(plan.commands.is_empty());
    assert_eq!(plan.pruned, 0);
}

#[test]
fn unsupported_descriptors_are_counted_and_skipped() {
    let frame = Frame::new(vec![
        FrameCommand::Unsupported {
            cmd_type: "UpdateBlendMode".to_owned(),
        },
        FrameCommand::Move {
            object_id: ObjectId(1),
            matrix: Affine::IDENTITY,
        },
        FrameCommand::Unsupported {
            cmd_type: "UpdateFilter".to_owned(),
        },
    ]);
    let plan = plan_frame(&target(&[1]), &frame, false);
    assert_eq!(plan.unsupported, 2);
    assert_eq!(plan.commands.len(), 1);
}

#[test]
fn other_commands_pass_through_in_order() {
    let frame = Frame::new(vec![
        FrameCommand::UpdateVisibility {
            object_id: ObjectId(1),
            visible: false,
        },
        FrameCommand::UpdateZOrder {
            object_id: ObjectId(1),
            place_after: None,
        },
        FrameCommand::Move {
            object_id: ObjectId(9),
            matrix: Affine::IDENTITY,
        },
    ]);
    let plan = plan_frame(&target(&[1]), &frame, false);
    let kinds: Vec<_> = plan.commands.iter().map(Command::kind).collect();
    assert_eq!(
        kinds,
        vec![
            CommandKind::UpdateVisibility,
            CommandKind::UpdateZOrder,
            CommandKind::Move
        ]
    );
}
