use super::*;
use crate::assets::library::{AssetLibrary, ShapeAsset};
use crate::display::node::NodeKind;
use crate::foundation::core::{Affine, CharId, ObjectId, Vec2};
use crate::timeline::model::{Frame, FrameCommand};
use crate::trace::{NoopSink, RecorderSink, RetireReason, TraceRecord};

const SHAPE: u32 = 5;
const CLIP: u32 = 7;

fn library() -> AssetLibrary {
    let mut lib = AssetLibrary::new();
    lib.insert_shape(CharId(SHAPE), ShapeAsset::default());
    lib
}

fn stage_root() -> DisplayNode {
    DisplayNode::container(ObjectId(0))
}

fn ids(n: &DisplayNode) -> Vec<u32> {
    n.child_ids().into_iter().map(|i| i.0).collect()
}

fn tick(anim: &mut TimelineAnimator, root: &mut DisplayNode, lib: &AssetLibrary, n: usize) {
    for _ in 0..n {
        anim.play_with_sink(root, lib, &mut NoopSink);
    }
}

/// Three-frame nested clip placing a shape at x = 10, 20, 30.
fn counting_clip() -> Arc<Timeline> {
    let step = |x: f64| {
        Frame::new(vec![FrameCommand::place(
            SHAPE,
            100,
            Affine::translate((x, 0.0)),
        )])
    };
    Timeline::new(vec![step(10.0), step(20.0), step(30.0)]).into_shared()
}

#[test]
fn single_place_builds_child_from_matrix() {
    let lib = library();
    let tl = Timeline::new(vec![Frame::new(vec![FrameCommand::place(
        SHAPE,
        10,
        Affine::new([1.0, 0.0, 0.0, 1.0, 50.0, 60.0]),
    )])]);
    let mut anim = TimelineAnimator::new(tl.into_shared());
    let mut root = stage_root();
    anim.play(&mut root, &lib);

    assert_eq!(ids(&root), vec![10]);
    let t = root.child(ObjectId(10)).unwrap().transform;
    assert_eq!(t.translate, Vec2::new(50.0, 60.0));
    assert_eq!(t.scale, Vec2::new(1.0, 1.0));
    assert_eq!(t.skew_deg, Vec2::ZERO);
    assert_eq!(anim.current_frame(), 1);
}

#[test]
fn wraparound_prunes_objects_missing_from_frame_zero() {
    let lib = library();
    let m0 = Affine::translate((1.0, 2.0));
    let tl = Timeline::new(vec![
        Frame::new(vec![FrameCommand::place(SHAPE, 1, m0)]),
        Frame::new(vec![FrameCommand::place(SHAPE, 2, Affine::IDENTITY)]),
    ]);
    let mut anim = TimelineAnimator::new(tl.into_shared());
    let mut root = stage_root();

    tick(&mut anim, &mut root, &lib, 2);
    assert_eq!(ids(&root), vec![1, 2]);

    let mut sink = RecorderSink::new();
    anim.play_with_sink(&mut root, &lib, &mut sink);
    assert_eq!(ids(&root), vec![1]);
    assert_eq!(
        root.child(ObjectId(1)).unwrap().transform.translate,
        Vec2::new(1.0, 2.0)
    );
    let frame = sink.frames().next().unwrap();
    assert!(frame.looped);
    assert_eq!(frame.frame, 0);
    assert_eq!(frame.pruned, 1);
}

#[test]
fn wraparound_resets_externally_added_children() {
    let lib = library();
    let tl = Timeline::new(vec![Frame::new(vec![FrameCommand::place(
        SHAPE,
        1,
        Affine::IDENTITY,
    )])]);
    let mut anim = TimelineAnimator::new(tl.into_shared());
    let mut root = stage_root();
    tick(&mut anim, &mut root, &lib, 1);

    root.push_child(DisplayNode::new(ObjectId(50), NodeKind::Shape(CharId(SHAPE))));
    tick(&mut anim, &mut root, &lib, 1);
    assert_eq!(ids(&root), vec![1]);
}

#[test]
fn loop_playback_is_periodic() {
    let lib = library();
    let tl = Timeline::new(vec![
        Frame::new(vec![
            FrameCommand::place_before(SHAPE, 1, 2, Affine::translate((1.0, 0.0))),
            FrameCommand::place(SHAPE, 2, Affine::translate((2.0, 0.0))),
        ]),
        Frame::new(vec![
            FrameCommand::Remove {
                object_id: ObjectId(1),
            },
            FrameCommand::place(SHAPE, 3, Affine::IDENTITY),
        ]),
        Frame::new(vec![FrameCommand::UpdateZOrder {
            object_id: ObjectId(3),
            place_after: Some(ObjectId(2)),
        }]),
    ]);
    let mut anim = TimelineAnimator::new(tl.into_shared());
    let mut root = stage_root();

    let mut seen = Vec::new();
    for _ in 0..3 {
        tick(&mut anim, &mut root, &lib, 1);
        seen.push(root.clone());
    }
    for expected in &seen {
        tick(&mut anim, &mut root, &lib, 1);
        assert_eq!(&root, expected);
    }
}

#[test]
fn nested_clip_runs_frame_zero_on_spawn_tick() {
    let mut lib = library();
    lib.insert_timeline(CharId(CLIP), counting_clip());
    let tl = Timeline::new(vec![
        Frame::new(vec![FrameCommand::place(CLIP, 9, Affine::IDENTITY)]),
        Frame::default(),
    ]);
    let mut anim = TimelineAnimator::new(tl.into_shared());
    let mut root = stage_root();

    let mut sink = RecorderSink::new();
    anim.play_with_sink(&mut root, &lib, &mut sink);

    let clip = root.child(ObjectId(9)).unwrap();
    let child = clip.animator().unwrap();
    let shape = clip.child(ObjectId(100)).unwrap();
    assert_eq!(shape.transform.translate, Vec2::new(10.0, 0.0));
    assert_eq!(anim.arena().get(child).unwrap().current_frame(), 1);

    let frames: Vec<_> = sink.frames().map(|e| e.animator).collect();
    assert_eq!(frames, vec![anim.root(), child]);
}

#[test]
fn nested_clip_advances_before_parent_on_later_ticks() {
    let mut lib = library();
    lib.insert_timeline(CharId(CLIP), counting_clip());
    let tl = Timeline::new(vec![
        Frame::new(vec![FrameCommand::place(CLIP, 9, Affine::IDENTITY)]),
        Frame::default(),
    ]);
    let mut anim = TimelineAnimator::new(tl.into_shared());
    let mut root = stage_root();
    tick(&mut anim, &mut root, &lib, 1);
    let child = root.child(ObjectId(9)).unwrap().animator().unwrap();

    let mut sink = RecorderSink::new();
    anim.play_with_sink(&mut root, &lib, &mut sink);
    let frames: Vec<_> = sink.frames().map(|e| (e.animator, e.frame)).collect();
    assert_eq!(frames, vec![(child, 1), (anim.root(), 1)]);
    assert_eq!(
        root.descendant(&[ObjectId(9), ObjectId(100)])
            .unwrap()
            .transform
            .translate,
        Vec2::new(20.0, 0.0)
    );

    // Parent wraps and reuses the clip; the child keeps its own cursor.
    tick(&mut anim, &mut root, &lib, 1);
    assert_eq!(root.child(ObjectId(9)).unwrap().animator(), Some(child));
    assert_eq!(
        root.descendant(&[ObjectId(9), ObjectId(100)])
            .unwrap()
            .transform
            .translate,
        Vec2::new(30.0, 0.0)
    );
}

#[test]
fn removing_clip_retires_child_animator() {
    let mut lib = library();
    lib.insert_timeline(CharId(CLIP), counting_clip());
    let tl = Timeline::new(vec![
        Frame::new(vec![FrameCommand::place(CLIP, 9, Affine::IDENTITY)]),
        Frame::new(vec![FrameCommand::Remove {
            object_id: ObjectId(9),
        }]),
    ]);
    let mut anim = TimelineAnimator::new(tl.into_shared());
    let mut root = stage_root();
    tick(&mut anim, &mut root, &lib, 1);
    let child = root.child(ObjectId(9)).unwrap().animator().unwrap();
    assert_eq!(anim.arena().len(), 2);

    let mut sink = RecorderSink::new();
    anim.play_with_sink(&mut root, &lib, &mut sink);
    assert!(root.children().is_empty());
    assert!(!anim.arena().is_alive(child));
    assert_eq!(anim.arena().len(), 1);
    assert!(sink.records().iter().any(|r| matches!(
        r,
        TraceRecord::Retire(e) if e.animator == child && e.reason == RetireReason::Removed
    )));

    // Wrapping back spawns a fresh animator in a new generation.
    tick(&mut anim, &mut root, &lib, 1);
    let again = root.child(ObjectId(9)).unwrap().animator().unwrap();
    assert_ne!(again, child);
    assert_eq!(anim.arena().get(again).unwrap().current_frame(), 1);
}

#[test]
fn detached_clip_is_retired_on_next_tick() {
    let mut lib = library();
    lib.insert_timeline(CharId(CLIP), counting_clip());
    let tl = Timeline::new(vec![
        Frame::new(vec![FrameCommand::place(CLIP, 9, Affine::IDENTITY)]),
        Frame::default(),
    ]);
    let mut anim = TimelineAnimator::new(tl.into_shared());
    let mut root = stage_root();
    tick(&mut anim, &mut root, &lib, 1);
    let child = root.child(ObjectId(9)).unwrap().animator().unwrap();

    root.remove_all(ObjectId(9));
    let mut sink = RecorderSink::new();
    anim.play_with_sink(&mut root, &lib, &mut sink);
    assert!(!anim.arena().is_alive(child));
    assert!(anim.root_state().children().is_empty());
    assert!(sink.records().iter().any(|r| matches!(
        r,
        TraceRecord::Retire(e) if e.reason == RetireReason::Detached
    )));
}

#[test]
fn detached_clip_is_kept_when_retiring_is_off() {
    let mut lib = library();
    lib.insert_timeline(CharId(CLIP), counting_clip());
    let tl = Timeline::new(vec![
        Frame::new(vec![FrameCommand::place(CLIP, 9, Affine::IDENTITY)]),
        Frame::default(),
    ]);
    let opts = AnimatorOpts {
        retire_detached: false,
        ..AnimatorOpts::default()
    };
    let mut anim = TimelineAnimator::with_opts(tl.into_shared(), opts);
    let mut root = stage_root();
    tick(&mut anim, &mut root, &lib, 1);
    let child = root.child(ObjectId(9)).unwrap().animator().unwrap();

    root.remove_all(ObjectId(9));
    tick(&mut anim, &mut root, &lib, 1);
    assert!(anim.arena().is_alive(child));
    assert_eq!(anim.arena().get(child).unwrap().current_frame(), 1);
}

#[test]
fn self_referencing_clip_stops_at_nesting_limit() {
    let mut lib = library();
    let tl = Timeline::new(vec![Frame::new(vec![FrameCommand::place(
        CLIP,
        1,
        Affine::IDENTITY,
    )])])
    .into_shared();
    lib.insert_timeline(CharId(CLIP), Arc::clone(&tl));
    let opts = AnimatorOpts {
        max_nesting_depth: 3,
        ..AnimatorOpts::default()
    };
    let mut anim = TimelineAnimator::with_opts(tl, opts);
    let mut root = stage_root();

    let mut sink = RecorderSink::new();
    anim.play_with_sink(&mut root, &lib, &mut sink);
    assert_eq!(anim.arena().len(), 4);

    let deepest = root
        .descendant(&[ObjectId(1), ObjectId(1), ObjectId(1), ObjectId(1)])
        .unwrap();
    assert_eq!(
        deepest.kind,
        NodeKind::Clip {
            char_id: CharId(CLIP),
            animator: None,
        }
    );
    let limits: Vec<_> = sink
        .records()
        .iter()
        .filter_map(|r| match r {
            TraceRecord::NestingLimit(e) => Some(e.depth),
            _ => None,
        })
        .collect();
    assert_eq!(limits, vec![4]);
}

#[test]
fn inert_timeline_never_advances() {
    let lib = library();
    let mut anim = TimelineAnimator::new(Timeline::default().into_shared());
    let mut root = stage_root();
    root.push_child(DisplayNode::new(ObjectId(3), NodeKind::Shape(CharId(SHAPE))));
    let before = root.clone();

    let mut sink = RecorderSink::new();
    for _ in 0..3 {
        anim.play_with_sink(&mut root, &lib, &mut sink);
    }
    assert_eq!(root, before);
    assert_eq!(anim.current_frame(), 0);
    assert_eq!(anim.frame_count(), 0);
    assert!(sink.records().is_empty());
}

#[test]
fn move_on_missing_object_is_reported_and_ignored() {
    let lib = library();
    let tl = Timeline::new(vec![
        Frame::new(vec![FrameCommand::place(SHAPE, 1, Affine::translate((4.0, 4.0)))]),
        Frame::new(vec![FrameCommand::Move {
            object_id: ObjectId(2),
            matrix: Affine::translate((9.0, 9.0)),
        }]),
    ]);
    let mut anim = TimelineAnimator::new(tl.into_shared());
    let mut root = stage_root();
    tick(&mut anim, &mut root, &lib, 1);
    let before = root.clone();

    let mut sink = RecorderSink::new();
    anim.play_with_sink(&mut root, &lib, &mut sink);
    assert_eq!(root, before);
    let outcomes: Vec<_> = sink.commands().map(|e| e.outcome).collect();
    assert_eq!(outcomes, vec![crate::trace::Outcome::LookupMiss]);
}

#[test]
fn unsupported_commands_are_counted_per_frame() {
    let lib = library();
    let tl = Timeline::new(vec![Frame::new(vec![
        FrameCommand::Unsupported {
            cmd_type: "UpdateColorTransform".to_owned(),
        },
        FrameCommand::place(SHAPE, 1, Affine::IDENTITY),
    ])]);
    let mut anim = TimelineAnimator::new(tl.into_shared());
    let mut root = stage_root();
    let mut sink = RecorderSink::new();
    anim.play_with_sink(&mut root, &lib, &mut sink);
    let frame = sink.frames().next().unwrap();
    assert_eq!(frame.unsupported, 1);
    assert_eq!(frame.commands, 1);
    assert_eq!(ids(&root), vec![1]);
}

#[test]
fn recorder_can_be_cleared_between_ticks() {
    let lib = library();
    let tl = Timeline::new(vec![Frame::new(vec![FrameCommand::place(
        SHAPE,
        1,
        Affine::IDENTITY,
    )])]);
    let mut anim = TimelineAnimator::new(tl.into_shared());
    let mut root = stage_root();

    let mut sink = RecorderSink::new();
    anim.play_with_sink(&mut root, &lib, &mut sink);
    assert_eq!(sink.frames().count(), 1);
    sink.clear();
    assert!(sink.records().is_empty());

    anim.play_with_sink(&mut root, &lib, &mut sink);
    let frame = sink.frames().next().unwrap();
    assert!(frame.looped);
    assert_eq!(sink.into_records().len(), 3);
}
