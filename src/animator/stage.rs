use std::sync::Arc;

use crate::animator::timeline_animator::{AnimatorOpts, TimelineAnimator};
use crate::assets::library::AssetLibrary;
use crate::display::node::DisplayNode;
use crate::foundation::core::ObjectId;
use crate::foundation::error::{StagehandError, StagehandResult};
use crate::timeline::document::Document;
use crate::timeline::model::Timeline;
use crate::trace::TraceSink;

/// Owns an asset library, a root display node and the animator driving it.
///
/// Hosts that manage their own tree use [`TimelineAnimator`] directly; `Stage`
/// covers the common case of playing a loaded document.
#[derive(Clone, Debug)]
pub struct Stage {
    library: AssetLibrary,
    root: DisplayNode,
    animator: TimelineAnimator,
    ticks: u64,
}

impl Stage {
    /// Stage rooted at an empty container with id 0.
    pub fn new(library: AssetLibrary, timeline: Arc<Timeline>, opts: AnimatorOpts) -> Self {
        Self {
            library,
            root: DisplayNode::container(ObjectId(0)),
            animator: TimelineAnimator::with_opts(timeline, opts),
            ticks: 0,
        }
    }

    /// Stage playing a document's main timeline.
    pub fn from_document(doc: Document, opts: AnimatorOpts) -> StagehandResult<Self> {
        let (library, root) = doc.into_parts();
        let timeline =
            root.ok_or_else(|| StagehandError::validation("document has no main timeline"))?;
        Ok(Self::new(library, timeline, opts))
    }

    /// Play one frame.
    pub fn tick(&mut self) {
        self.animator.play(&mut self.root, &self.library);
        self.ticks += 1;
    }

    /// Play one frame, reporting events to `sink`.
    pub fn tick_with_sink(&mut self, sink: &mut dyn TraceSink) {
        self.animator
            .play_with_sink(&mut self.root, &self.library, sink);
        self.ticks += 1;
    }

    /// Root display node.
    pub fn root(&self) -> &DisplayNode {
        &self.root
    }

    /// Root animator.
    pub fn animator(&self) -> &TimelineAnimator {
        &self.animator
    }

    /// Asset library used as resolver.
    pub fn library(&self) -> &AssetLibrary {
        &self.library
    }

    /// Ticks played so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
