//! Generational storage for animator state.

use std::{fmt, sync::Arc};

use crate::timeline::model::Timeline;

/// Handle to an animator slot in an [`AnimatorArena`].
///
/// Carries a generation counter so handles to retired slots are detected after
/// the slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub struct AnimatorId {
    index: u32,
    generation: u32,
}

impl AnimatorId {
    /// Raw slot index (diagnostics only).
    pub fn index(self) -> u32 {
        self.index
    }

    /// Generation counter.
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for AnimatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnimatorId({}@gen{})", self.index, self.generation)
    }
}

/// State of one timeline animator.
#[derive(Clone, Debug)]
pub struct AnimatorState {
    pub(crate) timeline: Arc<Timeline>,
    pub(crate) current_frame: usize,
    pub(crate) children: Vec<AnimatorId>,
    pub(crate) parent: Option<AnimatorId>,
    pub(crate) depth: usize,
}

impl AnimatorState {
    /// Timeline being played.
    pub fn timeline(&self) -> &Arc<Timeline> {
        &self.timeline
    }

    /// Frame cursor. Equals the frame count between the last frame and the
    /// wrap on the following tick.
    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    /// Spawned child animators in spawn order.
    pub fn children(&self) -> &[AnimatorId] {
        &self.children
    }

    /// Owning animator, `None` for a root.
    pub fn parent(&self) -> Option<AnimatorId> {
        self.parent
    }

    /// Nesting depth, 0 for a root.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    state: Option<AnimatorState>,
}

/// Slot arena holding a root animator and every nested animator it spawned.
#[derive(Clone, Debug, Default)]
pub struct AnimatorArena {
    slots: Vec<Slot>,
    free_list: Vec<u32>,
}

impl AnimatorArena {
    /// Empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a slot with the cursor at frame 0.
    pub(crate) fn alloc(
        &mut self,
        timeline: Arc<Timeline>,
        parent: Option<AnimatorId>,
        depth: usize,
    ) -> AnimatorId {
        let state = AnimatorState {
            timeline,
            current_frame: 0,
            children: Vec::new(),
            parent,
            depth,
        };
        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.state = Some(state);
            AnimatorId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
            self.slots.push(Slot {
                generation: 0,
                state: Some(state),
            });
            AnimatorId {
                index,
                generation: 0,
            }
        }
    }

    /// State of a live animator.
    pub fn get(&self, id: AnimatorId) -> Option<&AnimatorState> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.state.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: AnimatorId) -> Option<&mut AnimatorState> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.state.as_mut())
    }

    /// Whether `id` refers to a live animator.
    pub fn is_alive(&self, id: AnimatorId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live animators.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.state.is_some()).count()
    }

    /// Whether no animator is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Free `id` and all of its descendants, unlinking it from its parent.
    ///
    /// Returns the number of slots freed (0 for a stale handle).
    pub(crate) fn retire(&mut self, id: AnimatorId) -> usize {
        let Some(parent) = self.get(id).map(|s| s.parent) else {
            return 0;
        };
        if let Some(p) = parent.and_then(|p| self.get_mut(p)) {
            p.children.retain(|c| *c != id);
        }

        let mut freed = 0;
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            let Some(slot) = self.slots.get_mut(cur.index as usize) else {
                continue;
            };
            if slot.generation != cur.generation {
                continue;
            }
            if let Some(state) = slot.state.take() {
                stack.extend(state.children);
                self.free_list.push(cur.index);
                freed += 1;
            }
        }
        freed
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animator/arena.rs"]
mod tests;
