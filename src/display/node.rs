use crate::animator::arena::AnimatorId;
use crate::foundation::core::{CharId, NodeTransform, ObjectId};

/// What a display node renders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum NodeKind {
    /// Plain grouping node (stage root, host-created containers).
    Container,
    /// Vector shape leaf.
    Shape(CharId),
    /// Bitmap leaf.
    Bitmap(CharId),
    /// Text leaf.
    Text(CharId),
    /// Nested timeline host.
    Clip {
        /// Timeline character that was placed.
        char_id: CharId,
        /// Animator driving this node's children, if one was spawned.
        animator: Option<AnimatorId>,
    },
    /// Placed character that resolved to nothing renderable (e.g. a sound).
    Placeholder(CharId),
}

/// A live, mutable, identity-bearing node of the display tree.
///
/// A node exclusively owns its children. Children are kept in z-order: index 0
/// is drawn first.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct DisplayNode {
    /// Identity used for all command matching.
    pub id: ObjectId,
    /// Rendered content.
    pub kind: NodeKind,
    /// Decomposed local transform.
    pub transform: NodeTransform,
    /// Visibility flag.
    pub visible: bool,
    children: Vec<DisplayNode>,
}

impl DisplayNode {
    /// Create a visible node with an identity transform and no children.
    pub fn new(id: ObjectId, kind: NodeKind) -> Self {
        Self {
            id,
            kind,
            transform: NodeTransform::default(),
            visible: true,
            children: Vec::new(),
        }
    }

    /// Create an empty container, typically used as a stage root.
    pub fn container(id: ObjectId) -> Self {
        Self::new(id, NodeKind::Container)
    }

    /// Children in z-order.
    pub fn children(&self) -> &[DisplayNode] {
        &self.children
    }

    /// Ids of the children in z-order.
    pub fn child_ids(&self) -> Vec<ObjectId> {
        self.children.iter().map(|c| c.id).collect()
    }

    /// Index of the first child with `id`.
    pub fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.children.iter().position(|c| c.id == id)
    }

    /// First child with `id`.
    pub fn child(&self, id: ObjectId) -> Option<&DisplayNode> {
        self.children.iter().find(|c| c.id == id)
    }

    /// First child with `id`, mutably.
    pub fn child_mut(&mut self, id: ObjectId) -> Option<&mut DisplayNode> {
        self.children.iter_mut().find(|c| c.id == id)
    }

    /// Whether any child carries `id`.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.index_of(id).is_some()
    }

    /// Append a child on top of the z-order.
    pub fn push_child(&mut self, child: DisplayNode) {
        self.children.push(child);
    }

    /// Insert `child` immediately before the sibling `before`.
    ///
    /// Appends when `before` is `None` or no such sibling exists. Returns the
    /// index the child landed at.
    pub fn insert_before(&mut self, child: DisplayNode, before: Option<ObjectId>) -> usize {
        let at = before
            .and_then(|id| self.index_of(id))
            .unwrap_or(self.children.len());
        self.children.insert(at, child);
        at
    }

    /// Remove every child carrying `id`, returning them in their former order.
    pub fn remove_all(&mut self, id: ObjectId) -> Vec<DisplayNode> {
        let mut removed = Vec::new();
        let mut i = 0;
        while i < self.children.len() {
            if self.children[i].id == id {
                removed.push(self.children.remove(i));
            } else {
                i += 1;
            }
        }
        removed
    }

    /// Reposition child `id` to the index immediately preceding sibling `before`.
    ///
    /// Returns `false` (and leaves the order untouched) when either node is
    /// missing or both ids are the same.
    pub fn move_before(&mut self, id: ObjectId, before: ObjectId) -> bool {
        if id == before {
            return false;
        }
        let (Some(from), Some(_)) = (self.index_of(id), self.index_of(before)) else {
            return false;
        };
        let node = self.children.remove(from);
        // Sibling index is recomputed after the removal shifted it.
        let at = self.index_of(before).unwrap_or(self.children.len());
        self.children.insert(at, node);
        true
    }

    /// Every child carrying `id`, mutably.
    pub fn children_with_id_mut(
        &mut self,
        id: ObjectId,
    ) -> impl Iterator<Item = &mut DisplayNode> + '_ {
        self.children.iter_mut().filter(move |c| c.id == id)
    }

    /// Child at `index`, mutably.
    pub fn child_at_mut(&mut self, index: usize) -> Option<&mut DisplayNode> {
        self.children.get_mut(index)
    }

    /// Direct child hosting the animator `animator`.
    pub fn animated_child_mut(&mut self, animator: AnimatorId) -> Option<&mut DisplayNode> {
        self.children
            .iter_mut()
            .find(|c| c.animator() == Some(animator))
    }

    /// Animator driving this node, if it is an animated clip.
    pub fn animator(&self) -> Option<AnimatorId> {
        match self.kind {
            NodeKind::Clip { animator, .. } => animator,
            _ => None,
        }
    }

    /// Depth-first search for a descendant by id path from this node.
    pub fn descendant(&self, path: &[ObjectId]) -> Option<&DisplayNode> {
        let mut node = self;
        for id in path {
            node = node.child(*id)?;
        }
        Some(node)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/display/node.rs"]
mod tests;
