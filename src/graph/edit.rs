use crate::{
    foundation::core::{Affine, Transform2D},
    foundation::error::KinescopeResult,
    graph::arena::SceneGraph,
    graph::object::ObjectId,
};

/// Structural change to the scene graph, run by timeline hooks.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphEdit {
    /// Attach `child` under `parent` (the root when `None`) at `index` (appended when `None`).
    Attach {
        /// New owner.
        parent: Option<ObjectId>,
        /// Node to attach.
        child: ObjectId,
        /// Position among siblings.
        index: Option<usize>,
    },
    /// Attach a node to the root unless it already has a parent.
    Introduce(ObjectId),
    /// Detach a node from its parent, keeping it alive.
    Detach(ObjectId),
    /// Free a node and its subtree.
    Destroy(ObjectId),
    /// Put `new` where `old` sits in the tree, keeping `new`'s world placement, then free
    /// `old`.
    Replace {
        /// Node leaving the tree.
        old: ObjectId,
        /// Node taking its place.
        new: ObjectId,
    },
}

impl GraphEdit {
    /// Attach `child` as the last child of the root.
    pub fn attach_to_root(child: ObjectId) -> Self {
        Self::Attach {
            parent: None,
            child,
            index: None,
        }
    }
}

impl SceneGraph {
    /// Apply one hook edit.
    ///
    /// Edits naming nodes that are already gone are skipped, so cancelling and finishing a
    /// timeline may both run the same finish hooks without failing.
    pub fn apply_edit(&mut self, edit: &GraphEdit) -> KinescopeResult<()> {
        match *edit {
            GraphEdit::Attach {
                parent,
                child,
                index,
            } => {
                let parent = parent.unwrap_or(self.root());
                if !self.contains(child) || !self.contains(parent) {
                    return Ok(());
                }
                if self.node(child)?.parent() == Some(parent) {
                    return Ok(());
                }
                self.insert_child(parent, index.unwrap_or(usize::MAX), child)
            }
            GraphEdit::Introduce(id) => {
                if self.contains(id) && self.node(id)?.parent().is_none() {
                    let root = self.root();
                    self.add_child(root, id)?;
                }
                Ok(())
            }
            GraphEdit::Detach(id) => {
                if self.contains(id) {
                    self.detach(id)?;
                }
                Ok(())
            }
            GraphEdit::Destroy(id) => {
                if self.contains(id) {
                    self.destroy(id)?;
                }
                Ok(())
            }
            GraphEdit::Replace { old, new } => {
                if !self.contains(old) || !self.contains(new) || old == new {
                    return Ok(());
                }
                let world = self.world_transform(new)?;
                self.detach(new)?;
                if let Some(parent) = self.node(old)?.parent() {
                    let index = self
                        .node(parent)?
                        .children()
                        .iter()
                        .position(|&c| c == old)
                        .unwrap_or(usize::MAX);
                    self.insert_child(parent, index, new)?;
                    let local = self.parent_world_transform(new)?.inverse() * world;
                    let state = self.state_mut(new)?;
                    if !affine_close(state.transform.to_affine(), local) {
                        state.transform = Transform2D::from_affine(local);
                    }
                }
                self.destroy(old)
            }
        }
    }
}

fn affine_close(a: Affine, b: Affine) -> bool {
    a.as_coeffs()
        .iter()
        .zip(b.as_coeffs().iter())
        .all(|(x, y)| (x - y).abs() < 1e-9)
}

#[cfg(test)]
#[path = "../../tests/unit/graph/edit.rs"]
mod tests;
