use crate::{
    foundation::core::{Affine, Point, Rect},
    foundation::error::{KinescopeError, KinescopeResult},
    graph::object::{FamilySnapshot, ObjectId, ObjectState, VisualObject},
};

/// One live node of the scene graph.
#[derive(Clone, Debug)]
pub struct Node {
    pub(crate) tag: Option<String>,
    pub(crate) name: Option<String>,
    pub(crate) state: ObjectState,
    pub(crate) children: Vec<ObjectId>,
    pub(crate) parent: Option<ObjectId>,
}

impl Node {
    /// Structural-matching tag.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Debug name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Current state.
    pub fn state(&self) -> &ObjectState {
        &self.state
    }

    /// Owned children in paint order.
    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }

    /// Owning parent, if attached.
    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Arena of [`Node`]s forming one tree under a root group, plus detached subtrees.
///
/// Parents exclusively own their children: a node has at most one parent, and destroying
/// a node frees its whole subtree. Nodes not reachable from [`SceneGraph::root`] are kept
/// alive (so timelines can stage them) but are never drawn.
#[derive(Clone, Debug)]
pub struct SceneGraph {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: ObjectId,
    live: usize,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Graph holding only an empty root group.
    pub fn new() -> Self {
        let mut graph = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: ObjectId {
                index: 0,
                generation: 0,
            },
            live: 0,
        };
        graph.root = graph.alloc(Node {
            tag: None,
            name: Some("root".to_string()),
            state: ObjectState::default(),
            children: Vec::new(),
            parent: None,
        });
        graph
    }

    /// The root group.
    pub fn root(&self) -> ObjectId {
        self.root
    }

    /// Number of live nodes, including the root and detached subtrees.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether only the root exists.
    pub fn is_empty(&self) -> bool {
        self.live <= 1
    }

    fn alloc(&mut self, node: Node) -> ObjectId {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return ObjectId {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        ObjectId {
            index,
            generation: 0,
        }
    }

    /// Whether `id` names a live node.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.get(id).is_some()
    }

    /// Borrow a node if it is alive.
    pub fn get(&self, id: ObjectId) -> Option<&Node> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    fn get_mut(&mut self, id: ObjectId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    /// Borrow a node or fail with [`KinescopeError::UnknownObject`].
    pub fn node(&self, id: ObjectId) -> KinescopeResult<&Node> {
        self.get(id)
            .ok_or_else(|| KinescopeError::unknown(format!("{id} is not a live object")))
    }

    pub(crate) fn node_mut(&mut self, id: ObjectId) -> KinescopeResult<&mut Node> {
        self.get_mut(id)
            .ok_or_else(|| KinescopeError::unknown(format!("{id} is not a live object")))
    }

    /// Current state of a node.
    pub fn state(&self, id: ObjectId) -> KinescopeResult<&ObjectState> {
        Ok(&self.node(id)?.state)
    }

    /// Mutable state of a node.
    pub fn state_mut(&mut self, id: ObjectId) -> KinescopeResult<&mut ObjectState> {
        Ok(&mut self.node_mut(id)?.state)
    }

    /// Set or clear the structural-matching tag of a node.
    pub fn set_tag(&mut self, id: ObjectId, tag: Option<String>) -> KinescopeResult<()> {
        self.node_mut(id)?.tag = tag;
        Ok(())
    }

    /// Materialize a declared tree as a detached subtree and return its root.
    pub fn insert(&mut self, obj: VisualObject) -> ObjectId {
        let VisualObject {
            tag,
            name,
            state,
            children,
        } = obj;
        let id = self.alloc(Node {
            tag,
            name,
            state,
            children: Vec::new(),
            parent: None,
        });
        for child in children {
            let child_id = self.insert(child);
            self.link(id, None, child_id);
        }
        id
    }

    /// Insert a declared tree and attach it as the last child of the root.
    pub fn add(&mut self, obj: VisualObject) -> ObjectId {
        let id = self.insert(obj);
        self.link(self.root, None, id);
        id
    }

    fn link(&mut self, parent: ObjectId, index: Option<usize>, child: ObjectId) {
        if let Some(p) = self.get_mut(parent) {
            match index {
                Some(i) if i < p.children.len() => p.children.insert(i, child),
                _ => p.children.push(child),
            }
        }
        if let Some(c) = self.get_mut(child) {
            c.parent = Some(parent);
        }
    }

    /// Append `child` to `parent`, moving it out of any previous parent.
    pub fn add_child(&mut self, parent: ObjectId, child: ObjectId) -> KinescopeResult<()> {
        self.insert_child(parent, usize::MAX, child)
    }

    /// Insert `child` at `index` (clamped) among `parent`'s children.
    pub fn insert_child(
        &mut self,
        parent: ObjectId,
        index: usize,
        child: ObjectId,
    ) -> KinescopeResult<()> {
        self.node(parent)?;
        self.node(child)?;
        if child == self.root {
            return Err(KinescopeError::validation("the root cannot become a child"));
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(KinescopeError::validation(format!(
                "attaching {child} under {parent} would create a cycle"
            )));
        }
        self.detach(child)?;
        self.link(parent, Some(index), child);
        Ok(())
    }

    /// Detach `child` from `parent`. Returns `false` when it was not a child of `parent`.
    ///
    /// The child stays alive as a detached subtree; use [`SceneGraph::destroy`] to free it.
    pub fn remove_child(&mut self, parent: ObjectId, child: ObjectId) -> KinescopeResult<bool> {
        let p = self.node_mut(parent)?;
        let Some(pos) = p.children.iter().position(|&c| c == child) else {
            return Ok(false);
        };
        p.children.remove(pos);
        if let Some(c) = self.get_mut(child) {
            c.parent = None;
        }
        Ok(true)
    }

    /// Detach a node from whatever parent owns it.
    pub fn detach(&mut self, id: ObjectId) -> KinescopeResult<()> {
        if let Some(parent) = self.node(id)?.parent {
            self.remove_child(parent, id)?;
        }
        Ok(())
    }

    /// Free a node and its whole subtree. The root cannot be destroyed.
    pub fn destroy(&mut self, id: ObjectId) -> KinescopeResult<()> {
        if id == self.root {
            return Err(KinescopeError::validation("the root cannot be destroyed"));
        }
        self.detach(id)?;
        for member in self.family(id)? {
            let slot = &mut self.slots[member.index as usize];
            slot.node = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(member.index);
            self.live -= 1;
        }
        Ok(())
    }

    /// Deep copy of a subtree with fresh ids and identical tags. The copy is detached.
    pub fn clone_subtree(&mut self, id: ObjectId) -> KinescopeResult<ObjectId> {
        let decl = self.declaration(id)?;
        Ok(self.insert(decl))
    }

    /// Rebuild the declarative description of a subtree.
    pub fn declaration(&self, id: ObjectId) -> KinescopeResult<VisualObject> {
        let node = self.node(id)?;
        Ok(VisualObject {
            tag: node.tag.clone(),
            name: node.name.clone(),
            state: node.state.clone(),
            children: node
                .children
                .iter()
                .map(|&c| self.declaration(c))
                .collect::<KinescopeResult<Vec<_>>>()?,
        })
    }

    /// Ids of the subtree rooted at `id`, in pre-order.
    pub fn family(&self, id: ObjectId) -> KinescopeResult<Vec<ObjectId>> {
        self.node(id)?;
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            out.push(cur);
            if let Some(node) = self.get(cur) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        Ok(out)
    }

    /// Members of the subtree without children.
    pub fn leaves(&self, id: ObjectId) -> KinescopeResult<Vec<ObjectId>> {
        Ok(self
            .family(id)?
            .into_iter()
            .filter(|&m| self.get(m).is_some_and(|n| n.children.is_empty()))
            .collect())
    }

    /// Subtree members carrying `tag`, in pre-order.
    pub fn find_by_tag(&self, id: ObjectId, tag: &str) -> KinescopeResult<Vec<ObjectId>> {
        Ok(self
            .family(id)?
            .into_iter()
            .filter(|&m| self.get(m).and_then(|n| n.tag.as_deref()) == Some(tag))
            .collect())
    }

    /// Pre-order states of a subtree.
    pub fn family_snapshot(&self, id: ObjectId) -> KinescopeResult<FamilySnapshot> {
        let states = self
            .family(id)?
            .into_iter()
            .map(|m| self.state(m).cloned())
            .collect::<KinescopeResult<Vec<_>>>()?;
        Ok(FamilySnapshot { states })
    }

    /// Write `snapshot` onto `members` (as returned by [`SceneGraph::family`]).
    pub fn write_family(
        &mut self,
        members: &[ObjectId],
        snapshot: &FamilySnapshot,
    ) -> KinescopeResult<()> {
        if members.len() != snapshot.states.len() {
            return Err(KinescopeError::evaluation(format!(
                "family changed shape: {} members, {} states",
                members.len(),
                snapshot.states.len()
            )));
        }
        for (&id, state) in members.iter().zip(snapshot.states.iter()) {
            *self.state_mut(id)? = state.clone();
        }
        Ok(())
    }

    /// Whether `a` is `b` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, a: ObjectId, b: ObjectId) -> bool {
        let mut cur = Some(b);
        while let Some(id) = cur {
            if id == a {
                return true;
            }
            cur = self.get(id).and_then(|n| n.parent);
        }
        false
    }

    /// Whether the node is reachable from the root (and therefore drawn).
    pub fn is_attached(&self, id: ObjectId) -> bool {
        self.contains(id) && self.is_ancestor_or_self(self.root, id)
    }

    /// Object-to-world transform (product of local transforms from the root down).
    pub fn world_transform(&self, id: ObjectId) -> KinescopeResult<Affine> {
        let node = self.node(id)?;
        let local = node.state.transform.to_affine();
        match node.parent {
            Some(parent) => Ok(self.world_transform(parent)? * local),
            None => Ok(local),
        }
    }

    /// World transform of the node's parent (identity for unparented nodes).
    pub fn parent_world_transform(&self, id: ObjectId) -> KinescopeResult<Affine> {
        match self.node(id)?.parent {
            Some(parent) => self.world_transform(parent),
            None => Ok(Affine::IDENTITY),
        }
    }

    /// Product of opacities from the root down to the node.
    pub fn world_opacity(&self, id: ObjectId) -> KinescopeResult<f64> {
        let node = self.node(id)?;
        let own = node.state.opacity;
        match node.parent {
            Some(parent) => Ok(self.world_opacity(parent)? * own),
            None => Ok(own),
        }
    }

    /// Bounds of the subtree's geometry mapped through `base * relative(member)`.
    fn family_bounds(&self, id: ObjectId, base: Affine) -> KinescopeResult<Option<Rect>> {
        let node = self.node(id)?;
        let mut out = node
            .state
            .path
            .points
            .iter()
            .map(|&p| base * p)
            .fold(None::<Rect>, |acc, p| {
                Some(match acc {
                    Some(r) => r.union_pt(p),
                    None => Rect::from_points(p, p),
                })
            });
        for &child in &node.children {
            let child_local = self.node(child)?.state.transform.to_affine();
            if let Some(r) = self.family_bounds(child, base * child_local)? {
                out = Some(match out {
                    Some(o) => o.union(r),
                    None => r,
                });
            }
        }
        Ok(out)
    }

    /// World-space bounding box of the subtree's geometry.
    pub fn bounding_box(&self, id: ObjectId) -> KinescopeResult<Option<Rect>> {
        let world = self.world_transform(id)?;
        self.family_bounds(id, world)
    }

    /// Bounding box of the subtree in the node's own local coordinates.
    pub fn local_bounds(&self, id: ObjectId) -> KinescopeResult<Option<Rect>> {
        self.family_bounds(id, Affine::IDENTITY)
    }

    /// World-space center of the subtree's bounding box (the node's origin when it has no
    /// geometry).
    pub fn center(&self, id: ObjectId) -> KinescopeResult<Point> {
        match self.bounding_box(id)? {
            Some(r) => Ok(r.center()),
            None => Ok(self.world_transform(id)? * Point::ORIGIN),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/arena.rs"]
mod tests;
