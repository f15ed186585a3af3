/**
 * Stable handle to a node slot in a `NodeArena`. The handle is a slot index
 * paired with a generation counter; releasing a node bumps the slot's
 * generation, so a handle held across a release never aliases whatever node
 * is later allocated into the same slot.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub const fn generation(self) -> u32 {
        self.1
    }
}




/**
 * Which slot of its parent a node occupies. `None` covers both rootless
 * nodes and the degenerate case where a recorded parent no longer
 * references the node in either slot.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChildType {
    Left,
    Right,
    None,
}




/**
 * The parent/child linkage of one node: an optional back reference to the
 * owning parent and up to one child per slot. This is pure bookkeeping; no
 * operation here recomputes or cascades anything. A copy of this record,
 * taken before a structural edit, serves as the immutable snapshot that
 * `NodeArena::detach` hands back for tree surgery.
 */
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeContext {
    pub parent: Option<NodeId>,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}




// ============================================================================
impl NodeContext {

    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    pub fn has_left(&self) -> bool {
        self.left.is_some()
    }

    pub fn has_right(&self) -> bool {
        self.right.is_some()
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    pub fn is_single_parent(&self) -> bool {
        self.left.is_some() != self.right.is_some()
    }

    /**
     * The one present child, when exactly one slot is occupied.
     */
    pub fn single_child(&self) -> Option<NodeId> {
        match (self.left, self.right) {
            (Some(child), None) | (None, Some(child)) => Some(child),
            _ => None,
        }
    }
}
