use crate::bucket::IntervalBucket;
use crate::context::{ChildType, NodeContext, NodeId};
use crate::filter::{self, IntervalFilter};
use crate::interval::Interval;
use core::convert::TryFrom;
use core::fmt;
use core::ops::{Index, IndexMut};
use log::warn;
use std::cmp::Ordering;




/**
 * A node of the interval index: the bucket of intervals sharing one
 * normalized `[start, end]` key, together with the augmented values a
 * balanced-tree driver reads to rebalance the tree and prune searches.
 *
 * `max` is the greatest end ordinal in the node's subtree, `height` the
 * longest downward path counted in nodes (a lone node has height 1), and
 * `level` the depth below the tree root (a root has level 0). The node
 * keeps all three consistent with the live tree shape in response to the
 * structural edits on `NodeArena`; it never initiates tree-wide work.
 */
#[derive(Clone)]
pub struct Node<B: IntervalBucket> {
    start: i64,
    end: i64,
    max: i64,
    height: usize,
    level: usize,
    ctx: NodeContext,
    bucket: B,
}




// ============================================================================
impl<B: IntervalBucket> Node<B> {




    /**
     * Create a standalone node founded on the given interval. The bucket is
     * built empty here and seeded with the founding interval, so the node
     * starts out satisfying every invariant: `max` equals its own end,
     * height 1, level 0, no links.
     */
    pub fn new(interval: B::Item) -> Self
    where
        B: Default,
    {
        Self::with_bucket(interval, B::default())
    }




    /**
     * Like `new`, but storing members in a caller-supplied bucket, for
     * engines whose instances come from a factory. The bucket must be
     * empty; a non-empty one is a recoverable caller bug, answered by
     * clearing it and proceeding.
     */
    pub fn with_bucket(interval: B::Item, mut bucket: B) -> Self {
        if !bucket.is_empty() {
            warn!(
                "new node handed a bucket holding {} members, clearing it",
                bucket.len()
            );
            bucket.clear();
        }
        let (start, end) = interval.norm_bounds();
        bucket.add(interval);

        Self {
            start,
            end,
            max: end,
            height: 1,
            level: 0,
            ctx: NodeContext::new(),
            bucket,
        }
    }


    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.ctx.parent
    }

    pub fn left(&self) -> Option<NodeId> {
        self.ctx.left
    }

    pub fn right(&self) -> Option<NodeId> {
        self.ctx.right
    }

    pub fn has_parent(&self) -> bool {
        self.ctx.has_parent()
    }

    pub fn has_left(&self) -> bool {
        self.ctx.has_left()
    }

    pub fn has_right(&self) -> bool {
        self.ctx.has_right()
    }

    pub fn is_leaf(&self) -> bool {
        self.ctx.is_leaf()
    }

    pub fn is_single_parent(&self) -> bool {
        self.ctx.is_single_parent()
    }

    pub fn single_child(&self) -> Option<NodeId> {
        self.ctx.single_child()
    }




    /**
     * A copy of the node's current linkage.
     */
    pub fn context(&self) -> NodeContext {
        self.ctx
    }




    /**
     * Add an interval to the bucket, provided its normalized bounds equal
     * this node's key exactly. A mismatched interval is refused with no
     * mutation; repositioning or splitting a node is never done here, so a
     * false return is the caller's signal to pick a different node.
     */
    pub fn add_interval(&mut self, interval: B::Item) -> bool {
        if interval.norm_bounds() == (self.start, self.end) {
            self.bucket.add(interval)
        } else {
            false
        }
    }




    /**
     * Remove one member equal to the given interval, reporting whether a
     * removal took place. An emptied bucket marks the node as a deletion
     * candidate; acting on that is the tree driver's decision, so the node
     * stays attached regardless.
     */
    pub fn remove_interval(&mut self, interval: &B::Item) -> bool {
        self.bucket.remove(interval)
    }




    /**
     * The members whose normalized bounds equal the query's.
     */
    pub fn find<'a>(&'a self, query: &'a B::Item) -> Box<dyn Iterator<Item = &'a B::Item> + 'a> {
        self.find_with(query, filter::equal)
    }




    /**
     * The members matching the query under the given filter.
     */
    pub fn find_with<'a>(
        &'a self,
        query: &'a B::Item,
        filter: IntervalFilter<B::Item>,
    ) -> Box<dyn Iterator<Item = &'a B::Item> + 'a> {
        self.bucket.find(query, filter)
    }




    /**
     * Read-only view of the whole bucket, in bucket-defined order.
     */
    pub fn intervals(&self) -> Box<dyn Iterator<Item = &B::Item> + '_> {
        self.bucket.iter()
    }




    /**
     * A fresh, finite traversal of the bucket's contents at call time.
     */
    pub fn iter(&self) -> Box<dyn Iterator<Item = &B::Item> + '_> {
        self.bucket.iter()
    }


    pub fn len(&self) -> usize {
        self.bucket.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bucket.is_empty()
    }




    /**
     * Total order over nodes: primary key `start`, tie-break `end`, both
     * ascending. The same order drives `compare_interval` and
     * `compare_bounds`, so a driver may search with either form.
     */
    pub fn compare(&self, other: &Self) -> Ordering {
        self.compare_bounds(other.start, other.end)
    }

    pub fn compare_interval<I: Interval>(&self, interval: &I) -> Ordering {
        let (start, end) = interval.norm_bounds();
        self.compare_bounds(start, end)
    }

    pub fn compare_bounds(&self, start: i64, end: i64) -> Ordering {
        (self.start, self.end).cmp(&(start, end))
    }




    /**
     * Short identifier of the node's key, for diagnostics.
     */
    pub fn id(&self) -> String {
        format!("[{}, {}]", self.start, self.end)
    }
}




// ============================================================================
impl<B: IntervalBucket> fmt::Display for Node<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}] (max: {}, count: {}, level: {}, height: {})",
            self.start,
            self.end,
            self.max,
            self.bucket.len(),
            self.level,
            self.height
        )
    }
}




/**
 * Arena owning the nodes of one tree, addressed by generational `NodeId`
 * handles. Parent and child relations are plain index fields on the nodes,
 * so the structure carries no reference cycles; all structural mutation and
 * augmentation upkeep goes through the methods here, while bucket access
 * goes through `Index`/`IndexMut` straight to the node.
 *
 * The arena assumes one logical owner: every mutating operation takes
 * `&mut self`, so concurrent structural edits are ruled out by the borrow
 * rules rather than by locks.
 */
#[derive(Clone)]
pub struct NodeArena<B: IntervalBucket> {
    slots: Vec<Slot<B>>,
    free: Vec<u32>,
}

#[derive(Clone)]
struct Slot<B: IntervalBucket> {
    generation: u32,
    node: Option<Node<B>>,
}




// ============================================================================
impl<B: IntervalBucket> NodeArena<B> {

    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }




    /**
     * The number of live nodes.
     */
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }




    /**
     * Allocate a node founded on the given interval and return its handle.
     */
    pub fn insert(&mut self, interval: B::Item) -> NodeId
    where
        B: Default,
    {
        self.alloc(Node::new(interval))
    }




    /**
     * Allocate a node whose members live in a caller-supplied bucket. The
     * bucket must be empty on entry; see `Node::with_bucket`.
     */
    pub fn insert_with_bucket(&mut self, interval: B::Item, bucket: B) -> NodeId {
        self.alloc(Node::with_bucket(interval, bucket))
    }




    /**
     * Place an existing node value into the arena, reusing a free slot if
     * one is available. The node must be detached; handles recorded in its
     * context would be meaningless under this arena.
     */
    pub fn alloc(&mut self, node: Node<B>) -> NodeId {
        match self.free.pop() {
            Some(idx) => {
                let slot = &mut self.slots[idx as usize];
                slot.node = Some(node);
                NodeId::new(idx, slot.generation)
            }
            None => {
                let idx = u32::try_from(self.slots.len()).expect("node id overflow");
                self.slots.push(Slot {
                    generation: 1,
                    node: Some(node),
                });
                NodeId::new(idx, 1)
            }
        }
    }




    /**
     * Take a node out of the arena, freeing its slot for reuse. The handle
     * dies with the slot: later lookups through it yield `None`. Meant for
     * nodes the driver has already detached; a released node that other
     * nodes still link to leaves those links stale, which readers such as
     * `child_type` degrade on rather than trust.
     */
    pub fn release(&mut self, id: NodeId) -> Option<Node<B>> {
        let slot = self.slots.get_mut(id.idx())?;
        if slot.generation != id.generation() {
            return None;
        }
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.0);
        Some(node)
    }


    pub fn get(&self, id: NodeId) -> Option<&Node<B>> {
        self.slots
            .get(id.idx())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<B>> {
        self.slots
            .get_mut(id.idx())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_mut())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }




    /**
     * Handles of all live nodes, in slot order.
     */
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.slots.iter().enumerate().filter_map(|(idx, slot)| {
            slot.node
                .as_ref()
                .map(|_| NodeId::new(idx as u32, slot.generation))
        })
    }




    /**
     * Bind `child` into the left slot of `id`. A `Some` child has its
     * parent reference rebound to `id` and its level cascaded below
     * `id`'s; either way the node's `max` and `height` are then recomputed
     * from its current children. This recompute is the single
     * synchronization point for every structural edit.
     */
    pub fn set_left(&mut self, id: NodeId, child: Option<NodeId>) {
        self.set_child(id, ChildType::Left, child)
    }




    /**
     * Bind `child` into the right slot of `id`; see `set_left`.
     */
    pub fn set_right(&mut self, id: NodeId, child: Option<NodeId>) {
        self.set_child(id, ChildType::Right, child)
    }


    fn set_child(&mut self, id: NodeId, slot: ChildType, child: Option<NodeId>) {
        match slot {
            ChildType::Left => self[id].ctx.left = child,
            ChildType::Right => self[id].ctx.right = child,
            ChildType::None => return,
        }

        if let Some(child) = child {
            self[child].ctx.parent = Some(id);
            let level = self[id].level + 1;
            self.set_level(child, level);
        }

        self.update_max(id);
        self.update_height(id);
    }




    /**
     * Rebind whichever slot `old_child` occupies to `new_child`. A no-op
     * when `old_child` occupies neither slot.
     */
    pub fn replace_child(&mut self, id: NodeId, old_child: NodeId, new_child: Option<NodeId>) {
        if self[id].ctx.left == Some(old_child) {
            self.set_left(id, new_child)
        } else if self[id].ctx.right == Some(old_child) {
            self.set_right(id, new_child)
        }
    }


    pub fn remove_child(&mut self, id: NodeId, child: NodeId) {
        self.replace_child(id, child, None)
    }




    /**
     * Unlink the node from the tree and return a snapshot of its pre-detach
     * linkage, for whatever relinking logic the driver owns. The former
     * parent's slot is cleared (recomputing the parent chain), then the
     * node's own parent and child slots; the recomputes leave the node a
     * subtree of one, with `max` equal to its own end, height 1 and level
     * 0. The node stays valid for reinsertion elsewhere.
     *
     * Former children are not relinked here: each still records this node
     * as its parent until the driver decides where they go. While stale,
     * `child_type` on them reports `ChildType::None`.
     */
    pub fn detach(&mut self, id: NodeId) -> NodeContext {
        let snapshot = self[id].ctx;

        if let Some(parent) = snapshot.parent {
            self.remove_child(parent, id);
        }

        self[id].ctx.parent = None;
        self.set_left(id, None);
        self.set_right(id, None);
        self.set_level(id, 0);

        snapshot
    }




    /**
     * Which slot of its parent the node currently occupies, by handle
     * identity against the parent's live slots. Reports `ChildType::None`
     * for rootless nodes, and degrades to the same when the recorded
     * parent is gone or references the node in neither slot.
     */
    pub fn child_type(&self, id: NodeId) -> ChildType {
        let parent = match self[id].ctx.parent.and_then(|parent| self.get(parent)) {
            Some(parent) => parent,
            None => return ChildType::None,
        };

        if parent.ctx.left == Some(id) {
            ChildType::Left
        } else if parent.ctx.right == Some(id) {
            ChildType::Right
        } else {
            ChildType::None
        }
    }




    /**
     * Assign the node's subtree maximum and push the change up the parent
     * chain, recomputing each ancestor from its current children and
     * stopping at the first one whose value does not move. Returns the
     * number of nodes written, which is 0 when the value is already
     * current.
     */
    pub fn set_max(&mut self, id: NodeId, max: i64) -> usize {
        let mut writes = 0;
        let mut at = id;
        let mut value = max;

        loop {
            let node = &mut self[at];
            if node.max == value {
                break;
            }
            node.max = value;
            writes += 1;

            match node.ctx.parent {
                Some(parent) => {
                    at = parent;
                    value = self.local_max(parent);
                }
                None => break,
            }
        }
        writes
    }




    /**
     * Recompute the node's subtree maximum from its children and propagate
     * as `set_max`. With no children the maximum is the node's own end;
     * with one child, the larger of the own end and the child's maximum.
     * Once both slots are occupied only the children are consulted: under
     * the driver's ordering discipline a child subtree already carries the
     * subtree maximum.
     */
    pub fn update_max(&mut self, id: NodeId) -> usize {
        let max = self.local_max(id);
        self.set_max(id, max)
    }


    fn local_max(&self, id: NodeId) -> i64 {
        let node = &self[id];
        match (node.ctx.left, node.ctx.right) {
            (None, None) => node.end,
            (Some(left), Some(right)) => self[left].max.max(self[right].max),
            (Some(child), None) | (None, Some(child)) => node.end.max(self[child].max),
        }
    }




    /**
     * Assign the node's subtree height and push the change up the parent
     * chain, mirroring `set_max`. The two walks are independent: one
     * structural edit triggers both, each with its own stopping point.
     */
    pub fn set_height(&mut self, id: NodeId, height: usize) -> usize {
        let mut writes = 0;
        let mut at = id;
        let mut value = height;

        loop {
            let node = &mut self[at];
            if node.height == value {
                break;
            }
            node.height = value;
            writes += 1;

            match node.ctx.parent {
                Some(parent) => {
                    at = parent;
                    value = self.local_height(parent);
                }
                None => break,
            }
        }
        writes
    }




    /**
     * Recompute the node's height from its children and propagate as
     * `set_height`.
     */
    pub fn update_height(&mut self, id: NodeId) -> usize {
        let height = self.local_height(id);
        self.set_height(id, height)
    }


    fn local_height(&self, id: NodeId) -> usize {
        let node = &self[id];
        match (node.ctx.left, node.ctx.right) {
            (None, None) => 1,
            (Some(left), Some(right)) => self[left].height.max(self[right].height) + 1,
            (Some(child), None) | (None, Some(child)) => self[child].height + 1,
        }
    }




    /**
     * Assign the node's depth level and cascade `level + 1` downward, by
     * worklist rather than recursion. A subtree whose root already holds
     * the incoming value is skipped whole. Returns the number of nodes
     * written.
     */
    pub fn set_level(&mut self, id: NodeId, level: usize) -> usize {
        let mut writes = 0;
        let mut pending = vec![(id, level)];

        while let Some((at, level)) = pending.pop() {
            let node = &mut self[at];
            if node.level == level {
                continue;
            }
            node.level = level;
            writes += 1;

            if let Some(left) = node.ctx.left {
                pending.push((left, level + 1));
            }
            if let Some(right) = node.ctx.right {
                pending.push((right, level + 1));
            }
        }
        writes
    }
}




// ============================================================================
impl<B: IntervalBucket> Default for NodeArena<B> {
    fn default() -> Self {
        Self::new()
    }
}




// ============================================================================
impl<B: IntervalBucket> Index<NodeId> for NodeArena<B> {
    type Output = Node<B>;

    fn index(&self, id: NodeId) -> &Self::Output {
        self.get(id).expect("stale or unknown node id")
    }
}

impl<B: IntervalBucket> IndexMut<NodeId> for NodeArena<B> {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        self.get_mut(id).expect("stale or unknown node id")
    }
}
