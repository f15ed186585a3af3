//! Augtree is the node layer of an in-memory interval index: a tree over
//! intervals keyed by normalized `[start, end]` ordinals, where each node
//! buckets the intervals sharing one key and carries augmented values
//! (the subtree's maximum end, its height, and the node's depth level)
//! kept exactly consistent with the live tree shape after every attach,
//! detach, and replace. Nodes live in an arena and link to one another
//! through stable handles, so the parent/child relation involves no
//! reference cycles. The balancing and search policy (insertion-point
//! lookup, rotations, deletion with promotion, whole-tree queries) belongs
//! to an external tree driver; this crate gives that driver the structural
//! primitives and keeps the derived values it reads correct.

pub mod bucket;
pub mod context;
pub mod filter;
pub mod interval;
pub mod node;
