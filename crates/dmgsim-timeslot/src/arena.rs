//! Arena-backed timeslot tree.
//!
//! Every slot lives in one `Vec` owned by [`TimeslotArena`] and is addressed
//! by its [`SlotId`]. Children hold a back-reference to their parent id; the
//! parent keeps the ordered list of child ids together with its free time.

use crate::available::AvailableTime;
use crate::error::TimeslotError;
use crate::Nanos;
use std::fmt;

/// Handle of a slot inside a [`TimeslotArena`].
///
/// Ids are handed out sequentially by the arena, starting at 0, so they are
/// unique within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SlotId(usize);

impl SlotId {
    /// Position of the slot in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Contents of a slot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SlotBody {
    /// A slot that cannot be subdivided.
    Leaf,
    /// A slot that hands out sub-intervals of itself.
    Allocatable {
        /// Child ids in insertion order.
        children: Vec<SlotId>,
        /// Remaining unoccupied time.
        free: AvailableTime,
    },
}

/// A time interval in the tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Timeslot<K> {
    /// Handle of this slot in its arena.
    pub id: SlotId,
    /// Caller-defined tag.
    pub kind: K,
    /// Start time (ns).
    pub start: Nanos,
    /// Duration (ns).
    pub duration: Nanos,
    /// `None` for roots.
    pub parent: Option<SlotId>,
    /// Leaf or allocatable contents.
    pub body: SlotBody,
}

impl<K> Timeslot<K> {
    /// End time (ns).
    pub fn end(&self) -> Nanos {
        self.start + self.duration
    }

    /// Whether children may be added to this slot.
    pub fn is_allocatable(&self) -> bool {
        matches!(self.body, SlotBody::Allocatable { .. })
    }
}

/// Owner of all timeslots of one run.
///
/// `K` is the kind tag attached to every slot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TimeslotArena<K> {
    slots: Vec<Timeslot<K>>,
    roots: Vec<SlotId>,
}

impl<K> Default for TimeslotArena<K> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            roots: Vec::new(),
        }
    }
}

impl<K> TimeslotArena<K> {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level allocatable slot covering `[start, start + duration]`.
    pub fn add_root(&mut self, kind: K, start: Nanos, duration: Nanos) -> SlotId {
        let id = self.push(kind, start, duration, None, allocatable_body(start, duration));
        self.roots.push(id);
        id
    }

    /// Add a leaf child to `parent`, occupying `[start, start + duration]`.
    pub fn add_child(
        &mut self,
        parent: SlotId,
        kind: K,
        start: Nanos,
        duration: Nanos,
    ) -> Result<SlotId, TimeslotError> {
        self.insert_child(parent, kind, start, duration, SlotBody::Leaf)
    }

    /// Add a child to `parent` that can itself hold children.
    pub fn add_allocatable_child(
        &mut self,
        parent: SlotId,
        kind: K,
        start: Nanos,
        duration: Nanos,
    ) -> Result<SlotId, TimeslotError> {
        let body = allocatable_body(start, duration);
        self.insert_child(parent, kind, start, duration, body)
    }

    fn insert_child(
        &mut self,
        parent: SlotId,
        kind: K,
        start: Nanos,
        duration: Nanos,
        body: SlotBody,
    ) -> Result<SlotId, TimeslotError> {
        let next_id = SlotId(self.slots.len());
        let slot = self
            .slots
            .get_mut(parent.0)
            .ok_or(TimeslotError::UnknownSlot(parent))?;

        match &mut slot.body {
            SlotBody::Leaf => return Err(TimeslotError::NotAllocatable(parent)),
            SlotBody::Allocatable { children, free } => {
                free.allocate(start, start + duration)?;
                children.push(next_id);
            }
        }

        Ok(self.push(kind, start, duration, Some(parent), body))
    }

    fn push(
        &mut self,
        kind: K,
        start: Nanos,
        duration: Nanos,
        parent: Option<SlotId>,
        body: SlotBody,
    ) -> SlotId {
        let id = SlotId(self.slots.len());
        self.slots.push(Timeslot {
            id,
            kind,
            start,
            duration,
            parent,
            body,
        });
        id
    }

    /// Look up a slot.
    pub fn get(&self, id: SlotId) -> Result<&Timeslot<K>, TimeslotError> {
        self.slots.get(id.0).ok_or(TimeslotError::UnknownSlot(id))
    }

    /// Child ids of a slot in insertion order; empty for leaves.
    pub fn children(&self, id: SlotId) -> Result<&[SlotId], TimeslotError> {
        match &self.get(id)?.body {
            SlotBody::Leaf => Ok(&[]),
            SlotBody::Allocatable { children, .. } => Ok(children),
        }
    }

    /// Children of a slot carrying the given kind tag.
    pub fn children_of_kind<'a>(
        &'a self,
        id: SlotId,
        kind: &'a K,
    ) -> Result<impl Iterator<Item = &'a Timeslot<K>> + 'a, TimeslotError>
    where
        K: PartialEq,
    {
        let children = self.children(id)?;
        Ok(children
            .iter()
            .filter_map(move |child| self.slots.get(child.0))
            .filter(move |slot| slot.kind == *kind))
    }

    /// Free ranges of an allocatable slot.
    pub fn available_time(&self, id: SlotId) -> Result<&[(Nanos, Nanos)], TimeslotError> {
        match &self.get(id)?.body {
            SlotBody::Leaf => Err(TimeslotError::NotAllocatable(id)),
            SlotBody::Allocatable { free, .. } => Ok(free.ranges()),
        }
    }

    /// Ids of the top-level slots.
    pub fn root_ids(&self) -> &[SlotId] {
        &self.roots
    }

    /// All slots in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Timeslot<K>> {
        self.slots.iter()
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when no slot was inserted yet.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

fn allocatable_body(start: Nanos, duration: Nanos) -> SlotBody {
    SlotBody::Allocatable {
        children: Vec::new(),
        free: AvailableTime::new(start, start + duration),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Kind {
        Root,
        Block,
        Item,
    }

    #[test]
    fn test_ids_are_sequential() {
        let mut arena = TimeslotArena::new();
        assert!(arena.is_empty());
        let root = arena.add_root(Kind::Root, 0, 1_000);
        assert!(!arena.is_empty());
        let a = arena.add_child(root, Kind::Item, 0, 100).unwrap();
        let b = arena.add_child(root, Kind::Item, 200, 100).unwrap();
        assert_eq!([root.index(), a.index(), b.index()], [0, 1, 2]);
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn test_children_keep_parent_reference() {
        let mut arena = TimeslotArena::new();
        let root = arena.add_root(Kind::Root, 0, 1_000);
        let block = arena.add_allocatable_child(root, Kind::Block, 100, 500).unwrap();
        let item = arena.add_child(block, Kind::Item, 150, 50).unwrap();

        assert_eq!(arena.get(root).unwrap().parent, None);
        assert_eq!(arena.get(block).unwrap().parent, Some(root));
        assert_eq!(arena.get(item).unwrap().parent, Some(block));
        assert_eq!(arena.get(item).unwrap().end(), 200);
        assert_eq!(arena.children(root).unwrap(), &[block]);
        assert_eq!(arena.children(block).unwrap(), &[item]);
        assert!(arena.children(item).unwrap().is_empty());
    }

    #[test]
    fn test_free_time_updates() {
        let mut arena = TimeslotArena::new();
        let root = arena.add_root(Kind::Root, 0, 1_000);
        arena.add_child(root, Kind::Item, 0, 100).unwrap();
        arena.add_child(root, Kind::Item, 400, 100).unwrap();
        assert_eq!(arena.available_time(root).unwrap(), &[(100, 400), (500, 1_000)]);

        // The nested slot's own free time starts out whole
        let block = arena.add_allocatable_child(root, Kind::Block, 500, 500).unwrap();
        assert_eq!(arena.available_time(root).unwrap(), &[(100, 400)]);
        assert_eq!(arena.available_time(block).unwrap(), &[(500, 1_000)]);
    }

    #[test]
    fn test_children_within_parent_and_disjoint() {
        let mut arena = TimeslotArena::new();
        let root = arena.add_root(Kind::Root, 1_000, 10_000);
        for i in 0..10 {
            arena.add_child(root, Kind::Item, 1_000 + i * 1_000, 900).unwrap();
        }

        let parent = arena.get(root).unwrap();
        let mut spans: Vec<_> = arena
            .children(root)
            .unwrap()
            .iter()
            .map(|id| {
                let slot = arena.get(*id).unwrap();
                (slot.start, slot.end())
            })
            .collect();
        spans.sort();

        for (start, end) in &spans {
            assert!(*start >= parent.start && *end <= parent.end());
        }
        for pair in spans.windows(2) {
            assert!(pair[0].1 <= pair[1].0);
        }
    }

    #[test]
    fn test_rejects_overlap_and_out_of_range() {
        let mut arena = TimeslotArena::new();
        let root = arena.add_root(Kind::Root, 0, 1_000);
        arena.add_child(root, Kind::Item, 100, 100).unwrap();

        assert_eq!(
            arena.add_child(root, Kind::Item, 150, 100),
            Err(TimeslotError::OverlappingAllocation { start: 150, end: 250 })
        );
        assert_eq!(
            arena.add_child(root, Kind::Item, 900, 200),
            Err(TimeslotError::OverlappingAllocation { start: 900, end: 1_100 })
        );
        assert_eq!(
            arena.add_child(root, Kind::Item, 2_000, 10),
            Err(TimeslotError::InsufficientTime { start: 2_000, end: 2_010 })
        );
        // Failed insertions leave no trace
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.children(root).unwrap().len(), 1);
    }

    #[test]
    fn test_leaf_cannot_hold_children() {
        let mut arena = TimeslotArena::new();
        let root = arena.add_root(Kind::Root, 0, 1_000);
        let leaf = arena.add_child(root, Kind::Item, 0, 500).unwrap();

        assert_eq!(
            arena.add_child(leaf, Kind::Item, 0, 10),
            Err(TimeslotError::NotAllocatable(leaf))
        );
        assert_eq!(arena.available_time(leaf), Err(TimeslotError::NotAllocatable(leaf)));
    }

    #[test]
    fn test_unknown_slot() {
        let mut arena: TimeslotArena<Kind> = TimeslotArena::new();
        let bogus = SlotId(7);
        assert_eq!(arena.get(bogus).map(|s| s.id), Err(TimeslotError::UnknownSlot(bogus)));
        assert_eq!(
            arena.add_child(bogus, Kind::Item, 0, 1),
            Err(TimeslotError::UnknownSlot(bogus))
        );
    }

    #[test]
    fn test_children_of_kind() {
        let mut arena = TimeslotArena::new();
        let root = arena.add_root(Kind::Root, 0, 1_000);
        arena.add_child(root, Kind::Item, 0, 100).unwrap();
        arena.add_allocatable_child(root, Kind::Block, 100, 100).unwrap();
        arena.add_child(root, Kind::Item, 200, 100).unwrap();

        let starts: Vec<_> = arena
            .children_of_kind(root, &Kind::Item)
            .unwrap()
            .map(|slot| slot.start)
            .collect();
        assert_eq!(starts, vec![0, 200]);
        assert_eq!(arena.children_of_kind(root, &Kind::Block).unwrap().count(), 1);
    }

    #[test]
    fn test_multiple_roots() {
        let mut arena = TimeslotArena::new();
        let a = arena.add_root(Kind::Root, 0, 100);
        let b = arena.add_root(Kind::Root, 0, 100);
        assert_eq!(arena.root_ids(), &[a, b]);
        assert!(arena.get(b).unwrap().is_allocatable());
    }
}
