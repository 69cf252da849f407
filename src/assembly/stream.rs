//! Mutable, doubly-traversable instruction sequences.
//!
//! This module provides [`crate::assembly::InsnStream`], the ordered instruction container
//! owned by every method body. The strippers drive it exclusively through positions:
//! neighbor access, insertion after a position, and removal of a position or an inclusive
//! range are all O(1) relative to stream length, and no implicit renumbering ever occurs.
//!
//! # Positions
//!
//! A position is an opaque [`crate::assembly::InsnId`] handle. Handles are structural
//! (previous/next), not indices: removing an instruction invalidates only its own handle,
//! every other handle stays valid. Handles carry a generation so that using a removed
//! position is detected and treated as a programming error (panic), never as silent access
//! to a reused slot.
//!
//! # Iteration under mutation
//!
//! Forward scans that remove elements must capture the successor before acting on the
//! current element:
//!
//! ```rust
//! use stripscope::assembly::{InsnStream, Instruction, PlainOp};
//!
//! let mut stream: InsnStream = [
//!     Instruction::Plain(PlainOp::Nop),
//!     Instruction::Plain(PlainOp::Return),
//! ]
//! .into_iter()
//! .collect();
//!
//! let mut cursor = stream.first();
//! while let Some(id) = cursor {
//!     cursor = stream.next(id);
//!     if matches!(stream.get(id), Instruction::Plain(PlainOp::Nop)) {
//!         stream.remove(id);
//!     }
//! }
//! assert_eq!(stream.len(), 1);
//! ```

use crate::assembly::Instruction;

/// An opaque position in an [`InsnStream`].
///
/// Obtained from the stream's navigation and mutation methods. A position stays valid until
/// the instruction it names is removed; using it afterwards panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InsnId {
    slot: u32,
    generation: u32,
}

#[derive(Debug, Clone)]
struct Slot {
    insn: Option<Instruction>,
    generation: u32,
    prev: Option<u32>,
    next: Option<u32>,
}

/// A mutable, ordered, doubly-traversable sequence of instructions.
///
/// Backing storage is a slot arena with an internal free list, which keeps every positional
/// operation O(1) while handles remain stable under arbitrary insertion and removal.
///
/// # Failure semantics
///
/// Passing a position that is not present in the stream (stale after removal, or minted by a
/// different stream) is a programming error and panics. Input-level failures do not exist at
/// this layer; the stream holds whatever the strippers leave behind.
#[derive(Debug, Clone, Default)]
pub struct InsnStream {
    slots: Vec<Slot>,
    free: Vec<u32>,
    head: Option<u32>,
    tail: Option<u32>,
    len: usize,
}

impl InsnStream {
    /// Creates an empty stream.
    #[must_use]
    pub fn new() -> Self {
        InsnStream::default()
    }

    /// Number of instructions in the stream.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the stream holds no instructions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Position of the first instruction, if any.
    #[must_use]
    pub fn first(&self) -> Option<InsnId> {
        self.head.map(|slot| self.id_of(slot))
    }

    /// Position of the last instruction, if any.
    #[must_use]
    pub fn last(&self) -> Option<InsnId> {
        self.tail.map(|slot| self.id_of(slot))
    }

    /// Position following `id`, or `None` at the end of the stream.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not present in the stream.
    #[must_use]
    pub fn next(&self, id: InsnId) -> Option<InsnId> {
        self.slot_of(id).next.map(|slot| self.id_of(slot))
    }

    /// Position preceding `id`, or `None` at the start of the stream.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not present in the stream.
    #[must_use]
    pub fn prev(&self, id: InsnId) -> Option<InsnId> {
        self.slot_of(id).prev.map(|slot| self.id_of(slot))
    }

    /// The instruction at `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not present in the stream.
    #[must_use]
    pub fn get(&self, id: InsnId) -> &Instruction {
        self.slot_of(id)
            .insn
            .as_ref()
            .expect("occupied slot holds an instruction")
    }

    /// Appends an instruction at the end of the stream and returns its position.
    pub fn push_back(&mut self, insn: Instruction) -> InsnId {
        let slot = self.alloc(insn, self.tail, None);
        if let Some(tail) = self.tail {
            self.slots[tail as usize].next = Some(slot);
        } else {
            self.head = Some(slot);
        }
        self.tail = Some(slot);
        self.len += 1;
        self.id_of(slot)
    }

    /// Inserts an instruction immediately after `pos` and returns its position.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is not present in the stream.
    pub fn insert_after(&mut self, pos: InsnId, insn: Instruction) -> InsnId {
        self.check(pos);
        let after = self.slots[pos.slot as usize].next;
        let slot = self.alloc(insn, Some(pos.slot), after);
        self.slots[pos.slot as usize].next = Some(slot);
        match after {
            Some(next) => self.slots[next as usize].prev = Some(slot),
            None => self.tail = Some(slot),
        }
        self.len += 1;
        self.id_of(slot)
    }

    /// Removes the instruction at `id` and returns it.
    ///
    /// Neighboring positions remain valid; `id` itself becomes stale.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not present in the stream.
    pub fn remove(&mut self, id: InsnId) -> Instruction {
        self.check(id);
        let slot = id.slot as usize;
        let (prev, next) = (self.slots[slot].prev, self.slots[slot].next);
        match prev {
            Some(p) => self.slots[p as usize].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.slots[n as usize].prev = prev,
            None => self.tail = prev,
        }
        let insn = self.slots[slot]
            .insn
            .take()
            .expect("occupied slot holds an instruction");
        self.slots[slot].generation = self.slots[slot].generation.wrapping_add(1);
        self.slots[slot].prev = None;
        self.slots[slot].next = None;
        self.free.push(id.slot);
        self.len -= 1;
        insn
    }

    /// Removes every instruction from `first` through `last`, inclusive.
    ///
    /// # Panics
    ///
    /// Panics if either position is not present in the stream, or if `last` is not reachable
    /// from `first` by forward traversal.
    pub fn remove_range(&mut self, first: InsnId, last: InsnId) {
        self.check(first);
        self.check(last);
        let mut cursor = Some(first);
        loop {
            let id = cursor.expect("range end must be reachable from range start");
            cursor = self.next(id);
            let done = id == last;
            self.remove(id);
            if done {
                break;
            }
        }
    }

    /// Iterates positions and instructions front to back.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            stream: self,
            cursor: self.head,
        }
    }

    fn alloc(&mut self, insn: Instruction, prev: Option<u32>, next: Option<u32>) -> u32 {
        if let Some(slot) = self.free.pop() {
            let s = &mut self.slots[slot as usize];
            s.insn = Some(insn);
            s.prev = prev;
            s.next = next;
            slot
        } else {
            self.slots.push(Slot {
                insn: Some(insn),
                generation: 0,
                prev,
                next,
            });
            (self.slots.len() - 1) as u32
        }
    }

    fn id_of(&self, slot: u32) -> InsnId {
        InsnId {
            slot,
            generation: self.slots[slot as usize].generation,
        }
    }

    fn slot_of(&self, id: InsnId) -> &Slot {
        self.check(id);
        &self.slots[id.slot as usize]
    }

    fn check(&self, id: InsnId) {
        let valid = self
            .slots
            .get(id.slot as usize)
            .is_some_and(|s| s.insn.is_some() && s.generation == id.generation);
        assert!(valid, "instruction position is not present in this stream");
    }
}

impl FromIterator<Instruction> for InsnStream {
    fn from_iter<T: IntoIterator<Item = Instruction>>(iter: T) -> Self {
        let mut stream = InsnStream::new();
        for insn in iter {
            stream.push_back(insn);
        }
        stream
    }
}

/// Borrowing front-to-back iterator over an [`InsnStream`].
pub struct Iter<'a> {
    stream: &'a InsnStream,
    cursor: Option<u32>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (InsnId, &'a Instruction);

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.cursor?;
        self.cursor = self.stream.slots[slot as usize].next;
        let id = self.stream.id_of(slot);
        Some((id, self.stream.get(id)))
    }
}

impl<'a> IntoIterator for &'a InsnStream {
    type Item = (InsnId, &'a Instruction);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::PlainOp;

    fn plain(op: PlainOp) -> Instruction {
        Instruction::Plain(op)
    }

    fn ops(stream: &InsnStream) -> Vec<Instruction> {
        stream.iter().map(|(_, insn)| insn.clone()).collect()
    }

    #[test]
    fn test_empty_stream() {
        let stream = InsnStream::new();
        assert!(stream.is_empty());
        assert_eq!(stream.len(), 0);
        assert!(stream.first().is_none());
        assert!(stream.last().is_none());
    }

    #[test]
    fn test_push_back_preserves_order() {
        let stream: InsnStream = [plain(PlainOp::Nop), plain(PlainOp::Dup), plain(PlainOp::Return)]
            .into_iter()
            .collect();
        assert_eq!(stream.len(), 3);
        assert_eq!(
            ops(&stream),
            vec![plain(PlainOp::Nop), plain(PlainOp::Dup), plain(PlainOp::Return)]
        );
    }

    #[test]
    fn test_neighbor_navigation() {
        let mut stream = InsnStream::new();
        let a = stream.push_back(plain(PlainOp::Nop));
        let b = stream.push_back(plain(PlainOp::Dup));
        let c = stream.push_back(plain(PlainOp::Return));

        assert_eq!(stream.first(), Some(a));
        assert_eq!(stream.last(), Some(c));
        assert_eq!(stream.next(a), Some(b));
        assert_eq!(stream.next(b), Some(c));
        assert!(stream.next(c).is_none());
        assert_eq!(stream.prev(c), Some(b));
        assert_eq!(stream.prev(b), Some(a));
        assert!(stream.prev(a).is_none());
    }

    #[test]
    fn test_insert_after_middle_and_tail() {
        let mut stream = InsnStream::new();
        let a = stream.push_back(plain(PlainOp::Nop));
        let c = stream.push_back(plain(PlainOp::Return));

        let b = stream.insert_after(a, plain(PlainOp::Dup));
        assert_eq!(stream.next(a), Some(b));
        assert_eq!(stream.next(b), Some(c));

        let d = stream.insert_after(c, plain(PlainOp::Pop));
        assert_eq!(stream.last(), Some(d));
        assert_eq!(stream.len(), 4);
    }

    #[test]
    fn test_remove_relinks_neighbors() {
        let mut stream = InsnStream::new();
        let a = stream.push_back(plain(PlainOp::Nop));
        let b = stream.push_back(plain(PlainOp::Dup));
        let c = stream.push_back(plain(PlainOp::Return));

        assert_eq!(stream.remove(b), plain(PlainOp::Dup));
        assert_eq!(stream.next(a), Some(c));
        assert_eq!(stream.prev(c), Some(a));
        assert_eq!(stream.len(), 2);

        // Head and tail removal
        stream.remove(a);
        assert_eq!(stream.first(), Some(c));
        stream.remove(c);
        assert!(stream.is_empty());
        assert!(stream.first().is_none());
        assert!(stream.last().is_none());
    }

    #[test]
    fn test_forward_scan_with_removal_of_current() {
        let mut stream: InsnStream = [
            plain(PlainOp::Nop),
            plain(PlainOp::Dup),
            plain(PlainOp::Nop),
            plain(PlainOp::Return),
        ]
        .into_iter()
        .collect();

        // Capture successor before removing the current element; no skip, no revisit.
        let mut visited = 0;
        let mut cursor = stream.first();
        while let Some(id) = cursor {
            cursor = stream.next(id);
            visited += 1;
            if matches!(stream.get(id), Instruction::Plain(PlainOp::Nop)) {
                stream.remove(id);
            }
        }
        assert_eq!(visited, 4);
        assert_eq!(ops(&stream), vec![plain(PlainOp::Dup), plain(PlainOp::Return)]);
    }

    #[test]
    fn test_remove_range_inclusive() {
        let mut stream = InsnStream::new();
        let a = stream.push_back(plain(PlainOp::Nop));
        let b = stream.push_back(plain(PlainOp::Dup));
        let c = stream.push_back(plain(PlainOp::Pop));
        let d = stream.push_back(plain(PlainOp::Return));

        stream.remove_range(b, c);
        assert_eq!(ops(&stream), vec![plain(PlainOp::Nop), plain(PlainOp::Return)]);
        assert_eq!(stream.next(a), Some(d));
    }

    #[test]
    fn test_remove_range_single_element() {
        let mut stream = InsnStream::new();
        let a = stream.push_back(plain(PlainOp::Nop));
        let b = stream.push_back(plain(PlainOp::Return));
        stream.remove_range(a, a);
        assert_eq!(stream.first(), Some(b));
        assert_eq!(stream.len(), 1);
    }

    #[test]
    fn test_remove_range_whole_stream() {
        let mut stream = InsnStream::new();
        let a = stream.push_back(plain(PlainOp::Nop));
        let b = stream.push_back(plain(PlainOp::Return));
        stream.remove_range(a, b);
        assert!(stream.is_empty());
    }

    #[test]
    #[should_panic(expected = "not present in this stream")]
    fn test_stale_position_panics() {
        let mut stream = InsnStream::new();
        let a = stream.push_back(plain(PlainOp::Nop));
        stream.remove(a);
        stream.get(a);
    }

    #[test]
    #[should_panic(expected = "not present in this stream")]
    fn test_stale_position_after_slot_reuse_panics() {
        let mut stream = InsnStream::new();
        let a = stream.push_back(plain(PlainOp::Nop));
        stream.remove(a);
        // The freed slot is reused; the old handle must still be rejected.
        let _b = stream.push_back(plain(PlainOp::Return));
        stream.remove(a);
    }

    #[test]
    #[should_panic(expected = "reachable from range start")]
    fn test_remove_range_unreachable_end_panics() {
        let mut stream = InsnStream::new();
        let a = stream.push_back(plain(PlainOp::Nop));
        let b = stream.push_back(plain(PlainOp::Return));
        // b → a is backwards; the forward walk runs off the stream end.
        stream.remove_range(b, a);
    }
}
