#![forbid(unsafe_code)]

//! Arena-backed singly linked chain of portions.
//!
//! A [`PortionChain`] is the sequence of portions forming one visual line.
//! Portions live in a slot arena and link to their successor by slot index,
//! so cutting or truncating can never leave a dangling link and dropping a
//! long chain never recurses.
//!
//! Ids are generational: once a portion is cut or truncated its slot may be
//! reused, and any [`PortionId`] still pointing at the old occupant is
//! rejected with [`ChainError::StalePortion`].
//!
//! # Invariants
//!
//! 1. The chain always has a head portion.
//! 2. Following `next` links from the head visits every live portion exactly
//!    once (the chain is acyclic and has no unreachable live slots).
//! 3. Operations that return an error leave the chain unchanged.
//!
//! # Example
//!
//! ```
//! use portline_chain::{Portion, PortionChain};
//!
//! let mut chain = PortionChain::new(Portion::text(5, 1));
//! let head = chain.head();
//! let tail = chain.append(head, Portion::text(3, 0)).unwrap();
//! chain.insert_after(head, Portion::kern(12)).unwrap();
//!
//! assert_eq!(chain.portion_count(), 3);
//! assert_eq!(chain.find_last(head).unwrap(), tail);
//!
//! chain.truncate(head).unwrap();
//! assert_eq!(chain.portion_count(), 1);
//! ```

use std::fmt;

use crate::error::ChainError;
use crate::portion::Portion;

/// Generational handle to a portion inside one [`PortionChain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortionId {
    index: u32,
    generation: u32,
}

impl PortionId {
    /// Slot index in the arena.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Number of times the slot had been recycled when this id was issued.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for PortionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

#[derive(Debug, Clone)]
struct Entry {
    portion: Portion,
    next: Option<u32>,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

/// The ordered portions of one visual line.
#[derive(Debug, Clone)]
pub struct PortionChain {
    slots: Vec<Slot>,
    free: Vec<u32>,
    head: u32,
    live: usize,
}

impl PortionChain {
    /// Start a chain with its head portion.
    #[must_use]
    pub fn new(head: Portion) -> Self {
        Self::with_capacity(head, 1)
    }

    /// Start a chain, reserving room for `capacity` portions.
    #[must_use]
    pub fn with_capacity(head: Portion, capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity.max(1));
        slots.push(Slot {
            generation: 0,
            entry: Some(Entry {
                portion: head,
                next: None,
            }),
        });
        Self {
            slots,
            free: Vec::new(),
            head: 0,
            live: 1,
        }
    }

    /// Build a chain from a head and the portions following it, in order.
    #[must_use]
    pub fn from_portions(head: Portion, rest: impl IntoIterator<Item = Portion>) -> Self {
        let rest = rest.into_iter();
        let mut chain = Self::with_capacity(head, rest.size_hint().0 + 1);
        let mut tail = chain.head;
        for portion in rest {
            let index = chain.alloc(portion, None);
            chain.set_next(tail, Some(index));
            tail = index;
        }
        chain
    }

    /// The head portion's id.
    #[inline]
    pub fn head(&self) -> PortionId {
        self.id_of(self.head)
    }

    /// Number of live portions.
    #[inline]
    pub fn portion_count(&self) -> usize {
        self.live
    }

    /// Whether `id` refers to a live portion of this chain.
    pub fn contains(&self, id: PortionId) -> bool {
        self.entry(id).is_ok()
    }

    pub fn get(&self, id: PortionId) -> Option<&Portion> {
        self.entry(id).ok().map(|entry| &entry.portion)
    }

    pub fn get_mut(&mut self, id: PortionId) -> Option<&mut Portion> {
        self.entry_mut(id).ok().map(|entry| &mut entry.portion)
    }

    /// Like [`get`](Self::get), but reports a stale id as an error.
    pub fn portion(&self, id: PortionId) -> Result<&Portion, ChainError> {
        self.entry(id).map(|entry| &entry.portion)
    }

    /// Like [`get_mut`](Self::get_mut), but reports a stale id as an error.
    pub fn portion_mut(&mut self, id: PortionId) -> Result<&mut Portion, ChainError> {
        self.entry_mut(id).map(|entry| &mut entry.portion)
    }

    /// Successor of `id`, if any.
    pub fn next_of(&self, id: PortionId) -> Result<Option<PortionId>, ChainError> {
        let entry = self.entry(id)?;
        Ok(entry.next.map(|index| self.id_of(index)))
    }

    /// Iterate from the head.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            chain: self,
            cursor: Some(self.head),
            remaining: self.live,
        }
    }

    /// Iterate from `id` (inclusive) to the tail.
    pub fn iter_from(&self, id: PortionId) -> Result<Iter<'_>, ChainError> {
        self.entry(id)?;
        Ok(Iter {
            chain: self,
            cursor: Some(id.index),
            remaining: self.live,
        })
    }

    /// Ids from head to tail.
    pub fn ids(&self) -> impl Iterator<Item = PortionId> + '_ {
        self.iter().map(|(id, _)| id)
    }

    /// Characters consumed by the whole chain.
    pub fn text_len(&self) -> usize {
        self.iter().map(|(_, p)| p.len()).sum()
    }

    /// Summed print width of the whole chain.
    pub fn width(&self) -> i32 {
        self.iter()
            .fold(0i32, |acc, (_, p)| acc.saturating_add(p.print_width()))
    }

    /// Link `portion` directly after `at`. The old successor of `at` follows
    /// the new portion.
    pub fn insert_after(&mut self, at: PortionId, portion: Portion) -> Result<PortionId, ChainError> {
        let old_next = self.entry(at)?.next;
        let index = self.alloc(portion, old_next);
        self.set_next(at.index, Some(index));
        Ok(self.id_of(index))
    }

    /// Insert all of `other` after `at`.
    ///
    /// `other`'s head lands directly after `at`, followed by the rest of
    /// `other` in order; `at`'s old downstream is attached to the tail of
    /// `other`. Returns the id `other`'s head received in this chain.
    pub fn splice_after(
        &mut self,
        at: PortionId,
        mut other: PortionChain,
    ) -> Result<PortionId, ChainError> {
        let old_next = self.entry(at)?.next;
        other.verify()?;

        let mut prev = at.index;
        let mut first = None;
        let mut cursor = Some(other.head);
        while let Some(src) = cursor {
            let Some(entry) = other.slots[src as usize].entry.take() else {
                break;
            };
            let index = self.alloc(entry.portion, None);
            self.set_next(prev, Some(index));
            first.get_or_insert(index);
            prev = index;
            cursor = entry.next;
        }
        self.set_next(prev, old_next);

        let spliced = first.unwrap_or(at.index);
        portline_core::debug!(at = %at, count = other.live, "spliced portion chain");
        debug_assert!(self.verify().is_ok(), "splice produced a corrupt chain");
        Ok(self.id_of(spliced))
    }

    /// Walk from `at` to the tail and link `portion` there.
    ///
    /// O(chain length). Callers appending repeatedly should keep the tail id
    /// and use [`append_at_tail`](Self::append_at_tail).
    pub fn append(&mut self, at: PortionId, portion: Portion) -> Result<PortionId, ChainError> {
        let tail = self.find_last(at)?;
        self.append_at_tail(tail, portion)
    }

    /// Link `portion` after `tail` in O(1). `tail` must have no successor.
    pub fn append_at_tail(
        &mut self,
        tail: PortionId,
        portion: Portion,
    ) -> Result<PortionId, ChainError> {
        if let Some(next) = self.entry(tail)?.next {
            return Err(ChainError::NotTail {
                id: tail,
                next: self.id_of(next),
            });
        }
        let index = self.alloc(portion, None);
        self.set_next(tail.index, Some(index));
        Ok(self.id_of(index))
    }

    /// Unlink `victim`, which must be downstream of `from`, and hand it back.
    ///
    /// The portions after `victim` move up to follow its predecessor.
    pub fn cut(&mut self, from: PortionId, victim: PortionId) -> Result<Portion, ChainError> {
        self.entry(from)?;
        self.entry(victim)?;
        if victim.index == self.head {
            return Err(ChainError::CannotCutHead { head: victim });
        }

        let mut prev = from.index;
        let mut steps = 0;
        loop {
            match self.slots[prev as usize].entry.as_ref().and_then(|e| e.next) {
                Some(next) if next == victim.index => break,
                Some(next) => {
                    steps += 1;
                    if steps > self.live {
                        return Err(ChainError::CycleDetected {
                            at: self.id_of(next),
                        });
                    }
                    prev = next;
                }
                None => {
                    return Err(ChainError::NotReachable {
                        from,
                        target: victim,
                    });
                }
            }
        }

        let entry = self
            .release(victim.index)
            .ok_or(ChainError::StalePortion { id: victim })?;
        self.set_next(prev, entry.next);
        portline_core::trace!(victim = %victim, "cut portion");
        Ok(entry.portion)
    }

    /// Drop every portion after `at`. Returns how many were removed.
    pub fn truncate(&mut self, at: PortionId) -> Result<usize, ChainError> {
        let mut cursor = self.entry_mut(at)?.next.take();
        let mut removed = 0;
        while let Some(entry) = cursor.and_then(|index| self.release(index)) {
            cursor = entry.next;
            removed += 1;
        }
        if removed > 0 {
            portline_core::debug!(at = %at, removed, "truncated portion chain");
        }
        Ok(removed)
    }

    /// Last portion reachable from `at`.
    pub fn find_last(&self, at: PortionId) -> Result<PortionId, ChainError> {
        self.entry(at)?;
        let mut index = at.index;
        let mut steps = 0;
        while let Some(next) = self.slots[index as usize].entry.as_ref().and_then(|e| e.next) {
            steps += 1;
            if steps > self.live {
                return Err(ChainError::CycleDetected {
                    at: self.id_of(next),
                });
            }
            index = next;
        }
        Ok(self.id_of(index))
    }

    /// Predecessor of `target` when walking from `root`.
    ///
    /// Returns `Ok(None)` when `target` is `root` itself.
    pub fn find_prev(
        &self,
        root: PortionId,
        target: PortionId,
    ) -> Result<Option<PortionId>, ChainError> {
        self.entry(target)?;
        if root == target {
            self.entry(root)?;
            return Ok(None);
        }
        let mut prev = None;
        for (id, _) in self.iter_from(root)? {
            if id == target {
                return Ok(prev);
            }
            prev = Some(id);
        }
        Err(ChainError::NotReachable { from: root, target })
    }

    /// `Some(id)` if the portion consumes characters or occupies width,
    /// `None` if it is degenerate and may be pruned.
    pub fn compress(&self, id: PortionId) -> Result<Option<PortionId>, ChainError> {
        let portion = self.portion(id)?;
        Ok((!portion.is_prunable()).then_some(id))
    }

    /// Remove every degenerate portion except the head. Returns the count.
    pub fn prune_degenerate(&mut self) -> usize {
        let mut removed = 0;
        let mut prev = self.head;
        while let Some(next) = self.slots[prev as usize].entry.as_ref().and_then(|e| e.next) {
            let prunable = self.slots[next as usize]
                .entry
                .as_ref()
                .is_some_and(|e| e.portion.is_prunable());
            if prunable {
                let after = self.release(next).and_then(|entry| entry.next);
                self.set_next(prev, after);
                removed += 1;
            } else {
                prev = next;
            }
        }
        if removed > 0 {
            portline_core::debug!(removed, "pruned degenerate portions");
        }
        removed
    }

    /// Check that walking from the head visits every live portion once.
    pub fn verify(&self) -> Result<(), ChainError> {
        let mut seen = vec![false; self.slots.len()];
        let mut cursor = Some(self.head);
        let mut visited = 0;
        while let Some(index) = cursor {
            let Some(entry) = self.slots[index as usize].entry.as_ref() else {
                return Err(ChainError::StalePortion {
                    id: self.id_of(index),
                });
            };
            if std::mem::replace(&mut seen[index as usize], true) {
                return Err(ChainError::CycleDetected {
                    at: self.id_of(index),
                });
            }
            visited += 1;
            cursor = entry.next;
        }
        if visited != self.live {
            let orphan = self
                .slots
                .iter()
                .enumerate()
                .find(|(i, slot)| slot.entry.is_some() && !seen[*i])
                .map_or(self.head, |(i, _)| i as u32);
            return Err(ChainError::NotReachable {
                from: self.head(),
                target: self.id_of(orphan),
            });
        }
        Ok(())
    }

    /// Serialize the chain to JSON (for diagnostics and test failures).
    #[must_use]
    pub fn to_json(&self) -> String {
        let portions: Vec<String> = self
            .iter()
            .map(|(id, p)| {
                format!(
                    r#"{{"id":"{}","kind":"{}","len":{},"width":{},"height":{},"ascent":{},"join_prev":{},"join_next":{}}}"#,
                    id,
                    p.kind().name(),
                    p.len(),
                    p.width(),
                    p.height(),
                    p.ascent(),
                    p.join_border_with_prev(),
                    p.join_border_with_next()
                )
            })
            .collect();
        format!(r#"{{"portions":[{}]}}"#, portions.join(","))
    }

    // -- internal helpers --

    fn id_of(&self, index: u32) -> PortionId {
        PortionId {
            index,
            generation: self.slots[index as usize].generation,
        }
    }

    fn entry(&self, id: PortionId) -> Result<&Entry, ChainError> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entry.as_ref())
            .ok_or(ChainError::StalePortion { id })
    }

    fn entry_mut(&mut self, id: PortionId) -> Result<&mut Entry, ChainError> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entry.as_mut())
            .ok_or(ChainError::StalePortion { id })
    }

    fn set_next(&mut self, index: u32, next: Option<u32>) {
        if let Some(entry) = self.slots[index as usize].entry.as_mut() {
            entry.next = next;
        }
    }

    fn alloc(&mut self, portion: Portion, next: Option<u32>) -> u32 {
        let entry = Some(Entry { portion, next });
        self.live += 1;
        if let Some(index) = self.free.pop() {
            self.slots[index as usize].entry = entry;
            index
        } else {
            self.slots.push(Slot {
                generation: 0,
                entry,
            });
            (self.slots.len() - 1) as u32
        }
    }

    /// Free a slot. The caller must already have unlinked it or be about to.
    fn release(&mut self, index: u32) -> Option<Entry> {
        let slot = self.slots.get_mut(index as usize)?;
        let entry = slot.entry.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);
        self.live -= 1;
        Some(entry)
    }
}

impl PartialEq for PortionChain {
    /// Chains are equal when they hold equal portions in the same order,
    /// regardless of arena layout.
    fn eq(&self, other: &Self) -> bool {
        self.live == other.live
            && self
                .iter()
                .zip(other.iter())
                .all(|((_, a), (_, b))| a == b)
    }
}

/// Iterator over `(id, portion)` pairs in chain order.
pub struct Iter<'a> {
    chain: &'a PortionChain,
    cursor: Option<u32>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (PortionId, &'a Portion);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.cursor?;
        if self.remaining == 0 {
            self.cursor = None;
            return None;
        }
        let entry = self.chain.slots[index as usize].entry.as_ref()?;
        self.remaining -= 1;
        self.cursor = entry.next;
        Some((self.chain.id_of(index), &entry.portion))
    }
}

impl<'a> IntoIterator for &'a PortionChain {
    type Item = (PortionId, &'a Portion);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
