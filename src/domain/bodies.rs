//! Bodies - slot arena owning every body of a world
//!
//! Slots are reused after removal with a bumped generation, so a handle to a
//! removed body never aliases the body that later takes its slot.
//! Iteration follows insertion order, independent of slot reuse.

use super::body::Body;
use super::handle::BodyHandle;

struct Slot<I> {
    generation: u32,
    body: Option<Body<I>>,
}

pub struct Bodies<I> {
    slots: Vec<Slot<I>>,
    free: Vec<u32>,
    order: Vec<BodyHandle>,
}

impl<I> Bodies<I> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            order: Vec::new(),
        }
    }

    pub fn insert(&mut self, body: Body<I>) -> BodyHandle {
        let handle = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.body = Some(body);
                BodyHandle::new(index, slot.generation)
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot { generation: 0, body: Some(body) });
                BodyHandle::new(index, 0)
            }
        };
        self.order.push(handle);
        handle
    }

    /// Free the slot. Stale handles return None.
    pub fn remove(&mut self, handle: BodyHandle) -> Option<Body<I>> {
        let slot = self.slots.get_mut(handle.index() as usize)?;
        if slot.generation != handle.generation() {
            return None;
        }
        let body = slot.body.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index());
        self.order.retain(|h| *h != handle);
        Some(body)
    }

    #[inline]
    pub fn get(&self, handle: BodyHandle) -> Option<&Body<I>> {
        let slot = self.slots.get(handle.index() as usize)?;
        if slot.generation != handle.generation() {
            return None;
        }
        slot.body.as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut Body<I>> {
        let slot = self.slots.get_mut(handle.index() as usize)?;
        if slot.generation != handle.generation() {
            return None;
        }
        slot.body.as_mut()
    }

    /// Two distinct bodies borrowed mutably at once.
    pub fn pair_mut(&mut self, a: BodyHandle, b: BodyHandle) -> Option<(&mut Body<I>, &mut Body<I>)> {
        if a.index() == b.index() || !self.contains(a) || !self.contains(b) {
            return None;
        }
        let (ia, ib) = (a.index() as usize, b.index() as usize);
        let (first, second) = if ia < ib {
            let (lo, hi) = self.slots.split_at_mut(ib);
            (&mut lo[ia], &mut hi[0])
        } else {
            let (lo, hi) = self.slots.split_at_mut(ia);
            (&mut hi[0], &mut lo[ib])
        };
        Some((first.body.as_mut()?, second.body.as_mut()?))
    }

    #[inline]
    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.get(handle).is_some()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Live handles in insertion order.
    pub fn handles(&self) -> &[BodyHandle] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &Body<I>)> + '_ {
        self.order
            .iter()
            .filter_map(move |h| self.get(*h).map(|b| (*h, b)))
    }
}

impl<I> Default for Bodies<I> {
    fn default() -> Self {
        Self::new()
    }
}
