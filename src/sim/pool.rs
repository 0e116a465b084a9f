//! Object pool for world sprites
//!
//! Instances live in slots addressed by `PoolHandle` (index + generation).
//! A slot is always in exactly one state: free, active or pending destroy.
//! Trimmed slots drop their instance and become vacant; a later `acquire`
//! reuses the slot with a freshly constructed instance.

use crate::error::WorldError;

/// Types the pool can recycle
pub trait Poolable: Default {
    /// Clear all logical state before the instance goes back to the free list
    fn reset(&mut self);
}

/// Handle to a pooled instance. Stale once the instance is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolHandle {
    index: u32,
    generation: u32,
}

impl PoolHandle {
    #[inline]
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

/// Where a pooled instance currently lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// Parked in the free list
    Free,
    /// Owned by a live world entity
    Active,
    /// Destroy fired, waiting for the owner to release it
    PendingDestroy,
}

#[derive(Debug)]
struct Slot<T> {
    value: Option<T>,
    state: SlotState,
    generation: u32,
}

/// Lazily growing pool with gradual trimming
#[derive(Debug)]
pub struct ObjectPool<T: Poolable> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    vacant: Vec<u32>,
    active: usize,
    high_water: usize,
    trim_step: usize,
}

impl<T: Poolable> ObjectPool<T> {
    /// Create an empty pool. Free instances above `high_water` are trimmed,
    /// at most `trim_step` per `maintain` call.
    pub fn new(high_water: usize, trim_step: usize) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            vacant: Vec::new(),
            active: 0,
            high_water,
            trim_step: trim_step.max(1),
        }
    }

    /// Pre-construct `count` free instances
    pub fn prewarm(&mut self, count: usize) {
        for _ in 0..count {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                value: Some(T::default()),
                state: SlotState::Free,
                generation: 0,
            });
            self.free.push(index);
        }
    }

    /// Take a free instance, constructing one if none is parked
    pub fn acquire(&mut self) -> PoolHandle {
        let index = if let Some(index) = self.free.pop() {
            index
        } else if let Some(index) = self.vacant.pop() {
            self.slots[index as usize].value = Some(T::default());
            index
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                value: Some(T::default()),
                state: SlotState::Free,
                generation: 0,
            });
            index
        };

        let slot = &mut self.slots[index as usize];
        debug_assert_eq!(slot.state, SlotState::Free);
        slot.state = SlotState::Active;
        self.active += 1;

        PoolHandle {
            index,
            generation: slot.generation,
        }
    }

    /// Reset an instance and park it in the free list
    pub fn release(&mut self, handle: PoolHandle) -> Result<(), WorldError> {
        let slot = self.live_slot_mut(handle).ok_or(WorldError::InvalidHandle)?;

        if let Some(value) = slot.value.as_mut() {
            value.reset();
        }
        slot.state = SlotState::Free;
        slot.generation = slot.generation.wrapping_add(1);

        self.free.push(handle.index);
        self.active -= 1;
        Ok(())
    }

    /// Flag an active instance as destroyed-but-not-yet-released
    pub fn mark_pending(&mut self, handle: PoolHandle) -> Result<(), WorldError> {
        let slot = self.live_slot_mut(handle).ok_or(WorldError::InvalidHandle)?;
        slot.state = SlotState::PendingDestroy;
        Ok(())
    }

    /// Trim free instances above the high-water mark, a few per call.
    /// Returns the number destroyed.
    pub fn maintain(&mut self) -> usize {
        let excess = self.free.len().saturating_sub(self.high_water);
        let count = excess.min(self.trim_step);

        for _ in 0..count {
            let Some(index) = self.free.pop() else { break };
            self.slots[index as usize].value = None;
            self.vacant.push(index);
        }

        if count > 0 {
            log::debug!("Sprite pool trimmed {count} ({} free)", self.free.len());
        }
        count
    }

    pub fn get(&self, handle: PoolHandle) -> Option<&T> {
        let slot = self.slots.get(handle.index())?;
        if slot.generation != handle.generation || slot.state == SlotState::Free {
            return None;
        }
        slot.value.as_ref()
    }

    pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
        self.live_slot_mut(handle)?.value.as_mut()
    }

    /// State of the slot a handle points at, if the handle is current
    pub fn state(&self, handle: PoolHandle) -> Option<SlotState> {
        let slot = self.slots.get(handle.index())?;
        (slot.generation == handle.generation).then_some(slot.state)
    }

    /// Instances owned by the world (active or pending destroy)
    #[inline]
    pub fn active_count(&self) -> usize {
        self.active
    }

    /// Instances parked in the free list
    #[inline]
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Physically constructed instances (free + owned)
    #[inline]
    pub fn instance_count(&self) -> usize {
        self.slots.len() - self.vacant.len()
    }

    fn live_slot_mut(&mut self, handle: PoolHandle) -> Option<&mut Slot<T>> {
        let slot = self.slots.get_mut(handle.index())?;
        if slot.generation != handle.generation || slot.state == SlotState::Free {
            return None;
        }
        Some(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[derive(Debug, Default)]
    struct Dummy {
        value: u32,
        resets: u32,
    }

    impl Poolable for Dummy {
        fn reset(&mut self) {
            self.value = 0;
            self.resets += 1;
        }
    }

    #[test]
    fn test_acquire_release_is_net_zero() {
        let mut pool: ObjectPool<Dummy> = ObjectPool::new(16, 4);
        pool.prewarm(4);
        let before = pool.instance_count();

        let h = pool.acquire();
        pool.release(h).unwrap();

        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.instance_count(), before);
        assert_eq!(pool.free_count(), 4);
    }

    #[test]
    fn test_lazy_growth() {
        let mut pool: ObjectPool<Dummy> = ObjectPool::new(16, 4);
        let a = pool.acquire();
        let b = pool.acquire();
        assert_ne!(a, b);
        assert_eq!(pool.instance_count(), 2);
        assert_eq!(pool.active_count(), 2);
        assert_eq!(pool.free_count(), 0);
    }

    #[test]
    fn test_release_resets_and_reuses() {
        let mut pool: ObjectPool<Dummy> = ObjectPool::new(16, 4);
        let h = pool.acquire();
        pool.get_mut(h).unwrap().value = 42;
        pool.release(h).unwrap();

        let h2 = pool.acquire();
        assert_eq!(h.index(), h2.index());
        let reused = pool.get(h2).unwrap();
        assert_eq!(reused.value, 0);
        assert_eq!(reused.resets, 1);
    }

    #[test]
    fn test_stale_handle_rejected() {
        let mut pool: ObjectPool<Dummy> = ObjectPool::new(16, 4);
        let h = pool.acquire();
        pool.release(h).unwrap();
        assert!(matches!(pool.release(h), Err(WorldError::InvalidHandle)));
        assert!(pool.get(h).is_none());

        // Slot reused: the old handle must not reach the new owner
        let _h2 = pool.acquire();
        assert!(pool.get(h).is_none());
    }

    #[test]
    fn test_pending_destroy_state() {
        let mut pool: ObjectPool<Dummy> = ObjectPool::new(16, 4);
        let h = pool.acquire();
        pool.mark_pending(h).unwrap();
        assert_eq!(pool.state(h), Some(SlotState::PendingDestroy));
        assert_eq!(pool.active_count(), 1);
        pool.release(h).unwrap();
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn test_trim_is_gradual() {
        let mut pool: ObjectPool<Dummy> = ObjectPool::new(2, 3);
        pool.prewarm(10);

        assert_eq!(pool.maintain(), 3);
        assert_eq!(pool.free_count(), 7);
        assert_eq!(pool.maintain(), 3);
        assert_eq!(pool.maintain(), 2);
        assert_eq!(pool.maintain(), 0);
        assert_eq!(pool.free_count(), 2);
        assert_eq!(pool.instance_count(), 2);

        // Vacant slots come back to life on demand
        let handles: Vec<_> = (0..5).map(|_| pool.acquire()).collect();
        assert_eq!(pool.instance_count(), 5);
        assert_eq!(handles.iter().collect::<HashSet<_>>().len(), 5);
    }

    proptest! {
        #[test]
        fn prop_active_and_free_are_disjoint(ops in prop::collection::vec(any::<bool>(), 1..200)) {
            let mut pool: ObjectPool<Dummy> = ObjectPool::new(4, 2);
            let mut live: Vec<PoolHandle> = Vec::new();

            for acquire in ops {
                if acquire || live.is_empty() {
                    let h = pool.acquire();
                    prop_assert!(!live.contains(&h));
                    live.push(h);
                } else {
                    let h = live.swap_remove(0);
                    prop_assert!(pool.release(h).is_ok());
                }
                pool.maintain();

                prop_assert_eq!(pool.active_count(), live.len());
                prop_assert_eq!(pool.instance_count(), pool.active_count() + pool.free_count());
                for h in &live {
                    prop_assert_eq!(pool.state(*h), Some(SlotState::Active));
                }
            }
        }
    }
}
