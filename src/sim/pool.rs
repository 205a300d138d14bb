//! Arena-backed entity pools
//!
//! Entities live in a flat `Vec` indexed by id. Each kind keeps its own stack
//! of free ids: spawning pops a free id of the right kind, despawning pushes it
//! back. When a kind runs dry the arena grows, up to a hard cap.

use std::collections::BTreeMap;
use std::fmt::Debug;

use super::state::{Collectible, CollectibleKind, Obstacle, ObstacleKind};
use crate::error::SimError;

/// An entity that can live in a [`Pool`]
pub trait Pooled {
    type Kind: Copy + Ord + Debug;

    fn dormant(id: u32, kind: Self::Kind) -> Self;
    fn kind(&self) -> Self::Kind;
    fn is_active(&self) -> bool;
    fn set_active(&mut self, active: bool);
}

impl Pooled for Obstacle {
    type Kind = ObstacleKind;

    fn dormant(id: u32, kind: ObstacleKind) -> Self {
        Obstacle::dormant(id, kind)
    }
    fn kind(&self) -> ObstacleKind {
        self.kind
    }
    fn is_active(&self) -> bool {
        self.active
    }
    fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

impl Pooled for Collectible {
    type Kind = CollectibleKind;

    fn dormant(id: u32, kind: CollectibleKind) -> Self {
        Collectible::dormant(id, kind)
    }
    fn kind(&self) -> CollectibleKind {
        self.kind
    }
    fn is_active(&self) -> bool {
        self.active
    }
    fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

#[derive(Debug, Clone)]
pub struct Pool<T: Pooled> {
    name: &'static str,
    slots: Vec<T>,
    free: BTreeMap<T::Kind, Vec<u32>>,
    max_size: usize,
    active: usize,
}

impl<T: Pooled> Pool<T> {
    /// Create a pool with `count` dormant entities preallocated per kind
    pub fn new(name: &'static str, prealloc: &[(T::Kind, usize)], max_size: usize) -> Self {
        let mut pool = Self {
            name,
            slots: Vec::new(),
            free: BTreeMap::new(),
            max_size,
            active: 0,
        };
        for &(kind, count) in prealloc {
            for _ in 0..count {
                if pool.slots.len() >= max_size {
                    break;
                }
                let id = pool.slots.len() as u32;
                pool.slots.push(T::dormant(id, kind));
                pool.free.entry(kind).or_default().push(id);
            }
        }
        // Pop order hands out the lowest ids first
        for stack in pool.free.values_mut() {
            stack.reverse();
        }
        pool
    }

    /// Activate a dormant entity of `kind`, growing the arena if none is free
    pub fn acquire(&mut self, kind: T::Kind) -> Result<&mut T, SimError> {
        let id = match self.free.get_mut(&kind).and_then(|stack| stack.pop()) {
            Some(id) => id,
            None => {
                if self.slots.len() >= self.max_size {
                    return Err(SimError::PoolExhausted {
                        pool: self.name,
                        capacity: self.max_size,
                    });
                }
                let id = self.slots.len() as u32;
                self.slots.push(T::dormant(id, kind));
                log::debug!("{} pool grew to {} ({:?})", self.name, self.slots.len(), kind);
                id
            }
        };
        self.active += 1;
        let entity = &mut self.slots[id as usize];
        entity.set_active(true);
        Ok(entity)
    }

    /// Deactivate an entity and return its id to the free stack.
    /// Returns false if it was not active.
    pub fn release(&mut self, id: u32) -> bool {
        let Some(entity) = self.slots.get_mut(id as usize) else {
            return false;
        };
        if !entity.is_active() {
            return false;
        }
        entity.set_active(false);
        self.free.entry(entity.kind()).or_default().push(id);
        self.active -= 1;
        true
    }

    /// Deactivate everything, returning the ids that were active
    pub fn release_all(&mut self) -> Vec<u32> {
        let ids = self.active_ids();
        for &id in &ids {
            self.release(id);
        }
        ids
    }

    pub fn get(&self, id: u32) -> Option<&T> {
        self.slots.get(id as usize)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut T> {
        self.slots.get_mut(id as usize)
    }

    /// Active entities in id order
    pub fn iter_active(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter(|e| e.is_active())
    }

    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut().filter(|e| e.is_active())
    }

    pub fn active_ids(&self) -> Vec<u32> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_active())
            .map(|(i, _)| i as u32)
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.active
    }

    /// Total entities ever allocated (active + dormant)
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Free entities of `kind`
    pub fn free_count(&self, kind: T::Kind) -> usize {
        self.free.get(&kind).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obstacle_pool(max: usize) -> Pool<Obstacle> {
        Pool::new("obstacle", &[(ObstacleKind::Tree, 2), (ObstacleKind::Rock, 1)], max)
    }

    #[test]
    fn test_prefers_free_entity_of_kind() {
        let mut pool = obstacle_pool(8);
        let rock = pool.acquire(ObstacleKind::Rock).unwrap();
        assert_eq!(rock.kind, ObstacleKind::Rock);
        assert_eq!(rock.id, 2);
        assert_eq!(pool.capacity(), 3);
        assert_eq!(pool.active_count(), 1);
    }

    #[test]
    fn test_release_returns_id_for_reuse() {
        let mut pool = obstacle_pool(8);
        let id = pool.acquire(ObstacleKind::Tree).unwrap().id;
        assert!(pool.release(id));
        assert!(!pool.release(id), "double release must be a no-op");
        assert_eq!(pool.acquire(ObstacleKind::Tree).unwrap().id, id);
        assert_eq!(pool.capacity(), 3);
    }

    #[test]
    fn test_grows_when_kind_is_exhausted() {
        let mut pool = obstacle_pool(8);
        pool.acquire(ObstacleKind::Rock).unwrap();
        let second = pool.acquire(ObstacleKind::Rock).unwrap();
        assert_eq!(second.id, 3);
        assert_eq!(pool.capacity(), 4);
        assert_eq!(pool.free_count(ObstacleKind::Tree), 2);
    }

    #[test]
    fn test_exhaustion_at_hard_cap() {
        let mut pool = obstacle_pool(3);
        pool.acquire(ObstacleKind::Rock).unwrap();
        let err = pool.acquire(ObstacleKind::Rock).unwrap_err();
        assert!(matches!(err, SimError::PoolExhausted { capacity: 3, .. }));
        assert_eq!(pool.active_count(), 1);
    }

    #[test]
    fn test_release_all() {
        let mut pool = obstacle_pool(8);
        pool.acquire(ObstacleKind::Tree).unwrap();
        pool.acquire(ObstacleKind::Rock).unwrap();
        let released = pool.release_all();
        assert_eq!(released, vec![0, 2]);
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.iter_active().count(), 0);
    }
}
