//! Enemy pool: a generational arena of reusable enemy instances.
//!
//! Enemies are never destroyed. Defeat, leaking and the level-end sweep all
//! return the instance to its kind's free list and bump the slot generation,
//! so every `EnemyId` handed out before the release stops resolving.

use std::collections::BTreeMap;

use rampart_core::components::Enemy;
use rampart_core::enums::EnemyKind;
use rampart_core::types::EnemyId;

struct Slot {
    enemy: Enemy,
    generation: u32,
    active: bool,
}

pub struct EnemyPool {
    slots: Vec<Slot>,
    free: BTreeMap<EnemyKind, Vec<u32>>,
}

impl EnemyPool {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: BTreeMap::new(),
        }
    }

    /// Pre-create `per_kind` inactive instances for each kind.
    pub fn prewarm(&mut self, kinds: impl IntoIterator<Item = EnemyKind>, per_kind: usize) {
        for kind in kinds {
            for _ in 0..per_kind {
                let index = self.push_slot(kind);
                self.free.entry(kind).or_default().push(index);
            }
        }
    }

    /// Take an inactive instance of `kind` (creating one if none is free) and
    /// mark it active. The enemy data is reset to a dormant instance; the
    /// caller fills in stats and position.
    pub fn acquire(&mut self, kind: EnemyKind) -> EnemyId {
        let index = match self.free.get_mut(&kind).and_then(Vec::pop) {
            Some(index) => index,
            None => self.push_slot(kind),
        };
        let slot = &mut self.slots[index as usize];
        slot.enemy = Enemy::dormant(kind);
        slot.active = true;
        EnemyId::new(index, slot.generation)
    }

    /// Return an active instance to its free list. Returns `false` for a stale
    /// or already-released id, which leaves the pool untouched.
    pub fn release(&mut self, id: EnemyId) -> bool {
        let Some(slot) = self.slots.get_mut(id.index as usize) else {
            return false;
        };
        if !slot.active || slot.generation != id.generation {
            return false;
        }
        slot.active = false;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.entry(slot.enemy.kind).or_default().push(id.index);
        true
    }

    /// Is `id` an active instance of the generation it names?
    pub fn is_live(&self, id: EnemyId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.active && s.generation == id.generation)
            .map(|s| &s.enemy)
    }

    pub fn get_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.active && s.generation == id.generation)
            .map(|s| &mut s.enemy)
    }

    /// Active instances in slot order.
    pub fn iter_active(&self) -> impl Iterator<Item = (EnemyId, &Enemy)> {
        self.slots.iter().enumerate().filter(|(_, s)| s.active).map(|(i, s)| {
            (EnemyId::new(i as u32, s.generation), &s.enemy)
        })
    }

    /// Ids of all active instances in slot order.
    pub fn active_ids(&self) -> Vec<EnemyId> {
        self.iter_active().map(|(id, _)| id).collect()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.active).count()
    }

    /// Total instances ever created, active or not.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn push_slot(&mut self, kind: EnemyKind) -> u32 {
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            enemy: Enemy::dormant(kind),
            generation: 0,
            active: false,
        });
        index
    }
}

impl Default for EnemyPool {
    fn default() -> Self {
        Self::new()
    }
}
