//! Slot table, creation queue and id index for entities.
//!
//! [`EntityManager`] owns every entity from the moment it is spawned until it
//! is destroyed. It only does bookkeeping; the passes that call hooks live in
//! [`crate::systems::process`] and [`crate::systems::destroy`].
//!
//! # Contract
//!
//! - Spawning queues the entity and assigns its [`EntityId`]; it gets a slot
//!   (and becomes visible to id lookups) only when the queue is drained.
//! - A slot freed by destruction is reused before the table grows, most
//!   recently freed first. Growing past the configured cap logs an error but
//!   still admits the entity.
//! - Releasing a slot and removing the id from the index happen together.
//! - While a hook runs, its entity is checked out: the slot is marked busy,
//!   lookups skip it and a destroy request against it is remembered and
//!   applied at check-in.
//! - Compaction and mass removal renumber survivors from slot 0 and rebuild
//!   the index. Neither renumbers while an entity is checked out: a mass
//!   removal made from a hook empties the victims' slots at once and leaves
//!   the renumbering to [`EntityManager::settle`].

use std::collections::BTreeMap;

use fastrand::Rng;
use log::{debug, error, info};
use rustc_hash::FxHashMap;

use crate::components::behavior::Behavior;
use crate::components::entity::{Entity, EntityId};

/// An entity record with its hooks.
pub struct Occupant {
    pub entity: Entity,
    pub behavior: Box<dyn Behavior>,
}

enum Slot {
    Empty,
    Occupied(Box<Occupant>),
    /// Checked out for a hook; holds a destroy request made meanwhile.
    Busy {
        destroy: Option<bool>,
        persistent: bool,
    },
}

/// Outcome of a destroy request against one id.
pub enum Removal {
    /// The entity left the table; its `on_destroy` hook has yet to run.
    Removed(Box<Occupant>, bool),
    /// The entity is checked out; it is destroyed at check-in.
    Deferred,
    /// Unknown or already destroyed id.
    NotFound,
}

pub struct EntityManager {
    slots: Vec<Slot>,
    free_slots: Vec<usize>,
    queue: Vec<Occupant>,
    ids: FxHashMap<EntityId, usize>,
    render_list: BTreeMap<i32, Vec<EntityId>>,
    /// Entities spawned since startup.
    pub created: u64,
    /// Entities destroyed since startup.
    pub destroyed: u64,
    /// Appending a slot at or past this index logs an error.
    pub entity_cap: usize,
    checked_out: usize,
    renumber_pending: bool,
    rng: Rng,
}

impl EntityManager {
    pub fn new(entity_cap: usize, rng: Rng) -> Self {
        Self {
            slots: Vec::new(),
            free_slots: Vec::new(),
            queue: Vec::new(),
            ids: FxHashMap::default(),
            render_list: BTreeMap::new(),
            created: 0,
            destroyed: 0,
            entity_cap,
            checked_out: 0,
            renumber_pending: false,
            rng,
        }
    }

    /// Reseed the id generator.
    pub fn set_seed(&mut self, seed: u64) {
        self.rng.seed(seed);
    }

    // ===== CREATION =====

    /// Queue an entity for activation at the start of the next logic tick.
    ///
    /// The id mixes a random value, the scheduler timestamp and both lifecycle
    /// counters. The creation counter alone makes it unique.
    pub fn enqueue(&mut self, mut entity: Entity, behavior: Box<dyn Behavior>, now_ms: f64) -> EntityId {
        self.created += 1;
        let id = EntityId::from(format!(
            "{}-{}-{}-{}",
            self.rng.u32(1..999_999_999),
            now_ms.max(0.0) as u64,
            self.created,
            self.destroyed
        ));
        entity.assign_id(id.clone());
        self.queue.push(Occupant { entity, behavior });
        id
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Most recently queued entity.
    pub(crate) fn pop_pending(&mut self) -> Option<Occupant> {
        self.queue.pop()
    }

    /// Drop every queued entity without activating it.
    pub(crate) fn clear_pending(&mut self) -> usize {
        let dropped = self.queue.len();
        self.queue.clear();
        dropped
    }

    /// Give a queued entity a slot and index its id. Returns the slot.
    pub(crate) fn activate(&mut self, mut occupant: Occupant) -> usize {
        let slot = match self.free_slots.pop() {
            Some(slot) => slot,
            None => {
                let slot = self.slots.len();
                if slot >= self.entity_cap {
                    error!("Breaching entity cap: {}", slot);
                }
                self.slots.push(Slot::Empty);
                slot
            }
        };
        occupant.entity.assign_slot(slot);
        if let Some(id) = occupant.entity.id() {
            self.ids.insert(id.clone(), slot);
        }
        self.slots[slot] = Slot::Occupied(Box::new(occupant));
        slot
    }

    // ===== LOOKUP =====

    /// Entities in slots, checked-out ones included.
    pub fn active_count(&self) -> usize {
        self.ids.len()
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn empty_slot_count(&self) -> usize {
        self.slots.iter().filter(|s| matches!(s, Slot::Empty)).count()
    }

    pub fn slot_of(&self, id: &EntityId) -> Option<usize> {
        self.ids.get(id).copied()
    }

    /// Whether `id` names a slotted entity with no destroy pending.
    pub fn is_alive(&self, id: &EntityId) -> bool {
        match self.ids.get(id).and_then(|&slot| self.slots.get(slot)) {
            Some(Slot::Occupied(_)) => true,
            Some(Slot::Busy { destroy, .. }) => destroy.is_none(),
            _ => false,
        }
    }

    pub fn get(&self, id: &EntityId) -> Option<&Entity> {
        self.occupant(id).map(|o| &o.entity)
    }

    pub fn get_mut(&mut self, id: &EntityId) -> Option<&mut Entity> {
        let slot = *self.ids.get(id)?;
        match self.slots.get_mut(slot) {
            Some(Slot::Occupied(occupant)) => Some(&mut occupant.entity),
            _ => None,
        }
    }

    pub fn occupant(&self, id: &EntityId) -> Option<&Occupant> {
        let slot = *self.ids.get(id)?;
        self.occupant_at(slot)
    }

    pub fn occupant_at(&self, slot: usize) -> Option<&Occupant> {
        match self.slots.get(slot) {
            Some(Slot::Occupied(occupant)) => Some(occupant),
            _ => None,
        }
    }

    pub fn entity_at(&self, slot: usize) -> Option<&Entity> {
        self.occupant_at(slot).map(|o| &o.entity)
    }

    /// Entities currently in their slots, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Occupied(occupant) => Some(&occupant.entity),
            _ => None,
        })
    }

    /// First entity in slot order with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<&Entity> {
        self.iter().find(|e| e.name == name)
    }

    // ===== CHECKOUT =====

    pub fn has_checkouts(&self) -> bool {
        self.checked_out > 0
    }

    /// Take the occupant out of `slot` so its hooks can borrow the game.
    pub(crate) fn checkout(&mut self, slot: usize) -> Option<Box<Occupant>> {
        let cell = self.slots.get_mut(slot)?;
        let persistent = match cell {
            Slot::Occupied(occupant) => occupant.entity.persistent,
            _ => return None,
        };
        let busy = Slot::Busy {
            destroy: None,
            persistent,
        };
        match std::mem::replace(cell, busy) {
            Slot::Occupied(occupant) => {
                self.checked_out += 1;
                Some(occupant)
            }
            _ => None,
        }
    }

    /// Whether a destroy is pending for the occupant checked out of `slot`.
    pub(crate) fn destroy_pending(&self, slot: usize, occupant: &Occupant) -> bool {
        if !occupant.entity.is_live() {
            return true;
        }
        matches!(self.slots.get(slot), Some(Slot::Busy { destroy: Some(_), .. }))
    }

    /// Put a checked-out occupant back.
    ///
    /// If a destroy was requested while it was out, the slot is released
    /// instead and the occupant is handed back with its `unloading` flag so the
    /// caller can run `on_destroy`.
    pub(crate) fn checkin(&mut self, slot: usize, mut occupant: Box<Occupant>) -> Option<(Box<Occupant>, bool)> {
        self.checked_out = self.checked_out.saturating_sub(1);
        let requested = match self.slots.get(slot) {
            Some(Slot::Busy { destroy, .. }) => *destroy,
            _ => None,
        };
        match requested.or(occupant.entity.destroy_requested()) {
            Some(unloading) => {
                self.release(slot, &mut occupant);
                Some((occupant, unloading))
            }
            None => {
                match self.slots.get_mut(slot) {
                    Some(cell) => *cell = Slot::Occupied(occupant),
                    None => error!("Checked in entity to missing slot {}", slot),
                }
                None
            }
        }
    }

    // ===== DESTRUCTION =====

    /// Take `id` out of the table, or flag it if it is checked out.
    pub(crate) fn remove(&mut self, id: &EntityId, unloading: bool) -> Removal {
        let Some(&slot) = self.ids.get(id) else {
            return Removal::NotFound;
        };
        if let Some(Slot::Busy { destroy, .. }) = self.slots.get_mut(slot) {
            if destroy.is_none() {
                *destroy = Some(unloading);
            }
            return Removal::Deferred;
        }
        if !matches!(self.slots.get(slot), Some(Slot::Occupied(_))) {
            return Removal::NotFound;
        }
        match std::mem::replace(&mut self.slots[slot], Slot::Empty) {
            Slot::Occupied(mut occupant) => {
                self.release(slot, &mut occupant);
                Removal::Removed(occupant, unloading)
            }
            _ => Removal::NotFound,
        }
    }

    fn release(&mut self, slot: usize, occupant: &mut Occupant) {
        if let Some(id) = occupant.entity.id() {
            self.ids.remove(id);
        }
        occupant.entity.mark_destroyed();
        self.slots[slot] = Slot::Empty;
        self.free_slots.push(slot);
        self.destroyed += 1;
    }

    /// Remove every entity that is not persistent (every entity when
    /// `forced`) and renumber the survivors from slot 0.
    ///
    /// Returns the removed occupants in slot order; their hooks have not run.
    /// While anything is checked out, checked-out victims are flagged like a
    /// single destroy (with `unloading`) and the renumbering waits for
    /// [`EntityManager::settle`].
    pub(crate) fn remove_all(&mut self, forced: bool, unloading: bool) -> Vec<Box<Occupant>> {
        if self.has_checkouts() {
            return self.remove_all_in_place(forced, unloading);
        }
        let mut removed = Vec::new();
        let mut survivors = Vec::new();
        for slot in std::mem::take(&mut self.slots) {
            if let Slot::Occupied(mut occupant) = slot {
                if forced || !occupant.entity.persistent {
                    if let Some(id) = occupant.entity.id() {
                        self.ids.remove(id);
                    }
                    occupant.entity.mark_destroyed();
                    self.destroyed += 1;
                    removed.push(occupant);
                } else {
                    survivors.push(Slot::Occupied(occupant));
                }
            }
        }
        self.replace_slots(survivors);
        removed
    }

    fn remove_all_in_place(&mut self, forced: bool, unloading: bool) -> Vec<Box<Occupant>> {
        let mut removed = Vec::new();
        for slot in 0..self.slots.len() {
            let victim = match &mut self.slots[slot] {
                Slot::Busy {
                    destroy,
                    persistent,
                } => {
                    if (forced || !*persistent) && destroy.is_none() {
                        *destroy = Some(unloading);
                    }
                    false
                }
                Slot::Occupied(occupant) => forced || !occupant.entity.persistent,
                Slot::Empty => false,
            };
            if !victim {
                continue;
            }
            if let Slot::Occupied(mut occupant) = std::mem::replace(&mut self.slots[slot], Slot::Empty) {
                self.release(slot, &mut occupant);
                removed.push(occupant);
            }
        }
        self.renumber_pending = true;
        removed
    }

    /// Renumber survivors of a mass removal made while hooks were running.
    /// Does nothing while an entity is still checked out.
    pub(crate) fn settle(&mut self) {
        if self.renumber_pending {
            self.compact();
        }
    }

    /// Drop empty slots, renumbering survivors. Skipped while anything is
    /// checked out. Returns whether the table was rebuilt.
    pub(crate) fn compact(&mut self) -> bool {
        if self.has_checkouts() {
            return false;
        }
        let before = self.slots.len();
        let survivors: Vec<Slot> = std::mem::take(&mut self.slots)
            .into_iter()
            .filter(|s| matches!(s, Slot::Occupied(_)))
            .collect();
        self.replace_slots(survivors);
        info!(
            "Refreshed entity list. {} => {} Diff: {}",
            before,
            self.slots.len(),
            before - self.slots.len()
        );
        true
    }

    fn replace_slots(&mut self, survivors: Vec<Slot>) {
        self.renumber_pending = false;
        self.slots = survivors;
        self.free_slots.clear();
        self.ids.clear();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if let Slot::Occupied(occupant) = slot {
                occupant.entity.assign_slot(index);
                if let Some(id) = occupant.entity.id() {
                    self.ids.insert(id.clone(), index);
                }
            }
        }
        debug!("Slot table rebuilt with {} entities", self.slots.len());
    }

    // ===== RENDER LIST =====

    pub(crate) fn clear_render_list(&mut self) {
        self.render_list.clear();
    }

    pub(crate) fn push_render(&mut self, depth: i32, id: EntityId) {
        self.render_list.entry(depth).or_default().push(id);
    }

    /// Ids to draw, bucketed by depth in ascending (back to front) order.
    pub fn render_list(&self) -> &BTreeMap<i32, Vec<EntityId>> {
        &self.render_list
    }
}
