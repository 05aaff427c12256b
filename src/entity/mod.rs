//! Base world actor with race-free stat mutation.
//!
//! Every network worker that handles a packet may end up mutating the same
//! entity's health or mana, so the whole stat record sits behind one mutex
//! per entity: concurrent add/remove calls on one entity serialize, while
//! operations on different entities never contend. Health and mana carry no
//! range invariant here - clamping and death are gameplay concerns layered
//! on top.

use parking_lot::Mutex;
use uuid::Uuid;

use crate::math::Vector;

/// Identifier-generation capability injected into entity construction, so
/// tests can supply deterministic uuids instead of relying on opaque
/// randomness.
pub trait IdSource: Send + Sync {
    fn next_uuid(&self) -> Uuid;
}

/// Production id source: random v4 uuids.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_uuid(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Fixed id source for deterministic construction in tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedIds(pub Uuid);

impl IdSource for FixedIds {
    fn next_uuid(&self) -> Uuid {
        self.0
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Stats {
    health: f64,
    mana: f64,
}

/// A mutable in-world actor: identity, grid position, health and mana.
///
/// `id` is process-unique and assigned externally; `uuid` correlates the
/// actor across systems independently of `id` reuse. Both are immutable
/// after construction.
#[derive(Debug)]
pub struct Entity {
    id: u64,
    uuid: Uuid,
    position: Vector,
    stats: Mutex<Stats>,
}

impl Entity {
    /// Create an entity with zeroed health and mana.
    pub fn new(id: u64, position: Vector, ids: &dyn IdSource) -> Self {
        Self::with_stats(id, position, 0.0, 0.0, ids)
    }

    /// Create an entity with starting health and mana.
    pub fn with_stats(
        id: u64,
        position: Vector,
        health: f64,
        mana: f64,
        ids: &dyn IdSource,
    ) -> Self {
        Self {
            id,
            uuid: ids.next_uuid(),
            position,
            stats: Mutex::new(Stats { health, mana }),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn position(&self) -> Vector {
        self.position
    }

    pub fn x(&self) -> i32 {
        self.position.x
    }

    pub fn y(&self) -> i32 {
        self.position.y
    }

    /// Replace the position wholesale. Movement is single-writer by contract,
    /// so this takes `&mut self`; only the stat record is shared across
    /// worker threads.
    pub fn set_position(&mut self, position: Vector) {
        self.position = position;
    }

    pub fn health_points(&self) -> f64 {
        self.stats.lock().health
    }

    pub fn mana_points(&self) -> f64 {
        self.stats.lock().mana
    }

    /// Atomic read-modify-write; concurrent callers on the same entity
    /// observe a total order with no lost updates.
    pub fn add_health(&self, delta: f64) {
        self.stats.lock().health += delta;
    }

    pub fn remove_health(&self, delta: f64) {
        self.stats.lock().health -= delta;
    }

    pub fn add_mana(&self, delta: f64) {
        self.stats.lock().mana += delta;
    }

    pub fn remove_mana(&self, delta: f64) {
        self.stats.lock().mana -= delta;
    }
}
