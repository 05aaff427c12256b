//! Player actor and the leveling state machine.
//!
//! A player is an [`Entity`] extended with experience, currency, an owned
//! inventory, and a level driven by a sparse threshold table. Player ids are
//! constrained to the range above [`PLAYER_MIN_ID`](crate::constants::PLAYER_MIN_ID)
//! so they never collide with non-player actors in the shared id space.

use std::collections::HashMap;
use std::net::IpAddr;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::CoreConfig;
use crate::entity::{Entity, IdSource};
use crate::error::CoreError;
use crate::math::Vector;

pub mod inventory;

use inventory::Inventory;

/// Outbound text-message capability the surrounding server provides. The
/// core only needs this one operation, never the transport behind it.
pub trait MessageSink: Send + Sync {
    fn send_message(&self, entity_id: u64, message: &str);
}

/// Sparse `level -> xp required for the next level` table.
///
/// Populated once before the server starts accepting mutations and then
/// shared read-only (`Arc`) across every player; a level with no entry is
/// the explicit max-level outcome, not a lookup error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelTable {
    thresholds: HashMap<u32, u64>,
}

impl LevelTable {
    pub fn from_pairs(pairs: &[(u32, u64)]) -> Self {
        Self {
            thresholds: pairs.iter().copied().collect(),
        }
    }

    /// Xp required to advance past `level`, or `None` when `level` cannot
    /// advance any further.
    pub fn threshold_for(&self, level: u32) -> Option<u64> {
        self.thresholds.get(&level).copied()
    }

    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }
}

/// Construction parameters supplied by the external player factory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSpawn {
    pub ip: IpAddr,
    pub id: u64,
    pub position: Vector,
    pub health: f64,
    pub mana: f64,
    pub money: i64,
}

type LevelUpHook = Box<dyn Fn(u32) + Send + Sync>;

/// A connected player. Specializes [`Entity`] (all stat and position
/// operations are available through deref) and owns its inventory
/// exclusively.
pub struct Player {
    entity: Entity,
    ip: IpAddr,
    level: u32,
    xp: u64,
    money: i64,
    inventory: Inventory,
    table: Arc<LevelTable>,
    outbox: Arc<dyn MessageSink>,
    on_level_up: Option<LevelUpHook>,
}

impl Player {
    /// Build a player, validating the id range before any state exists.
    ///
    /// Fails with [`CoreError::IllegalIdentifier`] when `spawn.id` is below
    /// the configured minimum - a hard precondition, never a warning.
    pub fn spawn(
        spawn: PlayerSpawn,
        config: &CoreConfig,
        table: Arc<LevelTable>,
        ids: &dyn IdSource,
        outbox: Arc<dyn MessageSink>,
    ) -> Result<Self, CoreError> {
        if spawn.id < config.player_min_id {
            return Err(CoreError::IllegalIdentifier {
                id: spawn.id,
                min: config.player_min_id,
            });
        }
        Ok(Self {
            entity: Entity::with_stats(spawn.id, spawn.position, spawn.health, spawn.mana, ids),
            ip: spawn.ip,
            level: config.base_level,
            xp: 0,
            money: spawn.money,
            inventory: Inventory::default(),
            table,
            outbox,
            on_level_up: None,
        })
    }

    pub fn ip(&self) -> IpAddr {
        self.ip
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn xp(&self) -> u64 {
        self.xp
    }

    pub fn money(&self) -> i64 {
        self.money
    }

    pub fn add_money(&mut self, amount: i64) {
        self.money += amount;
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    /// Swap the whole container, returning the previous one.
    pub fn replace_inventory(&mut self, inventory: Inventory) -> Inventory {
        std::mem::replace(&mut self.inventory, inventory)
    }

    /// Install the level-up extension point. Invoked with the new level on
    /// every promotion; no default behavior.
    pub fn set_level_up_hook(&mut self, hook: impl Fn(u32) + Send + Sync + 'static) {
        self.on_level_up = Some(Box::new(hook));
    }

    /// Feed experience into the leveling state machine. Returns the new
    /// level when a promotion happened.
    ///
    /// Promotion discards the contributing gain: when the tentative total
    /// reaches the threshold for `level + 1`, the full `amount` is rolled
    /// back (xp reverts to its pre-call value, not to the surplus above the
    /// threshold), the level increments once, and the hook fires. At most
    /// one transition per call. Past the last configured level the xp is
    /// simply retained.
    pub fn add_xp_to_upgrade(&mut self, amount: u64) -> Option<u32> {
        self.xp += amount;
        let required = self.table.threshold_for(self.level + 1)?;
        if self.xp < required {
            return None;
        }
        self.xp -= amount;
        self.level += 1;
        info!(player = self.entity.id(), level = self.level, "player leveled up");
        if let Some(hook) = &self.on_level_up {
            hook(self.level);
        }
        Some(self.level)
    }

    /// Remaining xp until the next level. Negative only if the table was
    /// reconfigured downward under a player's feet, which the population
    /// contract forbids.
    pub fn xp_to_upgrade(&self) -> Result<i64, CoreError> {
        let next = self.level + 1;
        let required = self
            .table
            .threshold_for(next)
            .ok_or(CoreError::MissingThreshold { level: next })?;
        Ok(required as i64 - self.xp as i64)
    }

    /// Deliver a text message to this player's connection through the
    /// injected server capability.
    pub fn send_message(&self, message: &str) {
        self.outbox.send_message(self.entity.id(), message);
    }
}

impl Deref for Player {
    type Target = Entity;

    fn deref(&self) -> &Entity {
        &self.entity
    }
}

impl DerefMut for Player {
    fn deref_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("id", &self.entity.id())
            .field("ip", &self.ip)
            .field("level", &self.level)
            .field("xp", &self.xp)
            .field("money", &self.money)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::RandomIds;
    use parking_lot::Mutex;
    use std::net::Ipv4Addr;

    /// Records every delivered message for assertions.
    #[derive(Default)]
    struct RecordingSink(Mutex<Vec<(u64, String)>>);

    impl MessageSink for RecordingSink {
        fn send_message(&self, entity_id: u64, message: &str) {
            self.0.lock().push((entity_id, message.to_string()));
        }
    }

    fn test_spawn(id: u64) -> PlayerSpawn {
        PlayerSpawn {
            ip: IpAddr::V4(Ipv4Addr::LOCALHOST),
            id,
            position: Vector::new(1, 1),
            health: 100.0,
            mana: 40.0,
            money: 25,
        }
    }

    fn test_player(id: u64) -> Result<Player, CoreError> {
        let config = CoreConfig::default();
        let table = Arc::new(config.level_table());
        Player::spawn(
            test_spawn(id),
            &config,
            table,
            &RandomIds,
            Arc::new(RecordingSink::default()),
        )
    }

    #[test]
    fn test_spawn_validates_id_range() {
        assert!(matches!(
            test_player(9_999),
            Err(CoreError::IllegalIdentifier { id: 9_999, min: 10_000 })
        ));
        assert!(test_player(10_000).is_ok());
    }

    #[test]
    fn test_spawn_defaults() {
        let p = test_player(10_500).unwrap();
        assert_eq!(p.level(), 1);
        assert_eq!(p.xp(), 0);
        assert_eq!(p.money(), 25);
        assert_eq!(p.inventory().used_slots(), 0);
        assert!((p.health_points() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_xp_below_threshold_is_retained() {
        let mut p = test_player(10_000).unwrap();
        p.add_xp_to_upgrade(50);
        assert_eq!(p.add_xp_to_upgrade(30), None);
        assert_eq!(p.level(), 1);
        assert_eq!(p.xp(), 80);
    }

    #[test]
    fn test_promotion_discards_contributing_gain() {
        let mut p = test_player(10_000).unwrap();
        assert_eq!(p.add_xp_to_upgrade(150), Some(2));
        assert_eq!(p.level(), 2);
        assert_eq!(p.xp(), 0, "the promoting gain is rolled back in full");
    }

    #[test]
    fn test_promotion_rolls_back_to_pre_call_value() {
        let mut p = test_player(10_000).unwrap();
        p.add_xp_to_upgrade(60);
        assert_eq!(p.add_xp_to_upgrade(70), Some(2));
        // 60 + 70 crossed 100; the 70 is discarded, the earlier 60 survives.
        assert_eq!(p.xp(), 60);
        assert_eq!(p.level(), 2);
    }

    #[test]
    fn test_at_most_one_promotion_per_call() {
        let mut p = test_player(10_000).unwrap();
        assert_eq!(p.add_xp_to_upgrade(10_000), Some(2));
        assert_eq!(p.level(), 2, "a single call never skips levels");
    }

    #[test]
    fn test_xp_past_max_level_is_retained() {
        let mut p = test_player(10_000).unwrap();
        p.add_xp_to_upgrade(150); // -> level 2
        p.add_xp_to_upgrade(500); // -> level 3, past the table
        assert_eq!(p.level(), 3);
        assert_eq!(p.add_xp_to_upgrade(40), None);
        assert_eq!(p.xp(), 40);
    }

    #[test]
    fn test_xp_to_upgrade() {
        let mut p = test_player(10_000).unwrap();
        p.add_xp_to_upgrade(30);
        assert_eq!(p.xp_to_upgrade().unwrap(), 70);
    }

    #[test]
    fn test_xp_to_upgrade_past_table_is_missing_threshold() {
        let mut p = test_player(10_000).unwrap();
        p.add_xp_to_upgrade(150);
        p.add_xp_to_upgrade(500);
        assert!(matches!(
            p.xp_to_upgrade(),
            Err(CoreError::MissingThreshold { level: 4 })
        ));
    }

    #[test]
    fn test_level_up_hook_receives_new_level() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut p = test_player(10_000).unwrap();
        let sink = Arc::clone(&seen);
        p.set_level_up_hook(move |level| sink.lock().push(level));

        p.add_xp_to_upgrade(50);
        p.add_xp_to_upgrade(100);
        assert_eq!(*seen.lock(), vec![2]);
    }

    #[test]
    fn test_send_message_routes_through_sink() {
        let sink = Arc::new(RecordingSink::default());
        let config = CoreConfig::default();
        let p = Player::spawn(
            test_spawn(10_042),
            &config,
            Arc::new(config.level_table()),
            &RandomIds,
            Arc::clone(&sink) as Arc<dyn MessageSink>,
        )
        .unwrap();

        p.send_message("welcome");
        assert_eq!(*sink.0.lock(), vec![(10_042, "welcome".to_string())]);
    }

    #[test]
    fn test_entity_operations_through_deref() {
        let mut p = test_player(10_000).unwrap();
        p.remove_health(30.0);
        p.set_position(Vector::new(5, -2));
        assert!((p.health_points() - 70.0).abs() < f64::EPSILON);
        assert_eq!(p.x(), 5);
        assert_eq!(p.y(), -2);
    }

    #[test]
    fn test_replace_inventory() {
        let mut p = test_player(10_000).unwrap();
        p.inventory_mut().add(inventory::ItemStack::new("potion", 3));
        let old = p.replace_inventory(Inventory::default());
        assert_eq!(old.used_slots(), 1);
        assert_eq!(p.inventory().used_slots(), 0);
    }
}
