//! Simulated game zone
//!
//! Stands in for the host process: owns a seeded set of monsters, the
//! player position and session flags, and serves them through the host
//! traits. The headless binary and the integration tests drive it.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use ahash::AHashMap;
use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::types::{EntityAddress, EntityCategory, MetadataPath};
use crate::host::{EntitySource, EntityView, PlayerContext, SessionContext};

/// Monster types the zone spawns: metadata path and in-game name
pub const MONSTER_CATALOG: &[(&str, &str)] = &[
    ("Metadata/Monsters/KaomWarrior/KaomWarrior7", "Kaom's Chosen"),
    ("Metadata/Monsters/WickerMan/WickerMan", "Wicker Man"),
    ("Metadata/Monsters/Revenant/RevenantBoss", "Forgotten Revenant"),
    ("Metadata/Monsters/Skeletons/SkeletonArcher", "Skeleton Archer"),
    ("Metadata/Monsters/Zombies/ZombieBasic", "Drowned"),
    ("Metadata/Monsters/Goatman/GoatmanShamanFire", "Goatman Fire-caller"),
];

/// Radius around the player that random spawns land in
pub const SPAWN_RADIUS: f32 = 1500.0;

struct ZoneState {
    area: u32,
    player: PlayerContext,
    entities: AHashMap<EntityAddress, EntityView>,
    next_address: u64,
    rng: ChaCha8Rng,
}

/// Deterministic zone shared between the frame loop and the scan task
pub struct SimZone {
    state: RwLock<ZoneState>,
}

impl SimZone {
    pub fn new(seed: u64) -> Self {
        Self {
            state: RwLock::new(ZoneState {
                area: 1,
                player: PlayerContext {
                    position: Vec3::ZERO,
                    in_game: true,
                    in_safe_zone: false,
                },
                entities: AHashMap::new(),
                next_address: 0x1000,
                rng: ChaCha8Rng::seed_from_u64(seed),
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, ZoneState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ZoneState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn area(&self) -> u32 {
        self.read().area
    }

    pub fn entity_count(&self) -> usize {
        self.read().entities.len()
    }

    pub fn dead_count(&self) -> usize {
        self.read().entities.values().filter(|e| e.is_dead).count()
    }

    /// Spawn a living hostile monster
    pub fn spawn_monster(&self, metadata: &str, render_name: &str, position: Vec3) -> EntityView {
        self.spawn(EntityCategory::Monster, metadata, render_name, position)
    }

    /// Spawn any entity kind, e.g. a chest, for filtering scenarios
    pub fn spawn(&self, category: EntityCategory, metadata: &str, render_name: &str, position: Vec3) -> EntityView {
        let mut state = self.write();
        let address = EntityAddress(state.next_address);
        state.next_address += 0x10;
        let view = EntityView {
            address,
            metadata: MetadataPath::from(metadata),
            category,
            position,
            is_dead: false,
            is_hostile: category == EntityCategory::Monster,
            is_targetable: true,
            render_name: render_name.to_string(),
        };
        state.entities.insert(address, view.clone());
        view
    }

    /// Spawn `count` catalog monsters at random spots around the player
    pub fn spawn_random(&self, count: usize) -> Vec<EntityView> {
        let mut spawns = Vec::with_capacity(count);
        for _ in 0..count {
            let (metadata, name, position) = {
                let mut state = self.write();
                let center = state.player.position;
                let (metadata, name) = MONSTER_CATALOG[state.rng.gen_range(0..MONSTER_CATALOG.len())];
                let offset = Vec3::new(
                    state.rng.gen_range(-SPAWN_RADIUS..SPAWN_RADIUS),
                    state.rng.gen_range(-SPAWN_RADIUS..SPAWN_RADIUS),
                    0.0,
                );
                (metadata, name, center + offset)
            };
            spawns.push(self.spawn_monster(metadata, name, position));
        }
        spawns
    }

    pub fn kill(&self, address: EntityAddress) -> bool {
        match self.write().entities.get_mut(&address) {
            Some(entity) if !entity.is_dead => {
                entity.is_dead = true;
                true
            }
            _ => false,
        }
    }

    /// Kill one random living monster
    pub fn kill_random(&self) -> Option<EntityAddress> {
        let mut state = self.write();
        let mut living: Vec<EntityAddress> = state
            .entities
            .values()
            .filter(|e| !e.is_dead && e.category == EntityCategory::Monster)
            .map(|e| e.address)
            .collect();
        if living.is_empty() {
            return None;
        }
        living.sort_by_key(|address| address.0);
        let address = living[state.rng.gen_range(0..living.len())];
        if let Some(entity) = state.entities.get_mut(&address) {
            entity.is_dead = true;
        }
        Some(address)
    }

    /// Corpses become untargetable once consumed by something else
    pub fn set_targetable(&self, address: EntityAddress, targetable: bool) -> bool {
        match self.write().entities.get_mut(&address) {
            Some(entity) => {
                entity.is_targetable = targetable;
                true
            }
            None => false,
        }
    }

    pub fn despawn(&self, address: EntityAddress) -> bool {
        self.write().entities.remove(&address).is_some()
    }

    pub fn move_player(&self, delta: Vec3) -> Vec3 {
        let mut state = self.write();
        state.player.position += delta;
        state.player.position
    }

    /// Load a new area: every entity is gone and the player is back at the origin
    pub fn change_area(&self) -> u32 {
        let mut state = self.write();
        state.entities.clear();
        state.area += 1;
        state.player.position = Vec3::ZERO;
        state.player.in_safe_zone = false;
        state.area
    }

    pub fn set_town(&self, in_town: bool) {
        self.write().player.in_safe_zone = in_town;
    }

    pub fn set_in_game(&self, in_game: bool) {
        self.write().player.in_game = in_game;
    }
}

impl EntitySource for SimZone {
    fn live_entities(&self) -> Vec<EntityView> {
        self.read().entities.values().cloned().collect()
    }

    fn entity(&self, address: EntityAddress) -> Option<EntityView> {
        self.read().entities.get(&address).cloned()
    }
}

impl SessionContext for SimZone {
    fn player(&self) -> PlayerContext {
        self.read().player
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_and_kill() {
        let zone = SimZone::new(7);
        let view = zone.spawn_monster("Metadata/Monsters/A/A", "A", Vec3::ZERO);
        assert!(zone.entity(view.address).is_some_and(|e| !e.is_dead));
        assert!(zone.kill(view.address));
        assert!(!zone.kill(view.address));
        assert_eq!(zone.dead_count(), 1);
    }

    #[test]
    fn test_random_spawns_are_deterministic() {
        let a = SimZone::new(42);
        let b = SimZone::new(42);
        let left: Vec<_> = a.spawn_random(8).into_iter().map(|e| (e.metadata, e.position)).collect();
        let right: Vec<_> = b.spawn_random(8).into_iter().map(|e| (e.metadata, e.position)).collect();
        assert_eq!(left, right);
        assert!(left.iter().all(|(_, p)| p.x.abs() <= SPAWN_RADIUS && p.y.abs() <= SPAWN_RADIUS));
    }

    #[test]
    fn test_kill_random_until_empty() {
        let zone = SimZone::new(3);
        zone.spawn_random(3);
        zone.spawn(EntityCategory::Chest, "Metadata/Chests/Chest", "", Vec3::ZERO);
        for _ in 0..3 {
            assert!(zone.kill_random().is_some());
        }
        assert_eq!(zone.kill_random(), None);
        assert_eq!(zone.dead_count(), 3);
    }

    #[test]
    fn test_change_area_clears_entities() {
        let zone = SimZone::new(1);
        zone.spawn_random(5);
        zone.move_player(Vec3::new(100.0, 0.0, 0.0));
        zone.set_town(true);
        assert_eq!(zone.change_area(), 2);
        assert_eq!(zone.entity_count(), 0);
        let player = zone.player();
        assert_eq!(player.position, Vec3::ZERO);
        assert!(player.is_active());
    }
}
