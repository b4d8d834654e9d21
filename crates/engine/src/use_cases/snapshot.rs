//! Full state snapshot assembly (`gameUpdate`).

use std::collections::HashMap;

use nightfall_domain::{Character, CharacterId, EffectiveStats, Item, Mob, MobId, Room, RoomId};
use nightfall_shared::{AffixData, GameUpdate, ItemData, MobData, PlayerData, RoomData, ServerEvent};

use crate::app::Repositories;
use crate::infrastructure::ports::RepoError;
use crate::use_cases::attributes::AttributeService;

/// Missing rows here mean upstream state is corrupt; the request fails.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Character not found: {0}")]
    CharacterNotFound(CharacterId),
    #[error("Room not found: {0}")]
    RoomNotFound(RoomId),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

/// What the combat manager knows about a character's room.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombatView {
    pub in_combat: bool,
    pub mob_targets: HashMap<MobId, CharacterId>,
}

impl CombatView {
    pub fn out_of_combat() -> Self {
        Self::default()
    }
}

#[derive(Clone)]
pub struct SnapshotBuilder {
    repos: Repositories,
    zone_radius: i32,
}

impl SnapshotBuilder {
    pub fn new(repos: Repositories, zone_radius: i32) -> Self {
        Self { repos, zone_radius }
    }

    pub async fn build(
        &self,
        character_id: CharacterId,
        message: impl Into<String>,
        view: &CombatView,
    ) -> Result<ServerEvent, SnapshotError> {
        let character = self
            .repos
            .characters
            .get(character_id)
            .await?
            .ok_or(SnapshotError::CharacterNotFound(character_id))?;
        let room = self
            .repos
            .rooms
            .get(&character.room_id)
            .await?
            .ok_or_else(|| SnapshotError::RoomNotFound(character.room_id.clone()))?;

        let others = self
            .repos
            .characters
            .list_in_room(&room.id, Some(character_id))
            .await?;
        let room_items = self.repos.items.list_in_room(&room.id).await?;
        let inventory = self.repos.items.list_for_character(character_id).await?;
        let mobs = self.repos.mobs.list_in_room(&room.id).await?;
        let zone_rooms = self
            .repos
            .rooms
            .list_all()
            .await?
            .iter()
            .filter(|other| other.is_near(&room, self.zone_radius))
            .map(room_data)
            .collect();

        let stats = AttributeService::for_character(&character, &inventory);
        let update = GameUpdate {
            message: message.into(),
            player: player_data(&character, &stats),
            room: room_data(&room),
            players: others.into_iter().map(|c| c.name).collect(),
            room_items: room_items.iter().map(item_data).collect(),
            inventory: inventory.iter().map(item_data).collect(),
            mobs: mobs
                .iter()
                .map(|mob| mob_data(mob, view.mob_targets.get(&mob.id).copied()))
                .collect(),
            in_combat: view.in_combat,
            zone_rooms,
        };

        Ok(ServerEvent::game_update(character_id.to_uuid(), update))
    }
}

pub fn player_data(character: &Character, stats: &EffectiveStats) -> PlayerData {
    PlayerData {
        id: character.id.to_uuid(),
        name: character.name.clone(),
        class: character.class,
        level: character.level,
        experience: character.experience,
        experience_to_next_level: character.experience_to_next_level,
        unspent_stat_points: character.unspent_stat_points,
        strength: character.stats.strength,
        dexterity: character.stats.dexterity,
        constitution: character.stats.constitution,
        intelligence: character.stats.intelligence,
        wisdom: character.stats.wisdom,
        charisma: character.stats.charisma,
        resolve: character.stats.resolve,
        defense: character.defense,
        hp: character.hp,
        max_hp: character.max_hp,
        mana: character.mana,
        max_mana: character.max_mana,
        gold: character.gold,
        current_room_id: character.room_id.to_string(),
        effective_strength: stats.effective_strength(),
        effective_defense: stats.effective_defense(),
    }
}

pub fn room_data(room: &Room) -> RoomData {
    RoomData {
        id: room.id.to_string(),
        name: room.name.clone(),
        description: room.description.clone(),
        exits: room
            .exits
            .iter()
            .map(|(direction, target)| (direction.clone(), target.to_string()))
            .collect(),
        x: room.x,
        y: room.y,
        z: room.z,
    }
}

pub fn item_data(item: &Item) -> ItemData {
    ItemData {
        id: item.id.to_uuid(),
        name: item.name.clone(),
        description: item.description.clone(),
        slot: item.slot,
        equipped: item.equipped,
        rarity: item.rarity,
        damage: item.attributes.damage,
        armor: item.attributes.armor,
        magic_resist: item.attributes.magic_resist,
        affixes: item
            .affixes
            .iter()
            .map(|affix| AffixData {
                name: affix.name.clone(),
                kind: affix.kind,
                stats: affix
                    .stats
                    .iter()
                    .map(|(kind, value)| (kind.as_str().to_string(), *value))
                    .collect(),
            })
            .collect(),
    }
}

pub fn mob_data(mob: &Mob, target: Option<CharacterId>) -> MobData {
    MobData {
        id: mob.id.to_uuid(),
        name: mob.name.clone(),
        description: mob.description.clone(),
        hostility: mob.hostility,
        level: mob.level,
        hp: mob.hp,
        max_hp: mob.max_hp,
        current_target_id: target.map(CharacterId::to_uuid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::InMemoryStore;
    use crate::infrastructure::ports::{CharacterRepo, ItemRepo, MobRepo, RoomRepo};
    use crate::test_fixtures::{character, gear, item_in_room, mob, repositories, room};
    use nightfall_domain::{CharacterClass, EquipSlot, ItemAttributes};
    use std::sync::Arc;

    #[tokio::test]
    async fn snapshot_gathers_room_inventory_and_neighbours() {
        let store = Arc::new(InMemoryStore::new());
        let arena = room("the-arena", 0, -2, &[("north", "south-gate")]);
        let gate = room("south-gate", 0, -1, &[("south", "the-arena")]);
        let far = room("far-away", 9, 9, &[]);
        for r in [&arena, &gate, &far] {
            RoomRepo::save(store.as_ref(), r).await.unwrap();
        }

        let aria = character("Aria", CharacterClass::Vanguard, arena.id.clone());
        let bram = character("Bram", CharacterClass::Dawnkeeper, arena.id.clone());
        CharacterRepo::save(store.as_ref(), &aria).await.unwrap();
        CharacterRepo::save(store.as_ref(), &bram).await.unwrap();

        let mut dagger = gear("iron dagger", EquipSlot::WeaponMain, ItemAttributes::damage(3), &aria);
        dagger.equipped = true;
        store.create(&dagger).await.unwrap();
        store.create(&item_in_room("gloomfang pelt", arena.id.clone())).await.unwrap();

        let pup = mob("Gloomfang Pup", arena.id.clone());
        MobRepo::save(store.as_ref(), &pup).await.unwrap();

        let builder = SnapshotBuilder::new(repositories(store), 2);
        let view = CombatView {
            in_combat: true,
            mob_targets: HashMap::from([(pup.id, aria.id)]),
        };
        let event = builder.build(aria.id, "You look around.", &view).await.unwrap();
        let update = event.as_game_update().unwrap();

        assert_eq!(update.message, "You look around.");
        assert_eq!(update.players, vec!["Bram".to_string()]);
        assert_eq!(update.inventory.len(), 1);
        assert_eq!(update.room_items[0].name, "gloomfang pelt");
        assert_eq!(update.player.effective_strength, 16);
        assert_eq!(update.mobs[0].current_target_id, Some(aria.id.to_uuid()));
        assert!(update.in_combat);
        let zone: Vec<&str> = update.zone_rooms.iter().map(|r| r.id.as_str()).collect();
        assert!(zone.contains(&"south-gate"));
        assert!(!zone.contains(&"far-away"));
    }

    #[tokio::test]
    async fn missing_room_is_a_data_integrity_error() {
        let store = Arc::new(InMemoryStore::new());
        let lost = character("Lost", CharacterClass::Vanguard, RoomId::new("nowhere"));
        CharacterRepo::save(store.as_ref(), &lost).await.unwrap();

        let builder = SnapshotBuilder::new(repositories(store), 2);
        let err = builder
            .build(lost.id, "", &CombatView::out_of_combat())
            .await
            .unwrap_err();
        assert!(matches!(err, SnapshotError::RoomNotFound(_)));

        let err = builder
            .build(CharacterId::new(), "", &CombatView::out_of_combat())
            .await
            .unwrap_err();
        assert!(matches!(err, SnapshotError::CharacterNotFound(_)));
    }
}
