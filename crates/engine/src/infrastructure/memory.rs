//! In-memory store implementing every repository port.
//!
//! Used by tests and by the hosting process when no database URL is
//! configured. Each table sits behind its own lock; there are no
//! cross-table transactions, matching the durable store.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nightfall_domain::{
    Character, CharacterId, Item, ItemId, ItemLocation, KnownSpell, Mob, MobId, Progress, Room,
    RoomId, SpellId, StatBlock,
};
use tokio::sync::RwLock;

use crate::infrastructure::ports::{
    CharacterRepo, ItemRepo, MobRepo, RepoError, RoomRepo, SpellBookRepo,
};

#[derive(Default)]
pub struct InMemoryStore {
    characters: RwLock<HashMap<CharacterId, Character>>,
    // Vecs keep insertion order, which is what players see listed.
    mobs: RwLock<Vec<Mob>>,
    items: RwLock<Vec<Item>>,
    rooms: RwLock<BTreeMap<RoomId, Room>>,
    spellbook: RwLock<Vec<KnownSpell>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CharacterRepo for InMemoryStore {
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError> {
        Ok(self.characters.read().await.get(&id).cloned())
    }

    async fn get_many(&self, ids: &[CharacterId]) -> Result<Vec<Character>, RepoError> {
        let characters = self.characters.read().await;
        Ok(ids.iter().filter_map(|id| characters.get(id).cloned()).collect())
    }

    async fn list_in_room(
        &self,
        room_id: &RoomId,
        exclude: Option<CharacterId>,
    ) -> Result<Vec<Character>, RepoError> {
        let characters = self.characters.read().await;
        let mut present: Vec<Character> = characters
            .values()
            .filter(|c| &c.room_id == room_id && Some(c.id) != exclude)
            .cloned()
            .collect();
        present.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(present)
    }

    async fn save(&self, character: &Character) -> Result<(), RepoError> {
        self.characters
            .write()
            .await
            .insert(character.id, character.clone());
        Ok(())
    }

    async fn update_hp(&self, id: CharacterId, hp: i32) -> Result<(), RepoError> {
        let mut characters = self.characters.write().await;
        let character = characters
            .get_mut(&id)
            .ok_or_else(|| RepoError::not_found("Character", id))?;
        character.set_hp(hp);
        Ok(())
    }

    async fn update_mana(&self, id: CharacterId, mana: i32) -> Result<(), RepoError> {
        let mut characters = self.characters.write().await;
        let character = characters
            .get_mut(&id)
            .ok_or_else(|| RepoError::not_found("Character", id))?;
        character.mana = mana.clamp(0, character.max_mana);
        Ok(())
    }

    async fn update_room(&self, id: CharacterId, room_id: &RoomId) -> Result<(), RepoError> {
        let mut characters = self.characters.write().await;
        let character = characters
            .get_mut(&id)
            .ok_or_else(|| RepoError::not_found("Character", id))?;
        character.room_id = room_id.clone();
        Ok(())
    }

    async fn update_stats(
        &self,
        id: CharacterId,
        stats: &StatBlock,
        unspent_stat_points: u32,
    ) -> Result<(), RepoError> {
        let mut characters = self.characters.write().await;
        let character = characters
            .get_mut(&id)
            .ok_or_else(|| RepoError::not_found("Character", id))?;
        character.stats = *stats;
        character.unspent_stat_points = unspent_stat_points;
        Ok(())
    }

    async fn update_progress(&self, id: CharacterId, progress: &Progress) -> Result<(), RepoError> {
        let mut characters = self.characters.write().await;
        let character = characters
            .get_mut(&id)
            .ok_or_else(|| RepoError::not_found("Character", id))?;
        character.level = progress.level;
        character.experience = progress.experience;
        character.experience_to_next_level = progress.experience_to_next_level;
        character.unspent_stat_points = progress.unspent_stat_points;
        character.max_hp = progress.max_hp;
        character.set_hp(character.hp);
        Ok(())
    }

    async fn add_gold(&self, id: CharacterId, amount: u32) -> Result<(), RepoError> {
        let mut characters = self.characters.write().await;
        let character = characters
            .get_mut(&id)
            .ok_or_else(|| RepoError::not_found("Character", id))?;
        character.gold = character.gold.saturating_add(amount);
        Ok(())
    }
}

#[async_trait]
impl MobRepo for InMemoryStore {
    async fn get(&self, id: MobId) -> Result<Option<Mob>, RepoError> {
        Ok(self.mobs.read().await.iter().find(|m| m.id == id).cloned())
    }

    async fn get_many(&self, ids: &[MobId]) -> Result<Vec<Mob>, RepoError> {
        let mobs = self.mobs.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| mobs.iter().find(|m| &m.id == id).cloned())
            .collect())
    }

    async fn list_in_room(&self, room_id: &RoomId) -> Result<Vec<Mob>, RepoError> {
        Ok(self
            .mobs
            .read()
            .await
            .iter()
            .filter(|m| &m.room_id == room_id)
            .cloned()
            .collect())
    }

    async fn save(&self, mob: &Mob) -> Result<(), RepoError> {
        let mut mobs = self.mobs.write().await;
        match mobs.iter_mut().find(|m| m.id == mob.id) {
            Some(existing) => *existing = mob.clone(),
            None => mobs.push(mob.clone()),
        }
        Ok(())
    }

    async fn update_hp(&self, id: MobId, hp: i32) -> Result<(), RepoError> {
        let mut mobs = self.mobs.write().await;
        let mob = mobs
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| RepoError::not_found("Mob", id))?;
        mob.set_hp(hp);
        Ok(())
    }

    async fn delete_many(&self, ids: &[MobId]) -> Result<(), RepoError> {
        self.mobs.write().await.retain(|m| !ids.contains(&m.id));
        Ok(())
    }

    async fn count(&self) -> Result<usize, RepoError> {
        Ok(self.mobs.read().await.len())
    }
}

#[async_trait]
impl ItemRepo for InMemoryStore {
    async fn get(&self, id: ItemId) -> Result<Option<Item>, RepoError> {
        Ok(self.items.read().await.iter().find(|i| i.id == id).cloned())
    }

    async fn list_in_room(&self, room_id: &RoomId) -> Result<Vec<Item>, RepoError> {
        Ok(self
            .items
            .read()
            .await
            .iter()
            .filter(|i| matches!(&i.location, ItemLocation::Room(r) if r == room_id))
            .cloned()
            .collect())
    }

    async fn list_for_character(&self, character_id: CharacterId) -> Result<Vec<Item>, RepoError> {
        Ok(self
            .items
            .read()
            .await
            .iter()
            .filter(|i| i.owner() == Some(character_id))
            .cloned()
            .collect())
    }

    async fn create(&self, item: &Item) -> Result<(), RepoError> {
        let mut items = self.items.write().await;
        if items.iter().any(|i| i.id == item.id) {
            return Err(RepoError::constraint(format!("Item {} already exists", item.id)));
        }
        items.push(item.clone());
        Ok(())
    }

    async fn move_to_character(
        &self,
        id: ItemId,
        character_id: CharacterId,
    ) -> Result<(), RepoError> {
        let mut items = self.items.write().await;
        let item = items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| RepoError::not_found("Item", id))?;
        item.location = ItemLocation::Inventory(character_id);
        Ok(())
    }

    async fn move_to_room(&self, id: ItemId, room_id: &RoomId) -> Result<(), RepoError> {
        let mut items = self.items.write().await;
        let item = items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| RepoError::not_found("Item", id))?;
        item.location = ItemLocation::Room(room_id.clone());
        item.equipped = false;
        Ok(())
    }

    async fn set_equipped(&self, id: ItemId, equipped: bool) -> Result<(), RepoError> {
        let mut items = self.items.write().await;
        let item = items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| RepoError::not_found("Item", id))?;
        item.equipped = equipped;
        Ok(())
    }
}

#[async_trait]
impl RoomRepo for InMemoryStore {
    async fn get(&self, id: &RoomId) -> Result<Option<Room>, RepoError> {
        Ok(self.rooms.read().await.get(id).cloned())
    }

    async fn save(&self, room: &Room) -> Result<(), RepoError> {
        self.rooms
            .write()
            .await
            .insert(room.id.clone(), room.clone());
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Room>, RepoError> {
        Ok(self.rooms.read().await.values().cloned().collect())
    }
}

#[async_trait]
impl SpellBookRepo for InMemoryStore {
    async fn list_for_character(
        &self,
        character_id: CharacterId,
    ) -> Result<Vec<KnownSpell>, RepoError> {
        Ok(self
            .spellbook
            .read()
            .await
            .iter()
            .filter(|k| k.character_id == character_id)
            .cloned()
            .collect())
    }

    async fn get(
        &self,
        character_id: CharacterId,
        spell_id: SpellId,
    ) -> Result<Option<KnownSpell>, RepoError> {
        Ok(self
            .spellbook
            .read()
            .await
            .iter()
            .find(|k| k.character_id == character_id && k.spell_id == spell_id)
            .cloned())
    }

    async fn learn(&self, known: &KnownSpell) -> Result<(), RepoError> {
        let mut spellbook = self.spellbook.write().await;
        if spellbook
            .iter()
            .any(|k| k.character_id == known.character_id && k.spell_id == known.spell_id)
        {
            return Err(RepoError::constraint(format!(
                "Character {} already knows spell {}",
                known.character_id, known.spell_id
            )));
        }
        spellbook.push(known.clone());
        Ok(())
    }

    async fn set_cooldown(
        &self,
        character_id: CharacterId,
        spell_id: SpellId,
        cooldown_until: Option<DateTime<Utc>>,
    ) -> Result<(), RepoError> {
        let mut spellbook = self.spellbook.write().await;
        let known = spellbook
            .iter_mut()
            .find(|k| k.character_id == character_id && k.spell_id == spell_id)
            .ok_or_else(|| RepoError::not_found("KnownSpell", format!("{character_id}/{spell_id}")))?;
        known.cooldown_until = cooldown_until;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{character, item_in_room, mob};
    use nightfall_domain::CharacterClass;

    #[tokio::test]
    async fn list_in_room_honours_exclude() {
        let store = InMemoryStore::new();
        let square = RoomId::new("town-square");
        let aria = character("Aria", CharacterClass::Vanguard, square.clone());
        let bram = character("Bram", CharacterClass::Dawnkeeper, square.clone());
        CharacterRepo::save(&store, &aria).await.unwrap();
        CharacterRepo::save(&store, &bram).await.unwrap();

        let others = CharacterRepo::list_in_room(&store, &square, Some(aria.id))
            .await
            .unwrap();
        assert_eq!(others.len(), 1);
        assert_eq!(others[0].name, "Bram");
    }

    #[tokio::test]
    async fn hp_update_is_clamped_and_leaves_other_columns() {
        let store = InMemoryStore::new();
        let mut aria = character("Aria", CharacterClass::Vanguard, RoomId::new("town-square"));
        CharacterRepo::save(&store, &aria).await.unwrap();

        // A concurrent write to another column must survive the hp update.
        aria.gold = 99;
        CharacterRepo::save(&store, &aria).await.unwrap();
        CharacterRepo::update_hp(&store, aria.id, -40).await.unwrap();

        let stored = CharacterRepo::get(&store, aria.id).await.unwrap().unwrap();
        assert_eq!(stored.hp, 0);
        assert_eq!(stored.gold, 99);
    }

    #[tokio::test]
    async fn progress_stats_and_gold_writes_keep_a_fresh_hp() {
        let store = InMemoryStore::new();
        let mut aria = character("Aria", CharacterClass::Vanguard, RoomId::new("the-arena"));
        CharacterRepo::save(&store, &aria).await.unwrap();
        CharacterRepo::update_hp(&store, aria.id, 40).await.unwrap();

        aria.gain_experience(10);
        store.update_progress(aria.id, &aria.progress()).await.unwrap();
        let mut stats = aria.stats;
        stats.strength += 2;
        store.update_stats(aria.id, &stats, 0).await.unwrap();
        store.add_gold(aria.id, 5).await.unwrap();

        let stored = CharacterRepo::get(&store, aria.id).await.unwrap().unwrap();
        assert_eq!(stored.hp, 40);
        assert_eq!(stored.level, 2);
        assert_eq!(stored.max_hp, aria.max_hp);
        assert_eq!(stored.stats.strength, 15);
        assert_eq!(stored.unspent_stat_points, 0);
        assert_eq!(stored.gold, 15);
    }

    #[tokio::test]
    async fn dropping_an_item_unequips_it() {
        let store = InMemoryStore::new();
        let square = RoomId::new("town-square");
        let owner = CharacterId::new();
        let mut vest = item_in_room("leather vest", square.clone());
        vest.location = ItemLocation::Inventory(owner);
        vest.equipped = true;
        store.create(&vest).await.unwrap();

        store.move_to_room(vest.id, &square).await.unwrap();

        let stored = ItemRepo::get(&store, vest.id).await.unwrap().unwrap();
        assert!(!stored.equipped);
        assert_eq!(stored.location, ItemLocation::Room(square.clone()));
        assert!(ItemRepo::list_for_character(&store, owner)
            .await
            .unwrap()
            .is_empty());
        assert_eq!(ItemRepo::list_in_room(&store, &square).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_many_removes_only_listed_mobs() {
        let store = InMemoryStore::new();
        let arena = RoomId::new("the-arena");
        let pup = mob("Gloomfang Pup", arena.clone());
        let other = mob("Gloomfang Pup", arena.clone());
        MobRepo::save(&store, &pup).await.unwrap();
        MobRepo::save(&store, &other).await.unwrap();

        store.delete_many(&[pup.id]).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        assert!(MobRepo::get(&store, pup.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn learning_twice_is_a_constraint_violation() {
        let store = InMemoryStore::new();
        let known = KnownSpell::new(CharacterId::new(), SpellId::new(3));
        store.learn(&known).await.unwrap();
        let err = store.learn(&known).await.unwrap_err();
        assert!(matches!(err, RepoError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn missing_rows_are_not_found() {
        let store = InMemoryStore::new();
        let err = MobRepo::update_hp(&store, MobId::new(), 3).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
