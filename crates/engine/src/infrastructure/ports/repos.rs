//! Repository port traits for store access.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nightfall_domain::{
    Affix, BaseItem, BaseItemId, Character, CharacterId, Item, ItemId, ItemTemplate,
    ItemTemplateId, KnownSpell, Mob, MobId, Progress, Room, RoomId, Spell, SpellId, StatBlock,
    StatusEffect, StatusEffectId,
};

use super::error::RepoError;

// =============================================================================
// Combatants
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterRepo: Send + Sync {
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError>;
    /// Characters that no longer exist are silently absent from the result.
    async fn get_many(&self, ids: &[CharacterId]) -> Result<Vec<Character>, RepoError>;
    async fn list_in_room(
        &self,
        room_id: &RoomId,
        exclude: Option<CharacterId>,
    ) -> Result<Vec<Character>, RepoError>;
    async fn save(&self, character: &Character) -> Result<(), RepoError>;

    // Targeted writes. Nothing outside character creation rewrites a whole row.
    async fn update_hp(&self, id: CharacterId, hp: i32) -> Result<(), RepoError>;
    async fn update_mana(&self, id: CharacterId, mana: i32) -> Result<(), RepoError>;
    async fn update_room(&self, id: CharacterId, room_id: &RoomId) -> Result<(), RepoError>;
    async fn update_stats(
        &self,
        id: CharacterId,
        stats: &StatBlock,
        unspent_stat_points: u32,
    ) -> Result<(), RepoError>;
    async fn update_progress(&self, id: CharacterId, progress: &Progress) -> Result<(), RepoError>;
    /// Adds to the stored balance rather than writing a computed total.
    async fn add_gold(&self, id: CharacterId, amount: u32) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MobRepo: Send + Sync {
    async fn get(&self, id: MobId) -> Result<Option<Mob>, RepoError>;
    async fn get_many(&self, ids: &[MobId]) -> Result<Vec<Mob>, RepoError>;
    async fn list_in_room(&self, room_id: &RoomId) -> Result<Vec<Mob>, RepoError>;
    async fn save(&self, mob: &Mob) -> Result<(), RepoError>;
    async fn update_hp(&self, id: MobId, hp: i32) -> Result<(), RepoError>;
    async fn delete_many(&self, ids: &[MobId]) -> Result<(), RepoError>;
    async fn count(&self) -> Result<usize, RepoError>;
}

// =============================================================================
// Items
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepo: Send + Sync {
    async fn get(&self, id: ItemId) -> Result<Option<Item>, RepoError>;
    async fn list_in_room(&self, room_id: &RoomId) -> Result<Vec<Item>, RepoError>;
    async fn list_for_character(&self, character_id: CharacterId) -> Result<Vec<Item>, RepoError>;
    async fn create(&self, item: &Item) -> Result<(), RepoError>;
    async fn move_to_character(
        &self,
        id: ItemId,
        character_id: CharacterId,
    ) -> Result<(), RepoError>;
    /// Also clears the equipped flag.
    async fn move_to_room(&self, id: ItemId, room_id: &RoomId) -> Result<(), RepoError>;
    async fn set_equipped(&self, id: ItemId, equipped: bool) -> Result<(), RepoError>;
}

// =============================================================================
// World
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomRepo: Send + Sync {
    async fn get(&self, id: &RoomId) -> Result<Option<Room>, RepoError>;
    async fn save(&self, room: &Room) -> Result<(), RepoError>;
    async fn list_all(&self) -> Result<Vec<Room>, RepoError>;
}

// =============================================================================
// Spells
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpellBookRepo: Send + Sync {
    async fn list_for_character(
        &self,
        character_id: CharacterId,
    ) -> Result<Vec<KnownSpell>, RepoError>;
    async fn get(
        &self,
        character_id: CharacterId,
        spell_id: SpellId,
    ) -> Result<Option<KnownSpell>, RepoError>;
    async fn learn(&self, known: &KnownSpell) -> Result<(), RepoError>;
    async fn set_cooldown(
        &self,
        character_id: CharacterId,
        spell_id: SpellId,
        cooldown_until: Option<DateTime<Utc>>,
    ) -> Result<(), RepoError>;
}

// =============================================================================
// Read-only content
// =============================================================================

/// Reference data authored outside the simulation. Lookups never fail;
/// unknown keys come back as `None`.
#[cfg_attr(test, mockall::automock)]
pub trait ContentRepo: Send + Sync {
    fn spell(&self, id: SpellId) -> Option<Spell>;
    /// Case-insensitive name lookup.
    fn spell_by_name(&self, name: &str) -> Option<Spell>;
    fn spells(&self) -> Vec<Spell>;
    fn status_effect(&self, id: StatusEffectId) -> Option<StatusEffect>;
    fn item_template(&self, id: ItemTemplateId) -> Option<ItemTemplate>;
    fn base_item(&self, id: BaseItemId) -> Option<BaseItem>;
    fn affixes(&self) -> Vec<Affix>;
}
