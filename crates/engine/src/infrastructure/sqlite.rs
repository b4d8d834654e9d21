//! SQLite-backed store implementing every repository port.
//!
//! Each row keeps the full entity as JSON in `data`, next to the indexed
//! columns the queries filter on. Combat writes go through targeted
//! `json_set` updates so they never overwrite columns owned by commands.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nightfall_domain::{
    Character, CharacterId, Item, ItemId, ItemLocation, KnownSpell, Mob, MobId, Progress, Room,
    RoomId, SpellId, StatBlock,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::infrastructure::ports::{
    CharacterRepo, ItemRepo, MobRepo, RepoError, RoomRepo, SpellBookRepo,
};

const SCHEMA: [&str; 5] = [
    r#"
    CREATE TABLE IF NOT EXISTS characters (
        id TEXT PRIMARY KEY NOT NULL,
        room_id TEXT NOT NULL,
        name TEXT NOT NULL,
        data TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS mobs (
        id TEXT PRIMARY KEY NOT NULL,
        room_id TEXT NOT NULL,
        data TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS items (
        id TEXT PRIMARY KEY NOT NULL,
        character_id TEXT,
        room_id TEXT,
        equipped INTEGER NOT NULL DEFAULT 0,
        data TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS rooms (
        id TEXT PRIMARY KEY NOT NULL,
        data TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS known_spells (
        character_id TEXT NOT NULL,
        spell_id INTEGER NOT NULL,
        cooldown_until TEXT,
        PRIMARY KEY (character_id, spell_id)
    )
    "#,
];

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if needed) a database from a `sqlite:` URL or a bare path.
    pub async fn connect(database: &str) -> Result<Self, RepoError> {
        let url = if database.starts_with("sqlite:") {
            database.to_string()
        } else {
            format!("sqlite:{}?mode=rwc", database)
        };

        let pool = SqlitePool::connect(&url)
            .await
            .map_err(|e| RepoError::database("connect", e))?;

        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&pool)
                .await
                .map_err(|e| RepoError::database("migrate", e))?;
        }

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn encode<T: Serialize>(value: &T) -> Result<String, RepoError> {
    serde_json::to_string(value).map_err(|e| RepoError::Serialization(e.to_string()))
}

fn decode<T: DeserializeOwned>(row: &SqliteRow) -> Result<T, RepoError> {
    let json: String = row.get("data");
    serde_json::from_str(&json).map_err(|e| RepoError::Serialization(e.to_string()))
}

fn decode_all<T: DeserializeOwned>(rows: &[SqliteRow]) -> Result<Vec<T>, RepoError> {
    rows.iter().map(decode).collect()
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

fn expect_one(
    rows_affected: u64,
    entity_type: &'static str,
    id: impl ToString,
) -> Result<(), RepoError> {
    if rows_affected == 0 {
        return Err(RepoError::not_found(entity_type, id));
    }
    Ok(())
}

// =============================================================================
// Characters
// =============================================================================

#[async_trait]
impl CharacterRepo for SqliteStore {
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError> {
        let row = sqlx::query("SELECT data FROM characters WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("character.get", e))?;
        row.as_ref().map(decode).transpose()
    }

    async fn get_many(&self, ids: &[CharacterId]) -> Result<Vec<Character>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT data FROM characters WHERE id IN ({})",
            placeholders(ids.len())
        );
        let mut query = sqlx::query(&sql);
        for id in ids {
            query = query.bind(id.to_string());
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("character.get_many", e))?;
        decode_all(&rows)
    }

    async fn list_in_room(
        &self,
        room_id: &RoomId,
        exclude: Option<CharacterId>,
    ) -> Result<Vec<Character>, RepoError> {
        let rows = sqlx::query(
            "SELECT data FROM characters WHERE room_id = ? AND id IS NOT ? ORDER BY name",
        )
        .bind(room_id.as_str())
        .bind(exclude.map(|id| id.to_string()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("character.list_in_room", e))?;
        decode_all(&rows)
    }

    async fn save(&self, character: &Character) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO characters (id, room_id, name, data)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                room_id = excluded.room_id,
                name = excluded.name,
                data = excluded.data
            "#,
        )
        .bind(character.id.to_string())
        .bind(character.room_id.as_str())
        .bind(character.name.as_str())
        .bind(encode(character)?)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("character.save", e))?;
        Ok(())
    }

    async fn update_hp(&self, id: CharacterId, hp: i32) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"
            UPDATE characters
            SET data = json_set(data, '$.hp', MAX(0, MIN(?, json_extract(data, '$.maxHp'))))
            WHERE id = ?
            "#,
        )
        .bind(hp)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("character.update_hp", e))?;
        expect_one(result.rows_affected(), "Character", id)
    }

    async fn update_mana(&self, id: CharacterId, mana: i32) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"
            UPDATE characters
            SET data = json_set(data, '$.mana', MAX(0, MIN(?, json_extract(data, '$.maxMana'))))
            WHERE id = ?
            "#,
        )
        .bind(mana)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("character.update_mana", e))?;
        expect_one(result.rows_affected(), "Character", id)
    }

    async fn update_room(&self, id: CharacterId, room_id: &RoomId) -> Result<(), RepoError> {
        let result = sqlx::query(
            "UPDATE characters SET room_id = ?, data = json_set(data, '$.roomId', ?) WHERE id = ?",
        )
        .bind(room_id.as_str())
        .bind(room_id.as_str())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("character.update_room", e))?;
        expect_one(result.rows_affected(), "Character", id)
    }

    async fn update_stats(
        &self,
        id: CharacterId,
        stats: &StatBlock,
        unspent_stat_points: u32,
    ) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"
            UPDATE characters
            SET data = json_set(data, '$.stats', json(?), '$.unspentStatPoints', ?)
            WHERE id = ?
            "#,
        )
        .bind(encode(stats)?)
        .bind(i64::from(unspent_stat_points))
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("character.update_stats", e))?;
        expect_one(result.rows_affected(), "Character", id)
    }

    async fn update_progress(&self, id: CharacterId, progress: &Progress) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"
            UPDATE characters
            SET data = json_set(
                data,
                '$.level', ?,
                '$.experience', ?,
                '$.experienceToNextLevel', ?,
                '$.unspentStatPoints', ?,
                '$.maxHp', ?,
                '$.hp', MIN(json_extract(data, '$.hp'), ?)
            )
            WHERE id = ?
            "#,
        )
        .bind(i64::from(progress.level))
        .bind(i64::from(progress.experience))
        .bind(i64::from(progress.experience_to_next_level))
        .bind(i64::from(progress.unspent_stat_points))
        .bind(progress.max_hp)
        .bind(progress.max_hp)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("character.update_progress", e))?;
        expect_one(result.rows_affected(), "Character", id)
    }

    async fn add_gold(&self, id: CharacterId, amount: u32) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"
            UPDATE characters
            SET data = json_set(data, '$.gold', json_extract(data, '$.gold') + ?)
            WHERE id = ?
            "#,
        )
        .bind(i64::from(amount))
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("character.add_gold", e))?;
        expect_one(result.rows_affected(), "Character", id)
    }
}

// =============================================================================
// Mobs
// =============================================================================

#[async_trait]
impl MobRepo for SqliteStore {
    async fn get(&self, id: MobId) -> Result<Option<Mob>, RepoError> {
        let row = sqlx::query("SELECT data FROM mobs WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("mob.get", e))?;
        row.as_ref().map(decode).transpose()
    }

    async fn get_many(&self, ids: &[MobId]) -> Result<Vec<Mob>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT data FROM mobs WHERE id IN ({}) ORDER BY rowid",
            placeholders(ids.len())
        );
        let mut query = sqlx::query(&sql);
        for id in ids {
            query = query.bind(id.to_string());
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("mob.get_many", e))?;
        decode_all(&rows)
    }

    async fn list_in_room(&self, room_id: &RoomId) -> Result<Vec<Mob>, RepoError> {
        let rows = sqlx::query("SELECT data FROM mobs WHERE room_id = ? ORDER BY rowid")
            .bind(room_id.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("mob.list_in_room", e))?;
        decode_all(&rows)
    }

    async fn save(&self, mob: &Mob) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO mobs (id, room_id, data) VALUES (?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET room_id = excluded.room_id, data = excluded.data
            "#,
        )
        .bind(mob.id.to_string())
        .bind(mob.room_id.as_str())
        .bind(encode(mob)?)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("mob.save", e))?;
        Ok(())
    }

    async fn update_hp(&self, id: MobId, hp: i32) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"
            UPDATE mobs
            SET data = json_set(data, '$.hp', MAX(0, MIN(?, json_extract(data, '$.maxHp'))))
            WHERE id = ?
            "#,
        )
        .bind(hp)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("mob.update_hp", e))?;
        expect_one(result.rows_affected(), "Mob", id)
    }

    async fn delete_many(&self, ids: &[MobId]) -> Result<(), RepoError> {
        if ids.is_empty() {
            return Ok(());
        }
        let sql = format!("DELETE FROM mobs WHERE id IN ({})", placeholders(ids.len()));
        let mut query = sqlx::query(&sql);
        for id in ids {
            query = query.bind(id.to_string());
        }
        query
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("mob.delete_many", e))?;
        Ok(())
    }

    async fn count(&self) -> Result<usize, RepoError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM mobs")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepoError::database("mob.count", e))?;
        let total: i64 = row.get("total");
        Ok(usize::try_from(total).unwrap_or_default())
    }
}

// =============================================================================
// Items
// =============================================================================

fn location_columns(location: &ItemLocation) -> (Option<String>, Option<String>) {
    match location {
        ItemLocation::Inventory(owner) => (Some(owner.to_string()), None),
        ItemLocation::Room(room) => (None, Some(room.as_str().to_string())),
    }
}

#[async_trait]
impl ItemRepo for SqliteStore {
    async fn get(&self, id: ItemId) -> Result<Option<Item>, RepoError> {
        let row = sqlx::query("SELECT data FROM items WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("item.get", e))?;
        row.as_ref().map(decode).transpose()
    }

    async fn list_in_room(&self, room_id: &RoomId) -> Result<Vec<Item>, RepoError> {
        let rows = sqlx::query("SELECT data FROM items WHERE room_id = ? ORDER BY rowid")
            .bind(room_id.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("item.list_in_room", e))?;
        decode_all(&rows)
    }

    async fn list_for_character(&self, character_id: CharacterId) -> Result<Vec<Item>, RepoError> {
        let rows = sqlx::query("SELECT data FROM items WHERE character_id = ? ORDER BY rowid")
            .bind(character_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("item.list_for_character", e))?;
        decode_all(&rows)
    }

    async fn create(&self, item: &Item) -> Result<(), RepoError> {
        let (character_id, room_id) = location_columns(&item.location);
        sqlx::query(
            "INSERT INTO items (id, character_id, room_id, equipped, data) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(item.id.to_string())
        .bind(character_id)
        .bind(room_id)
        .bind(item.equipped)
        .bind(encode(item)?)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepoError::constraint(format!("Item {} already exists", item.id))
            }
            other => RepoError::database("item.create", other),
        })?;
        Ok(())
    }

    async fn move_to_character(
        &self,
        id: ItemId,
        character_id: CharacterId,
    ) -> Result<(), RepoError> {
        let location = encode(&ItemLocation::Inventory(character_id))?;
        let result = sqlx::query(
            r#"
            UPDATE items
            SET character_id = ?, room_id = NULL, data = json_set(data, '$.location', json(?))
            WHERE id = ?
            "#,
        )
        .bind(character_id.to_string())
        .bind(location)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("item.move_to_character", e))?;
        expect_one(result.rows_affected(), "Item", id)
    }

    async fn move_to_room(&self, id: ItemId, room_id: &RoomId) -> Result<(), RepoError> {
        let location = encode(&ItemLocation::Room(room_id.clone()))?;
        let result = sqlx::query(
            r#"
            UPDATE items
            SET character_id = NULL, room_id = ?, equipped = 0,
                data = json_set(data, '$.location', json(?), '$.equipped', json('false'))
            WHERE id = ?
            "#,
        )
        .bind(room_id.as_str())
        .bind(location)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("item.move_to_room", e))?;
        expect_one(result.rows_affected(), "Item", id)
    }

    async fn set_equipped(&self, id: ItemId, equipped: bool) -> Result<(), RepoError> {
        let result = sqlx::query(
            "UPDATE items SET equipped = ?, data = json_set(data, '$.equipped', json(?)) WHERE id = ?",
        )
        .bind(equipped)
        .bind(if equipped { "true" } else { "false" })
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("item.set_equipped", e))?;
        expect_one(result.rows_affected(), "Item", id)
    }
}

// =============================================================================
// Rooms
// =============================================================================

#[async_trait]
impl RoomRepo for SqliteStore {
    async fn get(&self, id: &RoomId) -> Result<Option<Room>, RepoError> {
        let row = sqlx::query("SELECT data FROM rooms WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("room.get", e))?;
        row.as_ref().map(decode).transpose()
    }

    async fn save(&self, room: &Room) -> Result<(), RepoError> {
        sqlx::query(
            "INSERT INTO rooms (id, data) VALUES (?, ?) ON CONFLICT(id) DO UPDATE SET data = excluded.data",
        )
        .bind(room.id.as_str())
        .bind(encode(room)?)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("room.save", e))?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Room>, RepoError> {
        let rows = sqlx::query("SELECT data FROM rooms ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("room.list_all", e))?;
        decode_all(&rows)
    }
}

// =============================================================================
// Spellbook
// =============================================================================

fn known_spell(row: &SqliteRow) -> Result<KnownSpell, RepoError> {
    let character_id: String = row.get("character_id");
    let spell_id: i64 = row.get("spell_id");
    let cooldown_until: Option<String> = row.get("cooldown_until");

    let character_id = uuid::Uuid::parse_str(&character_id)
        .map_err(|e| RepoError::Serialization(e.to_string()))?;
    let spell_id =
        u32::try_from(spell_id).map_err(|e| RepoError::Serialization(e.to_string()))?;
    let cooldown_until = cooldown_until
        .map(|raw| {
            DateTime::parse_from_rfc3339(&raw)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| RepoError::Serialization(e.to_string()))
        })
        .transpose()?;

    Ok(KnownSpell {
        character_id: CharacterId::from_uuid(character_id),
        spell_id: SpellId::new(spell_id),
        cooldown_until,
    })
}

#[async_trait]
impl SpellBookRepo for SqliteStore {
    async fn list_for_character(
        &self,
        character_id: CharacterId,
    ) -> Result<Vec<KnownSpell>, RepoError> {
        let rows = sqlx::query(
            "SELECT character_id, spell_id, cooldown_until FROM known_spells WHERE character_id = ? ORDER BY rowid",
        )
        .bind(character_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("spellbook.list", e))?;
        rows.iter().map(known_spell).collect()
    }

    async fn get(
        &self,
        character_id: CharacterId,
        spell_id: SpellId,
    ) -> Result<Option<KnownSpell>, RepoError> {
        let row = sqlx::query(
            "SELECT character_id, spell_id, cooldown_until FROM known_spells WHERE character_id = ? AND spell_id = ?",
        )
        .bind(character_id.to_string())
        .bind(i64::from(spell_id.get()))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("spellbook.get", e))?;
        row.as_ref().map(known_spell).transpose()
    }

    async fn learn(&self, known: &KnownSpell) -> Result<(), RepoError> {
        sqlx::query(
            "INSERT INTO known_spells (character_id, spell_id, cooldown_until) VALUES (?, ?, ?)",
        )
        .bind(known.character_id.to_string())
        .bind(i64::from(known.spell_id.get()))
        .bind(known.cooldown_until.map(|dt| dt.to_rfc3339()))
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => RepoError::constraint(format!(
                "Character {} already knows spell {}",
                known.character_id, known.spell_id
            )),
            other => RepoError::database("spellbook.learn", other),
        })?;
        Ok(())
    }

    async fn set_cooldown(
        &self,
        character_id: CharacterId,
        spell_id: SpellId,
        cooldown_until: Option<DateTime<Utc>>,
    ) -> Result<(), RepoError> {
        let result = sqlx::query(
            "UPDATE known_spells SET cooldown_until = ? WHERE character_id = ? AND spell_id = ?",
        )
        .bind(cooldown_until.map(|dt| dt.to_rfc3339()))
        .bind(character_id.to_string())
        .bind(i64::from(spell_id.get()))
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("spellbook.set_cooldown", e))?;
        expect_one(
            result.rows_affected(),
            "KnownSpell",
            format!("{character_id}/{spell_id}"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{character, item_in_room, mob, room};
    use chrono::TimeZone;
    use nightfall_domain::CharacterClass;

    async fn temp_store() -> (tempfile::TempDir, SqliteStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nightfall.db");
        let store = SqliteStore::connect(path.to_str().unwrap()).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn character_round_trips_and_targeted_updates_apply() {
        let (_dir, store) = temp_store().await;
        let square = RoomId::new("town-square");
        let mut aria = character("Aria", CharacterClass::Vanguard, square.clone());
        CharacterRepo::save(&store, &aria).await.unwrap();

        aria.gold = 42;
        CharacterRepo::save(&store, &aria).await.unwrap();
        CharacterRepo::update_hp(&store, aria.id, 7).await.unwrap();
        CharacterRepo::update_hp(&store, CharacterId::new(), 7)
            .await
            .unwrap_err();
        store
            .update_room(aria.id, &RoomId::new("the-forge"))
            .await
            .unwrap();

        let stored = CharacterRepo::get(&store, aria.id).await.unwrap().unwrap();
        assert_eq!(stored.hp, 7);
        assert_eq!(stored.gold, 42);
        assert_eq!(stored.room_id, RoomId::new("the-forge"));
        assert!(CharacterRepo::list_in_room(&store, &square, None)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn progress_stats_and_gold_leave_hp_alone() {
        let (_dir, store) = temp_store().await;
        let mut aria = character("Aria", CharacterClass::Vanguard, RoomId::new("the-arena"));
        CharacterRepo::save(&store, &aria).await.unwrap();
        CharacterRepo::update_hp(&store, aria.id, 40).await.unwrap();

        aria.gain_experience(10);
        store.update_progress(aria.id, &aria.progress()).await.unwrap();
        let mut stats = aria.stats;
        stats.wisdom += 1;
        store.update_stats(aria.id, &stats, 1).await.unwrap();
        store.add_gold(aria.id, 7).await.unwrap();

        let stored = CharacterRepo::get(&store, aria.id).await.unwrap().unwrap();
        assert_eq!(stored.hp, 40);
        assert_eq!(stored.level, 2);
        assert_eq!(stored.experience_to_next_level, 20);
        assert_eq!(stored.max_hp, aria.max_hp);
        assert_eq!(stored.stats.wisdom, 9);
        assert_eq!(stored.unspent_stat_points, 1);
        assert_eq!(stored.gold, 17);
        assert!(store.add_gold(CharacterId::new(), 1).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn hp_updates_clamp_to_max() {
        let (_dir, store) = temp_store().await;
        let pup = mob("Gloomfang Pup", RoomId::new("the-arena"));
        MobRepo::save(&store, &pup).await.unwrap();
        MobRepo::update_hp(&store, pup.id, 9_999).await.unwrap();
        let stored = MobRepo::get(&store, pup.id).await.unwrap().unwrap();
        assert_eq!(stored.hp, stored.max_hp);
    }

    #[tokio::test]
    async fn mobs_batch_delete() {
        let (_dir, store) = temp_store().await;
        let arena = RoomId::new("the-arena");
        let a = mob("Gloomfang Pup", arena.clone());
        let b = mob("Gloomfang Pup", arena.clone());
        MobRepo::save(&store, &a).await.unwrap();
        MobRepo::save(&store, &b).await.unwrap();

        store.delete_many(&[a.id, b.id]).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn item_moves_keep_columns_and_json_in_step() {
        let (_dir, store) = temp_store().await;
        let armory = RoomId::new("the-armory");
        let dagger = item_in_room("iron dagger", armory.clone());
        store.create(&dagger).await.unwrap();
        assert!(matches!(
            store.create(&dagger).await.unwrap_err(),
            RepoError::ConstraintViolation(_)
        ));

        let owner = CharacterId::new();
        store.move_to_character(dagger.id, owner).await.unwrap();
        store.set_equipped(dagger.id, true).await.unwrap();
        let carried = ItemRepo::list_for_character(&store, owner).await.unwrap();
        assert_eq!(carried.len(), 1);
        assert!(carried[0].equipped);

        store.move_to_room(dagger.id, &armory).await.unwrap();
        let on_floor = ItemRepo::list_in_room(&store, &armory).await.unwrap();
        assert_eq!(on_floor.len(), 1);
        assert!(!on_floor[0].equipped);
        assert_eq!(on_floor[0].location, ItemLocation::Room(armory));
    }

    #[tokio::test]
    async fn spellbook_cooldowns_persist() {
        let (_dir, store) = temp_store().await;
        let owner = CharacterId::new();
        let known = KnownSpell::new(owner, SpellId::new(3));
        store.learn(&known).await.unwrap();

        let until = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        store
            .set_cooldown(owner, SpellId::new(3), Some(until))
            .await
            .unwrap();

        let stored = SpellBookRepo::get(&store, owner, SpellId::new(3))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.cooldown_until, Some(until));
    }

    #[tokio::test]
    async fn rooms_round_trip() {
        let (_dir, store) = temp_store().await;
        let square = room("town-square", 0, 0, &[("north", "the-forge")]);
        RoomRepo::save(&store, &square).await.unwrap();
        let stored = RoomRepo::get(&store, &square.id).await.unwrap().unwrap();
        assert_eq!(stored, square);
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }
}
