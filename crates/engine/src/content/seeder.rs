use std::sync::Arc;

use crate::infrastructure::ports::{ItemRepo, MobRepo, RepoError, RoomRepo};

use super::haven::{haven_mobs, haven_room_items, haven_rooms};

/// Populates an empty store with the Haven zone.
pub struct WorldSeeder {
    rooms: Arc<dyn RoomRepo>,
    mobs: Arc<dyn MobRepo>,
    items: Arc<dyn ItemRepo>,
}

impl WorldSeeder {
    pub fn new(rooms: Arc<dyn RoomRepo>, mobs: Arc<dyn MobRepo>, items: Arc<dyn ItemRepo>) -> Self {
        Self { rooms, mobs, items }
    }

    /// Returns `false` without writing when any room already exists.
    pub async fn seed_if_empty(&self) -> Result<bool, RepoError> {
        if !self.rooms.list_all().await?.is_empty() {
            tracing::debug!("World already seeded");
            return Ok(false);
        }

        let rooms = haven_rooms();
        for room in &rooms {
            self.rooms.save(room).await?;
        }
        let mobs = haven_mobs();
        for mob in &mobs {
            self.mobs.save(mob).await?;
        }
        let items = haven_room_items();
        for item in &items {
            self.items.create(item).await?;
        }

        tracing::info!(
            rooms = rooms.len(),
            mobs = mobs.len(),
            items = items.len(),
            "World seeded"
        );
        Ok(true)
    }
}
