//! Engine configuration read from `NIGHTFALL_*` environment variables.

use std::str::FromStr;
use std::time::Duration;

use nightfall_domain::RoomId;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_COMBAT_TICK_MS: u64 = 3000;
pub const DEFAULT_RESPAWN_ROOM: &str = "town-square";
pub const DEFAULT_DEATH_PENALTY_PERCENT: u32 = 10;
pub const DEFAULT_ZONE_RADIUS: i32 = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// SQLite URL or path. `None` keeps everything in memory.
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub combat_tick: Duration,
    pub respawn_room: RoomId,
    pub death_penalty_percent: u32,
    /// Seed rooms and mobs when the store has none.
    pub seed_world: bool,
    pub zone_radius: i32,
    /// Comma-separated origins or `*`. `None` disables CORS.
    pub cors_allowed_origins: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            combat_tick: Duration::from_millis(DEFAULT_COMBAT_TICK_MS),
            respawn_room: RoomId::new(DEFAULT_RESPAWN_ROOM),
            death_penalty_percent: DEFAULT_DEATH_PENALTY_PERCENT,
            seed_world: true,
            zone_radius: DEFAULT_ZONE_RADIUS,
            cors_allowed_origins: None,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unparseable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            database_url: non_empty("NIGHTFALL_DATABASE_URL"),
            host: non_empty("NIGHTFALL_HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "NIGHTFALL_PORT", defaults.port),
            combat_tick: Duration::from_millis(
                parse_or(&lookup, "NIGHTFALL_COMBAT_TICK_MS", DEFAULT_COMBAT_TICK_MS).max(1),
            ),
            respawn_room: non_empty("NIGHTFALL_RESPAWN_ROOM")
                .map(RoomId::new)
                .unwrap_or(defaults.respawn_room),
            death_penalty_percent: parse_or(
                &lookup,
                "NIGHTFALL_DEATH_PENALTY_PERCENT",
                defaults.death_penalty_percent,
            )
            .min(100),
            seed_world: parse_or(&lookup, "NIGHTFALL_SEED_WORLD", defaults.seed_world),
            zone_radius: parse_or(&lookup, "NIGHTFALL_ZONE_RADIUS", defaults.zone_radius).max(0),
            cors_allowed_origins: non_empty("NIGHTFALL_CORS_ALLOWED_ORIGINS"),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Debug,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, default = ?default, "Unparseable config value, using default");
            default
        }),
    }
}
