//! Nightfall Protocol - wire types exchanged with the transport layer
//!
//! - Inbound: [`CommandEnvelope`] `{ action, payload }`
//! - Outbound: [`ServerEvent`] `{ target, type, payload }`
//!
//! # Design Principles
//!
//! 1. **No business logic** - Pure data types and serialization
//! 2. **No domain IDs** - use raw `uuid::Uuid` in DTOs

pub mod messages;
pub mod snapshot;

pub use messages::{CommandEnvelope, EventBody, EventTarget, MessagePayload, ServerEvent};
pub use snapshot::{AffixData, GameUpdate, ItemData, MobData, PlayerData, RoomData};
