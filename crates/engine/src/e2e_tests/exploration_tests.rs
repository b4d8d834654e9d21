//! Moving around Haven, talking, and handling gear.

use nightfall_domain::{CharacterClass, EquipSlot, ItemAttributes, RoomId};
use serde_json::json;

use super::{last_update, texts, WorldContext};
use crate::test_fixtures::{gear, item_in_room};

#[tokio::test]
async fn look_describes_the_square_and_its_neighbourhood() {
    let world = WorldContext::setup().await;
    let aria = world
        .create_character("Aria", CharacterClass::Dawnkeeper, "town-square")
        .await;

    let events = world.send(aria.id, "look", json!(null)).await;

    let update = last_update(&events);
    assert_eq!(update.message, "You look around.");
    assert_eq!(update.room.id, "town-square");
    assert_eq!(update.room.exits.get("south").map(String::as_str), Some("south-gate"));
    assert!(update.zone_rooms.iter().any(|r| r.id == "the-forge"));
    assert!(update.players.is_empty());
}

#[tokio::test]
async fn walls_stop_movement() {
    let world = WorldContext::setup().await;
    let aria = world
        .create_character("Aria", CharacterClass::Dawnkeeper, "the-forge")
        .await;

    let events = world.say(aria.id, "move", "north").await;

    assert_eq!(texts(&events), vec!["You can't go that way."]);
    assert_eq!(world.reload(aria.id).await.room_id.as_str(), "the-forge");
}

#[tokio::test]
async fn speech_reaches_the_room_but_not_the_speaker_twice() {
    let world = WorldContext::setup().await;
    let aria = world
        .create_character("Aria", CharacterClass::Dawnkeeper, "the-inn")
        .await;

    let events = world.say(aria.id, "say", "well met").await;

    assert_eq!(texts(&events), vec!["You say, 'well met'", "Aria says, 'well met'"]);
}

#[tokio::test]
async fn armory_gear_can_be_taken_and_worn() {
    let world = WorldContext::setup().await;
    let aria = world
        .create_character("Aria", CharacterClass::Vanguard, "the-armory")
        .await;

    let taken = world.say(aria.id, "get", "iron dagger").await;
    assert!(texts(&taken).contains(&"You take the iron dagger."));
    assert_eq!(last_update(&taken).room_items.len(), 1);

    let worn = world.say(aria.id, "equip", "iron dagger").await;
    let update = last_update(&worn);
    assert_eq!(update.message, "You equip the iron dagger.");
    assert_eq!(update.player.effective_strength, 16);
    assert!(update.inventory.iter().any(|i| i.name == "iron dagger" && i.equipped));

    let again = world.say(aria.id, "equip", "iron dagger").await;
    assert_eq!(texts(&again), vec!["You don't have that in your backpack."]);

    let removed = world.say(aria.id, "unequip", "iron dagger").await;
    assert_eq!(last_update(&removed).player.effective_strength, 13);
}

#[tokio::test]
async fn inventory_lists_what_was_picked_up() {
    let world = WorldContext::setup().await;
    let aria = world
        .create_character("Aria", CharacterClass::Vanguard, "the-armory")
        .await;
    assert_eq!(
        texts(&world.send(aria.id, "inventory", json!(null)).await),
        vec!["You are not carrying anything."]
    );

    world.say(aria.id, "get", "leather vest").await;

    assert_eq!(
        texts(&world.send(aria.id, "i", json!(null)).await),
        vec!["You are carrying:\n  - leather vest"]
    );
}

#[tokio::test]
async fn unknown_verbs_get_a_polite_refusal() {
    let world = WorldContext::setup().await;
    let aria = world
        .create_character("Aria", CharacterClass::Vanguard, "town-square")
        .await;

    let events = world.send(aria.id, "dance", json!(null)).await;

    assert_eq!(texts(&events), vec!["Unknown command."]);
}

#[tokio::test]
async fn a_second_weapon_waits_for_the_hand_to_be_free() {
    let world = WorldContext::setup().await;
    let aria = world
        .create_character("Aria", CharacterClass::Vanguard, "the-armory")
        .await;
    world.say(aria.id, "get", "iron dagger").await;
    world.say(aria.id, "equip", "iron dagger").await;
    let club = gear("oak club", EquipSlot::WeaponMain, ItemAttributes::default(), &aria);
    world.repos.items.create(&club).await.unwrap();

    let refused = world.say(aria.id, "equip", "oak club").await;
    assert_eq!(
        texts(&refused),
        vec!["You already have a iron dagger equipped in that slot."]
    );

    world.say(aria.id, "unequip", "iron dagger").await;
    let swapped = world.say(aria.id, "equip", "oak club").await;
    assert_eq!(last_update(&swapped).message, "You equip the oak club.");
}

#[tokio::test]
async fn trinkets_without_a_slot_cannot_be_worn() {
    let world = WorldContext::setup().await;
    let aria = world
        .create_character("Aria", CharacterClass::Vanguard, "town-square")
        .await;
    let tooth = gear("gloomfang tooth", EquipSlot::None, ItemAttributes::default(), &aria);
    world.repos.items.create(&tooth).await.unwrap();

    let events = world.say(aria.id, "equip", "gloomfang tooth").await;

    assert_eq!(texts(&events), vec!["You can't equip that."]);
    let carried = world.repos.items.list_for_character(aria.id).await.unwrap();
    assert!(!carried[0].equipped);
}

#[tokio::test]
async fn dropped_gear_lands_on_the_floor() {
    let world = WorldContext::setup().await;
    let aria = world
        .create_character("Aria", CharacterClass::Vanguard, "the-armory")
        .await;
    world.say(aria.id, "get", "leather vest").await;

    let events = world.say(aria.id, "drop", "leather vest").await;

    let lines = texts(&events);
    assert!(lines.contains(&"You drop the leather vest."));
    assert!(lines.contains(&"Aria drops a leather vest."));
    let update = last_update(&events);
    assert!(update.inventory.is_empty());
    assert!(update.room_items.iter().any(|i| i.name == "leather vest"));
    let floor = world
        .repos
        .items
        .list_in_room(&RoomId::new("the-armory"))
        .await
        .unwrap();
    assert!(floor.iter().any(|i| i.name == "leather vest"));

    let again = world.say(aria.id, "drop", "leather vest").await;
    assert_eq!(texts(&again), vec!["You aren't carrying that."]);
}

#[tokio::test]
async fn examine_prefers_the_backpack_over_the_floor() {
    let world = WorldContext::setup().await;
    let aria = world
        .create_character("Aria", CharacterClass::Vanguard, "the-inn")
        .await;
    let mut floor_map = item_in_room("old map", RoomId::new("the-inn"));
    floor_map.description = "A map pinned to the bar.".into();
    world.repos.items.create(&floor_map).await.unwrap();

    let on_floor = world.say(aria.id, "examine", "old map").await;
    assert_eq!(texts(&on_floor), vec!["A map pinned to the bar."]);

    let mut own_map = gear("old map", EquipSlot::None, ItemAttributes::default(), &aria);
    own_map.description = "Your own map, creased from travel.".into();
    world.repos.items.create(&own_map).await.unwrap();

    let carried = world.say(aria.id, "examine", "old map").await;
    assert_eq!(texts(&carried), vec!["Your own map, creased from travel."]);

    let nothing = world.send(aria.id, "examine", json!(null)).await;
    assert_eq!(texts(&nothing), vec!["Examine what?"]);
    let missing = world.say(aria.id, "examine", "crown").await;
    assert_eq!(texts(&missing), vec!["You don't see that here."]);
}

#[tokio::test]
async fn stat_points_are_spent_and_reported() {
    let world = WorldContext::setup().await;
    let mut aria = world
        .create_character("Aria", CharacterClass::Vanguard, "the-inn")
        .await;
    aria.unspent_stat_points = 2;
    world.repos.characters.save(&aria).await.unwrap();

    let events = world
        .send(aria.id, "assignStats", json!({ "strength": 1 }))
        .await;
    let update = last_update(&events);
    assert_eq!(update.message, "You have grown stronger!");
    assert_eq!(update.player.strength, 14);
    assert_eq!(update.player.unspent_stat_points, 1);
    let stored = world.reload(aria.id).await;
    assert_eq!(stored.stats.strength, 14);
    assert_eq!(stored.unspent_stat_points, 1);

    let refusals = [
        (json!({}), "No points assigned."),
        (json!({ "wisdom": 2 }), "You don't have enough stat points."),
        (
            json!({ "strength": u32::MAX, "dexterity": 1 }),
            "You don't have enough stat points.",
        ),
        (json!({ "resolve": 1 }), "Invalid stat assignment format."),
        (json!("strength"), "Invalid stat assignment format."),
    ];
    for (payload, reply) in refusals {
        let events = world.send(aria.id, "assignStats", payload).await;
        assert_eq!(texts(&events), vec![reply]);
    }
    assert_eq!(world.reload(aria.id).await.unspent_stat_points, 1);
}
