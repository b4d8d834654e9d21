//! The Haven starting zone.

use std::collections::BTreeMap;

use nightfall_domain::{
    Hostility, Item, ItemLocation, LootDrop, LootEntry, LootGroup, LootTable, Mob, MobId,
    Quantity, Room, RoomId,
};

use super::items::{self, DAGGER, GLOOMFANG_PELT, GLOOMFANG_TOOTH, IRON_DAGGER, LEATHER_VEST};

struct RoomSpec {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    exits: &'static [(&'static str, &'static str)],
    at: (i32, i32, i32),
}

const ROOMS: &[RoomSpec] = &[
    RoomSpec {
        id: "town-square",
        name: "Haven Town Square",
        description: "The center of the small outpost of Haven. Cobblestone paths lead in all directions. A large, dry fountain sits in the middle, a testament to better times.",
        exits: &[("north", "the-forge"), ("east", "the-inn"), ("south", "south-gate"), ("west", "the-armory")],
        at: (0, 0, 0),
    },
    RoomSpec {
        id: "the-forge",
        name: "Barnaby's Forge",
        description: "The air is thick with the smell of coal and hot metal. An anvil rings rhythmically in the corner where a large man is hard at work.",
        exits: &[("south", "town-square")],
        at: (0, 1, 0),
    },
    RoomSpec {
        id: "the-armory",
        name: "The Armory",
        description: "Racks of basic weapons and armor line the walls, available for new adventurers. A notice board is posted near the entrance.",
        exits: &[("east", "town-square")],
        at: (-1, 0, 0),
    },
    RoomSpec {
        id: "the-inn",
        name: "The Weary Wanderer Inn",
        description: "The common room of the inn is filled with the low murmur of conversation. A bar stretches along the far wall, and a staircase leads up.",
        exits: &[("west", "town-square"), ("up", "inn-room"), ("east", "arcane-sanctum")],
        at: (1, 0, 0),
    },
    RoomSpec {
        id: "inn-room",
        name: "Inn Guest Room",
        description: "A simple, clean room with a bed and a small table. It feels safe here. You can rest and recover your strength.",
        exits: &[("down", "the-inn")],
        at: (1, 0, 1),
    },
    RoomSpec {
        id: "arcane-sanctum",
        name: "Arcane Sanctum",
        description: "This quiet study is filled with bookshelves and smells of old parchment. A wise-looking scholar sits at a desk, ready to impart knowledge.",
        exits: &[("west", "the-inn")],
        at: (2, 0, 0),
    },
    RoomSpec {
        id: "south-gate",
        name: "South Gate",
        description: "You stand at the southern gate of Haven. The town square is to the north, and a dusty path leads south towards a crude arena.",
        exits: &[("north", "town-square"), ("south", "the-arena")],
        at: (0, -1, 0),
    },
    RoomSpec {
        id: "the-arena",
        name: "Training Arena",
        description: "This dusty, open-air arena is where new adventurers test their might against captive beasts. The path back to town is north.",
        exits: &[("north", "south-gate"), ("south", "cave-entrance")],
        at: (0, -2, 0),
    },
    RoomSpec {
        id: "cave-entrance",
        name: "A Dark Cave Entrance",
        description: "The road ends at the mouth of a dark cave. A chilling wind whispers from within, promising danger and treasure.",
        exits: &[("north", "the-arena")],
        at: (0, -3, 0),
    },
];

pub fn haven_rooms() -> Vec<Room> {
    ROOMS
        .iter()
        .map(|spec| Room {
            id: RoomId::new(spec.id),
            name: spec.name.to_string(),
            description: spec.description.to_string(),
            exits: spec
                .exits
                .iter()
                .map(|(direction, target)| (direction.to_string(), RoomId::new(*target)))
                .collect::<BTreeMap<_, _>>(),
            x: spec.at.0,
            y: spec.at.1,
            z: spec.at.2,
        })
        .collect()
}

struct MobSpec {
    room: &'static str,
    name: &'static str,
    description: &'static str,
    keywords: &'static [&'static str],
    hostility: Hostility,
    level: u32,
    hp: i32,
    strength: i32,
    defense: i32,
    experience_award: u32,
    can_drop_gold: bool,
}

impl MobSpec {
    fn spawn(&self, loot_table: LootTable) -> Mob {
        Mob {
            id: MobId::new(),
            name: self.name.to_string(),
            description: self.description.to_string(),
            keywords: self.keywords.iter().map(|k| k.to_string()).collect(),
            hostility: self.hostility,
            level: self.level,
            hp: self.hp,
            max_hp: self.hp,
            strength: self.strength,
            defense: self.defense,
            experience_award: self.experience_award,
            can_drop_gold: self.can_drop_gold,
            loot_table,
            room_id: RoomId::new(self.room),
        }
    }
}

const BARNABY: MobSpec = MobSpec {
    room: "the-forge",
    name: "Barnaby",
    description: "The town blacksmith. He gives you a soot-stained grin.",
    keywords: &["barnaby", "blacksmith"],
    hostility: Hostility::Friendly,
    level: 10,
    hp: 100,
    strength: 10,
    defense: 10,
    experience_award: 0,
    can_drop_gold: false,
};

const BARKEEP: MobSpec = MobSpec {
    room: "the-inn",
    name: "Barkeep",
    description: "A cheerful looking fellow polishing a mug.",
    keywords: &["barkeep", "bartender"],
    hostility: Hostility::Friendly,
    level: 5,
    hp: 50,
    strength: 5,
    defense: 5,
    experience_award: 0,
    can_drop_gold: true,
};

const ELARA: MobSpec = MobSpec {
    room: "arcane-sanctum",
    name: "Elara",
    description: "A serene scholar with eyes that seem to hold ancient secrets.",
    keywords: &["elara", "scholar"],
    hostility: Hostility::Friendly,
    level: 15,
    hp: 100,
    strength: 5,
    defense: 5,
    experience_award: 0,
    can_drop_gold: false,
};

const GLOOMFANG_PUP: MobSpec = MobSpec {
    room: "the-arena",
    name: "Gloomfang Pup",
    description: "A young, but aggressive, canine beast...",
    keywords: &["gloomfang", "pup", "gloomfang pup"],
    hostility: Hostility::Hostile,
    level: 2,
    hp: 15,
    strength: 4,
    defense: 1,
    experience_award: 5,
    can_drop_gold: false,
};

fn pup_loot() -> LootTable {
    let template = |template_id, weight| LootEntry {
        weight,
        drop: LootDrop::Template {
            template_id,
            quantity: Quantity::default(),
        },
    };
    LootTable::new(vec![
        LootGroup {
            group_name: "trophies".into(),
            drop_chance: 1.0,
            guaranteed: true,
            max_drops: 1,
            items: vec![template(GLOOMFANG_PELT, 70), template(GLOOMFANG_TOOTH, 30)],
        },
        LootGroup {
            group_name: "gear".into(),
            drop_chance: 0.1,
            guaranteed: false,
            max_drops: 1,
            items: vec![LootEntry {
                weight: 1,
                drop: LootDrop::Generate {
                    base_item_id: DAGGER,
                    item_level: 2,
                },
            }],
        },
    ])
}

/// Fresh mob instances with new ids on every call.
pub fn haven_mobs() -> Vec<Mob> {
    vec![
        BARNABY.spawn(LootTable::default()),
        BARKEEP.spawn(LootTable::default()),
        ELARA.spawn(LootTable::default()),
        GLOOMFANG_PUP.spawn(pup_loot()),
    ]
}

/// Starting gear on the armory floor.
pub fn haven_room_items() -> Vec<Item> {
    let armory = RoomId::new("the-armory");
    items::item_templates()
        .iter()
        .filter(|t| t.id == LEATHER_VEST || t.id == IRON_DAGGER)
        .map(|t| Item::from_template(t, ItemLocation::Room(armory.clone())))
        .collect()
}
