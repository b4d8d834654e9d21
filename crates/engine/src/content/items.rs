use std::collections::BTreeMap;

use nightfall_domain::{
    Affix, AffixId, AffixKind, BaseItem, BaseItemId, EquipSlot, ItemAttributes, ItemTemplate,
    ItemTemplateId, StatKind, StatRange,
};

pub const RUSTY_SWORD: ItemTemplateId = ItemTemplateId::new(101);
pub const GLOOMFANG_PELT: ItemTemplateId = ItemTemplateId::new(102);
pub const GLOOMFANG_TOOTH: ItemTemplateId = ItemTemplateId::new(103);
pub const LEATHER_VEST: ItemTemplateId = ItemTemplateId::new(201);
pub const IRON_DAGGER: ItemTemplateId = ItemTemplateId::new(202);

pub const DAGGER: BaseItemId = BaseItemId::new(1);

fn template(
    id: ItemTemplateId,
    name: &str,
    description: &str,
    weight: f32,
    slot: EquipSlot,
    attributes: ItemAttributes,
) -> ItemTemplate {
    ItemTemplate {
        id,
        name: name.into(),
        description: description.into(),
        weight,
        slot,
        attributes,
    }
}

pub fn item_templates() -> Vec<ItemTemplate> {
    vec![
        template(
            RUSTY_SWORD,
            "rusty sword",
            "A simple sword, pitted with rust. It feels heavier than it looks.",
            5.0,
            EquipSlot::WeaponMain,
            ItemAttributes::damage(2),
        ),
        template(
            GLOOMFANG_PELT,
            "gloomfang pelt",
            "The rough, dark pelt of a gloomfang.",
            1.0,
            EquipSlot::None,
            ItemAttributes::default(),
        ),
        template(
            GLOOMFANG_TOOTH,
            "gloomfang tooth",
            "A sharp, wicked-looking tooth.",
            0.2,
            EquipSlot::None,
            ItemAttributes::default(),
        ),
        template(
            LEATHER_VEST,
            "leather vest",
            "A sturdy vest made of boiled leather.",
            8.0,
            EquipSlot::Chest,
            ItemAttributes::armor(3),
        ),
        template(
            IRON_DAGGER,
            "iron dagger",
            "A simple but effective iron dagger.",
            1.5,
            EquipSlot::WeaponMain,
            ItemAttributes::damage(3),
        ),
    ]
}

pub fn base_items() -> Vec<BaseItem> {
    let base = |id: u32, name: &str, slot: EquipSlot, attributes: ItemAttributes| BaseItem {
        id: BaseItemId::new(id),
        name: name.into(),
        slot,
        attributes,
    };
    vec![
        base(1, "Dagger", EquipSlot::WeaponMain, ItemAttributes::damage(2)),
        base(2, "Sword", EquipSlot::WeaponMain, ItemAttributes::damage(4)),
        base(3, "Cloth Helm", EquipSlot::Head, ItemAttributes::armor(1)),
        base(4, "Leather Cap", EquipSlot::Head, ItemAttributes::armor(2)),
    ]
}

fn affix(id: u32, name: &str, kind: AffixKind, required_level: u32, stat: StatKind, min: i32, max: i32) -> Affix {
    Affix {
        id: AffixId::new(id),
        name: name.into(),
        kind,
        required_level,
        stats: BTreeMap::from([(stat, StatRange { min, max })]),
    }
}

/// Prefixes first, then suffixes, each ordered by required level.
pub fn affixes() -> Vec<Affix> {
    use AffixKind::{Prefix, Suffix};
    vec![
        affix(1, "Vicious", Prefix, 1, StatKind::Damage, 1, 2),
        affix(2, "Bashing", Prefix, 3, StatKind::Strength, 1, 2),
        affix(3, "Piercing", Prefix, 5, StatKind::Damage, 3, 5),
        affix(101, "of Resilience", Suffix, 1, StatKind::Constitution, 1, 2),
        affix(102, "of Evasion", Suffix, 3, StatKind::Dexterity, 1, 2),
        affix(103, "of Guarding", Suffix, 8, StatKind::Armor, 2, 4),
    ]
}
