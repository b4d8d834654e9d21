//! Effective stat aggregation.
//!
//! Pure transform: base stats plus equipped gear and rolled affixes. Mobs
//! carry no equipment and pass through unchanged.

use nightfall_domain::{Character, EffectiveStats, Item, Mob};

pub struct AttributeService;

impl AttributeService {
    /// Items not owned by `character` or not equipped contribute nothing.
    pub fn for_character(character: &Character, inventory: &[Item]) -> EffectiveStats {
        let mut stats = EffectiveStats {
            name: character.name.clone(),
            hp: character.hp,
            max_hp: character.max_hp,
            attributes: character.stats,
            defense: character.defense,
            damage: 0,
            armor: 0,
            magic_resist: 0,
        };

        for item in inventory
            .iter()
            .filter(|item| item.equipped && item.owner() == Some(character.id))
        {
            stats.damage += item.attributes.damage;
            stats.armor += item.attributes.armor;
            stats.magic_resist += item.attributes.magic_resist;
            for affix in &item.affixes {
                for (kind, value) in &affix.stats {
                    stats.apply(*kind, *value);
                }
            }
        }
        stats
    }

    pub fn for_mob(mob: &Mob) -> EffectiveStats {
        mob.effective_stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{character, gear, mob};
    use nightfall_domain::{
        AffixId, AffixKind, CharacterClass, EquipSlot, ItemAttributes, RolledAffix, RoomId,
        StatKind,
    };
    use std::collections::BTreeMap;

    fn aria() -> Character {
        character("Aria", CharacterClass::Vanguard, RoomId::new("the-armory"))
    }

    #[test]
    fn unequipped_gear_is_ignored() {
        let aria = aria();
        let dagger = gear("iron dagger", EquipSlot::WeaponMain, ItemAttributes::damage(3), &aria);
        let stats = AttributeService::for_character(&aria, &[dagger]);
        assert_eq!(stats.effective_strength(), 13);
        assert_eq!(stats.effective_defense(), 3);
    }

    #[test]
    fn equipped_gear_and_affixes_add_up() {
        let aria = aria();
        let mut dagger = gear("Sharp Dagger", EquipSlot::WeaponMain, ItemAttributes::damage(2), &aria);
        dagger.equipped = true;
        dagger.affixes.push(RolledAffix {
            affix_id: AffixId::new(9),
            name: "Sharp".into(),
            kind: AffixKind::Prefix,
            stats: BTreeMap::from([(StatKind::Damage, 2), (StatKind::Wisdom, 1)]),
        });
        let mut vest = gear("leather vest", EquipSlot::Chest, ItemAttributes::armor(3), &aria);
        vest.equipped = true;

        let stats = AttributeService::for_character(&aria, &[dagger, vest]);
        assert_eq!(stats.effective_strength(), 13 + 2 + 2);
        assert_eq!(stats.effective_defense(), 3 + 3);
        assert_eq!(stats.attributes.wisdom, aria.stats.wisdom + 1);
    }

    #[test]
    fn equip_then_unequip_restores_stats() {
        let aria = aria();
        let before = AttributeService::for_character(&aria, &[]);

        let mut vest = gear("leather vest", EquipSlot::Chest, ItemAttributes::armor(3), &aria);
        vest.equipped = true;
        let equipped = AttributeService::for_character(&aria, std::slice::from_ref(&vest));
        assert_ne!(equipped, before);

        vest.equipped = false;
        assert_eq!(AttributeService::for_character(&aria, &[vest]), before);
    }

    #[test]
    fn someone_elses_item_never_counts() {
        let aria = aria();
        let other = character("Bram", CharacterClass::Vanguard, RoomId::new("the-armory"));
        let mut sword = gear("rusty sword", EquipSlot::WeaponMain, ItemAttributes::damage(2), &other);
        sword.equipped = true;
        assert_eq!(AttributeService::for_character(&aria, &[sword]).damage, 0);
    }

    #[test]
    fn mobs_pass_through() {
        let pup = mob("Gloomfang Pup", RoomId::new("the-arena"));
        let stats = AttributeService::for_mob(&pup);
        assert_eq!(stats.effective_strength(), 4);
        assert_eq!(stats.effective_defense(), 1);
        assert_eq!(stats.hp, 15);
    }
}
