//! Procedural item synthesis: rarity, affix count, affix rolls.

use std::sync::Arc;

use nightfall_domain::{
    Affix, AffixKind, BaseItemId, Item, ItemId, ItemLocation, ItemOrigin, Rarity,
};

use super::LootError;
use crate::infrastructure::ports::{ContentRepo, RandomPort};

pub struct ItemGenerator {
    content: Arc<dyn ContentRepo>,
    random: Arc<dyn RandomPort>,
}

impl ItemGenerator {
    pub fn new(content: Arc<dyn ContentRepo>, random: Arc<dyn RandomPort>) -> Self {
        Self { content, random }
    }

    pub fn generate(
        &self,
        base_item_id: BaseItemId,
        item_level: u32,
        location: ItemLocation,
    ) -> Result<Item, LootError> {
        let base = self
            .content
            .base_item(base_item_id)
            .ok_or(LootError::UnknownBaseItem(base_item_id))?;

        let rarity = Rarity::from_roll(self.random.gen_f64());
        let (min_affixes, max_affixes) = rarity.affix_count_range();
        let count = self.random.gen_range(min_affixes as i32, max_affixes as i32).max(0) as usize;

        let eligible: Vec<Affix> = self
            .content
            .affixes()
            .into_iter()
            .filter(|affix| affix.required_level <= item_level)
            .collect();
        let selected = self.select_affixes(eligible, count);

        let affixes: Vec<_> = selected
            .iter()
            .map(|affix| affix.roll(|lo, hi| self.random.gen_range(lo, hi)))
            .collect();

        let prefix = selected.iter().find(|a| a.kind == AffixKind::Prefix);
        let suffix = selected.iter().find(|a| a.kind == AffixKind::Suffix);
        let mut name = base.name.clone();
        if let Some(prefix) = prefix {
            name = format!("{} {}", prefix.name, name);
        }
        if let Some(suffix) = suffix {
            name = format!("{} {}", name, suffix.name);
        }

        Ok(Item {
            id: ItemId::new(),
            name,
            description: format!("A magically enhanced {}.", base.name),
            slot: base.slot,
            attributes: base.attributes,
            rarity: Some(rarity),
            affixes,
            origin: ItemOrigin::Generated {
                base_item_id,
                item_level,
            },
            location,
            equipped: false,
        })
    }

    /// One prefix if any, one suffix if two or more, then distinct random picks.
    fn select_affixes(&self, mut pool: Vec<Affix>, count: usize) -> Vec<Affix> {
        let mut selected = Vec::with_capacity(count);
        if count > 0 {
            if let Some(prefix) = self.take_random(&mut pool, AffixKind::Prefix) {
                selected.push(prefix);
            }
        }
        if count > 1 {
            if let Some(suffix) = self.take_random(&mut pool, AffixKind::Suffix) {
                selected.push(suffix);
            }
        }
        while selected.len() < count && !pool.is_empty() {
            let index = self.random.gen_range(0, pool.len() as i32 - 1).max(0) as usize;
            selected.push(pool.remove(index.min(pool.len() - 1)));
        }
        selected
    }

    fn take_random(&self, pool: &mut Vec<Affix>, kind: AffixKind) -> Option<Affix> {
        let candidates: Vec<usize> = pool
            .iter()
            .enumerate()
            .filter(|(_, affix)| affix.kind == kind)
            .map(|(index, _)| index)
            .collect();
        if candidates.is_empty() {
            return None;
        }
        let pick = self.random.gen_range(0, candidates.len() as i32 - 1).max(0) as usize;
        let index = candidates[pick.min(candidates.len() - 1)];
        Some(pool.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::StaticContent;
    use crate::infrastructure::clock::FixedRandom;
    use nightfall_domain::{RoomId, StatKind};

    fn generator(random: FixedRandom) -> ItemGenerator {
        ItemGenerator::new(Arc::new(StaticContent::haven()), Arc::new(random))
    }

    #[test]
    fn common_roll_yields_plain_base_item() {
        let item = generator(FixedRandom::low())
            .generate(BaseItemId::new(1), 2, ItemLocation::Room(RoomId::new("the-arena")))
            .unwrap();
        assert_eq!(item.rarity, Some(Rarity::Common));
        assert!(item.affixes.is_empty());
        assert_eq!(item.name, "Dagger");
        assert_eq!(item.description, "A magically enhanced Dagger.");
        assert_eq!(item.attributes.damage, 2);
    }

    #[test]
    fn rare_roll_takes_a_prefix_and_a_suffix() {
        let item = generator(FixedRandom {
            roll: i32::MIN,
            chance: 0.005,
        })
        .generate(BaseItemId::new(1), 2, ItemLocation::Room(RoomId::new("the-arena")))
        .unwrap();

        assert_eq!(item.rarity, Some(Rarity::Rare));
        assert_eq!(item.affixes.len(), 2);
        assert_eq!(item.name, "Vicious Dagger of Resilience");
        assert_eq!(item.affixes[0].stats.get(&StatKind::Damage), Some(&1));
        assert_eq!(item.affixes[1].stats.get(&StatKind::Constitution), Some(&1));
    }

    #[test]
    fn affixes_above_item_level_are_never_chosen() {
        let item = generator(FixedRandom {
            roll: i32::MAX,
            chance: 0.005,
        })
        .generate(BaseItemId::new(2), 1, ItemLocation::Room(RoomId::new("the-arena")))
        .unwrap();

        let content = StaticContent::haven();
        for rolled in &item.affixes {
            let affix = content
                .affixes()
                .into_iter()
                .find(|a| a.id == rolled.affix_id)
                .unwrap();
            assert!(affix.required_level <= 1);
        }
        let mut ids: Vec<_> = item.affixes.iter().map(|a| a.affix_id).collect();
        ids.dedup();
        assert_eq!(ids.len(), item.affixes.len());
    }

    #[test]
    fn unknown_base_item_is_an_error() {
        let err = generator(FixedRandom::low())
            .generate(BaseItemId::new(999), 1, ItemLocation::Room(RoomId::new("x")))
            .unwrap_err();
        assert!(matches!(err, LootError::UnknownBaseItem(_)));
    }
}
