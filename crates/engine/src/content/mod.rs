//! Read-only reference data: spells, status effects, item templates, base
//! item types and affixes, plus the Haven zone the world is seeded with.

mod haven;
mod items;
mod seeder;
mod spells;

pub use haven::{haven_mobs, haven_room_items, haven_rooms};
pub use seeder::WorldSeeder;

use nightfall_domain::{
    Affix, BaseItem, BaseItemId, ItemTemplate, ItemTemplateId, Spell, SpellId, StatusEffect,
    StatusEffectId,
};

use crate::infrastructure::ports::ContentRepo;

/// Content catalog held in memory for the life of the process.
#[derive(Debug, Clone, Default)]
pub struct StaticContent {
    spells: Vec<Spell>,
    status_effects: Vec<StatusEffect>,
    item_templates: Vec<ItemTemplate>,
    base_items: Vec<BaseItem>,
    affixes: Vec<Affix>,
}

impl StaticContent {
    pub fn new(
        spells: Vec<Spell>,
        status_effects: Vec<StatusEffect>,
        item_templates: Vec<ItemTemplate>,
        base_items: Vec<BaseItem>,
        affixes: Vec<Affix>,
    ) -> Self {
        Self {
            spells,
            status_effects,
            item_templates,
            base_items,
            affixes,
        }
    }

    /// The shipped catalog.
    pub fn haven() -> Self {
        Self::new(
            spells::all_spells(),
            spells::all_status_effects(),
            items::item_templates(),
            items::base_items(),
            items::affixes(),
        )
    }
}

impl ContentRepo for StaticContent {
    fn spell(&self, id: SpellId) -> Option<Spell> {
        self.spells.iter().find(|s| s.id == id).cloned()
    }

    fn spell_by_name(&self, name: &str) -> Option<Spell> {
        let name = name.trim();
        self.spells
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .cloned()
    }

    fn spells(&self) -> Vec<Spell> {
        self.spells.clone()
    }

    fn status_effect(&self, id: StatusEffectId) -> Option<StatusEffect> {
        self.status_effects.iter().find(|s| s.id == id).cloned()
    }

    fn item_template(&self, id: ItemTemplateId) -> Option<ItemTemplate> {
        self.item_templates.iter().find(|t| t.id == id).cloned()
    }

    fn base_item(&self, id: BaseItemId) -> Option<BaseItem> {
        self.base_items.iter().find(|b| b.id == id).cloned()
    }

    fn affixes(&self) -> Vec<Affix> {
        self.affixes.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nightfall_domain::SpellEffect;

    #[test]
    fn spell_lookup_ignores_case() {
        let content = StaticContent::haven();
        let bolt = content.spell_by_name("  GLIMMERING bolt ").unwrap();
        assert_eq!(bolt.id, SpellId::new(1));
        assert!(content.spell_by_name("Fireball").is_none());
    }

    #[test]
    fn every_status_reference_resolves() {
        let content = StaticContent::haven();
        for spell in content.spells() {
            for effect in &spell.effects {
                if let SpellEffect::ApplyStatusEffect {
                    status_effect_id, ..
                } = effect
                {
                    assert!(
                        content.status_effect(*status_effect_id).is_some(),
                        "{} references a missing status",
                        spell.name
                    );
                }
            }
        }
    }

    #[test]
    fn content_keys_are_unique() {
        let content = StaticContent::haven();
        let mut ids: Vec<_> = content.affixes().iter().map(|a| a.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), content.affixes().len());

        let mut spell_ids: Vec<_> = content.spells().iter().map(|s| s.id).collect();
        spell_ids.sort();
        spell_ids.dedup();
        assert_eq!(spell_ids.len(), content.spells().len());
    }
}
