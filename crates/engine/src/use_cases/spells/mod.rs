//! Spellbook rules: learning, listing, casting prerequisites, cooldowns.

mod effects;

pub use effects::{AppliedStatus, EffectOutcome, SpellEffectResolver};

use std::sync::Arc;
use std::time::Duration;

use nightfall_domain::{Character, KnownSpell, Spell, StatusEffectId};
use thiserror::Error;

use crate::infrastructure::ports::{ClockPort, ContentRepo, RepoError, SpellBookRepo};

#[derive(Debug, Error)]
pub enum SpellError {
    #[error("Unknown status effect: {0}")]
    UnknownStatusEffect(StatusEffectId),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Why a cast was refused before any resource was spent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CastRefusal {
    UnknownSpell,
    NotKnown,
    OnCooldown,
    NotEnoughMana,
}

impl CastRefusal {
    pub fn message(&self, spell_name: &str) -> String {
        match self {
            CastRefusal::UnknownSpell => format!("You don't know a spell called \"{}\".", spell_name),
            CastRefusal::NotKnown => format!("You don't know the spell \"{}\".", spell_name),
            CastRefusal::OnCooldown => format!("The spell \"{}\" is on cooldown.", spell_name),
            CastRefusal::NotEnoughMana => {
                format!("You don't have enough mana to cast \"{}\".", spell_name)
            }
        }
    }
}

pub struct SpellService {
    content: Arc<dyn ContentRepo>,
    spellbook: Arc<dyn SpellBookRepo>,
    clock: Arc<dyn ClockPort>,
    round: Duration,
}

impl SpellService {
    pub fn new(
        content: Arc<dyn ContentRepo>,
        spellbook: Arc<dyn SpellBookRepo>,
        clock: Arc<dyn ClockPort>,
        round: Duration,
    ) -> Self {
        Self {
            content,
            spellbook,
            clock,
            round,
        }
    }

    pub async fn learn(&self, character: &Character, spell_name: &str) -> Result<String, SpellError> {
        let Some(spell) = self.content.spell_by_name(spell_name) else {
            return Ok(format!("Spell \"{}\" not found.", spell_name));
        };

        let already_known = self.spellbook.get(character.id, spell.id).await?.is_some();
        if already_known || !spell.is_available_to(character.class, character.level) {
            return Ok(format!(
                "You cannot learn \"{}\". Check level requirements and class restrictions.",
                spell.name
            ));
        }

        self.spellbook
            .learn(&KnownSpell::new(character.id, spell.id))
            .await?;
        tracing::info!(character_id = %character.id, spell = %spell.name, "Spell learned");
        Ok(format!("You have learned \"{}\"!", spell.name))
    }

    pub async fn describe_spellbook(&self, character: &Character) -> Result<String, SpellError> {
        let known = self.spellbook.list_for_character(character.id).await?;
        let now = self.clock.now();
        let lines: Vec<String> = known
            .iter()
            .filter_map(|entry| {
                let spell = self.content.spell(entry.spell_id)?;
                let cooldown = if entry.is_on_cooldown(now) {
                    " (On cooldown)"
                } else {
                    ""
                };
                Some(format!(
                    "- {} ({} mana, {} round cooldown){}",
                    spell.name, spell.mana_cost, spell.cooldown, cooldown
                ))
            })
            .collect();

        if lines.is_empty() {
            return Ok("Your spellbook is empty.".to_string());
        }
        Ok(format!("Your spellbook:\n{}", lines.join("\n")))
    }

    pub async fn describe_available(&self, character: &Character) -> Result<String, SpellError> {
        let learnable = self.learnable(character).await?;
        if learnable.is_empty() {
            return Ok("No spells available to learn.".to_string());
        }
        let lines: Vec<String> = learnable
            .iter()
            .map(|spell| {
                format!(
                    "- {} (Level {}, {} mana)",
                    spell.name, spell.required_level, spell.mana_cost
                )
            })
            .collect();
        Ok(format!("Available spells to learn:\n{}", lines.join("\n")))
    }

    async fn learnable(&self, character: &Character) -> Result<Vec<Spell>, SpellError> {
        let known = self.spellbook.list_for_character(character.id).await?;
        Ok(self
            .content
            .spells()
            .into_iter()
            .filter(|spell| spell.is_available_to(character.class, character.level))
            .filter(|spell| !known.iter().any(|k| k.spell_id == spell.id))
            .collect())
    }

    /// Knowledge, cooldown and mana checks, in that order.
    pub async fn check_castable(
        &self,
        character: &Character,
        spell_name: &str,
    ) -> Result<Result<Spell, CastRefusal>, SpellError> {
        let Some(spell) = self.content.spell_by_name(spell_name) else {
            return Ok(Err(CastRefusal::UnknownSpell));
        };
        let Some(known) = self.spellbook.get(character.id, spell.id).await? else {
            return Ok(Err(CastRefusal::NotKnown));
        };
        if known.is_on_cooldown(self.clock.now()) {
            return Ok(Err(CastRefusal::OnCooldown));
        }
        if !character.can_afford_mana(spell.mana_cost) {
            return Ok(Err(CastRefusal::NotEnoughMana));
        }
        Ok(Ok(spell))
    }

    /// Cooldown expiry is `now + cooldown rounds x round length`.
    pub async fn start_cooldown(&self, character: &Character, spell: &Spell) -> Result<(), SpellError> {
        let until = if spell.cooldown == 0 {
            None
        } else {
            let length = chrono::Duration::from_std(self.round * spell.cooldown)
                .unwrap_or_else(|_| chrono::Duration::zero());
            Some(self.clock.now() + length)
        };
        self.spellbook
            .set_cooldown(character.id, spell.id, until)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::StaticContent;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::memory::InMemoryStore;
    use crate::infrastructure::ports::MockSpellBookRepo;
    use crate::test_fixtures::character;
    use chrono::{TimeZone, Utc};
    use mockall::predicate::*;
    use nightfall_domain::{CharacterClass, RoomId, SpellId};

    fn clock() -> Arc<FixedClock> {
        Arc::new(FixedClock(Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()))
    }

    fn service(spellbook: Arc<dyn SpellBookRepo>) -> SpellService {
        SpellService::new(
            Arc::new(StaticContent::haven()),
            spellbook,
            clock(),
            Duration::from_secs(3),
        )
    }

    fn weaver() -> Character {
        character("Mira", CharacterClass::AetherWeaver, RoomId::new("arcane-sanctum"))
    }

    #[tokio::test]
    async fn learn_respects_class_and_duplicates() {
        let store = Arc::new(InMemoryStore::new());
        let spells = service(store.clone());
        let mira = weaver();

        assert_eq!(
            spells.learn(&mira, "glimmering bolt").await.unwrap(),
            "You have learned \"Glimmering Bolt\"!"
        );
        assert_eq!(
            spells.learn(&mira, "Glimmering Bolt").await.unwrap(),
            "You cannot learn \"Glimmering Bolt\". Check level requirements and class restrictions."
        );
        assert_eq!(
            spells.learn(&mira, "Shield Bash").await.unwrap(),
            "You cannot learn \"Shield Bash\". Check level requirements and class restrictions."
        );
        assert_eq!(
            spells.learn(&mira, "Fireball").await.unwrap(),
            "Spell \"Fireball\" not found."
        );
    }

    #[tokio::test]
    async fn listings_reflect_the_spellbook() {
        let store = Arc::new(InMemoryStore::new());
        let spells = service(store.clone());
        let mira = weaver();

        assert_eq!(spells.describe_spellbook(&mira).await.unwrap(), "Your spellbook is empty.");
        assert_eq!(
            spells.describe_available(&mira).await.unwrap(),
            "Available spells to learn:\n- Glimmering Bolt (Level 1, 10 mana)"
        );

        spells.learn(&mira, "Glimmering Bolt").await.unwrap();
        assert_eq!(
            spells.describe_spellbook(&mira).await.unwrap(),
            "Your spellbook:\n- Glimmering Bolt (10 mana, 0 round cooldown)"
        );
        assert_eq!(
            spells.describe_available(&mira).await.unwrap(),
            "No spells available to learn."
        );
    }

    #[tokio::test]
    async fn cooldown_and_mana_gate_casting() {
        let store = Arc::new(InMemoryStore::new());
        let spells = service(store.clone());
        let mut aria = character("Aria", CharacterClass::Vanguard, RoomId::new("the-arena"));

        assert_eq!(
            spells.check_castable(&aria, "Shield Bash").await.unwrap(),
            Err(CastRefusal::NotKnown)
        );
        spells.learn(&aria, "Shield Bash").await.unwrap();
        let bash = spells.check_castable(&aria, "shield bash").await.unwrap().unwrap();

        spells.start_cooldown(&aria, &bash).await.unwrap();
        assert_eq!(
            spells.check_castable(&aria, "Shield Bash").await.unwrap(),
            Err(CastRefusal::OnCooldown)
        );
        assert!(spells
            .describe_spellbook(&aria)
            .await
            .unwrap()
            .ends_with("(On cooldown)"));

        store.set_cooldown(aria.id, bash.id, None).await.unwrap();
        aria.mana = 3;
        assert_eq!(
            spells.check_castable(&aria, "Shield Bash").await.unwrap(),
            Err(CastRefusal::NotEnoughMana)
        );
        assert_eq!(
            spells.check_castable(&aria, "Meteor").await.unwrap(),
            Err(CastRefusal::UnknownSpell)
        );
    }

    #[tokio::test]
    async fn cooldown_expiry_is_rounds_times_tick() {
        let aria = character("Aria", CharacterClass::Vanguard, RoomId::new("the-arena"));
        let id = aria.id;
        let expected = clock().0 + chrono::Duration::seconds(6);

        let mut spellbook = MockSpellBookRepo::new();
        spellbook
            .expect_set_cooldown()
            .with(eq(id), eq(SpellId::new(3)), eq(Some(expected)))
            .times(1)
            .returning(|_, _, _| Ok(()));

        let spells = service(Arc::new(spellbook));
        let bash = StaticContent::haven().spell(SpellId::new(3)).unwrap();
        spells.start_cooldown(&aria, &bash).await.unwrap();
    }
}
