//! Combatant state: the per-encounter view of a character.
//!
//! A [`CombatantState`] is built from an externally owned character sheet
//! (or enemy template) when combat starts and surrendered when it ends.
//! Only the sheet survives the encounter; everything here is session
//! lifetime.

use arrayvec::ArrayVec;

use crate::config::EngineConfig;
use crate::distance::RangeBand;
use crate::policy::Archetype;
use crate::state::common::{CombatantId, DamageType, ResourceMeter, Team};
use crate::state::status::StatusEffects;

/// Identifier for an ability definition in the ability oracle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityId(pub u16);

/// Identifier for an item definition in the item oracle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemId(pub u16);

/// Percentage reduction applied to incoming damage, per damage type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Resistances {
    pub physical: u32,
    pub fire: u32,
    pub frost: u32,
    pub venom: u32,
    pub arcane: u32,
}

impl Resistances {
    /// Resistance percentage against a damage type.
    pub fn against(&self, damage_type: DamageType) -> u32 {
        match damage_type {
            DamageType::Physical => self.physical,
            DamageType::Fire => self.fire,
            DamageType::Frost => self.frost,
            DamageType::Venom => self.venom,
            DamageType::Arcane => self.arcane,
        }
    }
}

/// Combat attributes contributed by the character sheet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Attributes {
    /// Flat bonus to hit chance and damage.
    pub attack_bonus: i32,
    /// Flat reduction to opponents' hit chance.
    pub defense_bonus: i32,
    /// Chance (percent) to avoid an attack outright.
    pub dodge: u32,
    /// Contribution to the once-per-encounter initiative roll.
    pub initiative: i32,
    pub resistances: Resistances,
}

/// Equipped weapon profile. Every combatant has one; fists count.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponProfile {
    pub name: String,
    /// Base damage before attack bonus.
    pub damage: u32,
    /// Furthest band this weapon can strike at.
    pub range: RangeBand,
    pub damage_type: DamageType,
}

impl WeaponProfile {
    /// Bare-handed fallback profile.
    pub fn unarmed() -> Self {
        Self {
            name: "fists".to_owned(),
            damage: 2,
            range: RangeBand::Melee,
            damage_type: DamageType::Physical,
        }
    }
}

/// A known ability and its per-encounter cooldown counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilitySlot {
    pub id: AbilityId,
    /// Rounds until the ability is usable again. Zero means ready.
    pub cooldown_remaining: u8,
}

impl AbilitySlot {
    pub fn new(id: AbilityId) -> Self {
        Self {
            id,
            cooldown_remaining: 0,
        }
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.cooldown_remaining == 0
    }
}

/// Inventory slot containing an item and its quantity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InventorySlot {
    pub item: ItemId,
    pub quantity: u16,
}

impl InventorySlot {
    pub fn new(item: ItemId, quantity: u16) -> Self {
        Self { item, quantity }
    }
}

/// Complete per-encounter state for one combatant.
///
/// # Invariants
///
/// - `initiative` is rolled exactly once, by `start_combat`.
/// - Effective attack/defense always flow through the helper methods so
///   status modifiers are never forgotten at a call site.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantState {
    pub id: CombatantId,
    pub name: String,
    pub team: Team,
    /// True for the side driven by the external player-decision hook.
    pub player_controlled: bool,
    pub archetype: Archetype,
    /// Personality flavor from the template: percent delta on the
    /// archetype's ability-use gate.
    pub aggression: i32,

    /// Turn-order score, rolled at encounter start.
    pub initiative: i32,

    pub health: ResourceMeter,
    pub stamina: ResourceMeter,
    /// Pool spent by abilities (mana, focus, rage; the sheet decides).
    pub resource: ResourceMeter,

    pub attributes: Attributes,
    pub weapon: WeaponProfile,

    pub abilities: ArrayVec<AbilitySlot, { EngineConfig::MAX_ABILITIES }>,
    pub inventory: ArrayVec<InventorySlot, { EngineConfig::MAX_INVENTORY_SLOTS }>,
    pub statuses: StatusEffects,
}

impl CombatantState {
    /// Quick liveness check.
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health.current > 0
    }

    /// Attack bonus with status modifiers applied.
    pub fn effective_attack(&self) -> i32 {
        self.attributes.attack_bonus + self.statuses.attack_modifier()
    }

    /// Defense bonus with status modifiers applied.
    pub fn effective_defense(&self) -> i32 {
        self.attributes.defense_bonus + self.statuses.defense_modifier()
    }

    /// Checks whether a known ability is off cooldown.
    pub fn ability_ready(&self, id: AbilityId) -> bool {
        self.abilities.iter().any(|a| a.id == id && a.is_ready())
    }

    /// Starts an ability's cooldown.
    pub fn set_ability_cooldown(&mut self, id: AbilityId, rounds: u8) {
        if let Some(slot) = self.abilities.iter_mut().find(|a| a.id == id) {
            slot.cooldown_remaining = rounds;
        }
    }

    /// Decrements every ability cooldown by one round.
    pub fn tick_cooldowns(&mut self) {
        for slot in self.abilities.iter_mut() {
            slot.cooldown_remaining = slot.cooldown_remaining.saturating_sub(1);
        }
    }

    /// Looks up an inventory slot by item id.
    pub fn inventory_slot(&self, item: ItemId) -> Option<&InventorySlot> {
        self.inventory.iter().find(|s| s.item == item)
    }

    /// Removes one unit of an item. Returns false if the item is absent.
    pub fn consume_item(&mut self, item: ItemId) -> bool {
        let Some(index) = self.inventory.iter().position(|s| s.item == item) else {
            return false;
        };
        if self.inventory[index].quantity > 1 {
            self.inventory[index].quantity -= 1;
        } else {
            self.inventory.remove(index);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::status::StatusKind;

    fn combatant() -> CombatantState {
        CombatantState {
            id: CombatantId::PLAYER,
            name: "hero".to_owned(),
            team: Team::Allies,
            player_controlled: true,
            archetype: Archetype::Balanced,
            aggression: 0,
            initiative: 0,
            health: ResourceMeter::full(100),
            stamina: ResourceMeter::full(50),
            resource: ResourceMeter::full(30),
            attributes: Attributes {
                attack_bonus: 3,
                defense_bonus: 1,
                ..Attributes::default()
            },
            weapon: WeaponProfile::unarmed(),
            abilities: ArrayVec::new(),
            inventory: ArrayVec::new(),
            statuses: StatusEffects::empty(),
        }
    }

    #[test]
    fn status_modifiers_reach_effective_values() {
        let mut c = combatant();
        c.statuses.add(StatusKind::DefenseUp, 5, 1, 1);
        assert_eq!(c.effective_defense(), 6);
        assert_eq!(c.effective_attack(), 3);
    }

    #[test]
    fn consume_item_removes_emptied_slots() {
        let mut c = combatant();
        c.inventory.push(InventorySlot::new(ItemId(7), 2));

        assert!(c.consume_item(ItemId(7)));
        assert_eq!(c.inventory_slot(ItemId(7)).map(|s| s.quantity), Some(1));

        assert!(c.consume_item(ItemId(7)));
        assert!(c.inventory_slot(ItemId(7)).is_none());

        assert!(!c.consume_item(ItemId(7)));
    }
}
