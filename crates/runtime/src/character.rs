//! The externally owned player character sheet.
//!
//! The sheet outlives encounters: the orchestrator builds a combatant
//! from it at `start_combat` and syncs surviving resource state back at
//! teardown. Only HP, stamina, resource pool, inventory, gold, and XP
//! cross the boundary; everything else is session lifetime.

use arrayvec::ArrayVec;

use encounter_core::{
    AbilityId, AbilitySlot, Archetype, Attributes, CombatantId, CombatantState, EngineConfig,
    InventorySlot, ItemId, ResourceMeter, StatusEffects, Team, WeaponProfile,
};

/// Experience required to advance from `level` to `level + 1`.
fn experience_to_next(level: u32) -> u32 {
    level * 100
}

/// Mutable character resource state owned by the wider game session.
#[derive(Clone, Debug)]
pub struct CharacterSheet {
    pub name: String,
    pub level: u32,
    pub experience: u32,
    pub gold: u32,

    pub health: ResourceMeter,
    pub stamina: ResourceMeter,
    pub resource: ResourceMeter,

    pub attributes: Attributes,
    pub weapon: WeaponProfile,
    pub abilities: Vec<AbilityId>,
    pub inventory: Vec<(ItemId, u16)>,
}

impl CharacterSheet {
    /// Fresh level-1 sheet with baseline meters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: 1,
            experience: 0,
            gold: 0,
            health: ResourceMeter::full(100),
            stamina: ResourceMeter::full(50),
            resource: ResourceMeter::full(30),
            attributes: Attributes::default(),
            weapon: WeaponProfile::unarmed(),
            abilities: Vec::new(),
            inventory: Vec::new(),
        }
    }

    /// Builds the player-side combatant for one encounter.
    pub fn to_combatant(&self) -> CombatantState {
        let abilities = self
            .abilities
            .iter()
            .take(EngineConfig::MAX_ABILITIES)
            .map(|&id| AbilitySlot::new(id))
            .collect::<ArrayVec<_, { EngineConfig::MAX_ABILITIES }>>();
        let inventory = self
            .inventory
            .iter()
            .take(EngineConfig::MAX_INVENTORY_SLOTS)
            .map(|&(item, quantity)| InventorySlot::new(item, quantity))
            .collect::<ArrayVec<_, { EngineConfig::MAX_INVENTORY_SLOTS }>>();

        CombatantState {
            id: CombatantId::PLAYER,
            name: self.name.clone(),
            team: Team::Allies,
            player_controlled: true,
            archetype: Archetype::Balanced,
            aggression: 0,
            initiative: 0,
            health: self.health,
            stamina: self.stamina,
            resource: self.resource,
            attributes: self.attributes,
            weapon: self.weapon.clone(),
            abilities,
            inventory,
            statuses: StatusEffects::empty(),
        }
    }

    /// Syncs surviving resource state back from the encounter.
    pub fn sync_after_combat(&mut self, state: &CombatantState) {
        self.health = state.health;
        self.stamina = state.stamina;
        self.resource = state.resource;
        self.inventory = state
            .inventory
            .iter()
            .map(|slot| (slot.item, slot.quantity))
            .collect();
    }

    /// Adds experience and returns how many levels were gained.
    pub fn add_experience(&mut self, amount: u32) -> u32 {
        self.experience += amount;
        let mut gained = 0;
        while self.experience >= experience_to_next(self.level) {
            self.experience -= experience_to_next(self.level);
            self.level += 1;
            gained += 1;
        }
        gained
    }

    pub fn add_gold(&mut self, amount: u32) {
        self.gold += amount;
    }

    /// Removes up to `amount` gold; returns what was actually taken.
    pub fn remove_gold(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.gold);
        self.gold -= taken;
        taken
    }

    /// Adds an item stack to the inventory.
    pub fn add_item(&mut self, item: ItemId, quantity: u16) {
        if let Some(slot) = self.inventory.iter_mut().find(|(id, _)| *id == item) {
            slot.1 += quantity;
        } else {
            self.inventory.push((item, quantity));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn experience_rolls_over_levels() {
        let mut sheet = CharacterSheet::new("tester");
        // 100 to reach 2, 200 more to reach 3.
        let gained = sheet.add_experience(320);
        assert_eq!(gained, 2);
        assert_eq!(sheet.level, 3);
        assert_eq!(sheet.experience, 20);
    }

    #[test]
    fn gold_removal_is_bounded() {
        let mut sheet = CharacterSheet::new("tester");
        sheet.add_gold(30);
        assert_eq!(sheet.remove_gold(100), 30);
        assert_eq!(sheet.gold, 0);
    }

    #[test]
    fn combatant_round_trip_preserves_resources() {
        let mut sheet = CharacterSheet::new("tester");
        sheet.add_item(ItemId(4), 2);

        let mut combatant = sheet.to_combatant();
        combatant.health.deplete(40);
        combatant.consume_item(ItemId(4));

        sheet.sync_after_combat(&combatant);
        assert_eq!(sheet.health.current, 60);
        assert_eq!(sheet.inventory, vec![(ItemId(4), 1)]);
    }
}
