//! Item definitions and oracle interface.

use crate::state::ItemId;
use crate::state::status::StatusKind;

/// Oracle providing item definitions by id.
pub trait ItemOracle: Send + Sync {
    /// Returns the item definition if the id is known.
    fn definition(&self, id: ItemId) -> Option<ItemDef>;
}

/// One declared effect of using an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemEffect {
    /// Restores health.
    RestoreHealth(u32),
    /// Restores stamina.
    RestoreStamina(u32),
    /// Restores the ability resource pool.
    RestoreResource(u32),
    /// Attaches a status effect.
    Status {
        kind: StatusKind,
        magnitude: i32,
        rounds: u8,
    },
}

impl ItemEffect {
    pub fn is_healing(&self) -> bool {
        matches!(
            self,
            ItemEffect::RestoreHealth(_)
                | ItemEffect::Status {
                    kind: StatusKind::Regeneration,
                    ..
                }
        )
    }
}

/// Complete specification of one item.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDef {
    pub id: ItemId,
    pub name: String,
    /// Only consumable items can be used in combat.
    pub consumable: bool,
    pub effects: Vec<ItemEffect>,
    /// Base gold value, used by loot generation.
    pub value: u32,
}

impl ItemDef {
    pub fn is_healing(&self) -> bool {
        self.effects.iter().any(ItemEffect::is_healing)
    }
}
