//! Action intents, reports, and the failure taxonomy.

use crate::distance::{MoveDirection, RangeBand};
use crate::env::OracleError;
use crate::state::{AbilityId, CombatantId, ItemId, Outcome};

/// One action intent submitted to the state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatAction {
    /// Weapon attack against a target.
    Attack { target: CombatantId },

    /// Use a known ability, optionally on a target (self when omitted).
    UseAbility {
        ability: AbilityId,
        target: Option<CombatantId>,
    },

    /// Shift one range band. When the actor is the distance reference,
    /// `target` names the opponent whose band shifts instead.
    Move {
        direction: MoveDirection,
        target: Option<CombatantId>,
    },

    /// Consume an inventory item, optionally on a target.
    UseItem {
        item: ItemId,
        target: Option<CombatantId>,
    },

    /// Brace for a one-round defense buff.
    Defend,

    /// Attempt to escape the encounter. Player side only.
    Flee,
}

impl CombatAction {
    /// Short label for logs and events.
    pub fn label(&self) -> &'static str {
        match self {
            CombatAction::Attack { .. } => "attack",
            CombatAction::UseAbility { .. } => "ability",
            CombatAction::Move { .. } => "move",
            CombatAction::UseItem { .. } => "item",
            CombatAction::Defend => "defend",
            CombatAction::Flee => "flee",
        }
    }
}

/// Errors surfaced while processing an action.
///
/// Every variant is a rejection: the session is left exactly as it was.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("combat is not active")]
    NotActive,

    #[error("it is not {0}'s turn")]
    OutOfTurn(CombatantId),

    #[error("combatant {0} is not part of this encounter")]
    UnknownCombatant(CombatantId),

    #[error("target {0} is not a living member of this encounter")]
    UnknownTarget(CombatantId),

    #[error("ability {0:?} is not known to this combatant")]
    UnknownAbility(AbilityId),

    #[error("item {0:?} is not usable here")]
    ItemNotUsable(ItemId),

    #[error("target is out of range (distance {actual}, usable at {required})")]
    OutOfRange {
        required: RangeBand,
        actual: RangeBand,
    },

    #[error("not enough stamina (need {needed}, have {available})")]
    InsufficientStamina { needed: u32, available: u32 },

    #[error("not enough resource (need {needed}, have {available})")]
    InsufficientResource { needed: u32, available: u32 },

    #[error("ability {0:?} is still on cooldown")]
    CooldownActive(AbilityId),

    #[error("only the player-controlled side may flee")]
    FleeNotAllowed,

    #[error("no flee attempts remain this encounter")]
    FleeExhausted,

    #[error("move requires a target while acting as the reference")]
    MoveNeedsTarget,

    #[error("cannot move {0} from the boundary band")]
    MoveBlocked(MoveDirection),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

/// What actually happened when an action resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionDetail {
    Attack {
        target: CombatantId,
        hit: bool,
        critical: bool,
        damage: u32,
    },
    Ability {
        ability: AbilityId,
        target: CombatantId,
        damage: u32,
        healing: u32,
    },
    Move {
        direction: MoveDirection,
        subject: CombatantId,
        band: RangeBand,
    },
    Item {
        item: ItemId,
        target: CombatantId,
    },
    Defend,
    Flee {
        success: bool,
        chance: u32,
    },
}

impl ActionDetail {
    /// Short label for logs and events.
    pub fn label(&self) -> &'static str {
        match self {
            ActionDetail::Attack { .. } => "attack",
            ActionDetail::Ability { .. } => "ability",
            ActionDetail::Move { .. } => "move",
            ActionDetail::Item { .. } => "item",
            ActionDetail::Defend => "defend",
            ActionDetail::Flee { .. } => "flee",
        }
    }
}

/// Result of one successfully processed action.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionReport {
    pub actor: CombatantId,
    pub detail: ActionDetail,
    /// Combatants removed at zero HP during this action.
    pub defeated: Vec<CombatantId>,
    /// Set when this action ended the encounter.
    pub termination: Option<Outcome>,
}

/// Log entry: a resolved action with its round number.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionRecord {
    pub round: u32,
    pub actor: CombatantId,
    pub detail: ActionDetail,
}
