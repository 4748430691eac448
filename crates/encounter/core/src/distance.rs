//! Coarse relative positioning for encounters.
//!
//! Combat does not simulate coordinates. Every combatant sits in one of
//! four ordered range bands relative to a single reference combatant
//! (the player side), and movement shifts a band by exactly one step.

use std::collections::HashMap;
use std::fmt;

use crate::state::CombatantId;

/// One of four ordered relative-distance categories.
///
/// Bands are ordered by index: `Melee=0 < Close=1 < Medium=2 < Long=3`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RangeBand {
    Melee,
    Close,
    Medium,
    Long,
}

impl RangeBand {
    /// Ordinal index of this band.
    pub const fn index(self) -> u8 {
        match self {
            RangeBand::Melee => 0,
            RangeBand::Close => 1,
            RangeBand::Medium => 2,
            RangeBand::Long => 3,
        }
    }

    /// Band for an ordinal index, clamping past `Long`.
    pub const fn from_index(index: u8) -> Self {
        match index {
            0 => RangeBand::Melee,
            1 => RangeBand::Close,
            2 => RangeBand::Medium,
            _ => RangeBand::Long,
        }
    }

    /// One band toward the reference, or `None` at `Melee`.
    pub const fn closer(self) -> Option<Self> {
        match self {
            RangeBand::Melee => None,
            RangeBand::Close => Some(RangeBand::Melee),
            RangeBand::Medium => Some(RangeBand::Close),
            RangeBand::Long => Some(RangeBand::Medium),
        }
    }

    /// One band away from the reference, or `None` at `Long`.
    pub const fn farther(self) -> Option<Self> {
        match self {
            RangeBand::Melee => Some(RangeBand::Close),
            RangeBand::Close => Some(RangeBand::Medium),
            RangeBand::Medium => Some(RangeBand::Long),
            RangeBand::Long => None,
        }
    }
}

/// Errors surfaced by the distance model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DistanceError {
    #[error("combatant {0} is not tracked by the distance model")]
    Untracked(CombatantId),

    #[error("no reference combatant has been designated")]
    NoReference,

    #[error("combatant {0} is the current reference and cannot be removed")]
    ReferenceInUse(CombatantId),

    #[error("combatant {id} is already at the {band} boundary")]
    AtBoundary { id: CombatantId, band: RangeBand },
}

/// Direction of a one-band shift.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveDirection {
    Closer,
    Farther,
}

impl fmt::Display for MoveDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MoveDirection::Closer => "closer",
            MoveDirection::Farther => "farther",
        };
        write!(f, "{}", label)
    }
}

/// Tracks each combatant's range band relative to one reference.
///
/// # Invariants
///
/// - Exactly one reference exists while the model is active; it always
///   reads as `Melee` relative to itself.
/// - Every other tracked combatant has exactly one band entry.
/// - Transitions are strictly one band at a time.
#[derive(Clone, Debug, Default)]
pub struct DistanceModel {
    reference: Option<CombatantId>,
    entries: HashMap<CombatantId, RangeBand>,
}

impl DistanceModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Designates the anchor combatant.
    ///
    /// The previous reference (if any) keeps its entry and becomes an
    /// ordinary tracked combatant at `Melee`.
    pub fn set_reference(&mut self, id: CombatantId) {
        self.entries.insert(id, RangeBand::Melee);
        self.reference = Some(id);
    }

    pub fn reference(&self) -> Option<CombatantId> {
        self.reference
    }

    /// Registers a combatant at a starting band.
    pub fn add_entity(&mut self, id: CombatantId, band: RangeBand) {
        self.entries.insert(id, band);
    }

    /// Drops a combatant's entry.
    ///
    /// The reference must be reassigned before it can be removed.
    pub fn remove_entity(&mut self, id: CombatantId) -> Result<(), DistanceError> {
        if self.reference == Some(id) {
            return Err(DistanceError::ReferenceInUse(id));
        }
        self.entries
            .remove(&id)
            .map(|_| ())
            .ok_or(DistanceError::Untracked(id))
    }

    /// Clears all entries and the reference.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.reference = None;
    }

    fn band_of(&self, id: CombatantId) -> Result<RangeBand, DistanceError> {
        self.entries
            .get(&id)
            .copied()
            .ok_or(DistanceError::Untracked(id))
    }

    /// Band between any two tracked combatants.
    ///
    /// When neither endpoint is the reference, the distance is
    /// approximated by the absolute difference of their band indices
    /// relative to the reference.
    pub fn distance_between(
        &self,
        a: CombatantId,
        b: CombatantId,
    ) -> Result<RangeBand, DistanceError> {
        if a == b {
            return Ok(RangeBand::Melee);
        }
        let reference = self.reference.ok_or(DistanceError::NoReference)?;
        let band_a = self.band_of(a)?;
        let band_b = self.band_of(b)?;

        if a == reference {
            return Ok(band_b);
        }
        if b == reference {
            return Ok(band_a);
        }
        Ok(RangeBand::from_index(
            band_a.index().abs_diff(band_b.index()),
        ))
    }

    /// An ability or weapon usable at band `required` reaches any target
    /// at that band or closer.
    pub fn is_in_range(
        &self,
        a: CombatantId,
        b: CombatantId,
        required: RangeBand,
    ) -> Result<bool, DistanceError> {
        Ok(self.distance_between(a, b)? <= required)
    }

    /// Shifts a combatant one band toward the reference.
    pub fn move_closer(&mut self, id: CombatantId) -> Result<RangeBand, DistanceError> {
        let band = self.band_of(id)?;
        let next = band.closer().ok_or(DistanceError::AtBoundary { id, band })?;
        self.entries.insert(id, next);
        Ok(next)
    }

    /// Shifts a combatant one band away from the reference.
    pub fn move_farther(&mut self, id: CombatantId) -> Result<RangeBand, DistanceError> {
        let band = self.band_of(id)?;
        let next = band
            .farther()
            .ok_or(DistanceError::AtBoundary { id, band })?;
        self.entries.insert(id, next);
        Ok(next)
    }

    /// Applies a one-band shift in the given direction.
    pub fn shift(
        &mut self,
        id: CombatantId,
        direction: MoveDirection,
    ) -> Result<RangeBand, DistanceError> {
        match direction {
            MoveDirection::Closer => self.move_closer(id),
            MoveDirection::Farther => self.move_farther(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REF: CombatantId = CombatantId::PLAYER;
    const FOE: CombatantId = CombatantId(100);
    const OTHER: CombatantId = CombatantId(101);

    fn model() -> DistanceModel {
        let mut m = DistanceModel::new();
        m.set_reference(REF);
        m.add_entity(FOE, RangeBand::Medium);
        m.add_entity(OTHER, RangeBand::Close);
        m
    }

    #[test]
    fn reference_is_melee_to_itself() {
        let m = model();
        assert_eq!(m.distance_between(REF, REF).unwrap(), RangeBand::Melee);
    }

    #[test]
    fn non_reference_distance_uses_index_difference() {
        let m = model();
        // Medium(2) vs Close(1) relative to the reference.
        assert_eq!(m.distance_between(FOE, OTHER).unwrap(), RangeBand::Close);
    }

    #[test]
    fn transitions_are_single_band() {
        let mut m = model();
        assert_eq!(m.move_closer(FOE).unwrap(), RangeBand::Close);
        assert_eq!(m.move_closer(FOE).unwrap(), RangeBand::Melee);
        assert_eq!(
            m.move_closer(FOE),
            Err(DistanceError::AtBoundary {
                id: FOE,
                band: RangeBand::Melee
            })
        );

        m.add_entity(FOE, RangeBand::Long);
        assert_eq!(
            m.move_farther(FOE),
            Err(DistanceError::AtBoundary {
                id: FOE,
                band: RangeBand::Long
            })
        );
    }

    #[test]
    fn reference_cannot_be_removed_in_place() {
        let mut m = model();
        assert_eq!(m.remove_entity(REF), Err(DistanceError::ReferenceInUse(REF)));

        m.set_reference(FOE);
        assert!(m.remove_entity(REF).is_ok());
    }

    #[test]
    fn closer_band_is_always_in_range() {
        let mut m = model();
        m.add_entity(FOE, RangeBand::Close);
        assert!(m.is_in_range(REF, FOE, RangeBand::Medium).unwrap());
        assert!(!m.is_in_range(REF, FOE, RangeBand::Melee).unwrap());
    }
}
