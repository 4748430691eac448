use std::fmt;

/// Unique identifier for a combatant tracked in the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantId(pub u32);

impl CombatantId {
    /// Reserved identifier for the player-controlled character.
    pub const PLAYER: Self = Self(0);

    /// First identifier handed out to generated opponents.
    ///
    /// Ids below this value are reserved for the player side so a roster
    /// can be rebuilt from a spawn report without collisions.
    pub const ENEMY_BASE: Self = Self(100);

    /// Returns true if this id belongs to the player character.
    #[inline]
    pub const fn is_player(self) -> bool {
        self.0 == Self::PLAYER.0
    }
}

impl Default for CombatantId {
    fn default() -> Self {
        Self::PLAYER
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Side a combatant fights for. Exactly two teams exist per encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Team {
    Allies,
    Enemies,
}

impl Team {
    /// Returns the opposing team.
    pub const fn opposing(self) -> Self {
        match self {
            Team::Allies => Team::Enemies,
            Team::Enemies => Team::Allies,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Team::Allies => "allies",
            Team::Enemies => "enemies",
        };
        write!(f, "{}", label)
    }
}

/// Integer resource meter (health, stamina, resource pool) tracked per
/// combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeter {
    pub current: u32,
    pub maximum: u32,
}

impl ResourceMeter {
    pub fn new(current: u32, maximum: u32) -> Self {
        Self { current, maximum }
    }

    /// Creates a meter filled to its maximum.
    pub fn full(maximum: u32) -> Self {
        Self {
            current: maximum,
            maximum,
        }
    }

    /// Subtracts `amount`, clamping at zero.
    pub fn deplete(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }

    /// Adds `amount`, clamping at the maximum.
    pub fn restore(&mut self, amount: u32) {
        self.current = (self.current + amount).min(self.maximum);
    }

    /// Returns true if at least `amount` is available.
    pub fn can_spend(&self, amount: u32) -> bool {
        self.current >= amount
    }

    /// Current value as an integer percentage of the maximum.
    ///
    /// A zero-maximum meter reads as 0%.
    pub fn percent(&self) -> u32 {
        if self.maximum == 0 {
            return 0;
        }
        self.current * 100 / self.maximum
    }

    pub fn is_empty(&self) -> bool {
        self.current == 0
    }
}

/// Damage type for resistances and damage calculation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageType {
    /// Physical damage (melee, projectiles).
    Physical,
    /// Fire damage (burns, explosions).
    Fire,
    /// Frost damage (ice, chill).
    Frost,
    /// Venom damage (toxins, bites).
    Venom,
    /// Arcane damage (pure magic).
    Arcane,
}
