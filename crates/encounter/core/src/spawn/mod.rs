//! Procedural encounter generation.
//!
//! Spawn decisions are keyed on (session seed, frame): the same frame of
//! the same session always rolls the same way, so encounter checks are
//! reproducible and replayable. Roster generation degrades gracefully:
//! a broken template skips its slot and the rest of the roster still
//! spawns.

use arrayvec::ArrayVec;

use crate::distance::RangeBand;
use crate::engine::CombatantSetup;
use crate::env::{CombatEnv, EnemyTemplate, OracleError, RewardProfile, compute_seed, roll};
use crate::state::{
    CombatantId, CombatantState, ResourceMeter, StatusEffects, Team,
};

/// Location classification scaling spawn probability and enemy count.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DangerTier {
    Safe,
    Low,
    Medium,
    High,
    Deadly,
}

impl DangerTier {
    /// Index into per-tier balance arrays.
    pub const fn index(self) -> usize {
        match self {
            DangerTier::Safe => 0,
            DangerTier::Low => 1,
            DangerTier::Medium => 2,
            DangerTier::High => 3,
            DangerTier::Deadly => 4,
        }
    }
}

/// Coarse time-of-day classification from the world clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

/// Narrative flavor of a generated encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EncounterKind {
    Ambush,
    Patrol,
    Lair,
    Chance,
}

/// Where and when a spawn check happens.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocationContext {
    pub name: String,
    pub danger: DangerTier,
    /// Safe locations never spawn encounters regardless of tier.
    pub safe: bool,
    /// Template pool encounters here draw from.
    pub enemy_pool: Vec<String>,
}

impl LocationContext {
    pub fn is_safe(&self) -> bool {
        self.safe || self.danger == DangerTier::Safe
    }
}

/// Inputs for one spawn decision.
#[derive(Clone, Copy, Debug)]
pub struct SpawnContext<'a> {
    pub location: &'a LocationContext,
    pub time_of_day: TimeOfDay,
    /// Session seed all spawn rolls derive from.
    pub seed: u64,
    /// Monotonic frame counter; each frame rolls independently.
    pub frame: u64,
}

/// Failures while building a single roster slot.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SpawnError {
    #[error("enemy template '{0}' not found")]
    UnknownTemplate(String),

    #[error("enemy template '{0}' has a malformed loot table")]
    MalformedLootTable(String),
}

/// A slot that failed to spawn; generation continued without it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedSlot {
    pub slot: usize,
    pub error: SpawnError,
}

/// One generated opponent: the built combatant, its starting band, and
/// the reward owed for defeating it.
#[derive(Clone, Debug)]
pub struct SpawnedEnemy {
    pub combatant: CombatantState,
    pub starting_band: RangeBand,
    pub reward: RewardProfile,
}

impl SpawnedEnemy {
    /// Roster entry for `start_combat`.
    pub fn to_setup(&self) -> CombatantSetup {
        CombatantSetup {
            state: self.combatant.clone(),
            starting_band: Some(self.starting_band),
        }
    }
}

/// Outcome of roster generation: the built enemies plus any slots that
/// had to be skipped. The caller decides how loudly to report skips.
#[derive(Clone, Debug, Default)]
pub struct SpawnReport {
    pub enemies: Vec<SpawnedEnemy>,
    pub skipped: Vec<SkippedSlot>,
}

/// A fully generated encounter, immutable once handed to the
/// orchestrator.
#[derive(Clone, Debug)]
pub struct EncounterSpec {
    pub enemies: Vec<SpawnedEnemy>,
    pub kind: EncounterKind,
    pub danger: DangerTier,
    pub location: String,
    /// Synthesized flavor line for narration fallbacks.
    pub description: String,
    /// Slots that failed during generation, for caller-side logging.
    pub skipped: Vec<SkippedSlot>,
}

/// Decide whether an encounter occurs at this location and frame.
///
/// Safe locations never spawn. Otherwise:
///
/// ```text
/// chance = base · danger_multiplier[tier]% · (night_multiplier% if night)
/// ```
///
/// compared against one seeded d100 draw keyed on (seed, frame).
pub fn should_spawn(ctx: &SpawnContext<'_>, env: &CombatEnv<'_>) -> Result<bool, OracleError> {
    if ctx.location.is_safe() {
        return Ok(false);
    }
    let rng = env.rng()?;
    let params = &env.tables()?.balance().spawn;

    let mut chance = params.base_chance * params.danger_multiplier[ctx.location.danger.index()] / 100;
    if ctx.time_of_day == TimeOfDay::Night {
        chance = chance * params.night_multiplier / 100;
    }

    let seed = compute_seed(ctx.seed, ctx.frame, 0, roll::SPAWN_CHECK);
    Ok(rng.roll_d100(seed) <= chance)
}

/// Build a scaled roster of opponents for this context.
///
/// Enemy count comes from the danger tier plus player level scaling;
/// each slot draws a template id from the location pool via the seeded
/// generator. Broken slots are skipped and reported, never fatal.
pub fn spawn_enemies(
    ctx: &SpawnContext<'_>,
    player_level: u32,
    env: &CombatEnv<'_>,
) -> Result<SpawnReport, OracleError> {
    let rng = env.rng()?;
    let params = &env.tables()?.balance().spawn;
    let enemies = env.enemies()?;

    let mut report = SpawnReport::default();
    if ctx.location.enemy_pool.is_empty() {
        return Ok(report);
    }

    let base = params.enemy_count[ctx.location.danger.index()];
    let scaled = base + player_level / params.levels_per_extra_enemy.max(1);
    let count = scaled.clamp(1, params.max_enemies) as usize;

    let mut name_counts: std::collections::HashMap<String, u32> = std::collections::HashMap::new();

    for slot in 0..count {
        let template_seed =
            compute_seed(ctx.seed, ctx.frame, slot as u32, roll::SPAWN_TEMPLATE);
        let pool_index = rng.next_u32(template_seed) as usize % ctx.location.enemy_pool.len();
        let def_id = &ctx.location.enemy_pool[pool_index];

        let Some(template) = enemies.template(def_id) else {
            report.skipped.push(SkippedSlot {
                slot,
                error: SpawnError::UnknownTemplate(def_id.clone()),
            });
            continue;
        };
        if let Err(error) = validate_loot(def_id, &template) {
            report.skipped.push(SkippedSlot { slot, error });
            continue;
        }

        let id = CombatantId(CombatantId::ENEMY_BASE.0 + slot as u32);
        let band_seed = compute_seed(ctx.seed, ctx.frame, slot as u32, roll::SPAWN_BAND);
        let starting_band = RangeBand::from_index(1 + (rng.next_u32(band_seed) % 3) as u8);

        let count_for_name = name_counts.entry(template.name.clone()).or_insert(0);
        *count_for_name += 1;
        let name = if *count_for_name > 1 {
            format!("{} {}", template.name, count_for_name)
        } else {
            template.name.clone()
        };

        report.enemies.push(SpawnedEnemy {
            combatant: build_combatant(id, name, &template),
            starting_band,
            reward: template.reward.clone(),
        });
    }

    Ok(report)
}

/// Compose a spawn check and roster generation into an encounter spec.
///
/// Returns `None` when no enemies could be generated.
pub fn generate_encounter(
    ctx: &SpawnContext<'_>,
    player_level: u32,
    env: &CombatEnv<'_>,
) -> Result<Option<EncounterSpec>, OracleError> {
    let report = spawn_enemies(ctx, player_level, env)?;
    if report.enemies.is_empty() {
        return Ok(None);
    }

    let kind = pick_kind(ctx, env)?;
    let description = describe(&report.enemies, kind, ctx.time_of_day, &ctx.location.name);

    Ok(Some(EncounterSpec {
        enemies: report.enemies,
        kind,
        danger: ctx.location.danger,
        location: ctx.location.name.clone(),
        description,
        skipped: report.skipped,
    }))
}

/// Weighted encounter-kind draw; the remainder after the configured
/// weights is a chance encounter.
fn pick_kind(ctx: &SpawnContext<'_>, env: &CombatEnv<'_>) -> Result<EncounterKind, OracleError> {
    let rng = env.rng()?;
    let weights = env.tables()?.balance().spawn.kind_weights;

    let seed = compute_seed(ctx.seed, ctx.frame, 0, roll::ENCOUNTER_KIND);
    let draw = rng.roll_d100(seed);

    let ambush = weights[0];
    let patrol = ambush + weights[1];
    let lair = patrol + weights[2];

    Ok(if draw <= ambush {
        EncounterKind::Ambush
    } else if draw <= patrol {
        EncounterKind::Patrol
    } else if draw <= lair {
        EncounterKind::Lair
    } else {
        EncounterKind::Chance
    })
}

fn validate_loot(def_id: &str, template: &EnemyTemplate) -> Result<(), SpawnError> {
    let reward = &template.reward;
    if reward.gold_min > reward.gold_max || reward.loot.iter().any(|e| e.chance > 100) {
        return Err(SpawnError::MalformedLootTable(def_id.to_owned()));
    }
    Ok(())
}

fn build_combatant(id: CombatantId, name: String, template: &EnemyTemplate) -> CombatantState {
    let abilities = template
        .abilities
        .iter()
        .take(crate::config::EngineConfig::MAX_ABILITIES)
        .map(|&ability| crate::state::AbilitySlot::new(ability))
        .collect::<ArrayVec<_, { crate::config::EngineConfig::MAX_ABILITIES }>>();

    CombatantState {
        id,
        name,
        team: Team::Enemies,
        player_controlled: false,
        archetype: template.archetype,
        aggression: template.aggression,
        initiative: 0,
        health: ResourceMeter::full(template.max_health),
        stamina: ResourceMeter::full(template.max_stamina),
        resource: ResourceMeter::full(template.max_resource),
        attributes: template.attributes,
        weapon: template.weapon.clone(),
        abilities,
        inventory: ArrayVec::new(),
        statuses: StatusEffects::empty(),
    }
}

fn describe(
    enemies: &[SpawnedEnemy],
    kind: EncounterKind,
    time_of_day: TimeOfDay,
    location: &str,
) -> String {
    let names: Vec<&str> = enemies.iter().map(|e| e.combatant.name.as_str()).collect();
    let group = match names.len() {
        1 => names[0].to_owned(),
        2 => format!("{} and {}", names[0], names[1]),
        _ => format!("{} and {} others", names[0], names.len() - 1),
    };
    let setting = match kind {
        EncounterKind::Ambush => "springs an ambush",
        EncounterKind::Patrol => "patrols the area",
        EncounterKind::Lair => "defends its lair",
        EncounterKind::Chance => "crosses your path",
    };
    format!("{} {} near {} in the {}", group, setting, location, time_of_day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{BalanceTables, EnemyOracle, PcgRng};
    use crate::policy::Archetype;
    use crate::state::{Attributes, WeaponProfile};

    struct PoolOracle;

    impl EnemyOracle for PoolOracle {
        fn template(&self, def_id: &str) -> Option<EnemyTemplate> {
            (def_id == "wolf").then(|| EnemyTemplate {
                name: "Wolf".to_owned(),
                max_health: 20,
                max_stamina: 30,
                max_resource: 0,
                attributes: Attributes::default(),
                weapon: WeaponProfile::unarmed(),
                abilities: Vec::new(),
                archetype: Archetype::Aggressive,
                aggression: 10,
                reward: RewardProfile {
                    experience: 25,
                    gold_min: 2,
                    gold_max: 8,
                    loot: Vec::new(),
                },
            })
        }
    }

    fn location(danger: DangerTier, pool: &[&str]) -> LocationContext {
        LocationContext {
            name: "the old road".to_owned(),
            danger,
            safe: false,
            enemy_pool: pool.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn env<'a>(
        tables: &'a BalanceTables,
        rng: &'a PcgRng,
        enemies: &'a PoolOracle,
    ) -> CombatEnv<'a> {
        CombatEnv::new(Some(tables), None, None, Some(enemies), Some(rng))
    }

    #[test]
    fn safe_locations_never_spawn() {
        let tables = BalanceTables::default();
        let rng = PcgRng;
        let enemies = PoolOracle;
        let env = env(&tables, &rng, &enemies);

        let loc = LocationContext {
            safe: true,
            ..location(DangerTier::Deadly, &["wolf"])
        };
        for frame in 0..200 {
            let ctx = SpawnContext {
                location: &loc,
                time_of_day: TimeOfDay::Night,
                seed: 5,
                frame,
            };
            assert!(!should_spawn(&ctx, &env).unwrap());
        }
    }

    #[test]
    fn spawn_rolls_are_reproducible_per_seed_and_frame() {
        let tables = BalanceTables::default();
        let rng = PcgRng;
        let enemies = PoolOracle;
        let env = env(&tables, &rng, &enemies);
        let loc = location(DangerTier::High, &["wolf"]);

        for frame in 0..50 {
            let ctx = SpawnContext {
                location: &loc,
                time_of_day: TimeOfDay::Night,
                seed: 77,
                frame,
            };
            assert_eq!(
                should_spawn(&ctx, &env).unwrap(),
                should_spawn(&ctx, &env).unwrap()
            );

            let a = spawn_enemies(&ctx, 3, &env).unwrap();
            let b = spawn_enemies(&ctx, 3, &env).unwrap();
            let names_a: Vec<_> = a.enemies.iter().map(|e| e.combatant.name.clone()).collect();
            let names_b: Vec<_> = b.enemies.iter().map(|e| e.combatant.name.clone()).collect();
            assert_eq!(names_a, names_b);
            let bands_a: Vec<_> = a.enemies.iter().map(|e| e.starting_band).collect();
            let bands_b: Vec<_> = b.enemies.iter().map(|e| e.starting_band).collect();
            assert_eq!(bands_a, bands_b);
        }
    }

    #[test]
    fn unknown_templates_skip_slots_and_continue() {
        let tables = BalanceTables::default();
        let rng = PcgRng;
        let enemies = PoolOracle;
        let env = env(&tables, &rng, &enemies);
        let loc = location(DangerTier::Medium, &["ghoul"]);

        let ctx = SpawnContext {
            location: &loc,
            time_of_day: TimeOfDay::Morning,
            seed: 3,
            frame: 0,
        };
        let report = spawn_enemies(&ctx, 1, &env).unwrap();
        assert!(report.enemies.is_empty());
        assert!(!report.skipped.is_empty());
        assert!(matches!(
            report.skipped[0].error,
            SpawnError::UnknownTemplate(_)
        ));
    }

    #[test]
    fn empty_roster_generates_no_encounter() {
        let tables = BalanceTables::default();
        let rng = PcgRng;
        let enemies = PoolOracle;
        let env = env(&tables, &rng, &enemies);
        let loc = location(DangerTier::Medium, &["ghoul"]);

        let ctx = SpawnContext {
            location: &loc,
            time_of_day: TimeOfDay::Morning,
            seed: 3,
            frame: 0,
        };
        assert!(generate_encounter(&ctx, 1, &env).unwrap().is_none());
    }

    #[test]
    fn duplicate_enemies_get_numbered_names() {
        let tables = BalanceTables::default();
        let rng = PcgRng;
        let enemies = PoolOracle;
        let env = env(&tables, &rng, &enemies);
        let loc = location(DangerTier::Deadly, &["wolf"]);

        let ctx = SpawnContext {
            location: &loc,
            time_of_day: TimeOfDay::Night,
            seed: 9,
            frame: 4,
        };
        let report = spawn_enemies(&ctx, 10, &env).unwrap();
        assert!(report.enemies.len() > 1);
        assert_eq!(report.enemies[0].combatant.name, "Wolf");
        assert_eq!(report.enemies[1].combatant.name, "Wolf 2");
    }
}
