//! Turn-based combat state machine.
//!
//! The [`CombatEngine`] is the authoritative mutator for
//! [`CombatSession`]. `start_combat` builds a session, `process_action`
//! resolves one intent at a time with validate-before-mutate discipline,
//! and `end_combat` tears the session down. Nothing else writes combat
//! state.

mod resolve;

use crate::action::{ActionDetail, ActionError, ActionRecord, ActionReport, CombatAction};
use crate::combat::roll_initiative;
use crate::distance::{DistanceModel, RangeBand};
use crate::env::{CombatEnv, OracleError, compute_seed, roll};
use crate::state::{
    CombatPhase, CombatSession, CombatantId, CombatantState, Outcome, Team,
};

/// Errors surfaced while building a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StartError {
    #[error("roster has no player-controlled combatant")]
    NoPlayerSide,

    #[error("roster has no opposing combatants")]
    NoOpposition,

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

/// One roster entry for session construction.
#[derive(Clone, Debug)]
pub struct CombatantSetup {
    pub state: CombatantState,
    /// Starting band for enemies; `None` draws a seeded random band.
    /// Ignored for the player side, which always starts at melee.
    pub starting_band: Option<RangeBand>,
}

/// Everything `start_combat` needs to build a session.
#[derive(Clone, Debug)]
pub struct EncounterSetup {
    pub seed: u64,
    pub combatants: Vec<CombatantSetup>,
}

/// Combat state machine over one mutable session.
pub struct CombatEngine<'a> {
    session: &'a mut CombatSession,
}

impl<'a> CombatEngine<'a> {
    pub fn new(session: &'a mut CombatSession) -> Self {
        Self { session }
    }

    /// Builds a session from a roster: seeds the distance model, rolls
    /// initiative, and transitions straight to `Active`.
    ///
    /// The first player-controlled combatant becomes the distance
    /// reference; the rest of the player side shares its melee band.
    pub fn start_combat(
        setup: EncounterSetup,
        env: &CombatEnv<'_>,
    ) -> Result<CombatSession, StartError> {
        let rng = env.rng()?;
        let tables = env.tables()?;

        let reference = setup
            .combatants
            .iter()
            .find(|c| c.state.player_controlled)
            .map(|c| c.state.id)
            .ok_or(StartError::NoPlayerSide)?;

        if !setup.combatants.iter().any(|c| c.state.team == Team::Enemies) {
            return Err(StartError::NoOpposition);
        }

        let mut distance = DistanceModel::new();
        distance.set_reference(reference);

        let mut roster = Vec::with_capacity(setup.combatants.len());
        for (slot, entry) in setup.combatants.into_iter().enumerate() {
            let mut state = entry.state;
            let id = state.id;

            if state.team == Team::Allies {
                distance.add_entity(id, RangeBand::Melee);
            } else {
                let band = entry.starting_band.unwrap_or_else(|| {
                    let seed = compute_seed(setup.seed, slot as u64, id.0, roll::SPAWN_BAND);
                    RangeBand::from_index(1 + (rng.next_u32(seed) % 3) as u8)
                });
                distance.add_entity(id, band);
            }

            state.initiative =
                roll_initiative(setup.seed, id, state.attributes.initiative, rng, tables);
            roster.push(state);
        }

        // Highest initiative acts first; ids break ties deterministically.
        let mut turn_order: Vec<CombatantId> = roster.iter().map(|c| c.id).collect();
        turn_order.sort_by_key(|&id| {
            let initiative = roster
                .iter()
                .find(|c| c.id == id)
                .map(|c| c.initiative)
                .unwrap_or(i32::MIN);
            (std::cmp::Reverse(initiative), id)
        });

        Ok(CombatSession {
            phase: CombatPhase::Active,
            seed: setup.seed,
            roster,
            defeated: Vec::new(),
            turn_order,
            round: 1,
            turn_index: 0,
            flee_attempts: 0,
            nonce: 0,
            distance,
            log: Vec::new(),
        })
    }

    /// Resolves one action for the combatant whose turn it is.
    ///
    /// Rejections leave the session untouched. After a successful
    /// resolution the acting side's cooldowns and status timers tick,
    /// dead combatants leave roster and turn order, termination is
    /// evaluated, and the turn advances (wrapping into a new round with
    /// stamina regeneration).
    pub fn process_action(
        &mut self,
        actor: CombatantId,
        action: CombatAction,
        env: &CombatEnv<'_>,
    ) -> Result<ActionReport, ActionError> {
        if !self.session.is_active() {
            return Err(ActionError::NotActive);
        }
        if self.session.combatant(actor).is_none() {
            return Err(ActionError::UnknownCombatant(actor));
        }
        if self.session.current_actor() != Some(actor) {
            return Err(ActionError::OutOfTurn(actor));
        }

        let detail = match action {
            CombatAction::Attack { target } => self.resolve_attack(actor, target, env)?,
            CombatAction::UseAbility { ability, target } => {
                self.resolve_ability(actor, ability, target, env)?
            }
            CombatAction::Move { direction, target } => {
                self.resolve_move(actor, direction, target, env)?
            }
            CombatAction::UseItem { item, target } => {
                self.resolve_item(actor, item, target, env)?
            }
            CombatAction::Defend => self.resolve_defend(actor, env)?,
            CombatAction::Flee => self.resolve_flee(actor, env)?,
        };

        self.session.nonce += 1;
        let acted_round = self.session.round;

        // A successful escape ends the encounter immediately; no upkeep,
        // no turn consumption.
        if let ActionDetail::Flee { success: true, .. } = detail {
            self.session.phase = CombatPhase::Ended(Outcome::Fled);
            self.push_record(acted_round, actor, detail.clone());
            return Ok(ActionReport {
                actor,
                detail,
                defeated: Vec::new(),
                termination: Some(Outcome::Fled),
            });
        }

        // Acting-side upkeep: cooldowns and status timers.
        let round = self.session.round;
        if let Some(state) = self.session.combatant_mut(actor) {
            state.tick_cooldowns();
            let tick = state.statuses.tick(round);
            state.health.deplete(tick.damage);
            state.health.restore(tick.healing);
        }

        let (defeated, actor_survived) = self.cull_dead(actor);
        let termination = self.evaluate_termination();

        if termination.is_none() {
            self.advance_turn(actor_survived, env)?;
        }

        self.push_record(acted_round, actor, detail.clone());
        Ok(ActionReport {
            actor,
            detail,
            defeated,
            termination,
        })
    }

    /// Tears the session down: clears roster, turn order, and the
    /// distance model. Returns the accumulated action log.
    ///
    /// A session still active when torn down ends as a timeout.
    pub fn end_combat(&mut self) -> Vec<ActionRecord> {
        if self.session.is_active() {
            self.session.phase = CombatPhase::Ended(Outcome::Timeout);
        }
        self.session.roster.clear();
        self.session.turn_order.clear();
        self.session.distance.clear();
        std::mem::take(&mut self.session.log)
    }

    fn push_record(&mut self, round: u32, actor: CombatantId, detail: ActionDetail) {
        self.session.log.push(ActionRecord {
            round,
            actor,
            detail,
        });
    }

    /// Moves zero-HP combatants from roster to the defeated pile and
    /// filters them out of the turn order, keeping the turn index
    /// pointing at the same upcoming combatant.
    ///
    /// Returns the removed ids and whether the acting combatant
    /// survived its own upkeep.
    fn cull_dead(&mut self, actor: CombatantId) -> (Vec<CombatantId>, bool) {
        let dead: Vec<CombatantId> = self
            .session
            .roster
            .iter()
            .filter(|c| !c.is_alive())
            .map(|c| c.id)
            .collect();

        if dead.is_empty() {
            return (dead, true);
        }
        let actor_survived = !dead.contains(&actor);

        let removed_before = self.session.turn_order[..self.session.turn_index]
            .iter()
            .filter(|id| dead.contains(id))
            .count();

        for id in &dead {
            if let Some(pos) = self.session.roster.iter().position(|c| c.id == *id) {
                let state = self.session.roster.remove(pos);
                self.session.defeated.push(state);
            }
            // The reference keeps its entry until teardown; everyone
            // else leaves the distance model with the roster.
            let _ = self.session.distance.remove_entity(*id);
        }

        self.session.turn_order.retain(|id| !dead.contains(id));
        self.session.turn_index -= removed_before;

        (dead, actor_survived)
    }

    /// Victory beats defeat when both teams empty on the same action.
    fn evaluate_termination(&mut self) -> Option<Outcome> {
        let outcome = if self.session.living_count(Team::Enemies) == 0 {
            Outcome::Victory
        } else if self.session.living_count(Team::Allies) == 0 {
            Outcome::Defeat
        } else {
            return None;
        };
        self.session.phase = CombatPhase::Ended(outcome);
        Some(outcome)
    }

    /// Advances the turn index; wrapping starts a new round and
    /// regenerates stamina for every survivor.
    fn advance_turn(&mut self, actor_survived: bool, env: &CombatEnv<'_>) -> Result<(), ActionError> {
        if actor_survived {
            self.session.turn_index += 1;
        }
        if self.session.turn_index >= self.session.turn_order.len() {
            self.session.turn_index = 0;
            self.session.round += 1;

            let regen = env.tables()?.balance().stamina.regen_per_round;
            for combatant in self.session.roster.iter_mut() {
                if combatant.is_alive() {
                    combatant.stamina.restore(regen);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{BalanceTables, PcgRng, RngOracle};
    use crate::policy::Archetype;
    use crate::state::{
        Attributes, CombatantState, ResourceMeter, StatusEffects, WeaponProfile,
    };
    use arrayvec::ArrayVec;

    /// Oracle returning a fixed raw value; lets tests force roll
    /// outcomes (99 → every d100 reads 100, the worst possible roll).
    struct FixedRng(u32);

    impl RngOracle for FixedRng {
        fn next_u32(&self, _seed: u64) -> u32 {
            self.0
        }
    }

    fn combatant(id: u32, team: Team, hp: u32) -> CombatantState {
        CombatantState {
            id: CombatantId(id),
            name: format!("c{}", id),
            team,
            player_controlled: team == Team::Allies,
            archetype: Archetype::Balanced,
            aggression: 0,
            initiative: 0,
            health: ResourceMeter::full(hp),
            stamina: ResourceMeter::full(50),
            resource: ResourceMeter::full(20),
            attributes: Attributes::default(),
            weapon: WeaponProfile {
                name: "shortsword".to_owned(),
                damage: 6,
                range: RangeBand::Melee,
                damage_type: crate::state::DamageType::Physical,
            },
            abilities: ArrayVec::new(),
            inventory: ArrayVec::new(),
            statuses: StatusEffects::empty(),
        }
    }

    fn duel_setup(enemy_band: RangeBand) -> EncounterSetup {
        let mut player = combatant(0, Team::Allies, 100);
        player.attributes.attack_bonus = 3;
        // Guarantee the player wins initiative.
        player.attributes.initiative = 100;
        EncounterSetup {
            seed: 42,
            combatants: vec![
                CombatantSetup {
                    state: player,
                    starting_band: None,
                },
                CombatantSetup {
                    state: combatant(100, Team::Enemies, 20),
                    starting_band: Some(enemy_band),
                },
            ],
        }
    }

    fn env<'a>(tables: &'a BalanceTables, rng: &'a dyn RngOracle) -> CombatEnv<'a> {
        CombatEnv::new(Some(tables), None, None, None, Some(rng))
    }

    #[test]
    fn repeated_attacks_reach_victory_within_bounded_rounds() {
        let tables = BalanceTables::default();
        let rng = PcgRng;
        let env = env(&tables, &rng);

        let mut session =
            CombatEngine::start_combat(duel_setup(RangeBand::Melee), &env).unwrap();
        let mut engine = CombatEngine::new(&mut session);

        let mut outcome = None;
        for _ in 0..100 {
            let actor = engine.session.current_actor().expect("active session");
            let action = if actor.is_player() {
                CombatAction::Attack {
                    target: CombatantId(100),
                }
            } else {
                CombatAction::Defend
            };
            let report = engine.process_action(actor, action, &env).unwrap();
            if let Some(o) = report.termination {
                outcome = Some(o);
                break;
            }
        }

        assert_eq!(outcome, Some(Outcome::Victory));
        assert!(session.round <= 20, "victory took {} rounds", session.round);
        assert_eq!(session.defeated.len(), 1);
        assert_eq!(session.defeated[0].id, CombatantId(100));
    }

    #[test]
    fn melee_attack_at_long_range_is_rejected_without_mutation() {
        let tables = BalanceTables::default();
        let rng = PcgRng;
        let env = env(&tables, &rng);

        let mut session =
            CombatEngine::start_combat(duel_setup(RangeBand::Long), &env).unwrap();
        let before = session.clone();
        let mut engine = CombatEngine::new(&mut session);

        let result = engine.process_action(
            CombatantId::PLAYER,
            CombatAction::Attack {
                target: CombatantId(100),
            },
            &env,
        );
        assert_eq!(
            result,
            Err(ActionError::OutOfRange {
                required: RangeBand::Melee,
                actual: RangeBand::Long,
            })
        );

        assert_eq!(session.round, before.round);
        assert_eq!(session.turn_index, before.turn_index);
        assert_eq!(session.nonce, before.nonce);
        assert_eq!(
            session.combatant(CombatantId(100)).unwrap().health,
            before.combatant(CombatantId(100)).unwrap().health
        );
        assert!(session.log.is_empty());
    }

    #[test]
    fn move_with_empty_stamina_is_rejected_with_band_unchanged() {
        let tables = BalanceTables::default();
        let rng = PcgRng;
        let env = env(&tables, &rng);

        let mut session =
            CombatEngine::start_combat(duel_setup(RangeBand::Medium), &env).unwrap();
        session
            .combatant_mut(CombatantId::PLAYER)
            .unwrap()
            .stamina = ResourceMeter::new(0, 50);
        let mut engine = CombatEngine::new(&mut session);

        let result = engine.process_action(
            CombatantId::PLAYER,
            CombatAction::Move {
                direction: crate::distance::MoveDirection::Closer,
                target: Some(CombatantId(100)),
            },
            &env,
        );
        assert_eq!(
            result,
            Err(ActionError::InsufficientStamina {
                needed: 10,
                available: 0,
            })
        );
        assert_eq!(
            session
                .distance
                .distance_between(CombatantId::PLAYER, CombatantId(100))
                .unwrap(),
            RangeBand::Medium
        );
    }

    #[test]
    fn fourth_flee_attempt_is_rejected_not_failed() {
        let tables = BalanceTables::default();
        // Worst roll every time: all permitted flee attempts fail.
        let rng = FixedRng(99);
        let env = env(&tables, &rng);

        let mut session =
            CombatEngine::start_combat(duel_setup(RangeBand::Melee), &env).unwrap();
        let mut engine = CombatEngine::new(&mut session);

        for attempt in 0..3 {
            let report = engine
                .process_action(CombatantId::PLAYER, CombatAction::Flee, &env)
                .unwrap_or_else(|e| panic!("attempt {} rejected: {}", attempt, e));
            assert!(matches!(
                report.detail,
                ActionDetail::Flee { success: false, .. }
            ));
            // Enemy turn passes between attempts.
            engine
                .process_action(CombatantId(100), CombatAction::Defend, &env)
                .unwrap();
        }

        let result = engine.process_action(CombatantId::PLAYER, CombatAction::Flee, &env);
        assert_eq!(result, Err(ActionError::FleeExhausted));
        assert!(session.is_active());
    }

    #[test]
    fn flee_is_player_side_only() {
        let tables = BalanceTables::default();
        let rng = PcgRng;
        let env = env(&tables, &rng);

        let mut session =
            CombatEngine::start_combat(duel_setup(RangeBand::Melee), &env).unwrap();
        let mut engine = CombatEngine::new(&mut session);

        engine
            .process_action(CombatantId::PLAYER, CombatAction::Defend, &env)
            .unwrap();
        let result = engine.process_action(CombatantId(100), CombatAction::Flee, &env);
        assert_eq!(result, Err(ActionError::FleeNotAllowed));
    }

    #[test]
    fn turn_order_drops_the_dead_and_termination_is_exclusive() {
        let tables = BalanceTables::default();
        let rng = PcgRng;
        let env = env(&tables, &rng);

        let mut player = combatant(0, Team::Allies, 100);
        player.attributes.initiative = 100;
        player.weapon.damage = 500;
        player.attributes.attack_bonus = 10;

        let setup = EncounterSetup {
            seed: 7,
            combatants: vec![
                CombatantSetup {
                    state: player,
                    starting_band: None,
                },
                CombatantSetup {
                    state: combatant(100, Team::Enemies, 10),
                    starting_band: Some(RangeBand::Melee),
                },
                CombatantSetup {
                    state: combatant(101, Team::Enemies, 10),
                    starting_band: Some(RangeBand::Melee),
                },
            ],
        };
        let mut session = CombatEngine::start_combat(setup, &env).unwrap();
        let mut engine = CombatEngine::new(&mut session);

        // Overwhelming damage: first kill cannot terminate (a second
        // enemy lives), second kill must be a victory and never a defeat.
        let mut killed = 0;
        for _ in 0..50 {
            let actor = engine.session.current_actor().unwrap();
            let action = if actor.is_player() {
                let target = engine
                    .session
                    .living_on(Team::Enemies)
                    .next()
                    .map(|e| e.id)
                    .unwrap();
                CombatAction::Attack { target }
            } else {
                CombatAction::Defend
            };
            let report = engine.process_action(actor, action, &env).unwrap();

            killed += report.defeated.len();
            for dead in &report.defeated {
                assert!(!engine.session.turn_order.contains(dead));
            }
            if let Some(outcome) = report.termination {
                assert_eq!(outcome, Outcome::Victory);
                assert_eq!(killed, 2);
                return;
            }
        }
        panic!("encounter did not terminate");
    }

    #[test]
    fn out_of_turn_and_inactive_actions_are_rejected() {
        let tables = BalanceTables::default();
        let rng = PcgRng;
        let env = env(&tables, &rng);

        let mut session =
            CombatEngine::start_combat(duel_setup(RangeBand::Melee), &env).unwrap();
        let mut engine = CombatEngine::new(&mut session);

        // Enemy acting on the player's turn.
        let result = engine.process_action(CombatantId(100), CombatAction::Defend, &env);
        assert_eq!(result, Err(ActionError::OutOfTurn(CombatantId(100))));

        engine.end_combat();
        let result = engine.process_action(CombatantId::PLAYER, CombatAction::Defend, &env);
        assert_eq!(result, Err(ActionError::NotActive));
    }

    #[test]
    fn round_wrap_regenerates_stamina() {
        let tables = BalanceTables::default();
        let rng = PcgRng;
        let env = env(&tables, &rng);

        let mut session =
            CombatEngine::start_combat(duel_setup(RangeBand::Melee), &env).unwrap();
        session
            .combatant_mut(CombatantId::PLAYER)
            .unwrap()
            .stamina = ResourceMeter::new(20, 50);
        let mut engine = CombatEngine::new(&mut session);

        engine
            .process_action(CombatantId::PLAYER, CombatAction::Defend, &env)
            .unwrap();
        assert_eq!(engine.session.round, 1);
        engine
            .process_action(CombatantId(100), CombatAction::Defend, &env)
            .unwrap();
        assert_eq!(engine.session.round, 2);
        assert_eq!(
            engine
                .session
                .combatant(CombatantId::PLAYER)
                .unwrap()
                .stamina
                .current,
            25
        );
    }
}
