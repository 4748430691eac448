//! One decision routine per archetype.

use crate::action::CombatAction;
use crate::distance::{MoveDirection, RangeBand};
use crate::env::{AbilityDef, CombatEnv, compute_seed, roll};
use crate::state::{CombatSession, CombatantId, CombatantState};

use super::{Archetype, Situation};

/// HP percentage below which a coward breaks.
const COWARD_HP_THRESHOLD: u32 = 40;

/// Decide one action for a combatant.
///
/// Never fails: when nothing better is available (missing oracles, no
/// reachable targets, empty stamina), the decision degrades to Defend.
pub fn decide(
    actor: &CombatantState,
    session: &CombatSession,
    env: &CombatEnv<'_>,
) -> CombatAction {
    let situation = Situation::observe(actor, session);
    match actor.archetype {
        Archetype::Aggressive => aggressive(actor, session, env, &situation),
        Archetype::Defensive => defensive(actor, session, env, &situation),
        Archetype::Balanced => balanced(actor, session, env, &situation),
        Archetype::Support => support(actor, session, env, &situation),
        Archetype::Coward => coward(actor, session, env, &situation),
    }
}

fn aggressive(
    actor: &CombatantState,
    session: &CombatSession,
    env: &CombatEnv<'_>,
    situation: &Situation,
) -> CombatAction {
    if let Some(action) = heal_action(actor, env, situation) {
        return action;
    }
    if gate_passes(actor, session, env) {
        if let Some(action) = ability_action(actor, session, env, true) {
            return action;
        }
    }
    let Some(target) = enemy_lowest_hp(actor, session) else {
        return CombatAction::Defend;
    };
    // Close to melee before anything else.
    if band_to(actor, session, target).is_some_and(|b| b > RangeBand::Melee) {
        if let Some(action) = step(actor, session, env, MoveDirection::Closer, target) {
            return action;
        }
    }
    attack_or_hold(actor, session, env, target)
}

fn defensive(
    actor: &CombatantState,
    session: &CombatSession,
    env: &CombatEnv<'_>,
    situation: &Situation,
) -> CombatAction {
    if let Some(action) = heal_action(actor, env, situation) {
        return action;
    }
    if gate_passes(actor, session, env) {
        if let Some(action) = ability_action(actor, session, env, false) {
            return action;
        }
    }
    // Back out of melee when hurt.
    if situation.hp_percent < 50 {
        let melee_threat = session
            .living_on(actor.team.opposing())
            .any(|e| band_to(actor, session, e.id) == Some(RangeBand::Melee));
        if melee_threat {
            if let Some(target) = enemy_nearest(actor, session) {
                if let Some(action) = step(actor, session, env, MoveDirection::Farther, target) {
                    return action;
                }
            }
        }
    }
    let Some(target) = enemy_nearest(actor, session) else {
        return CombatAction::Defend;
    };
    attack_or_hold(actor, session, env, target)
}

fn balanced(
    actor: &CombatantState,
    session: &CombatSession,
    env: &CombatEnv<'_>,
    situation: &Situation,
) -> CombatAction {
    if let Some(action) = heal_action(actor, env, situation) {
        return action;
    }
    if gate_passes(actor, session, env) {
        if let Some(action) = ability_action(actor, session, env, false) {
            return action;
        }
    }
    let Some(target) = enemy_random(actor, session, env) else {
        return CombatAction::Defend;
    };
    // Seek the band the equipped weapon was made for.
    if let Some(band) = band_to(actor, session, target) {
        let preferred = actor.weapon.range;
        let direction = if band > preferred {
            Some(MoveDirection::Closer)
        } else if band < preferred {
            Some(MoveDirection::Farther)
        } else {
            None
        };
        if let Some(direction) = direction {
            if let Some(action) = step(actor, session, env, direction, target) {
                return action;
            }
        }
    }
    attack_or_hold(actor, session, env, target)
}

fn support(
    actor: &CombatantState,
    session: &CombatSession,
    env: &CombatEnv<'_>,
    situation: &Situation,
) -> CombatAction {
    if let Some(action) = heal_action(actor, env, situation) {
        return action;
    }
    if gate_passes(actor, session, env) {
        if let Some(action) = ability_action(actor, session, env, false) {
            return action;
        }
    }
    let Some(target) = enemy_random(actor, session, env) else {
        return CombatAction::Defend;
    };
    attack_or_hold(actor, session, env, target)
}

fn coward(
    actor: &CombatantState,
    session: &CombatSession,
    env: &CombatEnv<'_>,
    situation: &Situation,
) -> CombatAction {
    let breaking = situation.hp_percent < COWARD_HP_THRESHOLD || situation.outnumbered();
    if breaking {
        // Only the player side may actually flee the encounter; enemy
        // cowards fall back band by band instead.
        if actor.player_controlled {
            return CombatAction::Flee;
        }
        if let Some(target) = enemy_nearest(actor, session) {
            if let Some(action) = step(actor, session, env, MoveDirection::Farther, target) {
                return action;
            }
        }
    }
    if let Some(action) = heal_action(actor, env, situation) {
        return action;
    }
    if gate_passes(actor, session, env) {
        if let Some(action) = ability_action(actor, session, env, false) {
            return action;
        }
    }
    let Some(target) = enemy_nearest(actor, session) else {
        return CombatAction::Defend;
    };
    attack_or_hold(actor, session, env, target)
}

// ============================================================================
// Shared building blocks
// ============================================================================

/// Healing item first, healing ability second, else nothing.
fn heal_action(
    actor: &CombatantState,
    env: &CombatEnv<'_>,
    situation: &Situation,
) -> Option<CombatAction> {
    if situation.hp_percent >= actor.archetype.heal_threshold() {
        return None;
    }

    if let Ok(items) = env.items() {
        for slot in actor.inventory.iter() {
            if let Some(def) = items.definition(slot.item) {
                if def.consumable && def.is_healing() {
                    return Some(CombatAction::UseItem {
                        item: slot.item,
                        target: None,
                    });
                }
            }
        }
    }

    for def in usable_abilities(actor, env) {
        if def.is_healing() {
            return Some(CombatAction::UseAbility {
                ability: def.id,
                target: None,
            });
        }
    }

    None
}

/// Seeded roll against the archetype's ability-use gate, shifted by the
/// combatant's aggression flavor.
fn gate_passes(actor: &CombatantState, session: &CombatSession, env: &CombatEnv<'_>) -> bool {
    let Ok(rng) = env.rng() else {
        return false;
    };
    let gate = (actor.archetype.ability_gate() + actor.aggression).clamp(0, 100) as u32;
    let seed = compute_seed(session.seed, session.nonce, actor.id.0, roll::POLICY_GATE);
    rng.roll_d100(seed) <= gate
}

/// Pick a usable ability and a legal target for it.
fn ability_action(
    actor: &CombatantState,
    session: &CombatSession,
    env: &CombatEnv<'_>,
    prefer_offensive: bool,
) -> Option<CombatAction> {
    let mut candidates = usable_abilities(actor, env);
    if prefer_offensive {
        candidates.sort_by_key(|def| !def.is_offensive());
    }

    for def in candidates {
        if def.is_offensive() {
            let target = enemy_nearest(actor, session)?;
            let in_range = match def.range {
                crate::env::AbilityRange::Any => true,
                crate::env::AbilityRange::Band(required) => {
                    band_to(actor, session, target).is_some_and(|b| b <= required)
                }
            };
            if in_range {
                return Some(CombatAction::UseAbility {
                    ability: def.id,
                    target: Some(target),
                });
            }
        } else {
            return Some(CombatAction::UseAbility {
                ability: def.id,
                target: None,
            });
        }
    }
    None
}

/// Abilities that are known, off cooldown, and affordable right now.
fn usable_abilities(actor: &CombatantState, env: &CombatEnv<'_>) -> Vec<AbilityDef> {
    let Ok(abilities) = env.abilities() else {
        return Vec::new();
    };
    actor
        .abilities
        .iter()
        .filter(|slot| slot.is_ready())
        .filter_map(|slot| abilities.definition(slot.id))
        .filter(|def| actor.resource.can_spend(def.cost))
        .collect()
}

fn enemy_lowest_hp(actor: &CombatantState, session: &CombatSession) -> Option<CombatantId> {
    session
        .living_on(actor.team.opposing())
        .min_by_key(|e| (e.health.current, e.id))
        .map(|e| e.id)
}

fn enemy_nearest(actor: &CombatantState, session: &CombatSession) -> Option<CombatantId> {
    session
        .living_on(actor.team.opposing())
        .filter_map(|e| band_to(actor, session, e.id).map(|band| (band, e.id)))
        .min()
        .map(|(_, id)| id)
}

fn enemy_random(
    actor: &CombatantState,
    session: &CombatSession,
    env: &CombatEnv<'_>,
) -> Option<CombatantId> {
    let enemies: Vec<CombatantId> = session
        .living_on(actor.team.opposing())
        .map(|e| e.id)
        .collect();
    if enemies.is_empty() {
        return None;
    }
    let Ok(rng) = env.rng() else {
        return enemies.first().copied();
    };
    let seed = compute_seed(session.seed, session.nonce, actor.id.0, roll::POLICY_TARGET);
    let index = rng.next_u32(seed) as usize % enemies.len();
    enemies.get(index).copied()
}

fn band_to(
    actor: &CombatantState,
    session: &CombatSession,
    other: CombatantId,
) -> Option<RangeBand> {
    session.distance.distance_between(actor.id, other).ok()
}

/// A one-band step, if the actor can afford and execute it.
fn step(
    actor: &CombatantState,
    session: &CombatSession,
    env: &CombatEnv<'_>,
    direction: MoveDirection,
    target: CombatantId,
) -> Option<CombatAction> {
    let cost = env.tables().ok()?.balance().stamina.move_cost;
    if !actor.stamina.can_spend(cost) {
        return None;
    }

    // Moving as the reference shifts the target's entry; anyone else
    // shifts their own. Either way the subject must not sit on the
    // boundary already.
    let is_reference = session.distance.reference() == Some(actor.id);
    let subject_band = if is_reference {
        band_to(actor, session, target)?
    } else {
        session.distance.distance_between(actor.id, session.distance.reference()?).ok()?
    };
    let blocked = match direction {
        MoveDirection::Closer => subject_band == RangeBand::Melee,
        MoveDirection::Farther => subject_band == RangeBand::Long,
    };
    if blocked {
        return None;
    }

    Some(CombatAction::Move {
        direction,
        target: is_reference.then_some(target),
    })
}

/// Attack when the target is in weapon range; otherwise close in, and
/// failing that hold the line.
fn attack_or_hold(
    actor: &CombatantState,
    session: &CombatSession,
    env: &CombatEnv<'_>,
    target: CombatantId,
) -> CombatAction {
    let in_range = band_to(actor, session, target).is_some_and(|b| b <= actor.weapon.range);
    if in_range {
        return CombatAction::Attack { target };
    }
    step(actor, session, env, MoveDirection::Closer, target).unwrap_or(CombatAction::Defend)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{CombatEngine, CombatantSetup, EncounterSetup};
    use crate::env::{BalanceTables, PcgRng};
    use crate::state::{CombatantId, ResourceMeter, Team, WeaponProfile};
    use arrayvec::ArrayVec;

    fn combatant(id: u32, team: Team, archetype: Archetype) -> CombatantState {
        CombatantState {
            id: CombatantId(id),
            name: format!("c{}", id),
            team,
            player_controlled: team == Team::Allies,
            archetype,
            aggression: 0,
            initiative: 0,
            health: ResourceMeter::full(60),
            stamina: ResourceMeter::full(50),
            resource: ResourceMeter::full(20),
            attributes: Default::default(),
            weapon: WeaponProfile::unarmed(),
            abilities: ArrayVec::new(),
            inventory: ArrayVec::new(),
            statuses: crate::state::StatusEffects::empty(),
        }
    }

    fn session_with(enemy: CombatantState) -> crate::state::CombatSession {
        let tables = BalanceTables::default();
        let rng = PcgRng;
        let env = CombatEnv::new(Some(&tables), None, None, None, Some(&rng));
        CombatEngine::start_combat(
            EncounterSetup {
                seed: 11,
                combatants: vec![
                    CombatantSetup {
                        state: combatant(0, Team::Allies, Archetype::Balanced),
                        starting_band: None,
                    },
                    CombatantSetup {
                        state: enemy,
                        starting_band: Some(RangeBand::Melee),
                    },
                ],
            },
            &env,
        )
        .expect("session starts")
    }

    #[test]
    fn player_coward_flees_when_hurt() {
        let session = session_with(combatant(100, Team::Enemies, Archetype::Aggressive));
        let mut player = session.combatant(CombatantId::PLAYER).unwrap().clone();
        player.archetype = Archetype::Coward;
        player.health = ResourceMeter::new(10, 60);

        let tables = BalanceTables::default();
        let rng = PcgRng;
        let env = CombatEnv::new(Some(&tables), None, None, None, Some(&rng));
        assert_eq!(decide(&player, &session, &env), CombatAction::Flee);
    }

    #[test]
    fn enemy_coward_retreats_instead_of_fleeing() {
        let mut enemy = combatant(100, Team::Enemies, Archetype::Coward);
        enemy.health = ResourceMeter::new(10, 60);
        let session = session_with(enemy);
        let actor = session.combatant(CombatantId(100)).unwrap();

        let tables = BalanceTables::default();
        let rng = PcgRng;
        let env = CombatEnv::new(Some(&tables), None, None, None, Some(&rng));
        let action = decide(actor, &session, &env);
        assert_eq!(
            action,
            CombatAction::Move {
                direction: MoveDirection::Farther,
                target: None
            }
        );
    }

    #[test]
    fn aggressive_attacks_at_melee() {
        let session = session_with(combatant(100, Team::Enemies, Archetype::Aggressive));
        let actor = session.combatant(CombatantId(100)).unwrap();

        let tables = BalanceTables::default();
        let rng = PcgRng;
        let env = CombatEnv::new(Some(&tables), None, None, None, Some(&rng));
        assert_eq!(
            decide(actor, &session, &env),
            CombatAction::Attack {
                target: CombatantId::PLAYER
            }
        );
    }
}
