//! Per-action resolution rules.
//!
//! Each resolver validates everything it needs against the pre-action
//! session, then mutates. A resolver that returns an error has touched
//! nothing.

use crate::action::{ActionDetail, ActionError};
use crate::combat::{calculate_damage, check_hit, flee_chance, flee_permitted, resisted};
use crate::distance::{DistanceError, MoveDirection};
use crate::env::{AbilityEffect, AbilityRange, CombatEnv, ItemEffect, compute_seed, roll};
use crate::state::{AbilityId, CombatantId, ItemId};
use crate::state::status::StatusKind;

use super::CombatEngine;

impl CombatEngine<'_> {
    pub(super) fn resolve_attack(
        &mut self,
        actor: CombatantId,
        target: CombatantId,
        env: &CombatEnv<'_>,
    ) -> Result<ActionDetail, ActionError> {
        let rng = env.rng()?;
        let tables = env.tables()?;

        let target_state = self
            .session
            .combatant(target)
            .filter(|c| c.is_alive() && c.id != actor)
            .ok_or(ActionError::UnknownTarget(target))?;
        let actor_state = self
            .session
            .combatant(actor)
            .ok_or(ActionError::UnknownCombatant(actor))?;

        let required = actor_state.weapon.range;
        let actual = self
            .session
            .distance
            .distance_between(actor, target)
            .map_err(|_| ActionError::UnknownTarget(target))?;
        if actual > required {
            return Err(ActionError::OutOfRange { required, actual });
        }

        let attack = actor_state.effective_attack();
        let defense = target_state.effective_defense();
        let dodge = target_state.attributes.dodge;
        let weapon_damage = actor_state.weapon.damage;
        let damage_type = actor_state.weapon.damage_type;
        let resistances = target_state.attributes.resistances;

        let hit_seed = compute_seed(self.session.seed, self.session.nonce, actor.0, roll::HIT);
        let hit = check_hit(attack, defense, dodge, rng.roll_d100(hit_seed), tables);

        let (critical, damage) = if hit {
            let crit_seed =
                compute_seed(self.session.seed, self.session.nonce, actor.0, roll::CRIT);
            let critical = rng.roll_d100(crit_seed) <= tables.balance().damage.crit_chance;
            let damage = calculate_damage(
                weapon_damage,
                attack,
                damage_type,
                &resistances,
                critical,
                tables,
            );
            (critical, damage)
        } else {
            (false, 0)
        };

        if damage > 0 {
            if let Some(state) = self.session.combatant_mut(target) {
                state.health.deplete(damage);
            }
        }

        Ok(ActionDetail::Attack {
            target,
            hit,
            critical,
            damage,
        })
    }

    pub(super) fn resolve_ability(
        &mut self,
        actor: CombatantId,
        ability: AbilityId,
        target: Option<CombatantId>,
        env: &CombatEnv<'_>,
    ) -> Result<ActionDetail, ActionError> {
        let tables = env.tables()?;
        let def = env
            .abilities()?
            .definition(ability)
            .ok_or(ActionError::UnknownAbility(ability))?;

        let actor_state = self
            .session
            .combatant(actor)
            .ok_or(ActionError::UnknownCombatant(actor))?;

        if !actor_state.abilities.iter().any(|s| s.id == ability) {
            return Err(ActionError::UnknownAbility(ability));
        }
        if !actor_state.ability_ready(ability) {
            return Err(ActionError::CooldownActive(ability));
        }
        if !actor_state.resource.can_spend(def.cost) {
            return Err(ActionError::InsufficientResource {
                needed: def.cost,
                available: actor_state.resource.current,
            });
        }

        let target = target.unwrap_or(actor);
        let target_state = self
            .session
            .combatant(target)
            .filter(|c| c.is_alive())
            .ok_or(ActionError::UnknownTarget(target))?;

        if target != actor {
            if let AbilityRange::Band(required) = def.range {
                let actual = self
                    .session
                    .distance
                    .distance_between(actor, target)
                    .map_err(|_| ActionError::UnknownTarget(target))?;
                if actual > required {
                    return Err(ActionError::OutOfRange { required, actual });
                }
            }
        }

        let resistances = target_state.attributes.resistances;
        let minimum = tables.balance().damage.minimum;
        let round = self.session.round;

        // All checks passed; mutate.
        let mut damage_total = 0;
        let mut healing_total = 0;
        if let Some(state) = self.session.combatant_mut(target) {
            for effect in &def.effects {
                match *effect {
                    AbilityEffect::Damage {
                        amount,
                        damage_type,
                    } => {
                        let dealt = resisted(amount, damage_type, &resistances, minimum);
                        state.health.deplete(dealt);
                        damage_total += dealt;
                    }
                    AbilityEffect::Heal { amount } => {
                        state.health.restore(amount);
                        healing_total += amount;
                    }
                    AbilityEffect::Status {
                        kind,
                        magnitude,
                        rounds,
                    } => {
                        state.statuses.add(kind, magnitude, rounds, round);
                    }
                }
            }
        }
        if let Some(state) = self.session.combatant_mut(actor) {
            state.resource.deplete(def.cost);
            state.set_ability_cooldown(ability, def.cooldown);
        }

        Ok(ActionDetail::Ability {
            ability,
            target,
            damage: damage_total,
            healing: healing_total,
        })
    }

    pub(super) fn resolve_move(
        &mut self,
        actor: CombatantId,
        direction: MoveDirection,
        target: Option<CombatantId>,
        env: &CombatEnv<'_>,
    ) -> Result<ActionDetail, ActionError> {
        let cost = env.tables()?.balance().stamina.move_cost;

        let actor_state = self
            .session
            .combatant(actor)
            .ok_or(ActionError::UnknownCombatant(actor))?;
        if !actor_state.stamina.can_spend(cost) {
            return Err(ActionError::InsufficientStamina {
                needed: cost,
                available: actor_state.stamina.current,
            });
        }

        // The reference cannot shift its own band; closing with one
        // opponent means shifting that opponent's entry instead.
        let subject = if self.session.distance.reference() == Some(actor) {
            let subject = target.ok_or(ActionError::MoveNeedsTarget)?;
            self.session
                .combatant(subject)
                .filter(|c| c.is_alive())
                .ok_or(ActionError::UnknownTarget(subject))?;
            subject
        } else {
            actor
        };

        let band = self
            .session
            .distance
            .shift(subject, direction)
            .map_err(|e| match e {
                DistanceError::AtBoundary { .. } => ActionError::MoveBlocked(direction),
                DistanceError::Untracked(id) | DistanceError::ReferenceInUse(id) => {
                    ActionError::UnknownTarget(id)
                }
                DistanceError::NoReference => ActionError::NotActive,
            })?;

        if let Some(state) = self.session.combatant_mut(actor) {
            state.stamina.deplete(cost);
        }

        Ok(ActionDetail::Move {
            direction,
            subject,
            band,
        })
    }

    pub(super) fn resolve_item(
        &mut self,
        actor: CombatantId,
        item: ItemId,
        target: Option<CombatantId>,
        env: &CombatEnv<'_>,
    ) -> Result<ActionDetail, ActionError> {
        let def = env
            .items()?
            .definition(item)
            .filter(|d| d.consumable)
            .ok_or(ActionError::ItemNotUsable(item))?;

        let actor_state = self
            .session
            .combatant(actor)
            .ok_or(ActionError::UnknownCombatant(actor))?;
        if actor_state.inventory_slot(item).is_none() {
            return Err(ActionError::ItemNotUsable(item));
        }

        let target = target.unwrap_or(actor);
        self.session
            .combatant(target)
            .filter(|c| c.is_alive())
            .ok_or(ActionError::UnknownTarget(target))?;

        let round = self.session.round;

        if let Some(state) = self.session.combatant_mut(actor) {
            state.consume_item(item);
        }
        if let Some(state) = self.session.combatant_mut(target) {
            for effect in &def.effects {
                match *effect {
                    ItemEffect::RestoreHealth(amount) => state.health.restore(amount),
                    ItemEffect::RestoreStamina(amount) => state.stamina.restore(amount),
                    ItemEffect::RestoreResource(amount) => state.resource.restore(amount),
                    ItemEffect::Status {
                        kind,
                        magnitude,
                        rounds,
                    } => state.statuses.add(kind, magnitude, rounds, round),
                }
            }
        }

        Ok(ActionDetail::Item { item, target })
    }

    pub(super) fn resolve_defend(
        &mut self,
        actor: CombatantId,
        env: &CombatEnv<'_>,
    ) -> Result<ActionDetail, ActionError> {
        let bonus = env.tables()?.balance().defend.defense_bonus;
        let round = self.session.round;

        let state = self
            .session
            .combatant_mut(actor)
            .ok_or(ActionError::UnknownCombatant(actor))?;
        state
            .statuses
            .add(StatusKind::DefenseUp, bonus, 1, round);

        Ok(ActionDetail::Defend)
    }

    pub(super) fn resolve_flee(
        &mut self,
        actor: CombatantId,
        env: &CombatEnv<'_>,
    ) -> Result<ActionDetail, ActionError> {
        let rng = env.rng()?;
        let tables = env.tables()?;

        let actor_state = self
            .session
            .combatant(actor)
            .ok_or(ActionError::UnknownCombatant(actor))?;
        if !actor_state.player_controlled {
            return Err(ActionError::FleeNotAllowed);
        }
        if !flee_permitted(self.session.flee_attempts, tables) {
            return Err(ActionError::FleeExhausted);
        }

        let chance = flee_chance(self.session.flee_attempts, tables);
        let seed = compute_seed(self.session.seed, self.session.nonce, actor.0, roll::FLEE);
        let success = rng.roll_d100(seed) <= chance;

        if !success {
            self.session.flee_attempts += 1;
        }

        Ok(ActionDetail::Flee { success, chance })
    }
}
