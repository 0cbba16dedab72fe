//! Opponent AI
//!
//! Each opponent chases the controlled character, turns to face it, and
//! fires when it is in range and its shot cooldown has elapsed. There is no
//! other behaviour: no cover, no dodging, no target switching.

use glam::Vec2;

use crate::config::SimConfig;
use crate::game::combat;
use crate::game::input::FrameClock;
use crate::game::motion::{pursuit_intent, step_character, Surroundings};
use crate::game::state::{Character, MatchState};

/// Has more than `cooldown_ms` passed since the last shot?
#[inline]
pub fn shot_ready(last_shot_at: Option<u64>, now_ms: u64, cooldown_ms: u64) -> bool {
    match last_shot_at {
        Some(at) => now_ms.saturating_sub(at) > cooldown_ms,
        None => true,
    }
}

/// Face `target` and decide whether to shoot at it.
pub fn aim_and_decide(bot: &mut Character, target: Vec2, now_ms: u64, config: &SimConfig) -> bool {
    let offset = target - bot.position();
    bot.facing = offset.y.atan2(offset.x);
    offset.length() < config.bots.shoot_range
        && shot_ready(bot.last_shot_at, now_ms, config.bots.shoot_cooldown_ms)
}

/// Move every opponent toward the controlled character, then let it shoot.
///
/// Does nothing when the controlled character is gone. The target position
/// is read once, after the controlled character has moved this tick.
pub fn update_bots(state: &mut MatchState, clock: &FrameClock, config: &SimConfig) {
    let Some(target) = state.player_position() else {
        return;
    };

    for index in 0..state.bots.len() {
        let decision = {
            let env = Surroundings::new(
                &state.obstacles,
                &state.energy_zones,
                &state.terrain_patches,
                state.theme.hazard.as_ref(),
                state.map_size,
            );
            let Some(bot) = state.bots.get_mut(index) else {
                continue;
            };
            let intent = pursuit_intent(bot, target);
            step_character(bot, intent, &env, clock, config);

            aim_and_decide(bot, target, clock.now_ms, config).then_some(bot.body.id)
        };

        if let Some(shooter) = decision {
            combat::issue_shot(state, shooter, target, clock.now_ms, config);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entity::EntityId;

    fn bot_at(x: f32, y: f32) -> Character {
        Character::bot(EntityId(4), "Robo_Hunter", Vec2::new(x, y), &SimConfig::default())
    }

    #[test]
    fn test_shot_ready_is_strict() {
        assert!(shot_ready(None, 0, 1500));
        assert!(!shot_ready(Some(1000), 2500, 1500));
        assert!(shot_ready(Some(1000), 2501, 1500));
    }

    #[test]
    fn test_faces_target() {
        let config = SimConfig::default();
        let mut bot = bot_at(100.0, 100.0);
        aim_and_decide(&mut bot, Vec2::new(100.0, 200.0), 0, &config);
        assert!((bot.facing - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_range_gate() {
        let config = SimConfig::default();
        let mut bot = bot_at(0.0, 0.0);
        assert!(!aim_and_decide(&mut bot, Vec2::new(600.0, 0.0), 0, &config));
        assert!(aim_and_decide(&mut bot, Vec2::new(599.0, 0.0), 0, &config));
    }

    #[test]
    fn test_cooldown_gate() {
        let config = SimConfig::default();
        let mut bot = bot_at(0.0, 0.0);
        bot.last_shot_at = Some(10_000);
        assert!(!aim_and_decide(&mut bot, Vec2::new(100.0, 0.0), 11_000, &config));
        assert!(aim_and_decide(&mut bot, Vec2::new(100.0, 0.0), 11_501, &config));
    }
}
