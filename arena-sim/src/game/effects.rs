//! Visual Effects Lifecycle
//!
//! Emitters for impact bursts, dash trails and muzzle flashes, and the
//! per-tick decay that retires them. Nothing here feeds back into gameplay.

use glam::Vec2;

use crate::config::EffectTuning;
use crate::game::entity::Body;
use crate::game::state::{MatchState, MuzzleFlash, Particle, ParticleKind};

/// Burst of particles flying out from `position` in random directions.
pub fn spawn_impact(state: &mut MatchState, position: Vec2, kind: ParticleKind, tuning: &EffectTuning) {
    for _ in 0..tuning.impact_particles {
        let angle = state.rng.next_angle();
        let speed = state.rng.next_range(tuning.impact_speed.0, tuning.impact_speed.1);
        let size = state.rng.next_range(tuning.impact_size.0, tuning.impact_size.1);
        let id = state.next_entity_id();

        state.particles.push(Particle {
            body: Body::new(id, position, size),
            velocity: Vec2::from_angle(angle) * speed,
            life: tuning.impact_life,
            max_life: tuning.impact_life,
            kind,
        });
    }
}

/// Stationary ghost the size of the dashing character.
pub fn spawn_dash_trail(state: &mut MatchState, position: Vec2, size: f32, tuning: &EffectTuning) {
    let id = state.next_entity_id();
    state.particles.push(Particle {
        body: Body::new(id, position, size),
        velocity: Vec2::ZERO,
        life: tuning.dash_trail_life,
        max_life: tuning.dash_trail_life,
        kind: ParticleKind::DashTrail,
    });
}

/// Flash at the shooter's position pointing along the shot.
pub fn spawn_muzzle_flash(state: &mut MatchState, position: Vec2, angle: f32, tuning: &EffectTuning) {
    let id = state.next_entity_id();
    state.muzzle_flashes.push(MuzzleFlash {
        body: Body::new(id, position, tuning.muzzle_flash_size),
        angle,
        life: tuning.muzzle_flash_life,
        max_life: tuning.muzzle_flash_life,
    });
}

/// Age every particle and muzzle flash by `dt` frame units.
///
/// Particles drift by a damped share of their velocity. Anything at
/// lifetime ≤ 0 is marked; removal happens at the end of the tick.
pub fn decay(state: &mut MatchState, dt: f32, tuning: &EffectTuning) {
    let loss = tuning.decay_per_frame * dt;

    for particle in state.particles.iter_mut() {
        particle.life -= loss;
        particle.body.position += particle.velocity * dt * tuning.particle_drift;
    }
    state.particles.mark_where(|p| p.life <= 0.0);

    for flash in state.muzzle_flashes.iter_mut() {
        flash.life -= loss;
    }
    state.muzzle_flashes.mark_where(|f| f.life <= 0.0);
}

/// Drop every marked particle and muzzle flash.
pub fn compact(state: &mut MatchState) {
    state.particles.compact();
    state.muzzle_flashes.compact();
}
