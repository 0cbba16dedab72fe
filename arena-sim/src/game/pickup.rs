//! Pickup Consumption
//!
//! Only the controlled character collects pickups. A pickup is consumed on
//! overlap even if it restores nothing (full health or full ammo).
//!
//! A character brought to zero health earlier in the tick collects
//! nothing; cleanup ends the match and the pickup stays on the map.

use tracing::debug;

use crate::game::collision::overlaps;
use crate::game::events::{GameEvent, GameEventData};
use crate::game::state::{MatchState, PickupKind};

/// Apply and remove every pickup the controlled character overlaps.
///
/// Returns the number consumed.
pub fn collect_pickups(state: &mut MatchState, now_ms: u64) -> usize {
    let Some(player) = state.player.as_mut().filter(|p| p.is_alive()) else {
        return 0;
    };

    let mut collected = Vec::new();
    for (index, pickup) in state.pickups.iter().enumerate() {
        if !overlaps(&player.body, &pickup.body) {
            continue;
        }
        match pickup.kind {
            PickupKind::Health => player.heal(pickup.value as f32),
            PickupKind::Ammo => player.refill_ammo(pickup.value),
        }
        collected.push((index, pickup.body.id, pickup.kind, pickup.value));
    }

    let tick = state.tick;
    for (index, id, kind, value) in &collected {
        state.pickups.mark(*index);
        state.push_event(GameEvent::new(
            tick,
            now_ms,
            GameEventData::PickupCollected {
                pickup: *id,
                kind: *kind,
                value: *value,
            },
        ));
        debug!(pickup = %id, ?kind, value, "Pickup collected");
    }

    state.pickups.compact().len()
}
