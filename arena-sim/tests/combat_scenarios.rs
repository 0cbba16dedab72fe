mod support;

use arena_sim::game::entity::{Body, EntityId};
use arena_sim::game::state::{Ammo, Projectile};
use arena_sim::{GameEventData, InputFrame};
use glam::Vec2;

use support::{arena_with, bot, opponents, rock, Driver, CENTER};

#[test]
fn opponent_hit_takes_five_and_flash_clears() {
    // 100 units away: in range, so the opponent fires on its first tick
    let content = opponents(vec![bot("Shadow_Striker", CENTER + Vec2::new(100.0, 0.0))]);
    let mut driver = Driver::new(arena_with(content));

    let ticks = driver.run_until(30, |arena| {
        arena.state().player.as_ref().is_some_and(|p| p.health < 100.0)
    });
    assert!(ticks.is_some(), "opponent projectile should reach the player");

    let hit_at = {
        let player = driver.arena.state().player.as_ref().unwrap();
        assert_eq!(player.health, 95.0);
        assert!(player.is_hit);
        player.hit_at.unwrap()
    };
    assert_eq!(hit_at, driver.now_ms);

    // Exactly the flash duration later the flag is still up
    driver.step_after(150, &InputFrame::idle());
    assert!(driver.arena.state().player.as_ref().unwrap().is_hit);

    driver.step_after(1, &InputFrame::idle());
    assert!(!driver.arena.state().player.as_ref().unwrap().is_hit);
}

#[test]
fn fire_with_empty_magazine_does_nothing() {
    let content = opponents(vec![bot("Far_Away", Vec2::new(100.0, 100.0))]);
    let mut driver = Driver::new(arena_with(content));
    driver.arena.state_mut().player.as_mut().unwrap().ammo = Some(Ammo { current: 0, max: 100 });

    let fire = InputFrame::idle().aiming_at(Vec2::new(100.0, 100.0)).firing();
    let result = driver.step(&fire);

    let state = driver.arena.state();
    assert!(state.projectiles.is_empty());
    assert!(state.muzzle_flashes.is_empty());
    assert_eq!(state.player.as_ref().unwrap().ammo.unwrap().current, 0);
    assert!(!result
        .events
        .iter()
        .any(|e| matches!(e.data, GameEventData::ShotFired { .. })));
}

#[test]
fn fire_spends_one_round() {
    let content = opponents(vec![bot("Far_Away", Vec2::new(100.0, 100.0))]);
    let mut driver = Driver::new(arena_with(content));

    driver.step(&InputFrame::idle().aiming_at(Vec2::new(100.0, 100.0)).firing());

    let state = driver.arena.state();
    assert_eq!(state.projectiles.len(), 1);
    assert_eq!(state.muzzle_flashes.len(), 1);
    assert_eq!(state.player.as_ref().unwrap().ammo.unwrap().current, 49);
}

#[test]
fn projectile_on_target_and_obstacle_removed_once() {
    let mut content = opponents(vec![bot("Pixel_Pro", Vec2::new(1000.0, 1000.0))]);
    content.obstacles.push(rock(Vec2::new(1030.0, 1000.0), 40.0));
    let mut driver = Driver::new(arena_with(content));

    let projectile_id = {
        let state = driver.arena.state_mut();
        let id = state.next_entity_id();
        state.projectiles.push(Projectile {
            body: Body::new(id, Vec2::new(1015.0, 1000.0), 8.0),
            velocity: Vec2::ZERO,
            owner: EntityId::PLAYER,
            damage: 10.0,
        });
        id
    };

    let result = driver.step(&InputFrame::idle());
    let state = driver.arena.state();

    assert!(state.projectiles.find(projectile_id).is_none());
    assert!(state.projectiles.is_empty());
    assert_eq!(state.bots.as_slice()[0].health, 40.0);

    let hits = result
        .events
        .iter()
        .filter(|e| matches!(e.data, GameEventData::ProjectileHit { .. }))
        .count();
    let blocks = result
        .events
        .iter()
        .filter(|e| matches!(e.data, GameEventData::ProjectileBlocked { .. }))
        .count();
    assert_eq!((hits, blocks), (1, 1));
}

#[test]
fn opponent_projectile_ignores_other_opponents() {
    // Owned by one opponent, sitting on top of the other
    let content = opponents(vec![
        bot("Robo_Hunter", Vec2::new(1000.0, 1000.0)),
        bot("Bot_Bandit", Vec2::new(700.0, 700.0)),
    ]);
    let mut driver = Driver::new(arena_with(content));

    {
        let state = driver.arena.state_mut();
        let owner = state.bots.as_slice()[1].body.id;
        let id = state.next_entity_id();
        state.projectiles.push(Projectile {
            body: Body::new(id, Vec2::new(1000.0, 1000.0), 8.0),
            velocity: Vec2::ZERO,
            owner,
            damage: 5.0,
        });
    }

    driver.step(&InputFrame::idle());
    let state = driver.arena.state();
    assert_eq!(state.projectiles.len(), 1);
    assert!(state.bots.iter().all(|b| b.health == 50.0));
}

#[test]
fn dash_respects_cooldown() {
    let content = opponents(vec![bot("Far_Away", Vec2::new(100.0, 100.0))]);
    let mut driver = Driver::new(arena_with(content));
    let dash = InputFrame::idle().dashing();

    let first = driver.step(&dash);
    assert!(first
        .events
        .iter()
        .any(|e| matches!(e.data, GameEventData::DashStarted { .. })));

    // Still dashing, then cooling down: further presses are ignored
    let again = driver.step(&dash);
    assert!(!again
        .events
        .iter()
        .any(|e| matches!(e.data, GameEventData::DashStarted { .. })));

    let ended = driver.step_after(200, &InputFrame::idle());
    assert!(ended
        .events
        .iter()
        .any(|e| matches!(e.data, GameEventData::DashEnded { .. })));
    assert!(!driver.arena.state().player.as_ref().unwrap().dash.active);

    let cooling = driver.step(&dash);
    assert!(cooling.events.is_empty());

    let ready = driver.step_after(2000, &dash);
    assert!(ready
        .events
        .iter()
        .any(|e| matches!(e.data, GameEventData::DashStarted { .. })));
}
