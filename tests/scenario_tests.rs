//! Scenario tests driving the full simulation through a manually stepped App
//!
//! These tests step the schedule by hand with a controlled clock, so they are
//! deterministic and instant. They verify the end-to-end behavior of the
//! decision loop: idling, target acquisition, stale-target recovery, strike
//! cancellation, the out-of-combat recall, external move orders, replication,
//! and a full fight to the death.

use bevy::prelude::*;
use std::time::Duration;

use hordesim::bots::components::{
    Bot, BotAttack, BotBrain, BotLocomotion, BotRole, BotState, Damageable, GameRng, NavAgent,
    PlayerOrdered,
};
use hordesim::bots::constants::STOP_DISTANCE;
use hordesim::bots::roles::{RoleTunings, ROLE_CONFIG_PATH};
use hordesim::bots::SimPhase;
use hordesim::combat::components::{CombatStats, Health, KillCounter};
use hordesim::director::{FACTION_ALERT, FACTION_STANDARD};
use hordesim::replication::{ExternalMoveRequest, ReplicatedValue, ReplicationEvent};
use hordesim::SimulationPlugin;

// =============================================================================
// Harness
// =============================================================================

fn test_app(rng: GameRng) -> App {
    let mut app = App::new();
    app.add_plugins(SimulationPlugin);
    app.insert_resource(
        RoleTunings::load_from_file(ROLE_CONFIG_PATH).expect("role tuning must load"),
    );
    app.insert_resource(rng);
    app.init_resource::<Time>();
    app
}

/// Advance the clock by `seconds` and run one schedule pass.
fn step(app: &mut App, seconds: f32) {
    app.world_mut()
        .resource_mut::<Time>()
        .advance_by(Duration::from_secs_f32(seconds));
    app.update();
}

fn run_for(app: &mut App, seconds: f32, dt: f32) {
    let mut elapsed = 0.0;
    while elapsed < seconds {
        step(app, dt);
        elapsed += dt;
    }
}

/// Make the next tick fire a decision cycle regardless of the interval.
fn force_decide(app: &mut App, bot: Entity) {
    let mut brain = app.world_mut().get_mut::<BotBrain>(bot).unwrap();
    brain.brain_timer = brain.reaction_interval;
}

fn spawn_full_bot(
    app: &mut App,
    role: BotRole,
    faction: u8,
    position: Vec3,
    name: &str,
    baseline: f32,
    out_of_combat_limit: f32,
) -> Entity {
    let tuning = app.world().resource::<RoleTunings>().get(role).clone();
    app.world_mut()
        .spawn((
            Bot {
                role,
                faction,
                display_name: name.to_string(),
                skin: 0,
            },
            Damageable,
            Transform::from_translation(position),
            BotBrain::new(baseline, out_of_combat_limit),
            BotAttack::from_tuning(&tuning),
            BotLocomotion::new(STOP_DISTANCE),
            NavAgent::new(tuning.move_speed),
            Health::new(tuning.max_hit_points),
            CombatStats::default(),
        ))
        .id()
}

/// A target with health and a position but no brain: it never acts.
fn spawn_dummy_target(app: &mut App, faction: u8, position: Vec3, hit_points: i32) -> Entity {
    app.world_mut()
        .spawn((
            Bot {
                role: BotRole::Alert,
                faction,
                display_name: "Dummy".to_string(),
                skin: 0,
            },
            Damageable,
            Transform::from_translation(position),
            Health::new(hit_points),
            CombatStats::default(),
        ))
        .id()
}

fn kill(app: &mut App, entity: Entity) {
    let mut health = app.world_mut().get_mut::<Health>(entity).unwrap();
    let remaining = health.hit_points();
    health.apply_damage(remaining);
}

// =============================================================================
// Scenario A: idling forever
// =============================================================================

#[test]
fn scenario_idle_bot_with_no_candidates_stays_put() {
    // A fixed roll of 0.9 makes every 50/50 draw pick the idle branch.
    let mut app = test_app(GameRng::with_fixed_roll(0.9));
    let spawn_position = Vec3::new(3.0, 0.0, 0.0);
    let bot = spawn_full_bot(
        &mut app,
        BotRole::Standard,
        FACTION_STANDARD,
        spawn_position,
        "Loner",
        0.5,
        10_000.0,
    );

    step(&mut app, 0.1);
    assert_eq!(
        app.world().get::<BotBrain>(bot).unwrap().state,
        BotState::Wander,
        "the Start state converts to Wander on the first tick"
    );

    // With roll 0.9 the idle interval is 4.6s; 60 seconds cover well over
    // ten decision cycles.
    run_for(&mut app, 60.0, 0.5);

    let brain = app.world().get::<BotBrain>(bot).unwrap();
    assert_eq!(brain.state, BotState::Idle);
    assert!(!brain.in_combat);
    assert!(brain.current_target.is_none());

    let nav = app.world().get::<NavAgent>(bot).unwrap();
    assert!(
        nav.destination.is_none(),
        "an idling bot must issue zero movement commands"
    );
    assert_eq!(
        app.world().get::<Transform>(bot).unwrap().translation,
        spawn_position
    );
}

// =============================================================================
// Scenario B: target acquisition
// =============================================================================

#[test]
fn scenario_candidate_in_range_enters_combat_next_cycle() {
    let mut app = test_app(GameRng::with_fixed_roll(0.9));
    let bot = spawn_full_bot(
        &mut app,
        BotRole::Standard,
        FACTION_STANDARD,
        Vec3::ZERO,
        "Hunter",
        0.5,
        10_000.0,
    );
    let prey = spawn_dummy_target(&mut app, FACTION_ALERT, Vec3::new(5.0, 0.0, 0.0), 15);

    step(&mut app, 0.1); // Start -> Wander

    force_decide(&mut app, bot);
    step(&mut app, 0.05);

    let brain = app.world().get::<BotBrain>(bot).unwrap();
    assert!(brain.in_combat, "detection must pull the bot into combat");
    assert_eq!(brain.current_target, Some(prey));
}

// =============================================================================
// Scenario C: target dies between cycles
// =============================================================================

#[test]
fn scenario_dead_target_is_purged_without_an_attack() {
    let mut app = test_app(GameRng::with_fixed_roll(0.9));
    let bot = spawn_full_bot(
        &mut app,
        BotRole::Standard,
        FACTION_STANDARD,
        Vec3::ZERO,
        "Brawler",
        0.5,
        10_000.0,
    );
    let prey = spawn_dummy_target(&mut app, FACTION_ALERT, Vec3::new(1.5, 0.0, 0.0), 15);

    step(&mut app, 0.1); // Start -> Wander
    force_decide(&mut app, bot);
    step(&mut app, 0.05); // detects prey, enters combat
    force_decide(&mut app, bot);
    step(&mut app, 0.05); // in melee range: transitions to Attack and swings

    {
        let brain = app.world().get::<BotBrain>(bot).unwrap();
        assert_eq!(brain.state, BotState::Attack);
        assert!(brain.is_close_to_target);
    }

    kill(&mut app, prey);
    let cooldown_before = app.world().get::<BotAttack>(bot).unwrap().next_attack_at;

    force_decide(&mut app, bot);
    step(&mut app, 0.05);

    let brain = app.world().get::<BotBrain>(bot).unwrap();
    assert_eq!(brain.state, BotState::Idle);
    assert!(!brain.in_combat);
    assert!(brain.current_target.is_none());

    let attack = app.world().get::<BotAttack>(bot).unwrap();
    assert!(attack.targets.is_empty(), "the dead target must be purged");
    assert_eq!(
        attack.next_attack_at, cooldown_before,
        "no attack may start against a dead target"
    );
}

// =============================================================================
// Scenario D: restarted attack cancels the strike in flight
// =============================================================================

#[test]
fn scenario_second_strike_cancels_the_first() {
    let mut app = test_app(GameRng::with_fixed_roll(0.9));
    let bot = spawn_full_bot(
        &mut app,
        BotRole::Standard,
        FACTION_STANDARD,
        Vec3::ZERO,
        "Swinger",
        0.5,
        10_000.0,
    );
    // Directly ahead: a bot at the origin with identity rotation faces -Z.
    let prey = spawn_dummy_target(&mut app, FACTION_ALERT, Vec3::new(0.0, 0.0, -1.0), 500);

    // Freeze the brain and drive the attack pipeline by hand.
    app.world_mut().get_mut::<BotBrain>(bot).unwrap().active = false;
    step(&mut app, 0.1);

    let now = app.world().resource::<Time>().elapsed_secs();
    app.world_mut()
        .get_mut::<BotAttack>(bot)
        .unwrap()
        .schedule_strike(now); // would resolve at +0.5s

    step(&mut app, 0.25);
    let now = app.world().resource::<Time>().elapsed_secs();
    app.world_mut()
        .get_mut::<BotAttack>(bot)
        .unwrap()
        .schedule_strike(now); // replaces the first, resolves at +0.5s

    run_for(&mut app, 1.5, 0.1);

    let stats = app.world().get::<CombatStats>(prey).unwrap();
    assert_eq!(
        stats.damage_taken, 10,
        "exactly one strike may land; the cancelled one must not"
    );
}

// =============================================================================
// Scenario E: out-of-combat recall to the rally point
// =============================================================================

#[test]
fn scenario_recall_to_rally_point_resets_the_timer() {
    let mut app = test_app(GameRng::with_fixed_roll(0.9));
    let start = Vec3::new(30.0, 0.0, 0.0);
    // Fixed 20s limit for the test.
    let bot = spawn_full_bot(
        &mut app,
        BotRole::Standard,
        FACTION_STANDARD,
        start,
        "Straggler",
        0.5,
        20.0,
    );

    step(&mut app, 0.1); // Start -> Wander

    // Idle out the limit (roll 0.9 keeps picking the idle branch).
    run_for(&mut app, 21.0, 0.5);

    {
        let nav = app.world().get::<NavAgent>(bot).unwrap();
        assert_eq!(
            nav.destination,
            Some(Vec3::ZERO),
            "exceeding the limit must order a move toward the rally point"
        );
    }

    // Let the bot walk home; 3.5 u/s covers the ~20 units comfortably.
    run_for(&mut app, 10.0, 0.5);

    let transform = app.world().get::<Transform>(bot).unwrap();
    assert!(
        transform.translation.distance(Vec3::ZERO) < 10.0,
        "the bot must end up near the rally point"
    );
    let brain = app.world().get::<BotBrain>(bot).unwrap();
    assert!(
        brain.out_of_combat_timer < 20.0,
        "reaching the rally point must reset the out-of-combat timer"
    );
}

// =============================================================================
// External move orders
// =============================================================================

#[test]
fn external_orders_are_validated_and_reset_combat() {
    let mut app = test_app(GameRng::with_fixed_roll(0.9));
    let bot = spawn_full_bot(
        &mut app,
        BotRole::Standard,
        FACTION_STANDARD,
        Vec3::ZERO,
        "Operator",
        0.5,
        10_000.0,
    );
    app.world_mut().entity_mut(bot).insert(PlayerOrdered);
    let prey = spawn_dummy_target(&mut app, FACTION_ALERT, Vec3::new(5.0, 0.0, 0.0), 15);

    step(&mut app, 0.1);
    force_decide(&mut app, bot);
    step(&mut app, 0.05);
    assert!(app.world().get::<BotBrain>(bot).unwrap().in_combat);
    assert_eq!(
        app.world().get::<BotBrain>(bot).unwrap().current_target,
        Some(prey)
    );

    // The zero position is the sentinel value and must change nothing.
    app.world_mut().send_event(ExternalMoveRequest {
        bot,
        position: Vec3::ZERO,
    });
    step(&mut app, 0.05);
    assert!(
        app.world().get::<BotBrain>(bot).unwrap().in_combat,
        "a rejected order must not touch combat state"
    );
    assert!(app.world().get::<NavAgent>(bot).unwrap().destination.is_none());

    // A valid order moves the bot and pulls it out of combat.
    let ordered = Vec3::new(20.0, 0.0, 20.0);
    app.world_mut().send_event(ExternalMoveRequest {
        bot,
        position: ordered,
    });
    step(&mut app, 0.05);

    let brain = app.world().get::<BotBrain>(bot).unwrap();
    assert!(!brain.in_combat, "an accepted order resets the bot out of combat");
    assert_eq!(
        app.world().get::<BotLocomotion>(bot).unwrap().ordered_position,
        Some(ordered)
    );
    assert!(app.world().get::<NavAgent>(bot).unwrap().destination.is_some());

    step(&mut app, 0.1);
    let locomotion = app.world().get::<BotLocomotion>(bot).unwrap();
    assert!(locomotion.blend > 0.99, "a traveling bot blends at full speed");
}

// =============================================================================
// Replication boundary
// =============================================================================

#[derive(Resource, Default)]
struct CapturedReplication(Vec<ReplicationEvent>);

fn capture_replication(
    mut events: EventReader<ReplicationEvent>,
    mut captured: ResMut<CapturedReplication>,
) {
    for event in events.read() {
        captured.0.push(event.clone());
    }
}

#[test]
fn replication_pushes_cosmetics_health_and_kills() {
    let mut app = test_app(GameRng::with_fixed_roll(0.9));
    app.init_resource::<CapturedReplication>();
    app.add_systems(Update, capture_replication.after(SimPhase::Broadcast));

    let bot = spawn_full_bot(
        &mut app,
        BotRole::Standard,
        FACTION_STANDARD,
        Vec3::ZERO,
        "Observed",
        0.5,
        10_000.0,
    );
    step(&mut app, 0.05);

    {
        let captured = &app.world().resource::<CapturedReplication>().0;
        let has = |value: &ReplicatedValue| {
            captured
                .iter()
                .any(|e| e.entity == Some(bot) && e.value == *value)
        };
        assert!(has(&ReplicatedValue::Skin(0)));
        assert!(has(&ReplicatedValue::DisplayName("Observed".to_string())));
        assert!(has(&ReplicatedValue::HitPoints(500)));
    }

    app.world_mut()
        .get_mut::<Health>(bot)
        .unwrap()
        .apply_damage(50);
    step(&mut app, 0.05);
    assert!(
        app.world()
            .resource::<CapturedReplication>()
            .0
            .iter()
            .any(|e| e.entity == Some(bot) && e.value == ReplicatedValue::HitPoints(450)),
        "hit point changes must be pushed"
    );

    app.world_mut().resource_mut::<KillCounter>().increment();
    step(&mut app, 0.05);
    assert!(
        app.world()
            .resource::<CapturedReplication>()
            .0
            .iter()
            .any(|e| e.entity.is_none() && e.value == ReplicatedValue::KillCount(1)),
        "kill counter changes must be pushed"
    );
}

// =============================================================================
// Full fight: standard bot vs alert bot
// =============================================================================

#[test]
fn full_fight_kills_counts_and_removes_the_alert_bot() {
    let mut app = test_app(GameRng::with_fixed_roll(0.2));
    let survivor = spawn_full_bot(
        &mut app,
        BotRole::Standard,
        FACTION_STANDARD,
        Vec3::ZERO,
        "Survivor 1",
        0.5,
        10_000.0,
    );
    let zombie = spawn_full_bot(
        &mut app,
        BotRole::Alert,
        FACTION_ALERT,
        Vec3::new(5.0, 0.0, 0.0),
        "Shambler",
        0.5,
        10_000.0,
    );

    // 40 simulated seconds: detect, chase, trade blows, die, get removed.
    run_for(&mut app, 40.0, 0.1);

    assert!(
        app.world().get::<Bot>(zombie).is_none(),
        "the dead alert bot must leave the simulation after its removal delay"
    );
    assert_eq!(app.world().resource::<KillCounter>().kills, 1);

    let health = app.world().get::<Health>(survivor).unwrap();
    assert!(health.is_alive(), "the standard bot must win this matchup");
    let stats = app.world().get::<CombatStats>(survivor).unwrap();
    assert!(
        stats.damage_dealt >= 20,
        "two landed strikes are needed to down a 15 hp alert bot"
    );
}
