//! Simulation Director
//!
//! The driver that owns the roster: it spawns the initial population, keeps
//! trickling in replacement alert bots up to the configured cap, and prunes
//! despawned entries. The bot core itself never touches the roster.

use bevy::prelude::*;

use crate::bots::brain::random_position_near;
use crate::bots::components::{
    Bot, BotAttack, BotBrain, BotLocomotion, BotRole, Damageable, GameRng, NavAgent, PlayerOrdered,
};
use crate::bots::constants::{OUT_OF_COMBAT_MAX, OUT_OF_COMBAT_MIN, STOP_DISTANCE};
use crate::bots::roles::{RoleTuning, RoleTunings};
use crate::bots::SimPhase;
use crate::combat::components::{CombatStats, Health};
use crate::combat::log::{CombatLog, CombatLogEventType};

/// Faction id of standard bots.
pub const FACTION_STANDARD: u8 = 1;
/// Faction id of alert bots.
pub const FACTION_ALERT: u8 = 2;

/// Population settings for a scenario.
#[derive(Resource, Debug, Clone)]
pub struct DirectorConfig {
    /// Standard bots spawned at startup
    pub standard_bots: u32,
    /// How many of the standard bots accept external move orders
    pub player_ordered_bots: u32,
    /// Alert bots spawned at startup
    pub initial_alert_bots: u32,
    /// Cap on live alert bots; replacement spawning pauses at this count
    pub max_alert_bots: u32,
    /// Seconds between replacement spawn attempts
    pub spawn_interval: f32,
    /// Seconds before the first replacement spawn attempt
    pub first_wave_delay: f32,
    /// Spawn scatter radius for standard bots
    pub standard_spawn_radius: f32,
    /// Spawn scatter radius for alert bots
    pub alert_spawn_radius: f32,
}

impl Default for DirectorConfig {
    fn default() -> Self {
        Self {
            standard_bots: 4,
            player_ordered_bots: 0,
            initial_alert_bots: 10,
            max_alert_bots: 20,
            spawn_interval: 5.0,
            first_wave_delay: 15.0,
            standard_spawn_radius: 10.0,
            alert_spawn_radius: 15.0,
        }
    }
}

/// The roster of alert bots the director has spawned. Entries are pruned
/// lazily before each replacement spawn.
#[derive(Resource, Default)]
pub struct Roster {
    pub alert_bots: Vec<Entity>,
    next_spawn_at: f32,
}

/// Spawn one standard bot. Exposed for tests and custom drivers.
pub fn spawn_standard_bot(
    commands: &mut Commands,
    tunings: &RoleTunings,
    rng: &mut GameRng,
    position: Vec3,
    display_name: String,
    player_ordered: bool,
) -> Entity {
    let tuning = tunings.get(BotRole::Standard);
    let entity = commands
        .spawn(bot_bundle(
            BotRole::Standard,
            FACTION_STANDARD,
            display_name,
            tuning,
            rng,
            position,
        ))
        .id();
    if player_ordered {
        commands.entity(entity).insert(PlayerOrdered);
    }
    entity
}

/// Spawn one alert bot with a name drawn from the role's pool.
pub fn spawn_alert_bot(
    commands: &mut Commands,
    tunings: &RoleTunings,
    rng: &mut GameRng,
    position: Vec3,
) -> Entity {
    let tuning = tunings.get(BotRole::Alert);
    let display_name = tuning.names[rng.random_index(tuning.names.len())].clone();
    commands
        .spawn(bot_bundle(
            BotRole::Alert,
            FACTION_ALERT,
            display_name,
            tuning,
            rng,
            position,
        ))
        .id()
}

fn bot_bundle(
    role: BotRole,
    faction: u8,
    display_name: String,
    tuning: &RoleTuning,
    rng: &mut GameRng,
    position: Vec3,
) -> impl Bundle {
    // The first Start-state roll doubles as the bot's baseline reaction,
    // restored on every state exit.
    let baseline = rng.random_range(tuning.reaction.start.0, tuning.reaction.start.1);
    let out_of_combat_limit = rng.random_range(OUT_OF_COMBAT_MIN, OUT_OF_COMBAT_MAX);
    let skin = rng.random_index(tuning.skin_count as usize) as u32;
    let yaw = rng.random_range(0.0, std::f32::consts::TAU);

    (
        Bot {
            role,
            faction,
            display_name,
            skin,
        },
        Damageable,
        Transform::from_translation(position).with_rotation(Quat::from_rotation_y(yaw)),
        BotBrain::new(baseline, out_of_combat_limit),
        BotAttack::from_tuning(tuning),
        BotLocomotion::new(STOP_DISTANCE),
        NavAgent::new(tuning.move_speed),
        Health::new(tuning.max_hit_points),
        CombatStats::default(),
    )
}

/// Spawn the initial population
pub fn director_setup(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<DirectorConfig>,
    tunings: Res<RoleTunings>,
    mut rng: ResMut<GameRng>,
    mut roster: ResMut<Roster>,
    mut combat_log: ResMut<CombatLog>,
) {
    for i in 0..config.standard_bots {
        let player_ordered = i < config.player_ordered_bots;
        let position = random_position_near(Vec3::ZERO, config.standard_spawn_radius, &mut rng);
        spawn_standard_bot(
            &mut commands,
            &tunings,
            &mut rng,
            position,
            format!("Survivor {}", i + 1),
            player_ordered,
        );
    }

    for _ in 0..config.initial_alert_bots {
        let position = random_position_near(Vec3::ZERO, config.alert_spawn_radius, &mut rng);
        let entity = spawn_alert_bot(&mut commands, &tunings, &mut rng, position);
        roster.alert_bots.push(entity);
    }

    roster.next_spawn_at = time.elapsed_secs() + config.first_wave_delay;

    combat_log.log(
        CombatLogEventType::Scenario,
        format!(
            "director spawned {} standard and {} alert bots",
            config.standard_bots, config.initial_alert_bots
        ),
    );
}

/// Trickle in replacement alert bots while the population is below the cap
pub fn director_spawn_waves(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<DirectorConfig>,
    tunings: Res<RoleTunings>,
    mut rng: ResMut<GameRng>,
    mut roster: ResMut<Roster>,
    mut combat_log: ResMut<CombatLog>,
    bots: Query<&Bot>,
) {
    let now = time.elapsed_secs();
    if now < roster.next_spawn_at {
        return;
    }
    roster.next_spawn_at = now + config.spawn_interval;

    // Clean up the roster before adding a new entry.
    roster.alert_bots.retain(|entity| bots.get(*entity).is_ok());

    if (roster.alert_bots.len() as u32) < config.max_alert_bots {
        let position = random_position_near(Vec3::ZERO, config.alert_spawn_radius, &mut rng);
        let entity = spawn_alert_bot(&mut commands, &tunings, &mut rng, position);
        roster.alert_bots.push(entity);
        combat_log.log(
            CombatLogEventType::Scenario,
            "replacement alert bot spawned".to_string(),
        );
    }
}

/// Plugin for the simulation driver
pub struct DirectorPlugin;

impl Plugin for DirectorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DirectorConfig>()
            .init_resource::<Roster>()
            .add_systems(Startup, director_setup)
            .add_systems(Update, director_spawn_waves.in_set(SimPhase::Sense));
    }
}
