//! Headless scenario execution
//!
//! Runs scenarios without any graphical output, suitable for automated
//! testing and server deployments.

use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use std::time::Duration;

use crate::bots::components::{Bot, BotRole, GameRng};
use crate::bots::roles::RoleConfigPlugin;
use crate::bots::SimPhase;
use crate::combat::components::{CombatStats, Health, KillCounter};
use crate::combat::log::{CombatLog, CombatLogEventType, ScenarioMetadata};
use crate::director::DirectorPlugin;
use crate::SimulationPlugin;

use super::config::ScenarioConfig;

/// Result of a completed headless scenario
///
/// This struct provides programmatic access to run results for testing and
/// analysis.
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    /// Total scenario duration in seconds
    pub duration: f32,
    /// Alert bots destroyed over the run
    pub kills: u32,
    /// Per-bot statistics for the standard bots
    pub standard_bots: Vec<BotResult>,
    /// Random seed used (if deterministic mode)
    pub random_seed: Option<u64>,
}

/// Statistics for a single standard bot after the scenario
#[derive(Debug, Clone)]
pub struct BotResult {
    /// Replicated display name
    pub display_name: String,
    /// Maximum hit points
    pub max_hit_points: i32,
    /// Hit points remaining at scenario end (0 if dead)
    pub final_hit_points: i32,
    /// Whether this bot was alive at scenario end
    pub survived: bool,
    /// Total damage dealt during the scenario
    pub damage_dealt: i32,
    /// Total damage taken during the scenario
    pub damage_taken: i32,
}

/// Resource to track headless scenario state
#[derive(Resource)]
pub struct HeadlessState {
    /// Maximum scenario duration before stopping
    pub max_duration: f32,
    /// Elapsed scenario time
    pub elapsed_time: f32,
    /// Custom output path for the scenario log
    pub output_path: Option<String>,
    /// Whether the scenario has completed
    pub scenario_complete: bool,
    /// Random seed for deterministic simulation (if provided)
    pub random_seed: Option<u64>,
    /// Scenario result (populated when the run completes)
    pub result: Option<ScenarioResult>,
}

/// Plugin for headless scenario execution
pub struct HeadlessPlugin {
    pub config: ScenarioConfig,
}

impl Plugin for HeadlessPlugin {
    fn build(&self, app: &mut App) {
        let game_rng = match self.config.random_seed {
            Some(seed) => {
                info!("Using deterministic RNG with seed: {}", seed);
                GameRng::from_seed(seed)
            }
            None => {
                info!("Using non-deterministic RNG (no seed provided)");
                GameRng::from_entropy()
            }
        };

        app.insert_resource(self.config.to_director_config())
            .insert_resource(game_rng)
            .insert_resource(HeadlessState {
                max_duration: self.config.max_duration_secs,
                elapsed_time: 0.0,
                output_path: self.config.output_path.clone(),
                scenario_complete: false,
                random_seed: self.config.random_seed,
                result: None,
            })
            .add_systems(Startup, headless_setup_scenario)
            .add_systems(
                Update,
                (headless_track_time, headless_check_scenario_end)
                    .chain()
                    .after(SimPhase::Broadcast),
            )
            .add_systems(PostUpdate, headless_exit_on_complete);
    }
}

/// Setup system for the headless scenario
fn headless_setup_scenario(mut combat_log: ResMut<CombatLog>) {
    combat_log.clear();
    combat_log.log(
        CombatLogEventType::Scenario,
        "Scenario started (headless mode)".to_string(),
    );
}

/// Track elapsed scenario time (used for timeout detection)
fn headless_track_time(time: Res<Time>, mut state: ResMut<HeadlessState>) {
    state.elapsed_time += time.delta_secs();
}

/// Check if the scenario has ended: either the clock ran out, or every
/// standard bot is down at the same time.
fn headless_check_scenario_end(
    bots: Query<(&Bot, &Health, &CombatStats)>,
    kill_counter: Res<KillCounter>,
    combat_log: Res<CombatLog>,
    mut state: ResMut<HeadlessState>,
) {
    if state.scenario_complete {
        return;
    }

    let timed_out = state.elapsed_time >= state.max_duration;
    let any_standard_alive = bots
        .iter()
        .any(|(bot, health, _)| bot.role == BotRole::Standard && health.is_alive());

    if !timed_out && any_standard_alive {
        return;
    }

    if timed_out {
        info!("Scenario finished after {:.1}s", state.elapsed_time);
    } else {
        info!(
            "Scenario ended at {:.1}s: every standard bot is down",
            state.elapsed_time
        );
    }

    let result = build_scenario_result(&bots, &kill_counter, &state);
    save_scenario_log(&combat_log, &result, &state);
    state.result = Some(result);
    state.scenario_complete = true;
}

/// Build the ScenarioResult from current bot state
fn build_scenario_result(
    bots: &Query<(&Bot, &Health, &CombatStats)>,
    kill_counter: &KillCounter,
    state: &HeadlessState,
) -> ScenarioResult {
    let mut standard_bots = Vec::new();

    for (bot, health, stats) in bots.iter() {
        if bot.role != BotRole::Standard {
            continue;
        }
        standard_bots.push(BotResult {
            display_name: bot.display_name.clone(),
            max_hit_points: health.max_hit_points(),
            final_hit_points: health.hit_points(),
            survived: health.is_alive(),
            damage_dealt: stats.damage_dealt,
            damage_taken: stats.damage_taken,
        });
    }

    ScenarioResult {
        duration: state.elapsed_time,
        kills: kill_counter.kills,
        standard_bots,
        random_seed: state.random_seed,
    }
}

/// Save the combat log to a file
fn save_scenario_log(combat_log: &CombatLog, result: &ScenarioResult, state: &HeadlessState) {
    let metadata = ScenarioMetadata {
        duration: result.duration,
        kills: result.kills,
        survivors: result
            .standard_bots
            .iter()
            .filter(|b| b.survived)
            .map(|b| b.display_name.clone())
            .collect(),
        random_seed: result.random_seed,
    };

    match combat_log.save_to_file(&metadata, state.output_path.as_deref()) {
        Ok(filename) => {
            println!("Scenario complete. Log saved to: {}", filename);
        }
        Err(e) => {
            eprintln!("Failed to save scenario log: {}", e);
        }
    }
}

/// Exit the app when the scenario is complete
fn headless_exit_on_complete(state: Res<HeadlessState>, mut exit: EventWriter<AppExit>) {
    if state.scenario_complete {
        exit.send(AppExit::Success);
    }
}

/// Run a headless scenario with the given configuration
pub fn run_headless_scenario(config: ScenarioConfig) -> Result<(), String> {
    config.validate()?;

    println!("Starting headless scenario...");
    println!(
        "  Standard bots: {} ({} player-ordered)",
        config.standard_bots, config.player_ordered_bots
    );
    println!(
        "  Alert bots: {} (cap {}, +1 every {:.0}s)",
        config.alert_bots, config.max_alert_bots, config.spawn_interval_secs
    );
    println!("  Max duration: {:.0}s", config.max_duration_secs);

    App::new()
        // Minimal plugins - no window, no rendering
        .add_plugins(
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
                1.0 / 60.0,
            ))),
        )
        // Transform plugin needed for entity positions
        .add_plugins(TransformPlugin)
        // Load role tuning from config
        .add_plugins(RoleConfigPlugin)
        // The authoritative simulation and its driver
        .add_plugins(SimulationPlugin)
        .add_plugins(DirectorPlugin)
        // Our headless scenario plugin
        .add_plugins(HeadlessPlugin { config })
        .run();

    Ok(())
}
