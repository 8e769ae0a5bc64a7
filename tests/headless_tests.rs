//! Integration tests for headless scenario configuration
//!
//! These tests verify that:
//! - JSON scenario configs parse with sensible defaults
//! - Invalid configurations are rejected with clear messages
//! - The shipped role tuning file loads and matches the role contracts
//! - Scenario results are accessible programmatically

use hordesim::bots::components::BotRole;
use hordesim::bots::roles::{DeathPolicy, RoleTunings, ROLE_CONFIG_PATH};
use hordesim::headless::{BotResult, ScenarioConfig, ScenarioResult};

// =============================================================================
// Scenario Config
// =============================================================================

#[test]
fn test_default_config_is_valid() {
    let config = ScenarioConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.standard_bots, 4);
    assert_eq!(config.alert_bots, 10);
    assert_eq!(config.max_alert_bots, 20);
    assert_eq!(config.max_duration_secs, 300.0);
    assert!(config.random_seed.is_none());
}

#[test]
fn test_json_fills_in_defaults() {
    let config: ScenarioConfig =
        serde_json::from_str(r#"{"standard_bots": 2, "random_seed": 42}"#)
            .expect("partial config must parse");

    assert_eq!(config.standard_bots, 2);
    assert_eq!(config.random_seed, Some(42));
    assert_eq!(config.alert_bots, 10, "omitted fields take their defaults");
    assert!(config.validate().is_ok());
}

#[test]
fn test_zero_standard_bots_is_rejected() {
    let config = ScenarioConfig {
        standard_bots: 0,
        ..ScenarioConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_alert_cap_below_initial_count_is_rejected() {
    let config = ScenarioConfig {
        alert_bots: 30,
        max_alert_bots: 20,
        ..ScenarioConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_nonpositive_duration_is_rejected() {
    let config = ScenarioConfig {
        max_duration_secs: 0.0,
        ..ScenarioConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_player_ordered_bots_cannot_exceed_standard_bots() {
    let config = ScenarioConfig {
        standard_bots: 2,
        player_ordered_bots: 3,
        ..ScenarioConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_director_config_conversion() {
    let config = ScenarioConfig {
        alert_bots: 6,
        max_alert_bots: 12,
        spawn_interval_secs: 3.0,
        ..ScenarioConfig::default()
    };
    let director = config.to_director_config();

    assert_eq!(director.initial_alert_bots, 6);
    assert_eq!(director.max_alert_bots, 12);
    assert_eq!(director.spawn_interval, 3.0);
}

// =============================================================================
// Role Tuning File
// =============================================================================

#[test]
fn test_shipped_role_tuning_loads() {
    let tunings = RoleTunings::load_from_file(ROLE_CONFIG_PATH)
        .expect("the shipped tuning file must load");

    let standard = tunings.get(BotRole::Standard);
    let alert = tunings.get(BotRole::Alert);

    // The alert role sees farther and tolerates more range before losing
    // interest, but has a fraction of the hit points.
    assert!(alert.detect_radius > standard.detect_radius);
    assert!(alert.target_out_of_range > standard.target_out_of_range);
    assert!(alert.max_hit_points < standard.max_hit_points);
    assert!(!alert.names.is_empty(), "alert bots draw names from a pool");

    assert!(matches!(
        standard.death_policy,
        DeathPolicy::Resurrect { .. }
    ));
    assert!(matches!(alert.death_policy, DeathPolicy::Remove { .. }));

    // The configuration invariant: strikes land within the cooldown window.
    assert!(standard.strike_delay <= standard.attack_interval);
    assert!(alert.strike_delay <= alert.attack_interval);
}

// =============================================================================
// Scenario Results
// =============================================================================

#[test]
fn test_scenario_result_fields() {
    let result = ScenarioResult {
        duration: 120.0,
        kills: 7,
        standard_bots: vec![BotResult {
            display_name: "Survivor 1".to_string(),
            max_hit_points: 500,
            final_hit_points: 230,
            survived: true,
            damage_dealt: 90,
            damage_taken: 270,
        }],
        random_seed: Some(12345),
    };

    assert_eq!(result.kills, 7);
    assert_eq!(result.random_seed, Some(12345));
    assert_eq!(result.standard_bots.len(), 1);
    assert!(result.standard_bots[0].survived);
}
