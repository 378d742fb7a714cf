//! Smoke tests: the public facade exposes a coherent, wire-together API.

use fitcheck::{Angle, Config, MediaType, PromptSet};
use std::time::Duration;

#[test]
fn default_config_is_usable() {
    let config = Config::minimal_for_testing();
    assert_eq!(config.backend(), "gemini");
    assert_eq!(config.pacing_delay(), Duration::from_millis(1000));
    assert!(config.timeout() >= Duration::from_secs(Config::MIN_TIMEOUT_SECS));
    config.validate().unwrap();
}

#[test]
fn prompt_table_covers_every_angle() {
    let prompts = PromptSet::default();
    for angle in Angle::ALL {
        assert!(!prompts.for_angle(angle).is_empty());
    }
    // Label lookup is lenient; unknown labels serve the front prompt
    assert_eq!(prompts.for_label("nonsense"), prompts.for_angle(Angle::Front));
}

#[test]
fn media_types_round_trip_through_labels() {
    for media_type in [MediaType::Jpeg, MediaType::Png, MediaType::Webp] {
        assert_eq!(MediaType::from_mime(media_type.as_str()), media_type);
    }
}

#[test]
fn config_discovery_in_empty_dir_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::discover_from(dir.path()).unwrap();
    assert_eq!(config.model(), Config::DEFAULT_MODEL);
}
