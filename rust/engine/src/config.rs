// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Engine configuration loaded from environment variables.

use neuroface_geometry::{HeadConfig, SpatialIndexKind};
use std::str::FromStr;
use std::time::Duration;

/// Default reveal animation length
pub const DEFAULT_REVEAL_MS: u64 = 2500;
/// Default per-frame rotation while waiting for an image
pub const DEFAULT_IDLE_ROTATION: f64 = 0.001;
/// Default per-frame rotation once the reveal has finished
pub const DEFAULT_COMPLETE_ROTATION: f64 = 0.002;

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Head synthesis parameters.
    pub head: HeadConfig,
    /// Duration of the progressive reveal.
    pub reveal_duration: Duration,
    /// Radians per frame about the vertical axis in the idle state.
    pub idle_rotation: f64,
    /// Radians per frame about the vertical axis in the complete state.
    pub complete_rotation: f64,
    /// Reset the landmark detector before every image.
    pub reset_detector_between_images: bool,
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(var = name, value = %raw, "Ignoring invalid configuration value");
            default
        }),
        Err(_) => default,
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl EngineConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparseable values keep their defaults, as do values the
    /// geometry cannot use (non-positive spans, spheres coarser than 3x2).
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let mut head = defaults.head;

        let span: f64 = env_or("NEUROFACE_TARGET_SPAN", head.normalize.target_span);
        if span.is_finite() && span > 0.0 {
            head.normalize.target_span = span;
        }
        let width: u32 = env_or("NEUROFACE_WIDTH_SEGMENTS", head.deform.width_segments);
        if width >= 3 {
            head.deform.width_segments = width;
        }
        let height: u32 = env_or("NEUROFACE_HEIGHT_SEGMENTS", head.deform.height_segments);
        if height >= 2 {
            head.deform.height_segments = height;
        }
        head.deform.spatial_index =
            env_or::<SpatialIndexKind>("NEUROFACE_SPATIAL_INDEX", head.deform.spatial_index);

        let reset_detector_between_images = std::env::var("NEUROFACE_RESET_DETECTOR")
            .ok()
            .and_then(|raw| parse_flag(&raw))
            .unwrap_or(defaults.reset_detector_between_images);

        Self {
            head,
            reveal_duration: Duration::from_millis(env_or("NEUROFACE_REVEAL_MS", DEFAULT_REVEAL_MS)),
            idle_rotation: env_or("NEUROFACE_IDLE_ROTATION", DEFAULT_IDLE_ROTATION),
            complete_rotation: env_or("NEUROFACE_COMPLETE_ROTATION", DEFAULT_COMPLETE_ROTATION),
            reset_detector_between_images,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            head: HeadConfig::default(),
            reveal_duration: Duration::from_millis(DEFAULT_REVEAL_MS),
            idle_rotation: DEFAULT_IDLE_ROTATION,
            complete_rotation: DEFAULT_COMPLETE_ROTATION,
            reset_detector_between_images: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.reveal_duration, Duration::from_millis(2500));
        assert_eq!(config.head.deform.width_segments, 48);
        assert_eq!(config.head.deform.height_segments, 36);
        assert!(!config.reset_detector_between_images);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" off "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_env_overrides() {
        // Only this test touches these variables
        std::env::set_var("NEUROFACE_REVEAL_MS", "1000");
        std::env::set_var("NEUROFACE_SPATIAL_INDEX", "grid");
        std::env::set_var("NEUROFACE_WIDTH_SEGMENTS", "2");
        std::env::set_var("NEUROFACE_IDLE_ROTATION", "fast");

        let config = EngineConfig::from_env();
        assert_eq!(config.reveal_duration, Duration::from_millis(1000));
        assert_eq!(config.head.deform.spatial_index, SpatialIndexKind::Grid);
        assert_eq!(config.head.deform.width_segments, 48);
        assert_eq!(config.idle_rotation, DEFAULT_IDLE_ROTATION);

        for name in [
            "NEUROFACE_REVEAL_MS",
            "NEUROFACE_SPATIAL_INDEX",
            "NEUROFACE_WIDTH_SEGMENTS",
            "NEUROFACE_IDLE_ROTATION",
        ] {
            std::env::remove_var(name);
        }
    }
}
