// Copyright 2026 Shinobu Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Container configuration.
//!
//! Defaults reproduce the phone layout the container was tuned on: a 375pt
//! wide window that keeps a third of the content visible when the menu is
//! open, settled by a slightly under-damped half-second spring.

use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use snafu::{ResultExt, ensure};

use crate::err::{
    EncodeConfigSnafu, InvalidConfigSnafu, ParseConfigSnafu, ReadConfigSnafu, Result,
};

/// Horizontal reading direction of the host. Gestures are normalized so that
/// "opening" always means towards the menu edge.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum LayoutDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

impl LayoutDirection {
    /// Multiplier turning a raw horizontal value into an opening-positive one.
    pub const fn sign(self) -> f32 {
        match self {
            Self::LeftToRight => 1.0,
            Self::RightToLeft => -1.0,
        }
    }
}

/// Spring used to settle the menu offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SmartDefault, bon::Builder)]
#[serde(default)]
pub struct SpringConfig {
    /// Upper bound on the animation length, in milliseconds
    #[default = 500]
    #[builder(default = 500)]
    pub duration_ms: u64,

    /// 1.0 is critically damped, below overshoots, above creeps
    #[default = 0.8]
    #[builder(default = 0.8)]
    pub damping_ratio: f32,

    /// Distance from the target, in points, at which the curve counts as settled
    #[default = 0.5]
    #[builder(default = 0.5)]
    pub settle_tolerance: f32,
}

impl SpringConfig {
    pub const fn duration(&self) -> Duration { Duration::from_millis(self.duration_ms) }
}

/// Navigation container configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SmartDefault, bon::Builder)]
#[serde(default)]
pub struct ContainerConfig {
    /// Container width in points
    #[default = 375.0]
    #[builder(default = 375.0)]
    pub width: f32,

    /// Container height in points; the menu overlay always spans all of it
    #[default = 667.0]
    #[builder(default = 667.0)]
    pub height: f32,

    /// Share of the width the content keeps on screen while the menu is open
    #[default(_code = "1.0 / 3.0")]
    #[builder(default = 1.0 / 3.0)]
    pub menu_peek_ratio: f32,

    #[builder(default)]
    pub layout_direction: LayoutDirection,

    /// Shadow cast by the content view while the menu is engaged
    #[default = 0.8]
    #[builder(default = 0.8)]
    pub shadow_opacity: f32,

    /// Index at which the container is inserted into the host hierarchy
    #[builder(default)]
    pub host_index: usize,

    #[builder(default)]
    pub spring: SpringConfig,
}

impl ContainerConfig {
    /// Offset of the content view when the menu is fully open.
    pub fn max_offset(&self) -> f32 { self.width * (1.0 - self.menu_peek_ratio) }

    /// Displacement a released drag must exceed to commit to open.
    pub fn commit_threshold(&self) -> f32 { self.width / 2.0 }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.width.is_finite() && self.width > 0.0,
            InvalidConfigSnafu {
                message: format!("width must be positive, got {}", self.width),
            }
        );
        ensure!(
            self.height.is_finite() && self.height > 0.0,
            InvalidConfigSnafu {
                message: format!("height must be positive, got {}", self.height),
            }
        );
        ensure!(
            self.menu_peek_ratio > 0.0 && self.menu_peek_ratio < 1.0,
            InvalidConfigSnafu {
                message: format!(
                    "menu_peek_ratio must lie in (0, 1), got {}",
                    self.menu_peek_ratio
                ),
            }
        );
        ensure!(
            (0.0..=1.0).contains(&self.shadow_opacity),
            InvalidConfigSnafu {
                message: format!(
                    "shadow_opacity must lie in [0, 1], got {}",
                    self.shadow_opacity
                ),
            }
        );
        ensure!(
            self.spring.duration_ms > 0,
            InvalidConfigSnafu {
                message: "spring.duration_ms must be positive",
            }
        );
        ensure!(
            self.spring.damping_ratio.is_finite() && self.spring.damping_ratio > 0.0,
            InvalidConfigSnafu {
                message: format!(
                    "spring.damping_ratio must be positive, got {}",
                    self.spring.damping_ratio
                ),
            }
        );
        ensure!(
            self.spring.settle_tolerance.is_finite() && self.spring.settle_tolerance > 0.0,
            InvalidConfigSnafu {
                message: format!(
                    "spring.settle_tolerance must be positive, got {}",
                    self.spring.settle_tolerance
                ),
            }
        );
        Ok(())
    }

    /// Parses and validates a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).context(ParseConfigSnafu)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).context(ReadConfigSnafu { path })?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context(EncodeConfigSnafu)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::err::Error;

    #[test]
    fn default_geometry() {
        let config = ContainerConfig::default();
        assert!((config.max_offset() - 250.0).abs() < 1e-3);
        assert!((config.commit_threshold() - 187.5).abs() < 1e-6);
        assert_eq!(config.spring.duration(), Duration::from_millis(500));
        config.validate().unwrap();
    }

    #[test]
    fn builder_agrees_with_default() {
        assert_eq!(ContainerConfig::builder().build(), ContainerConfig::default());
        let narrow = ContainerConfig::builder().width(320.0).build();
        assert!((narrow.commit_threshold() - 160.0).abs() < 1e-6);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = ContainerConfig::from_toml_str(
            r#"
            width = 414.0
            layout_direction = "right_to_left"

            [spring]
            damping_ratio = 1.0
            "#,
        )
        .unwrap();
        assert!((config.width - 414.0).abs() < 1e-6);
        assert_eq!(config.layout_direction, LayoutDirection::RightToLeft);
        assert!((config.spring.damping_ratio - 1.0).abs() < 1e-6);
        assert_eq!(config.spring.duration_ms, 500);
    }

    #[test]
    fn rejects_degenerate_values() {
        for text in [
            "width = 0.0",
            "height = -1.0",
            "menu_peek_ratio = 1.0",
            "shadow_opacity = 1.5",
            "[spring]\nduration_ms = 0",
            "[spring]\ndamping_ratio = -0.1",
        ] {
            let err = ContainerConfig::from_toml_str(text).unwrap_err();
            assert!(matches!(err, Error::InvalidConfig { .. }), "{text}: {err}");
        }
    }

    #[test]
    fn reads_and_writes_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let config = ContainerConfig::builder().width(390.0).host_index(2).build();
        file.write_all(config.to_toml_string().unwrap().as_bytes())
            .unwrap();

        let loaded = ContainerConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(loaded, config);

        let missing = ContainerConfig::from_toml_file("/nonexistent/shinobu.toml").unwrap_err();
        assert!(matches!(missing, Error::ReadConfig { .. }));
    }
}
