//! Application configuration.

use crate::error::Result;
use crate::surface::Rgb;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the [`App`](crate::app::App).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Window or terminal title.
    pub title: Option<String>,
    /// Canvas width in pixels.
    pub width: i32,
    /// Canvas height in pixels.
    pub height: i32,
    /// Target frames per second.
    pub target_fps: u32,
    /// Maximum gap between two mouse-downs forming a double-click.
    pub double_click_delay_ms: u64,
    /// Size of the right and bottom drop-shadow bands.
    pub shadow_offset: i32,
    /// Canvas background color.
    pub background: Rgb,
    /// Period of the animation heartbeat timer.
    pub heartbeat_ms: u64,
    /// Whether to clear the canvas with the background color every frame.
    pub clear_screen: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: None,
            width: 640,
            height: 480,
            target_fps: 60,
            double_click_delay_ms: 250,
            shadow_offset: 6,
            background: Rgb::BACKGROUND,
            heartbeat_ms: 25,
            clear_screen: true,
        }
    }
}

impl AppConfig {
    /// Parse a configuration from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The double-click window.
    pub const fn double_click_delay(&self) -> Duration {
        Duration::from_millis(self.double_click_delay_ms)
    }

    /// The heartbeat period.
    pub const fn heartbeat(&self) -> Duration {
        Duration::from_millis(self.heartbeat_ms)
    }

    /// Time budget of one frame.
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs(1) / self.target_fps.max(1)
    }
}
