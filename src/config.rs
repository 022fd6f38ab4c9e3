//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the buoys.toml file.
//! It provides a centralized way to configure the LED panel, animation pacing,
//! sprite assets and the list of buoy stations to show.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Default configuration file, looked up in the working directory
pub const CONFIG_FILE: &str = "buoys.toml";

/// Application configuration loaded from buoys.toml
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// LED panel geometry and driver options
    pub display: DisplayConfig,
    /// Frame pacing per animation kind
    pub timing: TimingConfig,
    /// Sprite files and font
    pub assets: AssetConfig,
    /// Headline appearance
    pub text: TextConfig,
    /// Buoy stations, shown in order
    pub stations: Vec<StationConfig>,
}

/// Panel options passed to the matrix driver
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Rows per panel
    pub rows: u32,
    /// Columns per panel
    pub cols: u32,
    /// Panels daisy-chained on one output
    pub chain_length: u32,
    /// Parallel chains
    pub parallel: u32,
    /// GPIO wiring name understood by the driver (e.g. "classic-pi1", "adafruit-hat")
    pub hardware_mapping: String,
    /// Print the measured refresh rate to the console
    pub show_refresh_rate: bool,
}

/// Delay after each frame, per animation kind
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct TimingConfig {
    pub sprite_ms: u64,
    pub scroll_ms: u64,
    pub chart_ms: u64,
    /// Ticks the settled wave chart stays up before draining
    pub chart_hold_ticks: u32,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Intro animation sprite
    pub wave_sprite: PathBuf,
    /// Play-throughs of the intro sprite per cycle
    pub wave_repeat: u32,
    /// Trend arrows: frame 0 rising, frame 1 falling
    pub arrow_sprite: PathBuf,
    /// Glyph set name, see `text::Glyphs::NAMES`
    pub font: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct TextConfig {
    /// Headline colour as [r, g, b]
    pub color: [u8; 3],
    /// Row of the arrow icon's top edge
    pub icon_top: i32,
    /// Blank columns between arrow and text
    pub gap: i32,
}

/// One buoy station
#[derive(Debug, Deserialize, Serialize)]
pub struct StationConfig {
    /// Human-readable name used in the headline
    pub name: String,
    /// NOAA realtime text file for the station (e.g. "46013_5day.txt")
    pub data_file: PathBuf,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            rows: 16,
            cols: 32,
            chain_length: 1,
            parallel: 1,
            hardware_mapping: "classic-pi1".to_string(),
            show_refresh_rate: false,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            sprite_ms: 70,
            scroll_ms: 50,
            chart_ms: 20,
            chart_hold_ticks: 100,
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        AssetConfig {
            wave_sprite: PathBuf::from("wave.bin"),
            wave_repeat: 3,
            arrow_sprite: PathBuf::from("arrows.bin"),
            font: "6x10".to_string(),
        }
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        TextConfig {
            color: [255, 255, 255],
            icon_top: 4,
            gap: 2,
        }
    }
}

impl DisplayConfig {
    /// Total width in pixels across the chain
    pub fn width(&self) -> u32 {
        self.cols * self.chain_length
    }

    /// Total height in pixels across parallel chains
    pub fn height(&self) -> u32 {
        self.rows * self.parallel
    }
}

impl TimingConfig {
    pub fn sprite_interval(&self) -> Duration {
        Duration::from_millis(self.sprite_ms)
    }

    pub fn scroll_interval(&self) -> Duration {
        Duration::from_millis(self.scroll_ms)
    }

    pub fn chart_interval(&self) -> Duration {
        Duration::from_millis(self.chart_ms)
    }
}

impl Config {
    /// Load configuration from buoys.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!(
                        "Loaded configuration with {} station(s)",
                        config.stations.len()
                    );
                    config
                }
                Err(e) => {
                    warn!("Invalid config file format: {}", e);
                    warn!("Using default configuration");
                    Self::default()
                }
            },
            Err(_) => {
                info!(
                    "No config file found at {}, using default configuration",
                    path.as_ref().display()
                );
                Self::default()
            }
        }
    }

    /// Save current configuration to the given path
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        info!("Configuration saved to {}", path.as_ref().display());
        Ok(())
    }
}
