use crate::api::client::DEFAULT_ENDPOINT;
use crate::core::{Coordinate, Marker};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const API_KEY_ENV: &str = "OPENCAGE_API_KEY";
pub const LOCATION_ENV: &str = "GEO_PIN_LOCATION";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub geocoding: GeocodingConfig,
    pub search: SearchConfig,
    pub map: MapConfig,
    pub marker: MarkerConfig,
    pub location: LocationConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodingConfig {
    /// OpenCage forward geocoding endpoint
    pub endpoint: String,

    /// API key; OPENCAGE_API_KEY wins over this
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Maximum results per request (service default when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    /// Per-request timeout
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before a search is sent.
    /// 0 sends one request per keystroke.
    pub debounce_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub zoom: u8,
    /// Used only when there is no marker to center on
    pub default_center: Coordinate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    pub id: String,
    pub icon: String,
    pub size: (u16, u16),
    pub default_position: Coordinate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionPolicy {
    Granted,
    Denied,
    /// Ask on the terminal before the UI starts
    Prompt,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub permission: PermissionPolicy,

    /// Position sample reported when permission is granted;
    /// GEO_PIN_LOCATION="lat,lng" wins over this
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Coordinate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Use Unicode glyphs for the marker; ASCII otherwise
    pub use_glyphs: bool,

    /// Open the debug log panel on start
    pub show_log_panel: bool,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            limit: None,
            timeout_ms: 10_000,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { debounce_ms: 300 }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            zoom: 13,
            default_center: Coordinate::new(51.505, -0.09),
        }
    }
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            id: "marker1".to_string(),
            icon: "📍".to_string(),
            size: (32, 32),
            default_position: Coordinate::new(-8.664, -36.006),
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            permission: PermissionPolicy::Prompt,
            position: None,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            use_glyphs: true,
            show_log_panel: false,
        }
    }
}

impl MarkerConfig {
    /// The pin shown before any search or location fix
    pub fn default_marker(&self) -> Marker {
        Marker {
            id: self.id.clone(),
            position: self.default_position,
            icon: self.icon.clone(),
            size: self.size,
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Config {
    /// Load config from the default location, creating it when missing
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save_to(&config_path)?;
            return Ok(default_config.with_env_overrides(|name| std::env::var(name).ok()));
        }

        Ok(Self::load_from(&config_path)?.with_env_overrides(|name| std::env::var(name).ok()))
    }

    /// Parse a config file without applying environment overrides
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Apply OPENCAGE_API_KEY and GEO_PIN_LOCATION from `lookup`
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.geocoding.api_key = Some(key.trim().to_string());
        }

        if let Some(raw) = lookup(LOCATION_ENV) {
            match Coordinate::parse_pair(&raw) {
                Some(position) => self.location.position = Some(position),
                None => tracing::warn!(
                    target: "config",
                    "Ignoring {}={:?}: expected \"lat,lng\"",
                    LOCATION_ENV,
                    raw
                ),
            }
        }

        if !self.display.use_glyphs && self.marker.icon == MarkerConfig::default().icon {
            self.marker.icon = "X".to_string();
        }

        self
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("geo-pin").join("config.toml"))
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        r#"# geo-pin configuration
# Location: ~/.config/geo-pin/config.toml (Linux)
#           ~/Library/Application Support/geo-pin/config.toml (macOS)

[geocoding]
endpoint = "https://api.opencagedata.com/geocode/v1/json"

# Prefer the OPENCAGE_API_KEY environment variable over storing the key here
# api_key = "..."

# Maximum results per lookup (leave commented for the service default)
# limit = 10

timeout_ms = 10000

[search]
# Wait this long after the last keystroke before searching.
# 0 searches on every keystroke.
debounce_ms = 300

[map]
# Center used when there is no marker
default_center = { lat = 51.505, lng = -0.09 }
zoom = 13

[marker]
id = "marker1"
default_position = { lat = -8.664, lng = -36.006 }
icon = "📍"
size = [32, 32]

[location]
# "granted", "denied" or "prompt" (ask on start-up)
permission = "prompt"

# Position reported when permission is granted.
# GEO_PIN_LOCATION="lat,lng" overrides this.
# position = { lat = 48.8566, lng = 2.3522 }

[display]
# Set to false for an ASCII marker
use_glyphs = true

# Open the F5 log panel on start
show_log_panel = false
"#
        .to_string()
    }

    /// Initialize config with a setup wizard
    pub fn init_wizard() -> Result<Self> {
        println!("geo-pin Configuration Setup");
        println!("===========================");

        let mut config = Config::default();

        print!("Does your terminal support Unicode glyphs? (y/n) [y]: ");
        std::io::Write::flush(&mut std::io::stdout())?;
        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        config.display.use_glyphs = !input.trim().eq_ignore_ascii_case("n");

        print!("Use your location on start-up? (y/n/ask) [ask]: ");
        std::io::Write::flush(&mut std::io::stdout())?;
        input.clear();
        std::io::stdin().read_line(&mut input)?;
        config.location.permission = match input.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => PermissionPolicy::Granted,
            "n" | "no" => PermissionPolicy::Denied,
            _ => PermissionPolicy::Prompt,
        };

        print!("Search delay after typing, in ms [300]: ");
        std::io::Write::flush(&mut std::io::stdout())?;
        input.clear();
        std::io::stdin().read_line(&mut input)?;
        if let Ok(ms) = input.trim().parse::<u64>() {
            config.search.debounce_ms = ms;
        }

        config.save()?;

        println!("\nConfiguration saved to: {:?}", Config::get_config_path()?);
        println!("Export {} before starting geo-pin.", API_KEY_ENV);

        Ok(config)
    }
}
