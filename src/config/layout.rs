//! Layout files
//!
//! A layout is a JSON document describing a whole dashboard: its options,
//! the static instruments it talks to and the items it draws. Items are
//! tagged by `type`:
//!
//! ```json
//! {
//!   "version": 1,
//!   "dashboard": { "header": "Bench PSU" },
//!   "instruments": [ { "channel": 0, "values": { "power": false } } ],
//!   "items": [
//!     { "type": "switch", "x": 0.1, "y": 0.2, "grid": { "x": 0, "y": 0 },
//!       "channel": 0, "field": "power", "action": "toggle:power" }
//!   ]
//! }
//! ```

use super::settings::DashboardConfig;
use crate::dashboard::Dashboard;
use crate::instruments::{StaticInstrument, StaticInstrumentConfig};
use crate::items::{
    BoxedItem, Decoration, Editable, EditableConfig, Label, LabelConfig, Light, LightConfig,
    ParseFailure, Readonly, ReadonlyConfig, Switch, SwitchConfig,
};
use labterm_types::{ChannelId, GridPos, HAlign, Placement, Value};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from loading, saving or building a layout
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("could not access layout file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid layout file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not serialize layout: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("could not determine config directory")]
    NoConfigDir,

    #[error("item {index} uses channel {channel}, which has no instrument")]
    UnknownChannel { index: usize, channel: ChannelId },

    #[error("items {first} and {second} both sit on grid cell ({}, {})", .cell.x, .cell.y)]
    DuplicateCell {
        first: usize,
        second: usize,
        cell: GridPos,
    },
}

/// One item of a layout, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemConfig {
    Label(LabelConfig),
    Switch(SwitchConfig),
    Readonly(ReadonlyConfig),
    Editable(EditableConfig),
    Light(LightConfig),
}

impl ItemConfig {
    /// Instrument channel the item talks to, if any
    pub fn channel(&self) -> Option<ChannelId> {
        match self {
            ItemConfig::Label(_) => None,
            ItemConfig::Switch(c) => Some(c.channel),
            ItemConfig::Readonly(c) => Some(c.channel),
            ItemConfig::Editable(c) => Some(c.channel),
            ItemConfig::Light(c) => Some(c.channel),
        }
    }

    /// Navigable grid cell, if any
    pub fn grid(&self) -> Option<GridPos> {
        match self {
            ItemConfig::Switch(c) => Some(c.grid),
            ItemConfig::Editable(c) => Some(c.grid),
            _ => None,
        }
    }

    pub fn build(&self) -> BoxedItem {
        match self {
            ItemConfig::Label(c) => Box::new(Label::from_config(c)),
            ItemConfig::Switch(c) => Box::new(Switch::from_config(c)),
            ItemConfig::Readonly(c) => Box::new(Readonly::from_config(c)),
            ItemConfig::Editable(c) => Box::new(Editable::from_config(c)),
            ItemConfig::Light(c) => Box::new(Light::from_config(c)),
        }
    }
}

/// A complete dashboard description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Version of the layout format
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub instruments: Vec<StaticInstrumentConfig>,
    #[serde(default)]
    pub items: Vec<ItemConfig>,
}

fn default_version() -> u32 {
    1
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            dashboard: DashboardConfig::default(),
            instruments: Vec::new(),
            items: Vec::new(),
        }
    }
}

impl LayoutConfig {
    /// Load the layout from the user config directory
    ///
    /// Falls back to [`LayoutConfig::sample`] when no layout has been saved.
    pub fn load() -> Result<Self, LayoutError> {
        let path = Self::config_path()?;
        if !path.exists() {
            log::info!("No layout at {}, using the sample layout", path.display());
            return Ok(Self::sample());
        }
        Self::load_from_path(&path)
    }

    /// Save the layout to the user config directory
    pub fn save(&self) -> Result<(), LayoutError> {
        let path = Self::config_path()?;
        self.save_to_path(&path)
    }

    /// Default layout file location
    pub fn config_path() -> Result<PathBuf, LayoutError> {
        let dirs = directories::ProjectDirs::from("org", "labterm", "labterm")
            .ok_or(LayoutError::NoConfigDir)?;
        Ok(dirs.config_dir().join("layout.json"))
    }

    /// Load a layout from a specific file path
    pub fn load_from_path(path: &Path) -> Result<Self, LayoutError> {
        let content = std::fs::read_to_string(path).map_err(|source| LayoutError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| LayoutError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save the layout to a specific file path
    pub fn save_to_path(&self, path: &Path) -> Result<(), LayoutError> {
        let io_err = |source: std::io::Error| LayoutError::Io {
            path: path.to_path_buf(),
            source,
        };

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let content = self.to_json()?;
        std::fs::write(path, content).map_err(io_err)?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, LayoutError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check channel references and grid cells
    pub fn validate(&self) -> Result<(), LayoutError> {
        let channels: HashSet<ChannelId> = self.instruments.iter().map(|i| i.channel).collect();
        let mut cells: HashMap<GridPos, usize> = HashMap::new();

        for (index, item) in self.items.iter().enumerate() {
            if let Some(channel) = item.channel() {
                if !channels.contains(&channel) {
                    return Err(LayoutError::UnknownChannel { index, channel });
                }
            }
            if let Some(cell) = item.grid() {
                if let Some(first) = cells.insert(cell, index) {
                    return Err(LayoutError::DuplicateCell {
                        first,
                        second: index,
                        cell,
                    });
                }
            }
        }
        Ok(())
    }

    /// Create a dashboard with every instrument and item of this layout
    pub fn build(&self) -> Result<Dashboard, LayoutError> {
        self.validate()?;

        let mut dashboard = Dashboard::new(self.dashboard.clone());
        for config in &self.instruments {
            dashboard.add_instrument(StaticInstrument::from_config(config));
        }
        dashboard.add_items(self.items.iter().map(ItemConfig::build));
        Ok(dashboard)
    }

    /// A bench power supply with an interlock
    pub fn sample() -> Self {
        let psu = StaticInstrumentConfig {
            channel: 0,
            name: Some("PSU".to_string()),
            values: BTreeMap::from([
                ("power".to_string(), Value::Bool(false)),
                ("voltage".to_string(), Value::from(5.0)),
                ("current".to_string(), Value::from(0.125)),
                ("mode".to_string(), Value::from("CV")),
            ]),
        };
        let interlock = StaticInstrumentConfig {
            channel: 1,
            name: Some("Interlock".to_string()),
            values: BTreeMap::from([("armed".to_string(), Value::Bool(true))]),
        };

        let decorated = |before: &str, after: &str| Decoration {
            text_before: before.to_string(),
            text_after: after.to_string(),
        };

        let items = vec![
            ItemConfig::Label(LabelConfig {
                placement: Placement::prop(0.5, 0.1).align(HAlign::Center),
                text: "Bench power supply".to_string(),
                decoration: Decoration::default(),
            }),
            ItemConfig::Switch(SwitchConfig {
                placement: Placement::prop(0.1, 0.2),
                grid: GridPos::new(0, 0),
                channel: 0,
                field: "power".to_string(),
                action: "toggle:power".to_string(),
                initial_value: false,
                on_text: "ON".to_string(),
                off_text: "OFF".to_string(),
                decoration: decorated("Output  ", ""),
            }),
            ItemConfig::Editable(EditableConfig {
                placement: Placement::prop(0.1, 0.3),
                grid: GridPos::new(0, 1),
                channel: 0,
                field: "voltage".to_string(),
                action: "set:voltage".to_string(),
                initial_value: 0.0,
                decimals: 2,
                on_parse_error: ParseFailure::default(),
                decoration: decorated("Voltage ", " V"),
            }),
            ItemConfig::Readonly(ReadonlyConfig {
                placement: Placement::prop(0.1, 0.4),
                channel: 0,
                field: "current".to_string(),
                initial_value: Some(Value::from(0.0)),
                decimals: 3,
                decoration: decorated("Current ", " A"),
            }),
            ItemConfig::Readonly(ReadonlyConfig {
                placement: Placement::prop(0.1, 0.5),
                channel: 0,
                field: "mode".to_string(),
                initial_value: None,
                decimals: 0,
                decoration: decorated("Mode    ", ""),
            }),
            ItemConfig::Light(LightConfig {
                placement: Placement::prop(0.6, 0.2),
                channel: 1,
                field: "armed".to_string(),
                initial_value: Some(Value::Bool(false)),
                decoration: decorated("Interlock ", ""),
            }),
            ItemConfig::Switch(SwitchConfig {
                placement: Placement::prop(0.6, 0.3),
                grid: GridPos::new(1, 0),
                channel: 1,
                field: "armed".to_string(),
                action: "toggle:armed".to_string(),
                initial_value: false,
                on_text: "ARMED".to_string(),
                off_text: "SAFE".to_string(),
                decoration: decorated("Arm ", ""),
            }),
        ];

        Self {
            version: default_version(),
            dashboard: DashboardConfig {
                header: "labterm sample".to_string(),
                ..DashboardConfig::default()
            },
            instruments: vec![psu, interlock],
            items,
        }
    }
}
