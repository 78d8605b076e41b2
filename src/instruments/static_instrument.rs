//! Static instrument
//!
//! Holds a fixed set of field values loaded from a layout file. Refreshing
//! changes nothing; actions edit the stored values so a layout can be tried
//! out interactively without any hardware attached.
//!
//! Supported actions:
//! - `toggle:<field>` flips a boolean field (a missing field counts as off)
//! - `set:<field>` stores the numeric argument in the field

use anyhow::{anyhow, bail, Result};
use labterm_core::{Instrument, Logger};
use labterm_types::{is_truthy, ChannelId, FieldMetadata, FieldType, Value};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Layout-file form of a [`StaticInstrument`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticInstrumentConfig {
    pub channel: ChannelId,
    /// Shown in log messages instead of the channel number
    #[serde(default)]
    pub name: Option<String>,
    /// Initial field values
    #[serde(default)]
    pub values: BTreeMap<String, Value>,
}

/// Instrument whose values change only through actions
pub struct StaticInstrument {
    channel: ChannelId,
    name: Option<String>,
    values: HashMap<String, Value>,
    logger: Option<Logger>,
}

impl StaticInstrument {
    pub fn new(channel: ChannelId) -> Self {
        Self {
            channel,
            name: None,
            values: HashMap::new(),
            logger: None,
        }
    }

    pub fn from_config(config: &StaticInstrumentConfig) -> Self {
        let mut instrument = Self::new(config.channel);
        instrument.name = config.name.clone();
        instrument.values = config
            .values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        instrument
    }

    pub fn with_value(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(field.into(), value.into());
        self
    }

    fn log(&self, message: String) {
        match &self.logger {
            Some(logger) => logger.info(message),
            None => log::info!("Instrument {}: {}", self.channel, message),
        }
    }

    fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("channel {}", self.channel))
    }
}

impl Instrument for StaticInstrument {
    fn channel(&self) -> ChannelId {
        self.channel
    }

    fn refresh(&mut self) -> Result<()> {
        Ok(())
    }

    fn values(&self) -> &HashMap<String, Value> {
        &self.values
    }

    fn action(&mut self, action_id: &str, arg: Option<f64>) -> Result<()> {
        let (verb, field) = action_id
            .split_once(':')
            .ok_or_else(|| anyhow!("Unknown action '{}' on {}", action_id, self.label()))?;

        match verb {
            "toggle" => {
                let on = !self.values.get(field).map(is_truthy).unwrap_or(false);
                self.values.insert(field.to_string(), Value::Bool(on));
                self.log(format!("{} -> {}", field, if on { "ON" } else { "OFF" }));
            }
            "set" => {
                let Some(value) = arg else {
                    bail!("Action '{}' needs a value", action_id);
                };
                self.values.insert(field.to_string(), Value::from(value));
                self.log(format!("{} -> {}", field, value));
            }
            _ => bail!("Unknown action '{}' on {}", action_id, self.label()),
        }
        Ok(())
    }

    fn fields(&self) -> Vec<FieldMetadata> {
        let mut fields: Vec<FieldMetadata> = self
            .values
            .iter()
            .map(|(id, value)| {
                let field_type = match value {
                    Value::Bool(_) => FieldType::Boolean,
                    Value::Number(_) => FieldType::Numerical,
                    _ => FieldType::Text,
                };
                FieldMetadata::new(id.clone(), id.clone(), field_type)
            })
            .collect();
        fields.sort_by(|a, b| a.id.cmp(&b.id));
        fields
    }

    fn attach_logger(&mut self, logger: Logger) {
        self.logger = Some(logger);
    }
}
