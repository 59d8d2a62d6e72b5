//! Application configuration

use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Deserializer};
use serde_with::serde_as;
use tracing::warn;

use crate::{errors::BridgeError, models::Mmsi};

const DEFAULT_EVENT: &str = "nmea0183out";

const ENV_PREFIX: &str = "N2KAIS";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub mqtt: MqttConfig,
    #[serde(default)]
    pub mapper: MapperConfig,
}

#[serde_as]
#[derive(Debug, Deserialize, Clone)]
pub struct MqttConfig {
    /// Broker URI, `mqtt://`, `mqtts://`, `ws://` or `wss://`
    pub uri: String,
    /// Topics carrying decoded PGN records
    pub topics: Vec<String>,
    pub client_id: String,
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    #[serde(default = "default_keep_alive")]
    pub keep_alive: Duration,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct MapperConfig {
    /// Output channels the AIS records are published on
    #[serde(default = "default_events", deserialize_with = "deserialize_events")]
    pub events: Vec<String>,
    /// Forward messages of our own vessel
    #[serde(default)]
    pub send_self: bool,
    #[serde(default)]
    pub own_mmsi: Option<Mmsi>,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            events: default_events(),
            send_self: false,
            own_mmsi: None,
        }
    }
}

fn default_keep_alive() -> Duration {
    Duration::from_secs(5)
}

fn default_events() -> Vec<String> {
    vec![DEFAULT_EVENT.to_string()]
}

/// Output channels either as a list or as one comma separated string
fn deserialize_events<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Events {
        List(Vec<String>),
        Joined(String),
    }

    let events = match Events::deserialize(deserializer)? {
        Events::List(list) => list,
        Events::Joined(joined) => joined.split(',').map(str::to_string).collect(),
    };
    Ok(events
        .iter()
        .map(|e| e.trim())
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .collect())
}

impl AppConfig {
    /// Load from `config/default` if present, overridden by environment
    pub fn load() -> Result<Self, BridgeError> {
        Self::build(
            File::with_name("config/default").required(false),
            ENV_PREFIX,
        )
    }

    /// Load from the given file, overridden by environment
    pub fn load_from(path: &Path) -> Result<Self, BridgeError> {
        Self::build(File::from(path), ENV_PREFIX)
    }

    fn build<S>(file: S, env_prefix: &str) -> Result<Self, BridgeError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config = Config::builder()
            .add_source(file)
            .add_source(Self::environment(env_prefix))
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn environment(prefix: &str) -> Environment {
        Environment::with_prefix(prefix)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("mqtt.topics")
            .with_list_parse_key("mapper.events")
    }

    pub fn validate(&self) -> Result<(), BridgeError> {
        self.mqtt.validate()?;
        self.mapper.validate()?;
        Ok(())
    }
}

impl MqttConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), BridgeError> {
        if self.uri.trim().is_empty() {
            return Err(BridgeError::ConfigurationError {
                message: "MQTT URI cannot be empty".to_string(),
            });
        }
        if self.client_id.trim().is_empty() {
            return Err(BridgeError::ConfigurationError {
                message: "MQTT client id cannot be empty".to_string(),
            });
        }
        if self.topics.iter().all(|t| t.trim().is_empty()) {
            return Err(BridgeError::ConfigurationError {
                message: "At least one input topic is required".to_string(),
            });
        }
        if self.keep_alive.is_zero() {
            warn!("MQTT keep alive is zero, broker pings disabled");
        }
        Ok(())
    }
}

impl MapperConfig {
    pub fn validate(&self) -> Result<(), BridgeError> {
        if self.events.is_empty() {
            return Err(BridgeError::ConfigurationError {
                message: "At least one output event is required".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::io::Write;

    const TEST_VARS: [(&str, &str); 4] = [
        ("N2KAIS__MQTT__URI", "mqtt://localhost:1883"),
        ("N2KAIS__MQTT__TOPICS", "n2k/129038,n2k/129039"),
        ("N2KAIS__MQTT__CLIENT_ID", "test_client"),
        ("N2KAIS__MAPPER__EVENTS", "nmea0183out, ais_out"),
    ];

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    #[test]
    fn test_load_config() {
        for (key, value) in TEST_VARS {
            env::set_var(key, value);
        }

        let config = AppConfig::load();

        for (key, _) in TEST_VARS {
            env::remove_var(key);
        }

        let config = config.unwrap();
        assert_eq!(config.mqtt.uri, "mqtt://localhost:1883");
        assert_eq!(config.mqtt.topics, vec!["n2k/129038", "n2k/129039"]);
        assert_eq!(config.mqtt.client_id, "test_client");
        assert_eq!(config.mapper.events, vec!["nmea0183out", "ais_out"]);
    }

    #[test]
    fn test_environment_overrides_file() {
        let file = write_config(
            r#"
[mqtt]
uri = "mqtt://broker:1883"
topics = ["n2k/out"]
client_id = "from_file"

[mapper]
events = "from_file"
"#,
        );
        env::set_var("N2KAIS_OVERRIDE_TEST__MAPPER__EVENTS", "a,b");
        env::set_var("N2KAIS_OVERRIDE_TEST__MQTT__CLIENT_ID", "from_env");

        let config = AppConfig::build(File::from(file.path()), "N2KAIS_OVERRIDE_TEST");

        env::remove_var("N2KAIS_OVERRIDE_TEST__MAPPER__EVENTS");
        env::remove_var("N2KAIS_OVERRIDE_TEST__MQTT__CLIENT_ID");

        let config = config.unwrap();
        assert_eq!(config.mqtt.client_id, "from_env");
        assert_eq!(config.mqtt.uri, "mqtt://broker:1883");
        assert_eq!(config.mapper.events, vec!["a", "b"]);
    }

    #[test]
    fn test_load_config_from_file() {
        let file = write_config(
            r#"
[mqtt]
uri = "mqtt://broker:1883"
topics = ["n2k/out"]
client_id = "from_file"
keep_alive = 30

[mapper]
events = "one,  two ,"
send_self = true
own_mmsi = 367515850
"#,
        );

        // Prefix with no variables set, so only the file is read
        let config = AppConfig::build(File::from(file.path()), "N2KAIS_FILE_TEST").unwrap();
        assert_eq!(config.mqtt.uri, "mqtt://broker:1883");
        assert_eq!(config.mqtt.topics, vec!["n2k/out"]);
        assert_eq!(config.mqtt.client_id, "from_file");
        assert_eq!(config.mqtt.keep_alive, Duration::from_secs(30));
        assert_eq!(config.mapper.events, vec!["one", "two"]);
        assert!(config.mapper.send_self);
        assert_eq!(
            config.mapper.own_mmsi,
            Some(Mmsi::try_from(367515850).unwrap())
        );
    }

    #[test]
    fn test_mapper_config_defaults() {
        let config = MapperConfig::default();
        assert_eq!(config.events, vec!["nmea0183out"]);
        assert!(!config.send_self);
        assert_eq!(config.own_mmsi, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_events_from_joined_string() {
        let config: MapperConfig =
            serde_json::from_str(r#"{"events": " a, b ,,c "}"#).unwrap();
        assert_eq!(config.events, vec!["a", "b", "c"]);

        let config: MapperConfig = serde_json::from_str(r#"{"events": ", "}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_mqtt_config_validate() {
        let config = MqttConfig {
            uri: "mqtt://localhost:1883".to_string(),
            topics: vec!["n2k/out".to_string()],
            client_id: "bridge".to_string(),
            keep_alive: Duration::from_secs(5),
        };
        assert!(config.validate().is_ok());

        let invalid = MqttConfig {
            uri: "".to_string(),
            ..config.clone()
        };
        assert!(invalid.validate().is_err());

        let invalid = MqttConfig {
            topics: vec![],
            ..config
        };
        assert!(invalid.validate().is_err());
    }
}
