//! Errors for the N2K AIS bridge
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("MQTT client error")]
    MqttClientError(#[from] rumqttc::ClientError),

    #[error("Serialization error")]
    SerdeError(#[from] serde_json::Error),

    #[error("Configuration error")]
    ConfigError(#[from] config::ConfigError),

    #[error("Invalid configuration: {message}")]
    ConfigurationError { message: String },

    #[error("Invalid MMSI: {0}")]
    InvalidMmsi(String),

    #[error("Malformed PGN {pgn}: {origin}")]
    MalformedPgn { pgn: u32, origin: String },
}
