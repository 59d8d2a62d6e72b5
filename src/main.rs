//! N2K AIS to NMEA0183 bridge

use n2k_ais_bridge::{
    config::AppConfig,
    errors::BridgeError,
    mapper::AisMapper,
    mqtt::{MqttClient, MqttClientBuilder},
};
use tokio::signal;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() -> Result<(), BridgeError> {
    #[cfg(feature = "dotenvy")]
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load configuration, preferring environment variables and config files
    let config = AppConfig::load()?;
    info!("Output events: {:?}", config.mapper.events);

    let mapper = AisMapper::from_config(&config.mapper);

    let mqtt_client = MqttClientBuilder::new(&config.mqtt)?
        .connect(&config.mqtt.topics)
        .await?;

    // Setup signal handling for graceful shutdown
    let shutdown_signal = signal::ctrl_c();

    tokio::select! {
        result = run_bridge(mqtt_client, mapper, &config.mapper.events) => {
            info!("Bridge completed: {:?}", result);
        }
        _ = shutdown_signal => {
            info!("Received shutdown signal");
        }
    }

    Ok(())
}

async fn run_bridge(
    mut mqtt_client: MqttClient,
    mapper: AisMapper,
    events: &[String],
) -> Result<(), BridgeError> {
    loop {
        match mqtt_client.recv().await {
            Ok(Some(record)) => {
                let Some(attributes) = mapper.convert(&record) else {
                    continue;
                };
                match mqtt_client.publish(events, &attributes).await {
                    Ok(count) => debug!("Sent AIS message to {} outputs", count),
                    Err(e) => error!("Publish error: {}", e),
                }
            }
            Ok(None) => break, // Channel closed
            Err(e) => {
                error!("MQTT receive error: {}", e);
                break;
            }
        }
    }

    Ok(())
}
