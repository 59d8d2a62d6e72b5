//! MQTT client implementation

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};

use crate::{ais::AisAttributes, config::MqttConfig, errors::BridgeError, models::PgnRecord};

/// MQTT client for receiving PGN records and publishing AIS records
pub struct MqttClientBuilder {
    client: AsyncClient,
    event_loop: EventLoop,
    tx: mpsc::Sender<Result<PgnRecord, BridgeError>>,
    rx: mpsc::Receiver<Result<PgnRecord, BridgeError>>,
}

pub struct MqttClient {
    client: AsyncClient,
    rx: mpsc::Receiver<Result<PgnRecord, BridgeError>>,
    _handle: tokio::task::JoinHandle<Result<(), BridgeError>>,
}

impl MqttClientBuilder {
    /// Create a new MQTT client
    pub fn new(config: &MqttConfig) -> Result<Self, BridgeError> {
        let mut mqtt_options = Self::options(config)?;
        mqtt_options.set_keep_alive(config.keep_alive);

        let (client, event_loop) = AsyncClient::new(mqtt_options, 100);

        // Create a channel for message passing
        let (tx, rx) = mpsc::channel(100);

        Ok(Self {
            client,
            event_loop,
            tx,
            rx,
        })
    }

    /// Broker options from the configured URI, transport chosen by scheme
    fn options(config: &MqttConfig) -> Result<MqttOptions, BridgeError> {
        let separator = if config.uri.contains('?') { '&' } else { '?' };
        let url = format!("{}{}client_id={}", config.uri, separator, config.client_id);
        MqttOptions::parse_url(url).map_err(|e| BridgeError::ConfigurationError {
            message: format!("Invalid MQTT URI {}: {}", config.uri, e),
        })
    }

    /// Connect to MQTT broker and subscribe to topics
    ///
    /// Note: Initial subscription needs not be done here, as it is done
    /// in the event loop.
    pub async fn connect(self, topics: &[String]) -> Result<MqttClient, BridgeError> {
        let topics = topics.to_vec();

        let _handle = tokio::spawn(Self::process_events(
            self.tx,
            self.event_loop,
            self.client.clone(), // Clone client for event loop
            topics,
        ));

        Ok(MqttClient {
            client: self.client,
            rx: self.rx,
            _handle,
        })
    }

    async fn subscribe(client: AsyncClient, topics: &[String]) -> Result<(), BridgeError> {
        for topic in topics.iter() {
            info!("Subscribing to topic: {}", topic);
            client.subscribe(topic, QoS::AtLeastOnce).await?;
        }
        Ok(())
    }

    /// Process MQTT events
    ///
    /// `rumqttc` reconnects automatically when the connection is lost, but
    /// subscriptions need to be re-established, so they are made on every
    /// ConnAck.
    ///
    /// NOTE: If topic subscription fails, the loop will break and return an error.
    async fn process_events(
        tx: mpsc::Sender<Result<PgnRecord, BridgeError>>,
        mut event_loop: EventLoop,
        client: AsyncClient,
        topics: Vec<String>,
    ) -> Result<(), BridgeError> {
        loop {
            match event_loop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    info!("Connected to MQTT broker, subscribing to topics");
                    if let Err(e) = Self::subscribe(client.clone(), &topics).await {
                        error!("Failed to subscribe: {}", e);
                        break Err(e);
                    }
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    match Self::parse_message(&publish.payload) {
                        Ok(record) => {
                            if let Err(e) = tx.send(Ok(record)).await {
                                error!("Failed to send message: {}", e);
                            }
                        }
                        Err(e) => {
                            warn!("Failed to parse message on {}: {}", publish.topic, e);
                        }
                    }
                }
                Err(e) => {
                    error!("MQTT Error: {}", e);
                    continue;
                }
                _ => continue,
            }
        }
    }

    /// Parse an incoming PGN record
    fn parse_message(payload: &[u8]) -> Result<PgnRecord, BridgeError> {
        Ok(serde_json::from_slice(payload)?)
    }
}

impl MqttClient {
    /// Receive next PGN record
    pub async fn recv(&mut self) -> Result<Option<PgnRecord>, BridgeError> {
        self.rx.recv().await.transpose()
    }

    /// Publish an AIS record on every output channel
    pub async fn publish(
        &self,
        events: &[String],
        attributes: &AisAttributes,
    ) -> Result<usize, BridgeError> {
        let payload = serde_json::to_vec(attributes)?;
        for event in events {
            debug!("Publishing AIS message {} on {}", attributes.mmsi, event);
            self.client
                .publish(event, QoS::AtLeastOnce, false, payload.clone())
                .await?;
        }
        Ok(events.len())
    }
}
