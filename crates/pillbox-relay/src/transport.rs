use std::time::Duration;

use async_trait::async_trait;
use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use tokio::sync::mpsc;
use tracing::{info, warn};

use pillbox_core::config::BrokerConfig;

use crate::error::RelayError;

/// Delay before re-polling the event loop after a connection error. rumqttc
/// reconnects on its own; this just keeps a dead broker from busy-looping us.
const RECONNECT_PAUSE_SECS: u64 = 5;

/// Capacity of the inbound sync-request channel. Messages are handled one at
/// a time; anything beyond this backlog is dropped by the event-loop task.
const INBOUND_BUFFER: usize = 16;

/// Outbound publishing seam. The gateway and relay hold this as a trait
/// object so tests can swap in a recording fake.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, topic: &str, payload: String) -> Result<(), RelayError>;
}

/// [`Publisher`] backed by a rumqttc [`AsyncClient`].
#[derive(Clone)]
pub struct MqttPublisher {
    client: AsyncClient,
}

#[async_trait]
impl Publisher for MqttPublisher {
    async fn publish(&self, topic: &str, payload: String) -> Result<(), RelayError> {
        self.client
            .publish(topic, QoS::AtLeastOnce, false, payload.into_bytes())
            .await
            .map_err(|e| RelayError::Transport(e.to_string()))
    }
}

/// Build the MQTT client and spawn its event-loop task.
///
/// Returns the publisher plus the receiver carrying raw inbound payloads from
/// the sync topic. The subscription is (re)established on every CONNACK, so
/// it survives the client's automatic reconnects.
pub fn connect(cfg: &BrokerConfig) -> (MqttPublisher, mpsc::Receiver<Vec<u8>>) {
    let mut options = MqttOptions::new(&cfg.client_id, &cfg.host, cfg.port);
    options.set_keep_alive(Duration::from_secs(30));

    let (client, mut eventloop) = AsyncClient::new(options, INBOUND_BUFFER);
    let (inbound_tx, inbound_rx) = mpsc::channel(INBOUND_BUFFER);

    let subscriber = client.clone();
    let inbound_topic = cfg.inbound_topic.clone();
    let broker = format!("{}:{}", cfg.host, cfg.port);

    tokio::spawn(async move {
        loop {
            match eventloop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    info!(%broker, topic = %inbound_topic, "connected to broker, subscribing");
                    if let Err(e) = subscriber.subscribe(&inbound_topic, QoS::AtLeastOnce).await {
                        warn!(error = %e, "subscribe failed");
                    }
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    // Dropping on a full buffer keeps the event loop live; the
                    // device re-requests on its next wake anyway.
                    if inbound_tx.try_send(publish.payload.to_vec()).is_err() {
                        warn!(topic = %publish.topic, "inbound buffer full — sync request dropped");
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(%broker, error = %e, "mqtt connection error, retrying");
                    tokio::time::sleep(Duration::from_secs(RECONNECT_PAUSE_SECS)).await;
                }
            }
        }
    });

    (MqttPublisher { client }, inbound_rx)
}
