use std::{convert::Infallible, sync::Arc, time::Duration};

use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use serde_json::Value as JsonValue;
use tokio::sync::broadcast;
use tokio_stream::{StreamExt, wrappers::BroadcastStream};

use warung_events::{EventBus, EventEnvelope};
use warung_infra::config::Config;
use warung_infra::services::{Ledger, LedgerError, seed_demo};

/// Committed event forwarded to SSE clients.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RealtimeMessage {
    pub topic: String,
    pub payload: JsonValue,
}

impl RealtimeMessage {
    fn from_envelope(env: &EventEnvelope<JsonValue>) -> Self {
        Self {
            topic: env.aggregate_type().to_string(),
            payload: serde_json::json!({
                "aggregate_id": env.aggregate_id().to_string(),
                "sequence_number": env.sequence_number(),
                "event": env.payload(),
            }),
        }
    }
}

/// Shared state behind every handler.
pub struct AppServices {
    pub ledger: Ledger,
    realtime_tx: broadcast::Sender<RealtimeMessage>,
}

impl AppServices {
    pub fn realtime_tx(&self) -> &broadcast::Sender<RealtimeMessage> {
        &self.realtime_tx
    }
}

pub fn build_services(config: &Config) -> Result<AppServices, LedgerError> {
    let ledger = Ledger::new(config);
    let (realtime_tx, _realtime_rx) = broadcast::channel::<RealtimeMessage>(256);

    // Bridge the synchronous bus to the async broadcast channel. The thread
    // ends once the ledger (and with it the bus) is dropped.
    {
        let sub = ledger.bus().subscribe();
        let realtime_tx = realtime_tx.clone();
        std::thread::spawn(move || {
            while let Ok(env) = sub.recv() {
                if realtime_tx.send(RealtimeMessage::from_envelope(&env)).is_err() {
                    tracing::trace!(aggregate_type = env.aggregate_type(), "no realtime listeners");
                }
            }
            tracing::debug!("event bus closed; realtime bridge stopped");
        });
    }

    if config.seed_demo {
        seed_demo(&ledger)?;
    }

    Ok(AppServices {
        ledger,
        realtime_tx,
    })
}

pub fn event_sse_stream(
    services: Arc<AppServices>,
) -> Sse<impl tokio_stream::Stream<Item = Result<SseEvent, Infallible>>> {
    let rx = services.realtime_tx().subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|msg| match msg {
        Ok(m) => {
            let data = serde_json::to_string(&m.payload).unwrap_or_else(|_| "{}".to_string());
            Some(Ok(SseEvent::default().event(m.topic).data(data)))
        }
        // Lagged receivers skip what they missed.
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use warung_menu::{MenuCategory, MenuItemDetails};

    #[tokio::test]
    async fn bridge_keeps_forwarding_after_events_with_no_listeners() {
        // Demo seeding publishes before anyone subscribes.
        let services = build_services(&Config {
            seed_demo: true,
            ..Config::default()
        })
        .unwrap();
        let mut rx = services.realtime_tx().subscribe();

        services
            .ledger
            .add_menu_item(MenuItemDetails {
                name: "Sate Ayam".to_string(),
                category: MenuCategory::Main,
                price: 22_000,
                description: String::new(),
                stock: 10,
            })
            .unwrap();

        let msg = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(msg.topic, warung_menu::AGGREGATE_TYPE);
        assert_eq!(msg.payload["sequence_number"], 1);
    }
}
