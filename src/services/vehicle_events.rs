//! Bus de eventos de vehículos
//!
//! Notifica a los observadores (refresco de UI, auditoría) después de cada
//! escritura confirmada. Publicar sin suscriptores no es un error.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

use crate::models::{Location, VehicleStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VehicleEvent {
    Registered {
        vehicle_id: Uuid,
        vin: String,
        location: Location,
    },
    Moved {
        vehicle_id: Uuid,
        from_location: Location,
        to_location: Location,
        from_status: VehicleStatus,
        to_status: VehicleStatus,
        at: DateTime<Utc>,
    },
    WarrantyUpdated {
        vehicle_id: Uuid,
    },
    Received {
        vehicle_id: Uuid,
    },
}

impl VehicleEvent {
    pub fn vehicle_id(&self) -> Uuid {
        match self {
            VehicleEvent::Registered { vehicle_id, .. }
            | VehicleEvent::Moved { vehicle_id, .. }
            | VehicleEvent::WarrantyUpdated { vehicle_id }
            | VehicleEvent::Received { vehicle_id } => *vehicle_id,
        }
    }
}

#[derive(Clone)]
pub struct VehicleEventBus {
    sender: broadcast::Sender<VehicleEvent>,
}

impl VehicleEventBus {
    pub const DEFAULT_CAPACITY: usize = 256;

    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<VehicleEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: VehicleEvent) {
        match self.sender.send(event) {
            Ok(receivers) => debug!("📣 Evento publicado a {} suscriptores", receivers),
            Err(_) => debug!("📣 Evento sin suscriptores"),
        }
    }
}

impl Default for VehicleEventBus {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_events() {
        let bus = VehicleEventBus::default();
        let mut rx = bus.subscribe();
        let id = Uuid::new_v4();

        bus.publish(VehicleEvent::Received { vehicle_id: id });

        let event = rx.recv().await.unwrap();
        assert_eq!(event.vehicle_id(), id);
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = VehicleEventBus::new(0);
        bus.publish(VehicleEvent::WarrantyUpdated {
            vehicle_id: Uuid::nil(),
        });
    }

    #[test]
    fn test_event_json_shape() {
        let json = serde_json::to_value(VehicleEvent::WarrantyUpdated {
            vehicle_id: Uuid::nil(),
        })
        .unwrap();
        assert_eq!(json["type"], "warranty_updated");
    }
}
