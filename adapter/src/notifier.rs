use dashmap::DashMap;
use kernel::{
    event::{BookingEvent, EventPublisher},
    model::id::RoomId,
};
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 256;

/// In-process fan-out of booking events, one broadcast channel per room.
/// Delivery is best-effort: publishing to a room nobody watches is a no-op
/// and lagging subscribers lose the oldest events.
pub struct RoomEventHub {
    channels: DashMap<RoomId, broadcast::Sender<BookingEvent>>,
}

impl RoomEventHub {
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
        }
    }

    /// Subscribe to events for a room. Creates the channel if needed.
    pub fn subscribe(&self, room_id: RoomId) -> broadcast::Receiver<BookingEvent> {
        let sender = self
            .channels
            .entry(room_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0);
        sender.subscribe()
    }

    /// Remove a room's channel (e.g. after the room is deactivated).
    pub fn remove(&self, room_id: &RoomId) {
        self.channels.remove(room_id);
    }
}

impl Default for RoomEventHub {
    fn default() -> Self {
        Self::new()
    }
}

impl EventPublisher for RoomEventHub {
    fn publish(&self, event: BookingEvent) {
        if let Some(sender) = self.channels.get(&event.room_id()) {
            let _ = sender.send(event);
        }
    }
}
