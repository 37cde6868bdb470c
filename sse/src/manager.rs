use crate::connection::{AccountId, ConnectionId, ConnectionRegistry};
use crate::message::{Audience, Event as SseEvent, EventType, MessageScope};
use axum::response::sse::Event;
use domain::Locale;
use log::*;
use std::collections::HashSet;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

pub struct Manager {
    registry: Arc<ConnectionRegistry>,
}

impl Manager {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(ConnectionRegistry::new()),
        }
    }

    /// Register a new connection and return its unique ID
    pub fn register_connection(
        &self,
        account_id: AccountId,
        audience: Audience,
        sender: UnboundedSender<Result<Event, Infallible>>,
    ) -> ConnectionId {
        let locale = audience.locale;
        let connection_id = self.registry.register(account_id, audience, sender);
        info!(
            "Registered SSE connection {} for account {account_id} ({locale}); {} open",
            connection_id.as_str(),
            self.registry.connection_count()
        );
        connection_id
    }

    /// Unregister a connection by ID
    pub fn unregister_connection(&self, connection_id: &ConnectionId) {
        self.registry.unregister(connection_id);
        info!(
            "Unregistered SSE connection {}; {} open",
            connection_id.as_str(),
            self.registry.connection_count()
        );
    }

    /// Sends a message to every connection in `scope`.
    ///
    /// `render` is called once per distinct audience (locale and time zone) among
    /// those connections, and each rendering is serialized once, so subscribers get
    /// payloads formatted for them without per-connection work.
    pub fn send_message<F>(&self, scope: MessageScope, render: F)
    where
        F: Fn(&Audience) -> SseEvent,
    {
        for (audience, connection_ids) in self.registry.audiences(&scope) {
            let sse_event = render(&audience);
            let event_type = sse_event.event_type();

            let event_data = match serde_json::to_string(&sse_event) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize SSE event {event_type}: {e}");
                    continue;
                }
            };

            debug!(
                "Sending {event_type} to {} connection(s) in {}",
                connection_ids.len(),
                audience.locale
            );
            let event = Event::default().event(event_type).data(event_data);
            self.registry.send(&connection_ids, event);
        }
    }

    pub fn active_locales(&self) -> HashSet<Locale> {
        self.registry.active_locales()
    }

    pub fn connection_count(&self) -> usize {
        self.registry.connection_count()
    }
}

impl Default for Manager {
    fn default() -> Self {
        Self::new()
    }
}
