//! Domain events for the toy store.
//!
//! Business operations in `domain` publish a [`DomainEvent`] once they have
//! committed. Infrastructure such as the SSE layer subscribes by registering an
//! [`EventHandler`] with the [`EventPublisher`] held in application state.
//!
//! Entity data travels as the typed `entity` models so subscribers can render it
//! however they need (for example, formatting prices per locale).

use async_trait::async_trait;
use entity::{purchases, toys};
use log::*;
use std::sync::Arc;

/// Business-level changes, emitted after the change has been persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainEvent {
    /// A toy was added to the catalog.
    ToyCreated { toy: toys::Model },
    /// A toy's name, price or currency changed.
    ToyUpdated { toy: toys::Model },
    /// A toy was removed from the catalog. Carries the toy as it was before deletion.
    ToyDeleted { toy: toys::Model },
    /// An account bought a toy. The purchase records the price actually charged.
    ToyPurchased {
        toy: toys::Model,
        purchase: purchases::Model,
    },
}

impl DomainEvent {
    pub fn name(&self) -> &'static str {
        match self {
            DomainEvent::ToyCreated { .. } => "toy_created",
            DomainEvent::ToyUpdated { .. } => "toy_updated",
            DomainEvent::ToyDeleted { .. } => "toy_deleted",
            DomainEvent::ToyPurchased { .. } => "toy_purchased",
        }
    }
}

/// Trait for handling domain events.
/// Implementations perform side effects like sending notifications.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &DomainEvent);
}

/// Publishes domain events to registered handlers.
/// Handlers are called sequentially in registration order.
#[derive(Clone)]
pub struct EventPublisher {
    handlers: Arc<Vec<Arc<dyn EventHandler>>>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Vec::new()),
        }
    }

    /// Register a new event handler.
    /// Note: This creates a new publisher instance with the additional handler.
    /// Store the returned publisher in your application state.
    pub fn with_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        let mut handlers = (*self.handlers).clone();
        handlers.push(handler);
        self.handlers = Arc::new(handlers);
        self
    }

    pub async fn publish(&self, event: DomainEvent) {
        debug!(
            "Publishing {} to {} handler(s)",
            event.name(),
            self.handlers.len()
        );
        for handler in self.handlers.iter() {
            handler.handle(&event).await;
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}
