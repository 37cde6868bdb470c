use crate::message::{Event as SseEvent, LocalizedPurchase, LocalizedToy, MessageScope};
use crate::Manager;
use async_trait::async_trait;
use events::{DomainEvent, EventHandler};
use log::*;
use std::sync::Arc;

/// Fans domain events out to SSE subscribers.
///
/// Catalog changes go to every connection, rendered once per audience so each
/// subscriber sees prices in their own locale. A purchase additionally sends
/// `purchase_completed` to the buyer's own connections.
pub struct SseDomainEventHandler {
    sse_manager: Arc<Manager>,
}

impl SseDomainEventHandler {
    pub fn new(sse_manager: Arc<Manager>) -> Self {
        Self { sse_manager }
    }
}

#[async_trait]
impl EventHandler for SseDomainEventHandler {
    async fn handle(&self, event: &DomainEvent) {
        debug!(
            "Handling {} for {} SSE connection(s) across locales {:?}",
            event.name(),
            self.sse_manager.connection_count(),
            self.sse_manager.active_locales()
        );

        match event {
            DomainEvent::ToyCreated { toy } => {
                self.sse_manager
                    .send_message(MessageScope::Broadcast, |audience| SseEvent::ToyCreated {
                        toy: LocalizedToy::new(toy, audience.locale),
                    });
            }

            DomainEvent::ToyUpdated { toy } => {
                self.sse_manager
                    .send_message(MessageScope::Broadcast, |audience| SseEvent::ToyUpdated {
                        toy: LocalizedToy::new(toy, audience.locale),
                    });
            }

            DomainEvent::ToyDeleted { toy } => {
                self.sse_manager
                    .send_message(MessageScope::Broadcast, |audience| SseEvent::ToyDeleted {
                        toy: LocalizedToy::new(toy, audience.locale),
                    });
            }

            DomainEvent::ToyPurchased { toy, purchase } => {
                self.sse_manager
                    .send_message(MessageScope::Broadcast, |audience| {
                        SseEvent::ToyPurchased {
                            toy: LocalizedToy::new(toy, audience.locale),
                        }
                    });

                self.sse_manager.send_message(
                    MessageScope::Account {
                        account_id: purchase.account_id,
                    },
                    |audience| SseEvent::PurchaseCompleted {
                        purchase: LocalizedPurchase::new(
                            purchase,
                            toy,
                            audience.locale,
                            &audience.time_zone,
                        ),
                    },
                );
            }
        }
    }
}
