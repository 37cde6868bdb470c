use crate::message::{Audience, MessageScope};
use axum::response::sse::Event;
use dashmap::DashMap;
use domain::{Id, Locale};
use log::*;
use std::collections::{HashMap, HashSet};
use std::convert::Infallible;
use tokio::sync::mpsc::UnboundedSender;

pub type AccountId = Id;

/// Unique identifier for a connection (server-generated)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct ConnectionInfo {
    pub account_id: AccountId,
    pub audience: Audience,
    pub sender: UnboundedSender<Result<Event, Infallible>>,
}

/// Open SSE connections, indexed by connection and by account.
pub struct ConnectionRegistry {
    /// Primary storage: lookup by connection_id for registration/cleanup - O(1)
    connections: DashMap<ConnectionId, ConnectionInfo>,

    /// Secondary index: lookup by account for account-scoped messages - O(1)
    account_index: DashMap<AccountId, HashSet<ConnectionId>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            account_index: DashMap::new(),
        }
    }

    pub fn register(
        &self,
        account_id: AccountId,
        audience: Audience,
        sender: UnboundedSender<Result<Event, Infallible>>,
    ) -> ConnectionId {
        let connection_id = ConnectionId::new();

        self.connections.insert(
            connection_id.clone(),
            ConnectionInfo {
                account_id,
                audience,
                sender,
            },
        );

        self.account_index
            .entry(account_id)
            .or_default()
            .insert(connection_id.clone());

        connection_id
    }

    pub fn unregister(&self, connection_id: &ConnectionId) {
        if let Some(account_id) = self.detach(connection_id) {
            self.prune_account(account_id);
        }
    }

    // Drops the connection and its index entry, possibly leaving an empty account set
    fn detach(&self, connection_id: &ConnectionId) -> Option<AccountId> {
        let (_, info) = self.connections.remove(connection_id)?;
        if let Some(mut connection_ids) = self.account_index.get_mut(&info.account_id) {
            connection_ids.remove(connection_id);
        }
        Some(info.account_id)
    }

    // Another tab of the account may register between `detach` and this call, so
    // the entry only goes while it is still empty.
    fn prune_account(&self, account_id: AccountId) {
        self.account_index
            .remove_if(&account_id, |_, connection_ids| connection_ids.is_empty());
    }

    /// Connections targeted by `scope`, grouped by the audience they share.
    pub fn audiences(&self, scope: &MessageScope) -> HashMap<Audience, Vec<ConnectionId>> {
        let mut audiences: HashMap<Audience, Vec<ConnectionId>> = HashMap::new();

        match scope {
            MessageScope::Account { account_id } => {
                if let Some(connection_ids) = self.account_index.get(account_id) {
                    for connection_id in connection_ids.iter() {
                        if let Some(info) = self.connections.get(connection_id) {
                            audiences
                                .entry(info.audience.clone())
                                .or_default()
                                .push(connection_id.clone());
                        }
                    }
                }
            }
            MessageScope::Broadcast => {
                for entry in self.connections.iter() {
                    audiences
                        .entry(entry.value().audience.clone())
                        .or_default()
                        .push(entry.key().clone());
                }
            }
        }

        audiences
    }

    /// Sends `event` to each listed connection that is still registered.
    pub fn send(&self, connection_ids: &[ConnectionId], event: Event) {
        for connection_id in connection_ids {
            if let Some(info) = self.connections.get(connection_id) {
                if let Err(e) = info.sender.send(Ok(event.clone())) {
                    warn!(
                        "Failed to send event to connection {}: {}. Connection will be cleaned up.",
                        connection_id.as_str(),
                        e
                    );
                }
            }
        }
    }

    /// Locales with at least one open connection.
    pub fn active_locales(&self) -> HashSet<Locale> {
        self.connections
            .iter()
            .map(|entry| entry.value().audience.locale)
            .collect()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    fn audience(locale: Locale) -> Audience {
        Audience {
            locale,
            time_zone: "UTC".to_string(),
        }
    }

    #[test]
    fn unregister_removes_empty_account_entries() {
        let registry = ConnectionRegistry::new();
        let account_id = Id::new_v4();
        let (sender, _receiver) = unbounded_channel();

        let connection_id = registry.register(account_id, audience(Locale::EnUs), sender);
        assert_eq!(registry.connection_count(), 1);

        registry.unregister(&connection_id);

        assert_eq!(registry.connection_count(), 0);
        assert!(registry
            .audiences(&MessageScope::Account { account_id })
            .is_empty());
        assert!(registry.account_index.is_empty());
    }

    #[test]
    fn a_tab_opened_while_another_closes_stays_reachable() {
        let registry = ConnectionRegistry::new();
        let account_id = Id::new_v4();
        let (sender, _receiver) = unbounded_channel();
        let closing = registry.register(account_id, audience(Locale::EnUs), sender.clone());

        registry.detach(&closing);
        let opened = registry.register(account_id, audience(Locale::EnUs), sender);
        registry.prune_account(account_id);

        assert_eq!(
            registry.audiences(&MessageScope::Account { account_id }),
            HashMap::from([(audience(Locale::EnUs), vec![opened])])
        );
    }

    #[test]
    fn broadcast_audiences_group_connections_by_locale() {
        let registry = ConnectionRegistry::new();
        let (sender, _receiver) = unbounded_channel();
        registry.register(Id::new_v4(), audience(Locale::EnUs), sender.clone());
        registry.register(Id::new_v4(), audience(Locale::EnUs), sender.clone());
        registry.register(Id::new_v4(), audience(Locale::JaJp), sender);

        let audiences = registry.audiences(&MessageScope::Broadcast);

        assert_eq!(audiences.len(), 2);
        assert_eq!(audiences[&audience(Locale::EnUs)].len(), 2);
        assert_eq!(audiences[&audience(Locale::JaJp)].len(), 1);
        assert_eq!(
            registry.active_locales(),
            HashSet::from([Locale::EnUs, Locale::JaJp])
        );
    }

    #[test]
    fn account_audiences_only_include_that_account() {
        let registry = ConnectionRegistry::new();
        let account_id = Id::new_v4();
        let (sender, _receiver) = unbounded_channel();
        registry.register(account_id, audience(Locale::PtBr), sender.clone());
        registry.register(account_id, audience(Locale::DeDe), sender.clone());
        registry.register(Id::new_v4(), audience(Locale::PtBr), sender);

        let audiences = registry.audiences(&MessageScope::Account { account_id });

        assert_eq!(audiences.values().map(Vec::len).sum::<usize>(), 2);
        assert_eq!(audiences.len(), 2);
    }

    #[test]
    fn sending_to_a_closed_connection_does_not_panic() {
        let registry = ConnectionRegistry::new();
        let (sender, receiver) = unbounded_channel();
        let connection_id = registry.register(Id::new_v4(), audience(Locale::EnUs), sender);
        drop(receiver);

        registry.send(&[connection_id], Event::default().data("hello"));
    }
}
