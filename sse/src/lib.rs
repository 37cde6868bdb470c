//! Server-Sent Events (SSE) infrastructure for pushing catalog and purchase
//! updates to connected clients.
//!
//! # Architecture
//!
//! - **Dual-index registry**: connections are stored by id and indexed by
//!   account, so account-scoped messages don't scan every connection.
//! - **Per-audience rendering**: each connection records the locale and time
//!   zone it wants payloads in. A message is rendered and serialized once per
//!   distinct audience among its recipients, then fanned out.
//! - **Ephemeral messages**: a client that is offline misses the event and
//!   reloads fresh data when it reconnects.
//!
//! # Message Flow
//!
//! 1. Client opens `/toys/event_source` with an `sse`-scoped access token
//! 2. The web layer registers the connection with its account and audience
//! 3. A domain operation publishes a `DomainEvent`
//! 4. `SseDomainEventHandler` asks the `Manager` to send the matching SSE event,
//!    supplying a render function the manager calls per audience
//! 5. When the client disconnects, the stream's drop guard unregisters it
//!
//! # Modules
//!
//! - `connection`: ConnectionRegistry and ConnectionId
//! - `manager`: message routing and per-audience rendering
//! - `message`: typed events, localized payloads and scopes
//! - `domain_event_handler`: domain event to SSE translation

pub mod connection;
pub mod domain_event_handler;
pub mod manager;
pub mod message;

pub use domain_event_handler::SseDomainEventHandler;
pub use manager::Manager;
