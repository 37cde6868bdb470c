//! Response DTOs. Prices and timestamps are rendered for the requester's locale next
//! to their machine-readable values.

pub(crate) mod account;
pub(crate) mod purchase;
pub(crate) mod toy;
