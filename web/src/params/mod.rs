pub(crate) mod account;
pub(crate) mod event_source;
pub(crate) mod purchase;
pub(crate) mod toy;
