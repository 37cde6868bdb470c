use crate::ErrorResponse;

pub(crate) mod authenticated_account;
pub(crate) mod compare_api_version;
pub(crate) mod request_data;
pub(crate) mod request_locale;

pub(crate) type RejectionType = ErrorResponse;
