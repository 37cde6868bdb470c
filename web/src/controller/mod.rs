use serde::Serialize;

pub(crate) mod account_controller;
pub(crate) mod health_check_controller;
pub(crate) mod purchase_controller;
pub(crate) mod toy_controller;

#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status_code: u16, data: T) -> Self {
        Self {
            status_code,
            data: Some(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[test]
    fn api_response_wraps_data_with_its_status_code() {
        let response = ApiResponse::new(StatusCode::OK.into(), 23);
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value, json!({"data": 23, "status_code": 200}));
    }

    #[test]
    fn api_response_without_data_omits_the_field() {
        let response: ApiResponse<()> = ApiResponse {
            status_code: StatusCode::NO_CONTENT.into(),
            data: None,
        };
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value, json!({"status_code": 204}));
    }
}
