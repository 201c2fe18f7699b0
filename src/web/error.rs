use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::registry::RegistryError;

// Error responses carry a human-readable `detail` field, which the front-end
// shows as-is.
impl IntoResponse for RegistryError {
    fn into_response(self) -> Response {
        let status = match self {
            RegistryError::ActivityNotFound | RegistryError::ParticipantNotFound => {
                StatusCode::NOT_FOUND
            }
            RegistryError::AlreadySignedUp | RegistryError::ActivityFull => StatusCode::BAD_REQUEST,
        };

        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
