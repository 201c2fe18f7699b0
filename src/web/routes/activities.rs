use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::models::Activity;
use crate::registry::{ActivityRegistry, RegistryError};

#[derive(Debug, Deserialize)]
pub struct ParticipantQuery {
    pub email: String,
}

pub async fn activities_handler(
    State(registry): State<Arc<ActivityRegistry>>,
) -> Json<HashMap<String, Activity>> {
    Json(registry.snapshot().await)
}

pub async fn signup_handler(
    Path(activity_name): Path<String>,
    Query(query): Query<ParticipantQuery>,
    State(registry): State<Arc<ActivityRegistry>>,
) -> Result<Json<Value>, RegistryError> {
    registry
        .signup(&activity_name, &query.email)
        .await
        .map_err(|e| {
            warn!("Signup rejected for {} on {}: {}", query.email, activity_name, e);
            e
        })?;

    Ok(Json(json!({
        "message": format!("Signed up {} for {}", query.email, activity_name)
    })))
}

pub async fn unregister_handler(
    Path(activity_name): Path<String>,
    Query(query): Query<ParticipantQuery>,
    State(registry): State<Arc<ActivityRegistry>>,
) -> Result<Json<Value>, RegistryError> {
    registry
        .unregister(&activity_name, &query.email)
        .await
        .map_err(|e| {
            warn!(
                "Unregister rejected for {} on {}: {}",
                query.email, activity_name, e
            );
            e
        })?;

    Ok(Json(json!({
        "message": format!("Unregistered {} from {}", query.email, activity_name)
    })))
}
