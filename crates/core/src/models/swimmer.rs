use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Swimmer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub level: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSwimmerRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub level: i32,
}
