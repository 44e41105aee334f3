//! Social network links used as share targets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::value_objects::EntityId;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Social {
    pub id: EntityId,
    pub name: String,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SocialPayload {
    #[validate(length(min = 1, max = 80))]
    pub name: String,
    pub icon: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 2048))]
    pub url: Option<String>,
}

impl Social {
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>, url: Option<&str>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: None,
            description: None,
            url: url.map(str::to_string),
            created_at: Utc::now(),
        }
    }
}
