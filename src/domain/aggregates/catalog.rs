//! Categories and farms: the lookup tables products point into.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::value_objects::EntityId;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: EntityId,
    pub name: String,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Farm {
    pub id: EntityId,
    pub name: String,
    pub image: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CategoryPayload {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub icon: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FarmPayload {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub image: Option<String>,
    pub description: Option<String>,
}

/// Anything a product can reference by id and show by name.
pub trait Named {
    fn id(&self) -> &EntityId;
    fn name(&self) -> &str;
}

impl Named for Category {
    fn id(&self) -> &EntityId { &self.id }
    fn name(&self) -> &str { &self.name }
}

impl Named for Farm {
    fn id(&self) -> &EntityId { &self.id }
    fn name(&self) -> &str { &self.name }
}

/// Display name for a reference: the matching entry's name, or the raw id when
/// nothing matches (or the match has no name).
pub fn display_label<T: Named>(items: &[T], reference: Option<&EntityId>) -> Option<String> {
    let reference = reference.filter(|id| !id.is_empty())?;
    let label = items
        .iter()
        .find(|item| item.id() == reference)
        .map(Named::name)
        .filter(|name| !name.is_empty())
        .unwrap_or(reference.as_str());
    Some(label.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn farm(id: &str, name: &str) -> Farm {
        Farm { id: id.into(), name: name.into(), image: None, description: None, created_at: Utc::now() }
    }

    #[test]
    fn test_label_found() {
        let farms = vec![farm("1", "Ferme du Lac"), farm("2", "Les Prés")];
        assert_eq!(display_label(&farms, Some(&EntityId::from(2_i64))).as_deref(), Some("Les Prés"));
    }

    #[test]
    fn test_label_falls_back_to_raw_id() {
        let farms = vec![farm("1", "Ferme du Lac"), farm("3", "")];
        assert_eq!(display_label(&farms, Some(&EntityId::from("9"))).as_deref(), Some("9"));
        assert_eq!(display_label(&farms, Some(&EntityId::from("3"))).as_deref(), Some("3"));
        assert_eq!(display_label(&farms, None), None);
    }
}
