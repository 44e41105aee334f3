//! Catalog change events published after back-office writes.
use crate::domain::value_objects::EntityId;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Entity {
    Products,
    Categories,
    Farms,
    Socials,
    Users,
    Settings,
}

impl Entity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Categories => "categories",
            Self::Farms => "farms",
            Self::Socials => "socials",
            Self::Users => "users",
            Self::Settings => "settings",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum CatalogEvent {
    Created { entity: Entity, id: EntityId },
    Updated { entity: Entity, id: EntityId },
    Deleted { entity: Entity, id: EntityId },
}

impl CatalogEvent {
    pub fn entity(&self) -> Entity {
        match self {
            Self::Created { entity, .. } | Self::Updated { entity, .. } | Self::Deleted { entity, .. } => *entity,
        }
    }

    fn action(&self) -> &'static str {
        match self {
            Self::Created { .. } => "created",
            Self::Updated { .. } => "updated",
            Self::Deleted { .. } => "deleted",
        }
    }

    /// NATS subject, e.g. `storefront.catalog.products.created`.
    pub fn subject(&self) -> String {
        format!("storefront.catalog.{}.{}", self.entity().as_str(), self.action())
    }
}
