//! PostgreSQL access for the catalog, back-office users and settings.

use serde::Serialize;
use sqlx::PgPool;
use tracing::info;

use crate::domain::aggregates::settings::DEFAULT_SETTINGS;
use crate::domain::aggregates::user::role_or_default;
use crate::domain::aggregates::{
    Category, CategoryPayload, CreateUserPayload, Farm, FarmPayload, Product, ProductColumns, ProductRow, Settings,
    Social, SocialPayload, UpdateUserPayload, User,
};
use crate::domain::aggregates::product::non_blank;
use crate::domain::events::Entity;
use crate::domain::value_objects::EntityId;
use crate::Result;

pub const DEFAULT_ADMIN_ID: &str = "admin-1";
const RECENT_PRODUCTS: i64 = 5;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub products: i64,
    pub categories: i64,
    pub farms: i64,
    pub users: i64,
    pub recent_products: Vec<Product>,
}

#[derive(Clone, Debug)]
pub struct Store {
    pool: PgPool,
}

impl Store {
    pub fn new(pool: PgPool) -> Self { Self { pool } }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    // Products

    pub async fn list_products(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>("SELECT * FROM products ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    pub async fn get_product(&self, id: &EntityId) -> Result<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Product::from))
    }

    pub async fn create_product(&self, c: ProductColumns) -> Result<Product> {
        let row = sqlx::query_as::<_, ProductRow>(
            "INSERT INTO products (id, name, description, category, farm, price, photo, image, video, medias, variants, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, NOW(), NOW()) RETURNING *",
        )
        .bind(EntityId::generate()).bind(&c.name).bind(&c.description).bind(&c.category).bind(&c.farm)
        .bind(&c.price).bind(&c.photo).bind(&c.image).bind(&c.video).bind(&c.medias).bind(&c.variants)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    pub async fn update_product(&self, id: &EntityId, c: ProductColumns) -> Result<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            "UPDATE products SET name = $2, description = $3, category = $4, farm = $5, price = $6, photo = $7, \
             image = $8, video = $9, medias = $10, variants = $11, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id).bind(&c.name).bind(&c.description).bind(&c.category).bind(&c.farm)
        .bind(&c.price).bind(&c.photo).bind(&c.image).bind(&c.video).bind(&c.medias).bind(&c.variants)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Product::from))
    }

    // Categories and farms

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        Ok(sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name").fetch_all(&self.pool).await?)
    }

    pub async fn get_category(&self, id: &EntityId) -> Result<Option<Category>> {
        Ok(sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1").bind(id).fetch_optional(&self.pool).await?)
    }

    pub async fn save_category(&self, id: Option<&EntityId>, p: &CategoryPayload) -> Result<Option<Category>> {
        let query = match id {
            None => "INSERT INTO categories (id, name, icon, description, created_at) VALUES ($1, $2, $3, $4, NOW()) RETURNING *",
            Some(_) => "UPDATE categories SET name = $2, icon = $3, description = $4 WHERE id = $1 RETURNING *",
        };
        let id = id.cloned().unwrap_or_else(EntityId::generate);
        Ok(sqlx::query_as::<_, Category>(query)
            .bind(&id).bind(p.name.trim()).bind(non_blank(p.icon.clone())).bind(non_blank(p.description.clone()))
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn list_farms(&self) -> Result<Vec<Farm>> {
        Ok(sqlx::query_as::<_, Farm>("SELECT * FROM farms ORDER BY name").fetch_all(&self.pool).await?)
    }

    pub async fn get_farm(&self, id: &EntityId) -> Result<Option<Farm>> {
        Ok(sqlx::query_as::<_, Farm>("SELECT * FROM farms WHERE id = $1").bind(id).fetch_optional(&self.pool).await?)
    }

    pub async fn save_farm(&self, id: Option<&EntityId>, p: &FarmPayload) -> Result<Option<Farm>> {
        let query = match id {
            None => "INSERT INTO farms (id, name, image, description, created_at) VALUES ($1, $2, $3, $4, NOW()) RETURNING *",
            Some(_) => "UPDATE farms SET name = $2, image = $3, description = $4 WHERE id = $1 RETURNING *",
        };
        let id = id.cloned().unwrap_or_else(EntityId::generate);
        Ok(sqlx::query_as::<_, Farm>(query)
            .bind(&id).bind(p.name.trim()).bind(non_blank(p.image.clone())).bind(non_blank(p.description.clone()))
            .fetch_optional(&self.pool)
            .await?)
    }

    // Socials

    pub async fn list_socials(&self) -> Result<Vec<Social>> {
        Ok(sqlx::query_as::<_, Social>("SELECT * FROM socials ORDER BY name").fetch_all(&self.pool).await?)
    }

    pub async fn save_social(&self, id: Option<&EntityId>, p: &SocialPayload) -> Result<Option<Social>> {
        let query = match id {
            None => "INSERT INTO socials (id, name, icon, description, url, created_at) VALUES ($1, $2, $3, $4, $5, NOW()) RETURNING *",
            Some(_) => "UPDATE socials SET name = $2, icon = $3, description = $4, url = $5 WHERE id = $1 RETURNING *",
        };
        let id = id.cloned().unwrap_or_else(EntityId::generate);
        Ok(sqlx::query_as::<_, Social>(query)
            .bind(&id).bind(p.name.trim()).bind(non_blank(p.icon.clone()))
            .bind(non_blank(p.description.clone())).bind(non_blank(p.url.clone()))
            .fetch_optional(&self.pool)
            .await?)
    }

    // Users

    pub async fn list_users(&self) -> Result<Vec<User>> {
        Ok(sqlx::query_as::<_, User>("SELECT id, username, role, created_at FROM users ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn create_user(&self, p: CreateUserPayload) -> Result<User> {
        Ok(sqlx::query_as::<_, User>(
            "INSERT INTO users (id, username, password, role, created_at) VALUES ($1, $2, $3, $4, NOW()) \
             RETURNING id, username, role, created_at",
        )
        .bind(EntityId::generate()).bind(p.username.trim()).bind(&p.password).bind(role_or_default(p.role))
        .fetch_one(&self.pool)
        .await?)
    }

    /// The password is only replaced when a non-empty one is given.
    pub async fn update_user(&self, id: &EntityId, p: UpdateUserPayload) -> Result<Option<User>> {
        Ok(sqlx::query_as::<_, User>(
            "UPDATE users SET username = $2, role = $3, password = COALESCE($4, password) WHERE id = $1 \
             RETURNING id, username, role, created_at",
        )
        .bind(id).bind(p.username.trim()).bind(role_or_default(p.role)).bind(p.password.filter(|pw| !pw.is_empty()))
        .fetch_optional(&self.pool)
        .await?)
    }

    pub async fn find_login(&self, username: &str, password: &str) -> Result<Option<User>> {
        Ok(sqlx::query_as::<_, User>(
            "SELECT id, username, role, created_at FROM users WHERE username = $1 AND password = $2 LIMIT 1",
        )
        .bind(username).bind(password)
        .fetch_optional(&self.pool)
        .await?)
    }

    // Settings

    pub async fn settings(&self) -> Result<Settings> {
        let rows: Vec<(String, String)> = sqlx::query_as("SELECT key, value FROM settings").fetch_all(&self.pool).await?;
        Ok(rows.into_iter().collect())
    }

    pub async fn upsert_settings(&self, settings: &Settings) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for (key, value) in settings.entries() {
            sqlx::query(
                "INSERT INTO settings (key, value, updated_at) VALUES ($1, $2, NOW()) \
                 ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()",
            )
            .bind(key).bind(value)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    // Shared

    /// Deletes by id. Returns whether a row was removed.
    pub async fn delete(&self, entity: Entity, id: &EntityId) -> Result<bool> {
        let table = match entity {
            Entity::Products | Entity::Categories | Entity::Farms | Entity::Socials | Entity::Users => entity.as_str(),
            Entity::Settings => return Ok(false),
        };
        let result = sqlx::query(&format!("DELETE FROM {table} WHERE id = $1")).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Default admin account and store settings, replacing existing values.
    pub async fn seed_defaults(&self, admin_username: &str, admin_password: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO users (id, username, password, role, created_at) VALUES ($1, $2, $3, 'admin', NOW()) \
             ON CONFLICT (id) DO UPDATE SET username = EXCLUDED.username, password = EXCLUDED.password, role = EXCLUDED.role",
        )
        .bind(DEFAULT_ADMIN_ID).bind(admin_username).bind(admin_password)
        .execute(&self.pool)
        .await?;

        let defaults: Settings = DEFAULT_SETTINGS.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        self.upsert_settings(&defaults).await?;
        info!(admin = %admin_username, settings = defaults.len(), "database initialized");
        Ok(())
    }

    pub async fn stats(&self) -> Result<DashboardStats> {
        let (products, categories, farms, users): (i64, i64, i64, i64) = sqlx::query_as(
            "SELECT (SELECT COUNT(*) FROM products), (SELECT COUNT(*) FROM categories), \
             (SELECT COUNT(*) FROM farms), (SELECT COUNT(*) FROM users)",
        )
        .fetch_one(&self.pool)
        .await?;
        let recent = sqlx::query_as::<_, ProductRow>("SELECT * FROM products ORDER BY created_at DESC LIMIT $1")
            .bind(RECENT_PRODUCTS)
            .fetch_all(&self.pool)
            .await?;
        Ok(DashboardStats { products, categories, farms, users, recent_products: recent.into_iter().map(Product::from).collect() })
    }
}
