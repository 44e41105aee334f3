//! Farm Storefront
//!
//! Public catalog and product pages for a farm shop, with a small back-office
//! gateway over PostgreSQL.
//!
//! ## Features
//! - Product gallery assembly and media classification
//! - Variant pricing by quantity and delivery mode
//! - Order messages carried to a chat link
//! - Social share messages and a sequential share run
//! - CRUD for products, categories, farms, socials, users and settings

pub mod api;
pub mod blob;
pub mod config;
pub mod domain;
pub mod store;
pub mod storefront;

use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

pub type Result<T> = std::result::Result<T, StoreError>;
