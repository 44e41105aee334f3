//! Aggregates module
pub mod product;
pub mod catalog;
pub mod social;
pub mod user;
pub mod settings;

pub use product::{Product, ProductColumns, ProductPayload, ProductRow, Variant};
pub use catalog::{display_label, Category, CategoryPayload, Farm, FarmPayload, Named};
pub use social::{Social, SocialPayload};
pub use user::{CreateUserPayload, LoginRequest, LoginResponse, UpdateUserPayload, User};
pub use settings::Settings;
