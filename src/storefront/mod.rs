//! Storefront view logic: media, pricing, selection, ordering and sharing.
pub mod listing;
pub mod load;
pub mod media;
pub mod order;
pub mod page;
pub mod pricing;
pub mod selector;
pub mod share;

pub use listing::{product_cards, ProductCard, ProductFilter};
pub use load::LoadState;
pub use media::{classify, gallery, resolve_media, MediaItem, MediaKind};
pub use order::{compose_order_message, order_url, prepare_order, OrderIntent, OrderLinkError};
pub use page::ProductPage;
pub use pricing::{PricingTable, PriceTier};
pub use selector::{PricingSelector, Selection};
pub use share::{
    generate_social_message, plan_shares, ShareAction, ShareDispatcher, ShareReport, ShareRunner, ShareTask,
    DispatchError,
};
