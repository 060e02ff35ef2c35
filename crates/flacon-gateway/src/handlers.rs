pub mod catalog;
pub mod health;
pub mod meta;

pub use catalog::{
    create_handler, delete_listing_handler, delete_perfume_handler, list_handler,
};
pub use health::health_handler;
pub use meta::{short_endpoint_handler, webhook_handler};
