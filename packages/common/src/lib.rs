pub mod category;
pub mod config;
pub mod identity;
pub mod listing;
pub mod repository;
pub mod slug;
pub mod storage;
pub mod website;


pub use category::{Category, CategoryFilter};
pub use listing::TimeFilter;
pub use website::{AssetUrl, ModerationStatus, Monetization, Website};
