mod client;
mod error;
mod loader;
mod source;
pub mod types;

pub use client::UnsplashClient;
pub use error::{Error, Result};
pub use loader::FeedLoader;
pub use source::PhotoSource;
