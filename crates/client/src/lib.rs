//! QuestSearch Client Library
//!
//! A query coordinator for the QuestSearch API: debounced requests, a shared
//! response cache, cancellation of superseded requests and a published state
//! snapshot for views to render.

pub mod cache;
pub mod coordinator;
pub mod params;
pub mod state;
pub mod transport;

pub use cache::{
    create_shared_cache, ResponseCache, ResponseCacheConfig, SearchCacheKey, SharedResponseCache,
};
pub use coordinator::{CoordinatorOptions, QueryCoordinator};
pub use params::SearchParams;
pub use state::{QueryState, QueryStatus};
pub use transport::{FetchError, HttpTransport, SearchTransport, DEFAULT_ERROR_MESSAGE};

/// Client version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
