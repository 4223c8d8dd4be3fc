//! Search API module
//!
//! # Endpoints
//!
//! ## GET /search
//!
//! ```text
//! GET /api/search?query=cat&page=1&limit=10&sort=createdAt&order=desc&types=MCQ,ANAGRAM
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use axum::Router;
//! use questsearch_serve::search::handlers::search_routes;
//! use questsearch_serve::AppState;
//!
//! # fn example(state: AppState) {
//! let app: Router = Router::new().nest("/api", search_routes()).with_state(state);
//! # }
//! ```

pub mod handlers;
pub mod types;

// Re-export commonly used types
pub use handlers::{handle_search, search_routes, ErrorResponse};
pub use types::{SearchApiError, SearchQueryParams};
