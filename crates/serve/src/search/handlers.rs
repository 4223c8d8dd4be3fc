//! Search API handlers

use crate::handlers::AppState;
use crate::search::types::{
    SearchApiError, SearchQueryParams, SEARCH_FAILURE_MESSAGE, SEARCH_SUCCESS_MESSAGE,
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use questsearch_core::{ApiResponse, SearchData};
use tracing::{error, info, warn};

/// Body of every failed API response
pub type ErrorResponse = ApiResponse<()>;

impl IntoResponse for SearchApiError {
    fn into_response(self) -> Response {
        let (status, body) = if self.is_client_error() {
            warn!(category = %self.source.category(), "Rejected search: {}", self.source);
            (
                StatusCode::BAD_REQUEST,
                ErrorResponse::failure(self.source.to_string(), None),
            )
        } else {
            error!(category = %self.source.category(), "Search failed: {}", self.source);
            let detail = self
                .expose_details
                .then(|| serde_json::Value::String(self.source.to_string()));
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::failure(SEARCH_FAILURE_MESSAGE, detail),
            )
        };

        (status, Json(body)).into_response()
    }
}

/// Creates the search routes
///
/// # Examples
///
/// ```rust,no_run
/// use axum::Router;
/// use questsearch_serve::search::handlers::search_routes;
/// use questsearch_serve::AppState;
///
/// # fn example(state: AppState) {
/// let app: Router = Router::new().nest("/api", search_routes()).with_state(state);
/// # }
/// ```
pub fn search_routes() -> Router<AppState> {
    Router::new().route("/search", get(handle_search))
}

/// GET search handler
///
/// # Query Parameters
///
/// - `query`: Search term, matched as a case-insensitive title substring
/// - `page`: Page number (default: 1, capped at the configured maximum)
/// - `limit`: Page size (default: 10, capped at the configured maximum)
/// - `sort`: `title`, `type`, `createdAt` or `anagramType` (default: createdAt)
/// - `order`: `asc` for ascending, anything else descending (default: asc)
/// - `types`: Question types, comma-joined and/or repeated
///
/// # Errors
///
/// Returns 400 for a missing query or a page past the last page, 500 when the
/// store fails.
pub async fn handle_search(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<ApiResponse<SearchData>>, SearchApiError> {
    let request = SearchQueryParams::from_pairs(pairs).into_request();
    let expose_details = !state.environment.is_production();

    let data = state
        .search
        .search(&request)
        .await
        .map_err(|e| SearchApiError::new(e, expose_details))?;

    info!(
        results = data.questions.len(),
        total = data.pagination.total_items,
        "Search request served"
    );

    Ok(Json(ApiResponse::success(data, SEARCH_SUCCESS_MESSAGE)))
}
