//! Search page
//!
//! ```text
//! GET /search?q=report&type=tasks
//! ```
//!
//! `type` is one of `all` (default), `tasks`, `notes`, `bookmarks` or
//! `events`. An empty `q` renders the page with no results.

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Query, State},
    response::Html,
    Extension,
};
use daybook_shared::{
    auth::context::AuthContext,
    search::{self, SearchFilter},
};
use serde::Deserialize;
use serde_json::json;

/// Query string parameters
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,

    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// Runs a search and renders `search/index`
pub async fn search(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Html<String>> {
    let kind = params
        .kind
        .filter(|k| !k.is_empty())
        .unwrap_or_else(|| SearchFilter::DEFAULT_TYPE.to_string());

    let filter = SearchFilter::parse(Some(&kind));
    let results = search::search(&state.db, auth.scope(), &params.q, filter).await?;

    state.render(
        "search/index",
        Some(&auth),
        json!({ "q": params.q, "type": kind, "results": results }),
    )
}
