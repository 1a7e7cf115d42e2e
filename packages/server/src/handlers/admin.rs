use axum::{Json, extract::State};
use chrono::Local;
use common::Website;
use common::listing::view;
use common::repository::SortOrder;
use serde::Serialize;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::query::AppQuery;
use crate::models::website::ListingQuery;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/websites",
    tag = "Admin",
    operation_id = "adminListWebsites",
    summary = "List every submission, pending ones included",
    params(ListingQuery),
    responses(
        (status = 200, description = "Submissions, newest first within each category", body = Vec<Website>),
        (status = 400, description = "Unknown filter (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the admin (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("bearer" = [])),
)]
#[instrument(skip(state, auth_user), fields(uid = %auth_user.identity.uid))]
pub async fn list_websites(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListingQuery>,
) -> Result<Json<Vec<Website>>, AppError> {
    auth_user.require_admin()?;

    let records = state.repository.fetch_all(Some(SortOrder::NEWEST_FIRST)).await?;
    Ok(Json(view(records, query.category, query.time, &Local::now())))
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AssetAccessResponse {
    /// Whether the configured credentials can see the asset repository.
    pub accessible: bool,
}

#[utoipa::path(
    get,
    path = "/assets/access",
    tag = "Admin",
    operation_id = "checkAssetAccess",
    summary = "Check asset store credentials",
    responses(
        (status = 200, description = "Access check result", body = AssetAccessResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the admin (PERMISSION_DENIED)", body = ErrorBody),
        (status = 502, description = "Asset store unreachable (UPSTREAM_ERROR)", body = ErrorBody),
    ),
    security(("bearer" = [])),
)]
#[instrument(skip(state, auth_user), fields(uid = %auth_user.identity.uid))]
pub async fn check_asset_access(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<AssetAccessResponse>, AppError> {
    auth_user.require_admin()?;

    let accessible = state.assets.check_access().await?;
    Ok(Json(AssetAccessResponse { accessible }))
}
