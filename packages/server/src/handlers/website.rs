use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Local;
use common::listing::view;
use common::repository::{Field, SortOrder};
use common::Website;
use tracing::instrument;

use crate::config::SubmissionConfig;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::query::AppQuery;
use crate::models::website::{ListingQuery, OwnListingQuery, SubmitWebsiteForm, parse_field};
use crate::state::AppState;
use crate::submission::{SubmissionForm, Upload};

/// Body limit for submissions: every blob at its ceiling plus room for the text fields.
pub fn submission_body_limit(config: &SubmissionConfig) -> DefaultBodyLimit {
    let blobs = config.max_asset_size.saturating_mul(config.max_images + 1);
    DefaultBodyLimit::max(blobs.saturating_add(64 * 1024))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Websites",
    operation_id = "listWebsites",
    summary = "List websites",
    description = "Lists websites of every category, newest first within each category, \
        narrowed by the optional category and time filters. Time windows are computed \
        in the server's local time zone.",
    params(ListingQuery),
    responses(
        (status = 200, description = "Matching websites", body = Vec<Website>),
        (status = 400, description = "Unknown filter (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_websites(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListingQuery>,
) -> Result<Json<Vec<Website>>, AppError> {
    let records = state.repository.fetch_all(Some(SortOrder::NEWEST_FIRST)).await?;
    Ok(Json(view(records, query.category, query.time, &Local::now())))
}

#[utoipa::path(
    get,
    path = "/{unique_name}",
    tag = "Websites",
    operation_id = "getWebsite",
    summary = "Get a website by its unique name",
    params(("unique_name" = String, Path, description = "Slug assigned at submission")),
    responses(
        (status = 200, description = "Website found", body = Website),
        (status = 404, description = "No such website (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_website(
    State(state): State<AppState>,
    Path(unique_name): Path<String>,
) -> Result<Json<Website>, AppError> {
    let located = state
        .repository
        .fetch_by_key(Field::UniqueName, &unique_name)
        .await?
        .ok_or_else(|| AppError::NotFound("Website not found".into()))?;
    Ok(Json(located.record))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Websites",
    operation_id = "submitWebsite",
    summary = "Submit a website",
    description = "Uploads the icon and screenshots to the asset store and records the \
        website as pending in its category. Nothing is recorded if any upload fails.",
    request_body(content_type = "multipart/form-data", content = inline(SubmitWebsiteForm)),
    responses(
        (status = 201, description = "Website submitted", body = Website),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 502, description = "Asset upload failed (UPSTREAM_ERROR)", body = ErrorBody),
    ),
    security(("bearer" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(uid = %auth_user.identity.uid))]
pub async fn submit_website(
    auth_user: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut form = SubmissionForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "icon" | "images" => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::Validation(format!("'{name}' must be a file")))?;
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read {filename}: {e}")))?
                    .to_vec();
                let upload = Upload { filename, data };
                if name == "icon" {
                    if form.icon.is_some() {
                        return Err(AppError::Validation("Only one icon is allowed".into()));
                    }
                    form.icon = Some(upload);
                } else {
                    form.images.push(upload);
                }
            }
            _ => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read {name}: {e}")))?;
                match name.as_str() {
                    "name" => form.name = text,
                    "description" => form.description = text,
                    "link" => form.link = text,
                    "developer_name" => form.developer_name = text,
                    "developer_email" => form.developer_email = text,
                    "monetization" => form.monetization = parse_field("monetization", &text)?,
                    "category" => form.category = Some(parse_field("category", &text)?),
                    _ => {} // Ignore unknown fields.
                }
            }
        }
    }

    let website = state.submissions.submit(auth_user.uid(), form).await?;
    Ok((StatusCode::CREATED, Json(website)))
}

#[utoipa::path(
    get,
    path = "/websites",
    tag = "Websites",
    operation_id = "listOwnWebsites",
    summary = "List the signed-in user's submissions",
    params(OwnListingQuery),
    responses(
        (status = 200, description = "The user's websites", body = Vec<Website>),
        (status = 400, description = "Unknown filter (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("bearer" = [])),
)]
#[instrument(skip(state, auth_user), fields(uid = %auth_user.identity.uid))]
pub async fn list_own_websites(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<OwnListingQuery>,
) -> Result<Json<Vec<Website>>, AppError> {
    let records = state.repository.fetch_by_owner(auth_user.uid()).await?;
    Ok(Json(
        records
            .into_iter()
            .filter(|w| query.category.matches(w.category))
            .collect(),
    ))
}
