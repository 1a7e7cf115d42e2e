use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/websites", website_routes(config))
        .nest("/me", me_routes())
        .nest("/admin", admin_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::signup))
        .routes(routes!(handlers::auth::logout))
        .routes(routes!(handlers::auth::me))
}

fn website_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::website::list_websites,
            handlers::website::submit_website
        ))
        .routes(routes!(handlers::website::get_website))
        .layer(handlers::website::submission_body_limit(&config.submission))
}

fn me_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::website::list_own_websites))
}

fn admin_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::admin::list_websites))
        .routes(routes!(handlers::admin::check_asset_access))
}
