use axum::routing::get;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .merge(public_routes())
        .merge(photo_routes(config))
        .merge(vote_routes())
        .nest("/auth", auth_routes())
        .nest("/admin", admin_routes())
}

fn public_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::public::get_settings))
        .routes(routes!(handlers::public::get_results))
        .routes(routes!(handlers::photo::list_public_photos))
        .route("/files/{*key}", get(handlers::photo::serve_file))
}

fn photo_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::photo::upload_photo,
            handlers::photo::delete_own_photo,
            handlers::photo::list_photos
        ))
        .layer(handlers::photo::upload_body_limit(
            config.storage.max_object_size,
        ))
}

fn vote_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(
        handlers::vote::cast_vote,
        handlers::vote::retract_vote
    ))
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::me))
        .routes(routes!(handlers::auth::forgot_password))
        .routes(routes!(handlers::auth::reset_password))
}

fn admin_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::admin::get_settings,
            handlers::admin::update_settings
        ))
        .routes(routes!(
            handlers::admin::list_users,
            handlers::admin::create_user
        ))
        .routes(routes!(
            handlers::admin::update_user,
            handlers::admin::delete_user
        ))
        .routes(routes!(handlers::admin::delete_photo))
}
