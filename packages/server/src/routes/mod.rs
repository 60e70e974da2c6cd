use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/posts", post_routes())
        .nest("/users", user_routes())
        .nest("/contact", contact_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::me))
}

fn post_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::post::list_posts,
            handlers::post::create_post
        ))
        .routes(routes!(handlers::post::list_published_posts))
        .routes(routes!(handlers::post::get_post_by_slug))
        .routes(routes!(
            handlers::post::get_post,
            handlers::post::update_post,
            handlers::post::delete_post
        ))
        .routes(routes!(handlers::post::publish_post))
}

fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::admin::list_users))
        .routes(routes!(handlers::admin::change_user_role))
}

fn contact_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::contact::submit_contact_form))
}
