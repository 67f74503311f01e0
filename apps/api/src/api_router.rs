use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

pub fn build_router(app_state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/", get(handlers::index::index_handler))
        .route(
            "/people",
            get(handlers::people::list_people_handler)
                .post(handlers::people::create_person_handler),
        )
        .route(
            "/people/search/findByLastName",
            get(handlers::people::find_by_last_name_handler),
        )
        .route(
            "/people/{person_id}",
            get(handlers::people::get_person_handler)
                .put(handlers::people::update_person_handler)
                .patch(handlers::people::patch_person_handler)
                .delete(handlers::people::delete_person_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_auth,
        ));

    Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
