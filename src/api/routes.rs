// src/api/routes.rs
use actix_web::web;
use super::handlers;
use super::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health_check))
            .route("/analyze", web::post().to(handlers::analyze)),
    );
}

/// Everything an `App` needs: shared state, body limits, API routes and the embedded frontend.
pub fn configure_app(state: AppState) -> impl Fn(&mut web::ServiceConfig) + Clone + Send + 'static {
    move |cfg: &mut web::ServiceConfig| {
        let limit = state.config.server.max_image_bytes;
        cfg.app_data(web::Data::new(state.clone()))
            .app_data(handlers::analyze_json_config(limit));
        configure_routes(cfg);
        cfg.route("/{_:.*}", web::get().to(handlers::static_file_handler));
    }
}
