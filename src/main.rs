// src/main.rs
use actix_cors::Cors;
use actix_web::{middleware, App, HttpServer};
use graphlens::api::{configure_app, AppState};
use graphlens::{banner, config};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Print the startup banner
    banner::print_banner();

    if let Err(e) = dotenvy::dotenv() {
        eprintln!("⚠️  Warning: Could not load .env file: {}", e);
        eprintln!("   Provider keys must come from the environment or the config file");
    }

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let app_config = match config::AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("❌ {}", e);
            return Err(std::io::Error::other(e));
        }
    };

    log::info!(
        "Analysis model: {} (providers: {})",
        app_config.model,
        app_config.providers().join(", ")
    );

    let bind = (app_config.server.host.clone(), app_config.server.port);
    let state = AppState::new(app_config).map_err(std::io::Error::other)?;

    println!("🚀 Starting server...");
    println!("📊 Frontend available at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(configure_app(state.clone()))
    })
    .bind(bind)?
    .run()
    .await
}
