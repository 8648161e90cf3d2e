use actix_web::{web, App, HttpServer};
use std::io;
use std::sync::Arc;
use tokio::signal;

mod api_error;
mod auth;
mod bracket;
mod config;
mod db;
mod http;
mod middleware;
mod models;
mod service;
mod telemetry;

use crate::auth::SessionService;
use crate::config::Config;
use crate::db::create_pool;
use crate::http::AppState;
use crate::middleware::cors_middleware;
use crate::service::{AdminService, BracketService, LeaderboardService};
use crate::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> io::Result<()> {
    let config = Config::from_env().expect("Failed to load configuration");

    init_telemetry();

    let db_pool = create_pool(&config)
        .await
        .expect("Failed to create database pool");

    db::run_migrations(&db_pool)
        .await
        .expect("Failed to run migrations");

    tracing::info!(
        "Starting bracketpool backend on {}:{}",
        config.server.host,
        config.server.port
    );

    let session_service = Arc::new(SessionService::new(
        db_pool.clone(),
        config.admin.username.clone(),
    ));
    let bracket_service = Arc::new(BracketService::new(db_pool.clone()));
    let admin_service = Arc::new(AdminService::new(db_pool.clone()));
    let leaderboard_service = Arc::new(LeaderboardService::new(db_pool.clone()));

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(web::Data::new(AppState {
                session_service: session_service.clone(),
                bracket_service: bracket_service.clone(),
                admin_service: admin_service.clone(),
                leaderboard_service: leaderboard_service.clone(),
            }))
            .wrap(cors_middleware())
            .wrap(actix_web::middleware::Logger::default())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(http::health::health_check))
                    .route("/session", web::post().to(http::auth_handler::login))
                    .route("/session", web::get().to(http::auth_handler::current_session))
                    .route("/session", web::delete().to(http::auth_handler::logout))
                    .route("/bracket", web::get().to(http::bracket_handler::my_bracket))
                    .route(
                        "/bracket/submit",
                        web::post().to(http::bracket_handler::submit_bracket),
                    )
                    .route(
                        "/bracket/{username}",
                        web::get().to(http::bracket_handler::bracket_by_username),
                    )
                    .route("/picks", web::post().to(http::bracket_handler::save_pick))
                    .route("/picks", web::delete().to(http::bracket_handler::delete_picks))
                    .route(
                        "/leaderboard",
                        web::get().to(http::leaderboard_handler::leaderboard),
                    )
                    .route(
                        "/admin/matches",
                        web::get().to(http::admin_handler::list_matches),
                    )
                    .route(
                        "/admin/results",
                        web::get().to(http::admin_handler::list_results),
                    )
                    .route(
                        "/admin/results",
                        web::post().to(http::admin_handler::enter_result),
                    )
                    .route(
                        "/admin/matchups",
                        web::post().to(http::admin_handler::setup_matchup),
                    )
                    .route(
                        "/admin/matchups/{id}",
                        web::delete().to(http::admin_handler::delete_matchup),
                    )
                    .route("/admin/lock", web::put().to(http::admin_handler::set_lock))
                    .route(
                        "/admin/config",
                        web::get().to(http::admin_handler::get_config),
                    ),
            )
    })
    .bind((config.server.host.clone(), config.server.port))?
    .run();

    // Graceful shutdown
    let server_handle = server.handle();
    tokio::spawn(async move {
        signal::ctrl_c()
            .await
            .expect("Failed to listen for shutdown signal");
        tracing::info!("Shutdown signal received, stopping server...");
        server_handle.stop(true).await;
    });

    server.await
}
