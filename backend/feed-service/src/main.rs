use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use feed_service::handlers;
use feed_service::metrics;
use feed_service::middleware::JwtAuthMiddleware;
use feed_service::Config;
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::io;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Serialize)]
struct ReadinessResponse {
    ready: bool,
    message: String,
    latency_ms: u64,
}

async fn check_postgres(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").fetch_one(pool).await.map(|_| ())
}

async fn health_summary(pool: web::Data<PgPool>) -> HttpResponse {
    match check_postgres(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "feed-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("PostgreSQL connection failed: {}", e),
            "service": "feed-service"
        })),
    }
}

async fn readiness_summary(pool: web::Data<PgPool>) -> HttpResponse {
    let start = Instant::now();
    let result = check_postgres(pool.get_ref()).await;
    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(_) => HttpResponse::Ok().json(ReadinessResponse {
            ready: true,
            message: "PostgreSQL connection successful".to_string(),
            latency_ms,
        }),
        Err(e) => HttpResponse::ServiceUnavailable().json(ReadinessResponse {
            ready: false,
            message: format!("PostgreSQL connection failed: {}", e),
            latency_ms,
        }),
    }
}

async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting feed-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    // Initialize database connection pool
    let db_pool = match PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database pool creation failed: {}", e);
            eprintln!("ERROR: Failed to create database pool: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Connected to database");

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let config_data = web::Data::new(config.clone());

    HttpServer::new(move || {
        // Build CORS configuration
        let mut cors = Cors::default();
        for origin in config.cors.allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(config_data.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .route("/metrics", web::get().to(metrics::serve_metrics))
            // Health check endpoints
            .route("/api/v1/health", web::get().to(health_summary))
            .route("/api/v1/health/ready", web::get().to(readiness_summary))
            .route("/api/v1/health/live", web::get().to(liveness_check))
            // The feed is readable anonymously; personalization kicks in
            // when a valid bearer token is present.
            .route("/api/v1/feed", web::get().to(handlers::get_feed))
            .service(
                web::scope("/api/v1/posts")
                    .wrap(JwtAuthMiddleware)
                    .service(web::resource("").route(web::post().to(handlers::create_post)))
                    .service(
                        web::resource("/{post_id}")
                            .route(web::get().to(handlers::get_post))
                            .route(web::delete().to(handlers::delete_post)),
                    )
                    .route("/{post_id}/pin", web::patch().to(handlers::set_pinned)),
            )
    })
    .bind(&bind_address)?
    .workers(4)
    .run()
    .await
}
