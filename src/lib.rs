mod auth;
mod config;
mod cron_tasks;
mod database;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod service;

pub use config::Config;
pub use cron_tasks::{cleanup_sessions, complete_bookings, CleanupSessionsResult, CompleteBookingsResult};

use crate::db::stage_db;
use crate::middleware::RequestLogger;
use crate::routes as app_routes;
use crate::service::verification::{PendingStore, VerificationClient};
use rocket::{catchers, http::Method, Build, Rocket};
use rocket_cors::{AllowedOrigins, CorsOptions};
use tracing_subscriber::EnvFilter;

pub fn init_tracing(log_level: &str, json_format: bool) {
    // RUST_LOG takes precedence for per-module control, e.g.
    // RUST_LOG=info,lenslink::database=debug
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_target(true).with_line_number(true);

    if json_format {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

fn build_cors(cors_config: &config::CorsConfig) -> CorsOptions {
    let is_wildcard = cors_config.allowed_origins.len() == 1 && cors_config.allowed_origins[0] == "*";

    if is_wildcard && cors_config.allow_credentials {
        panic!(
            "Invalid CORS configuration: Cannot use wildcard origins (*) with credentials enabled. \
            Either set specific origins or disable credentials."
        );
    }

    let allowed_origins = if cors_config.allowed_origins.is_empty() {
        AllowedOrigins::some_exact::<&str>(&[])
    } else if is_wildcard {
        AllowedOrigins::all()
    } else {
        AllowedOrigins::some_exact(&cors_config.allowed_origins.iter().map(String::as_str).collect::<Vec<_>>())
    };

    CorsOptions {
        allowed_origins,
        allowed_methods: vec![Method::Get, Method::Post, Method::Put, Method::Delete, Method::Options]
            .into_iter()
            .map(From::from)
            .collect(),
        allowed_headers: rocket_cors::AllowedHeaders::some(&["Content-Type", "Authorization", "Accept"]),
        allow_credentials: cors_config.allow_credentials,
        ..Default::default()
    }
}

fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return config::DEFAULT_API_BASE_PATH.to_string();
    }

    let mut normalized = if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    };

    while normalized.ends_with('/') && normalized.len() > 1 {
        normalized.pop();
    }

    normalized
}

pub fn build_rocket(config: Config) -> Rocket<Build> {
    let cors = build_cors(&config.cors).to_cors().expect("Failed to create CORS fairing");

    let base_path = normalize_base_path(&config.api.base_path);

    let pending = PendingStore::new();
    let verification_client = VerificationClient::new(config.verification.clone());
    let database_config = config.database.clone();

    rocket::build()
        .manage(config)
        .manage(pending)
        .manage(verification_client)
        .attach(cors)
        .attach(RequestLogger)
        .attach(stage_db(database_config))
        .mount(format!("{base_path}/auth"), app_routes::auth::routes())
        .mount(format!("{base_path}/profile"), app_routes::profile::routes())
        .mount(format!("{base_path}/bookings"), app_routes::booking::booking_routes())
        .mount(format!("{base_path}/bookings/requests"), app_routes::booking::request_routes())
        .mount(format!("{base_path}/inventory"), app_routes::inventory::routes())
        .mount(format!("{base_path}/messages"), app_routes::message::routes())
        .mount(format!("{base_path}/notifications"), app_routes::notification::routes())
        .mount(format!("{base_path}/verification"), app_routes::verification::routes())
        .mount(format!("{base_path}/health"), app_routes::health::routes())
        .register(
            base_path.as_str(),
            catchers![
                app_routes::error::unauthorized,
                app_routes::error::not_found,
                app_routes::error::conflict,
                app_routes::error::unprocessable,
            ],
        )
}

#[cfg(test)]
mod tests {
    use super::{build_cors, normalize_base_path};
    use crate::config::CorsConfig;

    #[test]
    fn base_path_normalization() {
        assert_eq!(normalize_base_path("/api"), "/api");
        assert_eq!(normalize_base_path("api"), "/api");
        assert_eq!(normalize_base_path("/api/"), "/api");
        assert_eq!(normalize_base_path("  "), "/api");
    }

    #[test]
    #[should_panic(expected = "Invalid CORS configuration")]
    fn wildcard_origins_with_credentials_is_rejected() {
        let cors_config = CorsConfig {
            allowed_origins: vec!["*".to_string()],
            allow_credentials: true,
        };
        let _ = build_cors(&cors_config);
    }

    #[test]
    fn explicit_origins_with_credentials_is_accepted() {
        let cors_config = CorsConfig {
            allowed_origins: vec!["https://app.lenslink.example".to_string()],
            allow_credentials: true,
        };
        assert!(build_cors(&cors_config).to_cors().is_ok());
    }
}
