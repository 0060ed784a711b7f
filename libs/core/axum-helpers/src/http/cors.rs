use axum::http::{HeaderValue, Method, header};
use core_config::Environment;
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

pub const CORS_ENV_VAR: &str = "CORS_ALLOWED_ORIGIN";

/// CORS for a fixed list of browser origins.
///
/// Allows the verbs the REST surface uses, `Content-Type`/`Accept` request
/// headers, and exposes `Location` so clients can follow a 201.
pub fn create_cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::LOCATION])
        .max_age(Duration::from_secs(3600))
}

/// Allows any origin. Development only.
pub fn create_permissive_cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}

/// Parses a comma-separated origin list, skipping blanks.
pub fn parse_origins(raw: &str) -> io::Result<Vec<HeaderValue>> {
    let origins = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(HeaderValue::from_str)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid {} value: {}", CORS_ENV_VAR, e),
            )
        })?;

    if origins.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} cannot be empty", CORS_ENV_VAR),
        ));
    }

    Ok(origins)
}

/// Builds the CORS layer from `CORS_ALLOWED_ORIGIN`.
///
/// Required in production. In development an unset variable falls back to
/// [`create_permissive_cors_layer`].
pub fn cors_from_env(environment: &Environment) -> io::Result<CorsLayer> {
    match std::env::var(CORS_ENV_VAR) {
        Ok(raw) => {
            let origins = parse_origins(&raw)?;
            info!(origins = %raw, "CORS configured");
            Ok(create_cors_layer(origins))
        }
        Err(_) if environment.is_development() => {
            warn!("{} not set, allowing any origin", CORS_ENV_VAR);
            Ok(create_permissive_cors_layer())
        }
        Err(_) => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "{} is required in production. Example: {}=https://shop.example.com",
                CORS_ENV_VAR, CORS_ENV_VAR
            ),
        )),
    }
}
