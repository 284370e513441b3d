use actix_web::web;

use crate::error::AppError;
use crate::errors::ErrorCode;

pub mod health;
pub mod players;

/// Configure application routes for both the server and the test harness.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Malformed query strings and path segments fold into the bare 400
    // contract instead of actix's default error pages.
    cfg.app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::bad_request(ErrorCode::BadRequest, err.to_string()).into()
    }));
    cfg.app_data(web::PathConfig::default().error_handler(|err, _req| {
        AppError::bad_request(ErrorCode::InvalidPlayerId, err.to_string()).into()
    }));

    // Health check routes: /health
    cfg.service(web::scope("/health").configure(health::configure_routes));

    // Player routes: /rest/players/**
    cfg.service(web::scope("/rest/players").configure(players::configure_routes));
}
