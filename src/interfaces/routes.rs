use actix_web::web;

use crate::handlers::{home::home, json_error::route_not_found, system::health_check, upload::serve_upload};

mod auth;
mod bulk;
mod content;
mod json_error;
mod upload;

pub use json_error::{json_config, path_config};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);
    cfg.service(serve_upload);

    cfg.service(
        web::scope("/api")
            .service(health_check)
            .configure(auth::config_routes)
            .configure(content::config_routes)
            .configure(upload::config_routes)
            .configure(bulk::config_routes)
    );

    cfg.default_service(web::to(route_not_found));
}
