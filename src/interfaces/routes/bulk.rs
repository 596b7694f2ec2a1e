use actix_web::web;

use crate::handlers::bulk;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/bulk")
            .service(bulk::export_data)
            .service(bulk::import_data)
            .service(bulk::clear_data)
    );
}
