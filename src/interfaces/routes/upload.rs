use actix_web::web;

use crate::handlers::upload;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(upload::upload_file)
        .service(upload::upload_base64)
        .service(upload::upload_resume)
        .service(upload::download_resume)
        .service(upload::resume_info);
}
