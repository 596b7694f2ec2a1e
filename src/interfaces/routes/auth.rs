use actix_web::web;

use crate::handlers::auth;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(auth::login)
            .service(auth::init_admin)
            .service(auth::forgot_password)
            .service(auth::reset_password)
            .service(auth::me)
            .service(auth::register)
            .service(auth::delete_user_by_username)
    );
}
