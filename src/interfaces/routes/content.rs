use actix_web::web;

use crate::handlers::{certifications, experience, projects};

// Literal segments are registered before `/{id}`.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/experience")
            .service(experience::list_experiences)
            .service(experience::list_all_experiences)
            .service(experience::create_experience)
            .service(experience::get_experience)
            .service(experience::update_experience)
            .service(experience::delete_experience)
            .service(experience::toggle_experience)
    );

    cfg.service(
        web::scope("/projects")
            .service(projects::list_projects)
            .service(projects::list_featured_projects)
            .service(projects::list_all_projects)
            .service(projects::create_project)
            .service(projects::get_project)
            .service(projects::update_project)
            .service(projects::delete_project)
            .service(projects::toggle_project)
            .service(projects::toggle_project_featured)
    );

    cfg.service(
        web::scope("/certifications")
            .service(certifications::list_certifications)
            .service(certifications::list_all_certifications)
            .service(certifications::create_certification)
            .service(certifications::get_certification)
            .service(certifications::update_certification)
            .service(certifications::delete_certification)
            .service(certifications::toggle_certification)
    );
}
