use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    web, Error, HttpMessage, ResponseError,
};
use futures_util::future::{ok, LocalBoxFuture, Ready};
use std::{rc::Rc, task::{Context, Poll}};

use crate::{errors::AuthError, AppState};

/// Content collections readable without a token.
const PUBLIC_COLLECTIONS: [&str; 3] = ["/api/experience", "/api/projects", "/api/certifications"];

const PUBLIC_POSTS: [&str; 4] = [
    "/api/auth/login",
    "/api/auth/init",
    "/api/auth/forgot-password",
    "/api/auth/reset-password",
];

/// Resolves the bearer token on protected routes and attaches the caller's
/// `AuthenticatedUser` to the request. Role checks are left to the extractors.
pub struct AuthMiddleware;

impl<S> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Rc::new(service),
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            if is_public_route(req.path(), req.method()) {
                return service.call(req).await;
            }

            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                tracing::error!("AppState missing in auth middleware");
                return Ok(reject(req, AuthError::MissingState));
            };

            let Some(token) = extract_token(&req) else {
                tracing::warn!(path = %req.path(), "Missing or malformed Authorization header");
                return Ok(reject(req, AuthError::MissingCredentials));
            };

            match state.auth_handler.authenticate(&token).await {
                Ok(user) => {
                    req.extensions_mut().insert(user);
                    service.call(req).await
                }
                Err(e) => {
                    tracing::warn!(path = %req.path(), "Rejected bearer token: {}", e);
                    let response = e.error_response();
                    Ok(req.into_response(response))
                }
            }
        })
    }
}

fn reject(req: ServiceRequest, err: AuthError) -> ServiceResponse<BoxBody> {
    let response = err.error_response();
    req.into_response(response)
}

/// Routes that never need a token. Anything outside `/api` (banner, uploaded files,
/// unknown paths) is left to the router.
pub fn is_public_route(path: &str, method: &Method) -> bool {
    if method == Method::OPTIONS || !path.starts_with("/api/") {
        return true;
    }

    match *method {
        Method::GET => {
            matches!(path, "/api/health" | "/api/resume" | "/api/resume/info")
                || is_public_collection_read(path)
        }
        Method::POST => PUBLIC_POSTS.contains(&path),
        _ => false,
    }
}

fn is_public_collection_read(path: &str) -> bool {
    PUBLIC_COLLECTIONS.iter().any(|base| match path.strip_prefix(base) {
        Some("") => true,
        Some(rest) => rest.starts_with('/') && !rest.starts_with("/admin"),
        None => false,
    })
}

fn extract_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| {
            let parts: Vec<&str> = header.split_whitespace().collect();
            if parts.len() == 2 && parts[0].eq_ignore_ascii_case("bearer") {
                Some(parts[1].to_string())
            } else {
                None
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn public_reads_skip_auth() {
        assert!(is_public_route("/", &Method::GET));
        assert!(is_public_route("/uploads/file-1-2.png", &Method::GET));
        assert!(is_public_route("/api/health", &Method::GET));
        assert!(is_public_route("/api/experience", &Method::GET));
        assert!(is_public_route("/api/projects/featured", &Method::GET));
        assert!(is_public_route("/api/certifications/7", &Method::GET));
        assert!(is_public_route("/api/resume/info", &Method::GET));
        assert!(is_public_route("/api/auth/login", &Method::POST));
        assert!(is_public_route("/api/experience", &Method::OPTIONS));
    }

    #[test]
    fn writes_and_admin_reads_need_a_token() {
        assert!(!is_public_route("/api/experience", &Method::POST));
        assert!(!is_public_route("/api/experience/admin/all", &Method::GET));
        assert!(!is_public_route("/api/projects/3/featured", &Method::PATCH));
        assert!(!is_public_route("/api/auth/me", &Method::GET));
        assert!(!is_public_route("/api/auth/register", &Method::POST));
        assert!(!is_public_route("/api/bulk/export", &Method::GET));
        assert!(!is_public_route("/api/experiences", &Method::GET));
    }

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "bearer abc.def.ghi"))
            .to_srv_request();
        assert_eq!(extract_token(&req).as_deref(), Some("abc.def.ghi"));

        let req = TestRequest::default()
            .insert_header(("Authorization", "Basic dXNlcjpwdw=="))
            .to_srv_request();
        assert_eq!(extract_token(&req), None);
    }
}
