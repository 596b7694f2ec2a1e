use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderName, HeaderValue, RETRY_AFTER},
    Error, HttpResponse,
};
use futures_util::future::{ok, LocalBoxFuture, Ready};
use std::{rc::Rc, task::{Context, Poll}};

use crate::{
    limiter::rate_limiter::{RateDecision, RateLimiterStore},
    utils::get_client_ip::get_client_ip,
};

const LIMIT_HEADER: &str = "x-ratelimit-limit";
const REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// Per-IP sliding-window limit on `/api` routes.
pub struct RateLimit {
    store: RateLimiterStore,
    trust_proxy: bool,
}

impl RateLimit {
    pub fn new(store: RateLimiterStore, trust_proxy: bool) -> Self {
        RateLimit { store, trust_proxy }
    }
}

impl<S> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(RateLimitService {
            service: Rc::new(service),
            store: self.store.clone(),
            trust_proxy: self.trust_proxy,
        })
    }
}

pub struct RateLimitService<S> {
    service: Rc<S>,
    store: RateLimiterStore,
    trust_proxy: bool,
}

impl<S> Service<ServiceRequest> for RateLimitService<S>
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

        if !req.path().starts_with("/api/") {
            return Box::pin(async move { service.call(req).await });
        }

        let client_ip = get_client_ip(req.request(), self.trust_proxy);
        let decision = self.store.check(&client_ip);
        let limit = self.store.limit();

        Box::pin(async move {
            match decision {
                RateDecision::Allowed { remaining } => {
                    let mut res = service.call(req).await?;
                    let headers = res.headers_mut();
                    headers.insert(HeaderName::from_static(LIMIT_HEADER), HeaderValue::from(limit));
                    headers.insert(HeaderName::from_static(REMAINING_HEADER), HeaderValue::from(remaining));
                    Ok(res)
                }
                RateDecision::Rejected { retry_after_secs } => {
                    tracing::warn!(client_ip = %client_ip, path = %req.path(), "Rate limit exceeded");
                    let response = HttpResponse::TooManyRequests()
                        .insert_header((RETRY_AFTER, retry_after_secs))
                        .json(serde_json::json!({
                            "error": "Too many requests from this IP, please try again later."
                        }));
                    Ok(req.into_response(response))
                }
            }
        })
    }
}
