use actix_web::middleware::DefaultHeaders;

/// Baseline browser hardening added to every response that does not set these itself.
/// Cross-Origin-Resource-Policy is left unset so the site can embed `/uploads` images
/// from another origin.
pub fn security_headers(hsts: bool) -> DefaultHeaders {
    let headers = DefaultHeaders::new()
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("X-Frame-Options", "SAMEORIGIN"))
        .add(("Referrer-Policy", "no-referrer"))
        .add(("X-DNS-Prefetch-Control", "off"))
        .add(("X-Download-Options", "noopen"))
        .add(("X-Permitted-Cross-Domain-Policies", "none"))
        .add(("Cross-Origin-Opener-Policy", "same-origin"));

    if hsts {
        headers.add(("Strict-Transport-Security", "max-age=31536000; includeSubDomains"))
    } else {
        headers
    }
}
