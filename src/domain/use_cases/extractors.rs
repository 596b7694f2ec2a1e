use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::{entities::user::AuthenticatedUser, errors::AuthError};

/// The caller resolved by the auth middleware. 401 when nothing was attached.
#[derive(Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(AuthUser(user.clone()))),
            None => ready(Err(AuthError::MissingCredentials.into())),
        }
    }
}

/// Like [`AuthUser`], but 403 unless the caller is an admin.
#[derive(Debug)]
pub struct AdminUser(pub AuthenticatedUser);

impl FromRequest for AdminUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) if user.is_admin() => ready(Ok(AdminUser(user.clone()))),
            Some(user) => {
                tracing::warn!(user_id = user.id, path = %req.path(), "Admin access denied");
                ready(Err(AuthError::Forbidden.into()))
            }
            None => ready(Err(AuthError::MissingCredentials.into())),
        }
    }
}
