use std::future::{ready, Ready};
use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};

use crate::auth::CallerIdentity;
use crate::error::AppError;

/// The caller resolved by `IdentityResolve`.
///
/// Extraction fails with `TOKEN_NOT_FOUND` (401) when the request carried no
/// access token, which is how a route declares that it requires identity.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub CallerIdentity);

impl Deref for CurrentUser {
    type Target = CallerIdentity;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<CallerIdentity>()
                .cloned()
                .map(CurrentUser)
                .ok_or(AppError::Unauthorized),
        )
    }
}
