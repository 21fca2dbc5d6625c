//! Request identity resolution.
//!
//! Reads `Authorization: Bearer <token>`, resolves it to a [`CallerIdentity`]
//! and stores that in the request extensions. Requests without the header
//! pass through anonymous; routes that need a caller use the `CurrentUser`
//! extractor. Credential failures are translated here and short-circuit the
//! request, so handlers never see a half-authenticated request.

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{self, HeaderValue};
use actix_web::{web, Error, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::auth::bypass::resolve_bypass;
use crate::auth::failure::{translate, AuthFailure};
use crate::auth::jwt::verify_access_token;
use crate::auth::CallerIdentity;
use crate::db::require_db;
use crate::error::AppError;
use crate::logging::security;
use crate::repos::users::{self, User};
use crate::state::app_state::AppState;

pub struct IdentityResolve;

/// Set once the first `IdentityResolve` layer has seen the request.
#[derive(Debug, Clone, Copy)]
struct IdentityChecked;

enum Rejection {
    Credential(AuthFailure),
    Fatal(AppError),
}

impl From<AuthFailure> for Rejection {
    fn from(failure: AuthFailure) -> Self {
        Self::Credential(failure)
    }
}

impl<S, B> Transform<S, ServiceRequest> for IdentityResolve
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = IdentityResolveMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(IdentityResolveMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct IdentityResolveMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for IdentityResolveMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        // Everything runs inside the future so error bodies see the trace scope
        Box::pin(async move {
            if req.extensions().get::<IdentityChecked>().is_some() {
                return service.call(req).await.map(ServiceResponse::map_into_left_body);
            }
            req.extensions_mut().insert(IdentityChecked);

            let candidate = match bearer_token(req.headers().get(header::AUTHORIZATION)) {
                Ok(None) => {
                    return service.call(req).await.map(ServiceResponse::map_into_left_body);
                }
                Ok(Some(token)) => Ok(token),
                Err(failure) => Err(failure),
            };

            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                let err = AppError::internal("AppState not available".to_string());
                return Ok(req.error_response(err).map_into_right_body());
            };

            let path = req.path().to_string();
            let outcome = match candidate {
                Ok(token) => resolve(&state, &token, &path).await,
                Err(failure) => Err(Rejection::Credential(failure)),
            };

            match outcome {
                Ok(identity) => {
                    req.extensions_mut().insert(identity);
                    service.call(req).await.map(ServiceResponse::map_into_left_body)
                }
                Err(Rejection::Credential(failure)) => {
                    security::token_rejected(failure.code().as_str(), &path);
                    let response = translate(failure, &path).into_response(&state.cookies);
                    Ok(req.into_response(response).map_into_right_body())
                }
                Err(Rejection::Fatal(err)) => Ok(req.error_response(err).map_into_right_body()),
            }
        })
    }
}

/// `Ok(None)` when no header is present; a present header that is not a
/// well-formed `Bearer <token>` is an invalid credential.
fn bearer_token(value: Option<&HeaderValue>) -> Result<Option<String>, AuthFailure> {
    let Some(value) = value else {
        return Ok(None);
    };
    let raw = value.to_str().map_err(|_| AuthFailure::CredentialInvalid)?;

    let mut parts = raw.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Ok(Some(token.to_string())),
        _ => Err(AuthFailure::CredentialInvalid),
    }
}

async fn resolve(state: &AppState, token: &str, path: &str) -> Result<CallerIdentity, Rejection> {
    let db = require_db(state).map_err(Rejection::Fatal)?;

    if let Some(user_id) = resolve_bypass(token, &state.security) {
        return match users::find_user_by_id(db, user_id).await {
            Ok(Some(user)) => {
                security::bypass_used(user_id, path);
                Ok(identity(user, true))
            }
            Ok(None) => {
                security::bypass_misconfigured(user_id);
                Err(Rejection::Fatal(AppError::config(format!(
                    "bypass user {user_id} does not exist"
                ))))
            }
            Err(err) => {
                warn!(error = ?err, "bypass user lookup failed");
                Err(AuthFailure::CredentialVerificationFailed.into())
            }
        };
    }

    let claims = verify_access_token(token, &state.security)?;
    let user_id = claims.user_id()?;

    match users::find_user_by_id(db, user_id).await {
        Ok(Some(user)) => Ok(identity(user, false)),
        Ok(None) => Err(AuthFailure::IdentityNotFound.into()),
        Err(err) => {
            warn!(error = ?err, user_id, "caller lookup failed");
            Err(AuthFailure::CredentialVerificationFailed.into())
        }
    }
}

fn identity(user: User, via_bypass: bool) -> CallerIdentity {
    CallerIdentity {
        user_id: user.id,
        email: user.email,
        nickname: user.nickname,
        via_bypass,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_parsing() {
        let ok = HeaderValue::from_static("Bearer abc.def.ghi");
        assert_eq!(bearer_token(Some(&ok)).unwrap().as_deref(), Some("abc.def.ghi"));
        assert_eq!(bearer_token(None).unwrap(), None);

        for bad in ["Basic abc", "Bearer", "Bearer a b", "bearer abc", ""] {
            let value = HeaderValue::from_static(bad);
            assert_eq!(
                bearer_token(Some(&value)).unwrap_err(),
                AuthFailure::CredentialInvalid,
                "{bad:?}"
            );
        }
    }
}
