//! Response envelopes shared by every route.
//!
//! Success: `{ success: true, code: "SUCCESS", message, data }`.
//! Failure: `{ success: false, code, message, trace_id }` plus an `x-trace-id`
//! header carrying the same id.

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};

use crate::errors::ErrorCode;
use crate::trace_ctx;

pub const SUCCESS_CODE: &str = "SUCCESS";

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: String,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            code: SUCCESS_CODE.to_string(),
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            success: true,
            code: SUCCESS_CODE.to_string(),
            message: message.into(),
            data: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub code: String,
    pub message: String,
    pub trace_id: String,
}

impl ErrorBody {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            code: code.as_str().to_string(),
            message: message.into(),
            trace_id: trace_ctx::trace_id(),
        }
    }
}

/// Build the structured failure response, optionally attaching a cookie.
pub fn error_response(status: StatusCode, body: &ErrorBody, cookie: Option<Cookie<'static>>) -> HttpResponse {
    let mut builder = HttpResponse::build(status);
    builder
        .content_type("application/json")
        .insert_header(("x-trace-id", body.trace_id.clone()));
    if let Some(cookie) = cookie {
        builder.cookie(cookie);
    }
    builder.json(body)
}
