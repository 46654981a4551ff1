use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;

/// Request methods an endpoint accepts
#[derive(Clone, Debug)]
pub struct AllowedMethods(Arc<[Method]>);

impl AllowedMethods {
    pub fn new(methods: impl IntoIterator<Item = Method>) -> Self {
        Self(methods.into_iter().collect())
    }

    pub fn allows(&self, method: &Method) -> bool {
        self.0.iter().any(|m| m == method)
    }
}

/// Reject requests whose method is not in the allowed set.
///
/// Mobile clients expect the envelope with status 500 here, not a bare 405.
pub async fn method_guard(
    State(allowed): State<AllowedMethods>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !allowed.allows(request.method()) {
        tracing::debug!("Rejected {} {}", request.method(), request.uri().path());
        return Err(ApiError::InvalidRequestMethod);
    }
    Ok(next.run(request).await)
}
