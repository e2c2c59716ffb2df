use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use storefront_core::error::StorefrontError;

use crate::app_state::AppState;
use crate::compose::ComposedPage;
use crate::context::TenantRequest;

/// Error wrapper that renders as `{ "error": CODE, "message": ... }`.
#[derive(Debug)]
pub struct ApiError(pub StorefrontError);

impl From<StorefrontError> for ApiError {
    fn from(e: StorefrontError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            StorefrontError::UnknownTenant(_) | StorefrontError::PageNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            StorefrontError::BadRequest(_) | StorefrontError::InvalidProps { .. } => {
                StatusCode::BAD_REQUEST
            }
            StorefrontError::Fetch(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(json!({
            "error": self.0.client_code().as_str(),
            "message": self.0.to_string(),
        }));
        (status, body).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub tenant: Option<String>,
    pub path: Option<String>,
    pub locale: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GovernanceQuery {
    pub tenant: Option<String>,
}

fn host(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// `GET /v1/page?tenant=&path=&locale=`
pub async fn page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(q): Query<PageQuery>,
) -> Result<Json<ComposedPage>, ApiError> {
    let tenant = state.resolver().resolve(&TenantRequest {
        tenant: q.tenant,
        host: host(&headers),
        locale: q.locale,
    })?;
    let route = q.path.unwrap_or_else(|| "/".to_string());

    let page = state
        .pages()
        .page(tenant.tenant_id(), &route)
        .await?
        .ok_or_else(|| StorefrontError::PageNotFound {
            tenant: tenant.tenant_id.clone(),
            route: route.clone(),
        })?;

    let policy = state.gate().policy(tenant.tenant_id());
    let composed = state.composer().compose(&page, &tenant, &policy, Utc::now());
    Ok(Json(composed))
}

/// `GET /v1/governance?tenant=`
pub async fn governance(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(q): Query<GovernanceQuery>,
) -> Result<Response, ApiError> {
    let profile = state.resolver().identify(&TenantRequest {
        tenant: q.tenant,
        host: host(&headers),
        locale: None,
    })?;
    let tenant_id = profile.tenant_id.as_str();

    let snapshot = state.gate().fetch_policy(tenant_id).await;
    let body = json!({
        "tenant_id": tenant_id,
        "state": state.gate().state(tenant_id).as_str(),
        "loaded": snapshot.is_some(),
        "policy": snapshot.as_deref(),
    });
    Ok((StatusCode::OK, Json(body)).into_response())
}
