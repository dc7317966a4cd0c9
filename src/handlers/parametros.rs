// src/handlers/parametros.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        csrf::CsrfGuard,
        i18n::Locale,
        rbac::{CapParametros, RequireCapability},
    },
    models::{
        auth::Session,
        cliente::Nacionalidad,
        parametros::{Parametros, UpdateParametrosRequest},
    },
};

// GET /api/parametros
#[utoipa::path(
    get,
    path = "/api/parametros",
    tag = "Parametros",
    responses((status = 200, description = "Dados da empresa usados nos documentos", body = Parametros)),
    security(("api_jwt" = []))
)]
pub async fn get_parametros(
    State(app_state): State<AppState>,
    locale: Locale,
    _cap: RequireCapability<CapParametros>,
) -> Result<impl IntoResponse, ApiError> {
    let parametros = app_state
        .desarrollo_service
        .get_parametros(&app_state.db_pool)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(parametros)))
}

// PUT /api/parametros
#[utoipa::path(
    put,
    path = "/api/parametros",
    tag = "Parametros",
    request_body = UpdateParametrosRequest,
    params(("x-csrf-token" = String, Header, description = "Token CSRF da sessão")),
    responses((status = 200, description = "Parâmetros gravados", body = Parametros)),
    security(("api_jwt" = []))
)]
pub async fn update_parametros(
    State(app_state): State<AppState>,
    locale: Locale,
    _cap: RequireCapability<CapParametros>,
    _csrf: CsrfGuard,
    Json(payload): Json<UpdateParametrosRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let parametros = app_state
        .desarrollo_service
        .update_parametros(&app_state.db_pool, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(parametros)))
}

// GET /api/catalogos/nacionalidades
#[utoipa::path(
    get,
    path = "/api/catalogos/nacionalidades",
    tag = "Parametros",
    responses((status = 200, description = "Catálogo de nacionalidades", body = Vec<Nacionalidad>)),
    security(("api_jwt" = []))
)]
pub async fn list_nacionalidades(
    State(app_state): State<AppState>,
    locale: Locale,
    _session: Session,
) -> Result<impl IntoResponse, ApiError> {
    let nacionalidades = app_state
        .desarrollo_service
        .nacionalidades()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(nacionalidades)))
}
