// src/handlers/desarrollos.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        csrf::CsrfGuard,
        i18n::Locale,
        rbac::{CapDesarrollos, RequireCapability},
    },
    models::{
        auth::Session,
        desarrollo::{Desarrollo, DesarrolloInput},
    },
};

// POST /api/desarrollos
#[utoipa::path(
    post,
    path = "/api/desarrollos",
    tag = "Desarrollos",
    request_body = DesarrolloInput,
    params(("x-csrf-token" = String, Header, description = "Token CSRF da sessão")),
    responses(
        (status = 201, description = "Desarrollo criado", body = Desarrollo),
        (status = 400, description = "Dados inválidos ou lotes disponíveis acima do total")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_desarrollo(
    State(app_state): State<AppState>,
    locale: Locale,
    _cap: RequireCapability<CapDesarrollos>,
    _csrf: CsrfGuard,
    Json(payload): Json<DesarrolloInput>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let desarrollo = app_state
        .desarrollo_service
        .create(&app_state.db_pool, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(desarrollo)))
}

// GET /api/desarrollos
// Qualquer sessão: o formulário de solicitação precisa do catálogo.
#[utoipa::path(
    get,
    path = "/api/desarrollos",
    tag = "Desarrollos",
    responses((status = 200, description = "Desarrollos com o inventário de lotes", body = Vec<Desarrollo>)),
    security(("api_jwt" = []))
)]
pub async fn list_desarrollos(
    State(app_state): State<AppState>,
    locale: Locale,
    _session: Session,
) -> Result<impl IntoResponse, ApiError> {
    let desarrollos = app_state
        .desarrollo_service
        .list()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(desarrollos)))
}

// GET /api/desarrollos/{id}
#[utoipa::path(
    get,
    path = "/api/desarrollos/{id}",
    tag = "Desarrollos",
    params(("id" = i64, Path, description = "ID do desarrollo")),
    responses(
        (status = 200, description = "Desarrollo", body = Desarrollo),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_desarrollo(
    State(app_state): State<AppState>,
    locale: Locale,
    _session: Session,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let desarrollo = app_state
        .desarrollo_service
        .get(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(desarrollo)))
}

// PUT /api/desarrollos/{id}
#[utoipa::path(
    put,
    path = "/api/desarrollos/{id}",
    tag = "Desarrollos",
    request_body = DesarrolloInput,
    params(
        ("id" = i64, Path, description = "ID do desarrollo"),
        ("x-csrf-token" = String, Header, description = "Token CSRF da sessão")
    ),
    responses(
        (status = 200, description = "Desarrollo atualizado", body = Desarrollo),
        (status = 400, description = "Lotes disponíveis acima do total"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_desarrollo(
    State(app_state): State<AppState>,
    locale: Locale,
    _cap: RequireCapability<CapDesarrollos>,
    _csrf: CsrfGuard,
    Path(id): Path<i64>,
    Json(payload): Json<DesarrolloInput>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let desarrollo = app_state
        .desarrollo_service
        .update(&app_state.db_pool, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(desarrollo)))
}
