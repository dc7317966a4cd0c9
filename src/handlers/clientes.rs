// src/handlers/clientes.rs

use axum::{
    extract::{Path, Query, State},
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
        rbac::{CapClientes, CapContratos, RequireCapability},
    },
    models::cliente::{ClientMatch, Cliente, ClienteInput, MatchQuery},
};

// POST /api/clientes
#[utoipa::path(
    post,
    path = "/api/clientes",
    tag = "Clientes",
    request_body = ClienteInput,
    params(("x-csrf-token" = String, Header, description = "Token CSRF da sessão")),
    responses(
        (status = 201, description = "Cliente criado", body = Cliente),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_cliente(
    State(app_state): State<AppState>,
    locale: Locale,
    _cap: RequireCapability<CapContratos>,
    _csrf: CsrfGuard,
    Json(payload): Json<ClienteInput>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = payload.normalized();
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let cliente = app_state
        .cliente_service
        .create(&app_state.db_pool, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(cliente)))
}

// GET /api/clientes
#[utoipa::path(
    get,
    path = "/api/clientes",
    tag = "Clientes",
    responses((status = 200, description = "Clientes", body = Vec<Cliente>)),
    security(("api_jwt" = []))
)]
pub async fn list_clientes(
    State(app_state): State<AppState>,
    locale: Locale,
    _cap: RequireCapability<CapClientes>,
) -> Result<impl IntoResponse, ApiError> {
    let clientes = app_state
        .cliente_service
        .list(&app_state.db_pool)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(clientes)))
}

// GET /api/clientes/match?rfc=&curp=
#[utoipa::path(
    get,
    path = "/api/clientes/match",
    tag = "Clientes",
    params(MatchQuery),
    responses(
        (status = 200, description = "Cliente coincidente (RFC tem prioridade sobre CURP) ou null", body = Option<ClientMatch>)
    ),
    security(("api_jwt" = []))
)]
pub async fn match_cliente(
    State(app_state): State<AppState>,
    locale: Locale,
    _cap: RequireCapability<CapClientes>,
    Query(query): Query<MatchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let coincidencia = app_state
        .cliente_service
        .find_match(query.rfc.as_deref(), query.curp.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(coincidencia)))
}

// GET /api/clientes/{id}
#[utoipa::path(
    get,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    params(("id" = i64, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente", body = Cliente),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_cliente(
    State(app_state): State<AppState>,
    locale: Locale,
    _cap: RequireCapability<CapClientes>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let cliente = app_state
        .cliente_service
        .get(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(cliente)))
}

// PUT /api/clientes/{id}
#[utoipa::path(
    put,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    request_body = ClienteInput,
    params(
        ("id" = i64, Path, description = "ID do cliente"),
        ("x-csrf-token" = String, Header, description = "Token CSRF da sessão")
    ),
    responses(
        (status = 200, description = "Cliente atualizado; contratos existentes mantêm o snapshot", body = Cliente),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_cliente(
    State(app_state): State<AppState>,
    locale: Locale,
    _cap: RequireCapability<CapContratos>,
    _csrf: CsrfGuard,
    Path(id): Path<i64>,
    Json(payload): Json<ClienteInput>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = payload.normalized();
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let cliente = app_state
        .cliente_service
        .update(&app_state.db_pool, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(cliente)))
}

// POST /api/clientes/{id}/archivo
#[utoipa::path(
    post,
    path = "/api/clientes/{id}/archivo",
    tag = "Clientes",
    params(
        ("id" = i64, Path, description = "ID do cliente"),
        ("x-csrf-token" = String, Header, description = "Token CSRF da sessão")
    ),
    responses(
        (status = 200, description = "Cliente arquivado", body = Cliente),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn archive_cliente(
    State(app_state): State<AppState>,
    locale: Locale,
    _cap: RequireCapability<CapContratos>,
    _csrf: CsrfGuard,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let cliente = app_state
        .cliente_service
        .archive(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(cliente)))
}
