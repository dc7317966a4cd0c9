// src/handlers/contratos.rs

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
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
        rbac::{CapContratos, RequireCapability},
    },
    models::contrato::{
        ArchiveContratoPayload, CancelContratoPayload, Contrato, CreateContratoPayload, UpdateContratoPayload,
    },
    services::document_service::DOCX_MIME,
};

// POST /api/contratos
#[utoipa::path(
    post,
    path = "/api/contratos",
    tag = "Contratos",
    request_body = CreateContratoPayload,
    params(("x-csrf-token" = String, Header, description = "Token CSRF da sessão")),
    responses(
        (status = 201, description = "Contrato criado; um lote do desarrollo foi consumido", body = Contrato),
        (status = 400, description = "Dados inválidos ou cliente ausente"),
        (status = 409, description = "Sem lotes, ou solicitação de origem não aprovada / já vinculada")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_contrato(
    State(app_state): State<AppState>,
    locale: Locale,
    _cap: RequireCapability<CapContratos>,
    _csrf: CsrfGuard,
    Json(payload): Json<CreateContratoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = payload.normalized();
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let contrato = app_state
        .contrato_service
        .create(&app_state.db_pool, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(contrato)))
}

// GET /api/contratos
#[utoipa::path(
    get,
    path = "/api/contratos",
    tag = "Contratos",
    responses((status = 200, description = "Contratos, mais recentes primeiro", body = Vec<Contrato>)),
    security(("api_jwt" = []))
)]
pub async fn list_contratos(
    State(app_state): State<AppState>,
    locale: Locale,
    _cap: RequireCapability<CapContratos>,
) -> Result<impl IntoResponse, ApiError> {
    let contratos = app_state
        .contrato_service
        .list()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(contratos)))
}

// GET /api/contratos/{id}
#[utoipa::path(
    get,
    path = "/api/contratos/{id}",
    tag = "Contratos",
    params(("id" = i64, Path, description = "ID do contrato")),
    responses(
        (status = 200, description = "Contrato com o snapshot", body = Contrato),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_contrato(
    State(app_state): State<AppState>,
    locale: Locale,
    _cap: RequireCapability<CapContratos>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let contrato = app_state
        .contrato_service
        .get(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(contrato)))
}

// PUT /api/contratos/{id}
#[utoipa::path(
    put,
    path = "/api/contratos/{id}",
    tag = "Contratos",
    request_body = UpdateContratoPayload,
    params(
        ("id" = i64, Path, description = "ID do contrato"),
        ("x-csrf-token" = String, Header, description = "Token CSRF da sessão")
    ),
    responses(
        (status = 200, description = "Termos substituídos", body = Contrato),
        (status = 409, description = "Contrato cancelado ou versão desatualizada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_contrato(
    State(app_state): State<AppState>,
    locale: Locale,
    _cap: RequireCapability<CapContratos>,
    _csrf: CsrfGuard,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateContratoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let contrato = app_state
        .contrato_service
        .update_terminos(&app_state.db_pool, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(contrato)))
}

// POST /api/contratos/{id}/archivo
#[utoipa::path(
    post,
    path = "/api/contratos/{id}/archivo",
    tag = "Contratos",
    request_body = ArchiveContratoPayload,
    params(
        ("id" = i64, Path, description = "ID do contrato"),
        ("x-csrf-token" = String, Header, description = "Token CSRF da sessão")
    ),
    responses(
        (status = 200, description = "Arquivado ou reativado", body = Contrato),
        (status = 409, description = "Contrato cancelado ou versão desatualizada")
    ),
    security(("api_jwt" = []))
)]
pub async fn archive_contrato(
    State(app_state): State<AppState>,
    locale: Locale,
    _cap: RequireCapability<CapContratos>,
    _csrf: CsrfGuard,
    Path(id): Path<i64>,
    Json(payload): Json<ArchiveContratoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let contrato = app_state
        .contrato_service
        .archive(&app_state.db_pool, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(contrato)))
}

// POST /api/contratos/{id}/cancelacion
#[utoipa::path(
    post,
    path = "/api/contratos/{id}/cancelacion",
    tag = "Contratos",
    request_body = CancelContratoPayload,
    params(
        ("id" = i64, Path, description = "ID do contrato"),
        ("x-csrf-token" = String, Header, description = "Token CSRF da sessão")
    ),
    responses(
        (status = 200, description = "Cancelado; o lote volta ao desarrollo", body = Contrato),
        (status = 400, description = "Motivo curto"),
        (status = 409, description = "Já cancelado ou versão desatualizada")
    ),
    security(("api_jwt" = []))
)]
pub async fn cancel_contrato(
    State(app_state): State<AppState>,
    locale: Locale,
    _cap: RequireCapability<CapContratos>,
    _csrf: CsrfGuard,
    Path(id): Path<i64>,
    Json(payload): Json<CancelContratoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let contrato = app_state
        .contrato_service
        .cancel(&app_state.db_pool, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(contrato)))
}

// GET /api/contratos/{id}/documento
#[utoipa::path(
    get,
    path = "/api/contratos/{id}/documento",
    tag = "Contratos",
    params(("id" = i64, Path, description = "ID do contrato")),
    responses(
        (status = 200, description = "Contrato em DOCX", body = Vec<u8>, content_type = "application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        (status = 404, description = "Contrato não encontrado"),
        (status = 422, description = "Plantilla do desarrollo não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn download_contrato(
    State(app_state): State<AppState>,
    locale: Locale,
    _cap: RequireCapability<CapContratos>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let contrato = app_state
        .contrato_service
        .get(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let documento = app_state
        .document_service
        .render_contrato(&app_state.db_pool, &contrato)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let disposition = format!("attachment; filename=\"{}\"", documento.nombre);
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, DOCX_MIME.to_string()), (header::CONTENT_DISPOSITION, disposition)],
        documento.bytes,
    ))
}
