// src/handlers/solicitudes.rs

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
        rbac::{CapContratos, RequireCapability},
    },
    models::{
        auth::Session,
        solicitud::{Solicitud, SolicitudForm, SolicitudView, TransitionPayload, UpdateSolicitudPayload},
    },
    services::prefill::PrefillResponse,
};

// POST /api/solicitudes
#[utoipa::path(
    post,
    path = "/api/solicitudes",
    tag = "Solicitudes",
    request_body = SolicitudForm,
    responses(
        (status = 201, description = "Solicitação criada em borrador", body = SolicitudView),
        (status = 400, description = "Dados inválidos"),
        (status = 401, description = "Sessão expirada ou token CSRF inválido")
    ),
    params(("x-csrf-token" = String, Header, description = "Token CSRF da sessão")),
    security(("api_jwt" = []))
)]
pub async fn create_solicitud(
    State(app_state): State<AppState>,
    locale: Locale,
    CsrfGuard(session): CsrfGuard,
    Json(payload): Json<SolicitudForm>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = payload.normalized();
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let view = app_state
        .solicitud_service
        .create(&app_state.db_pool, &session.actor(), payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(view)))
}

// GET /api/solicitudes
#[utoipa::path(
    get,
    path = "/api/solicitudes",
    tag = "Solicitudes",
    responses(
        (status = 200, description = "Gestor vê todas; os demais, as próprias", body = Vec<Solicitud>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_solicitudes(
    State(app_state): State<AppState>,
    locale: Locale,
    session: Session,
) -> Result<impl IntoResponse, ApiError> {
    let solicitudes = app_state
        .solicitud_service
        .list(&session.actor())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(solicitudes)))
}

// GET /api/solicitudes/{id}
#[utoipa::path(
    get,
    path = "/api/solicitudes/{id}",
    tag = "Solicitudes",
    params(("id" = i64, Path, description = "ID da solicitação")),
    responses(
        (status = 200, description = "Solicitação, se é editável e o aviso de retorno", body = SolicitudView),
        (status = 404, description = "Não encontrada (details.redirect aponta a lista)")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_solicitud(
    State(app_state): State<AppState>,
    locale: Locale,
    session: Session,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let view = app_state
        .solicitud_service
        .get(&app_state.db_pool, &session.actor(), id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(view)))
}

// PUT /api/solicitudes/{id}
#[utoipa::path(
    put,
    path = "/api/solicitudes/{id}",
    tag = "Solicitudes",
    request_body = UpdateSolicitudPayload,
    params(
        ("id" = i64, Path, description = "ID da solicitação"),
        ("x-csrf-token" = String, Header, description = "Token CSRF da sessão")
    ),
    responses(
        (status = 200, description = "Solicitação atualizada", body = SolicitudView),
        (status = 403, description = "Sem permissão para editar"),
        (status = 409, description = "Não editável no estado atual, vinculada a contrato ou versão desatualizada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_solicitud(
    State(app_state): State<AppState>,
    locale: Locale,
    CsrfGuard(session): CsrfGuard,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateSolicitudPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = payload.normalized();
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let view = app_state
        .solicitud_service
        .update(&app_state.db_pool, &session.actor(), id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(view)))
}

// POST /api/solicitudes/{id}/transicion
#[utoipa::path(
    post,
    path = "/api/solicitudes/{id}/transicion",
    tag = "Solicitudes",
    request_body = TransitionPayload,
    params(
        ("id" = i64, Path, description = "ID da solicitação"),
        ("x-csrf-token" = String, Header, description = "Token CSRF da sessão")
    ),
    responses(
        (status = 200, description = "Novo estado gravado", body = SolicitudView),
        (status = 400, description = "Motivo ausente/curto ou destino inválido"),
        (status = 403, description = "Papel sem permissão para a transição"),
        (status = 409, description = "Transição inválida, solicitação vinculada ou versão desatualizada")
    ),
    security(("api_jwt" = []))
)]
pub async fn transition_solicitud(
    State(app_state): State<AppState>,
    locale: Locale,
    CsrfGuard(session): CsrfGuard,
    Path(id): Path<i64>,
    Json(payload): Json<TransitionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let view = app_state
        .solicitud_service
        .transition(&app_state.db_pool, &session.actor(), id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(view)))
}

// GET /api/solicitudes/{id}/prefill
#[utoipa::path(
    get,
    path = "/api/solicitudes/{id}/prefill",
    tag = "Solicitudes",
    params(("id" = i64, Path, description = "ID da solicitação aprovada")),
    responses(
        (status = 200, description = "Formulário de contrato pré-preenchido e cliente coincidente", body = PrefillResponse),
        (status = 404, description = "Não encontrada"),
        (status = 409, description = "Solicitação não aprovada ou já vinculada")
    ),
    security(("api_jwt" = []))
)]
pub async fn prefill_solicitud(
    State(app_state): State<AppState>,
    locale: Locale,
    RequireCapability(session, _): RequireCapability<CapContratos>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let prefill = app_state
        .solicitud_service
        .prefill(&app_state.db_pool, &session.actor(), id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(prefill)))
}
