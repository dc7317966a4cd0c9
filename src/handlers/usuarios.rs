// src/handlers/usuarios.rs

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
        rbac::{CapUsuarios, RequireCapability},
    },
    models::auth::{CreateUsuarioPayload, UpdateUsuarioPayload, Usuario},
};

// GET /api/usuarios
#[utoipa::path(
    get,
    path = "/api/usuarios",
    tag = "Usuarios",
    responses((status = 200, description = "Usuários do sistema", body = Vec<Usuario>)),
    security(("api_jwt" = []))
)]
pub async fn list_usuarios(
    State(app_state): State<AppState>,
    locale: Locale,
    _cap: RequireCapability<CapUsuarios>,
) -> Result<impl IntoResponse, ApiError> {
    let usuarios = app_state
        .usuario_service
        .list(&app_state.db_pool)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(usuarios)))
}

// POST /api/usuarios
#[utoipa::path(
    post,
    path = "/api/usuarios",
    tag = "Usuarios",
    request_body = CreateUsuarioPayload,
    params(("x-csrf-token" = String, Header, description = "Token CSRF da sessão")),
    responses(
        (status = 201, description = "Usuário criado", body = Usuario),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "E-mail já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_usuario(
    State(app_state): State<AppState>,
    locale: Locale,
    _cap: RequireCapability<CapUsuarios>,
    _csrf: CsrfGuard,
    Json(payload): Json<CreateUsuarioPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let usuario = app_state
        .usuario_service
        .create(&app_state.db_pool, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(usuario)))
}

// PUT /api/usuarios/{id}
#[utoipa::path(
    put,
    path = "/api/usuarios/{id}",
    tag = "Usuarios",
    request_body = UpdateUsuarioPayload,
    params(
        ("id" = i64, Path, description = "ID do usuário"),
        ("x-csrf-token" = String, Header, description = "Token CSRF da sessão")
    ),
    responses(
        (status = 200, description = "Usuário atualizado", body = Usuario),
        (status = 403, description = "Alteração do próprio papel ou desativação de si mesmo"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_usuario(
    State(app_state): State<AppState>,
    locale: Locale,
    _csrf: CsrfGuard,
    RequireCapability(session, _): RequireCapability<CapUsuarios>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUsuarioPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let usuario = app_state
        .usuario_service
        .update(&app_state.db_pool, session.user_id, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(usuario)))
}
