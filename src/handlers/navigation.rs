// src/handlers/navigation.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::{ApiError, AppError, Recurso},
    config::AppState,
    middleware::i18n::Locale,
    models::{
        auth::Session,
        grid::{GridResponse, GridRow, MenuItem},
    },
    services::{
        grid::{
            acciones_cliente, acciones_contrato, acciones_desarrollo, acciones_solicitud, acciones_usuario, grid_row,
            GridResource,
        },
        permissions::build_menu,
    },
};

// GET /api/menu
#[utoipa::path(
    get,
    path = "/api/menu",
    tag = "Navegacion",
    responses((status = 200, description = "Entradas do menu visíveis para o papel", body = Vec<MenuItem>)),
    security(("api_jwt" = []))
)]
pub async fn get_menu(session: Session) -> impl IntoResponse {
    (StatusCode::OK, Json(build_menu(&session.capabilities)))
}

async fn load_rows(app_state: &AppState, session: &Session, recurso: GridResource) -> Result<Vec<GridRow>, AppError> {
    let caps = &session.capabilities;
    let pool = &app_state.db_pool;

    match recurso {
        GridResource::Solicitudes => {
            let actor = session.actor();
            let solicitudes = app_state.solicitud_service.list(&actor).await?;
            solicitudes
                .iter()
                .map(|s| grid_row(s, acciones_solicitud(s, &actor)))
                .collect()
        }
        GridResource::Contratos => {
            let contratos = app_state.contrato_service.list().await?;
            contratos.iter().map(|c| grid_row(c, acciones_contrato(c, caps))).collect()
        }
        GridResource::Clientes => {
            let clientes = app_state.cliente_service.list(pool).await?;
            clientes.iter().map(|c| grid_row(c, acciones_cliente(c, caps))).collect()
        }
        GridResource::Desarrollos => {
            let desarrollos = app_state.desarrollo_service.list().await?;
            desarrollos.iter().map(|d| grid_row(d, acciones_desarrollo(d, caps))).collect()
        }
        GridResource::Usuarios => {
            let usuarios = app_state.usuario_service.list(pool).await?;
            usuarios
                .iter()
                .map(|u| grid_row(u, acciones_usuario(u, caps, session.user_id)))
                .collect()
        }
    }
}

// GET /api/grid/{recurso}
#[utoipa::path(
    get,
    path = "/api/grid/{recurso}",
    tag = "Navegacion",
    params(("recurso" = String, Path, description = "clientes | contratos | solicitudes | desarrollos | usuarios")),
    responses(
        (status = 200, description = "Linhas da grade com as ações permitidas", body = GridResponse),
        (status = 403, description = "Papel sem acesso ao recurso"),
        (status = 404, description = "Recurso desconhecido")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_grid(
    State(app_state): State<AppState>,
    locale: Locale,
    session: Session,
    Path(recurso): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let recurso = GridResource::parse(&recurso)
        .ok_or_else(|| AppError::NotFound(Recurso::Ruta).to_api_error(&locale, &app_state.i18n_store))?;

    if !recurso.allowed(&session.capabilities) {
        return Err(AppError::Forbidden(recurso.slug()).to_api_error(&locale, &app_state.i18n_store));
    }

    let data = load_rows(&app_state, &session, recurso)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(GridResponse { data })))
}

/// Fallback do router: rota desconhecida vira 404 em JSON, com o caminho de volta.
pub async fn not_found(State(app_state): State<AppState>, locale: Locale) -> ApiError {
    AppError::NotFound(Recurso::Ruta).to_api_error(&locale, &app_state.i18n_store)
}
