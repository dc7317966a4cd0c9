// src/lib.rs

use axum::{
    routing::{get, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;

/// Router completo. A autenticação é feita pelos extratores de cada handler.
pub fn app(app_state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout));

    let solicitud_routes = Router::new()
        .route(
            "/",
            post(handlers::solicitudes::create_solicitud).get(handlers::solicitudes::list_solicitudes),
        )
        .route(
            "/{id}",
            get(handlers::solicitudes::get_solicitud).put(handlers::solicitudes::update_solicitud),
        )
        .route("/{id}/transicion", post(handlers::solicitudes::transition_solicitud))
        .route("/{id}/prefill", get(handlers::solicitudes::prefill_solicitud));

    let contrato_routes = Router::new()
        .route(
            "/",
            post(handlers::contratos::create_contrato).get(handlers::contratos::list_contratos),
        )
        .route(
            "/{id}",
            get(handlers::contratos::get_contrato).put(handlers::contratos::update_contrato),
        )
        .route("/{id}/archivo", post(handlers::contratos::archive_contrato))
        .route("/{id}/cancelacion", post(handlers::contratos::cancel_contrato))
        .route("/{id}/documento", get(handlers::contratos::download_contrato));

    let cliente_routes = Router::new()
        .route(
            "/",
            post(handlers::clientes::create_cliente).get(handlers::clientes::list_clientes),
        )
        .route("/match", get(handlers::clientes::match_cliente))
        .route(
            "/{id}",
            get(handlers::clientes::get_cliente).put(handlers::clientes::update_cliente),
        )
        .route("/{id}/archivo", post(handlers::clientes::archive_cliente));

    let desarrollo_routes = Router::new()
        .route(
            "/",
            post(handlers::desarrollos::create_desarrollo).get(handlers::desarrollos::list_desarrollos),
        )
        .route(
            "/{id}",
            get(handlers::desarrollos::get_desarrollo).put(handlers::desarrollos::update_desarrollo),
        );

    let usuario_routes = Router::new()
        .route(
            "/",
            post(handlers::usuarios::create_usuario).get(handlers::usuarios::list_usuarios),
        )
        .route("/{id}", axum::routing::put(handlers::usuarios::update_usuario));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/me", get(handlers::auth::get_me))
        .route("/api/menu", get(handlers::navigation::get_menu))
        .route("/api/grid/{recurso}", get(handlers::navigation::get_grid))
        .route(
            "/api/parametros",
            get(handlers::parametros::get_parametros).put(handlers::parametros::update_parametros),
        )
        .route("/api/catalogos/nacionalidades", get(handlers::parametros::list_nacionalidades))
        .nest("/api/auth", auth_routes)
        .nest("/api/solicitudes", solicitud_routes)
        .nest("/api/contratos", contrato_routes)
        .nest("/api/clientes", cliente_routes)
        .nest("/api/desarrollos", desarrollo_routes)
        .nest("/api/usuarios", usuario_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(handlers::navigation::not_found)
        .with_state(app_state)
}
