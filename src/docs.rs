// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::get_me,

        // --- Navegação ---
        handlers::navigation::get_menu,
        handlers::navigation::get_grid,

        // --- Solicitudes ---
        handlers::solicitudes::create_solicitud,
        handlers::solicitudes::list_solicitudes,
        handlers::solicitudes::get_solicitud,
        handlers::solicitudes::update_solicitud,
        handlers::solicitudes::transition_solicitud,
        handlers::solicitudes::prefill_solicitud,

        // --- Contratos ---
        handlers::contratos::create_contrato,
        handlers::contratos::list_contratos,
        handlers::contratos::get_contrato,
        handlers::contratos::update_contrato,
        handlers::contratos::archive_contrato,
        handlers::contratos::cancel_contrato,
        handlers::contratos::download_contrato,

        // --- Clientes ---
        handlers::clientes::create_cliente,
        handlers::clientes::list_clientes,
        handlers::clientes::match_cliente,
        handlers::clientes::get_cliente,
        handlers::clientes::update_cliente,
        handlers::clientes::archive_cliente,

        // --- Desarrollos ---
        handlers::desarrollos::create_desarrollo,
        handlers::desarrollos::list_desarrollos,
        handlers::desarrollos::get_desarrollo,
        handlers::desarrollos::update_desarrollo,

        // --- Parâmetros e catálogos ---
        handlers::parametros::get_parametros,
        handlers::parametros::update_parametros,
        handlers::parametros::list_nacionalidades,

        // --- Usuarios ---
        handlers::usuarios::list_usuarios,
        handlers::usuarios::create_usuario,
        handlers::usuarios::update_usuario,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::Usuario,
            models::auth::LoginPayload,
            models::auth::AuthResponse,
            models::auth::Session,
            models::auth::MeResponse,
            models::auth::CreateUsuarioPayload,
            models::auth::UpdateUsuarioPayload,
            services::permissions::Capabilities,

            // --- Navegação ---
            models::grid::Metodo,
            models::grid::RowAction,
            models::grid::GridRow,
            models::grid::GridResponse,
            models::grid::MenuItem,

            // --- Solicitudes ---
            models::solicitud::SolicitudEstado,
            models::solicitud::Solicitud,
            models::solicitud::SolicitudForm,
            models::solicitud::UpdateSolicitudPayload,
            models::solicitud::TransitionPayload,
            models::solicitud::AvisoRetorno,
            models::solicitud::SolicitudView,

            // --- Prefill ---
            services::prefill::ClientePrefill,
            services::prefill::ContratoPrefill,
            services::prefill::DesarrolloPrefill,
            services::prefill::PrefillResumen,
            services::prefill::Prefill,
            services::prefill::PrefillResponse,

            // --- Clientes ---
            models::cliente::ClienteEstado,
            models::cliente::Cliente,
            models::cliente::ClienteInput,
            models::cliente::MatchReason,
            models::cliente::ClientMatch,
            models::cliente::Nacionalidad,

            // --- Contratos ---
            models::contrato::ContratoEstatus,
            models::contrato::ClienteSnapshot,
            models::contrato::DesarrolloSnapshot,
            models::contrato::Albacea,
            models::contrato::TerminosContrato,
            models::contrato::ContratoSnapshot,
            models::contrato::Contrato,
            models::contrato::CreateContratoPayload,
            models::contrato::UpdateContratoPayload,
            models::contrato::CancelContratoPayload,
            models::contrato::ArchiveContratoPayload,

            // --- Desarrollos e parâmetros ---
            models::desarrollo::Desarrollo,
            models::desarrollo::DesarrolloInput,
            models::parametros::Parametros,
            models::parametros::UpdateParametrosRequest,
        )
    ),
    tags(
        (name = "Auth", description = "Sessão, login e dados do usuário"),
        (name = "Navegacion", description = "Menu e grades com ações por linha"),
        (name = "Solicitudes", description = "Fluxo de aprovação das solicitações"),
        (name = "Contratos", description = "Contratos, cancelamento e documento DOCX"),
        (name = "Clientes", description = "Cadastro e coincidência por RFC/CURP"),
        (name = "Desarrollos", description = "Empreendimentos e inventário de lotes"),
        (name = "Parametros", description = "Dados da empresa e catálogos"),
        (name = "Usuarios", description = "Gestão de usuários e papéis")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
