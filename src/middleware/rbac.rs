// src/middleware/rbac.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::marker::PhantomData;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::auth::Session,
    services::permissions::Capability,
};

/// 1. O Trait que define uma capacidade exigida por rota
pub trait CapabilityDef: Send + Sync + 'static {
    fn capability() -> Capability;
}

/// 2. O Extractor (Guardião). Devolve a sessão para o handler não extrair de novo.
pub struct RequireCapability<T>(pub Session, pub PhantomData<T>);

// 3. Implementação do FromRequestParts
impl<T, S> FromRequestParts<S> for RequireCapability<T>
where
    T: CapabilityDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // A. Sessão (401 se não houver)
        let session = Session::from_request_parts(parts, state).await?;

        // B. Classificador de papéis
        let required = T::capability();
        if !session.capabilities.allows(required) {
            let app_state = AppState::from_ref(state);
            let locale = Locale::from_headers(&parts.headers);
            tracing::info!(
                usuario_id = session.user_id,
                permission = %session.permission,
                capacidad = required.slug(),
                "acceso denegado"
            );
            return Err(AppError::Forbidden(required.slug()).to_api_error(&locale, &app_state.i18n_store));
        }

        Ok(RequireCapability(session, PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS CAPACIDADES (TIPOS)
// ---

pub struct CapClientes;
impl CapabilityDef for CapClientes {
    fn capability() -> Capability { Capability::ViewClientes }
}

pub struct CapContratos;
impl CapabilityDef for CapContratos {
    fn capability() -> Capability { Capability::ManageContratos }
}

pub struct CapDesarrollos;
impl CapabilityDef for CapDesarrollos {
    fn capability() -> Capability { Capability::ManageDesarrollos }
}

pub struct CapParametros;
impl CapabilityDef for CapParametros {
    fn capability() -> Capability { Capability::ConfigureParametros }
}

pub struct CapUsuarios;
impl CapabilityDef for CapUsuarios {
    fn capability() -> Capability { Capability::ManageUsuarios }
}

pub struct CapGestion;
impl CapabilityDef for CapGestion {
    fn capability() -> Capability { Capability::Gestor }
}
