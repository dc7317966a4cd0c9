use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;
use crate::services::solicitud_workflow::WorkflowError;

// Erro de domínio: o que services e repositórios devolvem.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error de validación")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Credenciales inválidas")]
    InvalidCredentials,

    #[error("Sesión expirada")]
    SessionExpired,

    #[error("Permiso insuficiente: {0}")]
    Forbidden(&'static str),

    #[error("{0} no encontrado")]
    NotFound(Recurso),

    #[error("Flujo de solicitud: {0}")]
    Workflow(#[from] WorkflowError),

    #[error("Contrato cancelado")]
    ContratoCancelado,

    #[error("Solicitud no convertible en contrato")]
    SolicitudNoConvertible,

    #[error("Sin lotes disponibles en el desarrollo")]
    SinLotesDisponibles,

    #[error("El registro fue modificado por otro usuario")]
    VersionConflict,

    #[error("Violación de unicidad: {0}")]
    UniqueConstraintViolation(String),

    #[error("Plantilla no encontrada: {0}")]
    TemplateNotFound(String),

    #[error("Error de base de datos")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Error interno del servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Error de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Error de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Error de DOCX: {0}")]
    DocxError(#[from] zip::result::ZipError),

    #[error("Error de E/S: {0}")]
    IoError(#[from] std::io::Error),
}

/// Recursos que podem não existir. Usado para a mensagem e para a rota de retorno.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recurso {
    Solicitud,
    Contrato,
    Cliente,
    Desarrollo,
    Usuario,
    Ruta,
}

impl Recurso {
    pub fn clave(self) -> &'static str {
        match self {
            Recurso::Solicitud => "no_encontrado.solicitud",
            Recurso::Contrato => "no_encontrado.contrato",
            Recurso::Cliente => "no_encontrado.cliente",
            Recurso::Desarrollo => "no_encontrado.desarrollo",
            Recurso::Usuario => "no_encontrado.usuario",
            Recurso::Ruta => "no_encontrado.ruta",
        }
    }

    /// Para onde o front-end deve redirecionar quando o registro não existe.
    pub fn redirect(self) -> &'static str {
        match self {
            Recurso::Solicitud => "/solicitudes",
            Recurso::Contrato => "/contratos",
            Recurso::Cliente => "/clientes",
            Recurso::Desarrollo => "/desarrollos",
            Recurso::Usuario => "/usuarios",
            Recurso::Ruta => "/inicio",
        }
    }
}

impl std::fmt::Display for Recurso {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Recurso::Solicitud => "Solicitud",
            Recurso::Contrato => "Contrato",
            Recurso::Cliente => "Cliente",
            Recurso::Desarrollo => "Desarrollo",
            Recurso::Usuario => "Usuario",
            Recurso::Ruta => "Ruta",
        };
        f.write_str(name)
    }
}

// Erro de transporte: o que os handlers devolvem, já traduzido.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    /// Chave de mensagem no I18nStore.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "error.validacion",
            AppError::InvalidCredentials => "error.credenciales",
            AppError::SessionExpired => "error.sesion_expirada",
            AppError::Forbidden(_) => "error.permiso",
            AppError::NotFound(recurso) => recurso.clave(),
            AppError::Workflow(w) => w.code(),
            AppError::ContratoCancelado => "error.contrato_cancelado",
            AppError::SolicitudNoConvertible => "error.solicitud_no_convertible",
            AppError::SinLotesDisponibles => "error.sin_lotes",
            AppError::VersionConflict => "error.conflicto_version",
            AppError::UniqueConstraintViolation(_) => "error.duplicado",
            AppError::TemplateNotFound(_) => "error.plantilla",
            _ => "error.interno",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::SessionExpired => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Workflow(w) => w.status(),
            AppError::ContratoCancelado
            | AppError::SolicitudNoConvertible
            | AppError::SinLotesDisponibles
            | AppError::VersionConflict
            | AppError::UniqueConstraintViolation(_) => StatusCode::CONFLICT,
            AppError::TemplateNotFound(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_api_error(self, locale: &Locale, store: &I18nStore) -> ApiError {
        let status = self.status();
        let code = self.code();

        let (error, details) = match &self {
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<Value> = field_errors
                        .iter()
                        .map(|e| {
                            let key = e.message.as_deref().unwrap_or(e.code.as_ref());
                            Value::String(store.translate(&locale.0, key, &[]))
                        })
                        .collect();
                    details.insert(field.to_string(), Value::Array(messages));
                }
                (store.translate(&locale.0, code, &[]), Some(Value::Object(details)))
            }
            AppError::NotFound(recurso) => (
                store.translate(&locale.0, code, &[]),
                Some(json!({ "redirect": recurso.redirect() })),
            ),
            AppError::Forbidden(capacidad) => (
                store.translate(&locale.0, code, &[]),
                Some(json!({ "capacidad": capacidad })),
            ),
            AppError::Workflow(w) => {
                let message = store.translate(&locale.0, code, &w.params());
                let details = w.campo().map(|campo| {
                    let mut fields = serde_json::Map::new();
                    fields.insert(campo.to_string(), json!([message.clone()]));
                    Value::Object(fields)
                });
                (message, details)
            }
            AppError::TemplateNotFound(nombre) => (
                store.translate(&locale.0, code, &[("plantilla", nombre.clone())]),
                None,
            ),
            AppError::SessionExpired => (
                store.translate(&locale.0, code, &[]),
                Some(json!({ "reload": true })),
            ),
            e if status == StatusCode::INTERNAL_SERVER_ERROR => {
                // O detalhe fica no log, nunca na resposta.
                tracing::error!("Error interno del servidor: {:?}", e);
                (store.translate(&locale.0, code, &[]), None)
            }
            _ => (store.translate(&locale.0, code, &[]), None),
        };

        ApiError { status, error, details }
    }
}

/// Atalho para extratores, que rejeitam antes de o handler ter o Locale em mãos.
pub fn validation_error(field: &'static str, code: &'static str) -> AppError {
    let mut errors = validator::ValidationErrors::new();
    let mut err = validator::ValidationError::new(code);
    err.message = Some(code.into());
    errors.add(field, err);
    AppError::ValidationError(errors)
}
