// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::grid::MenuItem;
use crate::services::{permissions::Capabilities, solicitud_workflow::Actor};

/// Papéis do sistema, do menor para o maior.
/// O valor textual é o mesmo guardado na coluna `usuarios.permission`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Moderator,
    Senior,
    Owner,
    Admin,
}

impl Role {
    pub const ALL: [Role; 5] = [Role::User, Role::Moderator, Role::Senior, Role::Owner, Role::Admin];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Moderator => "moderator",
            Role::Senior => "senior",
            Role::Owner => "owner",
            Role::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Role> {
        match value.trim().to_ascii_lowercase().as_str() {
            "user" => Some(Role::User),
            "moderator" => Some(Role::Moderator),
            "senior" => Some(Role::Senior),
            "owner" => Some(Role::Owner),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

// Usuário vindo do banco
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Usuario {
    #[schema(example = 42)]
    pub id: i64,
    #[schema(example = "Ana Torres")]
    pub nombre: String,
    #[schema(example = "ana@grupoargus.mx")]
    pub email: String,

    #[serde(skip_serializing)]
    pub password_hash: String,

    // Texto livre no banco; classificado por services::permissions
    #[schema(example = "moderator")]
    pub permission: String,
    pub activo: bool,
    pub notificaciones_activas: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(email(message = "email_invalido"))]
    #[schema(example = "ana@grupoargus.mx")]
    pub email: String,
    #[validate(length(min = 1, message = "required"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    /// Deve ser reenviado no cabeçalho X-CSRF-Token em toda requisição que altera dados.
    pub csrf_token: String,
    pub expires_at: DateTime<Utc>,
}

// Claims do token de sessão
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub role: String,
    pub csrf: String,
    pub notificaciones: bool,
    pub exp: usize,
    pub iat: usize,
}

/// Principal da requisição, montado a partir do token e do usuário atual no banco.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: i64,
    pub nombre: String,
    pub email: String,
    /// Papel como está gravado; o que ele permite vem em `capabilities`.
    pub permission: String,
    pub capabilities: Capabilities,
    pub notificaciones: bool,
    #[serde(skip_serializing)]
    pub csrf: String,
}

impl Session {
    pub fn actor(&self) -> Actor {
        Actor { id: self.user_id, caps: self.capabilities }
    }
}

/// Resposta de GET /api/me.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub session: Session,
    pub menu: Vec<MenuItem>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUsuarioPayload {
    #[validate(length(min = 1, message = "required"))]
    pub nombre: String,
    #[validate(email(message = "email_invalido"))]
    pub email: String,
    #[validate(length(min = 8, message = "password_corto"))]
    pub password: String,
    #[schema(example = "user")]
    pub permission: Role,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUsuarioPayload {
    pub permission: Option<Role>,
    pub activo: Option<bool>,
    pub notificaciones_activas: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parse_is_case_insensitive_and_round_trips() {
        for role in Role::ALL {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse(" Admin "), Some(Role::Admin));
        assert_eq!(Role::parse("superuser"), None);
    }
}
