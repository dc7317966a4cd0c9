// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UsuarioRepository,
    models::auth::{AuthResponse, Claims, Session, Usuario},
    services::permissions::capabilities,
};

#[derive(Clone)]
pub struct AuthService {
    usuario_repo: UsuarioRepository,
    jwt_secret: String,
    session_hours: i64,
}

/// Gera o hash bcrypt fora do runtime assíncrono.
pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password_clone = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

fn issue_token(secret: &str, usuario: &Usuario, hours: i64, now: DateTime<Utc>) -> Result<AuthResponse, AppError> {
    let expires_at = now + Duration::hours(hours);
    let csrf_token = Uuid::new_v4().to_string();

    let claims = Claims {
        sub: usuario.id,
        role: usuario.permission.clone(),
        csrf: csrf_token.clone(),
        notificaciones: usuario.notificaciones_activas,
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?;

    Ok(AuthResponse { token, csrf_token, expires_at })
}

/// Assinatura ou validade ruins viram "sessão expirada".
fn decode_claims(secret: &str, token: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!("token rejeitado: {}", e);
        AppError::SessionExpired
    })
}

impl AuthService {
    pub fn new(usuario_repo: UsuarioRepository, jwt_secret: String, session_hours: i64) -> Self {
        Self { usuario_repo, jwt_secret, session_hours }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        let usuario = self
            .usuario_repo
            .find_by_email(email)
            .await?
            .filter(|u| u.activo)
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = usuario.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            tracing::info!(email = %email, "login recusado");
            return Err(AppError::InvalidCredentials);
        }

        tracing::info!(usuario_id = usuario.id, "login");
        issue_token(&self.jwt_secret, &usuario, self.session_hours, Utc::now())
    }

    /// Token válido + usuário ainda ativo. O papel vem do banco, não do token.
    pub async fn validate_token<'e, E>(&self, executor: E, token: &str) -> Result<Session, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let claims = decode_claims(&self.jwt_secret, token)?;

        let usuario = self
            .usuario_repo
            .find_by_id(executor, claims.sub)
            .await?
            .filter(|u| u.activo)
            .ok_or(AppError::SessionExpired)?;

        Ok(Session {
            user_id: usuario.id,
            capabilities: capabilities(&usuario.permission),
            nombre: usuario.nombre,
            email: usuario.email,
            permission: usuario.permission,
            notificaciones: usuario.notificaciones_activas,
            csrf: claims.csrf,
        })
    }

    pub fn session_hours(&self) -> i64 {
        self.session_hours
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "segredo-de-teste";

    fn usuario() -> Usuario {
        let t = Utc::now();
        Usuario {
            id: 42,
            nombre: "Ana Torres".into(),
            email: "ana@grupoargus.mx".into(),
            password_hash: String::new(),
            permission: "moderator".into(),
            activo: true,
            notificaciones_activas: true,
            created_at: t,
            updated_at: t,
        }
    }

    #[test]
    fn token_carries_identity_role_and_csrf() {
        let auth = issue_token(SECRET, &usuario(), 8, Utc::now()).unwrap();
        let claims = decode_claims(SECRET, &auth.token).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, "moderator");
        assert_eq!(claims.csrf, auth.csrf_token);
        assert!(Uuid::parse_str(&claims.csrf).is_ok());
    }

    #[test]
    fn every_login_gets_a_fresh_csrf_token() {
        let a = issue_token(SECRET, &usuario(), 8, Utc::now()).unwrap();
        let b = issue_token(SECRET, &usuario(), 8, Utc::now()).unwrap();
        assert_ne!(a.csrf_token, b.csrf_token);
    }

    #[test]
    fn expired_token_is_session_expired() {
        let issued = Utc::now() - Duration::hours(10);
        let auth = issue_token(SECRET, &usuario(), 1, issued).unwrap();
        assert!(matches!(decode_claims(SECRET, &auth.token), Err(AppError::SessionExpired)));
    }

    #[test]
    fn foreign_signature_is_session_expired() {
        let auth = issue_token("outro-segredo", &usuario(), 8, Utc::now()).unwrap();
        assert!(matches!(decode_claims(SECRET, &auth.token), Err(AppError::SessionExpired)));
        assert!(matches!(decode_claims(SECRET, "lixo"), Err(AppError::SessionExpired)));
    }

    #[tokio::test]
    async fn hashed_password_verifies() {
        let hashed = hash_password("s3nha-segura").await.unwrap();
        assert!(verify("s3nha-segura", &hashed).unwrap());
        assert!(!verify("errada", &hashed).unwrap());
    }
}
