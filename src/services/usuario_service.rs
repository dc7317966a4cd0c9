// src/services/usuario_service.rs

use sqlx::PgPool;

use crate::{
    common::error::{AppError, Recurso},
    db::UsuarioRepository,
    models::auth::{CreateUsuarioPayload, Role, UpdateUsuarioPayload, Usuario},
    services::auth::hash_password,
};

#[derive(Clone)]
pub struct UsuarioService {
    repo: UsuarioRepository,
}

impl UsuarioService {
    pub fn new(repo: UsuarioRepository) -> Self {
        Self { repo }
    }

    /// Banco vazio: cria o primeiro admin com as credenciais do ambiente.
    /// Devolve `None` quando já existe algum usuário.
    pub async fn ensure_admin(&self, pool: &PgPool, email: &str, password: &str) -> Result<Option<Usuario>, AppError> {
        if self.repo.count(pool).await? > 0 {
            return Ok(None);
        }
        let hashed = hash_password(password).await?;
        let usuario = self.repo.create(pool, "Administrador", email, &hashed, Role::Admin).await?;
        tracing::warn!(usuario_id = usuario.id, email = %usuario.email, "usuario administrador inicial creado");
        Ok(Some(usuario))
    }

    pub async fn list(&self, pool: &PgPool) -> Result<Vec<Usuario>, AppError> {
        self.repo.list(pool).await
    }

    pub async fn create(&self, pool: &PgPool, payload: CreateUsuarioPayload) -> Result<Usuario, AppError> {
        let hashed = hash_password(&payload.password).await?;
        let usuario = self
            .repo
            .create(pool, &payload.nombre, &payload.email, &hashed, payload.permission)
            .await?;
        tracing::info!(usuario_id = usuario.id, permission = %usuario.permission, "usuario creado");
        Ok(usuario)
    }

    /// Papel, ativo e notificações. Ninguém rebaixa ou desativa a si mesmo.
    pub async fn update(
        &self,
        pool: &PgPool,
        actor_id: i64,
        id: i64,
        payload: UpdateUsuarioPayload,
    ) -> Result<Usuario, AppError> {
        if id == actor_id && (payload.permission.is_some() || payload.activo == Some(false)) {
            return Err(AppError::Forbidden("usuarios"));
        }

        let usuario = self
            .repo
            .update(pool, id, payload.permission, payload.activo, payload.notificaciones_activas)
            .await?
            .ok_or(AppError::NotFound(Recurso::Usuario))?;

        tracing::info!(usuario_id = id, actor_id, permission = %usuario.permission, activo = usuario.activo, "usuario actualizado");
        Ok(usuario)
    }
}
