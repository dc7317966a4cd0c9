// src/db/usuario_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::{db_utils::map_unique, error::AppError},
    models::auth::{Role, Usuario},
};

// Responsável por todas as interações com a tabela 'usuarios'
#[derive(Clone)]
pub struct UsuarioRepository {
    pool: PgPool,
}

impl UsuarioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um usuário pelo e-mail (login)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Usuario>, AppError> {
        let usuario = sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios WHERE lower(email) = lower($1)")
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await?;
        Ok(usuario)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i64) -> Result<Option<Usuario>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let usuario = sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(usuario)
    }

    pub async fn list<'e, E>(&self, executor: E) -> Result<Vec<Usuario>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let usuarios = sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios ORDER BY nombre, id")
            .fetch_all(executor)
            .await?;
        Ok(usuarios)
    }

    pub async fn count<'e, E>(&self, executor: E) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM usuarios")
            .fetch_one(executor)
            .await?;
        Ok(total)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        nombre: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<Usuario, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Usuario>(
            r#"
            INSERT INTO usuarios (nombre, email, password_hash, permission)
            VALUES ($1, lower($2), $3, $4)
            RETURNING *
            "#,
        )
        .bind(nombre.trim())
        .bind(email.trim())
        .bind(password_hash)
        .bind(role.as_str())
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique(e, format!("El correo '{}' ya está registrado.", email)))
    }

    /// Campos ausentes ficam como estão.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: i64,
        role: Option<Role>,
        activo: Option<bool>,
        notificaciones_activas: Option<bool>,
    ) -> Result<Option<Usuario>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let usuario = sqlx::query_as::<_, Usuario>(
            r#"
            UPDATE usuarios SET
                permission = COALESCE($2, permission),
                activo = COALESCE($3, activo),
                notificaciones_activas = COALESCE($4, notificaciones_activas),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(role.map(Role::as_str))
        .bind(activo)
        .bind(notificaciones_activas)
        .fetch_optional(executor)
        .await?;
        Ok(usuario)
    }
}
