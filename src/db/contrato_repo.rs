// src/db/contrato_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{types::Json, Executor, PgPool, Postgres};

use crate::{
    common::{db_utils::map_unique, error::AppError},
    models::contrato::{Contrato, ContratoEstatus, ContratoSnapshot},
};

#[derive(Clone)]
pub struct ContratoRepository {
    pool: PgPool,
}

impl ContratoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn next_id<'e, E>(&self, executor: E) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id: i64 = sqlx::query_scalar("SELECT nextval(pg_get_serial_sequence('contratos', 'id'))")
            .fetch_one(executor)
            .await?;
        Ok(id)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create<'e, E>(
        &self,
        executor: E,
        id: i64,
        folio: &str,
        cliente_id: i64,
        desarrollo_id: i64,
        snapshot: &ContratoSnapshot,
        solicitud_origen_id: Option<i64>,
    ) -> Result<Contrato, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Contrato>(
            r#"
            INSERT INTO contratos (id, folio, cliente_id, desarrollo_id, datta_contrato, estatus, solicitud_origen_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(folio)
        .bind(cliente_id)
        .bind(desarrollo_id)
        .bind(Json(snapshot))
        .bind(ContratoEstatus::Activo)
        .bind(solicitud_origen_id)
        .fetch_one(executor)
        .await
        // índice único em solicitud_origen_id: uma solicitação vira no máximo um contrato
        .map_err(|e| map_unique(e, "La solicitud ya tiene un contrato."))
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i64) -> Result<Option<Contrato>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let contrato = sqlx::query_as::<_, Contrato>("SELECT * FROM contratos WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(contrato)
    }

    pub async fn find_for_update<'e, E>(&self, executor: E, id: i64) -> Result<Option<Contrato>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let contrato = sqlx::query_as::<_, Contrato>("SELECT * FROM contratos WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(contrato)
    }

    pub async fn list(&self) -> Result<Vec<Contrato>, AppError> {
        let contratos = sqlx::query_as::<_, Contrato>("SELECT * FROM contratos ORDER BY created_at DESC, id DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(contratos)
    }

    /// Troca o snapshot inteiro. Nunca toca num contrato cancelado.
    pub async fn replace_snapshot<'e, E>(
        &self,
        executor: E,
        id: i64,
        version: i32,
        snapshot: &ContratoSnapshot,
    ) -> Result<Option<Contrato>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let contrato = sqlx::query_as::<_, Contrato>(
            r#"
            UPDATE contratos SET datta_contrato = $3, version = version + 1, updated_at = NOW()
            WHERE id = $1 AND version = $2 AND estatus <> $4
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(version)
        .bind(Json(snapshot))
        .bind(ContratoEstatus::Cancelado)
        .fetch_optional(executor)
        .await?;
        Ok(contrato)
    }

    /// Arquivar / reativar.
    pub async fn set_estatus<'e, E>(
        &self,
        executor: E,
        id: i64,
        version: i32,
        estatus: ContratoEstatus,
    ) -> Result<Option<Contrato>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let contrato = sqlx::query_as::<_, Contrato>(
            r#"
            UPDATE contratos SET estatus = $3, version = version + 1, updated_at = NOW()
            WHERE id = $1 AND version = $2 AND estatus <> $4
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(version)
        .bind(estatus)
        .bind(ContratoEstatus::Cancelado)
        .fetch_optional(executor)
        .await?;
        Ok(contrato)
    }

    pub async fn cancel<'e, E>(
        &self,
        executor: E,
        id: i64,
        version: i32,
        motivo: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Contrato>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let contrato = sqlx::query_as::<_, Contrato>(
            r#"
            UPDATE contratos SET
                estatus = $3, motivo_cancelacion = $4, fecha_cancelacion = $5,
                version = version + 1, updated_at = $5
            WHERE id = $1 AND version = $2 AND estatus <> $3
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(version)
        .bind(ContratoEstatus::Cancelado)
        .bind(motivo)
        .bind(now)
        .fetch_optional(executor)
        .await?;
        Ok(contrato)
    }
}
