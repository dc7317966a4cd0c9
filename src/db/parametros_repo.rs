// src/db/parametros_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::{
        cliente::Nacionalidad,
        parametros::{Parametros, UpdateParametrosRequest},
    },
};

/// Parâmetros da empresa (linha única) e catálogos fixos.
#[derive(Clone)]
pub struct ParametrosRepository {
    pool: PgPool,
}

impl ParametrosRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get<'e, E>(&self, executor: E) -> Result<Parametros, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let parametros = sqlx::query_as::<_, Parametros>(
            r#"
            SELECT empresa_nombre, representante_legal, empresa_domicilio, empresa_rfc,
                   ciudad_firma, updated_at
            FROM parametros WHERE id = 1
            "#,
        )
        .fetch_optional(executor)
        .await?;

        // Sem linha ainda: tudo vazio
        Ok(parametros.unwrap_or_default())
    }

    pub async fn upsert<'e, E>(&self, executor: E, input: &UpdateParametrosRequest) -> Result<Parametros, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let parametros = sqlx::query_as::<_, Parametros>(
            r#"
            INSERT INTO parametros (id, empresa_nombre, representante_legal, empresa_domicilio, empresa_rfc, ciudad_firma)
            VALUES (1, $1, $2, $3, $4, $5)
            ON CONFLICT (id)
            DO UPDATE SET
                empresa_nombre = EXCLUDED.empresa_nombre,
                representante_legal = EXCLUDED.representante_legal,
                empresa_domicilio = EXCLUDED.empresa_domicilio,
                empresa_rfc = EXCLUDED.empresa_rfc,
                ciudad_firma = EXCLUDED.ciudad_firma,
                updated_at = NOW()
            RETURNING empresa_nombre, representante_legal, empresa_domicilio, empresa_rfc,
                      ciudad_firma, updated_at
            "#,
        )
        .bind(input.empresa_nombre.as_deref())
        .bind(input.representante_legal.as_deref())
        .bind(input.empresa_domicilio.as_deref())
        .bind(input.empresa_rfc.as_deref())
        .bind(input.ciudad_firma.as_deref())
        .fetch_one(executor)
        .await?;
        Ok(parametros)
    }

    pub async fn nacionalidades(&self) -> Result<Vec<Nacionalidad>, AppError> {
        let nacionalidades = sqlx::query_as::<_, Nacionalidad>("SELECT id, nombre FROM nacionalidades ORDER BY nombre")
            .fetch_all(&self.pool)
            .await?;
        Ok(nacionalidades)
    }
}
