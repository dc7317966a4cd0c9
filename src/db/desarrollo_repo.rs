// src/db/desarrollo_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::{db_utils::map_unique, error::AppError},
    models::desarrollo::{Desarrollo, DesarrolloInput},
};

#[derive(Clone)]
pub struct DesarrolloRepository {
    pool: PgPool,
}

impl DesarrolloRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(&self, executor: E, input: &DesarrolloInput) -> Result<Desarrollo, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Desarrollo>(
            r#"
            INSERT INTO desarrollos (
                nombre, tipo_contrato, plantilla, ubicacion, clave_catastral,
                lotes_totales, lotes_disponibles, precio_m2, activo
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(input.nombre.trim())
        .bind(input.tipo_contrato.trim())
        .bind(input.plantilla.as_str())
        .bind(input.ubicacion.as_deref())
        .bind(input.clave_catastral.as_deref())
        .bind(input.lotes_totales)
        .bind(input.lotes_disponibles)
        .bind(input.precio_m2)
        .bind(input.activo)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique(e, format!("El desarrollo '{}' ya existe.", input.nombre)))
    }

    /// Todos os desarrollos; usado também como catálogo do prefill.
    pub async fn list(&self) -> Result<Vec<Desarrollo>, AppError> {
        let desarrollos = sqlx::query_as::<_, Desarrollo>("SELECT * FROM desarrollos ORDER BY nombre, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(desarrollos)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i64) -> Result<Option<Desarrollo>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let desarrollo = sqlx::query_as::<_, Desarrollo>("SELECT * FROM desarrollos WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(desarrollo)
    }

    pub async fn update<'e, E>(&self, executor: E, id: i64, input: &DesarrolloInput) -> Result<Option<Desarrollo>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Desarrollo>(
            r#"
            UPDATE desarrollos SET
                nombre = $2, tipo_contrato = $3, plantilla = $4, ubicacion = $5,
                clave_catastral = $6, lotes_totales = $7, lotes_disponibles = $8,
                precio_m2 = $9, activo = $10, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.nombre.trim())
        .bind(input.tipo_contrato.trim())
        .bind(input.plantilla.as_str())
        .bind(input.ubicacion.as_deref())
        .bind(input.clave_catastral.as_deref())
        .bind(input.lotes_totales)
        .bind(input.lotes_disponibles)
        .bind(input.precio_m2)
        .bind(input.activo)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_unique(e, format!("El desarrollo '{}' ya existe.", input.nombre)))
    }

    /// Consome um lote. `None` quando não há lote disponível (ou o desarrollo não existe).
    pub async fn take_lote<'e, E>(&self, executor: E, id: i64) -> Result<Option<Desarrollo>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let desarrollo = sqlx::query_as::<_, Desarrollo>(
            r#"
            UPDATE desarrollos SET lotes_disponibles = lotes_disponibles - 1, updated_at = NOW()
            WHERE id = $1 AND lotes_disponibles > 0
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(desarrollo)
    }

    /// Devolve um lote ao estoque, sem passar do total.
    pub async fn return_lote<'e, E>(&self, executor: E, id: i64) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE desarrollos SET
                lotes_disponibles = LEAST(lotes_disponibles + 1, lotes_totales),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(executor)
        .await?;
        Ok(())
    }
}
