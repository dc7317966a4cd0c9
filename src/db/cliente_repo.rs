// src/db/cliente_repo.rs

use async_trait::async_trait;
use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::cliente::{Cliente, ClienteEstado, ClienteInput},
    services::client_matching::ClienteLookup,
};

#[derive(Clone)]
pub struct ClienteRepository {
    pool: PgPool,
}

impl ClienteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(&self, executor: E, input: &ClienteInput) -> Result<Cliente, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let cliente = sqlx::query_as::<_, Cliente>(
            r#"
            INSERT INTO clientes (
                nombre, nacionalidad, rfc, curp, ine, estado_civil, ocupacion,
                telefono, domicilio, email, beneficiario, estado
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(input.nombre.as_str())
        .bind(input.nacionalidad.as_deref())
        .bind(input.rfc.as_deref())
        .bind(input.curp.as_deref())
        .bind(input.ine.as_deref())
        .bind(input.estado_civil.as_deref())
        .bind(input.ocupacion.as_deref())
        .bind(input.telefono.as_deref())
        .bind(input.domicilio.as_deref())
        .bind(input.email.as_deref())
        .bind(input.beneficiario.as_deref())
        .bind(ClienteEstado::Activo)
        .fetch_one(executor)
        .await?;
        Ok(cliente)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i64) -> Result<Option<Cliente>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let cliente = sqlx::query_as::<_, Cliente>("SELECT * FROM clientes WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(cliente)
    }

    pub async fn list<'e, E>(&self, executor: E) -> Result<Vec<Cliente>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let clientes = sqlx::query_as::<_, Cliente>("SELECT * FROM clientes ORDER BY nombre, id")
            .fetch_all(executor)
            .await?;
        Ok(clientes)
    }

    pub async fn update<'e, E>(&self, executor: E, id: i64, input: &ClienteInput) -> Result<Option<Cliente>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let cliente = sqlx::query_as::<_, Cliente>(
            r#"
            UPDATE clientes SET
                nombre = $2, nacionalidad = $3, rfc = $4, curp = $5, ine = $6,
                estado_civil = $7, ocupacion = $8, telefono = $9, domicilio = $10,
                email = $11, beneficiario = $12, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.nombre.as_str())
        .bind(input.nacionalidad.as_deref())
        .bind(input.rfc.as_deref())
        .bind(input.curp.as_deref())
        .bind(input.ine.as_deref())
        .bind(input.estado_civil.as_deref())
        .bind(input.ocupacion.as_deref())
        .bind(input.telefono.as_deref())
        .bind(input.domicilio.as_deref())
        .bind(input.email.as_deref())
        .bind(input.beneficiario.as_deref())
        .fetch_optional(executor)
        .await?;
        Ok(cliente)
    }

    pub async fn set_estado<'e, E>(&self, executor: E, id: i64, estado: ClienteEstado) -> Result<Option<Cliente>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let cliente = sqlx::query_as::<_, Cliente>(
            "UPDATE clientes SET estado = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(estado)
        .fetch_optional(executor)
        .await?;
        Ok(cliente)
    }
}

#[async_trait]
impl ClienteLookup for ClienteRepository {
    async fn find_by_rfc_or_curp(&self, rfc: Option<&str>, curp: Option<&str>) -> Result<Vec<Cliente>, AppError> {
        // Comparação sem diferenciar maiúsculas; a escolha final fica com select_match.
        let clientes = sqlx::query_as::<_, Cliente>(
            r#"
            SELECT * FROM clientes
            WHERE ($1::TEXT IS NOT NULL AND upper(trim(rfc)) = upper($1))
               OR ($2::TEXT IS NOT NULL AND upper(trim(curp)) = upper($2))
            ORDER BY id
            "#,
        )
        .bind(rfc)
        .bind(curp)
        .fetch_all(&self.pool)
        .await?;
        Ok(clientes)
    }
}
