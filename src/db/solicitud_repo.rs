// src/db/solicitud_repo.rs

use sqlx::{postgres::PgArguments, query::QueryAs, Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::solicitud::{Solicitud, SolicitudEstado, SolicitudForm},
};

#[derive(Clone)]
pub struct SolicitudRepository {
    pool: PgPool,
}

// Colunas do formulário, na ordem em que `bind_form` as preenche.
const FORM_COLUMNS: &str = "nacionalidad_id, nombre_completo, fecha_nacimiento, lugar_nacimiento, \
    estado_civil, ocupacion, celular, telefono, email, domicilio, curp, rfc, ine, beneficiario, \
    parentesco_beneficiario, dice_ser, albacea_activo, albacea_nombre, albacea_celular, \
    albacea_parentesco, desarrollo_id, lote, manzana, superficie, precio_total, enganche, saldo, \
    plazo_meses, mensualidad, fecha_firma, observaciones";

const FORM_LEN: usize = 31;

fn bind_form<'q>(
    query: QueryAs<'q, Postgres, Solicitud, PgArguments>,
    f: &'q SolicitudForm,
) -> QueryAs<'q, Postgres, Solicitud, PgArguments> {
    query
        .bind(f.nacionalidad_id)
        .bind(f.nombre_completo.as_str())
        .bind(f.fecha_nacimiento)
        .bind(f.lugar_nacimiento.as_deref())
        .bind(f.estado_civil.as_deref())
        .bind(f.ocupacion.as_deref())
        .bind(f.celular.as_deref())
        .bind(f.telefono.as_deref())
        .bind(f.email.as_deref())
        .bind(f.domicilio.as_deref())
        .bind(f.curp.as_deref())
        .bind(f.rfc.as_deref())
        .bind(f.ine.as_deref())
        .bind(f.beneficiario.as_deref())
        .bind(f.parentesco_beneficiario.as_deref())
        .bind(f.dice_ser.as_deref())
        .bind(f.albacea_activo)
        .bind(f.albacea_nombre.as_deref())
        .bind(f.albacea_celular.as_deref())
        .bind(f.albacea_parentesco.as_deref())
        .bind(f.desarrollo_id)
        .bind(f.lote.as_deref())
        .bind(f.manzana.as_deref())
        .bind(f.superficie)
        .bind(f.precio_total)
        .bind(f.enganche)
        .bind(f.saldo)
        .bind(f.plazo_meses)
        .bind(f.mensualidad)
        .bind(f.fecha_firma)
        .bind(f.observaciones.as_deref())
}

/// `$first, $first+1, ...` para as colunas do formulário.
fn placeholders(first: usize) -> String {
    (first..first + FORM_LEN)
        .map(|n| format!("${}", n))
        .collect::<Vec<_>>()
        .join(", ")
}

fn assignments(first: usize) -> String {
    FORM_COLUMNS
        .split(',')
        .map(str::trim)
        .zip(first..)
        .map(|(col, n)| format!("{} = ${}", col, n))
        .collect::<Vec<_>>()
        .join(", ")
}

impl SolicitudRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Reserva o próximo id para montar o folio antes do INSERT.
    pub async fn next_id<'e, E>(&self, executor: E) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id: i64 = sqlx::query_scalar("SELECT nextval(pg_get_serial_sequence('solicitudes', 'id'))")
            .fetch_one(executor)
            .await?;
        Ok(id)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        id: i64,
        folio: &str,
        usuario_id: i64,
        form: &SolicitudForm,
    ) -> Result<Solicitud, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "INSERT INTO solicitudes (id, folio, usuario_id, estado, {}) VALUES ($1, $2, $3, 'borrador', {}) RETURNING *",
            FORM_COLUMNS,
            placeholders(4)
        );
        let query = sqlx::query_as::<_, Solicitud>(&sql).bind(id).bind(folio).bind(usuario_id);
        let solicitud = bind_form(query, form).fetch_one(executor).await?;
        Ok(solicitud)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i64) -> Result<Option<Solicitud>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let solicitud = sqlx::query_as::<_, Solicitud>("SELECT * FROM solicitudes WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(solicitud)
    }

    /// Igual a `find_by_id`, travando a linha até o fim da transação.
    pub async fn find_for_update<'e, E>(&self, executor: E, id: i64) -> Result<Option<Solicitud>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let solicitud = sqlx::query_as::<_, Solicitud>("SELECT * FROM solicitudes WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(solicitud)
    }

    /// `usuario_id = None` lista todas (visão do gestor).
    pub async fn list(&self, usuario_id: Option<i64>) -> Result<Vec<Solicitud>, AppError> {
        let solicitudes = sqlx::query_as::<_, Solicitud>(
            r#"
            SELECT * FROM solicitudes
            WHERE ($1::BIGINT IS NULL OR usuario_id = $1)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(usuario_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(solicitudes)
    }

    /// Regrava o formulário. `None` quando a versão não bate.
    pub async fn update_form<'e, E>(
        &self,
        executor: E,
        id: i64,
        version: i32,
        form: &SolicitudForm,
    ) -> Result<Option<Solicitud>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "UPDATE solicitudes SET {}, version = version + 1, updated_at = NOW() \
             WHERE id = $1 AND version = $2 AND contrato_id IS NULL RETURNING *",
            assignments(3)
        );
        let query = sqlx::query_as::<_, Solicitud>(&sql).bind(id).bind(version);
        let solicitud = bind_form(query, form).fetch_optional(executor).await?;
        Ok(solicitud)
    }

    /// Grava o resultado de uma transição já validada.
    pub async fn save_transition<'e, E>(
        &self,
        executor: E,
        next: &Solicitud,
        version: i32,
    ) -> Result<Option<Solicitud>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let solicitud = sqlx::query_as::<_, Solicitud>(
            r#"
            UPDATE solicitudes SET
                estado = $3,
                motivo_retorno = $4,
                fecha_retorno = $5,
                motivo_cancelacion = $6,
                fecha_cancelacion = $7,
                fecha_envio = $8,
                fecha_aprobacion = $9,
                aprobado_por = $10,
                version = version + 1,
                updated_at = $11
            WHERE id = $1 AND version = $2
            RETURNING *
            "#,
        )
        .bind(next.id)
        .bind(version)
        .bind(next.estado)
        .bind(next.motivo_retorno.as_deref())
        .bind(next.fecha_retorno)
        .bind(next.motivo_cancelacion.as_deref())
        .bind(next.fecha_cancelacion)
        .bind(next.fecha_envio)
        .bind(next.fecha_aprobacion)
        .bind(next.aprobado_por)
        .bind(next.updated_at)
        .fetch_optional(executor)
        .await?;
        Ok(solicitud)
    }

    /// Vincula ao contrato. Só passa se ainda estiver aprovada e sem vínculo.
    pub async fn link_contrato<'e, E>(
        &self,
        executor: E,
        id: i64,
        contrato_id: i64,
    ) -> Result<Option<Solicitud>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let solicitud = sqlx::query_as::<_, Solicitud>(
            r#"
            UPDATE solicitudes SET contrato_id = $2, version = version + 1, updated_at = NOW()
            WHERE id = $1 AND estado = $3 AND contrato_id IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(contrato_id)
        .bind(SolicitudEstado::Aprobada)
        .fetch_optional(executor)
        .await?;
        Ok(solicitud)
    }
}
