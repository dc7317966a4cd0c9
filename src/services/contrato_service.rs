// src/services/contrato_service.rs

use chrono::Utc;
use sqlx::PgPool;

use crate::{
    common::{
        db_utils::{ensure_version_matched, format_folio, PREFIJO_CONTRATO},
        error::{validation_error, AppError, Recurso},
    },
    db::{ClienteRepository, ContratoRepository, DesarrolloRepository, SolicitudRepository},
    models::{
        contrato::{
            ArchiveContratoPayload, CancelContratoPayload, Contrato, ContratoEstatus, ContratoSnapshot,
            CreateContratoPayload, UpdateContratoPayload,
        },
        solicitud::SolicitudEstado,
    },
};

#[derive(Clone)]
pub struct ContratoService {
    repo: ContratoRepository,
    cliente_repo: ClienteRepository,
    desarrollo_repo: DesarrolloRepository,
    solicitud_repo: SolicitudRepository,
}

/// Recusa mudanças num contrato cancelado ou lido numa versão antiga.
fn ensure_mutable(contrato: &Contrato, version: i32) -> Result<(), AppError> {
    if contrato.is_cancelado() {
        return Err(AppError::ContratoCancelado);
    }
    if contrato.version != version {
        return Err(AppError::VersionConflict);
    }
    Ok(())
}

impl ContratoService {
    pub fn new(
        repo: ContratoRepository,
        cliente_repo: ClienteRepository,
        desarrollo_repo: DesarrolloRepository,
        solicitud_repo: SolicitudRepository,
    ) -> Self {
        Self { repo, cliente_repo, desarrollo_repo, solicitud_repo }
    }

    /// Cria o contrato (manual ou a partir de uma solicitação aprovada).
    /// Cliente, lote, contrato e vínculo da solicitação vão na mesma transação.
    pub async fn create(&self, pool: &PgPool, payload: CreateContratoPayload) -> Result<Contrato, AppError> {
        let now = Utc::now();
        let mut tx = pool.begin().await?;

        // 1. Solicitação de origem (travada até o commit)
        if let Some(solicitud_id) = payload.solicitud_origen_id {
            let solicitud = self
                .solicitud_repo
                .find_for_update(&mut *tx, solicitud_id)
                .await?
                .ok_or(AppError::NotFound(Recurso::Solicitud))?;
            if solicitud.estado != SolicitudEstado::Aprobada || solicitud.contrato_id.is_some() {
                return Err(AppError::SolicitudNoConvertible);
            }
        }

        // 2. Cliente: existente ou novo
        let cliente = match (payload.cliente_id, payload.cliente) {
            (Some(cliente_id), _) => self
                .cliente_repo
                .find_by_id(&mut *tx, cliente_id)
                .await?
                .ok_or(AppError::NotFound(Recurso::Cliente))?,
            (None, Some(input)) => self.cliente_repo.create(&mut *tx, &input.normalized()).await?,
            (None, None) => return Err(validation_error("cliente", "cliente_requerido")),
        };

        // 3. Consome um lote do desarrollo
        let desarrollo = match self.desarrollo_repo.take_lote(&mut *tx, payload.desarrollo_id).await? {
            Some(d) => d,
            None => {
                return match self.desarrollo_repo.find_by_id(&mut *tx, payload.desarrollo_id).await? {
                    Some(_) => Err(AppError::SinLotesDisponibles),
                    None => Err(AppError::NotFound(Recurso::Desarrollo)),
                };
            }
        };

        // 4. Contrato com o snapshot congelado
        let snapshot = ContratoSnapshot::capture(&cliente, &desarrollo, payload.terminos, now);
        let id = self.repo.next_id(&mut *tx).await?;
        let folio = format_folio(PREFIJO_CONTRATO, now, id);
        let contrato = self
            .repo
            .create(&mut *tx, id, &folio, cliente.id, desarrollo.id, &snapshot, payload.solicitud_origen_id)
            .await?;

        // 5. Vincula a solicitação
        if let Some(solicitud_id) = payload.solicitud_origen_id {
            self.solicitud_repo
                .link_contrato(&mut *tx, solicitud_id, contrato.id)
                .await?
                .ok_or(AppError::SolicitudNoConvertible)?;
        }

        tx.commit().await?;

        tracing::info!(
            contrato_id = contrato.id,
            folio = %contrato.folio,
            cliente_id = cliente.id,
            desarrollo_id = desarrollo.id,
            lotes_disponibles = desarrollo.lotes_disponibles,
            solicitud_origen_id = ?payload.solicitud_origen_id,
            "contrato creado"
        );
        Ok(contrato)
    }

    pub async fn get(&self, pool: &PgPool, id: i64) -> Result<Contrato, AppError> {
        self.repo
            .find_by_id(pool, id)
            .await?
            .ok_or(AppError::NotFound(Recurso::Contrato))
    }

    pub async fn list(&self) -> Result<Vec<Contrato>, AppError> {
        self.repo.list().await
    }

    /// Novos termos = snapshot novo inteiro.
    pub async fn update_terminos(&self, pool: &PgPool, id: i64, payload: UpdateContratoPayload) -> Result<Contrato, AppError> {
        let mut tx = pool.begin().await?;

        let current = self
            .repo
            .find_for_update(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound(Recurso::Contrato))?;
        ensure_mutable(&current, payload.version)?;

        let snapshot = current.datta_contrato.0.with_terminos(payload.terminos, Utc::now());
        let updated = ensure_version_matched(self.repo.replace_snapshot(&mut *tx, id, payload.version, &snapshot).await?)?;
        tx.commit().await?;

        tracing::info!(contrato_id = id, version = updated.version, "términos de contrato actualizados");
        Ok(updated)
    }

    /// Arquivar e reativar. Cancelado não volta.
    pub async fn archive(&self, pool: &PgPool, id: i64, payload: ArchiveContratoPayload) -> Result<Contrato, AppError> {
        let mut tx = pool.begin().await?;

        let current = self
            .repo
            .find_for_update(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound(Recurso::Contrato))?;
        ensure_mutable(&current, payload.version)?;

        let estatus = if payload.archivar { ContratoEstatus::Archivado } else { ContratoEstatus::Activo };
        let updated = ensure_version_matched(self.repo.set_estatus(&mut *tx, id, payload.version, estatus).await?)?;
        tx.commit().await?;

        tracing::info!(contrato_id = id, estatus = ?estatus, "estatus de contrato");
        Ok(updated)
    }

    /// Cancela e devolve o lote ao desarrollo.
    pub async fn cancel(&self, pool: &PgPool, id: i64, payload: CancelContratoPayload) -> Result<Contrato, AppError> {
        let motivo = payload.motivo.trim();
        if motivo.chars().count() < 5 {
            return Err(validation_error("motivo", "motivo_corto"));
        }

        let mut tx = pool.begin().await?;

        let current = self
            .repo
            .find_for_update(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound(Recurso::Contrato))?;
        ensure_mutable(&current, payload.version)?;

        let cancelado =
            ensure_version_matched(self.repo.cancel(&mut *tx, id, payload.version, motivo, Utc::now()).await?)?;
        self.desarrollo_repo.return_lote(&mut *tx, current.desarrollo_id).await?;
        tx.commit().await?;

        tracing::info!(contrato_id = id, desarrollo_id = current.desarrollo_id, "contrato cancelado");
        Ok(cancelado)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::contrato::{ClienteSnapshot, DesarrolloSnapshot, TerminosContrato};
    use chrono::TimeZone;
    use sqlx::types::Json;

    fn contrato(estatus: ContratoEstatus, version: i32) -> Contrato {
        let t = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
        Contrato {
            id: 7,
            cliente_id: 1,
            desarrollo_id: 3,
            folio: "CTR-2026-00007".into(),
            datta_contrato: Json(ContratoSnapshot {
                cliente: ClienteSnapshot {
                    nombre: "Juan Pérez López".into(),
                    nacionalidad: None,
                    rfc: None,
                    curp: None,
                    ine: None,
                    estado_civil: None,
                    ocupacion: None,
                    telefono: None,
                    domicilio: None,
                    email: None,
                    beneficiario: None,
                },
                desarrollo: DesarrolloSnapshot {
                    nombre: "Residencial Los Álamos".into(),
                    tipo_contrato: "Compraventa".into(),
                    plantilla: "compraventa".into(),
                    ubicacion: None,
                    clave_catastral: None,
                    precio_m2: None,
                },
                terminos: TerminosContrato::default(),
                capturado_en: t,
            }),
            estatus,
            solicitud_origen_id: None,
            motivo_cancelacion: None,
            fecha_cancelacion: None,
            version,
            created_at: t,
            updated_at: t,
        }
    }

    #[test]
    fn cancelled_contract_is_immutable() {
        let c = contrato(ContratoEstatus::Cancelado, 3);
        assert!(matches!(ensure_mutable(&c, 3), Err(AppError::ContratoCancelado)));
    }

    #[test]
    fn stale_version_conflicts() {
        let c = contrato(ContratoEstatus::Activo, 3);
        assert!(matches!(ensure_mutable(&c, 2), Err(AppError::VersionConflict)));
        assert!(ensure_mutable(&c, 3).is_ok());
        assert!(ensure_mutable(&contrato(ContratoEstatus::Archivado, 1), 1).is_ok());
    }
}
