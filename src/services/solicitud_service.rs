// src/services/solicitud_service.rs

use chrono::Utc;
use sqlx::PgPool;

use crate::{
    common::{
        db_utils::{ensure_version_matched, format_folio, PREFIJO_SOLICITUD},
        error::{AppError, Recurso},
    },
    db::{ClienteRepository, DesarrolloRepository, ParametrosRepository, SolicitudRepository},
    models::solicitud::{Solicitud, SolicitudEstado, SolicitudForm, SolicitudView, TransitionPayload, UpdateSolicitudPayload},
    services::{
        client_matching::find_matching_client,
        prefill::{build_prefill, PrefillCatalogs, PrefillResponse},
        solicitud_workflow::{self, can_view, check_editable, Actor},
    },
};

#[derive(Clone)]
pub struct SolicitudService {
    repo: SolicitudRepository,
    cliente_repo: ClienteRepository,
    desarrollo_repo: DesarrolloRepository,
    parametros_repo: ParametrosRepository,
}

impl SolicitudService {
    pub fn new(
        repo: SolicitudRepository,
        cliente_repo: ClienteRepository,
        desarrollo_repo: DesarrolloRepository,
        parametros_repo: ParametrosRepository,
    ) -> Self {
        Self { repo, cliente_repo, desarrollo_repo, parametros_repo }
    }

    fn view(solicitud: Solicitud, actor: &Actor) -> SolicitudView {
        SolicitudView {
            editable: check_editable(&solicitud, actor).is_ok(),
            aviso_retorno: solicitud.aviso_retorno(),
            solicitud,
        }
    }

    /// Nova solicitação em borrador; o dono é quem cria.
    pub async fn create(&self, pool: &PgPool, actor: &Actor, form: SolicitudForm) -> Result<SolicitudView, AppError> {
        let form = form.normalized();
        let mut tx = pool.begin().await?;

        let id = self.repo.next_id(&mut *tx).await?;
        let folio = format_folio(PREFIJO_SOLICITUD, Utc::now(), id);
        let solicitud = self.repo.create(&mut *tx, id, &folio, actor.id, &form).await?;

        tx.commit().await?;

        tracing::info!(solicitud_id = solicitud.id, folio = %solicitud.folio, usuario_id = actor.id, "solicitud creada");
        Ok(Self::view(solicitud, actor))
    }

    async fn load_visible(&self, pool: &PgPool, actor: &Actor, id: i64) -> Result<Solicitud, AppError> {
        let solicitud = self
            .repo
            .find_by_id(pool, id)
            .await?
            .ok_or(AppError::NotFound(Recurso::Solicitud))?;

        if !can_view(&solicitud, actor) {
            return Err(AppError::Forbidden("gestion"));
        }
        Ok(solicitud)
    }

    pub async fn get(&self, pool: &PgPool, actor: &Actor, id: i64) -> Result<SolicitudView, AppError> {
        let solicitud = self.load_visible(pool, actor, id).await?;
        Ok(Self::view(solicitud, actor))
    }

    /// Gestor vê todas; os demais só as próprias.
    pub async fn list(&self, actor: &Actor) -> Result<Vec<Solicitud>, AppError> {
        let owner = (!actor.caps.is_gestor).then_some(actor.id);
        self.repo.list(owner).await
    }

    pub async fn update(
        &self,
        pool: &PgPool,
        actor: &Actor,
        id: i64,
        payload: UpdateSolicitudPayload,
    ) -> Result<SolicitudView, AppError> {
        let form = payload.form.normalized();
        let mut tx = pool.begin().await?;

        let current = self
            .repo
            .find_for_update(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound(Recurso::Solicitud))?;

        check_editable(&current, actor)?;
        if current.version != payload.version {
            return Err(AppError::VersionConflict);
        }

        let updated = ensure_version_matched(self.repo.update_form(&mut *tx, id, payload.version, &form).await?)?;
        tx.commit().await?;

        tracing::info!(solicitud_id = id, usuario_id = actor.id, version = updated.version, "solicitud editada");
        Ok(Self::view(updated, actor))
    }

    /// Valida com a máquina de estados e grava com checagem de versão.
    pub async fn transition(
        &self,
        pool: &PgPool,
        actor: &Actor,
        id: i64,
        payload: TransitionPayload,
    ) -> Result<SolicitudView, AppError> {
        let mut tx = pool.begin().await?;

        let current = self
            .repo
            .find_for_update(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound(Recurso::Solicitud))?;

        if !can_view(&current, actor) {
            return Err(AppError::Forbidden("gestion"));
        }
        if payload.version.is_some_and(|v| v != current.version) {
            return Err(AppError::VersionConflict);
        }

        let next = solicitud_workflow::transition(
            &current,
            payload.nuevo_estado,
            actor,
            payload.motivo.as_deref(),
            Utc::now(),
        )?;

        let saved = ensure_version_matched(self.repo.save_transition(&mut *tx, &next, current.version).await?)?;
        tx.commit().await?;

        tracing::info!(
            solicitud_id = id,
            usuario_id = actor.id,
            desde = %current.estado,
            hacia = %saved.estado,
            "transición de solicitud"
        );
        Ok(Self::view(saved, actor))
    }

    /// Formulário de contrato pré-preenchido + cliente existente com o mesmo RFC/CURP.
    pub async fn prefill(&self, pool: &PgPool, actor: &Actor, id: i64) -> Result<PrefillResponse, AppError> {
        let solicitud = self.load_visible(pool, actor, id).await?;

        if solicitud.estado != SolicitudEstado::Aprobada || solicitud.contrato_id.is_some() {
            return Err(AppError::SolicitudNoConvertible);
        }

        let catalogs = PrefillCatalogs {
            desarrollos: self.desarrollo_repo.list().await?,
            nacionalidades: self.parametros_repo.nacionalidades().await?,
        };
        let prefill = build_prefill(&solicitud, &catalogs);

        let coincidencia =
            find_matching_client(&self.cliente_repo, solicitud.rfc.as_deref(), solicitud.curp.as_deref()).await?;

        Ok(PrefillResponse {
            prefill,
            cliente_id: coincidencia.as_ref().map(|m| m.cliente.id),
            coincidencia,
        })
    }
}
