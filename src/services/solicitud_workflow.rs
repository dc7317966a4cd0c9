// src/services/solicitud_workflow.rs
//
// Regras de transição da solicitação. Tudo aqui é puro: recebe o registro
// atual e devolve o registro novo (ou o motivo da recusa). Quem grava é o
// SolicitudService, com checagem de versão.

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{
    auth::Role,
    solicitud::{Solicitud, SolicitudEstado},
};
use crate::services::permissions::{capabilities_for, Capabilities};

/// Tamanho mínimo do motivo de retorno e de cancelamento.
pub const MIN_MOTIVO: usize = 5;

/// Estados que podem ser pedidos como destino.
pub const DESTINOS: [SolicitudEstado; 5] = [
    SolicitudEstado::Borrador,
    SolicitudEstado::Enviada,
    SolicitudEstado::EnRevision,
    SolicitudEstado::Aprobada,
    SolicitudEstado::Cancelada,
];

/// Quem está agindo: id do usuário e o que o papel dele permite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: i64,
    pub caps: Capabilities,
}

impl Actor {
    pub fn new(id: i64, role: Role) -> Self {
        Self { id, caps: capabilities_for(role) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("la solicitud está vinculada al contrato {0}")]
    VinculadaAContrato(i64),

    #[error("sin permiso para {accion}")]
    SinPermiso { accion: &'static str },

    #[error("transición inválida de {desde} a {hacia}")]
    TransicionInvalida { desde: SolicitudEstado, hacia: SolicitudEstado },

    #[error("motivo requerido en {campo}")]
    MotivoRequerido { campo: &'static str, minimo: usize },

    #[error("no editable en estado {0}")]
    NoEditable(SolicitudEstado),

    #[error("{0} no es un estado destino")]
    EstadoNoPermitido(SolicitudEstado),
}

impl WorkflowError {
    pub fn code(&self) -> &'static str {
        match self {
            WorkflowError::VinculadaAContrato(_) => "workflow.vinculada_contrato",
            WorkflowError::SinPermiso { .. } => "workflow.sin_permiso",
            WorkflowError::TransicionInvalida { .. } => "workflow.transicion_invalida",
            WorkflowError::MotivoRequerido { .. } => "workflow.motivo_requerido",
            WorkflowError::NoEditable(_) => "workflow.no_editable",
            WorkflowError::EstadoNoPermitido(_) => "workflow.estado_no_permitido",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            WorkflowError::SinPermiso { .. } => StatusCode::FORBIDDEN,
            WorkflowError::MotivoRequerido { .. } | WorkflowError::EstadoNoPermitido(_) => StatusCode::BAD_REQUEST,
            WorkflowError::VinculadaAContrato(_)
            | WorkflowError::TransicionInvalida { .. }
            | WorkflowError::NoEditable(_) => StatusCode::CONFLICT,
        }
    }

    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            WorkflowError::VinculadaAContrato(id) => vec![("contrato", id.to_string())],
            WorkflowError::SinPermiso { accion } => vec![("accion", accion.to_string())],
            WorkflowError::TransicionInvalida { desde, hacia } => {
                vec![("desde", desde.to_string()), ("hacia", hacia.to_string())]
            }
            WorkflowError::MotivoRequerido { minimo, .. } => vec![("minimo", minimo.to_string())],
            WorkflowError::NoEditable(estado) | WorkflowError::EstadoNoPermitido(estado) => {
                vec![("estado", estado.to_string())]
            }
        }
    }

    /// Campo do formulário a destacar, quando houver.
    pub fn campo(&self) -> Option<&'static str> {
        match self {
            WorkflowError::MotivoRequerido { campo, .. } => Some(*campo),
            _ => None,
        }
    }
}

fn require_motivo(motivo: Option<&str>, campo: &'static str) -> Result<String, WorkflowError> {
    let motivo = motivo.map(str::trim).unwrap_or_default();
    if motivo.chars().count() < MIN_MOTIVO {
        return Err(WorkflowError::MotivoRequerido { campo, minimo: MIN_MOTIVO });
    }
    Ok(motivo.to_string())
}

fn require(allowed: bool, accion: &'static str) -> Result<(), WorkflowError> {
    if allowed {
        Ok(())
    } else {
        Err(WorkflowError::SinPermiso { accion })
    }
}

/// Aplica a transição pedida e devolve o registro resultante.
pub fn transition(
    solicitud: &Solicitud,
    nuevo_estado: SolicitudEstado,
    actor: &Actor,
    motivo: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Solicitud, WorkflowError> {
    use SolicitudEstado::*;

    if !DESTINOS.contains(&nuevo_estado) {
        return Err(WorkflowError::EstadoNoPermitido(nuevo_estado));
    }

    // Vinculada a contrato: só owner/admin cancelam, nada mais passa.
    if let Some(contrato_id) = solicitud.contrato_id {
        if !(nuevo_estado == Cancelada && actor.caps.can_cancel_linked) {
            return Err(WorkflowError::VinculadaAContrato(contrato_id));
        }
    }

    let desde = solicitud.estado;
    if desde == nuevo_estado {
        return Err(WorkflowError::TransicionInvalida { desde, hacia: nuevo_estado });
    }

    let mut next = solicitud.clone();

    match (desde, nuevo_estado) {
        (Borrador, Enviada) => {
            require(actor.id == solicitud.usuario_id, "enviar")?;
            next.fecha_envio = Some(now);
        }
        (Enviada | EnRevision, Borrador) => {
            require(actor.caps.is_gestor, "regresar")?;
            next.motivo_retorno = Some(require_motivo(motivo, "motivo_regreso")?);
            next.fecha_retorno = Some(now);
        }
        (Enviada, EnRevision) => {
            require(actor.caps.is_gestor, "revisar")?;
        }
        (Enviada | EnRevision, Aprobada) => {
            require(actor.caps.is_gestor, "aprobar")?;
            next.fecha_aprobacion = Some(now);
            next.aprobado_por = Some(actor.id);
        }
        (Borrador | Enviada | EnRevision, Cancelada) => {
            require(actor.caps.is_gestor, "cancelar")?;
            next.motivo_cancelacion = Some(require_motivo(motivo, "motivo_cancelacion")?);
            next.fecha_cancelacion = Some(now);
        }
        (Aprobada, Cancelada) => {
            require(actor.caps.can_cancel_linked, "cancelar")?;
            next.motivo_cancelacion = Some(require_motivo(motivo, "motivo_cancelacion")?);
            next.fecha_cancelacion = Some(now);
        }
        (desde, hacia) => return Err(WorkflowError::TransicionInvalida { desde, hacia }),
    }

    next.estado = nuevo_estado;
    next.updated_at = now;
    Ok(next)
}

/// Dono edita em borrador; gestor edita em revisão; vinculada nunca.
pub fn check_editable(solicitud: &Solicitud, actor: &Actor) -> Result<(), WorkflowError> {
    if let Some(contrato_id) = solicitud.contrato_id {
        return Err(WorkflowError::VinculadaAContrato(contrato_id));
    }
    match solicitud.estado {
        SolicitudEstado::Borrador => require(actor.id == solicitud.usuario_id, "editar"),
        SolicitudEstado::EnRevision => require(actor.caps.is_gestor, "editar"),
        estado => Err(WorkflowError::NoEditable(estado)),
    }
}

pub fn can_view(solicitud: &Solicitud, actor: &Actor) -> bool {
    actor.id == solicitud.usuario_id || actor.caps.is_gestor
}

/// Destinos que o ator conseguiria aplicar agora (com um motivo válido).
pub fn permitted_targets(solicitud: &Solicitud, actor: &Actor) -> Vec<SolicitudEstado> {
    let motivo = "x".repeat(MIN_MOTIVO);
    let now = solicitud.updated_at;
    DESTINOS
        .into_iter()
        .filter(|destino| transition(solicitud, *destino, actor, Some(&motivo), now).is_ok())
        .collect()
}
