// src/services/grid.rs
//
// Quais ações cada linha das grades oferece. Só descreve as ações; o
// desenho dos botões fica no front-end.

use serde::Serialize;
use serde_json::json;

use crate::common::error::AppError;
use crate::models::{
    auth::Usuario,
    cliente::{Cliente, ClienteEstado},
    contrato::{Contrato, ContratoEstatus},
    desarrollo::Desarrollo,
    grid::{GridRow, Metodo, RowAction},
    solicitud::{Solicitud, SolicitudEstado},
};
use crate::services::permissions::Capabilities;
use crate::services::solicitud_workflow::{can_view, check_editable, permitted_targets, Actor};

/// Recursos com grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridResource {
    Clientes,
    Contratos,
    Solicitudes,
    Desarrollos,
    Usuarios,
}

impl GridResource {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "clientes" => Some(GridResource::Clientes),
            "contratos" => Some(GridResource::Contratos),
            "solicitudes" => Some(GridResource::Solicitudes),
            "desarrollos" => Some(GridResource::Desarrollos),
            "usuarios" => Some(GridResource::Usuarios),
            _ => None,
        }
    }

    /// Quem pode abrir a grade.
    pub fn allowed(self, caps: &Capabilities) -> bool {
        match self {
            GridResource::Solicitudes => true,
            GridResource::Clientes => caps.can_view_clientes,
            GridResource::Contratos => caps.can_manage_contratos,
            GridResource::Desarrollos => caps.can_manage_desarrollos,
            GridResource::Usuarios => caps.can_manage_usuarios,
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            GridResource::Clientes => "clientes",
            GridResource::Contratos => "contratos",
            GridResource::Solicitudes => "solicitudes",
            GridResource::Desarrollos => "desarrollos",
            GridResource::Usuarios => "usuarios",
        }
    }
}

/// Registro serializado mais as ações da linha.
pub fn grid_row<T: Serialize>(record: &T, acciones: Vec<RowAction>) -> Result<GridRow, AppError> {
    let row = serde_json::to_value(record).map_err(anyhow::Error::from)?;
    Ok(GridRow { row, acciones })
}

fn transition_action(s: &Solicitud, destino: SolicitudEstado) -> RowAction {
    let url = format!("/api/solicitudes/{}/transicion", s.id);
    let datos = json!({ "nuevoEstado": destino, "version": s.version });
    let action = match destino {
        SolicitudEstado::Enviada => RowAction::new("enviar", "Enviar a revisión", "fa-paper-plane", url, Metodo::Post)
            .confirm("¿Enviar la solicitud? Ya no podrás editarla."),
        SolicitudEstado::EnRevision => RowAction::new("revisar", "Tomar en revisión", "fa-search", url, Metodo::Post),
        SolicitudEstado::Aprobada => RowAction::new("aprobar", "Aprobar", "fa-check", url, Metodo::Post)
            .confirm("¿Aprobar la solicitud?"),
        SolicitudEstado::Borrador => RowAction::new("regresar", "Regresar a borrador", "fa-undo", url, Metodo::Post)
            .with_motivo(),
        SolicitudEstado::Cancelada => RowAction::new("cancelar", "Cancelar", "fa-ban", url, Metodo::Post)
            .confirm("¿Cancelar la solicitud? Esta acción no se puede deshacer.")
            .with_motivo(),
        SolicitudEstado::Rechazada => RowAction::new("rechazar", "Rechazar", "fa-times", url, Metodo::Post),
    };
    action.with_datos(datos)
}

pub fn acciones_solicitud(s: &Solicitud, actor: &Actor) -> Vec<RowAction> {
    if !can_view(s, actor) {
        return Vec::new();
    }

    let mut acciones = vec![RowAction::new(
        "ver",
        "Ver detalle",
        "fa-eye",
        format!("/api/solicitudes/{}", s.id),
        Metodo::Get,
    )];

    if check_editable(s, actor).is_ok() {
        acciones.push(RowAction::new(
            "editar",
            "Editar",
            "fa-edit",
            format!("/api/solicitudes/{}", s.id),
            Metodo::Put,
        ));
    }

    acciones.extend(permitted_targets(s, actor).into_iter().map(|destino| transition_action(s, destino)));

    match s.contrato_id {
        Some(contrato_id) if actor.caps.can_manage_contratos => acciones.push(RowAction::new(
            "ver_contrato",
            "Ver contrato",
            "fa-file-contract",
            format!("/api/contratos/{}", contrato_id),
            Metodo::Get,
        )),
        None if s.estado == SolicitudEstado::Aprobada && actor.caps.can_manage_contratos => {
            acciones.push(RowAction::new(
                "crear_contrato",
                "Crear contrato",
                "fa-file-signature",
                format!("/api/solicitudes/{}/prefill", s.id),
                Metodo::Get,
            ))
        }
        _ => {}
    }

    acciones
}

pub fn acciones_contrato(c: &Contrato, caps: &Capabilities) -> Vec<RowAction> {
    if !caps.can_manage_contratos {
        return Vec::new();
    }

    let mut acciones = vec![
        RowAction::new("ver", "Ver detalle", "fa-eye", format!("/api/contratos/{}", c.id), Metodo::Get),
        RowAction::new(
            "descargar",
            "Descargar DOCX",
            "fa-file-word",
            format!("/api/contratos/{}/documento", c.id),
            Metodo::Get,
        ),
    ];

    // Cancelado é imutável: só leitura.
    match c.estatus {
        ContratoEstatus::Cancelado => {}
        estatus => {
            acciones.push(RowAction::new(
                "editar",
                "Editar",
                "fa-edit",
                format!("/api/contratos/{}", c.id),
                Metodo::Put,
            ));
            let archivar = estatus == ContratoEstatus::Activo;
            let (accion, etiqueta, icono) = if archivar {
                ("archivar", "Archivar", "fa-archive")
            } else {
                ("reactivar", "Reactivar", "fa-box-open")
            };
            acciones.push(
                RowAction::new(accion, etiqueta, icono, format!("/api/contratos/{}/archivo", c.id), Metodo::Post)
                    .with_datos(json!({ "archivar": archivar, "version": c.version })),
            );
            acciones.push(
                RowAction::new(
                    "cancelar",
                    "Cancelar contrato",
                    "fa-ban",
                    format!("/api/contratos/{}/cancelacion", c.id),
                    Metodo::Post,
                )
                .confirm("¿Cancelar el contrato? Un contrato cancelado ya no puede modificarse.")
                .with_motivo()
                .with_datos(json!({ "version": c.version })),
            );
        }
    }

    acciones
}

pub fn acciones_cliente(c: &Cliente, caps: &Capabilities) -> Vec<RowAction> {
    if !caps.can_view_clientes {
        return Vec::new();
    }
    let mut acciones = vec![RowAction::new(
        "ver",
        "Ver detalle",
        "fa-eye",
        format!("/api/clientes/{}", c.id),
        Metodo::Get,
    )];
    if caps.can_manage_contratos && c.estado == ClienteEstado::Activo {
        acciones.push(RowAction::new(
            "editar",
            "Editar",
            "fa-edit",
            format!("/api/clientes/{}", c.id),
            Metodo::Put,
        ));
        acciones.push(
            RowAction::new(
                "archivar",
                "Archivar",
                "fa-archive",
                format!("/api/clientes/{}/archivo", c.id),
                Metodo::Post,
            )
            .confirm("¿Archivar el cliente?"),
        );
    }
    acciones
}

pub fn acciones_desarrollo(d: &Desarrollo, caps: &Capabilities) -> Vec<RowAction> {
    if !caps.can_manage_desarrollos {
        return Vec::new();
    }
    vec![RowAction::new(
        "editar",
        "Editar",
        "fa-edit",
        format!("/api/desarrollos/{}", d.id),
        Metodo::Put,
    )]
}

pub fn acciones_usuario(u: &Usuario, caps: &Capabilities, actor_id: i64) -> Vec<RowAction> {
    // Ninguém desativa a si mesmo pela grade.
    if !caps.can_manage_usuarios || u.id == actor_id {
        return Vec::new();
    }
    let (accion, etiqueta, icono) = if u.activo {
        ("desactivar", "Desactivar", "fa-user-slash")
    } else {
        ("activar", "Activar", "fa-user-check")
    };
    vec![
        RowAction::new("editar", "Editar", "fa-edit", format!("/api/usuarios/{}", u.id), Metodo::Put),
        RowAction::new(accion, etiqueta, icono, format!("/api/usuarios/{}", u.id), Metodo::Put)
            .with_datos(json!({ "activo": !u.activo })),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::Role;
    use crate::models::solicitud::fixtures::solicitud;
    use crate::services::permissions::capabilities;

    fn nombres(acciones: &[RowAction]) -> Vec<&'static str> {
        acciones.iter().map(|a| a.accion).collect()
    }

    #[test]
    fn owner_sees_edit_and_submit_on_draft() {
        let s = solicitud(5, 42, SolicitudEstado::Borrador);
        let acciones = acciones_solicitud(&s, &Actor::new(42, Role::User));
        assert_eq!(nombres(&acciones), vec!["ver", "editar", "enviar"]);
        assert_eq!(acciones[2].datos, Some(json!({ "nuevoEstado": "enviada", "version": 1 })));
    }

    #[test]
    fn stranger_sees_nothing() {
        let s = solicitud(5, 42, SolicitudEstado::Borrador);
        assert!(acciones_solicitud(&s, &Actor::new(99, Role::User)).is_empty());
    }

    #[test]
    fn gestor_on_review() {
        let s = solicitud(5, 42, SolicitudEstado::EnRevision);
        let acciones = acciones_solicitud(&s, &Actor::new(7, Role::Moderator));
        assert_eq!(nombres(&acciones), vec!["ver", "editar", "regresar", "aprobar", "cancelar"]);
        assert!(acciones.iter().find(|a| a.accion == "regresar").unwrap().pide_motivo);
    }

    #[test]
    fn approved_unlinked_offers_contract_creation() {
        let s = solicitud(5, 42, SolicitudEstado::Aprobada);
        let acciones = acciones_solicitud(&s, &Actor::new(7, Role::Senior));
        assert_eq!(nombres(&acciones), vec!["ver", "crear_contrato"]);
        assert_eq!(acciones[1].url, "/api/solicitudes/5/prefill");
    }

    #[test]
    fn linked_shows_contract_and_admin_cancel() {
        let mut s = solicitud(5, 42, SolicitudEstado::Aprobada);
        s.contrato_id = Some(77);
        let admin = acciones_solicitud(&s, &Actor::new(1, Role::Admin));
        assert_eq!(nombres(&admin), vec!["ver", "cancelar", "ver_contrato"]);
        let moderator = acciones_solicitud(&s, &Actor::new(7, Role::Moderator));
        assert_eq!(nombres(&moderator), vec!["ver", "ver_contrato"]);
    }

    #[test]
    fn grid_access() {
        let user = capabilities("user");
        assert!(GridResource::Solicitudes.allowed(&user));
        assert!(!GridResource::Clientes.allowed(&user));
        assert!(GridResource::Usuarios.allowed(&capabilities("owner")));
        assert_eq!(GridResource::parse("pagos"), None);
    }

    #[test]
    fn grid_row_flattens_record_next_to_actions() {
        let s = solicitud(5, 42, SolicitudEstado::Borrador);
        let acciones = acciones_solicitud(&s, &Actor::new(42, Role::User));
        let row = grid_row(&s, acciones).unwrap();
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["id"], json!(5));
        assert_eq!(value["acciones"].as_array().map(Vec::len), Some(3));
    }
}
