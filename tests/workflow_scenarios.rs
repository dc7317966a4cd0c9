mod support;

use contratos_argus::{
    models::{
        auth::Role,
        cliente::MatchReason,
        solicitud::SolicitudEstado,
    },
    services::{
        client_matching::find_matching_client,
        grid::acciones_solicitud,
        prefill::{build_prefill, PrefillCatalogs},
        solicitud_workflow::{check_editable, transition, Actor, WorkflowError},
    },
};
use pretty_assertions::assert_eq;

use support::{cliente, solicitud, t0};

#[test]
fn owner_submits_draft() {
    let s = solicitud(1, 42, SolicitudEstado::Borrador);
    let next = transition(&s, SolicitudEstado::Enviada, &Actor::new(42, Role::User), None, t0()).unwrap();
    assert_eq!(next.estado, SolicitudEstado::Enviada);
    assert_eq!(next.fecha_envio, Some(t0()));
}

#[test]
fn stranger_cannot_submit_or_edit() {
    let s = solicitud(1, 42, SolicitudEstado::Borrador);
    let stranger = Actor::new(99, Role::User);
    assert_eq!(
        transition(&s, SolicitudEstado::Enviada, &stranger, None, t0()),
        Err(WorkflowError::SinPermiso { accion: "enviar" })
    );
    assert!(check_editable(&s, &stranger).is_err());
}

#[test]
fn gestor_returns_with_reason_and_owner_sees_banner() {
    let s = solicitud(1, 42, SolicitudEstado::Enviada);
    let gestor = Actor::new(7, Role::Moderator);

    let returned = transition(&s, SolicitudEstado::Borrador, &gestor, Some("Falta firma del testigo"), t0()).unwrap();
    assert_eq!(returned.estado, SolicitudEstado::Borrador);

    let aviso = returned.aviso_retorno().expect("banner de retorno");
    assert_eq!(aviso.motivo, "Falta firma del testigo");
    assert_eq!(aviso.fecha, Some(t0()));

    // De volta ao dono: editável e reenviável
    let owner = Actor::new(42, Role::User);
    assert!(check_editable(&returned, &owner).is_ok());
    let resent = transition(&returned, SolicitudEstado::Enviada, &owner, None, t0()).unwrap();
    assert_eq!(resent.aviso_retorno(), None);
}

#[tokio::test]
async fn full_lifecycle_to_prefill_with_rfc_match() {
    let owner = Actor::new(42, Role::User);
    let gestor = Actor::new(7, Role::Senior);

    let mut s = solicitud(12, 42, SolicitudEstado::Borrador);
    s.rfc = Some(" abcd800101aaa ".into());
    s.precio_total = Some("350000".parse().unwrap());

    let s = transition(&s, SolicitudEstado::Enviada, &owner, None, t0()).unwrap();
    let s = transition(&s, SolicitudEstado::EnRevision, &gestor, None, t0()).unwrap();
    let s = transition(&s, SolicitudEstado::Aprobada, &gestor, None, t0()).unwrap();
    assert_eq!(s.aprobado_por, Some(7));

    let nombres: Vec<_> = acciones_solicitud(&s, &gestor).iter().map(|a| a.accion).collect();
    assert_eq!(nombres, vec!["ver", "crear_contrato"]);

    let prefill = build_prefill(&s, &PrefillCatalogs::default());
    assert_eq!(prefill.cliente.cliente_rfc, "ABCD800101AAA");
    assert_eq!(prefill.contrato.precio_total, "350000.00");
    assert_eq!(prefill.contrato.solicitud_origen_id, 12);

    let existentes = vec![cliente(3, Some("ABCD800101AAA"), None), cliente(4, None, Some("OTRA000000HDFXXX00"))];
    let found = find_matching_client(&existentes, Some(prefill.cliente.cliente_rfc.as_str()), None)
        .await
        .unwrap()
        .expect("coincidencia por RFC");
    assert_eq!(found.cliente.id, 3);
    assert_eq!(found.motivo, MatchReason::Rfc);
}

#[test]
fn linked_solicitud_only_cancellable_by_admin() {
    let mut s = solicitud(5, 42, SolicitudEstado::Aprobada);
    s.contrato_id = Some(77);

    let moderator = Actor::new(7, Role::Moderator);
    assert_eq!(
        transition(&s, SolicitudEstado::Cancelada, &moderator, Some("Cliente desistió"), t0()),
        Err(WorkflowError::VinculadaAContrato(77))
    );
    assert_eq!(check_editable(&s, &Actor::new(42, Role::User)), Err(WorkflowError::VinculadaAContrato(77)));

    let admin = Actor::new(1, Role::Admin);
    let cancelled = transition(&s, SolicitudEstado::Cancelada, &admin, Some("Cliente desistió"), t0()).unwrap();
    assert_eq!(cancelled.estado, SolicitudEstado::Cancelada);
    assert_eq!(cancelled.motivo_cancelacion.as_deref(), Some("Cliente desistió"));
}

#[tokio::test]
async fn blank_keys_never_match() {
    let existentes = vec![cliente(1, Some(""), Some("  "))];
    assert_eq!(find_matching_client(&existentes, Some("   "), None).await.unwrap(), None);
}
