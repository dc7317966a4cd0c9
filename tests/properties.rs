mod support;

use contratos_argus::{
    models::{auth::Role, solicitud::SolicitudEstado},
    services::{
        client_matching::select_match,
        permissions::{build_menu, capabilities, capabilities_for},
        prefill::{build_prefill, PrefillCatalogs},
        solicitud_workflow::{check_editable, permitted_targets, transition, Actor, WorkflowError, MIN_MOTIVO},
    },
};
use proptest::prelude::*;

use support::{cliente, solicitud, t0};

fn estado() -> impl Strategy<Value = SolicitudEstado> {
    prop_oneof![
        Just(SolicitudEstado::Borrador),
        Just(SolicitudEstado::Enviada),
        Just(SolicitudEstado::EnRevision),
        Just(SolicitudEstado::Aprobada),
        Just(SolicitudEstado::Cancelada),
        Just(SolicitudEstado::Rechazada),
    ]
}

fn role() -> impl Strategy<Value = Role> {
    prop_oneof![
        Just(Role::User),
        Just(Role::Moderator),
        Just(Role::Senior),
        Just(Role::Owner),
        Just(Role::Admin),
    ]
}

proptest! {
    // Retorno e cancelamento nunca passam com motivo curto.
    #[test]
    fn short_reasons_are_rejected(
        desde in estado(),
        actor_role in role(),
        motivo in "[a-z ]{0,4}",
    ) {
        let s = solicitud(1, 42, desde);
        let actor = Actor::new(7, actor_role);
        for destino in [SolicitudEstado::Borrador, SolicitudEstado::Cancelada] {
            let result = transition(&s, destino, &actor, Some(&motivo), t0());
            prop_assert!(result.is_err());
        }
    }

    // Vinculada: só o cancelamento por owner/admin sai do lugar.
    #[test]
    fn linked_solicitud_is_frozen(destino in estado(), actor_role in role(), actor_id in 1i64..100) {
        let mut s = solicitud(1, 42, SolicitudEstado::Aprobada);
        s.contrato_id = Some(9);
        let actor = Actor::new(actor_id, actor_role);

        prop_assert!(check_editable(&s, &actor).is_err());

        let result = transition(&s, destino, &actor, Some("motivo suficiente"), t0());
        let allowed = destino == SolicitudEstado::Cancelada && matches!(actor_role, Role::Owner | Role::Admin);
        prop_assert_eq!(result.is_ok(), allowed);
    }

    // Toda transição aceita muda o estado e nunca desvincula.
    #[test]
    fn accepted_transitions_change_state(desde in estado(), actor_role in role(), owner in any::<bool>()) {
        let s = solicitud(1, 42, desde);
        let actor = Actor::new(if owner { 42 } else { 7 }, actor_role);
        for destino in permitted_targets(&s, &actor) {
            let motivo = "m".repeat(MIN_MOTIVO);
            let next = transition(&s, destino, &actor, Some(&motivo), t0()).unwrap();
            prop_assert_ne!(next.estado, desde);
            prop_assert_eq!(next.contrato_id, s.contrato_id);
            prop_assert_eq!(next.id, s.id);
        }
    }

    // Pedir o estado atual é sempre transição inválida.
    #[test]
    fn same_state_is_invalid(desde in estado(), actor_role in role()) {
        let s = solicitud(1, 42, desde);
        let result = transition(&s, desde, &Actor::new(42, actor_role), Some("motivo suficiente"), t0());
        let invalid = matches!(
            result,
            Err(WorkflowError::TransicionInvalida { .. }) | Err(WorkflowError::EstadoNoPermitido(_))
        );
        prop_assert!(invalid);
    }

    // A escolha do cliente não depende da ordem dos candidatos.
    #[test]
    fn matching_ignores_candidate_order(
        ids in proptest::collection::vec(1i64..50, 1..8),
        rotate in 0usize..8,
        with_curp in any::<bool>(),
    ) {
        let rfc = "ABCD800101AAA";
        let curp = "ABCD800101HDFRRN09";
        let candidates: Vec<_> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let c_curp = (with_curp && i % 2 == 0).then_some(curp);
                cliente(*id, Some(rfc), c_curp)
            })
            .collect();

        let mut rotated = candidates.clone();
        let len = rotated.len();
        rotated.rotate_left(rotate % len);
        let mut reversed = candidates.clone();
        reversed.reverse();

        let a = select_match(&candidates, Some(rfc), Some(curp));
        let b = select_match(&rotated, Some(rfc), Some(curp));
        let c = select_match(&reversed, Some(rfc), Some(curp));
        prop_assert_eq!(a.as_ref().map(|m| m.cliente.id), b.as_ref().map(|m| m.cliente.id));
        prop_assert_eq!(a.as_ref().map(|m| m.cliente.id), c.as_ref().map(|m| m.cliente.id));
        prop_assert_eq!(a.map(|m| m.motivo), b.map(|m| m.motivo));
    }

    // Prefill é função pura da solicitação.
    #[test]
    fn prefill_is_idempotent(
        nombre in "[A-Za-zÁÉÍÓÚáéíóúñ ]{1,30}",
        rfc in proptest::option::of("[a-zA-Z0-9 ]{0,13}"),
        centavos in proptest::option::of(0i64..100_000_000),
        albacea in any::<bool>(),
    ) {
        let mut s = solicitud(3, 42, SolicitudEstado::Aprobada);
        s.nombre_completo = nombre;
        s.rfc = rfc;
        s.precio_total = centavos.map(|c| rust_decimal::Decimal::new(c, 2));
        s.albacea_activo = albacea;
        s.albacea_nombre = Some("María López".into());

        let catalogs = PrefillCatalogs::default();
        let first = build_prefill(&s, &catalogs);
        prop_assert_eq!(&first, &build_prefill(&s, &catalogs));
        prop_assert_eq!(first.contrato.albacea_nombre.is_empty(), !albacea);
    }

    // Papel desconhecido não ganha capacidade nenhuma nem menu além do básico.
    #[test]
    fn unknown_roles_get_nothing(raw in "[a-z]{1,12}") {
        prop_assume!(!["user", "moderator", "senior", "owner", "admin"].contains(&raw.as_str()));
        let caps = capabilities(&raw);
        prop_assert_eq!(caps, capabilities_for(Role::User));
        prop_assert_eq!(build_menu(&caps).len(), 2);
    }
}
