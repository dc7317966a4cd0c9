// Fluxos de serviço contra um Postgres real (DATABASE_URL); cada teste ganha um banco migrado.

use std::path::PathBuf;

use contratos_argus::{
    common::error::AppError,
    config::{AppConfig, AppState},
    models::{
        auth::Role,
        cliente::ClienteInput,
        contrato::{CancelContratoPayload, ContratoEstatus, CreateContratoPayload, TerminosContrato},
        desarrollo::{Desarrollo, DesarrolloInput},
        solicitud::{Solicitud, SolicitudEstado, SolicitudForm, TransitionPayload, UpdateSolicitudPayload},
    },
    services::solicitud_workflow::Actor,
};
use pretty_assertions::assert_eq;
use sqlx::PgPool;

const RFC: &str = "ABCD800101AAA";

fn state(pool: PgPool) -> AppState {
    let config = AppConfig {
        database_url: String::new(),
        jwt_secret: "secreto-de-pruebas".into(),
        bind_addr: "127.0.0.1:0".into(),
        templates_dir: PathBuf::from("./plantillas"),
        session_hours: 8,
        db_max_connections: 1,
        admin_email: None,
        admin_password: None,
    };
    AppState::from_pool(pool, config)
}

async fn usuario(pool: &PgPool, email: &str, role: Role) -> Actor {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO usuarios (nombre, email, password_hash, permission) VALUES ($1, $2, 'x', $3) RETURNING id",
    )
    .bind(email)
    .bind(email)
    .bind(role.as_str())
    .fetch_one(pool)
    .await
    .unwrap();
    Actor::new(id, role)
}

async fn desarrollo(app: &AppState, lotes: i32) -> Desarrollo {
    let input = DesarrolloInput {
        nombre: "Residencial Los Álamos".into(),
        tipo_contrato: "Compraventa".into(),
        plantilla: "compraventa".into(),
        ubicacion: None,
        clave_catastral: None,
        lotes_totales: lotes,
        lotes_disponibles: lotes,
        precio_m2: None,
        activo: true,
    };
    app.desarrollo_service.create(&app.db_pool, input).await.unwrap()
}

fn form(desarrollo_id: i64) -> SolicitudForm {
    SolicitudForm {
        nombre_completo: "Juan Pérez López".into(),
        rfc: Some(RFC.to_lowercase()),
        desarrollo_id: Some(desarrollo_id),
        ..Default::default()
    }
}

fn mover(estado: SolicitudEstado) -> TransitionPayload {
    TransitionPayload { nuevo_estado: estado, motivo: None, version: None }
}

async fn aprobada(app: &AppState, owner: &Actor, gestor: &Actor, desarrollo_id: i64) -> Solicitud {
    let pool = &app.db_pool;
    let service = &app.solicitud_service;
    let s = service.create(pool, owner, form(desarrollo_id)).await.unwrap().solicitud;
    service.transition(pool, owner, s.id, mover(SolicitudEstado::Enviada)).await.unwrap();
    service.transition(pool, gestor, s.id, mover(SolicitudEstado::EnRevision)).await.unwrap();
    service.transition(pool, gestor, s.id, mover(SolicitudEstado::Aprobada)).await.unwrap().solicitud
}

fn desde_solicitud(solicitud: &Solicitud, cliente_id: Option<i64>, desarrollo_id: i64) -> CreateContratoPayload {
    CreateContratoPayload {
        cliente_id,
        cliente: Some(ClienteInput { nombre: solicitud.nombre_completo.clone(), ..Default::default() }),
        desarrollo_id,
        terminos: TerminosContrato::default(),
        solicitud_origen_id: Some(solicitud.id),
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn stale_version_is_a_conflict(pool: PgPool) {
    let app = state(pool);
    let owner = usuario(&app.db_pool, "dueno@argus.mx", Role::User).await;
    let service = &app.solicitud_service;

    let created = service.create(&app.db_pool, &owner, form_sin_desarrollo()).await.unwrap().solicitud;
    assert_eq!((created.version, created.estado), (1, SolicitudEstado::Borrador));
    assert_eq!(created.rfc.as_deref(), Some(RFC));

    let edit = |version| UpdateSolicitudPayload {
        version,
        form: SolicitudForm { observaciones: Some("lote esquina".into()), ..form_sin_desarrollo() },
    };
    let edited = service.update(&app.db_pool, &owner, created.id, edit(1)).await.unwrap().solicitud;
    assert_eq!(edited.version, 2);

    // Segunda gravação com a versão já consumida
    let stale = service.update(&app.db_pool, &owner, created.id, edit(1)).await;
    assert!(matches!(stale, Err(AppError::VersionConflict)));

    let stale_move = TransitionPayload { version: Some(1), ..mover(SolicitudEstado::Enviada) };
    let result = service.transition(&app.db_pool, &owner, created.id, stale_move).await;
    assert!(matches!(result, Err(AppError::VersionConflict)));

    let fresh_move = TransitionPayload { version: Some(2), ..mover(SolicitudEstado::Enviada) };
    let sent = service.transition(&app.db_pool, &owner, created.id, fresh_move).await.unwrap().solicitud;
    assert_eq!((sent.estado, sent.version), (SolicitudEstado::Enviada, 3));
}

fn form_sin_desarrollo() -> SolicitudForm {
    SolicitudForm { desarrollo_id: None, ..form(0) }
}

#[sqlx::test(migrations = "./migrations")]
async fn prefill_suggests_client_with_same_rfc(pool: PgPool) {
    let app = state(pool);
    let owner = usuario(&app.db_pool, "dueno@argus.mx", Role::User).await;
    let gestor = usuario(&app.db_pool, "gestor@argus.mx", Role::Senior).await;
    let d = desarrollo(&app, 3).await;

    let existente = app
        .cliente_service
        .create(&app.db_pool, ClienteInput { nombre: "Juan Pérez".into(), rfc: Some(RFC.into()), ..Default::default() })
        .await
        .unwrap();

    let s = aprobada(&app, &owner, &gestor, d.id).await;
    let response = app.solicitud_service.prefill(&app.db_pool, &gestor, s.id).await.unwrap();

    assert_eq!(response.cliente_id, Some(existente.id));
    assert_eq!(response.prefill.cliente.cliente_rfc, RFC);
    assert_eq!(response.prefill.contrato.solicitud_origen_id, s.id);
    assert_eq!(response.prefill.desarrollo.desarrollo_id, Some(d.id));
    assert_eq!(response.prefill.desarrollo.desarrollo_nombre, "Residencial Los Álamos");
}

#[sqlx::test(migrations = "./migrations")]
async fn contract_from_solicitud_links_it_and_takes_a_lot(pool: PgPool) {
    let app = state(pool);
    let owner = usuario(&app.db_pool, "dueno@argus.mx", Role::User).await;
    let gestor = usuario(&app.db_pool, "gestor@argus.mx", Role::Senior).await;
    let d = desarrollo(&app, 2).await;
    let s = aprobada(&app, &owner, &gestor, d.id).await;

    let contrato = app.contrato_service.create(&app.db_pool, desde_solicitud(&s, None, d.id)).await.unwrap();
    assert_eq!(contrato.solicitud_origen_id, Some(s.id));
    assert_eq!(contrato.estatus, ContratoEstatus::Activo);

    let linked = app.solicitud_service.get(&app.db_pool, &gestor, s.id).await.unwrap();
    assert_eq!(linked.solicitud.contrato_id, Some(contrato.id));
    assert!(!linked.editable);
    assert_eq!(app.desarrollo_service.get(&app.db_pool, d.id).await.unwrap().lotes_disponibles, 1);

    // Já vinculada: não gera um segundo contrato nem consome lote
    let again = app
        .contrato_service
        .create(&app.db_pool, desde_solicitud(&s, Some(contrato.cliente_id), d.id))
        .await;
    assert!(matches!(again, Err(AppError::SolicitudNoConvertible)));
    assert_eq!(app.desarrollo_service.get(&app.db_pool, d.id).await.unwrap().lotes_disponibles, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn unapproved_solicitud_rolls_back_everything(pool: PgPool) {
    let app = state(pool);
    let owner = usuario(&app.db_pool, "dueno@argus.mx", Role::User).await;
    let d = desarrollo(&app, 1).await;
    let s = app.solicitud_service.create(&app.db_pool, &owner, form(d.id)).await.unwrap().solicitud;

    let result = app.contrato_service.create(&app.db_pool, desde_solicitud(&s, None, d.id)).await;
    assert!(matches!(result, Err(AppError::SolicitudNoConvertible)));

    assert_eq!(app.desarrollo_service.get(&app.db_pool, d.id).await.unwrap().lotes_disponibles, 1);
    assert!(app.cliente_service.list(&app.db_pool).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn lots_run_out_and_come_back_on_cancel(pool: PgPool) {
    let app = state(pool);
    let d = desarrollo(&app, 1).await;
    let manual = || CreateContratoPayload {
        cliente_id: None,
        cliente: Some(ClienteInput { nombre: "Ana Ruiz".into(), ..Default::default() }),
        desarrollo_id: d.id,
        terminos: TerminosContrato::default(),
        solicitud_origen_id: None,
    };

    let contrato = app.contrato_service.create(&app.db_pool, manual()).await.unwrap();
    assert_eq!(app.desarrollo_service.get(&app.db_pool, d.id).await.unwrap().lotes_disponibles, 0);

    let sin_lotes = app.contrato_service.create(&app.db_pool, manual()).await;
    assert!(matches!(sin_lotes, Err(AppError::SinLotesDisponibles)));

    let cancel = CancelContratoPayload { motivo: "Cliente desistió".into(), version: contrato.version };
    let cancelado = app.contrato_service.cancel(&app.db_pool, contrato.id, cancel).await.unwrap();
    assert_eq!(cancelado.estatus, ContratoEstatus::Cancelado);
    assert_eq!(cancelado.motivo_cancelacion.as_deref(), Some("Cliente desistió"));
    assert_eq!(app.desarrollo_service.get(&app.db_pool, d.id).await.unwrap().lotes_disponibles, 1);

    // Cancelado é final
    let again = CancelContratoPayload { motivo: "Otra vez".into(), version: cancelado.version };
    let result = app.contrato_service.cancel(&app.db_pool, contrato.id, again).await;
    assert!(matches!(result, Err(AppError::ContratoCancelado)));
    assert_eq!(app.desarrollo_service.get(&app.db_pool, d.id).await.unwrap().lotes_disponibles, 1);
}
