// Construtores compartilhados pelos testes de integração.
#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use contratos_argus::models::{
    cliente::{Cliente, ClienteEstado},
    solicitud::{Solicitud, SolicitudEstado},
};

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

pub fn solicitud(id: i64, usuario_id: i64, estado: SolicitudEstado) -> Solicitud {
    Solicitud {
        id,
        folio: format!("SOL-2026-{:05}", id),
        usuario_id,
        estado,
        nacionalidad_id: None,
        nombre_completo: "Juan Pérez López".into(),
        fecha_nacimiento: None,
        lugar_nacimiento: None,
        estado_civil: None,
        ocupacion: None,
        celular: None,
        telefono: None,
        email: None,
        domicilio: None,
        curp: None,
        rfc: None,
        ine: None,
        beneficiario: None,
        parentesco_beneficiario: None,
        dice_ser: None,
        albacea_activo: false,
        albacea_nombre: None,
        albacea_celular: None,
        albacea_parentesco: None,
        desarrollo_id: None,
        lote: None,
        manzana: None,
        superficie: None,
        precio_total: None,
        enganche: None,
        saldo: None,
        plazo_meses: None,
        mensualidad: None,
        fecha_firma: None,
        observaciones: None,
        motivo_retorno: None,
        fecha_retorno: None,
        motivo_cancelacion: None,
        fecha_cancelacion: None,
        fecha_envio: None,
        fecha_aprobacion: None,
        aprobado_por: None,
        contrato_id: None,
        version: 1,
        created_at: t0(),
        updated_at: t0(),
    }
}

pub fn cliente(id: i64, rfc: Option<&str>, curp: Option<&str>) -> Cliente {
    Cliente {
        id,
        nombre: format!("Cliente {id}"),
        nacionalidad: None,
        rfc: rfc.map(String::from),
        curp: curp.map(String::from),
        ine: None,
        estado_civil: None,
        ocupacion: None,
        telefono: None,
        domicilio: None,
        email: None,
        beneficiario: None,
        estado: ClienteEstado::Activo,
        created_at: t0(),
        updated_at: t0(),
    }
}
