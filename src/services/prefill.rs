// src/services/prefill.rs
//
// Projeta uma solicitação aprovada nos campos do formulário de contrato.
// Função pura: mesma solicitação + mesmos catálogos => mesmo resultado.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{
    cliente::{ClientMatch, Nacionalidad},
    desarrollo::Desarrollo,
    solicitud::{Solicitud, SolicitudEstado},
};

/// Catálogos necessários para resolver ids em nomes.
#[derive(Debug, Clone, Default)]
pub struct PrefillCatalogs {
    pub desarrollos: Vec<Desarrollo>,
    pub nacionalidades: Vec<Nacionalidad>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ClientePrefill {
    pub cliente_nombre: String,
    pub cliente_nacionalidad: String,
    pub cliente_rfc: String,
    pub cliente_curp: String,
    pub cliente_ine: String,
    pub cliente_estado_civil: String,
    pub cliente_ocupacion: String,
    pub cliente_telefono: String,
    pub cliente_domicilio: String,
    pub cliente_email: String,
    pub cliente_beneficiario: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ContratoPrefill {
    pub solicitud_origen_id: i64,
    pub lote: String,
    pub manzana: String,
    pub superficie: String,
    pub precio_total: String,
    pub enganche: String,
    pub saldo: String,
    pub plazo_meses: String,
    pub mensualidad: String,
    pub fecha_firma: String,
    pub dice_ser: String,
    pub albacea_activo: bool,
    pub albacea_nombre: String,
    pub albacea_celular: String,
    pub albacea_parentesco: String,
    pub observaciones: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DesarrolloPrefill {
    pub desarrollo_id: Option<i64>,
    pub desarrollo_nombre: String,
    pub tipo_contrato: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrefillResumen {
    pub solicitud_id: i64,
    pub folio: String,
    pub estado: SolicitudEstado,
    pub nombre: String,
    pub capturada_por: i64,
    pub fecha_aprobacion: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Prefill {
    pub cliente: ClientePrefill,
    pub contrato: ContratoPrefill,
    pub desarrollo: DesarrolloPrefill,
    pub resumen: PrefillResumen,
}

/// Prefill + sugestão de cliente existente, como o formulário consome.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrefillResponse {
    pub prefill: Prefill,
    /// Preenchido quando há um cliente com o mesmo RFC/CURP.
    pub cliente_id: Option<i64>,
    pub coincidencia: Option<ClientMatch>,
}

/// Abaixo disso o valor é tratado como "não informado".
fn umbral() -> Decimal {
    Decimal::new(5, 3)
}

pub(crate) fn money(value: Option<Decimal>) -> String {
    match value {
        Some(v) if v.abs() >= umbral() => format!("{:.2}", v.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)),
        _ => String::new(),
    }
}

fn text(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_string()
}

fn upper(value: &Option<String>) -> String {
    text(value).to_uppercase()
}

pub fn build_prefill(solicitud: &Solicitud, catalogs: &PrefillCatalogs) -> Prefill {
    let nacionalidad = solicitud
        .nacionalidad_id
        .and_then(|id| catalogs.nacionalidades.iter().find(|n| n.id == id))
        .map(|n| n.nombre.clone())
        .unwrap_or_default();

    let desarrollo = solicitud
        .desarrollo_id
        .and_then(|id| catalogs.desarrollos.iter().find(|d| d.id == id));

    // "Dice ser" explícito vence; senão o parentesco do beneficiário.
    let dice_ser = match text(&solicitud.dice_ser) {
        explicit if !explicit.is_empty() => explicit,
        _ => text(&solicitud.parentesco_beneficiario),
    };

    let telefono = match text(&solicitud.celular) {
        celular if !celular.is_empty() => celular,
        _ => text(&solicitud.telefono),
    };

    let (albacea_nombre, albacea_celular, albacea_parentesco) = if solicitud.albacea_activo {
        (
            text(&solicitud.albacea_nombre),
            text(&solicitud.albacea_celular),
            text(&solicitud.albacea_parentesco),
        )
    } else {
        Default::default()
    };

    Prefill {
        cliente: ClientePrefill {
            cliente_nombre: solicitud.nombre_completo.trim().to_string(),
            cliente_nacionalidad: nacionalidad,
            cliente_rfc: upper(&solicitud.rfc),
            cliente_curp: upper(&solicitud.curp),
            cliente_ine: text(&solicitud.ine),
            cliente_estado_civil: text(&solicitud.estado_civil),
            cliente_ocupacion: text(&solicitud.ocupacion),
            cliente_telefono: telefono,
            cliente_domicilio: text(&solicitud.domicilio),
            cliente_email: text(&solicitud.email),
            cliente_beneficiario: text(&solicitud.beneficiario),
        },
        contrato: ContratoPrefill {
            solicitud_origen_id: solicitud.id,
            lote: text(&solicitud.lote),
            manzana: text(&solicitud.manzana),
            superficie: money(solicitud.superficie),
            precio_total: money(solicitud.precio_total),
            enganche: money(solicitud.enganche),
            saldo: money(solicitud.saldo),
            plazo_meses: solicitud
                .plazo_meses
                .filter(|m| *m > 0)
                .map(|m| m.to_string())
                .unwrap_or_default(),
            mensualidad: money(solicitud.mensualidad),
            fecha_firma: solicitud
                .fecha_firma
                .map(|f| f.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            dice_ser,
            albacea_activo: solicitud.albacea_activo,
            albacea_nombre,
            albacea_celular,
            albacea_parentesco,
            observaciones: text(&solicitud.observaciones),
        },
        desarrollo: DesarrolloPrefill {
            desarrollo_id: desarrollo.map(|d| d.id),
            desarrollo_nombre: desarrollo.map(|d| d.nombre.clone()).unwrap_or_default(),
            tipo_contrato: desarrollo.map(|d| d.tipo_contrato.clone()).unwrap_or_default(),
        },
        resumen: PrefillResumen {
            solicitud_id: solicitud.id,
            folio: solicitud.folio.clone(),
            estado: solicitud.estado,
            nombre: solicitud.nombre_completo.trim().to_string(),
            capturada_por: solicitud.usuario_id,
            fecha_aprobacion: solicitud.fecha_aprobacion,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::solicitud::fixtures::solicitud;
    use chrono::{NaiveDate, TimeZone};
    use std::str::FromStr;

    fn catalogs() -> PrefillCatalogs {
        let t = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        PrefillCatalogs {
            desarrollos: vec![Desarrollo {
                id: 3,
                nombre: "Residencial Los Álamos".into(),
                tipo_contrato: "Compraventa a plazos".into(),
                plantilla: "compraventa_plazos".into(),
                ubicacion: None,
                clave_catastral: None,
                lotes_totales: 100,
                lotes_disponibles: 40,
                precio_m2: None,
                activo: true,
                created_at: t,
                updated_at: t,
            }],
            nacionalidades: vec![Nacionalidad { id: 1, nombre: "Mexicana".into() }],
        }
    }

    fn aprobada() -> Solicitud {
        let mut s = solicitud(12, 42, SolicitudEstado::Aprobada);
        s.nacionalidad_id = Some(1);
        s.rfc = Some("abcd800101aaa".into());
        s.curp = Some("pelj800101hdfrpn09".into());
        s.celular = Some("9991234567".into());
        s.parentesco_beneficiario = Some("Esposa".into());
        s.desarrollo_id = Some(3);
        s.precio_total = Some(Decimal::from_str("350000.5").unwrap());
        s.enganche = Some(Decimal::from_str("0.001").unwrap());
        s.saldo = Some(Decimal::ZERO);
        s.plazo_meses = Some(0);
        s.mensualidad = Some(Decimal::from_str("4166.666").unwrap());
        s.fecha_firma = NaiveDate::from_ymd_opt(2026, 5, 10);
        s
    }

    #[test]
    fn maps_client_fields() {
        let p = build_prefill(&aprobada(), &catalogs());
        assert_eq!(p.cliente.cliente_nombre, "Juan Pérez López");
        assert_eq!(p.cliente.cliente_rfc, "ABCD800101AAA");
        assert_eq!(p.cliente.cliente_curp, "PELJ800101HDFRPN09");
        assert_eq!(p.cliente.cliente_nacionalidad, "Mexicana");
        assert_eq!(p.cliente.cliente_telefono, "9991234567");
    }

    #[test]
    fn cloned_catalogs_resolve_the_same_names() {
        let original = catalogs();
        let copia = original.clone();
        drop(original);
        let p = build_prefill(&aprobada(), &copia);
        assert_eq!(p.cliente.cliente_nacionalidad, "Mexicana");
        assert_eq!(p.desarrollo.desarrollo_nombre, "Residencial Los Álamos");
    }

    #[test]
    fn near_zero_money_is_blank() {
        let p = build_prefill(&aprobada(), &catalogs());
        assert_eq!(p.contrato.precio_total, "350000.50");
        assert_eq!(p.contrato.enganche, "");
        assert_eq!(p.contrato.saldo, "");
        assert_eq!(p.contrato.plazo_meses, "");
        assert_eq!(p.contrato.mensualidad, "4166.67");
        assert_eq!(p.contrato.fecha_firma, "2026-05-10");
    }

    #[test]
    fn dice_ser_falls_back_to_parentesco() {
        let mut s = aprobada();
        assert_eq!(build_prefill(&s, &catalogs()).contrato.dice_ser, "Esposa");
        s.dice_ser = Some("Concubina".into());
        assert_eq!(build_prefill(&s, &catalogs()).contrato.dice_ser, "Concubina");
    }

    #[test]
    fn albacea_only_when_active() {
        let mut s = aprobada();
        s.albacea_nombre = Some("Pedro Pérez".into());
        assert_eq!(build_prefill(&s, &catalogs()).contrato.albacea_nombre, "");
        s.albacea_activo = true;
        assert_eq!(build_prefill(&s, &catalogs()).contrato.albacea_nombre, "Pedro Pérez");
    }

    #[test]
    fn resolves_desarrollo_from_catalog() {
        let p = build_prefill(&aprobada(), &catalogs());
        assert_eq!(p.desarrollo.desarrollo_id, Some(3));
        assert_eq!(p.desarrollo.tipo_contrato, "Compraventa a plazos");

        let mut s = aprobada();
        s.desarrollo_id = Some(999);
        let p = build_prefill(&s, &catalogs());
        assert_eq!(p.desarrollo.desarrollo_id, None);
        assert_eq!(p.desarrollo.desarrollo_nombre, "");
    }

    #[test]
    fn is_idempotent() {
        let s = aprobada();
        let before = s.clone();
        let a = build_prefill(&s, &catalogs());
        let b = build_prefill(&s, &catalogs());
        assert_eq!(a, b);
        assert_eq!(s, before);
    }

    #[test]
    fn money_threshold() {
        assert_eq!(money(None), "");
        assert_eq!(money(Some(Decimal::from_str("-0.004").unwrap())), "");
        assert_eq!(money(Some(Decimal::from_str("0.005").unwrap())), "0.01");
        assert_eq!(money(Some(Decimal::from(1500))), "1500.00");
    }
}
