// src/models/contrato.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{cliente::{Cliente, ClienteInput}, desarrollo::Desarrollo};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[repr(i16)]
#[serde(rename_all = "lowercase")]
pub enum ContratoEstatus {
    Archivado = 0,
    Activo = 1,
    Cancelado = 2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClienteSnapshot {
    pub nombre: String,
    pub nacionalidad: Option<String>,
    pub rfc: Option<String>,
    pub curp: Option<String>,
    pub ine: Option<String>,
    pub estado_civil: Option<String>,
    pub ocupacion: Option<String>,
    pub telefono: Option<String>,
    pub domicilio: Option<String>,
    pub email: Option<String>,
    pub beneficiario: Option<String>,
}

impl From<&Cliente> for ClienteSnapshot {
    fn from(c: &Cliente) -> Self {
        Self {
            nombre: c.nombre.clone(),
            nacionalidad: c.nacionalidad.clone(),
            rfc: c.rfc.clone(),
            curp: c.curp.clone(),
            ine: c.ine.clone(),
            estado_civil: c.estado_civil.clone(),
            ocupacion: c.ocupacion.clone(),
            telefono: c.telefono.clone(),
            domicilio: c.domicilio.clone(),
            email: c.email.clone(),
            beneficiario: c.beneficiario.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DesarrolloSnapshot {
    pub nombre: String,
    pub tipo_contrato: String,
    pub plantilla: String,
    pub ubicacion: Option<String>,
    pub clave_catastral: Option<String>,
    pub precio_m2: Option<Decimal>,
}

impl From<&Desarrollo> for DesarrolloSnapshot {
    fn from(d: &Desarrollo) -> Self {
        Self {
            nombre: d.nombre.clone(),
            tipo_contrato: d.tipo_contrato.clone(),
            plantilla: d.plantilla.clone(),
            ubicacion: d.ubicacion.clone(),
            clave_catastral: d.clave_catastral.clone(),
            precio_m2: d.precio_m2,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Albacea {
    pub nombre: String,
    pub celular: Option<String>,
    pub parentesco: Option<String>,
}

/// Condições comerciais do contrato, como foram capturadas no formulário.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TerminosContrato {
    pub lote: Option<String>,
    pub manzana: Option<String>,
    pub superficie: Option<Decimal>,
    pub precio_total: Option<Decimal>,
    pub enganche: Option<Decimal>,
    pub saldo: Option<Decimal>,
    #[validate(range(min = 0, message = "valor_negativo"))]
    pub plazo_meses: Option<i32>,
    pub mensualidad: Option<Decimal>,
    pub fecha_firma: Option<NaiveDate>,
    pub dice_ser: Option<String>,
    pub albacea: Option<Albacea>,
    pub observaciones: Option<String>,
}

/// Cópia congelada de cliente, desarrollo e termos no momento da criação (`datta_contrato`).
/// Nunca é alterada parcialmente: uma edição de termos grava um snapshot novo inteiro.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContratoSnapshot {
    pub cliente: ClienteSnapshot,
    pub desarrollo: DesarrolloSnapshot,
    pub terminos: TerminosContrato,
    pub capturado_en: DateTime<Utc>,
}

impl ContratoSnapshot {
    pub fn capture(cliente: &Cliente, desarrollo: &Desarrollo, terminos: TerminosContrato, now: DateTime<Utc>) -> Self {
        Self {
            cliente: ClienteSnapshot::from(cliente),
            desarrollo: DesarrolloSnapshot::from(desarrollo),
            terminos,
            capturado_en: now,
        }
    }

    /// Mesmo cliente e desarrollo, termos novos.
    pub fn with_terminos(&self, terminos: TerminosContrato, now: DateTime<Utc>) -> Self {
        Self {
            cliente: self.cliente.clone(),
            desarrollo: self.desarrollo.clone(),
            terminos,
            capturado_en: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Contrato {
    pub id: i64,
    pub cliente_id: i64,
    pub desarrollo_id: i64,
    #[schema(example = "CTR-2026-00007")]
    pub folio: String,
    #[schema(value_type = ContratoSnapshot)]
    pub datta_contrato: Json<ContratoSnapshot>,
    pub estatus: ContratoEstatus,
    pub solicitud_origen_id: Option<i64>,
    pub motivo_cancelacion: Option<String>,
    pub fecha_cancelacion: Option<DateTime<Utc>>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contrato {
    pub fn is_cancelado(&self) -> bool {
        self.estatus == ContratoEstatus::Cancelado
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateContratoPayload {
    /// Cliente existente (p.ex. o sugerido pela busca por RFC/CURP).
    pub cliente_id: Option<i64>,
    /// Dados para um cliente novo, quando `clienteId` não vem.
    #[validate(nested)]
    pub cliente: Option<ClienteInput>,
    pub desarrollo_id: i64,
    #[validate(nested)]
    #[serde(default)]
    pub terminos: TerminosContrato,
    /// Solicitação aprovada de origem, quando o contrato vem do prefill.
    pub solicitud_origen_id: Option<i64>,
}

impl CreateContratoPayload {
    pub fn normalized(self) -> Self {
        Self { cliente: self.cliente.map(ClienteInput::normalized), ..self }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContratoPayload {
    pub version: i32,
    #[validate(nested)]
    pub terminos: TerminosContrato,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CancelContratoPayload {
    #[validate(length(min = 5, message = "motivo_corto"))]
    pub motivo: String,
    pub version: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveContratoPayload {
    pub version: i32,
    /// true arquiva, false reativa.
    pub archivar: bool,
}
