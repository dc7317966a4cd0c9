// src/models/solicitud.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

// Mapeia o CREATE TYPE solicitud_estado do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "solicitud_estado", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SolicitudEstado {
    Borrador,
    Enviada,
    EnRevision,
    Aprobada,
    Cancelada,
    Rechazada,
}

impl SolicitudEstado {
    pub fn as_str(self) -> &'static str {
        match self {
            SolicitudEstado::Borrador => "borrador",
            SolicitudEstado::Enviada => "enviada",
            SolicitudEstado::EnRevision => "en_revision",
            SolicitudEstado::Aprobada => "aprobada",
            SolicitudEstado::Cancelada => "cancelada",
            SolicitudEstado::Rechazada => "rechazada",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SolicitudEstado::Aprobada | SolicitudEstado::Cancelada | SolicitudEstado::Rechazada
        )
    }
}

impl std::fmt::Display for SolicitudEstado {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Solicitud {
    pub id: i64,
    #[schema(example = "SOL-2026-00042")]
    pub folio: String,
    pub usuario_id: i64,
    pub estado: SolicitudEstado,

    // Solicitante
    pub nacionalidad_id: Option<i32>,
    pub nombre_completo: String,
    pub fecha_nacimiento: Option<NaiveDate>,
    pub lugar_nacimiento: Option<String>,
    pub estado_civil: Option<String>,
    pub ocupacion: Option<String>,
    pub celular: Option<String>,
    pub telefono: Option<String>,
    pub email: Option<String>,
    pub domicilio: Option<String>,
    pub curp: Option<String>,
    pub rfc: Option<String>,
    pub ine: Option<String>,
    pub beneficiario: Option<String>,
    pub parentesco_beneficiario: Option<String>,
    pub dice_ser: Option<String>,

    // Albacea (só vale com albacea_activo)
    pub albacea_activo: bool,
    pub albacea_nombre: Option<String>,
    pub albacea_celular: Option<String>,
    pub albacea_parentesco: Option<String>,

    // Imóvel e condições
    pub desarrollo_id: Option<i64>,
    pub lote: Option<String>,
    pub manzana: Option<String>,
    pub superficie: Option<Decimal>,
    pub precio_total: Option<Decimal>,
    pub enganche: Option<Decimal>,
    pub saldo: Option<Decimal>,
    pub plazo_meses: Option<i32>,
    pub mensualidad: Option<Decimal>,
    pub fecha_firma: Option<NaiveDate>,
    pub observaciones: Option<String>,

    // Fluxo
    pub motivo_retorno: Option<String>,
    pub fecha_retorno: Option<DateTime<Utc>>,
    pub motivo_cancelacion: Option<String>,
    pub fecha_cancelacion: Option<DateTime<Utc>>,
    pub fecha_envio: Option<DateTime<Utc>>,
    pub fecha_aprobacion: Option<DateTime<Utc>>,
    pub aprobado_por: Option<i64>,
    pub contrato_id: Option<i64>,

    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("valor_negativo".into());
        return Err(err);
    }
    Ok(())
}

/// Campos capturados no formulário. Usado tanto na criação quanto na edição.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SolicitudForm {
    pub nacionalidad_id: Option<i32>,
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Juan Pérez López")]
    pub nombre_completo: String,
    pub fecha_nacimiento: Option<NaiveDate>,
    pub lugar_nacimiento: Option<String>,
    pub estado_civil: Option<String>,
    pub ocupacion: Option<String>,
    pub celular: Option<String>,
    pub telefono: Option<String>,
    #[validate(email(message = "email_invalido"))]
    pub email: Option<String>,
    pub domicilio: Option<String>,
    #[validate(length(equal = 18, message = "curp_invalida"))]
    pub curp: Option<String>,
    #[validate(length(min = 12, max = 13, message = "rfc_invalido"))]
    #[schema(example = "ABCD800101AAA")]
    pub rfc: Option<String>,
    pub ine: Option<String>,
    pub beneficiario: Option<String>,
    pub parentesco_beneficiario: Option<String>,
    pub dice_ser: Option<String>,

    #[serde(default)]
    pub albacea_activo: bool,
    pub albacea_nombre: Option<String>,
    pub albacea_celular: Option<String>,
    pub albacea_parentesco: Option<String>,

    pub desarrollo_id: Option<i64>,
    pub lote: Option<String>,
    pub manzana: Option<String>,
    #[validate(custom(function = "validate_not_negative"))]
    pub superficie: Option<Decimal>,
    #[validate(custom(function = "validate_not_negative"))]
    pub precio_total: Option<Decimal>,
    #[validate(custom(function = "validate_not_negative"))]
    pub enganche: Option<Decimal>,
    #[validate(custom(function = "validate_not_negative"))]
    pub saldo: Option<Decimal>,
    #[validate(range(min = 0, message = "valor_negativo"))]
    pub plazo_meses: Option<i32>,
    #[validate(custom(function = "validate_not_negative"))]
    pub mensualidad: Option<Decimal>,
    pub fecha_firma: Option<NaiveDate>,
    pub observaciones: Option<String>,
}

impl SolicitudForm {
    /// Normaliza antes de gravar: RFC/CURP em maiúsculas, textos vazios viram None
    /// e o grupo do albacea é apagado quando a flag está desligada.
    pub fn normalized(mut self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        self.nombre_completo = self.nombre_completo.trim().to_string();
        self.curp = clean(self.curp).map(|v| v.to_uppercase());
        self.rfc = clean(self.rfc).map(|v| v.to_uppercase());
        self.lugar_nacimiento = clean(self.lugar_nacimiento);
        self.estado_civil = clean(self.estado_civil);
        self.ocupacion = clean(self.ocupacion);
        self.celular = clean(self.celular);
        self.telefono = clean(self.telefono);
        self.email = clean(self.email);
        self.domicilio = clean(self.domicilio);
        self.ine = clean(self.ine);
        self.beneficiario = clean(self.beneficiario);
        self.parentesco_beneficiario = clean(self.parentesco_beneficiario);
        self.dice_ser = clean(self.dice_ser);
        self.lote = clean(self.lote);
        self.manzana = clean(self.manzana);
        self.observaciones = clean(self.observaciones);

        if self.albacea_activo {
            self.albacea_nombre = clean(self.albacea_nombre);
            self.albacea_celular = clean(self.albacea_celular);
            self.albacea_parentesco = clean(self.albacea_parentesco);
        } else {
            self.albacea_nombre = None;
            self.albacea_celular = None;
            self.albacea_parentesco = None;
        }
        self
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSolicitudPayload {
    /// Versão lida pelo cliente; divergência gera 409.
    pub version: i32,
    #[validate(nested)]
    #[serde(flatten)]
    pub form: SolicitudForm,
}

impl UpdateSolicitudPayload {
    pub fn normalized(self) -> Self {
        Self { form: self.form.normalized(), ..self }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransitionPayload {
    pub nuevo_estado: SolicitudEstado,
    /// Motivo do retorno a borrador ou do cancelamento.
    #[schema(example = "Falta firma del testigo")]
    pub motivo: Option<String>,
    pub version: Option<i32>,
}

/// Aviso exibido ao dono quando a solicitação voltou para borrador.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvisoRetorno {
    pub motivo: String,
    pub fecha: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SolicitudView {
    #[serde(flatten)]
    pub solicitud: Solicitud,
    pub editable: bool,
    pub aviso_retorno: Option<AvisoRetorno>,
}

impl Solicitud {
    pub fn aviso_retorno(&self) -> Option<AvisoRetorno> {
        match (&self.estado, &self.motivo_retorno) {
            (SolicitudEstado::Borrador, Some(motivo)) if !motivo.trim().is_empty() => Some(AvisoRetorno {
                motivo: motivo.clone(),
                fecha: self.fecha_retorno,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::TimeZone;

    /// Solicitação mínima em borrador, dona = `usuario_id`.
    pub fn solicitud(id: i64, usuario_id: i64, estado: SolicitudEstado) -> Solicitud {
        let t = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
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
            created_at: t,
            updated_at: t,
        }
    }
}
