// src/models/cliente.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "cliente_estado", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ClienteEstado {
    Activo,
    Archivado,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Cliente {
    pub id: i64,
    #[schema(example = "Juan Pérez López")]
    pub nombre: String,
    pub nacionalidad: Option<String>,
    #[schema(example = "ABCD800101AAA")]
    pub rfc: Option<String>,
    pub curp: Option<String>,
    pub ine: Option<String>,
    pub estado_civil: Option<String>,
    pub ocupacion: Option<String>,
    pub telefono: Option<String>,
    pub domicilio: Option<String>,
    pub email: Option<String>,
    pub beneficiario: Option<String>,
    pub estado: ClienteEstado,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Dados de cliente aceitos na criação/edição e no formulário de contrato.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClienteInput {
    #[validate(length(min = 1, message = "required"))]
    pub nombre: String,
    pub nacionalidad: Option<String>,
    #[validate(length(min = 12, max = 13, message = "rfc_invalido"))]
    pub rfc: Option<String>,
    #[validate(length(equal = 18, message = "curp_invalida"))]
    pub curp: Option<String>,
    pub ine: Option<String>,
    pub estado_civil: Option<String>,
    pub ocupacion: Option<String>,
    pub telefono: Option<String>,
    pub domicilio: Option<String>,
    #[validate(email(message = "email_invalido"))]
    pub email: Option<String>,
    pub beneficiario: Option<String>,
}

impl ClienteInput {
    pub fn normalized(mut self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
        }
        self.nombre = self.nombre.trim().to_string();
        self.rfc = clean(self.rfc).map(|v| v.to_uppercase());
        self.curp = clean(self.curp).map(|v| v.to_uppercase());
        self.nacionalidad = clean(self.nacionalidad);
        self.ine = clean(self.ine);
        self.estado_civil = clean(self.estado_civil);
        self.ocupacion = clean(self.ocupacion);
        self.telefono = clean(self.telefono);
        self.domicilio = clean(self.domicilio);
        self.email = clean(self.email);
        self.beneficiario = clean(self.beneficiario);
        self
    }
}

/// Por que um cliente existente foi considerado a mesma pessoa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum MatchReason {
    #[serde(rename = "RFC y CURP")]
    RfcYCurp,
    #[serde(rename = "RFC")]
    Rfc,
    #[serde(rename = "CURP")]
    Curp,
    #[serde(rename = "los datos proporcionados")]
    DatosProporcionados,
}

impl MatchReason {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchReason::RfcYCurp => "RFC y CURP",
            MatchReason::Rfc => "RFC",
            MatchReason::Curp => "CURP",
            MatchReason::DatosProporcionados => "los datos proporcionados",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientMatch {
    pub cliente: Cliente,
    pub motivo: MatchReason,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MatchQuery {
    pub rfc: Option<String>,
    pub curp: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Nacionalidad {
    pub id: i32,
    #[schema(example = "Mexicana")]
    pub nombre: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_optional_ids_pass_validation_once_normalized() {
        let input = ClienteInput {
            nombre: "Ana Ruiz".into(),
            rfc: Some("".into()),
            curp: Some("   ".into()),
            email: Some(" ".into()),
            ..Default::default()
        }
        .normalized();

        assert!(input.validate().is_ok());
        assert_eq!((input.rfc, input.curp, input.email), (None, None, None));
    }

    #[test]
    fn whitespace_name_is_required() {
        let errors = ClienteInput { nombre: "   ".into(), ..Default::default() }
            .normalized()
            .validate()
            .unwrap_err();
        assert!(errors.field_errors().contains_key("nombre"));
    }

    #[test]
    fn lowercase_rfc_is_uppercased_before_length_check() {
        let input = ClienteInput {
            nombre: "Ana".into(),
            rfc: Some(" ruaa800101ab1 ".into()),
            ..Default::default()
        }
        .normalized();
        assert!(input.validate().is_ok());
        assert_eq!(input.rfc.as_deref(), Some("RUAA800101AB1"));
    }
}
