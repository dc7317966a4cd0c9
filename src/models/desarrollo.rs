// src/models/desarrollo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Desarrollo {
    pub id: i64,
    #[schema(example = "Residencial Los Álamos")]
    pub nombre: String,
    #[schema(example = "Compraventa a plazos")]
    pub tipo_contrato: String,
    /// Nome do arquivo .docx (sem extensão) dentro do diretório de plantillas.
    #[schema(example = "compraventa_plazos")]
    pub plantilla: String,
    pub ubicacion: Option<String>,
    pub clave_catastral: Option<String>,
    pub lotes_totales: i32,
    pub lotes_disponibles: i32,
    pub precio_m2: Option<Decimal>,
    pub activo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn validate_plantilla(value: &str) -> Result<(), ValidationError> {
    // Só o nome do arquivo, nada de caminhos
    let ok = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if ok {
        Ok(())
    } else {
        let mut err = ValidationError::new("plantilla");
        err.message = Some("required".into());
        Err(err)
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DesarrolloInput {
    #[validate(length(min = 1, message = "required"))]
    pub nombre: String,
    #[validate(length(min = 1, message = "required"))]
    pub tipo_contrato: String,
    #[validate(custom(function = "validate_plantilla"))]
    pub plantilla: String,
    pub ubicacion: Option<String>,
    pub clave_catastral: Option<String>,
    #[validate(range(min = 0, message = "valor_negativo"))]
    pub lotes_totales: i32,
    #[validate(range(min = 0, message = "valor_negativo"))]
    pub lotes_disponibles: i32,
    pub precio_m2: Option<Decimal>,
    #[serde(default = "default_true")]
    pub activo: bool,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plantilla_rejects_paths() {
        assert!(validate_plantilla("compraventa_plazos").is_ok());
        assert!(validate_plantilla("../etc/passwd").is_err());
        assert!(validate_plantilla("").is_err());
    }
}
