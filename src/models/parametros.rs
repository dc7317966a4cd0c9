// src/models/parametros.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Dados da empresa usados nos documentos gerados. Linha única (id = 1).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Parametros {
    #[schema(example = "Grupo Argus S.A. de C.V.")]
    pub empresa_nombre: Option<String>,
    #[schema(example = "Lic. Ricardo Salinas")]
    pub representante_legal: Option<String>,
    pub empresa_domicilio: Option<String>,
    pub empresa_rfc: Option<String>,
    #[schema(example = "Mérida, Yucatán")]
    pub ciudad_firma: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateParametrosRequest {
    pub empresa_nombre: Option<String>,
    pub representante_legal: Option<String>,
    pub empresa_domicilio: Option<String>,
    pub empresa_rfc: Option<String>,
    pub ciudad_firma: Option<String>,
}
