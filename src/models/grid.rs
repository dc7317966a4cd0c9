// src/models/grid.rs

use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Metodo {
    Get,
    Post,
    Put,
}

/// Uma ação disponível para uma linha da grade. O front-end decide como desenhar.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RowAction {
    #[schema(example = "ver")]
    pub accion: &'static str,
    #[schema(example = "Ver detalle")]
    pub etiqueta: &'static str,
    #[schema(example = "fa-eye")]
    pub icono: &'static str,
    #[schema(example = "/api/solicitudes/12")]
    pub url: String,
    pub metodo: Metodo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmacion: Option<&'static str>,
    /// Corpo a enviar junto com a ação (p.ex. o estado destino).
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub datos: Option<Value>,
    /// A ação pede um motivo ao usuário antes de enviar.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub pide_motivo: bool,
}

impl RowAction {
    pub fn new(accion: &'static str, etiqueta: &'static str, icono: &'static str, url: String, metodo: Metodo) -> Self {
        Self { accion, etiqueta, icono, url, metodo, confirmacion: None, datos: None, pide_motivo: false }
    }

    pub fn confirm(mut self, texto: &'static str) -> Self {
        self.confirmacion = Some(texto);
        self
    }

    pub fn with_datos(mut self, datos: Value) -> Self {
        self.datos = Some(datos);
        self
    }

    pub fn with_motivo(mut self) -> Self {
        self.pide_motivo = true;
        self
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GridRow {
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub row: Value,
    pub acciones: Vec<RowAction>,
}

/// Envelope `{ data: [...] }` consumido pelas grades do front-end.
#[derive(Debug, Serialize, ToSchema)]
pub struct GridResponse {
    pub data: Vec<GridRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub ruta: &'static str,
    pub etiqueta: &'static str,
    pub icono: &'static str,
}
