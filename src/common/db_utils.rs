use chrono::{DateTime, Datelike, Utc};

use crate::common::error::AppError;

/// Prefixos de folio por tipo de documento.
pub const PREFIJO_SOLICITUD: &str = "SOL";
pub const PREFIJO_CONTRATO: &str = "CTR";

/// `SOL-2026-00042`: prefixo, ano de criação e id com cinco dígitos.
pub fn format_folio(prefijo: &str, now: DateTime<Utc>, id: i64) -> String {
    format!("{}-{}-{:05}", prefijo, now.year(), id)
}

// ---
// Helper: traduz violação de UNIQUE num erro amigável
// ---
pub(crate) fn map_unique(e: sqlx::Error, detalle: impl Into<String>) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::UniqueConstraintViolation(detalle.into());
        }
    }
    e.into()
}

/// UPDATE com `WHERE version = $n` que não tocou em nada: outro usuário gravou antes.
pub(crate) fn ensure_version_matched<T>(updated: Option<T>) -> Result<T, AppError> {
    updated.ok_or(AppError::VersionConflict)
}
