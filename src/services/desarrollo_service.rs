// src/services/desarrollo_service.rs

use sqlx::PgPool;

use crate::{
    common::error::{validation_error, AppError, Recurso},
    db::{DesarrolloRepository, ParametrosRepository},
    models::{
        cliente::Nacionalidad,
        desarrollo::{Desarrollo, DesarrolloInput},
        parametros::{Parametros, UpdateParametrosRequest},
    },
};

/// Desarrollos, parâmetros da empresa e catálogos: a parte "configuração" do sistema.
#[derive(Clone)]
pub struct DesarrolloService {
    repo: DesarrolloRepository,
    parametros_repo: ParametrosRepository,
}

fn check_lotes(input: &DesarrolloInput) -> Result<(), AppError> {
    if input.lotes_disponibles > input.lotes_totales {
        return Err(validation_error("lotesDisponibles", "lotes_excedidos"));
    }
    Ok(())
}

impl DesarrolloService {
    pub fn new(repo: DesarrolloRepository, parametros_repo: ParametrosRepository) -> Self {
        Self { repo, parametros_repo }
    }

    pub async fn create(&self, pool: &PgPool, input: DesarrolloInput) -> Result<Desarrollo, AppError> {
        check_lotes(&input)?;
        let desarrollo = self.repo.create(pool, &input).await?;
        tracing::info!(desarrollo_id = desarrollo.id, nombre = %desarrollo.nombre, "desarrollo creado");
        Ok(desarrollo)
    }

    pub async fn list(&self) -> Result<Vec<Desarrollo>, AppError> {
        self.repo.list().await
    }

    pub async fn get(&self, pool: &PgPool, id: i64) -> Result<Desarrollo, AppError> {
        self.repo
            .find_by_id(pool, id)
            .await?
            .ok_or(AppError::NotFound(Recurso::Desarrollo))
    }

    pub async fn update(&self, pool: &PgPool, id: i64, input: DesarrolloInput) -> Result<Desarrollo, AppError> {
        check_lotes(&input)?;
        self.repo
            .update(pool, id, &input)
            .await?
            .ok_or(AppError::NotFound(Recurso::Desarrollo))
    }

    pub async fn get_parametros(&self, pool: &PgPool) -> Result<Parametros, AppError> {
        self.parametros_repo.get(pool).await
    }

    pub async fn update_parametros(&self, pool: &PgPool, input: UpdateParametrosRequest) -> Result<Parametros, AppError> {
        let parametros = self.parametros_repo.upsert(pool, &input).await?;
        tracing::info!("parámetros de la empresa actualizados");
        Ok(parametros)
    }

    pub async fn nacionalidades(&self) -> Result<Vec<Nacionalidad>, AppError> {
        self.parametros_repo.nacionalidades().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(totales: i32, disponibles: i32) -> DesarrolloInput {
        DesarrolloInput {
            nombre: "Residencial Los Álamos".into(),
            tipo_contrato: "Compraventa".into(),
            plantilla: "compraventa".into(),
            ubicacion: None,
            clave_catastral: None,
            lotes_totales: totales,
            lotes_disponibles: disponibles,
            precio_m2: None,
            activo: true,
        }
    }

    #[test]
    fn available_lots_cannot_exceed_total() {
        assert!(check_lotes(&input(10, 10)).is_ok());
        assert!(matches!(check_lotes(&input(10, 11)), Err(AppError::ValidationError(_))));
    }
}
