// src/services/cliente_service.rs

use sqlx::PgPool;

use crate::{
    common::error::{AppError, Recurso},
    db::ClienteRepository,
    models::cliente::{ClientMatch, Cliente, ClienteEstado, ClienteInput},
    services::client_matching::find_matching_client,
};

#[derive(Clone)]
pub struct ClienteService {
    repo: ClienteRepository,
}

impl ClienteService {
    pub fn new(repo: ClienteRepository) -> Self {
        Self { repo }
    }

    pub async fn create(&self, pool: &PgPool, input: ClienteInput) -> Result<Cliente, AppError> {
        let cliente = self.repo.create(pool, &input.normalized()).await?;
        tracing::info!(cliente_id = cliente.id, "cliente creado");
        Ok(cliente)
    }

    pub async fn get(&self, pool: &PgPool, id: i64) -> Result<Cliente, AppError> {
        self.repo
            .find_by_id(pool, id)
            .await?
            .ok_or(AppError::NotFound(Recurso::Cliente))
    }

    pub async fn list(&self, pool: &PgPool) -> Result<Vec<Cliente>, AppError> {
        self.repo.list(pool).await
    }

    pub async fn update(&self, pool: &PgPool, id: i64, input: ClienteInput) -> Result<Cliente, AppError> {
        self.repo
            .update(pool, id, &input.normalized())
            .await?
            .ok_or(AppError::NotFound(Recurso::Cliente))
    }

    pub async fn archive(&self, pool: &PgPool, id: i64) -> Result<Cliente, AppError> {
        let cliente = self
            .repo
            .set_estado(pool, id, ClienteEstado::Archivado)
            .await?
            .ok_or(AppError::NotFound(Recurso::Cliente))?;
        tracing::info!(cliente_id = id, "cliente archivado");
        Ok(cliente)
    }

    /// Sugestão de cliente existente; nunca vincula nada sozinha.
    pub async fn find_match(&self, rfc: Option<&str>, curp: Option<&str>) -> Result<Option<ClientMatch>, AppError> {
        find_matching_client(&self.repo, rfc, curp).await
    }
}
