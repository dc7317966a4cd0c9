// src/config.rs

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, path::PathBuf, sync::Arc, time::Duration};

use crate::{
    common::i18n::I18nStore,
    db::{
        ClienteRepository, ContratoRepository, DesarrolloRepository, ParametrosRepository, SolicitudRepository,
        UsuarioRepository,
    },
    services::{
        auth::AuthService, cliente_service::ClienteService, contrato_service::ContratoService,
        desarrollo_service::DesarrolloService, document_service::DocumentService,
        solicitud_service::SolicitudService, usuario_service::UsuarioService,
    },
};

/// Configuração lida do ambiente (.env incluso).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub templates_dir: PathBuf,
    pub session_hours: i64,
    pub db_max_connections: u32,
    /// Credenciais do admin inicial; só usadas com a tabela de usuários vazia.
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} inválido ({}): {}", name, raw, e)),
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            templates_dir: env::var("TEMPLATES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./plantillas")),
            session_hours: parse_or("SESSION_HOURS", 8)?,
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", 5)?,
            admin_email: env::var("ADMIN_EMAIL").ok().filter(|v| !v.trim().is_empty()),
            admin_password: env::var("ADMIN_PASSWORD").ok().filter(|v| !v.is_empty()),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<AppConfig>,
    pub i18n_store: Arc<I18nStore>,

    pub auth_service: AuthService,
    pub solicitud_service: SolicitudService,
    pub contrato_service: ContratoService,
    pub cliente_service: ClienteService,
    pub desarrollo_service: DesarrolloService,
    pub usuario_service: UsuarioService,
    pub document_service: DocumentService,
}

impl AppState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
        Ok(Self::from_pool(db_pool, config))
    }

    /// Monta o gráfico de dependências sobre um pool já criado.
    pub fn from_pool(db_pool: PgPool, config: AppConfig) -> Self {
        let usuario_repo = UsuarioRepository::new(db_pool.clone());
        let solicitud_repo = SolicitudRepository::new(db_pool.clone());
        let cliente_repo = ClienteRepository::new(db_pool.clone());
        let desarrollo_repo = DesarrolloRepository::new(db_pool.clone());
        let contrato_repo = ContratoRepository::new(db_pool.clone());
        let parametros_repo = ParametrosRepository::new(db_pool.clone());

        let auth_service = AuthService::new(usuario_repo.clone(), config.jwt_secret.clone(), config.session_hours);
        let solicitud_service = SolicitudService::new(
            solicitud_repo.clone(),
            cliente_repo.clone(),
            desarrollo_repo.clone(),
            parametros_repo.clone(),
        );
        let contrato_service =
            ContratoService::new(contrato_repo, cliente_repo.clone(), desarrollo_repo.clone(), solicitud_repo);
        let cliente_service = ClienteService::new(cliente_repo);
        let desarrollo_service = DesarrolloService::new(desarrollo_repo, parametros_repo.clone());
        let usuario_service = UsuarioService::new(usuario_repo);
        let document_service = DocumentService::new(parametros_repo, config.templates_dir.clone());

        Self {
            db_pool,
            config: Arc::new(config),
            i18n_store: Arc::new(I18nStore::new()),
            auth_service,
            solicitud_service,
            contrato_service,
            cliente_service,
            desarrollo_service,
            usuario_service,
            document_service,
        }
    }
}
