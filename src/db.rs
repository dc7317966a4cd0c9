pub mod usuario_repo;
pub use usuario_repo::UsuarioRepository;
pub mod solicitud_repo;
pub use solicitud_repo::SolicitudRepository;
pub mod cliente_repo;
pub use cliente_repo::ClienteRepository;
pub mod desarrollo_repo;
pub use desarrollo_repo::DesarrolloRepository;
pub mod contrato_repo;
pub use contrato_repo::ContratoRepository;
pub mod parametros_repo;
pub use parametros_repo::ParametrosRepository;
