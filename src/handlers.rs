pub mod auth;
pub mod solicitudes;
pub mod contratos;
pub mod clientes;
pub mod desarrollos;
pub mod parametros;
pub mod usuarios;
pub mod navigation;
