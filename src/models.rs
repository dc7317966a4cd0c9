pub mod auth;
pub mod solicitud;
pub mod cliente;
pub mod desarrollo;
pub mod contrato;
pub mod parametros;
pub mod grid;
