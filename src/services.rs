pub mod auth;
pub mod permissions;
pub mod solicitud_workflow;
pub mod prefill;
pub mod client_matching;
pub mod grid;
pub mod solicitud_service;
pub mod contrato_service;
pub mod cliente_service;
pub mod desarrollo_service;
pub mod usuario_service;
pub mod document_service;
