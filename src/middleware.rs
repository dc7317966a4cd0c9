pub mod auth;
pub mod csrf;
pub mod i18n;
pub mod rbac;
