// src/services/permissions.rs

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{auth::Role, grid::MenuItem};

/// O que um papel pode fazer. Calculado num único lugar e usado pelo menu,
/// pelas grades e por todos os guardiões HTTP.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub can_view_clientes: bool,
    pub can_manage_contratos: bool,
    pub can_manage_desarrollos: bool,
    pub can_configure_parametros: bool,
    pub can_manage_usuarios: bool,
    pub can_use_console: bool,
    /// Revisa, aprova, devolve e cancela solicitações.
    pub is_gestor: bool,
    /// Pode cancelar uma solicitação já vinculada a contrato.
    pub can_cancel_linked: bool,
}

pub fn capabilities_for(role: Role) -> Capabilities {
    match role {
        Role::User => Capabilities::default(),
        Role::Moderator => Capabilities {
            can_view_clientes: true,
            can_manage_contratos: true,
            is_gestor: true,
            ..Capabilities::default()
        },
        Role::Senior => Capabilities {
            can_view_clientes: true,
            can_manage_contratos: true,
            can_manage_desarrollos: true,
            is_gestor: true,
            ..Capabilities::default()
        },
        Role::Owner => Capabilities {
            can_view_clientes: true,
            can_manage_contratos: true,
            can_manage_desarrollos: true,
            can_configure_parametros: true,
            can_manage_usuarios: true,
            can_use_console: false,
            is_gestor: true,
            can_cancel_linked: true,
        },
        Role::Admin => Capabilities {
            can_view_clientes: true,
            can_manage_contratos: true,
            can_manage_desarrollos: true,
            can_configure_parametros: true,
            can_manage_usuarios: true,
            can_use_console: true,
            is_gestor: true,
            can_cancel_linked: true,
        },
    }
}

/// Papel desconhecido não ganha nada.
pub fn capabilities(role: &str) -> Capabilities {
    Role::parse(role).map(capabilities_for).unwrap_or_default()
}

/// Uma capacidade exigível por rota.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    ViewClientes,
    ManageContratos,
    ManageDesarrollos,
    ConfigureParametros,
    ManageUsuarios,
    UseConsole,
    Gestor,
}

impl Capability {
    pub fn slug(self) -> &'static str {
        match self {
            Capability::ViewClientes => "clientes",
            Capability::ManageContratos => "contratos",
            Capability::ManageDesarrollos => "desarrollos",
            Capability::ConfigureParametros => "parametros",
            Capability::ManageUsuarios => "usuarios",
            Capability::UseConsole => "consola",
            Capability::Gestor => "gestion",
        }
    }
}

impl Capabilities {
    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::ViewClientes => self.can_view_clientes,
            Capability::ManageContratos => self.can_manage_contratos,
            Capability::ManageDesarrollos => self.can_manage_desarrollos,
            Capability::ConfigureParametros => self.can_configure_parametros,
            Capability::ManageUsuarios => self.can_manage_usuarios,
            Capability::UseConsole => self.can_use_console,
            Capability::Gestor => self.is_gestor,
        }
    }
}

/// Menu de navegação. Solicitudes aparece para qualquer usuário autenticado.
pub fn build_menu(caps: &Capabilities) -> Vec<MenuItem> {
    let entries: [(bool, MenuItem); 8] = [
        (true, MenuItem { ruta: "inicio", etiqueta: "Inicio", icono: "fa-home" }),
        (true, MenuItem { ruta: "solicitudes", etiqueta: "Solicitudes", icono: "fa-file-signature" }),
        (caps.can_view_clientes, MenuItem { ruta: "clientes", etiqueta: "Clientes", icono: "fa-users" }),
        (caps.can_manage_contratos, MenuItem { ruta: "contratos", etiqueta: "Contratos", icono: "fa-file-contract" }),
        (caps.can_manage_desarrollos, MenuItem { ruta: "desarrollos", etiqueta: "Desarrollos", icono: "fa-city" }),
        (caps.can_configure_parametros, MenuItem { ruta: "parametros", etiqueta: "Parámetros", icono: "fa-sliders-h" }),
        (caps.can_manage_usuarios, MenuItem { ruta: "usuarios", etiqueta: "Usuarios", icono: "fa-user-shield" }),
        (caps.can_use_console, MenuItem { ruta: "consola", etiqueta: "Consola", icono: "fa-terminal" }),
    ];

    entries
        .into_iter()
        .filter_map(|(visible, item)| visible.then_some(item))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_user_has_nothing() {
        assert_eq!(capabilities("user"), Capabilities::default());
    }

    #[test]
    fn unknown_role_has_nothing() {
        assert_eq!(capabilities("root"), Capabilities::default());
        assert_eq!(capabilities(""), Capabilities::default());
    }

    #[test]
    fn every_non_user_role_is_gestor() {
        for role in ["moderator", "senior", "owner", "admin"] {
            assert!(capabilities(role).is_gestor, "{role}");
        }
    }

    #[test]
    fn only_owner_and_admin_cancel_linked() {
        assert!(!capabilities("moderator").can_cancel_linked);
        assert!(!capabilities("senior").can_cancel_linked);
        assert!(capabilities("owner").can_cancel_linked);
        assert!(capabilities("admin").can_cancel_linked);
    }

    #[test]
    fn console_is_admin_only() {
        assert!(!capabilities("owner").can_use_console);
        assert!(capabilities("admin").can_use_console);
    }

    #[test]
    fn senior_manages_desarrollos_but_not_usuarios() {
        let caps = capabilities("senior");
        assert!(caps.allows(Capability::ManageDesarrollos));
        assert!(!caps.allows(Capability::ManageUsuarios));
        assert!(!caps.allows(Capability::ConfigureParametros));
    }

    #[test]
    fn menu_follows_capabilities() {
        let rutas = |role: &str| -> Vec<&'static str> {
            build_menu(&capabilities(role)).into_iter().map(|m| m.ruta).collect()
        };
        assert_eq!(rutas("user"), vec!["inicio", "solicitudes"]);
        assert_eq!(rutas("moderator"), vec!["inicio", "solicitudes", "clientes", "contratos"]);
        assert_eq!(rutas("admin").len(), 8);
    }
}
