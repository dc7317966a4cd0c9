// src/common/i18n.rs

use std::collections::HashMap;

pub const DEFAULT_LANG: &str = "es";

// Tabelas de mensagens: (chave, texto). Parâmetros no formato {nome}.
const ES: &[(&str, &str)] = &[
    ("error.validacion", "Uno o más campos son inválidos."),
    ("error.credenciales", "Correo o contraseña incorrectos."),
    ("error.sesion_expirada", "Tu sesión expiró. Recarga la página e inicia sesión de nuevo."),
    ("error.permiso", "No tienes permiso para realizar esta acción."),
    ("error.contrato_cancelado", "El contrato está cancelado y no puede modificarse."),
    ("error.solicitud_no_convertible", "Solo una solicitud aprobada y sin contrato puede convertirse en contrato."),
    ("error.sin_lotes", "El desarrollo no tiene lotes disponibles."),
    ("error.conflicto_version", "El registro fue modificado por otro usuario. Recarga e intenta de nuevo."),
    ("error.duplicado", "Ya existe un registro con esos datos."),
    ("error.plantilla", "No se encontró la plantilla {plantilla}."),
    ("error.interno", "Ocurrió un error inesperado."),
    ("no_encontrado.solicitud", "Solicitud no encontrada"),
    ("no_encontrado.contrato", "Contrato no encontrado"),
    ("no_encontrado.cliente", "Cliente no encontrado"),
    ("no_encontrado.desarrollo", "Desarrollo no encontrado"),
    ("no_encontrado.usuario", "Usuario no encontrado"),
    ("no_encontrado.ruta", "La página solicitada no existe"),
    ("workflow.vinculada_contrato", "La solicitud está vinculada a un contrato y no puede modificarse."),
    ("workflow.sin_permiso", "No tienes permiso para {accion} esta solicitud."),
    ("workflow.transicion_invalida", "No es posible pasar la solicitud de {desde} a {hacia}."),
    ("workflow.motivo_requerido", "El motivo es obligatorio (mínimo {minimo} caracteres)."),
    ("workflow.no_editable", "La solicitud no puede editarse en estado {estado}."),
    ("workflow.estado_no_permitido", "El estado {estado} no es un destino válido."),
    ("required", "Este campo es obligatorio."),
    ("email_invalido", "El correo no es válido."),
    ("password_corto", "La contraseña debe tener al menos 8 caracteres."),
    ("rol_invalido", "El rol indicado no existe."),
    ("rfc_invalido", "El RFC debe tener 12 o 13 caracteres."),
    ("curp_invalida", "La CURP debe tener 18 caracteres."),
    ("motivo_corto", "El motivo debe tener al menos 5 caracteres."),
    ("cliente_requerido", "Indica un cliente existente o captura los datos de uno nuevo."),
    ("valor_negativo", "El valor no puede ser negativo."),
    ("lotes_excedidos", "Los lotes disponibles no pueden superar el total."),
];

const EN: &[(&str, &str)] = &[
    ("error.validacion", "One or more fields are invalid."),
    ("error.credenciales", "Invalid email or password."),
    ("error.sesion_expirada", "Your session expired. Reload the page and sign in again."),
    ("error.permiso", "You are not allowed to perform this action."),
    ("error.contrato_cancelado", "The contract is cancelled and cannot be modified."),
    ("error.solicitud_no_convertible", "Only an approved, unlinked request can become a contract."),
    ("error.sin_lotes", "The development has no lots available."),
    ("error.conflicto_version", "The record was modified by another user. Reload and try again."),
    ("error.duplicado", "A record with that data already exists."),
    ("error.plantilla", "Template {plantilla} was not found."),
    ("error.interno", "An unexpected error occurred."),
    ("no_encontrado.solicitud", "Request not found"),
    ("no_encontrado.contrato", "Contract not found"),
    ("no_encontrado.cliente", "Client not found"),
    ("no_encontrado.desarrollo", "Development not found"),
    ("no_encontrado.usuario", "User not found"),
    ("no_encontrado.ruta", "The requested page does not exist"),
    ("workflow.vinculada_contrato", "The request is linked to a contract and cannot be modified."),
    ("workflow.sin_permiso", "You are not allowed to {accion} this request."),
    ("workflow.transicion_invalida", "The request cannot move from {desde} to {hacia}."),
    ("workflow.motivo_requerido", "A reason is required (at least {minimo} characters)."),
    ("workflow.no_editable", "The request cannot be edited while {estado}."),
    ("workflow.estado_no_permitido", "{estado} is not a valid target state."),
    ("required", "This field is required."),
    ("email_invalido", "Invalid email address."),
    ("password_corto", "Password must be at least 8 characters long."),
    ("rol_invalido", "Unknown role."),
    ("motivo_corto", "The reason must be at least 5 characters long."),
    ("cliente_requerido", "Pick an existing client or enter a new one."),
    ("lotes_excedidos", "Available lots cannot exceed the total."),
];

const PT: &[(&str, &str)] = &[
    ("error.validacion", "Um ou mais campos são inválidos."),
    ("error.credenciales", "E-mail ou senha inválidos."),
    ("error.sesion_expirada", "Sua sessão expirou. Recarregue a página e entre novamente."),
    ("error.permiso", "Você não tem permissão para realizar esta ação."),
    ("error.interno", "Ocorreu um erro inesperado."),
    ("no_encontrado.solicitud", "Solicitação não encontrada"),
    ("no_encontrado.contrato", "Contrato não encontrado"),
    ("no_encontrado.cliente", "Cliente não encontrado"),
];

/// Catálogo de mensagens por idioma. Idioma desconhecido cai no espanhol,
/// chave desconhecida devolve a própria chave.
#[derive(Debug, Clone)]
pub struct I18nStore {
    messages: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

impl I18nStore {
    pub fn new() -> Self {
        let mut messages = HashMap::new();
        messages.insert("es", ES.iter().copied().collect());
        messages.insert("en", EN.iter().copied().collect());
        messages.insert("pt", PT.iter().copied().collect());
        Self { messages }
    }

    pub fn translate(&self, lang: &str, key: &str, params: &[(&str, String)]) -> String {
        let template = self
            .messages
            .get(lang)
            .and_then(|table| table.get(key))
            .or_else(|| self.messages.get(DEFAULT_LANG).and_then(|table| table.get(key)))
            .copied()
            .unwrap_or(key);

        params.iter().fold(template.to_string(), |acc, (name, value)| {
            acc.replace(&format!("{{{}}}", name), value)
        })
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_spanish_then_key() {
        let store = I18nStore::new();
        assert_eq!(store.translate("pt", "error.sin_lotes", &[]), "El desarrollo no tiene lotes disponibles.");
        assert_eq!(store.translate("fr", "error.permiso", &[]), "No tienes permiso para realizar esta acción.");
        assert_eq!(store.translate("es", "clave.inexistente", &[]), "clave.inexistente");
    }

    #[test]
    fn translations_only_cover_spanish_keys() {
        let es: Vec<&str> = ES.iter().map(|(k, _)| *k).collect();
        for (k, _) in EN.iter().chain(PT) {
            assert!(es.contains(k), "chave sem texto em espanhol: {k}");
        }
        assert!(!es.contains(&"csrf_ausente"));
    }

    #[test]
    fn replaces_named_params() {
        let store = I18nStore::new();
        let msg = store.translate(
            "en",
            "workflow.transicion_invalida",
            &[("desde", "draft".into()), ("hacia", "approved".into())],
        );
        assert_eq!(msg, "The request cannot move from draft to approved.");
    }
}
