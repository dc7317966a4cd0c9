// src/services/client_matching.rs

use async_trait::async_trait;

use crate::common::error::AppError;
use crate::models::cliente::{ClientMatch, Cliente, MatchReason};

/// Fonte dos candidatos. O repositório de clientes implementa; os testes usam um Vec.
#[async_trait]
pub trait ClienteLookup: Send + Sync {
    /// Clientes cujo RFC ou CURP coincide (sem diferenciar maiúsculas).
    async fn find_by_rfc_or_curp(&self, rfc: Option<&str>, curp: Option<&str>) -> Result<Vec<Cliente>, AppError>;
}

#[async_trait]
impl ClienteLookup for Vec<Cliente> {
    async fn find_by_rfc_or_curp(&self, rfc: Option<&str>, curp: Option<&str>) -> Result<Vec<Cliente>, AppError> {
        Ok(self
            .iter()
            .filter(|c| same(c.rfc.as_deref(), rfc) || same(c.curp.as_deref(), curp))
            .cloned()
            .collect())
    }
}

/// Entrada limpa: None para ausente ou só espaços.
pub fn clean_key(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_uppercase)
}

fn same(stored: Option<&str>, wanted: Option<&str>) -> bool {
    match (stored, wanted) {
        (Some(stored), Some(wanted)) => stored.trim().eq_ignore_ascii_case(wanted.trim()),
        _ => false,
    }
}

fn classify(cliente: &Cliente, rfc: Option<&str>, curp: Option<&str>) -> MatchReason {
    match (same(cliente.rfc.as_deref(), rfc), same(cliente.curp.as_deref(), curp)) {
        (true, true) => MatchReason::RfcYCurp,
        (true, false) => MatchReason::Rfc,
        (false, true) => MatchReason::Curp,
        (false, false) => MatchReason::DatosProporcionados,
    }
}

fn score(reason: MatchReason) -> u8 {
    match reason {
        MatchReason::RfcYCurp => 3,
        MatchReason::Rfc => 2,
        MatchReason::Curp => 1,
        MatchReason::DatosProporcionados => 0,
    }
}

/// Escolhe o candidato: quem bate nos dois campos vence, empate pelo menor id.
/// Não depende da ordem em que os candidatos chegam.
pub fn select_match(candidates: &[Cliente], rfc: Option<&str>, curp: Option<&str>) -> Option<ClientMatch> {
    candidates
        .iter()
        .map(|c| (c, classify(c, rfc, curp)))
        .min_by_key(|(c, reason)| (std::cmp::Reverse(score(*reason)), c.id))
        .map(|(c, reason)| ClientMatch { cliente: c.clone(), motivo: reason })
}

pub async fn find_matching_client<L>(lookup: &L, rfc: Option<&str>, curp: Option<&str>) -> Result<Option<ClientMatch>, AppError>
where
    L: ClienteLookup + ?Sized,
{
    let rfc = clean_key(rfc);
    let curp = clean_key(curp);

    if rfc.is_none() && curp.is_none() {
        return Ok(None);
    }

    let candidates = lookup.find_by_rfc_or_curp(rfc.as_deref(), curp.as_deref()).await?;
    let found = select_match(&candidates, rfc.as_deref(), curp.as_deref());

    if let Some(m) = &found {
        tracing::debug!(cliente_id = m.cliente.id, motivo = m.motivo.as_str(), "cliente existente encontrado");
    }
    Ok(found)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::models::cliente::ClienteEstado;
    use chrono::{TimeZone, Utc};

    pub fn cliente(id: i64, rfc: Option<&str>, curp: Option<&str>) -> Cliente {
        let t = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        Cliente {
            id,
            nombre: format!("Cliente {id}"),
            nacionalidad: None,
            rfc: rfc.map(String::from),
            curp: curp.map(String::from),
            ine: None,
            estado_civil: None,
            ocupacion: None,
            telefono: None,
            domicilio: None,
            email: None,
            beneficiario: None,
            estado: ClienteEstado::Activo,
            created_at: t,
            updated_at: t,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::cliente;
    use super::*;

    const CURP: &str = "PELJ800101HDFRPN09";

    fn base() -> Vec<Cliente> {
        vec![
            cliente(1, Some("ZZZZ900101ZZZ"), Some(CURP)),
            cliente(2, Some("ABCD800101AAA"), None),
            cliente(3, Some("ABCD800101AAA"), Some(CURP)),
            cliente(4, None, Some("OTRA800101HDFRPN01")),
        ]
    }

    #[tokio::test]
    async fn matches_rfc_case_insensitively() {
        let found = find_matching_client(&base(), Some("abcd800101aaa"), None).await.unwrap().unwrap();
        assert_eq!(found.cliente.id, 2);
        assert_eq!(found.motivo, MatchReason::Rfc);
    }

    #[tokio::test]
    async fn both_fields_beat_single_field() {
        let found = find_matching_client(&base(), Some("ABCD800101AAA"), Some(CURP)).await.unwrap().unwrap();
        assert_eq!(found.cliente.id, 3);
        assert_eq!(found.motivo, MatchReason::RfcYCurp);
    }

    #[tokio::test]
    async fn curp_only() {
        let found = find_matching_client(&base(), None, Some(" otra800101hdfrpn01 ")).await.unwrap().unwrap();
        assert_eq!(found.cliente.id, 4);
        assert_eq!(found.motivo, MatchReason::Curp);
    }

    #[tokio::test]
    async fn blank_input_never_searches() {
        assert!(find_matching_client(&base(), Some("  "), Some("")).await.unwrap().is_none());
        assert!(find_matching_client(&base(), None, None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn no_match() {
        assert!(find_matching_client(&base(), Some("NOPE000000NOP"), None).await.unwrap().is_none());
    }

    #[test]
    fn selection_ignores_candidate_order() {
        let mut candidates = base();
        let a = select_match(&candidates, Some("ABCD800101AAA"), None);
        candidates.reverse();
        let b = select_match(&candidates, Some("ABCD800101AAA"), None);
        assert_eq!(a, b);
        assert_eq!(a.map(|m| m.cliente.id), Some(2));
    }

    #[test]
    fn store_side_match_is_reported_generically() {
        let candidates = vec![cliente(9, Some("ABCD 800101 AAA"), None)];
        let found = select_match(&candidates, Some("ABCD800101AAA"), None).unwrap();
        assert_eq!(found.motivo, MatchReason::DatosProporcionados);
    }

    #[test]
    fn reason_labels() {
        assert_eq!(MatchReason::RfcYCurp.as_str(), "RFC y CURP");
        assert_eq!(
            serde_json::to_value(MatchReason::DatosProporcionados).unwrap(),
            serde_json::json!("los datos proporcionados")
        );
    }
}
