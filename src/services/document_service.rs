// src/services/document_service.rs
//
// Geração do contrato em DOCX: abre a plantilla do desarrollo, troca os
// `${CHAVE}` do corpo, cabeçalhos e rodapés e copia o resto sem tocar.

use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};
use std::path::PathBuf;

use sqlx::PgPool;
use zip::{write::SimpleFileOptions, CompressionMethod, ZipArchive, ZipWriter};

use crate::{
    common::error::AppError,
    db::ParametrosRepository,
    models::{contrato::Contrato, parametros::Parametros},
    services::prefill::money,
};

pub const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Documento pronto para download.
#[derive(Debug)]
pub struct Documento {
    pub nombre: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct DocumentService {
    parametros_repo: ParametrosRepository,
    templates_dir: PathBuf,
}

fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// Valores de substituição a partir do snapshot + dados da empresa.
pub fn placeholders(contrato: &Contrato, parametros: &Parametros) -> BTreeMap<&'static str, String> {
    let snap = &contrato.datta_contrato.0;
    let c = &snap.cliente;
    let d = &snap.desarrollo;
    let t = &snap.terminos;
    let albacea = t.albacea.clone().unwrap_or_default();

    BTreeMap::from([
        ("FOLIO", contrato.folio.clone()),
        ("FECHA_CONTRATO", contrato.created_at.format("%d/%m/%Y").to_string()),
        ("CLIENTE_NOMBRE", c.nombre.clone()),
        ("CLIENTE_NACIONALIDAD", opt(&c.nacionalidad)),
        ("CLIENTE_RFC", opt(&c.rfc)),
        ("CLIENTE_CURP", opt(&c.curp)),
        ("CLIENTE_INE", opt(&c.ine)),
        ("CLIENTE_ESTADO_CIVIL", opt(&c.estado_civil)),
        ("CLIENTE_OCUPACION", opt(&c.ocupacion)),
        ("CLIENTE_TELEFONO", opt(&c.telefono)),
        ("CLIENTE_DOMICILIO", opt(&c.domicilio)),
        ("CLIENTE_EMAIL", opt(&c.email)),
        ("CLIENTE_BENEFICIARIO", opt(&c.beneficiario)),
        ("DESARROLLO_NOMBRE", d.nombre.clone()),
        ("TIPO_CONTRATO", d.tipo_contrato.clone()),
        ("DESARROLLO_UBICACION", opt(&d.ubicacion)),
        ("CLAVE_CATASTRAL", opt(&d.clave_catastral)),
        ("LOTE", opt(&t.lote)),
        ("MANZANA", opt(&t.manzana)),
        ("SUPERFICIE", money(t.superficie)),
        ("PRECIO_TOTAL", money(t.precio_total)),
        ("ENGANCHE", money(t.enganche)),
        ("SALDO", money(t.saldo)),
        ("PLAZO_MESES", t.plazo_meses.filter(|m| *m > 0).map(|m| m.to_string()).unwrap_or_default()),
        ("MENSUALIDAD", money(t.mensualidad)),
        ("FECHA_FIRMA", t.fecha_firma.map(|f| f.format("%d/%m/%Y").to_string()).unwrap_or_default()),
        ("DICE_SER", opt(&t.dice_ser)),
        ("ALBACEA_NOMBRE", albacea.nombre),
        ("ALBACEA_CELULAR", opt(&albacea.celular)),
        ("ALBACEA_PARENTESCO", opt(&albacea.parentesco)),
        ("OBSERVACIONES", opt(&t.observaciones)),
        ("EMPRESA_NOMBRE", opt(&parametros.empresa_nombre)),
        ("REPRESENTANTE_LEGAL", opt(&parametros.representante_legal)),
        ("EMPRESA_DOMICILIO", opt(&parametros.empresa_domicilio)),
        ("EMPRESA_RFC", opt(&parametros.empresa_rfc)),
        ("CIUDAD_FIRMA", opt(&parametros.ciudad_firma)),
    ])
}

pub fn xml_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Troca `${CHAVE}` conhecidas; as desconhecidas ficam como estão.
pub fn substitute(xml: &str, values: &BTreeMap<&'static str, String>) -> String {
    let mut out = String::with_capacity(xml.len());
    let mut rest = xml;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let key = &after[..end];
                match values.get(key) {
                    Some(value) => out.push_str(&xml_escape(value)),
                    None => {
                        out.push_str("${");
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// O Word divide um `${CHAVE}` digitado em vários runs
/// (`<w:t>${</w:t></w:r><w:r><w:t>FOLIO}</w:t>`). Remove as tags dentro do
/// marcador para que `substitute` o encontre inteiro.
pub fn join_split_placeholders(xml: &str) -> String {
    let mut out = String::with_capacity(xml.len());
    let mut rest = xml;

    while let Some(dollar) = rest.find('$') {
        out.push_str(&rest[..dollar]);
        let after = &rest[dollar + 1..];
        match read_placeholder(after) {
            Some((key, consumed)) => {
                out.push_str("${");
                out.push_str(&key);
                out.push('}');
                rest = &after[consumed..];
            }
            None => {
                out.push('$');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

// `{CHAVE}` logo após o `$`, ignorando tags. Devolve a chave e os bytes consumidos.
fn read_placeholder(s: &str) -> Option<(String, usize)> {
    let mut i = skip_tags(s, 0)?;
    if !s[i..].starts_with('{') {
        return None;
    }
    i += 1;

    let mut key = String::new();
    loop {
        i = skip_tags(s, i)?;
        let next = s[i..].find(|c: char| c == '<' || c == '}' || c == '$')?;
        key.push_str(&s[i..i + next]);
        i += next;
        if s[i..].starts_with('}') {
            return Some((key, i + 1));
        }
        if s[i..].starts_with('$') {
            return None;
        }
    }
}

fn skip_tags(s: &str, mut i: usize) -> Option<usize> {
    while s[i..].starts_with('<') {
        i += s[i..].find('>')? + 1;
    }
    Some(i)
}

// Partes do pacote com texto visível
fn is_content_part(name: &str) -> bool {
    name == "word/document.xml"
        || (name.starts_with("word/header") && name.ends_with(".xml"))
        || (name.starts_with("word/footer") && name.ends_with(".xml"))
}

pub fn render_docx(template: &[u8], values: &BTreeMap<&'static str, String>) -> Result<Vec<u8>, AppError> {
    let mut archive = ZipArchive::new(Cursor::new(template))?;
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let name = file.name().to_string();

        if is_content_part(&name) {
            let mut xml = String::new();
            file.read_to_string(&mut xml)?;
            writer.start_file(name, options)?;
            writer.write_all(substitute(&join_split_placeholders(&xml), values).as_bytes())?;
        } else {
            writer.raw_copy_file(file)?;
        }
    }

    Ok(writer.finish()?.into_inner())
}

impl DocumentService {
    pub fn new(parametros_repo: ParametrosRepository, templates_dir: PathBuf) -> Self {
        Self { parametros_repo, templates_dir }
    }

    pub async fn render_contrato(&self, pool: &PgPool, contrato: &Contrato) -> Result<Documento, AppError> {
        let plantilla = contrato.datta_contrato.0.desarrollo.plantilla.clone();
        let path = self.templates_dir.join(format!("{}.docx", plantilla));

        let template = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "plantilla no encontrada");
                return Err(AppError::TemplateNotFound(plantilla));
            }
            Err(e) => return Err(e.into()),
        };

        let parametros = self.parametros_repo.get(pool).await?;
        let values = placeholders(contrato, &parametros);

        // zip é síncrono
        let bytes = tokio::task::spawn_blocking(move || render_docx(&template, &values))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de geração do DOCX: {}", e))??;

        tracing::info!(contrato_id = contrato.id, plantilla = %plantilla, bytes = bytes.len(), "documento generado");
        Ok(Documento { nombre: format!("{}.docx", contrato.folio), bytes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> Vec<u8> {
        let mut w = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        w.start_file("[Content_Types].xml", options).unwrap();
        w.write_all(b"<Types/>").unwrap();
        w.start_file("word/document.xml", options).unwrap();
        w.write_all(b"<w:t>Contrato ${FOLIO} de ${CLIENTE_NOMBRE}, ${DESCONOCIDA}</w:t>").unwrap();
        w.start_file("word/footer1.xml", options).unwrap();
        w.write_all(b"<w:t>${EMPRESA_NOMBRE}</w:t>").unwrap();
        w.start_file("word/media/image1.png", options).unwrap();
        w.write_all(&[0x89, b'P', b'N', b'G', b'$', b'{', b'X', b'}']).unwrap();
        w.finish().unwrap().into_inner()
    }

    fn read(doc: &[u8], name: &str) -> Vec<u8> {
        let mut archive = ZipArchive::new(Cursor::new(doc)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut out = Vec::new();
        file.read_to_end(&mut out).unwrap();
        out
    }

    fn values() -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("FOLIO", "CTR-2026-00007".to_string()),
            ("CLIENTE_NOMBRE", "Pérez & Hijos <SA>".to_string()),
            ("EMPRESA_NOMBRE", "Grupo Argus".to_string()),
        ])
    }

    #[test]
    fn replaces_body_and_footer_and_escapes() {
        let doc = render_docx(&template(), &values()).unwrap();
        let body = String::from_utf8(read(&doc, "word/document.xml")).unwrap();
        assert_eq!(
            body,
            "<w:t>Contrato CTR-2026-00007 de Pérez &amp; Hijos &lt;SA&gt;, ${DESCONOCIDA}</w:t>"
        );
        let footer = String::from_utf8(read(&doc, "word/footer1.xml")).unwrap();
        assert_eq!(footer, "<w:t>Grupo Argus</w:t>");
    }

    #[test]
    fn other_parts_are_copied_untouched() {
        let doc = render_docx(&template(), &values()).unwrap();
        assert_eq!(read(&doc, "word/media/image1.png"), vec![0x89, b'P', b'N', b'G', b'$', b'{', b'X', b'}']);
        assert_eq!(read(&doc, "[Content_Types].xml"), b"<Types/>".to_vec());
    }

    #[test]
    fn unterminated_placeholder_is_kept() {
        assert_eq!(substitute("a ${FOLIO", &values()), "a ${FOLIO");
        assert_eq!(substitute("${FOLIO}${FOLIO}", &values()), "CTR-2026-00007CTR-2026-00007");
    }

    #[test]
    fn placeholder_split_across_runs_is_replaced() {
        let mut w = ZipWriter::new(Cursor::new(Vec::new()));
        w.start_file("word/document.xml", SimpleFileOptions::default()).unwrap();
        w.write_all(b"<w:r><w:t>${</w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>FOL</w:t></w:r><w:r><w:t>IO}</w:t></w:r>")
            .unwrap();
        let template = w.finish().unwrap().into_inner();

        let doc = render_docx(&template, &values()).unwrap();
        let body = String::from_utf8(read(&doc, "word/document.xml")).unwrap();
        assert_eq!(body, "<w:r><w:t>CTR-2026-00007</w:t></w:r>");
    }

    #[test]
    fn dollar_and_brace_in_separate_runs_are_joined() {
        let xml = "<w:t>$</w:t></w:r><w:r><w:t>{FOLIO}</w:t>";
        assert_eq!(join_split_placeholders(xml), "<w:t>${FOLIO}</w:t>");
    }

    #[test]
    fn plain_text_dollars_are_left_alone() {
        let xml = "<w:t>Total $350,000 ${FOLIO} $</w:t><w:t>x ${SIN_CIERRE</w:t>";
        assert_eq!(join_split_placeholders(xml), xml);
    }

    #[test]
    fn invalid_template_is_an_error() {
        assert!(matches!(render_docx(b"not a zip", &values()), Err(AppError::DocxError(_))));
    }
}
