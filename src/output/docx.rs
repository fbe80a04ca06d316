//! DOCX Package Module
//!
//! 1段落だけを含む最小構成のWordprocessingMLパッケージを書き出し、
//! また既存の`.docx`から段落テキストを読み戻す。

use chrono::{DateTime, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::fmt::Display;
use std::io::{Read, Seek, Write};
use tracing::debug;
use zip::write::{FileOptions, ZipWriter};
use zip::{CompressionMethod, ZipArchive};

use crate::error::XlsxToDocxError;
use crate::security::SecurityConfig;

const NS_WORDPROCESSING: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const NS_RELATIONSHIPS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_CORE_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/package/2006/metadata/core-properties";
const NS_EXTENDED_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties";

const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_CORE_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
const REL_EXTENDED_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";

const CT_RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
const CT_DOCUMENT: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
const CT_CORE_PROPERTIES: &str = "application/vnd.openxmlformats-package.core-properties+xml";
const CT_EXTENDED_PROPERTIES: &str =
    "application/vnd.openxmlformats-officedocument.extended-properties+xml";

/// 本文パーツのパス
const DOCUMENT_PART: &str = "word/document.xml";

/// 文書プロパティに記録するアプリケーション名
const APPLICATION: &str = "xlsxdocx";

/// DOCXライター
///
/// `[Content_Types].xml`、`_rels/.rels`、`word/document.xml`、
/// `docProps/core.xml`、`docProps/app.xml`の5パーツを書き出します。
#[derive(Debug, Clone)]
pub struct DocxWriter {
    /// 文書の作成日時（`docProps/core.xml`）
    created: DateTime<Utc>,
}

impl Default for DocxWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DocxWriter {
    /// 作成日時を現在時刻としてライターを生成
    pub fn new() -> Self {
        Self {
            created: Utc::now(),
        }
    }

    /// 作成日時を指定する
    pub fn with_created(mut self, created: DateTime<Utc>) -> Self {
        self.created = created;
        self
    }

    /// `text`を1段落として書き出す
    ///
    /// # 引数
    ///
    /// * `text` - 段落のテキスト（書式なし）
    /// * `output` - 出力先（Write + Seekトレイトを実装）
    ///
    /// # 戻り値
    ///
    /// * `Ok(W)` - 書き込みが完了した出力先
    /// * `Err(XlsxToDocxError)` - ZIPまたはXMLの生成に失敗した場合
    pub fn write<W: Write + Seek>(&self, text: &str, output: W) -> Result<W, XlsxToDocxError> {
        let parts = [
            ("[Content_Types].xml", content_types_xml()?),
            ("_rels/.rels", package_rels_xml()?),
            (DOCUMENT_PART, document_xml(text)?),
            ("docProps/core.xml", core_properties_xml(&self.created)?),
            ("docProps/app.xml", app_properties_xml()?),
        ];

        let mut zip = ZipWriter::new(output);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        for (name, content) in parts.iter() {
            zip.start_file(*name, options).map_err(zip_error)?;
            zip.write_all(content)?;
        }
        let output = zip.finish().map_err(zip_error)?;

        debug!(chars = text.chars().count(), "docx package written");
        Ok(output)
    }
}

/// `.docx`から、本文のすべての段落テキストを文書順に読み出す
///
/// `w:t`のテキストを段落（`w:p`）単位で連結します。`w:tab`はタブ、
/// `w:br`は改行として扱います。
pub fn read_paragraphs<R: Read + Seek>(reader: R) -> Result<Vec<String>, XlsxToDocxError> {
    let mut archive = ZipArchive::new(reader).map_err(zip_error)?;
    SecurityConfig::default().check_archive(&mut archive)?;

    let mut xml_content = Vec::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(zip_error)?
        .read_to_end(&mut xml_content)?;

    let mut reader = Reader::from_reader(xml_content.as_slice());
    let mut buf = Vec::new();
    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:p" => current = Some(String::new()),
                b"w:t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match (e.name().as_ref(), current.as_mut()) {
                (b"w:p", _) => paragraphs.push(String::new()),
                (b"w:tab", Some(paragraph)) => paragraph.push('\t'),
                (b"w:br", Some(paragraph)) => paragraph.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if let (true, Some(paragraph)) = (in_text, current.as_mut()) {
                    let text = e.unescape().map_err(xml_error)?;
                    paragraph.push_str(&text);
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => {
                    if let Some(paragraph) = current.take() {
                        paragraphs.push(paragraph);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs)
}

/// quick-xmlの`Writer`の薄いラッパー
struct XmlPart {
    writer: Writer<Vec<u8>>,
}

impl XmlPart {
    fn new() -> Result<Self, XlsxToDocxError> {
        let mut writer = Writer::new(Vec::new());
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(xml_error)?;
        Ok(Self { writer })
    }

    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), XlsxToDocxError> {
        let element = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.writer
            .write_event(Event::Start(element))
            .map_err(xml_error)
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), XlsxToDocxError> {
        let element = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.writer
            .write_event(Event::Empty(element))
            .map_err(xml_error)
    }

    fn text(&mut self, text: &str) -> Result<(), XlsxToDocxError> {
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_error)
    }

    fn end(&mut self, name: &str) -> Result<(), XlsxToDocxError> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_error)
    }

    /// `<name attrs>text</name>`
    fn text_element(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
        text: &str,
    ) -> Result<(), XlsxToDocxError> {
        self.start(name, attrs)?;
        self.text(text)?;
        self.end(name)
    }

    fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

fn content_types_xml() -> Result<Vec<u8>, XlsxToDocxError> {
    let mut xml = XmlPart::new()?;
    xml.start("Types", &[("xmlns", NS_CONTENT_TYPES)])?;
    xml.empty(
        "Default",
        &[("Extension", "rels"), ("ContentType", CT_RELATIONSHIPS)],
    )?;
    xml.empty(
        "Default",
        &[("Extension", "xml"), ("ContentType", "application/xml")],
    )?;
    for (part, content_type) in [
        ("/word/document.xml", CT_DOCUMENT),
        ("/docProps/core.xml", CT_CORE_PROPERTIES),
        ("/docProps/app.xml", CT_EXTENDED_PROPERTIES),
    ] {
        xml.empty(
            "Override",
            &[("PartName", part), ("ContentType", content_type)],
        )?;
    }
    xml.end("Types")?;
    Ok(xml.finish())
}

fn package_rels_xml() -> Result<Vec<u8>, XlsxToDocxError> {
    let mut xml = XmlPart::new()?;
    xml.start("Relationships", &[("xmlns", NS_RELATIONSHIPS)])?;
    for (id, rel_type, target) in [
        ("rId1", REL_OFFICE_DOCUMENT, DOCUMENT_PART),
        ("rId2", REL_CORE_PROPERTIES, "docProps/core.xml"),
        ("rId3", REL_EXTENDED_PROPERTIES, "docProps/app.xml"),
    ] {
        xml.empty(
            "Relationship",
            &[("Id", id), ("Type", rel_type), ("Target", target)],
        )?;
    }
    xml.end("Relationships")?;
    Ok(xml.finish())
}

/// 段落テキストを`w:document`に変換する
///
/// 改行（`\r\n` / `\r` / `\n`）は`w:br`、タブは`w:tab`として書き出します。
/// XML 1.0で使えない文字を含む場合は`XlsxToDocxError::Xml`を返します。
fn document_xml(text: &str) -> Result<Vec<u8>, XlsxToDocxError> {
    if let Some((position, c)) = text.char_indices().find(|&(_, c)| !is_xml_char(c)) {
        return Err(XlsxToDocxError::Xml(format!(
            "character U+{:04X} at byte {} is not allowed in XML",
            c as u32, position
        )));
    }
    let text = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut xml = XmlPart::new()?;
    xml.start("w:document", &[("xmlns:w", NS_WORDPROCESSING)])?;
    xml.start("w:body", &[])?;
    xml.start("w:p", &[])?;
    xml.start("w:r", &[])?;

    let mut segment = String::new();
    for c in text.chars() {
        let separator = match c {
            '\n' => "w:br",
            '\t' => "w:tab",
            _ => {
                segment.push(c);
                continue;
            }
        };
        write_text(&mut xml, &segment)?;
        segment.clear();
        xml.empty(separator, &[])?;
    }
    write_text(&mut xml, &segment)?;

    xml.end("w:r")?;
    xml.end("w:p")?;
    xml.end("w:body")?;
    xml.end("w:document")?;
    Ok(xml.finish())
}

/// `w:t`を1つ書き出す（空文字列の場合は何もしない）
fn write_text(xml: &mut XmlPart, text: &str) -> Result<(), XlsxToDocxError> {
    if text.is_empty() {
        return Ok(());
    }
    // 先頭・末尾の空白を保持する
    xml.text_element("w:t", &[("xml:space", "preserve")], text)
}

/// XML 1.0の`Char`に含まれる文字か
fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\r'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

fn core_properties_xml(created: &DateTime<Utc>) -> Result<Vec<u8>, XlsxToDocxError> {
    let timestamp = created.format("%Y-%m-%dT%H:%M:%SZ").to_string();
    let w3cdtf = [("xsi:type", "dcterms:W3CDTF")];

    let mut xml = XmlPart::new()?;
    xml.start(
        "cp:coreProperties",
        &[
            ("xmlns:cp", NS_CORE_PROPERTIES),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;
    xml.text_element("dc:creator", &[], APPLICATION)?;
    xml.text_element("dcterms:created", &w3cdtf, &timestamp)?;
    xml.text_element("dcterms:modified", &w3cdtf, &timestamp)?;
    xml.end("cp:coreProperties")?;
    Ok(xml.finish())
}

fn app_properties_xml() -> Result<Vec<u8>, XlsxToDocxError> {
    let mut xml = XmlPart::new()?;
    xml.start("Properties", &[("xmlns", NS_EXTENDED_PROPERTIES)])?;
    xml.text_element("Application", &[], APPLICATION)?;
    xml.end("Properties")?;
    Ok(xml.finish())
}

fn zip_error<E: Display>(e: E) -> XlsxToDocxError {
    XlsxToDocxError::Zip(e.to_string())
}

fn xml_error<E: Display>(e: E) -> XlsxToDocxError {
    XlsxToDocxError::Xml(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Cursor;

    fn write_to_memory(text: &str) -> Vec<u8> {
        DocxWriter::new()
            .write(text, Cursor::new(Vec::new()))
            .unwrap()
            .into_inner()
    }

    fn part(docx: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(docx)).unwrap();
        let mut content = String::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        content
    }

    #[test]
    fn test_package_contains_required_parts() {
        let docx = write_to_memory("INGREDIENTS: a.");
        let archive = ZipArchive::new(Cursor::new(docx.as_slice())).unwrap();
        let mut names: Vec<&str> = archive.file_names().collect();
        names.sort_unstable();
        assert_eq!(
            names,
            vec![
                "[Content_Types].xml",
                "_rels/.rels",
                "docProps/app.xml",
                "docProps/core.xml",
                "word/document.xml",
            ]
        );
    }

    #[test]
    fn test_document_xml_has_single_paragraph() {
        let docx = write_to_memory("INGREDIENTS: a, b.");
        let document = part(&docx, DOCUMENT_PART);
        assert_eq!(document.matches("<w:p>").count(), 1);
        assert!(document.contains(r#"<w:t xml:space="preserve">INGREDIENTS: a, b.</w:t>"#));
    }

    #[test]
    fn test_text_is_escaped() {
        let docx = write_to_memory("salt & <pepper>");
        let document = part(&docx, DOCUMENT_PART);
        assert!(document.contains("salt &amp; &lt;pepper&gt;"));
        assert_eq!(
            read_paragraphs(Cursor::new(docx)).unwrap(),
            vec!["salt & <pepper>".to_string()]
        );
    }

    #[test]
    fn test_line_breaks_and_tabs_become_elements() {
        let docx = write_to_memory("INGREDIENTS: salt\r\nsea, pepper\tblack, a\rb.");
        let document = part(&docx, DOCUMENT_PART);
        assert_eq!(document.matches("<w:br/>").count(), 2);
        assert_eq!(document.matches("<w:tab/>").count(), 1);
        assert!(!document.contains('\r'));
        assert!(!document.contains('\t'));
        assert!(document.contains(r#"<w:t xml:space="preserve">INGREDIENTS: salt</w:t><w:br/>"#));
        assert_eq!(document.matches("<w:p>").count(), 1);

        assert_eq!(
            read_paragraphs(Cursor::new(docx)).unwrap(),
            vec!["INGREDIENTS: salt\nsea, pepper\tblack, a\nb.".to_string()]
        );
    }

    #[test]
    fn test_round_trip_breaks_and_tabs() {
        let docx = write_to_memory("a\nb\tc");
        let document = part(&docx, DOCUMENT_PART);
        assert!(document.contains("<w:br/>"));
        assert!(document.contains("<w:tab/>"));
        assert_eq!(
            read_paragraphs(Cursor::new(docx)).unwrap(),
            vec!["a\nb\tc".to_string()]
        );
    }

    #[test]
    fn test_control_characters_are_rejected() {
        let result = DocxWriter::new().write("INGREDIENTS: a\u{1}b.", Cursor::new(Vec::new()));
        match result {
            Err(XlsxToDocxError::Xml(msg)) => assert!(msg.contains("U+0001")),
            other => panic!("Expected Xml error, got {:?}", other.map(|c| c.into_inner())),
        }
        assert!(DocxWriter::new()
            .write("\u{FFFE}", Cursor::new(Vec::new()))
            .is_err());
    }

    #[test]
    fn test_is_xml_char() {
        assert!(is_xml_char('a'));
        assert!(is_xml_char('\t'));
        assert!(is_xml_char('é'));
        assert!(is_xml_char('\u{1F600}'));
        assert!(!is_xml_char('\u{0}'));
        assert!(!is_xml_char('\u{1F}'));
        assert!(!is_xml_char('\u{FFFF}'));
    }

    #[test]
    fn test_round_trip_single_paragraph() {
        let text = "INGREDIENTES: harina, sal, azúcar.";
        let paragraphs = read_paragraphs(Cursor::new(write_to_memory(text))).unwrap();
        assert_eq!(paragraphs, vec![text.to_string()]);
    }

    #[test]
    fn test_round_trip_preserves_surrounding_spaces() {
        let text = "  INGREDIENTS: a.  ";
        let paragraphs = read_paragraphs(Cursor::new(write_to_memory(text))).unwrap();
        assert_eq!(paragraphs, vec![text.to_string()]);
    }

    #[test]
    fn test_core_properties_timestamp() {
        let created = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        let docx = DocxWriter::new()
            .with_created(created)
            .write("x", Cursor::new(Vec::new()))
            .unwrap()
            .into_inner();

        let core = part(&docx, "docProps/core.xml");
        assert!(core.contains("2025-03-14T09:26:53Z"));
        assert!(core.contains("<dc:creator>xlsxdocx</dc:creator>"));
    }

    #[test]
    fn test_read_paragraphs_handles_multiple_and_empty_paragraphs() {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file(DOCUMENT_PART, FileOptions::default()).unwrap();
        zip.write_all(
            br#"<w:document xmlns:w="x"><w:body><w:p><w:r><w:t>one</w:t><w:tab/><w:t>two</w:t></w:r></w:p><w:p/><w:p><w:r><w:t>three</w:t></w:r></w:p></w:body></w:document>"#,
        )
        .unwrap();
        let docx = zip.finish().unwrap().into_inner();

        let paragraphs = read_paragraphs(Cursor::new(docx)).unwrap();
        assert_eq!(paragraphs, vec!["one\ttwo", "", "three"]);
    }

    #[test]
    fn test_read_paragraphs_missing_document_part() {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("other.xml", FileOptions::default()).unwrap();
        zip.write_all(b"<x/>").unwrap();
        let docx = zip.finish().unwrap().into_inner();

        assert!(matches!(
            read_paragraphs(Cursor::new(docx)),
            Err(XlsxToDocxError::Zip(_))
        ));
    }

    #[test]
    fn test_read_paragraphs_not_a_zip() {
        let result = read_paragraphs(Cursor::new(b"not a zip".to_vec()));
        assert!(matches!(result, Err(XlsxToDocxError::Zip(_))));
    }
}
