//! Document package: the container that holds workbook parts
//!
//! The engine only needs a handful of operations from the container: open a
//! part, learn its relationship id, register sheets with the workbook, and
//! seal everything. [`DocumentPackage`] captures that; [`ZipPackage`] is the
//! OOXML implementation on top of the `zip` crate.

use super::xml_writer::XmlWriter;
use crate::error::{ExportError, Result};
use std::io::{self, Seek, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Kind of part a package can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartKind {
    Styles,
    Worksheet,
}

/// Handle to a part opened in a package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PartId(pub u32);

/// A sheet registered in the workbook's sheet index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetEntry {
    pub name: String,
    /// 1, 2, 3, ... in registration order
    pub sheet_id: u32,
    /// Relationship id of the worksheet part
    pub rel_id: String,
}

/// Container builder used by the report writer
///
/// Bytes written through [`Write`] go to the part most recently opened with
/// [`DocumentPackage::start_part`].
pub trait DocumentPackage: Write {
    /// What [`DocumentPackage::finish`] hands back
    type Output;

    /// Open a new part; subsequent writes go to it
    fn start_part(&mut self, kind: PartKind) -> Result<PartId>;

    /// Stable relationship id of an opened part
    fn relationship_id(&self, part: PartId) -> Result<String>;

    /// Register a sheet as a child of the workbook
    fn append_sheet(&mut self, entry: SheetEntry);

    /// Write the workbook and package metadata and seal the container
    fn finish(self) -> Result<Self::Output>;
}

struct PartInfo {
    kind: PartKind,
    path: String,
    rel_id: String,
}

/// OOXML package written into a ZIP archive
pub struct ZipPackage<W: Write + Seek> {
    zip: ZipWriter<W>,
    options: SimpleFileOptions,
    parts: Vec<PartInfo>,
    sheets: Vec<SheetEntry>,
    worksheet_count: u32,
    part_open: bool,
    author: String,
}

impl<W: Write + Seek> ZipPackage<W> {
    /// Create a package writing into `sink`
    pub fn new(sink: W) -> Self {
        ZipPackage {
            zip: ZipWriter::new(sink),
            options: Self::file_options(Some(6)),
            parts: Vec::new(),
            sheets: Vec::new(),
            worksheet_count: 0,
            part_open: false,
            author: env!("CARGO_PKG_NAME").to_string(),
        }
    }

    /// Set the deflate level (`None` = library default)
    pub fn with_compression_level(mut self, level: Option<i64>) -> Self {
        self.options = Self::file_options(level);
        self
    }

    /// Set the creator recorded in `docProps`
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    fn file_options(level: Option<i64>) -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(level)
    }

    fn start_entry(&mut self, path: &str) -> Result<()> {
        self.zip.start_file(path, self.options)?;
        Ok(())
    }

    fn seal(mut self) -> Result<W> {
        self.start_entry("xl/workbook.xml")?;
        self.write_workbook()?;

        self.start_entry("xl/_rels/workbook.xml.rels")?;
        self.write_workbook_rels()?;

        self.start_entry("[Content_Types].xml")?;
        self.write_content_types()?;

        self.start_entry("_rels/.rels")?;
        self.zip.write_all(ROOT_RELS.as_bytes())?;

        self.start_entry("docProps/core.xml")?;
        self.write_core_props()?;

        self.start_entry("docProps/app.xml")?;
        self.write_app_props()?;

        Ok(self.zip.finish()?)
    }

    fn write_workbook(&mut self) -> Result<()> {
        let mut xml = XmlWriter::new(&mut self.zip);
        xml.write_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n");
        xml.start_element("workbook");
        xml.attribute(
            "xmlns",
            "http://schemas.openxmlformats.org/spreadsheetml/2006/main",
        );
        xml.attribute(
            "xmlns:r",
            "http://schemas.openxmlformats.org/officeDocument/2006/relationships",
        );
        xml.close_start_tag();

        xml.write_str("<bookViews><workbookView/></bookViews>");

        xml.start_element("sheets");
        xml.close_start_tag();
        for sheet in &self.sheets {
            xml.start_element("sheet");
            xml.attribute("name", &sheet.name);
            xml.attribute_int("sheetId", sheet.sheet_id);
            xml.attribute("r:id", &sheet.rel_id);
            xml.close_empty();
        }
        xml.end_element("sheets");
        xml.end_element("workbook");
        xml.flush()
    }

    fn write_workbook_rels(&mut self) -> Result<()> {
        let mut xml = XmlWriter::new(&mut self.zip);
        xml.write_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n");
        xml.start_element("Relationships");
        xml.attribute(
            "xmlns",
            "http://schemas.openxmlformats.org/package/2006/relationships",
        );
        xml.close_start_tag();

        for part in &self.parts {
            let rel_type = match part.kind {
                PartKind::Styles => {
                    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles"
                }
                PartKind::Worksheet => {
                    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet"
                }
            };
            xml.start_element("Relationship");
            xml.attribute("Id", &part.rel_id);
            xml.attribute("Type", rel_type);
            // targets are relative to xl/
            xml.attribute("Target", part.path.trim_start_matches("xl/"));
            xml.close_empty();
        }

        xml.end_element("Relationships");
        xml.flush()
    }

    fn write_content_types(&mut self) -> Result<()> {
        let mut xml = XmlWriter::new(&mut self.zip);
        xml.write_str(CONTENT_TYPES_HEAD);
        for part in &self.parts {
            let content_type = match part.kind {
                PartKind::Styles => {
                    "application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"
                }
                PartKind::Worksheet => {
                    "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"
                }
            };
            xml.write_str("\n");
            xml.start_element("Override");
            xml.attribute("PartName", &format!("/{}", part.path));
            xml.attribute("ContentType", content_type);
            xml.close_empty();
        }
        xml.write_str("\n</Types>");
        xml.flush()
    }

    fn write_core_props(&mut self) -> Result<()> {
        let mut xml = XmlWriter::new(&mut self.zip);
        xml.write_str(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
"#,
        );
        xml.text_element("dc:creator", &self.author);
        xml.write_str("\n");
        xml.text_element("cp:lastModifiedBy", &self.author);
        xml.write_str("\n</cp:coreProperties>");
        xml.flush()
    }

    fn write_app_props(&mut self) -> Result<()> {
        let mut xml = XmlWriter::new(&mut self.zip);
        xml.write_str(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties">
"#,
        );
        xml.text_element("Application", env!("CARGO_PKG_NAME"));
        xml.write_str("\n</Properties>");
        xml.flush()
    }
}

impl<W: Write + Seek> Write for ZipPackage<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.part_open {
            return Err(io::Error::other("no package part is open"));
        }
        self.zip.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.zip.flush()
    }
}

impl<W: Write + Seek> DocumentPackage for ZipPackage<W> {
    type Output = W;

    fn start_part(&mut self, kind: PartKind) -> Result<PartId> {
        let (path, rel_id) = match kind {
            PartKind::Styles => {
                if self.parts.iter().any(|p| p.kind == PartKind::Styles) {
                    return Err(ExportError::Packaging(
                        "styles part already exists".to_string(),
                    ));
                }
                ("xl/styles.xml".to_string(), "rIdStyles".to_string())
            }
            PartKind::Worksheet => {
                self.worksheet_count += 1;
                let n = self.worksheet_count;
                (format!("xl/worksheets/sheet{}.xml", n), format!("rId{}", n))
            }
        };

        self.start_entry(&path)?;
        self.part_open = true;
        self.parts.push(PartInfo { kind, path, rel_id });
        Ok(PartId(self.parts.len() as u32 - 1))
    }

    fn relationship_id(&self, part: PartId) -> Result<String> {
        self.parts
            .get(part.0 as usize)
            .map(|p| p.rel_id.clone())
            .ok_or_else(|| ExportError::Packaging(format!("unknown part {}", part.0)))
    }

    fn append_sheet(&mut self, entry: SheetEntry) {
        self.sheets.push(entry);
    }

    fn finish(self) -> Result<W> {
        self.seal().map_err(|err| match err {
            ExportError::Packaging(_) => err,
            other => ExportError::Packaging(other.to_string()),
        })
    }
}

const CONTENT_TYPES_HEAD: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
<Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>
</Relationships>"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut out = String::new();
        file.read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn test_write_without_part_fails() {
        let mut package = ZipPackage::new(Cursor::new(Vec::new()));
        assert!(package.write_all(b"<x/>").is_err());
    }

    #[test]
    fn test_relationship_ids() {
        let mut package = ZipPackage::new(Cursor::new(Vec::new()));
        let styles = package.start_part(PartKind::Styles).unwrap();
        let first = package.start_part(PartKind::Worksheet).unwrap();
        let second = package.start_part(PartKind::Worksheet).unwrap();

        assert_eq!(package.relationship_id(styles).unwrap(), "rIdStyles");
        assert_eq!(package.relationship_id(first).unwrap(), "rId1");
        assert_eq!(package.relationship_id(second).unwrap(), "rId2");
        assert!(package.relationship_id(PartId(9)).is_err());
        assert!(package.start_part(PartKind::Styles).is_err());
    }

    #[test]
    fn test_sealed_package_layout() {
        let mut package = ZipPackage::new(Cursor::new(Vec::new())).with_author("tests");
        package.start_part(PartKind::Styles).unwrap();
        package.write_all(b"<styleSheet/>").unwrap();
        let part = package.start_part(PartKind::Worksheet).unwrap();
        package.write_all(b"<worksheet/>").unwrap();
        let rel_id = package.relationship_id(part).unwrap();
        package.append_sheet(SheetEntry {
            name: "R&D".to_string(),
            sheet_id: 1,
            rel_id,
        });
        assert_eq!(package.sheets.len(), 1);

        let bytes = package.finish().unwrap().into_inner();

        let workbook = read_part(&bytes, "xl/workbook.xml");
        assert!(workbook.contains("<bookViews><workbookView/></bookViews>"));
        assert!(workbook.contains("<sheet name=\"R&amp;D\" sheetId=\"1\" r:id=\"rId1\"/>"));

        let rels = read_part(&bytes, "xl/_rels/workbook.xml.rels");
        assert!(rels.contains("Id=\"rIdStyles\""));
        assert!(rels.contains("Target=\"worksheets/sheet1.xml\""));
        assert!(rels.contains("Target=\"styles.xml\""));

        let types = read_part(&bytes, "[Content_Types].xml");
        assert!(types.contains("PartName=\"/xl/worksheets/sheet1.xml\""));
        assert!(types.contains("PartName=\"/xl/styles.xml\""));

        assert!(read_part(&bytes, "docProps/core.xml").contains("<dc:creator>tests</dc:creator>"));
        assert_eq!(read_part(&bytes, "xl/worksheets/sheet1.xml"), "<worksheet/>");
    }
}
