//! XLSX package access

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::drawing::{parse_drawing, DrawingPart};
use crate::error::{XlsxError, XlsxResult};
use crate::rels::{read_relationships, rels_path_for, Relationship};
use crate::sheet::{read_sheet_layout, SheetLayout};

const WORKBOOK_PART: &str = "xl/workbook.xml";

/// A worksheet listed in the workbook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetEntry {
    /// Sheet name as shown in the workbook
    pub name: String,
    /// Zero-based position in the workbook
    pub index: usize,
    /// Archive path of the worksheet part
    pub path: String,
}

/// A drawing part with its media relationships resolved
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedDrawing {
    /// Archive path of the drawing part
    pub path: String,
    pub part: DrawingPart,
    /// Relationship id to archive path of each internal image target
    pub media: HashMap<String, String>,
}

/// An opened XLSX package.
///
/// Opening reads only the workbook part and its relationships; sheets, drawings
/// and media are read on demand.
pub struct XlsxPackage<R: Read + Seek> {
    archive: zip::ZipArchive<R>,
    sheets: Vec<SheetEntry>,
}

impl XlsxPackage<BufReader<File>> {
    /// Open a package from a file path
    pub fn open<P: AsRef<Path>>(path: P) -> XlsxResult<Self> {
        let file = File::open(path)?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> XlsxPackage<R> {
    /// Open a package from a reader
    pub fn new(reader: R) -> XlsxResult<Self> {
        let mut archive = zip::ZipArchive::new(reader)?;

        // Verify this is an XLSX file
        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let sheet_info = Self::read_workbook_xml(&mut archive)?;
        let rels = Self::read_rels_of(&mut archive, WORKBOOK_PART)?;
        let sheet_paths: HashMap<&str, &str> = rels
            .iter()
            .filter(|rel| rel.is("worksheet") && !rel.external)
            .map(|rel| (rel.id.as_str(), rel.target.as_str()))
            .collect();

        let mut sheets = Vec::with_capacity(sheet_info.len());
        for (name, r_id) in sheet_info {
            match sheet_paths.get(r_id.as_str()) {
                Some(path) => sheets.push(SheetEntry {
                    name,
                    index: sheets.len(),
                    path: path.to_string(),
                }),
                // Chart sheets and dialog sheets have no worksheet part
                None => log::debug!("sheet {} ({}) is not a worksheet", name, r_id),
            }
        }

        Ok(Self { archive, sheets })
    }

    /// Worksheets in workbook order
    pub fn sheets(&self) -> &[SheetEntry] {
        &self.sheets
    }

    /// Whether the archive contains a part
    pub fn has_part(&mut self, path: &str) -> bool {
        self.archive.by_name(path).is_ok()
    }

    /// Read a part's raw bytes
    pub fn read_part(&mut self, path: &str) -> XlsxResult<Vec<u8>> {
        let mut file = self
            .archive
            .by_name(path)
            .map_err(|_| XlsxError::MissingPart(path.to_string()))?;
        let mut bytes = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    /// Relationships of a part; a missing relationship part means none
    pub fn relationships(&mut self, part: &str) -> XlsxResult<Vec<Relationship>> {
        Self::read_rels_of(&mut self.archive, part)
    }

    /// Read the layout of a worksheet and locate its drawing part
    pub fn sheet_layout(&mut self, sheet: &SheetEntry) -> XlsxResult<(SheetLayout, Option<String>)> {
        let layout = {
            let file = self
                .archive
                .by_name(&sheet.path)
                .map_err(|_| XlsxError::MissingPart(sheet.path.clone()))?;
            read_sheet_layout(BufReader::new(file))?
        };

        let drawing_path = match layout.drawing_rel_id.as_deref() {
            Some(r_id) => {
                let rels = self.relationships(&sheet.path)?;
                let found = rels
                    .into_iter()
                    .find(|rel| rel.id == r_id && rel.is("drawing") && !rel.external)
                    .map(|rel| rel.target);
                if found.is_none() {
                    log::warn!("{}: drawing relationship {} not found", sheet.path, r_id);
                }
                found
            }
            None => None,
        };

        Ok((layout, drawing_path))
    }

    /// Parse a drawing part and resolve its image relationships
    pub fn load_drawing(&mut self, path: &str) -> XlsxResult<LoadedDrawing> {
        let key = part_key(path);
        let part = {
            let file = self
                .archive
                .by_name(path)
                .map_err(|_| XlsxError::MissingPart(path.to_string()))?;
            parse_drawing(BufReader::new(file), &key)?
        };

        let media = self
            .relationships(path)?
            .into_iter()
            .filter(|rel| rel.is("image") && !rel.external)
            .map(|rel| (rel.id, rel.target))
            .collect();

        Ok(LoadedDrawing {
            path: path.to_string(),
            part,
            media,
        })
    }

    fn read_rels_of(archive: &mut zip::ZipArchive<R>, part: &str) -> XlsxResult<Vec<Relationship>> {
        let rels_path = rels_path_for(part);
        match archive.by_name(&rels_path) {
            Ok(file) => read_relationships(BufReader::new(file), part),
            Err(zip::result::ZipError::FileNotFound) => Ok(Vec::new()),
            Err(e) => Err(XlsxError::Zip(e)),
        }
    }

    /// Read workbook.xml to get sheet names and rIds
    fn read_workbook_xml(archive: &mut zip::ZipArchive<R>) -> XlsxResult<Vec<(String, String)>> {
        let file = archive
            .by_name(WORKBOOK_PART)
            .map_err(|_| XlsxError::MissingPart(WORKBOOK_PART.into()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut sheets = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.local_name().as_ref() == b"sheet" => {
                    let mut name = None;
                    let mut r_id = None;

                    for attr in e.attributes().flatten() {
                        match attr.key.local_name().as_ref() {
                            b"name" => {
                                name = attr.unescape_value().ok().map(|s| s.to_string());
                            }
                            b"id" => {
                                r_id = attr.unescape_value().ok().map(|s| s.to_string());
                            }
                            _ => {}
                        }
                    }

                    if let (Some(name), Some(r_id)) = (name, r_id) {
                        sheets.push((name, r_id));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(sheets)
    }
}

/// Short key of a part used in object identifiers (`xl/drawings/drawing1.xml` -> `drawing1`)
pub fn part_key(path: &str) -> String {
    let file = path.rsplit('/').next().unwrap_or(path);
    file.strip_suffix(".xml").unwrap_or(file).to_string()
}
