//! Fonts used to draw replacement text.
//!
//! Two sources are supported: the PDF base-14 Helvetica, which needs no
//! embedding but only covers WinAnsi, and a caller-supplied TrueType
//! program embedded as a composite (`Type0`) font so any character the
//! font has a glyph for can be drawn.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use ttf_parser::{name_id, Face};

use crate::error::{RedactorError, RedactorResult};

/// Helvetica advance widths for U+0020..=U+007E, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];
const HELVETICA_DEFAULT_WIDTH: u16 = 556;

/// Measures rendered text width in points.
pub trait TextMeasure {
    fn text_width(&self, text: &str, size: f64) -> f64;
}

/// A parsed TrueType program.
#[derive(Clone)]
pub struct TrueTypeFont {
    data: Arc<[u8]>,
    postscript_name: String,
    units_per_em: u16,
}

impl fmt::Debug for TrueTypeFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrueTypeFont")
            .field("postscript_name", &self.postscript_name)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl TrueTypeFont {
    /// Validates and wraps a font program.
    pub fn from_bytes(data: Vec<u8>) -> RedactorResult<Self> {
        let face = Face::parse(&data, 0).map_err(|e| RedactorError::RenderFailure {
            message: format!("invalid TrueType font: {}", e),
            page: None,
            source: Some(Box::new(e)),
        })?;

        let postscript_name = face
            .names()
            .into_iter()
            .filter(|name| name.name_id == name_id::POST_SCRIPT_NAME)
            .find_map(|name| name.to_string())
            .map(|name| sanitize_font_name(&name))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "EmbeddedFont".to_string());
        let units_per_em = face.units_per_em().max(1);

        Ok(Self {
            data: Arc::from(data),
            postscript_name,
            units_per_em,
        })
    }

    /// Reads a font file. A missing or unreadable file is a source failure.
    pub fn load(path: &Path) -> RedactorResult<Self> {
        let data = std::fs::read(path).map_err(|e| RedactorError::SourceUnavailable {
            resource: path.display().to_string(),
            reason: e.to_string(),
            source: Some(Box::new(e)),
        })?;
        Self::from_bytes(data)
    }

    pub fn postscript_name(&self) -> &str {
        &self.postscript_name
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn face(&self) -> Option<Face<'_>> {
        Face::parse(&self.data, 0).ok()
    }

    /// Glyph id and advance (1/1000 em) for a character.
    fn glyph(face: &Face<'_>, units_per_em: u16, c: char) -> Option<(u16, u32)> {
        let gid = face.glyph_index(c)?;
        let advance = face.glyph_hor_advance(gid).unwrap_or(0);
        Some((gid.0, scale_to_thousand(advance as i32, units_per_em) as u32))
    }
}

fn scale_to_thousand(value: i32, units_per_em: u16) -> i64 {
    (value as f64 * 1000.0 / units_per_em as f64).round() as i64
}

fn sanitize_font_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect()
}

/// Where replacement glyphs come from.
#[derive(Debug, Clone, Default)]
pub enum FontSource {
    /// Base-14 Helvetica with WinAnsi encoding.
    #[default]
    Builtin,
    TrueType(TrueTypeFont),
}

impl FontSource {
    pub fn from_path(path: &Path) -> RedactorResult<Self> {
        TrueTypeFont::load(path).map(FontSource::TrueType)
    }

    pub fn from_bytes(data: Vec<u8>) -> RedactorResult<Self> {
        TrueTypeFont::from_bytes(data).map(FontSource::TrueType)
    }

    /// Fails on the first character this font cannot draw.
    pub fn ensure_covers(&self, text: &str) -> RedactorResult<()> {
        let missing = match self {
            FontSource::Builtin => text.chars().find(|c| winansi_byte(*c).is_none()),
            FontSource::TrueType(font) => {
                let face = font
                    .face()
                    .ok_or_else(|| RedactorError::render("TrueType font can no longer be parsed"))?;
                text.chars()
                    .find(|c| !c.is_whitespace() && face.glyph_index(*c).is_none())
            }
        };
        match missing {
            Some(c) => Err(RedactorError::render(format!(
                "character {:?} has no glyph in the output font",
                c
            ))),
            None => Ok(()),
        }
    }
}

impl TextMeasure for FontSource {
    fn text_width(&self, text: &str, size: f64) -> f64 {
        let units: u64 = match self {
            FontSource::Builtin => text.chars().map(|c| helvetica_width(c) as u64).sum(),
            FontSource::TrueType(font) => match font.face() {
                Some(face) => text
                    .chars()
                    .map(|c| {
                        TrueTypeFont::glyph(&face, font.units_per_em, c)
                            .map(|(_, w)| w as u64)
                            .unwrap_or(500)
                    })
                    .sum(),
                None => text.chars().count() as u64 * 500,
            },
        };
        units as f64 * size / 1000.0
    }
}

fn helvetica_width(c: char) -> u16 {
    match c as u32 {
        0x20..=0x7E => HELVETICA_WIDTHS[(c as u32 - 0x20) as usize],
        _ => HELVETICA_DEFAULT_WIDTH,
    }
}

/// Maps a character to its WinAnsiEncoding byte.
pub fn winansi_byte(c: char) -> Option<u8> {
    let code = c as u32;
    match code {
        0x20..=0x7E | 0xA0..=0xFF => Some(code as u8),
        _ => {
            let byte = match c {
                '\u{20AC}' => 0x80,
                '\u{201A}' => 0x82,
                '\u{0192}' => 0x83,
                '\u{201E}' => 0x84,
                '\u{2026}' => 0x85,
                '\u{2020}' => 0x86,
                '\u{2021}' => 0x87,
                '\u{02C6}' => 0x88,
                '\u{2030}' => 0x89,
                '\u{0160}' => 0x8A,
                '\u{2039}' => 0x8B,
                '\u{0152}' => 0x8C,
                '\u{017D}' => 0x8E,
                '\u{2018}' => 0x91,
                '\u{2019}' => 0x92,
                '\u{201C}' => 0x93,
                '\u{201D}' => 0x94,
                '\u{2022}' => 0x95,
                '\u{2013}' => 0x96,
                '\u{2014}' => 0x97,
                '\u{02DC}' => 0x98,
                '\u{2122}' => 0x99,
                '\u{0161}' => 0x9A,
                '\u{203A}' => 0x9B,
                '\u{0153}' => 0x9C,
                '\u{017E}' => 0x9E,
                '\u{0178}' => 0x9F,
                _ => return None,
            };
            Some(byte)
        }
    }
}

enum Embedding {
    WinAnsi,
    Composite {
        font: TrueTypeFont,
        /// glyph id -> (first character drawn with it, advance in 1/1000 em)
        used: BTreeMap<u16, (char, u32)>,
        referenced: bool,
    },
}

/// A font registered in an output document.
///
/// Composite fonts are written out by [`EmbeddedFont::finish`] once all
/// text has been encoded, so the width table and the `ToUnicode` map only
/// list glyphs that were actually drawn.
pub struct EmbeddedFont {
    id: ObjectId,
    embedding: Embedding,
}

impl EmbeddedFont {
    pub fn register(doc: &mut Document, source: &FontSource) -> Self {
        match source {
            FontSource::Builtin => {
                let id = doc.add_object(dictionary! {
                    "Type" => "Font",
                    "Subtype" => "Type1",
                    "BaseFont" => "Helvetica",
                    "Encoding" => "WinAnsiEncoding",
                });
                Self {
                    id,
                    embedding: Embedding::WinAnsi,
                }
            }
            FontSource::TrueType(font) => Self {
                id: doc.new_object_id(),
                embedding: Embedding::Composite {
                    font: font.clone(),
                    used: BTreeMap::new(),
                    referenced: false,
                },
            },
        }
    }

    /// Object id to place in a page's font resources.
    pub fn reference(&mut self) -> ObjectId {
        if let Embedding::Composite { referenced, .. } = &mut self.embedding {
            *referenced = true;
        }
        self.id
    }

    /// Encodes text as a byte string for `Tj`.
    pub fn encode(&mut self, text: &str) -> RedactorResult<Vec<u8>> {
        match &mut self.embedding {
            Embedding::WinAnsi => text
                .chars()
                .map(|c| {
                    winansi_byte(c).ok_or_else(|| {
                        RedactorError::render(format!(
                            "character {:?} cannot be encoded in WinAnsi; supply a TrueType font",
                            c
                        ))
                    })
                })
                .collect(),
            Embedding::Composite { font, used, .. } => {
                let face = font
                    .face()
                    .ok_or_else(|| RedactorError::render("TrueType font can no longer be parsed"))?;
                let mut bytes = Vec::with_capacity(text.len() * 2);
                for c in text.chars() {
                    let (gid, width) = TrueTypeFont::glyph(&face, font.units_per_em, c)
                        .ok_or_else(|| {
                            RedactorError::render(format!(
                                "font '{}' has no glyph for {:?}",
                                font.postscript_name, c
                            ))
                        })?;
                    used.entry(gid).or_insert((c, width));
                    bytes.extend_from_slice(&gid.to_be_bytes());
                }
                Ok(bytes)
            }
        }
    }

    /// Writes the composite font objects if any page refers to them.
    pub fn finish(self, doc: &mut Document) -> RedactorResult<()> {
        let Embedding::Composite {
            font,
            used,
            referenced,
        } = self.embedding
        else {
            return Ok(());
        };
        if !referenced {
            return Ok(());
        }

        let face = font
            .face()
            .ok_or_else(|| RedactorError::render("TrueType font can no longer be parsed"))?;
        let upem = font.units_per_em;
        let bbox = face.global_bounding_box();
        let name = font.postscript_name.clone();

        let mut file = Stream::new(
            dictionary! { "Length1" => font.data.len() as i64 },
            font.data.to_vec(),
        );
        // An uncompressed font program is still valid output.
        let _ = file.compress();
        let file_id = doc.add_object(file);

        let descriptor_id = doc.add_object(dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => name.as_str(),
            "Flags" => 4,
            "FontBBox" => [bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max]
                .iter()
                .map(|v| Object::Integer(scale_to_thousand(*v as i32, upem)))
                .collect::<Vec<Object>>(),
            "ItalicAngle" => face.italic_angle().unwrap_or(0.0),
            "Ascent" => scale_to_thousand(face.ascender() as i32, upem),
            "Descent" => scale_to_thousand(face.descender() as i32, upem),
            "CapHeight" => scale_to_thousand(
                face.capital_height().unwrap_or(face.ascender()) as i32,
                upem,
            ),
            "StemV" => 80,
            "FontFile2" => file_id,
        });

        let widths: Vec<Object> = used
            .iter()
            .flat_map(|(gid, (_, width))| {
                [
                    Object::Integer(*gid as i64),
                    Object::Array(vec![Object::Integer(*width as i64)]),
                ]
            })
            .collect();

        let cid_font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "CIDFontType2",
            "BaseFont" => name.as_str(),
            "CIDSystemInfo" => dictionary! {
                "Registry" => Object::string_literal("Adobe"),
                "Ordering" => Object::string_literal("Identity"),
                "Supplement" => 0,
            },
            "FontDescriptor" => descriptor_id,
            "DW" => 1000,
            "W" => widths,
            "CIDToGIDMap" => "Identity",
        });

        let to_unicode_id = doc.add_object(Stream::new(dictionary! {}, to_unicode_cmap(&used)));

        doc.set_object(
            self.id,
            dictionary! {
                "Type" => "Font",
                "Subtype" => "Type0",
                "BaseFont" => name.as_str(),
                "Encoding" => "Identity-H",
                "DescendantFonts" => vec![Object::Reference(cid_font_id)],
                "ToUnicode" => to_unicode_id,
            },
        );
        Ok(())
    }
}

fn to_unicode_cmap(used: &BTreeMap<u16, (char, u32)>) -> Vec<u8> {
    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n",
    );

    let entries: Vec<(&u16, &(char, u32))> = used.iter().collect();
    // bfchar blocks hold at most 100 entries
    for chunk in entries.chunks(100) {
        cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
        for (gid, (c, _)) in chunk {
            let mut units = [0u16; 2];
            let utf16: String = c
                .encode_utf16(&mut units)
                .iter()
                .map(|u| format!("{:04X}", u))
                .collect();
            cmap.push_str(&format!("<{:04X}> <{}>\n", gid, utf16));
        }
        cmap.push_str("endbfchar\n");
    }

    cmap.push_str("endcmap\nCMapName currentdict /CMap defineresource pop\nend\nend\n");
    cmap.into_bytes()
}
