//! PDF 输出
//!
//! 标准字体 `F1`/`F2` 直接引用；出现非 Latin 文本时追加 `F3`，
//! 以 Type0 + CIDFontType2（Identity-H）方式嵌入 TrueType 字体。
//! 字体文件整体嵌入、不做子集化，每份 PDF 都会增加一个字体文件的大小。
//! 输出不含时间戳和随机 ID，同样的输入得到同样的字节。

use crate::error::{AppResult, RenderError};
use crate::layout::font::{encode_win_ansi, EmbeddedFace, FaceKind, FontBook};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::collections::BTreeMap;
use std::fmt::Write as _;

const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";
const EMBEDDED_FONT: &str = "F3";

/// ToUnicode CMap 中每个 bfchar 块的上限
const BFCHAR_CHUNK: usize = 100;

/// 页面上一段已定位的文字，坐标为 PDF 用户空间（左下角为原点）
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedText {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub bold: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaidOutPage {
    pub texts: Vec<PositionedText>,
}

/// 排版完成的整份文档
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub width: f32,
    pub height: f32,
    pub pages: Vec<LaidOutPage>,
}

/// 把排版结果序列化为文档字节
pub trait DocumentRenderer {
    fn render(&self, layout: &PageLayout) -> AppResult<Vec<u8>>;
}

pub struct PdfRenderer<'a> {
    fonts: &'a FontBook<'a>,
}

impl<'a> PdfRenderer<'a> {
    pub fn new(fonts: &'a FontBook<'a>) -> Self {
        Self { fonts }
    }
}

impl DocumentRenderer for PdfRenderer<'_> {
    fn render(&self, layout: &PageLayout) -> AppResult<Vec<u8>> {
        let mut doc = Document::with_version("1.5");
        let mut glyphs = GlyphSet::default();

        let pages_id = doc.new_object_id();
        let mut page_ids = Vec::with_capacity(layout.pages.len());

        for page in &layout.pages {
            let content = page_content(page, self.fonts, &mut glyphs);
            let content_id = doc.add_object(Stream::new(dictionary! {}, content));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => Object::Reference(pages_id),
                "Contents" => Object::Reference(content_id),
            });
            page_ids.push(page_id);
        }

        let mut fonts = Dictionary::new();
        fonts.set(REGULAR_FONT, Object::Reference(standard_font(&mut doc, "Helvetica")));
        fonts.set(BOLD_FONT, Object::Reference(standard_font(&mut doc, "Helvetica-Bold")));
        if let Some(embedded) = self.fonts.embedded() {
            if !glyphs.is_empty() {
                let font_id = embed_font(&mut doc, embedded, &glyphs);
                fonts.set(EMBEDDED_FONT, Object::Reference(font_id));
            }
        }

        let kids: Vec<Object> = page_ids.iter().map(|id| Object::Reference(*id)).collect();
        let media_box = vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(layout.width),
            Object::Real(layout.height),
        ];
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => Object::Integer(page_ids.len() as i64),
                "MediaBox" => media_box,
                "Resources" => dictionary! { "Font" => fonts },
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));
        doc.compress();

        let mut buf = Vec::new();
        doc.save_to(&mut buf)
            .map_err(|e| RenderError::Pdf(lopdf::Error::from(e)))?;
        Ok(buf)
    }
}

/// 嵌入字体中用到的字形 → 对应字符
#[derive(Debug, Default)]
struct GlyphSet {
    used: BTreeMap<u16, char>,
}

impl GlyphSet {
    fn insert(&mut self, glyph: u16, ch: char) {
        self.used.entry(glyph).or_insert(ch);
    }

    fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}

fn page_content(page: &LaidOutPage, fonts: &FontBook<'_>, glyphs: &mut GlyphSet) -> Vec<u8> {
    let mut ops = String::new();
    for text in &page.texts {
        if text.text.is_empty() {
            continue;
        }
        let (font, hex) = match (fonts.face_for(&text.text), fonts.embedded()) {
            (FaceKind::Embedded, Some(embedded)) => {
                (EMBEDDED_FONT, encode_glyphs(&text.text, embedded, glyphs))
            }
            _ => {
                let name = if text.bold { BOLD_FONT } else { REGULAR_FONT };
                (name, hex_string(&encode_win_ansi(&text.text)))
            }
        };
        let _ = writeln!(
            ops,
            "BT /{} {:.2} Tf 1 0 0 1 {:.2} {:.2} Tm <{}> Tj ET",
            font, text.size, text.x, text.y, hex
        );
    }
    ops.into_bytes()
}

/// 按 Identity-H 写出两字节字形编号
fn encode_glyphs(text: &str, embedded: &EmbeddedFace<'_>, glyphs: &mut GlyphSet) -> String {
    let mut hex = String::with_capacity(text.len() * 4);
    for ch in text.chars() {
        let glyph = embedded.glyph(ch).unwrap_or(0);
        if glyph != 0 {
            glyphs.insert(glyph, ch);
        }
        let _ = write!(hex, "{:04X}", glyph);
    }
    hex
}

fn hex_string(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut s, b| {
        let _ = write!(s, "{:02X}", b);
        s
    })
}

fn standard_font(doc: &mut Document, base_font: &str) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    })
}

/// PDF 名称中只保留字母数字和连字符
fn pdf_font_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    if cleaned.is_empty() {
        "EmbeddedFont".to_string()
    } else {
        cleaned
    }
}

fn embed_font(doc: &mut Document, embedded: &EmbeddedFace<'_>, glyphs: &GlyphSet) -> ObjectId {
    let base_font = pdf_font_name(embedded.name);

    let file = Stream::new(
        dictionary! { "Length1" => Object::Integer(embedded.data.len() as i64) },
        embedded.data.to_vec(),
    );
    let file_id = doc.add_object(file);

    let face = &embedded.face;
    let bbox = face.global_bounding_box();
    let descriptor_id = doc.add_object(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => Object::Name(base_font.clone().into_bytes()),
        "Flags" => Object::Integer(4),
        "FontBBox" => vec![
            Object::Real(embedded.scale(bbox.x_min)),
            Object::Real(embedded.scale(bbox.y_min)),
            Object::Real(embedded.scale(bbox.x_max)),
            Object::Real(embedded.scale(bbox.y_max)),
        ],
        "ItalicAngle" => Object::Integer(0),
        "Ascent" => Object::Real(embedded.scale(face.ascender())),
        "Descent" => Object::Real(embedded.scale(face.descender())),
        "CapHeight" => Object::Real(embedded.scale(face.capital_height().unwrap_or(face.ascender()))),
        "StemV" => Object::Integer(80),
        "FontFile2" => Object::Reference(file_id),
    });

    let widths: Vec<Object> = glyphs
        .used
        .keys()
        .flat_map(|&glyph| {
            [
                Object::Integer(i64::from(glyph)),
                Object::Array(vec![Object::Real(embedded.advance_1000(glyph).round())]),
            ]
        })
        .collect();

    let cid_font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => Object::Name(base_font.clone().into_bytes()),
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Identity"),
            "Supplement" => Object::Integer(0),
        },
        "FontDescriptor" => Object::Reference(descriptor_id),
        "DW" => Object::Integer(1000),
        "W" => widths,
        "CIDToGIDMap" => "Identity",
    });

    let to_unicode_id = doc.add_object(Stream::new(dictionary! {}, to_unicode_cmap(glyphs).into_bytes()));

    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => Object::Name(base_font.into_bytes()),
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![Object::Reference(cid_font_id)],
        "ToUnicode" => Object::Reference(to_unicode_id),
    })
}

/// 字形 → Unicode 映射，使生成的 PDF 可以复制和搜索文字
fn to_unicode_cmap(glyphs: &GlyphSet) -> String {
    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n\
         <0000> <FFFF>\n\
         endcodespacerange\n",
    );

    let entries: Vec<(&u16, &char)> = glyphs.used.iter().collect();
    for chunk in entries.chunks(BFCHAR_CHUNK) {
        let _ = writeln!(cmap, "{} beginbfchar", chunk.len());
        for (glyph, ch) in chunk {
            let mut units = [0u16; 2];
            let utf16: String = ch
                .encode_utf16(&mut units)
                .iter()
                .map(|u| format!("{:04X}", u))
                .collect();
            let _ = writeln!(cmap, "<{:04X}> <{}>", glyph, utf16);
        }
        cmap.push_str("endbfchar\n");
    }

    cmap.push_str(
        "endcmap\n\
         CMapName currentdict /CMap defineresource pop\n\
         end\n\
         end\n",
    );
    cmap
}
