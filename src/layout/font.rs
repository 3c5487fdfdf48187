//! 字体资源与字宽测量
//!
//! ASCII / Latin-1 文本使用 PDF 标准字体 Helvetica（无需嵌入），
//! 其余字符（韩文等）必须由嵌入的 TrueType 字体提供字形。

use crate::error::FontResourceError;
use std::path::Path;
use ttf_parser::{Face, GlyphId};

/// 嵌入字体缺少 hmtx 数据时使用的字宽（em 的比例）
const FALLBACK_ADVANCE: f32 = 0.5;

/// 可嵌入的 TrueType 字体文件
#[derive(Clone)]
pub struct FontResource {
    name: String,
    data: Vec<u8>,
}

impl std::fmt::Debug for FontResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontResource")
            .field("name", &self.name)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl FontResource {
    /// 校验字体可以被解析
    pub fn from_bytes(name: impl Into<String>, data: Vec<u8>) -> Result<Self, FontResourceError> {
        let name = name.into();
        Face::parse(&data, 0).map_err(|e| FontResourceError::Unparsable {
            name: name.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self { name, data })
    }

    /// 以文件名（不含扩展名）作为字体名
    pub fn from_file_bytes(path: &Path, data: Vec<u8>) -> Result<Self, FontResourceError> {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "EmbeddedFont".to_string());
        Self::from_bytes(name, data)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// 可以不嵌入字体直接绘制的字符（WinAnsiEncoding 能表示的字符）
pub fn is_standard_char(ch: char) -> bool {
    win_ansi_byte(ch).is_some()
}

/// 字符在 WinAnsiEncoding 中的编码
fn win_ansi_byte(ch: char) -> Option<u8> {
    match ch {
        ' '..='~' | '\u{A0}'..='\u{FF}' => Some(ch as u32 as u8),
        _ => win_ansi_extra(ch).map(|extra| extra.code),
    }
}

/// WinAnsiEncoding 0x80..=0x9F 区的字符
struct WinAnsiExtra {
    ch: char,
    code: u8,
    regular: u16,
    bold: u16,
}

const fn extra(ch: char, code: u8, regular: u16, bold: u16) -> WinAnsiExtra {
    WinAnsiExtra {
        ch,
        code,
        regular,
        bold,
    }
}

/// Excel 自动更正常见的弯引号、破折号、省略号都在这里
#[rustfmt::skip]
const WIN_ANSI_EXTRAS: [WinAnsiExtra; 27] = [
    extra('\u{20AC}', 0x80, 556, 556),  // €
    extra('\u{201A}', 0x82, 222, 278),  // ‚
    extra('\u{0192}', 0x83, 556, 556),  // ƒ
    extra('\u{201E}', 0x84, 333, 500),  // „
    extra('\u{2026}', 0x85, 1000, 1000), // …
    extra('\u{2020}', 0x86, 556, 556),  // †
    extra('\u{2021}', 0x87, 556, 556),  // ‡
    extra('\u{02C6}', 0x88, 333, 333),  // ˆ
    extra('\u{2030}', 0x89, 1000, 1000), // ‰
    extra('\u{0160}', 0x8A, 667, 667),  // Š
    extra('\u{2039}', 0x8B, 333, 333),  // ‹
    extra('\u{0152}', 0x8C, 1000, 1000), // Œ
    extra('\u{017D}', 0x8E, 611, 611),  // Ž
    extra('\u{2018}', 0x91, 222, 278),  // ‘
    extra('\u{2019}', 0x92, 222, 278),  // ’
    extra('\u{201C}', 0x93, 333, 500),  // “
    extra('\u{201D}', 0x94, 333, 500),  // ”
    extra('\u{2022}', 0x95, 350, 350),  // •
    extra('\u{2013}', 0x96, 556, 556),  // –
    extra('\u{2014}', 0x97, 1000, 1000), // —
    extra('\u{02DC}', 0x98, 333, 333),  // ˜
    extra('\u{2122}', 0x99, 1000, 1000), // ™
    extra('\u{0161}', 0x9A, 500, 556),  // š
    extra('\u{203A}', 0x9B, 333, 333),  // ›
    extra('\u{0153}', 0x9C, 944, 944),  // œ
    extra('\u{017E}', 0x9E, 500, 500),  // ž
    extra('\u{0178}', 0x9F, 667, 667),  // Ÿ
];

fn win_ansi_extra(ch: char) -> Option<&'static WinAnsiExtra> {
    WIN_ANSI_EXTRAS.iter().find(|extra| extra.ch == ch)
}

/// 一段文本使用的字体
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceKind {
    /// Helvetica / Helvetica-Bold
    Standard,
    /// 嵌入的 TrueType 字体
    Embedded,
}

/// 文本宽度测量，单位为 pt
pub trait TextMeasure {
    fn text_width(&self, text: &str, size: f32, bold: bool) -> f32;
}

/// 已解析的嵌入字体
pub struct EmbeddedFace<'a> {
    pub name: &'a str,
    pub data: &'a [u8],
    pub face: Face<'a>,
}

impl EmbeddedFace<'_> {
    pub fn glyph(&self, ch: char) -> Option<u16> {
        self.face.glyph_index(ch).map(|g| g.0)
    }

    /// 字形宽度，换算到 1000 单位/em
    pub fn advance_1000(&self, glyph: u16) -> f32 {
        let units = f32::from(self.face.units_per_em().max(1));
        self.face
            .glyph_hor_advance(GlyphId(glyph))
            .map(|adv| f32::from(adv) * 1000.0 / units)
            .unwrap_or(FALLBACK_ADVANCE * 1000.0)
    }

    /// 字体度量，换算到 1000 单位/em
    pub fn scale(&self, value: i16) -> f32 {
        f32::from(value) * 1000.0 / f32::from(self.face.units_per_em().max(1))
    }
}

/// 一次排版所用的字体集合
pub struct FontBook<'a> {
    embedded: Option<EmbeddedFace<'a>>,
}

impl<'a> FontBook<'a> {
    pub fn new(font: Option<&'a FontResource>) -> Result<Self, FontResourceError> {
        let embedded = match font {
            Some(resource) => {
                let face = Face::parse(resource.data(), 0).map_err(|e| {
                    FontResourceError::Unparsable {
                        name: resource.name().to_string(),
                        reason: e.to_string(),
                    }
                })?;
                Some(EmbeddedFace {
                    name: resource.name(),
                    data: resource.data(),
                    face,
                })
            }
            None => None,
        };
        Ok(Self { embedded })
    }

    /// 仅使用标准字体
    pub fn standard_only() -> Self {
        Self { embedded: None }
    }

    pub fn embedded(&self) -> Option<&EmbeddedFace<'a>> {
        self.embedded.as_ref()
    }

    pub fn face_for(&self, text: &str) -> FaceKind {
        if text.chars().all(is_standard_char) {
            FaceKind::Standard
        } else {
            FaceKind::Embedded
        }
    }

    /// 确认文本中的每个字符都有字形可画
    pub fn check_coverage(&self, text: &str) -> Result<(), FontResourceError> {
        if self.face_for(text) == FaceKind::Standard {
            return Ok(());
        }
        let Some(embedded) = self.embedded.as_ref() else {
            let ch = text
                .chars()
                .find(|c| !is_standard_char(*c))
                .unwrap_or('\u{FFFD}');
            return Err(FontResourceError::Unavailable { ch });
        };
        match text.chars().find(|c| embedded.glyph(*c).is_none()) {
            Some(ch) => Err(FontResourceError::MissingGlyph {
                name: embedded.name.to_string(),
                ch,
            }),
            None => Ok(()),
        }
    }
}

impl TextMeasure for FontBook<'_> {
    fn text_width(&self, text: &str, size: f32, bold: bool) -> f32 {
        let units: f32 = match (self.face_for(text), self.embedded.as_ref()) {
            (FaceKind::Standard, _) | (FaceKind::Embedded, None) => {
                text.chars().map(|c| helvetica_width(c, bold)).sum()
            }
            (FaceKind::Embedded, Some(embedded)) => text
                .chars()
                .map(|c| {
                    embedded
                        .glyph(c)
                        .map(|g| embedded.advance_1000(g))
                        .unwrap_or(FALLBACK_ADVANCE * 1000.0)
                })
                .sum(),
        };
        units * size / 1000.0
    }
}

/// Helvetica AFM 字宽（1000 单位/em），下标为 `ch - 0x20`
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Latin-1 补充区字符按数字宽度估算
const LATIN1_WIDTH: u16 = 556;

fn helvetica_width(ch: char, bold: bool) -> f32 {
    let table = if bold {
        &HELVETICA_BOLD_WIDTHS
    } else {
        &HELVETICA_WIDTHS
    };
    let code = ch as u32;
    let width = match (code, win_ansi_extra(ch)) {
        (0x20..=0x7E, _) => table[(code - 0x20) as usize],
        (_, Some(extra)) if bold => extra.bold,
        (_, Some(extra)) => extra.regular,
        _ => LATIN1_WIDTH,
    };
    f32::from(width)
}

/// WinAnsi 编码（只用于标准字符）
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().filter_map(win_ansi_byte).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixture_font;

    #[test]
    fn test_embedded_face_measure() {
        let font = fixture_font();
        assert_eq!(font.name(), "PatternTest");

        let book = FontBook::new(Some(&font)).unwrap();
        let embedded = book.embedded().unwrap();
        assert_eq!(embedded.glyph('나'), Some(96));
        assert_eq!(embedded.advance_1000(96), 1000.0);

        // 나 + 는 + 空格 + 1 = 1000 + 1000 + 600 + 600
        assert_eq!(book.face_for("나는 1"), FaceKind::Embedded);
        assert!((book.text_width("나는 1", 10.0, false) - 32.0).abs() < 1e-3);
        // 纯 Latin 文本仍按 Helvetica 测量
        assert!((book.text_width("Hi", 10.0, false) - 9.44).abs() < 1e-4);
    }

    #[test]
    fn test_embedded_face_missing_glyph() {
        let font = fixture_font();
        let book = FontBook::new(Some(&font)).unwrap();
        assert!(book.check_coverage("1. 나는 학생이다").is_ok());
        assert_eq!(
            book.check_coverage("한국어"),
            Err(FontResourceError::MissingGlyph {
                name: "PatternTest".to_string(),
                ch: '한'
            })
        );
    }

    #[test]
    fn test_standard_chars() {
        assert!(is_standard_char('A'));
        assert!(is_standard_char('é'));
        assert!(!is_standard_char('한'));
        assert!(!is_standard_char('\n'));
    }

    #[test]
    fn test_helvetica_measure() {
        let book = FontBook::standard_only();
        // "Hi" = 722 + 222
        let width = book.text_width("Hi", 10.0, false);
        assert!((width - 9.44).abs() < 1e-4);
        assert!(book.text_width("Hi", 10.0, true) > width);
        assert_eq!(book.text_width("", 12.0, false), 0.0);
    }

    #[test]
    fn test_answer_rule_fits_a4_content_width() {
        let book = FontBook::standard_only();
        let width = book.text_width(&"_".repeat(85), 9.0, false);
        assert!(width < 510.0);
    }

    #[test]
    fn test_korean_without_font_is_unavailable() {
        let book = FontBook::standard_only();
        assert_eq!(book.face_for("1. 나는 학생이다"), FaceKind::Embedded);
        assert_eq!(
            book.check_coverage("1. 나는 학생이다"),
            Err(FontResourceError::Unavailable { ch: '나' })
        );
        assert!(book.check_coverage("My / is / name / Jade").is_ok());
    }

    #[test]
    fn test_unparsable_font() {
        let err = FontResource::from_bytes("Broken", vec![0, 1, 2, 3]).unwrap_err();
        assert!(matches!(err, FontResourceError::Unparsable { ref name, .. } if name == "Broken"));
    }

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("Ab é"), vec![0x41, 0x62, 0x20, 0xE9]);
        assert_eq!(
            encode_win_ansi("It\u{2019}s \u{201C}ok\u{201D} \u{2013} \u{2026}\u{20AC}"),
            vec![0x49, 0x74, 0x92, 0x73, 0x20, 0x93, 0x6F, 0x6B, 0x94, 0x20, 0x96, 0x20, 0x85, 0x80]
        );
    }

    #[test]
    fn test_smart_punctuation_needs_no_font() {
        let book = FontBook::standard_only();
        let prompt = "It\u{2019}s my book \u{2014} \u{2018}really\u{2019}\u{2026}";
        assert_eq!(book.face_for(prompt), FaceKind::Standard);
        assert!(book.check_coverage(prompt).is_ok());

        // ’ = 222，… = 1000，— 粗体 1000
        assert!((book.text_width("\u{2019}", 10.0, false) - 2.22).abs() < 1e-4);
        assert!((book.text_width("\u{2019}", 10.0, true) - 2.78).abs() < 1e-4);
        assert!((book.text_width("\u{2026}", 10.0, false) - 10.0).abs() < 1e-4);
        assert!((book.text_width("\u{2014}", 10.0, true) - 10.0).abs() < 1e-4);
    }
}
