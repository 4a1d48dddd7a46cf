//! Fixed style palette for report workbooks
//!
//! The palette is built once per export and shared by every sheet. Cell
//! formats are addressed by [`NamedStyle`], whose discriminant is the format's
//! position in `cellXfs`; these indices are stable for the life of an export.

use super::xml_writer::XmlWriter;
use crate::config::HeaderColor;
use crate::error::Result;
use indexmap::IndexMap;
use std::io::Write;

/// First id available for custom number formats
const FIRST_CUSTOM_NUM_FMT: u32 = 164;
/// Built-in number format `#,##0`
const NUM_FMT_INTEGER: u32 = 3;
/// Built-in number format `#,##0.00`
const NUM_FMT_DECIMAL: u32 = 4;

/// Named cell formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedStyle {
    /// Default style - no formatting
    Default = 0,
    /// Date with time (`dd/MMM/yyyy hh:mm:ss`)
    DateTime = 1,
    /// Date without time (`dd/MMM/yyyy`)
    DateOnly = 2,
    /// Header row: bold white text on the configured fill, centred
    Header = 3,
    /// Integer format with thousand separator (#,##0)
    IntegerNumber = 4,
    /// Decimal format with 2 places (#,##0.00)
    DecimalNumber = 5,
    Bold = 6,
    Italic = 7,
    TimesRoman = 8,
    YellowFill = 9,
    Centered = 10,
    /// Thin borders on all sides
    Bordered = 11,
    /// Underlined blue text
    Hyperlink = 12,
}

impl NamedStyle {
    /// Every named style, in `cellXfs` order
    pub const ALL: [NamedStyle; 13] = [
        NamedStyle::Default,
        NamedStyle::DateTime,
        NamedStyle::DateOnly,
        NamedStyle::Header,
        NamedStyle::IntegerNumber,
        NamedStyle::DecimalNumber,
        NamedStyle::Bold,
        NamedStyle::Italic,
        NamedStyle::TimesRoman,
        NamedStyle::YellowFill,
        NamedStyle::Centered,
        NamedStyle::Bordered,
        NamedStyle::Hyperlink,
    ];

    /// Get the style index for XML
    pub fn index(&self) -> u32 {
        *self as u32
    }
}

/// Custom number format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    pub id: u32,
    pub code: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub name: &'static str,
    pub size: f64,
    /// `AARRGGBB`
    pub color: &'static str,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl Font {
    fn regular(name: &'static str, color: &'static str) -> Self {
        Font {
            name,
            size: 10.0,
            color,
            bold: false,
            italic: false,
            underline: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fill {
    None,
    /// Required by spreadsheet applications at index 1
    Gray125,
    /// Solid fill with an `AARRGGBB` foreground
    Solid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Border {
    None,
    /// Thin line on left, right, top and bottom
    ThinBox,
}

/// One entry of `cellXfs`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellFormat {
    pub num_fmt_id: u32,
    pub font_id: u32,
    pub fill_id: u32,
    pub border_id: u32,
    /// Centre horizontally and vertically
    pub centered: bool,
}

impl CellFormat {
    fn number(num_fmt_id: u32) -> Self {
        CellFormat {
            num_fmt_id,
            ..Default::default()
        }
    }

    fn font(font_id: u32) -> Self {
        CellFormat {
            font_id,
            ..Default::default()
        }
    }
}

/// The palette: number formats, fonts, fills, borders and cell formats
#[derive(Debug, Clone, PartialEq)]
pub struct StyleTable {
    pub number_formats: Vec<NumberFormat>,
    pub fonts: Vec<Font>,
    pub fills: Vec<Fill>,
    pub borders: Vec<Border>,
    pub cell_formats: Vec<CellFormat>,
    /// Position of each named style in `cell_formats`
    named: IndexMap<NamedStyle, u32>,
}

impl StyleTable {
    /// Build the palette; only the header fill varies between exports
    pub fn build(header_fill: &HeaderColor) -> Self {
        let number_formats = vec![
            NumberFormat {
                id: FIRST_CUSTOM_NUM_FMT,
                code: "dd/MMM/yyyy hh:mm:ss",
            },
            NumberFormat {
                id: FIRST_CUSTOM_NUM_FMT + 1,
                code: "dd/MMM/yyyy",
            },
        ];

        let fonts = vec![
            Font::regular("Arial", "FF000000"),
            Font {
                bold: true,
                ..Font::regular("Arial", "FFFFFFFF")
            },
            Font {
                italic: true,
                ..Font::regular("Times New Roman", "FF000000")
            },
            Font {
                underline: true,
                ..Font::regular("Arial", "FF0000FF")
            },
        ];

        let fills = vec![
            Fill::None,
            Fill::Gray125,
            Fill::Solid("FFFFFF00".to_string()),
            Fill::Solid(header_fill.argb()),
        ];

        let borders = vec![Border::None, Border::ThinBox];

        let mut named = IndexMap::with_capacity(NamedStyle::ALL.len());
        let mut cell_formats = Vec::with_capacity(NamedStyle::ALL.len());
        for style in NamedStyle::ALL {
            debug_assert_eq!(style.index() as usize, cell_formats.len());
            named.insert(style, style.index());
            cell_formats.push(Self::format_of(style));
        }

        StyleTable {
            number_formats,
            fonts,
            fills,
            borders,
            cell_formats,
            named,
        }
    }

    fn format_of(style: NamedStyle) -> CellFormat {
        match style {
            NamedStyle::Default => CellFormat::default(),
            NamedStyle::DateTime => CellFormat::number(FIRST_CUSTOM_NUM_FMT),
            NamedStyle::DateOnly => CellFormat::number(FIRST_CUSTOM_NUM_FMT + 1),
            NamedStyle::Header => CellFormat {
                font_id: 1,
                fill_id: 3,
                centered: true,
                ..Default::default()
            },
            NamedStyle::IntegerNumber => CellFormat::number(NUM_FMT_INTEGER),
            NamedStyle::DecimalNumber => CellFormat::number(NUM_FMT_DECIMAL),
            NamedStyle::Bold => CellFormat::font(1),
            NamedStyle::Italic | NamedStyle::TimesRoman => CellFormat::font(2),
            NamedStyle::YellowFill => CellFormat {
                fill_id: 2,
                ..Default::default()
            },
            NamedStyle::Centered => CellFormat {
                centered: true,
                ..Default::default()
            },
            NamedStyle::Bordered => CellFormat {
                border_id: 1,
                ..Default::default()
            },
            NamedStyle::Hyperlink => CellFormat::font(3),
        }
    }

    /// Cell format index of a named style
    pub fn index_of(&self, style: NamedStyle) -> u32 {
        // every named style is registered by build()
        self.named.get(&style).copied().unwrap_or_default()
    }

    /// Write the palette as a complete `styles.xml` part
    pub fn write_xml<W: Write>(&self, xml: &mut XmlWriter<W>) -> Result<()> {
        xml.write_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n");
        xml.start_element("styleSheet");
        xml.attribute(
            "xmlns",
            "http://schemas.openxmlformats.org/spreadsheetml/2006/main",
        );
        xml.close_start_tag();

        xml.start_element("numFmts");
        xml.attribute_int("count", self.number_formats.len());
        xml.close_start_tag();
        for fmt in &self.number_formats {
            xml.start_element("numFmt");
            xml.attribute_int("numFmtId", fmt.id);
            xml.attribute("formatCode", fmt.code);
            xml.close_empty();
        }
        xml.end_element("numFmts");

        xml.start_element("fonts");
        xml.attribute_int("count", self.fonts.len());
        xml.close_start_tag();
        for font in &self.fonts {
            xml.write_str("<font>");
            if font.bold {
                xml.empty_element("b");
            }
            if font.italic {
                xml.empty_element("i");
            }
            if font.underline {
                xml.write_str("<u val=\"single\"/>");
            }
            xml.start_element("sz");
            xml.attribute_number("val", font.size);
            xml.close_empty();
            xml.start_element("color");
            xml.attribute("rgb", font.color);
            xml.close_empty();
            xml.start_element("name");
            xml.attribute("val", font.name);
            xml.close_empty();
            xml.end_element("font");
        }
        xml.end_element("fonts");

        xml.start_element("fills");
        xml.attribute_int("count", self.fills.len());
        xml.close_start_tag();
        for fill in &self.fills {
            match fill {
                Fill::None => xml.write_str("<fill><patternFill patternType=\"none\"/></fill>"),
                Fill::Gray125 => {
                    xml.write_str("<fill><patternFill patternType=\"gray125\"/></fill>")
                }
                Fill::Solid(argb) => {
                    xml.write_str("<fill><patternFill patternType=\"solid\"><fgColor");
                    xml.attribute("rgb", argb);
                    xml.write_str("/></patternFill></fill>");
                }
            }
        }
        xml.end_element("fills");

        xml.start_element("borders");
        xml.attribute_int("count", self.borders.len());
        xml.close_start_tag();
        for border in &self.borders {
            match border {
                Border::None => {
                    xml.write_str("<border><left/><right/><top/><bottom/><diagonal/></border>")
                }
                Border::ThinBox => {
                    xml.write_str("<border>");
                    for side in ["left", "right", "top", "bottom"] {
                        xml.start_element(side);
                        xml.attribute("style", "thin");
                        xml.write_str("><color auto=\"1\"/>");
                        xml.end_element(side);
                    }
                    xml.write_str("<diagonal/></border>");
                }
            }
        }
        xml.end_element("borders");

        xml.write_str(
            "<cellStyleXfs count=\"1\"><xf numFmtId=\"0\" fontId=\"0\" fillId=\"0\" borderId=\"0\"/></cellStyleXfs>",
        );

        xml.start_element("cellXfs");
        xml.attribute_int("count", self.cell_formats.len());
        xml.close_start_tag();
        for fmt in &self.cell_formats {
            xml.start_element("xf");
            xml.attribute_int("numFmtId", fmt.num_fmt_id);
            xml.attribute_int("fontId", fmt.font_id);
            xml.attribute_int("fillId", fmt.fill_id);
            xml.attribute_int("borderId", fmt.border_id);
            xml.attribute_int("xfId", 0u32);
            if fmt.num_fmt_id != 0 {
                xml.attribute("applyNumberFormat", "1");
            }
            if fmt.font_id != 0 {
                xml.attribute("applyFont", "1");
            }
            if fmt.fill_id != 0 {
                xml.attribute("applyFill", "1");
            }
            if fmt.border_id != 0 {
                xml.attribute("applyBorder", "1");
            }
            if fmt.centered {
                xml.attribute("applyAlignment", "1");
                xml.write_str("><alignment horizontal=\"center\" vertical=\"center\"/></xf>");
            } else {
                xml.close_empty();
            }
        }
        xml.end_element("cellXfs");

        xml.write_str(
            "<cellStyles count=\"1\"><cellStyle name=\"Normal\" xfId=\"0\" builtinId=\"0\"/></cellStyles>",
        );
        xml.end_element("styleSheet");
        xml.commit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> StyleTable {
        StyleTable::build(&HeaderColor::parse("2A41E4").unwrap())
    }

    #[test]
    fn test_named_indices_are_positions() {
        let styles = table();
        assert_eq!(styles.cell_formats.len(), NamedStyle::ALL.len());
        for (pos, style) in NamedStyle::ALL.iter().enumerate() {
            assert_eq!(styles.index_of(*style) as usize, pos);
            assert_eq!(styles.index_of(*style), style.index());
        }
    }

    #[test]
    fn test_fixed_content() {
        let styles = table();
        assert_eq!(styles.number_formats[0].id, 164);
        assert_eq!(styles.number_formats[0].code, "dd/MMM/yyyy hh:mm:ss");
        assert_eq!(styles.number_formats[1].code, "dd/MMM/yyyy");
        assert_eq!(styles.fonts.len(), 4);
        assert!(styles.fonts[1].bold);
        assert!(styles.fonts[3].underline);
        assert_eq!(styles.fills[3], Fill::Solid("FF2A41E4".to_string()));
        assert_eq!(styles.borders, vec![Border::None, Border::ThinBox]);

        let header = styles.cell_formats[NamedStyle::Header.index() as usize];
        assert_eq!((header.font_id, header.fill_id), (1, 3));
        assert!(header.centered);
        let date = styles.cell_formats[NamedStyle::DateOnly.index() as usize];
        assert_eq!(date.num_fmt_id, 165);
        let decimal = styles.cell_formats[NamedStyle::DecimalNumber.index() as usize];
        assert_eq!(decimal.num_fmt_id, 4);
    }

    #[test]
    fn test_only_header_fill_varies() {
        let a = table();
        let b = StyleTable::build(&HeaderColor::parse("00FF00").unwrap());
        assert_ne!(a, b);
        assert_eq!(a.cell_formats, b.cell_formats);
        assert_eq!(a.fonts, b.fonts);
        assert_eq!(a.fills[..3], b.fills[..3]);
    }

    #[test]
    fn test_write_xml() {
        let styles = table();
        let mut xml = XmlWriter::new(Vec::new());
        styles.write_xml(&mut xml).unwrap();
        let out = String::from_utf8(xml.into_inner().unwrap()).unwrap();

        assert!(out.contains("<numFmt numFmtId=\"164\" formatCode=\"dd/MMM/yyyy hh:mm:ss\"/>"));
        assert!(out.contains("<fonts count=\"4\">"));
        assert!(out.contains("<fgColor rgb=\"FF2A41E4\"/>"));
        assert!(out.contains("<cellXfs count=\"13\">"));
        assert!(out.contains("<left style=\"thin\"><color auto=\"1\"/></left>"));
        assert!(out.contains(
            "<xf numFmtId=\"0\" fontId=\"1\" fillId=\"3\" borderId=\"0\" xfId=\"0\" applyFont=\"1\" applyFill=\"1\" applyAlignment=\"1\"><alignment horizontal=\"center\" vertical=\"center\"/></xf>"
        ));
        assert!(out.ends_with("</styleSheet>"));
    }
}
