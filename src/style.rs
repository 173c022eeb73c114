//! Text style for one field: font, size, leading, colour, alignment.

use crate::error::{LabelError, Result};
use crate::metrics::{Widths, COURIER_ADVANCE, HELVETICA, HELVETICA_BOLD, TIMES_BOLD, TIMES_ROMAN};

/// Font size used when a field does not set one
pub const DEFAULT_FONT_SIZE: f32 = 10.0;

/// Leading used when a field does not set a font size
pub const DEFAULT_LEADING: f32 = 12.0;

/// Leading as a multiple of an explicitly configured font size
pub const LEADING_RATIO: f32 = 1.1;

// ============================================================================
// Fonts
// ============================================================================

/// The standard PDF faces, which need no embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Font {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    TimesRoman,
    TimesBold,
    TimesItalic,
    TimesBoldItalic,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
}

const FONT_NAMES: &[(&str, Font)] = &[
    ("Helvetica", Font::Helvetica),
    ("Helvetica-Bold", Font::HelveticaBold),
    ("Helvetica-Oblique", Font::HelveticaOblique),
    ("Helvetica-BoldOblique", Font::HelveticaBoldOblique),
    ("Times-Roman", Font::TimesRoman),
    ("Times-Bold", Font::TimesBold),
    ("Times-Italic", Font::TimesItalic),
    ("Times-BoldItalic", Font::TimesBoldItalic),
    ("Courier", Font::Courier),
    ("Courier-Bold", Font::CourierBold),
    ("Courier-Oblique", Font::CourierOblique),
    ("Courier-BoldOblique", Font::CourierBoldOblique),
];

impl Font {
    /// Resolve a PostScript font name, ignoring case.
    pub fn from_name(name: &str) -> Result<Self> {
        let wanted = name.trim();
        FONT_NAMES
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(wanted))
            .map(|&(_, font)| font)
            .ok_or_else(|| LabelError::UnknownFont(wanted.to_string()))
    }

    pub fn name(&self) -> &'static str {
        FONT_NAMES
            .iter()
            .find(|(_, f)| f == self)
            .map(|(n, _)| *n)
            .unwrap_or("Helvetica")
    }

    pub fn widths(&self) -> Widths {
        match self {
            Font::Helvetica | Font::HelveticaOblique => Widths::Table(&HELVETICA),
            Font::HelveticaBold | Font::HelveticaBoldOblique => Widths::Table(&HELVETICA_BOLD),
            Font::TimesRoman | Font::TimesItalic => Widths::Table(&TIMES_ROMAN),
            Font::TimesBold | Font::TimesBoldItalic => Widths::Table(&TIMES_BOLD),
            Font::Courier | Font::CourierBold | Font::CourierOblique | Font::CourierBoldOblique => {
                Widths::Fixed(COURIER_ADVANCE)
            }
        }
    }
}

// ============================================================================
// Colours
// ============================================================================

/// RGB colour with components in 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Colour {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

const NAMED_COLOURS: &[(&str, u32)] = &[
    ("black", 0x000000),
    ("white", 0xFFFFFF),
    ("red", 0xFF0000),
    ("green", 0x008000),
    ("lime", 0x00FF00),
    ("blue", 0x0000FF),
    ("yellow", 0xFFFF00),
    ("orange", 0xFFA500),
    ("darkorange", 0xFF8C00),
    ("purple", 0x800080),
    ("gray", 0x808080),
    ("grey", 0x808080),
    ("darkgray", 0xA9A9A9),
    ("darkgrey", 0xA9A9A9),
    ("lightgray", 0xD3D3D3),
    ("lightgrey", 0xD3D3D3),
    ("silver", 0xC0C0C0),
    ("darkgreen", 0x006400),
    ("forestgreen", 0x228B22),
    ("olive", 0x808000),
    ("teal", 0x008080),
    ("cyan", 0x00FFFF),
    ("aqua", 0x00FFFF),
    ("magenta", 0xFF00FF),
    ("fuchsia", 0xFF00FF),
    ("navy", 0x000080),
    ("darkblue", 0x00008B),
    ("maroon", 0x800000),
    ("darkred", 0x8B0000),
    ("crimson", 0xDC143C),
    ("brown", 0xA52A2A),
    ("saddlebrown", 0x8B4513),
    ("chocolate", 0xD2691E),
    ("tan", 0xD2B48C),
    ("gold", 0xFFD700),
    ("pink", 0xFFC0CB),
];

impl Colour {
    pub const BLACK: Colour = Colour {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    pub fn from_rgb24(rgb: u32) -> Self {
        let channel = |shift: u32| ((rgb >> shift) & 0xFF) as f32 / 255.0;
        Self {
            r: channel(16),
            g: channel(8),
            b: channel(0),
        }
    }

    /// Parse `#rrggbb`, `#rgb`, `0xrrggbb` or a CSS colour name.
    pub fn parse(value: &str) -> Result<Self> {
        let text = value.trim();
        let unknown = || LabelError::UnknownColour(text.to_string());

        let hex = text
            .strip_prefix('#')
            .or_else(|| text.strip_prefix("0x"))
            .or_else(|| text.strip_prefix("0X"));

        if let Some(digits) = hex {
            if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(unknown());
            }
            let rgb = match digits.len() {
                6 => u32::from_str_radix(digits, 16).map_err(|_| unknown())?,
                3 => {
                    let short = u32::from_str_radix(digits, 16).map_err(|_| unknown())?;
                    let (r, g, b) = ((short >> 8) & 0xF, (short >> 4) & 0xF, short & 0xF);
                    (r * 0x11) << 16 | (g * 0x11) << 8 | (b * 0x11)
                }
                _ => return Err(unknown()),
            };
            return Ok(Self::from_rgb24(rgb));
        }

        NAMED_COLOURS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(text))
            .map(|&(_, rgb)| Self::from_rgb24(rgb))
            .ok_or_else(unknown)
    }
}

// ============================================================================
// Style
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
}

impl Alignment {
    /// `c` selects centred text, anything else is left aligned
    pub fn from_layout_flag(flag: &str) -> Self {
        if flag.trim() == "c" {
            Alignment::Center
        } else {
            Alignment::Left
        }
    }
}

/// Style attributes as configured; `None` means "use the default".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleOptions {
    pub font: Option<Font>,
    pub font_size: Option<f32>,
    pub leading: Option<f32>,
    pub colour: Option<Colour>,
    pub alignment: Option<Alignment>,
}

/// Fully resolved style, ready to render with.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font: Font,
    pub font_size: f32,
    pub leading: f32,
    pub colour: Colour,
    pub alignment: Alignment,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font: Font::Helvetica,
            font_size: DEFAULT_FONT_SIZE,
            leading: DEFAULT_LEADING,
            colour: Colour::BLACK,
            alignment: Alignment::Left,
        }
    }
}

impl TextStyle {
    pub fn resolve(options: &StyleOptions) -> Self {
        let defaults = Self::default();
        Self {
            font: options.font.unwrap_or(defaults.font),
            font_size: options.font_size.unwrap_or(defaults.font_size),
            leading: options.leading.unwrap_or(defaults.leading),
            colour: options.colour.unwrap_or(defaults.colour),
            alignment: options.alignment.unwrap_or(defaults.alignment),
        }
    }

    pub fn text_width(&self, text: &str) -> f32 {
        self.font.widths().text_width(text, self.font_size)
    }
}
