//! Advance widths for line wrapping, read from the face the document is
//! drawn with.
//!
//! Faces come from the fonts bundled with the typesetter, so the widths used
//! to break lines are the widths the compiled PDF ends up with.

use rustybuzz::ttf_parser::name_id;
use rustybuzz::{Face, UnicodeBuffer};

use crate::error::ExportError;

pub const PT_TO_MM: f64 = 25.4 / 72.0;
pub const DEFAULT_FAMILY: &str = "Libertinus Serif";

const REGULAR_WEIGHT: u16 = 400;
const BOLD_WEIGHT: u16 = 700;
/// Used when a face carries no cap height
const FALLBACK_CAP_HEIGHT: f64 = 0.7;

/// Regular and bold upright faces of one family
pub struct FontMetrics {
    family: String,
    regular: Face<'static>,
    bold: Face<'static>,
    data: [&'static [u8]; 2],
}

impl FontMetrics {
    /// Load `family` from the bundled fonts, falling back to
    /// [`DEFAULT_FAMILY`] with a warning when it is not bundled.
    pub fn load(family: &str) -> Result<Self, ExportError> {
        if let Some(metrics) = Self::find(family) {
            return Ok(metrics);
        }
        log::warn!("font family \"{family}\" is not bundled, using {DEFAULT_FAMILY}");
        Self::find(DEFAULT_FAMILY).ok_or_else(|| ExportError::Font(DEFAULT_FAMILY.to_string()))
    }

    fn find(family: &str) -> Option<Self> {
        let candidates: Vec<(&'static [u8], u16)> = typst_assets::fonts()
            .filter_map(|data| {
                let face = Face::from_slice(data, 0)?;
                let matches = !face.is_italic()
                    && family_name(&face).is_some_and(|name| name.eq_ignore_ascii_case(family));
                matches.then(|| (data, face.weight().to_number()))
            })
            .collect();

        // nearest weight, the way the typesetter picks a face
        let nearest = |target: u16| {
            candidates
                .iter()
                .min_by_key(|(_, weight)| weight.abs_diff(target))
                .map(|(data, _)| *data)
        };
        let regular = nearest(REGULAR_WEIGHT)?;
        let bold = nearest(BOLD_WEIGHT)?;
        log::debug!("measuring with {} faces of {family}", candidates.len());

        Some(Self {
            family: family.to_string(),
            regular: Face::from_slice(regular, 0)?,
            bold: Face::from_slice(bold, 0)?,
            data: [regular, bold],
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    /// Font files of the regular and bold faces
    pub fn faces(&self) -> [&'static [u8]; 2] {
        self.data
    }

    fn face(&self, bold: bool) -> &Face<'static> {
        if bold { &self.bold } else { &self.regular }
    }

    /// Shaped width of `text` in millimetres at `size` points.
    pub fn text_width(&self, text: &str, size: f64, bold: bool) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        let face = self.face(bold);
        let mut buffer = UnicodeBuffer::new();
        buffer.push_str(text);
        let glyphs = rustybuzz::shape(face, &[], buffer);
        let units: i32 = glyphs.glyph_positions().iter().map(|p| p.x_advance).sum();
        f64::from(units) / f64::from(face.units_per_em()) * size * PT_TO_MM
    }

    /// Cap height as a fraction of the em
    pub fn cap_height(&self, bold: bool) -> f64 {
        let face = self.face(bold);
        face.capital_height()
            .map(|height| f64::from(height) / f64::from(face.units_per_em()))
            .unwrap_or(FALLBACK_CAP_HEIGHT)
    }
}

fn family_name(face: &Face<'_>) -> Option<String> {
    [name_id::TYPOGRAPHIC_FAMILY, name_id::FAMILY]
        .into_iter()
        .find_map(|id| {
            face.names()
                .into_iter()
                .find(|name| name.name_id == id && name.is_unicode())
                .and_then(|name| name.to_string())
        })
}
