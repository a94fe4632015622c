//! Status color derivation

use crate::error::{EditError, EditResult};

pub const DEFAULT_BACKGROUND: &str = "#e6e6e6";
pub const WHITE: &str = "#ffffff";
pub const BLACK: &str = "#000000";

/// Share of the distance to white used for `statusBackgroundColor`
pub const STATUS_BACKGROUND_LIGHTEN: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Accepts `#RRGGBB` (case-insensitive, leading `#` optional)
    pub fn parse(hex: &str) -> EditResult<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(EditError::InvalidColor(hex.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| EditError::InvalidColor(hex.to_string()))
        };
        Ok(Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    /// Perceived luminance in `0.0..=1.0`
    pub fn luminance(self) -> f64 {
        (0.299 * self.0 as f64 + 0.587 * self.1 as f64 + 0.114 * self.2 as f64) / 255.0
    }

    /// Move every channel `amount` of the way toward 255
    pub fn lighten(self, amount: f64) -> Self {
        let step = |c: u8| {
            let c = c as f64;
            (c + (255.0 - c) * amount).round().min(255.0) as u8
        };
        Rgb(step(self.0), step(self.1), step(self.2))
    }
}

/// White text when luminance is below one half, black otherwise.
///
/// The platform's own editor uses the same threshold, so exports match it.
pub fn text_color_for(background: &str) -> EditResult<&'static str> {
    let rgb = Rgb::parse(background)?;
    Ok(if rgb.luminance() < 0.5 { WHITE } else { BLACK })
}

pub fn status_background_for(background: &str) -> EditResult<String> {
    Ok(Rgb::parse(background)?.lighten(STATUS_BACKGROUND_LIGHTEN).to_hex())
}

/// The four colors a status is exported with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusColors {
    pub background: String,
    pub text: String,
    pub status_text: String,
    pub status_background: String,
}

impl StatusColors {
    /// Derive from a background, letting any explicit override win
    pub fn derive(
        background: Option<&str>,
        text: Option<&str>,
        status_text: Option<&str>,
        status_background: Option<&str>,
    ) -> EditResult<Self> {
        let background = background.unwrap_or(DEFAULT_BACKGROUND).to_string();
        let text = match text {
            Some(t) => t.to_string(),
            None => text_color_for(&background)?.to_string(),
        };
        let status_text = status_text.map(str::to_string).unwrap_or_else(|| background.clone());
        let status_background = match status_background {
            Some(s) => s.to_string(),
            None => status_background_for(&background)?,
        };

        Ok(Self {
            background,
            text,
            status_text,
            status_background,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(Rgb::parse("#F4B000").unwrap(), Rgb(0xf4, 0xb0, 0x00));
        assert!(Rgb::parse("f4b000").is_ok());
        assert!(Rgb::parse("#f4b0").is_err());
        assert!(Rgb::parse("#zzzzzz").is_err());
    }

    #[test]
    fn test_text_color_threshold() {
        // Amber is light enough to land on black text
        assert_eq!(text_color_for("#f4b000").unwrap(), BLACK);
        assert_eq!(text_color_for("#000000").unwrap(), WHITE);
        assert_eq!(text_color_for("#ffffff").unwrap(), BLACK);
        assert_eq!(text_color_for("#0088cc").unwrap(), WHITE);
    }

    #[test]
    fn test_lighten() {
        assert_eq!(Rgb(0, 0, 0).lighten(0.8), Rgb(204, 204, 204));
        assert_eq!(Rgb(255, 255, 255).lighten(0.8), Rgb(255, 255, 255));
        assert_eq!(status_background_for("#f4b000").unwrap(), "#fdefcc");
    }

    #[test]
    fn test_derived_colors_never_darken() {
        for hex in ["#000000", "#f4b000", "#0088cc", "#00aa55", "#8855dd", "#123456", "#fefefe"] {
            let colors = StatusColors::derive(Some(hex), None, None, None).unwrap();
            assert_eq!(colors.status_text, hex);

            let base = Rgb::parse(hex).unwrap();
            let light = Rgb::parse(&colors.status_background).unwrap();
            assert!(light.0 >= base.0 && light.1 >= base.1 && light.2 >= base.2);
        }
    }

    #[test]
    fn test_overrides_win() {
        let colors = StatusColors::derive(Some("#f4b000"), Some("#ffffff"), None, Some("#f5f5f5")).unwrap();
        assert_eq!(colors.text, "#ffffff");
        assert_eq!(colors.status_text, "#f4b000");
        assert_eq!(colors.status_background, "#f5f5f5");
    }

    #[test]
    fn test_missing_background_uses_default() {
        let colors = StatusColors::derive(None, None, None, None).unwrap();
        assert_eq!(colors.background, DEFAULT_BACKGROUND);
        assert_eq!(colors.text, BLACK);
    }
}
