use serde::{Deserialize, Serialize};

/// Highlight color applied to an anchored span, mirroring the host engine's
/// fixed highlight palette.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum HighlightColor {
    Yellow,
    BrightGreen,
    Turquoise,
    Pink,
    Blue,
    Red,
    DarkBlue,
    DarkRed,
    DarkYellow,
    Teal,
    Green,
    Violet,
    Gray25,
    Gray50,
}

impl HighlightColor {
    /// Parse an engine color name (e.g. `wdYellow`) supplied by the extraction
    /// collaborator. Unknown names fall back to yellow.
    pub fn from_engine_name(name: &str) -> Self {
        match name {
            "wdYellow" => HighlightColor::Yellow,
            "wdBrightGreen" => HighlightColor::BrightGreen,
            "wdTurquoise" => HighlightColor::Turquoise,
            "wdPink" => HighlightColor::Pink,
            "wdBlue" => HighlightColor::Blue,
            "wdRed" => HighlightColor::Red,
            "wdDarkBlue" => HighlightColor::DarkBlue,
            "wdDarkRed" => HighlightColor::DarkRed,
            "wdDarkYellow" => HighlightColor::DarkYellow,
            "wdTeal" => HighlightColor::Teal,
            "wdGreen" => HighlightColor::Green,
            "wdViolet" => HighlightColor::Violet,
            "wdGray25" => HighlightColor::Gray25,
            "wdGray50" => HighlightColor::Gray50,
            _ => HighlightColor::Yellow,
        }
    }

    /// Engine color name for logging and the span report.
    pub fn engine_name(&self) -> &'static str {
        match self {
            HighlightColor::Yellow => "wdYellow",
            HighlightColor::BrightGreen => "wdBrightGreen",
            HighlightColor::Turquoise => "wdTurquoise",
            HighlightColor::Pink => "wdPink",
            HighlightColor::Blue => "wdBlue",
            HighlightColor::Red => "wdRed",
            HighlightColor::DarkBlue => "wdDarkBlue",
            HighlightColor::DarkRed => "wdDarkRed",
            HighlightColor::DarkYellow => "wdDarkYellow",
            HighlightColor::Teal => "wdTeal",
            HighlightColor::Green => "wdGreen",
            HighlightColor::Violet => "wdViolet",
            HighlightColor::Gray25 => "wdGray25",
            HighlightColor::Gray50 => "wdGray50",
        }
    }

    /// Numeric index used by the host engine's highlight attribute.
    pub fn engine_index(&self) -> u8 {
        match self {
            HighlightColor::Yellow => 7,
            HighlightColor::BrightGreen => 4,
            HighlightColor::Turquoise => 3,
            HighlightColor::Pink => 5,
            HighlightColor::Blue => 2,
            HighlightColor::Red => 6,
            HighlightColor::DarkBlue => 11,
            HighlightColor::DarkRed => 13,
            HighlightColor::DarkYellow => 14,
            HighlightColor::Teal => 10,
            HighlightColor::Green => 11,
            HighlightColor::Violet => 12,
            HighlightColor::Gray25 => 16,
            HighlightColor::Gray50 => 15,
        }
    }
}

impl Default for HighlightColor {
    fn default() -> Self {
        HighlightColor::Yellow
    }
}
