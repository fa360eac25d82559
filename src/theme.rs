use serde::{Deserialize, Serialize};

/// Colors and fixed style values for one render. Stroke widths carried by
/// the records themselves resolve in `ir`; everything here is surface-level
/// styling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub background: String,
    pub border: String,
    pub silkscreen: String,
    pub fabrication: String,
    pub pad: String,
    pub edge: String,
    /// Label text size in board units.
    pub label_font_size: f64,
    pub pad_stroke_width: f64,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            background: "#f9f9f9".to_string(),
            border: "#333".to_string(),
            silkscreen: "orange".to_string(),
            fabrication: "purple".to_string(),
            pad: "purple".to_string(),
            edge: "#800080".to_string(),
            label_font_size: 2.0,
            pad_stroke_width: 0.1,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
