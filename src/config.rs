use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Raster size used for PNG output; the SVG itself stays in board units.
    pub width: f32,
    pub height: f32,
    /// The fabrication layer is parsed but not drawn unless enabled.
    pub fabrication: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            fabrication: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub theme: Theme,
    pub render: RenderConfig,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    theme: Option<ThemeOverrides>,
    #[serde(default)]
    render: Option<RenderOverrides>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeOverrides {
    background: Option<String>,
    border: Option<String>,
    silkscreen: Option<String>,
    fabrication: Option<String>,
    pad: Option<String>,
    edge: Option<String>,
    label_font_size: Option<f64>,
    pad_stroke_width: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct RenderOverrides {
    width: Option<f32>,
    height: Option<f32>,
    fabrication: Option<bool>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = serde_json::from_str(&contents)?;

    if let Some(theme) = parsed.theme {
        if let Some(v) = theme.background {
            config.theme.background = v;
        }
        if let Some(v) = theme.border {
            config.theme.border = v;
        }
        if let Some(v) = theme.silkscreen {
            config.theme.silkscreen = v;
        }
        if let Some(v) = theme.fabrication {
            config.theme.fabrication = v;
        }
        if let Some(v) = theme.pad {
            config.theme.pad = v;
        }
        if let Some(v) = theme.edge {
            config.theme.edge = v;
        }
        if let Some(v) = theme.label_font_size {
            config.theme.label_font_size = v;
        }
        if let Some(v) = theme.pad_stroke_width {
            config.theme.pad_stroke_width = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
        if let Some(v) = render.fabrication {
            config.render.fabrication = v;
        }
    }

    Ok(config)
}
