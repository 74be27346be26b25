use serde::{Deserialize, Serialize};

const POWERBI_PALETTE: [&str; 12] = [
    "#01B8AA", "#374649", "#FD625E", "#F2C80F", "#5F6B6D", "#8AD4EB", "#FE9666", "#A66999",
    "#3599B8", "#DFBFBF", "#4AC5BB", "#5F6B6D",
];

const MODERN_PALETTE: [&str; 10] = [
    "#4e79a7", "#f28e2c", "#e15759", "#76b7b2", "#59a14f", "#edc949", "#af7aa1", "#ff9da7",
    "#9c755f", "#bab0ab",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub palette: Vec<String>,
    pub background: String,
    pub foreground: String,
    pub high_contrast: bool,
}

impl Theme {
    pub fn powerbi_default() -> Self {
        Self {
            font_family: "\"Segoe UI\", wf_segoe-ui_normal, helvetica, arial, sans-serif"
                .to_string(),
            palette: POWERBI_PALETTE.iter().map(|color| color.to_string()).collect(),
            background: "#FFFFFF".to_string(),
            foreground: "#000000".to_string(),
            high_contrast: false,
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            palette: MODERN_PALETTE.iter().map(|color| color.to_string()).collect(),
            background: "#FFFFFF".to_string(),
            foreground: "#1C2430".to_string(),
            high_contrast: false,
        }
    }

    /// Windows high contrast "black" scheme.
    pub fn high_contrast() -> Self {
        Self {
            font_family: "Arial, sans-serif".to_string(),
            palette: vec!["#FFFF00".to_string()],
            background: "#000000".to_string(),
            foreground: "#FFFF00".to_string(),
            high_contrast: true,
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "default" | "powerbi" => Some(Self::powerbi_default()),
            "modern" => Some(Self::modern()),
            "high-contrast" | "highContrast" => Some(Self::high_contrast()),
            _ => None,
        }
    }
}
