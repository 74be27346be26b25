use chord_rs_renderer::config::parse_config;
use chord_rs_renderer::theme::Theme;
use chord_rs_renderer::{RenderOptions, parse_table_json, render_with_options};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChordRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    width: Option<f64>,
    height: Option<f64>,
    /// Full config document, same shape as the CLI's config file.
    config: Option<serde_json::Value>,
    #[serde(default)]
    selected: Vec<String>,
    #[serde(default)]
    multi_select: bool,
}

fn build_render_options(options: ChordRenderOptions) -> Result<RenderOptions, String> {
    let mut render_options = match options.config {
        Some(config) => RenderOptions {
            config: parse_config(&config.to_string()).map_err(|error| error.to_string())?,
            ..RenderOptions::default()
        },
        None => RenderOptions::default(),
    };

    if let Some(theme) = options.theme.as_deref().and_then(Theme::by_name) {
        render_options.config.render.background = theme.background.clone();
        render_options.config.theme = theme;
    }
    if let Some(font_family) = options.font_family {
        render_options.config.theme.font_family = font_family;
    }
    if let Some(width) = options.width {
        render_options.config.render.width = width;
    }
    if let Some(height) = options.height {
        render_options.config.render.height = height;
    }
    render_options.selected = options.selected;
    render_options.multi_select = options.multi_select;

    Ok(render_options)
}

#[wasm_bindgen]
pub fn render_chord_svg(table_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<ChordRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        ChordRenderOptions::default()
    };

    let render_options = build_render_options(options).map_err(|error| JsValue::from_str(&error))?;
    let table = parse_table_json(table_json).map_err(|error| JsValue::from_str(&error.to_string()))?;
    Ok(render_with_options(&table, &render_options))
}

#[cfg(test)]
mod tests {
    use chord_rs_renderer::{parse_table_json, render_with_options};

    use crate::{ChordRenderOptions, build_render_options};

    #[test]
    fn renders_table_with_selection() {
        let table = parse_table_json(
            r#"{
                "category": {"displayName": "From", "values": ["Lucas", "Henry"]},
                "series": {"displayName": "To"},
                "values": [
                    {"series": "Lucas", "values": [null, 5]},
                    {"series": "Henry", "values": [10, null]}
                ]
            }"#,
        )
        .expect("table should parse");
        let options: ChordRenderOptions =
            serde_json::from_str(r#"{"theme": "modern", "width": 500, "selected": ["Henry"]}"#)
                .expect("options should parse");

        let svg = render_with_options(&table, &build_render_options(options).unwrap());

        assert!(svg.contains("<svg"));
        assert!(svg.contains("width=\"500\""));
        assert!(svg.contains("Henry"));
        assert!(svg.contains("opacity=\"0.3\""));
    }

    #[test]
    fn config_document_is_applied() {
        let options: ChordRenderOptions =
            serde_json::from_str(r#"{"config": {"axis": {"show": false}}}"#).unwrap();
        let options = build_render_options(options).unwrap();
        assert!(!options.config.settings.axis.show);
    }
}
