pub mod behavior;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod host;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{ChartSettings, ChordConfig, Config};
pub use ir::ChordTable;
pub use layout::{ChordLayout, compute_layout};
pub use parser::{parse_input, parse_table_json};
pub use render::render_svg;
pub use theme::Theme;

use behavior::{Behavior, BehaviorOptions, Interaction, Message, Modifiers, PointerEvent};
use host::{DefaultPalette, IdentityLocalizer, LocalSelectionManager};

/// One-shot rendering inputs: configuration plus arcs to select by label.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub config: Config,
    pub selected: Vec<String>,
    /// Select every label in `selected` instead of only the last one.
    pub multi_select: bool,
}

impl RenderOptions {
    pub fn with_theme(theme: Theme) -> Self {
        let mut options = Self::default();
        options.config.render.background = theme.background.clone();
        options.config.theme = theme;
        options
    }
}

/// Lays out `table` and applies selection and highlights. `None` when the
/// table has nothing to draw.
pub fn layout_with_options(table: &ChordTable, options: &RenderOptions) -> Option<ChordLayout> {
    let config = &options.config;
    let mut palette = DefaultPalette::from_theme(&config.theme);
    let mut layout = compute_layout(table, config, &mut palette, &IdentityLocalizer)?;

    let mut behavior = Behavior::new(
        LocalSelectionManager::new(),
        BehaviorOptions::from_table(table, &config.layout),
    );
    let modifiers = Modifiers {
        ctrl: options.multi_select,
        ..Modifiers::default()
    };
    for label in &options.selected {
        match layout.arcs.iter().find(|arc| &arc.data.label == label) {
            Some(arc) => behavior.post(Message::Interaction(Interaction::ArcClick {
                arc: arc.index,
                event: Some(PointerEvent {
                    modifiers,
                    ..PointerEvent::default()
                }),
            })),
            None => tracing::warn!(label = label.as_str(), "no arc with this label to select"),
        }
    }
    behavior.process(&mut layout);
    behavior.sync_and_render(&mut layout);
    Some(layout)
}

pub fn render_with_options(table: &ChordTable, options: &RenderOptions) -> String {
    match layout_with_options(table, options) {
        Some(layout) => render_svg(&layout, &options.config.theme, &options.config.layout),
        None => render::render_empty_svg(&options.config.render),
    }
}

pub fn render_table(table: &ChordTable, config: &Config) -> String {
    render_with_options(
        table,
        &RenderOptions {
            config: config.clone(),
            ..RenderOptions::default()
        },
    )
}
