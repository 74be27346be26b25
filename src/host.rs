//! Capabilities the embedding dashboard provides, with standalone defaults.

use std::collections::HashMap;

use serde::Serialize;

use crate::theme::Theme;

/// Identity of one diagram node as issued to the selection manager.
///
/// Local code never decides whether two identities match; that is
/// [`SelectionManager::includes`]'s job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SelectionId {
    Category { row: usize },
    Series { group: Option<usize>, measure: Option<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Result of a selection manager request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Ready,
    /// The host finishes later and reports back with
    /// [`crate::behavior::Message::SelectionCompleted`].
    Pending,
}

pub trait SelectionManager {
    fn selection_ids(&self) -> Vec<SelectionId>;
    fn select(&mut self, ids: &[SelectionId], multi_select: bool) -> Completion;
    fn clear(&mut self) -> Completion;
    /// `identity` is `None` for the neutral background identity.
    fn show_context_menu(&mut self, identity: Option<&SelectionId>, position: Point);

    fn includes(&self, selected: &SelectionId, candidate: &SelectionId) -> bool {
        selected == candidate
    }
}

/// In-process selection manager for standalone rendering and tests.
#[derive(Debug, Default)]
pub struct LocalSelectionManager {
    selected: Vec<SelectionId>,
    deferred: bool,
    context_menus: Vec<(Option<SelectionId>, Point)>,
}

impl LocalSelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report every select/clear as [`Completion::Pending`], like hosts
    /// that round-trip selection asynchronously.
    pub fn deferred() -> Self {
        Self {
            deferred: true,
            ..Self::default()
        }
    }

    /// Replace the selection without going through a diagram interaction,
    /// as a bookmark restore does.
    pub fn restore(&mut self, ids: Vec<SelectionId>) {
        self.selected = ids;
    }

    pub fn context_menus(&self) -> &[(Option<SelectionId>, Point)] {
        &self.context_menus
    }

    fn completion(&self) -> Completion {
        if self.deferred {
            Completion::Pending
        } else {
            Completion::Ready
        }
    }
}

impl SelectionManager for LocalSelectionManager {
    fn selection_ids(&self) -> Vec<SelectionId> {
        self.selected.clone()
    }

    fn select(&mut self, ids: &[SelectionId], multi_select: bool) -> Completion {
        if multi_select {
            for id in ids {
                if let Some(pos) = self.selected.iter().position(|current| current == id) {
                    self.selected.remove(pos);
                } else {
                    self.selected.push(id.clone());
                }
            }
        } else {
            self.selected = ids.to_vec();
        }
        self.completion()
    }

    fn clear(&mut self) -> Completion {
        self.selected.clear();
        self.completion()
    }

    fn show_context_menu(&mut self, identity: Option<&SelectionId>, position: Point) {
        self.context_menus.push((identity.cloned(), position));
    }
}

pub trait ColorPalette {
    /// Stable color for a series/category key; new keys take the next
    /// palette entry.
    fn color_for(&mut self, key: &str) -> String;
    fn is_high_contrast(&self) -> bool;
    fn foreground(&self) -> String;
    fn background(&self) -> String;

    /// Foreground in high contrast mode, otherwise `color` unchanged.
    fn high_contrast_foreground(&self, color: &str) -> String {
        if self.is_high_contrast() {
            self.foreground()
        } else {
            color.to_string()
        }
    }
}

#[derive(Debug, Clone)]
pub struct DefaultPalette {
    colors: Vec<String>,
    assigned: HashMap<String, String>,
    next: usize,
    high_contrast: bool,
    foreground: String,
    background: String,
}

impl DefaultPalette {
    pub fn from_theme(theme: &Theme) -> Self {
        Self {
            colors: theme.palette.clone(),
            assigned: HashMap::new(),
            next: 0,
            high_contrast: theme.high_contrast,
            foreground: theme.foreground.clone(),
            background: theme.background.clone(),
        }
    }
}

impl ColorPalette for DefaultPalette {
    fn color_for(&mut self, key: &str) -> String {
        if let Some(color) = self.assigned.get(key) {
            return color.clone();
        }
        let color = if self.colors.is_empty() {
            self.foreground.clone()
        } else {
            self.colors[self.next % self.colors.len()].clone()
        };
        self.next += 1;
        self.assigned.insert(key.to_string(), color.clone());
        color
    }

    fn is_high_contrast(&self) -> bool {
        self.high_contrast
    }

    fn foreground(&self) -> String {
        self.foreground.clone()
    }

    fn background(&self) -> String {
        self.background.clone()
    }
}

pub trait Localizer {
    fn display_name(&self, key: &str) -> String;
}

/// English display names for the keys this crate asks for; unknown keys
/// are returned as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityLocalizer;

impl Localizer for IdentityLocalizer {
    fn display_name(&self, key: &str) -> String {
        match key {
            "Visual_Category" => "Category".to_string(),
            "Visual_Series" => "Series".to_string(),
            "Visual_Value" => "Value".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_select_replaces_selection() {
        let mut manager = LocalSelectionManager::new();
        let a = SelectionId::Category { row: 0 };
        let b = SelectionId::Category { row: 1 };
        manager.select(std::slice::from_ref(&a), false);
        manager.select(std::slice::from_ref(&a), false);
        assert_eq!(manager.selection_ids(), vec![a.clone()]);
        manager.select(std::slice::from_ref(&b), false);
        assert_eq!(manager.selection_ids(), vec![b]);
    }

    #[test]
    fn multi_select_toggles() {
        let mut manager = LocalSelectionManager::new();
        let a = SelectionId::Category { row: 0 };
        let b = SelectionId::Category { row: 1 };
        manager.select(std::slice::from_ref(&a), true);
        manager.select(std::slice::from_ref(&b), true);
        assert_eq!(manager.selection_ids().len(), 2);
        manager.select(std::slice::from_ref(&a), true);
        assert_eq!(manager.selection_ids(), vec![b]);
    }

    #[test]
    fn palette_is_stable_per_key() {
        let mut palette = DefaultPalette::from_theme(&Theme::powerbi_default());
        let first = palette.color_for("Lucas");
        let second = palette.color_for("Henry");
        assert_ne!(first, second);
        assert_eq!(palette.color_for("Lucas"), first);
    }

    #[test]
    fn high_contrast_overrides() {
        let palette = DefaultPalette::from_theme(&Theme::high_contrast());
        assert!(palette.is_high_contrast());
        assert_eq!(palette.high_contrast_foreground("#123456"), palette.foreground());

        let normal = DefaultPalette::from_theme(&Theme::powerbi_default());
        assert_eq!(normal.high_contrast_foreground("#123456"), "#123456");
    }
}
