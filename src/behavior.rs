//! Selection and highlight reconciliation.
//!
//! The [`Behavior`] owns the host selection manager and turns interaction
//! messages into selection requests, then recomputes `selected`,
//! `opacity` and `has_highlight` on the layout's arcs and ribbons.
//! Messages are handled one at a time, in arrival order.

use std::collections::VecDeque;

use crate::config::ChordConfig;
use crate::host::{Completion, Point, SelectionManager};
use crate::ir::ChordTable;
use crate::layout::ChordLayout;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

impl Modifiers {
    pub fn multi_select(self) -> bool {
        self.ctrl || self.meta || self.shift
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerEvent {
    pub position: Point,
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    Other,
}

/// User input on the rendered diagram. A `None` event stands for a
/// handler invoked without an event object.
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    ArcClick { arc: usize, event: Option<PointerEvent> },
    BackgroundClick { event: Option<PointerEvent> },
    ArcContextMenu { arc: usize, event: Option<PointerEvent> },
    BackgroundContextMenu { event: Option<PointerEvent> },
    ArcKeyDown { arc: usize, key: Key, modifiers: Modifiers },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Interaction(Interaction),
    /// A selection request that returned [`Completion::Pending`] finished.
    SelectionCompleted,
    /// The host replaced the selection, e.g. restoring a bookmark.
    ExternalSelectionChanged,
}

/// What the caller should do with the originating UI event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventResponse {
    pub prevent_default: bool,
    pub stop_propagation: bool,
    /// Opacity and selection flags were recomputed.
    pub rendered: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightState {
    /// No selection and nothing highlighted: everything at full opacity.
    Idle,
    /// A highlight field is bound but every highlight is zero: everything
    /// dimmed.
    EmptyHighlightField,
    /// Selection or highlights drive per-element opacity.
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BehaviorOptions {
    pub has_highlights: bool,
    pub has_highlights_object: bool,
    pub full_opacity: f64,
    pub dimmed_opacity: f64,
}

impl BehaviorOptions {
    pub fn from_table(table: &ChordTable, config: &ChordConfig) -> Self {
        Self {
            has_highlights: table.has_highlights(),
            has_highlights_object: table.has_highlights_object(),
            full_opacity: config.full_opacity,
            dimmed_opacity: config.dimmed_opacity,
        }
    }
}

impl Default for BehaviorOptions {
    fn default() -> Self {
        let config = ChordConfig::default();
        Self {
            has_highlights: false,
            has_highlights_object: false,
            full_opacity: config.full_opacity,
            dimmed_opacity: config.dimmed_opacity,
        }
    }
}

pub struct Behavior<M: SelectionManager> {
    selection_manager: M,
    options: BehaviorOptions,
    pending: usize,
    queue: VecDeque<Message>,
}

impl<M: SelectionManager> Behavior<M> {
    pub fn new(selection_manager: M, options: BehaviorOptions) -> Self {
        Self {
            selection_manager,
            options,
            pending: 0,
            queue: VecDeque::new(),
        }
    }

    pub fn selection_manager(&self) -> &M {
        &self.selection_manager
    }

    pub fn selection_manager_mut(&mut self) -> &mut M {
        &mut self.selection_manager
    }

    pub fn pending_completions(&self) -> usize {
        self.pending
    }

    pub fn post(&mut self, message: Message) {
        self.queue.push_back(message);
    }

    /// Handle every queued message against `layout`.
    pub fn process(&mut self, layout: &mut ChordLayout) -> Vec<EventResponse> {
        let mut responses = Vec::with_capacity(self.queue.len());
        while let Some(message) = self.queue.pop_front() {
            responses.push(self.dispatch(message, layout));
        }
        responses
    }

    pub fn dispatch(&mut self, message: Message, layout: &mut ChordLayout) -> EventResponse {
        match message {
            Message::Interaction(interaction) => self.interact(interaction, layout),
            Message::SelectionCompleted => {
                if self.pending == 0 {
                    tracing::warn!("selection completion arrived with nothing pending");
                } else {
                    self.pending -= 1;
                }
                self.sync_and_render(layout);
                rendered()
            }
            Message::ExternalSelectionChanged => {
                self.sync_and_render(layout);
                rendered()
            }
        }
    }

    fn interact(&mut self, interaction: Interaction, layout: &mut ChordLayout) -> EventResponse {
        match interaction {
            Interaction::ArcClick { arc, event } => {
                let Some(event) = event else {
                    return EventResponse::default();
                };
                let mut response = self.select_arc(arc, event.modifiers.multi_select(), layout);
                response.stop_propagation = true;
                response
            }
            Interaction::ArcKeyDown {
                arc,
                key,
                modifiers,
            } => match key {
                Key::Enter | Key::Space => {
                    let mut response = self.select_arc(arc, modifiers.multi_select(), layout);
                    response.prevent_default = true;
                    response
                }
                Key::Other => EventResponse::default(),
            },
            Interaction::BackgroundClick { event } => {
                if event.is_none() {
                    return EventResponse::default();
                }
                let completion = self.selection_manager.clear();
                self.after_request(completion, layout)
            }
            Interaction::ArcContextMenu { arc, event } => {
                let Some(event) = event else {
                    return EventResponse::default();
                };
                let identity = layout.arc(arc).and_then(|arc| arc.identity.as_ref());
                self.selection_manager
                    .show_context_menu(identity, event.position);
                context_menu_handled()
            }
            Interaction::BackgroundContextMenu { event } => {
                let Some(event) = event else {
                    return EventResponse::default();
                };
                self.selection_manager.show_context_menu(None, event.position);
                context_menu_handled()
            }
        }
    }

    fn select_arc(&mut self, arc: usize, multi_select: bool, layout: &mut ChordLayout) -> EventResponse {
        let Some(identity) = layout.arc(arc).and_then(|arc| arc.identity.clone()) else {
            return EventResponse::default();
        };
        let completion = self.selection_manager.select(&[identity], multi_select);
        self.after_request(completion, layout)
    }

    fn after_request(&mut self, completion: Completion, layout: &mut ChordLayout) -> EventResponse {
        match completion {
            Completion::Ready => {
                self.sync_and_render(layout);
                rendered()
            }
            Completion::Pending => {
                self.pending += 1;
                tracing::debug!(pending = self.pending, "waiting for host selection");
                EventResponse::default()
            }
        }
    }

    /// Pull the host selection into the layout, then recompute opacity.
    pub fn sync_and_render(&self, layout: &mut ChordLayout) -> HighlightState {
        let has_selection = self.sync_selection_state(layout);
        let state = self.state(has_selection);
        match state {
            HighlightState::Idle => self.render_uniform(layout, self.options.full_opacity),
            HighlightState::EmptyHighlightField => {
                self.render_uniform(layout, self.options.dimmed_opacity)
            }
            HighlightState::Active => self.render_active(layout),
        }
        tracing::debug!(?state, has_selection, "rendered selection state");
        state
    }

    /// Mark arcs whose identity the host considers selected. Returns
    /// whether the host selection is non-empty.
    pub fn sync_selection_state(&self, layout: &mut ChordLayout) -> bool {
        let selected = self.selection_manager.selection_ids();
        for arc in &mut layout.arcs {
            arc.selected = arc.identity.as_ref().is_some_and(|identity| {
                selected
                    .iter()
                    .any(|candidate| self.selection_manager.includes(candidate, identity))
            });
        }
        !selected.is_empty()
    }

    fn state(&self, has_selection: bool) -> HighlightState {
        if has_selection || self.options.has_highlights {
            HighlightState::Active
        } else if self.options.has_highlights_object {
            HighlightState::EmptyHighlightField
        } else {
            HighlightState::Idle
        }
    }

    fn render_uniform(&self, layout: &mut ChordLayout, opacity: f64) {
        for arc in &mut layout.arcs {
            arc.opacity = opacity;
        }
        for chord in &mut layout.chords {
            chord.opacity = opacity;
            chord.has_highlight = false;
        }
    }

    fn render_active(&self, layout: &mut ChordLayout) {
        let full = self.options.full_opacity;
        let dimmed = self.options.dimmed_opacity;
        let highlights: Vec<f64> = layout
            .chords
            .iter()
            .map(|chord| layout.chord_highlight(chord))
            .collect();
        let selected: Vec<usize> = layout
            .arcs
            .iter()
            .filter(|arc| arc.selected)
            .map(|arc| arc.index)
            .collect();

        for (chord, highlight) in layout.chords.iter_mut().zip(&highlights) {
            let highlighted = *highlight > 0.0;
            let endpoint_selected =
                selected.contains(&chord.source.index) || selected.contains(&chord.target.index);
            chord.has_highlight = highlighted || endpoint_selected;
            chord.opacity = if chord.has_highlight { full } else { dimmed };
        }

        let has_highlights = self.options.has_highlights;
        let chords = &layout.chords;
        for arc in &mut layout.arcs {
            let lit = arc.selected
                || (has_highlights && arc_fully_highlighted(arc.index, chords, &highlights));
            arc.opacity = if lit { full } else { dimmed };
        }
    }
}

/// Every ribbon touching the arc is highlighted, and there is at least one.
fn arc_fully_highlighted(
    index: usize,
    chords: &[crate::layout::ChordDescriptor],
    highlights: &[f64],
) -> bool {
    let mut touching = chords
        .iter()
        .zip(highlights)
        .filter(|(chord, _)| chord.source.index == index || chord.target.index == index)
        .peekable();
    touching.peek().is_some() && touching.all(|(_, highlight)| *highlight > 0.0)
}

fn rendered() -> EventResponse {
    EventResponse {
        rendered: true,
        ..EventResponse::default()
    }
}

fn context_menu_handled() -> EventResponse {
    EventResponse {
        prevent_default: true,
        stop_propagation: true,
        rendered: false,
    }
}
