// Location autocomplete widget, split per the rendering-adapter boundary:
// `AutocompleteWidget` is a pure state machine over input events, and
// `AutocompleteSession` binds it to a place-search provider. The hosting UI
// owns the debounce clock and the actual text field / popup rendering.

use log::debug;

use crate::errors::CanaryError;
use crate::geocoding::{PlaceCandidate, PlaceSearch};

/// Quiet period after the last qualifying keystroke before a search fires.
pub const MIN_QUERY_INTERVAL_MS: u64 = 800;
/// Candidate rows requested from the geocoding service.
pub const DEFAULT_MAX_ROWS: usize = 5;
/// Typed text shorter than this never arms the debounce timer.
pub const MIN_NAME_LENGTH: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
}

/// Inputs the rendering adapter feeds into the widget.
#[derive(Clone, Debug, PartialEq)]
pub enum WidgetEvent {
    /// The text field content changed.
    Input(String),
    Key(Key),
    /// The pointer moved over the candidate at this position.
    Hover(usize),
    /// The candidate at this position was clicked.
    Click(usize),
    /// The debounce timer armed by [`WidgetEffect::RestartDebounce`] expired.
    DebounceElapsed,
    /// A search issued earlier came back.
    SearchCompleted {
        seq: u64,
        candidates: Vec<PlaceCandidate>,
    },
}

/// Outputs the adapter must act on.
#[derive(Clone, Debug, PartialEq)]
pub enum WidgetEffect {
    /// (Re)start the debounce timer for [`MIN_QUERY_INTERVAL_MS`].
    RestartDebounce,
    /// Run a place search and feed the result back as
    /// [`WidgetEvent::SearchCompleted`] with the same sequence number.
    Search { seq: u64, query: String },
    /// A candidate was committed as the selected place.
    Commit(PlaceCandidate),
    /// The key event was consumed; do not propagate it to outer handlers.
    CaptureKey,
}

pub struct AutocompleteWidget {
    text: String,
    candidates: Vec<PlaceCandidate>,
    highlight: usize,
    popup_visible: bool,
    debounce_armed: bool,
    /// Sequence number of the most recently issued search. Responses
    /// carrying any other number are stale and are dropped.
    issued_seq: u64,
    selected: Option<PlaceCandidate>,
    max_rows: usize,
}

impl Default for AutocompleteWidget {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ROWS)
    }
}

impl AutocompleteWidget {
    pub fn new(max_rows: usize) -> Self {
        Self {
            text: String::new(),
            candidates: Vec::new(),
            highlight: 0,
            popup_visible: false,
            debounce_armed: false,
            issued_seq: 0,
            selected: None,
            max_rows,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn candidates(&self) -> &[PlaceCandidate] {
        &self.candidates
    }

    pub fn highlighted(&self) -> Option<&PlaceCandidate> {
        self.candidates.get(self.highlight)
    }

    pub fn selected_place(&self) -> Option<&PlaceCandidate> {
        self.selected.as_ref()
    }

    pub fn popup_visible(&self) -> bool {
        self.popup_visible
    }

    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    pub fn handle(&mut self, event: WidgetEvent) -> Vec<WidgetEffect> {
        match event {
            WidgetEvent::Input(text) => self.on_input(text),
            WidgetEvent::DebounceElapsed => self.on_debounce_elapsed(),
            WidgetEvent::SearchCompleted { seq, candidates } => {
                self.on_search_completed(seq, candidates)
            }
            WidgetEvent::Key(Key::Enter) => self.on_enter(),
            WidgetEvent::Key(Key::ArrowDown) => self.move_highlight(self.highlight + 1),
            WidgetEvent::Key(Key::ArrowUp) => self.move_highlight(self.highlight.saturating_sub(1)),
            WidgetEvent::Hover(position) => {
                if position < self.candidates.len() {
                    self.highlight = position;
                }
                Vec::new()
            }
            WidgetEvent::Click(position) => self.on_click(position),
        }
    }

    fn on_input(&mut self, text: String) -> Vec<WidgetEffect> {
        self.text = text;
        self.selected = None;
        if self.text.chars().count() >= MIN_NAME_LENGTH {
            self.debounce_armed = true;
            vec![WidgetEffect::RestartDebounce]
        } else {
            Vec::new()
        }
    }

    fn on_debounce_elapsed(&mut self) -> Vec<WidgetEffect> {
        if !self.debounce_armed {
            return Vec::new();
        }
        self.debounce_armed = false;
        vec![self.issue_search()]
    }

    fn on_search_completed(
        &mut self,
        seq: u64,
        candidates: Vec<PlaceCandidate>,
    ) -> Vec<WidgetEffect> {
        if seq != self.issued_seq {
            debug!("dropping stale search response (seq {seq}, latest {})", self.issued_seq);
            return Vec::new();
        }
        // an empty result set leaves the current list on screen untouched
        if candidates.is_empty() {
            return Vec::new();
        }
        self.candidates = candidates;
        self.highlight = 0;
        self.popup_visible = true;
        Vec::new()
    }

    fn on_enter(&mut self) -> Vec<WidgetEffect> {
        if !self.popup_visible {
            // immediate, non-debounced search
            self.debounce_armed = false;
            return vec![self.issue_search(), WidgetEffect::CaptureKey];
        }
        self.commit(self.highlight)
    }

    fn on_click(&mut self, position: usize) -> Vec<WidgetEffect> {
        let effects = self.commit(position);
        // a click dismisses the popup even when it lands between rows
        self.popup_visible = false;
        effects
    }

    fn commit(&mut self, position: usize) -> Vec<WidgetEffect> {
        let Some(candidate) = self.candidates.get(position).cloned() else {
            return Vec::new();
        };
        self.text = candidate.name.clone();
        self.selected = Some(candidate.clone());
        self.popup_visible = false;
        vec![WidgetEffect::Commit(candidate)]
    }

    fn move_highlight(&mut self, target: usize) -> Vec<WidgetEffect> {
        if !self.popup_visible {
            return Vec::new();
        }
        let target = target.min(self.max_rows);
        if target == self.highlight || target >= self.candidates.len() {
            return Vec::new();
        }
        self.highlight = target;
        vec![WidgetEffect::CaptureKey]
    }

    fn issue_search(&mut self) -> WidgetEffect {
        self.issued_seq += 1;
        WidgetEffect::Search {
            seq: self.issued_seq,
            query: self.text.clone(),
        }
    }
}

/// Binds the widget to a search provider. Search effects are executed
/// against the provider and their results folded straight back into the
/// widget; all other effects are returned for the adapter to act on.
pub struct AutocompleteSession<P> {
    widget: AutocompleteWidget,
    provider: P,
}

impl<P: PlaceSearch> AutocompleteSession<P> {
    pub fn new(provider: P) -> Self {
        Self {
            widget: AutocompleteWidget::default(),
            provider,
        }
    }

    pub fn widget(&self) -> &AutocompleteWidget {
        &self.widget
    }

    pub async fn dispatch(&mut self, event: WidgetEvent) -> Result<Vec<WidgetEffect>, CanaryError> {
        let effects = self.widget.handle(event);
        let mut remaining = Vec::new();
        for effect in effects {
            match effect {
                WidgetEffect::Search { seq, query } => {
                    let candidates = self.provider.search(&query, self.widget.max_rows).await?;
                    remaining.extend(
                        self.widget
                            .handle(WidgetEvent::SearchCompleted { seq, candidates }),
                    );
                }
                other => remaining.push(other),
            }
        }
        Ok(remaining)
    }
}
