//! Selection and filter state shared by the map, the list and the detail panel.
//!
//! [`SelectionController`] owns the only mutable selection state. Every
//! derived view (`filtered_events`, `states_with_events`, `selected_event`)
//! is computed from scratch on each call, so readers always see the state
//! after the last completed operation and never a partially updated one.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::catalog::{Catalog, Event};
use crate::regions::StateCode;

/// The three fields that drive every view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    /// Literal, case-insensitive name filter. Empty means "no filter".
    pub search_term: String,
    /// State filter. Need not have events (yields an empty list).
    pub selected_state: Option<StateCode>,
    /// Index into the *current* filtered list, not into the catalog
    pub selected_event_index: Option<usize>,
}

/// How a region should be filled on the map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionFill {
    /// The selected state
    Active,
    /// Any other state while a state is selected
    Dimmed,
    /// State with events under the pointer, nothing selected
    HasEventsHover,
    /// State with events, nothing selected
    HasEvents,
    /// State without events, nothing selected
    Default,
}

/// Per-region flags handed to the map view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionView {
    pub has_events: bool,
    pub is_selected: bool,
    pub is_hovered: bool,
}

impl RegionView {
    /// Only states with events react to the pointer
    pub fn is_clickable(&self) -> bool {
        self.has_events
    }

    pub fn fill(&self, any_selected: bool) -> RegionFill {
        if any_selected {
            if self.is_selected {
                RegionFill::Active
            } else {
                RegionFill::Dimmed
            }
        } else if self.has_events && self.is_hovered {
            RegionFill::HasEventsHover
        } else if self.has_events {
            RegionFill::HasEvents
        } else {
            RegionFill::Default
        }
    }
}

/// Owner of [`SelectionState`] and the derivations over it
#[derive(Debug, Clone)]
pub struct SelectionController {
    catalog: Arc<Catalog>,
    state: SelectionState,
}

impl SelectionController {
    /// Start a session with an empty selection
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            state: SelectionState::default(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn search_term(&self) -> &str {
        &self.state.search_term
    }

    pub fn selected_state(&self) -> Option<&StateCode> {
        self.state.selected_state.as_ref()
    }

    pub fn selected_event_index(&self) -> Option<usize> {
        self.state.selected_event_index
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Replace the search term. The selected index is kept even if it no
    /// longer points into the narrowed list.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.state.search_term = term.into();
        tracing::debug!(search_term = %self.state.search_term, "search term changed");
    }

    /// Map click: selecting the current state clears the filter.
    pub fn select_state(&mut self, code: Option<StateCode>) {
        if code == self.state.selected_state {
            self.state.selected_state = None;
        } else {
            self.state.selected_state = code;
        }
        tracing::debug!(selected_state = ?self.state.selected_state, "state toggled");
    }

    /// Dropdown change: empty input means all states. Never toggles.
    pub fn select_state_from_dropdown(&mut self, code_or_empty: &str) {
        self.state.selected_state =
            (!code_or_empty.is_empty()).then(|| StateCode::new(code_or_empty));
        tracing::debug!(selected_state = ?self.state.selected_state, "state picked from dropdown");
    }

    /// Drop the state filter and close the detail panel
    pub fn clear_state_filter(&mut self) {
        self.state.selected_state = None;
        self.state.selected_event_index = None;
        tracing::debug!("state filter cleared");
    }

    /// Select a row of the current filtered list
    pub fn select_event_by_index(&mut self, index: usize) {
        self.state.selected_event_index = Some(index);
        tracing::debug!(index, "event selected");
    }

    pub fn close_event_detail(&mut self) {
        self.state.selected_event_index = None;
        tracing::debug!("event detail closed");
    }

    // ------------------------------------------------------------------
    // Derivations
    // ------------------------------------------------------------------

    /// States that have at least one event
    pub fn states_with_events(&self) -> BTreeSet<StateCode> {
        self.catalog.states_with_events()
    }

    /// Catalog entries passing both the state filter and the name filter,
    /// in catalog order
    pub fn filtered_events(&self) -> Vec<&Event> {
        let needle = self.state.search_term.to_lowercase();
        let state = self.state.selected_state.as_ref();

        self.catalog
            .events()
            .iter()
            .filter(|event| event.in_state(state) && event.name_contains(&needle))
            .collect()
    }

    /// The event behind `selected_event_index`, if it still resolves
    pub fn selected_event(&self) -> Option<&Event> {
        let index = self.state.selected_event_index?;
        self.filtered_events().get(index).copied()
    }

    /// Flags for one map region. `hovered` is owned by the map view.
    pub fn region_view(
        &self,
        code: &str,
        states_with_events: &BTreeSet<StateCode>,
        hovered: Option<&StateCode>,
    ) -> RegionView {
        RegionView {
            has_events: states_with_events.contains(code),
            is_selected: self.state.selected_state.as_ref().is_some_and(|s| s == code),
            is_hovered: hovered.is_some_and(|h| h == code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(name: &str, state: &str) -> Event {
        Event {
            name: Some(name.to_string()),
            state: state.to_string(),
            ..Default::default()
        }
    }

    fn controller(events: Vec<Event>) -> SelectionController {
        SelectionController::new(Arc::new(Catalog::new(events)))
    }

    fn sample() -> SelectionController {
        controller(vec![
            event("BSides SP", "SP"),
            event("H2HC", "SP"),
            event("Mind The Sec", "RJ"),
        ])
    }

    fn names(c: &SelectionController) -> Vec<&str> {
        c.filtered_events().iter().map(|e| e.display_name()).collect()
    }

    fn code(s: &str) -> Option<StateCode> {
        Some(StateCode::new(s))
    }

    #[test]
    fn test_initial_state_is_empty() {
        let c = sample();
        assert_eq!(c.state, SelectionState::default());
        assert_eq!(c.search_term(), "");
        assert_eq!(names(&c), vec!["BSides SP", "H2HC", "Mind The Sec"]);
        assert!(c.selected_event().is_none());
    }

    #[test]
    fn test_filter_composition() {
        let mut c = controller(vec![
            event("Roadsec SP", "SP"),
            event("Roadsec RJ", "RJ"),
            event("BSides SP", "SP"),
            event("ROADSEC Recife", "PE"),
        ]);

        c.set_search_term("roadsec");
        assert_eq!(names(&c), vec!["Roadsec SP", "Roadsec RJ", "ROADSEC Recife"]);

        c.select_state(code("SP"));
        assert_eq!(names(&c), vec!["Roadsec SP"]);

        c.set_search_term("");
        assert_eq!(names(&c), vec!["Roadsec SP", "BSides SP"]);
    }

    #[test]
    fn test_state_without_events_yields_empty_list() {
        let mut c = sample();
        c.select_state(code("AC"));
        assert_eq!(c.selected_state(), code("AC").as_ref());
        assert!(c.filtered_events().is_empty());
    }

    #[test]
    fn test_map_click_toggles() {
        let mut c = sample();
        c.select_state(code("SP"));
        assert_eq!(c.selected_state(), code("SP").as_ref());
        c.select_state(code("SP"));
        assert_eq!(c.selected_state(), None);
    }

    #[test]
    fn test_map_click_switches_between_states() {
        let mut c = sample();
        c.select_state(code("SP"));
        c.select_state(code("RJ"));
        assert_eq!(c.selected_state(), code("RJ").as_ref());
    }

    #[test]
    fn test_select_none_clears() {
        let mut c = sample();
        c.select_state(None);
        assert_eq!(c.selected_state(), None);
        c.select_state(code("RJ"));
        c.select_state(None);
        assert_eq!(c.selected_state(), None);
    }

    // Dropdown selection intentionally differs from map clicks: picking the
    // same state twice keeps it selected.
    #[test]
    fn test_dropdown_does_not_toggle() {
        let mut c = sample();
        c.select_state_from_dropdown("SP");
        assert_eq!(c.selected_state(), code("SP").as_ref());
        c.select_state_from_dropdown("SP");
        assert_eq!(c.selected_state(), code("SP").as_ref());

        c.select_state_from_dropdown("");
        assert_eq!(c.selected_state(), None);
    }

    #[test]
    fn test_state_changes_keep_selected_index() {
        let mut c = sample();
        c.select_event_by_index(1);
        c.select_state(code("RJ"));
        assert_eq!(c.selected_event_index(), Some(1));
        assert!(c.selected_event().is_none());
        c.select_state_from_dropdown("SP");
        assert_eq!(c.selected_event_index(), Some(1));
    }

    #[test]
    fn test_dangling_selection_resolves_to_none() {
        let mut c = controller(vec![
            event("Alpha", "SP"),
            event("Beta", "SP"),
            event("Gamma", "SP"),
            event("Alpha Two", "SP"),
            event("Delta", "SP"),
        ]);
        assert_eq!(c.filtered_events().len(), 5);

        c.select_event_by_index(4);
        assert_eq!(c.selected_event().map(Event::display_name), Some("Delta"));

        c.set_search_term("alpha");
        assert_eq!(c.filtered_events().len(), 2);
        assert_eq!(c.selected_event_index(), Some(4));
        assert!(c.selected_event().is_none());
    }

    #[test]
    fn test_index_resolves_against_filtered_list() {
        let mut c = sample();
        c.select_state(code("RJ"));
        c.select_event_by_index(0);
        assert_eq!(c.selected_event().map(Event::display_name), Some("Mind The Sec"));
    }

    #[test]
    fn test_clear_state_filter_resets_detail() {
        let mut c = sample();
        c.select_state(code("SP"));
        c.select_event_by_index(1);
        c.clear_state_filter();
        assert_eq!(c.selected_state(), None);
        assert_eq!(c.selected_event_index(), None);
        assert!(c.selected_event().is_none());
    }

    #[test]
    fn test_clear_state_filter_keeps_search_term() {
        let mut c = sample();
        c.set_search_term("h2");
        c.select_state(code("SP"));
        c.clear_state_filter();
        assert_eq!(c.search_term(), "h2");
    }

    #[test]
    fn test_close_event_detail() {
        let mut c = sample();
        c.select_event_by_index(0);
        c.close_event_detail();
        assert_eq!(c.selected_event_index(), None);
        assert!(c.selected_event().is_none());
    }

    #[test]
    fn test_nameless_events() {
        let mut c = controller(vec![
            Event {
                state: "SP".to_string(),
                ..Default::default()
            },
            event("Named", "SP"),
        ]);
        assert_eq!(names(&c), vec!["Named"]);

        c.set_search_term("n");
        assert_eq!(names(&c), vec!["Named"]);

        c.select_state(code("SP"));
        assert_eq!(names(&c), vec!["Named"]);
    }

    #[test]
    fn test_end_to_end_scenario() {
        let mut c = sample();

        c.select_state(code("SP"));
        assert_eq!(names(&c), vec!["BSides SP", "H2HC"]);

        c.set_search_term("h2");
        assert_eq!(names(&c), vec!["H2HC"]);

        c.select_event_by_index(0);
        assert_eq!(c.selected_event().map(Event::display_name), Some("H2HC"));

        c.select_state(code("SP"));
        assert_eq!(c.selected_state(), None);
        assert_eq!(names(&c), vec!["H2HC"]);
        assert_eq!(c.selected_event_index(), Some(0));
        assert_eq!(c.selected_event().map(Event::display_name), Some("H2HC"));
    }

    #[test]
    fn test_states_with_events() {
        let c = sample();
        let states: Vec<String> = c.states_with_events().iter().map(|s| s.to_string()).collect();
        assert_eq!(states, vec!["RJ", "SP"]);
    }

    #[test]
    fn test_region_view_flags() {
        let mut c = sample();
        let with_events = c.states_with_events();
        let hovered = StateCode::new("SP");

        let sp = c.region_view("SP", &with_events, Some(&hovered));
        assert!(sp.has_events && sp.is_hovered && !sp.is_selected);
        assert!(sp.is_clickable());

        let ac = c.region_view("AC", &with_events, Some(&hovered));
        assert!(!ac.has_events && !ac.is_hovered);
        assert!(!ac.is_clickable());

        c.select_state(code("RJ"));
        assert!(c.region_view("RJ", &with_events, None).is_selected);
    }

    #[test]
    fn test_fill_without_selection() {
        let view = |has_events, is_hovered| RegionView {
            has_events,
            is_selected: false,
            is_hovered,
        };
        assert_eq!(view(true, true).fill(false), RegionFill::HasEventsHover);
        assert_eq!(view(true, false).fill(false), RegionFill::HasEvents);
        assert_eq!(view(false, false).fill(false), RegionFill::Default);
        // Hover never brightens a state without events
        assert_eq!(view(false, true).fill(false), RegionFill::Default);
    }

    #[test]
    fn test_fill_with_selection() {
        let selected = RegionView {
            has_events: true,
            is_selected: true,
            is_hovered: false,
        };
        let other_with_events = RegionView {
            has_events: true,
            is_selected: false,
            is_hovered: true,
        };
        let other_without = RegionView {
            has_events: false,
            is_selected: false,
            is_hovered: false,
        };
        assert_eq!(selected.fill(true), RegionFill::Active);
        assert_eq!(other_with_events.fill(true), RegionFill::Dimmed);
        assert_eq!(other_without.fill(true), RegionFill::Dimmed);
    }
}
