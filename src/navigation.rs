//! Three-level drill-down navigation: overview, section, detail.
//!
//! The state machine only tracks where the user is and notifies a single
//! subscriber per event kind. It never touches the camera; the owning
//! application reacts to the callbacks.

use log::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NavigationLevel {
    #[default]
    Overview,
    Section,
    Detail,
}

impl std::fmt::Display for NavigationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NavigationLevel::Overview => write!(f, "Overview"),
            NavigationLevel::Section => write!(f, "Section"),
            NavigationLevel::Detail => write!(f, "Detail"),
        }
    }
}

/// An entity the user navigated into, with the data it was opened with.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<T> {
    pub id: String,
    pub data: T,
}

impl<T> Selection<T> {
    pub fn new(id: impl Into<String>, data: T) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }
}

/// Snapshot of a previous navigation position.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryFrame<S, A> {
    pub level: NavigationLevel,
    pub section: Option<Selection<S>>,
    pub sub_area: Option<Selection<A>>,
}

pub type LevelChangeCallback<S, A> =
    Box<dyn FnMut(NavigationLevel, Option<&Selection<S>>, Option<&Selection<A>>)>;
pub type SectionChangeCallback<S> = Box<dyn FnMut(&Selection<S>)>;
pub type SubAreaSelectCallback<A> = Box<dyn FnMut(&Selection<A>)>;

/// Navigation state for one session.
///
/// `S` is the section payload and `A` the sub-area payload.
pub struct NavigationState<S, A> {
    current_level: NavigationLevel,
    current_section: Option<Selection<S>>,
    current_sub_area: Option<Selection<A>>,
    history: Vec<HistoryFrame<S, A>>,
    on_level_change: Option<LevelChangeCallback<S, A>>,
    on_section_change: Option<SectionChangeCallback<S>>,
    on_sub_area_select: Option<SubAreaSelectCallback<A>>,
}

impl<S: Clone, A: Clone> NavigationState<S, A> {
    pub fn new() -> Self {
        Self {
            current_level: NavigationLevel::Overview,
            current_section: None,
            current_sub_area: None,
            history: Vec::new(),
            on_level_change: None,
            on_section_change: None,
            on_sub_area_select: None,
        }
    }

    pub fn set_on_level_change(&mut self, callback: LevelChangeCallback<S, A>) {
        self.on_level_change = Some(callback);
    }

    pub fn set_on_section_change(&mut self, callback: SectionChangeCallback<S>) {
        self.on_section_change = Some(callback);
    }

    pub fn set_on_sub_area_select(&mut self, callback: SubAreaSelectCallback<A>) {
        self.on_sub_area_select = Some(callback);
    }

    pub fn current_level(&self) -> NavigationLevel {
        self.current_level
    }

    pub fn current_section(&self) -> Option<&Selection<S>> {
        self.current_section.as_ref()
    }

    pub fn current_sub_area(&self) -> Option<&Selection<A>> {
        self.current_sub_area.as_ref()
    }

    pub fn history(&self) -> &[HistoryFrame<S, A>] {
        &self.history
    }

    pub fn is_at_overview(&self) -> bool {
        self.current_level == NavigationLevel::Overview
    }

    pub fn is_at_section(&self) -> bool {
        self.current_level == NavigationLevel::Section
    }

    pub fn is_at_detail(&self) -> bool {
        self.current_level == NavigationLevel::Detail
    }

    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }

    /// Enters a section from any level.
    ///
    /// From the detail level the open detail is closed first; only the final
    /// section is reported to the level-change subscriber.
    pub fn navigate_to_section(&mut self, id: impl Into<String>, data: S) {
        if self.is_at_detail() {
            self.collapse_detail();
        }

        self.push_frame();
        let selection = Selection::new(id, data);
        debug!(
            "navigate {} -> Section({})",
            self.current_level, selection.id
        );
        self.current_level = NavigationLevel::Section;
        self.current_section = Some(selection);
        self.current_sub_area = None;

        self.emit_level_change();
        if let (Some(callback), Some(section)) =
            (self.on_section_change.as_mut(), self.current_section.as_ref())
        {
            callback(section);
        }
    }

    /// Opens a sub-area of the current section. Only valid at the section
    /// level; returns `false` otherwise.
    pub fn open_detail(&mut self, id: impl Into<String>, data: A) -> bool {
        let id = id.into();
        if !self.is_at_section() {
            warn!(
                "cannot open detail '{}' from {}: must be at Section level",
                id, self.current_level
            );
            return false;
        }

        self.push_frame();
        debug!("navigate Section -> Detail({})", id);
        self.current_level = NavigationLevel::Detail;
        self.current_sub_area = Some(Selection::new(id, data));

        self.emit_level_change();
        if let (Some(callback), Some(sub_area)) =
            (self.on_sub_area_select.as_mut(), self.current_sub_area.as_ref())
        {
            callback(sub_area);
        }
        true
    }

    /// Returns from the detail level to its section. Returns `false` when no
    /// detail is open.
    pub fn close_detail(&mut self) -> bool {
        if !self.is_at_detail() {
            warn!("cannot close detail from {}", self.current_level);
            return false;
        }
        self.collapse_detail();
        self.emit_level_change();
        true
    }

    /// Steps one level up. Section goes straight to the overview regardless
    /// of how many sections were visited. Returns `false` at the overview.
    ///
    /// Leaving a detail view pops the frame that opened it, so history depth
    /// counts open views only and never records past detail visits.
    pub fn go_back(&mut self) -> bool {
        match self.current_level {
            NavigationLevel::Detail => self.close_detail(),
            NavigationLevel::Section => {
                debug!("navigate Section -> Overview");
                self.clear();
                self.emit_level_change();
                true
            }
            NavigationLevel::Overview => false,
        }
    }

    /// Unconditionally returns to the overview and forgets all history.
    pub fn reset_to_overview(&mut self) {
        debug!("reset {} -> Overview", self.current_level);
        self.clear();
        self.emit_level_change();
    }

    /// Detail -> Section without notifying anyone. Drops the frame that
    /// `open_detail` pushed.
    fn collapse_detail(&mut self) {
        self.current_sub_area = None;
        self.current_level = NavigationLevel::Section;
        self.history.pop();
        debug_assert!(!self.history.is_empty());
    }

    fn push_frame(&mut self) {
        self.history.push(HistoryFrame {
            level: self.current_level,
            section: self.current_section.clone(),
            sub_area: self.current_sub_area.clone(),
        });
    }

    fn clear(&mut self) {
        self.current_level = NavigationLevel::Overview;
        self.current_section = None;
        self.current_sub_area = None;
        self.history.clear();
    }

    fn emit_level_change(&mut self) {
        if let Some(callback) = self.on_level_change.as_mut() {
            callback(
                self.current_level,
                self.current_section.as_ref(),
                self.current_sub_area.as_ref(),
            );
        }
    }
}

impl<S: Clone, A: Clone> Default for NavigationState<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: std::fmt::Debug, A: std::fmt::Debug> std::fmt::Debug for NavigationState<S, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationState")
            .field("current_level", &self.current_level)
            .field("current_section", &self.current_section)
            .field("current_sub_area", &self.current_sub_area)
            .field("history", &self.history)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Level(NavigationLevel, Option<String>, Option<String>),
        Section(String),
        SubArea(String),
    }

    type Nav = NavigationState<u32, &'static str>;

    fn recorded() -> (Nav, Rc<RefCell<Vec<Event>>>) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut nav = Nav::new();

        let sink = events.clone();
        nav.set_on_level_change(Box::new(move |level, section, sub_area| {
            sink.borrow_mut().push(Event::Level(
                level,
                section.map(|s| s.id.clone()),
                sub_area.map(|a| a.id.clone()),
            ));
        }));
        let sink = events.clone();
        nav.set_on_section_change(Box::new(move |section| {
            sink.borrow_mut().push(Event::Section(section.id.clone()));
        }));
        let sink = events.clone();
        nav.set_on_sub_area_select(Box::new(move |sub_area| {
            sink.borrow_mut().push(Event::SubArea(sub_area.id.clone()));
        }));

        (nav, events)
    }

    /// Level invariants that must hold after every operation.
    fn assert_consistent(nav: &Nav) {
        match nav.current_level() {
            NavigationLevel::Overview => {
                assert!(nav.current_section().is_none());
                assert!(nav.current_sub_area().is_none());
                assert!(nav.history().is_empty());
            }
            NavigationLevel::Section => {
                assert!(nav.current_section().is_some());
                assert!(nav.current_sub_area().is_none());
                assert!(!nav.history().is_empty());
            }
            NavigationLevel::Detail => {
                assert!(nav.current_section().is_some());
                assert!(nav.current_sub_area().is_some());
                assert!(!nav.history().is_empty());
            }
        }
        assert_eq!(nav.can_go_back(), !nav.is_at_overview());
    }

    #[test]
    fn test_starts_at_overview() {
        let nav = Nav::new();
        assert!(nav.is_at_overview());
        assert!(!nav.can_go_back());
        assert_consistent(&nav);
    }

    #[test]
    fn test_navigate_to_section_from_overview() {
        let (mut nav, events) = recorded();
        nav.navigate_to_section("automation", 7);

        assert_eq!(nav.current_level(), NavigationLevel::Section);
        assert_eq!(nav.history().len(), 1);
        assert_eq!(nav.history()[0].level, NavigationLevel::Overview);
        assert_eq!(nav.current_section(), Some(&Selection::new("automation", 7)));
        assert_eq!(
            *events.borrow(),
            vec![
                Event::Level(NavigationLevel::Section, Some("automation".into()), None),
                Event::Section("automation".into()),
            ]
        );
        assert_consistent(&nav);
    }

    #[test]
    fn test_open_detail_from_section() {
        let (mut nav, events) = recorded();
        nav.navigate_to_section("automation", 7);
        events.borrow_mut().clear();

        assert!(nav.open_detail("p-matic", "sub"));
        assert!(nav.is_at_detail());
        assert_eq!(nav.history().len(), 2);
        assert_eq!(nav.current_sub_area().map(|a| a.data), Some("sub"));
        assert_eq!(
            *events.borrow(),
            vec![
                Event::Level(
                    NavigationLevel::Detail,
                    Some("automation".into()),
                    Some("p-matic".into())
                ),
                Event::SubArea("p-matic".into()),
            ]
        );
        assert_consistent(&nav);
    }

    #[test]
    fn test_open_detail_guard_at_overview() {
        let (mut nav, events) = recorded();
        assert!(!nav.open_detail("p-matic", "sub"));
        assert!(nav.is_at_overview());
        assert!(nav.history().is_empty());
        assert!(events.borrow().is_empty());
        assert_consistent(&nav);
    }

    #[test]
    fn test_open_detail_guard_at_detail() {
        let (mut nav, events) = recorded();
        nav.navigate_to_section("automation", 7);
        nav.open_detail("p-matic", "first");
        events.borrow_mut().clear();

        assert!(!nav.open_detail("shuttle", "second"));
        assert_eq!(nav.current_sub_area().map(|a| a.id.as_str()), Some("p-matic"));
        assert_eq!(nav.history().len(), 2);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_go_back_from_detail() {
        let (mut nav, events) = recorded();
        nav.navigate_to_section("automation", 7);
        nav.open_detail("p-matic", "sub");
        events.borrow_mut().clear();

        assert!(nav.go_back());
        assert!(nav.is_at_section());
        assert!(nav.current_sub_area().is_none());
        assert_eq!(nav.history().len(), 1);
        assert_eq!(
            *events.borrow(),
            vec![Event::Level(
                NavigationLevel::Section,
                Some("automation".into()),
                None
            )]
        );
        assert_consistent(&nav);
    }

    #[test]
    fn test_go_back_from_section() {
        let (mut nav, _events) = recorded();
        nav.navigate_to_section("automation", 7);
        nav.navigate_to_section("storage", 8);
        assert_eq!(nav.history().len(), 2);

        assert!(nav.go_back());
        assert!(nav.is_at_overview());
        assert!(nav.history().is_empty());
        assert_consistent(&nav);
    }

    #[test]
    fn test_go_back_at_overview_is_idempotent() {
        let (mut nav, events) = recorded();
        for _ in 0..3 {
            assert!(!nav.go_back());
        }
        assert!(nav.is_at_overview());
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_close_detail_guard() {
        let (mut nav, events) = recorded();
        nav.navigate_to_section("automation", 7);
        events.borrow_mut().clear();
        assert!(!nav.close_detail());
        assert!(nav.is_at_section());
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_detail_visits_leave_no_history() {
        let (mut nav, _events) = recorded();
        nav.navigate_to_section("automation", 7);
        for _ in 0..3 {
            assert!(nav.open_detail("p-matic", "sub"));
            assert!(nav.close_detail());
            assert_eq!(nav.history().len(), 1);
        }

        assert!(nav.go_back());
        assert!(nav.is_at_overview());
        assert_consistent(&nav);
    }

    #[test]
    fn test_navigate_from_detail_emits_once() {
        let (mut nav, events) = recorded();
        nav.navigate_to_section("automation", 7);
        nav.open_detail("p-matic", "sub");
        events.borrow_mut().clear();

        nav.navigate_to_section("storage", 8);
        assert!(nav.is_at_section());
        assert_eq!(nav.current_section().map(|s| s.data), Some(8));
        assert!(nav.current_sub_area().is_none());
        // detail frame dropped, automation frame pushed on top of overview
        assert_eq!(nav.history().len(), 2);
        assert_eq!(
            nav.history()[1].section.as_ref().map(|s| s.id.as_str()),
            Some("automation")
        );
        assert_eq!(
            *events.borrow(),
            vec![
                Event::Level(NavigationLevel::Section, Some("storage".into()), None),
                Event::Section("storage".into()),
            ]
        );

        // a single back still reaches the overview
        assert!(nav.go_back());
        assert!(nav.is_at_overview());
        assert_consistent(&nav);
    }

    #[test]
    fn test_reset_from_any_level() {
        let (mut nav, events) = recorded();
        nav.navigate_to_section("automation", 7);
        nav.open_detail("p-matic", "sub");
        events.borrow_mut().clear();

        nav.reset_to_overview();
        assert!(nav.is_at_overview());
        assert_eq!(
            *events.borrow(),
            vec![Event::Level(NavigationLevel::Overview, None, None)]
        );
        assert_consistent(&nav);
    }

    #[test]
    fn test_invariants_hold_over_mixed_sequence() {
        let (mut nav, _events) = recorded();
        let ops: [fn(&mut Nav); 6] = [
            |n| n.navigate_to_section("automation", 1),
            |n| {
                n.open_detail("p-matic", "a");
            },
            |n| {
                n.close_detail();
            },
            |n| {
                n.go_back();
            },
            |n| n.reset_to_overview(),
            |n| n.navigate_to_section("storage", 2),
        ];

        // deterministic pseudo-random walk over the operations
        let mut seed: u32 = 17;
        for _ in 0..500 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let op = ops[(seed >> 16) as usize % ops.len()];
            op(&mut nav);
            assert_consistent(&nav);
        }
    }
}
