use crate::catalog::Catalog;
use crate::history::LaunchHistory;
use crate::model::LaunchItem;
use crate::navigator::{clamp_focus, Focus, GridNavigator, NavKey};
use crate::overlay_state::{OverlayState, ToggleAction};
use crate::view::{self, Section, SectionLayout, ViewOptions};

#[derive(Debug, Clone)]
pub enum LauncherEvent {
    Toggle { has_focus: bool },
    Escape,
    QueryChanged(String),
    Navigate(NavKey),
    Activate,
    ActivateAt(usize),
    CatalogReplaced(Catalog),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LauncherEffect {
    None,
    Show,
    Focus,
    Hide,
    /// The key belongs to the search field caret.
    PassThrough,
    /// Open the item and hide the panel; history has already been updated.
    Launch(LaunchItem),
}

/// All mutable launcher state. Sections and the flattened sequence are
/// derived and rebuilt whenever catalog, history or query change.
#[derive(Debug, Clone)]
pub struct LauncherState {
    catalog: Catalog,
    history: LaunchHistory,
    query: String,
    focus: Focus,
    overlay: OverlayState,
    navigator: GridNavigator,
    options: ViewOptions,
    sections: Vec<Section>,
    flattened: Vec<LaunchItem>,
    layout: SectionLayout,
}

impl LauncherState {
    pub fn new(
        catalog: Catalog,
        history: LaunchHistory,
        navigator: GridNavigator,
        options: ViewOptions,
    ) -> Self {
        let mut state = Self {
            catalog,
            history,
            query: String::new(),
            focus: Focus::Search,
            overlay: OverlayState::default(),
            navigator,
            options,
            sections: Vec::new(),
            flattened: Vec::new(),
            layout: SectionLayout::default(),
        };
        state.recompute();
        state
    }

    pub fn apply(&mut self, event: LauncherEvent) -> LauncherEffect {
        match event {
            LauncherEvent::Toggle { has_focus } => match self.overlay.on_toggle(has_focus) {
                ToggleAction::Show => LauncherEffect::Show,
                ToggleAction::Refocus => LauncherEffect::Focus,
                ToggleAction::Hide => LauncherEffect::Hide,
            },
            LauncherEvent::Escape => {
                if self.overlay.on_escape() {
                    LauncherEffect::Hide
                } else {
                    LauncherEffect::None
                }
            }
            LauncherEvent::QueryChanged(query) => {
                self.query = query;
                self.focus = Focus::Search;
                self.recompute();
                LauncherEffect::None
            }
            LauncherEvent::Navigate(key) => {
                if !self.navigator.intercepts(self.focus, key) {
                    return LauncherEffect::PassThrough;
                }
                self.focus = self.navigator.step(self.focus, key, &self.layout);
                LauncherEffect::None
            }
            LauncherEvent::Activate => match self.focus {
                Focus::Index(index) => self.launch_at(index),
                Focus::Search => LauncherEffect::None,
            },
            LauncherEvent::ActivateAt(index) => self.launch_at(index),
            LauncherEvent::CatalogReplaced(catalog) => {
                self.catalog = catalog;
                self.recompute();
                LauncherEffect::None
            }
        }
    }

    fn launch_at(&mut self, index: usize) -> LauncherEffect {
        let Some(item) = self.flattened.get(index).cloned() else {
            return LauncherEffect::None;
        };

        self.history.record(&item.id);
        self.query.clear();
        self.focus = Focus::Search;
        self.overlay.set_visible(false);
        self.recompute();
        LauncherEffect::Launch(item)
    }

    fn recompute(&mut self) {
        self.sections = view::compose(&self.catalog, &self.history, &self.query, self.options);
        self.flattened = view::flatten(&self.sections);
        self.layout = SectionLayout::from_sections(&self.sections);
        self.focus = clamp_focus(self.focus, self.flattened.len());
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn is_visible(&self) -> bool {
        self.overlay.is_visible()
    }

    /// Syncs with the real window, which may have been hidden by the OS.
    pub fn set_visible(&mut self, visible: bool) {
        self.overlay.set_visible(visible);
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn flattened(&self) -> &[LaunchItem] {
        &self.flattened
    }

    pub fn selected_item(&self) -> Option<&LaunchItem> {
        self.focus.index().and_then(|index| self.flattened.get(index))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn history(&self) -> &LaunchHistory {
        &self.history
    }
}
