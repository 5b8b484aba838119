/// What the shell should do with the launcher panel after a toggle gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    Show,
    Refocus,
    Hide,
}

/// Panel visibility as seen by the core. The shell reports whether the panel
/// currently holds key focus; the core decides the transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverlayState {
    visible: bool,
}

impl OverlayState {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// A visible panel without key focus is brought forward, not hidden.
    pub fn on_toggle(&mut self, panel_has_focus: bool) -> ToggleAction {
        let action = match (self.visible, panel_has_focus) {
            (false, _) => ToggleAction::Show,
            (true, false) => ToggleAction::Refocus,
            (true, true) => ToggleAction::Hide,
        };
        self.visible = action != ToggleAction::Hide;
        action
    }

    /// Returns true when the panel was visible and is now hidden.
    pub fn on_escape(&mut self) -> bool {
        std::mem::replace(&mut self.visible, false)
    }
}
