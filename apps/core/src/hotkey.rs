use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Command,
    Control,
    Option,
    Shift,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleGesture {
    DoubleTap(Modifier),
}

/// Parses gestures of the form `double-tap:<modifier>`.
pub fn parse_toggle_gesture(input: &str) -> Result<ToggleGesture, String> {
    let (kind, key) = input
        .trim()
        .split_once(':')
        .ok_or_else(|| "invalid toggle gesture".to_string())?;

    if !kind.trim().eq_ignore_ascii_case("double-tap") {
        return Err(format!("unsupported gesture kind '{}'", kind.trim()));
    }

    let modifier = match key.trim().to_ascii_lowercase().as_str() {
        "cmd" | "command" => Modifier::Command,
        "ctrl" | "control" => Modifier::Control,
        "opt" | "option" | "alt" => Modifier::Option,
        "shift" => Modifier::Shift,
        other => return Err(format!("unsupported modifier '{other}'")),
    };

    Ok(ToggleGesture::DoubleTap(modifier))
}

/// Recognizes two presses of the gesture modifier, with no other modifier
/// held, closer together than `interval`. Timestamps come from the event
/// source so the detector stays clock-free.
#[derive(Debug, Clone)]
pub struct DoubleTapDetector {
    modifier: Modifier,
    interval: Duration,
    last_tap: Option<Duration>,
}

impl DoubleTapDetector {
    pub fn new(gesture: ToggleGesture, interval: Duration) -> Self {
        let ToggleGesture::DoubleTap(modifier) = gesture;
        Self {
            modifier,
            interval,
            last_tap: None,
        }
    }

    /// Feeds one modifier-flags change. `pressed` is the full set of
    /// modifiers held after the change. Returns true when the gesture fires.
    pub fn on_modifiers_changed(&mut self, pressed: &[Modifier], at: Duration) -> bool {
        if pressed != [self.modifier] {
            return false;
        }

        match self.last_tap {
            Some(previous) if at.saturating_sub(previous) < self.interval => {
                self.last_tap = None;
                true
            }
            _ => {
                self.last_tap = Some(at);
                false
            }
        }
    }
}
