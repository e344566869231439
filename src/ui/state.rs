//! Window state machine, kept pure so transitions are testable without a
//! window: `Idle -> Displaying <-> Fullscreen -> Stopped`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    /// No window open; initial state.
    Idle,
    Displaying,
    Fullscreen,
    /// Terminal. Entered exactly once per session.
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorEvent {
    Launch,
    ToggleFullscreen,
    Quit,
}

impl MonitorState {
    pub fn apply(self, event: MonitorEvent) -> MonitorState {
        match (self, event) {
            // Stopped is terminal: every later event is a no-op.
            (MonitorState::Stopped, _) => MonitorState::Stopped,
            (_, MonitorEvent::Quit) => MonitorState::Stopped,
            (MonitorState::Idle, MonitorEvent::Launch) => MonitorState::Displaying,
            (MonitorState::Displaying, MonitorEvent::ToggleFullscreen) => MonitorState::Fullscreen,
            (MonitorState::Fullscreen, MonitorEvent::ToggleFullscreen) => MonitorState::Displaying,
            (state, _) => state,
        }
    }

    pub fn is_fullscreen(self) -> bool {
        self == MonitorState::Fullscreen
    }

    pub fn is_stopped(self) -> bool {
        self == MonitorState::Stopped
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MonitorState::Idle => "idle",
            MonitorState::Displaying => "displaying",
            MonitorState::Fullscreen => "fullscreen",
            MonitorState::Stopped => "stopped",
        }
    }
}
