use crate::GateError;

/// What an open gate is holding back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateMode {
    /// Wiping every flag and note. Needs an explicit confirm.
    Reset,
    /// Export was asked for with nobody flagged. Acknowledge only.
    ExportBlocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    #[default]
    Closed,
    Open(GateMode),
}

/// Two-state confirmation dialog. Reusable for the life of the session.
#[derive(Debug, Clone, Default)]
pub struct Gate {
    state: GateState,
}

impl Gate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, GateState::Open(_))
    }

    pub fn mode(&self) -> Option<GateMode> {
        match self.state {
            GateState::Open(mode) => Some(mode),
            GateState::Closed => None,
        }
    }

    /// Closed → Open(Reset). Returns false if the gate was already open.
    pub fn request_reset(&mut self) -> bool {
        self.open(GateMode::Reset)
    }

    /// Closed → Open(ExportBlocked). Returns false if the gate was already open.
    pub fn request_export_blocked(&mut self) -> bool {
        self.open(GateMode::ExportBlocked)
    }

    fn open(&mut self, mode: GateMode) -> bool {
        if self.is_open() {
            return false;
        }
        self.state = GateState::Open(mode);
        true
    }

    /// Open(Reset) → Closed. The caller performs the reset once this returns Ok.
    pub fn confirm(&mut self) -> Result<GateMode, GateError> {
        match self.state {
            GateState::Open(GateMode::Reset) => {
                self.state = GateState::Closed;
                Ok(GateMode::Reset)
            }
            GateState::Open(mode) => Err(GateError::NotConfirmable(mode)),
            GateState::Closed => Err(GateError::NothingToConfirm),
        }
    }

    /// Any open mode → Closed, no side effect. Returns whether it was open.
    pub fn cancel(&mut self) -> bool {
        let was_open = self.is_open();
        self.state = GateState::Closed;
        was_open
    }

    /// Dismiss the export-blocked notice. Same transition as [`Gate::cancel`].
    pub fn acknowledge(&mut self) -> bool {
        self.cancel()
    }
}
