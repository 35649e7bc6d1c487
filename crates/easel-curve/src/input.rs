//! Modifier-key snapshot polled once per tick by the caller.

/// State of the modifier keys at one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyState {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl KeyState {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    pub fn alt() -> Self {
        Self {
            alt: true,
            ..Self::NONE
        }
    }

    /// Shift without Ctrl.
    pub fn wants_snap(self) -> bool {
        self.shift && !self.ctrl
    }

    pub fn wants_lock_angle(self) -> bool {
        self.alt
    }

    /// Ctrl without Shift.
    pub fn wants_lock_length(self) -> bool {
        self.ctrl && !self.shift
    }
}
