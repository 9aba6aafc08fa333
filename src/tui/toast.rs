//! Toast notification system
//!
//! Short-lived messages for lookup failures and selections. Expiry is checked on
//! each UI tick via `update`.

use std::time::Duration;
use tokio::time::Instant;

pub const SELECTION_TOAST_DURATION: Duration = Duration::from_secs(3);
pub const ERROR_TOAST_DURATION: Duration = Duration::from_secs(5);

#[derive(Clone, Debug)]
pub struct ToastState {
    pub visible: bool,
    pub message: String,
    pub toast_type: ToastType,
    pub show_until: Option<Instant>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastType {
    Info,
    Success,
    Warning,
    Error,
}

impl Default for ToastState {
    fn default() -> Self {
        Self::new()
    }
}

impl ToastState {
    pub fn new() -> Self {
        Self {
            visible: false,
            message: String::new(),
            toast_type: ToastType::Info,
            show_until: None,
        }
    }

    /// Show a toast with specified message and type for given duration
    pub fn show(&mut self, message: impl Into<String>, toast_type: ToastType, duration: Duration) {
        self.visible = true;
        self.message = message.into();
        self.toast_type = toast_type;
        self.show_until = Some(Instant::now() + duration);
    }

    /// Hide if expired
    pub fn update(&mut self) {
        if let Some(until) = self.show_until {
            if Instant::now() >= until {
                self.hide();
            }
        }
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.show_until = None;
    }
}
