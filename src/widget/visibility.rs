//! Dropdown visibility state machine
//!
//! `Hidden -> Visible` on focus. Blur hides only after a grace period so that an
//! item click, which blurs the input first, still lands on a visible list. A focus
//! inside the grace period cancels the pending hide.

use super::WidgetEvent;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    Visible,
}

#[derive(Debug)]
pub struct DropdownVisibility {
    state: Visibility,
    focused: bool,
    grace: Duration,
    /// Identifies the latest blur; older hide timers are ignored
    blur_token: u64,
    pending_hide: Option<JoinHandle<()>>,
    events: mpsc::UnboundedSender<WidgetEvent>,
}

impl DropdownVisibility {
    pub fn new(grace: Duration, events: mpsc::UnboundedSender<WidgetEvent>) -> Self {
        Self {
            state: Visibility::Hidden,
            focused: false,
            grace,
            blur_token: 0,
            pending_hide: None,
            events,
        }
    }

    pub fn state(&self) -> Visibility {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state == Visibility::Visible
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.cancel_pending_hide();
        self.focused = true;
        self.state = Visibility::Visible;
    }

    /// Schedule the hide; the state stays `Visible` until the grace period ends
    pub fn blur(&mut self) {
        self.cancel_pending_hide();
        self.focused = false;

        let token = self.blur_token;
        let grace = self.grace;
        let events = self.events.clone();
        self.pending_hide = Some(tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            let _ = events.send(WidgetEvent::BlurElapsed { token });
        }));
    }

    pub fn on_blur_elapsed(&mut self, token: u64) {
        if token != self.blur_token || self.focused {
            log::trace!("Ignoring stale blur timer {}", token);
            return;
        }
        self.pending_hide = None;
        self.state = Visibility::Hidden;
    }

    /// Hide immediately, regardless of focus
    pub fn force_hide(&mut self) {
        self.cancel_pending_hide();
        self.state = Visibility::Hidden;
    }

    /// Show again after new results arrive, but only while the input has focus
    pub fn reveal_if_focused(&mut self) {
        if self.focused {
            self.state = Visibility::Visible;
        }
    }

    fn cancel_pending_hide(&mut self) {
        self.blur_token += 1;
        if let Some(handle) = self.pending_hide.take() {
            handle.abort();
        }
    }
}

impl Drop for DropdownVisibility {
    fn drop(&mut self) {
        if let Some(handle) = self.pending_hide.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> (DropdownVisibility, mpsc::UnboundedReceiver<WidgetEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (DropdownVisibility::new(Duration::from_millis(300), tx), rx)
    }

    async fn next_blur_token(rx: &mut mpsc::UnboundedReceiver<WidgetEvent>) -> u64 {
        match rx.recv().await {
            Some(WidgetEvent::BlurElapsed { token }) => token,
            _ => panic!("expected BlurElapsed"),
        }
    }

    #[test]
    fn test_initially_hidden() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let machine = DropdownVisibility::new(Duration::from_millis(300), tx);
        assert_eq!(machine.state(), Visibility::Hidden);
        assert!(!machine.is_focused());
    }

    #[tokio::test(start_paused = true)]
    async fn test_blur_hides_after_grace_period() {
        let (mut machine, mut rx) = machine();
        machine.focus();
        assert!(machine.is_visible());

        machine.blur();
        assert!(machine.is_visible());

        let token = next_blur_token(&mut rx).await;
        machine.on_blur_elapsed(token);
        assert_eq!(machine.state(), Visibility::Hidden);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refocus_cancels_pending_hide() {
        let (mut machine, mut rx) = machine();
        machine.focus();
        machine.blur();
        tokio::time::sleep(Duration::from_millis(100)).await;
        machine.focus();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
        assert!(machine.is_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_token_is_ignored() {
        let (mut machine, _rx) = machine();
        machine.focus();
        machine.blur();
        machine.focus();
        machine.on_blur_elapsed(0);
        assert!(machine.is_visible());
    }

    #[tokio::test]
    async fn test_force_hide_and_reveal() {
        let (mut machine, _rx) = machine();
        machine.focus();
        machine.force_hide();
        assert!(!machine.is_visible());

        machine.reveal_if_focused();
        assert!(machine.is_visible());
    }
}
