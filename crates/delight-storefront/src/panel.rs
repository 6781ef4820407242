//! Cart panel visibility.

use tokio::sync::watch;

/// Open/closed state of the sliding cart panel.
///
/// Observed by the UI through a watch channel; the checkout
/// orchestrator closes it after a successful payment.
#[derive(Debug)]
pub struct CartPanel {
    state: watch::Sender<bool>,
}

impl CartPanel {
    /// Create a closed panel.
    pub fn new() -> Self {
        let (state, _) = watch::channel(false);
        Self { state }
    }

    /// Open the panel.
    pub fn open(&self) {
        self.state.send_replace(true);
    }

    /// Close the panel.
    pub fn close(&self) {
        self.state.send_replace(false);
    }

    /// Toggle open/closed.
    pub fn toggle(&self) {
        self.state.send_modify(|open| *open = !*open);
    }

    /// Whether the panel is currently open.
    pub fn is_open(&self) -> bool {
        *self.state.borrow()
    }

    /// Observe visibility changes.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.state.subscribe()
    }
}

impl Default for CartPanel {
    fn default() -> Self {
        Self::new()
    }
}
