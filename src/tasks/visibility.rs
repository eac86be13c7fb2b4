//! Host Visibility Signal
//!
//! Tracks whether the consuming document/window is currently shown.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{watch, Notify};

/// Visibility of the hosting environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Visible,
    Hidden,
}

impl Visibility {
    pub fn from_visible(visible: bool) -> Self {
        if visible {
            Visibility::Visible
        } else {
            Visibility::Hidden
        }
    }

    pub fn is_visible(self) -> bool {
        self == Visibility::Visible
    }
}

// == Visibility Handle ==
/// Owner side of the visibility signal; the host reports transitions here.
///
/// Each hidden to visible transition is recorded as its own event, so a
/// quick hide/show pair is not lost even if nobody is waiting yet.
#[derive(Debug, Clone)]
pub struct VisibilityHandle {
    tx: watch::Sender<Visibility>,
    resumed: Arc<Notify>,
}

impl VisibilityHandle {
    pub fn new(initial: Visibility) -> Self {
        Self {
            tx: watch::Sender::new(initial),
            resumed: Arc::new(Notify::new()),
        }
    }

    /// Records the current visibility, returning the previous one.
    pub fn set(&self, visibility: Visibility) -> Visibility {
        let previous = self.tx.send_replace(visibility);
        if previous == Visibility::Hidden && visibility == Visibility::Visible {
            self.resumed.notify_one();
        }
        previous
    }

    pub fn current(&self) -> Visibility {
        *self.tx.borrow()
    }

    /// Completes on the next hidden to visible transition, or immediately
    /// if one happened since the last call returned.
    pub async fn resumed(&self) {
        self.resumed.notified().await;
    }
}

impl Default for VisibilityHandle {
    fn default() -> Self {
        Self::new(Visibility::Visible)
    }
}
