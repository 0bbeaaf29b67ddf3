//! Navigation chrome shown above the protected screens.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::{IdentityGate, Route, show_navigation};

/// View model for the top bar.
pub struct Navigation {
    gate: Arc<IdentityGate>,
    menu_open: AtomicBool,
}

impl Navigation {
    /// Navigation bound to `gate`, with the mobile menu closed.
    pub fn new(gate: Arc<IdentityGate>) -> Self {
        Self {
            gate,
            menu_open: AtomicBool::new(false),
        }
    }

    /// Whether the bar renders on `route`.
    #[must_use]
    pub fn is_visible(&self, route: &Route) -> bool {
        show_navigation(&self.gate.snapshot(), route)
    }

    /// Destinations listed in the bar.
    #[must_use]
    pub fn links(&self) -> Vec<Route> {
        vec![Route::Characters]
    }

    /// Whether the mobile menu is expanded.
    #[must_use]
    pub fn is_menu_open(&self) -> bool {
        self.menu_open.load(Ordering::Relaxed)
    }

    /// Expand or collapse the mobile menu.
    pub fn toggle_menu(&self) {
        self.menu_open.fetch_xor(true, Ordering::Relaxed);
    }

    /// Follow a link; collapses the mobile menu.
    pub fn follow(&self, route: Route) -> Route {
        self.menu_open.store(false, Ordering::Relaxed);
        route
    }

    /// Sign out and return the route to navigate to.
    pub async fn logout(&self) -> Route {
        self.menu_open.store(false, Ordering::Relaxed);
        self.gate.sign_out().await;
        Route::Login
    }
}
