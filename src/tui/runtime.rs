//! Dashboard application state.

use tokio::sync::{mpsc, watch};

use crate::api::types::ServiceInfo;
use crate::platform::Platform;
use crate::status::ViewState;

/// Outcome of the one-off service description fetch.
pub type ServiceSlot = Option<Result<ServiceInfo, String>>;

/// Which view is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Dashboard,
}

/// TUI application state.
///
/// Owns the receiving ends of the poller's channels; the render loop calls
/// [`sync`](Self::sync) before each frame to pick up new states.
pub struct App {
    /// Active screen.
    pub screen: Screen,
    /// Latest dashboard state.
    pub view: ViewState,
    /// Service description, once fetched.
    pub service: ServiceSlot,
    /// Resolved backend base URL.
    pub api_url: String,
    /// Platform tag for header styling.
    pub platform: Platform,
    /// Whether the user has requested quit.
    pub quit: bool,
    state_rx: watch::Receiver<ViewState>,
    service_rx: watch::Receiver<ServiceSlot>,
    refresh_tx: mpsc::Sender<()>,
}

impl App {
    /// Creates the app on the dashboard screen.
    pub fn new(
        api_url: String,
        platform: Platform,
        state_rx: watch::Receiver<ViewState>,
        service_rx: watch::Receiver<ServiceSlot>,
        refresh_tx: mpsc::Sender<()>,
    ) -> Self {
        let view = state_rx.borrow().clone();
        let service = service_rx.borrow().clone();
        Self {
            screen: Screen::Dashboard,
            view,
            service,
            api_url,
            platform,
            quit: false,
            state_rx,
            service_rx,
            refresh_tx,
        }
    }

    /// Pulls any newly published state from the background tasks.
    pub fn sync(&mut self) {
        if self.state_rx.has_changed().unwrap_or(false) {
            self.view = self.state_rx.borrow_and_update().clone();
        }
        if self.service_rx.has_changed().unwrap_or(false) {
            self.service = self.service_rx.borrow_and_update().clone();
        }
    }

    /// Asks the poller for a new cycle.
    ///
    /// Ignored while a request is already queued.
    pub fn refresh(&mut self) {
        let _ = self.refresh_tx.try_send(());
        self.screen = Screen::Dashboard;
    }

    pub fn go_home(&mut self) {
        self.screen = Screen::Home;
    }

    pub fn go_dashboard(&mut self) {
        self.screen = Screen::Dashboard;
    }

    /// Toggles between home and dashboard.
    pub fn toggle_screen(&mut self) {
        self.screen = match self.screen {
            Screen::Home => Screen::Dashboard,
            Screen::Dashboard => Screen::Home,
        };
    }
}
