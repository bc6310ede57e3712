//! Application state management for the Mnada terminal client.
//!
//! This module contains the core `App` struct: the `SessionGate`, the API
//! client, the current route and the state of every view. Network calls and
//! the dashboard timers run as spawned tasks that report back through an mpsc
//! channel; `check_background_tasks` applies their results on the event loop.

use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use mnada_core::api::{ApiClient, ApiError, CatalogService, REJECTED_FALLBACK};
use mnada_core::auth::flow::{
    self, FlowError, LOGIN_FALLBACK, REGISTRATION_FALLBACK, REGISTRATION_SUCCESS,
};
use mnada_core::auth::CredentialStore;
use mnada_core::config::Config;
use mnada_core::forms::{validate_login, ItemDraft, RegistrationForm};
use mnada_core::models::{Auction, AuctionItem, LoginResponse, ReviewDecision};
use mnada_core::routes::{self, Navigation};
use mnada_core::timer::TICK_INTERVAL;
use mnada_core::{Role, Route, SessionGate};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Delay between a successful registration and the move to the login view.
pub const REGISTRATION_REDIRECT_DELAY: Duration = Duration::from_secs(2);

/// Shown when a catalog request is rejected without a message.
const CATALOG_FALLBACK: &str = "Could not load auctions. Please try again.";

/// Environment overrides for the login form.
pub const USERNAME_ENV: &str = "MNADA_USERNAME";
pub const PASSWORD_ENV: &str = "MNADA_PASSWORD";

/// The gate as the binary holds it: backend chosen at startup.
pub type Gate = SessionGate<Box<dyn CredentialStore + Send>>;

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    EnteringPath,
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Username,
    Password,
    Button,
}

impl LoginFocus {
    pub fn next(&self) -> Self {
        match self {
            LoginFocus::Username => LoginFocus::Password,
            LoginFocus::Password => LoginFocus::Button,
            LoginFocus::Button => LoginFocus::Username,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            LoginFocus::Username => LoginFocus::Button,
            LoginFocus::Password => LoginFocus::Username,
            LoginFocus::Button => LoginFocus::Password,
        }
    }
}

/// Registration form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationFocus {
    Username,
    Email,
    Password,
    Role,
    Button,
}

impl RegistrationFocus {
    pub fn next(&self) -> Self {
        match self {
            RegistrationFocus::Username => RegistrationFocus::Email,
            RegistrationFocus::Email => RegistrationFocus::Password,
            RegistrationFocus::Password => RegistrationFocus::Role,
            RegistrationFocus::Role => RegistrationFocus::Button,
            RegistrationFocus::Button => RegistrationFocus::Username,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            RegistrationFocus::Username => RegistrationFocus::Button,
            RegistrationFocus::Email => RegistrationFocus::Username,
            RegistrationFocus::Password => RegistrationFocus::Email,
            RegistrationFocus::Role => RegistrationFocus::Password,
            RegistrationFocus::Button => RegistrationFocus::Role,
        }
    }
}

/// Field of the auctioneer's item submission form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Name,
    Description,
    Images,
    StartingBid,
    Category,
    StartDate,
    EndDate,
    Submit,
}

impl ItemField {
    pub const ALL: [ItemField; 8] = [
        ItemField::Name,
        ItemField::Description,
        ItemField::Images,
        ItemField::StartingBid,
        ItemField::Category,
        ItemField::StartDate,
        ItemField::EndDate,
        ItemField::Submit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ItemField::Name => "Name",
            ItemField::Description => "Description",
            ItemField::Images => "Images",
            ItemField::StartingBid => "Starting bid",
            ItemField::Category => "Category",
            ItemField::StartDate => "Start",
            ItemField::EndDate => "End",
            ItemField::Submit => "Submit",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|f| f == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Current focus on the auctioneer dashboard (submitted list or the form)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Form,
}

// ============================================================================
// Background Tasks
// ============================================================================

/// Results sent from spawned tasks back to the event loop.
///
/// Catalog results carry the session epoch they were started under and are
/// dropped once the session has changed.
pub(crate) enum TaskResult {
    Login(Result<LoginResponse, FlowError>),
    Registered(Result<(), FlowError>),
    /// Registration notice has been shown long enough
    RegistrationRedirect,
    Auctions(u64, Result<Vec<Auction>, ApiError>),
    ItemSubmitted(u64, Result<AuctionItem, ApiError>),
    PendingItems(u64, Result<Vec<AuctionItem>, ApiError>),
    Reviewed(u64, ReviewDecision, Result<AuctionItem, ApiError>),
    /// One-second tick for the timer owned by this route
    Tick(Route),
}

/// A task owned by the current view. Aborted when dropped, so leaving the
/// view stops it.
pub(crate) struct ViewTask(JoinHandle<()>);

impl Drop for ViewTask {
    fn drop(&mut self) {
        self.0.abort();
    }
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub gate: Gate,
    pub api: ApiClient,
    persist_config: bool,
    /// Bumped on every login and logout
    session_epoch: u64,

    // UI State
    pub state: AppState,
    pub route: Route,
    pub status_message: Option<String>,
    pub path_input: String,

    // Login form state
    pub login_username: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,
    pub login_pending: bool,

    // Registration form state
    pub registration: RegistrationForm,
    pub registration_focus: RegistrationFocus,
    pub registration_error: Option<String>,
    pub registration_notice: Option<String>,
    pub registration_pending: bool,

    // Auctioneer dashboard
    pub item_draft: ItemDraft,
    pub item_field: ItemField,
    pub item_error: Option<String>,
    pub item_pending: bool,
    pub auctioneer_focus: Focus,
    pub submitted_items: Vec<AuctionItem>,
    pub submitted_selection: usize,
    pub clock: DateTime<Utc>,

    // Admin dashboard
    pub pending_items: Vec<AuctionItem>,
    pub pending_selection: usize,
    pub pending_loading: bool,
    pub review_pending: bool,

    // Client dashboard
    pub auctions: Vec<Auction>,
    pub auction_selection: usize,
    pub auctions_loading: bool,
    pub countdown_now: DateTime<Utc>,

    // Background task channel
    task_rx: mpsc::Receiver<TaskResult>,
    task_tx: mpsc::Sender<TaskResult>,
    view_tasks: Vec<ViewTask>,
}

impl App {
    /// Create the application, restoring the session from `store`.
    ///
    /// With `persist_config` off nothing is written back to the config file.
    pub fn new(store: Box<dyn CredentialStore + Send>, persist_config: bool) -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };
        let api = ApiClient::new(&config.api_base_url())?;
        debug!(base_url = api.base_url(), "API client configured");

        let gate = SessionGate::initialize(store);
        let mut app = Self::with_parts(config, gate, api);
        app.persist_config = persist_config;

        app.login_username = std::env::var(USERNAME_ENV)
            .ok()
            .or_else(|| app.config.last_username.clone())
            .unwrap_or_default();
        app.login_password = std::env::var(PASSWORD_ENV).unwrap_or_default();
        app.navigate(Route::Home);
        Ok(app)
    }

    /// Assemble the application from already-built services.
    pub fn with_parts(config: Config, gate: Gate, mut api: ApiClient) -> Self {
        match gate.credential() {
            Some(token) => api.set_token(token.to_string()),
            None => api.clear_token(),
        }
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        let now = Utc::now();

        Self {
            config,
            gate,
            api,
            persist_config: false,
            session_epoch: 0,

            state: AppState::Normal,
            route: Route::Home,
            status_message: None,
            path_input: String::new(),

            login_username: String::new(),
            login_password: String::new(),
            login_focus: LoginFocus::Username,
            login_error: None,
            login_pending: false,

            registration: RegistrationForm::new(),
            registration_focus: RegistrationFocus::Username,
            registration_error: None,
            registration_notice: None,
            registration_pending: false,

            item_draft: ItemDraft::default(),
            item_field: ItemField::Name,
            item_error: None,
            item_pending: false,
            auctioneer_focus: Focus::List,
            submitted_items: Vec::new(),
            submitted_selection: 0,
            clock: now,

            pending_items: Vec::new(),
            pending_selection: 0,
            pending_loading: false,
            review_pending: false,

            auctions: Vec::new(),
            auction_selection: 0,
            auctions_loading: false,
            countdown_now: now,

            task_rx: rx,
            task_tx: tx,
            view_tasks: Vec::new(),
        }
    }

    pub fn role(&self) -> Role {
        self.gate.current_role()
    }

    pub fn is_authenticated(&self) -> bool {
        self.gate.session().is_authenticated()
    }

    /// True while the current view owns a running timer or delayed task.
    pub fn has_view_tasks(&self) -> bool {
        !self.view_tasks.is_empty()
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Move to `route`, subject to the access policy for the current role.
    pub fn navigate(&mut self, route: Route) {
        let navigation = routes::resolve(route, self.role());
        self.apply_navigation(route.path(), navigation);
    }

    /// Move to a typed path. Unknown paths land on the home view.
    pub fn navigate_path(&mut self, path: &str) {
        let navigation = routes::resolve_path(path, self.role());
        self.apply_navigation(path, navigation);
    }

    fn apply_navigation(&mut self, requested: &str, navigation: Navigation) {
        let target = navigation.target();
        if navigation.is_redirect() {
            debug!(requested, target = target.path(), role = %self.role(), "Redirected");
        }
        if target != self.route {
            self.leave_view();
            self.route = target;
        }
        self.enter_view();
    }

    fn leave_view(&mut self) {
        self.view_tasks.clear();
        self.status_message = None;
    }

    /// Reset transient view state and start whatever the view owns.
    fn enter_view(&mut self) {
        match self.route {
            Route::Home | Route::ClientDashboard => {
                self.countdown_now = Utc::now();
                if !self.has_view_tasks() {
                    let ticker = self.spawn_ticker(self.route);
                    self.view_tasks.push(ticker);
                }
                self.refresh_auctions();
            }
            Route::Login => {
                self.login_error = None;
                self.login_focus = if self.login_username.is_empty() {
                    LoginFocus::Username
                } else {
                    LoginFocus::Password
                };
            }
            Route::Registration => {
                if !self.has_view_tasks() {
                    self.registration_notice = None;
                    self.registration_error = None;
                }
            }
            Route::AdminDashboard => self.refresh_pending(),
            Route::AuctioneerDashboard => {
                self.clock = Utc::now();
                if !self.has_view_tasks() {
                    let ticker = self.spawn_ticker(Route::AuctioneerDashboard);
                    self.view_tasks.push(ticker);
                }
            }
        }
    }

    fn spawn_ticker(&self, owner: Route) -> ViewTask {
        let tx = self.task_tx.clone();
        ViewTask(tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK_INTERVAL);
            loop {
                interval.tick().await;
                if tx.send(TaskResult::Tick(owner)).await.is_err() {
                    break;
                }
            }
        }))
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Submit the login form. Ignored while a login is already in flight.
    pub fn submit_login(&mut self) {
        if self.login_pending {
            return;
        }
        if let Err(e) = validate_login(&self.login_username, &self.login_password) {
            self.login_error = Some(e.to_string());
            return;
        }

        self.login_error = None;
        self.login_pending = true;

        let api = self.api.clone();
        let tx = self.task_tx.clone();
        let username = self.login_username.clone();
        let password = self.login_password.clone();
        tokio::spawn(async move {
            let result = flow::authenticate(&api, &username, &password).await;
            Self::send_result(&tx, TaskResult::Login(result)).await;
        });
    }

    fn finish_login(&mut self, result: Result<LoginResponse, FlowError>) {
        self.login_pending = false;
        let role = result.and_then(|response| {
            let role = flow::complete_sign_in(&mut self.gate, &response)?;
            self.session_epoch += 1;
            self.api.set_token(response.token);
            Ok(role)
        });

        match role {
            Ok(role) => {
                info!(%role, "Login successful");
                self.login_password.clear();
                self.remember_username();
                self.navigate(role.dashboard());
            }
            Err(e) => {
                warn!(error = %e, "Login failed");
                self.login_error = Some(e.user_message(LOGIN_FALLBACK));
            }
        }
    }

    fn remember_username(&mut self) {
        let username = self.login_username.trim().to_string();
        if username.is_empty() || self.config.last_username.as_deref() == Some(username.as_str()) {
            return;
        }
        self.config.last_username = Some(username);
        if self.persist_config {
            if let Err(e) = self.config.save() {
                warn!(error = %e, "Failed to save config");
            }
        }
    }

    /// Submit the registration form.
    pub fn submit_registration(&mut self) {
        if self.registration_pending || self.has_view_tasks() {
            return;
        }
        if let Err(e) = self.registration.validate() {
            self.registration_error = Some(e.to_string());
            return;
        }

        self.registration_error = None;
        self.registration_pending = true;

        let api = self.api.clone();
        let tx = self.task_tx.clone();
        let form = self.registration.clone();
        tokio::spawn(async move {
            let result = flow::register(&api, &form).await;
            Self::send_result(&tx, TaskResult::Registered(result)).await;
        });
    }

    fn finish_registration(&mut self, result: Result<(), FlowError>) {
        self.registration_pending = false;
        match result {
            Ok(()) => {
                info!(username = %self.registration.username, "Registration successful");
                self.registration_notice = Some(REGISTRATION_SUCCESS.to_string());
                self.login_username = self.registration.username.trim().to_string();
                self.login_password.clear();
                self.registration = RegistrationForm::new();
                self.registration_focus = RegistrationFocus::Username;
                if self.route == Route::Registration {
                    let redirect = self.spawn_delayed(
                        REGISTRATION_REDIRECT_DELAY,
                        TaskResult::RegistrationRedirect,
                    );
                    self.view_tasks.push(redirect);
                }
            }
            Err(e) => {
                warn!(error = %e, "Registration failed");
                self.registration_error = Some(e.user_message(REGISTRATION_FALLBACK));
            }
        }
    }

    fn spawn_delayed(&self, delay: Duration, result: TaskResult) -> ViewTask {
        let tx = self.task_tx.clone();
        ViewTask(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            Self::send_result(&tx, result).await;
        }))
    }

    /// Sign out and show the login view.
    pub fn logout(&mut self) {
        self.gate.logout();
        self.session_epoch += 1;
        self.api.clear_token();
        self.auctions.clear();
        self.auctions_loading = false;
        self.pending_items.clear();
        self.pending_loading = false;
        self.review_pending = false;
        self.submitted_items.clear();
        self.item_draft.clear();
        self.item_pending = false;
        self.navigate(Route::Login);
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    pub fn refresh_auctions(&mut self) {
        self.auctions_loading = true;
        let api = self.api.clone();
        let tx = self.task_tx.clone();
        let epoch = self.session_epoch;
        tokio::spawn(async move {
            let result = api.list_auctions().await;
            Self::send_result(&tx, TaskResult::Auctions(epoch, result)).await;
        });
    }

    pub fn refresh_pending(&mut self) {
        self.pending_loading = true;
        let api = self.api.clone();
        let tx = self.task_tx.clone();
        let epoch = self.session_epoch;
        tokio::spawn(async move {
            let result = api.pending_items().await;
            Self::send_result(&tx, TaskResult::PendingItems(epoch, result)).await;
        });
    }

    /// Validate the draft and send it to the catalog.
    pub fn submit_item(&mut self) {
        if self.item_pending {
            return;
        }
        let submission = match self.item_draft.validate() {
            Ok(submission) => submission,
            Err(e) => {
                self.item_error = Some(e.to_string());
                return;
            }
        };

        self.item_error = None;
        self.item_pending = true;

        let api = self.api.clone();
        let tx = self.task_tx.clone();
        let epoch = self.session_epoch;
        tokio::spawn(async move {
            let result = api.submit_item(&submission).await;
            Self::send_result(&tx, TaskResult::ItemSubmitted(epoch, result)).await;
        });
    }

    /// Approve or reject the selected pending item. Ignored while a review is
    /// already in flight.
    pub fn review_selected(&mut self, decision: ReviewDecision) {
        if self.review_pending {
            return;
        }
        let Some(item) = self.pending_items.get(self.pending_selection) else {
            return;
        };
        let item_id = item.id;
        self.review_pending = true;

        let api = self.api.clone();
        let tx = self.task_tx.clone();
        let epoch = self.session_epoch;
        tokio::spawn(async move {
            let result = api.review_item(item_id, decision).await;
            Self::send_result(&tx, TaskResult::Reviewed(epoch, decision, result)).await;
        });
    }

    pub fn selected_auction(&self) -> Option<&Auction> {
        self.auctions.get(self.auction_selection)
    }

    // =========================================================================
    // Background Results
    // =========================================================================

    async fn send_result(tx: &mpsc::Sender<TaskResult>, result: TaskResult) {
        if tx.send(result).await.is_err() {
            debug!("Result channel closed");
        }
    }

    /// Check for completed background tasks and process results
    pub fn check_background_tasks(&mut self) {
        let mut results = Vec::new();
        while let Ok(result) = self.task_rx.try_recv() {
            results.push(result);
        }
        for result in results {
            self.process_task_result(result);
        }
    }

    /// Epoch of a catalog result, if it carries one.
    fn result_epoch(result: &TaskResult) -> Option<u64> {
        match result {
            TaskResult::Auctions(epoch, _)
            | TaskResult::ItemSubmitted(epoch, _)
            | TaskResult::PendingItems(epoch, _)
            | TaskResult::Reviewed(epoch, _, _) => Some(*epoch),
            TaskResult::Login(_)
            | TaskResult::Registered(_)
            | TaskResult::RegistrationRedirect
            | TaskResult::Tick(_) => None,
        }
    }

    pub(crate) fn process_task_result(&mut self, result: TaskResult) {
        if let Some(epoch) = Self::result_epoch(&result) {
            if epoch != self.session_epoch {
                debug!(
                    epoch,
                    current = self.session_epoch,
                    "Dropping result from an earlier session"
                );
                return;
            }
        }

        match result {
            TaskResult::Login(result) => self.finish_login(result),
            TaskResult::Registered(result) => self.finish_registration(result),
            TaskResult::RegistrationRedirect => {
                if self.route == Route::Registration {
                    self.navigate(Route::Login);
                }
            }
            TaskResult::Auctions(_, result) => {
                self.auctions_loading = false;
                match result {
                    Ok(auctions) => {
                        debug!(count = auctions.len(), "Auctions loaded");
                        self.auctions = auctions;
                        self.auction_selection =
                            self.auction_selection.min(self.auctions.len().saturating_sub(1));
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to load auctions");
                        self.status_message = Some(e.user_message(CATALOG_FALLBACK));
                    }
                }
            }
            TaskResult::ItemSubmitted(_, result) => {
                self.item_pending = false;
                match result {
                    Ok(item) => {
                        info!(id = item.id, status = %item.status, "Item submitted");
                        self.status_message =
                            Some(format!("\"{}\" submitted for approval.", item.name));
                        self.submitted_items.push(item);
                        self.item_draft.clear();
                        self.item_field = ItemField::Name;
                        self.auctioneer_focus = Focus::List;
                    }
                    Err(e) => {
                        warn!(error = %e, "Item submission failed");
                        self.item_error = Some(e.user_message(REJECTED_FALLBACK));
                    }
                }
            }
            TaskResult::PendingItems(_, result) => {
                self.pending_loading = false;
                match result {
                    Ok(items) => {
                        self.pending_items = items;
                        self.pending_selection =
                            self.pending_selection.min(self.pending_items.len().saturating_sub(1));
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to load pending items");
                        self.status_message = Some(e.user_message(REJECTED_FALLBACK));
                    }
                }
            }
            TaskResult::Reviewed(_, decision, result) => {
                self.review_pending = false;
                match result {
                    Ok(item) => {
                        info!(id = item.id, ?decision, "Item reviewed");
                        self.pending_items.retain(|pending| pending.id != item.id);
                        self.pending_selection =
                            self.pending_selection.min(self.pending_items.len().saturating_sub(1));
                        self.status_message = Some(format!("\"{}\" {}.", item.name, item.status));
                    }
                    Err(e) => {
                        warn!(error = %e, "Review failed");
                        self.status_message = Some(e.user_message(REJECTED_FALLBACK));
                    }
                }
            }
            TaskResult::Tick(owner) => {
                if owner != self.route {
                    return;
                }
                match owner {
                    Route::AuctioneerDashboard => self.clock = Utc::now(),
                    Route::Home | Route::ClientDashboard => self.countdown_now = Utc::now(),
                    _ => {}
                }
            }
        }
    }
}
