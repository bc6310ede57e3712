//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use mnada_core::forms::{can_add_password_char, can_add_text_char, can_add_username_char};
use mnada_core::models::{Category, ReviewDecision};
use mnada_core::Route;

use crate::app::{App, AppState, Focus, ItemField, LoginFocus, RegistrationFocus};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match app.state {
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
            return Ok(false);
        }
        AppState::ConfirmingQuit => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    app.state = AppState::Quitting;
                    return Ok(true);
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.state = AppState::Normal;
                }
                _ => {}
            }
            return Ok(false);
        }
        AppState::EnteringPath => {
            handle_path_input(app, key);
            return Ok(false);
        }
        AppState::Quitting => return Ok(true),
        AppState::Normal => {}
    }

    match app.route {
        Route::Login => handle_login_input(app, key),
        Route::Registration => handle_registration_input(app, key),
        Route::AuctioneerDashboard if app.auctioneer_focus == Focus::Form => {
            handle_item_form_input(app, key)
        }
        _ => handle_view_keys(app, key),
    }
    Ok(false)
}

fn handle_path_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Normal;
        }
        KeyCode::Enter => {
            app.state = AppState::Normal;
            let path = std::mem::take(&mut app.path_input);
            app.navigate_path(&path);
        }
        KeyCode::Backspace => {
            app.path_input.pop();
        }
        KeyCode::Char(c) => {
            if can_add_text_char(app.path_input.len(), c) {
                app.path_input.push(c);
            }
        }
        _ => {}
    }
}

fn select_next(selection: &mut usize, len: usize) {
    if *selection + 1 < len {
        *selection += 1;
    }
}

fn select_prev(selection: &mut usize) {
    *selection = selection.saturating_sub(1);
}

/// Keys for views without a focused text field
fn handle_view_keys(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
            return;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return;
        }
        KeyCode::Char(':') => {
            app.path_input = "/".to_string();
            app.state = AppState::EnteringPath;
            return;
        }
        KeyCode::Char('h') => {
            app.navigate(Route::Home);
            return;
        }
        KeyCode::Char('d') => {
            let dashboard = app.role().dashboard();
            app.navigate(dashboard);
            return;
        }
        KeyCode::Char('o') if app.is_authenticated() => {
            app.logout();
            return;
        }
        _ => {}
    }

    match app.route {
        Route::Home => match key.code {
            KeyCode::Char('l') => app.navigate(Route::Login),
            KeyCode::Char('r') => app.navigate(Route::Registration),
            KeyCode::Down | KeyCode::Char('j') => {
                select_next(&mut app.auction_selection, app.auctions.len())
            }
            KeyCode::Up | KeyCode::Char('k') => select_prev(&mut app.auction_selection),
            KeyCode::Char('u') => app.refresh_auctions(),
            _ => {}
        },
        Route::AdminDashboard => match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                select_next(&mut app.pending_selection, app.pending_items.len())
            }
            KeyCode::Up | KeyCode::Char('k') => select_prev(&mut app.pending_selection),
            KeyCode::Char('a') => app.review_selected(ReviewDecision::Approved),
            KeyCode::Char('x') => app.review_selected(ReviewDecision::Rejected),
            KeyCode::Char('u') => app.refresh_pending(),
            _ => {}
        },
        Route::AuctioneerDashboard => match key.code {
            KeyCode::Char('n') | KeyCode::Enter => {
                app.auctioneer_focus = Focus::Form;
                app.item_field = ItemField::Name;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                select_next(&mut app.submitted_selection, app.submitted_items.len())
            }
            KeyCode::Up | KeyCode::Char('k') => select_prev(&mut app.submitted_selection),
            _ => {}
        },
        Route::ClientDashboard => match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                select_next(&mut app.auction_selection, app.auctions.len())
            }
            KeyCode::Up | KeyCode::Char('k') => select_prev(&mut app.auction_selection),
            KeyCode::Char('u') => app.refresh_auctions(),
            _ => {}
        },
        Route::Login | Route::Registration => {}
    }
}

fn handle_login_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.navigate(Route::Home),
        KeyCode::Tab | KeyCode::Down => app.login_focus = app.login_focus.next(),
        KeyCode::BackTab | KeyCode::Up => app.login_focus = app.login_focus.prev(),
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Username => app.login_focus = LoginFocus::Password,
            LoginFocus::Password | LoginFocus::Button => app.submit_login(),
        },
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Username => {
                app.login_username.pop();
            }
            LoginFocus::Password => {
                app.login_password.pop();
            }
            LoginFocus::Button => {}
        },
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Username => {
                if can_add_username_char(app.login_username.chars().count(), c) {
                    app.login_username.push(c);
                }
            }
            LoginFocus::Password => {
                if can_add_password_char(app.login_password.chars().count(), c) {
                    app.login_password.push(c);
                }
            }
            LoginFocus::Button => {}
        },
        _ => {}
    }
}

fn handle_registration_input(app: &mut App, key: KeyEvent) {
    let focus = app.registration_focus;
    match key.code {
        KeyCode::Esc => app.navigate(Route::Home),
        KeyCode::Tab | KeyCode::Down => app.registration_focus = focus.next(),
        KeyCode::BackTab | KeyCode::Up => app.registration_focus = focus.prev(),
        KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if focus == RegistrationFocus::Role => {
            app.registration.role = app.registration.role.next_account_role();
        }
        KeyCode::Enter => match focus {
            RegistrationFocus::Button => app.submit_registration(),
            _ => app.registration_focus = focus.next(),
        },
        KeyCode::Backspace => {
            if let Some(field) = registration_field(app, focus) {
                field.pop();
            }
        }
        KeyCode::Char(c) => {
            let allowed = match focus {
                RegistrationFocus::Username => {
                    can_add_username_char(app.registration.username.chars().count(), c)
                }
                RegistrationFocus::Password => {
                    can_add_password_char(app.registration.password.chars().count(), c)
                }
                RegistrationFocus::Email => {
                    can_add_text_char(app.registration.email.chars().count(), c)
                }
                RegistrationFocus::Role | RegistrationFocus::Button => false,
            };
            if allowed {
                if let Some(field) = registration_field(app, focus) {
                    field.push(c);
                }
            }
        }
        _ => {}
    }
}

fn registration_field(app: &mut App, focus: RegistrationFocus) -> Option<&mut String> {
    match focus {
        RegistrationFocus::Username => Some(&mut app.registration.username),
        RegistrationFocus::Email => Some(&mut app.registration.email),
        RegistrationFocus::Password => Some(&mut app.registration.password),
        RegistrationFocus::Role | RegistrationFocus::Button => None,
    }
}

fn item_text_field(app: &mut App, field: ItemField) -> Option<&mut String> {
    let draft = &mut app.item_draft;
    match field {
        ItemField::Name => Some(&mut draft.name),
        ItemField::Description => Some(&mut draft.description),
        ItemField::Images => Some(&mut draft.images),
        ItemField::StartingBid => Some(&mut draft.starting_bid),
        ItemField::StartDate => Some(&mut draft.start_date),
        ItemField::EndDate => Some(&mut draft.end_date),
        ItemField::Category | ItemField::Submit => None,
    }
}

fn handle_item_form_input(app: &mut App, key: KeyEvent) {
    let field = app.item_field;
    match key.code {
        KeyCode::Esc => app.auctioneer_focus = Focus::List,
        KeyCode::Tab | KeyCode::Down => app.item_field = field.next(),
        KeyCode::BackTab | KeyCode::Up => app.item_field = field.prev(),
        KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if field == ItemField::Category => {
            app.item_draft.category = Some(Category::cycle(app.item_draft.category));
        }
        KeyCode::Enter => match field {
            ItemField::Submit => app.submit_item(),
            _ => app.item_field = field.next(),
        },
        KeyCode::Backspace => {
            if let Some(text) = item_text_field(app, field) {
                text.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(text) = item_text_field(app, field) {
                if can_add_text_char(text.chars().count(), c) {
                    text.push(c);
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use mnada_core::api::ApiClient;
    use mnada_core::auth::{CredentialStore, MemoryCredentialStore};
    use mnada_core::config::Config;
    use mnada_core::{Role, SessionGate};

    const AUCTIONEER_TOKEN: &str = "h.eyJyb2xlIjoiYXVjdGlvbmVlciJ9.s";

    fn app_with(credential: Option<&str>) -> App {
        let store = match credential {
            Some(c) => MemoryCredentialStore::with_credential(c),
            None => MemoryCredentialStore::new(),
        };
        let store: Box<dyn CredentialStore + Send> = Box::new(store);
        let api = ApiClient::new("http://127.0.0.1:9").unwrap();
        App::with_parts(Config::default(), SessionGate::initialize(store), api)
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_input(app, KeyEvent::new(code, KeyModifiers::NONE)).unwrap()
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[tokio::test]
    async fn test_login_form_typing() {
        let mut app = app_with(None);
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.route, Route::Login);
        assert_eq!(app.login_focus, LoginFocus::Username);

        type_text(&mut app, "quinn");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "s3cret");
        press(&mut app, KeyCode::Backspace);

        assert_eq!(app.login_username, "quinn");
        assert_eq!(app.login_password, "s3cre");
        assert_eq!(app.state, AppState::Normal);
    }

    #[tokio::test]
    async fn test_login_enter_with_empty_password_shows_error() {
        let mut app = app_with(None);
        app.navigate(Route::Login);
        type_text(&mut app, "ann");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.login_focus, LoginFocus::Password);
        press(&mut app, KeyCode::Enter);
        assert!(app.login_error.is_some());
        assert!(!app.login_pending);
    }

    #[tokio::test]
    async fn test_escape_from_login_goes_home() {
        let mut app = app_with(None);
        app.navigate(Route::Login);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.route, Route::Home);
    }

    #[tokio::test]
    async fn test_home_browses_auctions() {
        let mut app = app_with(None);
        app.auctions = (1..=2)
            .map(|id| mnada_core::models::Auction {
                id,
                item: format!("Lot {id}"),
                starting_price: 50.0,
                end_time: None,
                status: None,
            })
            .collect();
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.selected_auction().map(|a| a.id), Some(2));
        press(&mut app, KeyCode::Char('u'));
        assert!(app.auctions_loading);
        assert_eq!(app.route, Route::Home);
    }

    #[tokio::test]
    async fn test_path_prompt_navigates() {
        let mut app = app_with(None);
        press(&mut app, KeyCode::Char(':'));
        assert_eq!(app.state, AppState::EnteringPath);
        type_text(&mut app, "registration");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::Normal);
        assert_eq!(app.route, Route::Registration);
    }

    #[tokio::test]
    async fn test_path_prompt_respects_role() {
        let mut app = app_with(Some(AUCTIONEER_TOKEN));
        press(&mut app, KeyCode::Char(':'));
        type_text(&mut app, "admin-dashboard");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.route, Route::Home);

        press(&mut app, KeyCode::Char(':'));
        type_text(&mut app, "login");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.route, Route::AuctioneerDashboard);
    }

    #[tokio::test]
    async fn test_registration_role_picker() {
        let mut app = app_with(None);
        app.navigate(Route::Registration);
        assert_eq!(app.registration.role, Role::Client);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.registration_focus, RegistrationFocus::Role);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.registration.role, Role::Auctioneer);
        type_text(&mut app, "x");
        assert_eq!(app.registration.role, Role::Auctioneer);
    }

    #[tokio::test]
    async fn test_item_form_focus_and_category() {
        let mut app = app_with(Some(AUCTIONEER_TOKEN));
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.route, Route::AuctioneerDashboard);

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.auctioneer_focus, Focus::Form);
        type_text(&mut app, "quilt");
        assert_eq!(app.item_draft.name, "quilt");

        for _ in 0..4 {
            press(&mut app, KeyCode::Tab);
        }
        assert_eq!(app.item_field, ItemField::Category);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.item_draft.category, Some(Category::MotorVehicles));

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.auctioneer_focus, Focus::List);
    }

    #[tokio::test]
    async fn test_quit_confirmation() {
        let mut app = app_with(None);
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.state, AppState::ConfirmingQuit);
        assert!(!press(&mut app, KeyCode::Char('n')));
        assert_eq!(app.state, AppState::Normal);
        press(&mut app, KeyCode::Char('q'));
        assert!(press(&mut app, KeyCode::Char('y')));
        assert_eq!(app.state, AppState::Quitting);
    }

    #[tokio::test]
    async fn test_logout_key() {
        let mut app = app_with(Some(AUCTIONEER_TOKEN));
        press(&mut app, KeyCode::Char('o'));
        assert_eq!(app.role(), Role::Anonymous);
        assert_eq!(app.route, Route::Login);
    }
}
