//! Navigable views and the role-based access policy.
//!
//! Every path maps to one `Route`, and every route declares the access it
//! needs. Resolution is exact-match on role: an admin does not satisfy an
//! auctioneer-only view.

use tracing::debug;

use crate::auth::Role;

/// Access required to render a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Only(Role),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Registration,
    AdminDashboard,
    AuctioneerDashboard,
    ClientDashboard,
}

impl Route {
    pub const ALL: [Route; 6] = [
        Route::Home,
        Route::Login,
        Route::Registration,
        Route::AdminDashboard,
        Route::AuctioneerDashboard,
        Route::ClientDashboard,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Registration => "/registration",
            Route::AdminDashboard => "/admin-dashboard",
            Route::AuctioneerDashboard => "/auctioneer-dashboard",
            Route::ClientDashboard => "/client-dashboard",
        }
    }

    /// Parse a request path. Trailing slashes are ignored; unknown paths yield `None`.
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim();
        let normalized = match trimmed.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        Route::ALL.into_iter().find(|route| route.path() == normalized)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Available Auctions",
            Route::Login => "Login",
            Route::Registration => "Create an Account",
            Route::AdminDashboard => "Admin Dashboard",
            Route::AuctioneerDashboard => "Auctioneer Dashboard",
            Route::ClientDashboard => "Client Dashboard",
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Route::Home | Route::Login | Route::Registration => Access::Public,
            Route::AdminDashboard => Access::Only(Role::Admin),
            Route::AuctioneerDashboard => Access::Only(Role::Auctioneer),
            Route::ClientDashboard => Access::Only(Role::Client),
        }
    }
}

/// Outcome of asking to view a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    Redirect(Route),
}

impl Navigation {
    /// The route that ends up on screen.
    pub fn target(&self) -> Route {
        match self {
            Navigation::Render(route) | Navigation::Redirect(route) => *route,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Navigation::Redirect(_))
    }
}

/// Decide what `role` sees when it requests `route`.
pub fn resolve(route: Route, role: Role) -> Navigation {
    // The login form is unreachable once signed in.
    if route == Route::Login && role.is_authenticated() {
        return Navigation::Redirect(role.dashboard());
    }

    match route.access() {
        Access::Public => Navigation::Render(route),
        Access::Only(required) if required == role => Navigation::Render(route),
        Access::Only(required) => {
            debug!(path = route.path(), %required, %role, "Access denied, redirecting home");
            Navigation::Redirect(Route::Home)
        }
    }
}

/// Resolve a raw path; unknown paths redirect home.
pub fn resolve_path(path: &str, role: Role) -> Navigation {
    match Route::from_path(path) {
        Some(route) => resolve(route, role),
        None => {
            debug!(path, "Unknown path, redirecting home");
            Navigation::Redirect(Route::Home)
        }
    }
}
