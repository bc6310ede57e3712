use std::fmt;

use serde::{Deserialize, Serialize};

use crate::routes::Route;

/// Authorization category gating dashboard access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Anonymous,
    Admin,
    Auctioneer,
    Client,
}

impl Role {
    /// Parse a role claim. Only account roles are accepted; "anonymous" is the
    /// absence of a session and never a claim.
    pub fn from_claim(claim: &str) -> Option<Self> {
        match claim.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "auctioneer" => Some(Role::Auctioneer),
            "client" => Some(Role::Client),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Anonymous => "anonymous",
            Role::Admin => "admin",
            Role::Auctioneer => "auctioneer",
            Role::Client => "client",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Anonymous => "Guest",
            Role::Admin => "Admin",
            Role::Auctioneer => "Auctioneer",
            Role::Client => "Client",
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Role::Anonymous)
    }

    /// The dashboard a signed-in user lands on; anonymous users land on home.
    pub fn dashboard(&self) -> Route {
        match self {
            Role::Anonymous => Route::Home,
            Role::Admin => Route::AdminDashboard,
            Role::Auctioneer => Route::AuctioneerDashboard,
            Role::Client => Route::ClientDashboard,
        }
    }

    /// Next account role, wrapping (used by the registration role picker).
    pub fn next_account_role(&self) -> Self {
        match self {
            Role::Client => Role::Auctioneer,
            Role::Auctioneer => Role::Admin,
            Role::Admin | Role::Anonymous => Role::Client,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
