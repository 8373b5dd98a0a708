//! Per-run session state: who is logged in and which theme is active.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

use crate::db::Store;
use crate::error::{Error, Result};
use crate::models::User;

pub const USER_KEY: &str = "taskdeck_user";
pub const TOKEN_KEY: &str = "taskdeck_token";
pub const THEME_KEY: &str = "taskdeck_theme";

const TOKEN_MARKER: &str = "mock-token";
const FALLBACK_USER_ID: &str = "1";
const DEMO_NAME: &str = "Demo User";
const DEMO_AVATAR: &str =
    "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?w=150&h=150&fit=crop&crop=face";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => f.write_str("light"),
            Theme::Dark => f.write_str("dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(Error::Validation(format!(
                "Invalid theme '{}'. Must be one of: light, dark",
                other
            ))),
        }
    }
}

/// Restored from the store once per run; every change is written straight back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user: Option<User>,
    theme: Theme,
}

impl Session {
    pub fn restore(store: &Store, default_theme: Theme) -> Self {
        Self {
            user: store.load(USER_KEY, None),
            theme: store.load(THEME_KEY, default_theme),
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Owner id stamped on new projects.
    pub fn owner_id(&self) -> &str {
        self.user
            .as_ref()
            .map(|u| u.id.as_str())
            .unwrap_or(FALLBACK_USER_ID)
    }

    /// Any non-empty pair of credentials logs in as the demo identity.
    pub fn login(&mut self, store: &Store, email: &str, password: &str) -> Result<User> {
        if email.is_empty() || password.is_empty() {
            return Err(Error::InvalidCredentials);
        }

        let user = User {
            id: FALLBACK_USER_ID.to_string(),
            email: email.to_string(),
            name: DEMO_NAME.to_string(),
            avatar: Some(DEMO_AVATAR.to_string()),
        };
        store.save(USER_KEY, &user);
        store.save(TOKEN_KEY, TOKEN_MARKER);
        info!(email, "logged in");

        self.user = Some(user.clone());
        Ok(user)
    }

    pub fn logout(&mut self, store: &Store) {
        self.user = None;
        store.remove(USER_KEY);
        store.remove(TOKEN_KEY);
        info!("logged out");
    }

    pub fn is_authenticated(&self, store: &Store) -> bool {
        store.contains(TOKEN_KEY)
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, store: &Store, theme: Theme) {
        self.theme = theme;
        store.save(THEME_KEY, &theme);
    }

    pub fn toggle_theme(&mut self, store: &Store) -> Theme {
        let next = self.theme.toggled();
        self.set_theme(store, next);
        next
    }
}
