//! Account flow: simulated login and sign-up.
//!
//! There is no identity backend. A valid submit shows the success notice
//! straight away and signs the user in after the configured delay.

use crate::config::StorefrontConfig;
use crate::error::StorefrontError;
use crate::types::Notice;
use eventticket_core::{SmallVec, delay, effect::Effect, reducer::Reducer, smallvec};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which form is shown
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthMode {
    /// Existing account
    #[default]
    Login,
    /// New account
    SignUp,
}

impl AuthMode {
    /// The other mode
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Login => Self::SignUp,
            Self::SignUp => Self::Login,
        }
    }
}

/// Editable fields of the account form
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountField {
    /// Email address
    Email,
    /// Password
    Password,
    /// First name (sign-up only)
    FirstName,
    /// Last name (sign-up only)
    LastName,
    /// Password confirmation (sign-up only)
    ConfirmPassword,
}

/// Contents of the account form
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountForm {
    /// Email address
    pub email: String,
    /// Password
    pub password: String,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Password confirmation
    pub confirm_password: String,
}

// Passwords stay out of logs and test output
impl std::fmt::Debug for AccountForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountForm")
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish_non_exhaustive()
    }
}

impl AccountForm {
    fn validate(&self, mode: AuthMode) -> Result<(), StorefrontError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(StorefrontError::MissingRequiredFields);
        }
        if mode == AuthMode::SignUp {
            if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
                return Err(StorefrontError::MissingName);
            }
            if self.password != self.confirm_password {
                return Err(StorefrontError::PasswordMismatch);
            }
        }
        Ok(())
    }
}

/// Sign-in status
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    /// No session
    #[default]
    SignedOut,
    /// Credentials accepted, waiting for the simulated delay
    Authenticating,
    /// Signed in; the caller redirects home
    SignedIn {
        /// Account email
        email: String,
    },
}

/// State of the account page
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountState {
    /// Login or sign-up
    pub mode: AuthMode,
    /// Form contents
    pub form: AccountForm,
    /// Session status
    pub status: SessionStatus,
    /// Last validation failure
    pub last_error: Option<StorefrontError>,
    /// Last message for the user
    pub last_notice: Option<Notice>,
}

impl AccountState {
    /// Whether the user is signed in
    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        matches!(self.status, SessionStatus::SignedIn { .. })
    }
}

/// Inputs to the account flow
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountAction {
    /// Switch between login and sign-up; clears the form
    ModeToggled,
    /// A field was edited
    FieldChanged {
        /// Which field
        field: AccountField,
        /// New value
        value: String,
    },
    /// Form submitted
    Submit,
    /// Simulated authentication finished
    Authenticated {
        /// Account email
        email: String,
    },
}

/// Dependencies of the account flow
#[derive(Clone, Debug)]
pub struct AccountEnvironment {
    /// Simulated authentication latency
    pub auth_delay: Duration,
}

impl AccountEnvironment {
    /// Default simulated authentication latency
    pub const DEFAULT_AUTH_DELAY: Duration = Duration::from_secs(2);

    /// Creates an environment with the given latency
    #[must_use]
    pub const fn new(auth_delay: Duration) -> Self {
        Self { auth_delay }
    }

    /// Creates an environment using the latency from `config`
    #[must_use]
    pub const fn from_config(config: &StorefrontConfig) -> Self {
        Self::new(config.auth_delay)
    }
}

impl Default for AccountEnvironment {
    fn default() -> Self {
        Self::new(Self::DEFAULT_AUTH_DELAY)
    }
}

/// Reducer for the account flow
#[derive(Clone, Debug, Default)]
pub struct AccountReducer;

impl AccountReducer {
    /// Creates a new `AccountReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for AccountReducer {
    type State = AccountState;
    type Action = AccountAction;
    type Environment = AccountEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            AccountAction::ModeToggled => {
                if state.status == SessionStatus::SignedOut {
                    state.mode = state.mode.toggled();
                    state.form = AccountForm::default();
                    state.last_error = None;
                }
                SmallVec::new()
            },

            AccountAction::FieldChanged { field, value } => {
                if state.status != SessionStatus::SignedOut {
                    return SmallVec::new();
                }
                let slot = match field {
                    AccountField::Email => &mut state.form.email,
                    AccountField::Password => &mut state.form.password,
                    AccountField::FirstName => &mut state.form.first_name,
                    AccountField::LastName => &mut state.form.last_name,
                    AccountField::ConfirmPassword => &mut state.form.confirm_password,
                };
                *slot = value;
                SmallVec::new()
            },

            AccountAction::Submit => {
                if state.status != SessionStatus::SignedOut {
                    return SmallVec::new();
                }
                if let Err(error) = state.form.validate(state.mode) {
                    tracing::warn!(error = %error, mode = ?state.mode, "Account validation failed");
                    state.last_notice = Some(Notice::from(&error));
                    state.last_error = Some(error);
                    return SmallVec::new();
                }

                state.last_error = None;
                state.last_notice = Some(match state.mode {
                    AuthMode::Login => Notice::success(
                        "Login Successful!",
                        "Welcome back! Redirecting to events...",
                    ),
                    AuthMode::SignUp => Notice::success(
                        "Account Created!",
                        "Your account has been created successfully.",
                    ),
                });
                state.status = SessionStatus::Authenticating;

                smallvec![delay! {
                    duration: env.auth_delay,
                    action: AccountAction::Authenticated { email: state.form.email.clone() }
                }]
            },

            AccountAction::Authenticated { email } => {
                if state.status == SessionStatus::Authenticating {
                    tracing::info!(%email, mode = ?state.mode, "Signed in");
                    state.form.password.clear();
                    state.form.confirm_password.clear();
                    state.status = SessionStatus::SignedIn { email };
                }
                SmallVec::new()
            },
        }
    }
}
