use crate::{
    auth::backend::AdminAuthBackend,
    error::{AdminError, AdminResult},
};
use axum_login::{AuthSession, AuthUser};
use secrecy::{ExposeSecret, SecretString};

pub mod backend;
pub mod memory_store;

pub type AdminSession = AuthSession<AdminAuthBackend>;

/// The single administrator account, as configured in the environment.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub email: String,
    bcrypt_hashed_password: SecretString,
}

impl AdminUser {
    pub const fn new(email: String, bcrypt_hashed_password: SecretString) -> Self {
        Self {
            email,
            bcrypt_hashed_password,
        }
    }
}

impl AuthUser for AdminUser {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.email.clone()
    }

    //changing the configured password hash logs everyone out
    fn session_auth_hash(&self) -> &[u8] {
        self.bcrypt_hashed_password.expose_secret().as_bytes()
    }
}

pub trait AuthUtilities {
    fn ensure_logged_in(&self) -> AdminResult<&AdminUser>;
}

impl AuthUtilities for AdminSession {
    fn ensure_logged_in(&self) -> AdminResult<&AdminUser> {
        self.user.as_ref().ok_or(AdminError::NotLoggedIn)
    }
}
