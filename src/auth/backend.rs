use crate::{
    auth::AdminUser,
    config::AdminCredentials,
    error::{AdminError, BcryptSnafu},
};
use async_trait::async_trait;
use axum_login::{AuthnBackend, UserId};
use secrecy::{ExposeSecret, SecretString};
use snafu::ResultExt;
use std::sync::Arc;

#[derive(Clone)]
pub struct AdminAuthBackend {
    credentials: Arc<AdminCredentials>,
}

impl AdminAuthBackend {
    pub const fn new(credentials: Arc<AdminCredentials>) -> Self {
        Self { credentials }
    }

    fn admin(&self) -> AdminUser {
        AdminUser::new(
            self.credentials.email.clone(),
            self.credentials.bcrypt_hashed_password.clone(),
        )
    }
}

pub enum AdminAuthCredentials {
    EmailPassword {
        email: String,
        password: SecretString,
    },
}

#[async_trait]
impl AuthnBackend for AdminAuthBackend {
    type User = AdminUser;
    type Credentials = AdminAuthCredentials;
    type Error = AdminError;

    async fn authenticate(
        &self,
        creds: Self::Credentials,
    ) -> Result<Option<Self::User>, Self::Error> {
        match creds {
            AdminAuthCredentials::EmailPassword { email, password } => {
                if !email.trim().eq_ignore_ascii_case(&self.credentials.email) {
                    return Ok(None);
                }

                let hash = self.credentials.bcrypt_hashed_password.clone();
                let password_verification_result = tokio::task::spawn_blocking(move || {
                    bcrypt::verify(password.expose_secret(), hash.expose_secret())
                })
                .await
                .expect("unable to join tokio task")
                .context(BcryptSnafu)?;

                Ok(if password_verification_result {
                    Some(self.admin())
                } else {
                    None
                })
            }
        }
    }

    async fn get_user(&self, user_id: &UserId<Self>) -> Result<Option<Self::User>, Self::Error> {
        Ok((user_id == &self.credentials.email).then(|| self.admin()))
    }
}
