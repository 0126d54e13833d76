use crate::{
    config::locale::LocaleConfig,
    error::{AdminResult, BadEnvVarSnafu, CannotBeABaseSnafu, ParseApiUrlSnafu, ParseTimeoutSnafu},
};
use dotenvy::var;
use secrecy::SecretString;
use snafu::{ResultExt, ensure};
use std::{sync::Arc, time::Duration};
use url::Url;

pub mod locale;

#[derive(Clone, Debug)]
pub struct RuntimeConfiguration {
    api_config: Arc<ApiConfig>,
    admin_credentials: Arc<AdminCredentials>,
    locale_config: Arc<LocaleConfig>,
}

impl RuntimeConfiguration {
    pub fn new() -> AdminResult<Self> {
        Ok(Self::from_parts(
            ApiConfig::new()?,
            AdminCredentials::new()?,
            LocaleConfig::new(var("ADMIN_LOCALE").unwrap_or_else(|_| "pt-BR".to_string()))?,
        ))
    }

    pub fn from_parts(
        api_config: ApiConfig,
        admin_credentials: AdminCredentials,
        locale_config: LocaleConfig,
    ) -> Self {
        Self {
            api_config: Arc::new(api_config),
            admin_credentials: Arc::new(admin_credentials),
            locale_config: Arc::new(locale_config),
        }
    }

    pub fn api_config(&self) -> Arc<ApiConfig> {
        self.api_config.clone()
    }

    pub fn admin_credentials(&self) -> Arc<AdminCredentials> {
        self.admin_credentials.clone()
    }

    pub fn locale_config(&self) -> Arc<LocaleConfig> {
        self.locale_config.clone()
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    base_url: Url,
    timeout: Duration,
}

impl ApiConfig {
    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

    pub fn new() -> AdminResult<Self> {
        let base_url = var("ALUNOS_API_URL").context(BadEnvVarSnafu {
            name: "ALUNOS_API_URL",
        })?;
        let timeout = match var("ALUNOS_API_TIMEOUT_SECS") {
            Ok(secs) => secs.parse().context(ParseTimeoutSnafu)?,
            Err(_) => Self::DEFAULT_TIMEOUT_SECS,
        };

        Self::from_parts(&base_url, Duration::from_secs(timeout))
    }

    pub fn from_parts(base_url: &str, timeout: Duration) -> AdminResult<Self> {
        let parsed = Url::parse(base_url).context(ParseApiUrlSnafu {
            original: base_url,
        })?;
        ensure!(
            !parsed.cannot_be_a_base(),
            CannotBeABaseSnafu { original: base_url }
        );

        Ok(Self {
            base_url: parsed,
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[derive(Debug)]
pub struct AdminCredentials {
    pub email: String,
    pub bcrypt_hashed_password: SecretString,
}

impl AdminCredentials {
    pub fn new() -> AdminResult<Self> {
        let get_env_var = |name| var(name).context(BadEnvVarSnafu { name });

        Ok(Self {
            email: get_env_var("ADMIN_EMAIL")?,
            bcrypt_hashed_password: SecretString::from(get_env_var("ADMIN_PASSWORD_HASH")?),
        })
    }
}
