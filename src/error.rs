use crate::{auth::backend::AdminAuthBackend, data::aluno::AlunoId};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use maud::html;
use snafu::Snafu;
use std::num::ParseIntError;

pub type AdminResult<T> = Result<T, AdminError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum AdminError {
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Unable to parse API timeout"))]
    ParseTimeout { source: ParseIntError },
    #[snafu(display("Unable to parse API URL {:?}", original))]
    ParseApiUrl {
        source: url::ParseError,
        original: String,
    },
    #[snafu(display("API URL {:?} cannot be used as a base", original))]
    CannotBeABase { original: String },
    #[snafu(display("Invalid locale {:?}", provided))]
    InvalidLocale {
        source: icu::locale::ParseError,
        provided: String,
    },
    #[snafu(display("Unable to load collation data"))]
    LoadCollator { source: icu_provider::DataError },
    #[snafu(display("Unable to create date formatter"))]
    BadDateTimeFormatter {
        source: icu::datetime::DateTimeFormatterLoadError,
    },
    #[snafu(display("Unable to build HTTP client"))]
    BuildClient { source: reqwest::Error },
    #[snafu(display("Error talking to the alunos API at {}", url))]
    Transport { source: reqwest::Error, url: String },
    #[snafu(display("Alunos API answered {} for {}", status, url))]
    UnexpectedStatus { status: StatusCode, url: String },
    #[snafu(display("Unable to decode alunos API response from {}", url))]
    DecodeResponse { source: reqwest::Error, url: String },
    #[snafu(display("Unable to find aluno with ID: {}", id))]
    MissingAluno { id: AlunoId },
    #[snafu(display("Error with hashing/password verification"))]
    Bcrypt { source: bcrypt::BcryptError },
    #[snafu(display("Error with sessions"))]
    TowerSession {
        source: axum_login::tower_sessions::session::Error,
    },
    #[snafu(display("Not logged in"))]
    NotLoggedIn,
}

impl From<axum_login::Error<AdminAuthBackend>> for AdminError {
    fn from(value: axum_login::Error<AdminAuthBackend>) -> Self {
        match value {
            axum_login::Error::Session(source) => Self::TowerSession { source },
            axum_login::Error::Backend(backend) => backend,
        }
    }
}

impl AdminError {
    pub const fn status_code(&self) -> StatusCode {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR; //internal server error
        const NF: StatusCode = StatusCode::NOT_FOUND; //not found
        const BG: StatusCode = StatusCode::BAD_GATEWAY; //upstream api broke

        match self {
            Self::BadEnvVar { .. }
            | Self::ParseTimeout { .. }
            | Self::ParseApiUrl { .. }
            | Self::CannotBeABase { .. } => ISE,
            Self::InvalidLocale { .. }
            | Self::LoadCollator { .. }
            | Self::BadDateTimeFormatter { .. } => ISE,
            Self::BuildClient { .. } => ISE,
            Self::Transport { .. } | Self::UnexpectedStatus { .. } | Self::DecodeResponse { .. } => {
                BG
            }
            Self::MissingAluno { .. } => NF,
            Self::Bcrypt { .. } | Self::TowerSession { .. } => ISE,
            Self::NotLoggedIn => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let basic_error = |desc| {
            html! {
                div class="bg-red-100 border border-red-400 text-red-700 px-4 py-3 rounded relative mb-4" role="alert" {
                    strong class="font-bold" {"Erro: "}
                    span {(desc)}
                }
            }
        };

        let status_code = self.status_code();
        error!(?self, "Error!");
        (status_code, Html(basic_error(self.to_string()))).into_response()
    }
}
