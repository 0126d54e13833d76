use crate::{
    auth::{AdminSession, backend::AdminAuthCredentials},
    error::AdminResult,
    maud_conveniences::{form_submit_button, simple_form_element, title},
    state::AdminState,
};
use axum::{
    Form,
    body::Body,
    extract::{Query, State},
    http::Response,
    response::{IntoResponse, Redirect},
};
use maud::html;
use secrecy::SecretString;
use serde::Deserialize;
use url::form_urlencoded;

const DEFAULT_LANDING: &str = "/main";

/// Only allow local paths as post-login targets.
fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(next) if next.starts_with('/') && !next.starts_with("//") => next,
        _ => DEFAULT_LANDING,
    }
}

fn failed_login_redirect(next: Option<&str>) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair("login_failed", "true");
    if let Some(next) = next {
        query.append_pair("next", next);
    }
    format!("/login?{}", query.finish())
}

#[derive(Deserialize)]
pub struct LoginOptions {
    pub next: Option<String>,
    pub login_failed: Option<bool>,
}

pub async fn get_login(
    State(state): State<AdminState>,
    session: AdminSession,
    Query(LoginOptions { next, login_failed }): Query<LoginOptions>,
) -> Response<Body> {
    if session.user.is_some() {
        return Redirect::to(safe_next(next.as_deref())).into_response();
    }

    let login_failed = login_failed.unwrap_or(false);

    state.render(&session, html! {
        div class="bg-gray-800 shadow-md rounded px-8 pt-6 pb-8 my-auto w-full max-w-sm" {
            (title("Login"))
            @if login_failed {
                div role="alert" class="bg-red-100 border border-red-400 text-red-700 px-4 py-4 rounded relative" {
                    strong class="font-bold" {"Atenção!"}
                    br;
                    // avoid giving extra details for security reasons :)
                    span class="block sm:inline" {"Email ou senha incorretos"}
                }
                br;
            }

            form method="post" action="/login" {
                @if let Some(next) = next {
                    input type="hidden" name="next" value=(next) {}
                }
                (simple_form_element("email", "Email", true, Some("email"), None))
                (simple_form_element("password", "Senha", true, Some("password"), None))
                (form_submit_button(Some("Entrar")))
            }
        }
    }).into_response()
}

#[derive(Deserialize)]
pub struct LoginForm {
    email: String,
    password: SecretString,
    next: Option<String>,
}

pub async fn post_login(
    mut session: AdminSession,
    Form(LoginForm {
        email,
        password,
        next,
    }): Form<LoginForm>,
) -> AdminResult<Redirect> {
    match session
        .authenticate(AdminAuthCredentials::EmailPassword { email, password })
        .await?
    {
        Some(user) => {
            session.login(&user).await?;
            info!(email = %user.email, "logged in");
            Ok(Redirect::to(safe_next(next.as_deref())))
        }
        None => {
            warn!("failed login attempt");
            Ok(Redirect::to(&failed_login_redirect(next.as_deref())))
        }
    }
}

pub async fn post_logout(mut session: AdminSession) -> AdminResult<impl IntoResponse> {
    session.logout().await?;
    Ok(Redirect::to("/login"))
}
