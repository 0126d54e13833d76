use crate::{
    auth::{AdminSession, AuthUtilities},
    data::IdForm,
    error::AdminResult,
    maud_conveniences::title,
    screen::{AlunosScreen, SortKey, actions, render::render_screen},
    state::AdminState,
    validation::AlunoDraft,
};
use axum::{
    Form,
    body::Body,
    extract::{Query, State},
    http::Response,
    response::{IntoResponse, Redirect},
};
use axum_login::tower_sessions::Session;
use maud::{Markup, html};
use serde::Deserialize;

async fn finish(state: &AdminState, session: &Session, screen: &AlunosScreen) -> AdminResult<Markup> {
    screen.save_to(session).await?;
    debug!(phase = ?screen.phase(), rows = screen.displayed().len(), "rendering alunos screen");
    Ok(render_screen(screen, &state.config().locale_config()))
}

async fn current_screen(auth_session: &AdminSession, session: &Session) -> AdminResult<AlunosScreen> {
    auth_session.ensure_logged_in()?;
    AlunosScreen::load_from(session).await
}

/// Mounts a fresh screen; the list itself arrives through [`internal_get_list`].
pub async fn get_main(
    State(state): State<AdminState>,
    auth_session: AdminSession,
    session: Session,
) -> AdminResult<Response<Body>> {
    if auth_session.user.is_none() {
        return Ok(Redirect::to("/login?next=/main").into_response());
    }

    let screen = AlunosScreen::mounted();
    let rendered = finish(&state, &session, &screen).await?;

    Ok(state.render(&auth_session, html! {
        div class="bg-gray-800 p-8 rounded shadow-md max-w-6xl w-full" {
            (title("Alunos"))
            (rendered)
        }
    }).into_response())
}

pub async fn internal_get_list(
    State(state): State<AdminState>,
    auth_session: AdminSession,
    session: Session,
) -> AdminResult<Markup> {
    let mut screen = current_screen(&auth_session, &session).await?;
    actions::refresh(&mut screen, state.service()).await;
    finish(&state, &session, &screen).await
}

pub async fn internal_get_add(
    State(state): State<AdminState>,
    auth_session: AdminSession,
    session: Session,
) -> AdminResult<Markup> {
    let mut screen = current_screen(&auth_session, &session).await?;
    screen.open_add();
    finish(&state, &session, &screen).await
}

pub async fn internal_get_edit(
    State(state): State<AdminState>,
    auth_session: AdminSession,
    session: Session,
    Query(IdForm { id }): Query<IdForm>,
) -> AdminResult<Markup> {
    let mut screen = current_screen(&auth_session, &session).await?;
    actions::edit(&mut screen, state.service(), id).await;
    finish(&state, &session, &screen).await
}

pub async fn internal_get_view(
    State(state): State<AdminState>,
    auth_session: AdminSession,
    session: Session,
    Query(IdForm { id }): Query<IdForm>,
) -> AdminResult<Markup> {
    let mut screen = current_screen(&auth_session, &session).await?;
    actions::view(&mut screen, state.service(), id).await;
    finish(&state, &session, &screen).await
}

pub async fn delete_aluno(
    State(state): State<AdminState>,
    auth_session: AdminSession,
    session: Session,
    Query(IdForm { id }): Query<IdForm>,
) -> AdminResult<Markup> {
    let mut screen = current_screen(&auth_session, &session).await?;
    actions::delete(&mut screen, state.service(), id).await;
    finish(&state, &session, &screen).await
}

#[derive(Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    search: String,
}

pub async fn internal_post_search(
    State(state): State<AdminState>,
    auth_session: AdminSession,
    session: Session,
    Form(SearchForm { search }): Form<SearchForm>,
) -> AdminResult<Markup> {
    let mut screen = current_screen(&auth_session, &session).await?;
    screen.search(&search);
    finish(&state, &session, &screen).await
}

#[derive(Deserialize)]
pub struct SortForm {
    sort_key: String,
}

pub async fn internal_post_sort(
    State(state): State<AdminState>,
    auth_session: AdminSession,
    session: Session,
    Form(SortForm { sort_key }): Form<SortForm>,
) -> AdminResult<Markup> {
    let mut screen = current_screen(&auth_session, &session).await?;
    match SortKey::parse(&sort_key) {
        Some(key) => {
            let collator = state.config().locale_config().collator()?;
            screen.sort(key, &collator);
        }
        None => warn!(?sort_key, "ignoring unknown sort key"),
    }
    finish(&state, &session, &screen).await
}

pub async fn internal_post_submit(
    State(state): State<AdminState>,
    auth_session: AdminSession,
    session: Session,
    Form(pairs): Form<Vec<(String, String)>>,
) -> AdminResult<Markup> {
    let mut screen = current_screen(&auth_session, &session).await?;
    let draft: AlunoDraft = pairs.into_iter().collect();
    match screen.submit(draft, jiff::Timestamp::now().as_millisecond()) {
        //TODO: persist through the API once it exposes create/update endpoints
        Ok(()) => debug!("aluno draft merged into the local list"),
        Err(errors) => debug!(count = errors.len(), "aluno draft failed validation"),
    }
    finish(&state, &session, &screen).await
}

pub async fn internal_post_cancel(
    State(state): State<AdminState>,
    auth_session: AdminSession,
    session: Session,
) -> AdminResult<Markup> {
    let mut screen = current_screen(&auth_session, &session).await?;
    screen.cancel();
    finish(&state, &session, &screen).await
}
