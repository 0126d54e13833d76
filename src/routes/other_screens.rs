use crate::{auth::AdminSession, maud_conveniences::title, state::AdminState};
use axum::{
    body::Body,
    http::Response,
    response::{IntoResponse, Redirect},
};
use maud::html;

/// The club's other screens. They share the student screen's shell, but their contents aren't
/// built yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtherScreen {
    AulasExperimentais,
    Mensalidades,
    Modalidades,
    Pagamentos,
    Relatorios,
    UserPermissoes,
}

impl OtherScreen {
    pub const ALL: [Self; 6] = [
        Self::AulasExperimentais,
        Self::Mensalidades,
        Self::Modalidades,
        Self::Pagamentos,
        Self::Relatorios,
        Self::UserPermissoes,
    ];

    pub const fn path(self) -> &'static str {
        match self {
            Self::AulasExperimentais => "/aulasexperimentais",
            Self::Mensalidades => "/mensalidades",
            Self::Modalidades => "/modalidades",
            Self::Pagamentos => "/pagamentos",
            Self::Relatorios => "/relatorios",
            Self::UserPermissoes => "/userpermissoes",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::AulasExperimentais => "Aulas Experimentais",
            Self::Mensalidades => "Mensalidades",
            Self::Modalidades => "Modalidades",
            Self::Pagamentos => "Pagamentos",
            Self::Relatorios => "Relatórios",
            Self::UserPermissoes => "Usuários e Permissões",
        }
    }
}

pub async fn get_other_screen(
    state: AdminState,
    session: AdminSession,
    screen: OtherScreen,
) -> Response<Body> {
    if session.user.is_none() {
        return Redirect::to(&format!("/login?next={}", screen.path())).into_response();
    }

    state.render(&session, html! {
        div class="bg-gray-800 p-8 rounded shadow-md max-w-4xl w-full" {
            (title(screen.title()))
            p class="text-gray-400" {"Em construção."}
        }
    }).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn paths_are_unique_and_absolute() {
        let paths: HashSet<_> = OtherScreen::ALL.iter().map(|s| s.path()).collect();
        assert_eq!(paths.len(), OtherScreen::ALL.len());
        assert!(paths.iter().all(|p| p.starts_with('/')));
        assert!(!paths.contains("/main"));
    }
}
