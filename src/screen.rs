//! The student list screen as a plain state container.
//!
//! Every user event is a method on [`AlunosScreen`] that moves it from one state to the next
//! without doing any IO; [`actions`] pairs those transitions with calls to the alunos API and
//! [`render`] turns a state into markup.

use crate::{
    data::aluno::{Aluno, AlunoId},
    error::{AdminResult, TowerSessionSnafu},
    validation::{AlunoDraft, ValidationErrors, validate},
};
use axum_login::tower_sessions::Session;
use icu::collator::CollatorBorrowed;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use std::cmp::Ordering;

pub mod actions;
pub mod render;

const SESSION_KEY: &str = "alunos_screen";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    Nome,
    Status,
    Cidade,
    Estado,
}

impl SortKey {
    pub const ALL: [Self; 4] = [Self::Nome, Self::Status, Self::Cidade, Self::Estado];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nome => "nome",
            Self::Status => "status",
            Self::Cidade => "cidade",
            Self::Estado => "estado",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == s)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Nome => "Ordenar por Nome",
            Self::Status => "Ordenar por Status",
            Self::Cidade => "Ordenar por Cidade",
            Self::Estado => "Ordenar por Estado",
        }
    }

    fn field(self, aluno: &Aluno) -> &str {
        match self {
            Self::Nome | Self::Status => &aluno.nome,
            Self::Cidade => &aluno.cidade,
            Self::Estado => &aluno.estado,
        }
    }

    fn compare(self, a: &Aluno, b: &Aluno, collator: &CollatorBorrowed<'_>) -> Ordering {
        match self {
            Self::Status => {
                //records without a status go last
                let rank = |aluno: &Aluno| aluno.status.map_or(u8::MAX, |s| s.rank());
                rank(a)
                    .cmp(&rank(b))
                    .then_with(|| collator.compare(&a.nome, &b.nome))
            }
            key => collator.compare(key.field(a), key.field(b)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditTarget {
    New,
    Existing(AlunoId),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Modal {
    Closed,
    Editing {
        target: EditTarget,
        draft: AlunoDraft,
        errors: ValidationErrors,
    },
    Viewing(Aluno),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Listing,
    Editing,
    Viewing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlunosScreen {
    /// Last list the API handed back, plus anything added or edited here since.
    fetched: Vec<Aluno>,
    displayed: Vec<Aluno>,
    search_text: String,
    sort_key: Option<SortKey>,
    modal: Modal,
    loading_list: bool,
}

impl Default for AlunosScreen {
    fn default() -> Self {
        Self::mounted()
    }
}

impl AlunosScreen {
    /// A freshly mounted screen, waiting on its first list fetch.
    pub const fn mounted() -> Self {
        Self {
            fetched: vec![],
            displayed: vec![],
            search_text: String::new(),
            sort_key: None,
            modal: Modal::Closed,
            loading_list: true,
        }
    }

    pub fn phase(&self) -> Phase {
        match &self.modal {
            Modal::Editing { .. } => Phase::Editing,
            Modal::Viewing(_) => Phase::Viewing,
            Modal::Closed if self.loading_list => Phase::Loading,
            Modal::Closed => Phase::Listing,
        }
    }

    pub fn displayed(&self) -> &[Aluno] {
        &self.displayed
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub const fn sort_key(&self) -> Option<SortKey> {
        self.sort_key
    }

    pub const fn modal(&self) -> &Modal {
        &self.modal
    }

    pub const fn is_loading_list(&self) -> bool {
        self.loading_list
    }

    pub fn find(&self, id: &AlunoId) -> Option<&Aluno> {
        self.fetched.iter().find(|a| &a.id == id)
    }

    pub fn begin_list_load(&mut self) {
        self.loading_list = true;
    }

    /// Replaces the cached list with a fresh one from the API, keeping the current search.
    pub fn list_loaded(&mut self, alunos: Vec<Aluno>) {
        self.fetched = alunos;
        self.loading_list = false;
        self.apply_search();
    }

    pub fn list_load_failed(&mut self) {
        self.loading_list = false;
    }

    /// Filters the cached list by name, ignoring case. Ordering goes back to the API's.
    pub fn search(&mut self, text: &str) {
        text.clone_into(&mut self.search_text);
        self.apply_search();
    }

    fn apply_search(&mut self) {
        let needle = self.search_text.to_lowercase();
        self.displayed = self
            .fetched
            .iter()
            .filter(|a| a.nome.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        self.sort_key = None;
    }

    pub fn sort(&mut self, key: SortKey, collator: &CollatorBorrowed<'_>) {
        self.sort_key = Some(key);
        self.displayed.sort_by(|a, b| key.compare(a, b, collator));
    }

    pub fn open_add(&mut self) {
        self.modal = Modal::Editing {
            target: EditTarget::New,
            draft: AlunoDraft::default(),
            errors: ValidationErrors::default(),
        };
    }

    pub fn open_edit(&mut self, aluno: &Aluno) {
        self.modal = Modal::Editing {
            target: EditTarget::Existing(aluno.id.clone()),
            draft: AlunoDraft::from(aluno),
            errors: ValidationErrors::default(),
        };
    }

    pub fn open_view(&mut self, aluno: Aluno) {
        self.modal = Modal::Viewing(aluno);
    }

    pub fn cancel(&mut self) {
        self.modal = Modal::Closed;
    }

    /// Validates `draft` and merges it into the cached lists. Nothing is sent to the API.
    ///
    /// On failure the modal stays open with the entered values and the errors. Submitting while no
    /// edit modal is open does nothing.
    pub fn submit(&mut self, draft: AlunoDraft, now_millis: i64) -> Result<(), ValidationErrors> {
        let Modal::Editing { target, .. } = &self.modal else {
            return Ok(());
        };
        let target = target.clone();

        if let Err(errors) = validate(&draft) {
            self.modal = Modal::Editing {
                target,
                draft,
                errors: errors.clone(),
            };
            return Err(errors);
        }

        match target {
            EditTarget::Existing(id) => {
                for list in [&mut self.fetched, &mut self.displayed] {
                    if let Some(aluno) = list.iter_mut().find(|a| a.id == id) {
                        draft.apply_to(aluno);
                    }
                }
            }
            EditTarget::New => {
                let mut aluno = Aluno::blank(AlunoId::placeholder(now_millis));
                draft.apply_to(&mut aluno);
                self.fetched.push(aluno.clone());
                self.displayed.push(aluno);
            }
        }

        self.modal = Modal::Closed;
        Ok(())
    }

    /// Drops a record that was only ever added here.
    pub fn remove_local(&mut self, id: &AlunoId) {
        self.fetched.retain(|a| &a.id != id);
        self.displayed.retain(|a| &a.id != id);
        if matches!(&self.modal, Modal::Viewing(a) if &a.id == id)
            || matches!(&self.modal, Modal::Editing { target: EditTarget::Existing(t), .. } if t == id)
        {
            self.modal = Modal::Closed;
        }
    }

    pub async fn load_from(session: &Session) -> AdminResult<Self> {
        Ok(session
            .get(SESSION_KEY)
            .await
            .context(TowerSessionSnafu)?
            .unwrap_or_default())
    }

    pub async fn save_to(&self, session: &Session) -> AdminResult<()> {
        session
            .insert(SESSION_KEY, self)
            .await
            .context(TowerSessionSnafu)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::{config::locale::LocaleConfig, data::aluno::Status, validation::DraftField};

    pub fn aluno(id: &str, nome: &str, status: Option<Status>) -> Aluno {
        let mut aluno = Aluno::blank(AlunoId::new(id));
        aluno.nome = nome.to_string();
        aluno.status = status;
        aluno
    }

    pub fn locale() -> LocaleConfig {
        LocaleConfig::new("pt-BR".to_string()).unwrap()
    }

    pub fn collator() -> CollatorBorrowed<'static> {
        locale().collator().unwrap()
    }

    fn listing(alunos: Vec<Aluno>) -> AlunosScreen {
        let mut screen = AlunosScreen::mounted();
        screen.list_loaded(alunos);
        screen
    }

    fn names(screen: &AlunosScreen) -> Vec<&str> {
        screen.displayed().iter().map(|a| a.nome.as_str()).collect()
    }

    fn complete_draft(nome: &str) -> AlunoDraft {
        AlunoDraft {
            nome: nome.into(),
            cpf: "12345678900".into(),
            rg: "1234567".into(),
            cep: "01000-000".into(),
            rua: "Rua Augusta".into(),
            numero: "5".into(),
            bairro: "Consolação".into(),
            cidade: "São Paulo".into(),
            estado: "SP".into(),
            ..AlunoDraft::default()
        }
    }

    #[test]
    fn mounting_starts_loading() {
        let screen = AlunosScreen::mounted();
        assert_eq!(screen.phase(), Phase::Loading);

        let screen = listing(vec![aluno("1", "Ana", None), aluno("2", "Bia", None)]);
        assert_eq!(screen.phase(), Phase::Listing);
        assert_eq!(screen.displayed().len(), 2);
        assert!(!screen.is_loading_list());
    }

    #[test]
    fn status_sort_puts_active_first_then_names() {
        let mut screen = listing(vec![
            aluno("1", "Zeca", Some(Status::Inativo)),
            aluno("2", "Bruna", Some(Status::Ativo)),
            aluno("3", "Ana", Some(Status::Inativo)),
            aluno("4", "Álvaro", Some(Status::Ativo)),
            aluno("5", "Carlos", None),
        ]);
        screen.sort(SortKey::Status, &collator());

        assert_eq!(names(&screen), ["Álvaro", "Bruna", "Ana", "Zeca", "Carlos"]);
        let statuses: Vec<_> = screen.displayed().iter().map(|a| a.status).collect();
        let first_inactive = statuses
            .iter()
            .position(|s| *s == Some(Status::Inativo))
            .unwrap();
        assert!(statuses[..first_inactive]
            .iter()
            .all(|s| *s == Some(Status::Ativo)));
    }

    #[test]
    fn field_sorts_are_locale_aware() {
        let mut screen = listing(vec![
            aluno("1", "bruno", None),
            aluno("2", "Érica", None),
            aluno("3", "Ana", None),
        ]);
        screen.sort(SortKey::Nome, &collator());
        assert_eq!(names(&screen), ["Ana", "bruno", "Érica"]);
        assert_eq!(screen.sort_key(), Some(SortKey::Nome));
    }

    #[test]
    fn empty_search_is_identity() {
        let alunos = vec![aluno("1", "Ana", None), aluno("2", "Bia", None)];
        let mut screen = listing(alunos.clone());
        screen.search("");
        assert_eq!(screen.displayed(), alunos.as_slice());
    }

    #[test]
    fn search_is_case_insensitive_and_idempotent() {
        let mut screen = listing(vec![
            aluno("1", "Mariana", None),
            aluno("2", "Pedro", None),
            aluno("3", "Ana Maria", None),
        ]);

        screen.search("MARI");
        let once = screen.displayed().to_vec();
        screen.search("MARI");
        assert_eq!(screen.displayed(), once.as_slice());
        assert_eq!(names(&screen), ["Mariana", "Ana Maria"]);

        //narrowing then widening works because search always starts from the full list
        screen.search("mariana");
        screen.search("");
        assert_eq!(screen.displayed().len(), 3);
    }

    #[test]
    fn search_resets_the_sort() {
        let mut screen = listing(vec![aluno("1", "Bia", None), aluno("2", "Ana", None)]);
        screen.sort(SortKey::Nome, &collator());
        screen.search("");
        assert_eq!(screen.sort_key(), None);
        assert_eq!(names(&screen), ["Bia", "Ana"]);
    }

    #[test]
    fn submitting_a_blank_name_keeps_the_modal_open() {
        let mut screen = listing(vec![]);
        screen.open_add();

        let mut draft = complete_draft("");
        draft.cidade = "Campinas".into();
        let errors = screen.submit(draft, 1).unwrap_err();

        assert_eq!(errors.get(DraftField::Nome), Some("Nome é obrigatório"));
        assert_eq!(screen.phase(), Phase::Editing);
        let Modal::Editing { draft, errors, .. } = screen.modal() else {
            panic!("modal closed");
        };
        assert_eq!(draft.cidade, "Campinas");
        assert_eq!(errors.get(DraftField::Nome), Some("Nome é obrigatório"));
        assert!(screen.displayed().is_empty());
    }

    #[test]
    fn adding_appends_a_placeholder_record() {
        let mut screen = listing(vec![aluno("1", "Ana", None)]);
        screen.open_add();
        screen.submit(complete_draft("Novo"), 1_700_000_000_000).unwrap();

        assert_eq!(screen.phase(), Phase::Listing);
        assert_eq!(names(&screen), ["Ana", "Novo"]);
        let added = &screen.displayed()[1];
        assert!(added.id.is_placeholder());
        assert_eq!(added.id, AlunoId::placeholder(1_700_000_000_000));

        //local additions survive a search
        screen.search("nov");
        assert_eq!(names(&screen), ["Novo"]);
    }

    #[test]
    fn editing_replaces_the_matching_record() {
        let mut screen = listing(vec![aluno("1", "Ana", None), aluno("2", "Bia", None)]);
        let bia = screen.find(&AlunoId::new("2")).unwrap().clone();
        screen.open_edit(&bia);
        screen.submit(complete_draft("Beatriz"), 5).unwrap();

        assert_eq!(names(&screen), ["Ana", "Beatriz"]);
        assert_eq!(screen.displayed()[1].id, AlunoId::new("2"));
        assert_eq!(screen.find(&AlunoId::new("2")).unwrap().cidade, "São Paulo");
    }

    #[test]
    fn cancel_discards_the_draft() {
        let mut screen = listing(vec![aluno("1", "Ana", None)]);
        screen.open_add();
        screen.cancel();
        assert_eq!(screen.phase(), Phase::Listing);
        assert_eq!(screen.modal(), &Modal::Closed);

        screen.open_view(aluno("1", "Ana", None));
        assert_eq!(screen.phase(), Phase::Viewing);
        screen.cancel();
        assert_eq!(screen.phase(), Phase::Listing);
    }

    #[test]
    fn submit_without_modal_is_ignored() {
        let mut screen = listing(vec![]);
        assert_eq!(screen.submit(AlunoDraft::default(), 1), Ok(()));
        assert!(screen.displayed().is_empty());
    }

    #[test]
    fn reload_keeps_search_text() {
        let mut screen = listing(vec![aluno("1", "Ana", None), aluno("2", "Bia", None)]);
        screen.search("bi");
        screen.begin_list_load();
        assert_eq!(screen.phase(), Phase::Loading);
        screen.list_loaded(vec![aluno("2", "Bia", None), aluno("3", "Bianca", None)]);
        assert_eq!(names(&screen), ["Bia", "Bianca"]);
    }

    #[test]
    fn screen_survives_serialisation() {
        let mut screen = listing(vec![aluno("1", "Ana", Some(Status::Ativo))]);
        screen.open_add();
        let _ = screen.submit(AlunoDraft::default(), 1);

        let json = serde_json::to_value(&screen).unwrap();
        let back: AlunosScreen = serde_json::from_value(json).unwrap();
        assert_eq!(back, screen);
    }
}
