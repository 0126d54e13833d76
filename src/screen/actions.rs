use crate::{
    data::aluno::AlunoId,
    screen::AlunosScreen,
    service::AlunoService,
};

/// (Re)fetches the whole list. A failed fetch is logged and leaves the previous list on screen.
pub async fn refresh(screen: &mut AlunosScreen, service: &dyn AlunoService) {
    screen.begin_list_load();
    match service.list().await {
        Ok(alunos) => screen.list_loaded(alunos),
        Err(e) => {
            error!(?e, "unable to list alunos");
            screen.list_load_failed();
        }
    }
}

pub async fn edit(screen: &mut AlunosScreen, service: &dyn AlunoService, id: AlunoId) {
    if id.is_placeholder() {
        match screen.find(&id).cloned() {
            Some(aluno) => screen.open_edit(&aluno),
            None => warn!(%id, "tried to edit an unknown local aluno"),
        }
        return;
    }

    match service.get_by_id(&id).await {
        Ok(aluno) => screen.open_edit(&aluno),
        Err(e) => error!(?e, %id, "unable to fetch aluno for editing"),
    }
}

pub async fn view(screen: &mut AlunosScreen, service: &dyn AlunoService, id: AlunoId) {
    if id.is_placeholder() {
        match screen.find(&id).cloned() {
            Some(aluno) => screen.open_view(aluno),
            None => warn!(%id, "tried to view an unknown local aluno"),
        }
        return;
    }

    match service.get_by_id(&id).await {
        Ok(aluno) => screen.open_view(aluno),
        Err(e) => error!(?e, %id, "unable to fetch aluno details"),
    }
}

/// Deletes on the API and then re-fetches the list whatever happened, so the screen only ever
/// shows what the API has.
pub async fn delete(screen: &mut AlunosScreen, service: &dyn AlunoService, id: AlunoId) {
    if id.is_placeholder() {
        screen.remove_local(&id);
        return;
    }

    match service.remove_by_id(&id).await {
        Ok(status) => info!(%id, %status, "deleted aluno"),
        Err(e) => error!(?e, %id, "unable to delete aluno"),
    }
    screen.cancel();
    refresh(screen, service).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        screen::{
            Modal, Phase,
            tests::aluno,
        },
        service::fake::{Call, FakeAlunoService},
        validation::AlunoDraft,
    };

    #[tokio::test]
    async fn mount_shows_every_row() {
        let service =
            FakeAlunoService::with(vec![aluno("1", "Ana", None), aluno("2", "Bia", None)]);
        let mut screen = AlunosScreen::mounted();
        assert!(screen.is_loading_list());

        refresh(&mut screen, &service).await;

        assert_eq!(screen.displayed().len(), 2);
        assert!(!screen.is_loading_list());
        assert_eq!(service.calls(), [Call::List]);
    }

    #[tokio::test]
    async fn delete_removes_once_then_refetches() {
        let service =
            FakeAlunoService::with(vec![aluno("41", "Ana", None), aluno("42", "Bia", None)]);
        let mut screen = AlunosScreen::mounted();
        refresh(&mut screen, &service).await;

        delete(&mut screen, &service, AlunoId::new("42")).await;

        assert_eq!(
            service.calls(),
            [
                Call::List,
                Call::RemoveById(AlunoId::new("42")),
                Call::List
            ]
        );
        assert!(screen.find(&AlunoId::new("42")).is_none());
        assert_eq!(screen.displayed().len(), 1);
        assert_eq!(screen.phase(), Phase::Listing);
    }

    #[tokio::test]
    async fn failed_delete_still_refetches() {
        let service = FakeAlunoService::with(vec![aluno("1", "Ana", None)]);
        let mut screen = AlunosScreen::mounted();
        refresh(&mut screen, &service).await;

        delete(&mut screen, &service, AlunoId::new("999")).await;

        assert_eq!(
            service.calls(),
            [
                Call::List,
                Call::RemoveById(AlunoId::new("999")),
                Call::List
            ]
        );
        assert_eq!(screen.displayed().len(), 1);
    }

    #[tokio::test]
    async fn local_records_never_reach_the_api() {
        let service = FakeAlunoService::with(vec![]);
        let mut screen = AlunosScreen::mounted();
        refresh(&mut screen, &service).await;

        screen.open_add();
        screen
            .submit(
                AlunoDraft {
                    nome: "Novo".into(),
                    cpf: "12345678900".into(),
                    rg: "1234567".into(),
                    cep: "1".into(),
                    rua: "1".into(),
                    numero: "1".into(),
                    bairro: "1".into(),
                    cidade: "1".into(),
                    estado: "1".into(),
                    ..AlunoDraft::default()
                },
                99,
            )
            .unwrap();
        let local_id = AlunoId::placeholder(99);

        edit(&mut screen, &service, local_id.clone()).await;
        assert_eq!(screen.phase(), Phase::Editing);
        screen.cancel();

        delete(&mut screen, &service, local_id).await;
        assert!(screen.displayed().is_empty());
        assert_eq!(service.calls(), [Call::List]);
    }

    #[tokio::test]
    async fn edit_fetches_and_prefills() {
        let mut stored = aluno("7", "Carla", None);
        stored.cidade = "Natal".into();
        let service = FakeAlunoService::with(vec![stored]);
        let mut screen = AlunosScreen::mounted();

        edit(&mut screen, &service, AlunoId::new("7")).await;

        assert_eq!(service.calls(), [Call::GetById(AlunoId::new("7"))]);
        let Modal::Editing { draft, .. } = screen.modal() else {
            panic!("expected the edit modal");
        };
        assert_eq!(draft.nome, "Carla");
        assert_eq!(draft.cidade, "Natal");
    }

    #[tokio::test]
    async fn view_of_missing_record_stays_put() {
        let service = FakeAlunoService::with(vec![aluno("1", "Ana", None)]);
        let mut screen = AlunosScreen::mounted();
        refresh(&mut screen, &service).await;

        view(&mut screen, &service, AlunoId::new("404")).await;

        assert_eq!(screen.phase(), Phase::Listing);
    }

    #[tokio::test]
    async fn view_opens_details() {
        let service = FakeAlunoService::with(vec![aluno("1", "Ana", None)]);
        let mut screen = AlunosScreen::mounted();
        refresh(&mut screen, &service).await;

        view(&mut screen, &service, AlunoId::new("1")).await;
        assert_eq!(screen.phase(), Phase::Viewing);
    }

    #[tokio::test]
    async fn api_failures_are_swallowed() {
        let service = FakeAlunoService::failing();
        let mut screen = AlunosScreen::mounted();

        refresh(&mut screen, &service).await;
        assert!(!screen.is_loading_list());
        assert!(screen.displayed().is_empty());

        edit(&mut screen, &service, AlunoId::new("1")).await;
        assert_eq!(screen.phase(), Phase::Listing);
    }
}
