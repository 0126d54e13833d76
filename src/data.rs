use serde::Deserialize;

pub mod aluno;

#[derive(Deserialize)]
pub struct IdForm {
    pub id: aluno::AlunoId,
}

/// The `{ data: ... }` wrapper every alunos API response comes in.
#[derive(Deserialize, Debug)]
pub struct DataEnvelope<T> {
    pub data: Option<T>,
}
