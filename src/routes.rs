pub mod alunos;
pub mod login;
pub mod other_screens;
