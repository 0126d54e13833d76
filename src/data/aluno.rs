use maud::{Markup, Render, html};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

const PLACEHOLDER_PREFIX: &str = "local-";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AlunoId(String);

impl AlunoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Key for a record that only exists on this side, built from the time it was added.
    pub fn placeholder(unix_millis: i64) -> Self {
        Self::new(format!("{PLACEHOLDER_PREFIX}{unix_millis}"))
    }

    pub fn is_placeholder(&self) -> bool {
        self.0.starts_with(PLACEHOLDER_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AlunoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for AlunoId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        //the api isn't consistent about whether ids are numbers or strings
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => Self::new(s),
            RawId::Number(n) => Self::new(n.to_string()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Ativo,
    Inativo,
}

impl Status {
    pub const fn rank(self) -> u8 {
        match self {
            Self::Ativo => 1,
            Self::Inativo => 2,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Ativo" => Some(Self::Ativo),
            "Inativo" => Some(Self::Inativo),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ativo => "Ativo",
            Self::Inativo => "Inativo",
        }
    }
}

impl Render for Status {
    fn render(&self) -> Markup {
        let colour = match self {
            Self::Ativo => "text-green-500",
            Self::Inativo => "text-red-500",
        };
        html! {
            span {
                span class={"mr-1 " (colour)} {"●"}
                (self.as_str())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plano {
    Mensal,
    Semestral,
    Anual,
}

impl Plano {
    pub const ALL: [Self; 3] = [Self::Mensal, Self::Semestral, Self::Anual];

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == s.trim())
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mensal => "mensal",
            Self::Semestral => "semestral",
            Self::Anual => "anual",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Mensal => "Mensal",
            Self::Semestral => "Semestral",
            Self::Anual => "Anual",
        }
    }
}

/// A student as the alunos API stores them.
///
/// Only `id` is mandatory on the wire. Older records use English field names, which are accepted
/// as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aluno {
    pub id: AlunoId,
    #[serde(default, alias = "name")]
    pub nome: String,
    #[serde(default)]
    pub cpf: String,
    #[serde(default)]
    pub rg: String,
    #[serde(default)]
    pub cep: String,
    #[serde(default)]
    pub rua: String,
    #[serde(default)]
    pub numero: String,
    #[serde(default)]
    pub bairro: String,
    #[serde(default)]
    pub cidade: String,
    #[serde(default)]
    pub estado: String,

    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "dob")]
    pub data_nascimento: Option<String>,
    #[serde(default)]
    pub contato1: Option<String>,
    #[serde(default)]
    pub contato2: Option<String>,
    #[serde(default, alias = "plan")]
    pub plano: Option<Plano>,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default, alias = "modalities")]
    pub modalidades: Vec<String>,
    #[serde(default, alias = "observation")]
    pub observacao: Option<String>,
    #[serde(default, alias = "totalValue")]
    pub valor_total: Option<String>,
    #[serde(default, alias = "startDate")]
    pub data_inicio: Option<String>,
    #[serde(default, alias = "address")]
    pub endereco: Option<String>,
}

impl Aluno {
    pub fn blank(id: AlunoId) -> Self {
        Self {
            id,
            nome: String::new(),
            cpf: String::new(),
            rg: String::new(),
            cep: String::new(),
            rua: String::new(),
            numero: String::new(),
            bairro: String::new(),
            cidade: String::new(),
            estado: String::new(),
            email: None,
            data_nascimento: None,
            contato1: None,
            contato2: None,
            plano: None,
            status: None,
            modalidades: vec![],
            observacao: None,
            valor_total: None,
            data_inicio: None,
            endereco: None,
        }
    }

    /// Street, number, neighbourhood, city and state on one line, falling back to the free-text
    /// address older records carry.
    pub fn full_address(&self) -> String {
        let parts = [&self.rua, &self.numero, &self.bairro, &self.cidade, &self.estado];
        let joined = parts
            .into_iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        if joined.is_empty() {
            self.endereco.clone().unwrap_or_default()
        } else {
            joined
        }
    }
}

impl Render for Aluno {
    fn render(&self) -> Markup {
        html! {
            (self.nome)
        }
    }
}
