use crate::data::aluno::{Aluno, Plano, Status};
use email_address::EmailAddress;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{str::FromStr, sync::LazyLock};

/// Form-side copy of an [`Aluno`], kept as raw strings until it validates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlunoDraft {
    pub nome: String,
    pub cpf: String,
    pub rg: String,
    pub cep: String,
    pub rua: String,
    pub numero: String,
    pub bairro: String,
    pub cidade: String,
    pub estado: String,
    pub email: String,
    pub contato1: String,
    pub contato2: String,
    pub status: String,
    pub plano: String,
    pub data_nascimento: String,
    pub data_inicio: String,
    pub valor_total: String,
    pub observacao: String,
    pub modalidades: Vec<String>,
}

/// Activities offered on the form.
pub const MODALIDADES: [&str; 3] = ["kung fu", "xadrez", "hapkido"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DraftField {
    Nome,
    Cpf,
    Rg,
    Cep,
    Rua,
    Numero,
    Bairro,
    Cidade,
    Estado,
    Email,
    Contato1,
    Contato2,
    Status,
    Plano,
    DataNascimento,
    DataInicio,
    ValorTotal,
    Observacao,
}

impl DraftField {
    pub const ALL: [Self; 18] = [
        Self::Nome,
        Self::Cpf,
        Self::Rg,
        Self::Cep,
        Self::Rua,
        Self::Numero,
        Self::Bairro,
        Self::Cidade,
        Self::Estado,
        Self::Email,
        Self::Contato1,
        Self::Contato2,
        Self::Status,
        Self::Plano,
        Self::DataNascimento,
        Self::DataInicio,
        Self::ValorTotal,
        Self::Observacao,
    ];

    /// The `name` of the form input, matching the [`AlunoDraft`] field.
    pub const fn input_name(self) -> &'static str {
        match self {
            Self::Nome => "nome",
            Self::Cpf => "cpf",
            Self::Rg => "rg",
            Self::Cep => "cep",
            Self::Rua => "rua",
            Self::Numero => "numero",
            Self::Bairro => "bairro",
            Self::Cidade => "cidade",
            Self::Estado => "estado",
            Self::Email => "email",
            Self::Contato1 => "contato1",
            Self::Contato2 => "contato2",
            Self::Status => "status",
            Self::Plano => "plano",
            Self::DataNascimento => "data_nascimento",
            Self::DataInicio => "data_inicio",
            Self::ValorTotal => "valor_total",
            Self::Observacao => "observacao",
        }
    }

    pub fn from_input_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.input_name() == name)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Nome => "Nome",
            Self::Cpf => "CPF",
            Self::Rg => "RG",
            Self::Cep => "CEP",
            Self::Rua => "Rua",
            Self::Numero => "Número",
            Self::Bairro => "Bairro",
            Self::Cidade => "Cidade",
            Self::Estado => "Estado",
            Self::Email => "Email",
            Self::Contato1 => "Contato 1",
            Self::Contato2 => "Contato 2",
            Self::Status => "Status",
            Self::Plano => "Plano de Pagamento",
            Self::DataNascimento => "Data de Nascimento",
            Self::DataInicio => "Data de início",
            Self::ValorTotal => "Valor total para o período",
            Self::Observacao => "Observação",
        }
    }
}

impl AlunoDraft {
    pub fn get(&self, field: DraftField) -> &str {
        match field {
            DraftField::Nome => &self.nome,
            DraftField::Cpf => &self.cpf,
            DraftField::Rg => &self.rg,
            DraftField::Cep => &self.cep,
            DraftField::Rua => &self.rua,
            DraftField::Numero => &self.numero,
            DraftField::Bairro => &self.bairro,
            DraftField::Cidade => &self.cidade,
            DraftField::Estado => &self.estado,
            DraftField::Email => &self.email,
            DraftField::Contato1 => &self.contato1,
            DraftField::Contato2 => &self.contato2,
            DraftField::Status => &self.status,
            DraftField::Plano => &self.plano,
            DraftField::DataNascimento => &self.data_nascimento,
            DraftField::DataInicio => &self.data_inicio,
            DraftField::ValorTotal => &self.valor_total,
            DraftField::Observacao => &self.observacao,
        }
    }

    fn get_mut(&mut self, field: DraftField) -> &mut String {
        match field {
            DraftField::Nome => &mut self.nome,
            DraftField::Cpf => &mut self.cpf,
            DraftField::Rg => &mut self.rg,
            DraftField::Cep => &mut self.cep,
            DraftField::Rua => &mut self.rua,
            DraftField::Numero => &mut self.numero,
            DraftField::Bairro => &mut self.bairro,
            DraftField::Cidade => &mut self.cidade,
            DraftField::Estado => &mut self.estado,
            DraftField::Email => &mut self.email,
            DraftField::Contato1 => &mut self.contato1,
            DraftField::Contato2 => &mut self.contato2,
            DraftField::Status => &mut self.status,
            DraftField::Plano => &mut self.plano,
            DraftField::DataNascimento => &mut self.data_nascimento,
            DraftField::DataInicio => &mut self.data_inicio,
            DraftField::ValorTotal => &mut self.valor_total,
            DraftField::Observacao => &mut self.observacao,
        }
    }

    /// Writes the draft over `aluno`, leaving anything the form doesn't cover (id, free-text
    /// address) alone. Only meant for drafts that passed [`validate`].
    pub fn apply_to(&self, aluno: &mut Aluno) {
        let optional = |s: &str| {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };

        aluno.nome = self.nome.trim().to_string();
        aluno.cpf = self.cpf.trim().to_string();
        aluno.rg = self.rg.trim().to_string();
        aluno.cep = self.cep.trim().to_string();
        aluno.rua = self.rua.trim().to_string();
        aluno.numero = self.numero.trim().to_string();
        aluno.bairro = self.bairro.trim().to_string();
        aluno.cidade = self.cidade.trim().to_string();
        aluno.estado = self.estado.trim().to_string();
        aluno.email = optional(&self.email);
        aluno.contato1 = optional(&self.contato1);
        aluno.contato2 = optional(&self.contato2);
        aluno.status = Status::parse(&self.status);
        aluno.plano = Plano::parse(&self.plano);
        aluno.data_nascimento = optional(&self.data_nascimento);
        aluno.data_inicio = optional(&self.data_inicio);
        aluno.valor_total = optional(&self.valor_total);
        aluno.observacao = optional(&self.observacao);
        aluno.modalidades.clone_from(&self.modalidades);
    }
}

/// Builds a draft from raw form pairs. Checkbox groups repeat their key, which a plain struct
/// extractor can't take.
impl FromIterator<(String, String)> for AlunoDraft {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut draft = Self::default();
        for (name, value) in pairs {
            if name == "modalidades" {
                if !draft.modalidades.contains(&value) {
                    draft.modalidades.push(value);
                }
            } else if let Some(field) = DraftField::from_input_name(&name) {
                *draft.get_mut(field) = value;
            }
        }
        draft
    }
}

impl From<&Aluno> for AlunoDraft {
    fn from(aluno: &Aluno) -> Self {
        let or_empty = |s: &Option<String>| s.clone().unwrap_or_default();

        Self {
            nome: aluno.nome.clone(),
            cpf: aluno.cpf.clone(),
            rg: aluno.rg.clone(),
            cep: aluno.cep.clone(),
            rua: aluno.rua.clone(),
            numero: aluno.numero.clone(),
            bairro: aluno.bairro.clone(),
            cidade: aluno.cidade.clone(),
            estado: aluno.estado.clone(),
            email: or_empty(&aluno.email),
            contato1: or_empty(&aluno.contato1),
            contato2: or_empty(&aluno.contato2),
            status: aluno.status.map(Status::as_str).unwrap_or_default().to_string(),
            plano: aluno.plano.map(Plano::as_str).unwrap_or_default().to_string(),
            data_nascimento: or_empty(&aluno.data_nascimento),
            data_inicio: or_empty(&aluno.data_inicio),
            valor_total: or_empty(&aluno.valor_total),
            observacao: or_empty(&aluno.observacao),
            modalidades: aluno.modalidades.clone(),
        }
    }
}

pub enum Check {
    Pattern(Regex),
    Email,
    IsoDate,
    OneOf(&'static [&'static str]),
}

impl Check {
    fn passes(&self, value: &str) -> bool {
        match self {
            Self::Pattern(regex) => regex.is_match(value),
            Self::Email => EmailAddress::from_str(value).is_ok(),
            Self::IsoDate => value.parse::<jiff::civil::Date>().is_ok(),
            Self::OneOf(allowed) => allowed.contains(&value),
        }
    }
}

pub struct FieldRule {
    pub field: DraftField,
    /// Message shown when the field is empty, `None` for optional fields.
    pub required: Option<&'static str>,
    /// Checked only when the field is non-empty.
    pub check: Option<(Check, &'static str)>,
}

impl FieldRule {
    const fn required(field: DraftField, message: &'static str) -> Self {
        Self {
            field,
            required: Some(message),
            check: None,
        }
    }

    fn error_for(&self, value: &str) -> Option<&'static str> {
        let value = value.trim();
        if value.is_empty() {
            return self.required;
        }

        match &self.check {
            Some((check, message)) if !check.passes(value) => Some(*message),
            _ => None,
        }
    }
}

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static validation regex failed to compile")
}

pub static RULES: LazyLock<Vec<FieldRule>> = LazyLock::new(|| {
    const CONTACT: &str = "O contato deve conter apenas números";
    const DATE: &str = "Data inválida";

    vec![
        FieldRule::required(DraftField::Nome, "Nome é obrigatório"),
        FieldRule {
            field: DraftField::Cpf,
            required: Some("CPF é obrigatório"),
            check: Some((
                Check::Pattern(regex(r"^([0-9]{3}\.[0-9]{3}\.[0-9]{3}-[0-9]{2}|[0-9]{11})$")),
                "CPF deve ser válido, no formato 123.456.789-00 ou apenas números",
            )),
        },
        FieldRule {
            field: DraftField::Rg,
            required: Some("RG é obrigatório"),
            check: Some((
                Check::Pattern(regex(r"^[0-9]{7,11}$")),
                "RG deve conter entre 7 a 11 números",
            )),
        },
        FieldRule::required(DraftField::Cep, "CEP é obrigatório"),
        FieldRule::required(DraftField::Rua, "Rua é obrigatória"),
        FieldRule::required(DraftField::Numero, "Número é obrigatório"),
        FieldRule::required(DraftField::Bairro, "Bairro é obrigatório"),
        FieldRule::required(DraftField::Cidade, "Cidade é obrigatória"),
        FieldRule::required(DraftField::Estado, "Estado é obrigatório"),
        FieldRule {
            field: DraftField::Email,
            required: None,
            check: Some((Check::Email, "Email deve ser válido")),
        },
        FieldRule {
            field: DraftField::Contato1,
            required: None,
            check: Some((Check::Pattern(regex(r"^[0-9]+$")), CONTACT)),
        },
        FieldRule {
            field: DraftField::Contato2,
            required: None,
            check: Some((Check::Pattern(regex(r"^[0-9]+$")), CONTACT)),
        },
        FieldRule {
            field: DraftField::Status,
            required: None,
            check: Some((
                Check::OneOf(&["Ativo", "Inativo"]),
                "Status deve ser Ativo ou Inativo",
            )),
        },
        FieldRule {
            field: DraftField::Plano,
            required: None,
            check: Some((
                Check::OneOf(&["mensal", "semestral", "anual"]),
                "Plano deve ser mensal, semestral ou anual",
            )),
        },
        FieldRule {
            field: DraftField::DataNascimento,
            required: None,
            check: Some((Check::IsoDate, DATE)),
        },
        FieldRule {
            field: DraftField::DataInicio,
            required: None,
            check: Some((Check::IsoDate, DATE)),
        },
    ]
});

/// Per-field messages from a failed validation, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors(Vec<(DraftField, String)>);

impl ValidationErrors {
    pub fn get(&self, field: DraftField) -> Option<&str> {
        self.0
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, message)| message.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

pub fn validate(draft: &AlunoDraft) -> Result<(), ValidationErrors> {
    let errors: Vec<_> = RULES
        .iter()
        .filter_map(|rule| {
            rule.error_for(draft.get(rule.field))
                .map(|message| (rule.field, message.to_string()))
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}
