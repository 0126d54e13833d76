use crate::{
    config::locale::LocaleConfig,
    data::aluno::{Aluno, AlunoId, Plano},
    maud_conveniences::{INPUT_CLASSES, detail_line, render_table, subtitle, title},
    screen::{AlunosScreen, EditTarget, Modal, SortKey},
    validation::{AlunoDraft, DraftField, MODALIDADES, RULES, ValidationErrors},
};
use maud::{Markup, html};
use serde_json::json;

pub const SCREEN_ID: &str = "alunos_screen";
pub const TABLE_ID: &str = "alunos_table";
pub const SORT_ID: &str = "alunos_sort";

fn id_vals(id: &AlunoId) -> String {
    json!({ "id": id.as_str() }).to_string()
}

fn or_na(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => "N/A",
    }
}

pub fn render_screen(screen: &AlunosScreen, locale: &LocaleConfig) -> Markup {
    html! {
        div id=(SCREEN_ID) hx-target={"#" (SCREEN_ID)} hx-swap="outerHTML" class="container mx-auto flex flex-col space-y-4" {
            (toolbar(screen))

            @if screen.is_loading_list() {
                div hx-get="/internal/alunos/list" hx-trigger="load" class="text-center text-gray-400 py-8" {
                    "Carregando..."
                }
            } @else {
                (table(screen))
            }

            @match screen.modal() {
                Modal::Closed => {}
                Modal::Editing { target, draft, errors } => {
                    (edit_modal(target, draft, errors))
                }
                Modal::Viewing(aluno) => {
                    (view_modal(aluno, locale))
                }
            }
        }
    }
}

fn toolbar(screen: &AlunosScreen) -> Markup {
    html! {
        div class="flex flex-row items-center space-x-4" {
            button class="bg-black hover:bg-gray-700 font-bold py-2 px-4 rounded" hx-get="/internal/alunos/add" {
                "+ Adicionar Aluno"
            }
            input type="search" name="search" placeholder="Buscar por nome" value=(screen.search_text())
                hx-post="/internal/alunos/search" hx-trigger="input changed delay:300ms, search"
                hx-target={"#" (TABLE_ID)} hx-select={"#" (TABLE_ID)} hx-select-oob={"#" (SORT_ID)}
                class={(INPUT_CLASSES) " max-w-xs"} {}
            select id=(SORT_ID) name="sort_key" hx-post="/internal/alunos/sort" hx-trigger="change" class={(INPUT_CLASSES) " max-w-xs"} {
                option value="" disabled selected[screen.sort_key().is_none()] {"Ordenar por..."}
                @for key in SortKey::ALL {
                    option value=(key.as_str()) selected[screen.sort_key() == Some(key)] {(key.label())}
                }
            }
        }
    }
}

fn table(screen: &AlunosScreen) -> Markup {
    let rows = screen
        .displayed()
        .iter()
        .map(|aluno| {
            let vals = id_vals(&aluno.id);

            [
                html! { (aluno) },
                html! {
                    @if let Some(status) = aluno.status {
                        (status)
                    } @else {
                        span class="text-gray-500" {"-"}
                    }
                },
                html! {
                    @for modalidade in &aluno.modalidades {
                        span class="inline-block bg-gray-600 rounded px-2 mr-1 text-sm" {(modalidade)}
                    }
                },
                html! { (aluno.cidade) },
                //the row stays disabled while its request is in flight
                html! {
                    div class="flex flex-row items-center space-x-2" {
                        button class="border border-green-500 text-green-500 py-1 px-2 rounded" hx-get="/internal/alunos/view" hx-vals=(vals) hx-disabled-elt="this" hx-indicator="closest div" {
                            "Ver Detalhes"
                        }
                        button class="bg-slate-600 hover:bg-slate-800 py-1 px-2 rounded" hx-get="/internal/alunos/edit" hx-vals=(vals) hx-disabled-elt="this" hx-indicator="closest div" {
                            "Editar"
                        }
                        button class="bg-red-600 hover:bg-red-800 py-1 px-2 rounded" hx-delete="/internal/alunos" hx-vals=(vals) hx-disabled-elt="this" hx-indicator="closest div" {
                            "Excluir"
                        }
                        span class="htmx-indicator text-gray-400 text-sm" {"Carregando..."}
                    }
                },
            ]
        })
        .collect();

    render_table(
        TABLE_ID,
        ["Nome", "Status", "Modalidades", "Cidade", "Ações"],
        rows,
    )
}

fn modal_frame(content: Markup) -> Markup {
    html! {
        div class="fixed inset-0 bg-black/60 flex items-center justify-center z-10" {
            div class="bg-gray-800 p-8 rounded shadow-md max-w-2xl w-full max-h-screen overflow-y-auto" {
                (content)
            }
        }
    }
}

fn draft_input(field: DraftField, value: &str) -> Markup {
    let name = field.input_name();
    let required = RULES
        .iter()
        .any(|rule| rule.field == field && rule.required.is_some());

    match field {
        DraftField::Status => html! {
            select id=(name) name=(name) class=(INPUT_CLASSES) {
                option value="" selected[value.is_empty()] {"-"}
                @for status in ["Ativo", "Inativo"] {
                    option value=(status) selected[value == status] {(status)}
                }
            }
        },
        DraftField::Plano => html! {
            select id=(name) name=(name) class=(INPUT_CLASSES) {
                option value="" selected[value.is_empty()] {"-"}
                @for plano in Plano::ALL {
                    option value=(plano.as_str()) selected[value == plano.as_str()] {(plano.label())}
                }
            }
        },
        DraftField::DataNascimento | DraftField::DataInicio => html! {
            input type="date" id=(name) name=(name) value=(value) class=(INPUT_CLASSES) {}
        },
        DraftField::Observacao => html! {
            textarea id=(name) name=(name) rows="4" class=(INPUT_CLASSES) {(value)}
        },
        DraftField::ValorTotal => html! {
            input type="text" id=(name) name=(name) value=(value) placeholder="R$ 0,00" class=(INPUT_CLASSES) {}
        },
        _ => html! {
            input type="text" id=(name) name=(name) value=(value) required[required] class=(INPUT_CLASSES) {}
        },
    }
}

fn edit_modal(target: &EditTarget, draft: &AlunoDraft, errors: &ValidationErrors) -> Markup {
    modal_frame(html! {
        @match target {
            EditTarget::New => {
                (title("Adicionar Aluno"))
            }
            EditTarget::Existing(_) => {
                (title("Editar Aluno"))
            }
        }

        //validation is done server-side so the messages match the rule table
        form hx-post="/internal/alunos/submit" novalidate class="p-4" {
            @for field in DraftField::ALL {
                div class="mb-4" {
                    label for=(field.input_name()) class="block text-sm font-bold mb-2 text-gray-300" {(field.label())}
                    (draft_input(field, draft.get(field)))
                    @if let Some(message) = errors.get(field) {
                        p class="text-red-400 text-sm mt-1" {(message)}
                    }
                }
            }

            fieldset class="mb-4" {
                legend class="block text-sm font-bold mb-2 text-gray-300" {"Modalidades"}
                @for modalidade in MODALIDADES {
                    label class="inline-flex items-center mr-4" {
                        input type="checkbox" name="modalidades" value=(modalidade) checked[draft.modalidades.iter().any(|m| m == modalidade)] class="mr-1" {}
                        (modalidade)
                    }
                }
            }

            div class="flex items-center justify-end space-x-4" {
                button type="button" hx-post="/internal/alunos/cancel" class="bg-gray-600 hover:bg-gray-700 py-2 px-4 rounded" {
                    "Cancelar"
                }
                button type="submit" class="bg-blue-500 hover:bg-blue-700 font-bold py-2 px-4 rounded" {
                    "Salvar"
                }
            }
        }
    })
}

fn view_modal(aluno: &Aluno, locale: &LocaleConfig) -> Markup {
    let date = |raw: &Option<String>| {
        raw.as_deref()
            .map_or_else(|| "N/A".to_string(), |d| locale.display_date(d))
    };

    modal_frame(html! {
        (title("Detalhes do Aluno"))
        div class="py-2" {
            (detail_line("Nome", &aluno.nome))
            (detail_line("Email", or_na(aluno.email.as_deref())))
            (detail_line("Data de Nascimento", date(&aluno.data_nascimento)))
            (detail_line("Contato 1", or_na(aluno.contato1.as_deref())))
            (detail_line("Contato 2", or_na(aluno.contato2.as_deref())))
            (detail_line("CPF", &aluno.cpf))
            (detail_line("RG", &aluno.rg))
            (detail_line("Status", aluno.status.map_or("N/A", |s| s.as_str())))
        }
        div class="py-2" {
            (subtitle("Endereço"))
            (detail_line("Endereço", or_na(Some(aluno.full_address().as_str()))))
            (detail_line("CEP", or_na(Some(aluno.cep.as_str()))))
        }
        div class="py-2" {
            (subtitle("Matrícula"))
            (detail_line("Modalidades", or_na(Some(aluno.modalidades.join(", ").as_str()))))
            (detail_line("Plano de Pagamento", aluno.plano.map_or("N/A", Plano::label)))
            (detail_line("Valor total para o período", or_na(aluno.valor_total.as_deref())))
            (detail_line("Data de início", date(&aluno.data_inicio)))
            (detail_line("Observação", or_na(aluno.observacao.as_deref())))
        }
        div class="flex justify-end" {
            button hx-post="/internal/alunos/cancel" class="bg-gray-600 hover:bg-gray-700 py-2 px-4 rounded" {
                "Fechar"
            }
        }
    })
}
