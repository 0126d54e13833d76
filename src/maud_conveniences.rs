use crate::{auth::AdminUser, routes::other_screens::OtherScreen};
use maud::{Markup, Render, html};

pub const INPUT_CLASSES: &str = "shadow appearance-none border rounded w-full py-2 px-3 leading-tight focus:outline-none focus:shadow-outline bg-gray-700 border-gray-600";

pub fn render_table<const N: usize>(
    id: &'static str,
    titles: [&'static str; N],
    items: Vec<[Markup; N]>,
) -> Markup {
    html! {
        div id=(id) class="overflow-x-auto" {
            table class="min-w-full bg-gray-800 rounded shadow-md" {
                thead class="bg-gray-700" {
                    tr {
                        @for title in titles {
                            th class="py-2 px-4 text-left font-semibold text-gray-300" {(title)}
                        }
                    }
                }
                tbody {
                    @for row in items {
                        tr {
                            @for col in row {
                                td class="py-2 px-4 border-b border-gray-600 text-gray-200" {(col)}
                            }
                        }
                    }
                }
            }
        }
    }
}

pub fn title(s: impl Render) -> Markup {
    html! {
        h1 class="text-2xl font-semibold mb-4" {(s)}
    }
}

pub fn subtitle(s: impl Render) -> Markup {
    html! {
        h2 class="text-xl font-semibold mb-2" {(s)}
    }
}

pub fn form_element(id: &'static str, label: &'static str, element: Markup) -> Markup {
    html! {
        div class="mb-4" {
            label for=(id) class="block text-sm font-bold mb-2 text-gray-300" {(label)}
            (element)
        }
    }
}

pub fn simple_form_element(
    id: &'static str,
    label: &'static str,
    required: bool,
    input_type: Option<&'static str>,
    value: Option<&str>,
) -> Markup {
    form_element(
        id,
        label,
        html! {
            input required[required] type=(input_type.unwrap_or("text")) id=(id) name=(id) value=[value] class=(INPUT_CLASSES) {}
        },
    )
}

pub fn form_submit_button(text: Option<&'static str>) -> Markup {
    html! {
        div class="flex items-center justify-between" {
            button type="submit" class="bg-blue-500 hover:bg-blue-700 font-bold py-2 px-4 rounded focus:outline-none focus:shadow-outline" {
                (text.unwrap_or("Enviar"))
            }
        }
    }
}

pub fn detail_line(label: &'static str, value: impl Render) -> Markup {
    html! {
        p class="text-gray-200 font-semibold" {
            (label) ": "
            span class="font-medium" {(value)}
        }
    }
}

/// Drawer of every screen, only shown once someone is logged in.
pub fn render_nav(user: Option<&AdminUser>) -> Markup {
    html! {
        @if let Some(user) = user {
            nav class="w-full bg-gray-800 shadow-md mb-8 px-4 py-2 flex flex-row items-center justify-between" {
                div class="flex flex-row flex-wrap space-x-4" {
                    a href="/main" class="hover:text-gray-300 font-semibold" {"Alunos"}
                    @for screen in OtherScreen::ALL {
                        a href=(screen.path()) class="hover:text-gray-300" {(screen.title())}
                    }
                }
                form method="post" action="/logout" class="flex flex-row items-center space-x-2" {
                    span class="text-gray-400 text-sm" {(user.email)}
                    button type="submit" class="bg-slate-600 hover:bg-slate-800 py-1 px-3 rounded" {"Sair"}
                }
            }
        }
    }
}
