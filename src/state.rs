use crate::{
    auth::AdminSession,
    config::RuntimeConfiguration,
    error::AdminResult,
    maud_conveniences::render_nav,
    service::{AlunoService, HttpAlunoService},
};
use maud::{DOCTYPE, Markup, html};
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct AdminState {
    service: Arc<dyn AlunoService>,
    config: RuntimeConfiguration,
}

impl AdminState {
    pub fn new(config: RuntimeConfiguration) -> AdminResult<Self> {
        let service = HttpAlunoService::new(&config.api_config())?;
        Ok(Self::with_service(config, Arc::new(service)))
    }

    pub fn with_service(config: RuntimeConfiguration, service: Arc<dyn AlunoService>) -> Self {
        Self { service, config }
    }

    #[allow(clippy::unused_self)] //in case self is ever needed :), and to allow direct html! usage
    pub fn render(&self, auth_session: &AdminSession, markup: Markup) -> Markup {
        let nav = render_nav(auth_session.user.as_ref());

        html! {
            (DOCTYPE)
            html lang="pt-BR" {
                head {
                    meta charset="UTF-8" {}
                    meta name="viewport" content="width=device-width, initial-scale=1.0" {}
                    script src="https://unpkg.com/htmx.org@2.0.4" integrity="sha384-HGfztofotfshcF7+8n44JQL2oJmowVChPTg48S+jvZoztPfvwD79OC/LTtG6dMp+" crossorigin="anonymous" {}
                    script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4" {}
                    title { "Modalidades" }
                }
                body class="bg-gray-900 min-h-screen flex flex-col items-center text-white" {
                    (nav)
                    (markup)
                }
            }
        }
    }

    pub fn service(&self) -> &dyn AlunoService {
        self.service.as_ref()
    }

    pub const fn config(&self) -> &RuntimeConfiguration {
        &self.config
    }
}
