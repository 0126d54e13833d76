use crate::{
    config::ApiConfig,
    data::{
        DataEnvelope,
        aluno::{Aluno, AlunoId},
    },
    error::{
        AdminError, AdminResult, BuildClientSnafu, DecodeResponseSnafu, MissingAlunoSnafu,
        TransportSnafu, UnexpectedStatusSnafu,
    },
};
use async_trait::async_trait;
use axum::http::StatusCode;
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use snafu::{OptionExt, ResultExt, ensure};
use std::fmt::Debug;
use url::Url;

/// The three calls the student screens make against the alunos API. Every call is a single round
/// trip; nothing is cached or retried.
#[async_trait]
pub trait AlunoService: Debug + Send + Sync {
    async fn list(&self) -> AdminResult<Vec<Aluno>>;
    async fn get_by_id(&self, id: &AlunoId) -> AdminResult<Aluno>;
    async fn remove_by_id(&self, id: &AlunoId) -> AdminResult<StatusCode>;
}

#[derive(Debug, Clone)]
pub struct HttpAlunoService {
    client: Client,
    base_url: Url,
}

impl HttpAlunoService {
    pub fn new(config: &ApiConfig) -> AdminResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .context(BuildClientSnafu)?;

        Ok(Self {
            client,
            base_url: config.base_url().clone(),
        })
    }

    fn url_for(&self, id: Option<&AlunoId>) -> Url {
        let mut url = self.base_url.clone();
        //only fails for cannot-be-a-base urls, which `ApiConfig` rejects
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("aluno");
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        url
    }

    async fn send(&self, method: Method, url: &Url) -> AdminResult<Response> {
        debug!(%method, %url, "calling alunos api");

        let response = self
            .client
            .request(method, url.clone())
            .send()
            .await
            .context(TransportSnafu {
                url: url.to_string(),
            })?;

        debug!(status = %response.status(), %url, "alunos api answered");
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response, url: &Url) -> AdminResult<Option<T>> {
        let status = response.status();
        ensure!(
            status.is_success(),
            UnexpectedStatusSnafu {
                status,
                url: url.to_string(),
            }
        );

        let envelope: DataEnvelope<T> = response.json().await.context(DecodeResponseSnafu {
            url: url.to_string(),
        })?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl AlunoService for HttpAlunoService {
    async fn list(&self) -> AdminResult<Vec<Aluno>> {
        let url = self.url_for(None);
        let response = self.send(Method::GET, &url).await?;
        let alunos: Vec<Aluno> = Self::decode(response, &url).await?.unwrap_or_default();

        info!(count = alunos.len(), "listed alunos");
        Ok(alunos)
    }

    async fn get_by_id(&self, id: &AlunoId) -> AdminResult<Aluno> {
        let url = self.url_for(Some(id));
        let response = self.send(Method::GET, &url).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(AdminError::MissingAluno { id: id.clone() });
        }

        Self::decode(response, &url)
            .await?
            .context(MissingAlunoSnafu { id: id.clone() })
    }

    async fn remove_by_id(&self, id: &AlunoId) -> AdminResult<StatusCode> {
        let url = self.url_for(Some(id));
        let response = self.send(Method::DELETE, &url).await?;
        let status = response.status();
        ensure!(
            status.is_success(),
            UnexpectedStatusSnafu {
                status,
                url: url.to_string(),
            }
        );

        info!(%id, %status, "removed aluno");
        Ok(status)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        extract::Path,
        response::{IntoResponse, Response as AxumResponse},
        routing::get,
    };
    use serde_json::json;
    use std::time::Duration;
    use tokio::net::TcpListener;

    async fn stub_get_one(Path(id): Path<String>) -> AxumResponse {
        match id.as_str() {
            "1" => Json(json!({"data": {"id": 1, "nome": "Ana", "cidade": "Recife"}})).into_response(),
            "empty" => Json(json!({"data": null})).into_response(),
            "boom" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
            _ => StatusCode::NOT_FOUND.into_response(),
        }
    }

    async fn stub_delete_one(Path(id): Path<String>) -> StatusCode {
        if id == "42" {
            StatusCode::OK
        } else {
            StatusCode::NOT_FOUND
        }
    }

    async fn spawn_stub(prefix: &str) -> String {
        let alunos = Router::new()
            .route(
                "/aluno",
                get(|| async {
                    Json(json!({"data": [{"id": 1, "nome": "Ana"}, {"id": "2", "name": "Bruno"}]}))
                }),
            )
            .route("/aluno/{id}", get(stub_get_one).delete(stub_delete_one));
        let app = if prefix.is_empty() {
            alunos
        } else {
            Router::new().nest(prefix, alunos)
        };

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{addr}{prefix}")
    }

    fn service_for(base: &str) -> HttpAlunoService {
        HttpAlunoService::new(&ApiConfig::from_parts(base, Duration::from_secs(5)).unwrap())
            .unwrap()
    }

    #[tokio::test]
    async fn list_returns_every_record_in_order() {
        let service = service_for(&spawn_stub("").await);
        let alunos = service.list().await.unwrap();

        assert_eq!(alunos.len(), 2);
        assert_eq!(alunos[0].nome, "Ana");
        assert_eq!(alunos[1].id, AlunoId::new("2"));
        assert_eq!(alunos[1].nome, "Bruno");
    }

    #[tokio::test]
    async fn base_path_is_kept() {
        let service = service_for(&format!("{}/", spawn_stub("/api").await));
        assert_eq!(service.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn get_by_id_fetches_one_record() {
        let service = service_for(&spawn_stub("").await);
        let aluno = service.get_by_id(&AlunoId::new("1")).await.unwrap();
        assert_eq!(aluno.cidade, "Recife");
    }

    #[tokio::test]
    async fn missing_records_are_not_found() {
        let service = service_for(&spawn_stub("").await);

        let err = service.get_by_id(&AlunoId::new("999")).await.unwrap_err();
        assert!(matches!(err, AdminError::MissingAluno { .. }));

        let err = service.get_by_id(&AlunoId::new("empty")).await.unwrap_err();
        assert!(matches!(err, AdminError::MissingAluno { .. }));
    }

    #[tokio::test]
    async fn server_errors_are_unexpected_statuses() {
        let service = service_for(&spawn_stub("").await);
        let err = service.get_by_id(&AlunoId::new("boom")).await.unwrap_err();
        assert!(matches!(
            err,
            AdminError::UnexpectedStatus {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn remove_by_id_returns_the_status() {
        let service = service_for(&spawn_stub("").await);
        assert_eq!(
            service.remove_by_id(&AlunoId::new("42")).await.unwrap(),
            StatusCode::OK
        );
        assert!(service.remove_by_id(&AlunoId::new("43")).await.is_err());
    }

    #[tokio::test]
    async fn unreachable_api_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let service = service_for(&format!("http://{addr}"));
        let err = service.list().await.unwrap_err();
        assert!(matches!(err, AdminError::Transport { .. }));
    }
}
