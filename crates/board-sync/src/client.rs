//! REST client for the Trello API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::api::BoardApi;
use crate::config::Config;
use crate::error::{BoardApiError, ConfigError};
use crate::models::{Attachment, BoardList, Card, CommentAction};

/// Trello REST client authenticated with an API key and token.
#[derive(Clone)]
pub struct TrelloClient {
    client: reqwest::Client,
    api_url: String,
    key: String,
    token: String,
}

/// Credentials carried in the body of every write.
#[derive(Debug, Serialize)]
struct WriteBody<'a, T: Serialize> {
    key: &'a str,
    token: &'a str,
    #[serde(flatten)]
    fields: T,
}

#[derive(Debug, Serialize)]
struct AttachmentFields<'a> {
    url: &'a str,
}

#[derive(Debug, Serialize)]
struct CommentFields<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MoveFields<'a> {
    id_list: &'a str,
}

impl TrelloClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("board-sync/", env!("CARGO_PKG_VERSION"))),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_base().to_string(),
            key: config.api_key.clone(),
            token: config.api_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_url)
    }

    /// Execute an authenticated GET and decode the JSON body.
    async fn get_json<R: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<R, BoardApiError> {
        let url = self.url(path);

        let response = self
            .client
            .get(&url)
            .query(&[("key", self.key.as_str()), ("token", self.token.as_str())])
            .query(query)
            .send()
            .await
            .map_err(|source| BoardApiError::Transport {
                url: url.clone(),
                source,
            })?;

        let response = check_status(&url, response).await?;

        response
            .json()
            .await
            .map_err(|e| BoardApiError::Decode {
                url,
                message: e.to_string(),
            })
    }

    /// Execute an authenticated write; the response body is ignored.
    async fn write<T: Serialize>(
        &self,
        method: Method,
        path: &str,
        fields: T,
    ) -> Result<(), BoardApiError> {
        let url = self.url(path);
        let body = WriteBody {
            key: &self.key,
            token: &self.token,
            fields,
        };

        let response = self
            .client
            .request(method, &url)
            .json(&body)
            .send()
            .await
            .map_err(|source| BoardApiError::Transport {
                url: url.clone(),
                source,
            })?;

        check_status(&url, response).await?;
        Ok(())
    }
}

async fn check_status(
    url: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, BoardApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(BoardApiError::Status {
        url: url.to_string(),
        status,
        body,
    })
}

#[async_trait]
impl BoardApi for TrelloClient {
    #[instrument(skip(self))]
    async fn get_card(&self, board_id: &str, number: &str) -> Result<Card, BoardApiError> {
        let card: Card = self
            .get_json(&format!("/boards/{board_id}/cards/{number}"), &[])
            .await?;
        debug!(card_id = %card.id, "Retrieved card");
        Ok(card)
    }

    #[instrument(skip(self))]
    async fn get_lists(&self, board_id: &str) -> Result<Vec<BoardList>, BoardApiError> {
        self.get_json(&format!("/boards/{board_id}/lists"), &[])
            .await
    }

    #[instrument(skip(self))]
    async fn get_attachments(&self, card_id: &str) -> Result<Vec<Attachment>, BoardApiError> {
        self.get_json(&format!("/cards/{card_id}/attachments"), &[])
            .await
    }

    #[instrument(skip(self))]
    async fn get_comments(&self, card_id: &str) -> Result<Vec<CommentAction>, BoardApiError> {
        self.get_json(
            &format!("/cards/{card_id}/actions"),
            &[("filter", "commentCard")],
        )
        .await
    }

    #[instrument(skip(self))]
    async fn create_attachment(&self, card_id: &str, url: &str) -> Result<(), BoardApiError> {
        self.write(
            Method::POST,
            &format!("/cards/{card_id}/attachments"),
            AttachmentFields { url },
        )
        .await
    }

    #[instrument(skip(self, text))]
    async fn create_comment(&self, card_id: &str, text: &str) -> Result<(), BoardApiError> {
        self.write(
            Method::POST,
            &format!("/cards/{card_id}/actions/comments"),
            CommentFields { text },
        )
        .await
    }

    #[instrument(skip(self))]
    async fn move_card(&self, card_id: &str, list_id: &str) -> Result<(), BoardApiError> {
        self.write(
            Method::PUT,
            &format!("/cards/{card_id}"),
            MoveFields { id_list: list_id },
        )
        .await
    }
}
