use async_trait::async_trait;
use reqwest::StatusCode;

use crate::application::ports::book_client::{BookClient, BookClientError};
use crate::domain::books::book::Book;

const BOOKS_ROOT_API: &str = "/books/";

pub struct ReqwestBookClient {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestBookClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn book_url(&self, isbn: &str) -> String {
        format!(
            "{}{}{}",
            self.base_url,
            BOOKS_ROOT_API,
            urlencoding::encode(isbn)
        )
    }
}

#[async_trait]
impl BookClient for ReqwestBookClient {
    async fn get_book_by_isbn(&self, isbn: &str) -> Result<Option<Book>, BookClientError> {
        let url = self.book_url(isbn);
        tracing::debug!(%url, "catalog_lookup");
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BookClientError::Transport(e.to_string()))?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(BookClientError::Status(resp.status().as_u16()));
        }
        let book = resp
            .json::<Book>()
            .await
            .map_err(|e| BookClientError::Decode(e.to_string()))?;
        Ok(Some(book))
    }

    async fn ping(&self) -> Result<(), BookClientError> {
        self.client
            .get(&self.base_url)
            .send()
            .await
            .map_err(|e| BookClientError::Transport(e.to_string()))?;
        Ok(())
    }
}
