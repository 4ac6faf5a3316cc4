use async_trait::async_trait;

use crate::domain::books::book::Book;

#[derive(thiserror::Error, Debug)]
pub enum BookClientError {
    #[error("catalog request failed: {0}")]
    Transport(String),
    #[error("catalog returned status {0}")]
    Status(u16),
    #[error("failed to decode catalog response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait BookClient: Send + Sync {
    /// Looks a book up in the catalog. `Ok(None)` means the catalog does not know the ISBN.
    async fn get_book_by_isbn(&self, isbn: &str) -> Result<Option<Book>, BookClientError>;

    /// Succeeds when the catalog answers at all, whatever the status code.
    async fn ping(&self) -> Result<(), BookClientError>;
}
