use crate::application::ports::book_client::BookClient;
use crate::application::ports::order_repository::OrderRepository;
use crate::application::services::resilience::{CallPolicy, retry};
use crate::domain::books::book::Book;
use crate::domain::orders::order::{Order, build_accepted_order, build_rejected_order};

pub struct SubmitOrder<'a, B: BookClient + ?Sized, R: OrderRepository + ?Sized> {
    pub books: &'a B,
    pub repo: &'a R,
    pub policy: &'a CallPolicy,
}

impl<'a, B: BookClient + ?Sized, R: OrderRepository + ?Sized> SubmitOrder<'a, B, R> {
    pub async fn execute(&self, isbn: &str, quantity: i32) -> anyhow::Result<Order> {
        let order = match self.lookup_book(isbn).await {
            Some(book) => build_accepted_order(&book, quantity),
            None => build_rejected_order(isbn, quantity),
        };
        let saved = self.repo.save(&order).await?;
        tracing::info!(
            order_id = saved.id,
            isbn = %saved.book_isbn,
            status = %saved.status,
            quantity = saved.quantity,
            "order_submitted"
        );
        Ok(saved)
    }

    // Timeouts and unknown ISBNs resolve to no book; other failures are retried, then give up.
    async fn lookup_book(&self, isbn: &str) -> Option<Book> {
        let books = self.books;
        let timeout = self.policy.timeout;
        let outcome = retry(&self.policy.retry, || async move {
            match tokio::time::timeout(timeout, books.get_book_by_isbn(isbn)).await {
                Ok(res) => res,
                Err(_) => {
                    tracing::warn!(isbn, timeout_ms = timeout.as_millis() as u64, "catalog_lookup_timed_out");
                    Ok(None)
                }
            }
        })
        .await;
        match outcome {
            Ok(book) => book,
            Err(e) => {
                tracing::warn!(isbn, error = %e, "catalog_lookup_failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::book_client::BookClientError;
    use crate::application::services::resilience::RetryPolicy;
    use crate::domain::orders::order::{NewOrder, OrderStatus};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    enum Reply {
        Found,
        Missing,
        Fail,
        Hang,
    }

    struct ScriptedBooks {
        replies: Mutex<VecDeque<Reply>>,
        calls: AtomicU32,
    }

    impl ScriptedBooks {
        fn new(replies: Vec<Reply>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl BookClient for ScriptedBooks {
        async fn get_book_by_isbn(&self, isbn: &str) -> Result<Option<Book>, BookClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let reply = self.replies.lock().unwrap().pop_front().unwrap_or(Reply::Fail);
            match reply {
                Reply::Found => Ok(Some(Book {
                    isbn: isbn.to_string(),
                    title: "Northern Lights".into(),
                    author: "Lyra Silverstar".into(),
                    price: 9.90,
                })),
                Reply::Missing => Ok(None),
                Reply::Fail => Err(BookClientError::Status(503)),
                Reply::Hang => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok(None)
                }
            }
        }

        async fn ping(&self) -> Result<(), BookClientError> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct MemoryOrders {
        saved: Mutex<Vec<Order>>,
        fail_saves: bool,
        save_calls: AtomicU32,
    }

    #[async_trait]
    impl OrderRepository for MemoryOrders {
        async fn find_all(&self) -> anyhow::Result<Vec<Order>> {
            Ok(self.saved.lock().unwrap().clone())
        }

        async fn save(&self, order: &NewOrder) -> anyhow::Result<Order> {
            self.save_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_saves {
                anyhow::bail!("connection reset");
            }
            let mut saved = self.saved.lock().unwrap();
            let now = chrono::Utc::now();
            let order = Order {
                id: saved.len() as i64 + 1,
                book_isbn: order.book_isbn.clone(),
                book_name: order.book_name.clone(),
                book_price: order.book_price,
                quantity: order.quantity,
                status: order.status,
                created_date: now,
                last_modified_date: now,
                version: 1,
            };
            saved.push(order.clone());
            Ok(order)
        }

        async fn ping(&self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn policy() -> CallPolicy {
        CallPolicy {
            timeout: Duration::from_secs(3),
            retry: RetryPolicy::backoff(3, Duration::from_millis(100)),
        }
    }

    async fn submit(books: &ScriptedBooks, repo: &MemoryOrders) -> Order {
        let policy = policy();
        let uc = SubmitOrder {
            books,
            repo,
            policy: &policy,
        };
        uc.execute("1234567891", 2).await.unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn known_book_is_accepted() {
        let books = ScriptedBooks::new(vec![Reply::Found]);
        let repo = MemoryOrders::default();
        let order = submit(&books, &repo).await;
        assert_eq!(order.status, OrderStatus::Accepted);
        assert_eq!(order.book_name.as_deref(), Some("Northern Lights - Lyra Silverstar"));
        assert_eq!(order.book_price, Some(9.90));
        assert_eq!(order.quantity, 2);
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_book_is_rejected_without_retry() {
        let books = ScriptedBooks::new(vec![Reply::Missing]);
        let repo = MemoryOrders::default();
        let order = submit(&books, &repo).await;
        assert_eq!(order.status, OrderStatus::Rejected);
        assert_eq!(order.quantity, 0);
        assert_eq!(books.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_catalog_is_rejected() {
        let books = ScriptedBooks::new(vec![Reply::Hang]);
        let repo = MemoryOrders::default();
        let order = submit(&books, &repo).await;
        assert_eq!(order.status, OrderStatus::Rejected);
        assert_eq!(books.calls.load(Ordering::SeqCst), 1);
        assert_eq!(repo.find_all().await.unwrap(), vec![order]);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failure_is_retried() {
        let books = ScriptedBooks::new(vec![Reply::Fail, Reply::Fail, Reply::Found]);
        let repo = MemoryOrders::default();
        let order = submit(&books, &repo).await;
        assert_eq!(order.status, OrderStatus::Accepted);
        assert_eq!(books.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn save_failure_propagates_without_retry() {
        let books = ScriptedBooks::new(vec![Reply::Found]);
        let repo = MemoryOrders {
            fail_saves: true,
            ..Default::default()
        };
        let policy = policy();
        let uc = SubmitOrder {
            books: &books,
            repo: &repo,
            policy: &policy,
        };
        assert!(uc.execute("1234567891", 2).await.is_err());
        assert_eq!(repo.save_calls.load(Ordering::SeqCst), 1);
        assert_eq!(books.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn persistent_failure_is_rejected_after_retries() {
        let books = ScriptedBooks::new(vec![]);
        let repo = MemoryOrders::default();
        let order = submit(&books, &repo).await;
        assert_eq!(order.status, OrderStatus::Rejected);
        assert_eq!(books.calls.load(Ordering::SeqCst), 4);
        assert_eq!(repo.find_all().await.unwrap(), vec![order]);
    }
}
