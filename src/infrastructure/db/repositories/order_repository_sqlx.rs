use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::application::ports::order_repository::OrderRepository;
use crate::domain::orders::order::{NewOrder, Order, OrderStatus};
use crate::infrastructure::db::PgPool;

pub struct SqlxOrderRepository {
    pub pool: PgPool,
}

impl SqlxOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_order(r: PgRow) -> anyhow::Result<Order> {
    let status: String = r.get("status");
    Ok(Order {
        id: r.get("id"),
        book_isbn: r.get("book_isbn"),
        book_name: r.get("book_name"),
        book_price: r.get("book_price"),
        quantity: r.get("quantity"),
        status: status.parse::<OrderStatus>()?,
        created_date: r.get("created_date"),
        last_modified_date: r.get("last_modified_date"),
        version: r.get("version"),
    })
}

#[async_trait]
impl OrderRepository for SqlxOrderRepository {
    async fn find_all(&self) -> anyhow::Result<Vec<Order>> {
        let rows = sqlx::query(
            r#"SELECT id, book_isbn, book_name, book_price, quantity, status,
                      created_date, last_modified_date, version
               FROM orders
               ORDER BY id ASC"#,
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(map_order).collect()
    }

    async fn save(&self, order: &NewOrder) -> anyhow::Result<Order> {
        let row = sqlx::query(
            r#"INSERT INTO orders
                   (book_isbn, book_name, book_price, quantity, status,
                    created_date, last_modified_date, version)
               VALUES ($1, $2, $3, $4, $5, now(), now(), 1)
               RETURNING id, book_isbn, book_name, book_price, quantity, status,
                         created_date, last_modified_date, version"#,
        )
        .bind(&order.book_isbn)
        .bind(&order.book_name)
        .bind(order.book_price)
        .bind(order.quantity)
        .bind(order.status.as_str())
        .fetch_one(&self.pool)
        .await?;
        map_order(row)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}
