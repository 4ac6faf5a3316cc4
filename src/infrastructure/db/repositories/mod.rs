pub mod order_repository_sqlx;
