pub mod book_client;
pub mod order_repository;
