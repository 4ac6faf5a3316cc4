pub mod book_client_reqwest;
