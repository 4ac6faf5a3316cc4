use order_service::application::ports::order_repository::OrderRepository;
use order_service::domain::books::book::Book;
use order_service::domain::orders::order::{
    OrderStatus, build_accepted_order, build_rejected_order,
};
use order_service::infrastructure::db::repositories::order_repository_sqlx::SqlxOrderRepository;
use sqlx::PgPool;

fn book() -> Book {
    Book {
        isbn: "1234567890".into(),
        title: "Title".into(),
        author: "Author".into(),
        price: 9.90,
    }
}

#[test_group::group(database, postgres)]
#[test_log::test(sqlx::test(migrations = "./migrations"))]
async fn save_assigns_identity_and_audit_fields(pool: PgPool) {
    use pretty_assertions::assert_eq;

    let repo = SqlxOrderRepository::new(pool);
    let saved = repo.save(&build_accepted_order(&book(), 2)).await.unwrap();

    assert!(saved.id > 0);
    assert_eq!(saved.version, 1);
    assert_eq!(saved.created_date, saved.last_modified_date);
    assert_eq!(saved.book_name.as_deref(), Some("Title - Author"));
    assert_eq!(saved.book_price, Some(9.90));
    assert_eq!(saved.quantity, 2);
    assert_eq!(saved.status, OrderStatus::Accepted);
}

#[test_group::group(database, postgres)]
#[test_log::test(sqlx::test(migrations = "./migrations"))]
async fn find_all_returns_orders_in_insertion_order(pool: PgPool) {
    use pretty_assertions::assert_eq;

    let repo = SqlxOrderRepository::new(pool);
    assert!(repo.find_all().await.unwrap().is_empty());

    let first = repo.save(&build_accepted_order(&book(), 1)).await.unwrap();
    let second = repo
        .save(&build_rejected_order("0000000000", 3))
        .await
        .unwrap();

    let all = repo.find_all().await.unwrap();
    assert_eq!(all, vec![first, second]);
    assert_eq!(all[1].status, OrderStatus::Rejected);
    assert_eq!(all[1].book_name, None);
    assert_eq!(all[1].book_price, None);
}

#[test_group::group(database, postgres)]
#[test_log::test(sqlx::test(migrations = "./migrations"))]
async fn unknown_stored_status_is_an_error(pool: PgPool) {
    sqlx::query(
        r#"INSERT INTO orders (book_isbn, quantity, status, created_date, last_modified_date, version)
           VALUES ('1234567890', 1, 'LOST', now(), now(), 1)"#,
    )
    .execute(&pool)
    .await
    .unwrap();

    let repo = SqlxOrderRepository::new(pool);
    assert!(repo.find_all().await.is_err());
}
