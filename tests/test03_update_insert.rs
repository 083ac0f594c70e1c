mod common;

use common::{MockConnector, adapter, article};
use datastore_mysql::prelude::*;

#[tokio::test]
async fn update_builds_single_row_statement() -> Result<(), Box<dyn std::error::Error>> {
    let connector = MockConnector::new();
    connector.respond(Ok(StatementResult::mutation(1, None)));
    let store = adapter(&connector);

    let affected = store
        .update("articles", RowValue::Int(42), Some(&article()))
        .await?;

    assert_eq!(affected, 1);
    assert_eq!(
        connector.statements(),
        vec!["UPDATE articles SET title=new title,abstract=new abstract WHERE id=42 LIMIT 1"]
    );
    assert_eq!(connector.escaped_ids(), vec!["title", "abstract", "articles", "id"]);
    let values = connector.escaped_values();
    for expected in [
        RowValue::from("new title"),
        RowValue::from("new abstract"),
        RowValue::Int(42),
        RowValue::UInt(1),
    ] {
        assert!(values.contains(&expected), "{expected:?} was not escaped");
    }
    Ok(())
}

#[tokio::test]
async fn update_reports_zero_when_nothing_matched() -> Result<(), Box<dyn std::error::Error>> {
    let connector = MockConnector::new();
    connector.respond(Ok(StatementResult::mutation(0, None)));
    let store = adapter(&connector);

    let affected = store
        .update("articles", RowValue::Int(404), Some(&article()))
        .await?;

    assert_eq!(affected, 0);
    assert_eq!(connector.statements().len(), 1);
    Ok(())
}

#[tokio::test]
async fn insert_returns_the_backend_id() -> Result<(), Box<dyn std::error::Error>> {
    let connector = MockConnector::new();
    connector.respond(Ok(StatementResult::mutation(1, Some(1337))));
    let store = adapter(&connector);

    let id = store.insert("articles", Some(&article())).await?;

    assert_eq!(id, 1337);
    assert_eq!(
        connector.statements(),
        vec!["INSERT INTO articles SET title=new title,abstract=new abstract"]
    );
    assert_eq!(connector.escaped_ids(), vec!["title", "abstract", "articles"]);
    Ok(())
}

#[tokio::test]
async fn insert_without_backend_id_is_zero() -> Result<(), Box<dyn std::error::Error>> {
    let connector = MockConnector::new();
    connector.respond(Ok(StatementResult::mutation(1, None)));
    let store = adapter(&connector);

    assert_eq!(store.insert("articles", Some(&article())).await?, 0);
    Ok(())
}

#[tokio::test]
async fn missing_or_empty_data_is_a_no_op() -> Result<(), Box<dyn std::error::Error>> {
    let connector = MockConnector::new();
    let store = adapter(&connector);

    assert_eq!(store.update("articles", RowValue::Int(42), None).await?, 0);
    assert_eq!(store.insert("articles", None).await?, 0);
    let empty = FieldMap::new();
    assert_eq!(store.update("articles", RowValue::Int(42), Some(&empty)).await?, 0);
    assert_eq!(store.insert("articles", Some(&empty)).await?, 0);

    assert_eq!(connector.connect_attempts(), 0);
    assert!(connector.statements().is_empty());
    assert!(!store.is_connected());
    Ok(())
}

#[tokio::test]
async fn query_failure_is_returned_unchanged() {
    let connector = MockConnector::new();
    connector.respond(Err(common::MockError("ER_DUP_ENTRY".into())));
    let store = adapter(&connector);

    let err = store.insert("articles", Some(&article())).await.unwrap_err();

    assert!(err.is_query());
    assert_eq!(err.into_inner().unwrap(), common::MockError("ER_DUP_ENTRY".into()));
}
