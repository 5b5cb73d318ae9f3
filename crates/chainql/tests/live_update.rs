//! Round trips against a real PostgreSQL server.
//!
//! Skipped unless `DATABASE_URL` is set (a `.env` file is honoured).

use chainql::{Condition, ConditionGroup, ExecConfig, Model, Mutation, SqlError};

struct Member;
impl Model for Member {
    const TABLE: &'static str = "chainql_members";
}

async fn try_connect() -> Option<tokio_postgres::Client> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").ok()?;
    let (client, connection) = tokio_postgres::connect(&database_url, tokio_postgres::NoTls)
        .await
        .expect("Failed to connect to DATABASE_URL with NoTls");
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("tokio-postgres connection error: {e}");
        }
    });

    client
        .batch_execute(
            "CREATE TEMP TABLE chainql_members (
                id BIGINT PRIMARY KEY,
                name TEXT NOT NULL,
                age INT,
                prefs JSONB
            );
            INSERT INTO chainql_members (id, name, age) VALUES
                (1, 'Alice', 30),
                (2, 'Bob', 41),
                (3, 'Carol', NULL);",
        )
        .await
        .expect("Failed to create temp table");
    Some(client)
}

#[tokio::test]
async fn update_with_where_touches_matching_rows() {
    let Some(client) = try_connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    let affected = chainql::update::<Member>()
        .unwrap()
        .set()
        .set("age", 31_i32)
        .unwrap()
        .where_these([Condition::eq("id", 1_i64).unwrap()])
        .execute(&client)
        .await
        .unwrap();
    assert_eq!(affected, 1);

    let row = client
        .query_one("SELECT age FROM chainql_members WHERE id = 1", &[])
        .await
        .unwrap();
    assert_eq!(row.get::<_, Option<i32>>(0), Some(31));
}

#[tokio::test]
async fn returning_rows_come_back() {
    let Some(client) = try_connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    let mut any = ConditionGroup::any();
    any.put(Condition::is_null("age").unwrap())
        .put(Condition::gt("age", 40_i32).unwrap());

    let rows = chainql::update::<Member>()
        .unwrap()
        .set()
        .set_raw("name", "upper(name)")
        .unwrap()
        .where_group(any)
        .returning(["id", "name"])
        .unwrap()
        .fetch_returning(&client)
        .await
        .unwrap();

    let mut names: Vec<(i64, String)> = rows.iter().map(|r| (r.get(0), r.get(1))).collect();
    names.sort();
    assert_eq!(names, [(2, "BOB".to_string()), (3, "CAROL".to_string())]);
}

#[tokio::test]
async fn json_assignment_round_trips() {
    let Some(client) = try_connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    #[derive(serde::Serialize)]
    struct Prefs {
        theme: &'static str,
    }

    chainql::update::<Member>()
        .unwrap()
        .set()
        .set_json("prefs", &Prefs { theme: "dark" })
        .unwrap()
        .where_these([Condition::eq("id", 2_i64).unwrap()])
        .execute(&client)
        .await
        .unwrap();

    let row = client
        .query_one("SELECT prefs->>'theme' FROM chainql_members WHERE id = 2", &[])
        .await
        .unwrap();
    assert_eq!(row.get::<_, Option<String>>(0).as_deref(), Some("dark"));
}

#[tokio::test]
async fn unique_violation_is_classified() {
    let Some(client) = try_connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    let err = chainql::update::<Member>()
        .unwrap()
        .set()
        .set("id", 1_i64)
        .unwrap()
        .where_these([Condition::eq("id", 2_i64).unwrap()])
        .execute(&client)
        .await
        .unwrap_err();
    assert!(err.is_unique_violation(), "unexpected error: {err}");
}

#[tokio::test]
async fn require_where_never_reaches_the_server() {
    let Some(client) = try_connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    let config = ExecConfig::new().require_where(true);
    let err = chainql::update::<Member>()
        .unwrap()
        .set()
        .set("age", 0_i32)
        .unwrap()
        .execute_with(&client, &config)
        .await
        .unwrap_err();
    assert!(matches!(err, SqlError::Validation(_)));

    let row = client
        .query_one("SELECT count(*) FROM chainql_members WHERE age = 0", &[])
        .await
        .unwrap();
    assert_eq!(row.get::<_, i64>(0), 0);
}

#[tokio::test]
async fn transaction_rollback_discards_update() {
    let Some(mut client) = try_connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    let tx = client.transaction().await.unwrap();
    let affected = chainql::update::<Member>()
        .unwrap()
        .set()
        .set("name", "Zed")
        .unwrap()
        .where_()
        .execute(&tx)
        .await
        .unwrap();
    assert_eq!(affected, 3);
    tx.rollback().await.unwrap();

    let row = client
        .query_one("SELECT count(*) FROM chainql_members WHERE name = 'Zed'", &[])
        .await
        .unwrap();
    assert_eq!(row.get::<_, i64>(0), 0);
}

#[tokio::test]
async fn fetch_one_returning_reports_missing_rows() {
    let Some(client) = try_connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    let update = |id: i64| {
        chainql::update::<Member>()
            .unwrap()
            .set()
            .set("age", 50_i32)
            .unwrap()
            .where_these([Condition::eq("id", id).unwrap()])
            .returning(["age"])
            .unwrap()
    };

    let row = update(1).fetch_one_returning(&client).await.unwrap();
    assert_eq!(row.get::<_, Option<i32>>(0), Some(50));

    let err = update(99).fetch_one_returning(&client).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(update(99).fetch_opt_returning(&client).await.unwrap().is_none());
}
