//! Dialect selection through `Compiler` and `CompilerConfig`.

use fluentsql::{Compiler, CompilerConfig, Dialect, LimitOffset, Order, Query, select};

fn page() -> Query {
    let mut q = select(["TrackId", "Name"]);
    q.from("tracks").order_by("Name", Order::Asc).limit(10).offset(5);
    q
}

#[test]
fn standard_and_sql_server_pagination() {
    let q = page();
    assert_eq!(
        q.to_sql().unwrap(),
        "SELECT TrackId,Name FROM tracks ORDER BY Name ASC LIMIT 10 OFFSET 5"
    );
    assert_eq!(
        q.to_sql_with(&Compiler::new(Dialect::SqlServer)).unwrap(),
        "SELECT TrackId,Name FROM tracks ORDER BY Name ASC OFFSET 5 ROWS FETCH NEXT 10 ROWS ONLY"
    );
}

#[test]
fn sql_server_offset_only() {
    let mut q = select(["*"]);
    q.from("tracks").order_by("TrackId", Order::Asc).offset(50);
    assert_eq!(
        q.to_sql_with(&Compiler::new(Dialect::SqlServer)).unwrap(),
        "SELECT * FROM tracks ORDER BY TrackId ASC OFFSET 50 ROWS"
    );
}

#[test]
fn pagination_applies_inside_subqueries() {
    let mut q = Query::new();
    q.select(["*"]).from(subquery_page());
    assert_eq!(
        q.to_sql_with(&Compiler::new(Dialect::SqlServer)).unwrap(),
        "SELECT * FROM (SELECT TrackId,Name FROM tracks ORDER BY Name ASC \
         OFFSET 5 ROWS FETCH NEXT 10 ROWS ONLY) AS p"
    );
}

fn subquery_page() -> Query {
    let mut q = page();
    q.alias_as("p");
    q
}

#[test]
fn config_from_json() {
    let config: CompilerConfig =
        serde_json::from_str(r#"{"dialect": "sql_server", "log_sql": false}"#).unwrap();
    let compiler = Compiler::from_config(&config);
    assert!(
        page()
            .to_sql_with(&compiler)
            .unwrap()
            .ends_with("OFFSET 5 ROWS FETCH NEXT 10 ROWS ONLY")
    );
}

#[test]
fn explicit_strategy() {
    let compiler = Compiler::new(Dialect::SqlServer).with_pagination(LimitOffset);
    assert!(page().to_sql_with(&compiler).unwrap().ends_with("LIMIT 10 OFFSET 5"));
}

#[test]
fn non_select_statements_ignore_dialect() {
    let mut q = fluentsql::update("tracks");
    q.set([("Name", "?")]).where_("TrackId = ?");
    let standard = q.to_sql().unwrap();
    let mssql = q.to_sql_with(&Compiler::new(Dialect::SqlServer)).unwrap();
    assert_eq!(standard, mssql);
}
