//! Example demonstrating CTE (WITH clause) statements built with fluentsql.
//!
//! Run with:
//!   cargo run --example cte_queries -p fluentsql

use fluentsql::{Compiler, Dialect, Order, QbResult, Query};

// ─── Pure SQL generation demos ──────────────────────────────────────────────

fn demo_simple_cte() -> QbResult<()> {
    let mut q = Query::new();
    q.with("active_users", |q| {
        q.select(["id", "name"]).from("users").where_("status = ?");
    })
    .select(["*"])
    .from("active_users");

    println!("[simple CTE]");
    println!("  SQL: {}", q.to_sql()?);
    println!();
    Ok(())
}

fn demo_recursive_org_tree() -> QbResult<()> {
    let mut q = Query::new();
    q.with_recursive_columns("org_tree", ["id", "name", "parent_id", "level"], |q| {
        q.select(["id", "name", "parent_id", "0"])
            .from("departments")
            .where_("parent_id IS NULL")
            .union_all(|q| {
                q.select(["d.id", "d.name", "d.parent_id", "t.level + 1"])
                    .from("departments d")
                    .join("org_tree t", "d.parent_id = t.id");
            });
    })
    .select(["*"])
    .from("org_tree")
    .order_by_all([("level", Order::Asc), ("name", Order::Asc)]);

    println!("[recursive CTE]");
    println!("  SQL: {}", q.to_sql()?);
    println!();
    Ok(())
}

fn demo_cte_update() -> QbResult<()> {
    let mut q = Query::new();
    q.with("import", |q| {
        q.select(["*"]).from("import").where_("batch_id = ?");
    })
    .update("users")
    .set([("email", "?"), ("forename", "?"), ("surname", "?")]);

    println!("[CTE + UPDATE]");
    println!("  SQL: {}", q.to_sql()?);
    println!();
    Ok(())
}

fn demo_dialects() -> QbResult<()> {
    let mut q = Query::new();
    q.with("ranked", |q| {
        q.select(["CustomerId", "SUM(Total) AS Spent"])
            .from("invoices")
            .group_by(["CustomerId"]);
    })
    .select(["*"])
    .from("ranked")
    .order_by("Spent", Order::Desc)
    .paginate(2, 10);

    println!("[dialects]");
    println!("  standard:   {}", q.to_sql()?);
    println!(
        "  sql server: {}",
        q.to_sql_with(&Compiler::new(Dialect::SqlServer))?
    );
    println!();
    Ok(())
}

fn main() -> QbResult<()> {
    demo_simple_cte()?;
    demo_recursive_org_tree()?;
    demo_cte_update()?;
    demo_dialects()?;
    Ok(())
}
