use super::join_assignments;
use super::select::{limit_clause, where_clause};
use crate::connection::Connection;
use crate::types::{FieldMap, RowValue};

/// Key column every update targets.
pub const ID_FIELD: &str = "id";

/// `a=1,b=2` for an update or insert. Empty when `data` has no entries.
pub fn set_clause<C>(conn: &C, data: &FieldMap) -> String
where
    C: Connection + ?Sized,
{
    join_assignments(conn, data, ",")
}

/// `UPDATE <table> SET <set> WHERE id=<id> LIMIT 1`, or `None` when there is nothing to set.
pub fn update_statement<C>(conn: &C, table: &str, id: &RowValue, data: &FieldMap) -> Option<String>
where
    C: Connection + ?Sized,
{
    let set = set_clause(conn, data);
    if set.is_empty() {
        return None;
    }
    let key = FieldMap::new().with(ID_FIELD, id.clone());
    Some(format!(
        "UPDATE {} SET {set}{}{}",
        conn.escape_id(table),
        where_clause(conn, Some(&key)),
        limit_clause(conn, None, Some(1)),
    ))
}

/// `INSERT INTO <table> SET <set>`, or `None` when there is nothing to set.
pub fn insert_statement<C>(conn: &C, table: &str, data: &FieldMap) -> Option<String>
where
    C: Connection + ?Sized,
{
    let set = set_clause(conn, data);
    if set.is_empty() {
        return None;
    }
    Some(format!("INSERT INTO {} SET {set}", conn.escape_id(table)))
}
