use lazy_static::lazy_static;
use regex::Regex;

use super::{InvalidFieldName, join_assignments};
use crate::connection::Connection;
use crate::types::{FieldMap, FindOptions, ProjectionMode, RowValue};

lazy_static! {
    // bare or table-qualified identifier
    static ref FIELD_NAME: Regex =
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_$]*(\.[A-Za-z_][A-Za-z0-9_$]*)?$")
            .expect("field name pattern is valid");
}

/// Projection list of a SELECT.
///
/// An empty field list projects `*`. In `Raw` mode the names are joined with commas as
/// given, without identifier escaping, unlike every other clause.
///
/// # Errors
///
/// Returns `InvalidFieldName` in `Validated` mode for the first name that is not a plain
/// identifier.
pub fn projection<C>(
    conn: &C,
    fields: &[String],
    mode: ProjectionMode,
) -> Result<String, InvalidFieldName>
where
    C: Connection + ?Sized,
{
    if fields.is_empty() {
        return Ok("*".to_string());
    }
    match mode {
        ProjectionMode::Raw => Ok(fields.join(",")),
        ProjectionMode::Escaped => Ok(fields
            .iter()
            .map(|field| conn.escape_id(field))
            .collect::<Vec<_>>()
            .join(",")),
        ProjectionMode::Validated => {
            if let Some(bad) = fields.iter().find(|field| !FIELD_NAME.is_match(field)) {
                return Err(InvalidFieldName(bad.clone()));
            }
            Ok(fields.join(","))
        }
    }
}

/// ` WHERE a=1 AND b=2`, or an empty string when there is nothing to restrict.
pub fn where_clause<C>(conn: &C, filter: Option<&FieldMap>) -> String
where
    C: Connection + ?Sized,
{
    match filter {
        Some(filter) if !filter.is_empty() => {
            format!(" WHERE {}", join_assignments(conn, filter, " AND "))
        }
        _ => String::new(),
    }
}

/// ` LIMIT n` / ` LIMIT o,n`.
///
/// Nothing is emitted without a limit, even when an offset is set. A zero offset counts
/// as no offset.
pub fn limit_clause<C>(conn: &C, offset: Option<u64>, limit: Option<u64>) -> String
where
    C: Connection + ?Sized,
{
    let Some(limit) = limit else {
        return String::new();
    };
    let limit = conn.escape(&RowValue::UInt(limit));
    match offset {
        None | Some(0) => format!(" LIMIT {limit}"),
        Some(offset) => format!(" LIMIT {},{limit}", conn.escape(&RowValue::UInt(offset))),
    }
}

/// `SELECT <fields> FROM <table><where><limit>`.
///
/// # Errors
///
/// Propagates `InvalidFieldName` from [`projection`].
pub fn select_statement<C>(
    conn: &C,
    table: &str,
    options: &FindOptions,
    mode: ProjectionMode,
) -> Result<String, InvalidFieldName>
where
    C: Connection + ?Sized,
{
    Ok(format!(
        "SELECT {} FROM {}{}{}",
        projection(conn, &options.fields, mode)?,
        conn.escape_id(table),
        where_clause(conn, options.filter.as_ref()),
        limit_clause(conn, options.offset, options.limit),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_builder::test_support::{Identity, Marking};

    #[test]
    fn bare_find_selects_everything() {
        let sql = select_statement(&Identity, "articles", &FindOptions::new(), ProjectionMode::Raw);
        assert_eq!(sql.unwrap(), "SELECT * FROM articles");
    }

    #[test]
    fn fields_offset_and_limit() {
        let opts = FindOptions::new()
            .fields(["title", "abstract"])
            .offset(10)
            .limit(42);
        let sql = select_statement(&Identity, "articles", &opts, ProjectionMode::Raw).unwrap();
        assert_eq!(sql, "SELECT title,abstract FROM articles LIMIT 10,42");
    }

    #[test]
    fn where_terms_follow_filter_order() {
        let filter = FieldMap::new()
            .with("status", "draft")
            .with("author", 7)
            .with("id", 42);
        let clause = where_clause(&Identity, Some(&filter));
        assert_eq!(clause, " WHERE status=draft AND author=7 AND id=42");
        assert_eq!(clause.matches(" AND ").count(), filter.len() - 1);
    }

    #[test]
    fn empty_or_missing_filter_is_omitted() {
        assert_eq!(where_clause(&Identity, None), "");
        assert_eq!(where_clause(&Identity, Some(&FieldMap::new())), "");
    }

    #[test]
    fn limit_forms() {
        assert_eq!(limit_clause(&Identity, None, None), "");
        assert_eq!(limit_clause(&Identity, Some(10), None), "");
        assert_eq!(limit_clause(&Identity, None, Some(5)), " LIMIT 5");
        assert_eq!(limit_clause(&Identity, Some(0), Some(5)), " LIMIT 5");
        assert_eq!(limit_clause(&Identity, Some(3), Some(5)), " LIMIT 3,5");
        assert_eq!(limit_clause(&Marking, Some(3), Some(5)), " LIMIT '3','5'");
    }

    #[test]
    fn table_filter_names_and_values_are_escaped() {
        let opts = FindOptions::new()
            .filter(FieldMap::new().with("id", 42))
            .limit(1);
        let sql = select_statement(&Marking, "articles", &opts, ProjectionMode::Raw).unwrap();
        assert_eq!(sql, "SELECT * FROM [articles] WHERE [id]='42' LIMIT '1'");
    }

    #[test]
    fn raw_projection_is_not_escaped() {
        let fields = vec!["title".to_string(), "abstract".to_string()];
        assert_eq!(
            projection(&Marking, &fields, ProjectionMode::Raw).unwrap(),
            "title,abstract"
        );
        assert_eq!(
            projection(&Marking, &fields, ProjectionMode::Escaped).unwrap(),
            "[title],[abstract]"
        );
    }

    #[test]
    fn validated_projection_rejects_expressions() {
        let ok = vec!["a.title".to_string(), "_x$1".to_string()];
        assert_eq!(
            projection(&Identity, &ok, ProjectionMode::Validated).unwrap(),
            "a.title,_x$1"
        );

        let bad = vec!["title".to_string(), "1;DROP TABLE x".to_string()];
        assert_eq!(
            projection(&Identity, &bad, ProjectionMode::Validated),
            Err(InvalidFieldName("1;DROP TABLE x".to_string()))
        );
    }
}
