//! # Document Queries
//!
//! The small query language the document store understands.
//!
//! ```text
//! Equal("categories", "cat-burgers")   scalar equality, or membership when the
//!                                      column holds an array
//! Search("name", "cheese")             case-insensitive substring
//! Limit(6)                             cap the number of rows returned
//! ```
//!
//! Filters combine with AND. Several `Limit`s keep the smallest.

use serde_json::{Map, Value};

/// One clause of a row listing.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Equal { field: String, value: Value },
    Search { field: String, term: String },
    Limit(u32),
}

impl Query {
    pub fn equal(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Query::Equal {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn search(field: impl Into<String>, term: impl Into<String>) -> Self {
        Query::Search {
            field: field.into(),
            term: term.into(),
        }
    }

    pub fn limit(limit: u32) -> Self {
        Query::Limit(limit)
    }

    /// Returns true if `row` passes this clause. `Limit` passes every row.
    pub fn matches(&self, row: &Map<String, Value>) -> bool {
        match self {
            Query::Equal { field, value } => match row.get(field) {
                Some(Value::Array(values)) => values.contains(value),
                Some(actual) => actual == value,
                None => false,
            },
            Query::Search { field, term } => match row.get(field) {
                Some(Value::String(text)) => {
                    text.to_lowercase().contains(&term.to_lowercase())
                }
                _ => false,
            },
            Query::Limit(_) => true,
        }
    }
}

/// Returns the effective row limit of a query list, if any.
pub fn limit_of(queries: &[Query]) -> Option<usize> {
    queries
        .iter()
        .filter_map(|q| match q {
            Query::Limit(n) => Some(*n as usize),
            _ => None,
        })
        .min()
}

/// Returns true if `row` passes every filter clause.
pub fn matches_all(queries: &[Query], row: &Map<String, Value>) -> bool {
    queries.iter().all(|q| q.matches(row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("row must be an object"),
        }
    }

    #[test]
    fn test_equal_scalar_and_array() {
        let burger = row(json!({ "name": "Cheeseburger", "categories": "cat-burgers" }));
        let combo = row(json!({ "name": "Combo", "categories": ["cat-burgers", "cat-sides"] }));

        let q = Query::equal("categories", "cat-burgers");
        assert!(q.matches(&burger));
        assert!(q.matches(&combo));
        assert!(!Query::equal("categories", "cat-pizzas").matches(&combo));
        assert!(!Query::equal("missing", "x").matches(&burger));
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let burger = row(json!({ "name": "Classic Cheeseburger" }));
        assert!(Query::search("name", "CHEESE").matches(&burger));
        assert!(!Query::search("name", "pizza").matches(&burger));
        assert!(!Query::search("rating", "4").matches(&row(json!({ "rating": 4 }))));
    }

    #[test]
    fn test_limit() {
        assert_eq!(limit_of(&[]), None);
        assert_eq!(
            limit_of(&[Query::limit(10), Query::search("name", "a"), Query::limit(6)]),
            Some(6)
        );
        assert!(matches_all(&[Query::limit(1)], &row(json!({}))));
    }
}
