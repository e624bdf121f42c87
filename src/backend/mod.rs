//! Data access against the managed backend.
//!
//! Screens only ever talk to a [`Backend`]: table/view reads with equality
//! filters, ordering and a limit; inserts; updates and deletes keyed by
//! column equality; and named remote procedures. [`rest::RestBackend`] is the
//! HTTP implementation.

pub mod auth;
pub mod rest;

use crate::errors::{AppError, AppResult};
use serde::de::DeserializeOwned;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

/// Column equality, the only filter the client needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub column: String,
    pub value: String,
}

impl Filter {
    pub fn eq(column: &str, value: impl Into<String>) -> Self {
        Self {
            column: column.to_string(),
            value: value.into(),
        }
    }

    /// PostgREST form: `(column, "eq.value")`
    pub fn to_param(&self) -> (String, String) {
        (self.column.clone(), format!("eq.{}", self.value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub direction: Direction,
}

/// A read against one table or view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub table: String,
    pub columns: String,
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn from(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: "*".to_string(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.columns = columns.to_string();
        self
    }

    pub fn eq(mut self, column: &str, value: impl Into<String>) -> Self {
        self.filters.push(Filter::eq(column, value));
        self
    }

    pub fn order(mut self, column: &str, direction: Direction) -> Self {
        self.order = Some(Order {
            column: column.to_string(),
            direction,
        });
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Query-string pairs in the PostgREST dialect.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), self.columns.clone())];
        params.extend(self.filters.iter().map(Filter::to_param));
        if let Some(o) = &self.order {
            params.push((
                "order".to_string(),
                format!("{}.{}", o.column, o.direction.as_str()),
            ));
        }
        if let Some(n) = self.limit {
            params.push(("limit".to_string(), n.to_string()));
        }
        params
    }
}

/// Request surface of the backend. Every call is independent: no batching,
/// no retries, errors carry the backend's message verbatim.
#[allow(async_fn_in_trait)]
pub trait Backend {
    async fn select(&self, query: &Query) -> AppResult<Vec<Value>>;

    async fn insert(&self, table: &str, row: Value) -> AppResult<()>;

    async fn update(&self, table: &str, filter: &Filter, patch: Value) -> AppResult<()>;

    async fn delete(&self, table: &str, filter: &Filter) -> AppResult<()>;

    async fn rpc(&self, function: &str, args: Value) -> AppResult<Value>;
}

/// Decode every returned row into `T`.
pub fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> AppResult<Vec<T>> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(AppError::from))
        .collect()
}

/// Zero or one row; more than one is an error, as the backend's
/// maybe-single read reports it.
pub fn maybe_single<T: DeserializeOwned>(rows: Vec<Value>) -> AppResult<Option<T>> {
    match rows.len() {
        0 => Ok(None),
        1 => {
            let row = rows.into_iter().next().unwrap_or(Value::Null);
            Ok(Some(serde_json::from_value(row)?))
        }
        n => Err(AppError::backend(format!(
            "JSON object requested, multiple ({n}) rows returned"
        ))),
    }
}

/// Pull `message` out of a backend error body, falling back to the raw text.
pub fn error_message(body: &str, status: u16) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            ["message", "error_description", "msg", "error"]
                .iter()
                .find_map(|k| v.get(*k).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("Request failed with status {status}")
            } else {
                body.trim().to_string()
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_params_follow_postgrest_dialect() {
        let q = Query::from("attendance_locations")
            .select("current_token")
            .eq("name", "Front Desk")
            .order("check_in_at", Direction::Desc)
            .limit(30);

        assert_eq!(
            q.to_params(),
            vec![
                ("select".to_string(), "current_token".to_string()),
                ("name".to_string(), "eq.Front Desk".to_string()),
                ("order".to_string(), "check_in_at.desc".to_string()),
                ("limit".to_string(), "30".to_string()),
            ]
        );
    }

    #[test]
    fn maybe_single_rejects_multiple_rows() {
        let none: Option<Value> = maybe_single(vec![]).unwrap();
        assert!(none.is_none());

        let one: Option<Value> = maybe_single(vec![json!({"id": "a"})]).unwrap();
        assert_eq!(one, Some(json!({"id": "a"})));

        let err = maybe_single::<Value>(vec![json!({}), json!({})]).unwrap_err();
        assert!(err.to_string().contains("multiple (2) rows"));
    }

    #[test]
    fn error_message_prefers_structured_body() {
        assert_eq!(
            error_message(r#"{"code":"23505","message":"duplicate key"}"#, 409),
            "duplicate key"
        );
        assert_eq!(
            error_message(r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#, 400),
            "Invalid login credentials"
        );
        assert_eq!(error_message("", 502), "Request failed with status 502");
        assert_eq!(error_message("upstream down", 503), "upstream down");
    }
}
