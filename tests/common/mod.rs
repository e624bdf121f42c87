#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{Duration, TimeZone, Utc};
use gymdesk::backend::{Backend, Filter, Query};
use gymdesk::errors::{AppError, AppResult};
use gymdesk::session::AuthContext;
use serde_json::{Value, json};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

pub fn gym() -> Command {
    cargo_bin_cmd!("gymdesk")
}

pub fn staff() -> AuthContext {
    AuthContext {
        user_id: "staff-1".to_string(),
        email: Some("desk@gym.test".to_string()),
    }
}

/// Every request the fake received, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Select(Query),
    Insert(String, Value),
    Update(String, Filter, Value),
    Delete(String, Filter),
    Rpc(String, Value),
}

/// In-memory stand-in for the PostgREST backend: tables are vectors of JSON
/// rows, procedures answer with canned replies, and any operation can be
/// made to fail.
#[derive(Default)]
pub struct MemoryBackend {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    replies: Mutex<HashMap<String, Value>>,
    failing: Mutex<HashSet<String>>,
    budgets: Mutex<HashMap<String, usize>>,
    calls: Mutex<Vec<Call>>,
    next_id: Mutex<u32>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(self, table: &str, rows: Vec<Value>) -> Self {
        self.tables
            .lock()
            .unwrap()
            .insert(table.to_string(), rows);
        self
    }

    pub fn set_rows(&self, table: &str, rows: Vec<Value>) {
        self.tables
            .lock()
            .unwrap()
            .insert(table.to_string(), rows);
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    pub fn reply(&self, function: &str, value: Value) {
        self.replies
            .lock()
            .unwrap()
            .insert(function.to_string(), value);
    }

    /// `op` is `select:<table>`, `insert:<table>`, `update:<table>`,
    /// `delete:<table>` or `rpc:<function>`.
    pub fn fail_on(&self, op: &str) {
        self.failing.lock().unwrap().insert(op.to_string());
    }

    pub fn heal(&self, op: &str) {
        self.failing.lock().unwrap().remove(op);
        self.budgets.lock().unwrap().remove(op);
    }

    /// Let `op` succeed `n` more times, then fail like [`fail_on`](Self::fail_on).
    pub fn fail_after(&self, op: &str, n: usize) {
        self.budgets.lock().unwrap().insert(op.to_string(), n);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn rpc_calls(&self, function: &str) -> Vec<Value> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Rpc(f, args) if f == function => Some(args),
                _ => None,
            })
            .collect()
    }

    pub fn inserts(&self, table: &str) -> Vec<Value> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Insert(t, row) if t == table => Some(row),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, op: &str) -> AppResult<()> {
        let exhausted = match self.budgets.lock().unwrap().get_mut(op) {
            Some(0) => true,
            Some(left) => {
                *left -= 1;
                false
            }
            None => false,
        };
        if exhausted || self.failing.lock().unwrap().contains(op) {
            return Err(AppError::backend(format!("permission denied ({op})")));
        }
        Ok(())
    }

    /// Ids and creation times the backend would assign. Creation times
    /// increase with every insert so "newest first" is deterministic.
    fn stamp(&self, row: &mut Value) {
        let mut n = self.next_id.lock().unwrap();
        *n += 1;
        if let Value::Object(map) = row {
            map.entry("id").or_insert_with(|| json!(format!("gen-{}", *n)));
            let created = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap()
                + Duration::minutes(i64::from(*n));
            map.entry("created_at")
                .or_insert_with(|| json!(created.to_rfc3339()));
        }
    }
}

fn matches(row: &Value, filter: &Filter) -> bool {
    match row.get(&filter.column) {
        Some(Value::String(s)) => *s == filter.value,
        Some(Value::Null) | None => false,
        Some(other) => other.to_string() == filter.value,
    }
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Greater,
        (_, None | Some(Value::Null)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

impl Backend for MemoryBackend {
    async fn select(&self, query: &Query) -> AppResult<Vec<Value>> {
        self.record(Call::Select(query.clone()));
        self.check(&format!("select:{}", query.table))?;

        let mut rows: Vec<Value> = self
            .rows(&query.table)
            .into_iter()
            .filter(|r| query.filters.iter().all(|f| matches(r, f)))
            .collect();

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| compare(a.get(&order.column), b.get(&order.column)));
            if order.direction == gymdesk::backend::Direction::Desc {
                rows.reverse();
            }
        }
        if let Some(n) = query.limit {
            rows.truncate(n);
        }
        Ok(rows)
    }

    async fn insert(&self, table: &str, row: Value) -> AppResult<()> {
        self.record(Call::Insert(table.to_string(), row.clone()));
        self.check(&format!("insert:{table}"))?;

        let mut row = row;
        self.stamp(&mut row);
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(row);
        Ok(())
    }

    async fn update(&self, table: &str, filter: &Filter, patch: Value) -> AppResult<()> {
        self.record(Call::Update(table.to_string(), filter.clone(), patch.clone()));
        self.check(&format!("update:{table}"))?;

        let mut tables = self.tables.lock().unwrap();
        for row in tables.entry(table.to_string()).or_default() {
            if !matches(row, filter) {
                continue;
            }
            if let (Value::Object(target), Value::Object(changes)) = (&mut *row, &patch) {
                for (k, v) in changes {
                    target.insert(k.clone(), v.clone());
                }
            }
        }
        Ok(())
    }

    async fn delete(&self, table: &str, filter: &Filter) -> AppResult<()> {
        self.record(Call::Delete(table.to_string(), filter.clone()));
        self.check(&format!("delete:{table}"))?;

        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .retain(|row| !matches(row, filter));
        Ok(())
    }

    async fn rpc(&self, function: &str, args: Value) -> AppResult<Value> {
        self.record(Call::Rpc(function.to_string(), args));
        self.check(&format!("rpc:{function}"))?;

        Ok(self
            .replies
            .lock()
            .unwrap()
            .get(function)
            .cloned()
            .unwrap_or(Value::Null))
    }
}

/// A session row as `v_attendance_sessions` returns it.
pub fn session_row(id: &str, member: &str, check_in: &str) -> Value {
    json!({
        "id": id,
        "member_name": member,
        "check_in_at": check_in,
        "check_out_at": null,
        "duration_minutes": null,
        "location_name": "Front Desk",
    })
}

pub fn location_row(id: &str, name: &str, token: Option<&str>) -> Value {
    json!({ "id": id, "name": name, "current_token": token })
}
