//! PostgREST-over-HTTP implementation of [`Backend`].

use super::{Backend, Filter, Query, error_message};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

pub struct RestBackend {
    client: Client,
    base_url: String,
    anon_key: String,
    access_token: String,
}

impl RestBackend {
    pub fn new(cfg: &Config, access_token: &str) -> AppResult<Self> {
        let (url, key) = cfg.backend()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: url.to_string(),
            anon_key: key.to_string(),
            access_token: access_token.to_string(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn rpc_url(&self, function: &str) -> String {
        format!("{}/rest/v1/rpc/{}", self.base_url, function)
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.anon_key)
            .bearer_auth(&self.access_token)
    }

    async fn send(&self, req: RequestBuilder) -> AppResult<Response> {
        let resp = self.authed(req).send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = error_message(&body, status.as_u16());
        debug!(status = status.as_u16(), %message, "backend rejected request");
        Err(AppError::backend(message))
    }
}

impl Backend for RestBackend {
    async fn select(&self, query: &Query) -> AppResult<Vec<Value>> {
        debug!(table = %query.table, params = ?query.to_params(), "select");
        let req = self
            .client
            .get(self.table_url(&query.table))
            .query(&query.to_params());

        let rows: Vec<Value> = self.send(req).await?.json().await?;
        debug!(table = %query.table, rows = rows.len(), "select done");
        Ok(rows)
    }

    async fn insert(&self, table: &str, row: Value) -> AppResult<()> {
        debug!(%table, "insert");
        let req = self
            .client
            .post(self.table_url(table))
            .header("Prefer", "return=minimal")
            .json(&row);
        self.send(req).await?;
        Ok(())
    }

    async fn update(&self, table: &str, filter: &Filter, patch: Value) -> AppResult<()> {
        debug!(%table, column = %filter.column, "update");
        let req = self
            .client
            .patch(self.table_url(table))
            .query(&[filter.to_param()])
            .header("Prefer", "return=minimal")
            .json(&patch);
        self.send(req).await?;
        Ok(())
    }

    async fn delete(&self, table: &str, filter: &Filter) -> AppResult<()> {
        debug!(%table, column = %filter.column, "delete");
        let req = self
            .client
            .delete(self.table_url(table))
            .query(&[filter.to_param()]);
        self.send(req).await?;
        Ok(())
    }

    async fn rpc(&self, function: &str, args: Value) -> AppResult<Value> {
        debug!(%function, "rpc");
        let req = self.client.post(self.rpc_url(function)).json(&args);
        let body = self.send(req).await?.text().await?;

        // void procedures answer with an empty body
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }
}
