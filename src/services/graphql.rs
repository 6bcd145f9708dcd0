//! GraphQL endpoint access.

use std::sync::Arc;

use serde_json::Value;

use crate::transport::HttpTransport;
use crate::{Error, ErrorDetail, Result};

/// Accessor for `/api/graphql`.
#[derive(Clone)]
pub struct GraphqlClient {
    transport: Arc<HttpTransport>,
}

impl GraphqlClient {
    pub(crate) fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    /// Execute a GraphQL query. Returns the full response value (`data`
    /// plus any extensions); a non-empty `errors` array raises with every
    /// error message joined, in response order.
    pub async fn query(
        &self,
        query: &str,
        variables: Option<Value>,
        operation_name: Option<&str>,
    ) -> Result<Value> {
        let mut payload = serde_json::json!({ "query": query });
        if let Some(variables) = variables {
            payload["variables"] = variables;
        }
        if let Some(operation_name) = operation_name {
            payload["operationName"] = Value::String(operation_name.to_string());
        }

        let body = self.transport.post("/api/graphql", payload).await?;

        if let Some(errors) = body.get("errors").and_then(Value::as_array) {
            if !errors.is_empty() {
                let joined = errors
                    .iter()
                    .map(|e| {
                        e.get("message")
                            .and_then(Value::as_str)
                            .unwrap_or("Unknown error")
                    })
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(Error::Api(
                    ErrorDetail::new(format!("GraphQL errors: {joined}"))
                        .with_code("GRAPHQL_ERROR")
                        .with_payload(body.clone()),
                ));
            }
        }

        Ok(body)
    }

    /// Execute a GraphQL mutation. Same wire shape as a query.
    pub async fn mutate(
        &self,
        mutation: &str,
        variables: Option<Value>,
        operation_name: Option<&str>,
    ) -> Result<Value> {
        self.query(mutation, variables, operation_name).await
    }

    /// `{ health }` probe; returns the reported state, or "unknown".
    pub async fn health(&self) -> Result<String> {
        let body = self.query("{ health }", None, None).await?;
        Ok(body
            .get("data")
            .and_then(|d| d.get("health"))
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string())
    }
}
