use crate::error::{ClientError, ClientResult};
use crate::operation::Operation;
use crate::transport::Transport;
use markstack_model::ResultUnion;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Sends operations and decodes their root field into a result union.
///
/// Transport failures come back as `Err`. Anything the backend answered,
/// including `BaseError` and `InputValidationError`, is `Ok`.
#[derive(Clone)]
pub struct MutationExecutor {
    transport: Arc<dyn Transport>,
}

impl MutationExecutor {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Executes `operation` and decodes the union.
    pub async fn execute<R>(&self, operation: &Operation) -> ClientResult<R>
    where
        R: ResultUnion + DeserializeOwned,
    {
        let (result, _) = self.execute_with_payload(operation).await?;
        Ok(result)
    }

    /// Like [`Self::execute`], also returning the raw root value so the
    /// caller can write it to the cache.
    pub async fn execute_with_payload<R>(&self, operation: &Operation) -> ClientResult<(R, Value)>
    where
        R: ResultUnion + DeserializeOwned,
    {
        let payload = self.execute_raw(operation).await?;
        let result = serde_json::from_value(payload.clone()).map_err(|e| {
            warn!(operation = operation.name, error = %e, "undecodable result union");
            ClientError::Serialization(e)
        })?;
        Ok((result, payload))
    }

    /// Executes `operation` and returns its root field untouched.
    pub async fn execute_raw(&self, operation: &Operation) -> ClientResult<Value> {
        debug!(operation = operation.name, kind = ?operation.kind, "executing");
        let mut data = self.transport.send(operation).await?;
        let payload = data
            .get_mut(operation.root_field)
            .map(Value::take)
            .ok_or_else(|| ClientError::MissingData(operation.root_field.to_string()))?;
        if payload.is_null() {
            return Err(ClientError::MissingData(operation.root_field.to_string()));
        }
        Ok(payload)
    }
}
