//! Agent-facing tools
//!
//! Each tool takes a typed, schema-described input and returns JSON, so an
//! agent runtime can list the tools, validate arguments and call them.

mod meteora;

use crate::{Error, Result};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use meteora::{MeteoraAction, MeteoraInput, MeteoraTool};

pub const TOOL_METEORA_LIQUIDITY: &str = "defi/meteora_liquidity";

/// A callable agent tool
#[async_trait]
pub trait Tool: Send + Sync {
    /// Fully qualified tool name
    const NAME: &'static str;

    type Input: DeserializeOwned + JsonSchema + Send;

    fn description(&self) -> &'static str;

    /// JSON schema of `Input`
    fn input_schema(&self) -> Result<Value> {
        Ok(serde_json::to_value(schemars::schema_for!(Self::Input))?)
    }

    async fn execute(&self, input: Self::Input) -> Result<Value>;

    /// Deserialize raw arguments and execute
    async fn call(&self, args: Value) -> Result<Value> {
        let input: Self::Input = serde_json::from_value(args)
            .map_err(|e| Error::InvalidInput(format!("{} arguments: {}", Self::NAME, e)))?;
        self.execute(input).await
    }
}
