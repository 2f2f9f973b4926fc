//! JSON Decoder Port

use serde_json::Value;

/// Decodes a response body into JSON.
///
/// Any `Fn(&str) -> anyhow::Result<Value>` closure satisfies this trait.
pub trait JsonDecoder: Send + Sync {
    fn decode(&self, text: &str) -> anyhow::Result<Value>;
}

impl<F> JsonDecoder for F
where
    F: Fn(&str) -> anyhow::Result<Value> + Send + Sync,
{
    fn decode(&self, text: &str) -> anyhow::Result<Value> {
        self(text)
    }
}
