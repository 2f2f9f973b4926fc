//! serde_json Decoder
//!
//! Default JsonDecoder.

use crate::domain::ports::JsonDecoder;
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeJsonDecoder;

impl JsonDecoder for SerdeJsonDecoder {
    fn decode(&self, text: &str) -> anyhow::Result<Value> {
        Ok(serde_json::from_str(text)?)
    }
}
