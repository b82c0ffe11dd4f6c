use crate::protocol::ContentBlock;
use crate::tool::ToolOutput;
use serde_json::Value;

/// Render a handler result as MCP content: always exactly one text block.
pub fn adapt(output: ToolOutput) -> Vec<ContentBlock> {
    let text = match output {
        ToolOutput::Text(text) => text,
        ToolOutput::Structured(Value::String(text)) => text,
        ToolOutput::Structured(value) => {
            serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
        }
    };
    vec![ContentBlock::text(text)]
}
