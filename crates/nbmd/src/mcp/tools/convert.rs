use super::{CallToolResult, Content, JsonRpcError};
use nbmd_core::convert::{ConversionResult, Direction};
use serde::Deserialize;

const INTERNAL_ERROR: i32 = -32603;

#[derive(Debug, Deserialize)]
struct ConvertArgs {
    #[serde(default)]
    source_path: Option<String>,
    #[serde(default)]
    output_dir: Option<String>,
}

/// Direction served by a conversion tool name.
fn tool_direction(name: &str) -> Option<Direction> {
    match name {
        "convert_notebook" => Some(Direction::NotebookToMarkdown),
        "convert_markdown" => Some(Direction::MarkdownToNotebook),
        _ => None,
    }
}

/// Run one conversion tool and wrap its result as text content.
///
/// The conversion itself already reports its own failures as a `ConversionResult`. Anything
/// that goes wrong around it (bad arguments, an unknown tool name, a failed or panicked
/// worker) is folded into the same `{status: "error", message}` shape here, so a tool call
/// always yields a result.
pub async fn handle_convert(
    name: &str,
    arguments: Option<serde_json::Value>,
    _global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    let result = match run_conversion(name, arguments).await {
        Ok(result) => result,
        Err(message) => {
            log::error!("Tool execution failed: {message}");
            ConversionResult::error(format!("Error occurred during tool execution: {message}"))
        }
    };

    to_text_result(&result)
}

async fn run_conversion(
    name: &str,
    arguments: Option<serde_json::Value>,
) -> Result<ConversionResult, String> {
    let args: ConvertArgs =
        serde_json::from_value(arguments.unwrap_or_else(|| serde_json::json!({})))
            .map_err(|e| format!("Invalid arguments: {e}"))?;

    let (source_path, output_dir) = match (args.source_path, args.output_dir) {
        (Some(source_path), Some(output_dir))
            if !source_path.is_empty() && !output_dir.is_empty() =>
        {
            (source_path, output_dir)
        }
        _ => return Err("source_path and output_dir are required arguments.".to_string()),
    };

    // Arguments are checked before the name
    let direction = tool_direction(name).ok_or_else(|| format!("Unknown tool name: {name}"))?;

    log::info!("Calling {direction:?} with source_path={source_path} output_dir={output_dir}");

    // Use spawn_blocking since conversions do synchronous file I/O
    tokio::task::spawn_blocking(move || {
        crate::convert::convert(direction, &source_path, &output_dir)
    })
    .await
    .map_err(|e| format!("Task join error: {e}"))
}

fn to_text_result(result: &ConversionResult) -> Result<serde_json::Value, JsonRpcError> {
    let json_string = serde_json::to_string_pretty(result).map_err(|e| JsonRpcError {
        code: INTERNAL_ERROR,
        message: format!("Serialization error: {e}"),
        data: None,
    })?;

    let result = CallToolResult {
        content: vec![Content::Text { text: json_string }],
        is_error: (!result.is_success()).then_some(true),
    };

    serde_json::to_value(result).map_err(|e| JsonRpcError {
        code: INTERNAL_ERROR,
        message: format!("Internal error: {e}"),
        data: None,
    })
}
