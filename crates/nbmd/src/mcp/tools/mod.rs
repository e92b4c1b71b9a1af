mod convert;

use serde::{Deserialize, Serialize};

// Re-export types needed by tool handlers
pub use super::{JsonRpcError, Tool};

// MCP Protocol types for tools
#[derive(Debug, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct ServerCapabilities {
    pub tools: Option<ToolsCapability>,
}

#[derive(Debug, Serialize)]
pub struct ToolsCapability {}

#[derive(Debug, Serialize)]
pub struct InitializeResult {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
}

#[derive(Debug, Serialize)]
pub struct ToolsList {
    pub tools: Vec<Tool>,
}

#[derive(Debug, Deserialize)]
pub struct CallToolParams {
    pub name: String,
    pub arguments: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct CallToolResult {
    pub content: Vec<Content>,
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum Content {
    #[serde(rename = "text")]
    Text { text: String },
}

pub fn handle_initialize() -> Result<serde_json::Value, JsonRpcError> {
    let result = InitializeResult {
        protocol_version: "2024-11-05".to_string(),
        capabilities: ServerCapabilities {
            tools: Some(ToolsCapability {}),
        },
        server_info: ServerInfo {
            name: "nbmd".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    };

    serde_json::to_value(result).map_err(|e| JsonRpcError {
        code: -32603,
        message: format!("Internal error: {e}"),
        data: None,
    })
}

fn conversion_schema(source_description: &str, output_description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "source_path": {
                "type": "string",
                "description": source_description
            },
            "output_dir": {
                "type": "string",
                "description": output_description
            }
        },
        "required": ["source_path", "output_dir"]
    })
}

pub fn handle_tools_list() -> Result<serde_json::Value, JsonRpcError> {
    let tools = vec![
        Tool {
            name: "convert_notebook".to_string(),
            description: "Convert Jupyter Notebook (.ipynb) files to clean Markdown (.md). Code execution results are excluded. Adjacent markdown cells are separated by a <!-- NOTEBOOK_CELL_BOUNDARY --> marker so they can be restored by convert_markdown.".to_string(),
            input_schema: conversion_schema(
                "Full path to the .ipynb file to convert (e.g., '/home/user/notebook.ipynb')",
                "Folder path to save the converted .md file (e.g., '/home/user/output'). Created if missing.",
            ),
        },
        Tool {
            name: "convert_markdown".to_string(),
            description: "Convert Markdown (.md, .markdown) files to Jupyter Notebook (.ipynb). Fenced code blocks are converted to code cells, everything else to markdown cells.".to_string(),
            input_schema: conversion_schema(
                "Full path to the .md file to convert (e.g., '/home/user/document.md')",
                "Folder path to save the converted .ipynb file (e.g., '/home/user/notebooks'). Created if missing.",
            ),
        },
    ];

    let result = ToolsList { tools };

    serde_json::to_value(result).map_err(|e| JsonRpcError {
        code: -32603,
        message: format!("Internal error: {e}"),
        data: None,
    })
}

pub async fn handle_tools_call(
    params: Option<serde_json::Value>,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    let params: CallToolParams = serde_json::from_value(params.unwrap_or(serde_json::Value::Null))
        .map_err(|e| JsonRpcError {
            code: -32602,
            message: format!("Invalid params: {e}"),
            data: None,
        })?;

    log::debug!("Calling tool: {}", params.name);

    convert::handle_convert(&params.name, params.arguments, global).await
}
