//! MCP server exposing the documentation tools.

use crate::state::DocState;
use crate::tools::inspect::{InspectDocRequest, handle_inspect_doc};
use crate::tools::markup::{SearchMarkupRequest, handle_search_markup};
use crate::tools::reload::{ReloadIndexRequest, handle_reload_index};
use crate::tools::search::{SearchDocsRequest, handle_search_docs};
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars::{self, JsonSchema, generate::SchemaSettings},
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

/// MCP server for PyTgCalls and NTgCalls documentation
#[derive(Clone)]
pub struct DocServer {
    /// Shared documentation state (snapshot records, optional page map)
    state: Arc<DocState>,

    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for DocServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocServer")
            .field("state", &self.state)
            .finish()
    }
}

#[tool_router]
impl DocServer {
    pub fn new(state: DocState) -> Self {
        Self {
            state: Arc::new(state),
            tool_router: Self::tool_router(),
        }
    }

    pub fn doc_state(&self) -> &Arc<DocState> {
        &self.state
    }

    #[tool(
        description = "Search the PyTgCalls and NTgCalls documentation by keyword. Ranks pages by where the query appears (title, signature, library, description, parameters, members) and returns the best matches rendered as chat HTML or plain text.",
        input_schema = inline_schema_for_type::<SearchDocsRequest>()
    )]
    async fn search_docs(
        &self,
        Parameters(request): Parameters<SearchDocsRequest>,
    ) -> std::result::Result<String, String> {
        handle_search_docs(&self.state, request).await
    }

    #[tool(
        description = "Show the documentation page at an exact path such as '/PyTgCalls/Client/Stream Methods/play.xml'. Unknown paths return the closest known paths.",
        input_schema = inline_schema_for_type::<InspectDocRequest>()
    )]
    async fn inspect_doc(
        &self,
        Parameters(request): Parameters<InspectDocRequest>,
    ) -> std::result::Result<String, String> {
        handle_inspect_doc(&self.state, request).await
    }

    #[tool(
        description = "Search the raw page markup instead of the normalized snapshot, with a preview per page and an overview (signature, return type, examples, members, methods) of the best match. Only available when the server runs with markup search enabled.",
        input_schema = inline_schema_for_type::<SearchMarkupRequest>()
    )]
    async fn search_markup(
        &self,
        Parameters(request): Parameters<SearchMarkupRequest>,
    ) -> std::result::Result<String, String> {
        handle_search_markup(&self.state, request).await
    }

    #[tool(description = "Reload the documentation snapshot from disk after it was rebuilt.")]
    async fn reload_index(
        &self,
        Parameters(request): Parameters<ReloadIndexRequest>,
    ) -> std::result::Result<String, String> {
        handle_reload_index(&self.state, request).await
    }
}

#[tool_handler]
impl ServerHandler for DocServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_protocol_version(ProtocolVersion::V_2024_11_05)
            .with_server_info(Implementation::from_build_env())
            .with_instructions(
                "tgcalls-docs: documentation for the PyTgCalls and NTgCalls libraries. \
                 Use search_docs to find methods, types and enums by keyword, then inspect_doc \
                 with a page path for the full entry. Run reload_index after rebuilding the snapshot."
                    .to_string(),
            )
    }
}

/// Generate an inline JSON schema for MCP tools
///
/// Unlike rmcp's default `schema_for_type()`, this sets `inline_subschemas = true`
/// so enums such as the output format are inlined instead of emitted as `$ref`.
pub fn inline_schema_for_type<T: JsonSchema>() -> Arc<JsonObject> {
    let mut settings = SchemaSettings::draft07();
    settings.transforms = vec![Box::new(schemars::transform::AddNullable::default())];
    settings.inline_subschemas = true;

    let generator = settings.into_generator();
    let schema = generator.into_root_schema_for::<T>();

    let json_object = match serde_json::to_value(schema) {
        Ok(serde_json::Value::Object(object)) => object,
        _ => {
            tracing::error!(
                "Schema for {} did not serialize to an object",
                std::any::type_name::<T>()
            );
            let mut fallback = JsonObject::new();
            fallback.insert("type".to_string(), serde_json::Value::String("object".to_string()));
            fallback
        }
    };

    Arc::new(json_object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    #[test]
    fn format_enum_is_inlined() {
        let schema = inline_schema_for_type::<SearchDocsRequest>();
        let text = serde_json::to_string(&*schema).unwrap();
        check!(!text.contains("$ref"));
        check!(text.contains("\"html\""));
        check!(text.contains("\"text\""));
    }

    #[test]
    fn required_fields_are_listed() {
        let schema = inline_schema_for_type::<InspectDocRequest>();
        let required = schema.get("required").and_then(|v| v.as_array()).cloned().unwrap_or_default();
        check!(required == vec![serde_json::Value::String("path".to_string())]);
    }
}
