use axum::response::Json;
use serde_json::{json, Value};

use crate::names::MAX_NAME_LEN;

/// `GET /openapi.json`
pub async fn openapi_handler() -> Json<Value> {
    Json(openapi_document())
}

fn name_param(name: &str, what: &str) -> Value {
    json!({
        "name": name,
        "in": "path",
        "required": true,
        "description": format!("{what} name (alphanumeric, hyphens, underscores, max {MAX_NAME_LEN} chars)"),
        "schema": { "type": "string", "pattern": format!("^[a-zA-Z0-9_-]{{1,{MAX_NAME_LEN}}}$") }
    })
}

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": { "schema": { "$ref": "#/components/schemas/Error" } }
        }
    })
}

/// OpenAPI 3.0 description of the document API.
pub fn openapi_document() -> Value {
    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "JustDoc API",
            "description": "Simple JSON document storage API",
            "version": env!("CARGO_PKG_VERSION"),
            "license": { "name": "MIT" }
        },
        "servers": [{ "url": "/", "description": "Current server" }],
        "paths": paths(),
        "components": components()
    })
}

fn paths() -> Value {
    let channel = name_param("channel", "Channel");
    let document = name_param("document", "Document");

    json!({
        "/": {
            "get": {
                "summary": "List all channels",
                "operationId": "listChannels",
                "tags": ["Channels"],
                "responses": {
                    "200": {
                        "description": "Channels with document counts, sorted by name",
                        "content": {
                            "application/json": {
                                "schema": {
                                    "type": "array",
                                    "items": { "$ref": "#/components/schemas/ChannelInfo" }
                                }
                            }
                        }
                    }
                }
            }
        },
        "/{channel}/": {
            "get": {
                "summary": "List documents in a channel",
                "operationId": "listDocuments",
                "tags": ["Channels"],
                "parameters": [channel.clone()],
                "responses": {
                    "200": {
                        "description": "Document names, sorted",
                        "content": {
                            "application/json": {
                                "schema": { "type": "array", "items": { "type": "string" } }
                            }
                        }
                    },
                    "400": error_response("Invalid channel name"),
                    "404": error_response("Channel not found")
                }
            }
        },
        "/{channel}/{document}": {
            "get": {
                "summary": "Get a document",
                "operationId": "getDocument",
                "tags": ["Documents"],
                "parameters": [channel.clone(), document.clone()],
                "responses": {
                    "200": {
                        "description": "The stored JSON document, byte for byte",
                        "content": { "application/json": { "schema": {} } }
                    },
                    "400": error_response("Invalid channel or document name"),
                    "404": error_response("Document not found")
                }
            },
            "post": {
                "summary": "Create or replace a document",
                "operationId": "putDocument",
                "tags": ["Documents"],
                "parameters": [channel, document],
                "requestBody": {
                    "required": true,
                    "content": { "application/json": { "schema": {} } }
                },
                "responses": {
                    "200": {
                        "description": "Document updated",
                        "content": {
                            "application/json": { "schema": { "$ref": "#/components/schemas/WriteResponse" } }
                        }
                    },
                    "201": {
                        "description": "Document created",
                        "content": {
                            "application/json": { "schema": { "$ref": "#/components/schemas/WriteResponse" } }
                        }
                    },
                    "400": error_response("Invalid name or invalid JSON body"),
                    "413": error_response("Request body too large")
                }
            }
        }
    })
}

fn components() -> Value {
    json!({
        "schemas": {
            "ChannelInfo": {
                "type": "object",
                "required": ["name", "document_count"],
                "properties": {
                    "name": { "type": "string" },
                    "document_count": { "type": "integer", "minimum": 0 }
                }
            },
            "WriteResponse": {
                "type": "object",
                "required": ["status", "channel", "document"],
                "properties": {
                    "status": { "type": "string", "enum": ["created", "updated"] },
                    "channel": { "type": "string" },
                    "document": { "type": "string" }
                }
            },
            "Error": {
                "type": "object",
                "required": ["error", "message"],
                "properties": {
                    "error": {
                        "type": "string",
                        "enum": ["invalid_json", "invalid_name", "not_found", "payload_too_large", "internal_error"]
                    },
                    "message": { "type": "string" }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route() {
        let doc = openapi_document();
        let paths = doc["paths"].as_object().unwrap();
        assert!(paths.contains_key("/"));
        assert!(paths.contains_key("/{channel}/"));
        assert!(paths["/{channel}/{document}"].get("get").is_some());
        assert!(paths["/{channel}/{document}"].get("post").is_some());
    }

    #[test]
    fn name_pattern_matches_validator() {
        let doc = openapi_document();
        let pattern = &doc["paths"]["/{channel}/"]["get"]["parameters"][0]["schema"]["pattern"];
        assert_eq!(pattern, "^[a-zA-Z0-9_-]{1,128}$");
    }
}
