//! JSON-RPC request handlers.

use crate::server::AppState;
use appdock_library::{platform, AppdockError, InstallRequest};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, warn};

// User-facing messages rendered by the frontend, one per failure category.
const MSG_FILL_ALL: &str = "Please fill all fields!";
const MSG_INSTALL_OK: &str = "Installation completed successfully!";
const MSG_DELETE_OK: &str = "Application deleted successfully!";
const PREFIX_INSTALL_ERROR: &str = "Error during installation:";
const PREFIX_DELETE_ERROR: &str = "Error while deleting:";

/// JSON-RPC 2.0 request structure.
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 error structure.
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn error(id: Option<Value>, code: i32, message: String) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(JsonRpcError {
                code,
                message,
                data: None,
            }),
            id,
        }
    }
}

/// Health check endpoint.
pub async fn handle_health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

/// Main JSON-RPC handler.
pub async fn handle_rpc(
    State(state): State<Arc<AppState>>,
    Json(request): Json<JsonRpcRequest>,
) -> impl IntoResponse {
    let method = &request.method;
    let params = request.params.unwrap_or(Value::Object(Default::default()));
    let id = request.id.clone();

    debug!("RPC call: {}({:?})", method, params);

    let result = dispatch_method(&state, method, &params).await;

    match result {
        Ok(value) => (StatusCode::OK, Json(JsonRpcResponse::success(id, value))),
        Err(e) => {
            error!("RPC error for {}: {}", method, e);
            let code = e.to_rpc_error_code();
            (
                StatusCode::OK,
                Json(JsonRpcResponse::error(id, code, e.to_string())),
            )
        }
    }
}

// ============================================================================
// Helper macros for extracting parameters
// ============================================================================

/// Extract an optional string parameter, supporting both snake_case and camelCase.
macro_rules! get_str_param {
    ($params:expr, $snake:literal, $camel:literal) => {
        $params
            .get($snake)
            .or_else(|| $params.get($camel))
            .and_then(|v| v.as_str())
    };
}

/// Extract a required string parameter or return an error.
macro_rules! require_str_param {
    ($params:expr, $snake:literal, $camel:literal) => {
        match get_str_param!($params, $snake, $camel) {
            Some(s) => s.to_string(),
            None => {
                return Err(AppdockError::InvalidParams {
                    message: format!("Missing required parameter: {}", $snake),
                });
            }
        }
    };
}

// ============================================================================
// Method dispatcher
// ============================================================================

/// Dispatch a method call to the appropriate registry operation.
async fn dispatch_method(
    state: &AppState,
    method: &str,
    params: &Value,
) -> appdock_library::Result<Value> {
    match method {
        "health_check" => Ok(json!({"status": "ok"})),

        // ====================================================================
        // Applications
        // ====================================================================
        "list_applications" => {
            let mut apps = state.registry.list();
            // Directory enumeration order is OS-dependent; the UI wants a
            // stable listing.
            apps.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(json!({
                "success": true,
                "applications": apps
            }))
        }

        "install_application" => {
            let request = match build_install_request(params)? {
                Ok(request) => request,
                Err(response) => return Ok(response),
            };

            match state.registry.install(&request) {
                Ok(app) => Ok(json!({
                    "success": true,
                    "message": MSG_INSTALL_OK,
                    "app": app
                })),
                Err(e) => {
                    warn!("Install of {} failed: {}", request.name, e);
                    Ok(json!({
                        "success": false,
                        "error": format!("{} {}", PREFIX_INSTALL_ERROR, e)
                    }))
                }
            }
        }

        "update_application" => {
            let descriptor_path =
                require_str_param!(params, "descriptor_path", "descriptorPath");
            let request = match build_install_request(params)? {
                Ok(request) => request,
                Err(response) => return Ok(response),
            };

            match state
                .registry
                .update(PathBuf::from(&descriptor_path).as_path(), &request)
            {
                Ok(app) => Ok(json!({
                    "success": true,
                    "app": app
                })),
                Err(e) => {
                    warn!("Update of {:?} failed: {}", descriptor_path, e);
                    Ok(json!({
                        "success": false,
                        "error": format!("{} {}", PREFIX_INSTALL_ERROR, e)
                    }))
                }
            }
        }

        "delete_application" => {
            let descriptor_path =
                require_str_param!(params, "descriptor_path", "descriptorPath");

            match state.registry.delete(PathBuf::from(&descriptor_path).as_path()) {
                Ok(()) => Ok(json!({
                    "success": true,
                    "message": MSG_DELETE_OK
                })),
                Err(e) => {
                    warn!("Delete of {:?} failed: {}", descriptor_path, e);
                    Ok(json!({
                        "success": false,
                        "error": format!("{} {}", PREFIX_DELETE_ERROR, e)
                    }))
                }
            }
        }

        // ====================================================================
        // Frontend support
        // ====================================================================
        "get_default_install_dir" => {
            let path = platform::default_install_dir()?;
            Ok(json!({
                "success": true,
                "path": path
            }))
        }

        "list_cached_icons" => {
            let icons: Vec<Value> = state
                .icon_cache
                .cached_icons()
                .into_iter()
                .map(|(name, path)| json!({"name": name, "path": path}))
                .collect();
            Ok(json!({
                "success": true,
                "icons": icons
            }))
        }

        _ => {
            warn!("Method not found: {}", method);
            Err(AppdockError::Other(format!("Method not found: {}", method)))
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Assemble an [`InstallRequest`] from RPC parameters.
///
/// The outer error is a transport-level problem (bad parameter shape); the
/// inner `Err` carries the ready-to-return fill-all-fields response for
/// user-level validation failures, mirroring the frontend dialog check. A
/// missing `name` falls back to the payload file stem, a missing
/// `target_directory` to the default install directory.
fn build_install_request(
    params: &Value,
) -> appdock_library::Result<Result<InstallRequest, Value>> {
    let Some(appimage_path) = get_str_param!(params, "appimage_path", "appimagePath")
        .filter(|s| !s.trim().is_empty())
    else {
        return Ok(Err(fill_all_response()));
    };

    let Some(icon_path) =
        get_str_param!(params, "icon_path", "iconPath").filter(|s| !s.trim().is_empty())
    else {
        return Ok(Err(fill_all_response()));
    };

    let name = match get_str_param!(params, "name", "name") {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        Some(_) => return Ok(Err(fill_all_response())),
        // Fall back to the payload file name when no name was supplied
        None => match PathBuf::from(appimage_path)
            .file_stem()
            .and_then(|s| s.to_str())
            .map(String::from)
        {
            Some(stem) => stem,
            None => return Ok(Err(fill_all_response())),
        },
    };

    let target_dir = match get_str_param!(params, "target_directory", "targetDirectory") {
        Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        Some(_) => return Ok(Err(fill_all_response())),
        None => platform::default_install_dir()?,
    };

    Ok(Ok(InstallRequest {
        name,
        source_executable: PathBuf::from(appimage_path),
        source_icon: PathBuf::from(icon_path),
        target_dir,
    }))
}

fn fill_all_response() -> Value {
    json!({
        "success": false,
        "error": MSG_FILL_ALL
    })
}
