//! VM management endpoints.
//!
//! This module provides handlers for listing, creating and acting on VMs.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use kubevirt_manager_control::VmManager;

use crate::error::ApiError;
use crate::state::GatewayState;

// =============================================================================
// Request Types
// =============================================================================

/// Query parameters shared by the VM endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct NamespaceQuery {
    /// Target namespace; the configured default when absent.
    #[serde(default)]
    pub namespace: Option<String>,
}

/// Query parameters for `POST /vms/:name`.
#[derive(Debug, Default, Deserialize)]
pub struct ActionQuery {
    /// Action to apply. Only `start` is supported.
    #[serde(default)]
    pub action: Option<String>,
    /// Target namespace; the configured default when absent.
    #[serde(default)]
    pub namespace: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// List the VMs of a namespace.
///
/// # Example
///
/// ```text
/// GET /vms?namespace=default
///
/// Response: 200 OK
/// {
///   "vms": [
///     { "name": "jevenvm", "running": true, "memory": "256M", ... }
///   ]
/// }
/// ```
///
/// # Errors
///
/// Returns a 500 if the orchestrator call fails.
pub async fn list_vms<M>(
    State(state): State<Arc<GatewayState<M>>>,
    Query(query): Query<NamespaceQuery>,
) -> Result<impl IntoResponse, ApiError>
where
    M: VmManager + 'static,
{
    let namespace = state.config.namespace_or_default(query.namespace.as_deref());
    let list = state.manager.list(namespace).await?;

    Ok(Json(list))
}

/// Create a VM from the configured template.
///
/// # Errors
///
/// Returns a 500 if a VM with the template's name already exists or the
/// orchestrator rejects the object.
pub async fn create_vm<M>(
    State(state): State<Arc<GatewayState<M>>>,
    Query(query): Query<NamespaceQuery>,
) -> Result<impl IntoResponse, ApiError>
where
    M: VmManager + 'static,
{
    let namespace = state.config.namespace_or_default(query.namespace.as_deref());
    let vm = state.manager.create_vm(namespace).await?;

    Ok((StatusCode::CREATED, Json(vm)))
}

/// Apply a lifecycle action to a VM.
///
/// # Example
///
/// ```text
/// POST /vms/jevenvm?action=start
///
/// Response: 200 OK
/// "start"
/// ```
///
/// # Errors
///
/// Returns a 400 for a missing or unsupported action and a 500 if the
/// orchestrator call fails.
pub async fn vm_action<M>(
    State(state): State<Arc<GatewayState<M>>>,
    Path(name): Path<String>,
    Query(query): Query<ActionQuery>,
) -> Result<impl IntoResponse, ApiError>
where
    M: VmManager + 'static,
{
    let namespace = state.config.namespace_or_default(query.namespace.as_deref());
    let action = state
        .manager
        .action(namespace, &name, query.action.as_deref().unwrap_or_default())
        .await?;

    Ok(Json(action))
}
