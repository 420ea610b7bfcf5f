//! JSON-RPC message types.
//!
//! This module defines the bodies POSTed to, and returned by, the web
//! server's `/json` endpoint.
//!
//! # Protocol Overview
//!
//! | Message | Direction | Shape |
//! |---------|-----------|-------|
//! | [`Request`] | Client → Server | `{method, params, id}` |
//! | [`Response`] | Server → Client | `{result, error, id}` |
//!
//! Methods follow `namespace.method` format:
//!
//! - `system.listMethods`
//! - `web.update_ui`
//! - `core.get_torrents_status`
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `keys` | Status keys requested by the views |
//! | `method` | Dotted method names |
//! | `request` | Request, Response and RpcError |

// ============================================================================
// Submodules
// ============================================================================

/// Status keys requested by the display components.
pub mod keys;

/// Dotted method names.
pub mod method;

/// Request and Response message types.
pub mod request;

// ============================================================================
// Re-exports
// ============================================================================

pub use keys::DetailTab;
pub use method::MethodName;
pub use request::{
    BAD_REQUEST_CODE, CALL_FAILED_CODE, CALL_RAISED_CODE, NOT_AUTHENTICATED_CODE, Request,
    Response, RpcError, TRANSPORT_ERROR_CODE, UNKNOWN_METHOD_CODE,
};
