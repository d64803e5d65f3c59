//! MCP Tools module - defines tools exposed via JSON-RPC.
//!
//! Each tool provides a descriptor (name, description, input schema),
//! argument parsing and validation, and wraps the Paperless tool's text result.

pub mod paperless;
pub mod registry;

pub use registry::{ToolDescriptor, ToolRegistry};
