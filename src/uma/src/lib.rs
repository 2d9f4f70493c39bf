//! # UMA Authorization Engine
//!
//! Permission and policy negotiation for UMA 2.0 protected resources.
//!
//! ## Features
//!
//! - **Resource lookup** for internal resource types, created on first use
//!   and deduplicated on read
//! - **Sufficiency check** of RPT permissions, registering a permission
//!   ticket and answering `403 insufficient_scope` when they fall short
//! - **Scope policy evaluation** with plain conjunction or JsonLogic scope
//!   expressions, narrowing permissions to the scopes that passed
//! - **CEL policy scripts** through the built-in executor
//! - **Async persistence traits** with an in-memory reference store
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use uma_authz::{
//!     CelScriptExecutor, Client, InMemoryStore, ResourceType, Rpt, ScriptRegistry,
//!     UmaConfig, UmaEngine, UmaStores,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(InMemoryStore::new());
//!     store.add_client(Client::new("rp-1"));
//!
//!     let engine = UmaEngine::new(
//!         UmaConfig::with_issuer("https://as.example.com"),
//!         UmaStores::shared(store),
//!         Arc::new(CelScriptExecutor::new()),
//!         ScriptRegistry::new(),
//!     );
//!
//!     let rpt = Rpt::new("rpt-token", "rp-1");
//!     let result = engine
//!         .check_sufficiency(&rpt, &[], ResourceType::Scim, &["scim.users.read".to_string()])
//!         .await?;
//!
//!     if let Some(denied) = result.denied() {
//!         println!("ticket: {:?}", denied.ticket());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cel;
pub mod config;
pub mod engine;
pub mod error;
pub mod logic;
pub mod permission;
pub mod policy;
pub mod resource;
pub mod response;
pub mod scope;
pub mod store;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use cel::CelScriptExecutor;
pub use config::UmaConfig;
pub use engine::{UmaEngine, UmaStores};
pub use error::{Result, UmaError};
pub use permission::{Permission, PermissionStatus, Sufficiency};
pub use policy::{PolicyScript, PolicyScriptExecutor, ScopePolicyEvaluator, ScriptRegistry};
pub use resource::{Resource, ResourceType};
pub use response::{DeniedResponse, TicketResponse};
pub use scope::Scope;
pub use store::InMemoryStore;
pub use types::{Client, Rpt, ScopeId, ScopeRef, Ticket, UmaAuthorizationContext};
pub use validation::UmaValidator;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
