#![forbid(unsafe_code)]
//! Back-office model SSOT.
//!
//! ```compile_fail
//! use backoffice_model::EntityKind;
//!
//! fn exhaustive_match(kind: EntityKind) -> &'static str {
//!     match kind {
//!         EntityKind::Contract => "c",
//!         EntityKind::CashSession => "s",
//!         EntityKind::CashTransaction => "t",
//!         EntityKind::CariDocument => "d",
//!         EntityKind::Journal => "j",
//!     }
//! }
//! ```

mod event;
mod kind;
mod permission;
mod status;
mod validation;

pub use event::{events_from_json_value, LifecycleEvent};
pub use kind::EntityKind;
pub use permission::{PermissionSet, PERMISSION_CODE_MAX_LEN};
pub use status::StatusCode;
pub use validation::ValidationError;

pub const CRATE_NAME: &str = "backoffice-model";
