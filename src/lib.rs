//! Script Filter Schemas
//!
//! Typed shapes for a desktop launcher's script-filter extension mechanism.
//! A host launcher runs a child script with a set of environment variables,
//! and the script answers with a JSON document listing result rows.
//!
//! ## Contracts
//!
//! - **Environment**: [`ScriptEnvironmentVariables`] describes the `alfred_*`
//!   variables the host injects into the script's process.
//! - **Result document**: [`ScriptFilter`] and its nested [`ScriptFilterItem`]
//!   describe the JSON the script writes to standard output.
//!
//! ## Layout
//!
//! ```text
//! ScriptFilter
//! ├── variables      { name: value }
//! ├── rerun          seconds
//! └── items[]        ScriptFilterItem
//!     ├── ItemFields  uid, title, subtitle, arg, icon, valid, match,
//!     │               autocomplete, type, action, text, quicklookurl,
//!     │               variables
//!     └── mods        { fn | ctrl | opt | cmd | shift: ItemFields }
//! ```
//!
//! The host validates what it receives. These types only encode what Rust
//! can express statically: closed string sets, required fields and the
//! literal debug flag.

pub mod action;
pub mod config;
pub mod env;
pub mod error;
pub mod filter;
pub mod item;

pub use action::{Action, ScriptFilterItemAction};
pub use config::{OutputFormat, ScriptFilterConfig};
pub use env::{BundleStorage, DebugFlag, ScriptEnvironmentVariables};
pub use error::{Result, SchemaError};
pub use filter::{ScriptFilter, RERUN_SECONDS};
pub use item::{
    Arg, FilterItemIcon, IconType, ItemFields, ItemText, ItemType, Modifier, ModifierItem,
    ScriptFilterItem,
};
