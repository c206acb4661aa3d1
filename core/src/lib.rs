//! Class composition from mixin sources.
//!
//! This crate layers the members of ordered *mixin* sources onto a target
//! class at definition time:
//!
//! - [`Class`] — a named member table with a constructor, member policies,
//!   and an optional parent it inherits from.
//! - [`Mixin`] — a member table contributed to a target class.
//! - [`Member`] — either a [`Method`] or a data value (`serde_json::Value`).
//! - [`Instance`] — a constructed class, dispatching calls through the
//!   class chain.
//!
//! Composition ([`mixin`], [`Composer::apply`]) resolves each member name
//! by the [`MemberPolicy`] recorded on the target with [`override_member`]
//! or [`cascade`]. Cascade results are collected with [`flatten`].
//!
//! # Example
//!
//! ```
//! use mixin_compose_core::*;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let writeable = Mixin::named("Writeable").with_method("delete", |_, _| json!("D1"));
//! let audit = Mixin::named("Audit").with_method("delete", |_, _| json!("D2"));
//!
//! let api = Class::new("Api").with_method("delete", |_, _| json!("D3"));
//! let api = cascade(api, "delete");
//!
//! let api = Arc::new(mixin([writeable, audit]).apply(api).unwrap());
//! let mut instance = api.instantiate(&[]);
//! assert_eq!(instance.call("delete", &[]).unwrap(), json!(["D1", "D2", "D3"]));
//! ```

mod class;
mod compose;
mod error;
mod flatten;
mod policy;
mod types;

pub use class::{Class, Instance, Mixin};
pub use compose::{Composer, mixin};
pub use error::{MixinError, Result};
pub use flatten::flatten;
pub use policy::{MemberPolicies, MemberPolicy, cascade, override_member};
pub use types::{Member, Method};
