//! Mixin composition with per-member conflict policies.
//!
//! [`mixin`] captures an ordered list of [`Mixin`] sources and returns a
//! [`Composer`]. Applying the composer to a target [`Class`] builds a derived
//! class whose member table is resolved per name:
//!
//! - **Replace** (no flag): the latest mixin in supply order wins, over
//!   earlier mixins and over the target.
//! - **Override**: the target's own member is kept; mixins are ignored.
//! - **Cascade**: methods are chained (mixins in supply order, target last)
//!   and their results flattened into one array; objects and arrays are
//!   shallow-merged into a fresh object, mixins winning over the target.
//!
//! # Example
//!
//! ```
//! use mixin_compose_core::*;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let readable = Mixin::named("Readable").with_method("get", |_, _| json!("G"));
//! let writeable = Mixin::named("Writeable").with_method("post", |_, _| json!("P"));
//!
//! let api = Class::new("Api").with_method("get", |_, _| json!("X"));
//! let api = Arc::new(mixin([readable, writeable]).apply(api).unwrap());
//!
//! let mut instance = api.instantiate(&[]);
//! assert_eq!(instance.call("get", &[]).unwrap(), json!("G"));
//! assert_eq!(instance.call("post", &[]).unwrap(), json!("P"));
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, trace};

use crate::error::{MixinError, Result};
use crate::{Class, Member, MemberPolicy, Method, Mixin, flatten};

/// Captures mixins in supply order; see [`Composer::apply`].
///
/// # Examples
///
/// ```
/// use mixin_compose_core::*;
/// use serde_json::json;
///
/// let composer = mixin([Mixin::new().with_value("version", json!(2))]);
/// assert_eq!(composer.mixins().len(), 1);
/// ```
pub fn mixin<I>(mixins: I) -> Composer
where
    I: IntoIterator<Item = Mixin>,
{
    Composer {
        mixins: mixins.into_iter().collect(),
    }
}

/// A reusable transformer from a target class to a composed class.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    mixins: Vec<Mixin>,
}

impl Composer {
    /// Creates a composer with no mixins.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a mixin after the ones already captured.
    pub fn with(mut self, mixin: Mixin) -> Self {
        self.mixins.push(mixin);
        self
    }

    /// Mixins in supply order.
    pub fn mixins(&self) -> &[Mixin] {
        &self.mixins
    }

    /// Builds a class derived from `target` with the mixins layered in.
    ///
    /// The derived class keeps the target as its parent, so construction and
    /// members no mixin names are inherited unchanged. Neither the target
    /// nor any mixin is modified.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCascadeTarget`](MixinError::InvalidCascadeTarget)
    /// when a `cascade` member receives a scalar mixin value (boolean,
    /// number, or string). Nothing is built in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use mixin_compose_core::*;
    /// use serde_json::json;
    ///
    /// let target = Class::new("Api")
    ///     .with_method("delete", |_, _| json!("D3"))
    ///     .with_cascade("delete");
    /// let bad = Mixin::new().with_value("delete", json!(42));
    ///
    /// let err = mixin([bad]).apply(target).unwrap_err();
    /// assert!(matches!(
    ///     err,
    ///     MixinError::InvalidCascadeTarget { ref member, .. } if member == "delete"
    /// ));
    /// ```
    pub fn apply(&self, target: impl Into<Arc<Class>>) -> Result<Class> {
        let target = target.into();
        debug!(
            class = %target.name(),
            mixins = self.mixins.len(),
            "Composing mixins"
        );

        let contributions = self.contributions();
        check_cascades(&target, &contributions)?;

        let mut derived = Class::derive(Arc::clone(&target));
        for (name, members) in contributions {
            let policy = target.policies().policy_for(name);
            let resolved = match policy {
                MemberPolicy::Override => target.member(name).cloned(),
                MemberPolicy::Cascade => Some(cascade_member(target.member(name), &members)),
                MemberPolicy::Replace => members.last().map(|member| (*member).clone()),
            };
            trace!(
                class = %target.name(),
                member = name,
                policy = ?policy,
                contributions = members.len(),
                "Resolved member"
            );
            if let Some(member) = resolved {
                derived.insert_member(name.to_string(), member);
            }
        }

        Ok(derived)
    }

    /// Mixin members grouped by name, each group in supply order.
    fn contributions(&self) -> BTreeMap<&str, Vec<&Member>> {
        let mut by_name: BTreeMap<&str, Vec<&Member>> = BTreeMap::new();
        for mixin in &self.mixins {
            trace!(
                mixin = mixin.label().unwrap_or("<anonymous>"),
                members = mixin.len(),
                "Collecting mixin"
            );
            for (name, member) in mixin.members() {
                by_name.entry(name).or_default().push(member);
            }
        }
        by_name
    }
}

fn check_cascades(target: &Class, contributions: &BTreeMap<&str, Vec<&Member>>) -> Result<()> {
    for (name, members) in contributions {
        if target.policies().policy_for(name) != MemberPolicy::Cascade {
            continue;
        }
        let invalid = members
            .iter()
            .find(|member| !member.is_callable() && member.structured_fields().is_none());
        if let Some(member) = invalid {
            return Err(MixinError::InvalidCascadeTarget {
                member: (*name).to_string(),
                kind: member.kind(),
            });
        }
    }
    Ok(())
}

/// Resolves a cascade member from the target's own member and the mixin
/// contributions (already checked to be methods or structured values).
///
/// When both methods and structured values are contributed the method chain
/// wins.
fn cascade_member(own: Option<&Member>, contributions: &[&Member]) -> Member {
    let mut links: Vec<Method> = contributions
        .iter()
        .filter_map(|member| member.as_method().cloned())
        .collect();

    if links.is_empty() {
        let mut merged = own.and_then(Member::structured_fields).unwrap_or_default();
        for fields in contributions.iter().filter_map(|member| member.structured_fields()) {
            merged.extend(fields);
        }
        return Member::Value(Value::Object(merged));
    }

    // Target's own method runs last; a missing or data member ends the
    // chain at the last mixin.
    links.extend(own.and_then(Member::as_method).cloned());
    Member::Method(Method::new(move |this, args| {
        let results: Vec<Value> = links.iter().map(|link| link.call(this, args)).collect();
        Value::Array(flatten(&results))
    }))
}
