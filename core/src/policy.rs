//! Per-member conflict policies and the annotation recorders.
//!
//! A class carries a [`MemberPolicies`] value listing which member names are
//! `override` and which are `cascade`. [`override_member`] and [`cascade`]
//! record those flags; the composer reads them when mixins are applied.
//!
//! Policies are plain data and can also be declared in YAML or JSON:
//!
//! ```yaml
//! overrides:
//!   - get
//! cascades:
//!   - delete
//!   - defaults
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::Class;
use crate::error::Result;

/// How a member interacts with mixins that define the same name.
///
/// # Examples
///
/// ```
/// use mixin_compose_core::MemberPolicy;
///
/// assert_eq!(MemberPolicy::default(), MemberPolicy::Replace);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MemberPolicy {
    /// Keep the target's own member and ignore every mixin contribution.
    Override,
    /// Chain methods (mixins first, target last) or shallow-merge objects.
    Cascade,
    /// Mixin members replace the target's (the default).
    #[default]
    Replace,
}

/// The override and cascade flags recorded for a class.
///
/// A name present in both sets resolves to [`MemberPolicy::Override`].
///
/// # Examples
///
/// ```
/// use mixin_compose_core::{MemberPolicies, MemberPolicy};
///
/// let policies = MemberPolicies::from_yaml_str("overrides: [get]\ncascades: [delete]\n").unwrap();
/// assert_eq!(policies.policy_for("get"), MemberPolicy::Override);
/// assert_eq!(policies.policy_for("delete"), MemberPolicy::Cascade);
/// assert_eq!(policies.policy_for("head"), MemberPolicy::Replace);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberPolicies {
    /// Members whose target implementation always wins.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub overrides: BTreeSet<String>,
    /// Members whose mixin contributions are chained or merged.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub cascades: BTreeSet<String>,
}

impl MemberPolicies {
    /// Creates an empty policy set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flags `name` as `override`. Repeating the call has no further effect.
    pub fn mark_override(&mut self, name: impl Into<String>) {
        self.overrides.insert(name.into());
    }

    /// Flags `name` as `cascade`. Repeating the call has no further effect.
    pub fn mark_cascade(&mut self, name: impl Into<String>) {
        self.cascades.insert(name.into());
    }

    /// Resolves the policy for `name`.
    pub fn policy_for(&self, name: &str) -> MemberPolicy {
        if self.overrides.contains(name) {
            MemberPolicy::Override
        } else if self.cascades.contains(name) {
            MemberPolicy::Cascade
        } else {
            MemberPolicy::Replace
        }
    }

    /// Returns `true` when no member is flagged.
    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty() && self.cascades.is_empty()
    }

    /// Adds every flag from `other` to this set.
    pub fn extend(&mut self, other: &MemberPolicies) {
        self.overrides.extend(other.overrides.iter().cloned());
        self.cascades.extend(other.cascades.iter().cloned());
    }

    /// Parses policies from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`Yaml`](crate::MixinError::Yaml) if the text is not a valid
    /// policy document.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Parses policies from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`Json`](crate::MixinError::Json) if the text is not a valid
    /// policy document.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serializes the policies as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Yaml`](crate::MixinError::Yaml) if serialization fails.
    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Records that `name` keeps the class's own implementation when mixins
/// define the same member.
///
/// # Examples
///
/// ```
/// use mixin_compose_core::{Class, MemberPolicy, override_member};
///
/// let class = override_member(Class::new("Api"), "get");
/// assert_eq!(class.policies().policy_for("get"), MemberPolicy::Override);
/// ```
pub fn override_member(mut class: Class, name: &str) -> Class {
    class.policies_mut().mark_override(name);
    class
}

/// Records that `name` chains (methods) or merges (objects) mixin
/// contributions with the class's own member.
///
/// # Examples
///
/// ```
/// use mixin_compose_core::{Class, MemberPolicy, cascade};
///
/// let class = cascade(Class::new("Api"), "delete");
/// assert_eq!(class.policies().policy_for("delete"), MemberPolicy::Cascade);
/// ```
pub fn cascade(mut class: Class, name: &str) -> Class {
    class.policies_mut().mark_cascade(name);
    class
}
