//! Classes, mixin sources, and instances.
//!
//! A [`Class`] is a named member table with an optional constructor, the
//! policies recorded for its members, and an optional parent it inherits
//! from. Composition produces a derived class whose parent is the target,
//! so members no mixin touches are still found through the parent link.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::{MixinError, Result};
use crate::{Member, MemberPolicies, Method};

type ConstructorFn = dyn Fn(&[Value]) -> Map<String, Value> + Send + Sync;

/// A class-like construct: constructor, member table, and member policies.
///
/// # Examples
///
/// ```
/// use mixin_compose_core::Class;
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let class = Arc::new(
///     Class::new("Counter")
///         .with_constructor(|args| {
///             let mut fields = serde_json::Map::new();
///             fields.insert("count".into(), args.first().cloned().unwrap_or(json!(0)));
///             fields
///         })
///         .with_method("count", |this, _| this.field("count").cloned().unwrap_or_default()),
/// );
///
/// let mut counter = class.instantiate(&[json!(3)]);
/// assert_eq!(counter.call("count", &[]).unwrap(), json!(3));
/// ```
#[derive(Clone)]
pub struct Class {
    name: String,
    constructor: Option<Arc<ConstructorFn>>,
    members: BTreeMap<String, Member>,
    policies: MemberPolicies,
    parent: Option<Arc<Class>>,
}

impl Class {
    /// Creates an empty class with no constructor and no members.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constructor: None,
            members: BTreeMap::new(),
            policies: MemberPolicies::new(),
            parent: None,
        }
    }

    /// Creates a class that inherits everything from `parent`.
    ///
    /// The derived class keeps the parent's name and policies, has no
    /// constructor of its own (construction delegates to the parent), and
    /// starts with an empty own member table.
    pub fn derive(parent: Arc<Class>) -> Self {
        Self {
            name: parent.name.clone(),
            constructor: None,
            members: BTreeMap::new(),
            policies: parent.policies.clone(),
            parent: Some(parent),
        }
    }

    /// Sets the constructor that builds instance fields from call arguments.
    pub fn with_constructor<F>(mut self, f: F) -> Self
    where
        F: Fn(&[Value]) -> Map<String, Value> + Send + Sync + 'static,
    {
        self.constructor = Some(Arc::new(f));
        self
    }

    /// Adds a method member.
    pub fn with_method<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut crate::Instance, &[Value]) -> Value + Send + Sync + 'static,
    {
        self.with_member(name, Method::new(f))
    }

    /// Adds a data member.
    pub fn with_value(self, name: impl Into<String>, value: Value) -> Self {
        self.with_member(name, value)
    }

    /// Adds (or replaces) an own member.
    pub fn with_member(mut self, name: impl Into<String>, member: impl Into<Member>) -> Self {
        self.members.insert(name.into(), member.into());
        self
    }

    /// Flags `name` as `override`. See [`override_member`](crate::override_member).
    pub fn with_override(mut self, name: &str) -> Self {
        self.policies.mark_override(name);
        self
    }

    /// Flags `name` as `cascade`. See [`cascade`](crate::cascade).
    pub fn with_cascade(mut self, name: &str) -> Self {
        self.policies.mark_cascade(name);
        self
    }

    /// Adds every flag in `policies` to this class.
    pub fn with_policies(mut self, policies: &MemberPolicies) -> Self {
        self.policies.extend(policies);
        self
    }

    /// Class name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The class this one inherits from, if any.
    pub fn parent(&self) -> Option<&Arc<Class>> {
        self.parent.as_ref()
    }

    /// Policies recorded for this class's members.
    pub fn policies(&self) -> &MemberPolicies {
        &self.policies
    }

    /// Mutable access to the recorded policies.
    pub fn policies_mut(&mut self) -> &mut MemberPolicies {
        &mut self.policies
    }

    /// Member defined directly on this class, ignoring the parent chain.
    pub fn own_member(&self, name: &str) -> Option<&Member> {
        self.members.get(name)
    }

    /// Members defined directly on this class, in name order.
    pub fn own_members(&self) -> impl Iterator<Item = (&str, &Member)> {
        self.members.iter().map(|(name, member)| (name.as_str(), member))
    }

    /// Resolves `name` on this class, then along the parent chain.
    pub fn member(&self, name: &str) -> Option<&Member> {
        let mut class = Some(self);
        while let Some(current) = class {
            if let Some(member) = current.members.get(name) {
                return Some(member);
            }
            class = current.parent.as_deref();
        }
        None
    }

    /// Returns `true` if `name` resolves anywhere in the chain.
    pub fn has_member(&self, name: &str) -> bool {
        self.member(name).is_some()
    }

    /// All member names visible on this class, including inherited ones.
    pub fn member_names(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        let mut class = Some(self);
        while let Some(current) = class {
            names.extend(current.members.keys().map(String::as_str));
            class = current.parent.as_deref();
        }
        names
    }

    /// Creates an instance, running the nearest constructor in the chain
    /// with `args`.
    pub fn instantiate(self: &Arc<Self>, args: &[Value]) -> Instance {
        Instance {
            class: Arc::clone(self),
            fields: self.construct(args),
        }
    }

    pub(crate) fn insert_member(&mut self, name: String, member: Member) {
        self.members.insert(name, member);
    }

    fn construct(&self, args: &[Value]) -> Map<String, Value> {
        let mut class = Some(self);
        while let Some(current) = class {
            if let Some(constructor) = &current.constructor {
                return constructor(args);
            }
            class = current.parent.as_deref();
        }
        Map::new()
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name)
            .field("has_constructor", &self.constructor.is_some())
            .field("members", &self.members)
            .field("policies", &self.policies)
            .field("parent", &self.parent.as_ref().map(|p| p.name.as_str()))
            .finish()
    }
}

/// A mixin source: a label for diagnostics and a member table.
///
/// # Examples
///
/// ```
/// use mixin_compose_core::Mixin;
/// use serde_json::json;
///
/// let readable = Mixin::named("Readable")
///     .with_method("get", |_, _| json!("get enabled"))
///     .with_method("head", |_, _| json!("head enabled"));
/// assert_eq!(readable.len(), 2);
/// assert!(readable.get("get").unwrap().is_callable());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Mixin {
    label: Option<String>,
    members: BTreeMap<String, Member>,
}

impl Mixin {
    /// Creates an unlabeled, empty mixin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty mixin with a label used in log output.
    pub fn named(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            members: BTreeMap::new(),
        }
    }

    /// Creates a data-only mixin from a JSON object.
    ///
    /// # Examples
    ///
    /// ```
    /// use mixin_compose_core::Mixin;
    /// use serde_json::json;
    ///
    /// let defaults = json!({"retries": 3, "headers": {"accept": "json"}});
    /// let mixin = Mixin::from_values(defaults.as_object().unwrap().clone());
    /// assert_eq!(mixin.len(), 2);
    /// ```
    pub fn from_values(values: Map<String, Value>) -> Self {
        values
            .into_iter()
            .map(|(name, value)| (name, Member::Value(value)))
            .collect()
    }

    /// Adds a method member.
    pub fn with_method<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut Instance, &[Value]) -> Value + Send + Sync + 'static,
    {
        self.with_member(name, Method::new(f))
    }

    /// Adds a data member.
    pub fn with_value(self, name: impl Into<String>, value: Value) -> Self {
        self.with_member(name, value)
    }

    /// Adds (or replaces) a member.
    pub fn with_member(mut self, name: impl Into<String>, member: impl Into<Member>) -> Self {
        self.members.insert(name.into(), member.into());
        self
    }

    /// Label given at construction, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Looks up a member by name.
    pub fn get(&self, name: &str) -> Option<&Member> {
        self.members.get(name)
    }

    /// Members in name order.
    pub fn members(&self) -> impl Iterator<Item = (&str, &Member)> {
        self.members.iter().map(|(name, member)| (name.as_str(), member))
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the mixin defines no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl FromIterator<(String, Member)> for Mixin {
    fn from_iter<I: IntoIterator<Item = (String, Member)>>(iter: I) -> Self {
        Self {
            label: None,
            members: iter.into_iter().collect(),
        }
    }
}

/// An instance of a [`Class`]: its class handle plus its own fields.
#[derive(Debug, Clone)]
pub struct Instance {
    class: Arc<Class>,
    fields: Map<String, Value>,
}

impl Instance {
    /// The class this instance was created from.
    pub fn class(&self) -> &Arc<Class> {
        &self.class
    }

    /// Shorthand for `self.class().name()`.
    pub fn class_name(&self) -> &str {
        self.class.name()
    }

    /// Instance field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Sets an instance field, returning the previous value.
    pub fn set_field(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(name.into(), value)
    }

    /// All instance fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Resolves a member through the instance's class chain.
    pub fn get(&self, name: &str) -> Option<&Member> {
        self.class.member(name)
    }

    /// Returns `true` if `name` resolves to a method.
    pub fn responds_to(&self, name: &str) -> bool {
        self.get(name).is_some_and(Member::is_callable)
    }

    /// Calls the method `name` with `args`.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownMember`](MixinError::UnknownMember) if no class in
    /// the chain defines `name`, or [`NotCallable`](MixinError::NotCallable)
    /// if it is a data member.
    pub fn call(&mut self, name: &str, args: &[Value]) -> Result<Value> {
        let method = match self.class.member(name) {
            Some(Member::Method(method)) => method.clone(),
            Some(Member::Value(_)) => return Err(MixinError::NotCallable(name.to_string())),
            None => return Err(MixinError::UnknownMember(name.to_string())),
        };
        Ok(method.call(self, args))
    }
}
