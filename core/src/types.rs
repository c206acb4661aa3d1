//! Member type definitions.
//!
//! A class or mixin is a table from member name to [`Member`]. A member is
//! either a [`Method`] (shared callable) or a plain data [`Value`].

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::Instance;

type MethodFn = dyn Fn(&mut Instance, &[Value]) -> Value + Send + Sync;

/// A shared callable member.
///
/// Methods receive the instance they were called on and the call arguments.
/// Cloning a method is cheap and keeps pointing at the same function, which
/// [`ptr_eq`](Method::ptr_eq) can observe.
///
/// # Examples
///
/// ```
/// use mixin_compose_core::{Class, Method};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let greet = Method::new(|this, args| {
///     json!(format!("{} greets {}", this.class_name(), args[0].as_str().unwrap_or("?")))
/// });
/// let class = Arc::new(Class::new("Host"));
/// let mut instance = class.instantiate(&[]);
/// assert_eq!(greet.call(&mut instance, &[json!("you")]), json!("Host greets you"));
/// ```
#[derive(Clone)]
pub struct Method(Arc<MethodFn>);

impl Method {
    /// Wraps a closure as a method.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut Instance, &[Value]) -> Value + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Invokes the method on `this` with `args`.
    pub fn call(&self, this: &mut Instance, args: &[Value]) -> Value {
        (self.0)(this, args)
    }

    /// Returns `true` if both handles point at the same function.
    pub fn ptr_eq(&self, other: &Method) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Method(..)")
    }
}

/// A named entry in a class or mixin member table.
#[derive(Debug, Clone)]
pub enum Member {
    /// Callable member.
    Method(Method),
    /// Data member (scalar, array, or object).
    Value(Value),
}

impl Member {
    /// Returns `true` for methods.
    pub fn is_callable(&self) -> bool {
        matches!(self, Member::Method(_))
    }

    /// Returns the method, if this member is one.
    pub fn as_method(&self) -> Option<&Method> {
        match self {
            Member::Method(method) => Some(method),
            Member::Value(_) => None,
        }
    }

    /// Returns the data value, if this member holds one.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Member::Value(value) => Some(value),
            Member::Method(_) => None,
        }
    }

    /// Returns the object map, if this member holds a structured value.
    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        self.as_value().and_then(Value::as_object)
    }

    /// Fields of a structured data member, keyed the way they shallow-merge.
    ///
    /// Objects yield their own fields, arrays yield index-keyed fields
    /// (`"0"`, `"1"`, ...), and `null` yields no fields. Methods and scalars
    /// return `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use mixin_compose_core::Member;
    /// use serde_json::json;
    ///
    /// let tags = Member::Value(json!(["x", "y"])).structured_fields().unwrap();
    /// assert_eq!(tags.get("1"), Some(&json!("y")));
    /// assert!(Member::Value(json!(null)).structured_fields().unwrap().is_empty());
    /// assert!(Member::Value(json!(42)).structured_fields().is_none());
    /// ```
    pub fn structured_fields(&self) -> Option<Map<String, Value>> {
        match self.as_value()? {
            Value::Object(fields) => Some(fields.clone()),
            Value::Array(items) => Some(
                items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| (index.to_string(), item.clone()))
                    .collect(),
            ),
            Value::Null => Some(Map::new()),
            Value::Bool(_) | Value::Number(_) | Value::String(_) => None,
        }
    }

    /// Short kind name used in diagnostics.
    ///
    /// # Examples
    ///
    /// ```
    /// use mixin_compose_core::{Member, Method};
    /// use serde_json::json;
    ///
    /// assert_eq!(Member::Value(json!(42)).kind(), "number");
    /// assert_eq!(Member::Value(json!({})).kind(), "object");
    /// assert_eq!(Member::Method(Method::new(|_, _| json!(null))).kind(), "method");
    /// ```
    pub fn kind(&self) -> &'static str {
        match self {
            Member::Method(_) => "method",
            Member::Value(value) => value_kind(value),
        }
    }
}

impl From<Method> for Member {
    fn from(method: Method) -> Self {
        Member::Method(method)
    }
}

impl From<Value> for Member {
    fn from(value: Value) -> Self {
        Member::Value(value)
    }
}

/// Kind name of a JSON value.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
