//! Deep flattening of nested value sequences.
//!
//! Cascade chains return one result per link, and a link may itself be a
//! cascade that already returned an array. [`flatten`] collapses those
//! nested arrays into the single ordered sequence callers see.

use serde_json::Value;

/// Flattens nested arrays into their leaves, depth-first and left to right.
///
/// A `null` element marks an absent value and ends the sequence level it
/// appears in: everything after it at that level is dropped, while outer
/// levels continue.
///
/// Cascade chains flatten one result per link, so a method that returns
/// `null` as a void result suppresses the results of every later link,
/// including the target's own. Return an empty array to contribute nothing
/// without truncating the chain.
///
/// # Examples
///
/// ```
/// use mixin_compose_core::flatten;
/// use serde_json::json;
///
/// let nested = [json!("a"), json!(["b", ["c"]]), json!("d")];
/// assert_eq!(flatten(&nested), vec![json!("a"), json!("b"), json!("c"), json!("d")]);
///
/// // `null` truncates its own level only
/// let truncated = [json!([null, "x"]), json!("y"), json!(null), json!("z")];
/// assert_eq!(flatten(&truncated), vec![json!("y")]);
/// ```
pub fn flatten(values: &[Value]) -> Vec<Value> {
    let mut out = Vec::new();
    flatten_into(values, &mut out);
    out
}

fn flatten_into(values: &[Value], out: &mut Vec<Value>) {
    for value in values {
        match value {
            Value::Null => return,
            Value::Array(items) => flatten_into(items, out),
            leaf => out.push(leaf.clone()),
        }
    }
}
