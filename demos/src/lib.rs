//! Shared helpers for the runnable demos.

use mixin_compose_core::{Instance, Member};

/// Prints each named member of `instance`: methods are called with no
/// arguments, data members are printed as-is.
pub fn print_members(instance: &mut Instance, names: &[&str]) {
    for name in names {
        let shown = match instance.get(name) {
            Some(Member::Value(value)) => value.to_string(),
            Some(Member::Method(_)) => match instance.call(name, &[]) {
                Ok(value) => value.to_string(),
                Err(e) => format!("<{e}>"),
            },
            None => "<missing>".to_string(),
        };
        println!("{name:>10}: {shown}");
    }
}
