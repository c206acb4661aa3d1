//! API resource composition example.
//!
//! Builds an HTTP-style resource class from `Readable` and `Writeable`
//! mixins, keeps the resource's own `get` with an override, and chains an
//! audit hook in front of `delete` with a cascade.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p mixin-compose-demos --example api_resource
//! ```

use std::sync::Arc;

use mixin_compose_core::{Class, Mixin, cascade, mixin, override_member};
use mixin_compose_demos::print_members;
use serde_json::{Map, json};

fn main() {
    let readable = Mixin::named("Readable")
        .with_method("get", |_, _| json!("get enabled"))
        .with_method("head", |_, _| json!("head enabled"));

    let writeable = Mixin::named("Writeable")
        .with_method("post", |_, _| json!("post enabled"))
        .with_method("put", |_, _| json!("put enabled"))
        .with_method("delete", |this, args| {
            let path = this.field("path").cloned().unwrap_or_default();
            json!(format!("deleted {} from {path}", args[0]))
        })
        .with_value("headers", json!({"content-type": "application/json"}));

    let audited = Mixin::named("Audited").with_method("delete", |_, args| {
        json!(format!("audit: delete {}", args[0]))
    });

    let users = Class::new("Users")
        .with_constructor(|args| {
            let mut fields = Map::new();
            fields.insert("path".into(), args.first().cloned().unwrap_or(json!("/")));
            fields
        })
        .with_method("get", |this, _| {
            let path = this.field("path").cloned().unwrap_or_default();
            json!(format!("listing {path}"))
        })
        .with_method("delete", |_, _| json!("users cache invalidated"))
        .with_value("headers", json!({"accept": "application/json"}));
    let users = override_member(users, "get");
    let users = cascade(users, "delete");
    let users = cascade(users, "headers");

    let users = match mixin([readable, writeable, audited]).apply(users) {
        Ok(class) => Arc::new(class),
        Err(e) => {
            eprintln!("composition failed: {e}");
            std::process::exit(1);
        }
    };

    let mut resource = users.instantiate(&[json!("/users")]);
    print_members(&mut resource, &["get", "head", "post", "put", "headers"]);
    println!("    delete: {}", resource.call("delete", &[json!(42)]).unwrap());
}
