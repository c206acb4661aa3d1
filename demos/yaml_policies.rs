//! Declarative policy example.
//!
//! Loads member policies from a YAML document instead of annotating the
//! class in code, then composes a plugin host from two mixins.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p mixin-compose-demos --example yaml_policies
//! ```

use std::sync::Arc;

use mixin_compose_core::{Class, MemberPolicies, Mixin, mixin};
use mixin_compose_demos::print_members;
use serde_json::json;

const POLICIES: &str = r#"
overrides:
  - name
cascades:
  - on_start
  - config
"#;

fn main() {
    let policies = MemberPolicies::from_yaml_str(POLICIES).unwrap();
    println!("policies:\n{}", policies.to_yaml_string().unwrap());

    let logging = Mixin::named("Logging")
        .with_method("name", |_, _| json!("logging"))
        .with_method("on_start", |_, _| json!("logging ready"))
        .with_value("config", json!({"level": "info"}));
    let metrics = Mixin::named("Metrics")
        .with_method("on_start", |_, _| json!(["metrics ready", "exporter bound"]))
        .with_value("config", json!({"level": "debug", "interval": 10}));

    let host = Class::new("Host")
        .with_method("name", |_, _| json!("plugin-host"))
        .with_method("on_start", |_, _| json!("host ready"))
        .with_value("config", json!({"threads": 2}))
        .with_policies(&policies);

    let host = Arc::new(mixin([logging, metrics]).apply(host).unwrap());
    let mut instance = host.instantiate(&[]);

    print_members(&mut instance, &["name", "on_start", "config"]);
}
