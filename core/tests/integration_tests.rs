use std::sync::Arc;

use mixin_compose_core::{
    Class, Instance, Member, MemberPolicies, Mixin, MixinError, cascade, mixin, override_member,
};
use serde_json::{Map, Value, json};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn readable() -> Mixin {
    Mixin::named("Readable")
        .with_method("get", |_, _| json!("get enabled"))
        .with_method("head", |_, _| json!("head enabled"))
}

fn writeable() -> Mixin {
    Mixin::named("Writeable")
        .with_method("post", |_, _| json!("post enabled"))
        .with_method("put", |_, _| json!("put enabled"))
        .with_method("patch", |_, _| json!("patch enabled"))
        .with_method("delete", |_, _| json!("delete enabled"))
}

fn build(class: Class, mixins: Vec<Mixin>) -> Instance {
    let composed = mixin(mixins).apply(class).unwrap();
    Arc::new(composed).instantiate(&[])
}

fn call(instance: &mut Instance, name: &str) -> Value {
    instance.call(name, &[]).unwrap()
}

// ---------------------------------------------------------------------------
// Plain composition
// ---------------------------------------------------------------------------

#[test]
fn test_mixins_decorate_class() {
    let api = Class::new("Api")
        .with_method("get", |_, _| json!("this will be overwritten by mixin"));
    let mut api = build(api, vec![readable(), writeable()]);

    assert_eq!(call(&mut api, "get"), json!("get enabled"));
    assert_eq!(call(&mut api, "head"), json!("head enabled"));
    assert_eq!(call(&mut api, "post"), json!("post enabled"));
    assert_eq!(call(&mut api, "put"), json!("put enabled"));
    assert_eq!(call(&mut api, "patch"), json!("patch enabled"));
}

#[test]
fn test_short_resource_example() {
    let r = Mixin::new()
        .with_method("get", |_, _| json!("G"))
        .with_method("head", |_, _| json!("H"));
    let w = Mixin::new().with_method("post", |_, _| json!("P"));
    let mut api = build(Class::new("Api").with_method("get", |_, _| json!("X")), vec![r, w]);

    assert_eq!(call(&mut api, "get"), json!("G"));
    assert_eq!(call(&mut api, "head"), json!("H"));
    assert_eq!(call(&mut api, "post"), json!("P"));
}

#[test]
fn test_target_only_members_preserved() {
    let api = Class::new("Api")
        .with_method("options", |_, _| json!("own options"))
        .with_value("base_url", json!("/v1"));
    let mut api = build(api, vec![readable()]);

    assert_eq!(call(&mut api, "options"), json!("own options"));
    assert_eq!(api.get("base_url").and_then(Member::as_value), Some(&json!("/v1")));
}

#[test]
fn test_later_argument_wins_over_earlier() {
    let v1 = Mixin::new().with_value("version", json!(1));
    let v2 = Mixin::new().with_value("version", json!(2));
    let v3 = Mixin::new().with_value("version", json!(3));
    let api = build(Class::new("Api").with_value("version", json!(0)), vec![v1, v2, v3]);

    assert_eq!(api.get("version").and_then(Member::as_value), Some(&json!(3)));
}

#[test]
fn test_constructor_arguments_reach_target() {
    let api = Class::new("Api")
        .with_constructor(|args| {
            let mut fields = Map::new();
            fields.insert("prefix".into(), args.first().cloned().unwrap_or(json!("")));
            fields
        })
        .with_method("describe", |this, _| this.field("prefix").cloned().unwrap_or_default());
    let composed = Arc::new(mixin([readable()]).apply(api).unwrap());

    let mut instance = composed.instantiate(&[json!("/users")]);
    assert_eq!(call(&mut instance, "describe"), json!("/users"));
    assert_eq!(call(&mut instance, "get"), json!("get enabled"));
}

#[test]
fn test_mixin_methods_see_instance_fields() {
    let named = Mixin::named("Named").with_method("greet", |this, args| {
        let name = this.field("name").and_then(Value::as_str).unwrap_or("nobody");
        json!(format!("{} says hi to {}", name, args[0].as_str().unwrap_or("?")))
    });
    let person = Class::new("Person").with_constructor(|args| {
        let mut fields = Map::new();
        fields.insert("name".into(), args[0].clone());
        fields
    });
    let person = Arc::new(mixin([named]).apply(person).unwrap());

    let mut ada = person.instantiate(&[json!("Ada")]);
    assert_eq!(
        ada.call("greet", &[json!("Bob")]).unwrap(),
        json!("Ada says hi to Bob")
    );
}

// ---------------------------------------------------------------------------
// Override
// ---------------------------------------------------------------------------

#[test]
fn test_override_preserves_target_member() {
    let api = Class::new("Api").with_method("get", |_, _| json!("this will be preserved"));
    let api = override_member(api, "get");
    let mut api = build(api, vec![readable(), writeable()]);

    assert_eq!(call(&mut api, "get"), json!("this will be preserved"));
    assert_eq!(call(&mut api, "head"), json!("head enabled"));
    assert_eq!(call(&mut api, "post"), json!("post enabled"));
    assert_eq!(call(&mut api, "put"), json!("put enabled"));
    assert_eq!(call(&mut api, "patch"), json!("patch enabled"));
}

#[test]
fn test_override_ignores_every_mixin() {
    let api = Class::new("Api")
        .with_method("get", |_, _| json!("X"))
        .with_override("get");
    let other = Mixin::new().with_method("get", |_, _| json!("other"));
    let mut api = build(api, vec![readable(), other]);

    assert_eq!(call(&mut api, "get"), json!("X"));
}

// ---------------------------------------------------------------------------
// Cascade
// ---------------------------------------------------------------------------

#[test]
fn test_cascade_calls_in_order_added() {
    let another_delete = Mixin::named("AnotherDelete")
        .with_method("delete", |_, _| json!("another delete"));
    let api = Class::new("Api").with_method("delete", |_, _| {
        json!("this will be called after Writable.delete")
    });
    let api = cascade(api, "delete");
    let mut api = build(api, vec![readable(), writeable(), another_delete]);

    let returns = call(&mut api, "delete");
    assert_eq!(
        returns,
        json!([
            "delete enabled",
            "another delete",
            "this will be called after Writable.delete"
        ])
    );
}

#[test]
fn test_cascade_short_example() {
    let w = Mixin::new().with_method("delete", |_, _| json!("D1"));
    let a = Mixin::new().with_method("delete", |_, _| json!("D2"));
    let api = Class::new("Api")
        .with_method("delete", |_, _| json!("D3"))
        .with_cascade("delete");
    let mut api = build(api, vec![w, a]);

    assert_eq!(call(&mut api, "delete"), json!(["D1", "D2", "D3"]));
}

#[test]
fn test_cascade_every_link_mutates_same_instance() {
    let bump = |this: &mut Instance, _: &[Value]| {
        let n = this.field("calls").and_then(Value::as_i64).unwrap_or(0) + 1;
        this.set_field("calls", json!(n));
        json!(n)
    };
    let api = Class::new("Api").with_method("touch", bump).with_cascade("touch");
    let mut api = build(
        api,
        vec![
            Mixin::new().with_method("touch", bump),
            Mixin::new().with_method("touch", bump),
        ],
    );

    assert_eq!(call(&mut api, "touch"), json!([1, 2, 3]));
    assert_eq!(api.field("calls"), Some(&json!(3)));
}

#[test]
fn test_cascade_object_shallow_merge() {
    let api = Class::new("Api")
        .with_value("defaults", json!({"timeout": 30, "retries": {"max": 1}}))
        .with_cascade("defaults");
    let tuned = Mixin::new().with_value(
        "defaults",
        json!({"retries": {"backoff": "linear"}, "gzip": true}),
    );
    let api = build(api, vec![tuned]);

    assert_eq!(
        api.get("defaults").and_then(Member::as_value),
        Some(&json!({
            "timeout": 30,
            "retries": {"backoff": "linear"},
            "gzip": true
        }))
    );
}

#[test]
fn test_cascade_void_mixin_suppresses_later_results() {
    let api = Class::new("Api")
        .with_method("save", |_, _| json!("own"))
        .with_cascade("save");
    let mut silent = build(
        api.clone(),
        vec![Mixin::new().with_method("save", |_, _| Value::Null)],
    );
    let mut empty = build(api, vec![Mixin::new().with_method("save", |_, _| json!([]))]);

    assert_eq!(call(&mut silent, "save"), json!([]));
    assert_eq!(call(&mut empty, "save"), json!(["own"]));
}

#[test]
fn test_cascade_accepts_arrays_and_null() {
    let api = Class::new("Api")
        .with_value("tags", json!(["a", "b", "c"]))
        .with_value("cfg", json!({"level": "info"}))
        .with_cascade("tags")
        .with_cascade("cfg");
    let extras = Mixin::new()
        .with_value("tags", json!(["x", "y"]))
        .with_value("cfg", Value::Null);
    let api = build(api, vec![extras]);

    assert_eq!(
        api.get("tags").and_then(Member::as_value),
        Some(&json!({"0": "x", "1": "y", "2": "c"}))
    );
    assert_eq!(
        api.get("cfg").and_then(Member::as_value),
        Some(&json!({"level": "info"}))
    );
}

#[test]
fn test_cascade_scalar_fails_composition() {
    let api = Class::new("Api")
        .with_method("delete", |_, _| json!("D3"))
        .with_cascade("delete");
    let err = mixin([writeable(), Mixin::new().with_value("delete", json!(42))])
        .apply(api)
        .unwrap_err();

    assert!(matches!(
        &err,
        MixinError::InvalidCascadeTarget { member, kind: "number" } if member == "delete"
    ));
    assert!(err.to_string().contains("delete"));
}

#[test]
fn test_recomposition_nests_cascade_chains() {
    let api = Class::new("Api")
        .with_method("delete", |_, _| json!("own"))
        .with_cascade("delete");
    let once = mixin([Mixin::new().with_method("delete", |_, _| json!("inner"))])
        .apply(api)
        .unwrap();
    let twice = mixin([Mixin::new().with_method("delete", |_, _| json!("outer"))])
        .apply(once)
        .unwrap();

    let mut instance = Arc::new(twice).instantiate(&[]);
    assert_eq!(call(&mut instance, "delete"), json!(["outer", "inner", "own"]));
}

// ---------------------------------------------------------------------------
// Declarative policies
// ---------------------------------------------------------------------------

#[test]
fn test_policies_from_yaml() {
    let policies = MemberPolicies::from_yaml_str(
        r#"
overrides:
  - get
cascades:
  - delete
"#,
    )
    .unwrap();
    let api = Class::new("Api")
        .with_method("get", |_, _| json!("X"))
        .with_method("delete", |_, _| json!("own delete"))
        .with_policies(&policies);
    let mut api = build(api, vec![readable(), writeable()]);

    assert_eq!(call(&mut api, "get"), json!("X"));
    assert_eq!(call(&mut api, "delete"), json!(["delete enabled", "own delete"]));
}

#[test]
fn test_policies_from_json() {
    let policies = MemberPolicies::from_json_str(r#"{"overrides": ["head"]}"#).unwrap();
    let api = Class::new("Api")
        .with_method("head", |_, _| json!("own head"))
        .with_policies(&policies);
    let mut api = build(api, vec![readable()]);

    assert_eq!(call(&mut api, "head"), json!("own head"));
    assert_eq!(call(&mut api, "get"), json!("get enabled"));
}
