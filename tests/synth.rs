use confschema::config::{DuplicateLeafPolicy, SchemaConfig};
use confschema::introspect::{Refinement, TypeCatalog};
use confschema::metadata::{merge, parse_fragment, Catalogue};
use confschema::synth::{SchemaBuilder, Synthesis};
use confschema::SchemaNode;
use rstest::rstest;
use serde_json::{json, Number, Value};

fn catalogue(fragment: Value) -> Catalogue {
    merge(vec![parse_fragment("test", &fragment.to_string()).unwrap()])
}

fn properties(entries: Value) -> Catalogue {
    catalogue(json!({ "properties": entries }))
}

fn build(config: &SchemaConfig, types: &TypeCatalog, catalogue: &Catalogue, included: &[&str]) -> Synthesis {
    SchemaBuilder::new(config)
        .with_introspector(types)
        .with_refinements(types)
        .build(catalogue, included)
}

fn document(synthesis: &Synthesis) -> Value {
    synthesis.document.to_value().unwrap()
}

fn widget_types() -> TypeCatalog {
    TypeCatalog::new().with_class("Widget", &[("id", "text")])
}

#[test]
fn nested_paths_become_nested_objects() {
    let config = SchemaConfig::default();
    let catalogue = properties(json!([
        {"name": "a.b", "type": "text"},
        {"name": "a.c", "type": "integer"}
    ]));
    let out = document(&build(&config, &TypeCatalog::new(), &catalogue, &["a"]));

    assert_eq!(
        out["properties"]["a"],
        json!({"type": "object", "properties": {"b": {"type": "string"}, "c": {"type": "integer"}}})
    );
    assert!(out.get("$defs").is_none());
    assert_eq!(out["$schema"], json!("https://json-schema.org/draft/2020-12/schema"));
    assert_eq!(out["type"], json!("object"));
    assert_eq!(out["additionalProperties"], json!(true));
}

#[test]
fn list_of_text_is_an_array_of_strings() {
    let config = SchemaConfig::default();
    let catalogue = properties(json!([{"name": "x", "type": "list<text>"}]));
    let out = document(&build(&config, &TypeCatalog::new(), &catalogue, &["x"]));
    assert_eq!(
        out["properties"]["x"],
        json!({"type": "array", "items": {"type": "string"}})
    );
}

#[rstest]
#[case("java.lang.String", json!({"type": "string"}))]
#[case("java.lang.Boolean", json!({"type": "boolean"}))]
#[case("long", json!({"type": "integer"}))]
#[case("java.math.BigDecimal", json!({"type": "number"}))]
#[case("java.util.UUID", json!({"type": "string", "format": "uuid"}))]
#[case("java.net.URI", json!({"type": "string", "format": "uri"}))]
#[case("java.time.Duration", json!({"type": "string", "format": "duration"}))]
#[case("java.time.LocalDate", json!({"type": "string", "format": "date"}))]
#[case("java.time.Instant", json!({"type": "string", "format": "date-time"}))]
#[case("java.net.Inet4Address", json!({"type": "string", "format": "ipv4"}))]
#[case("byte[]", json!({"type": "string", "contentEncoding": "base64"}))]
#[case("java.lang.String[]", json!({"type": "array", "items": {"type": "string"}}))]
#[case("java.util.Set<java.lang.Integer>", json!({"type": "array", "items": {"type": "integer"}}))]
#[case("java.util.List", json!({"type": "array", "items": {"type": "object"}}))]
#[case("java.util.List<T>", json!({"type": "array", "items": {"type": "object"}}))]
#[case("java.util.List<? extends java.lang.Number>", json!({"type": "array", "items": {"type": "number"}}))]
#[case("java.util.Map<java.lang.String,java.lang.String>", json!({"type": "object", "additionalProperties": {"type": "string"}}))]
#[case("java.util.Map<java.lang.String,java.lang.Object>", json!({"type": "object", "additionalProperties": {"type": "object"}}))]
#[case("java.util.Properties", json!({"type": "object", "additionalProperties": {"type": "object"}}))]
#[case("java.lang.Object", json!({"type": "object"}))]
fn leaf_shapes(#[case] type_token: &str, #[case] expected: Value) {
    let config = SchemaConfig::default();
    let catalogue = properties(json!([{"name": "p", "type": type_token}]));
    let out = document(&build(&config, &TypeCatalog::new(), &catalogue, &["p"]));
    assert_eq!(out["properties"]["p"], expected);
}

fn generic_types() -> TypeCatalog {
    TypeCatalog::new()
        .with_class("com.example.GenericBox", &[("value", "T")])
        .with_generic("com.example.GenericBox")
        .with_class("com.example.Holder", &[("box", "com.example.GenericBox<java.lang.String>")])
        .with_class("A", &[("id", "text")])
        .with_class("com.acme.messaging.Queue", &[("name", "text"), ("durable", "boolean")])
}

#[rstest]
#[case("com.example.GenericBox<java.lang.Integer>", json!({"type": "object"}))]
#[case("java.util.List<com.example.GenericBox<X>>", json!({"type": "array", "items": {"type": "object"}}))]
#[case(
    "java.util.Map<java.lang.String,com.example.GenericBox<X>>",
    json!({"type": "object", "additionalProperties": {"type": "object"}})
)]
#[case(
    "com.example.Holder",
    json!({"type": "object", "properties": {"box": {"type": "object"}}})
)]
#[case(
    "java.util.List<A>",
    json!({"type": "array", "items": {"type": "object", "properties": {"id": {"type": "string"}}}})
)]
#[case(
    "com.acme.messaging.Queue",
    json!({"type": "object", "properties": {"name": {"type": "string"}, "durable": {"type": "boolean"}}})
)]
fn introspected_shapes(#[case] type_token: &str, #[case] expected: Value) {
    let config = SchemaConfig::default();
    let catalogue = properties(json!([{"name": "p", "type": type_token}]));
    let synthesis = build(&config, &generic_types(), &catalogue, &["p"]);
    let out = document(&synthesis);

    assert_eq!(out["properties"]["p"], expected);
    assert!(out.get("$defs").is_none());
    assert!(synthesis.diagnostics.missing_types.is_empty());
}

#[test]
fn repeated_composite_is_shared() {
    let config = SchemaConfig::default();
    let catalogue = properties(json!([
        {"name": "p1", "type": "Widget"},
        {"name": "p2", "type": "Widget"}
    ]));
    let out = document(&build(&config, &widget_types(), &catalogue, &["p"]));

    assert_eq!(
        out["$defs"],
        json!({"Widget": {"type": "object", "properties": {"id": {"type": "string"}}}})
    );
    assert_eq!(out["properties"]["p1"], json!({"$ref": "#/$defs/Widget"}));
    assert_eq!(out["properties"]["p2"], json!({"$ref": "#/$defs/Widget"}));
}

#[test]
fn single_use_composite_is_inlined() {
    let config = SchemaConfig::default();
    let catalogue = properties(json!([
        {"name": "p1", "type": "Widget", "description": "the widget"}
    ]));
    let out = document(&build(&config, &widget_types(), &catalogue, &["p"]));

    assert!(out.get("$defs").is_none());
    assert_eq!(
        out["properties"]["p1"],
        json!({
            "type": "object",
            "description": "the widget",
            "properties": {"id": {"type": "string"}}
        })
    );
}

#[test]
fn shared_composites_inside_arrays_and_maps() {
    let config = SchemaConfig::default();
    let catalogue = properties(json!([
        {"name": "many", "type": "java.util.List<Widget>"},
        {"name": "named", "type": "java.util.Map<java.lang.String,Widget>"}
    ]));
    let out = document(&build(&config, &widget_types(), &catalogue, &[""]));

    assert_eq!(out["properties"]["many"]["items"], json!({"$ref": "#/$defs/Widget"}));
    assert_eq!(
        out["properties"]["named"]["additionalProperties"],
        json!({"$ref": "#/$defs/Widget"})
    );
    assert!(out["$defs"].get("Widget").is_some());
}

#[test]
fn promotion_can_be_disabled() {
    let config = SchemaConfig {
        use_definitions: false,
        ..SchemaConfig::default()
    };
    let catalogue = properties(json!([
        {"name": "p1", "type": "Widget"},
        {"name": "p2", "type": "Widget"}
    ]));
    let out = document(&build(&config, &widget_types(), &catalogue, &["p"]));

    assert!(out.get("$defs").is_none());
    let inline = json!({"type": "object", "properties": {"id": {"type": "string"}}});
    assert_eq!(out["properties"]["p1"], inline);
    assert_eq!(out["properties"]["p2"], inline);
}

#[test]
fn self_referencing_type_terminates() {
    let config = SchemaConfig::default();
    let types = TypeCatalog::new().with_class("Node", &[("next", "Node"), ("label", "text")]);
    let catalogue = properties(json!([{"name": "root", "type": "Node"}]));
    let synthesis = build(&config, &types, &catalogue, &["root"]);
    let out = document(&synthesis);

    assert_eq!(
        out["properties"]["root"],
        json!({
            "type": "object",
            "properties": {
                "label": {"type": "string"},
                "next": {"type": "object"}
            }
        })
    );
    let cycle = synthesis.diagnostics.cycles.iter().next().unwrap();
    assert_eq!(cycle.type_token, "Node");
    assert_eq!(cycle.property, "root.next");
}

#[test]
fn mutually_recursive_types_terminate() {
    let config = SchemaConfig::default();
    let types = TypeCatalog::new()
        .with_class("A", &[("b", "B")])
        .with_class("B", &[("a", "A")]);
    let catalogue = properties(json!([
        {"name": "x", "type": "A"},
        {"name": "y", "type": "B"}
    ]));
    let synthesis = build(&config, &types, &catalogue, &[""]);
    let out = document(&synthesis);

    // B occurs at x.b and y, so it is shared; A occurs once and is inlined
    assert_eq!(out["properties"]["x"]["properties"]["b"], json!({"$ref": "#/$defs/B"}));
    assert_eq!(out["properties"]["y"], json!({"$ref": "#/$defs/B"}));
    assert_eq!(
        out["$defs"],
        json!({"B": {"type": "object", "properties": {"a": {"type": "object"}}}})
    );
    assert!(!synthesis.diagnostics.cycles.is_empty());
    assert!(jsonschema::meta::is_valid(&out));
}

#[test]
fn removed_properties_vanish_with_their_descendants() {
    let config = SchemaConfig::default();
    let catalogue = properties(json!([
        {"name": "a.b", "type": "text", "deprecated": true, "deprecation": {"level": "error"}},
        {"name": "a.b.c", "type": "text"},
        {"name": "a.d", "type": "text"},
        {"name": "a.bc", "type": "text"}
    ]));
    let out = document(&build(&config, &TypeCatalog::new(), &catalogue, &["a"]));

    let a = &out["properties"]["a"]["properties"];
    assert!(a.get("b").is_none());
    assert!(a.get("d").is_some());
    assert!(a.get("bc").is_some());
}

#[test]
fn removed_members_are_not_expanded() {
    let config = SchemaConfig::default();
    let types = TypeCatalog::new().with_class("Widget", &[("id", "text"), ("legacy", "text")]);
    let catalogue = properties(json!([
        {"name": "p", "type": "Widget"},
        {"name": "p.legacy", "type": "text", "deprecation": {"level": "ERROR"}}
    ]));
    let out = document(&build(&config, &types, &catalogue, &["p"]));

    assert_eq!(
        out["properties"]["p"]["properties"],
        json!({"id": {"type": "string"}})
    );
}

#[test]
fn later_description_wins_and_orphan_hints_are_ignored() {
    let config = SchemaConfig::default();
    let fragments = vec![
        parse_fragment("one", r#"{"properties": [{"name": "x.y", "type": "text", "description": "old"}]}"#).unwrap(),
        parse_fragment("two", r#"{"properties": [{"name": "x.y", "description": "new"}]}"#).unwrap(),
        parse_fragment("three", r#"{"hints": [{"name": "x.z", "values": [{"value": "v"}]}]}"#).unwrap(),
    ];
    let catalogue = merge(fragments);
    let out = document(&build(&config, &TypeCatalog::new(), &catalogue, &["x"]));

    assert_eq!(
        out["properties"]["x"]["properties"],
        json!({"y": {"type": "string", "description": "new"}})
    );
}

#[test]
fn annotations_are_attached() {
    let config = SchemaConfig::default();
    let catalogue = properties(json!([{
        "name": "app.mode",
        "type": "text",
        "description": "Run mode.",
        "defaultValue": "fast",
        "deprecated": true,
        "deprecation": {"reason": "Renamed.", "replacement": "app.run-mode", "since": "2.0"},
        "hints": [{"value": "fast"}, {"value": "safe"}]
    }]));
    let out = document(&build(&config, &TypeCatalog::new(), &catalogue, &["app"]));

    assert_eq!(
        out["properties"]["app"]["properties"]["mode"],
        json!({
            "type": "string",
            "description": "Run mode.",
            "deprecated": true,
            "default": "fast",
            "examples": ["fast", "safe"],
            "x-deprecation": {"reason": "Renamed.", "replacement": "app.run-mode", "since": "2.0"}
        })
    );
}

#[test]
fn enums_accept_both_cases() {
    let config = SchemaConfig::default();
    let types = TypeCatalog::new().with_enum("com.example.Mode", &["FAST", "SAFE"]);
    let catalogue = properties(json!([
        {"name": "mode", "type": "com.example.Mode"},
        {"name": "modes", "type": "java.util.List<com.example.Mode>"},
        {"name": "limits", "type": "java.util.Map<com.example.Mode,java.lang.Integer>"}
    ]));
    let out = document(&build(&config, &types, &catalogue, &["mode", "limits"]));

    let literals = json!(["FAST", "fast", "SAFE", "safe"]);
    assert_eq!(out["properties"]["mode"], json!({"type": "string", "enum": literals}));
    assert_eq!(out["properties"]["modes"]["items"]["enum"], literals);
    assert_eq!(out["properties"]["limits"]["propertyNames"], json!({"enum": literals}));
    assert_eq!(
        out["properties"]["limits"]["additionalProperties"],
        json!({"type": "integer"})
    );
}

#[test]
fn introspected_member_type_wins_over_stale_metadata() {
    let config = SchemaConfig::default();
    let types = TypeCatalog::new().with_class("com.example.Pool", &[("maxSize", "int")]);
    let catalogue = properties(json!([{
        "name": "pool.max-size",
        "type": "java.lang.String",
        "sourceType": "com.example.Pool"
    }]));
    let out = document(&build(&config, &types, &catalogue, &["pool"]));
    assert_eq!(
        out["properties"]["pool"]["properties"]["max-size"],
        json!({"type": "integer"})
    );
}

fn refined_types() -> TypeCatalog {
    TypeCatalog::new()
        .with_class(
            "com.example.Mail",
            &[("port", "int"), ("host", "java.lang.String"), ("from", "java.lang.String")],
        )
        .with_refinement(
            "com.example.Mail",
            "port",
            Refinement {
                minimum: Some(Number::from(1)),
                maximum: Some(Number::from(65535)),
                description: Some("SMTP port.".to_string()),
                ..Refinement::default()
            },
        )
        .with_refinement(
            "com.example.Mail",
            "host",
            Refinement {
                not_empty: true,
                pattern: Some("^[a-z.]+$".to_string()),
                example: Some("smtp.example.com".to_string()),
                ..Refinement::default()
            },
        )
        .with_refinement(
            "com.example.Mail",
            "from",
            Refinement {
                email: true,
                ..Refinement::default()
            },
        )
}

fn mail_catalogue() -> Catalogue {
    properties(json!([
        {"name": "mail.port", "type": "java.lang.Integer", "sourceType": "com.example.Mail"},
        {"name": "mail.host", "type": "java.lang.String", "sourceType": "com.example.Mail"},
        {"name": "mail.from", "type": "java.lang.String", "sourceType": "com.example.Mail"}
    ]))
}

#[test]
fn refinements_apply_when_enabled() {
    let config = SchemaConfig::default();
    let out = document(&build(&config, &refined_types(), &mail_catalogue(), &["mail"]));
    let mail = &out["properties"]["mail"]["properties"];

    assert_eq!(
        mail["port"],
        json!({"type": "integer", "description": "SMTP port.", "minimum": 1, "maximum": 65535})
    );
    assert_eq!(
        mail["host"],
        json!({
            "type": "string",
            "examples": ["smtp.example.com"],
            "pattern": "^[a-z.]+$",
            "minLength": 1
        })
    );
    assert_eq!(mail["from"], json!({"type": "string", "format": "email"}));
}

#[test]
fn refinements_are_gated_by_configuration() {
    let config = SchemaConfig {
        use_validation: false,
        ..SchemaConfig::default()
    };
    let out = document(&build(&config, &refined_types(), &mail_catalogue(), &["mail"]));
    let mail = &out["properties"]["mail"]["properties"];
    assert_eq!(mail["port"], json!({"type": "integer", "description": "SMTP port."}));
    assert_eq!(mail["from"], json!({"type": "string"}));

    let config = SchemaConfig {
        use_validation: false,
        use_openapi: false,
        ..SchemaConfig::default()
    };
    let out = document(&build(&config, &refined_types(), &mail_catalogue(), &["mail"]));
    assert_eq!(out["properties"]["mail"]["properties"]["port"], json!({"type": "integer"}));
}

#[test]
fn explicit_metadata_beats_introspection() {
    let config = SchemaConfig::default();
    let catalogue = properties(json!([
        {"name": "p", "type": "Widget"},
        {"name": "p.id", "type": "text", "description": "Explicit id."}
    ]));
    let out = document(&build(&config, &widget_types(), &catalogue, &["p"]));
    assert_eq!(
        out["properties"]["p"]["properties"]["id"],
        json!({"type": "string", "description": "Explicit id."})
    );
}

#[test]
fn excluded_types_are_never_expanded() {
    let config = SchemaConfig {
        additional_exclude_classes: vec!["com.example.Internal".to_string()],
        ..SchemaConfig::default()
    };
    let types = TypeCatalog::new()
        .with_class("Widget", &[("id", "text"), ("internal", "com.example.Internal")])
        .with_class("com.example.Internal", &[("secret", "text")]);
    let catalogue = properties(json!([
        {"name": "p", "type": "Widget"},
        {"name": "q", "type": "com.example.Internal"}
    ]));
    let synthesis = build(&config, &types, &catalogue, &["p", "q"]);
    let out = document(&synthesis);

    assert_eq!(out["properties"]["p"]["properties"], json!({"id": {"type": "string"}}));
    assert_eq!(out["properties"]["q"], json!({"type": "object"}));
    assert_eq!(synthesis.diagnostics.excluded.len(), 2);
}

#[test]
fn groups_without_known_types_are_objects() {
    let config = SchemaConfig::default();
    let catalogue = catalogue(json!({
        "groups": [{"name": "server", "type": "com.example.ServerProperties"}],
        "properties": [{"name": "server.port", "type": "java.lang.Integer"}]
    }));
    let synthesis = build(&config, &TypeCatalog::new(), &catalogue, &["server"]);
    let out = document(&synthesis);

    assert_eq!(
        out["properties"]["server"],
        json!({"type": "object", "properties": {"port": {"type": "integer"}}})
    );
    assert_eq!(
        synthesis.diagnostics.missing_types["com.example.ServerProperties"],
        1
    );
}

#[test]
fn unknown_types_degrade_to_string() {
    let config = SchemaConfig::default();
    let catalogue = properties(json!([
        {"name": "a", "type": "com.example.Mystery"},
        {"name": "b", "type": "com.example.Mystery"},
        {"name": "c"}
    ]));
    let synthesis = build(&config, &TypeCatalog::new(), &catalogue, &[""]);
    let out = document(&synthesis);

    assert_eq!(out["properties"]["a"], json!({"type": "string"}));
    assert!(out["properties"].get("c").is_none());
    assert_eq!(synthesis.diagnostics.missing_types_by_count(), vec![("com.example.Mystery", 2)]);
}

#[test]
fn well_known_definitions_stay_shared() {
    let config = SchemaConfig::default();
    let catalogue = properties(json!([
        {"name": "app.locale", "type": "java.util.Locale"},
        {"name": "logging.level", "type": "java.util.Map<java.lang.String,org.springframework.boot.logging.LogLevel>"}
    ]));
    let out = document(&build(&config, &TypeCatalog::new(), &catalogue, &["app"]));

    assert_eq!(out["properties"]["app"]["properties"]["locale"], json!({"$ref": "#/$defs/locale"}));
    assert_eq!(
        out["properties"]["logging"]["properties"]["level"],
        json!({"$ref": "#/$defs/loggerLevelProp"})
    );
    let defs = out["$defs"].as_object().unwrap();
    assert_eq!(
        defs.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["locale", "loggerLevel", "loggerLevelProp"]
    );
}

#[test]
fn configured_overrides_and_definitions() {
    let mut config = SchemaConfig::default();
    config.definitions.insert(
        "port".to_string(),
        SchemaNode {
            minimum: Some(Number::from(1)),
            ..SchemaNode::of(confschema::schema::SchemaType::Integer)
        },
    );
    config
        .type_overrides
        .insert("server.port".to_string(), SchemaNode::reference("#/$defs/port"));
    config
        .type_overrides
        .insert("com.example.Broken".to_string(), SchemaNode::reference("#/$defs/nope"));
    let catalogue = properties(json!([
        {"name": "server.port", "type": "java.lang.Integer", "description": "Port."},
        {"name": "server.broken", "type": "com.example.Broken"}
    ]));
    let synthesis = build(&config, &TypeCatalog::new(), &catalogue, &["server"]);
    let out = document(&synthesis);

    assert_eq!(
        out["properties"]["server"]["properties"]["port"],
        json!({"$ref": "#/$defs/port", "description": "Port."})
    );
    assert_eq!(out["$defs"]["port"], json!({"type": "integer", "minimum": 1}));
    assert!(synthesis.diagnostics.dangling_references.contains("#/$defs/nope"));
}

#[rstest]
#[case(DuplicateLeafPolicy::Merge, json!({"type": "integer", "description": "second"}))]
#[case(DuplicateLeafPolicy::KeepFirst, json!({"type": "string", "description": "first"}))]
#[case(DuplicateLeafPolicy::ReplaceIfDescribed, json!({"type": "integer", "description": "second"}))]
fn duplicate_leaf_policies(#[case] policy: DuplicateLeafPolicy, #[case] expected: Value) {
    let config = SchemaConfig {
        duplicate_leaf: policy,
        ..SchemaConfig::default()
    };
    // both names land on the same path
    let catalogue = properties(json!([
        {"name": "a..b", "type": "text", "description": "first"},
        {"name": "a.b", "type": "integer", "description": "second"}
    ]));
    let out = document(&build(&config, &TypeCatalog::new(), &catalogue, &["a"]));
    assert_eq!(out["properties"]["a"]["properties"]["b"], expected);
}

#[test]
fn deep_expansions_are_reported_not_cut() {
    let config = SchemaConfig {
        deep_expansion_warning: 2,
        ..SchemaConfig::default()
    };
    let types = TypeCatalog::new()
        .with_class("L1", &[("next", "L2")])
        .with_class("L2", &[("next", "L3")])
        .with_class("L3", &[("leaf", "text")]);
    let catalogue = properties(json!([{"name": "deep", "type": "L1"}]));
    let synthesis = build(&config, &types, &catalogue, &["deep"]);
    let out = document(&synthesis);

    assert_eq!(
        out["properties"]["deep"]["properties"]["next"]["properties"]["next"]["properties"]["leaf"],
        json!({"type": "string"})
    );
    let deep = synthesis.diagnostics.deep_expansions.iter().next().unwrap();
    assert_eq!((deep.type_token.as_str(), deep.depth), ("L3", 3));
}

fn rich_catalogue() -> (TypeCatalog, Catalogue) {
    let types = TypeCatalog::new()
        .with_class("Widget", &[("id", "text"), ("size", "int"), ("parent", "Widget")])
        .with_enum("com.example.Mode", &["FAST", "SAFE"]);
    let catalogue = properties(json!([
        {"name": "server.port", "type": "java.lang.Integer", "defaultValue": 8080},
        {"name": "server.address", "type": "java.net.InetAddress"},
        {"name": "app.primary", "type": "Widget"},
        {"name": "app.backup", "type": "Widget"},
        {"name": "app.mode", "type": "com.example.Mode"},
        {"name": "app.tags", "type": "java.util.List<java.lang.String>"},
        {"name": "app.labels", "type": "java.util.Map<java.lang.String,java.lang.String>"},
        {"name": "app.timeout", "type": "java.time.Duration", "defaultValue": "30s"},
        {"name": "logging.level", "type": "java.util.Map<java.lang.String,org.springframework.boot.logging.LogLevel>"}
    ]));
    (types, catalogue)
}

#[test]
fn builds_are_deterministic_and_independent() {
    let config = SchemaConfig::default();
    let (types, catalogue) = rich_catalogue();
    let builder = SchemaBuilder::new(&config)
        .with_introspector(&types)
        .with_refinements(&types);

    let first = builder.build(&catalogue, &["server", "app"]);
    let second = builder.build(&catalogue, &["server", "app"]);
    assert_eq!(
        first.document.to_json_pretty().unwrap(),
        second.document.to_json_pretty().unwrap()
    );
    assert_eq!(first.diagnostics, second.diagnostics);
}

#[test]
fn output_is_a_valid_2020_12_schema() {
    let (types, catalogue) = rich_catalogue();
    for use_definitions in [true, false] {
        let config = SchemaConfig {
            use_definitions,
            ..SchemaConfig::default()
        };
        let out = document(&build(&config, &types, &catalogue, &["server", "app"]));
        assert!(jsonschema::meta::is_valid(&out), "{out:#}");
    }
}

#[test]
fn output_validates_configuration_files() {
    let config = SchemaConfig {
        schema_id: "https://example.com/config.schema.json".to_string(),
        allow_additional_properties: false,
        ..SchemaConfig::default()
    };
    let (types, catalogue) = rich_catalogue();
    let schema = document(&build(&config, &types, &catalogue, &["server", "app"]));
    let validator = jsonschema::validator_for(&schema).expect("schema should compile");

    let good = json!({
        "server": {"port": 8080, "address": "localhost"},
        "app": {
            "primary": {"id": "w1", "size": 3, "parent": {"anything": true}},
            "backup": {"id": "w2"},
            "mode": "safe",
            "tags": ["a", "b"],
            "labels": {"team": "core"},
            "timeout": "PT30S"
        },
        "logging": {"level": {"root": "INFO", "org": {"springframework": "debug"}}}
    });
    let errors: Vec<String> = validator.iter_errors(&good).map(|e| format!("{e}")).collect();
    assert!(errors.is_empty(), "{errors:?}");

    for bad in [
        json!({"server": {"port": "eighty"}}),
        json!({"app": {"mode": "LOUD"}}),
        json!({"app": {"primary": {"size": "big"}}}),
        json!({"app": {"tags": "not-a-list"}}),
        json!({"logging": {"level": {"root": "NOISY"}}}),
        json!({"unknown": 1}),
    ] {
        assert!(!validator.is_valid(&bad), "{bad} should be rejected");
    }
}

#[test]
fn synthesize_merges_fragments_first() {
    let fragments = vec![
        parse_fragment("one", r#"{"properties": [{"name": "a.b", "type": "text"}]}"#).unwrap(),
        parse_fragment("two", r#"{"properties": [{"name": "a.b", "description": "Later"}]}"#).unwrap(),
    ];
    let synthesis = confschema::synth::synthesize(fragments, &["a"], &SchemaConfig::default());
    let out = document(&synthesis);

    assert_eq!(
        out["properties"]["a"]["properties"]["b"],
        json!({"type": "string", "description": "Later"})
    );
    assert!(synthesis.diagnostics.is_clean());
}
