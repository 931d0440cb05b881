use microattrs::{Features, Options, Schema};
use serde_json::json;

fn default_of(schema: &Schema, name: &str) -> Option<serde_json::Value> {
    schema
        .options(name)
        .and_then(|options| options.default_value().cloned())
}

#[test]
fn test_base_redeclaration_is_idempotent() {
    let schema = Schema::builder("Config")
        .attribute_with("level", Options::with_default("info"))
        .attributes(vec![("level", Options::with_default("debug"))])
        .build();

    assert_eq!(default_of(&schema, "level"), Some(json!("info")));
}

#[test]
fn test_subclass_overwrite_leaves_parent_alone() {
    let parent = Schema::builder("Parent")
        .attribute_with("level", Options::with_default("info"))
        .build();
    let child = parent
        .subclass("Child")
        .override_attribute("level", Options::with_default("trace"))
        .build();

    assert_eq!(default_of(&child, "level"), Some(json!("trace")));
    assert_eq!(default_of(&parent, "level"), Some(json!("info")));
}

#[test]
fn test_sibling_subclasses_are_isolated() {
    let parent = Schema::builder("Shape")
        .attribute_with("sides", Options::with_default(0))
        .build();
    let triangle = parent
        .subclass("Triangle")
        .override_attribute("sides", Options::with_default(3))
        .build();
    let square = parent
        .subclass("Square")
        .override_attribute("sides", Options::with_default(4))
        .attribute("diagonal")
        .build();

    assert_eq!(default_of(&triangle, "sides"), Some(json!(3)));
    assert_eq!(default_of(&square, "sides"), Some(json!(4)));
    assert_eq!(default_of(&parent, "sides"), Some(json!(0)));
    assert!(!triangle.has_attribute("diagonal"));
    assert!(!parent.has_attribute("diagonal"));
}

#[test]
fn test_bulk_override_mixes_new_and_existing_names() {
    let parent = Schema::builder("Parent")
        .attributes(vec!["a", "b"])
        .build();
    let child = parent
        .subclass("Child")
        .try_override_attributes(json!([{"a": {"default": 1}}, "c"]))
        .unwrap()
        .build();

    assert_eq!(child.attribute_names().collect::<Vec<_>>(), ["a", "b", "c"]);
    assert_eq!(default_of(&child, "a"), Some(json!(1)));
    assert_eq!(default_of(&parent, "a"), None);
}

#[test]
fn test_grandchild_inherits_the_overridden_options() {
    let base = Schema::builder("Base")
        .attribute_with("mode", Options::with_default("a"))
        .build();
    let middle = base
        .subclass("Middle")
        .override_attribute("mode", Options::with_default("b"))
        .build();
    let leaf = middle
        .subclass("Leaf")
        .override_attribute("extra", Options::new())
        .build();

    assert_eq!(default_of(&leaf, "mode"), Some(json!("b")));
    assert_eq!(leaf.parent(), Some("Middle"));
    assert_eq!(leaf.attribute_names().collect::<Vec<_>>(), ["mode", "extra"]);
}

#[test]
fn test_effective_options_seed_for_subclassing() {
    let schema = Schema::builder("Animal")
        .attribute("name")
        .attribute_with("legs", Options::with_default(4))
        .build();

    let options = schema.effective_options(Default::default());
    assert_eq!(
        serde_json::Value::Object(options),
        json!({"name": {}, "legs": {"default": 4}})
    );
}

#[test]
fn test_end_to_end_animal_and_dog() {
    let animal = Schema::builder("Animal")
        .attribute("name")
        .features(Features::to_initialize(false, false))
        .build();
    let dog = animal
        .subclass("Dog")
        .override_attribute("sound", Options::with_default("woof"))
        .build();

    assert!(dog.has_attribute("name"));

    let rex = dog.new_instance(json!({"name": "Rex"})).unwrap();
    assert_eq!(rex.attribute("name"), Some(&json!("Rex")));
    assert_eq!(rex.attribute("sound"), Some(&json!("woof")));

    let generic = animal.new_instance(json!({"name": "Generic", "sound": "?"})).unwrap();
    assert_eq!(generic.attribute("sound"), None);
}
