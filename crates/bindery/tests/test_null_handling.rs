use bindery::{
    BindError, BindingConfig, BindingContext, BoundType, ItemKind, NullPolicy, Object,
    PropertyMapping, Result, ScalarKind, Value, WrapperSpec,
};

const DECL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

fn root(policy: NullPolicy, wrapper: Option<&str>) -> BoundType {
    let mut items = PropertyMapping::collection("items", ItemKind::Scalar(ScalarKind::String))
        .with_null_policy(policy);
    if let Some(name) = wrapper {
        items = items.with_wrapper(WrapperSpec::new(name)).with_path("item");
    }
    BoundType::new("Root").with_property(items)
}

fn json_no_root() -> BindingConfig {
    BindingConfig::json().with_include_root(false)
}

fn marshal(bound: BoundType, config: BindingConfig, object: &Object) -> Result<String> {
    BindingContext::new([bound], config)?
        .marshaller()
        .marshal(object, "root")
}

fn unmarshal(bound: BoundType, config: BindingConfig, text: &str) -> Result<Object> {
    BindingContext::new([bound], config)?
        .unmarshaller()
        .unmarshal(text, "Root")
}

fn null_items() -> Object {
    Object::new("Root")
}

fn empty_items() -> Object {
    Object::new("Root").with("items", Value::List(vec![]))
}

#[test]
fn test_null_collection_is_omitted_without_root() -> Result<()> {
    let bound = root(NullPolicy::OmitIfNull, None);
    let text = marshal(bound.clone(), json_no_root(), &null_items())?;
    assert_eq!(text, "{}");

    let read = unmarshal(bound, json_no_root(), &text)?;
    assert_eq!(read.get("items"), None);
    Ok(())
}

#[test]
fn test_null_collection_with_root() -> Result<()> {
    let bound = root(NullPolicy::OmitIfNull, None);
    let text = marshal(bound.clone(), BindingConfig::json(), &null_items())?;
    assert_eq!(text, r#"{"root":{}}"#);
    assert_eq!(unmarshal(bound, BindingConfig::json(), &text)?, null_items());
    Ok(())
}

#[test]
fn test_empty_collection_differs_from_null_in_json() -> Result<()> {
    let bound = root(NullPolicy::OmitIfNull, None);
    let text = marshal(bound.clone(), json_no_root(), &empty_items())?;
    assert_eq!(text, r#"{"items":[]}"#);

    let read = unmarshal(bound, json_no_root(), &text)?;
    assert_eq!(read, empty_items());
    assert_ne!(read, null_items());
    Ok(())
}

#[test]
fn test_null_marker() -> Result<()> {
    let bound = root(NullPolicy::EmitNullMarker, None);

    let text = marshal(bound.clone(), json_no_root(), &null_items())?;
    assert_eq!(text, r#"{"items":null}"#);
    assert_eq!(unmarshal(bound.clone(), json_no_root(), &text)?, null_items());

    let text = marshal(bound.clone(), BindingConfig::xml(), &null_items())?;
    assert_eq!(
        text,
        format!(
            "{DECL}<root xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">\
             <items xsi:nil=\"true\"/></root>"
        )
    );
    assert_eq!(unmarshal(bound, BindingConfig::xml(), &text)?, null_items());
    Ok(())
}

#[test]
fn test_explicit_null_wins_over_empty_container_policy() -> Result<()> {
    let bound = root(NullPolicy::EmitEmptyContainer, None);
    let read = unmarshal(bound, json_no_root(), r#"{"items":null}"#)?;
    assert_eq!(read, null_items());
    Ok(())
}

#[test]
fn test_empty_container_policy() -> Result<()> {
    let bound = root(NullPolicy::EmitEmptyContainer, None);

    let text = marshal(bound.clone(), json_no_root(), &null_items())?;
    assert_eq!(text, r#"{"items":[]}"#);

    // Absent input reads as an empty collection.
    assert_eq!(unmarshal(bound, json_no_root(), "{}")?, empty_items());
    Ok(())
}

#[test]
fn test_xml_wrapped_empty_and_null() -> Result<()> {
    let bound = root(NullPolicy::EmitNullMarker, Some("list"));

    let text = marshal(bound.clone(), BindingConfig::xml(), &empty_items())?;
    assert_eq!(text, format!("{DECL}<root><list/></root>"));
    assert_eq!(unmarshal(bound.clone(), BindingConfig::xml(), &text)?, empty_items());

    let text = marshal(bound.clone(), BindingConfig::xml(), &null_items())?;
    assert!(text.contains(r#"<list xsi:nil="true"/>"#), "{text}");
    assert_eq!(unmarshal(bound, BindingConfig::xml(), &text)?, null_items());
    Ok(())
}

#[test]
fn test_xml_unwrapped_empty_collection_reads_back_as_null() -> Result<()> {
    let bound = root(NullPolicy::OmitIfNull, None);
    let text = marshal(bound.clone(), BindingConfig::xml(), &empty_items())?;
    assert_eq!(text, format!("{DECL}<root/>"));
    assert_eq!(unmarshal(bound, BindingConfig::xml(), &text)?, null_items());
    Ok(())
}

#[test]
fn test_marshal_empty_collections_disabled() -> Result<()> {
    let bound = root(NullPolicy::OmitIfNull, None);
    let config = json_no_root().with_marshal_empty_collections(false);
    assert_eq!(marshal(bound, config, &empty_items())?, "{}");
    Ok(())
}

#[test]
fn test_null_scalar_and_nested() -> Result<()> {
    let child = BoundType::new("Child").with_property(PropertyMapping::scalar("n", ScalarKind::Integer));
    let parent = BoundType::new("Parent")
        .with_property(
            PropertyMapping::scalar("label", ScalarKind::String)
                .with_null_policy(NullPolicy::EmitNullMarker),
        )
        .with_property(PropertyMapping::nested("child", "Child"));
    let context = BindingContext::new([child, parent], json_no_root())?;

    let object = Object::new("Parent");
    let text = context.marshaller().marshal(&object, "")?;
    assert_eq!(text, r#"{"label":null}"#);
    assert_eq!(context.unmarshaller().unmarshal(&text, "Parent")?, object);

    let object = Object::new("Parent").with("child", Object::new("Child"));
    let text = context.marshaller().marshal(&object, "")?;
    assert_eq!(text, r#"{"label":null,"child":{}}"#);
    assert_eq!(context.unmarshaller().unmarshal(&text, "Parent")?, object);
    Ok(())
}

#[test]
fn test_indented_empty_wrapper_reads_as_empty() -> Result<()> {
    let bound = root(NullPolicy::EmitNullMarker, Some("list"));
    let read = unmarshal(bound, BindingConfig::xml(), "<root>\n  <list>\n  </list>\n</root>")?;
    assert_eq!(read, empty_items());
    Ok(())
}

#[test]
fn test_null_items_in_xml_need_a_wrapper() -> Result<()> {
    let with_null = Object::new("Root").with("items", Value::List(vec![Value::Null]));

    let err = marshal(root(NullPolicy::OmitIfNull, None), BindingConfig::xml(), &with_null)
        .unwrap_err();
    assert!(matches!(
        err,
        BindError::SchemaMismatch { ref property, expected: "non-null item", found: "null" }
            if property == "items"
    ));

    let bound = root(NullPolicy::OmitIfNull, Some("list"));
    let text = marshal(bound.clone(), BindingConfig::xml(), &with_null)?;
    assert!(text.contains(r#"<list><item xsi:nil="true"/></list>"#), "{text}");
    assert_eq!(unmarshal(bound, BindingConfig::xml(), &text)?, with_null);

    let bound = root(NullPolicy::OmitIfNull, None);
    let text = marshal(bound.clone(), json_no_root(), &with_null)?;
    assert_eq!(text, r#"{"items":[null]}"#);
    assert_eq!(unmarshal(bound, json_no_root(), &text)?, with_null);
    Ok(())
}

#[test]
fn test_null_inside_object_wrapper_reads_as_null() -> Result<()> {
    let bound = root(NullPolicy::EmitEmptyContainer, Some("list"));
    let read = unmarshal(bound, json_no_root(), r#"{"list":{"item":null}}"#)?;
    assert_eq!(read, null_items());
    Ok(())
}

#[test]
fn test_empty_container_policy_without_empty_collections() -> Result<()> {
    let bound = root(NullPolicy::EmitEmptyContainer, None);
    let config = json_no_root().with_marshal_empty_collections(false);

    assert_eq!(marshal(bound.clone(), config.clone(), &null_items())?, "{}");
    assert_eq!(marshal(bound.clone(), config.clone(), &empty_items())?, "{}");
    assert_eq!(unmarshal(bound, config, "{}")?, empty_items());
    Ok(())
}
