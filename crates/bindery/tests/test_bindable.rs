use std::sync::Arc;

use bindery::{
    Base64UrlConverter, Bindable, BindingConfig, BindingContext, BoundElement, BoundType,
    ItemKind, Object, PropertyMapping, QName, Result, ScalarKind, Value, WrapperSpec,
};
use chrono::{DateTime, FixedOffset, NaiveTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[derive(Debug, Clone, PartialEq)]
struct BinaryCollectionRoot {
    wrapper_items: Vec<Vec<u8>>,
    xml_path_items: Vec<Vec<u8>>,
}

impl Bindable for BinaryCollectionRoot {
    fn bound_type() -> BoundType {
        BoundType::new("BinaryCollectionRoot")
            .with_property(
                PropertyMapping::collection("wrapperItems", ItemKind::Scalar(ScalarKind::Binary))
                    .with_wrapper(WrapperSpec::new("wrapper-items"))
                    .with_path("item"),
            )
            .with_property(
                PropertyMapping::collection("xmlPathItems", ItemKind::Scalar(ScalarKind::Binary))
                    .with_path("xml-path/items"),
            )
    }

    fn to_object(&self) -> Object {
        Object::new("BinaryCollectionRoot")
            .with("wrapperItems", Value::list(self.wrapper_items.clone()))
            .with("xmlPathItems", Value::list(self.xml_path_items.clone()))
    }

    fn from_object(mut object: Object) -> Result<Self> {
        Ok(Self {
            wrapper_items: object.take_scalar_list("wrapperItems")?.unwrap_or_default(),
            xml_path_items: object.take_scalar_list("xmlPathItems")?.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Invoice {
    number: String,
    issued: DateTime<FixedOffset>,
    due_time: Option<NaiveTime>,
    total: Decimal,
    kind: QName,
    lines: Vec<InvoiceLine>,
}

#[derive(Debug, Clone, PartialEq)]
struct InvoiceLine {
    description: String,
    amount: Decimal,
}

impl Bindable for InvoiceLine {
    fn bound_type() -> BoundType {
        BoundType::new("billing::InvoiceLine")
            .with_property(PropertyMapping::scalar("description", ScalarKind::String))
            .with_property(PropertyMapping::scalar("amount", ScalarKind::Decimal))
    }

    fn to_object(&self) -> Object {
        Object::new("billing::InvoiceLine")
            .with("description", self.description.as_str())
            .with("amount", self.amount)
    }

    fn from_object(mut object: Object) -> Result<Self> {
        Ok(Self {
            description: object.take_scalar("description")?.unwrap_or_default(),
            amount: object.take_scalar("amount")?.unwrap_or_default(),
        })
    }
}

impl Bindable for Invoice {
    fn bound_type() -> BoundType {
        BoundType::new("billing::Invoice")
            .with_namespace("urn:example:billing")
            .with_property(PropertyMapping::scalar("number", ScalarKind::String))
            .with_property(PropertyMapping::scalar("issued", ScalarKind::DateTime))
            .with_property(PropertyMapping::scalar("dueTime", ScalarKind::Time))
            .with_property(PropertyMapping::scalar("total", ScalarKind::Decimal))
            .with_property(PropertyMapping::scalar("kind", ScalarKind::QName))
            .with_property(
                PropertyMapping::collection("line", ItemKind::Nested("billing::InvoiceLine".into()))
                    .with_wrapper(WrapperSpec::new("lines")),
            )
    }

    fn to_object(&self) -> Object {
        Object::new("billing::Invoice")
            .with("number", self.number.as_str())
            .with("issued", self.issued)
            .with("dueTime", self.due_time)
            .with("total", self.total)
            .with("kind", self.kind.clone())
            .with("line", Value::list(self.lines.iter().map(Bindable::to_object)))
    }

    fn from_object(mut object: Object) -> Result<Self> {
        Ok(Self {
            number: object.take_scalar("number")?.unwrap_or_default(),
            issued: object
                .take_scalar("issued")?
                .unwrap_or_else(|| DateTime::<chrono::Utc>::UNIX_EPOCH.fixed_offset()),
            due_time: object.take_scalar("dueTime")?,
            total: object.take_scalar("total")?.unwrap_or_default(),
            kind: object
                .take_scalar("kind")?
                .unwrap_or_else(|| QName::local("invoice")),
            lines: object.take_nested_list("line")?.unwrap_or_default(),
        })
    }
}

fn invoice() -> Invoice {
    Invoice {
        number: "INV-7".to_string(),
        issued: DateTime::parse_from_rfc3339("2024-03-01T09:30:00+01:00").unwrap(),
        due_time: NaiveTime::from_hms_opt(17, 0, 0),
        total: dec!(12.50),
        kind: QName::new("urn:example:kinds", "standard"),
        lines: vec![
            InvoiceLine {
                description: "Widget".to_string(),
                amount: dec!(10.00),
            },
            InvoiceLine {
                description: "Shipping".to_string(),
                amount: dec!(2.50),
            },
        ],
    }
}

fn context(config: BindingConfig) -> BindingContext {
    BindingContext::builder()
        .bind_type::<BinaryCollectionRoot>()
        .bind_type::<Invoice>()
        .bind_type::<InvoiceLine>()
        .config(config)
        .build()
        .expect("valid descriptors")
}

#[test]
fn test_typed_round_trip_xml() -> Result<()> {
    let context = context(BindingConfig::xml());
    let text = context.marshaller().marshal_value(&invoice(), "")?;
    assert!(
        text.starts_with(
            r#"<?xml version="1.0" encoding="UTF-8"?><invoice xmlns="urn:example:billing">"#
        ),
        "{text}"
    );
    assert!(text.contains("<total>12.50</total>"), "{text}");
    assert!(text.contains("<kind>{urn:example:kinds}standard</kind>"), "{text}");
    assert!(text.contains("<issued>2024-03-01T09:30:00+01:00</issued>"), "{text}");

    let read: Invoice = context.unmarshaller().unmarshal_value(&text)?;
    assert_eq!(read, invoice());
    Ok(())
}

#[test]
fn test_typed_round_trip_json() -> Result<()> {
    let context = context(BindingConfig::json().with_formatted_output(true));
    let text = context.marshaller().marshal_value(&invoice(), "invoice")?;
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["invoice"]["number"], "INV-7");
    assert_eq!(json["invoice"]["dueTime"], "17:00:00");
    assert_eq!(json["invoice"]["lines"]["line"][1]["description"], "Shipping");
    assert!(text.contains("\"total\": 12.50"), "{text}");

    let read: Invoice = context.unmarshaller().unmarshal_value(&text)?;
    assert_eq!(read, invoice());
    Ok(())
}

#[test]
fn test_bound_element_keeps_root_name() -> Result<()> {
    let context = context(BindingConfig::xml());
    let element = BoundElement::new("custom-root", invoice().to_object());
    let text = context.marshaller().marshal_element(&element)?;
    assert!(text.contains("<custom-root xmlns=\"urn:example:billing\">"), "{text}");

    let read = context
        .unmarshaller()
        .unmarshal_element(&text, "billing::Invoice")?;
    assert_eq!(read, element);
    Ok(())
}

#[test]
fn test_binary_collection_typed() -> Result<()> {
    let root = BinaryCollectionRoot {
        wrapper_items: vec![b"Hello".to_vec(), b"World".to_vec()],
        xml_path_items: vec![b"foo".to_vec(), b"bar".to_vec()],
    };
    let context = context(
        BindingConfig::json()
            .with_include_root(false)
            .with_wrapper_as_array(true),
    );
    let text = context.marshaller().marshal_value(&root, "")?;
    assert_eq!(
        text,
        r#"{"wrapper-items":["SGVsbG8=","V29ybGQ="],"xml-path":{"items":["Zm9v","YmFy"]}}"#
    );
    let read: BinaryCollectionRoot = context.unmarshaller().unmarshal_value(&text)?;
    assert_eq!(read, root);
    Ok(())
}

#[test]
fn test_converter_override() -> Result<()> {
    let root = BinaryCollectionRoot {
        wrapper_items: vec![vec![0xfb, 0xff]],
        xml_path_items: vec![],
    };
    let config = BindingConfig::json()
        .with_include_root(false)
        .with_wrapper_as_array(true)
        .with_converter(ScalarKind::Binary, Arc::new(Base64UrlConverter));
    let context = context(config);

    let text = context.marshaller().marshal_value(&root, "")?;
    assert_eq!(text, r#"{"wrapper-items":["-_8="],"xml-path":{"items":[]}}"#);
    let read: BinaryCollectionRoot = context.unmarshaller().unmarshal_value(&text)?;
    assert_eq!(read, root);
    Ok(())
}

#[test]
fn test_context_is_shared_across_threads() {
    let context = Arc::new(context(BindingConfig::json()));
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let context = Arc::clone(&context);
            std::thread::spawn(move || {
                let mut value = invoice();
                value.number = format!("INV-{i}");
                let text = context.marshaller().marshal_value(&value, "invoice").unwrap();
                let read: Invoice = context.unmarshaller().unmarshal_value(&text).unwrap();
                assert_eq!(read, value);
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}
