use std::sync::Arc;

use array_literal::bind::{interpret_received_with, prepare_bind_element};
use array_literal::codec::IntCodec;
use array_literal::{
    interpret_received, ArrayValue, BindValue, BoxValue, Dialect, Element, ElementKind, ErrorKind,
    Shape, ShapeRegistry,
};
use rstest::rstest;

fn int_row(values: &[i64]) -> ArrayValue<Element> {
    ArrayValue::from_elements(values.iter().map(|v| Some(Element::Int(*v))))
}

#[rstest]
#[case(BindValue::Literal("{{1,2},{3,4}}".to_string()), "{{1,2},{3,4}}")]
#[case(BindValue::List(vec![int_row(&[1, 2]), int_row(&[3, 4])]), "{{1,2},{3,4}}")]
#[case(
    BindValue::Array(ArrayValue::Array(vec![int_row(&[1, 2]), int_row(&[3, 4])])),
    "{{1,2},{3,4}}"
)]
fn bind_forms_agree(#[case] input: BindValue<Element>, #[case] expected: &str) {
    let shape = Shape::new(ElementKind::Int4, 2);
    assert_eq!(
        prepare_bind_element(&input, shape, Dialect::Postgres).unwrap(),
        expected
    );
}

#[rstest]
fn bind_rejects_literal_without_braces() {
    let shape = Shape::new(ElementKind::Int4, 1);
    let err = prepare_bind_element(&BindValue::Literal("1,2".into()), shape, Dialect::Postgres)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
}

#[rstest]
fn received_value_round_trips_through_bind() {
    let shape = Shape::new(ElementKind::Text, 2);
    let received = interpret_received(r#"{{"a b",NULL},{c,"d\\e"}}"#, shape, Dialect::Postgres)
        .unwrap();
    let text = prepare_bind_element(&BindValue::Array(received.clone()), shape, Dialect::Postgres)
        .unwrap();
    assert_eq!(interpret_received(&text, shape, Dialect::Postgres).unwrap(), received);
}

#[rstest]
fn received_with_custom_strategy() {
    let shape = Shape::new(ElementKind::Int8, 1);
    let value = interpret_received_with("{5,NULL}", shape, Dialect::Standard, &IntCodec::int8())
        .unwrap();
    assert_eq!(value, ArrayValue::from_elements([Some(5), None]));
}

#[rstest]
fn box_elements_use_semicolon_in_postgres() {
    let shape = Shape::new(ElementKind::Box, 1);
    let value = ArrayValue::from_elements([Some(Element::Box(BoxValue {
        high: (2.0, 2.0),
        low: (0.0, 0.0),
    }))]);
    let bound = prepare_bind_element(&BindValue::Array(value.clone()), shape, Dialect::Postgres)
        .unwrap();
    assert_eq!(interpret_received(&bound, shape, Dialect::Postgres).unwrap(), value);
}

#[rstest]
fn global_registry_shares_codecs() {
    let shape = Shape::new(ElementKind::Float8, 3);
    let first = ShapeRegistry::global().get_or_create(shape, Dialect::Standard);
    let second = ShapeRegistry::global().get_or_create(shape, Dialect::Standard);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.shape(), shape);
}

#[rstest]
fn shape_helpers_decode_and_encode() {
    let shape = Shape::new(ElementKind::Bool, 1);
    let value = array_literal::decode_shape("{t,NULL,false}", shape, Dialect::Postgres).unwrap();
    assert_eq!(
        array_literal::encode_shape(&value, shape, Dialect::Postgres).unwrap(),
        "{t,null,f}"
    );
}
