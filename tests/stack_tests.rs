use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::time::Duration;
use tick_expr::{Node, Pattern, Stack, StackError, StackItem, Value};

#[test]
fn test_typed_push_round_trip() {
    let mut st = Stack::new();
    st.push_int64(7);
    st.push_float64(1.5);
    st.push_bool(true);
    st.push_string("abc");
    st.push_regex(Pattern::new("f.o").unwrap());

    assert_eq!(st.pop_item(), Ok(StackItem::Regex(Pattern::new("f.o").unwrap())));
    assert_eq!(st.pop_item(), Ok(StackItem::String("abc".into())));
    assert_eq!(st.pop_item(), Ok(StackItem::Bool(true)));
    assert_eq!(st.pop_item(), Ok(StackItem::Float64(1.5)));
    assert_eq!(st.pop_item(), Ok(StackItem::Int64(7)));
    assert_eq!(st.pop_item(), Err(StackError::Empty));
}

#[test]
fn test_generic_push_infers_tag() {
    let mut st = Stack::new();
    st.push(Value::Bool(false));
    st.push(Value::Int(3));
    st.push(Value::Float(2.0));
    st.push(Value::String("s".into()));

    assert_eq!(st.pop_item(), Ok(StackItem::String("s".into())));
    assert_eq!(st.pop_item(), Ok(StackItem::Float64(2.0)));
    assert_eq!(st.pop_item(), Ok(StackItem::Int64(3)));
    assert_eq!(st.pop_item(), Ok(StackItem::Bool(false)));
}

#[test]
fn test_from_value_never_wraps_scalars_in_generic() {
    assert_eq!(StackItem::from(Value::Int(1)), StackItem::Int64(1));
    assert_eq!(StackItem::from(Value::Float(0.5)), StackItem::Float64(0.5));
    assert_eq!(StackItem::from(Value::Bool(true)), StackItem::Bool(true));
    assert_eq!(StackItem::from(Value::from("s")), StackItem::String("s".into()));
}

#[test]
fn test_generic_push_of_other_values() {
    let mut st = Stack::new();
    let regex = Value::Regex(Pattern::new("^a").unwrap());
    st.push(Value::Duration(Duration::from_secs(10)));
    st.push(regex.clone());
    st.push(Value::Node(Node::Star));

    assert_eq!(st.pop_item(), Ok(StackItem::Generic(Value::Node(Node::Star))));
    // Only push_regex assigns the Regex tag
    assert_eq!(st.pop_item(), Ok(StackItem::Generic(regex)));
    assert_eq!(
        st.pop(),
        Ok(Value::Duration(Duration::from_secs(10)))
    );
}

#[test]
fn test_pop_unwraps_active_variant() {
    let mut st = Stack::new();
    st.push_regex(Pattern::new("x+").unwrap());
    st.push_float64(0.25);

    assert_eq!(st.pop(), Ok(Value::Float(0.25)));
    assert_eq!(st.pop(), Ok(Value::Regex(Pattern::new("x+").unwrap())));
}

#[test]
fn test_empty_pop_never_yields_default() {
    let mut st = Stack::new();
    st.push_int64(0);
    assert_eq!(st.pop(), Ok(Value::Int(0)));
    assert_eq!(st.pop(), Err(StackError::Empty));
    assert_eq!(st.len(), 0);
}

#[test]
fn test_display_renders_top_first() {
    let mut st = Stack::new();
    st.push_bool(true);
    st.push_float64(2.5);
    st.push_regex(Pattern::new("^a").unwrap());

    assert_eq!(st.to_string(), "s[regex:/^a/,float64:2.5,bool:true,]");
}

fn scalar_value() -> impl Strategy<Value = Value> {
    // NaN never equals itself, so floats stay finite
    prop_oneof![
        any::<i64>().prop_map(Value::Int),
        (-1e12f64..1e12).prop_map(Value::Float),
        any::<bool>().prop_map(Value::Bool),
        "[a-z0-9 ]{0,12}".prop_map(Value::String),
    ]
}

proptest! {
    #[test]
    fn prop_pops_reverse_pushes(values in prop::collection::vec(scalar_value(), 0..64)) {
        let mut st = Stack::new();
        for v in &values {
            st.push(v.clone());
        }
        prop_assert_eq!(st.len(), values.len());

        let mut popped = Vec::new();
        while let Ok(v) = st.pop() {
            popped.push(v);
        }
        let expected: Vec<Value> = values.into_iter().rev().collect();
        prop_assert_eq!(popped, expected);
        prop_assert_eq!(st.pop(), Err(StackError::Empty));
    }

    #[test]
    fn prop_generic_push_tags_scalars(v in scalar_value()) {
        let item = StackItem::from(v.clone());
        prop_assert!(!matches!(item, StackItem::Generic(_)));
        prop_assert_eq!(item.value(), v);
    }
}
