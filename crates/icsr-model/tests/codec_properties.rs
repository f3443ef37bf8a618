//! Property tests for the scalar codec.

use icsr_model::codec::{decode, decode_node, decode_nullable, encode};
use icsr_model::{
    CodeList, DatePrecision, FieldType, Hl7Date, NullFlavor, Nullable, Scalar, ScalarValue,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn any_flavor() -> impl Strategy<Value = NullFlavor> {
    prop::sample::select(NullFlavor::ALL.to_vec())
}

fn any_case_bool() -> impl Strategy<Value = (bool, String)> {
    (any::<bool>(), prop::collection::vec(any::<bool>(), 5)).prop_map(|(value, upper)| {
        let text: String = value
            .to_string()
            .chars()
            .zip(upper)
            .map(|(c, up)| if up { c.to_ascii_uppercase() } else { c })
            .collect();
        (value, text)
    })
}

proptest! {
    #[test]
    fn null_flavor_always_wins(raw in ".*", flavor in any_flavor()) {
        let decoded = decode_node(Some(&raw), Some(flavor.as_str()), FieldType::Integer, "f")
            .unwrap();
        prop_assert_eq!(decoded, Some(ScalarValue::NullFlavor(flavor)));
    }

    #[test]
    fn booleans_ignore_case((value, text) in any_case_bool()) {
        prop_assert_eq!(
            decode(&text, FieldType::Boolean, "f").unwrap(),
            ScalarValue::Boolean(value)
        );
    }

    #[test]
    fn integers_survive_encoding(value in any::<i64>()) {
        let encoded = value.encode();
        prop_assert_eq!(i64::decode(&encoded, "f").unwrap(), value);
    }

    #[test]
    fn decimals_keep_their_scale(mantissa in -1_000_000_000i64..1_000_000_000, scale in 0u32..6) {
        let value = Decimal::new(mantissa, scale);
        let decoded = Decimal::decode(&value.encode(), "f").unwrap();
        prop_assert_eq!(decoded.to_string(), value.to_string());
    }

    #[test]
    fn text_is_not_altered(text in "\\PC{0,80}") {
        prop_assert_eq!(String::decode(&text, "f").unwrap(), text);
    }

    #[test]
    fn calendar_days_parse_with_day_precision(
        year in 1900i32..2100,
        month in 1u32..=12,
        day in 1u32..=28,
    ) {
        let raw = format!("{year:04}{month:02}{day:02}");
        let date = Hl7Date::parse(&raw).unwrap();
        prop_assert_eq!(date.precision(), DatePrecision::Day);
        prop_assert_eq!(date.as_str(), raw.as_str());
        prop_assert_eq!(date.year(), year);
    }

    #[test]
    fn codes_outside_the_list_are_rejected(code in 100i64..10_000) {
        prop_assert!(decode(&code.to_string(), FieldType::Code(CodeList::DrugRole), "g_k_1").is_err());
    }
}

#[test]
fn nullable_decode_prefers_flavor() {
    let decoded: Option<Nullable<i64>> = decode_nullable(Some("5"), Some("UNK"), "d_4_height").unwrap();
    assert_eq!(decoded, Some(Nullable::NullFlavor(NullFlavor::Unk)));
}

#[test]
fn encode_matches_wire_forms() {
    assert_eq!(encode(&ScalarValue::Boolean(true)), "true");
    assert_eq!(encode(&ScalarValue::NullFlavor(NullFlavor::Asku)), "ASKU");
    assert_eq!(encode(&ScalarValue::Code(3)), "3");
}
