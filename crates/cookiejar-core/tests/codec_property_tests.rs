// Property tests for the store-file codec

use cookiejar_core::codec::{self, Escaping, JsonOptions};
use cookiejar_core::Entries;
use proptest::prelude::*;
use serde_json::{json, Value};

fn arb_text() -> impl Strategy<Value = String> {
    // Includes characters the tolerant reader must leave alone inside strings
    r#"[a-zA-Z0-9 ,/*\\"\]}éü<>&]{0,12}"#
}

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        arb_text().prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..6)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

fn arb_entries() -> impl Strategy<Value = Entries> {
    prop::collection::btree_map(arb_text(), arb_json(), 0..8)
        .prop_map(|map| map.into_iter().collect())
}

fn arb_options() -> impl Strategy<Value = JsonOptions> {
    (
        prop_oneof![Just(Escaping::Relaxed), Just(Escaping::Strict)],
        prop_oneof![Just('\t'), Just(' ')],
        0usize..4,
    )
        .prop_map(|(escaping, indent_char, indent_size)| JsonOptions {
            indent_char,
            indent_size,
            escaping,
            ..JsonOptions::default()
        })
}

proptest! {
    #[test]
    fn written_documents_read_back_equal(entries in arb_entries(), options in arb_options()) {
        let text = codec::serialize(&entries, &options).unwrap();
        let parsed = codec::deserialize(&text, &options).unwrap();
        prop_assert_eq!(parsed, entries);
    }

    #[test]
    fn tolerant_reader_is_transparent_for_plain_json(entries in arb_entries()) {
        let text = serde_json::to_string(&entries).unwrap();
        let tolerant = codec::deserialize(&text, &JsonOptions::default()).unwrap();
        let strict = codec::deserialize(&text, &JsonOptions::default().strict_reader()).unwrap();
        prop_assert_eq!(tolerant, strict);
    }

    #[test]
    fn strict_escaping_output_is_ascii(entries in arb_entries()) {
        let options = JsonOptions { escaping: Escaping::Strict, ..JsonOptions::default() };
        let text = codec::serialize(&entries, &options).unwrap();
        prop_assert!(text.is_ascii());
        prop_assert!(!text.contains('<') && !text.contains('&'));
    }
}
