//! End-to-end tests for term construction and wire encoding

use reqlwire::reql::{
    encode, make_function, make_term, r, Arg, Arguments, Datum, Encoder, OptArgs, Query,
    TermBuilder, TermType, VarCounter, WireDecoder,
};
use reqlwire::Error;
use serde_json::json;

#[test]
fn test_difference_of_two_arrays() {
    // DIFFERENCE([1, 2, 3], [2])
    let term = make_term(
        TermType::Difference,
        None,
        Arguments::from(vec![vec![1, 2, 3], vec![2]]),
        OptArgs::new(),
    )
    .expect("Failed to build DIFFERENCE");

    assert_eq!(
        encode(&term).unwrap(),
        json!([95, [[2, [1, 2, 3]], [2, [2]]]])
    );
}

#[test]
fn test_args_with_single_array() {
    let term = make_term(
        TermType::Args,
        None,
        Arguments::new().with(vec![1, 2, 3]),
        OptArgs::new(),
    )
    .expect("Failed to build ARGS");

    assert_eq!(encode(&term).unwrap(), json!([154, [[2, [1, 2, 3]]]]));
}

#[test]
fn test_chained_term_puts_previous_first() {
    // makeTerm(K2, previous = makeTerm(K1, [a]), [b])
    let k1 = make_term(TermType::Keys, None, Arguments::new().with(json!({"a": 1})), OptArgs::new())
        .unwrap();
    let k2 = make_term(TermType::Contains, Some(k1), Arguments::new().with("a"), OptArgs::new())
        .unwrap();

    assert_eq!(
        encode(&k2).unwrap(),
        json!([93, [[94, [[3, [], {"a": 1}]]], "a"]])
    );
}

#[test]
fn test_coerced_values_mirror_input() {
    let input = json!({
        "name": "Alice",
        "score": 9.5,
        "tags": ["a", "b", null],
        "nested": {"ok": true, "list": [[1], []]}
    });

    let term = r::expr(input).unwrap();
    assert_eq!(
        encode(&term).unwrap(),
        json!([3, [], {
            "name": "Alice",
            "score": 9.5,
            "tags": [2, ["a", "b", null]],
            "nested": [3, [], {"ok": true, "list": [2, [[2, [1]], [2, []]]]}]
        }])
    );
}

#[test]
fn test_integers_encode_exactly() {
    assert_eq!(encode(&r::expr(i64::MAX).unwrap()).unwrap(), json!(i64::MAX));
    assert_eq!(encode(&r::expr(u64::MAX).unwrap()).unwrap(), json!(u64::MAX));
    assert_eq!(
        encode(&r::expr(9_007_199_254_740_993i64).unwrap()).unwrap(),
        json!(9_007_199_254_740_993i64)
    );

    let doc = json!({"id": u64::MAX, "ids": [i64::MIN, 9_007_199_254_740_993u64]});
    let term = r::expr(doc).unwrap();
    let wire = encode(&term).unwrap();
    assert_eq!(
        wire,
        json!([3, [], {"id": u64::MAX, "ids": [2, [i64::MIN, 9_007_199_254_740_993u64]]}])
    );
    assert_eq!(WireDecoder::decode(&wire).unwrap(), term);
}

#[test]
fn test_floats_pass_through_unchanged() {
    assert_eq!(encode(&r::expr(2.5).unwrap()).unwrap(), json!(2.5));
    assert_eq!(encode(&r::expr(3.0).unwrap()).unwrap(), json!(3.0));
    let text = reqlwire::reql::encode_to_string(&r::expr(-0.0).unwrap()).unwrap();
    assert_eq!(text, "-0.0");
}

#[test]
fn test_arity_bounds_for_every_term_type() {
    for term_type in TermType::ALL {
        if *term_type == TermType::Datum {
            continue;
        }
        let arity = term_type.signature().arity;

        let at_min = make_term(*term_type, None, Arguments::from(vec![0; arity.min]), OptArgs::new());
        assert!(at_min.is_ok(), "{} rejected {} args", term_type, arity.min);

        if arity.min > 0 {
            let below = make_term(*term_type, None, Arguments::from(vec![0; arity.min - 1]), OptArgs::new());
            assert!(
                matches!(below, Err(Error::Arity { term, .. }) if term == *term_type),
                "{} accepted {} args",
                term_type,
                arity.min - 1
            );
        }

        if let Some(max) = arity.max {
            let above = make_term(*term_type, None, Arguments::from(vec![0; max + 1]), OptArgs::new());
            assert!(
                matches!(above, Err(Error::Arity { actual, .. }) if actual == max + 1),
                "{} accepted {} args",
                term_type,
                max + 1
            );
        }
    }
}

#[test]
fn test_unrecognised_optarg_is_named() {
    let err = TermBuilder::new(TermType::Filter)
        .previous(r::table("users").unwrap())
        .arg(true)
        .optarg("foo", 1)
        .build()
        .unwrap_err();

    match err {
        Error::UnsupportedOption { option, term } => {
            assert_eq!(option, "foo");
            assert_eq!(term, TermType::Filter);
        }
        other => panic!("Expected unsupported option, got {:?}", other),
    }

    let ok = TermBuilder::new(TermType::Filter)
        .previous(r::table("users").unwrap())
        .arg(true)
        .optarg("default", false)
        .build();
    assert!(ok.is_ok());
}

#[test]
fn test_encoding_is_deterministic() {
    let build = || {
        TermBuilder::new(TermType::TableCreate)
            .previous(r::db("test").unwrap())
            .arg("events")
            .optarg("shards", 2)
            .optarg("primary_key", "event_id")
            .optarg("durability", "soft")
            .build()
            .unwrap()
    };

    let first = Encoder::new().encode_to_vec(&build()).unwrap();
    let second = Encoder::new().encode_to_vec(&build()).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        String::from_utf8(first).unwrap(),
        r#"[60,[[14,["test"]],"events"],{"shards":2,"primary_key":"event_id","durability":"soft"}]"#
    );
}

#[test]
fn test_function_with_isolated_counter() {
    let vars = VarCounter::new();
    let query = r::table("users")
        .unwrap()
        .filter(
            make_function(&vars, 1, |params| {
                params[0].clone().get_field("age")?.ge(18)
            })
            .unwrap(),
        )
        .unwrap();

    assert_eq!(
        encode(&query).unwrap(),
        json!([39, [
            [15, ["users"]],
            [69, [[2, [1]], [22, [[31, [[10, [1]], "age"]], 18]]]]
        ]])
    );
}

#[test]
fn test_unencodable_datum_is_located() {
    let query = r::table("users")
        .unwrap()
        .get(Arg::Term(reqlwire::Term::datum(Datum::Number(f64::NAN))))
        .unwrap();

    let err = encode(&query).unwrap_err();
    match &err {
        Error::Encode { parent, term, .. } => {
            assert_eq!(*parent, TermType::Get);
            assert_eq!(*term, TermType::Datum);
        }
        other => panic!("Expected encode error, got {:?}", other),
    }
    assert!(err.to_string().contains("argument 1 of GET"));
}

#[test]
fn test_query_envelope_round_trip() {
    let term = r::db("app")
        .unwrap()
        .table("events")
        .unwrap()
        .order_by(vec![r::desc("ts").unwrap()])
        .unwrap()
        .limit(20)
        .unwrap();

    let wire = Query::start(term.clone())
        .global_optarg("durability", "soft")
        .unwrap()
        .encode(&Encoder::new())
        .unwrap();

    assert_eq!(wire[0], json!(1));
    assert_eq!(wire[2], json!({"durability": "soft"}));
    assert_eq!(WireDecoder::decode(&wire[1]).unwrap(), term);
}
