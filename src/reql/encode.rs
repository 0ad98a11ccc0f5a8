//! Term tree to JSON wire encoding.
//!
//! # Wire Protocol Format
//!
//! Every non-datum term is sent as
//! ```json
//! [term_type, [arg1, arg2, ...], {"optarg1": value1, ...}]
//! ```
//! with the third element present only when the term has named arguments.
//! DATUM terms are sent as the raw JSON scalar. Arguments are emitted in
//! order, and named arguments in insertion order, so equal trees always
//! produce identical bytes.

use super::ast::{ArgPosition, Term};
use crate::error::{Error, Result};
use serde::ser::{Error as _, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

/// Configurable term encoder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Encoder {
    max_depth: Option<usize>,
}

impl Encoder {
    /// An encoder without a nesting limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects trees nested deeper than `depth` levels.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Encode a term tree into its wire value.
    #[instrument(level = "debug", skip(self, term), fields(term_type = %term.term_type()))]
    pub fn encode(&self, term: &Term) -> Result<Value> {
        metrics::counter!("reql_encode_total").increment(1);
        let result = self.encode_term(term, 1);
        match &result {
            Ok(_) => debug!("Encoded term"),
            Err(e) => {
                metrics::counter!("reql_encode_errors_total").increment(1);
                debug!(error = %e, "Term encoding failed");
            }
        }
        result
    }

    /// Encode a term tree into compact JSON text.
    pub fn encode_to_string(&self, term: &Term) -> Result<String> {
        Ok(serde_json::to_string(&self.encode(term)?)?)
    }

    /// Encode a term tree into compact JSON bytes.
    pub fn encode_to_vec(&self, term: &Term) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.encode(term)?)?)
    }

    fn encode_term(&self, term: &Term, depth: usize) -> Result<Value> {
        if let Some(max) = self.max_depth {
            if depth > max {
                return Err(Error::DepthExceeded(max));
            }
        }

        if term.is_datum() {
            return encode_datum(term);
        }

        let mut args = Vec::with_capacity(term.args().len());
        for (index, arg) in term.args().iter().enumerate() {
            let value = self
                .encode_term(arg, depth + 1)
                .map_err(|e| locate(e, term, ArgPosition::Positional(index), arg))?;
            args.push(value);
        }

        let mut triple = vec![Value::from(term.term_type().to_u64()), Value::Array(args)];

        if !term.optargs().is_empty() {
            let mut optargs = Map::with_capacity(term.optargs().len());
            for (name, value) in term.optargs() {
                let encoded = self
                    .encode_term(value, depth + 1)
                    .map_err(|e| locate(e, term, ArgPosition::Named(name.clone()), value))?;
                optargs.insert(name.clone(), encoded);
            }
            triple.push(Value::Object(optargs));
        }

        Ok(Value::Array(triple))
    }
}

fn encode_datum(term: &Term) -> Result<Value> {
    let datum = term
        .as_datum()
        .ok_or_else(|| Error::Unencodable("DATUM term without a value".to_string()))?;
    datum.to_wire_scalar().ok_or_else(|| {
        Error::Unencodable(format!(
            "DATUM terms hold JSON scalars only, got {}",
            datum
        ))
    })
}

/// Attaches the failing child's location, once, at its innermost parent.
fn locate(err: Error, parent: &Term, position: ArgPosition, child: &Term) -> Error {
    match err {
        located @ Error::Encode { .. } => located,
        source => Error::Encode {
            parent: parent.term_type(),
            position,
            term: child.term_type(),
            source: Box::new(source),
        },
    }
}

/// Encode a term with the default encoder.
///
/// ```rust
/// use reqlwire::reql::{encode, make_term, Arguments, OptArgs, TermType};
/// use serde_json::json;
///
/// let term = make_term(
///     TermType::Difference,
///     None,
///     Arguments::from(vec![vec![1, 2, 3], vec![2]]),
///     OptArgs::new(),
/// )?;
/// assert_eq!(encode(&term)?, json!([95, [[2, [1, 2, 3]], [2, [2]]]]));
/// # Ok::<(), reqlwire::Error>(())
/// ```
pub fn encode(term: &Term) -> Result<Value> {
    Encoder::new().encode(term)
}

pub fn encode_to_string(term: &Term) -> Result<String> {
    Encoder::new().encode_to_string(term)
}

impl Serialize for Term {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        encode(self)
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reql::{make_term, r, Arg, Arguments, Datum, OptArgs, TermBuilder, TermType};
    use serde_json::json;

    #[test]
    fn test_datum_passes_through() {
        assert_eq!(encode(&Term::datum("hi")).unwrap(), json!("hi"));
        assert_eq!(encode(&Term::datum(Datum::Null)).unwrap(), json!(null));
        assert_eq!(encode(&Term::datum(false)).unwrap(), json!(false));
        assert_eq!(encode(&Term::datum(2.5)).unwrap(), json!(2.5));
    }

    #[test]
    fn test_args_bundle_term() {
        let term = make_term(
            TermType::Args,
            None,
            Arguments::from(vec![vec![1, 2, 3]]),
            OptArgs::new(),
        )
        .unwrap();
        assert_eq!(encode(&term).unwrap(), json!([154, [[2, [1, 2, 3]]]]));
    }

    #[test]
    fn test_chaining_places_previous_first() {
        let inner = make_term(TermType::Count, None, Arguments::new().with(vec![1]), OptArgs::new())
            .unwrap();
        let outer = make_term(TermType::Add, Some(inner), Arguments::new().with(5), OptArgs::new())
            .unwrap();
        assert_eq!(
            encode(&outer).unwrap(),
            json!([24, [[43, [[2, [1]]]], 5]])
        );
    }

    #[test]
    fn test_optargs_follow_insertion_order() {
        let query = TermBuilder::new(TermType::Insert)
            .previous(r::table("users").unwrap())
            .arg(json!({"id": 1}))
            .optarg("return_changes", true)
            .optarg("durability", "soft")
            .optarg("conflict", "replace")
            .build()
            .unwrap();

        let text = encode_to_string(&query).unwrap();
        assert_eq!(
            text,
            r#"[56,[[15,["users"]],[3,[],{"id":1}]],{"return_changes":true,"durability":"soft","conflict":"replace"}]"#
        );
        assert_eq!(text, encode_to_string(&query.clone()).unwrap());
    }

    #[test]
    fn test_empty_optargs_are_omitted() {
        let wire = encode(&r::db_list().unwrap()).unwrap();
        assert_eq!(wire, json!([59, []]));
    }

    #[test]
    fn test_failure_names_innermost_parent() {
        let bad = Term::datum(f64::NAN);
        let inner = make_term(TermType::MakeArray, None, Arguments::new().with(1).with(bad), OptArgs::new())
            .unwrap();
        let outer = r::table("users").unwrap().insert(inner).unwrap();

        match encode(&outer).unwrap_err() {
            Error::Encode { parent, position, term, source } => {
                assert_eq!(parent, TermType::MakeArray);
                assert_eq!(position, ArgPosition::Positional(1));
                assert_eq!(term, TermType::Datum);
                assert!(matches!(*source, Error::Unencodable(_)));
            }
            other => panic!("Expected encode error, got {:?}", other),
        }
    }

    #[test]
    fn test_failure_in_named_argument() {
        let query = TermBuilder::new(TermType::Table)
            .arg("users")
            .optarg("read_mode", Arg::Term(Term::datum(vec![1, 2])))
            .build()
            .unwrap();

        match encode(&query).unwrap_err() {
            Error::Encode { parent, position, .. } => {
                assert_eq!(parent, TermType::Table);
                assert_eq!(position, ArgPosition::Named("read_mode".into()));
            }
            other => panic!("Expected encode error, got {:?}", other),
        }
    }

    #[test]
    fn test_max_depth() {
        let mut term = r::expr(0).unwrap();
        for _ in 0..10 {
            term = term.add(1).unwrap();
        }
        assert_eq!(term.depth(), 11);
        assert!(Encoder::new().with_max_depth(11).encode(&term).is_ok());

        match Encoder::new().with_max_depth(5).encode(&term).unwrap_err() {
            Error::Encode { source, .. } => assert!(matches!(*source, Error::DepthExceeded(5))),
            other => panic!("Expected encode error, got {:?}", other),
        }
    }

    #[test]
    fn test_long_chains_encode() {
        let mut term = r::expr(vec![0]).unwrap();
        for i in 0..500 {
            term = term.difference(vec![i]).unwrap();
        }
        let wire = encode(&term).unwrap();
        assert_eq!(wire[0], json!(95));
        assert_eq!(wire[1][1], json!([2, [499]]));
    }

    #[test]
    fn test_serialize_impl_matches_encode() {
        let term = r::table("users").unwrap().count().unwrap();
        assert_eq!(
            serde_json::to_value(&term).unwrap(),
            encode(&term).unwrap()
        );
    }
}
