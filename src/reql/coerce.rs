//! Value coercion: native values into terms.
//!
//! Scalars become DATUM terms, arrays become MAKE_ARRAY terms and objects
//! become MAKE_OBJ terms. Existing terms pass through unchanged, wherever
//! they appear in the input.

use super::args::Arg;
use super::ast::Term;
use super::datum::Datum;
use super::terms::TermType;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt::Write as _;

/// Coerces any term input into a term.
///
/// # Example
///
/// ```rust
/// use reqlwire::reql::{coerce, TermType};
///
/// let term = coerce(vec![1, 2, 3]).unwrap();
/// assert_eq!(term.term_type(), TermType::MakeArray);
/// assert_eq!(term.args().len(), 3);
/// ```
pub fn coerce(value: impl Into<Arg>) -> Result<Term> {
    coerce_at(value.into(), &mut Path::value())
}

/// Coerces any serde-serializable value.
///
/// Serializer failures (for example a map keyed by something other than
/// strings) surface as construction errors.
pub fn coerce_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Term> {
    let json = serde_json::to_value(value).map_err(|e| Error::construction("$", e.to_string()))?;
    coerce(Datum::from(json))
}

/// Location of the value being coerced, rendered only on failure.
#[derive(Debug, Clone)]
pub(crate) struct Path {
    root: Root,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone)]
enum Root {
    Value,
    Positional(usize),
    Named(String),
}

#[derive(Debug, Clone)]
enum Segment {
    Index(usize),
    Key(String),
}

impl Path {
    pub(crate) fn value() -> Self {
        Self {
            root: Root::Value,
            segments: Vec::new(),
        }
    }

    pub(crate) fn positional(index: usize) -> Self {
        Self {
            root: Root::Positional(index),
            segments: Vec::new(),
        }
    }

    pub(crate) fn named(name: &str) -> Self {
        Self {
            root: Root::Named(name.to_string()),
            segments: Vec::new(),
        }
    }

    fn render(&self) -> String {
        let mut out = match &self.root {
            Root::Value => "$".to_string(),
            Root::Positional(index) => format!("$args[{}]", index),
            Root::Named(name) => format!("$optargs.{}", name),
        };
        for segment in &self.segments {
            let _ = match segment {
                Segment::Index(index) => write!(out, "[{}]", index),
                Segment::Key(key) => write!(out, ".{}", key),
            };
        }
        out
    }

    fn fail(&self, reason: impl Into<String>) -> Error {
        Error::construction(self.render(), reason)
    }
}

pub(crate) fn coerce_at(arg: Arg, path: &mut Path) -> Result<Term> {
    match arg {
        Arg::Term(term) => Ok(term),
        Arg::Value(datum) => coerce_datum(datum, path),
        Arg::Array(items) => {
            let mut elements = Vec::with_capacity(items.len());
            for item in flatten(items) {
                path.segments.push(Segment::Index(elements.len()));
                let term = coerce_at(item, path)?;
                path.segments.pop();
                elements.push(term);
            }
            Ok(Term::from_parts(TermType::MakeArray, elements, IndexMap::new()))
        }
        Arg::Object(fields) => {
            let mut named = IndexMap::with_capacity(fields.len());
            for (key, value) in fields {
                path.segments.push(Segment::Key(key.clone()));
                let term = coerce_at(value, path)?;
                path.segments.pop();
                named.insert(key, term);
            }
            Ok(Term::from_parts(TermType::MakeObj, Vec::new(), named))
        }
        Arg::Bundle(_) => Err(path.fail("an argument bundle is only valid in a positional argument list")),
    }
}

fn coerce_datum(datum: Datum, path: &mut Path) -> Result<Term> {
    match datum {
        Datum::Number(n) if !n.is_finite() => {
            Err(path.fail(format!("number {} has no JSON representation", n)))
        }
        Datum::Array(items) => coerce_at(Arg::Array(items.into_iter().map(Arg::Value).collect()), path),
        Datum::Object(fields) => coerce_at(
            Arg::Object(fields.into_iter().map(|(k, v)| (k, Arg::Value(v))).collect()),
            path,
        ),
        scalar => Ok(Term::datum(scalar)),
    }
}

/// Splices bundles found among array elements.
fn flatten(items: Vec<Arg>) -> Vec<Arg> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Arg::Bundle(inner) => out.extend(flatten(inner)),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reql::encode;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[test]
    fn test_scalars_become_datums() {
        for value in [Arg::from(true), Arg::from(1.5), Arg::from("s"), Arg::from(None::<i32>)] {
            let term = coerce(value).unwrap();
            assert!(term.is_datum());
            assert!(term.args().is_empty());
        }
    }

    #[test]
    fn test_existing_term_is_returned_unchanged() {
        let term = coerce(vec![1, 2]).unwrap();
        assert_eq!(coerce(term.clone()).unwrap(), term);
    }

    #[test]
    fn test_nested_shape_mirrors_input() {
        let term = coerce(json!({"a": [1, {"b": null}], "c": "x"})).unwrap();
        assert_eq!(
            encode(&term).unwrap(),
            json!([3, [], {"a": [2, [1, [3, [], {"b": null}]]], "c": "x"}])
        );
    }

    #[test]
    fn test_terms_inside_arrays_are_kept() {
        let var = Term::var(7);
        let term = coerce(vec![Arg::from(1), Arg::from(var.clone())]).unwrap();
        assert_eq!(term.arg(1), Some(&var));
    }

    #[test]
    fn test_non_finite_number_reports_position() {
        let mut inner = IndexMap::new();
        inner.insert("score".to_string(), Datum::Number(f64::INFINITY));
        let value = Datum::Array(vec![Datum::Null, Datum::Object(inner)]);

        match coerce(value) {
            Err(Error::Construction { path, reason }) => {
                assert_eq!(path, "$[1].score");
                assert!(reason.contains("inf"));
            }
            other => panic!("Expected construction error, got {:?}", other),
        }
    }

    #[test]
    fn test_bundle_outside_argument_list_fails() {
        let mut fields = IndexMap::new();
        fields.insert("k".to_string(), Arg::bundle(vec![1]));
        assert!(matches!(
            coerce(Arg::Object(fields)),
            Err(Error::Construction { .. })
        ));
    }

    #[test]
    fn test_coerce_serialize() {
        #[derive(Serialize)]
        struct User {
            name: String,
            tags: Vec<&'static str>,
        }

        let user = User {
            name: "Alice".into(),
            tags: vec!["admin"],
        };
        let term = coerce_serialize(&user).unwrap();
        assert_eq!(
            encode(&term).unwrap(),
            json!([3, [], {"name": "Alice", "tags": [2, ["admin"]]}])
        );
    }

    #[test]
    fn test_coerce_serialize_rejects_non_string_keys() {
        let mut map = BTreeMap::new();
        map.insert(vec![1u8], 1);
        assert!(matches!(
            coerce_serialize(&map),
            Err(Error::Construction { .. })
        ));
    }
}
