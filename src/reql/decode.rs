//! Wire term decoder.
//!
//! Parses JSON wire terms back into validated term trees. Every decoded
//! node goes through [`make_term`], so a wire query with a wrong argument
//! count or an unknown optarg is rejected exactly as the builder would
//! reject it.
//!
//! # Example
//!
//! JSON for `r.table("users").filter({active: true})`:
//!
//! ```json
//! [39, [[15, ["users"]], {"active": true}]]
//! ```

use super::args::{Arg, Arguments, OptArgs};
use super::ast::{make_term, Term};
use super::datum::Datum;
use super::terms::TermType;
use crate::error::{Error, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

/// Decoder for JSON wire terms.
pub struct WireDecoder;

impl WireDecoder {
    /// Decode a JSON value into a term tree.
    #[instrument(level = "debug", skip(json))]
    pub fn decode(json: &Value) -> Result<Term> {
        let term = Self::decode_term(json, "$")?;
        debug!(term_type = %term.term_type(), depth = term.depth(), "Decoded wire term");
        Ok(term)
    }

    /// Decode JSON text into a term tree.
    ///
    /// Every chained call adds two levels of array nesting, so the parser's
    /// default nesting limit is lifted; `serde_stacker` grows the stack
    /// instead.
    pub fn decode_str(text: &str) -> Result<Term> {
        let mut parser = serde_json::Deserializer::from_str(text);
        parser.disable_recursion_limit();
        let json = Value::deserialize(serde_stacker::Deserializer::new(&mut parser))?;
        parser.end()?;
        Self::decode(&json)
    }

    fn decode_term(json: &Value, path: &str) -> Result<Term> {
        match json {
            Value::Array(triple) => Self::decode_triple(triple, path),
            Value::Object(fields) => {
                let mut optargs = OptArgs::new();
                for (key, value) in fields {
                    let term = Self::decode_term(value, &format!("{}.{}", path, key))?;
                    optargs.insert(key.clone(), term);
                }
                make_term(TermType::MakeObj, None, Arguments::new(), optargs)
            }
            scalar => Ok(Term::datum(Self::json_to_scalar(scalar, path)?)),
        }
    }

    fn decode_triple(triple: &[Value], path: &str) -> Result<Term> {
        if triple.is_empty() || triple.len() > 3 {
            return Err(Error::decode(
                path,
                format!("a term has 1 to 3 elements, got {}", triple.len()),
            ));
        }

        let tag = triple[0].as_u64().ok_or_else(|| {
            Error::decode(path, format!("expected a term type number, got {}", triple[0]))
        })?;
        let term_type = TermType::from_u64(tag)
            .ok_or_else(|| Error::decode(path, format!("unknown term type {}", tag)))?;
        if term_type == TermType::Datum {
            return Err(Error::decode(path, "DATUM terms are sent as raw values"));
        }

        let mut args = Arguments::new();
        match triple.get(1) {
            None => {}
            Some(Value::Array(items)) => {
                for (index, item) in items.iter().enumerate() {
                    let arg = Self::decode_term(item, &format!("{}[1][{}]", path, index))?;
                    args.push(Arg::Term(arg));
                }
            }
            Some(other) => {
                return Err(Error::decode(
                    path,
                    format!("expected an argument array, got {}", other),
                ))
            }
        }

        let mut optargs = OptArgs::new();
        match triple.get(2) {
            None => {}
            Some(Value::Object(fields)) => {
                for (key, value) in fields {
                    let term = Self::decode_term(value, &format!("{}[2].{}", path, key))?;
                    optargs.insert(key.clone(), term);
                }
            }
            Some(other) => {
                return Err(Error::decode(
                    path,
                    format!("expected an optarg object, got {}", other),
                ))
            }
        }

        make_term(term_type, None, args, optargs)
    }

    fn json_to_scalar(json: &Value, path: &str) -> Result<Datum> {
        match json {
            Value::Null => Ok(Datum::Null),
            Value::Bool(b) => Ok(Datum::Boolean(*b)),
            Value::Number(n) => Ok(Datum::from(n.clone())),
            Value::String(s) => Ok(Datum::String(s.clone())),
            Value::Array(_) | Value::Object(_) => {
                Err(Error::decode(path, "expected a scalar value"))
            }
        }
    }
}
