//! ReQL (RethinkDB Query Language) query construction.
//!
//! This module turns chained query-building calls into a term tree and
//! the term tree into the JSON wire form the server executes:
//!
//! - **Term Types** (`terms.rs`): every operation kind with its arity and
//!   recognised optargs
//! - **Datum** (`datum.rs`) and **coercion** (`coerce.rs`): native values
//!   into DATUM, MAKE_ARRAY and MAKE_OBJ terms
//! - **Arguments** (`args.rs`): positional and named argument containers
//! - **AST** (`ast.rs`): the immutable `Term` node, `make_term` and chaining
//! - **Functions** (`func.rs`): FUNC and VAR terms with fresh variable ids
//! - **Encoding** (`encode.rs`) and **decoding** (`decode.rs`): wire terms
//! - **Envelope** (`types.rs`): `[query_type, term, global_optargs]`
//!
//! # Example
//!
//! ```rust
//! use reqlwire::reql::{encode, r};
//! use serde_json::json;
//!
//! // r.table("users").filter({age: 25}).count()
//! let query = r::table("users")?.filter(json!({"age": 25}))?.count()?;
//! assert_eq!(
//!     encode(&query)?,
//!     json!([43, [[39, [[15, ["users"]], [3, [], {"age": 25}]]]]])
//! );
//! # Ok::<(), reqlwire::Error>(())
//! ```

pub mod args;
pub mod ast;
pub mod coerce;
pub mod datum;
pub mod decode;
pub mod encode;
pub mod func;
pub mod r;
pub mod terms;
pub mod types;

pub use args::{Arg, Arguments, OptArgs};
pub use ast::{make_term, ArgPosition, Term, TermBuilder};
pub use coerce::{coerce, coerce_serialize};
pub use datum::Datum;
pub use decode::WireDecoder;
pub use encode::{encode, encode_to_string, Encoder};
pub use func::{func1, func2, func_wrap, make_function, VarCounter};
pub use terms::{Arity, OptArgSpec, Signature, TermType};
pub use types::{Query, QueryType};
