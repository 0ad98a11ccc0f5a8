//! Top-level query constructors, mirroring the `r` namespace of ReQL
//! drivers.
//!
//! ```rust
//! use reqlwire::reql::{encode, r};
//! use serde_json::json;
//!
//! let query = r::expr(vec![1, 2, 3])?.difference(vec![2])?;
//! assert_eq!(encode(&query)?, json!([95, [[2, [1, 2, 3]], [2, [2]]]]));
//! # Ok::<(), reqlwire::Error>(())
//! ```

use super::args::{Arg, Arguments, OptArgs};
use super::ast::{make_term, Term};
use super::terms::TermType;
use crate::error::Result;

pub use super::func::{func1, func2};

fn build(term_type: TermType, args: Arguments) -> Result<Term> {
    make_term(term_type, None, args, OptArgs::new())
}

/// Turns any value into a term.
pub fn expr(value: impl Into<Arg>) -> Result<Term> {
    super::coerce::coerce(value)
}

pub fn db(name: impl Into<Arg>) -> Result<Term> {
    build(TermType::Db, Arguments::new().with(name))
}

/// A table in the connection's default database.
pub fn table(name: impl Into<Arg>) -> Result<Term> {
    build(TermType::Table, Arguments::new().with(name))
}

pub fn db_list() -> Result<Term> {
    build(TermType::DbList, Arguments::new())
}

pub fn db_create(name: impl Into<Arg>) -> Result<Term> {
    build(TermType::DbCreate, Arguments::new().with(name))
}

pub fn db_drop(name: impl Into<Arg>) -> Result<Term> {
    build(TermType::DbDrop, Arguments::new().with(name))
}

pub fn table_list() -> Result<Term> {
    build(TermType::TableList, Arguments::new())
}

/// Server-side argument splice: `ARGS(array)`.
pub fn args(array: impl Into<Arg>) -> Result<Term> {
    build(TermType::Args, Arguments::new().with(array))
}

/// The implicit variable of `r.row`.
pub fn row() -> Term {
    Term::implicit_var()
}

pub fn asc(field: impl Into<Arg>) -> Result<Term> {
    build(TermType::Asc, Arguments::new().with(field))
}

pub fn desc(field: impl Into<Arg>) -> Result<Term> {
    build(TermType::Desc, Arguments::new().with(field))
}

/// `BRANCH(test, then, [test, then, ...], else)`.
pub fn branch(args: impl Into<Arguments>) -> Result<Term> {
    build(TermType::Branch, args.into())
}

pub fn now() -> Result<Term> {
    build(TermType::Now, Arguments::new())
}

pub fn uuid() -> Result<Term> {
    build(TermType::Uuid, Arguments::new())
}

pub fn error(message: impl Into<Arg>) -> Result<Term> {
    build(TermType::Error, Arguments::new().with(message))
}

pub fn literal(value: impl Into<Arg>) -> Result<Term> {
    build(TermType::Literal, Arguments::new().with(value))
}

pub fn range(bounds: impl Into<Arguments>) -> Result<Term> {
    build(TermType::Range, bounds.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::reql::encode;
    use serde_json::json;

    #[test]
    fn test_args_wraps_array() {
        assert_eq!(
            encode(&args(vec![1, 2, 3]).unwrap()).unwrap(),
            json!([154, [[2, [1, 2, 3]]]])
        );
    }

    #[test]
    fn test_branch_arity() {
        assert!(branch(vec![Arg::from(true), Arg::from(1), Arg::from(2)]).is_ok());
        assert!(matches!(
            branch(vec![true, false]),
            Err(Error::Arity { term: TermType::Branch, .. })
        ));
    }

    #[test]
    fn test_simple_constructors() {
        assert_eq!(encode(&now().unwrap()).unwrap(), json!([103, []]));
        assert_eq!(encode(&uuid().unwrap()).unwrap(), json!([169, []]));
        assert_eq!(encode(&range(vec![0, 10]).unwrap()).unwrap(), json!([173, [0, 10]]));
        assert_eq!(encode(&row()).unwrap(), json!([13, []]));
        assert_eq!(
            encode(&error("boom").unwrap()).unwrap(),
            json!([12, ["boom"]])
        );
    }
}
