//! ReQL Abstract Syntax Tree (AST) implementation.
//!
//! A query is a tree of immutable `Term` nodes. Each node has:
//!
//! - A `TermType` specifying the operation
//! - Positional arguments (`args`): child terms
//! - Named arguments (`optargs`): child terms keyed by option name
//! - A datum value, for DATUM leaves only
//!
//! Terms are only created through [`make_term`] (or the coercion and
//! function-binding helpers built on it), which validates arity and
//! option names up front. Chained calls splice the receiver in as the
//! first positional argument:
//!
//! ```rust
//! use reqlwire::reql::{r, TermType};
//!
//! // r.db("test").table("users").count()
//! let query = r::db("test")?.table("users")?.count()?;
//! assert_eq!(query.term_type(), TermType::Count);
//! assert_eq!(query.first_arg().unwrap().term_type(), TermType::Table);
//! # Ok::<(), reqlwire::Error>(())
//! ```

use super::args::{Arg, Arguments, OptArgs};
use super::datum::Datum;
use super::func::{func_wrap, VarCounter};
use super::terms::TermType;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use std::fmt;
use tracing::trace;

/// A ReQL Term - one node of the query AST.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    term_type: TermType,
    args: Vec<Term>,
    optargs: IndexMap<String, Term>,
    datum: Option<Datum>,
}

/// Where a child term sits inside its parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgPosition {
    Positional(usize),
    Named(String),
}

impl fmt::Display for ArgPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgPosition::Positional(index) => write!(f, "argument {}", index),
            ArgPosition::Named(name) => write!(f, "optarg `{}`", name),
        }
    }
}

/// Builds a validated term.
///
/// When `previous` is given it becomes positional argument 0 and the
/// caller's arguments follow it. Option names are checked against the
/// term type's signature, then the positional count against its arity.
pub fn make_term(
    term_type: TermType,
    previous: Option<Term>,
    args: Arguments,
    optargs: OptArgs,
) -> Result<Term> {
    if term_type == TermType::Datum {
        return Err(Error::construction(
            "$",
            "DATUM terms are built from values, not from arguments",
        ));
    }

    let mut positional = Vec::with_capacity(args.len() + 1);
    positional.extend(previous);
    positional.extend(args.freeze()?);
    let named = optargs.freeze_for(term_type)?;

    let arity = term_type.signature().arity;
    if !arity.contains(positional.len()) {
        return Err(Error::Arity {
            term: term_type,
            expected: arity,
            actual: positional.len(),
        });
    }

    trace!(
        term_type = %term_type,
        args = positional.len(),
        optargs = named.len(),
        "Built term"
    );
    Ok(Term::from_parts(term_type, positional, named))
}

impl Term {
    /// Create a datum term.
    ///
    /// The value is stored as given; a non-scalar or non-finite datum is
    /// reported by the encoder rather than here.
    pub fn datum(datum: impl Into<Datum>) -> Self {
        Self {
            term_type: TermType::Datum,
            args: Vec::new(),
            optargs: IndexMap::new(),
            datum: Some(datum.into()),
        }
    }

    /// Assembles a term whose children are already known to be valid.
    pub(crate) fn from_parts(
        term_type: TermType,
        args: Vec<Term>,
        optargs: IndexMap<String, Term>,
    ) -> Self {
        Self {
            term_type,
            args,
            optargs,
            datum: None,
        }
    }

    /// Chains a new operation onto this term.
    pub fn chain(self, term_type: TermType, args: Arguments, optargs: OptArgs) -> Result<Term> {
        make_term(term_type, Some(self), args, optargs)
    }

    pub fn term_type(&self) -> TermType {
        self.term_type
    }

    pub fn args(&self) -> &[Term] {
        &self.args
    }

    pub fn optargs(&self) -> &IndexMap<String, Term> {
        &self.optargs
    }

    /// Get the first argument
    pub fn first_arg(&self) -> Option<&Term> {
        self.args.first()
    }

    /// Get argument at index
    pub fn arg(&self, index: usize) -> Option<&Term> {
        self.args.get(index)
    }

    /// Get optional argument by name
    pub fn optarg(&self, name: &str) -> Option<&Term> {
        self.optargs.get(name)
    }

    /// Check if this is a datum term
    pub fn is_datum(&self) -> bool {
        self.term_type == TermType::Datum
    }

    /// Get datum value if this is a datum term
    pub fn as_datum(&self) -> Option<&Datum> {
        self.datum.as_ref()
    }

    /// Number of levels in the tree rooted here (a leaf has depth 1).
    pub fn depth(&self) -> usize {
        1 + self
            .args
            .iter()
            .chain(self.optargs.values())
            .map(Term::depth)
            .max()
            .unwrap_or(0)
    }

    /// Pretty print the term tree
    pub fn pretty_print(&self, indent: usize) -> String {
        let indent_str = "  ".repeat(indent);
        if let Some(datum) = &self.datum {
            return format!("{}{}", indent_str, datum);
        }

        let mut result = format!("{}{}(", indent_str, self.term_type.name());
        let children: Vec<String> = self
            .args
            .iter()
            .map(|arg| arg.pretty_print(indent + 1))
            .chain(self.optargs.iter().map(|(key, value)| {
                let rendered = value.pretty_print(indent + 1);
                format!("{}  {}={}", indent_str, key, rendered.trim_start())
            }))
            .collect();

        if !children.is_empty() {
            result.push('\n');
            result.push_str(&children.join(",\n"));
            result.push('\n');
            result.push_str(&indent_str);
        }
        result.push(')');
        result
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pretty_print(0))
    }
}

/// Builder for creating ReQL terms fluently
///
/// ```rust
/// use reqlwire::reql::{r, TermBuilder, TermType};
///
/// let query = TermBuilder::new(TermType::GetAll)
///     .previous(r::table("users")?)
///     .arg("alice")
///     .arg("bob")
///     .optarg("index", "name")
///     .build()?;
/// assert_eq!(query.args().len(), 3);
/// # Ok::<(), reqlwire::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct TermBuilder {
    term_type: TermType,
    previous: Option<Term>,
    args: Arguments,
    optargs: OptArgs,
}

impl TermBuilder {
    /// Start building a new term
    pub fn new(term_type: TermType) -> Self {
        Self {
            term_type,
            previous: None,
            args: Arguments::new(),
            optargs: OptArgs::new(),
        }
    }

    /// Set the receiver of a chained call
    pub fn previous(mut self, term: Term) -> Self {
        self.previous = Some(term);
        self
    }

    /// Add an argument
    pub fn arg(mut self, arg: impl Into<Arg>) -> Self {
        self.args.push(arg);
        self
    }

    /// Add several arguments
    pub fn args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Arg>,
    {
        self.args.extend(args);
        self
    }

    /// Add optional argument
    pub fn optarg(mut self, name: impl Into<String>, value: impl Into<Arg>) -> Self {
        self.optargs.insert(name, value);
        self
    }

    /// Validate and build the term
    pub fn build(self) -> Result<Term> {
        make_term(self.term_type, self.previous, self.args, self.optargs)
    }
}

// === Chained operations ===

impl Term {
    fn then(self, term_type: TermType, args: Arguments) -> Result<Term> {
        self.chain(term_type, args, OptArgs::new())
    }

    /// Coerces a function-like argument, wrapping implicit-variable
    /// expressions (`r::row()`) into a one-parameter function whose
    /// parameter id comes from `vars`.
    fn func_arg(vars: &VarCounter, arg: impl Into<Arg>) -> Result<Term> {
        let term = super::coerce::coerce(arg)?;
        Ok(func_wrap(vars, term))
    }

    pub fn table(self, name: impl Into<Arg>) -> Result<Term> {
        self.then(TermType::Table, Arguments::new().with(name))
    }

    pub fn get(self, key: impl Into<Arg>) -> Result<Term> {
        self.then(TermType::Get, Arguments::new().with(key))
    }

    pub fn get_all(self, keys: impl Into<Arguments>) -> Result<Term> {
        self.then(TermType::GetAll, keys.into())
    }

    pub fn filter(self, predicate: impl Into<Arg>) -> Result<Term> {
        self.filter_with(predicate, OptArgs::new())
    }

    pub fn filter_with(self, predicate: impl Into<Arg>, optargs: OptArgs) -> Result<Term> {
        self.filter_in(VarCounter::global(), predicate, optargs)
    }

    /// Like [`Term::filter_with`], drawing implicit-variable ids from `vars`.
    pub fn filter_in(
        self,
        vars: &VarCounter,
        predicate: impl Into<Arg>,
        optargs: OptArgs,
    ) -> Result<Term> {
        let predicate = Self::func_arg(vars, predicate)?;
        self.chain(TermType::Filter, Arguments::new().with(predicate), optargs)
    }

    pub fn map(self, mapping: impl Into<Arg>) -> Result<Term> {
        self.map_in(VarCounter::global(), mapping)
    }

    pub fn map_in(self, vars: &VarCounter, mapping: impl Into<Arg>) -> Result<Term> {
        let mapping = Self::func_arg(vars, mapping)?;
        self.then(TermType::Map, Arguments::new().with(mapping))
    }

    pub fn order_by(self, keys: impl Into<Arguments>) -> Result<Term> {
        self.then(TermType::OrderBy, keys.into())
    }

    pub fn limit(self, n: impl Into<Arg>) -> Result<Term> {
        self.then(TermType::Limit, Arguments::new().with(n))
    }

    pub fn skip(self, n: impl Into<Arg>) -> Result<Term> {
        self.then(TermType::Skip, Arguments::new().with(n))
    }

    pub fn count(self) -> Result<Term> {
        self.then(TermType::Count, Arguments::new())
    }

    pub fn difference(self, other: impl Into<Arg>) -> Result<Term> {
        self.then(TermType::Difference, Arguments::new().with(other))
    }

    pub fn pluck(self, fields: impl Into<Arguments>) -> Result<Term> {
        self.then(TermType::Pluck, fields.into())
    }

    pub fn get_field(self, field: impl Into<Arg>) -> Result<Term> {
        self.then(TermType::GetField, Arguments::new().with(field))
    }

    pub fn default(self, value: impl Into<Arg>) -> Result<Term> {
        self.then(TermType::Default, Arguments::new().with(value))
    }

    // Write operations
    pub fn insert(self, documents: impl Into<Arg>) -> Result<Term> {
        self.then(TermType::Insert, Arguments::new().with(documents))
    }

    pub fn update(self, changes: impl Into<Arg>) -> Result<Term> {
        self.update_in(VarCounter::global(), changes)
    }

    pub fn update_in(self, vars: &VarCounter, changes: impl Into<Arg>) -> Result<Term> {
        let changes = Self::func_arg(vars, changes)?;
        self.then(TermType::Update, Arguments::new().with(changes))
    }

    pub fn delete(self) -> Result<Term> {
        self.then(TermType::Delete, Arguments::new())
    }

    // Logic and math operations
    pub fn eq(self, other: impl Into<Arg>) -> Result<Term> {
        self.then(TermType::Eq, Arguments::new().with(other))
    }

    pub fn ne(self, other: impl Into<Arg>) -> Result<Term> {
        self.then(TermType::Ne, Arguments::new().with(other))
    }

    pub fn lt(self, other: impl Into<Arg>) -> Result<Term> {
        self.then(TermType::Lt, Arguments::new().with(other))
    }

    pub fn le(self, other: impl Into<Arg>) -> Result<Term> {
        self.then(TermType::Le, Arguments::new().with(other))
    }

    pub fn gt(self, other: impl Into<Arg>) -> Result<Term> {
        self.then(TermType::Gt, Arguments::new().with(other))
    }

    pub fn ge(self, other: impl Into<Arg>) -> Result<Term> {
        self.then(TermType::Ge, Arguments::new().with(other))
    }

    pub fn add(self, other: impl Into<Arg>) -> Result<Term> {
        self.then(TermType::Add, Arguments::new().with(other))
    }

    pub fn sub(self, other: impl Into<Arg>) -> Result<Term> {
        self.then(TermType::Sub, Arguments::new().with(other))
    }

    pub fn mul(self, other: impl Into<Arg>) -> Result<Term> {
        self.then(TermType::Mul, Arguments::new().with(other))
    }

    pub fn div(self, other: impl Into<Arg>) -> Result<Term> {
        self.then(TermType::Div, Arguments::new().with(other))
    }

    pub fn and(self, other: impl Into<Arg>) -> Result<Term> {
        self.then(TermType::And, Arguments::new().with(other))
    }

    pub fn or(self, other: impl Into<Arg>) -> Result<Term> {
        self.then(TermType::Or, Arguments::new().with(other))
    }

    pub fn not(self) -> Result<Term> {
        self.then(TermType::Not, Arguments::new())
    }
}
