//! Anonymous functions and variable references.
//!
//! A function literal is encoded as `FUNC(MAKE_ARRAY(ids...), body)` where
//! the body refers to its parameters through `VAR(id)` terms. Identifiers
//! come from a [`VarCounter`]; a counter never hands out the same id twice,
//! so nested and sibling functions cannot capture each other's variables.

use super::args::{Arguments, OptArgs};
use super::ast::{make_term, Term};
use super::datum::Datum;
use super::terms::TermType;
use crate::error::Result;
use indexmap::IndexMap;
use std::sync::atomic::{AtomicU64, Ordering};

static GLOBAL_VARS: VarCounter = VarCounter::new();

/// Allocator for function parameter identifiers.
#[derive(Debug)]
pub struct VarCounter {
    next: AtomicU64,
}

impl VarCounter {
    /// A fresh counter whose first identifier is 1.
    pub const fn new() -> Self {
        Self::starting_at(1)
    }

    pub const fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// The process-wide counter used by the convenience constructors.
    pub fn global() -> &'static VarCounter {
        &GLOBAL_VARS
    }

    pub fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Reserves `count` consecutive identifiers in one atomic step.
    pub fn allocate(&self, count: usize) -> Vec<u64> {
        let first = self.next.fetch_add(count as u64, Ordering::Relaxed);
        (first..first + count as u64).collect()
    }
}

impl Default for VarCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl Term {
    /// A reference to the function parameter `id`.
    pub fn var(id: u64) -> Term {
        Term::from_parts(TermType::Var, vec![Term::datum(id)], IndexMap::new())
    }

    /// The implicit variable of `r.row`, bound by the enclosing function.
    pub fn implicit_var() -> Term {
        Term::from_parts(TermType::ImplicitVar, Vec::new(), IndexMap::new())
    }

    /// True when an IMPLICIT_VAR occurs outside any nested function.
    pub fn contains_implicit_var(&self) -> bool {
        match self.term_type() {
            TermType::ImplicitVar => true,
            TermType::Func => false,
            _ => self
                .args()
                .iter()
                .chain(self.optargs().values())
                .any(Term::contains_implicit_var),
        }
    }
}

/// Builds a function literal with `param_count` fresh parameters.
///
/// `body` receives one VAR term per parameter and returns the function
/// body.
///
/// ```rust
/// use reqlwire::reql::{encode, make_function, VarCounter};
/// use serde_json::json;
///
/// let vars = VarCounter::new();
/// let func = make_function(&vars, 2, |params| params[0].clone().add(params[1].clone()))?;
/// assert_eq!(
///     encode(&func)?,
///     json!([69, [[2, [1, 2]], [24, [[10, [1]], [10, [2]]]]]])
/// );
/// # Ok::<(), reqlwire::Error>(())
/// ```
pub fn make_function<F>(counter: &VarCounter, param_count: usize, body: F) -> Result<Term>
where
    F: FnOnce(&[Term]) -> Result<Term>,
{
    let ids = counter.allocate(param_count);
    let params: Vec<Term> = ids.iter().map(|&id| Term::var(id)).collect();
    let body = body(&params)?;

    let id_list = ids.into_iter().map(|id| Term::datum(Datum::from(id))).collect();
    let id_list = Term::from_parts(TermType::MakeArray, id_list, IndexMap::new());
    make_term(
        TermType::Func,
        None,
        Arguments::new().with(id_list).with(body),
        OptArgs::new(),
    )
}

/// One-parameter function using the global counter.
pub fn func1<F>(body: F) -> Result<Term>
where
    F: FnOnce(Term) -> Result<Term>,
{
    make_function(VarCounter::global(), 1, |params| body(params[0].clone()))
}

/// Two-parameter function using the global counter.
pub fn func2<F>(body: F) -> Result<Term>
where
    F: FnOnce(Term, Term) -> Result<Term>,
{
    make_function(VarCounter::global(), 2, |params| {
        body(params[0].clone(), params[1].clone())
    })
}

/// Wraps `term` as a one-parameter function when it uses `r.row`.
///
/// Functions and terms without an implicit variable are returned as is.
pub fn func_wrap(counter: &VarCounter, term: Term) -> Term {
    if !term.contains_implicit_var() {
        return term;
    }
    let id = counter.next_id();
    let params = Term::from_parts(
        TermType::MakeArray,
        vec![Term::datum(Datum::from(id))],
        IndexMap::new(),
    );
    Term::from_parts(TermType::Func, vec![params, term], IndexMap::new())
}
