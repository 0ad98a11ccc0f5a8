//! Argument containers used while building a term.
//!
//! [`Arguments`] collects positional arguments and [`OptArgs`] collects
//! named ones. Both hold [`Arg`] values: anything that can become a term,
//! either an existing [`Term`] or a raw value that is coerced when the
//! container is frozen into its parent term.

use super::ast::Term;
use super::coerce::{coerce_at, Path};
use super::datum::Datum;
use super::terms::TermType;
use crate::error::{Error, Result};
use indexmap::IndexMap;

/// A raw-or-term input to the query builder.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// An already built term, used as is.
    Term(Term),
    /// A native value.
    Value(Datum),
    /// A sequence whose elements may mix terms and values.
    Array(Vec<Arg>),
    /// A string-keyed mapping whose values may mix terms and values.
    Object(IndexMap<String, Arg>),
    /// Elements spliced into the enclosing argument list in place.
    Bundle(Vec<Arg>),
}

impl Arg {
    /// Wraps several inputs so they are spliced into the enclosing
    /// positional list instead of being passed as one array argument.
    pub fn bundle<I, A>(items: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Arg>,
    {
        Arg::Bundle(items.into_iter().map(Into::into).collect())
    }
}

impl From<Term> for Arg {
    fn from(term: Term) -> Self {
        Arg::Term(term)
    }
}

impl From<&Term> for Arg {
    fn from(term: &Term) -> Self {
        Arg::Term(term.clone())
    }
}

impl From<Datum> for Arg {
    fn from(datum: Datum) -> Self {
        Arg::Value(datum)
    }
}

impl From<serde_json::Value> for Arg {
    fn from(value: serde_json::Value) -> Self {
        Arg::Value(Datum::from(value))
    }
}

impl<T: Into<Arg>> From<Vec<T>> for Arg {
    fn from(items: Vec<T>) -> Self {
        Arg::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(value: Option<T>) -> Self {
        value.map_or(Arg::Value(Datum::Null), Into::into)
    }
}

impl<T: Into<Arg>> From<IndexMap<String, T>> for Arg {
    fn from(map: IndexMap<String, T>) -> Self {
        Arg::Object(map.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty),+) => {
        $(impl From<$ty> for Arg {
            fn from(value: $ty) -> Self {
                Arg::Value(Datum::from(value))
            }
        })+
    };
}

impl_from_scalar!(bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, String, &str);

/// Positional argument container.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    items: Vec<Arg>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one argument; bundles are flattened in place.
    pub fn push(&mut self, arg: impl Into<Arg>) {
        match arg.into() {
            Arg::Bundle(items) => {
                for item in items {
                    self.push(item);
                }
            }
            other => self.items.push(other),
        }
    }

    /// Builder form of [`Arguments::push`].
    pub fn with(mut self, arg: impl Into<Arg>) -> Self {
        self.push(arg);
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Coerces every argument into a term, in order.
    pub fn freeze(self) -> Result<Vec<Term>> {
        self.items
            .into_iter()
            .enumerate()
            .map(|(index, arg)| coerce_at(arg, &mut Path::positional(index)))
            .collect()
    }
}

impl<A: Into<Arg>> FromIterator<A> for Arguments {
    fn from_iter<I: IntoIterator<Item = A>>(iter: I) -> Self {
        let mut args = Arguments::new();
        args.extend(iter);
        args
    }
}

impl<A: Into<Arg>> Extend<A> for Arguments {
    fn extend<I: IntoIterator<Item = A>>(&mut self, iter: I) {
        for arg in iter {
            self.push(arg);
        }
    }
}

impl<A: Into<Arg>> From<Vec<A>> for Arguments {
    fn from(items: Vec<A>) -> Self {
        items.into_iter().collect()
    }
}

/// Named argument container.
///
/// Keys keep their first insertion position; inserting an existing name
/// replaces its value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptArgs {
    items: IndexMap<String, Arg>,
}

impl OptArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Arg>) {
        self.items.insert(name.into(), value.into());
    }

    /// Builder form of [`OptArgs::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Arg>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    /// Validates every name against `term_type` and coerces the values.
    pub fn freeze_for(self, term_type: TermType) -> Result<IndexMap<String, Term>> {
        let signature = term_type.signature();
        if let Some(option) = self.names().find(|name| !signature.accepts_optarg(name)) {
            return Err(Error::UnsupportedOption {
                option: option.to_string(),
                term: term_type,
            });
        }

        let mut frozen = IndexMap::with_capacity(self.items.len());
        for (name, value) in self.items {
            let term = coerce_at(value, &mut Path::named(&name))?;
            frozen.insert(name, term);
        }
        Ok(frozen)
    }
}

impl<K: Into<String>, V: Into<Arg>> FromIterator<(K, V)> for OptArgs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut optargs = OptArgs::new();
        for (name, value) in iter {
            optargs.insert(name, value);
        }
        optargs
    }
}
