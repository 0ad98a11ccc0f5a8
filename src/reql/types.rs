//! ReQL query envelope.
//!
//! A query travels as `[query_type, term, global_optargs]`. Only START
//! carries a term and global optargs; the other query types refer to a
//! running query by token, which the transport layer adds.

use super::args::Arg;
use super::ast::Term;
use super::coerce::coerce;
use super::encode::Encoder;
use super::r;
use crate::error::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Query type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum QueryType {
    Start = 1,
    Continue = 2,
    Stop = 3,
    NoreplyWait = 4,
    ServerInfo = 5,
}

impl QueryType {
    pub fn to_u64(self) -> u64 {
        self as u64
    }
}

/// A query ready to be handed to the transport layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    query_type: QueryType,
    term: Option<Term>,
    global_optargs: IndexMap<String, Term>,
}

impl Query {
    /// Start running `term`.
    pub fn start(term: Term) -> Self {
        Self {
            query_type: QueryType::Start,
            term: Some(term),
            global_optargs: IndexMap::new(),
        }
    }

    /// Ask for the next batch of a running query.
    pub fn cont() -> Self {
        Self::control(QueryType::Continue)
    }

    pub fn stop() -> Self {
        Self::control(QueryType::Stop)
    }

    pub fn noreply_wait() -> Self {
        Self::control(QueryType::NoreplyWait)
    }

    pub fn server_info() -> Self {
        Self::control(QueryType::ServerInfo)
    }

    fn control(query_type: QueryType) -> Self {
        Self {
            query_type,
            term: None,
            global_optargs: IndexMap::new(),
        }
    }

    /// Adds a global optarg such as `db`, `durability` or `profile`.
    ///
    /// A `db` given as a plain string is sent as `DB(name)`, as the server
    /// expects a database term there.
    pub fn global_optarg(mut self, name: impl Into<String>, value: impl Into<Arg>) -> Result<Self> {
        let name = name.into();
        let mut term = coerce(value)?;
        if name == "db" {
            if let Some(db_name) = term.as_datum().and_then(|d| d.as_string()) {
                term = r::db(db_name)?;
            }
        }
        self.global_optargs.insert(name, term);
        Ok(self)
    }

    pub fn query_type(&self) -> QueryType {
        self.query_type
    }

    pub fn term(&self) -> Option<&Term> {
        self.term.as_ref()
    }

    /// Encode the envelope.
    pub fn encode(&self, encoder: &Encoder) -> Result<Value> {
        let mut envelope = vec![Value::from(self.query_type.to_u64())];
        if let Some(term) = &self.term {
            envelope.push(encoder.encode(term)?);

            let mut optargs = Map::with_capacity(self.global_optargs.len());
            for (name, value) in &self.global_optargs {
                optargs.insert(name.clone(), encoder.encode(value)?);
            }
            envelope.push(Value::Object(optargs));
        }
        Ok(Value::Array(envelope))
    }

    /// Encode the envelope as compact JSON text.
    pub fn encode_to_string(&self, encoder: &Encoder) -> Result<String> {
        Ok(serde_json::to_string(&self.encode(encoder)?)?)
    }
}
