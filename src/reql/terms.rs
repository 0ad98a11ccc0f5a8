//! ReQL term types and their static signatures.
//!
//! Every query operation is identified by a `TermType`. The discriminants
//! are the term tags of the ReQL JSON wire protocol, so `to_u64` is exactly
//! what goes into the first slot of an encoded term.
//!
//! Each term type also carries a [`Signature`]: the accepted positional
//! argument count and the names of the optional (named) arguments the
//! server recognises for it. Term construction checks both eagerly.
//!
//! # Example
//!
//! ```rust
//! use reqlwire::reql::TermType;
//!
//! let term_type = TermType::from_u64(38).unwrap();
//! assert_eq!(term_type, TermType::Map);
//! assert_eq!(term_type.name(), "MAP");
//! assert!(!term_type.signature().accepts_optarg("index"));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Positional argument count accepted by a term type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Arity {
    pub min: usize,
    /// `None` means no upper bound.
    pub max: Option<usize>,
}

impl Arity {
    pub const fn exactly(n: usize) -> Self {
        Self { min: n, max: Some(n) }
    }

    pub const fn between(min: usize, max: usize) -> Self {
        Self { min, max: Some(max) }
    }

    pub const fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    pub fn contains(&self, count: usize) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(f, "{}", self.min),
            Some(max) => write!(f, "{} to {}", self.min, max),
            None => write!(f, "at least {}", self.min),
        }
    }
}

/// Named arguments recognised by a term type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptArgSpec {
    None,
    Only(&'static [&'static str]),
    /// Any name is accepted (object construction).
    Any,
}

impl OptArgSpec {
    pub fn accepts(&self, name: &str) -> bool {
        match self {
            OptArgSpec::None => false,
            OptArgSpec::Only(names) => names.contains(&name),
            OptArgSpec::Any => true,
        }
    }
}

/// Static per-term-type validation table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub arity: Arity,
    pub optargs: OptArgSpec,
}

impl Signature {
    pub fn accepts_optarg(&self, name: &str) -> bool {
        self.optargs.accepts(name)
    }
}

macro_rules! max_args {
    (*) => {
        None
    };
    ($n:literal) => {
        Some($n)
    };
}

macro_rules! optarg_spec {
    (none) => {
        OptArgSpec::None
    };
    (any) => {
        OptArgSpec::Any
    };
    ([$($opt:literal),+ $(,)?]) => {
        OptArgSpec::Only(&[$($opt),+])
    };
}

macro_rules! term_types {
    ($($variant:ident = $tag:literal, $name:literal, ($min:literal, $max:tt), $opts:tt;)+) => {
        /// A ReQL operation kind.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[repr(u64)]
        pub enum TermType {
            $($variant = $tag,)+
        }

        impl TermType {
            /// Every term type, in declaration order.
            pub const ALL: &'static [TermType] = &[$(TermType::$variant,)+];

            /// Converts a wire tag into a term type.
            ///
            /// Returns `None` for tags this catalog does not know.
            pub fn from_u64(value: u64) -> Option<Self> {
                match value {
                    $($tag => Some(TermType::$variant),)+
                    _ => None,
                }
            }

            /// Returns the protocol name (e.g. "FILTER", "GET_ALL").
            pub fn name(&self) -> &'static str {
                match self {
                    $(TermType::$variant => $name,)+
                }
            }

            /// Looks a term type up by its protocol name.
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(TermType::$variant),)+
                    _ => None,
                }
            }

            /// Returns the arity and optarg table entry for this term type.
            pub fn signature(&self) -> Signature {
                match self {
                    $(TermType::$variant => Signature {
                        arity: Arity { min: $min, max: max_args!($max) },
                        optargs: optarg_spec!($opts),
                    },)+
                }
            }
        }
    };
}

term_types! {
    // Core data
    Datum = 1, "DATUM", (0, 0), none;
    MakeArray = 2, "MAKE_ARRAY", (0, *), none;
    MakeObj = 3, "MAKE_OBJ", (0, 0), any;

    // Variables and functions
    Var = 10, "VAR", (1, 1), none;
    Javascript = 11, "JAVASCRIPT", (1, 1), ["timeout"];
    Uuid = 169, "UUID", (0, 1), none;
    Http = 153, "HTTP", (1, 1), [
        "data", "timeout", "method", "params", "header", "attempts",
        "redirects", "verify", "page", "page_limit", "auth", "result_format",
    ];
    Error = 12, "ERROR", (0, 1), none;
    ImplicitVar = 13, "IMPLICIT_VAR", (0, 0), none;

    // Selection
    Db = 14, "DB", (1, 1), none;
    Table = 15, "TABLE", (1, 2), ["read_mode", "use_outdated", "identifier_format"];
    Get = 16, "GET", (2, 2), none;
    GetAll = 78, "GET_ALL", (1, *), ["index"];

    // Comparison
    Eq = 17, "EQ", (1, *), none;
    Ne = 18, "NE", (1, *), none;
    Lt = 19, "LT", (1, *), none;
    Le = 20, "LE", (1, *), none;
    Gt = 21, "GT", (1, *), none;
    Ge = 22, "GE", (1, *), none;
    Not = 23, "NOT", (1, 1), none;

    // Math
    Add = 24, "ADD", (1, *), none;
    Sub = 25, "SUB", (1, *), none;
    Mul = 26, "MUL", (1, *), none;
    Div = 27, "DIV", (1, *), none;
    Mod = 28, "MOD", (2, 2), none;
    Floor = 183, "FLOOR", (1, 1), none;
    Ceil = 184, "CEIL", (1, 1), none;
    Round = 185, "ROUND", (1, 1), none;

    // Arrays and sets
    Append = 29, "APPEND", (2, 2), none;
    Prepend = 80, "PREPEND", (2, 2), none;
    Difference = 95, "DIFFERENCE", (2, 2), none;
    SetInsert = 88, "SET_INSERT", (2, 2), none;
    SetIntersection = 89, "SET_INTERSECTION", (2, 2), none;
    SetUnion = 90, "SET_UNION", (2, 2), none;
    SetDifference = 91, "SET_DIFFERENCE", (2, 2), none;

    // Sequences
    Slice = 30, "SLICE", (2, 3), ["left_bound", "right_bound"];
    Skip = 70, "SKIP", (2, 2), none;
    Limit = 71, "LIMIT", (2, 2), none;
    OffsetsOf = 87, "OFFSETS_OF", (2, 2), none;
    Contains = 93, "CONTAINS", (1, *), none;

    // Objects
    GetField = 31, "GET_FIELD", (2, 2), none;
    Keys = 94, "KEYS", (1, 1), none;
    Values = 186, "VALUES", (1, 1), none;
    Object = 143, "OBJECT", (0, *), none;
    HasFields = 32, "HAS_FIELDS", (1, *), none;
    WithFields = 96, "WITH_FIELDS", (1, *), none;
    Pluck = 33, "PLUCK", (1, *), none;
    Without = 34, "WITHOUT", (1, *), none;
    Merge = 35, "MERGE", (1, *), none;

    // Transformations
    Between = 182, "BETWEEN", (3, 3), ["index", "left_bound", "right_bound"];
    Reduce = 37, "REDUCE", (2, 2), none;
    Map = 38, "MAP", (2, *), none;
    Fold = 187, "FOLD", (3, 3), ["emit", "final_emit"];
    Filter = 39, "FILTER", (2, 2), ["default"];
    ConcatMap = 40, "CONCAT_MAP", (2, 2), none;
    OrderBy = 41, "ORDER_BY", (1, *), ["index"];
    Distinct = 42, "DISTINCT", (1, 1), ["index"];
    Count = 43, "COUNT", (1, 2), none;
    IsEmpty = 86, "IS_EMPTY", (1, 1), none;
    Union = 44, "UNION", (0, *), ["interleave"];
    Nth = 45, "NTH", (2, 2), none;
    Bracket = 170, "BRACKET", (2, 2), none;
    InnerJoin = 48, "INNER_JOIN", (3, 3), none;
    OuterJoin = 49, "OUTER_JOIN", (3, 3), none;
    EqJoin = 50, "EQ_JOIN", (3, 3), ["index", "ordered"];
    Zip = 72, "ZIP", (1, 1), none;
    Range = 173, "RANGE", (0, 2), none;

    // Array mutation
    InsertAt = 82, "INSERT_AT", (3, 3), none;
    DeleteAt = 83, "DELETE_AT", (2, 3), none;
    ChangeAt = 84, "CHANGE_AT", (3, 3), none;
    SpliceAt = 85, "SPLICE_AT", (3, 3), none;

    // Types
    CoerceTo = 51, "COERCE_TO", (2, 2), none;
    TypeOf = 52, "TYPE_OF", (1, 1), none;

    // Writes
    Update = 53, "UPDATE", (2, 2), ["non_atomic", "durability", "return_changes", "ignore_write_hook"];
    Delete = 54, "DELETE", (1, 1), ["durability", "return_changes", "ignore_write_hook"];
    Replace = 55, "REPLACE", (2, 2), ["non_atomic", "durability", "return_changes", "ignore_write_hook"];
    Insert = 56, "INSERT", (2, 2), ["conflict", "durability", "return_changes", "ignore_write_hook"];

    // Administration
    DbCreate = 57, "DB_CREATE", (1, 1), none;
    DbDrop = 58, "DB_DROP", (1, 1), none;
    DbList = 59, "DB_LIST", (0, 0), none;
    TableCreate = 60, "TABLE_CREATE", (1, 2), [
        "primary_key", "shards", "replicas", "primary_replica_tag",
        "nonvoting_replica_tags", "durability",
    ];
    TableDrop = 61, "TABLE_DROP", (1, 2), none;
    TableList = 62, "TABLE_LIST", (0, 1), none;
    Config = 174, "CONFIG", (1, 1), none;
    Status = 175, "STATUS", (1, 1), none;
    Wait = 177, "WAIT", (0, 1), ["wait_for", "timeout"];
    Reconfigure = 176, "RECONFIGURE", (1, 1), [
        "shards", "replicas", "primary_replica_tag", "dry_run",
        "nonvoting_replica_tags", "emergency_repair",
    ];
    Rebalance = 179, "REBALANCE", (1, 1), none;
    Sync = 138, "SYNC", (1, 1), none;
    Grant = 188, "GRANT", (2, 3), none;

    // Secondary indexes
    IndexCreate = 75, "INDEX_CREATE", (2, 3), ["multi", "geo"];
    IndexDrop = 76, "INDEX_DROP", (2, 2), none;
    IndexList = 77, "INDEX_LIST", (1, 1), none;
    IndexStatus = 139, "INDEX_STATUS", (1, *), none;
    IndexWait = 140, "INDEX_WAIT", (1, *), none;
    IndexRename = 156, "INDEX_RENAME", (3, 3), ["overwrite"];
    SetWriteHook = 189, "SET_WRITE_HOOK", (2, 2), none;
    GetWriteHook = 190, "GET_WRITE_HOOK", (1, 1), none;

    // Control flow
    Funcall = 64, "FUNCALL", (1, *), none;
    Branch = 65, "BRANCH", (3, *), none;
    Or = 66, "OR", (0, *), none;
    And = 67, "AND", (0, *), none;
    ForEach = 68, "FOR_EACH", (2, 2), none;
    Func = 69, "FUNC", (2, 2), none;
    Asc = 73, "ASC", (1, 1), none;
    Desc = 74, "DESC", (1, 1), none;
    Info = 79, "INFO", (1, 1), none;
    Match = 97, "MATCH", (2, 2), none;
    Upcase = 141, "UPCASE", (1, 1), none;
    Downcase = 142, "DOWNCASE", (1, 1), none;
    Sample = 81, "SAMPLE", (2, 2), none;
    Default = 92, "DEFAULT", (2, 2), none;
    Json = 98, "JSON", (1, 1), none;
    ToJsonString = 172, "TO_JSON_STRING", (1, 1), none;

    // Time
    Iso8601 = 99, "ISO8601", (1, 1), ["default_timezone"];
    ToIso8601 = 100, "TO_ISO8601", (1, 1), none;
    EpochTime = 101, "EPOCH_TIME", (1, 1), none;
    ToEpochTime = 102, "TO_EPOCH_TIME", (1, 1), none;
    Now = 103, "NOW", (0, 0), none;
    InTimezone = 104, "IN_TIMEZONE", (2, 2), none;
    During = 105, "DURING", (3, 3), ["left_bound", "right_bound"];
    Date = 106, "DATE", (1, 1), none;
    TimeOfDay = 126, "TIME_OF_DAY", (1, 1), none;
    Timezone = 127, "TIMEZONE", (1, 1), none;
    Year = 128, "YEAR", (1, 1), none;
    Month = 129, "MONTH", (1, 1), none;
    Day = 130, "DAY", (1, 1), none;
    DayOfWeek = 131, "DAY_OF_WEEK", (1, 1), none;
    DayOfYear = 132, "DAY_OF_YEAR", (1, 1), none;
    Hours = 133, "HOURS", (1, 1), none;
    Minutes = 134, "MINUTES", (1, 1), none;
    Seconds = 135, "SECONDS", (1, 1), none;
    Time = 136, "TIME", (4, 7), none;
    Monday = 107, "MONDAY", (0, 0), none;
    Tuesday = 108, "TUESDAY", (0, 0), none;
    Wednesday = 109, "WEDNESDAY", (0, 0), none;
    Thursday = 110, "THURSDAY", (0, 0), none;
    Friday = 111, "FRIDAY", (0, 0), none;
    Saturday = 112, "SATURDAY", (0, 0), none;
    Sunday = 113, "SUNDAY", (0, 0), none;
    January = 114, "JANUARY", (0, 0), none;
    February = 115, "FEBRUARY", (0, 0), none;
    March = 116, "MARCH", (0, 0), none;
    April = 117, "APRIL", (0, 0), none;
    May = 118, "MAY", (0, 0), none;
    June = 119, "JUNE", (0, 0), none;
    July = 120, "JULY", (0, 0), none;
    August = 121, "AUGUST", (0, 0), none;
    September = 122, "SEPTEMBER", (0, 0), none;
    October = 123, "OCTOBER", (0, 0), none;
    November = 124, "NOVEMBER", (0, 0), none;
    December = 125, "DECEMBER", (0, 0), none;

    // Misc
    Literal = 137, "LITERAL", (0, 1), none;
    Group = 144, "GROUP", (1, *), ["index", "multi"];
    Sum = 145, "SUM", (1, 2), none;
    Avg = 146, "AVG", (1, 2), none;
    Min = 147, "MIN", (1, 2), ["index"];
    Max = 148, "MAX", (1, 2), ["index"];
    Split = 149, "SPLIT", (1, 3), none;
    Ungroup = 150, "UNGROUP", (1, 1), none;
    Random = 151, "RANDOM", (0, 2), ["float"];
    Changes = 152, "CHANGES", (1, 1), [
        "squash", "changefeed_queue_size", "include_initial",
        "include_states", "include_offsets", "include_types",
    ];
    Args = 154, "ARGS", (1, 1), none;
    Binary = 155, "BINARY", (1, 1), none;
    Minval = 180, "MINVAL", (0, 0), none;
    Maxval = 181, "MAXVAL", (0, 0), none;

    // Geospatial
    Geojson = 157, "GEOJSON", (1, 1), none;
    ToGeojson = 158, "TO_GEOJSON", (1, 1), none;
    Point = 159, "POINT", (2, 2), none;
    Line = 160, "LINE", (2, *), none;
    Polygon = 161, "POLYGON", (3, *), none;
    Distance = 162, "DISTANCE", (2, 2), ["geo_system", "unit"];
    Intersects = 163, "INTERSECTS", (2, 2), none;
    Includes = 164, "INCLUDES", (2, 2), none;
    Circle = 165, "CIRCLE", (2, 2), ["num_vertices", "geo_system", "unit", "fill"];
    GetIntersecting = 166, "GET_INTERSECTING", (2, 2), ["index"];
    Fill = 167, "FILL", (1, 1), none;
    GetNearest = 168, "GET_NEAREST", (2, 2), ["index", "max_results", "max_dist", "geo_system", "unit"];
    PolygonSub = 171, "POLYGON_SUB", (2, 2), none;
}

impl TermType {
    /// Converts to the wire tag.
    pub fn to_u64(self) -> u64 {
        self as u64
    }
}

impl fmt::Display for TermType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_term_type_conversion() {
        assert_eq!(TermType::from_u64(1), Some(TermType::Datum));
        assert_eq!(TermType::from_u64(2), Some(TermType::MakeArray));
        assert_eq!(TermType::from_u64(95), Some(TermType::Difference));
        assert_eq!(TermType::from_u64(154), Some(TermType::Args));
        assert_eq!(TermType::from_u64(999), None);
    }

    #[test]
    fn test_term_type_to_u64() {
        assert_eq!(TermType::Datum.to_u64(), 1);
        assert_eq!(TermType::Table.to_u64(), 15);
        assert_eq!(TermType::Func.to_u64(), 69);
    }

    #[test]
    fn test_term_type_names() {
        assert_eq!(TermType::Datum.name(), "DATUM");
        assert_eq!(TermType::Filter.name(), "FILTER");
        assert_eq!(TermType::GetAll.to_string(), "GET_ALL");
        assert_eq!(TermType::from_name("SET_UNION"), Some(TermType::SetUnion));
        assert_eq!(TermType::from_name("NOPE"), None);
    }

    #[test]
    fn test_catalog_tags_and_names_are_unique() {
        let tags: HashSet<u64> = TermType::ALL.iter().map(|t| t.to_u64()).collect();
        let names: HashSet<&str> = TermType::ALL.iter().map(|t| t.name()).collect();
        assert_eq!(tags.len(), TermType::ALL.len());
        assert_eq!(names.len(), TermType::ALL.len());

        for term_type in TermType::ALL {
            assert_eq!(TermType::from_u64(term_type.to_u64()), Some(*term_type));
            assert_eq!(TermType::from_name(term_type.name()), Some(*term_type));
        }
    }

    #[test]
    fn test_arity_display_and_bounds() {
        assert_eq!(Arity::exactly(2).to_string(), "2");
        assert_eq!(Arity::between(1, 3).to_string(), "1 to 3");
        assert_eq!(Arity::at_least(1).to_string(), "at least 1");

        let arity = TermType::Slice.signature().arity;
        assert!(!arity.contains(1));
        assert!(arity.contains(2));
        assert!(arity.contains(3));
        assert!(!arity.contains(4));
        assert!(TermType::MakeArray.signature().arity.contains(10_000));

        // sequence plus mapping function, more sequences may precede it
        let map = TermType::Map.signature().arity;
        assert!(!map.contains(1));
        assert!(map.contains(2));
        assert!(map.contains(4));
    }

    #[test]
    fn test_optarg_specs() {
        assert!(TermType::Table.signature().accepts_optarg("read_mode"));
        assert!(!TermType::Table.signature().accepts_optarg("index"));
        assert!(!TermType::Difference.signature().accepts_optarg("anything"));
        assert!(TermType::MakeObj.signature().accepts_optarg("anything"));
    }
}
