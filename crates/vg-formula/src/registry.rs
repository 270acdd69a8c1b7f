// ---------------------------------------------------------------------------
// Builtin function registry
// ---------------------------------------------------------------------------

/// Closed set of builtin formula functions. Each kind carries its own
/// signature and compile rule; there is no dynamic dispatch on names
/// outside this table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum FuncKind {
    Count,
    Sum,
    Average,
    Min,
    Max,
    UniqueCount,
    OverallAverage,
    Abs,
    Round,
    IfElse,
}

/// Function category, used for grouping in editor help.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Elasticsearch,
    Math,
    Comparison,
}

/// Static signature of one builtin function.
#[derive(Debug)]
pub struct FuncSpec {
    pub kind: FuncKind,
    pub name: &'static str,
    pub category: Category,
    pub min_args: usize,
    pub max_args: usize,
    /// Positional indexes that are index-field references. A quoted string
    /// or bare identifier at these positions parses as `Expr::Field`.
    pub field_args: &'static [usize],
    pub accepts_shift: bool,
    pub accepts_kql: bool,
    pub description: &'static str,
    pub examples: &'static [&'static str],
}

impl FuncSpec {
    /// Whether the field argument must be numeric (metric aggregations).
    pub fn requires_number_field(&self) -> bool {
        matches!(
            self.kind,
            FuncKind::Sum | FuncKind::Average | FuncKind::Min | FuncKind::Max | FuncKind::OverallAverage
        )
    }
}

pub const FUNCTIONS: &[FuncSpec] = &[
    FuncSpec {
        kind: FuncKind::Count,
        name: "count",
        category: Category::Elasticsearch,
        min_args: 0,
        max_args: 0,
        field_args: &[],
        accepts_shift: true,
        accepts_kql: true,
        description: "Number of documents in the active filter context",
        examples: &[
            "count()",
            "count(kql='status:error')",
            "count(shift=\"1d\")",
        ],
    },
    FuncSpec {
        kind: FuncKind::Sum,
        name: "sum",
        category: Category::Elasticsearch,
        min_args: 1,
        max_args: 1,
        field_args: &[0],
        accepts_shift: true,
        accepts_kql: true,
        description: "Sum of a numeric field over the matched documents",
        examples: &["sum(bytes)", "sum(\"bytes\", shift=\"7d\")"],
    },
    FuncSpec {
        kind: FuncKind::Average,
        name: "average",
        category: Category::Elasticsearch,
        min_args: 1,
        max_args: 1,
        field_args: &[0],
        accepts_shift: true,
        accepts_kql: true,
        description: "Arithmetic mean of a numeric field",
        examples: &["average(duration)", "average(duration, kql='status:ok')"],
    },
    FuncSpec {
        kind: FuncKind::Min,
        name: "min",
        category: Category::Elasticsearch,
        min_args: 1,
        max_args: 1,
        field_args: &[0],
        accepts_shift: true,
        accepts_kql: true,
        description: "Minimum value of a numeric field",
        examples: &["min(response_time)"],
    },
    FuncSpec {
        kind: FuncKind::Max,
        name: "max",
        category: Category::Elasticsearch,
        min_args: 1,
        max_args: 1,
        field_args: &[0],
        accepts_shift: true,
        accepts_kql: true,
        description: "Maximum value of a numeric field",
        examples: &["max(response_time)"],
    },
    FuncSpec {
        kind: FuncKind::UniqueCount,
        name: "unique_count",
        category: Category::Elasticsearch,
        min_args: 1,
        max_args: 1,
        field_args: &[0],
        accepts_shift: true,
        accepts_kql: true,
        description: "Number of distinct values of an aggregatable field",
        examples: &["unique_count(client_ip)"],
    },
    FuncSpec {
        kind: FuncKind::OverallAverage,
        name: "overall_average",
        category: Category::Elasticsearch,
        min_args: 1,
        max_args: 1,
        field_args: &[0],
        accepts_shift: false,
        accepts_kql: false,
        description: "Average of a numeric field across all buckets of the query",
        examples: &["overall_average(count_per_bucket)"],
    },
    FuncSpec {
        kind: FuncKind::Abs,
        name: "abs",
        category: Category::Math,
        min_args: 1,
        max_args: 1,
        field_args: &[],
        accepts_shift: false,
        accepts_kql: false,
        description: "Absolute value of a computed result",
        examples: &["abs(count() - count(shift=\"1d\"))"],
    },
    FuncSpec {
        kind: FuncKind::Round,
        name: "round",
        category: Category::Math,
        min_args: 1,
        max_args: 1,
        field_args: &[],
        accepts_shift: false,
        accepts_kql: false,
        description: "Round a computed result to the nearest integer",
        examples: &["round(average(duration))"],
    },
    FuncSpec {
        kind: FuncKind::IfElse,
        name: "ifelse",
        category: Category::Comparison,
        min_args: 3,
        max_args: 3,
        field_args: &[],
        accepts_shift: false,
        accepts_kql: false,
        description: "Pick one of two values based on a condition",
        examples: &["ifelse(count() < count(shift=\"1d\") * 0.5, \"CRITICAL\", \"NORMAL\")"],
    },
];

/// Look up a builtin function by name.
pub fn lookup(name: &str) -> Option<&'static FuncSpec> {
    FUNCTIONS.iter().find(|f| f.name == name)
}
