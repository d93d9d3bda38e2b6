use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Comparison operator of a branch condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Operator {
    #[default]
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "<")]
    SmallerThan,
    #[serde(rename = ">=")]
    GreaterThanOrEqual,
    #[serde(rename = "<=")]
    SmallerThanOrEqual,
}

impl Operator {
    pub const ALL: [Operator; 6] = [
        Operator::Equal,
        Operator::NotEqual,
        Operator::GreaterThan,
        Operator::SmallerThan,
        Operator::GreaterThanOrEqual,
        Operator::SmallerThanOrEqual,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::GreaterThan => ">",
            Operator::SmallerThan => "<",
            Operator::GreaterThanOrEqual => ">=",
            Operator::SmallerThanOrEqual => "<=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// The right-hand side of a condition. Authored values are either text or numbers.
///
/// Integral numbers within the exactly representable range serialize as JSON
/// integers (`15`, not `15.0`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Number(f64),
    Text(String),
}

impl ConditionValue {
    /// A value counts as unset only when it is empty text.
    pub fn is_empty(&self) -> bool {
        matches!(self, ConditionValue::Text(s) if s.is_empty())
    }
}

impl Default for ConditionValue {
    fn default() -> Self {
        ConditionValue::Text(String::new())
    }
}

impl From<f64> for ConditionValue {
    fn from(n: f64) -> Self {
        ConditionValue::Number(n)
    }
}

impl From<&str> for ConditionValue {
    fn from(s: &str) -> Self {
        ConditionValue::Text(s.to_string())
    }
}

impl fmt::Display for ConditionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionValue::Number(n) => write!(f, "{}", n),
            ConditionValue::Text(s) => f.write_str(s),
        }
    }
}

/// Largest integer an `f64` holds exactly (2^53 - 1).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

impl Serialize for ConditionValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ConditionValue::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
                serializer.serialize_i64(*n as i64)
            }
            ConditionValue::Number(n) => serializer.serialize_f64(*n),
            ConditionValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// A single rule of a branch node.
///
/// `target_node_id` mirrors the target of the edge leaving the branch through the
/// handle named after this condition's id. It is owned by the graph store and is
/// rewritten on every mutation that can change it; values written by callers are
/// discarded.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub id: String,
    #[serde(default)]
    pub variable: String,
    #[serde(default)]
    pub operator: Operator,
    #[serde(default)]
    pub value: ConditionValue,
    #[serde(default)]
    pub target_node_id: String,
}

impl Condition {
    pub fn new(
        id: impl Into<String>,
        variable: impl Into<String>,
        operator: Operator,
        value: impl Into<ConditionValue>,
    ) -> Self {
        Self {
            id: id.into(),
            variable: variable.into(),
            operator,
            value: value.into(),
            target_node_id: String::new(),
        }
    }

    /// Human-readable form used as an edge label, e.g. `bmi < 15`.
    pub fn summary(&self) -> String {
        if self.variable.is_empty() || self.value.is_empty() {
            return "Incomplete condition".to_string();
        }
        format!("{} {} {}", self.variable, self.operator, self.value)
    }
}

/// Partial update of a condition; only the present fields are written.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConditionPatch {
    pub variable: Option<String>,
    pub operator: Option<Operator>,
    pub value: Option<ConditionValue>,
}

impl ConditionPatch {
    pub(crate) fn merge_into(self, condition: &mut Condition) {
        if let Some(variable) = self.variable {
            condition.variable = variable;
        }
        if let Some(operator) = self.operator {
            condition.operator = operator;
        }
        if let Some(value) = self.value {
            condition.value = value;
        }
    }
}
