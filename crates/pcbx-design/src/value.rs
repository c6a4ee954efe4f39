use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A numeric quantity with a total order.
///
/// Wraps `f64` so values can be used as map keys and deduplicated when
/// unifying literals. Ordering and equality use the IEEE total order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Value(f64);

impl Value {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Estimate of the values a parameter may take.
///
/// The solver owns and narrows these; the engine and catalog only read
/// them to filter and check candidate parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueSet {
    /// No information; any value is possible.
    Full,
    /// Closed interval `[lo, hi]`.
    Interval { lo: Value, hi: Value },
    /// An explicit set of admissible values, sorted ascending.
    Discrete(Vec<Value>),
    /// No admissible value remains.
    Empty,
}

impl ValueSet {
    /// Closed interval. An inverted pair collapses to `Empty`.
    pub fn range(lo: f64, hi: f64) -> Self {
        if lo > hi {
            ValueSet::Empty
        } else {
            ValueSet::Interval {
                lo: Value::new(lo),
                hi: Value::new(hi),
            }
        }
    }

    /// Explicit value set. Input is sorted and deduplicated.
    pub fn of(values: impl IntoIterator<Item = f64>) -> Self {
        let mut values: Vec<Value> = values.into_iter().map(Value::new).collect();
        values.sort();
        values.dedup();
        if values.is_empty() {
            ValueSet::Empty
        } else {
            ValueSet::Discrete(values)
        }
    }

    /// The set containing exactly one value.
    pub fn single(value: f64) -> Self {
        ValueSet::Discrete(vec![Value::new(value)])
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ValueSet::Empty)
    }

    pub fn contains(&self, value: Value) -> bool {
        match self {
            ValueSet::Full => true,
            ValueSet::Interval { lo, hi } => *lo <= value && value <= *hi,
            ValueSet::Discrete(values) => values.contains(&value),
            ValueSet::Empty => false,
        }
    }

    /// The single admissible value, if the set has been narrowed that far.
    pub fn singleton(&self) -> Option<Value> {
        match self {
            ValueSet::Interval { lo, hi } if lo == hi => Some(*lo),
            ValueSet::Discrete(values) if values.len() == 1 => Some(values[0]),
            _ => None,
        }
    }

    pub fn intersect(&self, other: &ValueSet) -> ValueSet {
        match (self, other) {
            (ValueSet::Empty, _) | (_, ValueSet::Empty) => ValueSet::Empty,
            (ValueSet::Full, x) | (x, ValueSet::Full) => x.clone(),
            (ValueSet::Interval { lo: a, hi: b }, ValueSet::Interval { lo: c, hi: d }) => {
                let lo = (*a).max(*c);
                let hi = (*b).min(*d);
                if lo > hi {
                    ValueSet::Empty
                } else {
                    ValueSet::Interval { lo, hi }
                }
            }
            (interval @ ValueSet::Interval { .. }, ValueSet::Discrete(values))
            | (ValueSet::Discrete(values), interval @ ValueSet::Interval { .. }) => {
                let kept: Vec<Value> = values
                    .iter()
                    .copied()
                    .filter(|v| interval.contains(*v))
                    .collect();
                if kept.is_empty() {
                    ValueSet::Empty
                } else {
                    ValueSet::Discrete(kept)
                }
            }
            (ValueSet::Discrete(a), ValueSet::Discrete(b)) => {
                let kept: Vec<Value> = a.iter().copied().filter(|v| b.contains(v)).collect();
                if kept.is_empty() {
                    ValueSet::Empty
                } else {
                    ValueSet::Discrete(kept)
                }
            }
        }
    }
}

impl fmt::Display for ValueSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSet::Full => write!(f, "any"),
            ValueSet::Interval { lo, hi } => write!(f, "[{lo}, {hi}]"),
            ValueSet::Discrete(values) => {
                write!(f, "{{")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "}}")
            }
            ValueSet::Empty => write!(f, "none"),
        }
    }
}
