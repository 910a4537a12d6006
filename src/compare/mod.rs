mod misc;
pub mod path;

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use misc::Indent;
use path::FieldPath;

/// A value that can be viewed as a field-name to value mapping.
///
/// The comparator only works on mappings, so everything handed to it must
/// either be one already or know how to turn itself into one. The blanket
/// implementation covers both `serde_json` objects and typed models deriving
/// [`Serialize`]; anything that serializes to a non-object reports why.
pub trait Recordable {
    /// Returns the field mapping, or a description of why the value has none.
    fn to_mapping(&self) -> Result<Map<String, Value>, String>;
}

impl<T> Recordable for T
where
    T: Serialize,
{
    fn to_mapping(&self) -> Result<Map<String, Value>, String> {
        match serde_json::to_value(self) {
            Ok(Value::Object(fields)) => Ok(fields),
            Ok(other) => Err(format!("serializes to {}, not to an object", json_type(&other))),
            Err(err) => Err(format!("cannot be serialized: {}", err)),
        }
    }
}

/// Field names excluded from comparison at every nesting depth.
///
/// Names are unqualified: ignoring `"id"` skips `id` wherever it occurs,
/// both in extra-field detection and in value checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSet {
    fields: HashSet<String>,
}

impl IgnoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field name to the set.
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.fields.insert(name.into());
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<S> FromIterator<S> for IgnoreSet
where
    S: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Which input a [`MismatchKind::NotAMapping`] failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Actual,
    Expected,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Side::Actual => write!(f, "actual"),
            Side::Expected => write!(f, "expected"),
        }
    }
}

/// The rule a [`StructuralMismatch`] was raised by.
#[derive(Debug, Clone, PartialEq)]
pub enum MismatchKind {
    /// Fields present on the actual side that the expected shape does not
    /// declare. All offenders of one mapping level are reported together.
    UnexpectedFields(BTreeSet<String>),
    /// A field value that differs from its expected value. When both sides
    /// coerced to integers, the coerced values are carried here.
    ValueMismatch { expected: Value, actual: Value },
    /// An input that should have been a mapping was something else.
    NotAMapping { side: Side, detail: String },
}

/// A single structural difference between an actual and an expected value.
///
/// Comparison is fail-fast, so one mismatch is all a failed run produces.
/// The [`Display`](fmt::Display) form carries the dotted field path and both
/// offending values.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuralMismatch {
    path: FieldPath,
    kind: MismatchKind,
}

impl StructuralMismatch {
    /// Path of the field the mismatch was found at; the root path for
    /// whole-input failures.
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn kind(&self) -> &MismatchKind {
        &self.kind
    }

    fn unexpected(path: &FieldPath, fields: BTreeSet<String>) -> Self {
        Self {
            path: path.clone(),
            kind: MismatchKind::UnexpectedFields(fields),
        }
    }

    fn value(path: FieldPath, expected: Value, actual: Value) -> Self {
        Self {
            path,
            kind: MismatchKind::ValueMismatch { expected, actual },
        }
    }

    fn not_a_mapping(side: Side, detail: String) -> Self {
        Self {
            path: FieldPath::root(),
            kind: MismatchKind::NotAMapping { side, detail },
        }
    }
}

impl fmt::Display for StructuralMismatch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.kind {
            MismatchKind::UnexpectedFields(fields) => {
                let fields = fields
                    .iter()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "unexpected fields at \"{}\": {}", self.path, fields)
            }
            MismatchKind::ValueMismatch { expected, actual } => {
                writeln!(f, "values at \"{}\" do not match:", self.path)?;
                writeln!(f, "    expected:")?;
                writeln!(f, "{}", pretty(expected).indent(8))?;
                writeln!(f, "    actual:")?;
                write!(f, "{}", pretty(actual).indent(8))
            }
            MismatchKind::NotAMapping { side, detail } => {
                write!(f, "{} value has no comparable fields: {}", side, detail)
            }
        }
    }
}

impl std::error::Error for StructuralMismatch {}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Compares `actual` against `expected` with nothing ignored.
///
/// See [`compare_with`] for the rules.
pub fn compare(
    actual: &impl Recordable,
    expected: &impl Recordable,
) -> Result<(), StructuralMismatch> {
    compare_with(actual, expected, &IgnoreSet::new())
}

/// Compares `actual` against `expected`, field by field, skipping `ignore`.
///
/// Both inputs are turned into mappings first. The walk then checks, per
/// mapping level, that the actual side carries no fields the expected side
/// does not declare, and that every expected field matches. Matching is
/// tolerant in exactly two ways: values that both parse as integers are
/// compared as integers, and a null on one side equals an empty string on
/// the other. Nested mappings are recursed into; everything else, arrays
/// included, is compared as a leaf with plain equality.
///
/// An expected field missing from the actual side resolves to null and is
/// compared like any other value, so it passes only against an expected
/// null or empty string.
///
/// The first difference found aborts the walk and is returned as a
/// [`StructuralMismatch`], except that all unexpected fields of a level are
/// collected into one failure.
pub fn compare_with(
    actual: &impl Recordable,
    expected: &impl Recordable,
    ignore: &IgnoreSet,
) -> Result<(), StructuralMismatch> {
    let actual = actual
        .to_mapping()
        .map_err(|detail| StructuralMismatch::not_a_mapping(Side::Actual, detail))?;
    let expected = expected
        .to_mapping()
        .map_err(|detail| StructuralMismatch::not_a_mapping(Side::Expected, detail))?;

    compare_fields(&actual, &expected, &FieldPath::root(), ignore)
}

fn compare_fields(
    actual: &Map<String, Value>,
    expected: &Map<String, Value>,
    path: &FieldPath,
    ignore: &IgnoreSet,
) -> Result<(), StructuralMismatch> {
    let unexpected = actual
        .keys()
        .filter(|key| !expected.contains_key(key.as_str()) && !ignore.contains(key.as_str()))
        .cloned()
        .collect::<BTreeSet<_>>();
    if !unexpected.is_empty() {
        return Err(StructuralMismatch::unexpected(path, unexpected));
    }

    for (key, expected_value) in expected {
        if ignore.contains(key) {
            continue;
        }

        // Absent keys resolve to null, not to an empty string.
        let actual_value = actual.get(key).unwrap_or(&Value::Null);

        if let (Some(actual_int), Some(expected_int)) =
            (try_parse_int(actual_value), try_parse_int(expected_value))
        {
            if actual_int != expected_int {
                return Err(StructuralMismatch::value(
                    path.child(key),
                    Value::from(expected_int),
                    Value::from(actual_int),
                ));
            }
            continue;
        }

        if null_for_blank(actual_value, expected_value) {
            continue;
        }

        if let (Value::Object(actual_fields), Value::Object(expected_fields)) =
            (actual_value, expected_value)
        {
            compare_fields(actual_fields, expected_fields, &path.child(key), ignore)?;
            continue;
        }

        if actual_value != expected_value {
            return Err(StructuralMismatch::value(
                path.child(key),
                expected_value.clone(),
                actual_value.clone(),
            ));
        }
    }

    Ok(())
}

/// Null on one side and an empty string on the other count as equal: the
/// services under test serialize unset optional fields either way.
fn null_for_blank(actual: &Value, expected: &Value) -> bool {
    (actual.is_null() && expected.as_str() == Some(""))
        || (expected.is_null() && actual.as_str() == Some(""))
}

/// The integer reading of a value, if it has one.
///
/// Numbers parse when they fit an `i64`: integers directly, floats only
/// when they are whole. Strings parse when they trim to an integer
/// literal. Nulls, booleans, arrays, objects and anything else
/// (including `"5.0"`) do not parse.
pub fn try_parse_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            let float = number.as_f64()?;
            // `i64::MAX as f64` rounds up to 2^63, so the upper bound is
            // exclusive.
            if float.fract() != 0.0 || float < i64::MIN as f64 || float >= i64::MAX as f64 {
                return None;
            }
            Some(float as i64)
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}
