//! Array Canonicalization Codec
//!
//! The store may turn a sparse or shrunk array into a keyed object, so a
//! field can silently change shape between writes. Every array-valued field
//! outside the fixed-shape allowlist is written as an ordered list of
//! `[index, value]` pairs instead; reading collapses the pairs back.
//!
//! The tagged form only exists here. Records handed to the cache and the
//! rest of the crate are always in domain shape.

use serde::ser::{Serialize, SerializeSeq, Serializer};
use serde_json::{Map, Value};

/// Fields whose consumers rely on positional indices; written as bare arrays
pub const ALLOWLISTED_FIELDS: [&str; 4] = ["assignedUsers", "checkedSubtasks", "totalSubtasks", "attachments"];

pub fn is_allowlisted(field: &str) -> bool {
    ALLOWLISTED_FIELDS.contains(&field)
}

/// Wire shape of a single non-allowlisted field
#[derive(Debug, Clone, PartialEq)]
pub enum WireField {
    Scalar(Value),
    Indexed(Vec<(usize, Value)>),
}

impl WireField {
    /// Domain value -> wire field
    pub fn from_domain(value: &Value) -> Self {
        match value {
            Value::Array(items) => WireField::Indexed(items.iter().cloned().enumerate().collect()),
            other => WireField::Scalar(other.clone()),
        }
    }

    /// Recognize the tagged form in a fetched value. Accepts a list of
    /// `[index, value]` pairs or the store's sparse-object rendering of one
    /// (`{"0": [0, v], "2": [2, w]}`). Anything else is a scalar.
    pub fn from_wire(value: &Value) -> Self {
        match value {
            Value::Array(items) => match collect_pairs(items.iter()) {
                Some(pairs) => WireField::Indexed(pairs),
                None => WireField::Scalar(value.clone()),
            },
            Value::Object(map) if !map.is_empty() && map.keys().all(|k| k.parse::<usize>().is_ok()) => {
                match collect_pairs(map.values()) {
                    Some(mut pairs) => {
                        pairs.sort_by_key(|(i, _)| *i);
                        WireField::Indexed(pairs)
                    }
                    None => WireField::Scalar(value.clone()),
                }
            }
            other => WireField::Scalar(other.clone()),
        }
    }

    /// Wire field -> domain value. A single pair collapses to its bare value.
    pub fn into_domain(self) -> Value {
        match self {
            WireField::Scalar(v) => v,
            WireField::Indexed(mut pairs) if pairs.len() == 1 => pairs.remove(0).1,
            WireField::Indexed(pairs) => Value::Array(pairs.into_iter().map(|(_, v)| v).collect()),
        }
    }
}

impl Serialize for WireField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            WireField::Scalar(v) => v.serialize(serializer),
            WireField::Indexed(pairs) => {
                let mut seq = serializer.serialize_seq(Some(pairs.len()))?;
                for (index, value) in pairs {
                    seq.serialize_element(&(index, value))?;
                }
                seq.end()
            }
        }
    }
}

/// `Some` only when every element is an `[index, value]` pair
fn collect_pairs<'a>(items: impl Iterator<Item = &'a Value>) -> Option<Vec<(usize, Value)>> {
    let mut pairs = Vec::new();
    for item in items {
        let Value::Array(pair) = item else { return None };
        let [index, value] = pair.as_slice() else { return None };
        let index = usize::try_from(index.as_u64()?).ok()?;
        pairs.push((index, value.clone()));
    }
    if pairs.is_empty() {
        None
    } else {
        Some(pairs)
    }
}

/// Domain record -> wire record. Non-object values pass through untouched.
pub fn encode(record: &Value) -> Value {
    let Value::Object(fields) = record else {
        return record.clone();
    };
    let mut out = Map::new();
    for (key, value) in fields {
        let wire = if is_allowlisted(key) {
            value.clone()
        } else {
            // Serializing into a Value cannot fail for these shapes
            serde_json::to_value(WireField::from_domain(value)).unwrap_or_else(|_| value.clone())
        };
        out.insert(key.clone(), wire);
    }
    Value::Object(out)
}

/// Wire record -> domain record. Allowlisted fields are left as they are;
/// absent fields stay absent.
pub fn decode(record: &Value) -> Value {
    let Value::Object(fields) = record else {
        return record.clone();
    };
    let mut out = Map::new();
    for (key, value) in fields {
        let domain = if is_allowlisted(key) {
            value.clone()
        } else {
            WireField::from_wire(value).into_domain()
        };
        out.insert(key.clone(), domain);
    }
    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_allowlisted_fields_round_trip() {
        let record = json!({
            "title": "Deploy",
            "assignedUsers": ["contact-001", "contact-004"],
            "totalSubtasks": ["build", "ship"],
            "checkedSubtasks": [true, false],
            "attachments": [{"name": "a.png", "type": "image/png", "size": 3, "data": "AAA"}]
        });
        let wire = encode(&record);
        assert_eq!(wire, record);
        assert_eq!(decode(&wire), record);
        // Encoding twice changes nothing for allowlisted fields
        assert_eq!(encode(&wire), wire);
    }

    #[test]
    fn test_other_arrays_are_tagged_in_order() {
        let wire = encode(&json!({"labels": ["x", "y", "z"], "title": "t"}));
        assert_eq!(wire["labels"], json!([[0, "x"], [1, "y"], [2, "z"]]));
        assert_eq!(wire["title"], "t");
        assert_eq!(decode(&wire)["labels"], json!(["x", "y", "z"]));
    }

    #[test]
    fn test_single_pair_collapses_to_scalar() {
        let decoded = decode(&json!({"priority": [[0, "urgent"]]}));
        assert_eq!(decoded["priority"], "urgent");
    }

    #[test]
    fn test_sparse_object_form_is_read_back_in_index_order() {
        let decoded = decode(&json!({"labels": {"2": [2, "c"], "0": [0, "a"]}}));
        assert_eq!(decoded["labels"], json!(["a", "c"]));
    }

    #[test]
    fn test_plain_values_and_absent_fields_are_untouched() {
        let record = json!({"columnID": "done", "meta": {"k": 1}, "pair": [1, 2]});
        let decoded = decode(&record);
        assert_eq!(decoded["columnID"], "done");
        assert_eq!(decoded["meta"], json!({"k": 1}));
        // [1, 2] is not a list of pairs, so it is a plain array
        assert_eq!(decoded["pair"], json!([1, 2]));
        assert!(decoded.get("title").is_none());
    }

    #[test]
    fn test_only_unsigned_integer_indices_form_pairs() {
        let record = json!({"a": [[-1, "x"]], "b": [[1.5, "y"]], "c": [["0", "z"]]});
        assert_eq!(decode(&record), record);
    }

    #[test]
    fn test_wire_field_serializes_as_pairs() {
        let field = WireField::Indexed(vec![(0, json!("a")), (1, json!(true))]);
        assert_eq!(serde_json::to_value(&field).unwrap(), json!([[0, "a"], [1, true]]));
        assert_eq!(WireField::from_wire(&json!([[0, "a"], [1, true]])), field);
    }
}
