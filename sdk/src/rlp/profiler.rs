//! Schema-driven packing of structured values into/out of RLP (spec.md §4.4).
//!
//! A [`Schema`] is a small tree — `Leaf`, `Array`, `Struct` — that mirrors the shape of the
//! Rust value being encoded. Errors carry a dotted path (e.g. `clauses.[2].data`) pointing at
//! the exact field that failed, assembled by prepending each level's segment as the error
//! bubbles up.

use super::kind::Kind;
use super::primitives::Item;
use crate::error::{Error, Result};

/// One field of a [`Schema::Struct`]: a name plus its nested schema.
pub struct Field {
    pub name: &'static str,
    pub schema: Schema,
}

impl Field {
    pub fn new(name: &'static str, schema: Schema) -> Self {
        Field { name, schema }
    }
}

/// The shape of a value to be packed into, or unpacked from, RLP.
pub enum Schema {
    /// A single scalar value governed by one [`Kind`].
    Leaf(Kind),
    /// A homogeneous list; every element follows `element`.
    Array { element: Box<Schema> },
    /// An ordered, fixed set of named fields, encoded as an RLP list in field order.
    Struct { fields: Vec<Field> },
}

impl Schema {
    pub fn leaf(kind: Kind) -> Self {
        Schema::Leaf(kind)
    }

    pub fn array(element: Schema) -> Self {
        Schema::Array {
            element: Box::new(element),
        }
    }

    pub fn strct(fields: Vec<Field>) -> Self {
        Schema::Struct { fields }
    }
}

/// A packed value tree matching the shape of a [`Schema`], ready for leaf-level byte access.
pub enum Value {
    Leaf(Vec<u8>),
    List(Vec<Value>),
}

impl Value {
    pub fn leaf(bytes: impl Into<Vec<u8>>) -> Self {
        Value::Leaf(bytes.into())
    }

    pub fn list(values: impl Into<Vec<Value>>) -> Self {
        Value::List(values.into())
    }

    pub fn as_leaf(&self, path: &str) -> Result<&[u8]> {
        match self {
            Value::Leaf(b) => Ok(b),
            Value::List(_) => Err(Error::Encoding {
                path: path.to_string(),
                detail: "expected a leaf value, found a list".into(),
            }),
        }
    }

    pub fn as_list(&self, path: &str) -> Result<&[Value]> {
        match self {
            Value::List(l) => Ok(l),
            Value::Leaf(_) => Err(Error::Encoding {
                path: path.to_string(),
                detail: "expected a list, found a leaf".into(),
            }),
        }
    }
}

/// Pack a [`Value`] tree into an [`Item`] tree per `schema`, validating shape and leaf bounds.
pub fn pack(schema: &Schema, value: &Value, path: &str) -> Result<Item> {
    match schema {
        Schema::Leaf(kind) => {
            let bytes = value.as_leaf(path)?;
            kind.encode(bytes, path)
        }
        Schema::Array { element } => {
            let values = value.as_list(path)?;
            let mut items = Vec::with_capacity(values.len());
            for (i, v) in values.iter().enumerate() {
                let child_path = format!("{path}.[{i}]");
                items.push(pack(element, v, &child_path)?);
            }
            Ok(Item::list(items))
        }
        Schema::Struct { fields } => {
            let values = value.as_list(path)?;
            if values.len() != fields.len() {
                return Err(Error::Encoding {
                    path: path.to_string(),
                    detail: format!(
                        "expected {} fields, got {}",
                        fields.len(),
                        values.len()
                    ),
                });
            }
            let mut items = Vec::with_capacity(fields.len());
            for (field, v) in fields.iter().zip(values) {
                let child_path = if path.is_empty() {
                    field.name.to_string()
                } else {
                    format!("{path}.{}", field.name)
                };
                items.push(pack(&field.schema, v, &child_path)?);
            }
            Ok(Item::list(items))
        }
    }
}

/// Inverse of [`pack`]: unpack an [`Item`] tree into a [`Value`] tree per `schema`.
pub fn unpack(schema: &Schema, item: &Item, path: &str) -> Result<Value> {
    match schema {
        Schema::Leaf(kind) => Ok(Value::leaf(kind.decode(item, path)?)),
        Schema::Array { element } => {
            let items = item.as_list().map_err(|e| Error::Encoding {
                path: path.to_string(),
                detail: e.to_string(),
            })?;
            let mut values = Vec::with_capacity(items.len());
            for (i, it) in items.iter().enumerate() {
                let child_path = format!("{path}.[{i}]");
                values.push(unpack(element, it, &child_path)?);
            }
            Ok(Value::list(values))
        }
        Schema::Struct { fields } => {
            let items = item.as_list().map_err(|e| Error::Encoding {
                path: path.to_string(),
                detail: e.to_string(),
            })?;
            if items.len() != fields.len() {
                return Err(Error::Encoding {
                    path: path.to_string(),
                    detail: format!(
                        "expected {} fields, got {}",
                        fields.len(),
                        items.len()
                    ),
                });
            }
            let mut values = Vec::with_capacity(fields.len());
            for (field, it) in fields.iter().zip(items) {
                let child_path = if path.is_empty() {
                    field.name.to_string()
                } else {
                    format!("{path}.{}", field.name)
                };
                values.push(unpack(&field.schema, it, &child_path)?);
            }
            Ok(Value::list(values))
        }
    }
}

/// Convenience: pack and RLP-encode a value tree in one call.
pub fn encode(schema: &Schema, value: &Value) -> Result<Vec<u8>> {
    Ok(pack(schema, value, "")?.encode())
}

/// Convenience: RLP-decode and unpack bytes into a value tree in one call.
pub fn decode(schema: &Schema, bytes: &[u8]) -> Result<Value> {
    let item = Item::decode(bytes)?;
    unpack(schema, &item, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address_schema() -> Schema {
        Schema::leaf(Kind::fixed(20))
    }

    #[test]
    fn packs_and_unpacks_struct_with_array_field() {
        let schema = Schema::strct(vec![
            Field::new("chain_tag", Schema::leaf(Kind::numeric(Some(1)))),
            Field::new("to", address_schema()),
            Field::new("clauses", Schema::array(Schema::leaf(Kind::numeric(None)))),
        ]);

        let value = Value::list(vec![
            Value::leaf(vec![0x4a]),
            Value::leaf(vec![0x11; 20]),
            Value::list(vec![Value::leaf(vec![1]), Value::leaf(vec![2, 3])]),
        ]);

        let encoded = encode(&schema, &value).unwrap();
        let decoded = decode(&schema, &encoded).unwrap();

        let list = decoded.as_list("").unwrap();
        assert_eq!(list[0].as_leaf("chain_tag").unwrap(), &[0x4a]);
        assert_eq!(list[1].as_leaf("to").unwrap(), &[0x11u8; 20][..]);
        let clauses = list[2].as_list("clauses").unwrap();
        assert_eq!(clauses[0].as_leaf("clauses.[0]").unwrap(), &[1]);
        assert_eq!(clauses[1].as_leaf("clauses.[1]").unwrap(), &[2, 3]);
    }

    #[test]
    fn reports_dotted_path_on_nested_failure() {
        let schema = Schema::strct(vec![
            Field::new("clauses", Schema::array(address_schema())),
        ]);
        let value = Value::list(vec![Value::list(vec![
            Value::leaf(vec![0x11; 20]),
            Value::leaf(vec![0x22; 19]), // wrong length
        ])]);
        let err = pack(&schema, &value, "").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("clauses.[1]"), "unexpected error: {msg}");
    }

    #[test]
    fn rejects_struct_with_wrong_field_count() {
        let schema = Schema::strct(vec![Field::new("a", Schema::leaf(Kind::numeric(None)))]);
        let value = Value::list(vec![Value::leaf(vec![1]), Value::leaf(vec![2])]);
        assert!(pack(&schema, &value, "").is_err());
    }
}
