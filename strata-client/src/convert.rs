/// Conversions between domain types and their wire representation
use strata_core::{Entity, Error, Key, PathElement, Properties, Record, Value};
use strata_proto as proto;

use crate::error::{ClientError, Result};

pub fn key_to_proto(key: &Key) -> proto::Key {
    proto::Key {
        partition_id: key.namespace.as_ref().map(|ns| proto::PartitionId {
            dataset_id: None,
            namespace: Some(ns.clone()),
        }),
        path_element: key
            .path
            .iter()
            .map(|e| proto::PathElement {
                kind: e.kind.clone(),
                id: e.id,
                name: e.name.clone(),
            })
            .collect(),
    }
}

pub fn key_from_proto(key: proto::Key) -> Key {
    Key {
        namespace: key
            .partition_id
            .and_then(|p| p.namespace)
            .filter(|ns| !ns.is_empty()),
        path: key
            .path_element
            .into_iter()
            .map(|e| PathElement {
                kind: e.kind,
                id: e.id,
                name: e.name,
            })
            .collect(),
    }
}

pub fn value_to_proto(value: &Value) -> proto::Value {
    let mut out = proto::Value::default();
    match value {
        Value::Null => {}
        Value::Bool(b) => out.boolean_value = Some(*b),
        Value::I(i) => out.integer_value = Some(*i),
        Value::F(f) => out.double_value = Some(*f),
        Value::S(s) => out.string_value = Some(s.clone()),
        Value::B(b) => out.blob_value = Some(b.clone()),
        Value::Ts(micros) => out.timestamp_microseconds_value = Some(*micros),
        Value::K(k) => out.key_value = Some(Box::new(key_to_proto(k))),
        Value::L(items) => out.list_value = items.iter().map(value_to_proto).collect(),
    }
    out
}

/// A wire value with no field set reads as null; unknown future fields are
/// already dropped by the protobuf decoder.
pub fn value_from_proto(value: proto::Value) -> Value {
    if let Some(b) = value.boolean_value {
        Value::Bool(b)
    } else if let Some(i) = value.integer_value {
        Value::I(i)
    } else if let Some(f) = value.double_value {
        Value::F(f)
    } else if let Some(s) = value.string_value {
        Value::S(s)
    } else if let Some(b) = value.blob_value {
        Value::B(b)
    } else if let Some(micros) = value.timestamp_microseconds_value {
        Value::Ts(micros)
    } else if let Some(k) = value.key_value {
        Value::K(key_from_proto(*k))
    } else if !value.list_value.is_empty() {
        Value::L(value.list_value.into_iter().map(value_from_proto).collect())
    } else {
        Value::Null
    }
}

/// Encode a native record as a wire entity under `key`, one wire property
/// per record property. Properties go out in name order so identical
/// records always encode to identical bytes.
pub fn entity_to_proto<T: Record>(key: &Key, record: &T) -> proto::Entity {
    let mut property: Vec<proto::Property> = record
        .to_properties()
        .into_iter()
        .map(|(name, value)| proto::Property {
            name,
            value: Some(value_to_proto(&value)),
        })
        .collect();
    property.sort_by(|a, b| a.name.cmp(&b.name));

    proto::Entity {
        key: Some(key_to_proto(key)),
        property,
    }
}

pub fn properties_from_proto(entity: proto::Entity) -> Properties {
    entity
        .property
        .into_iter()
        .map(|p| (p.name, value_from_proto(p.value.unwrap_or_default())))
        .collect()
}

pub fn entity_from_proto(entity: proto::Entity) -> Entity {
    let key = key_from_proto(entity.key.clone().unwrap_or_default());
    Entity::new(key, properties_from_proto(entity))
}

/// Decodes a sequence of wire entities into a caller-supplied destination,
/// slot by slot.
///
/// The destination shape is validated once at construction, before any
/// network traffic: an empty Vec is sized to `count` default records, a
/// pre-sized Vec must hold exactly `count` slots. Wire properties a record
/// does not recognize are dropped; record fields the wire does not mention
/// keep their default value.
pub struct MultiConverter<'a, T: Record> {
    dest: &'a mut Vec<T>,
}

impl<'a, T: Record> MultiConverter<'a, T> {
    pub fn bind(count: usize, dest: &'a mut Vec<T>) -> Result<Self> {
        if dest.is_empty() {
            dest.resize_with(count, T::default);
        } else if dest.len() != count {
            return Err(Error::InvalidArgument(format!(
                "destination holds {} records but {} were requested",
                dest.len(),
                count
            ))
            .into());
        }
        Ok(Self { dest })
    }

    /// Decode one wire entity into the destination slot at `index`.
    pub fn set(&mut self, index: usize, entity: proto::Entity) -> Result<()> {
        let slot = self.dest.get_mut(index).ok_or_else(|| {
            ClientError::Decode(format!("entity result index {} out of range", index))
        })?;
        slot.merge_properties(properties_from_proto(entity));
        Ok(())
    }
}
