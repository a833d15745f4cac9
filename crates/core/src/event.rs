//! Actor events as stored in a receipt's event AMT.

use crate::cbor::{self, Value};
use crate::{CoreError, CoreResult};

/// One key/value pair of an emitted event, value still framed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventEntry {
    /// Indexing flags, passed through uninterpreted
    pub flags: u64,
    pub key: String,
    /// IPLD codec of the value; absent in legacy three-field entries
    pub codec: Option<u64>,
    /// Value in its self-describing byte-array framing
    pub raw_value: Vec<u8>,
}

/// One event, as stored in a single AMT leaf
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    /// Actor ID of the emitter
    pub emitter: u64,
    pub entries: Vec<EventEntry>,
}

impl EventRecord {
    /// Deserializes an event from the DAG-CBOR bytes of an AMT leaf.
    ///
    /// The record is `[emitter, [entry, ...]]` with each entry either
    /// `[flags, key, codec, value]` or the older `[flags, key, value]`.
    pub fn from_cbor(bytes: &[u8]) -> CoreResult<Self> {
        let value = cbor::decode(bytes)?;
        Self::from_value(&value)
    }

    /// Reads an event from an already decoded CBOR item
    pub fn from_value(value: &Value) -> CoreResult<Self> {
        let fields = cbor::as_array(value, "event")?;
        let [emitter, entries] = fields else {
            return Err(invalid(format!("event has {} fields, expected 2", fields.len())));
        };
        let emitter = cbor::as_u64(emitter, "event emitter")?;
        let entries = cbor::as_array(entries, "event entries")?
            .iter()
            .enumerate()
            .map(|(i, entry)| EventEntry::from_value(entry).map_err(|e| at_entry(i, e)))
            .collect::<CoreResult<Vec<_>>>()?;
        Ok(Self { emitter, entries })
    }
}

impl EventEntry {
    fn from_value(value: &Value) -> CoreResult<Self> {
        let fields = cbor::as_array(value, "entry")?;
        let (flags, key, codec, raw) = match fields {
            [flags, key, codec, raw] => (flags, key, Some(codec), raw),
            [flags, key, raw] => (flags, key, None, raw),
            _ => {
                return Err(invalid(format!(
                    "entry has {} fields, expected 3 or 4",
                    fields.len()
                )))
            }
        };

        let key = match key {
            Value::Text(key) => key.clone(),
            _ => return Err(invalid("entry key is not a text string")),
        };
        Ok(Self {
            flags: cbor::as_u64(flags, "entry flags")?,
            key,
            codec: codec.map(|c| cbor::as_u64(c, "entry codec")).transpose()?,
            raw_value: cbor::as_bytes(raw, "entry value")?.to_vec(),
        })
    }
}

fn invalid(reason: impl Into<String>) -> CoreError {
    CoreError::InvalidEvent {
        reason: reason.into(),
    }
}

fn at_entry(index: usize, err: CoreError) -> CoreError {
    invalid(format!("entry {index}: {err}"))
}

/// An entry whose value has been unwrapped from its framing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedEntry {
    pub key: String,
    pub value: Vec<u8>,
    pub flags: u64,
    pub codec: Option<u64>,
}

/// An event ready for display, tagged with its AMT index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedEvent {
    /// Position in emission order
    pub index: u64,
    pub emitter: u64,
    pub entries: Vec<DecodedEntry>,
}
