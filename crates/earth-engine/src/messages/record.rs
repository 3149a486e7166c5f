use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Identifier of a stored message, unique within one store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

/// A note on the message board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: MessageId,
    /// Locale-formatted creation time, shown verbatim.
    pub time: String,
    pub content: String,
}

/// Wire form: records written before ids existed have no `id` field.
#[derive(Deserialize)]
struct StoredRecord {
    #[serde(default)]
    id: Option<MessageId>,
    time: String,
    content: String,
}

/// Result of decoding the stored array.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub records: Vec<MessageRecord>,
    /// True when ids had to be assigned or repaired, i.e. the stored text no
    /// longer matches `encode(&records)`.
    pub normalized: bool,
}

/// Serialize the full sequence for storage.
pub fn encode(records: &[MessageRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string(records)
}

/// Parse the stored sequence, preserving order.
///
/// A JSON `null` decodes as an empty list. Records without an id, or whose
/// id repeats an earlier one, get fresh ids above the current maximum. When
/// the maximum leaves no room for those ids plus the next append, every
/// record is renumbered from 1.
pub fn decode(json: &str) -> Result<Decoded, serde_json::Error> {
    let stored: Option<Vec<StoredRecord>> = serde_json::from_str(json)?;
    let stored = stored.unwrap_or_default();

    let spare = stored.len() as u64 + 1;
    let next = match stored.iter().filter_map(|r| r.id).map(|id| id.0).max() {
        None => Some(1),
        Some(max) => max.checked_add(spare).map(|_| max + 1),
    };
    let Some(mut next) = next else {
        return Ok(Decoded {
            records: renumber(stored),
            normalized: true,
        });
    };

    let mut seen = HashSet::with_capacity(stored.len());
    let mut normalized = false;
    let records = stored
        .into_iter()
        .map(|r| {
            let id = match r.id {
                Some(id) if seen.insert(id) => id,
                _ => {
                    normalized = true;
                    let id = MessageId(next);
                    next += 1;
                    seen.insert(id);
                    id
                }
            };
            MessageRecord {
                id,
                time: r.time,
                content: r.content,
            }
        })
        .collect();

    Ok(Decoded { records, normalized })
}

/// First id above every id in `records`; `None` once ids are exhausted.
pub fn next_id(records: &[MessageRecord]) -> Option<u64> {
    records
        .iter()
        .map(|r| r.id.0)
        .max()
        .map_or(Some(1), |max| max.checked_add(1))
}

fn renumber(stored: Vec<StoredRecord>) -> Vec<MessageRecord> {
    stored
        .into_iter()
        .zip(1..)
        .map(|(r, id)| MessageRecord {
            id: MessageId(id),
            time: r.time,
            content: r.content,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, time: &str, content: &str) -> MessageRecord {
        MessageRecord {
            id: MessageId(id),
            time: time.into(),
            content: content.into(),
        }
    }

    #[test]
    fn round_trip_preserves_order() {
        let records = vec![
            record(3, "2024/1/1 10:00:00", "hello"),
            record(1, "2024/1/1 10:00:00", "hello"),
            record(7, "2024/1/2 08:30:00", "你好 ✖ \"quoted\""),
        ];
        let decoded = decode(&encode(&records).unwrap()).unwrap();
        assert_eq!(decoded.records, records);
        assert!(!decoded.normalized);
    }

    #[test]
    fn legacy_records_get_ids() {
        let json = r#"[
            {"time": "t1", "content": "a"},
            {"time": "t2", "content": "b", "id": 5},
            {"time": "t3", "content": "c"}
        ]"#;
        let decoded = decode(json).unwrap();
        assert!(decoded.normalized);
        let ids: Vec<u64> = decoded.records.iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![6, 5, 7]);
        assert_eq!(decoded.records[2].content, "c");
    }

    #[test]
    fn duplicate_ids_are_repaired() {
        let json = r#"[{"id":1,"time":"t","content":"a"},{"id":1,"time":"t","content":"a"}]"#;
        let decoded = decode(json).unwrap();
        assert_eq!(decoded.records[0].id, MessageId(1));
        assert_eq!(decoded.records[1].id, MessageId(2));
        assert!(decoded.normalized);
    }

    #[test]
    fn ids_at_the_top_of_the_range_are_renumbered() {
        let json = r#"[
            {"id": 18446744073709551615, "time": "t", "content": "a"},
            {"id": 0, "time": "t", "content": "b"}
        ]"#;
        let decoded = decode(json).unwrap();
        assert!(decoded.normalized);
        let ids: Vec<u64> = decoded.records.iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(decoded.records[1].content, "b");
        assert_eq!(next_id(&decoded.records), Some(3));
    }

    #[test]
    fn next_id_is_none_when_exhausted() {
        assert_eq!(next_id(&[]), Some(1));
        assert_eq!(next_id(&[record(u64::MAX, "t", "c")]), None);
    }

    #[test]
    fn null_is_empty() {
        let decoded = decode("null").unwrap();
        assert!(decoded.records.is_empty());
    }

    #[test]
    fn corrupted_input_is_an_error() {
        assert!(decode("{not json").is_err());
        assert!(decode(r#"[{"time": 1}]"#).is_err());
    }

    #[test]
    fn wire_format_field_names() {
        let json = encode(&[record(1, "t", "c")]).unwrap();
        assert_eq!(json, r#"[{"id":1,"time":"t","content":"c"}]"#);
    }
}
