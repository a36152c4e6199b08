//! Raw Bitable records and their display projection.
//!
//! A [`RawRecord`] is what the Bitable API returns for each row. The
//! [`Projector`] turns it into an [`Article`] by pulling four named fields
//! and running each through [`normalize_value`](crate::normalize::normalize_value).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::normalize::normalize_value;

/// A record as returned by the Bitable records endpoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Record identifier (`record_id` on the wire).
    #[serde(rename = "record_id", default, deserialize_with = "null_as_default")]
    pub id: String,

    /// Field name to cell value, in source order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub fields: Map<String, Value>,
}

/// Read an explicit `null` as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl RawRecord {
    /// Create a record from an id and a field map.
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

/// A display-ready article.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Record identifier.
    pub id: String,
    /// Article title.
    pub title: String,
    /// Highlighted quote.
    pub quote: String,
    /// Editor's commentary.
    pub comment: String,
    /// Summary body.
    pub content: String,
}

/// Source field names for each article attribute.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldNames {
    /// Field holding the title.
    pub title: String,
    /// Field holding the quote.
    pub quote: String,
    /// Field holding the commentary.
    pub comment: String,
    /// Field holding the summary body.
    pub content: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            title: "标题".to_string(),
            quote: "金句输出".to_string(),
            comment: "黄叔点评".to_string(),
            content: "概要内容输出".to_string(),
        }
    }
}

/// Maps raw records into articles.
#[derive(Clone, Debug, Default)]
pub struct Projector {
    fields: FieldNames,
}

impl Projector {
    /// Create a projector reading the given field names.
    pub fn new(fields: FieldNames) -> Self {
        Self { fields }
    }

    /// The field names this projector reads.
    pub fn fields(&self) -> &FieldNames {
        &self.fields
    }

    /// Project a single record. Absent fields become empty strings.
    pub fn project(&self, raw: &RawRecord) -> Article {
        let field = |name: &str| normalize_value(raw.fields.get(name));

        Article {
            id: raw.id.clone(),
            title: field(&self.fields.title),
            quote: field(&self.fields.quote),
            comment: field(&self.fields.comment),
            content: field(&self.fields.content),
        }
    }

    /// Project every record, preserving order.
    pub fn project_all(&self, records: &[RawRecord]) -> Vec<Article> {
        records.iter().map(|r| self.project(r)).collect()
    }

    /// Project the first record whose id equals `id`.
    pub fn find_by_id(&self, records: &[RawRecord], id: &str) -> Option<Article> {
        records
            .iter()
            .find(|r| r.id == id)
            .map(|r| self.project(r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: &str, fields: Value) -> RawRecord {
        match fields {
            Value::Object(map) => RawRecord::new(id, map),
            _ => RawRecord::new(id, Map::new()),
        }
    }

    fn sample_records() -> Vec<RawRecord> {
        vec![
            record(
                "rec1",
                json!({
                    "标题": "First",
                    "金句输出": "[{'text': 'quote', 'type': 'text'}]",
                    "黄叔点评": [{"text": "nice", "type": "text"}],
                    "概要内容输出": "{\"text\": \"body\", \"type\": \"text\"}",
                }),
            ),
            record("rec2", json!({ "标题": "Second" })),
            record("rec3", json!({ "标题": "Third" })),
        ]
    }

    #[test]
    fn test_raw_record_deserialize() {
        let raw: RawRecord = serde_json::from_value(json!({
            "record_id": "recA",
            "fields": { "标题": "Hello" }
        }))
        .unwrap();
        assert_eq!(raw.id, "recA");
        assert_eq!(raw.fields["标题"], "Hello");
    }

    #[test]
    fn test_raw_record_deserialize_missing_parts() {
        let raw: RawRecord = serde_json::from_value(json!({})).unwrap();
        assert_eq!(raw, RawRecord::default());
    }

    #[test]
    fn test_raw_record_deserialize_null_parts() {
        let raw: RawRecord =
            serde_json::from_value(json!({"record_id": null, "fields": null})).unwrap();
        assert_eq!(raw, RawRecord::default());
    }

    #[test]
    fn test_raw_record_list_tolerates_null_items() {
        let raw: Vec<RawRecord> = serde_json::from_value(json!([
            {"record_id": "rec1", "fields": null},
            {"record_id": null, "fields": {"标题": "kept"}},
        ]))
        .unwrap();
        assert_eq!(raw.len(), 2);
        assert_eq!(raw[0].id, "rec1");
        assert_eq!(raw[1].fields["标题"], "kept");
    }

    #[test]
    fn test_project_normalizes_every_field() {
        let projector = Projector::default();
        let article = projector.project(&sample_records()[0]);
        assert_eq!(
            article,
            Article {
                id: "rec1".to_string(),
                title: "First".to_string(),
                quote: "quote".to_string(),
                comment: "nice".to_string(),
                content: "body".to_string(),
            }
        );
    }

    #[test]
    fn test_project_missing_fields_default_empty() {
        let projector = Projector::default();
        let article = projector.project(&RawRecord::new("bare", Map::new()));
        assert_eq!(article.id, "bare");
        assert_eq!(article.title, "");
        assert_eq!(article.quote, "");
        assert_eq!(article.comment, "");
        assert_eq!(article.content, "");
    }

    #[test]
    fn test_project_custom_field_names() {
        let projector = Projector::new(FieldNames {
            title: "Title".to_string(),
            quote: "Quote".to_string(),
            comment: "Comment".to_string(),
            content: "Summary".to_string(),
        });
        let raw = record("r", json!({ "Title": "T", "Summary": "S" }));
        let article = projector.project(&raw);
        assert_eq!(article.title, "T");
        assert_eq!(article.content, "S");
        assert_eq!(article.quote, "");
    }

    #[test]
    fn test_project_all_preserves_order() {
        let projector = Projector::default();
        let titles: Vec<String> = projector
            .project_all(&sample_records())
            .into_iter()
            .map(|a| a.title)
            .collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_find_by_id_every_record() {
        let projector = Projector::default();
        let records = sample_records();
        for raw in &records {
            let found = projector.find_by_id(&records, &raw.id).unwrap();
            assert_eq!(found, projector.project(raw));
        }
    }

    #[test]
    fn test_find_by_id_missing() {
        let projector = Projector::default();
        assert!(projector.find_by_id(&sample_records(), "nope").is_none());
        assert!(projector.find_by_id(&[], "rec1").is_none());
    }

    #[test]
    fn test_find_by_id_first_match_wins() {
        let projector = Projector::default();
        let records = vec![
            record("dup", json!({ "标题": "one" })),
            record("dup", json!({ "标题": "two" })),
        ];
        assert_eq!(projector.find_by_id(&records, "dup").unwrap().title, "one");
    }
}
