use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use crate::document::{DocumentIdentity, DocumentValue};
use crate::mapper::{DocumentModel, MappingError, ResolvedFields, Schema};
use crate::query::{Direction, Query};

const TITLE: &str = "title";
const DESC: &str = "desc";
const PRICE: &str = "price";
const PUBLISHED_AT: &str = "publishedAt";
const IS_PUBLISHED: &str = "isPublished";
const IMAGE_PATH: &str = "imagePath";
const IMAGES: &str = "images";

static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new()
        .required::<String>(TITLE)
        .best_effort::<String>(DESC)
        .required::<i64>(PRICE)
        .required::<DateTime<Utc>>(PUBLISHED_AT)
        .required::<bool>(IS_PUBLISHED)
        .optional::<Option<String>>(IMAGE_PATH)
        .optional::<BTreeMap<String, DocumentValue>>(IMAGES)
});

/// A marketplace item listed for sale.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub identity: DocumentIdentity,
    pub title: String,
    pub description: String,
    pub price: i64,
    pub is_published: bool,
    pub published_at: DateTime<Utc>,
    pub image_path: Option<String>,
    pub images: BTreeMap<String, DocumentValue>,
}

impl Item {
    /// Published items, newest first.
    pub fn base_query() -> Query {
        Query::collection(Self::COLLECTION)
            .where_eq(IS_PUBLISHED, true)
            .order_by(PUBLISHED_AT, Direction::Desc)
    }

    pub fn published_at_local(&self) -> DateTime<Local> {
        self.published_at.with_timezone(&Local)
    }
}

impl DocumentModel for Item {
    const COLLECTION: &'static str = "items";

    fn schema() -> &'static Schema {
        &SCHEMA
    }

    fn from_fields(
        identity: DocumentIdentity,
        fields: &ResolvedFields<'_>,
    ) -> Result<Self, MappingError> {
        Ok(Self {
            identity,
            title: fields.value(TITLE)?,
            description: fields.value_or_default(DESC)?,
            price: fields.value(PRICE)?,
            published_at: fields.value(PUBLISHED_AT)?,
            is_published: fields.value(IS_PUBLISHED)?,
            image_path: fields.value_or_default(IMAGE_PATH)?,
            images: fields.value_or_default(IMAGES)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{RawDocument, Timestamp, ValueKind};
    use crate::mapper::map_document;
    use serde_json::json;

    fn identity() -> DocumentIdentity {
        DocumentIdentity::new("items", "yuzu-kosho").unwrap()
    }

    fn raw(value: serde_json::Value) -> RawDocument {
        RawDocument::from_json(value).unwrap()
    }

    fn well_formed() -> serde_json::Value {
        json!({
            "title": "Yuzu kosho",
            "desc": "Citrus chili paste from Kyushu",
            "price": 480,
            "isPublished": true,
            "publishedAt": {"_seconds": 1565827200, "_nanoseconds": 0},
        })
    }

    #[test]
    fn map_well_formed_document() {
        let item: Item = map_document(identity(), &raw(well_formed())).unwrap();
        assert_eq!(item.identity, identity());
        assert_eq!(item.title, "Yuzu kosho");
        assert_eq!(item.description, "Citrus chili paste from Kyushu");
        assert_eq!(item.price, 480);
        assert!(item.is_published);
        assert_eq!(item.published_at.to_rfc3339(), "2019-08-15T00:00:00+00:00");
        assert_eq!(item.image_path, None);
        assert!(item.images.is_empty());
    }

    #[test]
    fn local_published_at_is_same_instant() {
        let item: Item = map_document(identity(), &raw(well_formed())).unwrap();
        let local = item.published_at_local();
        assert_eq!(local.with_timezone(&Utc), item.published_at);
        assert_eq!(local.timestamp(), 1565827200);
    }

    #[test]
    fn missing_title_fails_regardless_of_other_fields() {
        let err = map_document::<Item>(identity(), &raw(json!({"price": "free"}))).unwrap_err();
        assert_eq!(err, MappingError::MissingField { field: "title" });

        let mut doc = well_formed();
        doc.as_object_mut().unwrap().remove("title");
        let err = map_document::<Item>(identity(), &raw(doc)).unwrap_err();
        assert_eq!(err, MappingError::MissingField { field: "title" });
    }

    #[test]
    fn missing_desc_defaults_to_empty() {
        let mut doc = well_formed();
        doc.as_object_mut().unwrap().remove("desc");
        let item: Item = map_document(identity(), &raw(doc)).unwrap();
        assert_eq!(item.description, "");
    }

    #[test]
    fn wrong_typed_desc_defaults_to_empty() {
        let mut doc = well_formed();
        doc["desc"] = json!({"ja": "柚子胡椒"});
        let item: Item = map_document(identity(), &raw(doc)).unwrap();
        assert_eq!(item.description, "");
    }

    #[test]
    fn non_integer_price_is_a_type_mismatch() {
        for bad in [json!(480.5), json!("480"), json!(480.0), json!(true)] {
            let mut doc = well_formed();
            doc["price"] = bad.clone();
            let err = map_document::<Item>(identity(), &raw(doc)).unwrap_err();
            assert_eq!(
                err,
                MappingError::TypeMismatch {
                    field: "price",
                    expected: ValueKind::Integer,
                    actual: DocumentValue::from(bad),
                }
            );
        }
    }

    #[test]
    fn first_invalid_field_in_declared_order_is_reported() {
        let mut doc = well_formed();
        doc["price"] = json!("480");
        doc["isPublished"] = json!("yes");
        doc.as_object_mut().unwrap().remove("publishedAt");
        let err = map_document::<Item>(identity(), &raw(doc)).unwrap_err();
        assert_eq!(err.field(), "price");
    }

    #[test]
    fn invalid_timestamp_is_a_type_mismatch() {
        let mut doc = well_formed();
        doc["publishedAt"] = json!({"_seconds": 0, "_nanoseconds": -1});
        let err = map_document::<Item>(identity(), &raw(doc)).unwrap_err();
        assert_eq!(
            err,
            MappingError::TypeMismatch {
                field: "publishedAt",
                expected: ValueKind::Timestamp,
                actual: DocumentValue::Timestamp(Timestamp::new(0, -1)),
            }
        );

        let mut doc = well_formed();
        doc["publishedAt"] = json!("2019-08-15T00:00:00Z");
        let err = map_document::<Item>(identity(), &raw(doc)).unwrap_err();
        assert_eq!(err.field(), "publishedAt");
    }

    #[test]
    fn missing_is_published_fails() {
        let mut doc = well_formed();
        doc.as_object_mut().unwrap().remove("isPublished");
        let err = map_document::<Item>(identity(), &raw(doc)).unwrap_err();
        assert_eq!(err, MappingError::MissingField { field: "isPublished" });
    }

    #[test]
    fn image_fields_are_read_when_present() {
        let mut doc = well_formed();
        doc["imagePath"] = json!("items/yuzu-kosho/main.jpg");
        doc["images"] = json!({"thumb": "items/yuzu-kosho/thumb.jpg"});
        let item: Item = map_document(identity(), &raw(doc)).unwrap();
        assert_eq!(item.image_path.as_deref(), Some("items/yuzu-kosho/main.jpg"));
        assert_eq!(
            item.images.get("thumb"),
            Some(&DocumentValue::from("items/yuzu-kosho/thumb.jpg"))
        );
    }

    #[test]
    fn null_image_path_reads_as_absent() {
        let mut doc = well_formed();
        doc["imagePath"] = json!(null);
        let item: Item = map_document(identity(), &raw(doc)).unwrap();
        assert_eq!(item.image_path, None);
    }

    #[test]
    fn wrong_typed_images_fail() {
        let mut doc = well_formed();
        doc["images"] = json!(["a.jpg"]);
        let err = map_document::<Item>(identity(), &raw(doc)).unwrap_err();
        assert_eq!(err.field(), "images");
    }

    #[test]
    fn extra_keys_are_ignored() {
        let mut doc = well_formed();
        doc["stock"] = json!(12);
        doc["seller"] = json!({"name": "Shop"});
        let with_extras: Item = map_document(identity(), &raw(doc)).unwrap();
        let plain: Item = map_document(identity(), &raw(well_formed())).unwrap();
        assert_eq!(with_extras, plain);
    }

    #[test]
    fn mapping_is_idempotent() {
        let source = raw(well_formed());
        let first: Item = map_document(identity(), &source).unwrap();
        let second: Item = map_document(identity(), &source).unwrap();
        assert_eq!(first, second);
        assert_eq!(source, raw(well_formed()));
    }

    #[test]
    fn base_query_selects_published_newest_first() {
        let query = Item::base_query();
        assert_eq!(query.collection, "items");
        assert_eq!(
            query.to_string(),
            "items where isPublished == true order by publishedAt desc"
        );
    }
}
