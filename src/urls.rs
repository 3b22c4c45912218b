//! Relative paths of the JSON API and POS API resources.
//!
//! Every function returns a path relative to the endpoint base URL, ready to
//! pass to [`HttpClient`](crate::clients::HttpClient). Dynamic segments are
//! percent-encoded, so an identifier can never add path segments of its own.
//!
//! # Example
//!
//! ```rust
//! use moysklad_api::urls;
//!
//! assert_eq!(urls::list("product"), "entity/product");
//! assert_eq!(
//!     urls::by_id("product", "0b1c1b39-6a8a-11e8-9107-5048000d8a1b"),
//!     "entity/product/0b1c1b39-6a8a-11e8-9107-5048000d8a1b"
//! );
//! assert_eq!(urls::report_with_param("stock", "bystore"), "report/stock/bystore");
//! ```

use std::borrow::Cow;

fn seg(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

/// `entity/{entity}`
#[must_use]
pub fn create(entity: &str) -> String {
    list(entity)
}

/// `entity/{entity}/{id}`
#[must_use]
pub fn update(entity: &str, id: &str) -> String {
    by_id(entity, id)
}

/// `entity/{entity}/{id}`
#[must_use]
pub fn delete(entity: &str, id: &str) -> String {
    by_id(entity, id)
}

/// `entity/{entity}/{id}`
#[must_use]
pub fn by_id(entity: &str, id: &str) -> String {
    format!("entity/{}/{}", seg(entity), seg(id))
}

/// `entity/{entity}`
#[must_use]
pub fn list(entity: &str) -> String {
    format!("entity/{}", seg(entity))
}

/// `entity/{entity}/{id}/{relation}`, e.g. the positions of a document.
#[must_use]
pub fn relation_list(entity: &str, id: &str, relation: &str) -> String {
    format!("{}/{}/{}", list(entity), seg(id), seg(relation))
}

/// `report/{report}`
#[must_use]
pub fn report(report: &str) -> String {
    format!("report/{}", seg(report))
}

/// `report/{report}/{param}`
#[must_use]
pub fn report_with_param(report: &str, param: &str) -> String {
    format!("report/{}/{}", seg(report), seg(param))
}

/// `entity/{entity}/metadata`
#[must_use]
pub fn metadata(entity: &str) -> String {
    format!("entity/{}/metadata", seg(entity))
}

/// `entity/{entity}/metadata/attributes/{id}`
#[must_use]
pub fn metadata_attribute(entity: &str, id: &str) -> String {
    format!("entity/{}/metadata/attributes/{}", seg(entity), seg(id))
}

/// `entity/{entity}/new`, the prefilled template of a new document.
#[must_use]
pub fn new_document_template(entity: &str) -> String {
    format!("entity/{}/new", seg(entity))
}

/// `admin/attach/{retail_store_id}` (POS API).
#[must_use]
pub fn pos_attach_token(retail_store_id: &str) -> String {
    format!("admin/attach/{}", seg(retail_store_id))
}

/// `admin/retailstore/` (POS API).
#[must_use]
pub fn pos_retail_store_query() -> String {
    "admin/retailstore/".to_string()
}

/// `entity/{entity}/{id}/publication`
#[must_use]
pub fn document_publications(entity: &str, id: &str) -> String {
    format!("entity/{}/{}/publication", seg(entity), seg(id))
}

/// `entity/{entity}/{id}/publication/{publication_id}`
#[must_use]
pub fn document_publication_with_id(entity: &str, id: &str, publication_id: &str) -> String {
    format!(
        "entity/{}/{}/publication/{}",
        seg(entity),
        seg(id),
        seg(publication_id)
    )
}

/// `entity/{entity}/{id}/export/`
#[must_use]
pub fn document_export(entity: &str, id: &str) -> String {
    format!("entity/{}/{}/export/", seg(entity), seg(id))
}

/// `entity/{entity}/metadata/embeddedtemplate/`
#[must_use]
pub fn metadata_embedded_templates(entity: &str) -> String {
    format!("entity/{}/metadata/embeddedtemplate/", seg(entity))
}

/// `entity/{entity}/metadata/embeddedtemplate/{id}`
#[must_use]
pub fn metadata_embedded_template(entity: &str, id: &str) -> String {
    format!("{}{}", metadata_embedded_templates(entity), seg(id))
}

/// `entity/{entity}/metadata/customtemplate/`
#[must_use]
pub fn metadata_custom_templates(entity: &str) -> String {
    format!("entity/{}/metadata/customtemplate/", seg(entity))
}

/// `entity/{entity}/metadata/customtemplate/{id}`
#[must_use]
pub fn metadata_custom_template(entity: &str, id: &str) -> String {
    format!("{}{}", metadata_custom_templates(entity), seg(id))
}

/// `audit/`
#[must_use]
pub fn audit() -> String {
    "audit/".to_string()
}

/// `audit/{audit_id}/events`
#[must_use]
pub fn audit_events(audit_id: &str) -> String {
    format!("audit/{}/events", seg(audit_id))
}

/// `entity/{entity}/{id}/audit`
#[must_use]
pub fn entity_audit(entity: &str, id: &str) -> String {
    format!("entity/{}/{}/audit", seg(entity), seg(id))
}

/// `audit/metadata/filters`
#[must_use]
pub fn audit_filters() -> String {
    "audit/metadata/filters".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "7944ef04-f831-11e5-7a69-971500188b19";

    #[test]
    fn test_entity_paths() {
        assert_eq!(create("customerorder"), "entity/customerorder");
        assert_eq!(list("customerorder"), "entity/customerorder");
        assert_eq!(by_id("customerorder", ID), format!("entity/customerorder/{ID}"));
        assert_eq!(update("customerorder", ID), by_id("customerorder", ID));
        assert_eq!(delete("customerorder", ID), by_id("customerorder", ID));
        assert_eq!(
            relation_list("customerorder", ID, "positions"),
            format!("entity/customerorder/{ID}/positions")
        );
        assert_eq!(new_document_template("demand"), "entity/demand/new");
    }

    #[test]
    fn test_report_paths() {
        assert_eq!(report("stock"), "report/stock");
        assert_eq!(report_with_param("stock", "all"), "report/stock/all");
    }

    #[test]
    fn test_metadata_paths() {
        assert_eq!(metadata("product"), "entity/product/metadata");
        assert_eq!(
            metadata_attribute("product", ID),
            format!("entity/product/metadata/attributes/{ID}")
        );
        assert_eq!(
            metadata_embedded_templates("demand"),
            "entity/demand/metadata/embeddedtemplate/"
        );
        assert_eq!(
            metadata_embedded_template("demand", ID),
            format!("entity/demand/metadata/embeddedtemplate/{ID}")
        );
        assert_eq!(
            metadata_custom_templates("demand"),
            "entity/demand/metadata/customtemplate/"
        );
        assert_eq!(
            metadata_custom_template("demand", ID),
            format!("entity/demand/metadata/customtemplate/{ID}")
        );
    }

    #[test]
    fn test_publication_and_export_paths() {
        assert_eq!(
            document_publications("demand", ID),
            format!("entity/demand/{ID}/publication")
        );
        assert_eq!(
            document_publication_with_id("demand", ID, "p1"),
            format!("entity/demand/{ID}/publication/p1")
        );
        assert_eq!(
            document_export("demand", ID),
            format!("entity/demand/{ID}/export/")
        );
    }

    #[test]
    fn test_pos_paths() {
        assert_eq!(pos_attach_token(ID), format!("admin/attach/{ID}"));
        assert_eq!(pos_retail_store_query(), "admin/retailstore/");
    }

    #[test]
    fn test_audit_paths() {
        assert_eq!(audit(), "audit/");
        assert_eq!(audit_events(ID), format!("audit/{ID}/events"));
        assert_eq!(entity_audit("product", ID), format!("entity/product/{ID}/audit"));
        assert_eq!(audit_filters(), "audit/metadata/filters");
    }

    #[test]
    fn test_segments_are_encoded() {
        assert_eq!(by_id("product", "a/b"), "entity/product/a%2Fb");
        assert_eq!(report("stock?x=1"), "report/stock%3Fx%3D1");
    }
}
