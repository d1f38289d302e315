use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::settings::Settings;

/// What `fetch` writes: every item of a collection plus a count.
#[derive(Debug, Serialize, Deserialize)]
pub struct CollectionDump {
    #[serde(default)]
    pub data: Vec<Value>,
    #[serde(default)]
    pub meta: DumpMeta,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DumpMeta {
    #[serde(default)]
    pub total: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CollectionDump {
    pub fn new(data: Vec<Value>) -> Self {
        let total = data.len();
        CollectionDump {
            data,
            meta: DumpMeta {
                total,
                description: None,
            },
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.meta.description = Some(description.to_string());
        self
    }
}

#[derive(Debug, Deserialize)]
struct PageResponse {
    #[serde(default)]
    data: Vec<Value>,
    #[serde(default)]
    meta: PageMeta,
}

#[derive(Debug, Default, Deserialize)]
struct PageMeta {
    pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Pagination {
    page: Option<u32>,
    page_count: Option<u32>,
}

impl PageResponse {
    /// Page count reported by the API; a response without pagination is a single page.
    fn page_count(&self) -> u32 {
        self.meta
            .pagination
            .as_ref()
            .and_then(|p| p.page_count)
            .unwrap_or(1)
    }

    fn is_last(&self, requested: u32) -> bool {
        let current = self
            .meta
            .pagination
            .as_ref()
            .and_then(|p| p.page)
            .unwrap_or(requested);
        self.data.is_empty() || current >= self.page_count()
    }
}

pub struct FetchOptions<'a> {
    pub collection: &'a str,
    /// Relation to populate, e.g. `brand`.
    pub populate: Option<&'a str>,
}

fn page_url(base: &str, opts: &FetchOptions, page: u32, page_size: u32) -> String {
    let mut url = format!(
        "{}/api/{}?pagination[page]={}&pagination[pageSize]={}",
        base.trim_end_matches('/'),
        opts.collection,
        page,
        page_size
    );
    if let Some(rel) = opts.populate {
        url.push_str("&populate=");
        url.push_str(rel);
    }
    url
}

/// Fetch every page of a collection. Any HTTP failure aborts the whole fetch.
pub async fn fetch_all(settings: &Settings, opts: &FetchOptions<'_>) -> Result<Vec<Value>> {
    let client = reqwest::Client::new();
    let mut items = Vec::new();
    let mut page = 1;

    let pb = ProgressBar::new(1);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} pages {msg}")?
            .progress_chars("=> "),
    );

    loop {
        let url = page_url(&settings.url, opts, page, settings.page_size);
        debug!("GET {}", url);

        let mut request = client.get(&url);
        if let Some(token) = settings.token() {
            request = request.bearer_auth(token);
        }
        let response: PageResponse = request
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("Failed to fetch {} page {}", opts.collection, page))?
            .json()
            .await
            .with_context(|| format!("Invalid JSON on {} page {}", opts.collection, page))?;

        pb.set_length(response.page_count().into());
        pb.set_position(page.into());
        let last = response.is_last(page);
        items.extend(response.data);
        pb.set_message(format!("({} {})", items.len(), opts.collection));

        if last {
            break;
        }
        page += 1;
    }

    pb.finish_and_clear();
    info!("Fetched {} {} over {} pages", items.len(), opts.collection, page);
    Ok(items)
}

/// True when a model carries no brand relation (absent, null, empty, or `{data: null}`).
pub fn lacks_brand(item: &Value) -> bool {
    match item.get("brand") {
        None | Some(Value::Null) => true,
        Some(Value::Object(rel)) => rel.is_empty() || rel.get("data").is_some_and(Value::is_null),
        Some(Value::Array(list)) => list.is_empty(),
        Some(_) => false,
    }
}

/// `meta.description` of a `--without-brand` dump, e.g. "Models that don't have a brand assigned".
pub fn without_brand_description(collection: &str) -> String {
    let mut chars = collection.chars();
    let title: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    format!("{} that don't have a brand assigned", title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(v: Value) -> PageResponse {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn builds_paginated_url() {
        let opts = FetchOptions { collection: "brands", populate: None };
        assert_eq!(
            page_url("http://localhost:1338/", &opts, 3, 25),
            "http://localhost:1338/api/brands?pagination[page]=3&pagination[pageSize]=25"
        );
        let opts = FetchOptions { collection: "models", populate: Some("brand") };
        assert!(page_url("http://cms", &opts, 1, 100).ends_with("pageSize]=100&populate=brand"));
    }

    #[test]
    fn last_page_detection() {
        let mid = parse(json!({
            "data": [{ "id": 1 }],
            "meta": { "pagination": { "page": 1, "pageSize": 1, "pageCount": 3, "total": 3 } }
        }));
        assert_eq!(mid.page_count(), 3);
        assert!(!mid.is_last(1));

        let end = parse(json!({
            "data": [{ "id": 3 }],
            "meta": { "pagination": { "page": 3, "pageCount": 3 } }
        }));
        assert!(end.is_last(3));
    }

    #[test]
    fn missing_meta_is_single_page() {
        let r = parse(json!({ "data": [{ "id": 1 }] }));
        assert_eq!(r.page_count(), 1);
        assert!(r.is_last(1));
    }

    #[test]
    fn empty_page_stops() {
        let r = parse(json!({ "data": [], "meta": { "pagination": { "page": 2, "pageCount": 9 } } }));
        assert!(r.is_last(2));
    }

    #[test]
    fn brand_relation_checks() {
        assert!(lacks_brand(&json!({ "name": "Clio" })));
        assert!(lacks_brand(&json!({ "name": "Clio", "brand": null })));
        assert!(lacks_brand(&json!({ "name": "Clio", "brand": { "data": null } })));
        assert!(!lacks_brand(&json!({ "name": "Clio", "brand": { "id": 4, "name": "Renault" } })));
    }

    #[test]
    fn dump_counts_items() {
        let dump = CollectionDump::new(vec![json!({ "id": 1 }), json!({ "id": 2 })]);
        let v = serde_json::to_value(&dump).unwrap();
        assert_eq!(v["meta"]["total"], 2);
        assert!(v["meta"].get("description").is_none());
    }

    #[test]
    fn dump_with_description() {
        let dump = CollectionDump::new(vec![json!({ "name": "Clio", "brand": null })])
            .with_description(&without_brand_description("models"));
        let v = serde_json::to_value(&dump).unwrap();
        assert_eq!(v["meta"]["total"], 1);
        assert_eq!(v["meta"]["description"], "Models that don't have a brand assigned");

        let back: CollectionDump = serde_json::from_value(v).unwrap();
        assert_eq!(back.meta.description.as_deref(), Some("Models that don't have a brand assigned"));
    }
}
