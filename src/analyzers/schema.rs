use super::rules::{Rule, evaluate, flag};
use super::{Analyzer, AnalyzerParams, finish};
use crate::models::{Category, CategoryResult, PageData, Severity};
use serde::Serialize;
use serde_json::Value;

/// Required properties for the schema.org types we validate
const REQUIRED_FIELDS: &[(&str, &[&str])] = &[
    ("Article", &["headline", "author", "datePublished", "image"]),
    ("NewsArticle", &["headline", "author", "datePublished", "image"]),
    ("BlogPosting", &["headline", "author", "datePublished", "image"]),
    ("Product", &["name", "image", "description", "offers"]),
    ("LocalBusiness", &["name", "address", "telephone"]),
    ("Organization", &["name", "url", "logo"]),
    ("Person", &["name"]),
    ("WebSite", &["name", "url"]),
    ("BreadcrumbList", &["itemListElement"]),
    ("FAQPage", &["mainEntity"]),
    ("HowTo", &["name", "step"]),
    ("Event", &["name", "startDate", "location"]),
    ("Recipe", &["name", "image", "author", "recipeIngredient"]),
    ("VideoObject", &["name", "description", "thumbnailUrl", "uploadDate"]),
];

#[derive(Debug, Serialize)]
struct SchemaItem {
    schema_type: String,
    format: &'static str,
    missing_fields: Vec<String>,
}

#[derive(Debug, Serialize)]
struct SchemaFacts {
    json_ld_blocks: usize,
    invalid_blocks: Vec<String>,
    microdata_items: usize,
    rdfa_items: usize,
    items: Vec<SchemaItem>,
    types: Vec<String>,
}

impl SchemaFacts {
    fn has_structured_data(&self) -> bool {
        self.json_ld_blocks > 0 || self.microdata_items > 0 || self.rdfa_items > 0
    }
}

fn none(facts: &SchemaFacts) -> Option<String> {
    flag(!facts.has_structured_data(), || {
        "No structured data (JSON-LD, microdata or RDFa) found".to_string()
    })
}

fn invalid_json_ld(facts: &SchemaFacts) -> Vec<String> {
    facts
        .invalid_blocks
        .iter()
        .map(|error| format!("JSON-LD block is not valid JSON: {}", error))
        .collect()
}

fn missing_field(facts: &SchemaFacts) -> Vec<String> {
    facts
        .items
        .iter()
        .flat_map(|item| {
            item.missing_fields.iter().map(move |field| {
                format!("{} schema is missing required field \"{}\"", item.schema_type, field)
            })
        })
        .collect()
}

const RULES: &[Rule<SchemaFacts>] = &[
    Rule::once("none", Severity::Medium, 50, none),
    Rule::each("invalid_json_ld", Severity::Medium, 15, usize::MAX, invalid_json_ld),
    Rule::each("missing_field", Severity::Low, 5, usize::MAX, missing_field),
];

/// Flattens arrays and `@graph` containers into typed objects
fn typed_objects(value: &Value, out: &mut Vec<(String, serde_json::Map<String, Value>)>) {
    match value {
        Value::Array(items) => items.iter().for_each(|item| typed_objects(item, out)),
        Value::Object(map) => {
            if let Some(graph) = map.get("@graph") {
                typed_objects(graph, out);
            }
            let types: Vec<String> = match map.get("@type") {
                Some(Value::String(t)) => vec![t.clone()],
                Some(Value::Array(ts)) => ts
                    .iter()
                    .filter_map(|t| t.as_str().map(str::to_string))
                    .collect(),
                _ => Vec::new(),
            };
            for schema_type in types {
                out.push((schema_type, map.clone()));
            }
        }
        _ => {}
    }
}

fn has_field(object: &serde_json::Map<String, Value>, field: &str) -> bool {
    match object.get(field) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(_) => true,
    }
}

fn required_fields(schema_type: &str) -> &'static [&'static str] {
    REQUIRED_FIELDS
        .iter()
        .find(|(name, _)| *name == schema_type)
        .map(|(_, fields)| *fields)
        .unwrap_or(&[])
}

pub struct SchemaAnalyzer;

impl Analyzer for SchemaAnalyzer {
    fn category(&self) -> Category {
        Category::Schema
    }

    fn analyze(&self, page: &PageData, _params: &AnalyzerParams) -> CategoryResult {
        let mut invalid_blocks = Vec::new();
        let mut objects = Vec::new();

        for block in &page.json_ld {
            match serde_json::from_str::<Value>(block.trim()) {
                Ok(value) => typed_objects(&value, &mut objects),
                Err(e) => invalid_blocks.push(e.to_string()),
            }
        }

        let mut items: Vec<SchemaItem> = objects
            .iter()
            .map(|(schema_type, object)| SchemaItem {
                schema_type: schema_type.clone(),
                format: "json-ld",
                missing_fields: required_fields(schema_type)
                    .iter()
                    .filter(|field| !has_field(object, field))
                    .map(|field| field.to_string())
                    .collect(),
            })
            .collect();

        items.extend(
            page.microdata_types
                .iter()
                .filter(|t| !t.is_empty())
                .map(|itemtype| SchemaItem {
                    schema_type: itemtype
                        .trim_end_matches('/')
                        .rsplit('/')
                        .next()
                        .unwrap_or(itemtype)
                        .to_string(),
                    format: "microdata",
                    missing_fields: Vec::new(),
                }),
        );

        let mut types: Vec<String> = items.iter().map(|item| item.schema_type.clone()).collect();
        types.sort();
        types.dedup();

        let facts = SchemaFacts {
            json_ld_blocks: page.json_ld.len(),
            invalid_blocks,
            microdata_items: page.microdata_types.len(),
            rdfa_items: page.rdfa_count,
            items,
            types,
        };

        let outcome = evaluate(Category::Schema, &facts, RULES);
        finish(Category::Schema, outcome, &facts)
    }
}
