use crate::core::ScholarshipRecord;
use crate::utils::error::Result;
use serde_json::{json, Map, Value};

/// The example batch offered for download so users can see the expected shape.
pub fn generate() -> Vec<ScholarshipRecord> {
    vec![ScholarshipRecord {
        id: Some(json!("example-scholarship-1")),
        title: Some(json!("Example International Scholarship")),
        country: Some(json!("United Kingdom")),
        institution: Some(json!("Example University")),
        deadline: Some(json!("2025-12-31")),
        level: Some(json!("Masters")),
        description: Some(json!(
            "Full scholarship for international students pursuing a master's degree in any field."
        )),
        application_url: Some(json!("https://example.com/apply")),
        featured: Some(json!(false)),
        source_url: Some(json!("https://example.com/scholarships/international")),
        image_url: Some(json!("https://example.com/images/scholarship.jpg")),
        fields: strings(&["Computer Science", "Engineering", "Business"]),
        benefits: strings(&["Full tuition coverage", "Monthly stipend", "Travel allowance"]),
        requirements: strings(&[
            "Bachelor's degree with first-class honours",
            "IELTS score of 7.0 or above",
            "Two letters of recommendation",
        ]),
        extra: Map::new(),
    }]
}

pub fn to_pretty_json() -> Result<String> {
    Ok(serde_json::to_string_pretty(&generate())?)
}

fn strings(items: &[&str]) -> Vec<Value> {
    items.iter().map(|s| Value::String(s.to_string())).collect()
}
