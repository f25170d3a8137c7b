//! Azure DevOps backend.
//!
//! Three REST calls per query: a WIQL query for matching ids, batched work item
//! fetches with an explicit field list, and one comments request per item.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;

use crate::backend::{Backend, QuerySpec};
use crate::error::{BacklogError, Result};
use crate::fields::WorkItemType;
use crate::work_item::{Comment, WorkItem};

const API_VERSION: &str = "7.0";
const COMMENTS_API_VERSION: &str = "7.0-preview.3";
const BATCH_SIZE: usize = 200;

const FIELDS: [&str; 13] = [
    "System.Id",
    "System.WorkItemType",
    "System.Title",
    "System.AssignedTo",
    "System.State",
    "Microsoft.VSTS.Common.Priority",
    "System.Description",
    "Microsoft.VSTS.Common.AcceptanceCriteria",
    "System.CreatedBy",
    "System.CreatedDate",
    "System.Tags",
    "System.AreaPath",
    "System.IterationPath",
];

/// Client for one organization/project pair, authenticated with a personal access token.
pub struct AzureBackend {
    client: Client,
    base_url: String,
    pat: String,
}

impl AzureBackend {
    pub fn new(org: &str, project: &str, pat: &str) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(AzureBackend {
            client,
            base_url: format!("https://dev.azure.com/{org}/{project}/_apis/wit"),
            pat: pat.to_string(),
        })
    }

    fn send(&self, request: reqwest::blocking::RequestBuilder) -> Result<String> {
        let response = request.basic_auth("", Some(&self.pat)).send()?;
        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(BacklogError::Status { status: status.as_u16(), body });
        }
        Ok(body)
    }

    fn query_ids(&self, spec: &QuerySpec) -> Result<Vec<u64>> {
        let url = format!("{}/wiql?api-version={API_VERSION}", self.base_url);
        let body = json!({ "query": build_wiql(spec) });
        let text = self.send(self.client.post(url).json(&body))?;
        let parsed: WiqlResponse = serde_json::from_str(&text)?;
        Ok(parsed.work_items.into_iter().map(|r| r.id).collect())
    }

    fn fetch_batch(&self, ids: &[u64]) -> Result<Vec<RawWorkItem>> {
        let ids = ids.iter().map(u64::to_string).collect::<Vec<_>>().join(",");
        let url = format!(
            "{}/workitems?ids={ids}&fields={}&api-version={API_VERSION}",
            self.base_url,
            FIELDS.join(",")
        );
        let text = self.send(self.client.get(url))?;
        let parsed: BatchResponse = serde_json::from_str(&text)?;
        Ok(parsed.value)
    }

    fn fetch_comments(&self, id: u64) -> Result<Vec<Comment>> {
        let url = format!(
            "{}/workItems/{id}/comments?api-version={COMMENTS_API_VERSION}",
            self.base_url
        );
        let text = self.send(self.client.get(url))?;
        decode_comments(&text)
    }
}

impl Backend for AzureBackend {
    fn name(&self) -> &'static str {
        "azure"
    }

    fn query(&self, spec: &QuerySpec) -> Result<Vec<WorkItem>> {
        let ids = self.query_ids(spec)?;
        tracing::debug!(count = ids.len(), "wiql returned ids");

        let mut by_id = HashMap::new();
        for chunk in ids.chunks(BATCH_SIZE) {
            for raw in self.fetch_batch(chunk)? {
                by_id.insert(raw.id, raw);
            }
        }

        let mut items = Vec::with_capacity(ids.len());
        for id in ids {
            let Some(raw) = by_id.remove(&id) else { continue };
            let mut item = raw.into_work_item();
            item.comments = self.fetch_comments(id)?;
            items.push(item);
        }
        Ok(items)
    }
}

/// Build the WIQL statement for a query. Every filter value is quoted with
/// single quotes doubled.
pub fn build_wiql(spec: &QuerySpec) -> String {
    let mut clauses = vec!["[System.TeamProject] = @project".to_string()];
    let filters = [
        ("System.AssignedTo", &spec.assignee, "="),
        ("System.State", &spec.state, "="),
        ("System.IterationPath", &spec.iteration, "UNDER"),
        ("System.AreaPath", &spec.area, "UNDER"),
    ];
    for (field, value, op) in filters {
        if let Some(value) = value {
            clauses.push(format!("[{field}] {op} '{}'", value.replace('\'', "''")));
        }
    }
    format!(
        "SELECT [System.Id] FROM WorkItems WHERE {} \
         ORDER BY [Microsoft.VSTS.Common.Priority] ASC, [System.Id] ASC",
        clauses.join(" AND ")
    )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WiqlResponse {
    #[serde(default)]
    work_items: Vec<WorkItemRef>,
}

#[derive(Debug, Deserialize)]
struct WorkItemRef {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct BatchResponse {
    #[serde(default)]
    value: Vec<RawWorkItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Identity {
    #[serde(default)]
    display_name: String,
}

#[derive(Debug, Deserialize)]
struct RawWorkItem {
    id: u64,
    fields: RawFields,
}

#[derive(Debug, Deserialize)]
struct RawFields {
    #[serde(rename = "System.WorkItemType", default)]
    kind: String,
    #[serde(rename = "System.Title", default)]
    title: String,
    #[serde(rename = "System.AssignedTo")]
    assigned_to: Option<Identity>,
    #[serde(rename = "System.State", default)]
    state: String,
    #[serde(rename = "Microsoft.VSTS.Common.Priority")]
    priority: Option<u8>,
    #[serde(rename = "System.Description", default)]
    description: String,
    #[serde(rename = "Microsoft.VSTS.Common.AcceptanceCriteria", default)]
    acceptance_criteria: String,
    #[serde(rename = "System.CreatedBy")]
    created_by: Option<Identity>,
    #[serde(rename = "System.CreatedDate")]
    created_at: Option<DateTime<Utc>>,
    #[serde(rename = "System.Tags", default)]
    tags: String,
    #[serde(rename = "System.AreaPath", default)]
    area_path: String,
    #[serde(rename = "System.IterationPath", default)]
    iteration_path: String,
}

impl RawWorkItem {
    fn into_work_item(self) -> WorkItem {
        let f = self.fields;
        WorkItem {
            id: self.id,
            kind: WorkItemType::from_service_name(&f.kind),
            title: f.title,
            assigned_to: f.assigned_to.map(|i| i.display_name).unwrap_or_default(),
            state: f.state,
            priority: f.priority.unwrap_or(0),
            description: f.description,
            acceptance_criteria: f.acceptance_criteria,
            created_by: f.created_by.map(|i| i.display_name).unwrap_or_default(),
            created_at: f.created_at.unwrap_or_default(),
            tags: split_tags(&f.tags),
            area_path: f.area_path,
            iteration_path: f.iteration_path,
            comments: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CommentsResponse {
    #[serde(default)]
    comments: Vec<RawComment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawComment {
    #[serde(default)]
    text: String,
    created_by: Option<Identity>,
    created_date: Option<DateTime<Utc>>,
}

fn split_tags(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn decode_comments(body: &str) -> Result<Vec<Comment>> {
    let parsed: CommentsResponse = serde_json::from_str(body)?;
    let mut comments: Vec<Comment> = parsed
        .comments
        .into_iter()
        .map(|c| Comment {
            author: c.created_by.map(|i| i.display_name).unwrap_or_default(),
            created_at: c.created_date.unwrap_or_default(),
            content: c.text,
        })
        .collect();
    comments.sort_by_key(|c| c.created_at);
    Ok(comments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wiql_includes_every_populated_filter() {
        let spec = QuerySpec {
            assignee: Some("john".to_string()),
            state: Some("Active".to_string()),
            iteration: None,
            area: Some("App\\Backend".to_string()),
        };
        let wiql = build_wiql(&spec);
        assert!(wiql.contains("[System.AssignedTo] = 'john'"));
        assert!(wiql.contains("[System.State] = 'Active'"));
        assert!(wiql.contains("[System.AreaPath] UNDER 'App\\Backend'"));
        assert!(!wiql.contains("IterationPath"));
    }

    #[test]
    fn wiql_escapes_single_quotes() {
        let wiql = build_wiql(&QuerySpec::for_user("o'brien"));
        assert!(wiql.contains("'o''brien'"));
    }

    #[test]
    fn batch_response_maps_fields() {
        let body = r#"{
            "count": 1,
            "value": [{
                "id": 42,
                "fields": {
                    "System.WorkItemType": "Bug",
                    "System.Title": "Crash on save",
                    "System.AssignedTo": { "displayName": "John Doe", "uniqueName": "john@example.com" },
                    "System.State": "Active",
                    "Microsoft.VSTS.Common.Priority": 2,
                    "System.CreatedBy": { "displayName": "Emma" },
                    "System.CreatedDate": "2024-01-20T10:00:00Z",
                    "System.Tags": "bug; critical",
                    "System.AreaPath": "App\\Backend",
                    "System.IterationPath": "Sprint 23"
                }
            }]
        }"#;
        let parsed: BatchResponse = serde_json::from_str(body).unwrap();
        let item = parsed.value.into_iter().next().unwrap().into_work_item();
        assert_eq!(item.id, 42);
        assert_eq!(item.kind, WorkItemType::Bug);
        assert_eq!(item.assigned_to, "John Doe");
        assert_eq!(item.priority, 2);
        assert_eq!(item.tags, vec!["bug", "critical"]);
        assert_eq!(item.description, "");
    }

    #[test]
    fn comments_are_sorted_oldest_first() {
        let body = r#"{ "comments": [
            { "text": "second", "createdBy": { "displayName": "b" }, "createdDate": "2024-01-02T00:00:00Z" },
            { "text": "first", "createdBy": { "displayName": "a" }, "createdDate": "2024-01-01T00:00:00Z" }
        ]}"#;
        let comments = decode_comments(body).unwrap();
        assert_eq!(comments[0].content, "first");
        assert_eq!(comments[1].author, "b");
    }

    #[test]
    fn unexpected_shape_is_a_decode_error() {
        let err = decode_comments("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, BacklogError::Decode(_)));
    }
}
