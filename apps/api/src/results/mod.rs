//! Reviewer view over completed interviews: search, sort, summarize.

pub mod handlers;

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::result::{CandidateResult, ScoreBand};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    Score,
    Name,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Query-string filter for the results list. Defaults to best score first.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResultQuery {
    pub search: Option<String>,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
}

/// One row of the reviewer table. The full record is fetched by id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub overall_score: u8,
    pub band: ScoreBand,
    pub summary: String,
    pub completed_at: DateTime<Utc>,
}

impl From<&CandidateResult> for ResultSummary {
    fn from(r: &CandidateResult) -> Self {
        Self {
            id: r.id,
            name: r.name.clone(),
            email: r.email.clone(),
            phone: r.phone.clone(),
            overall_score: r.overall_score,
            band: ScoreBand::of(r.overall_score),
            summary: r.summary.clone(),
            completed_at: r.completed_at,
        }
    }
}

pub fn list(results: &[CandidateResult], query: &ResultQuery) -> Vec<ResultSummary> {
    let needle = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let mut rows: Vec<ResultSummary> = results
        .iter()
        .filter(|r| match &needle {
            Some(n) => r.name.to_lowercase().contains(n) || r.email.to_lowercase().contains(n),
            None => true,
        })
        .map(ResultSummary::from)
        .collect();

    // Stable sort: ties keep insertion order.
    rows.sort_by(|a, b| {
        let ordering = compare(a, b, query.sort_by);
        match query.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
    rows
}

fn compare(a: &ResultSummary, b: &ResultSummary, by: SortBy) -> Ordering {
    match by {
        SortBy::Score => a.overall_score.cmp(&b.overall_score),
        SortBy::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
    }
}

pub fn find(results: &[CandidateResult], id: Uuid) -> Option<&CandidateResult> {
    results.iter().find(|r| r.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, email: &str, score: u8) -> CandidateResult {
        CandidateResult {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            phone: "(555) 123-4567".to_string(),
            resume_text: String::new(),
            overall_score: score,
            summary: String::new(),
            records: Vec::new(),
            started_at: None,
            completed_at: Utc::now(),
        }
    }

    fn names(rows: &[ResultSummary]) -> Vec<&str> {
        rows.iter().map(|r| r.name.as_str()).collect()
    }

    fn sample() -> Vec<CandidateResult> {
        vec![
            result("Jane Doe", "jane@site.org", 72),
            result("alan Turing", "alan@bletchley.uk", 91),
            result("Grace Hopper", "grace@navy.mil", 55),
        ]
    }

    #[test]
    fn test_default_query_sorts_by_score_descending() {
        let rows = list(&sample(), &ResultQuery::default());
        assert_eq!(names(&rows), vec!["alan Turing", "Jane Doe", "Grace Hopper"]);
        assert_eq!(rows[0].band, ScoreBand::Strong);
        assert_eq!(rows[2].band, ScoreBand::Weak);
    }

    #[test]
    fn test_sort_by_name_ignores_case() {
        let query = ResultQuery {
            sort_by: SortBy::Name,
            sort_order: SortOrder::Asc,
            ..Default::default()
        };
        assert_eq!(
            names(&list(&sample(), &query)),
            vec!["alan Turing", "Grace Hopper", "Jane Doe"]
        );
    }

    #[test]
    fn test_search_matches_name_or_email() {
        let query = ResultQuery {
            search: Some("NAVY".to_string()),
            ..Default::default()
        };
        assert_eq!(names(&list(&sample(), &query)), vec!["Grace Hopper"]);

        let query = ResultQuery {
            search: Some("jane".to_string()),
            ..Default::default()
        };
        assert_eq!(names(&list(&sample(), &query)), vec!["Jane Doe"]);
    }

    #[test]
    fn test_blank_search_returns_everything() {
        let query = ResultQuery {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(list(&sample(), &query).len(), 3);
    }

    #[test]
    fn test_query_parses_from_query_string_shape() {
        let query: ResultQuery =
            serde_json::from_str(r#"{"sort_by": "name", "sort_order": "asc"}"#).unwrap();
        assert_eq!(query.sort_by, SortBy::Name);
        assert_eq!(query.sort_order, SortOrder::Asc);
        assert!(query.search.is_none());
    }

    #[test]
    fn test_find_by_id() {
        let results = sample();
        let id = results[1].id;
        assert_eq!(find(&results, id).map(|r| r.name.as_str()), Some("alan Turing"));
        assert!(find(&results, Uuid::new_v4()).is_none());
    }
}
