//! Host search and address-bar suggestions.
//!
//! Queries never mutate; they borrow hosts straight out of the document.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::model::{Document, HostRecord};

/// Address-bar suggestion cap.
pub const MAX_SUGGESTIONS: usize = 5;

/// Search box text, active tag chips and environment selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostQuery {
    pub search: String,
    pub tags: BTreeSet<String>,
    pub environment_id: Option<String>,
}

impl HostQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: &str) -> Self {
        self.search = text.to_string();
        self
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.tags.insert(tag.to_string());
        self
    }

    pub fn environment(mut self, env_id: &str) -> Self {
        self.environment_id = Some(env_id.to_string());
        self
    }

    /// Flip a tag chip on or off.
    pub fn toggle_tag(&mut self, tag: &str) {
        if !self.tags.remove(tag) {
            self.tags.insert(tag.to_string());
        }
    }

    /// `env_id` is the environment currently holding the host.
    pub fn matches(&self, host: &HostRecord, env_id: &str) -> bool {
        if let Some(wanted) = self.environment_id.as_deref() {
            if !wanted.is_empty() && wanted != env_id && wanted != host.environment_id {
                return false;
            }
        }

        let term = self.search.trim().to_lowercase();
        let matches_search = term.is_empty()
            || host.name.to_lowercase().contains(&term)
            || host.ip.to_lowercase().contains(&term)
            || host.tags.iter().any(|t| t.to_lowercase().contains(&term));

        let matches_tags = self.tags.is_empty() || host.tags.iter().any(|t| self.tags.contains(t));

        matches_search && matches_tags
    }

    /// Matching hosts, pinned first, then by name.
    pub fn run<'a>(&self, doc: &'a Document) -> Vec<&'a HostRecord> {
        let mut hosts: Vec<&HostRecord> = doc
            .envs
            .iter()
            .flat_map(|env| {
                env.items
                    .iter()
                    .filter(move |h| self.matches(h, &env.id))
            })
            .collect();
        hosts.sort_by(|a, b| display_order(a, b));
        hosts
    }
}

/// Pinned hosts first; names compared case-insensitively, ties broken by the
/// exact name. The sort is stable, so equal names keep document order.
pub fn display_order(a: &HostRecord, b: &HostRecord) -> Ordering {
    b.pinned
        .cmp(&a.pinned)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}

pub fn filter_hosts<'a>(doc: &'a Document, query: &HostQuery) -> Vec<&'a HostRecord> {
    query.run(doc)
}

/// One address-bar suggestion: `content` is what gets submitted (the host id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub content: String,
    pub description: String,
}

/// Hosts whose `"<name> - <ip>"` line contains `text`, case-insensitively.
pub fn suggest(doc: &Document, text: &str, limit: usize) -> Vec<Suggestion> {
    let needle = text.to_lowercase();
    doc.hosts()
        .map(|h| Suggestion {
            content: h.id.clone(),
            description: format!("{} - {}", h.name, h.ip),
        })
        .filter(|s| s.description.to_lowercase().contains(&needle))
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Environment, HostFields};
    use crate::store::ops::add_host;

    fn sample() -> Document {
        let mut doc = Document::default();
        doc.envs.push(Environment::new("lab", "Lab-A"));
        add_host(&mut doc, "default", HostFields::new("web1", "10.0.0.1").with_tags(&["prod"])).unwrap();
        add_host(&mut doc, "lab", HostFields::new("db1", "10.0.0.2").with_tags(&["dev"])).unwrap();
        doc
    }

    fn names(hosts: &[&HostRecord]) -> Vec<String> {
        hosts.iter().map(|h| h.name.clone()).collect()
    }

    #[test]
    fn test_search_by_name() {
        let doc = sample();
        let found = HostQuery::new().search("db").run(&doc);
        assert_eq!(names(&found), vec!["db1"]);
    }

    #[test]
    fn test_filter_by_tag() {
        let doc = sample();
        let found = HostQuery::new().tag("prod").run(&doc);
        assert_eq!(names(&found), vec!["web1"]);
    }

    #[test]
    fn test_unmatched_search_with_matched_tag_is_empty() {
        let doc = sample();
        let found = HostQuery::new().search("zzz").tag("prod").run(&doc);
        assert!(found.is_empty());
    }

    #[test]
    fn test_search_matches_ip_and_tags_case_insensitively() {
        let doc = sample();
        assert_eq!(names(&HostQuery::new().search("0.0.2").run(&doc)), vec!["db1"]);
        assert_eq!(names(&HostQuery::new().search("PRO").run(&doc)), vec!["web1"]);
        assert_eq!(names(&HostQuery::new().search("  ").run(&doc)), vec!["db1", "web1"]);
    }

    #[test]
    fn test_environment_filter() {
        let doc = sample();
        assert_eq!(names(&HostQuery::new().environment("lab").run(&doc)), vec!["db1"]);
        assert_eq!(names(&HostQuery::new().environment("").run(&doc)).len(), 2);
        assert!(HostQuery::new().environment("other").run(&doc).is_empty());
    }

    #[test]
    fn test_tag_overlap_any() {
        let doc = sample();
        let query = HostQuery::new().tag("prod").tag("dev");
        assert_eq!(query.run(&doc).len(), 2);
    }

    #[test]
    fn test_toggle_tag() {
        let mut query = HostQuery::new();
        query.toggle_tag("prod");
        assert!(query.tags.contains("prod"));
        query.toggle_tag("prod");
        assert!(query.tags.is_empty());
    }

    #[test]
    fn test_pinned_first_then_name() {
        let mut doc = Document::default();
        for name in ["charlie", "Alpha", "bravo"] {
            add_host(&mut doc, "default", HostFields::new(name, "10.0.0.1")).unwrap();
        }
        let mut pinned = HostFields::new("zulu", "10.0.0.9");
        pinned.pinned = true;
        add_host(&mut doc, "default", pinned).unwrap();

        let found = HostQuery::new().run(&doc);
        assert_eq!(names(&found), vec!["zulu", "Alpha", "bravo", "charlie"]);
    }

    #[test]
    fn test_suggest() {
        let doc = sample();
        let hits = suggest(&doc, "10.0.0", MAX_SUGGESTIONS);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].description, "web1 - 10.0.0.1");

        let hits = suggest(&doc, "DB1", MAX_SUGGESTIONS);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].content, doc.envs[1].items[0].id);

        assert_eq!(suggest(&doc, "", 1).len(), 1);
    }
}
