#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use ocv_model::{Scheme, Table, TableKind};
use ocv_validate::{Resolution, Resolver};

pub const ENTITY_HEADERS: &[&str] = &[
    "id", "title", "author", "pub_date", "venue", "volume", "issue", "page", "type", "publisher",
    "editor",
];

pub const CITATION_HEADERS: &[&str] = &[
    "citing_id",
    "citing_publication_date",
    "cited_id",
    "cited_publication_date",
];

pub fn table(kind: TableKind, headers: &[&str], records: &[Vec<&str>]) -> Table {
    let mut table = Table::new(kind, headers.iter().map(|h| h.to_string()).collect());
    for record in records {
        table.push_record(record.iter().copied());
    }
    table
}

/// An entity row with only id and type set.
pub fn entity(id: &str) -> Vec<&str> {
    vec![id, "", "", "", "", "", "", "", "journal article", "", ""]
}

pub fn citation<'a>(citing: &'a str, cited: &'a str) -> Vec<&'a str> {
    vec![citing, "", cited, ""]
}

/// DOI resolver answering from a fixed set and counting lookups.
#[derive(Default)]
pub struct StubResolver {
    pub known: HashSet<String>,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl StubResolver {
    pub fn knowing(ids: &[&str]) -> Self {
        Self {
            known: ids.iter().map(|id| id.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Resolver for StubResolver {
    fn supports(&self, scheme: Scheme) -> bool {
        scheme == Scheme::Doi
    }

    fn resolve(&self, _scheme: Scheme, value: &str) -> Resolution {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Resolution::LookupFailed
        } else if self.known.contains(value) {
            Resolution::Known
        } else {
            Resolution::Unknown
        }
    }
}
