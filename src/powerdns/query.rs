//! In-memory filtering over a fetched zone's RRSets.
//!
//! Every function walks the slice once and keeps the input order, so a
//! result never holds the same RRSet twice.
use crate::error::{PdnsError, Result};
use crate::powerdns::types::{RRSet, RecordType, Zone};

/// How a text criterion is compared against a name or record content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchMode {
    #[default]
    Exact,
    Contains,
}

impl MatchMode {
    fn matches(self, haystack: &str, needle: &str) -> bool {
        match self {
            MatchMode::Exact => haystack == needle,
            MatchMode::Contains => haystack.contains(needle),
        }
    }
}

fn name_matches(rrset: &RRSet, name: &str, mode: MatchMode) -> bool {
    mode.matches(&rrset.name, name)
}

fn content_matches(rrset: &RRSet, content: &str, mode: MatchMode) -> bool {
    rrset
        .records
        .iter()
        .any(|record| mode.matches(&record.content, content))
}

pub fn by_name<'a>(rrsets: &'a [RRSet], name: &str, mode: MatchMode) -> Vec<&'a RRSet> {
    rrsets
        .iter()
        .filter(|rrset| name_matches(rrset, name, mode))
        .collect()
}

/// RRSets holding at least one record whose content matches.
pub fn by_content<'a>(rrsets: &'a [RRSet], content: &str, mode: MatchMode) -> Vec<&'a RRSet> {
    rrsets
        .iter()
        .filter(|rrset| content_matches(rrset, content, mode))
        .collect()
}

pub fn by_type<'a>(rrsets: &'a [RRSet], rrtype: &RecordType) -> Vec<&'a RRSet> {
    rrsets.iter().filter(|rrset| &rrset.rrtype == rrtype).collect()
}

/// Free-text search: an RRSet matches when its name or any record content
/// contains `term`. An empty term returns everything.
pub fn search<'a>(rrsets: &'a [RRSet], term: &str) -> Vec<&'a RRSet> {
    if term.is_empty() {
        return rrsets.iter().collect();
    }
    rrsets
        .iter()
        .filter(|rrset| {
            name_matches(rrset, term, MatchMode::Contains)
                || content_matches(rrset, term, MatchMode::Contains)
        })
        .collect()
}

pub fn find<'a>(rrsets: &'a [RRSet], name: &str, rrtype: &RecordType) -> Option<&'a RRSet> {
    rrsets
        .iter()
        .find(|rrset| rrset.name == name && &rrset.rrtype == rrtype)
}

/// The zone's single SOA RRSet.
pub fn soa(rrsets: &[RRSet]) -> Result<&RRSet> {
    let mut found = rrsets.iter().filter(|rrset| rrset.rrtype == RecordType::SOA);
    let first = found.next().ok_or(PdnsError::NoSoaRecord)?;
    let extra = found.count();
    if extra > 0 {
        return Err(PdnsError::MultipleSoaRecords { count: extra + 1 });
    }
    Ok(first)
}

/// Combined filter. Every criterion that is set must hold; unset (or empty)
/// criteria do not filter. A query with nothing set matches every RRSet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordQuery {
    pub name: Option<String>,
    pub name_mode: MatchMode,
    pub rrtype: Option<RecordType>,
    /// Acceptable record contents; any one of them is enough.
    pub contents: Vec<String>,
    pub content_mode: MatchMode,
}

impl RecordQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name_mode(mut self, mode: MatchMode) -> Self {
        self.name_mode = mode;
        self
    }

    pub fn rrtype(mut self, rrtype: RecordType) -> Self {
        self.rrtype = Some(rrtype);
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.contents.push(content.into());
        self
    }

    pub fn content_mode(mut self, mode: MatchMode) -> Self {
        self.content_mode = mode;
        self
    }

    fn name_criterion(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }

    fn type_criterion(&self) -> Option<&RecordType> {
        self.rrtype.as_ref().filter(|rrtype| !rrtype.as_str().is_empty())
    }

    fn content_criteria(&self) -> impl Iterator<Item = &str> {
        self.contents
            .iter()
            .map(String::as_str)
            .filter(|content| !content.is_empty())
    }

    pub fn is_wildcard(&self) -> bool {
        self.name_criterion().is_none()
            && self.type_criterion().is_none()
            && self.content_criteria().next().is_none()
    }

    pub fn matches(&self, rrset: &RRSet) -> bool {
        if let Some(name) = self.name_criterion() {
            if !name_matches(rrset, name, self.name_mode) {
                return false;
            }
        }
        if let Some(rrtype) = self.type_criterion() {
            if &rrset.rrtype != rrtype {
                return false;
            }
        }
        let mut contents = self.content_criteria().peekable();
        if contents.peek().is_some()
            && !contents.any(|content| content_matches(rrset, content, self.content_mode))
        {
            return false;
        }
        true
    }

    pub fn run<'a>(&self, rrsets: &'a [RRSet]) -> Vec<&'a RRSet> {
        if self.is_wildcard() {
            return rrsets.iter().collect();
        }
        rrsets.iter().filter(|rrset| self.matches(rrset)).collect()
    }
}

impl Zone {
    pub fn query(&self, query: &RecordQuery) -> Vec<&RRSet> {
        query.run(&self.rrsets)
    }

    pub fn search(&self, term: &str) -> Vec<&RRSet> {
        search(&self.rrsets, term)
    }

    pub fn find(&self, name: &str, rrtype: &RecordType) -> Option<&RRSet> {
        find(&self.rrsets, name, rrtype)
    }

    pub fn soa(&self) -> Result<&RRSet> {
        soa(&self.rrsets)
    }
}
