use log::{info, warn};

use rustc_hash::FxHashMap;

use serde::{Deserialize, Serialize};

use crate::errors::*;
use crate::filter::Filter;
use crate::query::parse_query;

/// Named subset queries, saved so that batch runs and dialogs can reuse them.
///
/// ```yaml
/// queries:
///   - name: no_initiator_cys
///     query: "!C AND >2U"
/// ```
#[derive(Debug)]
pub struct QuerySet {
    queries: Vec<NamedFilter>,
    index: FxHashMap<String, usize>,
}

#[derive(Debug)]
pub struct NamedFilter {
    pub name: String,
    pub query: String,
    pub filter: Filter,
}

#[derive(Debug, Serialize, Deserialize)]
struct QuerySetFile {
    #[serde(default)]
    queries: Vec<QueryEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct QueryEntry {
    name: String,
    query: String,
}

impl QuerySet {
    pub fn new() -> Self {
        Self {
            queries: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// Parse every query in a YAML document, failing on the first bad one.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let file: QuerySetFile = serde_yaml::from_str(yaml)?;
        let mut res = Self::new();

        for entry in file.queries {
            res.add(entry.name, entry.query)?;
        }

        if res.is_empty() {
            warn!("Query set contains no queries");
        } else {
            info!("Loaded {} subset queries", res.len());
        }

        Ok(res)
    }

    /// Write the set back out, using the original query text of each entry.
    pub fn to_yaml(&self) -> Result<String> {
        let file = QuerySetFile {
            queries: self
                .queries
                .iter()
                .map(|q| QueryEntry {
                    name: q.name.clone(),
                    query: q.query.clone(),
                })
                .collect(),
        };
        Ok(serde_yaml::to_string(&file)?)
    }

    /// Parse and add a query under a new name.
    pub fn add(&mut self, name: impl Into<String>, query: impl Into<String>) -> Result<&Filter> {
        let name = name.into();
        let query = query.into();

        if self.index.contains_key(&name) {
            return Err(Error::DuplicateQueryName(name));
        }

        let filter = match parse_query(&query) {
            Ok(filter) => filter,
            Err(e) => {
                return Err(Error::NamedQuery {
                    name,
                    query,
                    source: e,
                })
            }
        };

        self.index.insert(name.clone(), self.queries.len());
        self.queries.push(NamedFilter {
            name,
            query,
            filter,
        });

        Ok(&self.queries[self.queries.len() - 1].filter)
    }

    pub fn get(&self, name: &str) -> Option<&Filter> {
        self.index.get(name).map(|&i| &self.queries[i].filter)
    }

    /// Queries in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = &NamedFilter> {
        self.queries.iter()
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}

impl Default for QuerySet {
    fn default() -> Self {
        Self::new()
    }
}
