use serde::{Deserialize, Serialize};

/// The `{id, name, slug}` shape the backend uses for every kind of category
/// (event category, event group, intended-for, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// A node of the qualification-category graph.
///
/// `parents` lists the more general categories this one satisfies. A person
/// holding a category also counts as holding every ancestor reachable
/// through `parents`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualificationCategory {
    pub id: i64,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub parents: Vec<i64>,
}

impl QualificationCategory {
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }
}

/// Paginated list envelope returned by the backend's list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    pub results: Vec<T>,
}
