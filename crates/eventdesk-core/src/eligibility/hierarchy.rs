use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tracing::debug;

use crate::models::QualificationCategory;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    #[error("Duplicate qualification category id {0}")]
    DuplicateId(i64),

    #[error("Duplicate qualification category slug '{0}'")]
    DuplicateSlug(String),

    #[error("Qualification category '{slug}' is its own ancestor")]
    Cycle { slug: String },
}

/// Index over the qualification-category graph.
///
/// Construction validates that the `parents` graph is acyclic, so every
/// ancestor search over a `CategoryTree` terminates. A parent id that is not
/// part of the set is allowed and simply never matches.
#[derive(Debug, Clone, Default)]
pub struct CategoryTree {
    categories: Vec<QualificationCategory>,
    by_id: HashMap<i64, usize>,
    by_slug: HashMap<String, usize>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    InProgress,
    Done,
}

impl CategoryTree {
    pub fn new(categories: Vec<QualificationCategory>) -> Result<Self, HierarchyError> {
        let mut by_id = HashMap::with_capacity(categories.len());
        let mut by_slug = HashMap::with_capacity(categories.len());

        for (index, category) in categories.iter().enumerate() {
            if by_id.insert(category.id, index).is_some() {
                return Err(HierarchyError::DuplicateId(category.id));
            }
            if by_slug.insert(category.slug.clone(), index).is_some() {
                return Err(HierarchyError::DuplicateSlug(category.slug.clone()));
            }
        }

        let tree = Self {
            categories,
            by_id,
            by_slug,
        };
        tree.check_acyclic()?;

        debug!(count = tree.categories.len(), "Built qualification category tree");
        Ok(tree)
    }

    pub fn get(&self, id: i64) -> Option<&QualificationCategory> {
        self.by_id.get(&id).map(|&index| &self.categories[index])
    }

    pub fn get_by_slug(&self, slug: &str) -> Option<&QualificationCategory> {
        self.by_slug.get(slug).map(|&index| &self.categories[index])
    }

    /// Human-readable name for a slug, or the slug itself when unknown
    pub fn name_for_slug<'a>(&'a self, slug: &'a str) -> &'a str {
        self.get_by_slug(slug).map(|c| c.name.as_str()).unwrap_or(slug)
    }

    /// Whether `held`, or any category reachable from it through `parents`,
    /// has a slug in `required`. Depth-first; each category is visited once,
    /// so shared (diamond) ancestry is walked a single time.
    pub fn satisfies(&self, held: &QualificationCategory, required: &[&str]) -> bool {
        // Prefer the indexed copy, the embedded one may come without parents
        let start = self.get(held.id).unwrap_or(held);
        if required.contains(&start.slug.as_str()) {
            return true;
        }

        let mut visited: HashSet<i64> = HashSet::from([start.id]);
        let mut stack: Vec<i64> = start.parents.iter().rev().copied().collect();

        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            let Some(category) = self.get(id) else {
                debug!(id, from = %start.slug, "Parent category not in the supplied set");
                continue;
            };
            if required.contains(&category.slug.as_str()) {
                return true;
            }
            stack.extend(category.parents.iter().rev());
        }

        false
    }

    fn check_acyclic(&self) -> Result<(), HierarchyError> {
        let mut state: HashMap<i64, Visit> = HashMap::with_capacity(self.categories.len());

        for root in &self.categories {
            if state.contains_key(&root.id) {
                continue;
            }

            // (category id, index of the next parent to explore)
            let mut stack: Vec<(i64, usize)> = vec![(root.id, 0)];
            state.insert(root.id, Visit::InProgress);

            while let Some(frame) = stack.last_mut() {
                let id = frame.0;
                let parents = self.get(id).map(|c| c.parents.as_slice()).unwrap_or(&[]);
                if frame.1 >= parents.len() {
                    state.insert(id, Visit::Done);
                    stack.pop();
                    continue;
                }

                let parent = parents[frame.1];
                frame.1 += 1;

                if self.get(parent).is_none() {
                    continue;
                }
                match state.get(&parent) {
                    Some(Visit::InProgress) => {
                        let slug = self.get(parent).map(|c| c.slug.clone()).unwrap_or_default();
                        return Err(HierarchyError::Cycle { slug });
                    }
                    Some(Visit::Done) => {}
                    None => {
                        state.insert(parent, Visit::InProgress);
                        stack.push((parent, 0));
                    }
                }
            }
        }

        Ok(())
    }
}
