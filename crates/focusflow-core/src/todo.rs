//! Free-form task list shown next to the timer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    pub done: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Active,
    Done,
}

impl Filter {
    fn matches(self, todo: &Todo) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !todo.done,
            Filter::Done => todo.done,
        }
    }
}

impl std::str::FromStr for Filter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Filter::All),
            "active" => Ok(Filter::Active),
            "done" => Ok(Filter::Done),
            other => Err(ValidationError::InvalidValue {
                field: "filter".into(),
                message: format!("expected all, active or done, got '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TodoCounts {
    pub all: usize,
    pub active: usize,
    pub done: usize,
}

/// Ordered newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoList {
    items: Vec<Todo>,
}

impl TodoList {
    pub fn items(&self) -> &[Todo] {
        &self.items
    }

    /// Add a todo at the top of the list. The title is trimmed.
    pub fn add(&mut self, title: &str) -> Result<&Todo, ValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::Empty("todo title".into()));
        }
        self.items.insert(
            0,
            Todo {
                id: Uuid::new_v4(),
                title: title.to_string(),
                done: false,
                created_at: Utc::now(),
            },
        );
        Ok(&self.items[0])
    }

    /// Find an item by full id or unique id prefix.
    pub fn resolve(&self, id: &str) -> Result<Uuid, ValidationError> {
        let needle = id.trim().to_ascii_lowercase();
        if needle.is_empty() {
            return Err(ValidationError::Empty("todo id".into()));
        }
        let matches: Vec<Uuid> = self
            .items
            .iter()
            .map(|t| t.id)
            .filter(|uuid| uuid.to_string().starts_with(&needle))
            .collect();
        match matches.as_slice() {
            [one] => Ok(*one),
            [] => Err(ValidationError::NotFound {
                kind: "todo".into(),
                id: id.to_string(),
            }),
            many => Err(ValidationError::Ambiguous {
                kind: "todo".into(),
                id: id.to_string(),
                count: many.len(),
            }),
        }
    }

    fn get_mut(&mut self, id: Uuid) -> Result<&mut Todo, ValidationError> {
        self.items
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| ValidationError::NotFound {
                kind: "todo".into(),
                id: id.to_string(),
            })
    }

    /// Flip the done flag. Returns the new value.
    pub fn toggle(&mut self, id: Uuid) -> Result<bool, ValidationError> {
        let todo = self.get_mut(id)?;
        todo.done = !todo.done;
        Ok(todo.done)
    }

    /// Rename an item. A blank title keeps the old one.
    pub fn update(&mut self, id: Uuid, title: &str) -> Result<(), ValidationError> {
        let todo = self.get_mut(id)?;
        let title = title.trim();
        if !title.is_empty() {
            todo.title = title.to_string();
        }
        Ok(())
    }

    pub fn remove(&mut self, id: Uuid) -> Result<Todo, ValidationError> {
        let pos = self
            .items
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| ValidationError::NotFound {
                kind: "todo".into(),
                id: id.to_string(),
            })?;
        Ok(self.items.remove(pos))
    }

    /// Drop all finished items. Returns how many were removed.
    pub fn clear_done(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|t| !t.done);
        before - self.items.len()
    }

    pub fn filtered(&self, filter: Filter) -> impl Iterator<Item = &Todo> {
        self.items.iter().filter(move |t| filter.matches(t))
    }

    pub fn counts(&self) -> TodoCounts {
        let active = self.items.iter().filter(|t| !t.done).count();
        TodoCounts {
            all: self.items.len(),
            active,
            done: self.items.len() - active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_trims_and_prepends() {
        let mut list = TodoList::default();
        list.add("  first ").unwrap();
        list.add("second").unwrap();
        let titles: Vec<_> = list.items().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["second", "first"]);
    }

    #[test]
    fn resolve_rejects_shared_prefix() {
        let mut list = TodoList::default();
        list.add("a").unwrap();
        list.add("b").unwrap();
        list.items[0].id = Uuid::parse_str("abcd0000-0000-4000-8000-000000000000").unwrap();
        list.items[1].id = Uuid::parse_str("abcd1111-0000-4000-8000-000000000000").unwrap();

        match list.resolve("ABCD") {
            Err(ValidationError::Ambiguous { id, count, .. }) => {
                assert_eq!(id, "ABCD");
                assert_eq!(count, 2);
            }
            other => panic!("expected ambiguous prefix, got {other:?}"),
        }
        assert_eq!(list.resolve("abcd1").unwrap(), list.items[1].id);
    }

    #[test]
    fn add_rejects_blank_title() {
        let mut list = TodoList::default();
        assert!(matches!(list.add("   "), Err(ValidationError::Empty(_))));
        assert!(list.items().is_empty());
    }

    #[test]
    fn toggle_filter_and_clear_done() {
        let mut list = TodoList::default();
        let a = list.add("a").unwrap().id;
        list.add("b").unwrap();
        assert!(list.toggle(a).unwrap());

        assert_eq!(list.filtered(Filter::Active).count(), 1);
        assert_eq!(list.filtered(Filter::Done).next().unwrap().id, a);
        assert_eq!(
            list.counts(),
            TodoCounts {
                all: 2,
                active: 1,
                done: 1
            }
        );

        assert_eq!(list.clear_done(), 1);
        assert_eq!(list.counts().all, 1);
    }

    #[test]
    fn update_keeps_old_title_when_blank() {
        let mut list = TodoList::default();
        let id = list.add("write report").unwrap().id;
        list.update(id, "  ").unwrap();
        assert_eq!(list.items()[0].title, "write report");
        list.update(id, " send report ").unwrap();
        assert_eq!(list.items()[0].title, "send report");
    }

    #[test]
    fn resolve_by_prefix() {
        let mut list = TodoList::default();
        let id = list.add("a").unwrap().id;
        let prefix = &id.to_string()[..8];
        assert_eq!(list.resolve(prefix).unwrap(), id);
        assert!(matches!(
            list.resolve("zzzz"),
            Err(ValidationError::NotFound { .. })
        ));
    }

    #[test]
    fn remove_unknown_id_fails() {
        let mut list = TodoList::default();
        assert!(list.remove(Uuid::new_v4()).is_err());
    }

    #[test]
    fn serializes_as_plain_array() {
        let mut list = TodoList::default();
        list.add("a").unwrap();
        let json = serde_json::to_value(&list).unwrap();
        assert!(json.is_array());
        let back: TodoList = serde_json::from_value(json).unwrap();
        assert_eq!(back, list);
    }
}
