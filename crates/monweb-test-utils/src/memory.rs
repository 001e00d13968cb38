//! In-memory user group backend
//!
//! Clones share one store, so a backend created per request by the
//! registry sees what earlier requests wrote.

use std::sync::Arc;

use monweb_usergroup::{
    BackendError, Capability, Extensible, Filter, Query, Reducible, Row, Selectable,
    SortDirection, Table, Updatable, UserGroupBackend,
};
use parking_lot::Mutex;

#[derive(Debug, Default)]
struct Store {
    groups: Vec<Row>,
    memberships: Vec<Row>,
    selects: Vec<Table>,
    failing_deletes: Vec<String>,
}

impl Store {
    fn rows(&self, table: Table) -> &[Row] {
        match table {
            Table::Group => &self.groups,
            Table::GroupMembership => &self.memberships,
        }
    }

    fn rows_mut(&mut self, table: Table) -> &mut Vec<Row> {
        match table {
            Table::Group => &mut self.groups,
            Table::GroupMembership => &mut self.memberships,
        }
    }
}

/// Backend keeping groups and memberships in memory
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    name: String,
    capabilities: Vec<Capability>,
    store: Arc<Mutex<Store>>,
}

impl MemoryBackend {
    /// Empty backend with every capability
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capabilities: Capability::ALL.to_vec(),
            store: Arc::default(),
        }
    }

    /// Same store under another name
    #[must_use]
    pub fn named(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Restrict advertised capabilities
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: &[Capability]) -> Self {
        self.capabilities = capabilities.to_vec();
        self
    }

    /// Seed a group
    #[must_use]
    pub fn with_group(self, group_name: &str, parent_name: Option<&str>, created_at: &str) -> Self {
        let mut row = Row::new()
            .with("group_name", group_name)
            .with("created_at", created_at);
        if let Some(parent) = parent_name {
            row.set("parent_name", parent);
        }
        self.store.lock().groups.push(row);
        self
    }

    /// Seed a membership
    #[must_use]
    pub fn with_member(self, group_name: &str, user_name: &str) -> Self {
        self.store.lock().memberships.push(
            Row::new()
                .with("group_name", group_name)
                .with("user_name", user_name),
        );
        self
    }

    /// Make membership deletes for `user_name` fail
    pub fn fail_delete_for(&self, user_name: &str) {
        self.store.lock().failing_deletes.push(user_name.to_string());
    }

    /// Tables selected so far, in order
    pub fn selects(&self) -> Vec<Table> {
        self.store.lock().selects.clone()
    }

    /// Forget recorded selects
    pub fn clear_selects(&self) {
        self.store.lock().selects.clear();
    }

    /// Names of the stored groups
    pub fn group_names(&self) -> Vec<String> {
        self.store
            .lock()
            .groups
            .iter()
            .filter_map(|r| r.get("group_name").map(str::to_string))
            .collect()
    }

    /// Members of a group
    pub fn members_of(&self, group_name: &str) -> Vec<String> {
        self.store
            .lock()
            .memberships
            .iter()
            .filter(|r| r.get("group_name") == Some(group_name))
            .filter_map(|r| r.get("user_name").map(str::to_string))
            .collect()
    }

    fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

impl Selectable for MemoryBackend {
    fn select(&self, query: &Query) -> Result<Vec<Row>, BackendError> {
        let mut store = self.store.lock();
        store.selects.push(query.table);

        let mut rows: Vec<Row> = store
            .rows(query.table)
            .iter()
            .filter(|r| query.filter.matches(r))
            .cloned()
            .collect();

        if let Some(sort) = &query.sort {
            rows.sort_by(|a, b| {
                let a = a.get(&sort.column).unwrap_or_default();
                let b = b.get(&sort.column).unwrap_or_default();
                match sort.direction {
                    SortDirection::Asc => a.cmp(b),
                    SortDirection::Desc => b.cmp(a),
                }
            });
        }
        if let Some(page) = query.pagination {
            rows = rows.into_iter().skip(page.offset()).take(page.limit).collect();
        }
        if !query.columns.is_empty() {
            rows = rows.iter().map(|r| r.project(&query.columns)).collect();
        }
        Ok(rows)
    }

    fn count(&self, table: Table, filter: &Filter) -> Result<usize, BackendError> {
        Ok(self
            .store
            .lock()
            .rows(table)
            .iter()
            .filter(|r| filter.matches(r))
            .count())
    }
}

impl Extensible for MemoryBackend {
    fn insert(&self, table: Table, values: Row) -> Result<(), BackendError> {
        let mut store = self.store.lock();
        if table == Table::Group {
            let name = values.get("group_name").unwrap_or_default();
            if store.groups.iter().any(|g| g.get("group_name") == Some(name)) {
                return Err(BackendError::Statement(format!(
                    "group \"{name}\" already exists"
                )));
            }
        }
        store.rows_mut(table).push(values);
        Ok(())
    }
}

impl Updatable for MemoryBackend {
    fn update(&self, table: Table, values: Row, filter: &Filter) -> Result<(), BackendError> {
        let mut store = self.store.lock();
        let mut updated = 0;
        for row in store.rows_mut(table).iter_mut().filter(|r| filter.matches(r)) {
            for (column, value) in values.iter() {
                row.set(column, value);
            }
            updated += 1;
        }
        if updated == 0 {
            return Err(BackendError::Statement(format!("no {table} row matched")));
        }
        Ok(())
    }
}

impl Reducible for MemoryBackend {
    fn delete(&self, table: Table, filter: &Filter) -> Result<(), BackendError> {
        let mut store = self.store.lock();
        if let Some(user) = filter.value_for("user_name") {
            if store.failing_deletes.iter().any(|u| u == user) {
                return Err(BackendError::Statement(format!(
                    "cannot remove \"{user}\""
                )));
            }
        }
        store.rows_mut(table).retain(|r| !filter.matches(r));
        if table == Table::Group {
            if let Some(group) = filter.value_for("group_name") {
                store
                    .memberships
                    .retain(|m| m.get("group_name") != Some(group));
            }
        }
        Ok(())
    }
}

impl UserGroupBackend for MemoryBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn as_selectable(&self) -> Option<&dyn Selectable> {
        self.has(Capability::Selectable).then_some(self as &dyn Selectable)
    }

    fn as_extensible(&self) -> Option<&dyn Extensible> {
        self.has(Capability::Extensible).then_some(self as &dyn Extensible)
    }

    fn as_updatable(&self) -> Option<&dyn Updatable> {
        self.has(Capability::Updatable).then_some(self as &dyn Updatable)
    }

    fn as_reducible(&self) -> Option<&dyn Reducible> {
        self.has(Capability::Reducible).then_some(self as &dyn Reducible)
    }
}
