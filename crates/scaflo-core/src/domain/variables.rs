//! Two-scoped variable tables and `<@name>` / `<#name>` references.
//!
//! `memory` lives for one run; `store` is loaded from and persisted to the
//! store file. Both are nested JSON objects addressed by dot paths, so
//! `set("user.name", ..)` and `get("user.name")` share the `user` object.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Which table a variable lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Persisted across runs (`@`).
    Store,
    /// Session only (`#`).
    Memory,
}

impl Scope {
    /// Map a sigil (`@` or `#`) to its scope.
    pub fn from_sigil(sigil: char) -> Option<Self> {
        match sigil {
            '@' => Some(Self::Store),
            '#' => Some(Self::Memory),
            _ => None,
        }
    }

    pub const fn sigil(&self) -> char {
        match self {
            Self::Store => '@',
            Self::Memory => '#',
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Store => "store",
            Self::Memory => "memory",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A nested string table addressed by dot paths.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableTable(Map<String, Value>);

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a dot path. Missing segments and non-object intermediates
    /// yield `None`.
    ///
    /// Leaves are stored as strings; other JSON scalars (from a hand-edited
    /// store file) are rendered the way `String(value)` would.
    pub fn get(&self, path: &str) -> Option<String> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.0.get(first)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        match current {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Array(_) | Value::Object(_) => Some(current.to_string()),
        }
    }

    /// `true` if a value is recorded at `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Write `value` at `path`, creating (or replacing) intermediate objects.
    pub fn set(&mut self, path: &str, value: impl Into<String>) {
        let mut segments: Vec<&str> = path.split('.').collect();
        let Some(last) = segments.pop() else {
            return;
        };

        let mut current = &mut self.0;
        for segment in segments {
            let entry = current
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            current = match entry {
                Value::Object(map) => map,
                _ => unreachable!("intermediate was just replaced with an object"),
            };
        }
        current.insert(last.to_string(), Value::String(value.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of top-level keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Parse a table from a JSON object; anything else is rejected.
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

/// The `memory` and `store` tables of one run.
#[derive(Debug, Clone, Default)]
pub struct Variables {
    pub memory: VariableTable,
    pub store: VariableTable,
}

impl Variables {
    /// Fresh memory around a previously persisted store.
    pub fn with_store(store: VariableTable) -> Self {
        Self {
            memory: VariableTable::new(),
            store,
        }
    }

    pub fn table(&self, scope: Scope) -> &VariableTable {
        match scope {
            Scope::Store => &self.store,
            Scope::Memory => &self.memory,
        }
    }

    pub fn table_mut(&mut self, scope: Scope) -> &mut VariableTable {
        match scope {
            Scope::Store => &mut self.store,
            Scope::Memory => &mut self.memory,
        }
    }

    pub fn get(&self, scope: Scope, path: &str) -> Option<String> {
        self.table(scope).get(path)
    }

    pub fn set(&mut self, scope: Scope, path: &str, value: impl Into<String>) {
        self.table_mut(scope).set(path, value);
    }

    pub fn is_defined(&self, scope: Scope, path: &str) -> bool {
        self.table(scope).contains(path)
    }

    /// Resolve a reference, falling back to `default` when undefined.
    pub fn resolve(&self, reference: &VariableRef, default: Option<&str>) -> Option<String> {
        self.get(reference.scope, &reference.name)
            .or_else(|| default.map(str::to_string))
    }
}

/// A parsed `<@name>` / `<#name>` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableRef {
    pub scope: Scope,
    pub name: String,
}

impl VariableRef {
    pub fn new(scope: Scope, name: impl Into<String>) -> Self {
        Self {
            scope,
            name: name.into(),
        }
    }

    /// Parse a whole string as a reference: `<` `@|#` name `>`, whitespace
    /// allowed around the sigil and the name.
    pub fn parse(input: &str) -> Option<Self> {
        let inner = input.trim().strip_prefix('<')?.strip_suffix('>')?.trim();
        let mut chars = inner.chars();
        let scope = Scope::from_sigil(chars.next()?)?;
        let name = chars.as_str().trim();
        if is_variable_name(name) {
            Some(Self::new(scope, name))
        } else {
            None
        }
    }

    /// Split a job id into its scope and key: `@x` → store, `#x` or `x` → memory.
    pub fn from_job_id(id: &str) -> Self {
        let mut chars = id.chars();
        match chars.next().and_then(Scope::from_sigil) {
            Some(scope) => Self::new(scope, chars.as_str()),
            None => Self::new(Scope::Memory, id),
        }
    }
}

impl fmt::Display for VariableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}{}>", self.scope.sigil(), self.name)
    }
}

/// Variable names: `[.A-Za-z0-9_-]+`.
pub fn is_variable_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_then_get_round_trips_nested_paths() {
        let mut table = VariableTable::new();
        for (path, value) in [("a", "1"), ("user.name", "ada"), ("x.y.z", ""), ("user-id", "7")] {
            table.set(path, value);
            assert_eq!(table.get(path).as_deref(), Some(value), "path {path}");
        }
        // earlier siblings survive
        assert_eq!(table.get("a").as_deref(), Some("1"));
        assert_eq!(table.get("user.name").as_deref(), Some("ada"));
    }

    #[test]
    fn get_stops_on_missing_or_scalar_intermediate() {
        let mut table = VariableTable::new();
        table.set("name", "ada");
        assert_eq!(table.get("missing"), None);
        assert_eq!(table.get("name.first"), None);
        assert_eq!(table.get("missing.deep.path"), None);
    }

    #[test]
    fn set_replaces_scalar_intermediate() {
        let mut table = VariableTable::new();
        table.set("theme", "dark");
        table.set("theme.color", "red");
        assert_eq!(table.get("theme.color").as_deref(), Some("red"));
    }

    #[test]
    fn empty_string_counts_as_defined() {
        let mut table = VariableTable::new();
        table.set("ran", "");
        assert!(table.contains("ran"));
    }

    #[test]
    fn non_string_leaves_are_stringified() {
        let table = VariableTable::from_json(json!({ "n": 3, "b": true, "nothing": null })).unwrap();
        assert_eq!(table.get("n").as_deref(), Some("3"));
        assert_eq!(table.get("b").as_deref(), Some("true"));
        assert_eq!(table.get("nothing"), None);
    }

    #[test]
    fn from_json_rejects_non_objects() {
        assert!(VariableTable::from_json(json!([1, 2])).is_none());
    }

    #[test]
    fn parses_references() {
        assert_eq!(
            VariableRef::parse("<@apiUrl>"),
            Some(VariableRef::new(Scope::Store, "apiUrl"))
        );
        assert_eq!(
            VariableRef::parse("< # user.name >"),
            Some(VariableRef::new(Scope::Memory, "user.name"))
        );
        assert_eq!(VariableRef::parse("<user>"), None);
        assert_eq!(VariableRef::parse("<#>"), None);
        assert_eq!(VariableRef::parse("<#a b>"), None);
        assert_eq!(VariableRef::parse("plain"), None);
    }

    #[test]
    fn job_ids_default_to_memory() {
        assert_eq!(VariableRef::from_job_id("@email").scope, Scope::Store);
        assert_eq!(VariableRef::from_job_id("#flag").name, "flag");
        let bare = VariableRef::from_job_id("setting.theme");
        assert_eq!(bare.scope, Scope::Memory);
        assert_eq!(bare.name, "setting.theme");
    }

    #[test]
    fn resolve_falls_back_to_default() {
        let mut vars = Variables::default();
        vars.set(Scope::Memory, "user", "World");
        let user = VariableRef::new(Scope::Memory, "user");
        let missing = VariableRef::new(Scope::Store, "user");
        assert_eq!(vars.resolve(&user, None).as_deref(), Some("World"));
        assert_eq!(vars.resolve(&missing, Some("<@user>")).as_deref(), Some("<@user>"));
        assert_eq!(vars.resolve(&missing, None), None);
    }
}
