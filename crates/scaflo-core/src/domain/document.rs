//! Scaffold documents and their jobs.
//!
//! Documents arrive as JSON. Jobs are discriminated by a `type` string that
//! defaults to `"file"`; each one is converted into a [`JobKind`] variant as
//! soon as the document is parsed, so the executor never inspects raw JSON.
//!
//! ```json
//! {
//!   "name": "button",
//!   "jobs": [
//!     { "type": "question", "id": "#name", "question": "Component name?", "questionType": "ask" },
//!     { "name": "%COMPONENTS%/<#name>.tsx", "content": "export {}" }
//!   ],
//!   "dependencies": ["clsx", { "react": "^19" }, "https://example.com/base.json"],
//!   "definitions": { "hello": { "type": "log", "message": "hi" } }
//! }
//! ```

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::error::DomainError;

/// Reusable jobs of one document, invoked by `run` jobs.
pub type Definitions = IndexMap<String, Job>;

/// Root unit of work.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub name: Option<String>,
    pub title: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub jobs: Vec<Job>,
    pub dependencies: Vec<DependencySpec>,
    pub registry_dependencies: Vec<String>,
    pub definitions: Definitions,
}

/// One declarative step.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: Option<String>,
    pub when: Option<String>,
    pub confirm: Option<String>,
    pub kind: JobKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobKind {
    File(FileJob),
    Question(QuestionJob),
    Group(GroupJob),
    RegistryDependencies(Vec<String>),
    Dependencies(Vec<String>),
    Run { target: String },
    Log { level: LogLevel, message: String },
}

impl JobKind {
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Question(_) => "question",
            Self::Group(_) => "group",
            Self::RegistryDependencies(_) => "registryDependencies",
            Self::Dependencies(_) => "dependencies",
            Self::Run { .. } => "run",
            Self::Log { .. } => "log",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileJob {
    /// Path template, see [`crate::domain::PathTemplate`].
    pub name: String,
    pub write: FileWrite,
}

/// How a file job touches its target.
#[derive(Debug, Clone, PartialEq)]
pub enum FileWrite {
    /// `method: "w"` (default).
    Overwrite(String),
    /// `method: "a"`.
    Append(String),
    /// Ordered pattern → replacement pairs applied to the existing file.
    Replace(IndexMap<String, String>),
}

impl FileWrite {
    /// Replace and append work on existing files, so collisions are expected.
    pub fn expects_existing(&self) -> bool {
        !matches!(self, Self::Overwrite(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionJob {
    pub question: String,
    pub default_value: Option<String>,
    pub kind: QuestionKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuestionKind {
    Ask,
    Confirm,
    /// value → label, in declaration order.
    Options(IndexMap<String, String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupJob {
    pub base: Option<String>,
    pub jobs: Vec<Job>,
}

/// Severity of a `log` job and of everything sent to the reporter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Success,
    #[default]
    Log,
}

impl LogLevel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Success => "success",
            Self::Log => "log",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entry of a document's `dependencies`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DependencySpec {
    /// A package name, or a URL / absolute path of a nested document.
    Package(String),
    /// `{ "name": "version" }`
    Versioned(IndexMap<String, String>),
}

impl DependencySpec {
    /// Arguments for a package manager: `name` or `name@version`.
    pub fn install_args(&self) -> Vec<String> {
        match self {
            Self::Package(name) => vec![name.clone()],
            Self::Versioned(map) => map
                .iter()
                .map(|(name, version)| format!("{name}@{version}"))
                .collect(),
        }
    }
}

impl From<&str> for DependencySpec {
    fn from(name: &str) -> Self {
        Self::Package(name.to_string())
    }
}

// ── Parsing ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    name: Option<String>,
    title: Option<String>,
    version: Option<String>,
    description: Option<String>,
    #[serde(default)]
    jobs: Vec<Value>,
    #[serde(default)]
    dependencies: Vec<DependencySpec>,
    #[serde(default)]
    registry_dependencies: Vec<String>,
    #[serde(default)]
    definitions: IndexMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawJob {
    id: Option<String>,
    when: Option<String>,
    confirm: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(flatten)]
    body: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct FileBody {
    name: String,
    #[serde(default)]
    content: Value,
    method: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionBody {
    question: String,
    question_type: String,
    default_value: Option<Value>,
    options: Option<IndexMap<String, String>>,
}

#[derive(Debug, Deserialize)]
struct GroupBody {
    #[serde(default)]
    jobs: Vec<Value>,
    base: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RunBody {
    target: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LogBody {
    #[serde(default)]
    log_level: LogLevel,
    message: String,
}

/// Where a job sits; definitions may not carry their own guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Inline,
    Definition,
}

impl Document {
    /// Parse and validate a document.
    pub fn from_json_str(input: &str) -> Result<Self, DomainError> {
        let value: Value = serde_json::from_str(input)
            .map_err(|e| DomainError::InvalidDocument(e.to_string()))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, DomainError> {
        if !value.is_object() {
            return Err(DomainError::InvalidDocument(format!(
                "expected an object at the top level, found {}",
                type_name(&value)
            )));
        }
        let raw: RawDocument = serde_json::from_value(value)
            .map_err(|e| DomainError::InvalidDocument(e.to_string()))?;

        let jobs = raw
            .jobs
            .into_iter()
            .map(|job| Job::from_value(job, Position::Inline))
            .collect::<Result<Vec<_>, _>>()?;

        let mut definitions = Definitions::new();
        for (name, job) in raw.definitions {
            definitions.insert(name, Job::from_value(job, Position::Definition)?);
        }

        Ok(Self {
            name: raw.name,
            title: raw.title,
            version: raw.version,
            description: raw.description,
            jobs,
            dependencies: raw.dependencies,
            registry_dependencies: raw.registry_dependencies,
            definitions,
        })
    }

    /// Human label for logs: title, then name, then "document".
    pub fn label(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("document")
    }
}

impl Job {
    fn from_value(value: Value, position: Position) -> Result<Self, DomainError> {
        if !value.is_object() {
            return Err(DomainError::InvalidJob {
                job: None,
                reason: format!("expected an object, found {}", type_name(&value)),
            });
        }
        let raw: RawJob = serde_json::from_value(value).map_err(|e| DomainError::InvalidJob {
            job: None,
            reason: e.to_string(),
        })?;

        let id = raw.id;
        let invalid = |reason: String| DomainError::InvalidJob {
            job: id.clone(),
            reason,
        };
        let body = Value::Object(raw.body);

        let kind = match raw.kind.as_deref().unwrap_or("file") {
            "file" => {
                let file: FileBody = serde_json::from_value(body).map_err(|e| invalid(e.to_string()))?;
                JobKind::File(FileJob {
                    write: parse_write(file.method, file.content).map_err(invalid)?,
                    name: file.name,
                })
            }
            "question" => {
                let q: QuestionBody = serde_json::from_value(body).map_err(|e| invalid(e.to_string()))?;
                let Some(question_id) = id.clone() else {
                    return Err(invalid("question jobs require an `id`".into()));
                };
                let kind = match q.question_type.as_str() {
                    "ask" => QuestionKind::Ask,
                    "confirm" => QuestionKind::Confirm,
                    "options" => QuestionKind::Options(
                        q.options
                            .filter(|o| !o.is_empty())
                            .ok_or_else(|| invalid("`options` questions need a non-empty `options` map".into()))?,
                    ),
                    other => {
                        return Err(DomainError::UnknownQuestionType {
                            id: question_id,
                            kind: other.to_string(),
                        });
                    }
                };
                JobKind::Question(QuestionJob {
                    question: q.question,
                    default_value: q.default_value.and_then(stringify),
                    kind,
                })
            }
            "group" => {
                let group: GroupBody = serde_json::from_value(body).map_err(|e| invalid(e.to_string()))?;
                let jobs = group
                    .jobs
                    .into_iter()
                    .map(|job| Job::from_value(job, Position::Inline))
                    .collect::<Result<Vec<_>, _>>()?;
                JobKind::Group(GroupJob {
                    base: group.base,
                    jobs,
                })
            }
            "registryDependencies" => {
                JobKind::RegistryDependencies(string_list(&body, "registryDependencies")?)
            }
            "dependencies" => JobKind::Dependencies(string_list(&body, "dependencies")?),
            "run" => {
                let run: RunBody = serde_json::from_value(body).map_err(|e| invalid(e.to_string()))?;
                JobKind::Run { target: run.target }
            }
            "log" => {
                let log: LogBody = serde_json::from_value(body).map_err(|e| invalid(e.to_string()))?;
                JobKind::Log {
                    level: log.log_level,
                    message: log.message,
                }
            }
            other => {
                return Err(DomainError::UnknownJobType {
                    kind: other.to_string(),
                });
            }
        };

        match position {
            Position::Definition if raw.when.is_some() => {
                return Err(invalid(
                    "definitions cannot declare `when`; guard the `run` job instead".into(),
                ));
            }
            Position::Inline if raw.when.is_none() => match kind {
                JobKind::Dependencies(_) => {
                    return Err(DomainError::MissingGuard { kind: "dependencies" });
                }
                JobKind::RegistryDependencies(_) => {
                    return Err(DomainError::MissingGuard {
                        kind: "registryDependencies",
                    });
                }
                _ => {}
            },
            _ => {}
        }

        Ok(Self {
            id,
            when: raw.when,
            confirm: raw.confirm,
            kind,
        })
    }
}

fn parse_write(method: Option<Value>, content: Value) -> Result<FileWrite, String> {
    let text = |content: Value| match content {
        Value::String(s) => Ok(s),
        Value::Null => Err("missing `content`".to_string()),
        other => Err(format!("`content` must be a string, found {}", type_name(&other))),
    };

    match method {
        None => Ok(FileWrite::Overwrite(text(content)?)),
        Some(Value::String(m)) => match m.as_str() {
            "w" => Ok(FileWrite::Overwrite(text(content)?)),
            "a" => Ok(FileWrite::Append(text(content)?)),
            "replace" => Ok(FileWrite::Replace(replacements(content)?)),
            other => Err(format!("unknown method '{other}', expected \"w\", \"a\" or \"replace\"")),
        },
        Some(map @ Value::Object(_)) => Ok(FileWrite::Replace(replacements(map)?)),
        Some(other) => Err(format!("`method` must be a string or an object, found {}", type_name(&other))),
    }
}

fn replacements(value: Value) -> Result<IndexMap<String, String>, String> {
    serde_json::from_value(value).map_err(|_| "replacements must be an object of strings".to_string())
}

/// Normalise a dependency payload: a string becomes a one-element list.
fn string_list(body: &Value, field: &'static str) -> Result<Vec<String>, DomainError> {
    let invalid = |found: &Value| DomainError::InvalidDependencies {
        field,
        found: type_name(found).to_string(),
    };
    match body.get(field) {
        Some(Value::String(s)) => Ok(vec![s.clone()]),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(|| invalid(item)))
            .collect(),
        Some(other) => Err(invalid(other)),
        None => Err(invalid(&Value::Null)),
    }
}

fn stringify(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
