//! Path template parsing.
//!
//! A declared file name is parsed once into a [`PathTemplate`]:
//!
//! - an optional [`Placeholder`] anchor (`%SRC%`, `%COMPONENTS%`, `%HOOKS%`).
//!   The rightmost placeholder swallows everything before it, so
//!   `"app/%COMPONENTS%/ui/Button.tsx"` anchors at the components directory
//!   and keeps `ui/Button.tsx`.
//! - a list of [`Segment`]s split on `/` and `\`: literals, variable
//!   references (`<@name>`, `<#name>`) and ask-directives
//!   (`<-ask | default | <#var>->`).
//!
//! Resolution (prompting, collision handling) lives in the application layer;
//! this module only describes what a template says.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::variables::VariableRef;

/// Directory anchors recognised in file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Src,
    Components,
    Hooks,
}

impl Placeholder {
    const ALL: [Placeholder; 3] = [Self::Src, Self::Components, Self::Hooks];

    pub const fn token(&self) -> &'static str {
        match self {
            Self::Src => "%SRC%",
            Self::Components => "%COMPONENTS%",
            Self::Hooks => "%HOOKS%",
        }
    }

    /// The directory this placeholder stands for, with or without a `src`
    /// directory at the working root.
    pub fn directory(&self, has_src: bool) -> PathBuf {
        let root = if has_src { PathBuf::from("src") } else { PathBuf::new() };
        match self {
            Self::Src => root,
            Self::Components => root.join("components"),
            Self::Hooks => root.join("hooks"),
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// `<-ask [| default] [| <var>]->`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AskDirective {
    pub default: Option<String>,
    pub variable: Option<VariableRef>,
}

impl AskDirective {
    /// Parse a whole segment as an ask-directive.
    pub fn parse(segment: &str) -> Option<Self> {
        let inner = segment.trim().strip_prefix("<-")?.strip_suffix("->")?;
        let mut parts = inner.split('|');
        if parts.next()?.trim() != "ask" {
            return None;
        }

        let mut directive = Self::default();
        let rest: Vec<&str> = parts.map(str::trim).collect();
        match rest.as_slice() {
            [] => {}
            [only] => {
                if let Some(var) = VariableRef::parse(only) {
                    directive.variable = Some(var);
                } else {
                    directive.default = parse_default(only)?;
                }
            }
            [default, var] => {
                directive.default = parse_default(default)?;
                directive.variable = Some(VariableRef::parse(var)?);
            }
            _ => return None,
        }
        Some(directive)
    }
}

/// Defaults may not contain `<` or `>`; an empty default means none.
fn parse_default(raw: &str) -> Option<Option<String>> {
    if raw.contains(['<', '>']) {
        return None;
    }
    Some((!raw.is_empty()).then(|| raw.to_string()))
}

/// One path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Variable(VariableRef),
    Ask(AskDirective),
}

impl Segment {
    pub fn parse(raw: &str) -> Self {
        if let Some(var) = VariableRef::parse(raw) {
            Self::Variable(var)
        } else if let Some(ask) = AskDirective::parse(raw) {
            Self::Ask(ask)
        } else {
            Self::Literal(raw.to_string())
        }
    }
}

/// A parsed file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    pub anchor: Option<Placeholder>,
    /// Rooted at `/` (only without an anchor).
    pub absolute: bool,
    pub segments: Vec<Segment>,
}

impl PathTemplate {
    /// Parse `name` joined onto `base`. An empty name asks for one.
    pub fn parse(base: Option<&Path>, name: &str) -> Self {
        let name = if name.trim().is_empty() { "<-ask->" } else { name };
        let joined = match base {
            Some(base) if !base.as_os_str().is_empty() => {
                format!("{}/{}", base.to_string_lossy(), name)
            }
            _ => name.to_string(),
        };

        let (anchor, rest) = match rightmost_placeholder(&joined) {
            Some((placeholder, end)) => (Some(placeholder), &joined[end..]),
            None => (None, joined.as_str()),
        };

        let absolute = anchor.is_none() && rest.starts_with('/');
        let segments = rest
            .split(['/', '\\'])
            .filter(|s| !s.is_empty() && *s != ".")
            .map(Segment::parse)
            .collect();

        Self {
            anchor,
            absolute,
            segments,
        }
    }
}

/// Find the rightmost placeholder (case-insensitive) and the byte offset just
/// past it.
fn rightmost_placeholder(path: &str) -> Option<(Placeholder, usize)> {
    let upper = path.to_ascii_uppercase();
    Placeholder::ALL
        .iter()
        .filter_map(|p| upper.rfind(p.token()).map(|at| (*p, at + p.token().len())))
        .max_by_key(|(_, end)| *end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::variables::Scope;

    fn literal(s: &str) -> Segment {
        Segment::Literal(s.into())
    }

    #[test]
    fn plain_paths_are_literal() {
        let t = PathTemplate::parse(None, "src/lib/utils.ts");
        assert_eq!(t.anchor, None);
        assert_eq!(t.segments, vec![literal("src"), literal("lib"), literal("utils.ts")]);
    }

    #[test]
    fn base_is_prefixed() {
        let t = PathTemplate::parse(Some(Path::new("app")), "page.tsx");
        assert_eq!(t.segments, vec![literal("app"), literal("page.tsx")]);
    }

    #[test]
    fn placeholder_consumes_prefix_and_base() {
        let t = PathTemplate::parse(Some(Path::new("feature")), "x/%components%/Button.tsx");
        assert_eq!(t.anchor, Some(Placeholder::Components));
        assert_eq!(t.segments, vec![literal("Button.tsx")]);
    }

    #[test]
    fn rightmost_placeholder_wins() {
        let t = PathTemplate::parse(None, "%SRC%/lib/%HOOKS%/useThing.ts");
        assert_eq!(t.anchor, Some(Placeholder::Hooks));
        assert_eq!(t.segments, vec![literal("useThing.ts")]);
    }

    #[test]
    fn placeholder_directories() {
        assert_eq!(Placeholder::Components.directory(true), PathBuf::from("src/components"));
        assert_eq!(Placeholder::Components.directory(false), PathBuf::from("components"));
        assert_eq!(Placeholder::Src.directory(false), PathBuf::new());
        assert_eq!(Placeholder::Hooks.directory(true), PathBuf::from("src/hooks"));
    }

    #[test]
    fn variable_segments() {
        let t = PathTemplate::parse(None, "<@root>/<#name>.ts");
        // `<#name>.ts` is not a whole-segment reference
        assert_eq!(
            t.segments,
            vec![
                Segment::Variable(VariableRef::new(Scope::Store, "root")),
                literal("<#name>.ts"),
            ]
        );
    }

    #[test]
    fn ask_directives() {
        assert_eq!(AskDirective::parse("<-ask->"), Some(AskDirective::default()));
        assert_eq!(
            AskDirective::parse("<- ask | Button.tsx ->"),
            Some(AskDirective {
                default: Some("Button.tsx".into()),
                variable: None
            })
        );
        assert_eq!(
            AskDirective::parse("<-ask | index.ts | <#file>->"),
            Some(AskDirective {
                default: Some("index.ts".into()),
                variable: Some(VariableRef::new(Scope::Memory, "file")),
            })
        );
        assert_eq!(
            AskDirective::parse("<-ask | <@dir>->"),
            Some(AskDirective {
                default: None,
                variable: Some(VariableRef::new(Scope::Store, "dir")),
            })
        );
        assert_eq!(AskDirective::parse("<-tell->"), None);
        assert_eq!(AskDirective::parse("<-ask | a | b | c->"), None);
    }

    #[test]
    fn empty_name_asks() {
        let t = PathTemplate::parse(Some(Path::new("lib")), "");
        assert!(t.segments.iter().any(|s| matches!(s, Segment::Ask(_))));
        assert_eq!(t.segments[0], literal("lib"));
    }

    #[test]
    fn absolute_paths_stay_rooted() {
        let t = PathTemplate::parse(None, "/tmp/out");
        assert!(t.absolute);
        assert_eq!(t.segments, vec![literal("tmp"), literal("out")]);
        assert!(!PathTemplate::parse(None, "/x/%SRC%/a").absolute);
    }

    #[test]
    fn backslashes_split_too() {
        let t = PathTemplate::parse(None, r"a\b\c.txt");
        assert_eq!(t.segments.len(), 3);
    }
}
