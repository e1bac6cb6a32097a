//! Turns a declared file name into a concrete path.
//!
//! Resolution walks the parsed [`PathTemplate`] left to right, substituting
//! variables and prompting for ask-directives, then arbitrates collisions
//! with an existing file (overwrite, rename or skip).

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::application::ports::{Filesystem, Prompter, Reporter, SelectPrompt, TextPrompt};
use crate::domain::{AskDirective, LogLevel, PathTemplate, Segment, Variables};
use crate::error::ScafloResult;

/// Outcome of resolving a file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedPath {
    Path(PathBuf),
    /// The user declined to touch an existing file.
    Skip,
}

const OVERWRITE: &str = "overwrite";
const RENAME: &str = "rename";
const SKIP: &str = "skip";

pub struct PathResolver<'a> {
    filesystem: &'a dyn Filesystem,
    prompter: &'a dyn Prompter,
    reporter: &'a dyn Reporter,
}

impl<'a> PathResolver<'a> {
    pub fn new(
        filesystem: &'a dyn Filesystem,
        prompter: &'a dyn Prompter,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            filesystem,
            prompter,
            reporter,
        }
    }

    /// Resolve `name` under `base`.
    ///
    /// With `ignore_existing` the path is returned even if something already
    /// lives there; this is how groups, appends, replaces and `--force` work.
    pub fn resolve(
        &self,
        vars: &Variables,
        base: Option<&Path>,
        name: &str,
        ignore_existing: bool,
    ) -> ScafloResult<ResolvedPath> {
        let template = PathTemplate::parse(base, name);
        let path = self.build(vars, &template, ignore_existing)?;
        debug!(name, path = %path.display(), "Path resolved");

        if ignore_existing || !self.filesystem.exists(&path) {
            return Ok(ResolvedPath::Path(path));
        }
        self.arbitrate(path)
    }

    fn build(
        &self,
        vars: &Variables,
        template: &PathTemplate,
        ignore_existing: bool,
    ) -> ScafloResult<PathBuf> {
        let mut path = if template.absolute {
            PathBuf::from("/")
        } else {
            template
                .anchor
                .map(|anchor| anchor.directory(self.has_src()))
                .unwrap_or_default()
        };

        let last = template.segments.len().saturating_sub(1);
        for (index, segment) in template.segments.iter().enumerate() {
            let wants_file = index == last && !ignore_existing;
            match segment {
                Segment::Literal(text) => push_segments(&mut path, text),
                Segment::Variable(reference) => match vars.resolve(reference, None) {
                    Some(value) => match AskDirective::parse(&value) {
                        Some(ask) => self.ask(vars, &mut path, &ask, wants_file)?,
                        None => push_segments(&mut path, &value),
                    },
                    None => {
                        warn!(variable = %reference, "Undefined variable in path");
                        self.reporter.report(
                            LogLevel::Warn,
                            &format!("value not found for variable: '{}'", reference.name),
                        );
                        push_segments(&mut path, &reference.to_string());
                    }
                },
                Segment::Ask(ask) => self.ask(vars, &mut path, ask, wants_file)?,
            }
        }
        Ok(path)
    }

    fn ask(
        &self,
        vars: &Variables,
        path: &mut PathBuf,
        ask: &AskDirective,
        wants_file: bool,
    ) -> ScafloResult<()> {
        let known = ask
            .variable
            .as_ref()
            .and_then(|reference| vars.resolve(reference, None))
            .filter(|value| !value.is_empty());
        if let Some(value) = known {
            push_segments(path, &value);
            return Ok(());
        }

        let message = if wants_file {
            "Enter file name."
        } else {
            "Enter folder name."
        };
        let answer = self.prompt_name(message, ask.default.as_deref(), |_| None)?;
        push_segments(path, &answer);
        Ok(())
    }

    /// Ask for a name until a non-empty, accepted one is given.
    fn prompt_name(
        &self,
        message: &str,
        default: Option<&str>,
        accept: impl Fn(&str) -> Option<String>,
    ) -> ScafloResult<String> {
        let prompt = TextPrompt {
            message: message.to_string(),
            default: default.map(str::to_string),
        };
        loop {
            let raw = self.prompter.text(&prompt)?;
            let trimmed = raw.trim();
            let name = if trimmed.is_empty() {
                default.unwrap_or_default()
            } else {
                trimmed
            };

            if name.is_empty() {
                self.reporter
                    .report(LogLevel::Warn, "File name cannot be empty");
                continue;
            }
            match accept(name) {
                None => return Ok(name.to_string()),
                Some(problem) => self.reporter.report(LogLevel::Warn, &problem),
            }
        }
    }

    fn arbitrate(&self, path: PathBuf) -> ScafloResult<ResolvedPath> {
        let choice = self.prompter.select(&SelectPrompt {
            message: format!(
                "File '{}' already exists. Do you want to overwrite it?",
                path.display()
            ),
            options: vec![
                (RENAME.to_string(), "Rename".to_string()),
                (OVERWRITE.to_string(), "Yes".to_string()),
                (SKIP.to_string(), "No".to_string()),
            ],
            default: None,
        })?;

        match choice.as_str() {
            OVERWRITE => Ok(ResolvedPath::Path(path)),
            RENAME => {
                let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();
                let name = self.prompt_name("Enter new file name", None, |candidate| {
                    let target = parent.join(candidate);
                    self.filesystem.exists(&target).then(|| {
                        format!(
                            "'{}' already exists, please enter another file name",
                            target.display()
                        )
                    })
                })?;
                Ok(ResolvedPath::Path(parent.join(name)))
            }
            _ => Ok(ResolvedPath::Skip),
        }
    }

    fn has_src(&self) -> bool {
        self.filesystem.is_dir(Path::new("src"))
    }
}

/// Append a value that may itself contain separators.
fn push_segments(path: &mut PathBuf, value: &str) {
    for part in value
        .split(['/', '\\'])
        .filter(|s| !s.is_empty() && *s != ".")
    {
        path.push(part);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockFilesystem, MockPrompter, MockReporter};
    use crate::domain::Scope;

    fn quiet_reporter() -> MockReporter {
        let mut reporter = MockReporter::new();
        reporter.expect_report().return_const(());
        reporter
    }

    fn fs_with(existing: &'static [&'static str], src: bool) -> MockFilesystem {
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir()
            .returning(move |p| src && p == Path::new("src"));
        fs.expect_exists()
            .returning(move |p| existing.iter().any(|e| p == Path::new(e)));
        fs
    }

    fn resolve(
        fs: &MockFilesystem,
        prompter: &MockPrompter,
        vars: &Variables,
        base: Option<&Path>,
        name: &str,
        ignore: bool,
    ) -> ResolvedPath {
        let reporter = quiet_reporter();
        PathResolver::new(fs, prompter, &reporter)
            .resolve(vars, base, name, ignore)
            .unwrap()
    }

    #[test]
    fn literal_paths_pass_through() {
        let fs = fs_with(&[], false);
        let prompter = MockPrompter::new();
        let out = resolve(&fs, &prompter, &Variables::default(), Some(Path::new("lib")), "utils.ts", false);
        assert_eq!(out, ResolvedPath::Path(PathBuf::from("lib/utils.ts")));
    }

    #[test]
    fn components_anchor_follows_src() {
        let prompter = MockPrompter::new();
        let vars = Variables::default();

        let with_src = fs_with(&[], true);
        assert_eq!(
            resolve(&with_src, &prompter, &vars, None, "%COMPONENTS%/Button.tsx", false),
            ResolvedPath::Path(PathBuf::from("src/components/Button.tsx"))
        );

        let without_src = fs_with(&[], false);
        assert_eq!(
            resolve(&without_src, &prompter, &vars, None, "%COMPONENTS%/Button.tsx", false),
            ResolvedPath::Path(PathBuf::from("components/Button.tsx"))
        );
    }

    #[test]
    fn variables_substitute_and_undefined_ones_stay_literal() {
        let fs = fs_with(&[], false);
        let prompter = MockPrompter::new();
        let mut vars = Variables::default();
        vars.set(Scope::Memory, "dir", "widgets/ui");

        let mut reporter = MockReporter::new();
        reporter
            .expect_report()
            .withf(|level, msg| *level == LogLevel::Warn && msg.contains("'missing'"))
            .times(1)
            .return_const(());

        let out = PathResolver::new(&fs, &prompter, &reporter)
            .resolve(&vars, None, "<#dir>/<@missing>/a.ts", false)
            .unwrap();
        assert_eq!(
            out,
            ResolvedPath::Path(PathBuf::from("widgets/ui/<@missing>/a.ts"))
        );
    }

    #[test]
    fn ask_uses_default_on_empty_answer() {
        let fs = fs_with(&[], false);
        let mut prompter = MockPrompter::new();
        prompter
            .expect_text()
            .withf(|p| p.message == "Enter file name." && p.default.as_deref() == Some("index.ts"))
            .times(1)
            .returning(|_| Ok("   ".into()));

        let out = resolve(&fs, &prompter, &Variables::default(), None, "lib/<-ask | index.ts->", false);
        assert_eq!(out, ResolvedPath::Path(PathBuf::from("lib/index.ts")));
    }

    #[test]
    fn ask_prefers_a_known_variable() {
        let fs = fs_with(&[], false);
        let prompter = MockPrompter::new();
        let mut vars = Variables::default();
        vars.set(Scope::Store, "folder", "shared");

        let out = resolve(&fs, &prompter, &vars, None, "<-ask | <@folder>->/x.ts", false);
        assert_eq!(out, ResolvedPath::Path(PathBuf::from("shared/x.ts")));
    }

    #[test]
    fn empty_answer_without_default_reprompts() {
        let fs = fs_with(&[], false);
        let mut prompter = MockPrompter::new();
        let mut answers = vec!["", " page.tsx "].into_iter();
        prompter
            .expect_text()
            .times(2)
            .returning(move |_| Ok(answers.next().unwrap_or_default().to_string()));

        let out = resolve(&fs, &prompter, &Variables::default(), Some(Path::new("app")), "", false);
        assert_eq!(out, ResolvedPath::Path(PathBuf::from("app/page.tsx")));
    }

    #[test]
    fn folder_prompt_when_existence_is_ignored() {
        let fs = fs_with(&[], false);
        let mut prompter = MockPrompter::new();
        prompter
            .expect_text()
            .withf(|p| p.message == "Enter folder name.")
            .returning(|_| Ok("feature".into()));

        let out = resolve(&fs, &prompter, &Variables::default(), None, "<-ask->", true);
        assert_eq!(out, ResolvedPath::Path(PathBuf::from("feature")));
    }

    #[test]
    fn collision_skip() {
        let fs = fs_with(&["a.txt"], false);
        let mut prompter = MockPrompter::new();
        prompter.expect_select().returning(|_| Ok(SKIP.into()));

        let out = resolve(&fs, &prompter, &Variables::default(), None, "a.txt", false);
        assert_eq!(out, ResolvedPath::Skip);
    }

    #[test]
    fn collision_overwrite() {
        let fs = fs_with(&["a.txt"], false);
        let mut prompter = MockPrompter::new();
        prompter.expect_select().returning(|_| Ok(OVERWRITE.into()));

        let out = resolve(&fs, &prompter, &Variables::default(), None, "a.txt", false);
        assert_eq!(out, ResolvedPath::Path(PathBuf::from("a.txt")));
    }

    #[test]
    fn collision_rename_reprompts_while_taken() {
        let fs = fs_with(&["lib/a.ts", "lib/b.ts"], false);
        let mut prompter = MockPrompter::new();
        prompter.expect_select().returning(|_| Ok(RENAME.into()));
        let mut answers = vec!["b.ts", "c.ts"].into_iter();
        prompter
            .expect_text()
            .times(2)
            .returning(move |_| Ok(answers.next().unwrap_or_default().to_string()));

        let out = resolve(&fs, &prompter, &Variables::default(), None, "lib/a.ts", false);
        assert_eq!(out, ResolvedPath::Path(PathBuf::from("lib/c.ts")));
    }

    #[test]
    fn ignore_existing_never_prompts() {
        let fs = fs_with(&["a.txt"], false);
        let prompter = MockPrompter::new();
        let out = resolve(&fs, &prompter, &Variables::default(), None, "a.txt", true);
        assert_eq!(out, ResolvedPath::Path(PathBuf::from("a.txt")));
    }
}
