//! Integration tests for scaflo-core's public domain API.

use scaflo_core::domain::{
    Document, DomainError, JobKind, PathTemplate, Placeholder, Scope, Variables, evaluate_when,
};

const DOCUMENT: &str = r##"{
    "name": "button",
    "title": "Button component",
    "jobs": [
        { "type": "question", "id": "#variant", "question": "Variant?", "questionType": "options",
          "options": { "solid": "Solid", "ghost": "Ghost" }, "defaultValue": "solid" },
        { "name": "%COMPONENTS%/ui/<#variant>/button.tsx", "content": "export {}", "when": "#variant != 'none'" },
        { "type": "run", "target": "styles" }
    ],
    "definitions": {
        "styles": { "type": "group", "base": "styles", "jobs": [
            { "name": "button.css", "content": ".btn {}" }
        ]}
    },
    "dependencies": ["clsx"]
}"##;

#[test]
fn parses_a_realistic_document() {
    let doc = Document::from_json_str(DOCUMENT).unwrap();

    assert_eq!(doc.label(), "Button component");
    assert_eq!(doc.jobs.len(), 3);
    assert!(matches!(doc.jobs[0].kind, JobKind::Question(_)));
    assert!(matches!(doc.jobs[2].kind, JobKind::Run { ref target } if target == "styles"));
    assert!(matches!(doc.definitions["styles"].kind, JobKind::Group(_)));
}

#[test]
fn file_names_parse_into_anchored_templates() {
    let doc = Document::from_json_str(DOCUMENT).unwrap();
    let JobKind::File(file) = &doc.jobs[1].kind else {
        panic!("expected a file job");
    };

    let template = PathTemplate::parse(None, &file.name);
    assert_eq!(template.anchor, Some(Placeholder::Components));
    assert_eq!(template.segments.len(), 3);
}

#[test]
fn guards_read_both_tables() {
    let mut vars = Variables::default();
    vars.set(Scope::Memory, "variant", "ghost");
    vars.set(Scope::Store, "user.name", "ada");

    assert!(evaluate_when("#variant != 'none'", &vars).unwrap());
    assert!(evaluate_when("#variant == 'ghost' && @user.name", &vars).unwrap());
    assert!(!evaluate_when("@missing || #variant == 'solid'", &vars).unwrap());
}

#[test]
fn structural_problems_surface_at_parse_time() {
    let err = Document::from_json_str(
        r#"{ "jobs": [{ "type": "registryDependencies", "registryDependencies": "button" }] }"#,
    )
    .unwrap_err();
    assert_eq!(
        err,
        DomainError::MissingGuard {
            kind: "registryDependencies"
        }
    );
}
