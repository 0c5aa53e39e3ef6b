//! Evidence document templates seeded by `ethica init`.

/// A document template and its path relative to the project root.
#[derive(Debug, Clone, Copy)]
pub struct DocTemplate {
    pub path: &'static str,
    pub content: &'static str,
}

const MODEL_CARD: DocTemplate = DocTemplate {
    path: "docs/MODEL_CARD.md",
    content: include_str!("../templates/MODEL_CARD.md"),
};

const PRIVACY_IMPACT_ASSESSMENT: DocTemplate = DocTemplate {
    path: "docs/PRIVACY_IMPACT_ASSESSMENT.md",
    content: include_str!("../templates/PRIVACY_IMPACT_ASSESSMENT.md"),
};

const UNESCO_2021: &[DocTemplate] = &[MODEL_CARD, PRIVACY_IMPACT_ASSESSMENT];

/// Templates to seed for a framework. Unknown frameworks get none.
pub fn for_framework(framework_id: &str) -> &'static [DocTemplate] {
    match framework_id {
        "unesco-2021" => UNESCO_2021,
        _ => &[],
    }
}
