//! Follow-up questions for ambiguous classes.

use crate::rules::FollowupPrompt;
use std::collections::BTreeMap;

/// City-independent catalog of clarifying questions keyed by detected class.
#[derive(Debug, Clone, Default)]
pub struct FollowupCatalog {
    prompts: BTreeMap<String, FollowupPrompt>,
}

impl FollowupCatalog {
    pub(crate) const fn new(prompts: BTreeMap<String, FollowupPrompt>) -> Self {
        Self { prompts }
    }

    /// Follow-up prompt for a class, if the class can be ambiguous.
    pub fn get(&self, class: &str) -> Option<&FollowupPrompt> {
        self.prompts.get(class)
    }

    /// Classes that carry a follow-up question.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.prompts.keys().map(String::as_str)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::rules::RuleBook;

    #[test]
    fn test_get_known_and_unknown() {
        let book = RuleBook::embedded().unwrap();
        let catalog = book.catalog();

        let paper = catalog.get("paper").unwrap();
        assert_eq!(paper.question_text, "What type of paper item is this?");
        let ids: Vec<&str> = paper.options.iter().map(|o| o.subtype_id.as_str()).collect();
        assert_eq!(ids, ["clean_paper", "cardboard", "pizza_box", "juice_carton"]);

        assert!(catalog.get("glass").is_none());
    }

    #[test]
    fn test_catalog_classes() {
        let book = RuleBook::embedded().unwrap();
        let classes: Vec<&str> = book.catalog().classes().collect();
        assert_eq!(classes, ["paper", "plastic", "wrapper"]);
    }
}
