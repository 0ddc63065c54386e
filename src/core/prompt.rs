use crate::config::defaults::BASE_TEMPLATE;
use crate::config::PromptTemplate;
use rand::seq::SliceRandom;
use rand::Rng;
use regex::{Captures, Regex};
use std::sync::OnceLock;

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{(intent|style)\}").expect("static regex"))
}

/// Renders model prompts from theme-tagged templates.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    templates: Vec<PromptTemplate>,
}

impl PromptBuilder {
    pub fn new(templates: Vec<PromptTemplate>) -> Self {
        Self { templates }
    }

    /// Templates tagged with `theme`, else the untagged ones, else all of them.
    fn candidates(&self, theme: Option<&str>) -> Vec<&str> {
        let tagged: Vec<&str> = match theme {
            Some(theme) => self
                .templates
                .iter()
                .filter(|t| t.themes.iter().any(|tag| tag == theme))
                .map(|t| t.text.as_str())
                .collect(),
            None => Vec::new(),
        };
        if !tagged.is_empty() {
            return tagged;
        }

        let general: Vec<&str> = self
            .templates
            .iter()
            .filter(|t| t.themes.is_empty())
            .map(|t| t.text.as_str())
            .collect();
        if !general.is_empty() {
            return general;
        }

        self.templates.iter().map(|t| t.text.as_str()).collect()
    }

    pub fn build_prompt<R: Rng + ?Sized>(
        &self,
        intent: &str,
        style: &str,
        theme: Option<&str>,
        rng: &mut R,
    ) -> String {
        let candidates = self.candidates(theme);
        let template = candidates.choose(rng).copied().unwrap_or(BASE_TEMPLATE);
        render(template, intent, style)
    }
}

/// Single-pass substitution: placeholder text inside `intent` or `style` stays literal.
pub fn render(template: &str, intent: &str, style: &str) -> String {
    placeholder_regex()
        .replace_all(template, |caps: &Captures| match &caps[1] {
            "intent" => intent.to_string(),
            _ => style.to_string(),
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn template(themes: &[&str], text: &str) -> PromptTemplate {
        PromptTemplate {
            themes: themes.iter().map(|s| s.to_string()).collect(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_render_single_pass() {
        let prompt = render("I={intent} S={style}", "say {style}", "calm");
        assert_eq!(prompt, "I=say {style} S=calm");
    }

    #[test]
    fn test_tagged_templates_preferred() {
        let builder = PromptBuilder::new(vec![
            template(&[], "general {intent}"),
            template(&["love"], "love {intent}"),
        ]);
        let mut rng = StdRng::seed_from_u64(0);

        for _ in 0..10 {
            let prompt = builder.build_prompt("x", "y", Some("love"), &mut rng);
            assert_eq!(prompt, "love x");
        }
    }

    #[test]
    fn test_untagged_theme_uses_general() {
        let builder = PromptBuilder::new(vec![
            template(&[], "general {intent}"),
            template(&["love"], "love {intent}"),
        ]);
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(builder.build_prompt("x", "y", Some("power"), &mut rng), "general x");
        assert_eq!(builder.build_prompt("x", "y", None, &mut rng), "general x");
    }

    #[test]
    fn test_all_templates_when_no_general() {
        let builder = PromptBuilder::new(vec![template(&["love"], "love {intent} {style}")]);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(builder.build_prompt("x", "y", Some("power"), &mut rng), "love x y");
    }

    #[test]
    fn test_empty_template_list_uses_base() {
        let builder = PromptBuilder::new(vec![]);
        let mut rng = StdRng::seed_from_u64(0);
        let prompt = builder.build_prompt("find peace", "serene", Some("peace"), &mut rng);
        assert!(prompt.contains("Intent: find peace"));
        assert!(prompt.contains("Style: serene"));
    }

    #[test]
    fn test_builtin_prompts_render_intent_and_request_json() {
        let builder = PromptBuilder::new(defaults::prompts());
        let mut rng = StdRng::seed_from_u64(9);

        for theme in ["love", "quantum", "power", "cosmic", "unknown"] {
            let prompt = builder.build_prompt("weave the stars", "ethereal", Some(theme), &mut rng);
            assert!(prompt.contains("weave the stars"));
            assert!(prompt.contains("ethereal"));
            assert!(prompt.contains("JSON"));
            assert!(!prompt.contains("{intent}"));
        }
    }
}
