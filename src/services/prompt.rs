// src/services/prompt.rs
const PLACEHOLDER: &str = "{message}";

/// How a user message is turned into the prompt sent to the backend.
/// This is a deployment-wide setting, never chosen per request.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum PromptTemplate {
    #[default]
    Verbatim,
    /// Template containing `{message}`.
    Substitute(String),
    /// Instructional text placed before the message.
    Prefix(String),
}

impl PromptTemplate {
    pub fn from_setting(setting: Option<String>) -> Self {
        match setting {
            None => PromptTemplate::Verbatim,
            Some(t) if t.trim().is_empty() => PromptTemplate::Verbatim,
            Some(t) if t.contains(PLACEHOLDER) => PromptTemplate::Substitute(t),
            Some(t) => PromptTemplate::Prefix(t),
        }
    }

    pub fn render(&self, message: &str) -> String {
        match self {
            PromptTemplate::Verbatim => message.to_string(),
            PromptTemplate::Substitute(t) => t.replace(PLACEHOLDER, message),
            PromptTemplate::Prefix(p) => format!("{}\n\n{}", p.trim_end(), message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbatim_passes_message_through() {
        let t = PromptTemplate::from_setting(None);
        assert_eq!(t.render("2+2?"), "2+2?");
    }

    #[test]
    fn placeholder_is_substituted() {
        let t = PromptTemplate::from_setting(Some("Answer briefly: {message}".into()));
        assert_eq!(t, PromptTemplate::Substitute("Answer briefly: {message}".into()));
        assert_eq!(t.render("2+2?"), "Answer briefly: 2+2?");
    }

    #[test]
    fn plain_text_becomes_prefix() {
        let t = PromptTemplate::from_setting(Some("You are a portfolio assistant.\n".into()));
        assert_eq!(t.render("hi"), "You are a portfolio assistant.\n\nhi");
    }

    #[test]
    fn whitespace_setting_is_verbatim() {
        assert_eq!(PromptTemplate::from_setting(Some("  ".into())), PromptTemplate::Verbatim);
    }
}
