use serde::{Deserialize, Serialize};

const PLACEHOLDER: &str = "{}";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// String-formatting recipe for a model family's conversational prompt.
///
/// `user`, `assistant` and `system` carry a `{}` placeholder for the
/// message content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PromptTemplate {
    pub prefix: String,
    pub suffix: String,
    pub join: String,
    pub user: String,
    pub assistant: String,
    pub system: String,
    pub eos_token: String,
}

impl PromptTemplate {
    pub fn render(&self, messages: &[Message]) -> String {
        let body = messages
            .iter()
            .map(|m| {
                let pattern = match m.role {
                    Role::System => &self.system,
                    Role::User => &self.user,
                    Role::Assistant => &self.assistant,
                };
                pattern.replacen(PLACEHOLDER, &m.content, 1)
            })
            .collect::<Vec<_>>()
            .join(&self.join);
        format!("{}{}{}", self.prefix, body, self.suffix)
    }
}

pub const BUILTIN_TEMPLATE_NAMES: &[&str] = &["llama2", "llmJp"];

pub fn builtin_template(name: &str) -> Option<PromptTemplate> {
    match name {
        "llama2" => Some(PromptTemplate {
            prefix: "<s>[INST] ".into(),
            suffix: " [/INST]".into(),
            join: "".into(),
            user: "{}".into(),
            assistant: " [/INST] {}</s><s>[INST] ".into(),
            system: "<<SYS>>\n{}\n<</SYS>>\n\n".into(),
            eos_token: "</s>".into(),
        }),
        "llmJp" => Some(PromptTemplate {
            prefix: "".into(),
            suffix: "\n\n### 回答：".into(),
            join: "\n\n".into(),
            user: "### 指示：\n{}".into(),
            assistant: "### 回答：\n{}".into(),
            system: "{}".into(),
            eos_token: "</s>".into(),
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_llama2() {
        let t = builtin_template("llama2").unwrap();
        let out = t.render(&[
            Message::new(Role::System, "Be brief."),
            Message::new(Role::User, "Hello"),
        ]);
        assert_eq!(out, "<s>[INST] <<SYS>>\nBe brief.\n<</SYS>>\n\nHello [/INST]");
    }

    #[test]
    fn test_render_joins_messages() {
        let t = builtin_template("llmJp").unwrap();
        let out = t.render(&[
            Message::new(Role::User, "a"),
            Message::new(Role::Assistant, "b"),
            Message::new(Role::User, "c"),
        ]);
        assert_eq!(out, "### 指示：\na\n\n### 回答：\nb\n\n### 指示：\nc\n\n### 回答：");
    }

    #[test]
    fn test_builtin_names_resolve() {
        for name in BUILTIN_TEMPLATE_NAMES {
            assert!(builtin_template(name).is_some(), "{name}");
        }
        assert!(builtin_template("unknown").is_none());
    }
}
