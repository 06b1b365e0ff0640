//! Prompt templates for translation and answer generation

use std::collections::HashMap;

use crate::models::QueryLanguage;

/// Template with `{{variable}}` placeholders
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
    variables: Vec<String>,
}

impl PromptTemplate {
    /// Create a new prompt template
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let variables = extract_variables(&template);
        Self {
            template,
            variables,
        }
    }

    /// Fill in the template with variables
    #[must_use]
    pub fn render(&self, values: &HashMap<String, String>) -> String {
        let mut result = self.template.clone();
        for var in &self.variables {
            if let Some(value) = values.get(var) {
                result = result.replace(&format!("{{{{{var}}}}}"), value);
            }
        }
        result
    }

    /// Get required variables
    #[must_use]
    pub fn variables(&self) -> &[String] {
        &self.variables
    }
}

/// Extract variable names from template
fn extract_variables(template: &str) -> Vec<String> {
    let mut variables = Vec::new();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '{' && chars.peek() == Some(&'{') {
            chars.next(); // skip second '{'
            let mut var_name = String::new();
            while let Some(&ch) = chars.peek() {
                if ch == '}' {
                    chars.next();
                    if chars.peek() == Some(&'}') {
                        chars.next();
                        break;
                    }
                } else {
                    var_name.push(ch);
                    chars.next();
                }
            }
            if !var_name.is_empty() && !variables.contains(&var_name) {
                variables.push(var_name);
            }
        }
    }

    variables
}

/// A template with some variables already bound.
///
/// The orchestrator prepares the language/date portion while retrieval is
/// still running; `complete` fills in the context and query afterwards.
#[derive(Debug, Clone)]
pub struct PreparedPrompt {
    template: PromptTemplate,
    values: HashMap<String, String>,
}

impl PreparedPrompt {
    pub fn new(template: PromptTemplate) -> Self {
        Self {
            template,
            values: HashMap::new(),
        }
    }

    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Render the final prompt with the assembled context and query text
    #[must_use]
    pub fn complete(&self, context: &str, input: &str) -> String {
        let mut values = self.values.clone();
        values.insert("context".to_string(), context.to_string());
        values.insert("input".to_string(), input.to_string());
        self.template.render(&values)
    }
}

/// Answer-generation template for the given response language.
///
/// One template serves both languages; only the response-language
/// instructions differ.
pub fn answer_template(language: QueryLanguage) -> PromptTemplate {
    let language_instruction = match language {
        QueryLanguage::English => "",
        QueryLanguage::Spanish => " Respond in Spanish.",
    };
    let answer_language = match language {
        QueryLanguage::English => "",
        QueryLanguage::Spanish => " in Spanish",
    };

    PromptTemplate::new(format!(
        r#""role": "You are an AI assistant answering questions from an organization's document collection.
You can provide information, answer questions and perform other tasks as needed.
Today's date is {{{{current_date}}}}. Please be aware of this when discussing events,
deadlines, or time-sensitive information.
Don't repeat queries.{language_instruction}"

---------------------
{{{{context}}}}
---------------------

Given the context information and not prior knowledge, answer the query{answer_language}.
If the context is empty say that you don't have any information about the question{answer_language}.
Don't give sources.
At the end tell the user that if they have anymore questions to let you know.
Format your response in proper markdown with formatting symbols.

1. Use line breaks between paragraphs (two newlines).
2. For any lists:
   - Use bullet points with a dash (-) and a space before each item
   - Leave a line break before the first list item
   - Each list item should be on its own line
3. For numbered lists:
   - Use numbers followed by a period (1. )
   - Leave a line break before the first list item
   - Each numbered item should be on its own line
4. For section headings, use ## (double hash) with a space after.
5. Make important terms **bold** using double asterisks.
6. If you include code blocks, use triple backticks with the language name.
7. Do not use line breaks within the same paragraph.

Query: {{{{input}}}}
Answer:
"#
    ))
}

/// Spanish-to-English translation prompt
pub fn translation_prompt(text: &str) -> String {
    format!(
        "Translate the following Spanish text to English, keep the meaning and don't add any extra text, just the translation: {text}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_render() {
        let template = PromptTemplate::new("Hello {{name}}, today is {{date}}.");
        assert_eq!(template.variables(), ["name", "date"]);

        let mut values = HashMap::new();
        values.insert("name".to_string(), "world".to_string());
        values.insert("date".to_string(), "Monday".to_string());
        assert_eq!(template.render(&values), "Hello world, today is Monday.");
    }

    #[test]
    fn test_render_leaves_missing_variables() {
        let template = PromptTemplate::new("{{greeting}} {{name}}");
        let mut values = HashMap::new();
        values.insert("greeting".to_string(), "Hi".to_string());
        assert_eq!(template.render(&values), "Hi {{name}}");
    }

    #[test]
    fn test_answer_template_variables() {
        let template = answer_template(QueryLanguage::English);
        assert_eq!(template.variables(), ["current_date", "context", "input"]);
    }

    #[test]
    fn test_spanish_template_instructs_spanish() {
        let template = answer_template(QueryLanguage::Spanish);
        let prepared = PreparedPrompt::new(template).set("current_date", "Monday, March 03, 2025");
        let prompt = prepared.complete("some passage", "una pregunta");

        assert!(prompt.contains("Respond in Spanish."));
        assert!(prompt.contains("answer the query in Spanish"));
        assert!(prompt.contains("some passage"));
        assert!(prompt.contains("Query: una pregunta"));
        assert!(prompt.contains("Monday, March 03, 2025"));
    }

    #[test]
    fn test_english_template_has_no_spanish_instruction() {
        let prepared = PreparedPrompt::new(answer_template(QueryLanguage::English))
            .set("current_date", "Friday, July 04, 2025");
        let prompt = prepared.complete("ctx", "what is the schedule?");

        assert!(!prompt.contains("Spanish"));
        assert!(prompt.contains("Query: what is the schedule?"));
    }

    #[test]
    fn test_translation_prompt() {
        let prompt = translation_prompt("Háblame del concejo");
        assert!(prompt.starts_with("Translate the following Spanish text to English"));
        assert!(prompt.ends_with("Háblame del concejo"));
    }
}
