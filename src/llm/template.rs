use std::collections::BTreeMap;

use crate::error::DebiasError;

/// Named values substituted into a template
pub type Inputs = BTreeMap<String, String>;

/// Build an `Inputs` map from string pairs
pub fn inputs<K, V, I>(pairs: I) -> Inputs
where
    K: Into<String>,
    V: Into<String>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Parse a `key=value` argument. Only the first `=` splits.
pub fn parse_key_value(arg: &str) -> Result<(String, String), DebiasError> {
    match arg.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(DebiasError::InvalidInput(arg.to_string())),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable(String),
}

/// A text template with `{name}` placeholders.
///
/// `{{` and `}}` produce literal braces. Substituted values are inserted
/// verbatim and never re-parsed, so model output containing braces is safe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
    segments: Vec<Segment>,
    input_variables: Vec<String>,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Result<Self, DebiasError> {
        let template = template.into();
        let segments = parse_segments(&template)?;

        let mut input_variables: Vec<String> = Vec::new();
        for segment in &segments {
            if let Segment::Variable(name) = segment {
                if !input_variables.contains(name) {
                    input_variables.push(name.clone());
                }
            }
        }

        Ok(Self {
            template,
            segments,
            input_variables,
        })
    }

    /// Raw template text
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Variables referenced by the template, in first-use order
    pub fn input_variables(&self) -> &[String] {
        &self.input_variables
    }

    /// Substitute every placeholder. Extra inputs are ignored.
    pub fn format(&self, inputs: &Inputs) -> Result<String, DebiasError> {
        let mut out = String::with_capacity(self.template.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Variable(name) => {
                    let value = inputs
                        .get(name)
                        .ok_or_else(|| DebiasError::MissingVariable(name.clone()))?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

fn parse_segments(template: &str) -> Result<Vec<Segment>, DebiasError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = template.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '{' => {
                if matches!(chars.peek(), Some((_, '{'))) {
                    chars.next();
                    literal.push('{');
                    continue;
                }

                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some((_, '}')) => break,
                        Some((_, '{')) => {
                            return Err(DebiasError::MalformedTemplate {
                                position: pos,
                                reason: "nested '{' inside placeholder",
                            });
                        }
                        Some((_, ch)) => name.push(ch),
                        None => {
                            return Err(DebiasError::MalformedTemplate {
                                position: pos,
                                reason: "unterminated placeholder",
                            });
                        }
                    }
                }

                if name.is_empty() {
                    return Err(DebiasError::MalformedTemplate {
                        position: pos,
                        reason: "empty placeholder",
                    });
                }
                if name.chars().any(char::is_whitespace) {
                    return Err(DebiasError::MalformedTemplate {
                        position: pos,
                        reason: "whitespace inside placeholder",
                    });
                }
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Variable(name));
            }
            '}' => {
                if matches!(chars.peek(), Some((_, '}'))) {
                    chars.next();
                    literal.push('}');
                    continue;
                }
                return Err(DebiasError::MalformedTemplate {
                    position: pos,
                    reason: "unmatched '}'",
                });
            }
            _ => literal.push(c),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    Ok(segments)
}

/// A prompt made of a prefix, rendered worked examples and a suffix
#[derive(Debug, Clone)]
pub struct FewShotPromptTemplate {
    pub prefix: PromptTemplate,
    /// Template each example row is rendered with
    pub example_prompt: PromptTemplate,
    /// Example rows; keys the example prompt does not use are ignored
    pub examples: Vec<Inputs>,
    pub suffix: PromptTemplate,
    pub example_separator: String,
}

impl FewShotPromptTemplate {
    /// A prompt with no prefix or examples, just `template`
    pub fn plain(template: PromptTemplate) -> Result<Self, DebiasError> {
        Ok(Self {
            prefix: PromptTemplate::new("")?,
            example_prompt: PromptTemplate::new("")?,
            examples: Vec::new(),
            suffix: template,
            example_separator: "\n\n".to_string(),
        })
    }

    /// Variables the caller must supply (prefix and suffix)
    pub fn input_variables(&self) -> Vec<String> {
        let mut vars: Vec<String> = self.prefix.input_variables().to_vec();
        for var in self.suffix.input_variables() {
            if !vars.contains(var) {
                vars.push(var.clone());
            }
        }
        vars
    }

    pub fn format(&self, inputs: &Inputs) -> Result<String, DebiasError> {
        let mut pieces = Vec::with_capacity(self.examples.len() + 2);
        pieces.push(self.prefix.format(inputs)?);
        for example in &self.examples {
            pieces.push(self.example_prompt.format(example)?);
        }
        pieces.push(self.suffix.format(inputs)?);

        let pieces: Vec<String> = pieces.into_iter().filter(|p| !p.is_empty()).collect();
        Ok(pieces.join(&self.example_separator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_substitutes_variables() {
        let template = PromptTemplate::new("Q: {question} A:").unwrap();
        assert_eq!(template.input_variables(), &["question".to_string()]);

        let rendered = template
            .format(&inputs([("question", "What is bias?")]))
            .unwrap();
        assert_eq!(rendered, "Q: What is bias? A:");
    }

    #[test]
    fn test_repeated_variable_listed_once() {
        let template = PromptTemplate::new("{a} and {b} then {a}").unwrap();
        assert_eq!(template.input_variables(), &["a".to_string(), "b".to_string()]);
        let rendered = template.format(&inputs([("a", "x"), ("b", "y")])).unwrap();
        assert_eq!(rendered, "x and y then x");
    }

    #[test]
    fn test_escaped_braces() {
        let template = PromptTemplate::new("{{literal}} {name}").unwrap();
        assert_eq!(template.input_variables(), &["name".to_string()]);
        assert_eq!(
            template.format(&inputs([("name", "v")])).unwrap(),
            "{literal} v"
        );
    }

    #[test]
    fn test_values_are_not_reparsed() {
        let template = PromptTemplate::new("Model: {output}").unwrap();
        let rendered = template
            .format(&inputs([("output", "fn main() { {x} }")]))
            .unwrap();
        assert_eq!(rendered, "Model: fn main() { {x} }");
    }

    #[test]
    fn test_missing_variable() {
        let template = PromptTemplate::new("{a} {b}").unwrap();
        let err = template.format(&inputs([("a", "x")])).unwrap_err();
        assert_eq!(err, DebiasError::MissingVariable("b".to_string()));
    }

    #[test]
    fn test_malformed_templates() {
        assert!(matches!(
            PromptTemplate::new("open {brace"),
            Err(DebiasError::MalformedTemplate { position: 5, .. })
        ));
        assert!(matches!(
            PromptTemplate::new("stray } here"),
            Err(DebiasError::MalformedTemplate { position: 6, .. })
        ));
        assert!(matches!(
            PromptTemplate::new("empty {}"),
            Err(DebiasError::MalformedTemplate { .. })
        ));
    }

    #[test]
    fn test_whitespace_in_placeholder_rejected() {
        assert_eq!(
            PromptTemplate::new("Q: { question } A:"),
            Err(DebiasError::MalformedTemplate {
                position: 3,
                reason: "whitespace inside placeholder",
            })
        );
        assert!(PromptTemplate::new("{first name}").is_err());
    }

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("question=a=b").unwrap(),
            ("question".to_string(), "a=b".to_string())
        );
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=value").is_err());
    }

    #[test]
    fn test_few_shot_layout() {
        let prompt = FewShotPromptTemplate {
            prefix: PromptTemplate::new("Prefix").unwrap(),
            example_prompt: PromptTemplate::new("In: {x}").unwrap(),
            examples: vec![
                inputs([("x", "1"), ("unused", "ignored")]),
                inputs([("x", "2")]),
            ],
            suffix: PromptTemplate::new("In: {query}").unwrap(),
            example_separator: "\n---\n".to_string(),
        };

        assert_eq!(prompt.input_variables(), vec!["query".to_string()]);
        assert_eq!(
            prompt.format(&inputs([("query", "3")])).unwrap(),
            "Prefix\n---\nIn: 1\n---\nIn: 2\n---\nIn: 3"
        );
    }

    #[test]
    fn test_plain_few_shot_is_just_the_template() {
        let prompt =
            FewShotPromptTemplate::plain(PromptTemplate::new("Only {x}").unwrap()).unwrap();
        assert_eq!(prompt.format(&inputs([("x", "this")])).unwrap(), "Only this");
    }
}
