//! Placeholder template engine
//!
//! Templates are plain text with three constructs:
//!
//! - `{{key}}` — replaced with the string/number value under `key`
//! - `{{#if key}}...{{/if}}` — inner text kept iff `key` is truthy
//! - `{{#each key}}...{{/each}}` — inner text repeated per array element,
//!   elements newline-joined
//!
//! A template is tokenized once into a flat instruction list, then evaluated
//! against a data map. Nesting is deliberately restricted: a conditional body
//! may contain loops and placeholders, a loop body only placeholders. Any
//! other nesting is a parse error rather than silently mangled output.

use serde_json::{Map, Value};

/// Errors produced while tokenizing a template.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("unclosed {{{{#{kind} {key}}}}} block")]
    UnclosedBlock { kind: &'static str, key: String },

    #[error("nested {{{{#if}}}} blocks are not supported")]
    NestedConditional,

    #[error("nested {{{{#each}}}} blocks are not supported")]
    NestedLoop,

    #[error("{{{{#if}}}} blocks are not supported inside {{{{#each}}}}")]
    ConditionalInLoop,

    #[error("unexpected {{{{/{0}}}}} with no matching open block")]
    UnexpectedClose(&'static str),

    #[error("malformed {{{{#{0}}}}} tag: missing or invalid key")]
    MalformedTag(&'static str),
}

/// One tokenized piece of a template.
#[derive(Debug, Clone, PartialEq)]
enum Instruction {
    Literal(String),
    Placeholder(String),
    Conditional { key: String, body: Vec<Instruction> },
    Loop { key: String, body: Vec<Instruction> },
}

/// Render a template against a data map.
///
/// Unknown `{{key}}` tokens and tokens bound to non-scalar values are left
/// verbatim in the output.
pub fn render(template: &str, data: &Map<String, Value>) -> Result<String, TemplateError> {
    let instructions = tokenize(template)?;
    Ok(eval(&instructions, data))
}

/// Tokenizing context: what may open inside the current block.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Context {
    Top,
    Conditional,
    Loop,
}

fn tokenize(template: &str) -> Result<Vec<Instruction>, TemplateError> {
    let mut parser = Parser {
        src: template,
        pos: 0,
    };
    parser.parse_sequence(Context::Top)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    /// Parse instructions until the closing tag of the current context (or
    /// end of input at top level).
    fn parse_sequence(&mut self, ctx: Context) -> Result<Vec<Instruction>, TemplateError> {
        let mut out = Vec::new();
        let mut literal_start = self.pos;

        while let Some(offset) = self.src[self.pos..].find("{{") {
            let tag_start = self.pos + offset;
            let rest = &self.src[tag_start..];

            if rest.starts_with("{{/if}}") {
                push_literal(&mut out, &self.src[literal_start..tag_start]);
                self.pos = tag_start + "{{/if}}".len();
                return match ctx {
                    Context::Conditional => Ok(out),
                    _ => Err(TemplateError::UnexpectedClose("if")),
                };
            }

            if rest.starts_with("{{/each}}") {
                push_literal(&mut out, &self.src[literal_start..tag_start]);
                self.pos = tag_start + "{{/each}}".len();
                return match ctx {
                    Context::Loop => Ok(out),
                    _ => Err(TemplateError::UnexpectedClose("each")),
                };
            }

            if rest.starts_with("{{#if ") {
                match ctx {
                    Context::Conditional => return Err(TemplateError::NestedConditional),
                    Context::Loop => return Err(TemplateError::ConditionalInLoop),
                    Context::Top => {}
                }
                push_literal(&mut out, &self.src[literal_start..tag_start]);
                let key = self.read_block_key(tag_start, "{{#if ", "if")?;
                let body = self
                    .parse_sequence(Context::Conditional)
                    .map_err(|e| relabel_unclosed(e, "if", &key))?;
                out.push(Instruction::Conditional { key, body });
                literal_start = self.pos;
                continue;
            }

            if rest.starts_with("{{#each ") {
                if ctx == Context::Loop {
                    return Err(TemplateError::NestedLoop);
                }
                push_literal(&mut out, &self.src[literal_start..tag_start]);
                let key = self.read_block_key(tag_start, "{{#each ", "each")?;
                let body = self
                    .parse_sequence(Context::Loop)
                    .map_err(|e| relabel_unclosed(e, "each", &key))?;
                out.push(Instruction::Loop { key, body });
                literal_start = self.pos;
                continue;
            }

            // Plain placeholder candidate: {{key}} with an exact key, no
            // inner whitespace. Anything else keeps the braces as literal
            // text, matching the original "no whitespace tolerance" rule.
            if let Some(end) = rest.find("}}") {
                let key = &rest[2..end];
                if is_placeholder_key(key) {
                    push_literal(&mut out, &self.src[literal_start..tag_start]);
                    out.push(Instruction::Placeholder(key.to_string()));
                    self.pos = tag_start + end + 2;
                    literal_start = self.pos;
                    continue;
                }
            }

            // Not a recognized tag: step past the braces and keep scanning.
            self.pos = tag_start + 2;
        }

        self.pos = self.src.len();
        push_literal(&mut out, &self.src[literal_start..]);

        match ctx {
            Context::Top => Ok(out),
            // Placeholder key; the caller rewrites this with the real one.
            Context::Conditional => Err(TemplateError::UnclosedBlock {
                kind: "if",
                key: String::new(),
            }),
            Context::Loop => Err(TemplateError::UnclosedBlock {
                kind: "each",
                key: String::new(),
            }),
        }
    }

    /// Consume a `{{#if key}}` / `{{#each key}}` opening tag starting at
    /// `tag_start`, returning the key and leaving `pos` after the tag.
    fn read_block_key(
        &mut self,
        tag_start: usize,
        prefix: &str,
        kind: &'static str,
    ) -> Result<String, TemplateError> {
        let after = &self.src[tag_start + prefix.len()..];
        let end = after
            .find("}}")
            .ok_or(TemplateError::MalformedTag(kind))?;
        let key = &after[..end];
        if key.is_empty() || key.chars().any(|c| c.is_whitespace() || c == '{' || c == '}') {
            return Err(TemplateError::MalformedTag(kind));
        }
        self.pos = tag_start + prefix.len() + end + 2;
        Ok(key.to_string())
    }
}

/// Fill in the key of an unclosed-block error raised while parsing a block
/// body; other errors pass through untouched.
fn relabel_unclosed(err: TemplateError, kind: &'static str, key: &str) -> TemplateError {
    match err {
        TemplateError::UnclosedBlock { kind: k, key: inner } if inner.is_empty() && k == kind => {
            TemplateError::UnclosedBlock {
                kind,
                key: key.to_string(),
            }
        }
        other => other,
    }
}

fn push_literal(out: &mut Vec<Instruction>, text: &str) {
    if text.is_empty() {
        return;
    }
    // Merge adjacent literals so skipped `{{` sequences stay contiguous.
    if let Some(Instruction::Literal(prev)) = out.last_mut() {
        prev.push_str(text);
    } else {
        out.push(Instruction::Literal(text.to_string()));
    }
}

fn is_placeholder_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('#')
        && !key.starts_with('/')
        && !key
            .chars()
            .any(|c| c.is_whitespace() || c == '{' || c == '}')
}

fn eval(instructions: &[Instruction], data: &Map<String, Value>) -> String {
    let mut out = String::new();
    for instruction in instructions {
        match instruction {
            Instruction::Literal(text) => out.push_str(text),
            Instruction::Placeholder(key) => match data.get(key) {
                Some(Value::String(s)) => out.push_str(s),
                Some(Value::Number(n)) => out.push_str(&n.to_string()),
                // Missing keys and non-scalar values keep the raw token.
                _ => {
                    out.push_str("{{");
                    out.push_str(key);
                    out.push_str("}}");
                }
            },
            Instruction::Conditional { key, body } => {
                if is_truthy(data.get(key)) {
                    out.push_str(&eval(body, data));
                }
            }
            Instruction::Loop { key, body } => {
                if let Some(Value::Array(items)) = data.get(key) {
                    let rendered: Vec<String> = items
                        .iter()
                        .map(|item| eval_loop_body(body, item))
                        .collect();
                    out.push_str(&rendered.join("\n"));
                }
                // Missing or non-array values resolve to the empty string.
            }
        }
    }
    out
}

/// Render one loop iteration against a single element. Only top-level keys
/// of the element are substitutable; scalar values (including booleans)
/// coerce to strings, everything else leaves the token verbatim.
fn eval_loop_body(body: &[Instruction], item: &Value) -> String {
    let empty = Map::new();
    let fields = item.as_object().unwrap_or(&empty);

    let mut out = String::new();
    for instruction in body {
        match instruction {
            Instruction::Literal(text) => out.push_str(text),
            Instruction::Placeholder(key) => match fields.get(key) {
                Some(Value::String(s)) => out.push_str(s),
                Some(Value::Number(n)) => out.push_str(&n.to_string()),
                Some(Value::Bool(b)) => out.push_str(if *b { "true" } else { "false" }),
                _ => {
                    out.push_str("{{");
                    out.push_str(key);
                    out.push_str("}}");
                }
            },
            // Grammar forbids blocks inside loop bodies.
            Instruction::Conditional { .. } | Instruction::Loop { .. } => unreachable!(),
        }
    }
    out
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(value: serde_json::Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_scalar_substitution() {
        let d = data(json!({"title": "Hello", "count": 3}));
        assert_eq!(
            render("<h1>{{title}}</h1> x{{count}}", &d).unwrap(),
            "<h1>Hello</h1> x3"
        );
    }

    #[test]
    fn test_unknown_token_left_verbatim() {
        let d = data(json!({}));
        assert_eq!(render("a {{missing}} b", &d).unwrap(), "a {{missing}} b");
    }

    #[test]
    fn test_non_scalar_left_verbatim() {
        let d = data(json!({"items": [1, 2], "obj": {"a": 1}}));
        assert_eq!(
            render("{{items}} {{obj}}", &d).unwrap(),
            "{{items}} {{obj}}"
        );
    }

    #[test]
    fn test_whitespace_in_token_not_matched() {
        let d = data(json!({"key": "v"}));
        assert_eq!(render("{{ key }}", &d).unwrap(), "{{ key }}");
    }

    #[test]
    fn test_multiple_occurrences_all_replaced() {
        let d = data(json!({"x": "v"}));
        assert_eq!(render("{{x}}-{{x}}-{{x}}", &d).unwrap(), "v-v-v");
    }

    #[test]
    fn test_conditional_truthy() {
        let d = data(json!({"flag": "yes"}));
        assert_eq!(render("a{{#if flag}}b{{/if}}c", &d).unwrap(), "abc");
    }

    #[test]
    fn test_conditional_falsy_or_absent() {
        for d in [data(json!({})), data(json!({"flag": ""})), data(json!({"flag": false}))] {
            assert_eq!(render("a{{#if flag}}b{{/if}}c", &d).unwrap(), "ac");
        }
    }

    #[test]
    fn test_conditional_numeric_truthiness() {
        let d = data(json!({"n": 0}));
        assert_eq!(render("{{#if n}}x{{/if}}", &d).unwrap(), "");
        let d = data(json!({"n": 7}));
        assert_eq!(render("{{#if n}}x{{/if}}", &d).unwrap(), "x");
    }

    #[test]
    fn test_conditional_body_resolves_placeholders() {
        let d = data(json!({"flag": "y", "name": "world"}));
        assert_eq!(
            render("{{#if flag}}hello {{name}}{{/if}}", &d).unwrap(),
            "hello world"
        );
    }

    #[test]
    fn test_conditional_body_spans_lines() {
        let d = data(json!({"flag": true}));
        assert_eq!(
            render("{{#if flag}}\nline\n{{/if}}", &d).unwrap(),
            "\nline\n"
        );
    }

    #[test]
    fn test_loop_block() {
        let d = data(json!({"items": [{"name": "x"}, {"name": "y"}]}));
        assert_eq!(
            render("{{#each items}}[{{name}}]{{/each}}", &d).unwrap(),
            "[x]\n[y]"
        );
    }

    #[test]
    fn test_loop_non_array_resolves_empty() {
        for d in [data(json!({})), data(json!({"items": "nope"})), data(json!({"items": 3}))] {
            assert_eq!(render("a{{#each items}}[{{name}}]{{/each}}b", &d).unwrap(), "ab");
        }
    }

    #[test]
    fn test_loop_empty_array() {
        let d = data(json!({"items": []}));
        assert_eq!(render("a{{#each items}}x{{/each}}b", &d).unwrap(), "ab");
    }

    #[test]
    fn test_loop_missing_element_key_left_verbatim() {
        let d = data(json!({"items": [{"name": "x"}, {"other": "y"}]}));
        assert_eq!(
            render("{{#each items}}[{{name}}]{{/each}}", &d).unwrap(),
            "[x]\n[{{name}}]"
        );
    }

    #[test]
    fn test_loop_element_keys_shadow_outer_data() {
        // Only element keys resolve inside a loop body.
        let d = data(json!({"outer": "O", "items": [{"a": "1"}]}));
        assert_eq!(
            render("{{#each items}}{{a}}{{outer}}{{/each}}", &d).unwrap(),
            "1{{outer}}"
        );
    }

    #[test]
    fn test_loop_inside_conditional() {
        let d = data(json!({"flag": "y", "items": [{"n": "1"}, {"n": "2"}]}));
        assert_eq!(
            render("{{#if flag}}{{#each items}}{{n}}{{/each}}{{/if}}", &d).unwrap(),
            "1\n2"
        );
    }

    #[test]
    fn test_nested_conditional_is_parse_error() {
        let d = data(json!({}));
        assert_eq!(
            render("{{#if a}}{{#if b}}x{{/if}}{{/if}}", &d),
            Err(TemplateError::NestedConditional)
        );
    }

    #[test]
    fn test_nested_loop_is_parse_error() {
        let d = data(json!({}));
        assert_eq!(
            render("{{#each a}}{{#each b}}x{{/each}}{{/each}}", &d),
            Err(TemplateError::NestedLoop)
        );
    }

    #[test]
    fn test_conditional_inside_loop_is_parse_error() {
        let d = data(json!({}));
        assert_eq!(
            render("{{#each a}}{{#if b}}x{{/if}}{{/each}}", &d),
            Err(TemplateError::ConditionalInLoop)
        );
    }

    #[test]
    fn test_unclosed_block_is_parse_error() {
        let d = data(json!({}));
        assert_eq!(
            render("a{{#if flag}}b", &d),
            Err(TemplateError::UnclosedBlock {
                kind: "if",
                key: "flag".to_string()
            })
        );
        assert_eq!(
            render("a{{#each items}}b", &d),
            Err(TemplateError::UnclosedBlock {
                kind: "each",
                key: "items".to_string()
            })
        );
    }

    #[test]
    fn test_stray_close_is_parse_error() {
        let d = data(json!({}));
        assert_eq!(render("a{{/if}}", &d), Err(TemplateError::UnexpectedClose("if")));
        assert_eq!(render("a{{/each}}", &d), Err(TemplateError::UnexpectedClose("each")));
    }

    #[test]
    fn test_malformed_open_tag_is_parse_error() {
        let d = data(json!({}));
        assert_eq!(render("{{#if }}x{{/if}}", &d), Err(TemplateError::MalformedTag("if")));
    }

    #[test]
    fn test_lone_braces_pass_through() {
        let d = data(json!({"x": "v"}));
        assert_eq!(render("{{ {{x}} }}", &d).unwrap(), "{{ v }}");
        assert_eq!(render("open {{", &d).unwrap(), "open {{");
    }
}
