//! `{name}`-placeholder templates.
//!
//! Two consumers share one tokenizer:
//! - `NamedFieldParser` pulls a single named field out of a structured
//!   label such as `BR-FDIP-NOPREF-NOPREF-NOPREF-LRU-1core`.
//! - `KeyPattern` matches joined statistics keys such as
//!   `roi-stats.{n_cpu}.L1I`, where a placeholder spans one key segment.

use crate::utils::error::TemplateError;
use regex::Regex;

/// Piece of a tokenized template
#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Field(String),
}

/// Split a template into literal text and `{name}` placeholders
fn tokenize(template: &str) -> Result<Vec<Piece>, TemplateError> {
    let invalid = |reason: &str| TemplateError::InvalidTemplate {
        template: template.to_string(),
        reason: reason.to_string(),
    };

    let mut pieces = Vec::new();
    let mut literal = String::new();
    let mut chars = template.chars();

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                let mut name = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }
                if !closed {
                    return Err(invalid("unclosed '{'"));
                }
                if !is_field_name(&name) {
                    return Err(invalid(&format!("bad field name '{}'", name)));
                }
                if pieces.contains(&Piece::Field(name.clone())) {
                    return Err(invalid(&format!("field '{}' used twice", name)));
                }
                if !literal.is_empty() {
                    pieces.push(Piece::Literal(std::mem::take(&mut literal)));
                }
                pieces.push(Piece::Field(name));
            }
            '}' => return Err(invalid("unmatched '}'")),
            c => literal.push(c),
        }
    }

    if !literal.is_empty() {
        pieces.push(Piece::Literal(literal));
    }

    Ok(pieces)
}

fn is_field_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Build an anchored regex; each field becomes a named group matching `field_pattern`
fn compile(template: &str, pieces: &[Piece], field_pattern: &str) -> Result<Regex, TemplateError> {
    let mut pattern = String::from("^");
    for piece in pieces {
        match piece {
            Piece::Literal(text) => pattern.push_str(&regex::escape(text)),
            Piece::Field(name) => {
                pattern.push_str(&format!("(?P<{}>{})", name, field_pattern));
            }
        }
    }
    pattern.push('$');

    Regex::new(&pattern).map_err(|e| TemplateError::InvalidTemplate {
        template: template.to_string(),
        reason: e.to_string(),
    })
}

/// Extracts one named field from strings following a template
#[derive(Debug, Clone)]
pub struct NamedFieldParser {
    template: String,
    field: String,
    regex: Regex,
}

impl NamedFieldParser {
    /// Compile `template` and select `field` for extraction
    ///
    /// # Errors
    /// * `TemplateError::InvalidTemplate` - malformed placeholder syntax
    /// * `TemplateError::UnknownField` - `field` is not a placeholder of `template`
    pub fn new(template: &str, field: &str) -> Result<Self, TemplateError> {
        let pieces = tokenize(template)?;

        if !pieces.contains(&Piece::Field(field.to_string())) {
            return Err(TemplateError::UnknownField {
                template: template.to_string(),
                field: field.to_string(),
            });
        }

        // Lazy fields: earlier fields take the shortest match
        let regex = compile(template, &pieces, ".+?")?;

        Ok(Self {
            template: template.to_string(),
            field: field.to_string(),
            regex,
        })
    }

    /// Extract the selected field from `input`
    ///
    /// # Errors
    /// * `TemplateError::Mismatch` - `input` does not follow the template
    pub fn extract(&self, input: &str) -> Result<String, TemplateError> {
        self.regex
            .captures(input)
            .and_then(|caps| caps.name(&self.field))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| TemplateError::Mismatch {
                template: self.template.clone(),
                input: input.to_string(),
            })
    }
}

/// Matches whole joined keys; a placeholder covers exactly one segment
#[derive(Debug, Clone)]
pub struct KeyPattern {
    source: String,
    regex: Regex,
}

impl KeyPattern {
    pub fn new(pattern: &str, separator: &str) -> Result<Self, TemplateError> {
        let pieces = tokenize(pattern)?;
        let segment = if separator.is_empty() {
            ".+".to_string()
        } else {
            // "[^.]+" style class, built from the separator's characters
            let class: String = separator
                .chars()
                .map(|c| regex::escape(&c.to_string()))
                .collect();
            format!("[^{}]+", class)
        };
        let regex = compile(pattern, &pieces, &segment)?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CONFIG_TEMPLATE: &str =
        "{branch}-{l1i_pref}-{l1d_pref}-{l2c_pref}-{llc_pref}-{llc_repl}-{n_core}core";

    #[test]
    fn test_extract_prefetcher() {
        let parser = NamedFieldParser::new(CONFIG_TEMPLATE, "l1i_pref").unwrap();
        assert_eq!(
            parser.extract("BR-FDIP-NOPREF-NOPREF-NOPREF-LRU-1core").unwrap(),
            "FDIP"
        );
    }

    #[test]
    fn test_extract_last_field() {
        let parser = NamedFieldParser::new(CONFIG_TEMPLATE, "n_core").unwrap();
        assert_eq!(
            parser.extract("BR-FDIP-NOPREF-NOPREF-NOPREF-LRU-4core").unwrap(),
            "4"
        );
    }

    #[test]
    fn test_extract_trace() {
        let parser =
            NamedFieldParser::new("{binary}.{trace}.{n_sim}.{n_warm}.stats", "trace").unwrap();
        assert_eq!(parser.extract("app.trace1.100.10.stats").unwrap(), "trace1");
    }

    #[test]
    fn test_short_descriptor_is_mismatch() {
        let parser = NamedFieldParser::new(CONFIG_TEMPLATE, "l1i_pref").unwrap();
        let err = parser.extract("BR-FDIP-LRU-1core").unwrap_err();
        assert!(matches!(err, TemplateError::Mismatch { .. }));
    }

    #[test]
    fn test_missing_suffix_is_mismatch() {
        let parser = NamedFieldParser::new(CONFIG_TEMPLATE, "l1i_pref").unwrap();
        assert!(parser
            .extract("BR-FDIP-NOPREF-NOPREF-NOPREF-LRU-1")
            .is_err());
    }

    #[test]
    fn test_unknown_field() {
        let err = NamedFieldParser::new(CONFIG_TEMPLATE, "l3_pref").unwrap_err();
        assert!(matches!(err, TemplateError::UnknownField { .. }));
    }

    #[test]
    fn test_invalid_templates() {
        assert!(NamedFieldParser::new("{a", "a").is_err());
        assert!(NamedFieldParser::new("a}", "a").is_err());
        assert!(NamedFieldParser::new("{}-x", "a").is_err());
        assert!(NamedFieldParser::new("{a}-{a}", "a").is_err());
        assert!(NamedFieldParser::new("{1a}", "1a").is_err());
    }

    #[test]
    fn test_literal_metacharacters_are_escaped() {
        let parser = NamedFieldParser::new("{a}.(x)", "a").unwrap();
        assert_eq!(parser.extract("v.(x)").unwrap(), "v");
        assert!(parser.extract("v-(x)").is_err());
    }

    #[test]
    fn test_key_pattern_matches_one_segment() {
        let pattern = KeyPattern::new("roi-stats.{n_cpu}.L1I", ".").unwrap();
        assert!(pattern.matches("roi-stats.cpu0.L1I"));
        assert!(pattern.matches("roi-stats.cpu12.L1I"));
        assert!(!pattern.matches("roi-stats.cpu0.x.L1I"));
        assert!(!pattern.matches("roi-stats.cpu0.L1I.load"));
    }

    #[test]
    fn test_key_pattern_literal() {
        let pattern = KeyPattern::new("dram", ".").unwrap();
        assert!(pattern.matches("dram"));
        assert!(!pattern.matches("dram-stats"));
        assert_eq!(pattern.as_str(), "dram");
    }
}
