//! Loading of coding schemes and interviews from YAML or JSON files
//!
//! The assembly engine only needs [`CodingScheme`] and [`Interview`] values; this
//! module is the file-based way of producing them for the command line.

use crate::error::{CodesheetError, CodesheetResult};
use crate::types::{CodingScheme, DataType, Interview, Property, PropertyKind, Utterance};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Serialization format of an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Yaml,
    Json,
}

impl InputFormat {
    /// `.json` files are JSON, everything else is read as YAML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => InputFormat::Json,
            _ => InputFormat::Yaml,
        }
    }

    fn deserialize<T: DeserializeOwned>(&self, content: &str) -> CodesheetResult<T> {
        Ok(match self {
            InputFormat::Yaml => serde_yaml::from_str(content)?,
            InputFormat::Json => serde_json::from_str(content)?,
        })
    }
}

//==============================================================================
// File Shapes
//==============================================================================

/// A value written either as a string or as a bare number
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl RawScalar {
    fn into_string(self) -> String {
        match self {
            RawScalar::Text(s) => s,
            RawScalar::Integer(i) => i.to_string(),
            RawScalar::Float(f) => f.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawValue {
    value: RawScalar,
    #[serde(default)]
    description: String,
    #[serde(default)]
    id: Option<RawScalar>,
}

#[derive(Debug, Deserialize)]
struct RawProperty {
    id: RawScalar,
    name: String,
    data_type: String,
    #[serde(default)]
    decimal_digits: u32,
    #[serde(default)]
    values: Vec<RawValue>,
}

#[derive(Debug, Deserialize)]
struct RawScheme {
    #[serde(default)]
    coding_properties: Vec<RawProperty>,
    #[serde(default)]
    global_properties: Vec<RawProperty>,
}

#[derive(Debug, Deserialize)]
struct RawUtterance {
    line: u32,
    utterance: u32,
    role: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct RawInterview {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    utterances: Vec<RawUtterance>,
}

//==============================================================================
// Coding Scheme
//==============================================================================

/// Parse a coding-scheme file.
///
/// # Arguments
/// * `path` - YAML or JSON file with `coding_properties` and `global_properties`
///
/// # Returns
/// * `Ok(CodingScheme)` - properties in file order, values in file order
/// * `Err(CodesheetError)` - unreadable file, malformed content or unknown data type
///
/// # Example
/// ```no_run
/// use codesheet::parser::parse_scheme;
/// use std::path::Path;
///
/// let scheme = parse_scheme(Path::new("scheme.yaml"))?;
/// println!("Coding properties: {}", scheme.coding_properties().len());
/// # Ok::<(), codesheet::error::CodesheetError>(())
/// ```
pub fn parse_scheme(path: &Path) -> CodesheetResult<CodingScheme> {
    let content = std::fs::read_to_string(path)?;
    parse_scheme_str(&content, InputFormat::from_path(path))
}

/// Parse coding-scheme content already read into memory
pub fn parse_scheme_str(content: &str, format: InputFormat) -> CodesheetResult<CodingScheme> {
    let raw: RawScheme = format.deserialize(content)?;
    let mut scheme = CodingScheme::new();
    let mut seen = HashSet::new();

    let sections = [
        (PropertyKind::Coding, raw.coding_properties),
        (PropertyKind::Global, raw.global_properties),
    ];
    for (kind, raw_properties) in sections {
        for raw_property in raw_properties {
            let property = convert_property(raw_property, kind)?;
            if !seen.insert((kind, property.id.clone())) {
                warn!(property = %property.id, kind = kind.as_str(), "property id appears more than once");
            }
            scheme.add_property(property);
        }
    }

    Ok(scheme)
}

fn convert_property(raw: RawProperty, kind: PropertyKind) -> CodesheetResult<Property> {
    let id = raw.id.into_string();
    if id.trim().is_empty() {
        return Err(CodesheetError::Parse(format!(
            "property '{}' has an empty id",
            raw.name
        )));
    }

    let data_type = match raw.data_type.to_ascii_lowercase().as_str() {
        "numeric" => DataType::Numeric {
            decimal_digits: raw.decimal_digits,
        },
        "text" => DataType::Text,
        other => {
            return Err(CodesheetError::Parse(format!(
                "property '{}' has unknown data type '{}' (expected 'numeric' or 'text')",
                id, other
            )))
        }
    };

    let mut property = Property::new(id, raw.name, kind, data_type);
    for raw_value in raw.values {
        let value_id = raw_value.id.map(RawScalar::into_string).unwrap_or_default();
        property.add_value(raw_value.value.into_string(), raw_value.description, value_id);
    }
    Ok(property)
}

//==============================================================================
// Interview
//==============================================================================

/// Parse one or more interview files into a single interview.
///
/// Utterances are concatenated in argument order, each file's utterances in file
/// order. The interview takes the first declared `name`, else the first file's stem.
pub fn parse_interview(paths: &[PathBuf]) -> CodesheetResult<Interview> {
    if paths.is_empty() {
        return Err(CodesheetError::Parse(
            "at least one interview file is required".to_string(),
        ));
    }

    let mut interview: Option<Interview> = None;
    for path in paths {
        let content = std::fs::read_to_string(path)?;
        let mut part = parse_interview_str(&content, InputFormat::from_path(path))?;
        match interview.as_mut() {
            None => {
                if part.name.is_empty() {
                    part.name = path
                        .file_stem()
                        .map(|s| s.to_string_lossy().into_owned())
                        .unwrap_or_default();
                }
                interview = Some(part);
            }
            Some(whole) => whole.utterances.append(&mut part.utterances),
        }
    }

    interview.ok_or_else(|| CodesheetError::Parse("no interview content".to_string()))
}

/// Parse interview content already read into memory
pub fn parse_interview_str(content: &str, format: InputFormat) -> CodesheetResult<Interview> {
    let raw: RawInterview = format.deserialize(content)?;
    let mut interview = Interview::new(raw.name.unwrap_or_default());
    for u in raw.utterances {
        interview.add_utterance(Utterance::new(u.line, u.utterance, u.role, u.text));
    }
    Ok(interview)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEME_YAML: &str = r#"
coding_properties:
  - id: P1
    name: Intensity
    data_type: numeric
    decimal_digits: 0
    values:
      - { value: 1, description: mild, id: V1 }
      - { value: "2", description: moderate, id: V2 }
global_properties:
  - id: G1
    name: Engagement
    data_type: text
    values:
      - { value: Low, id: 10 }
      - { value: High, id: 11 }
"#;

    #[test]
    fn test_parse_scheme_yaml() {
        let scheme = parse_scheme_str(SCHEME_YAML, InputFormat::Yaml).unwrap();

        assert_eq!(scheme.coding_properties().len(), 1);
        let p1 = &scheme.coding_properties()[0];
        assert_eq!(p1.id, "P1");
        assert_eq!(p1.kind, PropertyKind::Coding);
        assert_eq!(p1.data_type, DataType::Numeric { decimal_digits: 0 });
        let values: Vec<&str> = p1.iter().map(|v| v.value.as_str()).collect();
        assert_eq!(values, vec!["1", "2"]);
        assert_eq!(p1.values()[0].property_id, "P1");

        let g1 = &scheme.global_properties()[0];
        assert_eq!(g1.kind, PropertyKind::Global);
        assert_eq!(g1.data_type, DataType::Text);
        assert_eq!(g1.values()[1].value_id, "11");
        assert_eq!(g1.values()[1].description, "");
    }

    #[test]
    fn test_parse_scheme_json() {
        let json = r#"{
            "coding_properties": [
                {"id": "P7", "name": "Score", "data_type": "NUMERIC", "decimal_digits": 1,
                 "values": [{"value": 0.5, "description": "half"}]}
            ]
        }"#;
        let scheme = parse_scheme_str(json, InputFormat::Json).unwrap();
        let p = &scheme.coding_properties()[0];
        assert_eq!(p.data_type, DataType::Numeric { decimal_digits: 1 });
        assert_eq!(p.values()[0].value, "0.5");
        assert!(scheme.global_properties().is_empty());
    }

    #[test]
    fn test_unknown_data_type_is_rejected() {
        let yaml = "coding_properties:\n  - { id: P1, name: X, data_type: date }\n";
        let err = parse_scheme_str(yaml, InputFormat::Yaml).unwrap_err();
        assert!(err.to_string().contains("unknown data type 'date'"));
    }

    #[test]
    fn test_empty_property_id_is_rejected() {
        let yaml = "global_properties:\n  - { id: '', name: X, data_type: text }\n";
        assert!(parse_scheme_str(yaml, InputFormat::Yaml).is_err());
    }

    #[test]
    fn test_parse_interview_keeps_order() {
        let yaml = r#"
name: session-01
utterances:
  - { line: 3, utterance: 1, role: Interviewer, text: "first" }
  - { line: 1, utterance: 2, role: Client, text: "second" }
"#;
        let interview = parse_interview_str(yaml, InputFormat::Yaml).unwrap();
        assert_eq!(interview.name, "session-01");
        let texts: Vec<&str> = interview.utterances.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert_eq!(interview.utterances[0].line_number, 3);
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(InputFormat::from_path(Path::new("a.JSON")), InputFormat::Json);
        assert_eq!(InputFormat::from_path(Path::new("a.yaml")), InputFormat::Yaml);
        assert_eq!(InputFormat::from_path(Path::new("a")), InputFormat::Yaml);
    }

    #[test]
    fn test_parse_interview_requires_a_file() {
        assert!(parse_interview(&[]).is_err());
    }
}
