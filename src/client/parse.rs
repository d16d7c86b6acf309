//! Decoding of backend response bodies.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use super::error::{ClientError, ParseError};
use super::models::PostedMessage;

/// What to do with a response that doesn't have the expected shape.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// Fail the call with [`ClientError::MalformedResponse`].
    #[default]
    Strict,
    /// Log the problem and resolve with no value.
    Lenient,
}

impl fmt::Display for ParseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Lenient => write!(f, "lenient"),
        }
    }
}

impl FromStr for ParseMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            other => anyhow::bail!("Unknown parse mode: {}", other),
        }
    }
}

impl ParseMode {
    /// Apply the mode to a parse result for `endpoint`.
    pub fn apply<T>(
        &self,
        endpoint: &str,
        parsed: Result<T, ParseError>,
    ) -> Result<Option<T>, ClientError> {
        match (parsed, self) {
            (Ok(value), _) => Ok(Some(value)),
            (Err(source), Self::Strict) => Err(ClientError::MalformedResponse {
                endpoint: endpoint.to_string(),
                source,
            }),
            (Err(err), Self::Lenient) => {
                tracing::error!("Can't parse {} response: {}", endpoint, err);
                Ok(None)
            }
        }
    }
}

fn array(body: &str) -> Result<Vec<Value>, ParseError> {
    match serde_json::from_str(body)? {
        Value::Array(items) => Ok(items),
        _ => Err(ParseError::NotArray),
    }
}

/// `["alice", "bob"]` -> `["alice", "bob"]`
pub fn aliases(body: &str) -> Result<Vec<String>, ParseError> {
    array(body)?
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::String(alias) => Ok(alias),
            _ => Err(ParseError::BadItem {
                index,
                expected: "a string",
            }),
        })
        .collect()
}

/// `[{"message": "hi"}, {"message": "there"}]` -> `["hi", "there"]`
///
/// Any other fields on the objects are ignored.
pub fn channel_messages(body: &str) -> Result<Vec<String>, ParseError> {
    array(body)?
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item.get("message") {
            Some(Value::String(message)) => Ok(message.clone()),
            _ => Err(ParseError::BadItem {
                index,
                expected: "an object with a string message",
            }),
        })
        .collect()
}

pub fn posted_message(body: &str) -> Result<PostedMessage, ParseError> {
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_parses_aliases_in_order() {
        let parsed = aliases(r#"["alice","bob"]"#).unwrap();
        assert_eq!(parsed, vec!["alice", "bob"]);
        assert!(aliases("[]").unwrap().is_empty());
    }

    #[test]
    fn it_rejects_non_string_aliases() {
        let err = aliases(r#"["alice", 3]"#).unwrap_err();
        assert!(matches!(err, ParseError::BadItem { index: 1, .. }));
    }

    #[test]
    fn it_rejects_bodies_that_are_not_arrays() {
        assert!(matches!(aliases(r#"{"a": 1}"#), Err(ParseError::NotArray)));
        assert!(matches!(aliases("Registration ok"), Err(ParseError::NotJson(_))));
    }

    #[test]
    fn it_extracts_channel_message_text() {
        let body = r#"[{"message":"hi","ctime":1},{"message":"there"}]"#;
        assert_eq!(channel_messages(body).unwrap(), vec!["hi", "there"]);
    }

    #[test]
    fn it_rejects_channel_items_without_message() {
        let err = channel_messages(r#"[{"message":"hi"},{"text":"oops"}]"#).unwrap_err();
        assert!(matches!(err, ParseError::BadItem { index: 1, .. }));

        let err = channel_messages(r#"["hi"]"#).unwrap_err();
        assert!(matches!(err, ParseError::BadItem { index: 0, .. }));
    }

    #[test]
    fn it_uses_one_name_per_mode() {
        use clap::ValueEnum;

        for mode in ParseMode::value_variants() {
            let name = mode.to_possible_value().unwrap().get_name().to_string();
            assert_eq!(mode.to_string(), name);
            assert_eq!(name.parse::<ParseMode>().unwrap(), *mode);
        }
    }

    #[test]
    fn it_applies_the_parse_mode() {
        let strict = ParseMode::Strict.apply("/alias", aliases("[1]"));
        assert!(matches!(
            strict,
            Err(ClientError::MalformedResponse { ref endpoint, .. }) if endpoint == "/alias"
        ));

        let lenient = ParseMode::Lenient.apply("/alias", aliases("[1]"));
        assert!(matches!(lenient, Ok(None)));

        let ok = ParseMode::Lenient.apply("/alias", aliases(r#"["x"]"#)).unwrap();
        assert_eq!(ok, Some(vec!["x".to_string()]));
    }
}
