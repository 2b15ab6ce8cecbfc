use std::fmt;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("query is empty")]
pub struct EmptyQuery;

/// Trimmed, non-empty search text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query(String);

impl Query {
    pub fn parse(raw: &str) -> Result<Self, EmptyQuery> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(EmptyQuery);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{EmptyQuery, Query};

    #[test]
    fn parse_trims_surrounding_whitespace() {
        let query = Query::parse("  cats \t").expect("query should parse");
        assert_eq!(query.as_str(), "cats");
        assert_eq!(query, Query::parse("cats").expect("query should parse"));
    }

    #[test]
    fn parse_rejects_blank_input() {
        assert_eq!(Query::parse(""), Err(EmptyQuery));
        assert_eq!(Query::parse("   \n"), Err(EmptyQuery));
    }
}
