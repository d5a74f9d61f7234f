//! Named regular-expression patterns searched alongside phrases.

use std::fmt;

use regex::Regex;

use crate::analysis::token::Token;
use crate::error::Result;

/// A compiled, named pattern.
///
/// # Examples
///
/// ```
/// use morphmark::search::regex::RegexPattern;
///
/// let pattern = RegexPattern::new("phone", r"\+7 \d{3} \d{3}-\d{2}-\d{2}").unwrap();
/// assert_eq!(pattern.name(), "phone");
/// ```
#[derive(Clone, Debug)]
pub struct RegexPattern {
    name: String,
    regex: Regex,
}

impl RegexPattern {
    pub fn new<S: Into<String>>(name: S, pattern: &str) -> Result<Self> {
        Ok(RegexPattern {
            name: name.into(),
            regex: Regex::new(pattern)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Token ranges `(first, last)` covering each non-empty hit of the
    /// pattern in the concatenated text of `tokens`.
    ///
    /// `text` must be the concatenation of `tokens`, so token byte offsets
    /// index into it.
    pub fn find_token_ranges(&self, text: &str, tokens: &[Token]) -> Vec<(usize, usize)> {
        self.regex
            .find_iter(text)
            .filter(|m| !m.is_empty())
            .filter_map(|m| {
                let first = token_at_byte(tokens, m.start())?;
                let last = token_at_byte(tokens, m.end() - 1)?;
                Some((first, last))
            })
            .collect()
    }
}

impl fmt::Display for RegexPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.regex.as_str())
    }
}

/// Index of the token whose byte range contains `byte`.
fn token_at_byte(tokens: &[Token], byte: usize) -> Option<usize> {
    let index = tokens.partition_point(|t| t.byte_end <= byte);
    (index < tokens.len() && tokens[index].byte_start <= byte).then_some(index)
}
