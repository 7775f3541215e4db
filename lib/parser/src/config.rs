use regex::Regex;
use std::sync::LazyLock;

/// IRIs, quoted strings (with escapes), datatype suffixes, numbers starting with a dot, single
/// punctuation characters, bare words not ending with a dot, and finally any other lone character
/// so that nothing is dropped silently.
const TURTLE_SPLIT_PATTERN: &str = concat!(
    r#"<[^>\s]*>"#,
    r#"|"(?:[^"\\]|\\.)*""#,
    r#"|'(?:[^'\\]|\\.)*'"#,
    r#"|\^\^(?:<[^>\s]*>|[^\s<>"',;\[\]]*[^\s<>"',;\[\].])"#,
    r#"|\.\d+(?:[eE][+-]?\d+)?"#,
    r#"|[.,;\[\]]"#,
    r#"|[^\s<>"',;\[\]]*[^\s<>"',;\[\].]"#,
    r#"|\S"#,
);

#[allow(clippy::expect_used, reason = "The pattern is a valid constant")]
static TURTLE_SPLIT_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TURTLE_SPLIT_PATTERN).expect("valid split pattern"));

/// The rule used by the lexer to cut a line into word segments.
///
/// Every non-overlapping match of the regular expression is one segment.
#[derive(Clone, Debug)]
pub struct SplitRule(Regex);

impl SplitRule {
    /// Creates a rule from a regular expression.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self(Regex::new(pattern)?))
    }

    /// The rule for the Turtle and N-Triples subsets.
    ///
    /// IRIs in angle brackets and quoted literals are kept atomic, `^^` suffixes are split off a
    /// literal as one segment, and statement punctuation is split off bare words. A dot followed
    /// by a digit starts a number such as `.5`.
    pub fn turtle() -> Self {
        Self(TURTLE_SPLIT_RULE.clone())
    }

    pub(crate) fn regex(&self) -> &Regex {
        &self.0
    }
}

impl Default for SplitRule {
    fn default() -> Self {
        Self::turtle()
    }
}

impl From<Regex> for SplitRule {
    fn from(regex: Regex) -> Self {
        Self(regex)
    }
}

/// Holds the configuration of the parsers.
#[derive(Clone, Debug)]
pub struct ParserConfig {
    /// The rule used to cut lines into word segments.
    pub split_rule: SplitRule,
    /// The prefix of the identifiers of blank nodes allocated for property lists.
    pub blank_node_prefix: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            split_rule: SplitRule::default(),
            blank_node_prefix: "b".to_owned(),
        }
    }
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_split_rule(mut self, split_rule: SplitRule) -> Self {
        self.split_rule = split_rule;
        self
    }

    #[must_use]
    pub fn with_blank_node_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.blank_node_prefix = prefix.into();
        self
    }
}
