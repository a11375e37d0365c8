//! Fixed keyword set and case-insensitive detection.

use std::sync::LazyLock;

use regex::Regex;

/// How a keyword is matched against the lower-cased body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Plain substring containment.
    Substring,
    /// Must be delimited by word boundaries on both sides.
    WholeWord,
}

/// The terms every sweep looks for, in reporting order.
const BUILTIN_KEYWORDS: &[(&str, MatchPolicy)] = &[
    ("crypto", MatchPolicy::Substring),
    ("bitcoin", MatchPolicy::Substring),
    ("ethereum", MatchPolicy::Substring),
    ("blockchain", MatchPolicy::Substring),
    // Telegram links; as a substring it would hit "format.ment" and friends.
    ("t.me", MatchPolicy::WholeWord),
];

static BUILTIN: LazyLock<KeywordSet> = LazyLock::new(|| KeywordSet::new(BUILTIN_KEYWORDS));

/// A single lower-case term and its match policy.
#[derive(Debug, Clone)]
pub struct Keyword {
    term: &'static str,
    policy: MatchPolicy,
    boundary: Option<Regex>,
}

impl Keyword {
    fn new(term: &'static str, policy: MatchPolicy) -> Self {
        let boundary = match policy {
            MatchPolicy::Substring => None,
            MatchPolicy::WholeWord => Some(
                Regex::new(&format!(r"\b{}\b", regex::escape(term)))
                    .expect("escaped keyword is a valid regex"),
            ),
        };

        Self {
            term,
            policy,
            boundary,
        }
    }

    /// The keyword text as reported in match records.
    pub fn term(&self) -> &'static str {
        self.term
    }

    /// How this keyword is matched.
    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// `lowered` must already be lower-cased.
    fn is_match(&self, lowered: &str) -> bool {
        match &self.boundary {
            Some(re) => re.is_match(lowered),
            None => lowered.contains(self.term),
        }
    }
}

/// Ordered, immutable set of keywords.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    keywords: Vec<Keyword>,
}

impl KeywordSet {
    fn new(entries: &[(&'static str, MatchPolicy)]) -> Self {
        Self {
            keywords: entries
                .iter()
                .map(|&(term, policy)| Keyword::new(term, policy))
                .collect(),
        }
    }

    /// The built-in set scanned by every sweep.
    pub fn builtin() -> &'static KeywordSet {
        &BUILTIN
    }

    /// Keywords in set order.
    pub fn iter(&self) -> impl Iterator<Item = &Keyword> {
        self.keywords.iter()
    }

    /// Return the keywords found in `body`, in set order.
    ///
    /// Matching is case-insensitive. An empty body matches nothing.
    pub fn detect(&self, body: &str) -> Vec<String> {
        if body.is_empty() {
            return Vec::new();
        }

        let lowered = body.to_lowercase();
        self.keywords
            .iter()
            .filter(|kw| kw.is_match(&lowered))
            .map(|kw| kw.term.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(body: &str) -> Vec<String> {
        KeywordSet::builtin().detect(body)
    }

    #[test]
    fn builtin_order() {
        let terms: Vec<&str> = KeywordSet::builtin().iter().map(Keyword::term).collect();
        assert_eq!(terms, ["crypto", "bitcoin", "ethereum", "blockchain", "t.me"]);
        assert_eq!(
            KeywordSet::builtin().iter().last().map(Keyword::policy),
            Some(MatchPolicy::WholeWord)
        );
    }

    #[test]
    fn mixed_case_is_detected() {
        assert_eq!(detect("Buy Bitcoin now"), ["bitcoin"]);
        assert_eq!(detect("ETHEREUM wallet"), ["ethereum"]);
    }

    #[test]
    fn results_follow_set_order_not_body_order() {
        let body = "t.me/channel blockchain ethereum bitcoin crypto";
        assert_eq!(
            detect(body),
            ["crypto", "bitcoin", "ethereum", "blockchain", "t.me"]
        );
    }

    #[test]
    fn repeated_terms_reported_once() {
        assert_eq!(detect("bitcoin bitcoin BITCOIN"), ["bitcoin"]);
    }

    #[test]
    fn substring_keywords_match_inside_words() {
        assert_eq!(detect("cryptocurrency exchange"), ["crypto"]);
    }

    #[test]
    fn telegram_link_matches_as_word() {
        assert_eq!(detect("visit t.me/example"), ["t.me"]);
        assert_eq!(detect("join: https://t.me/+abc"), ["t.me"]);
        assert_eq!(detect("T.ME/Shouting"), ["t.me"]);
    }

    #[test]
    fn telegram_substring_does_not_match() {
        assert!(detect("format.ment").is_empty());
        assert!(detect("at.meeting tomorrow").is_empty());
        assert!(detect("t.mention").is_empty());
    }

    #[test]
    fn nothing_matches_plain_text() {
        assert!(detect("hello world, nothing to see here").is_empty());
        assert!(detect("").is_empty());
    }

    #[test]
    fn output_is_subset_without_duplicates() {
        let bodies = [
            "crypto",
            "Crypto BITCOIN t.me t.me",
            "format.ment blockchainblockchain",
            "ethereum, t.me; bitcoin. crypto!",
        ];
        let all: Vec<&str> = KeywordSet::builtin().iter().map(Keyword::term).collect();

        for body in bodies {
            let found = detect(body);
            let positions: Vec<usize> = found
                .iter()
                .map(|kw| all.iter().position(|t| *t == kw.as_str()).expect("keyword from set"))
                .collect();
            assert!(
                positions.windows(2).all(|w| w[0] < w[1]),
                "{body:?} -> {found:?} not in set order or duplicated"
            );
        }
    }
}
