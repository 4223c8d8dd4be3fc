//! Search predicate construction
//!
//! `QueryBuilder` turns a free-text term and a set of type filters into a
//! `FilterPredicate` that every store understands. The term is always matched
//! as a literal, case-insensitive substring of the title.

use std::collections::BTreeSet;

use regex::Regex;

use crate::types::Question;

/// Case-insensitive literal substring match on the question title
#[derive(Debug, Clone)]
pub struct TitlePattern {
    term: String,
    regex: Option<Regex>,
}

impl TitlePattern {
    fn new(term: &str) -> Self {
        let source = format!("(?i){}", regex::escape(term));
        // Very long terms can exceed the compiled size limit
        let regex = Regex::new(&source).ok();
        Self {
            term: term.to_string(),
            regex,
        }
    }

    /// The literal term, untouched
    pub fn term(&self) -> &str {
        &self.term
    }

    /// The term as a SQL `LIKE` operand with `\` as the escape character
    pub fn like_pattern(&self) -> String {
        let mut escaped = String::with_capacity(self.term.len() + 2);
        escaped.push('%');
        for ch in self.term.chars() {
            if matches!(ch, '%' | '_' | '\\') {
                escaped.push('\\');
            }
            escaped.push(ch);
        }
        escaped.push('%');
        escaped
    }

    pub fn is_match(&self, title: &str) -> bool {
        match &self.regex {
            Some(regex) => regex.is_match(title),
            None => title.to_lowercase().contains(&self.term.to_lowercase()),
        }
    }
}

/// Predicate applied by a store when counting and fetching questions
#[derive(Debug, Clone, Default)]
pub struct FilterPredicate {
    pub title: Option<TitlePattern>,
    pub types: BTreeSet<String>,
}

impl FilterPredicate {
    /// A predicate that matches every question
    pub fn match_all() -> Self {
        Self::default()
    }

    pub fn is_match_all(&self) -> bool {
        self.title.is_none() && self.types.is_empty()
    }

    /// Evaluate the predicate against a question
    pub fn matches(&self, question: &Question) -> bool {
        if let Some(pattern) = &self.title {
            if !pattern.is_match(&question.title) {
                return false;
            }
        }

        self.types.is_empty() || self.types.contains(question.kind.as_str())
    }
}

/// Builds store predicates from user input
#[derive(Debug, Default, Clone, Copy)]
pub struct QueryBuilder;

impl QueryBuilder {
    /// Build a predicate from a search term and type filters
    ///
    /// # Arguments
    ///
    /// * `term` - Free text; surrounding whitespace is ignored
    /// * `types` - Type names; unknown names are kept and match nothing
    ///
    /// # Examples
    ///
    /// ```
    /// use questsearch_core::query::QueryBuilder;
    ///
    /// let predicate = QueryBuilder::build("a.b", &["MCQ".to_string()]);
    /// assert_eq!(predicate.title.unwrap().term(), "a.b");
    /// assert!(predicate.types.contains("MCQ"));
    /// ```
    pub fn build<S: AsRef<str>>(term: &str, types: &[S]) -> FilterPredicate {
        let term = term.trim();
        let title = (!term.is_empty()).then(|| TitlePattern::new(term));

        let types = types
            .iter()
            .map(|t| t.as_ref().trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        FilterPredicate { title, types }
    }
}
