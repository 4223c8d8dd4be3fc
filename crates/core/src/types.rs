//! Core type definitions for QuestSearch
//!
//! The store document (`Question`), its client-facing projection
//! (`QuestionView`), the sort vocabulary and the JSON envelope shared by the
//! server and the client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of question stored in the catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    Anagram,
    ContentOnly,
    Conversation,
    Mcq,
    ReadAlong,
}

impl QuestionType {
    /// All question types, in their canonical order
    pub const ALL: [QuestionType; 5] = [
        Self::Anagram,
        Self::ContentOnly,
        Self::Conversation,
        Self::Mcq,
        Self::ReadAlong,
    ];

    /// Wire representation of the type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anagram => "ANAGRAM",
            Self::ContentOnly => "CONTENT_ONLY",
            Self::Conversation => "CONVERSATION",
            Self::Mcq => "MCQ",
            Self::ReadAlong => "READ_ALONG",
        }
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for QuestionType {
    type Err = crate::QuestError;

    fn from_str(s: &str) -> crate::Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| crate::QuestError::validation(format!("Unknown question type: {}", s)))
    }
}

/// Granularity of an anagram question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnagramType {
    Word,
    Sentence,
}

impl AnagramType {
    /// Wire representation of the anagram type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Word => "WORD",
            Self::Sentence => "SENTENCE",
        }
    }
}

impl std::str::FromStr for AnagramType {
    type Err = crate::QuestError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "WORD" => Ok(Self::Word),
            "SENTENCE" => Ok(Self::Sentence),
            other => Err(crate::QuestError::validation(format!(
                "Unknown anagram type: {}",
                other
            ))),
        }
    }
}

/// A building block of an anagram question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub text: String,
    pub show_in_option: bool,
    pub is_answer: bool,
}

/// A selectable option of a multiple choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOption {
    pub text: String,
    pub is_correct_answer: bool,
}

/// A question as held by the document store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(default = "new_question_id")]
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anagram_type: Option<AnagramType>,
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

fn new_question_id() -> String {
    Uuid::new_v4().to_string()
}

/// The content a question actually uses, selected by its type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveContent<'a> {
    Blocks(&'a [Block]),
    Options(&'a [QuestionOption]),
    None,
}

impl Question {
    /// Create a question with a fresh id and creation time
    pub fn new<S: Into<String>>(title: S, kind: QuestionType) -> Self {
        Self {
            id: new_question_id(),
            title: title.into(),
            kind,
            anagram_type: None,
            blocks: Vec::new(),
            options: Vec::new(),
            solution: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_anagram_type(mut self, anagram_type: AnagramType) -> Self {
        self.anagram_type = Some(anagram_type);
        self
    }

    pub fn with_blocks(mut self, blocks: Vec<Block>) -> Self {
        self.blocks = blocks;
        self
    }

    pub fn with_options(mut self, options: Vec<QuestionOption>) -> Self {
        self.options = options;
        self
    }

    pub fn with_solution<S: Into<String>>(mut self, solution: S) -> Self {
        self.solution = Some(solution.into());
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Blocks for anagrams, options for MCQs, nothing for the other types
    pub fn active_content(&self) -> ActiveContent<'_> {
        match self.kind {
            QuestionType::Anagram => ActiveContent::Blocks(&self.blocks),
            QuestionType::Mcq => ActiveContent::Options(&self.options),
            _ => ActiveContent::None,
        }
    }

    /// Project the question onto the fields returned to clients
    pub fn view(&self) -> QuestionView {
        QuestionView {
            title: self.title.clone(),
            kind: self.kind,
            anagram_type: self.anagram_type,
            blocks: self.blocks.clone(),
            options: self.options.clone(),
            solution: self.solution.clone(),
        }
    }
}

/// Client-facing projection of a question
///
/// Store identity and timestamps are not part of the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anagram_type: Option<AnagramType>,
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
}

/// Fields a search may be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Title,
    Type,
    #[default]
    CreatedAt,
    AnagramType,
}

impl SortField {
    /// Allow-list of sortable fields, in baseline priority order
    pub const ALL: [SortField; 4] = [
        Self::Title,
        Self::Type,
        Self::CreatedAt,
        Self::AnagramType,
    ];

    /// Wire representation of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Type => "type",
            Self::CreatedAt => "createdAt",
            Self::AnagramType => "anagramType",
        }
    }

    /// Parse a wire name; `None` for anything outside the allow-list
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == name)
    }
}

impl std::fmt::Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pagination metadata of a search result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u64,
    pub total_items: u64,
    pub items_per_page: u32,
}

impl Pagination {
    /// Build pagination metadata; `total_pages` is `ceil(total / limit)`
    pub fn new(current_page: u32, items_per_page: u32, total_items: u64) -> Self {
        let total_pages = if items_per_page == 0 {
            0
        } else {
            total_items.div_ceil(u64::from(items_per_page))
        };

        Self {
            current_page,
            total_pages,
            total_items,
            items_per_page,
        }
    }

    /// Metadata for an empty result
    pub fn empty(items_per_page: u32) -> Self {
        Self::new(1, items_per_page, 0)
    }
}

/// Filters that were actually applied to a search
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppliedFilters {
    pub types: Vec<String>,
    pub sort: SortField,
    pub order: SortOrder,
}

/// Payload of a successful search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchData {
    pub questions: Vec<QuestionView>,
    pub pagination: Pagination,
    #[serde(default)]
    pub applied_filters: AppliedFilters,
}

impl SearchData {
    /// An empty result page
    pub fn empty(items_per_page: u32) -> Self {
        Self {
            questions: Vec::new(),
            pagination: Pagination::empty(items_per_page),
            applied_filters: AppliedFilters::default(),
        }
    }
}

/// JSON envelope used by every API response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<serde_json::Value>,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying `data`
    pub fn success<S: Into<String>>(data: T, message: S) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }

    /// Failed response with an optional error detail
    pub fn failure<S: Into<String>>(message: S, error: Option<serde_json::Value>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_type_wire_names() {
        let json = serde_json::to_string(&QuestionType::ContentOnly).unwrap();
        assert_eq!(json, "\"CONTENT_ONLY\"");

        let parsed: QuestionType = "READ_ALONG".parse().unwrap();
        assert_eq!(parsed, QuestionType::ReadAlong);
        assert!("read_along".parse::<QuestionType>().is_err());
    }

    #[test]
    fn test_active_content_follows_type() {
        let block = Block {
            text: "cat".to_string(),
            show_in_option: true,
            is_answer: true,
        };
        let anagram = Question::new("Arrange", QuestionType::Anagram)
            .with_anagram_type(AnagramType::Word)
            .with_blocks(vec![block.clone()]);
        assert_eq!(
            anagram.active_content(),
            ActiveContent::Blocks(std::slice::from_ref(&block))
        );

        let mcq = Question::new("Pick one", QuestionType::Mcq).with_options(vec![
            QuestionOption {
                text: "a".to_string(),
                is_correct_answer: true,
            },
        ]);
        assert!(matches!(mcq.active_content(), ActiveContent::Options(o) if o.len() == 1));

        let reading = Question::new("Read", QuestionType::ReadAlong);
        assert_eq!(reading.active_content(), ActiveContent::None);
    }

    #[test]
    fn test_question_view_omits_identity() {
        let question = Question::new("Cat facts", QuestionType::ContentOnly).with_solution("none");
        let json = serde_json::to_value(question.view()).unwrap();

        assert_eq!(json["title"], "Cat facts");
        assert_eq!(json["type"], "CONTENT_ONLY");
        assert!(json.get("id").is_none());
        assert!(json.get("createdAt").is_none());
    }

    #[test]
    fn test_question_deserializes_camel_case() {
        let json = r#"{
            "title": "Spell it",
            "type": "ANAGRAM",
            "anagramType": "SENTENCE",
            "blocks": [{"text": "a", "showInOption": true, "isAnswer": false}]
        }"#;
        let question: Question = serde_json::from_str(json).unwrap();
        assert_eq!(question.anagram_type, Some(AnagramType::Sentence));
        assert_eq!(question.blocks.len(), 1);
        assert!(!question.id.is_empty());
    }

    #[test]
    fn test_sort_field_allow_list() {
        assert_eq!(SortField::from_name("anagramType"), Some(SortField::AnagramType));
        assert_eq!(SortField::from_name("created_at"), None);
        assert_eq!(SortField::default(), SortField::CreatedAt);
        assert_eq!(SortOrder::default(), SortOrder::Desc);
    }

    #[test]
    fn test_pagination_total_pages() {
        assert_eq!(Pagination::new(1, 10, 15).total_pages, 2);
        assert_eq!(Pagination::new(1, 10, 20).total_pages, 2);
        assert_eq!(Pagination::new(1, 10, 21).total_pages, 3);
        assert_eq!(Pagination::new(1, 10, 0).total_pages, 0);
        assert_eq!(Pagination::new(1, 0, 5).total_pages, 0);
    }

    #[test]
    fn test_api_response_envelope() {
        let ok = ApiResponse::success(SearchData::empty(10), "done");
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["pagination"]["itemsPerPage"], 10);
        assert!(json.get("error").is_none());

        let failed: ApiResponse<SearchData> = ApiResponse::failure("nope", None);
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_search_envelope_parses_with_and_without_data() {
        let body = r#"{"success": false, "message": "Search query is required"}"#;
        let parsed: ApiResponse<SearchData> = serde_json::from_str(body).unwrap();
        assert!(!parsed.success);
        assert!(parsed.data.is_none());

        let ok = ApiResponse::success(SearchData::empty(10), "ok");
        let body = serde_json::to_string(&ok).unwrap();
        let parsed: ApiResponse<SearchData> = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed.data.unwrap().pagination.items_per_page, 10);
    }
}
