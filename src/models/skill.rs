//! Chat platform skill payloads.
//!
//! Inbound webhooks arrive as [`SkillRequest`]. Replies are a
//! [`ConversationalResponse`], which serializes into the platform's
//! `version 2.0` template envelope.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

const SKILL_VERSION: &str = "2.0";

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("Missing action parameter '{0}'")]
    MissingParam(&'static str),

    #[error("Action parameter '{0}' is not a string")]
    NotAString(&'static str),

    #[error("Action parameter '{0}' is blank")]
    Blank(&'static str),
}

/// Webhook body sent by the chat platform. Only `action.params` is read.
#[derive(Debug, Default, Deserialize)]
pub struct SkillRequest {
    #[serde(default)]
    pub action: SkillAction,
}

#[derive(Debug, Default, Deserialize)]
pub struct SkillAction {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub params: Map<String, Value>,
}

impl SkillRequest {
    pub fn param_str(&self, name: &'static str) -> Result<&str, RequestError> {
        match self.action.params.get(name) {
            None | Some(Value::Null) => Err(RequestError::MissingParam(name)),
            Some(Value::String(s)) => Ok(s),
            Some(_) => Err(RequestError::NotAString(name)),
        }
    }

    /// The `cate` parameter filled in by the category intent.
    pub fn category_label(&self) -> Result<&str, RequestError> {
        self.param_str("cate")
    }

    /// The trimmed `keyword` parameter filled in by the search intent.
    pub fn search_keyword(&self) -> Result<&str, RequestError> {
        let keyword = self.param_str("keyword")?.trim();
        if keyword.is_empty() {
            return Err(RequestError::Blank("keyword"));
        }
        Ok(keyword)
    }
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickReply {
    pub label: String,
    #[serde(rename = "messageText")]
    pub value: String,
    action: &'static str,
}

impl QuickReply {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            action: "message",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Button {
    Share {
        label: String,
    },
    WebLink {
        label: String,
        #[serde(rename = "webLinkUrl")]
        url: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub image_url: String,
    #[serde(serialize_with = "web_link")]
    pub link: String,
}

fn web_link<S: Serializer>(link: &str, serializer: S) -> Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    struct Link<'a> {
        web: &'a str,
    }
    Link { web: link }.serialize(serializer)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleText {
    pub message: String,
    pub quick_replies: Vec<QuickReply>,
}

impl SimpleText {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            quick_replies: Vec::new(),
        }
    }

    #[must_use]
    pub fn quick_reply(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.quick_replies.push(QuickReply::new(label, value));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCard {
    pub title: String,
    pub buttons: Vec<Button>,
    pub items: Vec<ListItem>,
}

impl ListCard {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            buttons: Vec::new(),
            items: Vec::new(),
        }
    }
}

/// A reply is either plain text with suggestions or a list card, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationalResponse {
    SimpleText(SimpleText),
    ListCard(ListCard),
}

impl From<SimpleText> for ConversationalResponse {
    fn from(text: SimpleText) -> Self {
        Self::SimpleText(text)
    }
}

impl From<ListCard> for ConversationalResponse {
    fn from(card: ListCard) -> Self {
        Self::ListCard(card)
    }
}

impl ConversationalResponse {
    #[must_use]
    pub const fn as_simple_text(&self) -> Option<&SimpleText> {
        match self {
            Self::SimpleText(text) => Some(text),
            Self::ListCard(_) => None,
        }
    }

    #[must_use]
    pub const fn as_list_card(&self) -> Option<&ListCard> {
        match self {
            Self::ListCard(card) => Some(card),
            Self::SimpleText(_) => None,
        }
    }
}

#[derive(Serialize)]
struct Envelope<'a> {
    version: &'static str,
    template: Template<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Template<'a> {
    outputs: [Output<'a>; 1],
    #[serde(skip_serializing_if = "<[QuickReply]>::is_empty")]
    quick_replies: &'a [QuickReply],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
enum Output<'a> {
    SimpleText { text: &'a str },
    ListCard(ListCardBody<'a>),
}

#[derive(Serialize)]
struct ListCardBody<'a> {
    header: Header<'a>,
    items: &'a [ListItem],
    #[serde(skip_serializing_if = "<[Button]>::is_empty")]
    buttons: &'a [Button],
}

#[derive(Serialize)]
struct Header<'a> {
    title: &'a str,
}

impl Serialize for ConversationalResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let template = match self {
            Self::SimpleText(text) => Template {
                outputs: [Output::SimpleText {
                    text: &text.message,
                }],
                quick_replies: &text.quick_replies,
            },
            Self::ListCard(card) => Template {
                outputs: [Output::ListCard(ListCardBody {
                    header: Header { title: &card.title },
                    items: &card.items,
                    buttons: &card.buttons,
                })],
                quick_replies: &[],
            },
        };

        Envelope {
            version: SKILL_VERSION,
            template,
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_label_parsing() {
        let req: SkillRequest =
            serde_json::from_value(json!({"action": {"params": {"cate": "공지사항"}}})).unwrap();
        assert_eq!(req.category_label(), Ok("공지사항"));

        let req: SkillRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(req.category_label(), Err(RequestError::MissingParam("cate")));

        let req: SkillRequest =
            serde_json::from_value(json!({"action": {"params": {"cate": null}}})).unwrap();
        assert_eq!(req.category_label(), Err(RequestError::MissingParam("cate")));

        let req: SkillRequest =
            serde_json::from_value(json!({"action": {"params": {"cate": 3}}})).unwrap();
        assert_eq!(req.category_label(), Err(RequestError::NotAString("cate")));
    }

    #[test]
    fn test_search_keyword_parsing() {
        let req: SkillRequest =
            serde_json::from_value(json!({"action": {"params": {"keyword": "  장학금 "}}}))
                .unwrap();
        assert_eq!(req.search_keyword(), Ok("장학금"));

        let req: SkillRequest =
            serde_json::from_value(json!({"action": {"params": {"keyword": "   "}}})).unwrap();
        assert_eq!(req.search_keyword(), Err(RequestError::Blank("keyword")));

        let req: SkillRequest =
            serde_json::from_value(json!({"action": {"params": {"cate": "행사"}}})).unwrap();
        assert_eq!(req.search_keyword(), Err(RequestError::MissingParam("keyword")));
    }

    #[test]
    fn test_simple_text_envelope() {
        let response: ConversationalResponse =
            SimpleText::new("hello").quick_reply("a", "b").into();

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({
                "version": "2.0",
                "template": {
                    "outputs": [{"simpleText": {"text": "hello"}}],
                    "quickReplies": [{"label": "a", "messageText": "b", "action": "message"}]
                }
            })
        );
    }

    #[test]
    fn test_simple_text_without_replies_omits_field() {
        let response: ConversationalResponse = SimpleText::new("sorry").into();
        let value = serde_json::to_value(&response).unwrap();

        assert!(value["template"].get("quickReplies").is_none());
    }

    #[test]
    fn test_list_card_envelope() {
        let mut card = ListCard::new("공지사항 공지");
        card.buttons.push(Button::Share {
            label: "공유하기".to_string(),
        });
        card.buttons.push(Button::WebLink {
            label: "공지사항".to_string(),
            url: "https://example.com/list".to_string(),
        });
        card.items.push(ListItem {
            title: "t".to_string(),
            description: "d".to_string(),
            image_url: String::new(),
            link: "https://example.com/1".to_string(),
        });

        let value = serde_json::to_value(ConversationalResponse::from(card)).unwrap();
        let body = &value["template"]["outputs"][0]["listCard"];

        assert_eq!(body["header"]["title"], "공지사항 공지");
        assert_eq!(body["buttons"][0], json!({"action": "share", "label": "공유하기"}));
        assert_eq!(
            body["buttons"][1],
            json!({"action": "webLink", "label": "공지사항", "webLinkUrl": "https://example.com/list"})
        );
        assert_eq!(
            body["items"][0],
            json!({"title": "t", "description": "d", "link": {"web": "https://example.com/1"}})
        );
        assert!(value["template"].get("quickReplies").is_none());
    }
}
