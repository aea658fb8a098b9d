pub mod notice;
pub mod skill;

pub use notice::{DisplayNotice, FormatError, NoticeQuery, NoticeRecord};
pub use skill::{
    Button, ConversationalResponse, ListCard, ListItem, QuickReply, RequestError, SimpleText,
    SkillRequest,
};
