use axum::{
    Router,
    body::Body,
    extract::ConnectInfo,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use noticebot::config::Config;
use noticebot::domain::CategoryId;
use noticebot::models::{NoticeQuery, NoticeRecord};
use noticebot::services::NoticeSource;
use noticebot::state::SharedState;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

const CATEGORY_BASE: &str = "https://board.example.com/kr/notice.do";

struct StubSource {
    notices: Vec<NoticeRecord>,
    requested: Mutex<Vec<NoticeQuery>>,
}

#[async_trait::async_trait]
impl NoticeSource for StubSource {
    async fn fetch_notices(&self, query: &NoticeQuery, limit: usize) -> Vec<NoticeRecord> {
        self.requested.lock().unwrap().push(query.clone());
        if *query == NoticeQuery::Category(CategoryId::UNRESOLVED) {
            return Vec::new();
        }
        self.notices.iter().take(limit).cloned().collect()
    }

    fn page_url(&self, query: &NoticeQuery) -> String {
        match query {
            NoticeQuery::Latest => format!("{CATEGORY_BASE}?mode=list"),
            NoticeQuery::Category(id) => format!("{CATEGORY_BASE}?mode=list&srCategoryId={id}"),
            NoticeQuery::Keyword(keyword) => {
                format!("{CATEGORY_BASE}?mode=list&srSearchKey=title&srSearchVal={keyword}")
            }
        }
    }
}

fn notice(n: u32, title: &str) -> NoticeRecord {
    NoticeRecord {
        title: title.to_string(),
        writer: "총무팀".to_string(),
        date: format!("2024-03-{:02}", 10 + n),
        link: format!("{CATEGORY_BASE}?mode=view&articleNo={n}"),
    }
}

fn spawn_app(notices: Vec<NoticeRecord>) -> (Router, Arc<StubSource>) {
    let source = Arc::new(StubSource {
        notices,
        requested: Mutex::new(Vec::new()),
    });

    let shared = Arc::new(SharedState::with_source(Config::default(), source.clone()));
    let state = noticebot::api::create_app_state(shared, None);
    (noticebot::api::router(state), source)
}

fn peer(last_octet: u8) -> ConnectInfo<SocketAddr> {
    ConnectInfo(SocketAddr::from(([10, 0, 0, last_octet], 40_000)))
}

fn skill_request(uri: &str, from: u8, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .extension(peer(from))
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn simple_text(body: &serde_json::Value) -> &str {
    body["template"]["outputs"][0]["simpleText"]["text"]
        .as_str()
        .expect("simpleText output")
}

#[tokio::test]
async fn test_prompt_lists_nine_categories_in_order() {
    let (app, _) = spawn_app(vec![]);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/ask")
                .extension(peer(1))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["version"], "2.0");
    assert_eq!(simple_text(&body), "무슨 공지를 보고 싶으신가요?");

    let replies = body["template"]["quickReplies"].as_array().unwrap();
    let labels: Vec<&str> = replies
        .iter()
        .map(|r| r["label"].as_str().unwrap())
        .collect();
    assert_eq!(
        labels,
        vec![
            "공지사항",
            "회사공유일정",
            "주간메뉴표",
            "건의함",
            "이달의 우수사원",
            "업무공유",
            "경조사 알림",
            "기타",
            "행사",
        ]
    );
    assert!(replies.iter().all(|r| r["label"] == r["messageText"]));
}

#[tokio::test]
async fn test_listing_renders_list_card() {
    let long_title = "2024년 상반기 전사 워크숍 일정 및 참가 신청 방법에 대한 상세 안내";
    let (app, source) = spawn_app(vec![notice(1, "주간 회의록"), notice(2, long_title)]);

    let response = app
        .oneshot(skill_request(
            "/v1/ask/category",
            2,
            &serde_json::json!({"action": {"name": "show_category", "params": {"cate": "공지사항"}}}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let card = &body["template"]["outputs"][0]["listCard"];

    assert_eq!(card["header"]["title"], "공지사항 공지");

    let buttons = card["buttons"].as_array().unwrap();
    assert_eq!(buttons.len(), 2);
    assert_eq!(buttons[0]["action"], "share");
    assert_eq!(buttons[0]["label"], "공유하기");
    assert_eq!(buttons[1]["action"], "webLink");
    assert_eq!(buttons[1]["label"], "공지사항");
    assert_eq!(
        buttons[1]["webLinkUrl"],
        format!("{CATEGORY_BASE}?mode=list&srCategoryId=1")
    );

    let items = card["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["title"], "주간 회의록");
    assert_eq!(items[0]["description"], "총무팀 03-11");
    assert_eq!(
        items[0]["link"]["web"],
        format!("{CATEGORY_BASE}?mode=view&articleNo=1")
    );

    let truncated = items[1]["title"].as_str().unwrap();
    assert_eq!(truncated.chars().count(), 35);
    assert!(truncated.ends_with("..."));

    assert_eq!(
        *source.requested.lock().unwrap(),
        vec![NoticeQuery::Category(CategoryId::new(1))]
    );
}

#[tokio::test]
async fn test_listing_without_cate_returns_error_text() {
    let (app, source) = spawn_app(vec![notice(1, "주간 회의록")]);

    let response = app
        .oneshot(skill_request(
            "/v1/ask/category",
            3,
            &serde_json::json!({"action": {"params": {}}}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert!(simple_text(&body).contains("오류가 발생했습니다"));
    assert!(body["template"].get("quickReplies").is_none());
    assert!(source.requested.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_listing_with_non_string_cate_returns_error_text() {
    let (app, _) = spawn_app(vec![notice(1, "주간 회의록")]);

    let response = app
        .oneshot(skill_request(
            "/v1/ask/category",
            4,
            &serde_json::json!({"action": {"params": {"cate": ["공지사항"]}}}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(simple_text(&body).contains("오류가 발생했습니다"));
}

#[tokio::test]
async fn test_listing_with_garbage_body_returns_error_text() {
    let (app, _) = spawn_app(vec![notice(1, "주간 회의록")]);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/ask/category")
                .header(header::CONTENT_TYPE, "application/json")
                .extension(peer(5))
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(simple_text(&body).contains("오류가 발생했습니다"));
}

#[tokio::test]
async fn test_unknown_category_falls_back() {
    let (app, source) = spawn_app(vec![notice(1, "주간 회의록")]);

    let response = app
        .oneshot(skill_request(
            "/v1/ask/category",
            6,
            &serde_json::json!({"action": {"params": {"cate": "학사일정"}}}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(simple_text(&body).contains("서버 반응이 늦고 있네요"));
    assert_eq!(
        *source.requested.lock().unwrap(),
        vec![NoticeQuery::Category(CategoryId::UNRESOLVED)]
    );
}

#[tokio::test]
async fn test_empty_board_falls_back() {
    let (app, _) = spawn_app(vec![]);

    let response = app
        .oneshot(skill_request(
            "/v1/ask/category",
            7,
            &serde_json::json!({"action": {"params": {"cate": "행사"}}}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(simple_text(&body).contains("서버 반응이 늦고 있네요"));
    assert!(body["template"]["outputs"][0].get("listCard").is_none());
}

#[tokio::test]
async fn test_rapid_second_request_is_rate_limited() {
    let (app, source) = spawn_app(vec![notice(1, "주간 회의록")]);
    let body = serde_json::json!({"action": {"params": {"cate": "공지사항"}}});

    let first = app
        .clone()
        .oneshot(skill_request("/v1/ask/category", 8, &body))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .clone()
        .oneshot(skill_request("/v1/ask/category", 8, &body))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(second.headers()[header::RETRY_AFTER], "1");

    let text = second.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&text[..], b"You have reached maximum request limit.");

    // Rejected request never reached the board.
    assert_eq!(source.requested.lock().unwrap().len(), 1);

    let other_client = app
        .oneshot(skill_request("/v1/ask/category", 9, &body))
        .await
        .unwrap();
    assert_eq!(other_client.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_welcome_and_status() {
    let (app, _) = spawn_app(vec![]);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/v1")
                .extension(peer(10))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["Welcome"], "Server is running well.");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/status")
                .extension(peer(11))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["tracked_clients"], 2);
    assert_eq!(body["categories"].as_array().unwrap().len(), 9);
}

#[tokio::test]
async fn test_search_renders_matches() {
    let (app, source) = spawn_app(vec![notice(1, "장학금 신청 안내")]);

    let response = app
        .oneshot(skill_request(
            "/v1/search",
            12,
            &serde_json::json!({"action": {"params": {"keyword": " 장학금 "}}}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let card = &body["template"]["outputs"][0]["listCard"];

    assert_eq!(card["header"]["title"], "'장학금' 검색 결과");
    assert_eq!(card["items"][0]["title"], "장학금 신청 안내");
    assert_eq!(
        *source.requested.lock().unwrap(),
        vec![NoticeQuery::Keyword("장학금".to_string())]
    );
}

#[tokio::test]
async fn test_search_without_keyword_returns_error_text() {
    let (app, source) = spawn_app(vec![notice(1, "주간 회의록")]);

    let response = app
        .oneshot(skill_request(
            "/v1/search",
            13,
            &serde_json::json!({"action": {"params": {"keyword": ""}}}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(simple_text(&body).contains("오류가 발생했습니다"));
    assert!(source.requested.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_last_shows_newest_notice() {
    let (app, source) = spawn_app(vec![notice(1, "최신 글"), notice(2, "이전 글")]);

    let response = app
        .oneshot(skill_request("/v1/last", 14, &serde_json::json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let items = body["template"]["outputs"][0]["listCard"]["items"]
        .as_array()
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "최신 글");
    assert_eq!(*source.requested.lock().unwrap(), vec![NoticeQuery::Latest]);
}

#[tokio::test]
async fn test_today_lists_notices_posted_today() {
    let offset = Config::default().source.utc_offset();
    let today = chrono::Utc::now().with_timezone(&offset).date_naive();
    let old = NoticeRecord {
        date: "2000-01-01".to_string(),
        ..notice(9, "오래된 글")
    };
    let fresh = NoticeRecord {
        date: today.format("%Y-%m-%d").to_string(),
        ..notice(1, "오늘 글")
    };
    let (app, _) = spawn_app(vec![fresh, old]);

    let response = app
        .clone()
        .oneshot(skill_request("/v1/today", 15, &serde_json::json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let card = &body["template"]["outputs"][0]["listCard"];
    assert_eq!(card["header"]["title"], "오늘 공지");
    assert_eq!(card["items"].as_array().unwrap().len(), 1);
    assert_eq!(card["items"][0]["title"], "오늘 글");

    let response = app
        .oneshot(skill_request("/v1/today2", 16, &serde_json::json!({})))
        .await
        .unwrap();

    let body = json_body(response).await;
    assert_eq!(simple_text(&body), "더 보여드릴 오늘 공지가 없어요!");
}

#[tokio::test]
async fn test_raw_notices_dump() {
    let notices: Vec<NoticeRecord> = (1..=3).map(|n| notice(n, &format!("글 {n}"))).collect();
    let (app, _) = spawn_app(notices);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/notices/2")
                .extension(peer(17))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["title"], "글 1");
    assert_eq!(records[0]["writer"], "총무팀");
    assert_eq!(records[1]["date"], "2024-03-12");
}
