/// Fixed reply vocabulary of the skill.
pub mod replies {
    pub const CATEGORY_PROMPT: &str = "무슨 공지를 보고 싶으신가요?";

    pub const LISTING_TITLE_SUFFIX: &str = "공지";

    pub const SHARE_BUTTON: &str = "공유하기";

    pub const REQUEST_ERROR: &str = "[ERROR] 오류가 발생했습니다.\n:( [Try Again] 다시 시도해 주세요!";

    pub const SOURCE_UNAVAILABLE: &str =
        " Somma.Inc 홈페이지 서버 반응이 늦고 있네요. 잠시 후 다시 시도해보세요. ";

    pub const RATE_LIMITED: &str = "You have reached maximum request limit.";

    pub const LATEST_TITLE: &str = "최근 공지";

    pub const ALL_NOTICES_BUTTON: &str = "전체 공지";

    pub const SEARCH_TITLE_SUFFIX: &str = "검색 결과";

    pub const NO_SEARCH_RESULTS: &str = "검색 결과가 없습니다. 다른 키워드로 검색해보세요.";

    pub const TODAY_TITLE: &str = "오늘 공지";

    pub const TODAY_MORE_TITLE: &str = "오늘 공지 더보기";

    pub const YESTERDAY_TITLE: &str = "어제 공지";

    pub const NO_NOTICES_TODAY: &str = "오늘은 올라온 공지가 없어요!";

    pub const NO_MORE_NOTICES_TODAY: &str = "더 보여드릴 오늘 공지가 없어요!";

    pub const NO_NOTICES_YESTERDAY: &str = "어제는 올라온 공지가 없어요!";
}

pub mod display {
    /// Titles longer than this many characters get truncated.
    pub const MAX_TITLE_CHARS: usize = 35;

    /// Characters kept before the ellipsis when truncating.
    pub const TRUNCATED_TITLE_CHARS: usize = 32;

    pub const ELLIPSIS: &str = "...";

    /// `YYYY-MM-DD` keeps its trailing `MM-DD`.
    pub const DATE_FRAGMENT_CHARS: usize = 5;
}

pub mod intervals {
    use std::time::Duration;

    pub const MIN_SWEEP: Duration = Duration::from_secs(1);

    /// Longest admission window a config may ask for.
    pub const MAX_WINDOW: Duration = Duration::from_secs(60 * 60);

    /// Longest lifetime of a client entry a config may ask for.
    pub const MAX_ENTRY_TTL: Duration = Duration::from_secs(24 * 60 * 60);
}
