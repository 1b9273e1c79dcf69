/// 推荐窗口半宽：offset-window 模式的评分窗口为中心值 ±100
pub const RATING_WINDOW_HALF_WIDTH: i32 = 100;

/// offset-window 模式默认返回数量
pub const DEFAULT_RECOMMEND_LIMIT: usize = 20;

/// absolute-range 模式默认返回数量
pub const DEFAULT_RANGE_LIMIT: usize = 200;

/// 两种模式允许的最大返回数量
pub const MAX_PROBLEMS_LIMIT: usize = 1000;

/// 未绑定 handle 或 handle 无评分时的基线评分
pub const DEFAULT_BASELINE_RATING: i32 = 1200;

/// 每用户最大并发会话数
pub const MAX_SESSIONS_PER_USER: usize = 10;

/// Canonical topic-tag list served by `GET /api/problems/tags`.
/// Mirrors the upstream problemset vocabulary; the filter itself accepts
/// arbitrary tags, this list only drives the topic picker.
pub const PROBLEM_TAGS: &[&str] = &[
    "implementation",
    "math",
    "greedy",
    "dp",
    "data structures",
    "brute force",
    "constructive algorithms",
    "graphs",
    "sortings",
    "binary search",
    "dfs and similar",
    "trees",
    "strings",
    "number theory",
    "combinatorics",
    "geometry",
    "bitmasks",
    "two pointers",
    "dsu",
    "shortest paths",
    "probabilities",
    "divide and conquer",
    "hashing",
    "games",
    "flows",
    "interactive",
    "matrices",
    "string suffix structures",
    "fft",
    "expression parsing",
    "ternary search",
    "meet-in-the-middle",
    "2-sat",
    "chinese remainder theorem",
    "schedules",
];
