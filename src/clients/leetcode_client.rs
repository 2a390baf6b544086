/// LeetCode 评测站客户端
///
/// 封装三个远程操作：GraphQL 查询题目、提交代码、查询一次判题状态。
/// 登录凭据按调用传入，客户端本身不持有任何可变的全局状态。
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, COOKIE, ORIGIN, REFERER, USER_AGENT};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::config::{LeetCodeAuth, DEFAULT_BASE_URL};
use crate::error::{AppError, AppResult};
use crate::models::question::{null_as_default, CodeSnippet, Question, TopicTag};
use crate::models::{SubmissionId, SubmissionResult, SubmitRequest};

const GRAPHQL_PATH: &str = "/graphql";
const HEADER_X_CSRFTOKEN: &str = "x-csrftoken";
const CONTENT_TYPE_JSON: &str = "application/json";
const CONTENT_TYPE_HTML: &str = "text/html";
const COOKIE_SESSION: &str = "LEETCODE_SESSION";
const COOKIE_CSRFTOKEN: &str = "csrftoken";

/// 错误响应体最多保留 8 KiB
const MAX_ERROR_BODY_BYTES: usize = 8 << 10;
const MAX_SUBMIT_BODY_BYTES: usize = 1 << 20;
const MAX_CHECK_BODY_BYTES: usize = 2 << 20;

const QUESTION_DATA_QUERY: &str = r#"
query questionData($titleSlug: String!) {
  question(titleSlug: $titleSlug) {
    questionId
    questionFrontendId
    title
    titleSlug
    difficulty
    content
    exampleTestcases
    sampleTestCase
    hints
    topicTags { name slug }
    codeSnippets { lang langSlug code }
  }
}
"#;

/// 评测站能力
///
/// 真实实现是 [`LeetCodeClient`]，测试中可以替换成假的实现。
#[async_trait]
pub trait JudgeClient: Send + Sync {
    /// 查询题目；`auth` 中有值时才附带 cookie
    async fn fetch_question(&self, title_slug: &str, auth: &LeetCodeAuth) -> AppResult<Question>;

    /// 提交代码，返回提交 ID
    async fn submit(&self, req: &SubmitRequest, auth: &LeetCodeAuth) -> AppResult<SubmissionId>;

    /// 查询一次判题状态（不重试，轮询逻辑见 `SubmissionPoller`）
    async fn check_submission(
        &self,
        submission_id: SubmissionId,
        auth: &LeetCodeAuth,
    ) -> AppResult<SubmissionResult>;
}

/// 客户端构造参数
#[derive(Clone, Debug, Default)]
pub struct ClientOptions {
    /// 为空时使用 https://leetcode.com
    pub base_url: String,
    /// 为空时不发送 User-Agent
    pub user_agent: String,
}

/// 基于 reqwest 的评测站客户端
pub struct LeetCodeClient {
    http: reqwest::Client,
    base_url: String,
    user_agent: String,
}

impl LeetCodeClient {
    /// 创建新的客户端
    pub fn new(options: ClientOptions) -> Self {
        Self::with_http(options, reqwest::Client::new())
    }

    /// 使用自定义的 reqwest::Client
    pub fn with_http(options: ClientOptions, http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: normalized_base_url(&options.base_url),
            user_agent: options.user_agent.trim().to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 通用请求头：Accept、User-Agent，以及已配置的 cookie / csrf
    fn decorate(&self, mut req: RequestBuilder, auth: &LeetCodeAuth) -> RequestBuilder {
        req = req.header(ACCEPT, CONTENT_TYPE_JSON);
        if !self.user_agent.is_empty() {
            req = req.header(USER_AGENT, &self.user_agent);
        }
        if auth.has_csrftoken() {
            req = req.header(HEADER_X_CSRFTOKEN, auth.csrftoken.trim());
        }
        if let Some(cookie) = cookie_header(auth) {
            req = req.header(COOKIE, cookie);
        }
        req
    }

    async fn send(&self, operation: &str, req: RequestBuilder) -> AppResult<Response> {
        req.send().await.map_err(|source| AppError::Transport {
            operation: operation.to_string(),
            source: source.without_url(),
        })
    }
}

#[async_trait]
impl JudgeClient for LeetCodeClient {
    async fn fetch_question(&self, title_slug: &str, auth: &LeetCodeAuth) -> AppResult<Question> {
        const OP: &str = "graphql";

        let title_slug = title_slug.trim();
        if title_slug.is_empty() {
            return Err(AppError::validation("titleSlug is required"));
        }

        let endpoint = format!("{}{}", self.base_url, GRAPHQL_PATH);
        let body = json!({
            "query": QUESTION_DATA_QUERY,
            "variables": { "titleSlug": title_slug },
        });

        debug!("查询题目: {}", title_slug);

        let req = self
            .decorate(self.http.post(&endpoint), auth)
            .header(CONTENT_TYPE, CONTENT_TYPE_JSON)
            .json(&body);
        let resp = self.send(OP, req).await?;
        let resp = classify(OP, resp, |s| s == StatusCode::OK, auth).await?;

        let bytes = read_bounded(OP, resp, usize::MAX).await?;
        let envelope: GraphQlEnvelope = serde_json::from_slice(&bytes).map_err(|source| {
            AppError::Decode {
                operation: OP.to_string(),
                source,
            }
        })?;

        if !envelope.errors.is_empty() {
            let messages: Vec<&str> = envelope
                .errors
                .iter()
                .map(|e| e.message.trim())
                .filter(|m| !m.is_empty())
                .collect();
            if messages.is_empty() {
                return Err(AppError::protocol(OP, "unknown graphql error"));
            }
            return Err(AppError::protocol(OP, messages.join("; ")));
        }

        let wire = envelope
            .data
            .and_then(|d| d.question)
            .ok_or_else(|| AppError::NotFound {
                slug: title_slug.to_string(),
            })?;

        debug!("题目已获取: {} ({} 个代码片段)", wire.title, wire.code_snippets.len());
        Ok(wire.into())
    }

    async fn submit(&self, req: &SubmitRequest, auth: &LeetCodeAuth) -> AppResult<SubmissionId> {
        const OP: &str = "submit";

        let title_slug = req.title_slug.trim();
        if title_slug.is_empty() {
            return Err(AppError::validation("titleSlug is required"));
        }
        let question_id = req.question_id.trim();
        if question_id.is_empty() {
            return Err(AppError::validation("questionID is required"));
        }
        let lang = req.lang_slug.trim();
        if lang.is_empty() {
            return Err(AppError::validation("lang is required"));
        }
        if req.source_code.trim().is_empty() {
            return Err(AppError::validation("typed_code is required"));
        }
        if !auth.has_session() {
            return Err(AppError::AuthRequired(
                "leetcode session cookie is required".to_string(),
            ));
        }

        let endpoint = format!("{}/problems/{}/submit/", self.base_url, title_slug);
        let referer = format!("{}/problems/{}/", self.base_url, title_slug);
        let body = json!({
            "lang": lang,
            "question_id": question_id,
            "typed_code": req.source_code,
        });

        debug!("提交代码: {} (lang={}, {} 字节)", title_slug, lang, req.source_code.len());

        let http_req = self
            .decorate(self.http.post(&endpoint), auth)
            .header(CONTENT_TYPE, CONTENT_TYPE_JSON)
            .header(REFERER, referer)
            .header(ORIGIN, &self.base_url)
            .json(&body);
        let resp = self.send(OP, http_req).await?;
        let resp = classify(OP, resp, |s| s.is_success(), auth).await?;

        let object = read_object(OP, resp, MAX_SUBMIT_BODY_BYTES).await?;

        let error = extract_string(&object, "error");
        if !error.is_empty() {
            return Err(AppError::protocol(OP, error));
        }

        match extract_i64(&object, "submission_id").and_then(SubmissionId::new) {
            Some(id) => {
                debug!("提交成功，submission_id={}", id);
                Ok(id)
            }
            None => {
                let message = extract_string(&object, "message");
                if message.is_empty() {
                    Err(AppError::protocol(OP, "missing submission_id"))
                } else {
                    Err(AppError::protocol(OP, message))
                }
            }
        }
    }

    async fn check_submission(
        &self,
        submission_id: SubmissionId,
        auth: &LeetCodeAuth,
    ) -> AppResult<SubmissionResult> {
        const OP: &str = "submission check";

        if !auth.has_session() {
            return Err(AppError::AuthRequired(
                "leetcode session cookie is required".to_string(),
            ));
        }

        let endpoint = format!("{}/submissions/detail/{}/check/", self.base_url, submission_id);
        let referer = format!("{}/submissions/detail/{}/", self.base_url, submission_id);

        let req = self
            .decorate(self.http.get(&endpoint), auth)
            .header(REFERER, referer);
        let resp = self.send(OP, req).await?;
        let resp = classify(OP, resp, |s| s == StatusCode::OK, auth).await?;

        let object = read_object(OP, resp, MAX_CHECK_BODY_BYTES).await?;

        Ok(SubmissionResult {
            state: extract_string(&object, "state"),
            status_message: extract_string(&object, "status_msg"),
            runtime: extract_string(&object, "runtime"),
            memory: extract_string(&object, "memory"),
            compile_error: extract_string(&object, "compile_error"),
            runtime_error: extract_string(&object, "runtime_error"),
        })
    }
}

// ========== GraphQL 响应结构 ==========

#[derive(Debug, Deserialize)]
struct GraphQlEnvelope {
    data: Option<GraphQlData>,
    #[serde(default, deserialize_with = "null_as_default")]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlData {
    question: Option<WireQuestion>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    #[serde(default, deserialize_with = "null_as_default")]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireQuestion {
    #[serde(default, deserialize_with = "null_as_default")]
    question_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    question_frontend_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    title_slug: String,
    #[serde(default, deserialize_with = "null_as_default")]
    difficulty: String,
    #[serde(default, deserialize_with = "null_as_default")]
    content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    example_testcases: String,
    #[serde(default, deserialize_with = "null_as_default")]
    sample_test_case: String,
    #[serde(default, deserialize_with = "null_as_default")]
    hints: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    topic_tags: Vec<TopicTag>,
    #[serde(default, deserialize_with = "null_as_default")]
    code_snippets: Vec<CodeSnippet>,
}

impl From<WireQuestion> for Question {
    fn from(w: WireQuestion) -> Self {
        Question {
            question_id: w.question_id,
            frontend_id: w.question_frontend_id,
            title: w.title,
            title_slug: w.title_slug,
            difficulty: w.difficulty,
            content_html: w.content,
            example_testcases: w.example_testcases,
            sample_test_case: w.sample_test_case,
            hints: w.hints,
            topic_tags: w.topic_tags,
            code_snippets: w.code_snippets,
        }
    }
}

// ========== 辅助函数 ==========

fn normalized_base_url(base_url: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    if base.is_empty() {
        DEFAULT_BASE_URL.to_string()
    } else {
        base.to_string()
    }
}

fn cookie_header(auth: &LeetCodeAuth) -> Option<String> {
    let mut parts = Vec::with_capacity(2);
    if auth.has_session() {
        parts.push(format!("{}={}", COOKIE_SESSION, auth.session.trim()));
    }
    if auth.has_csrftoken() {
        parts.push(format!("{}={}", COOKIE_CSRFTOKEN, auth.csrftoken.trim()));
    }
    (!parts.is_empty()).then(|| parts.join("; "))
}

/// 响应分类：HTML（反爬）优先于状态码检查
async fn classify(
    operation: &str,
    resp: Response,
    is_ok: fn(StatusCode) -> bool,
    auth: &LeetCodeAuth,
) -> AppResult<Response> {
    let status = resp.status();

    let is_html = resp
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase().contains(CONTENT_TYPE_HTML))
        .unwrap_or(false);
    if is_html {
        warn!("⚠️ {} 返回了 HTML (status {})，可能触发了反爬", operation, status.as_u16());
        return Err(AppError::AntiAutomation {
            operation: operation.to_string(),
            status: status.as_u16(),
        });
    }

    if !is_ok(status) {
        // 读取失败时只保留状态行
        let body = read_bounded(operation, resp, MAX_ERROR_BODY_BYTES)
            .await
            .unwrap_or_default();
        let mut snippet = redact(String::from_utf8_lossy(&body).trim(), auth);
        if snippet.is_empty() {
            snippet = status.to_string();
        }
        return Err(AppError::Status {
            operation: operation.to_string(),
            status: status.as_u16(),
            snippet,
        });
    }

    Ok(resp)
}

/// 读取响应体，最多 `limit` 字节
async fn read_bounded(operation: &str, mut resp: Response, limit: usize) -> AppResult<Vec<u8>> {
    let mut buf = Vec::new();
    while buf.len() < limit {
        let chunk = resp.chunk().await.map_err(|source| AppError::Transport {
            operation: operation.to_string(),
            source: source.without_url(),
        })?;
        match chunk {
            Some(bytes) => {
                let take = bytes.len().min(limit - buf.len());
                buf.extend_from_slice(&bytes[..take]);
            }
            None => break,
        }
    }
    Ok(buf)
}

async fn read_object(operation: &str, resp: Response, limit: usize) -> AppResult<Map<String, Value>> {
    let bytes = read_bounded(operation, resp, limit).await?;
    serde_json::from_slice(&bytes).map_err(|source| AppError::Decode {
        operation: operation.to_string(),
        source,
    })
}

/// 防止服务端把凭据原样回显到错误信息里
fn redact(text: &str, auth: &LeetCodeAuth) -> String {
    let mut out = text.to_string();
    for secret in [auth.session.trim(), auth.csrftoken.trim()] {
        if !secret.is_empty() {
            out = out.replace(secret, "[redacted]");
        }
    }
    out
}

/// 宽松地读取字符串字段：数字转成字符串，缺失或 null 为空串
fn extract_string(object: &Map<String, Value>, key: &str) -> String {
    match object.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string().trim().to_string(),
    }
}

fn extract_i64(object: &Map<String, Value>, key: &str) -> Option<i64> {
    match object.get(key)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
