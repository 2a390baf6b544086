//! 题面渲染 - 业务能力层
//!
//! 把题目的 HTML 题面转换成解答文件顶部的注释块。

use regex::Regex;
use scraper::Html;

use crate::error::{AppError, AppResult};
use crate::models::{lang, Question, TopicTag};

/// 题面渲染能力
pub trait HeaderRenderer: Send + Sync {
    /// 返回适合该语言的注释块，每行都带注释前缀
    fn render_header(&self, lang: &str, question: &Question) -> AppResult<String>;
}

/// HTML 题面渲染器
pub struct HtmlRenderer {
    br: Regex,
    pre_open: Regex,
    pre_close: Regex,
    li_open: Regex,
    li_close: Regex,
    block_close: Regex,
    many_newlines: Regex,
}

impl HtmlRenderer {
    pub fn new() -> AppResult<Self> {
        let re = |pattern: &str| Regex::new(pattern).map_err(|e| AppError::Render(e.to_string()));
        Ok(Self {
            br: re(r"(?i)<br\s*/?>")?,
            pre_open: re(r"(?i)<pre[^>]*>")?,
            pre_close: re(r"(?i)</pre>")?,
            li_open: re(r"(?i)<li[^>]*>")?,
            li_close: re(r"(?i)</li>")?,
            block_close: re(r"(?i)</(p|div|section|h[1-6]|ul|ol|table|tr|blockquote)>")?,
            many_newlines: re(r"\n{3,}")?,
        })
    }

    /// 简单的 HTML → 纯文本转换
    pub fn html_to_text(&self, html: &str) -> String {
        let s = html.trim();
        if s.is_empty() {
            return String::new();
        }

        let s = self.br.replace_all(s, "\n");
        let s = self.pre_open.replace_all(&s, "\n\n");
        let s = self.pre_close.replace_all(&s, "\n\n");
        let s = self.li_open.replace_all(&s, "\n- ");
        let s = self.li_close.replace_all(&s, "\n");
        let s = self.block_close.replace_all(&s, "\n\n");

        // 交给 HTML 解析器去标签：实体在文本节点里解码，"&lt;int&gt;" 不会被当成标签
        let s = Html::parse_fragment(&s)
            .root_element()
            .text()
            .collect::<String>();

        let s = s
            .replace("\r\n", "\n")
            .replace('\r', "\n")
            .replace('\u{a0}', " ");

        // 保留行首空白（代码块），去掉行尾空白
        let s = s.lines().map(str::trim_end).collect::<Vec<_>>().join("\n");
        let s = self.many_newlines.replace_all(&s, "\n\n");

        s.trim().to_string()
    }

    fn format_hints(&self, hints: &[String]) -> String {
        hints
            .iter()
            .map(|h| self.html_to_text(h))
            .filter(|h| !h.is_empty())
            .map(|h| format!("- {}", h))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl HeaderRenderer for HtmlRenderer {
    fn render_header(&self, lang: &str, question: &Question) -> AppResult<String> {
        let mut body = String::new();

        let title = question.title.trim();
        let difficulty = question.difficulty.trim();
        match (title.is_empty(), difficulty.is_empty()) {
            (false, false) => body.push_str(&format!("{} ({})\n", title, difficulty)),
            (false, true) => body.push_str(&format!("{}\n", title)),
            _ => body.push_str("LeetCode Problem\n"),
        }

        let slug = question.title_slug.trim();
        if !slug.is_empty() {
            body.push_str(&format!("URL: https://leetcode.com/problems/{}/\n", slug));
        }

        let tags = join_tags(&question.topic_tags);
        if !tags.is_empty() {
            body.push_str(&format!("Tags: {}\n", tags));
        }

        body.push('\n');
        let statement = self.html_to_text(&question.content_html);
        if !statement.is_empty() {
            body.push_str(&statement);
            body.push('\n');
        }

        let hints = self.format_hints(&question.hints);
        if !hints.is_empty() {
            body.push_str("\nHints:\n");
            body.push_str(&hints);
            body.push('\n');
        }

        Ok(prefix_lines(lang::comment_prefix(lang), body.trim()))
    }
}

fn join_tags(tags: &[TopicTag]) -> String {
    tags.iter()
        .map(|t| t.name.trim())
        .filter(|n| !n.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

fn prefix_lines(prefix: &str, body: &str) -> String {
    if body.trim().is_empty() {
        return format!("{}\n", prefix);
    }
    body.split('\n')
        .map(|line| format!("{}{}\n", prefix, line))
        .collect()
}
