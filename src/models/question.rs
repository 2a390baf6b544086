use serde::{Deserialize, Deserializer, Serialize};

/// 题目快照
///
/// 由一次成功的 fetch 创建，之后不再修改。
/// `title_slug` 是贯穿 fetch / 工作区 / 提交的主键。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Question {
    pub question_id: String,
    pub frontend_id: String,
    pub title: String,
    pub title_slug: String,
    pub difficulty: String,
    /// 题面 HTML（线上字段名为 `content`）
    pub content_html: String,
    pub example_testcases: String,
    pub sample_test_case: String,
    pub hints: Vec<String>,
    pub topic_tags: Vec<TopicTag>,
    pub code_snippets: Vec<CodeSnippet>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicTag {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
}

/// 各语言的初始代码片段
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSnippet {
    /// 给人看的语言名，例如 "C++"
    #[serde(rename = "lang", default, deserialize_with = "null_as_default")]
    pub human_lang: String,
    /// 提交时使用的语言标识，例如 "cpp"
    #[serde(rename = "langSlug", default, deserialize_with = "null_as_default")]
    pub lang_slug: String,
    /// 初始代码（原样保留）
    #[serde(rename = "code", default, deserialize_with = "null_as_default")]
    pub starter_code: String,
}

impl Question {
    /// 按语言标识查找代码片段（忽略大小写，精确匹配）
    pub fn snippet_for(&self, lang: &str) -> Option<&CodeSnippet> {
        let lang = lang.trim();
        self.code_snippets
            .iter()
            .find(|s| s.lang_slug.trim().eq_ignore_ascii_case(lang))
    }

    /// 所有非空的语言标识，保持服务端顺序
    pub fn available_langs(&self) -> Vec<&str> {
        self.code_snippets
            .iter()
            .map(|s| s.lang_slug.trim())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// GraphQL 里任何字段都可能是 null，统一按默认值处理
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
