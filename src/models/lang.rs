//! 语言表
//!
//! langSlug → 文件扩展名 / 注释前缀 的固定映射。
//! 评测站新增语言时需要在这里手动补充。

use crate::error::{AppError, AppResult};

/// 未指定语言时的兜底值
pub const DEFAULT_LANG: &str = "cpp";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LangInfo {
    pub slug: &'static str,
    /// 含前导点，例如 ".cpp"
    pub extension: &'static str,
    pub comment_prefix: &'static str,
}

const LANGS: &[LangInfo] = &[
    LangInfo { slug: "cpp", extension: ".cpp", comment_prefix: "// " },
    LangInfo { slug: "golang", extension: ".go", comment_prefix: "// " },
    LangInfo { slug: "python3", extension: ".py", comment_prefix: "# " },
    LangInfo { slug: "javascript", extension: ".js", comment_prefix: "// " },
    LangInfo { slug: "typescript", extension: ".ts", comment_prefix: "// " },
];

/// 查找语言信息（忽略大小写）
pub fn lookup(lang: &str) -> AppResult<LangInfo> {
    let lang = lang.trim();
    if lang.is_empty() {
        return Err(AppError::validation("lang is required"));
    }
    LANGS
        .iter()
        .find(|info| info.slug.eq_ignore_ascii_case(lang))
        .copied()
        .ok_or_else(|| AppError::validation(format!("unsupported language slug: {:?}", lang)))
}

/// 注释前缀；未知语言退回 `// `
pub fn comment_prefix(lang: &str) -> &'static str {
    lookup(lang).map(|info| info.comment_prefix).unwrap_or("// ")
}
