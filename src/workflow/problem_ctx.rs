//! 命令上下文
//!
//! 封装"我正在处理哪道题、用什么语言"这一信息

use std::fmt::Display;
use std::path::PathBuf;

use crate::models::{CodeSnippet, Question};
use crate::services::Workspace;

/// `fetch` 命令参数
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// 题目 key（titleSlug）
    pub problem_key: String,
    /// 语言标识；为空时使用配置中的默认语言
    pub lang: String,
}

/// `solve` 命令参数
#[derive(Debug, Clone, Default)]
pub struct SolveOptions {
    pub problem_key: String,
    pub lang: String,
    /// 编辑器退出后立即提交
    pub submit: bool,
}

/// `submit` 命令参数
#[derive(Debug, Clone, Default)]
pub struct SubmitOptions {
    pub problem_key: String,
    pub lang: String,
    /// 覆盖默认的 `./<problem-key>/solution.<ext>`
    pub file: Option<PathBuf>,
}

/// fetch-and-prepare 的结果
#[derive(Debug, Clone)]
pub struct PreparedSolution {
    pub workspace: Workspace,
    pub question: Question,
    pub lang: String,
    /// false 表示解答文件已存在，本次没有写入
    pub created_new_file: bool,
    pub snippet: CodeSnippet,
}

impl Display for PreparedSolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[题目 {} 语言 {} 文件 {}]",
            self.workspace.problem_key,
            self.lang,
            self.workspace.solution_path.display()
        )
    }
}
