//! 解题流程 - 流程层
//!
//! 核心职责：定义每个命令的完整处理流程，任何一步失败都会终止后续步骤
//!
//! - fetch：加载配置 → 查询题目 → 选代码片段 → 渲染题面 → 创建工作区 → 写解答文件
//! - solve：fetch 的全部步骤 → 打开编辑器 →（可选）submit
//! - submit：加载配置和凭据 → 加载工作区 → 读解答 → 重新查询题目 → 提交 → 轮询 → 输出
//!
//! 解答文件永远不会被覆盖，fetch 可以重复执行；submit 每次都会产生新的远程提交。

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::clients::JudgeClient;
use crate::config::{Config, ConfigStore};
use crate::error::{AppError, AppResult};
use crate::models::{CodeSnippet, PollPolicy, Question, SubmitRequest, DEFAULT_LANG};
use crate::services::{
    CancelToken, EditorRunner, HeaderRenderer, Printer, SubmissionPoller, WorkspaceManager,
};
use crate::utils::logging::truncate_text;
use crate::workflow::problem_ctx::{FetchOptions, PreparedSolution, SolveOptions, SubmitOptions};

/// 流程依赖的外部能力
pub struct Collaborators {
    pub config_store: Arc<dyn ConfigStore>,
    pub judge: Arc<dyn JudgeClient>,
    pub workspace: Arc<dyn WorkspaceManager>,
    pub renderer: Arc<dyn HeaderRenderer>,
    pub editor: Arc<dyn EditorRunner>,
    pub printer: Arc<dyn Printer>,
}

/// 解题流程
///
/// - 编排 fetch / solve / submit 三个命令
/// - 不直接做 I/O，只依赖各项能力（services / clients）
pub struct SolutionFlow {
    deps: Collaborators,
    poller: SubmissionPoller,
    root: PathBuf,
    poll_policy: PollPolicy,
    cancel: CancelToken,
}

impl SolutionFlow {
    /// 创建新的解题流程，工作区根目录为当前目录
    pub fn new(deps: Collaborators) -> Self {
        let poller = SubmissionPoller::new(deps.judge.clone());
        Self {
            deps,
            poller,
            root: PathBuf::from("."),
            poll_policy: PollPolicy::default(),
            cancel: CancelToken::new(),
        }
    }

    /// 指定工作区根目录
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.poll_policy = policy;
        self
    }

    /// 使用外部的取消信号（例如 Ctrl-C）
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// 查询题目并生成解答文件，不打开编辑器
    pub async fn fetch(&self, opts: &FetchOptions) -> AppResult<PreparedSolution> {
        let problem_key = require_problem_key(&opts.problem_key)?;
        let config = self.load_config_or_default().await?;

        let prepared = self.prepare_solution_file(&config, problem_key, &opts.lang).await?;

        self.deps.printer.print_question(&prepared.question)?;
        self.report_prepared(&prepared)?;
        Ok(prepared)
    }

    /// 生成解答文件，打开编辑器，可选地在编辑器退出后提交
    pub async fn solve(&self, opts: &SolveOptions) -> AppResult<PreparedSolution> {
        let problem_key = require_problem_key(&opts.problem_key)?;
        let config = self.load_config_or_default().await?;

        let prepared = self.prepare_solution_file(&config, problem_key, &opts.lang).await?;
        self.report_prepared(&prepared)?;

        self.deps
            .editor
            .open_file(&config.editor, &prepared.workspace.solution_path)
            .await?;
        debug!("编辑器已退出: {}", prepared);

        if opts.submit {
            info!("📤 编辑完成，开始提交 {}", prepared);
            self.submit(&SubmitOptions {
                problem_key: problem_key.to_string(),
                lang: prepared.lang.clone(),
                file: None,
            })
            .await?;
        }
        Ok(prepared)
    }

    /// 提交已存在工作区中的解答，并轮询判题结果
    pub async fn submit(&self, opts: &SubmitOptions) -> AppResult<()> {
        let problem_key = require_problem_key(&opts.problem_key)?;

        let config = match self.deps.config_store.load().await {
            Ok(config) => config,
            Err(AppError::ConfigNotFound { path }) => {
                return Err(AppError::AuthRequired(format!(
                    "config not found at {} (run: vleet config init, then set leetcode.session)",
                    path
                )))
            }
            Err(e) => return Err(e),
        };
        if !config.leetcode.has_session() {
            return Err(AppError::AuthRequired(
                "leetcode.session is not set in config (required for submit)".to_string(),
            ));
        }
        let auth = &config.leetcode;

        let lang = resolve_lang(&opts.lang, &config);
        let file_override = opts.file.as_deref().map(|p| p.to_string_lossy().to_string());

        let workspace = self
            .deps
            .workspace
            .load_workspace(&self.root, problem_key, &lang, file_override.as_deref())
            .await?;
        let source_code = self.deps.workspace.read_solution(&workspace).await?;
        debug!(
            "已读取解答 {} ({} 字节)",
            workspace.solution_path.display(),
            source_code.len()
        );

        // 提交需要最新的 questionId
        let question = self.deps.judge.fetch_question(problem_key, auth).await?;
        if question.question_id.trim().is_empty() {
            return Err(AppError::protocol(
                "graphql",
                format!("question id missing for {}", problem_key),
            ));
        }
        let title_slug = if question.title_slug.trim().is_empty() {
            problem_key.to_string()
        } else {
            question.title_slug.trim().to_string()
        };
        if !title_slug.eq_ignore_ascii_case(&workspace.problem_key) {
            return Err(AppError::validation(format!(
                "title slug mismatch: workspace {:?}, judge returned {:?}",
                workspace.problem_key, title_slug
            )));
        }

        info!("📤 提交 {} (lang={})", title_slug, lang);
        let submission_id = self
            .deps
            .judge
            .submit(
                &SubmitRequest {
                    title_slug,
                    question_id: question.question_id.clone(),
                    lang_slug: lang,
                    source_code,
                },
                auth,
            )
            .await?;

        info!("⏳ 等待判题结果 (submission {})", submission_id);
        let result = self
            .poller
            .poll(submission_id, auth, self.poll_policy, &self.cancel)
            .await?;

        self.deps.printer.print_submission_result(&result)?;
        Ok(())
    }

    /// fetch 和 solve 共用的准备步骤
    ///
    /// 工作区已存在时加载它并跳过写入，绝不覆盖已有的解答文件。
    async fn prepare_solution_file(
        &self,
        config: &Config,
        problem_key: &str,
        lang_flag: &str,
    ) -> AppResult<PreparedSolution> {
        let lang = resolve_lang(lang_flag, config);

        info!("🔍 查询题目: {} (lang={})", problem_key, lang);
        let question = self
            .deps
            .judge
            .fetch_question(problem_key, &config.leetcode)
            .await?;
        debug!(
            "题面预览: {}",
            truncate_text(&question.content_html, 80)
        );

        let snippet = select_snippet(&question, &lang)?.clone();
        let header = self.deps.renderer.render_header(&lang, &question)?;

        let created = self
            .deps
            .workspace
            .create_workspace(&self.root, &question, &lang, None)
            .await;

        let workspace = match created {
            Ok(workspace) => workspace,
            Err(e) if e.is_file_conflict() => {
                debug!("解答文件已存在，加载已有工作区");
                let workspace = self
                    .deps
                    .workspace
                    .load_workspace(&self.root, &question.title_slug, &lang, None)
                    .await?;
                return Ok(PreparedSolution {
                    workspace,
                    question,
                    lang,
                    created_new_file: false,
                    snippet,
                });
            }
            Err(e) => return Err(e),
        };

        let mut content = format!("{}\n{}", header, snippet.starter_code);
        if !content.ends_with('\n') {
            content.push('\n');
        }

        let created_new_file = match self.deps.workspace.write_solution(&workspace, &content).await {
            Ok(()) => true,
            // 另一个进程在创建工作区和写入之间抢先写了文件
            Err(e) if e.is_file_conflict() => {
                warn!("⚠️ 解答文件被并发创建: {}", workspace.solution_path.display());
                false
            }
            Err(e) => return Err(e),
        };

        Ok(PreparedSolution {
            workspace,
            question,
            lang,
            created_new_file,
            snippet,
        })
    }

    async fn load_config_or_default(&self) -> AppResult<Config> {
        match self.deps.config_store.load().await {
            Ok(config) => Ok(config),
            Err(e) if e.is_config_not_found() => {
                debug!("未找到配置文件，使用默认配置");
                Ok(Config::default())
            }
            Err(e) => Err(e),
        }
    }

    fn report_prepared(&self, prepared: &PreparedSolution) -> AppResult<()> {
        let path = prepared.workspace.solution_path.display();
        if prepared.created_new_file {
            info!("✓ 已生成解答文件 {}", prepared);
            self.deps.printer.print_notice(&format!("wrote solution: {}", path))
        } else {
            self.deps
                .printer
                .print_notice(&format!("solution already exists: {}", path))
        }
    }
}

fn require_problem_key(problem_key: &str) -> AppResult<&str> {
    let key = problem_key.trim();
    if key.is_empty() {
        return Err(AppError::validation("problem key (titleSlug) is required"));
    }
    Ok(key)
}

/// 语言优先级：命令行参数 > 配置默认值 > cpp
fn resolve_lang(flag: &str, config: &Config) -> String {
    [flag.trim(), config.default_lang.trim()]
        .into_iter()
        .find(|l| !l.is_empty())
        .unwrap_or(DEFAULT_LANG)
        .to_string()
}

/// 按语言选择代码片段（忽略大小写的精确匹配）
pub fn select_snippet<'a>(question: &'a Question, lang: &str) -> AppResult<&'a CodeSnippet> {
    let lang = lang.trim();
    if lang.is_empty() {
        return Err(AppError::validation("lang is required"));
    }
    if let Some(snippet) = question.snippet_for(lang) {
        return Ok(snippet);
    }

    let available = question.available_langs();
    if available.is_empty() {
        return Err(AppError::validation(
            "no code snippets available for this problem",
        ));
    }
    Err(AppError::validation(format!(
        "no snippet for lang {:?} (available: {})",
        lang,
        available.join(", ")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(slugs: &[&str]) -> Question {
        Question {
            code_snippets: slugs
                .iter()
                .map(|slug| CodeSnippet {
                    human_lang: slug.to_uppercase(),
                    lang_slug: slug.to_string(),
                    starter_code: format!("code for {}", slug),
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_select_snippet_case_insensitive() {
        let q = question(&["cpp", "python3"]);
        assert_eq!(
            select_snippet(&q, "PYTHON3").unwrap().starter_code,
            "code for python3"
        );
    }

    #[test]
    fn test_select_snippet_lists_available() {
        let q = question(&["cpp", "golang"]);
        let err = select_snippet(&q, "python3").unwrap_err();
        assert_eq!(
            err.to_string(),
            "no snippet for lang \"python3\" (available: cpp, golang)"
        );
    }

    #[test]
    fn test_select_snippet_empty_set() {
        let err = select_snippet(&Question::default(), "cpp").unwrap_err();
        assert_eq!(err.to_string(), "no code snippets available for this problem");
    }

    #[test]
    fn test_resolve_lang_precedence() {
        let mut config = Config::default();
        assert_eq!(resolve_lang("", &config), "cpp");
        config.default_lang = "python3".into();
        assert_eq!(resolve_lang(" ", &config), "python3");
        assert_eq!(resolve_lang("golang", &config), "golang");
    }
}
