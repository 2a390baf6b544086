use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "vleet",
    version,
    about = "Fetch LeetCode problems into local files, edit them, and submit solutions"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch a problem and write its solution file (does not open the editor)
    Fetch(FetchArgs),
    /// Fetch a problem, write its solution file, and open it in the editor
    Solve(SolveArgs),
    /// Submit the local solution file and wait for the verdict
    Submit(SubmitArgs),
    /// Manage the config file
    Config {
        #[command(subcommand)]
        cmd: ConfigCommand,
    },
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Problem title slug, e.g. two-sum
    pub problem_key: String,
    /// LeetCode language slug (e.g. cpp, python3)
    #[arg(long, default_value = "")]
    pub lang: String,
    /// Print machine-readable JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SolveArgs {
    pub problem_key: String,
    #[arg(long, default_value = "")]
    pub lang: String,
    /// Submit immediately after the editor exits
    #[arg(long)]
    pub submit: bool,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SubmitArgs {
    pub problem_key: String,
    #[arg(long, default_value = "")]
    pub lang: String,
    /// Solution file (default: ./<problem-key>/solution.<ext>)
    #[arg(long)]
    pub file: Option<PathBuf>,
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Write a new config file with empty credentials
    Init(ConfigInitArgs),
    /// Show the config (credentials are shown only as set / not set)
    Show,
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Editor command (default: $EDITOR, else vim)
    #[arg(long, default_value = "")]
    pub editor: String,
    /// Default LeetCode language slug (default: cpp)
    #[arg(long = "default-lang", default_value = "")]
    pub default_lang: String,
    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Fetch(_) => "fetch",
            Command::Solve(_) => "solve",
            Command::Submit(_) => "submit",
            Command::Config { cmd: ConfigCommand::Init(_) } => "config init",
            Command::Config { cmd: ConfigCommand::Show } => "config show",
        }
    }

    pub fn json(&self) -> bool {
        match self {
            Command::Fetch(a) => a.json,
            Command::Solve(a) => a.json,
            Command::Submit(a) => a.json,
            Command::Config { .. } => false,
        }
    }

    pub fn problem_key(&self) -> &str {
        match self {
            Command::Fetch(a) => &a.problem_key,
            Command::Solve(a) => &a.problem_key,
            Command::Submit(a) => &a.problem_key,
            Command::Config { .. } => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_submit_flags() {
        let cli = Cli::try_parse_from([
            "vleet", "submit", "two-sum", "--lang", "python3", "--file", "alt.py", "--json",
        ])
        .unwrap();
        match cli.cmd {
            Command::Submit(a) => {
                assert_eq!(a.problem_key, "two-sum");
                assert_eq!(a.lang, "python3");
                assert_eq!(a.file, Some(PathBuf::from("alt.py")));
                assert!(a.json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_config_init() {
        let cli = Cli::try_parse_from([
            "vleet", "config", "init", "--editor", "nvim", "--default-lang", "golang", "--force",
        ])
        .unwrap();
        assert_eq!(cli.cmd.name(), "config init");
        match cli.cmd {
            Command::Config { cmd: ConfigCommand::Init(a) } => {
                assert_eq!(a.editor, "nvim");
                assert_eq!(a.default_lang, "golang");
                assert!(a.force);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_missing_problem_key_is_usage_error() {
        assert!(Cli::try_parse_from(["vleet", "fetch"]).is_err());
        assert!(Cli::try_parse_from(["vleet", "bogus"]).is_err());
    }
}
