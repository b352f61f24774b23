//! Interactive vs plain output detection

use std::io::IsTerminal;

/// Environment variables that mark a CI runner
const CI_VARS: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "BUILDKITE",
    "JENKINS_URL",
    "TF_BUILD",
];

/// Forces plain output when set
pub const PLAIN_ENV: &str = "PONTO_SW_PLAIN";

/// How the current invocation should render output
#[derive(Debug, Clone)]
pub struct UiContext {
    interactive: bool,
    /// `--yes` was passed
    auto_yes: bool,
}

impl UiContext {
    /// Detect from the terminal and environment
    pub fn detect() -> Self {
        Self {
            interactive: Self::detect_interactive(),
            auto_yes: false,
        }
    }

    /// Plain output, prompts answer with their default
    pub fn non_interactive() -> Self {
        Self {
            interactive: false,
            auto_yes: false,
        }
    }

    /// Answer every confirmation with yes
    pub fn with_auto_yes(mut self, yes: bool) -> Self {
        self.auto_yes = yes;
        self
    }

    /// Whether a terminal user can answer prompts
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Whether `--yes` was passed
    pub fn auto_yes(&self) -> bool {
        self.auto_yes
    }

    /// Whether to use cliclack rendering instead of tagged lines
    pub fn use_fancy_output(&self) -> bool {
        self.interactive
    }

    /// Interactive only on a TTY outside CI, without `PONTO_SW_PLAIN` or `TERM=dumb`
    fn detect_interactive() -> bool {
        if !std::io::stdout().is_terminal() || !std::io::stdin().is_terminal() {
            return false;
        }

        if std::env::var_os(PLAIN_ENV).is_some() {
            return false;
        }

        if std::env::var("TERM").is_ok_and(|term| term == "dumb") {
            return false;
        }

        !CI_VARS.iter().any(|var| std::env::var_os(var).is_some())
    }
}
