//! The "Environment Info" block printed after the first watch build

use console::Term;
use owo_colors::OwoColorize;

use crate::proxy::DevEnvironment;

const SEPARATOR: &str = "====================== Environment Info =====================";

/// Decide whether the banner should be colored
///
/// The banner is printed to stdout, so that is the terminal probed.
pub fn should_use_color() -> bool {
    should_color(&Term::stdout())
}

/// Decide whether output written to `term` should be colored
///
/// `NO_COLOR` wins over `FORCE_COLOR`, which wins over terminal detection.
pub fn should_color(term: &Term) -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    term.features().colors_supported()
}

/// Diagnostic block for one development session
#[derive(Debug, Clone, Copy)]
pub struct Banner<'a> {
    meta: &'a str,
    env: &'a DevEnvironment,
}

impl<'a> Banner<'a> {
    /// Banner showing `formatted_meta` and the setup in `env`
    pub fn new(formatted_meta: &'a str, env: &'a DevEnvironment) -> Self {
        Self {
            meta: formatted_meta,
            env,
        }
    }

    /// Render the block, optionally with ANSI colors
    pub fn render(&self, colored: bool) -> String {
        let link = |url: &str| {
            if colored {
                url.underline().to_string()
            } else {
                url.to_string()
            }
        };

        let body = format!(
            "\nlapp-meta.json:\n{meta}\n\n\
             Please use whistle as local proxy server:\n{tool}\n\n\
             Example for whistle proxy rule:\n{rule}\n\n\
             Local Dev URL:\n{url}\n",
            meta = self.meta,
            tool = link(&self.env.proxy_tool_url),
            rule = self.env.proxy_rule,
            url = link(&self.env.dev_url),
        );
        let separator = format!("\n{SEPARATOR}\n");

        if colored {
            format!(
                "{}\n{}\n{}",
                separator.cyan(),
                body.cyan(),
                separator.cyan()
            )
        } else {
            format!("{separator}\n{body}\n{separator}")
        }
    }

    /// Print the banner to stdout
    pub fn print(&self, colored: bool) {
        println!("{}", self.render(colored));
    }
}
