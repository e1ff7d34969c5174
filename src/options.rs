//! Parser configuration

use crate::error::{Error, Result};

/// Options controlling recognized syntax and output shape
///
/// All options are independent and composable; everything defaults to off,
/// which yields the minimal output (no position metadata, no raw text, no
/// token/comment capture). Streaming callbacks are attached to a
/// [`Parser`](crate::Parser) instead of living here, so `Options` stays plain
/// clonable data.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Enable still-evolving syntax proposals
    pub next: bool,
    /// Relax legacy restrictions for HTML-embedded scripts
    /// (`<!--`/`-->` comments); sloppy-mode script goal only
    pub web_compat: bool,
    /// Parse under the module goal when using [`parse`](crate::parse)
    pub module: bool,
    /// Enable the JSX grammar branch
    pub jsx: bool,
    /// Attach `start`/`end` byte offsets to every node
    pub ranges: bool,
    /// Attach line/column locations to every node
    pub loc: bool,
    /// Preserve raw source text of literals
    pub raw: bool,
    /// Capture the flat token stream on the returned program
    pub tokens: bool,
    /// Capture skipped comments on the returned program
    pub comments: bool,
    /// Treat the source as strict-mode code regardless of directives
    pub implied_strict: bool,
    /// Allow `return` in top-level code
    pub global_return: bool,
    /// Represent parenthesized expressions with their own node
    pub preserve_parens: bool,
}

impl Options {
    /// Validate the option combination for the given goal
    ///
    /// Runs before any scanning. The web-compat relaxations are defined only
    /// for sloppy-mode scripts, so requesting them under the module goal is a
    /// configuration error rather than a silent no-op.
    pub fn validate(&self, module_goal: bool) -> Result<()> {
        if self.web_compat && module_goal {
            return Err(Error::options_error(
                "'web_compat' applies only to the script goal",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_off() {
        let options = Options::default();
        assert!(!options.next);
        assert!(!options.module);
        assert!(!options.ranges);
        assert!(!options.raw);
    }

    #[test]
    fn test_web_compat_script_only() {
        let options = Options {
            web_compat: true,
            ..Default::default()
        };
        assert!(options.validate(false).is_ok());
        assert!(options.validate(true).is_err());
    }
}
