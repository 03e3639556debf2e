use std::env;
use std::time::Duration;

const DEFAULT_MAX_TURNS: u32 = 5;
const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_TOOLS_PER_TURN: usize = 16;

/// Configuration for one agentic loop.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LoopConfig {
    /// Maximum number of model calls per request before the loop gives
    /// up with a fallback notice.
    pub max_turns: u32,
    /// Wall-clock budget for a single tool invocation.
    pub tool_timeout: Duration,
    /// Maximum number of tool calls honored within a single turn.
    /// Excess requests are answered with a failure instead of being
    /// executed, so a runaway model cannot exhaust the process.
    pub max_tools_per_turn: usize,
}

impl Default for LoopConfig {
    #[inline]
    fn default() -> Self {
        Self {
            max_turns: DEFAULT_MAX_TURNS,
            tool_timeout: Duration::from_secs(DEFAULT_TOOL_TIMEOUT_SECS),
            max_tools_per_turn: DEFAULT_MAX_TOOLS_PER_TURN,
        }
    }
}

impl LoopConfig {
    /// Builds a configuration from the environment, falling back to the
    /// defaults for anything unset or unparsable.
    ///
    /// Recognized variables: `MAX_AGENT_TURNS`, `TOOL_TIMEOUT_SECONDS`,
    /// `MAX_TOOLS_PER_TURN`.
    pub fn from_env() -> Self {
        Self {
            max_turns: env_parse("MAX_AGENT_TURNS", DEFAULT_MAX_TURNS),
            tool_timeout: Duration::from_secs(env_parse(
                "TOOL_TIMEOUT_SECONDS",
                DEFAULT_TOOL_TIMEOUT_SECS,
            )),
            max_tools_per_turn: env_parse(
                "MAX_TOOLS_PER_TURN",
                DEFAULT_MAX_TOOLS_PER_TURN,
            ),
        }
    }

    /// Overrides the turn bound.
    #[inline]
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Overrides the per-tool timeout.
    #[inline]
    pub fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = timeout;
        self
    }

    /// Overrides the per-turn tool-call cap.
    #[inline]
    pub fn with_max_tools_per_turn(mut self, max: usize) -> Self {
        self.max_tools_per_turn = max;
        self
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LoopConfig::default();
        assert_eq!(config.max_turns, 5);
        assert_eq!(config.tool_timeout, Duration::from_secs(30));
        assert_eq!(config.max_tools_per_turn, 16);
    }

    #[test]
    fn test_overrides() {
        let config = LoopConfig::default()
            .with_max_turns(2)
            .with_tool_timeout(Duration::from_millis(50))
            .with_max_tools_per_turn(1);
        assert_eq!(config.max_turns, 2);
        assert_eq!(config.tool_timeout, Duration::from_millis(50));
        assert_eq!(config.max_tools_per_turn, 1);
    }
}
