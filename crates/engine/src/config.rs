// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

/// Global engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// The default number of logical writes accumulated per statement batch.
    ///
    /// A value of 0 or 1 disables batching entirely.
    pub statement_batch_size: usize,
    /// Whether parameter values are resolved and logged per row before
    /// execution. Enabling this selects the grouped binder variants, which
    /// are slower and never used on the default path.
    pub log_parameter_bindings: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            statement_batch_size: 1,
            log_parameter_bindings: false,
        }
    }
}

/// Per-session overrides of the global configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Overrides [`EngineConfig::statement_batch_size`] for this session.
    pub batch_size_override: Option<usize>,
}

/// Resolves the batch size in effect for one session.
///
/// The session override wins when present; the result is clamped to at
/// least 1 (a batch of one row is direct execution).
#[must_use]
pub fn effective_batch_size(config: &EngineConfig, settings: &SessionSettings) -> usize {
    settings
        .batch_size_override
        .unwrap_or(config.statement_batch_size)
        .max(1)
}
