//! Model router: resolves a parsed command to exactly one backend.
//!
//! An explicit `claude`/`deepseek`/`aider` token wins outright. Otherwise the
//! body is scored against a declarative trigger table plus two context
//! bonuses, and the highest score wins.
//!
//! # Determinism
//!
//! Scoring is a pure function of `(body, context)`. Ties go to the backend
//! declared first in [`BackendId::DISPATCHABLE`] (`claude`, then `deepseek`,
//! then `aider`), so all-equal scores select `claude`.

use heimdall_core::backend::BackendId;
use heimdall_core::command::ParsedCommand;
use heimdall_core::context::{RepoStatus, WorkingContext};
use regex_lite::Regex;
use serde::Serialize;

/// Languages that earn the deepseek bonus.
pub const CODE_LANGUAGES: [&str; 6] = ["javascript", "typescript", "python", "java", "cpp", "csharp"];

const DIRTY_REPO_BONUS: u32 = 2;
const CODE_LANGUAGE_BONUS: u32 = 1;

/// Built-in trigger patterns, matched against the lower-cased body.
const BUILTIN_TRIGGERS: [(BackendId, &[&str]); 3] = [
    (
        BackendId::Deepseek,
        &[
            "implement|code|function|bug|fix",
            "optimize|performance|efficiency",
            "debug|error|exception",
        ],
    ),
    (
        BackendId::Claude,
        &[
            "explain|analyze|describe|evaluate",
            "design|architecture|pattern",
            "document|review|assess",
        ],
    ),
    (
        BackendId::Aider,
        &["commit|push|merge|branch", "git|repo|repository", "pr|pull request|review"],
    ),
];

/// A backend and the patterns that vote for it.
#[derive(Debug, Clone)]
struct TriggerRule {
    backend: BackendId,
    patterns: Vec<Regex>,
}

/// Compiled trigger table. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<TriggerRule>,
}

impl RuleTable {
    /// Compile a table from `(backend, patterns)` pairs.
    pub fn new(rules: &[(BackendId, &[&str])]) -> Result<Self, regex_lite::Error> {
        let rules = rules
            .iter()
            .map(|(backend, patterns)| {
                let patterns = patterns.iter().map(|p| Regex::new(p)).collect::<Result<Vec<_>, _>>()?;
                Ok(TriggerRule {
                    backend: *backend,
                    patterns,
                })
            })
            .collect::<Result<Vec<_>, regex_lite::Error>>()?;
        Ok(Self { rules })
    }

    /// The built-in trigger table.
    pub fn builtin() -> Self {
        Self::new(&BUILTIN_TRIGGERS).expect("built-in trigger patterns are valid")
    }

    /// Number of patterns of `backend` that match `text`.
    fn matches(&self, backend: BackendId, text: &str) -> u32 {
        self.rules
            .iter()
            .filter(|r| r.backend == backend)
            .flat_map(|r| r.patterns.iter())
            .filter(|p| p.is_match(text))
            .count() as u32
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Per-backend scores, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scores {
    entries: Vec<(BackendId, u32)>,
}

impl Scores {
    fn zeroed() -> Self {
        Self {
            entries: BackendId::DISPATCHABLE.iter().map(|id| (*id, 0)).collect(),
        }
    }

    fn add(&mut self, backend: BackendId, points: u32) {
        if let Some((_, score)) = self.entries.iter_mut().find(|(id, _)| *id == backend) {
            *score += points;
        }
    }

    /// Score of one backend (0 for `multi`).
    pub fn get(&self, backend: BackendId) -> u32 {
        self.entries
            .iter()
            .find(|(id, _)| *id == backend)
            .map_or(0, |(_, s)| *s)
    }

    /// Entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (BackendId, u32)> + '_ {
        self.entries.iter().copied()
    }

    /// First strictly-greatest entry in declaration order.
    pub fn winner(&self) -> BackendId {
        let mut best: Option<(BackendId, u32)> = None;
        for (id, score) in self.iter() {
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((id, score));
            }
        }
        best.map_or(BackendId::Claude, |(id, _)| id)
    }
}

impl std::fmt::Display for Scores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (id, score)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{id}={score}")?;
        }
        Ok(())
    }
}

/// How a backend was chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RoutingDecision {
    /// Named by the command's leading token.
    Explicit { backend: BackendId },
    /// Selected by heuristic scoring.
    Scored { backend: BackendId, scores: Scores },
}

impl RoutingDecision {
    pub fn backend(&self) -> BackendId {
        match self {
            RoutingDecision::Explicit { backend } | RoutingDecision::Scored { backend, .. } => *backend,
        }
    }
}

/// Resolves commands to backends.
#[derive(Debug, Clone, Default)]
pub struct ModelRouter {
    rules: RuleTable,
}

impl ModelRouter {
    /// Router over the built-in trigger table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Router over a custom trigger table.
    pub fn with_rules(rules: RuleTable) -> Self {
        Self { rules }
    }

    /// Resolve a command to a dispatchable backend.
    pub fn route(&self, parsed: &ParsedCommand, context: &WorkingContext) -> BackendId {
        self.decide(parsed, context).backend()
    }

    /// Resolve a command and report how the choice was made.
    pub fn decide(&self, parsed: &ParsedCommand, context: &WorkingContext) -> RoutingDecision {
        match parsed.explicit_backend {
            Some(backend) if backend.is_dispatchable() => RoutingDecision::Explicit { backend },
            _ => {
                let scores = self.score(&parsed.body, context);
                RoutingDecision::Scored {
                    backend: scores.winner(),
                    scores,
                }
            }
        }
    }

    /// Score a prompt body against the trigger table and context bonuses.
    pub fn score(&self, body: &str, context: &WorkingContext) -> Scores {
        let text = body.to_lowercase();
        let mut scores = Scores::zeroed();

        for backend in BackendId::DISPATCHABLE {
            scores.add(backend, self.rules.matches(backend, &text));
        }

        if context.repo_status == RepoStatus::Dirty {
            scores.add(BackendId::Aider, DIRTY_REPO_BONUS);
        }

        if context.language().is_some_and(|l| CODE_LANGUAGES.contains(&l)) {
            scores.add(BackendId::Deepseek, CODE_LANGUAGE_BONUS);
        }

        scores
    }
}
