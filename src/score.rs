//! The Diff Scorer (C2): a fresh-from-baseline weighted score of the working
//! tree against a baseline tree SHA.
//!
//! Fresh-from-baseline, not incremental accumulation, is load-bearing: a
//! historical incremental variant let a revert fail to lower the score,
//! which broke auto-recovery. Recomputing from scratch on every call means
//! the score always reflects the literal current/baseline diff.

use indexmap::IndexMap;

use crate::git::{FileStatus, GitError, Repository};

/// The breakdown behind a computed score, returned to callers that need to
/// render a reason string (`bumper score`, the Stop Gate's block message).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub score: u32,
    pub new_additions: u32,
    pub edit_additions: u32,
    pub files_touched: u32,
    pub scatter_penalty: u32,
    /// Added-line count per touched file, in diff order — used by
    /// diagnostics and by the external visualizer's `diff-tree` mode hint.
    pub per_file_additions: IndexMap<String, u32>,
}

/// `score(baseline_tree) -> breakdown`, computed against the current working
/// tree (tracked + unstaged + untracked, via a fresh snapshot).
pub fn score(repo: &Repository, baseline_tree: &str) -> Result<ScoreBreakdown, GitError> {
    let current_tree = repo.snapshot()?;
    if current_tree == baseline_tree {
        return Ok(ScoreBreakdown::default());
    }

    let deltas = repo.diff_tree_stats(baseline_tree, &current_tree)?;

    let mut new_additions: u64 = 0;
    let mut edit_additions: u64 = 0;
    let mut files_touched: u32 = 0;
    let mut per_file_additions = IndexMap::new();

    for delta in &deltas {
        if delta.added == 0 {
            continue;
        }
        files_touched += 1;
        per_file_additions.insert(delta.path.clone(), delta.added as u32);
        match delta.status {
            FileStatus::New => new_additions += delta.added as u64,
            FileStatus::Existing | FileStatus::Deleted => edit_additions += delta.added as u64,
        }
    }

    let scatter = scatter_penalty(files_touched);
    let weighted = (10 * new_additions + 13 * edit_additions) / 10;
    let score = weighted + scatter as u64;

    Ok(ScoreBreakdown {
        score: score as u32,
        new_additions: new_additions as u32,
        edit_additions: edit_additions as u32,
        files_touched,
        scatter_penalty: scatter,
        per_file_additions,
    })
}

/// The scatter curve: a free tier of 5 files, then a 10-point-per-file
/// penalty up to 10 files, then a 30-point-per-file penalty beyond that.
pub fn scatter_penalty(files_touched: u32) -> u32 {
    match files_touched {
        0..=5 => 0,
        6..=10 => (files_touched - 5) * 10,
        _ => (files_touched - 5) * 30,
    }
}

/// The three enforcement tiers a score/limit ratio falls into (§4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Silent,
    Notice,
    Warning,
}

/// Tier for a score against a nonzero threshold, using the fixed 70%/90%
/// breakpoints. Callers must special-case `threshold_limit == 0` themselves
/// (a disabled threshold never warns).
pub fn tier(score: u32, threshold_limit: u32) -> Tier {
    if threshold_limit == 0 {
        return Tier::Silent;
    }
    // percent = score / threshold_limit, compared against 0.70 / 0.90
    // as integer cross-multiplication to avoid floating point.
    if score as u64 * 100 >= 90 * threshold_limit as u64 {
        Tier::Warning
    } else if score as u64 * 100 >= 70 * threshold_limit as u64 {
        Tier::Notice
    } else {
        Tier::Silent
    }
}
