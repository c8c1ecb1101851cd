//! Git output parsing functions

use std::collections::HashMap;

use super::GitError;

/// Whether a changed file existed in the baseline tree already, or is new.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// Did not exist in the baseline tree (numstat status `A`).
    New,
    /// Existed in the baseline tree and was modified, type-changed, or
    /// unmerged (numstat status `M`/`T`/`U`).
    Existing,
    /// Removed relative to the baseline tree (numstat status `D`). Never
    /// contributes additions, kept only so callers can see the full diff.
    Deleted,
}

/// One file's contribution to a diff between two trees.
#[derive(Debug, Clone)]
pub struct FileDelta {
    pub path: String,
    pub added: usize,
    pub deleted: usize,
    pub status: FileStatus,
    /// True for a binary file (numstat reports `-`/`-`); such files never
    /// contribute to the scatter file count.
    pub binary: bool,
}

pub(crate) fn combine_numstat_and_status(
    numstat: &str,
    name_status: &str,
) -> Result<Vec<FileDelta>, GitError> {
    let mut statuses: HashMap<&str, FileStatus> = HashMap::new();
    for line in name_status.lines() {
        let mut parts = line.splitn(2, '\t');
        let Some(code) = parts.next() else { continue };
        let Some(path) = parts.next() else { continue };
        let status = match code.chars().next() {
            Some('A') => FileStatus::New,
            Some('D') => FileStatus::Deleted,
            // M, T, U (and anything else diff-tree reports with --no-renames)
            // are all "existed already, changed in place".
            _ => FileStatus::Existing,
        };
        statuses.insert(path, status);
    }

    let mut deltas = Vec::new();
    for line in numstat.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let mut parts = line.splitn(3, '\t');
        let Some(added_str) = parts.next() else {
            continue;
        };
        let Some(deleted_str) = parts.next() else {
            continue;
        };
        let Some(path) = parts.next() else { continue };

        let binary = added_str == "-" || deleted_str == "-";
        let added = if binary {
            0
        } else {
            added_str
                .parse::<usize>()
                .map_err(|e| GitError::ParseError(format!("bad numstat additions: {e}")))?
        };
        let deleted = if binary {
            0
        } else {
            deleted_str
                .parse::<usize>()
                .map_err(|e| GitError::ParseError(format!("bad numstat deletions: {e}")))?
        };

        let status = statuses
            .get(path)
            .copied()
            .unwrap_or(FileStatus::Existing);

        deltas.push(FileDelta {
            path: path.to_string(),
            added,
            deleted,
            status,
            binary,
        });
    }

    Ok(deltas)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combines_new_and_existing_files() {
        let numstat = "3\t0\tnew.rs\n5\t2\texisting.rs\n0\t10\tremoved.rs\n";
        let status = "A\tnew.rs\nM\texisting.rs\nD\tremoved.rs\n";
        let deltas = combine_numstat_and_status(numstat, status).unwrap();
        assert_eq!(deltas.len(), 3);
        assert_eq!(deltas[0].status, FileStatus::New);
        assert_eq!(deltas[0].added, 3);
        assert_eq!(deltas[1].status, FileStatus::Existing);
        assert_eq!(deltas[2].status, FileStatus::Deleted);
        assert_eq!(deltas[2].added, 0);
    }

    #[test]
    fn binary_files_have_zero_counts() {
        let numstat = "-\t-\timage.png\n";
        let status = "A\timage.png\n";
        let deltas = combine_numstat_and_status(numstat, status).unwrap();
        assert_eq!(deltas.len(), 1);
        assert!(deltas[0].binary);
        assert_eq!(deltas[0].added, 0);
    }

    #[test]
    fn missing_status_defaults_to_existing() {
        let numstat = "1\t1\tuntracked-before-status.rs\n";
        let deltas = combine_numstat_and_status(numstat, "").unwrap();
        assert_eq!(deltas[0].status, FileStatus::Existing);
    }
}
