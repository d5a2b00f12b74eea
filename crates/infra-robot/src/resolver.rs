// Robot Resolution - ordered candidate probing
//
// Robot implementations are heterogeneous: some are packaged native
// binaries, some are interpreted scripts, and they may live flat in the
// robots directory or in a per-robot subdirectory. The dispatch contract
// hides that from callers: candidates are probed in a fixed priority
// order and the first existing file wins.

use std::path::{Path, PathBuf};

/// How a candidate is invoked once resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    /// Executed directly
    Binary,
    /// Executed through the configured interpreter
    Script,
}

/// One typed candidate location for a robot executable
#[derive(Debug, Clone)]
pub struct RobotCandidate {
    pub kind: CandidateKind,
    pub path: PathBuf,
}

/// Default entry script inside a per-robot directory
const DIR_ENTRY_SCRIPT: &str = "main.py";

/// Candidate locations for a robot, highest priority first.
///
/// Data-driven on purpose: a new robot packaging style is a new entry
/// here, not a new code path in the dispatcher.
pub fn candidates(robots_dir: &Path, robot: &str) -> Vec<RobotCandidate> {
    vec![
        // Packaged flat binary
        RobotCandidate {
            kind: CandidateKind::Binary,
            path: robots_dir.join(robot),
        },
        // Per-robot directory with a binary
        RobotCandidate {
            kind: CandidateKind::Binary,
            path: robots_dir.join(robot).join(robot),
        },
        // Per-robot directory with the default entry script
        RobotCandidate {
            kind: CandidateKind::Script,
            path: robots_dir.join(robot).join(DIR_ENTRY_SCRIPT),
        },
        // Flat script file
        RobotCandidate {
            kind: CandidateKind::Script,
            path: robots_dir.join(format!("{robot}.py")),
        },
    ]
}

/// Resolve a robot name to the first existing candidate.
///
/// `is_file` keeps a per-robot directory from shadowing the flat-binary
/// candidate of the same name.
pub fn resolve(robots_dir: &Path, robot: &str) -> Option<RobotCandidate> {
    candidates(robots_dir, robot)
        .into_iter()
        .find(|c| c.path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_unresolvable_robot() {
        let dir = TempDir::new().unwrap();
        assert!(resolve(dir.path(), "missing").is_none());
    }

    #[test]
    fn test_flat_binary_has_highest_priority() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bot"), b"").unwrap();
        fs::write(dir.path().join("bot.py"), b"").unwrap();

        let resolved = resolve(dir.path(), "bot").unwrap();
        assert_eq!(resolved.kind, CandidateKind::Binary);
        assert_eq!(resolved.path, dir.path().join("bot"));
    }

    #[test]
    fn test_second_candidate_wins_when_first_missing() {
        // Only the per-robot directory binary exists
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("bot")).unwrap();
        fs::write(dir.path().join("bot").join("bot"), b"").unwrap();

        let resolved = resolve(dir.path(), "bot").unwrap();
        assert_eq!(resolved.kind, CandidateKind::Binary);
        assert_eq!(resolved.path, dir.path().join("bot").join("bot"));
    }

    #[test]
    fn test_directory_does_not_shadow_flat_script() {
        // robots_dir/bot exists but is a directory, not the packaged binary
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("bot")).unwrap();
        fs::write(dir.path().join("bot.py"), b"").unwrap();

        let resolved = resolve(dir.path(), "bot").unwrap();
        assert_eq!(resolved.kind, CandidateKind::Script);
        assert_eq!(resolved.path, dir.path().join("bot.py"));
    }

    #[test]
    fn test_dir_entry_script_beats_flat_script() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("bot")).unwrap();
        fs::write(dir.path().join("bot").join("main.py"), b"").unwrap();
        fs::write(dir.path().join("bot.py"), b"").unwrap();

        let resolved = resolve(dir.path(), "bot").unwrap();
        assert_eq!(resolved.path, dir.path().join("bot").join("main.py"));
    }
}
