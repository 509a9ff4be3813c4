//! Git queries for the autostart advisor
//!
//! The advisor only needs two things: whether a directory is a repository
//! work tree, and the leading segment of the checked-out branch name, which
//! is where issue-keyed branches (`PROJ-123`, `42-fix-login/...`) carry
//! their identifier.

use std::path::Path;

use git2::Repository;

/// Open the repository whose work tree is exactly `dir`, if any.
pub fn open_repo(dir: &Path) -> Option<Repository> {
    Repository::open(dir).ok()
}

/// The candidate identifier from the checked-out branch: the path segment
/// following `refs/heads/`. Detached or unborn-without-symbolic HEADs yield
/// nothing.
pub fn branch_leader(repo: &Repository) -> Option<String> {
    let head = repo.find_reference("HEAD").ok()?;
    leader_of(head.symbolic_target()?)
}

fn leader_of(target: &str) -> Option<String> {
    let branch = target.strip_prefix("refs/heads/")?;
    let leader = branch.split('/').next()?;
    if leader.is_empty() {
        return None;
    }
    Some(leader.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leader_is_the_segment_after_the_namespace() {
        assert_eq!(leader_of("refs/heads/TASK-123"), Some("TASK-123".to_string()));
        assert_eq!(
            leader_of("refs/heads/feature/login-form"),
            Some("feature".to_string())
        );
        assert_eq!(leader_of("refs/tags/v1.0"), None);
        assert_eq!(leader_of("refs/heads/"), None);
    }

    #[test]
    fn branch_leader_follows_head() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = Repository::init(dir.path()).expect("init repo");

        repo.set_head("refs/heads/PROJ-77").expect("set head");
        assert_eq!(
            branch_leader(&repo).as_deref(),
            Some("PROJ-77"),
        );

        repo.set_head("refs/heads/feature/cleanup").expect("set head");
        assert_eq!(branch_leader(&repo).as_deref(), Some("feature"));
    }

    #[test]
    fn non_repo_directories_do_not_open() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(open_repo(dir.path()).is_none());
    }
}
