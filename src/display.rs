//! Display utilities for terminal output: path shortening for the status
//! line's current-directory segment.

use std::path::Path;

/// Shorten a path relative to a common prefix (typically `$HOME`).
pub fn shorten_path(path: &Path, prefix: &Path) -> String {
    match path.strip_prefix(prefix) {
        Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
        Ok(rel) => format!("./{}", rel.display()),
        Err(_) => path.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortens_path_under_home() {
        let home = Path::new("/home/user");
        let path = Path::new("/home/user/projects/bumper");
        assert_eq!(shorten_path(path, home), "./projects/bumper");
    }

    #[test]
    fn falls_back_to_full_path_outside_prefix() {
        let home = Path::new("/home/user");
        let path = Path::new("/var/tmp/elsewhere");
        assert_eq!(shorten_path(path, home), "/var/tmp/elsewhere");
    }
}
