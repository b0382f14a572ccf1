/// Splits a path into its slash-delimited segments.
///
/// The root path `/` has no segments. For any other path one leading
/// and one trailing slash are stripped and the remainder is split on
/// `/` verbatim, so doubled slashes yield empty segments that register
/// and match like any other literal.
///
/// # Example
/// ```
/// use dendrite_core::path::split_path;
///
/// assert_eq!(split_path("/"), Vec::<&str>::new());
/// assert_eq!(split_path("/users/42/posts/"), vec!["users", "42", "posts"]);
/// assert_eq!(split_path("a//b"), vec!["a", "", "b"]);
/// ```
pub fn split_path(path: &str) -> Vec<&str> {
    if path == "/" {
        return Vec::new();
    }

    let path = path.strip_prefix('/').unwrap_or(path);
    let path = path.strip_suffix('/').unwrap_or(path);

    path.split('/').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_has_no_segments() {
        assert!(split_path("/").is_empty());
    }

    #[test]
    fn test_leading_and_trailing_slash_stripped() {
        assert_eq!(split_path("/a/b"), vec!["a", "b"]);
        assert_eq!(split_path("a/b/"), vec!["a", "b"]);
        assert_eq!(split_path("/a/b/"), vec!["a", "b"]);
        assert_eq!(split_path("a/b"), vec!["a", "b"]);
    }

    #[test]
    fn test_consecutive_slashes_keep_empty_segments() {
        assert_eq!(split_path("/a//b"), vec!["a", "", "b"]);
        assert_eq!(split_path("//"), vec![""]);
    }

    #[test]
    fn test_empty_path_is_one_empty_segment() {
        assert_eq!(split_path(""), vec![""]);
    }

    #[test]
    fn test_only_leading_colon_is_special_elsewhere() {
        // Segmentation itself treats ':' like any other character.
        assert_eq!(split_path("/users/:id"), vec!["users", ":id"]);
    }
}
