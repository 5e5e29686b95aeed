use crate::error::{TypeError, TypeResult};

/// Check that `name` can be used as a route segment.
///
/// Names are limited to the URL-unreserved characters (`A-Z a-z 0-9 - . _ ~`)
/// and may not be `.` or `..`. This keeps route syntax such as `:param` and
/// `*wildcard` out of resource names.
pub fn validate_resource_name(name: &str) -> TypeResult<()> {
    let unreserved = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~');
    if name.is_empty() || name == "." || name == ".." || !name.chars().all(unreserved) {
        return Err(TypeError::InvalidName(name.to_string()));
    }
    Ok(())
}
