//! Translation key construction.
//!
//! A translation key has the shape `{extensionId}/{scope}/{key}`. The scope is
//! either a package metadata scope (`package`) or a source file path taken from
//! an NLS metadata file, flattened so it never contains a `/` of its own.

/// Characters replaced by [`NLS_KEY_SEPARATOR`] when flattening a scope.
const SCOPE_SEPARATORS: &[char] = &['/', '\\', '.'];

/// Replacement for every separator inside a flattened scope.
pub const NLS_KEY_SEPARATOR: char = '_';

/// Scope under which `package.nls.json` strings are registered.
pub const PACKAGE_SCOPE: &str = "package";

/// Flatten a scope or relative file path into a single key segment.
///
/// Path separators (`/` and `\`) and dots become `_`, so `src/a.ts` and
/// `src\a.ts` both map to `src_a_ts`. The transform is idempotent.
///
/// It is not injective: scopes that differ only in which separator they use
/// collide, so `a/b`, `a\b`, `a.b` and an already flat `a_b` all map to `a_b`.
///
/// # Examples
///
/// ```
/// use nlsdeploy::core::keys::normalize_scope;
///
/// assert_eq!(normalize_scope("src/a.ts"), "src_a_ts");
/// assert_eq!(normalize_scope("package"), "package");
/// ```
pub fn normalize_scope(scope: &str) -> String {
    scope.replace(SCOPE_SEPARATORS, &NLS_KEY_SEPARATOR.to_string())
}

/// Build `{extension_id}/{normalized scope}/{key}`.
pub fn translation_key(extension_id: &str, scope: &str, key: &str) -> String {
    format!("{}/{}/{}", extension_id, normalize_scope(scope), key)
}
