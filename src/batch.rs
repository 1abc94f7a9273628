//! Name computation for multi-file operations.
//!
//! The controller drives the actual renames and copies; this module only
//! decides what each new name becomes.

/// Split a file name at its last `.` into base and extension.
///
/// A name without `.` is all base with no extension. A leading dot counts:
/// `.hidden` splits into `""` and `"hidden"`.
pub fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(dot) => (&name[..dot], Some(&name[dot + 1..])),
        None => (name, None),
    }
}

/// `prefix + base + suffix + "." + extension`, without the dot when the
/// name has no extension.
pub fn batch_name(prefix: &str, name: &str, suffix: &str) -> String {
    let (base, ext) = split_extension(name);
    match ext {
        Some(ext) => format!("{prefix}{base}{suffix}.{ext}"),
        None => format!("{prefix}{base}{suffix}"),
    }
}

/// Result of a batch rename. Failures are counted, never raised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub renamed: usize,
    pub failed: usize,
}
