//! Naming helpers: file-name parsing, size formatting, project names.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{ModelError, Result};

fn name_version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(.*)-(\d.*)$").expect("name-version pattern compiles"))
}

fn project_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\w+").expect("project name pattern compiles"))
}

/// Guesses a library name and version from a file name.
///
/// The last extension is dropped, then the name is split at the last
/// `-<digit>` boundary: `mylib-2.3.jar` gives `("mylib", Some("2.3"))`,
/// `plain.jar` gives `("plain", None)`.
pub fn parse_name_version(file_name: &str) -> (String, Option<String>) {
    let stem = match file_name.rfind('.') {
        Some(dot) if dot + 1 < file_name.len() => &file_name[..dot],
        _ => file_name,
    };
    match name_version_pattern().captures(stem) {
        Some(caps) => (caps[1].to_string(), Some(caps[2].to_string())),
        None => (stem.to_string(), None),
    }
}

const SIZE_UNITS: [&str; 9] = ["Bytes", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

/// Formats a byte count with 1024-based units, rounded to whole numbers.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut unit = 0;
    let mut scaled = bytes as f64;
    while scaled >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        scaled /= 1024.0;
        unit += 1;
    }
    format!("{} {}", scaled.round() as u64, SIZE_UNITS[unit])
}

/// Checks a new project name before anything is sent to the server.
///
/// Names must start with a word character.
pub fn validate_project_name(name: &str) -> Result<()> {
    if project_name_pattern().is_match(name) {
        Ok(())
    } else {
        Err(ModelError::InvalidProjectName(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_name_version() {
        assert_eq!(
            parse_name_version("mylib-2.3.jar"),
            ("mylib".to_string(), Some("2.3".to_string()))
        );
        assert_eq!(parse_name_version("plain.jar"), ("plain".to_string(), None));
        assert_eq!(
            parse_name_version("commons-lang3-3.12.0.jar"),
            ("commons-lang3".to_string(), Some("3.12.0".to_string()))
        );
        assert_eq!(
            parse_name_version("crm-1.4.jnlp"),
            ("crm".to_string(), Some("1.4".to_string()))
        );
    }

    #[test]
    fn test_parse_name_version_edge_cases() {
        assert_eq!(parse_name_version("noext"), ("noext".to_string(), None));
        assert_eq!(
            parse_name_version("spring-core-SNAPSHOT.jar"),
            ("spring-core-SNAPSHOT".to_string(), None)
        );
        assert_eq!(parse_name_version("-1.jar"), (String::new(), Some("1".to_string())));
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 Bytes");
        assert_eq!(format_bytes(512), "512 Bytes");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "2 KB");
        assert_eq!(format_bytes(2 * 1024 * 1024), "2 MB");
        assert_eq!(format_bytes(5 * 1024 * 1024 * 1024), "5 GB");
    }

    #[test]
    fn test_validate_project_name() {
        assert!(validate_project_name("crm").is_ok());
        assert!(validate_project_name("crm-client").is_ok());
        assert!(validate_project_name("_internal").is_ok());
        assert_eq!(
            validate_project_name("-crm"),
            Err(ModelError::InvalidProjectName("-crm".into()))
        );
        assert!(validate_project_name("").is_err());
        assert!(validate_project_name(" crm").is_err());
    }
}
