// SPDX-FileCopyrightText: 2026 OmniConvo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Diagnostics for a bad `omniconvo.toml` or `OMNICONVO_*` override.
//!
//! Each figment failure becomes one [`ConfigError`]. Unknown keys are pointed
//! at in the file they came from and get a "did you mean" hint.

#![allow(unused_assignments)] // emitted by the miette Diagnostic derive

use figment::error::Kind;
use miette::{Diagnostic, GraphicalReportHandler, NamedSource, SourceSpan};
use thiserror::Error;

/// `key_prefx` scores about 0.98 against `key_prefix`.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// One problem found while loading or validating the configuration.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(omniconvo::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// Closest accepted key, when one is close enough.
        suggestion: Option<String>,
        /// Accepted keys at the same level, comma separated.
        valid_keys: String,
        #[label("not a recognized key here")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("invalid value for `{key}` from {origin}: {detail}")]
    #[diagnostic(code(omniconvo::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        /// Dotted path, e.g. `database.wal_mode`.
        key: String,
        detail: String,
        expected: String,
        /// Which provider supplied the value: the TOML file or the environment.
        origin: String,
    },

    #[error("missing required key `{key}`")]
    #[diagnostic(code(omniconvo::config::missing_key), help("{}", missing_key_help(key)))]
    MissingKey { key: String },

    /// A value that parsed but is not usable, such as a port of 0.
    #[error("validation error: {message}")]
    #[diagnostic(code(omniconvo::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(omniconvo::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

fn missing_key_help(key: &str) -> String {
    let env_name = format!("OMNICONVO_{}", key.replace('.', "_").to_ascii_uppercase());
    match key.rsplit_once('.') {
        Some((section, field)) => {
            format!("set `{field}` under [{section}] in omniconvo.toml, or export {env_name}")
        }
        None => format!("set `{key}` in omniconvo.toml, or export {env_name}"),
    }
}

/// Splits a figment error into one [`ConfigError`] per underlying failure.
///
/// `toml_sources` pairs each file path with its contents so unknown keys can
/// be underlined in place.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| convert(&error, toml_sources))
        .collect()
}

fn convert(error: &figment::Error, toml_sources: &[(String, String)]) -> ConfigError {
    match &error.kind {
        Kind::UnknownField(field, accepted) => {
            let (span, src) = locate_unknown_key(error, field, toml_sources)
                .map_or((None, None), |(span, src)| (Some(span), Some(src)));
            ConfigError::UnknownKey {
                key: field.clone(),
                suggestion: suggest_key(field, accepted),
                valid_keys: accepted.join(", "),
                span,
                src,
            }
        }
        Kind::MissingField(field) => ConfigError::MissingKey {
            key: dotted(&error.path, field),
        },
        Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
            key: error.path.join("."),
            detail: format!("found {actual}"),
            expected: expected.to_string(),
            origin: error
                .metadata
                .as_ref()
                .map_or_else(|| "an unknown source".to_string(), |m| m.name.to_string()),
        },
        _ => ConfigError::Other(error.to_string()),
    }
}

fn dotted(path: &[String], field: &str) -> String {
    path.iter()
        .map(String::as_str)
        .chain(std::iter::once(field))
        .collect::<Vec<_>>()
        .join(".")
}

fn locate_unknown_key(
    error: &figment::Error,
    field: &str,
    toml_sources: &[(String, String)],
) -> Option<(SourceSpan, NamedSource<String>)> {
    let file = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|source| match source {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        });

    // `load_and_validate_str` has no file path but only ever one source.
    let (name, content) = match file {
        Some(file) => toml_sources.iter().find(|(path, _)| *path == file)?,
        None if toml_sources.len() == 1 => toml_sources.first()?,
        None => return None,
    };

    let offset = find_key_offset(content, &error.path, field)?;
    Some((
        SourceSpan::new(offset.into(), field.len()),
        NamedSource::new(name, content.clone()),
    ))
}

/// Byte offset of `field` in `content`, searched for inside the table named
/// by `path`.
///
/// An empty `path` means the top level, before the first table header.
/// Commented-out lines never match.
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let header = (!path.is_empty()).then(|| format!("[{}]", path.join(".")));
    let mut in_table = header.is_none();
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        let trimmed = line.trim_start();

        if trimmed.starts_with('[') {
            match &header {
                Some(header) => in_table = trimmed.trim_end() == header,
                None => return None,
            }
            continue;
        }
        if !in_table || trimmed.starts_with('#') {
            continue;
        }

        let assigns_field = trimmed
            .strip_prefix(field)
            .is_some_and(|rest| rest.trim_start().starts_with('='));
        if assigns_field {
            return Some(line_start + line.len() - trimmed.len());
        }
    }

    None
}

/// Closest of `valid_keys` to `unknown` by Jaro-Winkler similarity, if any
/// clears the threshold.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|&key| (key, strsim::jaro_winkler(unknown, key)))
        .filter(|&(_, score)| score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(key, _)| key.to_string())
}

/// Prints every error to stderr as a miette report.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut report = String::new();
        match handler.render_report(&mut report, error) {
            Ok(()) => eprint!("{report}"),
            Err(_) => eprintln!("error: {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_port_for_prot() {
        assert_eq!(
            suggest_key("prot", &["host", "port", "name"]),
            Some("port".to_string())
        );
    }

    #[test]
    fn suggests_key_prefix_for_misspelling() {
        assert_eq!(
            suggest_key("key_prefx", &["root", "key_prefix"]),
            Some("key_prefix".to_string())
        );
    }

    #[test]
    fn unrelated_key_gets_no_suggestion() {
        assert_eq!(suggest_key("zzzzzz", &["host", "port", "name"]), None);
    }

    #[test]
    fn finds_key_inside_its_table() {
        let content = "[server]\nprot = 3000\n";
        let o = find_key_offset(content, &["server".to_string()], "prot").unwrap();
        assert_eq!(&content[o..o + 4], "prot");
    }

    #[test]
    fn finds_top_level_key() {
        assert_eq!(find_key_offset("base_ur = \"x\"\n", &[], "base_ur"), Some(0));
    }

    #[test]
    fn same_key_in_another_table_is_skipped() {
        let content = "[database]\nroot = \"a\"\n\n[storage]\n  root = \"b\"\n";
        let o = find_key_offset(content, &["storage".to_string()], "root").unwrap();
        assert_eq!(&content[o..o + 10], "root = \"b\"");
    }

    #[test]
    fn commented_out_key_is_skipped() {
        let content = "[storage]\n# key_prefx = \"old\"\nkey_prefx=\"chats\"\n";
        let o = find_key_offset(content, &["storage".to_string()], "key_prefx").unwrap();
        assert_eq!(&content[..o], "[storage]\n# key_prefx = \"old\"\n");
    }

    #[test]
    fn top_level_search_stops_at_first_table() {
        let content = "[server]\nbase_ur = \"x\"\n";
        assert_eq!(find_key_offset(content, &[], "base_ur"), None);
    }

    #[test]
    fn missing_key_help_names_the_env_override() {
        assert_eq!(
            missing_key_help("storage.root"),
            "set `root` under [storage] in omniconvo.toml, or export OMNICONVO_STORAGE_ROOT"
        );
        assert_eq!(
            missing_key_help("base_url"),
            "set `base_url` in omniconvo.toml, or export OMNICONVO_BASE_URL"
        );
    }
}
