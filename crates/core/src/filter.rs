use std::sync::LazyLock;

use regex::Regex;

pub const REDACTION_MARKER: &str = "[REDACTED]";

/// A named redaction pattern.
pub struct SensitiveRule {
    pub name: &'static str,
    pub pattern: Regex,
}

fn rule(name: &'static str, pattern: &str) -> SensitiveRule {
    SensitiveRule {
        name,
        pattern: Regex::new(pattern).expect("valid redaction pattern"),
    }
}

/// Redaction rules in application order. Each rule runs on the output of the
/// previous one, so the order matters when matches overlap.
pub static SENSITIVE_RULES: LazyLock<Vec<SensitiveRule>> = LazyLock::new(|| {
    vec![
        rule(
            "api_key",
            r#"(?i)(api[_-]?key|token)\s*[=:]\s*['"]?([a-zA-Z0-9_-]{20,})"#,
        ),
        rule("aws_access_key", r"AKIA[0-9A-Z]{16}"),
        rule(
            "password",
            r#"(?i)(password|passwd|pwd)\s*[=:]\s*['"]?([^\s'"]+)"#,
        ),
        rule("private_key", r"-----BEGIN\s+.*PRIVATE\s+KEY-----"),
        rule(
            "jwt",
            r"eyJ[a-zA-Z0-9_-]*\.eyJ[a-zA-Z0-9_-]*\.[a-zA-Z0-9_-]*",
        ),
        rule(
            "database_url",
            r"(?i)(mysql|postgres|mongodb|redis)://[^:]+:[^@]+@",
        ),
        rule("bearer_token", r"(?i)bearer\s+[a-zA-Z0-9_-]{20,}"),
        rule(
            "ssh_private_key",
            r"(?i)BEGIN\s+(RSA|DSA|EC|OPENSSH)\s+PRIVATE\s+KEY",
        ),
        rule(
            "generic_secret",
            r#"(?i)(secret|credential)\s*[=:]\s*['"]?([^\s'"]+)"#,
        ),
        rule(
            "oauth_token",
            r#"(?i)(oauth|access_token|refresh_token)\s*[=:]\s*['"]?([a-zA-Z0-9_-]{20,})"#,
        ),
    ]
});

pub fn redact(command: &str) -> String {
    SENSITIVE_RULES
        .iter()
        .fold(command.to_string(), |current, rule| {
            rule.pattern
                .replace_all(&current, REDACTION_MARKER)
                .into_owned()
        })
}

pub fn filter_sensitive(commands: &[String]) -> Vec<String> {
    commands.iter().map(|command| redact(command)).collect()
}

pub fn is_sensitive(command: &str) -> bool {
    SENSITIVE_RULES
        .iter()
        .any(|rule| rule.pattern.is_match(command))
}
