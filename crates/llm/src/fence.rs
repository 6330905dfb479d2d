/// Removes an enclosing markdown code fence (```` ```bash ... ``` ````) from model output.
pub fn strip_code_fence(text: &str) -> String {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }
    let mut lines: Vec<&str> = trimmed.lines().collect();
    if lines.len() <= 2 {
        return trimmed.to_string();
    }
    lines.remove(0);
    if lines.last().is_some_and(|line| line.trim() == "```") {
        lines.pop();
    }
    lines.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_language_tagged_fence() {
        assert_eq!(strip_code_fence("```bash\nls -la\n```"), "ls -la");
    }

    #[test]
    fn strips_bare_fence_and_whitespace() {
        assert_eq!(
            strip_code_fence("  ```\n  git push origin main  \n```\n"),
            "git push origin main"
        );
    }

    #[test]
    fn keeps_multiline_body() {
        assert_eq!(
            strip_code_fence("```sh\ncd /tmp\nls\n```"),
            "cd /tmp\nls"
        );
    }

    #[test]
    fn leaves_plain_commands_alone() {
        assert_eq!(strip_code_fence(" docker ps -a \n"), "docker ps -a");
    }

    #[test]
    fn short_fenced_text_is_only_trimmed() {
        assert_eq!(strip_code_fence("```ls```"), "```ls```");
    }
}
