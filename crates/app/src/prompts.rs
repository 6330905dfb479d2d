//! Prompt text sent to the model for each request kind.

use std::fmt::Write;

/// Shell context shared by every prompt. `history` is already redacted and oldest-first.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptContext<'a> {
    pub history: &'a [String],
    pub cwd: &'a str,
    pub git_branch: &'a str,
    pub os_info: &'a str,
}

const PREDICT_HISTORY: usize = 10;
const COMPLETE_HISTORY: usize = 5;
const NL2CMD_HISTORY: usize = 3;

pub fn predict_prompt(ctx: &PromptContext<'_>) -> String {
    let mut out = String::from("You are a shell command prediction assistant.\n\nContext:\n");
    push_os(&mut out, ctx.os_info);
    let _ = writeln!(out, "- Working directory: {}", ctx.cwd);
    if !ctx.git_branch.is_empty() {
        let _ = writeln!(out, "- Git branch: {}", ctx.git_branch);
    }
    if !ctx.history.is_empty() {
        out.push_str("- Recent commands:\n");
        for (idx, command) in tail(ctx.history, PREDICT_HISTORY).iter().rev().enumerate() {
            let _ = writeln!(out, "  {}. {}", idx + 1, command);
        }
    }
    out.push_str("\nPredict the next most likely command the user will execute.\n");
    out.push_str("Rules:\n");
    out.push_str("- Return ONLY the command, no explanation\n");
    out.push_str("- Consider the workflow pattern\n");
    out.push_str("- Be concise and practical\n");
    out.push_str("- Do not include markdown code blocks\n\n");
    out.push_str("Command:");
    out
}

pub fn complete_prompt(ctx: &PromptContext<'_>, prefix: &str) -> String {
    let mut out = String::from("You are a shell command completion assistant.\n\nContext:\n");
    push_os(&mut out, ctx.os_info);
    let _ = writeln!(out, "- Current directory: {}", ctx.cwd);
    let _ = writeln!(out, "- Partial command: {}", prefix);
    push_recent(&mut out, "- Recent commands:\n", tail(ctx.history, COMPLETE_HISTORY));
    out.push_str("\nComplete the partial command to a full, valid command.\n");
    out.push_str("Rules:\n");
    out.push_str("- Return ONLY the completed command\n");
    out.push_str("- Ensure it starts with or relates to the given prefix\n");
    out.push_str("- Be practical and safe\n");
    out.push_str("- Do not include markdown code blocks\n\n");
    out.push_str("Completed command:");
    out
}

pub fn nl2cmd_prompt(ctx: &PromptContext<'_>, description: &str) -> String {
    let mut out = String::from("You are a shell command generator.\n\n");
    out.push_str("Task: Convert natural language description to a shell command.\n");
    out.push_str("Context:\n");
    push_os(&mut out, ctx.os_info);
    let _ = writeln!(out, "- Current directory: {}", ctx.cwd);
    let _ = writeln!(out, "- Description: {}", description);
    push_recent(
        &mut out,
        "- Recent commands (for context):\n",
        tail(ctx.history, NL2CMD_HISTORY),
    );
    out.push_str("\nGenerate a safe, practical shell command that accomplishes the task.\n");
    out.push_str("Rules:\n");
    out.push_str("- Return ONLY the command, no explanation\n");
    out.push_str(
        "- Ensure the command is safe (no destructive operations without confirmation)\n",
    );
    out.push_str("- Use common Unix/Linux tools\n");
    out.push_str("- Be concise and practical\n");
    out.push_str("- Do not include markdown code blocks\n\n");
    out.push_str("Command:");
    out
}

fn tail(history: &[String], count: usize) -> &[String] {
    &history[history.len().saturating_sub(count)..]
}

fn push_os(out: &mut String, os_info: &str) {
    if !os_info.is_empty() {
        let _ = writeln!(out, "- OS: {}", os_info);
    }
}

fn push_recent(out: &mut String, heading: &str, commands: &[String]) {
    if commands.is_empty() {
        return;
    }
    out.push_str(heading);
    for (idx, command) in commands.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", idx + 1, command);
    }
}
