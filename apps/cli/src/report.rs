use std::fmt::Write;

use llmsh_app::{CleanReport, UsageReport};

/// Plain-text rendering of `llmsh stats`.
pub fn render_usage(report: &UsageReport) -> String {
    let mut out = String::new();
    if report.is_empty() {
        out.push_str("No usage records found.\n");
        render_cache(&mut out, report);
        return out;
    }

    out.push_str("Token Usage Statistics\n======================\n\n");

    out.push_str("Usage by Provider/Model:\n------------------------\n");
    for row in &report.by_provider_model {
        let _ = writeln!(out, "{} / {}:", row.provider, row.model);
        push_counts(&mut out, row.count, row.input_tokens, row.output_tokens, row.cache_read_tokens);
    }

    out.push_str("Usage by Day:\n-------------\n");
    for day in &report.by_day {
        let _ = writeln!(out, "{}:", day.day);
        push_counts(&mut out, day.count, day.input_tokens, day.output_tokens, day.cache_read_tokens);
    }

    out.push_str("Usage by Method:\n----------------\n");
    for method in &report.by_method {
        let _ = writeln!(out, "{}:", method.method);
        push_counts(&mut out, method.count, method.input_tokens, method.output_tokens, 0);
    }

    let summary = &report.summary;
    out.push_str("Total Summary:\n--------------\n");
    let _ = writeln!(out, "  Total Requests:      {}", summary.requests);
    let _ = writeln!(out, "  Total Input Tokens:  {}", summary.input_tokens);
    let _ = writeln!(out, "  Total Output Tokens: {}", summary.output_tokens);
    if let Some(savings) = summary.cache_savings_pct {
        let _ = writeln!(out, "  Total Cache Read:    {}", summary.cache_read_tokens);
        let _ = writeln!(out, "  Cache Savings:       {:.1}%", savings);
    }
    render_cache(&mut out, report);
    out
}

fn push_counts(out: &mut String, count: u64, input: u64, output: u64, cache_read: u64) {
    let _ = writeln!(out, "  Requests:      {}", count);
    let _ = writeln!(out, "  Input Tokens:  {}", input);
    let _ = writeln!(out, "  Output Tokens: {}", output);
    if cache_read > 0 {
        let _ = writeln!(out, "  Cache Read:    {}", cache_read);
    }
    out.push('\n');
}

fn render_cache(out: &mut String, report: &UsageReport) {
    if let Some(cache) = report.cache {
        let _ = writeln!(
            out,
            "\nPrediction Cache:\n-----------------\n  Entries:       {}\n  Hits:          {}",
            cache.total_entries, cache.total_hits
        );
    }
}

pub fn render_clean(report: &CleanReport) -> String {
    let mut out = String::new();
    if report.cleaned.is_empty() {
        out.push_str("No files to clean\n");
    } else {
        out.push_str("Cleaned:\n");
        for target in &report.cleaned {
            let _ = writeln!(out, "  ✓ {}", target.label());
        }
    }
    if !report.is_clean() {
        out.push_str("\nErrors:\n");
        for (target, err) in &report.errors {
            let _ = writeln!(out, "  ✗ {}: {}", target.label(), err);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use llmsh_app::CleanTarget;
    use llmsh_core::{CacheStats, DayStats, MethodStats, ProviderModelStats, UsageMethod, UsageSummary};

    fn sample() -> UsageReport {
        UsageReport {
            summary: UsageSummary {
                requests: 2,
                input_tokens: 300,
                output_tokens: 20,
                cache_read_tokens: 100,
                cache_savings_pct: Some(25.0),
            },
            by_provider_model: vec![ProviderModelStats {
                provider: "openai".to_string(),
                model: "gpt-4o-mini".to_string(),
                count: 2,
                input_tokens: 300,
                output_tokens: 20,
                cache_read_tokens: 100,
            }],
            by_day: vec![DayStats {
                day: "2025-06-10".to_string(),
                count: 2,
                input_tokens: 300,
                output_tokens: 20,
                cache_read_tokens: 100,
            }],
            by_method: vec![MethodStats {
                method: UsageMethod::Predict,
                count: 2,
                input_tokens: 300,
                output_tokens: 20,
            }],
            cache: Some(CacheStats {
                total_entries: 4,
                total_hits: 9,
            }),
        }
    }

    #[test]
    fn renders_every_section() {
        let text = render_usage(&sample());
        assert!(text.contains("openai / gpt-4o-mini:\n  Requests:      2\n"));
        assert!(text.contains("2025-06-10:\n"));
        assert!(text.contains("predict:\n"));
        assert!(text.contains("  Cache Savings:       25.0%\n"));
        assert!(text.contains("  Hits:          9"));
    }

    #[test]
    fn empty_report_says_so() {
        let text = render_usage(&UsageReport::default());
        assert_eq!(text, "No usage records found.\n");
    }

    #[test]
    fn clean_lists_removed_targets() {
        let report = CleanReport {
            cleaned: vec![CleanTarget::DebugLog, CleanTarget::CacheDatabase],
            errors: Vec::new(),
        };
        assert_eq!(
            render_clean(&report),
            "Cleaned:\n  ✓ debug log\n  ✓ cache database\n"
        );
        assert_eq!(render_clean(&CleanReport::default()), "No files to clean\n");
    }
}
