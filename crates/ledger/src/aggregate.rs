use std::collections::{BTreeMap, HashMap};

use chrono::Local;
use llmsh_core::{DayStats, MethodStats, ProviderModelStats, UsageMethod, UsageRecord, UsageSummary};

/// Groups records by the local calendar date (`YYYY-MM-DD`) of their timestamp.
pub fn aggregate_by_day(records: &[UsageRecord]) -> BTreeMap<String, DayStats> {
    let mut stats: BTreeMap<String, DayStats> = BTreeMap::new();
    for record in records {
        let day = record
            .timestamp
            .with_timezone(&Local)
            .format("%Y-%m-%d")
            .to_string();
        let entry = stats.entry(day.clone()).or_insert_with(|| DayStats {
            day,
            ..DayStats::default()
        });
        entry.count += 1;
        entry.input_tokens = entry.input_tokens.saturating_add(record.input_tokens);
        entry.output_tokens = entry.output_tokens.saturating_add(record.output_tokens);
        entry.cache_read_tokens = entry
            .cache_read_tokens
            .saturating_add(record.cache_read_tokens);
    }
    stats
}

pub fn aggregate_by_method(records: &[UsageRecord]) -> BTreeMap<UsageMethod, MethodStats> {
    let mut stats: BTreeMap<UsageMethod, MethodStats> = BTreeMap::new();
    for record in records {
        let entry = stats.entry(record.method).or_insert_with(|| MethodStats {
            method: record.method,
            count: 0,
            input_tokens: 0,
            output_tokens: 0,
        });
        entry.count += 1;
        entry.input_tokens = entry.input_tokens.saturating_add(record.input_tokens);
        entry.output_tokens = entry.output_tokens.saturating_add(record.output_tokens);
    }
    stats
}

/// One row per distinct (provider, model), sorted by provider then model.
pub fn aggregate_by_provider_model(records: &[UsageRecord]) -> Vec<ProviderModelStats> {
    let mut stats: HashMap<(&str, &str), ProviderModelStats> = HashMap::new();
    for record in records {
        let entry = stats
            .entry((record.provider.as_str(), record.model.as_str()))
            .or_insert_with(|| ProviderModelStats {
                provider: record.provider.clone(),
                model: record.model.clone(),
                ..ProviderModelStats::default()
            });
        entry.count += 1;
        entry.input_tokens = entry.input_tokens.saturating_add(record.input_tokens);
        entry.output_tokens = entry.output_tokens.saturating_add(record.output_tokens);
        entry.cache_read_tokens = entry
            .cache_read_tokens
            .saturating_add(record.cache_read_tokens);
    }
    let mut rows: Vec<ProviderModelStats> = stats.into_values().collect();
    rows.sort_by(|a, b| (&a.provider, &a.model).cmp(&(&b.provider, &b.model)));
    rows
}

pub fn summarize(records: &[UsageRecord]) -> UsageSummary {
    let mut summary = records
        .iter()
        .fold(UsageSummary::default(), |mut acc, record| {
            acc.requests += 1;
            acc.input_tokens = acc.input_tokens.saturating_add(record.input_tokens);
            acc.output_tokens = acc.output_tokens.saturating_add(record.output_tokens);
            acc.cache_read_tokens = acc.cache_read_tokens.saturating_add(record.cache_read_tokens);
            acc
        });
    if summary.cache_read_tokens > 0 {
        let read = summary.cache_read_tokens as f64;
        let input = summary.input_tokens as f64;
        summary.cache_savings_pct = Some(read / (input + read) * 100.0);
    }
    summary
}
