//! Human-readable statistics output.

use super::rank::{top, RankedEntry};
use super::RenderOptions;
use crate::aggregator::MethodStats;
use std::io::{self, Write};

/// Write a ranked statistics block
///
/// ```text
/// 60 calls, top 2 methods
///   Net::HTTP#request:1468: 8 (4 distinct)
///    has parameters
///     GET (5)
///   Foo#bar:10: 1 (1 distinct)
///    no parameters
/// ```
pub fn write_text(
    mut w: impl Write,
    total_calls: u64,
    entries: &[RankedEntry],
    options: &RenderOptions,
) -> io::Result<()> {
    let shown = top(entries, options.limit);

    writeln!(w, "{} calls, top {} methods", total_calls, shown.len())?;

    for entry in shown {
        let stats = &entry.stats;
        writeln!(
            w,
            "  {}: {} ({} distinct)",
            entry.key,
            stats.calls,
            stats.distinct_signatures()
        )?;

        if !options.include_params {
            continue;
        }

        if stats.num_params > 0 {
            writeln!(w, "   has parameters")?;
            for (signature, count) in signatures_by_count(stats) {
                writeln!(w, "    {} ({})", signature, count)?;
            }
        } else {
            writeln!(w, "   no parameters")?;
        }
    }

    Ok(())
}

/// Signatures ordered by count (descending), then text
fn signatures_by_count(stats: &MethodStats) -> Vec<(&str, u64)> {
    let mut sigs: Vec<(&str, u64)> = stats
        .param_counts
        .iter()
        .map(|(sig, count)| (sig.as_str(), *count))
        .collect();
    sigs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    sigs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::MethodKey;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn entry(key: &str, num_params: usize, counts: &[(&str, u64)]) -> RankedEntry {
        RankedEntry {
            key: MethodKey::from(key),
            stats: MethodStats {
                method: key.rsplit_once(':').map(|(m, _)| m).unwrap_or(key).to_string(),
                path: None,
                lineno: 0,
                calls: counts.iter().map(|(_, c)| c).sum(),
                num_params,
                param_counts: counts.iter().map(|(s, c)| (s.to_string(), *c)).collect::<BTreeMap<_, _>>(),
            },
        }
    }

    fn render(entries: &[RankedEntry], options: &RenderOptions) -> String {
        let mut buf = Vec::new();
        let total = entries.iter().map(|e| e.stats.calls).sum();
        write_text(&mut buf, total, entries, options).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_summary_lines() {
        let entries = vec![entry("Foo#bar:10", 1, &[("x", 5), ("y", 3)])];
        assert_eq!(
            render(&entries, &RenderOptions::default()),
            "8 calls, top 1 methods\n  Foo#bar:10: 8 (2 distinct)\n"
        );
    }

    #[test]
    fn test_parameter_detail() {
        let entries = vec![
            entry("Foo#bar:10", 1, &[("a", 1), ("b", 4)]),
            entry("Foo#baz:20", 0, &[("", 2)]),
        ];
        let options = RenderOptions {
            include_params: true,
            ..Default::default()
        };

        assert_eq!(
            render(&entries, &options),
            "7 calls, top 2 methods\n\
             \x20 Foo#bar:10: 5 (2 distinct)\n\
             \x20  has parameters\n\
             \x20   b (4)\n\
             \x20   a (1)\n\
             \x20 Foo#baz:20: 2 (1 distinct)\n\
             \x20  no parameters\n"
        );
    }

    #[test]
    fn test_limit_caps_header_count() {
        let entries = vec![
            entry("A#a:1", 0, &[("", 3)]),
            entry("B#b:1", 0, &[("", 2)]),
        ];
        let options = RenderOptions {
            limit: 1,
            ..Default::default()
        };
        let out = render(&entries, &options);
        assert!(out.starts_with("5 calls, top 1 methods\n"));
        assert!(!out.contains("B#b:1"));
    }
}
