//! Workload driver.
//!
//! Runs name lists against a trie of a chosen granularity and reports
//! counts, timings and shape statistics. This is what the binary calls; it
//! only uses the public trie operations.

use std::fmt;
use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::data_structures::radix_trie::{
    BitGranularity, ByteGranularity, ComponentGranularity, Granularity, InsertOutcome,
    LookupMode, RadixTrie, RadixTrieConfig, RemoveOutcome, TrieCounters, TrieStats,
};
use crate::error::{TrieGranularityError, TrieGranularityResult};

/// Names inserted by the warmup scenario.
pub const WARMUP_NAMES: [&str; 5] = [
    "/ndn/uofa/cs/department/pub",
    "/ndn/uofa/cs/department",
    "/ndn/uofa/ece/department",
    "/ndn/uofa/cs/department/pub/icn/",
    "/ndn/uofa/cs/icn/",
];

/// Name the warmup scenario expects not to find.
pub const WARMUP_MISSING: &str = "/ndn/uofa/cs/department/pub/icn/people";

/// Name the warmup scenario removes.
pub const WARMUP_REMOVED: &str = "/ndn/uofa/cs/department";

/// Trie granularity selectable at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GranularityKind {
    /// One unit per bit
    Bit,
    /// One unit per byte
    Byte,
    /// One unit per component
    Component,
}

/// Options of a workload run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Only use the first `count` names.
    pub count: Option<usize>,
    /// Remove every name after the lookups.
    pub remove: bool,
}

/// Outcome of a workload run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub granularity: &'static str,
    pub names: usize,
    pub inserted: usize,
    pub duplicates: usize,
    pub rejected: usize,
    pub found: usize,
    pub missing: usize,
    pub removed: usize,
    pub insert_ms: f64,
    pub lookup_ms: f64,
    pub remove_ms: Option<f64>,
    pub stats: TrieStats,
    pub counters: TrieCounters,
}

impl RunReport {
    /// Human readable summary.
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "granularity:  {}", self.granularity)?;
        writeln!(
            f,
            "names:        {} ({} inserted, {} duplicates, {} rejected)",
            self.names, self.inserted, self.duplicates, self.rejected
        )?;
        writeln!(f, "lookups:      {} found, {} missing", self.found, self.missing)?;
        writeln!(f, "insert time:  {:.3} ms", self.insert_ms)?;
        writeln!(f, "lookup time:  {:.3} ms", self.lookup_ms)?;
        if let Some(remove_ms) = self.remove_ms {
            writeln!(f, "removed:      {}", self.removed)?;
            writeln!(f, "remove time:  {remove_ms:.3} ms")?;
        }
        writeln!(
            f,
            "nodes:        {} ({} terminal, {} leaves)",
            self.stats.nodes, self.stats.terminals, self.stats.leaves
        )?;
        writeln!(
            f,
            "depth:        max {}, average leaf {:.2}",
            self.stats.max_depth,
            self.stats.average_leaf_depth()
        )?;
        write!(
            f,
            "index:        {} entries in {} slots",
            self.stats.index_entries, self.stats.index_capacity
        )
    }
}

/// Outcome of the warmup scenario.
#[derive(Debug, Clone, Serialize)]
pub struct WarmupReport {
    pub granularity: &'static str,
    /// Names stored after the inserts.
    pub names: Vec<String>,
    /// Whether every warmup name was found.
    pub all_found: bool,
    /// Whether the name that was never inserted was reported missing.
    pub missing_not_found: bool,
    /// Names stored after the removal, if one was requested.
    pub names_after_remove: Option<Vec<String>>,
    /// Indented dump of the final trie.
    pub tree: String,
}

/// Reads one name per line, skipping blank lines and `#` comments.
pub fn read_names<P: AsRef<Path>>(path: P) -> TrieGranularityResult<Vec<String>> {
    let text = std::fs::read_to_string(path)?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Runs a workload against a trie of the requested granularity.
pub fn run(
    kind: GranularityKind,
    names: &[String],
    config: &RadixTrieConfig,
    options: &RunOptions,
) -> TrieGranularityResult<RunReport> {
    match kind {
        GranularityKind::Bit => run_workload::<BitGranularity>(names, config, options),
        GranularityKind::Byte => run_workload::<ByteGranularity>(names, config, options),
        GranularityKind::Component => run_workload::<ComponentGranularity>(names, config, options),
    }
}

/// Inserts, looks up and optionally removes every name.
///
/// Malformed names are counted and skipped; structural errors abort the run.
pub fn run_workload<G: Granularity>(
    names: &[String],
    config: &RadixTrieConfig,
    options: &RunOptions,
) -> TrieGranularityResult<RunReport> {
    let names = match options.count {
        Some(count) => &names[..count.min(names.len())],
        None => names,
    };
    let mut trie = RadixTrie::<G>::with_config(config.clone())?;
    let mut report = RunReport {
        granularity: G::NAME,
        names: names.len(),
        inserted: 0,
        duplicates: 0,
        rejected: 0,
        found: 0,
        missing: 0,
        removed: 0,
        insert_ms: 0.0,
        lookup_ms: 0.0,
        remove_ms: None,
        stats: TrieStats::default(),
        counters: TrieCounters::default(),
    };

    let started = Instant::now();
    for name in names {
        match trie.insert(name) {
            Ok(InsertOutcome::Inserted(_)) => report.inserted += 1,
            Ok(InsertOutcome::AlreadyPresent(_)) => report.duplicates += 1,
            Err(err) if err.is_malformed_input() => {
                warn!(name = %name, error = %err, "Skipping malformed name");
                report.rejected += 1;
            }
            Err(err) => return Err(err.into()),
        }
    }
    report.insert_ms = elapsed_ms(started);

    let started = Instant::now();
    for name in names {
        match trie.lookup(name, LookupMode::Exact) {
            Ok(Some(_)) => report.found += 1,
            Ok(None) => report.missing += 1,
            Err(err) if err.is_malformed_input() => {}
            Err(err) => return Err(err.into()),
        }
    }
    report.lookup_ms = elapsed_ms(started);
    report.stats = trie.stats();

    if options.remove {
        let started = Instant::now();
        for name in names {
            match trie.remove(name) {
                Ok(RemoveOutcome::Removed) => report.removed += 1,
                Ok(RemoveOutcome::NotFound) => {}
                Err(err) if err.is_malformed_input() => {}
                Err(err) => return Err(err.into()),
            }
        }
        report.remove_ms = Some(elapsed_ms(started));
        if !trie.is_empty() {
            return Err(TrieGranularityError::Custom(format!(
                "{} names left after removing every name",
                trie.len()
            )));
        }
    }

    trie.validate()?;
    report.counters = trie.counters();
    info!(
        granularity = G::NAME,
        inserted = report.inserted,
        found = report.found,
        removed = report.removed,
        insert_ms = report.insert_ms,
        lookup_ms = report.lookup_ms,
        "Workload finished"
    );
    Ok(report)
}

/// Runs the warmup scenario against a trie of the requested granularity.
pub fn warmup(
    kind: GranularityKind,
    config: &RadixTrieConfig,
    remove: bool,
) -> TrieGranularityResult<WarmupReport> {
    match kind {
        GranularityKind::Bit => warmup_with::<BitGranularity>(config, remove),
        GranularityKind::Byte => warmup_with::<ByteGranularity>(config, remove),
        GranularityKind::Component => warmup_with::<ComponentGranularity>(config, remove),
    }
}

/// Inserts the warmup names, checks them, and optionally removes one.
pub fn warmup_with<G: Granularity>(
    config: &RadixTrieConfig,
    remove: bool,
) -> TrieGranularityResult<WarmupReport> {
    let mut trie = RadixTrie::<G>::with_config(config.clone())?;
    for name in WARMUP_NAMES {
        trie.insert(name)?;
    }

    let mut all_found = true;
    for name in WARMUP_NAMES {
        all_found &= trie.contains(name)?;
    }
    let missing_not_found = !trie.contains(WARMUP_MISSING)?;
    let names = trie.names();

    let names_after_remove = if remove {
        trie.remove(WARMUP_REMOVED)?;
        Some(trie.names())
    } else {
        None
    };
    trie.validate()?;

    Ok(WarmupReport {
        granularity: G::NAME,
        names,
        all_found,
        missing_not_found,
        names_after_remove,
        tree: render_tree(&trie),
    })
}

/// Indented dump of a trie, one node per line.
///
/// Terminal nodes are marked with `*`.
pub fn render_tree<G: Granularity>(trie: &RadixTrie<G>) -> String {
    let mut lines = Vec::with_capacity(trie.node_count());
    trie.for_each(|node, _parent, depth| {
        let marker = if node.is_terminal() { " *" } else { "" };
        lines.push(format!(
            "{:indent$}{}{}\n",
            "",
            G::describe_label(node.label()),
            marker,
            indent = depth * 2
        ));
    });
    lines.concat()
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use test_case::test_case;

    #[test]
    fn test_read_names_skips_blank_and_comments() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# names").unwrap();
        writeln!(file, "/ndn/uofa").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  /ndn/ucla  ").unwrap();

        let names = read_names(file.path()).unwrap();
        assert_eq!(names, vec!["/ndn/uofa", "/ndn/ucla"]);
    }

    #[test]
    fn test_read_names_missing_file() {
        let err = read_names("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, TrieGranularityError::Io(_)));
    }

    #[test_case(GranularityKind::Bit ; "bit")]
    #[test_case(GranularityKind::Byte ; "byte")]
    #[test_case(GranularityKind::Component ; "component")]
    fn test_run_counts(kind: GranularityKind) {
        let names: Vec<String> = ["/ndn/uofa", "/ndn/ucla", "/ndn/uofa", "bogus", "/ndn"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let options = RunOptions {
            count: None,
            remove: true,
        };

        let report = run(kind, &names, &RadixTrieConfig::default(), &options).unwrap();
        assert_eq!(report.names, 5);
        assert_eq!(report.inserted, 3);
        assert_eq!(report.duplicates, 1);
        assert_eq!(report.rejected, 1);
        assert_eq!(report.found, 4);
        assert_eq!(report.removed, 3);
        assert_eq!(report.stats.terminals, 3);
        assert_eq!(report.counters.cascaded_merges, 0);
        assert!(report.summary().contains("3 inserted"));
    }

    #[test]
    fn test_run_respects_count() {
        let names: Vec<String> = (0..10).map(|i| format!("/n/{i}")).collect();
        let options = RunOptions {
            count: Some(4),
            remove: false,
        };

        let report = run(GranularityKind::Component, &names, &RadixTrieConfig::default(), &options)
            .unwrap();
        assert_eq!(report.names, 4);
        assert_eq!(report.inserted, 4);
        assert_eq!(report.remove_ms, None);
    }

    #[test_case(GranularityKind::Bit ; "bit")]
    #[test_case(GranularityKind::Byte ; "byte")]
    #[test_case(GranularityKind::Component ; "component")]
    fn test_warmup(kind: GranularityKind) {
        let report = warmup(kind, &RadixTrieConfig::default(), true).unwrap();
        assert!(report.all_found);
        assert!(report.missing_not_found);
        assert_eq!(report.names.len(), 5);

        let after = report.names_after_remove.unwrap();
        assert_eq!(after.len(), 4);
        assert!(!after.iter().any(|name| name == WARMUP_REMOVED));
        assert!(report.tree.contains('*'));
    }

    #[test]
    fn test_summary_lines() {
        let names = vec!["/ndn/uofa".to_string(), "/ndn/ucla".to_string()];
        let keep = RunOptions::default();
        let report = run(GranularityKind::Byte, &names, &RadixTrieConfig::default(), &keep).unwrap();

        let summary = report.summary();
        assert_eq!(summary, report.to_string());
        assert_eq!(summary.lines().count(), 7);
        assert!(summary.starts_with("granularity:  byte\n"));
        assert!(summary.ends_with(&format!(
            "index:        {} entries in {} slots",
            report.stats.index_entries, report.stats.index_capacity
        )));
        assert!(!summary.contains("remove time"));

        let remove = RunOptions {
            count: None,
            remove: true,
        };
        let report = run(GranularityKind::Byte, &names, &RadixTrieConfig::default(), &remove).unwrap();
        assert_eq!(report.summary().lines().count(), 9);
        assert!(report.summary().contains("removed:      2\n"));
    }

    #[test]
    fn test_render_tree_indents_by_depth() {
        let mut trie = RadixTrie::<ComponentGranularity>::new();
        trie.insert("/a/b").unwrap();
        trie.insert("/a/c").unwrap();

        let tree = render_tree(&trie);
        let lines: Vec<&str> = tree.lines().collect();
        assert_eq!(lines[0], "[]");
        assert_eq!(lines[1], "  [a]");
        assert!(lines[2..].iter().all(|line| line.starts_with("    [")));
        assert!(lines[2..].iter().all(|line| line.ends_with(" *")));
    }
}
