//! # Execution Statistics
//!
//! Tracks the counters spec §4.5 exposes through `--stats`, following the
//! exact counting rules of the `Interpreter`/`Statistic` classes in
//! `examples/original_source/interpret.py`. The engine owns a mutable
//! [`Stats`] while it runs and hands out a read-only [`StatsSnapshot`] only
//! after `interpret()` returns — the reporter never observes execution
//! live (spec §4.5 Design Notes).

use std::collections::HashMap;

/// Opcodes that are free: they don't count toward `insts` and are skipped
/// when picking the `hot` instruction.
fn is_uncounted(opcode: &str) -> bool {
    matches!(opcode, "LABEL" | "DPRINT" | "BREAK")
}

#[derive(Default)]
pub struct Stats {
    insts: u64,
    hot_counter: HashMap<i64, u64>,
    vars_max: u64,
    static_opcode_counts: HashMap<String, u64>,
    static_opcode_order: Vec<String>,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the static per-opcode counts from the loaded program, used by
    /// the `frequent` statistic. Called once before execution begins.
    /// `static_opcode_order` records each opcode's first-seen position so
    /// `frequent` can report ties in program order, the way a Python dict
    /// built by iterating instructions in order does.
    pub fn seed_static_counts<'a, I: IntoIterator<Item = &'a str>>(&mut self, opcodes: I) {
        for op in opcodes {
            let op = op.to_ascii_uppercase();
            let count = self.static_opcode_counts.entry(op.clone()).or_insert(0);
            if *count == 0 {
                self.static_opcode_order.push(op);
            }
            *count += 1;
        }
    }

    /// Record a visit to the instruction at `order`, incrementing its
    /// position-visit count unconditionally (including re-entries from
    /// jumps/calls).
    pub fn record_visit(&mut self, order: i64) {
        *self.hot_counter.entry(order).or_insert(0) += 1;
    }

    /// Record that `opcode` actually executed, for the `insts` counter.
    pub fn record_executed(&mut self, opcode: &str) {
        if !is_uncounted(opcode) {
            self.insts += 1;
        }
    }

    /// Update the running maximum of live variable slots.
    pub fn observe_var_count(&mut self, count: usize) {
        self.vars_max = self.vars_max.max(count as u64);
    }

    /// Finalize into a read-only snapshot. `opcode_by_order` is needed to
    /// skip `LABEL`/`DPRINT`/`BREAK` positions when picking `hot`.
    pub fn finish(self, opcode_by_order: &HashMap<i64, String>) -> StatsSnapshot {
        let mut by_count: Vec<(i64, u64)> = self.hot_counter.into_iter().collect();
        by_count.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        let hot = by_count
            .into_iter()
            .find(|(order, _)| {
                opcode_by_order
                    .get(order)
                    .map(|op| !is_uncounted(op))
                    .unwrap_or(true)
            })
            .map(|(order, _)| order);

        let max_freq = self.static_opcode_counts.values().copied().max().unwrap_or(0);
        let frequent: Vec<String> = self
            .static_opcode_order
            .iter()
            .filter(|op| self.static_opcode_counts.get(*op).copied().unwrap_or(0) == max_freq && max_freq > 0)
            .cloned()
            .collect();

        StatsSnapshot {
            insts: self.insts,
            hot,
            vars: self.vars_max,
            frequent,
        }
    }
}

/// Read-only view of final statistics, handed to the `--stats` reporter.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsSnapshot {
    pub insts: u64,
    pub hot: Option<i64>,
    pub vars: u64,
    pub frequent: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insts_skips_free_opcodes() {
        let mut s = Stats::new();
        s.record_executed("MOVE");
        s.record_executed("LABEL");
        s.record_executed("DPRINT");
        s.record_executed("BREAK");
        s.record_executed("ADD");
        let snap = s.finish(&HashMap::new());
        assert_eq!(snap.insts, 2);
    }

    #[test]
    fn hot_skips_uncounted_positions() {
        let mut s = Stats::new();
        let mut by_order = HashMap::new();
        by_order.insert(1, "LABEL".to_string());
        by_order.insert(2, "ADD".to_string());
        s.record_visit(1);
        s.record_visit(1);
        s.record_visit(1);
        s.record_visit(2);
        let snap = s.finish(&by_order);
        assert_eq!(snap.hot, Some(2));
    }

    #[test]
    fn frequent_ties_are_reported_in_first_occurrence_order() {
        let mut s = Stats::new();
        s.seed_static_counts(["SUB", "ADD", "SUB", "ADD", "MOVE"]);
        let snap = s.finish(&HashMap::new());
        assert_eq!(snap.frequent, vec!["SUB".to_string(), "ADD".to_string()]);
    }

    #[test]
    fn vars_tracks_running_max() {
        let mut s = Stats::new();
        s.observe_var_count(1);
        s.observe_var_count(5);
        s.observe_var_count(2);
        let snap = s.finish(&HashMap::new());
        assert_eq!(snap.vars, 5);
    }

    #[test]
    fn hot_is_none_when_nothing_countable_ran() {
        let mut s = Stats::new();
        let mut by_order = HashMap::new();
        by_order.insert(1, "LABEL".to_string());
        s.record_visit(1);
        let snap = s.finish(&by_order);
        assert_eq!(snap.hot, None);
    }
}
