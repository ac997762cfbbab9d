//! Activity log - ordered, prepend-biased audit trail
//!
//! Every level change and reset is recorded as one immutable human-readable
//! string, most recent first. The mutation engine is the sole writer;
//! consumers may slice the listing but never reorder or mutate it.

/// Ordered audit trail, most recent entry first
#[derive(Debug, Clone, Default)]
pub struct AuditLog {
    entries: Vec<String>,
}

impl AuditLog {
    pub fn new(entries: Vec<String>) -> Self {
        Self { entries }
    }

    /// Add an entry at the front (engine-only)
    pub(crate) fn prepend(&mut self, entry: String) {
        self.entries.insert(0, entry);
    }

    /// Entries, most recent first
    pub fn list(&self) -> &[String] {
        &self.entries
    }

    /// Owned copy for persistence snapshots
    pub fn snapshot(&self) -> Vec<String> {
        self.entries.clone()
    }

    /// Replace the whole log (reset path only)
    pub(crate) fn replace(&mut self, entries: Vec<String>) {
        self.entries = entries;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Compose the audit entry for a level change
pub fn level_change_entry(actor: &str, name: &str, level: u8) -> String {
    format!(
        "{}: {} changed {}'s level to {}",
        now_stamp(),
        actor,
        name,
        level
    )
}

/// Compose the audit entry for a full reset
pub fn reset_entry(actor: &str) -> String {
    format!("{}: {} reset all data", now_stamp(), actor)
}

fn now_stamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepend_orders_most_recent_first() {
        let mut log = AuditLog::default();
        log.prepend("first".to_string());
        log.prepend("second".to_string());
        log.prepend("third".to_string());
        assert_eq!(log.list(), &["third", "second", "first"]);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_replace_discards_prior_entries() {
        let mut log = AuditLog::new(vec!["old".to_string()]);
        log.replace(vec!["reset".to_string()]);
        assert_eq!(log.list(), &["reset"]);
    }

    #[test]
    fn test_entry_formats() {
        let entry = level_change_entry("Alice", "نور", 7);
        assert!(entry.contains("Alice changed نور's level to 7"));

        let entry = reset_entry("Bob");
        assert!(entry.contains("Bob reset all data"));
    }
}
