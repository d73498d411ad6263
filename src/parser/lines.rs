use std::collections::BTreeSet;

/// The text lines of one rendered posting card, plus the set of lines
/// already claimed by a field.
///
/// Claims are exclusive: once a field extractor takes a line, later scans
/// (forward or reverse) skip it, and it is left out of the description.
#[derive(Debug, Clone, Default)]
pub struct Lines {
    lines: Vec<String>,
    claimed: BTreeSet<usize>,
}

impl Lines {
    /// Trim each line and drop the empty ones.
    pub fn new<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines = raw
            .into_iter()
            .map(|l| l.as_ref().trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
        Lines {
            lines,
            claimed: BTreeSet::new(),
        }
    }

    pub fn from_raw(raw: &str) -> Self {
        Lines::new(raw.replace("\r\n", "\n").split('\n'))
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.lines.get(idx).map(String::as_str)
    }

    pub fn is_claimed(&self, idx: usize) -> bool {
        self.claimed.contains(&idx)
    }

    pub fn claim(&mut self, idx: usize) {
        if idx < self.lines.len() {
            self.claimed.insert(idx);
        }
    }

    /// Unclaimed lines, top to bottom.
    pub fn unclaimed(&self) -> impl DoubleEndedIterator<Item = (usize, &str)> + '_ {
        self.lines
            .iter()
            .enumerate()
            .filter(|(idx, _)| !self.claimed.contains(idx))
            .map(|(idx, l)| (idx, l.as_str()))
    }

    /// Claim the first unclaimed line for which `f` yields a value.
    pub fn take_first_map<T, F>(&mut self, f: F) -> Option<T>
    where
        F: Fn(&str) -> Option<T>,
    {
        let (idx, value) = self.unclaimed().find_map(|(idx, l)| f(l).map(|v| (idx, v)))?;
        self.claim(idx);
        Some(value)
    }

    /// Claim the first unclaimed line matching `f` and return it.
    pub fn take_first_matching<F>(&mut self, f: F) -> Option<String>
    where
        F: Fn(&str) -> bool,
    {
        self.take_first_map(|l| f(l).then(|| l.to_string()))
    }

    /// Lines nobody claimed, in order.
    pub fn residual(&self) -> Vec<&str> {
        self.unclaimed().map(|(_, l)| l).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_drops_blank_lines() {
        let lines = Lines::from_raw("  a \r\n\n b\n   \n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines.get(0), Some("a"));
        assert_eq!(lines.get(1), Some("b"));
    }

    #[test]
    fn claimed_lines_are_skipped() {
        let mut lines = Lines::new(["x1", "x2", "y"]);
        assert_eq!(lines.take_first_matching(|l| l.starts_with('x')).as_deref(), Some("x1"));
        assert_eq!(lines.take_first_matching(|l| l.starts_with('x')).as_deref(), Some("x2"));
        assert_eq!(lines.take_first_matching(|l| l.starts_with('x')), None);
        assert_eq!(lines.residual(), vec!["y"]);
    }

    #[test]
    fn take_first_map_claims_the_source_line() {
        let mut lines = Lines::new(["3天/周", "北京"]);
        let days = lines.take_first_map(|l| l.strip_suffix("天/周").map(str::to_string));
        assert_eq!(days.as_deref(), Some("3"));
        assert!(lines.is_claimed(0));
        assert!(!lines.is_claimed(1));
    }
}
