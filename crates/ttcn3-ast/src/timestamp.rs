//! Compilation timestamps

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, totally ordered token identifying a checking pass.
///
/// A result cached at timestamp `t` is valid for every pass `now <= t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompilationTimestamp(u64);

impl CompilationTimestamp {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u64 {
        self.0
    }

    /// The timestamp of the following pass
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Whether a result stamped `last` is still valid at `now`
    #[inline]
    pub fn is_current(last: Option<Self>, now: Self) -> bool {
        last.is_some_and(|last| last >= now)
    }
}

impl fmt::Display for CompilationTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency() {
        let t1 = CompilationTimestamp::new(1);
        let t2 = t1.next();
        assert!(CompilationTimestamp::is_current(Some(t2), t1));
        assert!(CompilationTimestamp::is_current(Some(t2), t2));
        assert!(!CompilationTimestamp::is_current(Some(t1), t2));
        assert!(!CompilationTimestamp::is_current(None, t1));
    }
}
