//! RegExp matcher

use regex::{Regex, RegexBuilder};

/// RegExp matcher: the source pattern, its flags and the compiled program.
///
/// Only `i`, `m` and `s` change how the pattern compiles; every other flag
/// is kept verbatim in `flags` for callers that interpret it.
#[derive(Debug, Clone)]
pub struct RegExpData {
    source: String,
    flags: String,
    /// The compiled Rust regex (if compilation succeeded)
    compiled: Option<Regex>,
}

impl RegExpData {
    /// Compile `source` with `flags`
    pub fn new(source: &str, flags: &str) -> Self {
        let compiled = RegexBuilder::new(source)
            .case_insensitive(flags.contains('i'))
            .multi_line(flags.contains('m'))
            .dot_matches_new_line(flags.contains('s'))
            .build()
            .ok();
        Self {
            source: source.to_string(),
            flags: flags.to_string(),
            compiled,
        }
    }

    /// Pattern source
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Flag string as given
    pub fn flags(&self) -> &str {
        &self.flags
    }

    /// Whether the `g` flag is set
    pub fn global(&self) -> bool {
        self.flags.contains('g')
    }

    /// Whether the pattern compiled
    pub fn is_valid(&self) -> bool {
        self.compiled.is_some()
    }

    /// Test `input` for a match
    pub fn test(&self, input: &str) -> bool {
        self.compiled.as_ref().is_some_and(|re| re.is_match(input))
    }

    /// Find the first match at or after byte offset `start`, as a byte range
    pub fn exec(&self, input: &str, start: usize) -> Option<(usize, usize)> {
        let re = self.compiled.as_ref()?;
        if start > input.len() {
            return None;
        }
        re.find_at(input, start).map(|m| (m.start(), m.end()))
    }
}
