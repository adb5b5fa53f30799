//! Timestamp detection and extraction.
//!
//! A [`TimestampPattern`] pairs a detection regex with a chrono parse template.
//! A [`PatternSet`] is an ordered, immutable list of them: either the four
//! built-in clock formats or exactly one custom entry.
//!
//! # Example
//!
//! ```rust
//! use tsgap::parsing::PatternSet;
//!
//! let patterns = PatternSet::defaults().unwrap();
//! let instant = patterns.extract(b"I0312 15:04:05.250000 worker.cc:42] tick").unwrap();
//! assert_eq!(instant.format("%H:%M:%S%.3f").to_string(), "15:04:05.250");
//!
//! assert!(patterns.extract(b"hello world").is_none());
//! ```

use chrono::format::{self, Parsed, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::bytes::Regex;

use crate::config::CustomPattern;
use crate::error::{DeltaError, Result};

/// A point in time recovered from a log line.
///
/// Time-only templates produce an instant on a fixed placeholder date
/// (1970-01-01), so deltas between them assume same-day input. Date-only
/// templates produce midnight of that date.
pub type ParsedInstant = NaiveDateTime;

/// Built-in `(detection pattern, parse template)` pairs, in priority order.
pub const DEFAULT_PATTERNS: [(&str, &str); 4] = [
    // hh:mm:ss.uuuuuu (glog)
    (r"([0-9]{2}:[0-9]{2}:[0-9]{2}\.[0-9]{6})", "%H:%M:%S%.6f"),
    // hh:mm:ss.mmm
    (r"([0-9]{2}:[0-9]{2}:[0-9]{2}\.[0-9]{3})", "%H:%M:%S%.3f"),
    // hh:mm:ss
    (r"([0-9]{2}:[0-9]{2}:[0-9]{2})", "%H:%M:%S"),
    // hh:mm
    (r"([0-9]{2}:[0-9]{2})", "%H:%M"),
];

/// A single timestamp format: where to find it and how to read it.
#[derive(Debug, Clone)]
pub struct TimestampPattern {
    regex: Regex,
    template: String,
    has_group: bool,
}

impl TimestampPattern {
    /// Compiles a detection pattern and pairs it with a parse template.
    ///
    /// The template is not validated here; a template that never fits what
    /// the pattern matches simply never yields a timestamp.
    pub fn new(detection: &str, template: impl Into<String>) -> Result<Self> {
        let regex =
            Regex::new(detection).map_err(|e| DeltaError::invalid_pattern(detection, e))?;
        let has_group = regex.captures_len() > 1;
        Ok(Self {
            regex,
            template: template.into(),
            has_group,
        })
    }

    /// The regular expression source.
    pub fn detection_pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// The chrono format string used to parse matches.
    pub fn parse_template(&self) -> &str {
        &self.template
    }

    /// Finds the leftmost timestamp candidate in `line`.
    ///
    /// Returns the first capture group when the pattern has one and it took
    /// part in the match, otherwise the whole match.
    pub fn locate<'a>(&self, line: &'a [u8]) -> Option<&'a [u8]> {
        if self.has_group {
            let caps = self.regex.captures(line)?;
            caps.get(1).or_else(|| caps.get(0)).map(|m| m.as_bytes())
        } else {
            self.regex.find(line).map(|m| m.as_bytes())
        }
    }

    /// Parses a located substring with this pattern's template.
    ///
    /// Missing fields take their zero value: time-only templates land on the
    /// placeholder date, date-only templates on midnight, and an hour without
    /// minutes on the top of the hour. The template must yield at least a
    /// full date or an hour.
    pub fn parse(&self, raw: &[u8]) -> Option<ParsedInstant> {
        let text = std::str::from_utf8(raw).ok()?;
        let mut parsed = Parsed::new();
        format::parse(&mut parsed, text, StrftimeItems::new(&self.template)).ok()?;

        let date = parsed.to_naive_date().ok();
        let time = parsed.to_naive_time().ok().or_else(|| {
            parsed.set_minute(0).ok()?;
            parsed.to_naive_time().ok()
        });
        if date.is_none() && time.is_none() {
            return None;
        }
        Some(NaiveDateTime::new(
            date.unwrap_or_default(),
            time.unwrap_or_default(),
        ))
    }

    /// Locates and parses in one step.
    pub fn extract(&self, line: &[u8]) -> Option<ParsedInstant> {
        self.parse(self.locate(line)?)
    }
}

/// Ordered, immutable collection of timestamp patterns.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<TimestampPattern>,
    custom: bool,
}

impl PatternSet {
    /// The four built-in clock formats, most precise first.
    pub fn defaults() -> Result<Self> {
        let patterns = DEFAULT_PATTERNS
            .iter()
            .map(|(detection, template)| TimestampPattern::new(detection, *template))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            patterns,
            custom: false,
        })
    }

    /// A set holding exactly one user-supplied pattern.
    pub fn custom(detection: &str, template: impl Into<String>) -> Result<Self> {
        Ok(Self {
            patterns: vec![TimestampPattern::new(detection, template)?],
            custom: true,
        })
    }

    /// Builds the set from configuration: the custom entry replaces the
    /// defaults when present.
    pub fn build(custom: Option<&CustomPattern>) -> Result<Self> {
        match custom {
            Some(pattern) => Self::custom(&pattern.detection, pattern.template.clone()),
            None => Self::defaults(),
        }
    }

    /// Returns the first timestamp that both matches and parses.
    ///
    /// A pattern whose match fails to parse is skipped for this line; later
    /// patterns still get their turn.
    pub fn extract(&self, line: &[u8]) -> Option<ParsedInstant> {
        self.patterns.iter().find_map(|pattern| pattern.extract(line))
    }

    /// Number of patterns in the set.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns `true` if the set holds no patterns. Built sets never do.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// `true` if this set came from a custom pattern.
    pub fn is_custom(&self) -> bool {
        self.custom
    }

    /// Iterates the patterns in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &TimestampPattern> {
        self.patterns.iter()
    }
}
