use std::fmt;
use std::ops::Range;
use thiserror::Error;

use crate::issue::Issue;

/// The fundamental correction primitive: replace a character span with new text.
///
/// Spans are half-open ranges `[offset, offset + length)` counted in Unicode
/// scalar values, matching the character indexing used by remote checkers.
/// Conversion to byte offsets happens here and is validated, never assumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Starting character offset (inclusive)
    pub offset: usize,
    /// Number of characters covered
    pub length: usize,
}

impl Span {
    pub fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }

    /// One past the last character covered.
    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    /// Resolve this character span to a byte range within `buffer`.
    ///
    /// Returns `None` when the span does not fit the buffer.
    fn byte_range(&self, buffer: &str) -> Option<Range<usize>> {
        let start = char_to_byte(buffer, self.offset)?;
        let end = char_to_byte(&buffer[start..], self.length)? + start;
        Some(start..end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.offset, self.end())
    }
}

/// Byte index of character number `chars`, where `chars` equal to the
/// character count maps to `text.len()`.
fn char_to_byte(text: &str, chars: usize) -> Option<usize> {
    if chars == 0 {
        return Some(0);
    }
    text.char_indices()
        .map(|(index, _)| index)
        .chain(std::iter::once(text.len()))
        .nth(chars)
}

#[derive(Error, Debug)]
pub enum PatchError {
    #[error(
        "span at offset {offset} with length {length} does not fit a buffer of {buffer_chars} characters"
    )]
    OutOfRange {
        offset: usize,
        length: usize,
        buffer_chars: usize,
    },

    #[error("overlapping spans {first} and {second}")]
    OverlappingSpans { first: Span, second: Span },
}

/// Result of applying a batch of issues.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "BatchOutcome carries the corrected text"]
pub struct BatchOutcome {
    /// The corrected buffer
    pub text: String,
    /// Number of replacements applied
    pub applied: usize,
    /// Number of issues skipped for lack of a replacement
    pub skipped: usize,
}

/// Replace one span of `buffer` with `replacement`.
///
/// Pure function: the input buffer is untouched. A span that does not fit
/// the buffer is rejected with [`PatchError::OutOfRange`] rather than
/// clamped, so a stale span can never corrupt unrelated text.
pub fn apply_single(buffer: &str, span: Span, replacement: &str) -> Result<String, PatchError> {
    let range = span.byte_range(buffer).ok_or_else(|| PatchError::OutOfRange {
        offset: span.offset,
        length: span.length,
        buffer_chars: buffer.chars().count(),
    })?;

    let mut out = String::with_capacity(buffer.len() - range.len() + replacement.len());
    out.push_str(&buffer[..range.start]);
    out.push_str(replacement);
    out.push_str(&buffer[range.end..]);
    Ok(out)
}

/// Apply the preferred replacement of every eligible issue in one pass.
///
/// Issues with no replacement candidates are skipped; they are
/// informational only. An empty first candidate is a deletion. Eligible
/// issues are sorted by offset descending (longer spans first at an equal
/// offset, remaining ties keeping list order) and applied right-to-left:
/// every splice changes the length of everything after its own start, so
/// processing strictly high-to-low keeps all not-yet-applied offsets valid
/// without recomputation.
///
/// All spans are validated against the input buffer before anything is
/// spliced. Overlapping spans are rejected with
/// [`PatchError::OverlappingSpans`]; touching spans (`a.end == b.offset`)
/// are fine, and a zero-length span covers no characters and never
/// overlaps anything.
pub fn apply_batch(buffer: &str, issues: &[Issue]) -> Result<BatchOutcome, PatchError> {
    let mut eligible: Vec<(&Issue, &str)> = issues
        .iter()
        .filter_map(|issue| issue.preferred_replacement().map(|repl| (issue, repl)))
        .collect();
    let skipped = issues.len() - eligible.len();

    // Stable sort: offset descending, longer spans first at an equal
    // offset so an insertion there is applied after the covering
    // replacement and lands before it. Remaining ties keep list order.
    eligible.sort_by(|a, b| {
        b.0.offset
            .cmp(&a.0.offset)
            .then(b.0.length.cmp(&a.0.length))
    });

    let buffer_chars = buffer.chars().count();
    for (issue, _) in &eligible {
        if issue.span().end() > buffer_chars {
            return Err(PatchError::OutOfRange {
                offset: issue.offset,
                length: issue.length,
                buffer_chars,
            });
        }
    }

    // Sorted descending: each non-empty span must end at or before the
    // nearest non-empty span above it. Empty spans are left out of the
    // scan entirely.
    let mut above: Option<Span> = None;
    for (issue, _) in &eligible {
        let span = issue.span();
        if span.length == 0 {
            continue;
        }
        if let Some(above) = above {
            if span.end() > above.offset {
                return Err(PatchError::OverlappingSpans {
                    first: span,
                    second: above,
                });
            }
        }
        above = Some(span);
    }

    let mut text = buffer.to_string();
    for (issue, replacement) in &eligible {
        text = apply_single(&text, issue.span(), replacement)?;
    }

    Ok(BatchOutcome {
        text,
        applied: eligible.len(),
        skipped,
    })
}
