//! Record assembler: groups raw text lines into logical record spans.
//!
//! Statement text has no structural markup, so a record is recognized by an
//! anchor (a date or an identifier code) and extends over the lines that
//! follow it. The assembler is an explicit state machine over a cursor into
//! the line slice:
//!
//! ```text
//! AccumulatingPrefix --anchor--> AnchorFound --> Harvesting --> EmitOrDiscard
//!        ^                                                           |
//!        +-----------------------------------------------------------+
//! any state --terminator / end of input--> Done
//! ```
//!
//! Look-ahead lines consumed while harvesting advance the cursor and are never
//! offered to another record.

use regex::Regex;
use std::ops::Range;

/// One line of extracted text with its position in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawLine<'a> {
    pub index: usize,
    pub text: &'a str,
}

/// Split document text into trimmed, indexed lines
pub fn raw_lines(text: &str) -> Vec<RawLine<'_>> {
    text.lines()
        .enumerate()
        .map(|(index, line)| RawLine { index, text: line.trim() })
        .collect()
}

/// Contiguous run of lines believed to form one logical record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSpan<'a> {
    /// Lines buffered before the anchor (e.g. a wrapped scheme name)
    pub prefix: Vec<RawLine<'a>>,
    pub anchor: RawLine<'a>,
    pub anchor_value: String,
    /// Byte range of the anchor match inside `anchor.text`
    pub anchor_range: Range<usize>,
    pub continuation: Vec<RawLine<'a>>,
}

impl<'a> RecordSpan<'a> {
    /// Text on the anchor line before the anchor match
    pub fn before_anchor(&self) -> &'a str {
        self.anchor.text[..self.anchor_range.start].trim()
    }

    /// Text on the anchor line after the anchor match
    pub fn after_anchor(&self) -> &'a str {
        self.anchor.text[self.anchor_range.end..].trim()
    }

    /// Whitespace tokens following the anchor, across the continuation lines
    pub fn tokens_after_anchor(&self) -> Vec<&'a str> {
        let mut tokens: Vec<&'a str> = self.after_anchor().split_whitespace().collect();
        for line in &self.continuation {
            tokens.extend(line.text.split_whitespace());
        }
        tokens
    }

    /// Anchor line with continuation lines appended, space separated
    pub fn joined(&self) -> String {
        let mut out = self.anchor.text.to_string();
        for line in &self.continuation {
            if !line.text.is_empty() {
                out.push(' ');
                out.push_str(line.text);
            }
        }
        out
    }

    /// Prefix lines plus the pre-anchor text, space separated
    pub fn leading_text(&self) -> String {
        let mut parts: Vec<&str> = self.prefix.iter().map(|l| l.text).collect();
        parts.push(self.before_anchor());
        parts.join(" ").trim().to_string()
    }

    /// Index of the last line that belongs to this span
    pub fn last_index(&self) -> usize {
        self.continuation
            .last()
            .map(|l| l.index)
            .unwrap_or(self.anchor.index)
    }
}

/// What ends a span's look-ahead besides the window size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Any line starting with an anchor opens the next record
    AnyAnchor,
    /// Only a line starting with a different anchor value opens the next record
    DifferentAnchor,
}

/// Decision taken for a harvested span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Emit,
    Discard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblerState {
    AccumulatingPrefix,
    AnchorFound,
    Harvesting,
    EmitOrDiscard,
    Done,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblyStats {
    pub emitted: usize,
    pub discarded: usize,
}

fn never(_: &str) -> bool {
    false
}

/// Configuration of one assembler pass
#[derive(Clone, Copy)]
pub struct AssemblerRules<'r> {
    /// Record-start pattern; capture group 1 (or the whole match) is the anchor value
    pub anchor: &'r Regex,
    /// Maximum continuation lines per record; `None` reads up to the next boundary
    pub lookahead: Option<usize>,
    pub boundary: Boundary,
    /// Section end; the assembler stops before a matching line
    pub terminator: Option<&'r Regex>,
    /// Lines ignored outright while looking for an anchor
    pub skip_line: fn(&str) -> bool,
    /// Look-ahead lines that are consumed but contribute nothing
    pub skip_continuation: fn(&str) -> bool,
    /// Lines never buffered into the prefix (column headers and the like)
    pub exclude_from_prefix: fn(&str) -> bool,
}

impl<'r> AssemblerRules<'r> {
    pub fn new(anchor: &'r Regex) -> Self {
        Self {
            anchor,
            lookahead: None,
            boundary: Boundary::AnyAnchor,
            terminator: None,
            skip_line: never,
            skip_continuation: never,
            exclude_from_prefix: never,
        }
    }

    pub fn lookahead(mut self, lines: usize) -> Self {
        self.lookahead = Some(lines);
        self
    }

    pub fn boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn terminator(mut self, terminator: &'r Regex) -> Self {
        self.terminator = Some(terminator);
        self
    }

    pub fn skip_line(mut self, f: fn(&str) -> bool) -> Self {
        self.skip_line = f;
        self
    }

    pub fn skip_continuation(mut self, f: fn(&str) -> bool) -> Self {
        self.skip_continuation = f;
        self
    }

    pub fn exclude_from_prefix(mut self, f: fn(&str) -> bool) -> Self {
        self.exclude_from_prefix = f;
        self
    }

    fn find_anchor(&self, text: &str) -> Option<(String, Range<usize>)> {
        let caps = self.anchor.captures(text)?;
        let whole = caps.get(0)?;
        let value = caps.get(1).unwrap_or(whole);
        Some((value.as_str().to_string(), value.start()..value.end()))
    }

    fn starts_with_anchor(&self, text: &str) -> Option<String> {
        self.find_anchor(text)
            .filter(|(_, range)| range.start == 0)
            .map(|(value, _)| value)
    }

    fn is_terminator(&self, text: &str) -> bool {
        self.terminator.is_some_and(|re| re.is_match(text))
    }
}

/// Cursor-driven state machine over an ordered line slice
pub struct RecordAssembler<'a, 'r> {
    lines: &'a [RawLine<'a>],
    rules: AssemblerRules<'r>,
    cursor: usize,
    state: AssemblerState,
}

impl<'a, 'r> RecordAssembler<'a, 'r> {
    pub fn new(lines: &'a [RawLine<'a>], rules: AssemblerRules<'r>) -> Self {
        Self {
            lines,
            rules,
            cursor: 0,
            state: AssemblerState::AccumulatingPrefix,
        }
    }

    /// Drive the machine to `Done`, handing each harvested span to `on_record`.
    pub fn run<F>(mut self, mut on_record: F) -> AssemblyStats
    where
        F: FnMut(&RecordSpan<'a>) -> Verdict,
    {
        let mut stats = AssemblyStats::default();
        let mut prefix: Vec<RawLine<'a>> = Vec::new();
        let mut found: Option<(String, Range<usize>)> = None;
        let mut span: Option<RecordSpan<'a>> = None;

        loop {
            self.state = match self.state {
                AssemblerState::AccumulatingPrefix => {
                    match self.lines.get(self.cursor) {
                        None => AssemblerState::Done,
                        Some(line) if self.rules.is_terminator(line.text) => AssemblerState::Done,
                        Some(line) if line.text.is_empty() || (self.rules.skip_line)(line.text) => {
                            self.cursor += 1;
                            AssemblerState::AccumulatingPrefix
                        }
                        Some(line) => match self.rules.find_anchor(line.text) {
                            Some(anchor) => {
                                found = Some(anchor);
                                AssemblerState::AnchorFound
                            }
                            None => {
                                if !(self.rules.exclude_from_prefix)(line.text) {
                                    prefix.push(*line);
                                }
                                self.cursor += 1;
                                AssemblerState::AccumulatingPrefix
                            }
                        },
                    }
                }

                AssemblerState::AnchorFound => match found.take() {
                    Some((anchor_value, anchor_range)) => {
                        span = Some(RecordSpan {
                            prefix: std::mem::take(&mut prefix),
                            anchor: self.lines[self.cursor],
                            anchor_value,
                            anchor_range,
                            continuation: Vec::new(),
                        });
                        AssemblerState::Harvesting
                    }
                    None => AssemblerState::AccumulatingPrefix,
                },

                AssemblerState::Harvesting => {
                    if let Some(current) = span.as_mut() {
                        let consumed = self.harvest(current);
                        self.cursor += consumed;
                    }
                    AssemblerState::EmitOrDiscard
                }

                AssemblerState::EmitOrDiscard => {
                    if let Some(current) = span.take() {
                        match on_record(&current) {
                            Verdict::Emit => stats.emitted += 1,
                            Verdict::Discard => stats.discarded += 1,
                        }
                    }
                    // One line past the span, emitted or not: the next anchor
                    // may sit right after it.
                    self.cursor += 1;
                    AssemblerState::AccumulatingPrefix
                }

                AssemblerState::Done => break,
            };
        }

        stats
    }

    /// Collect look-ahead lines into `span`; returns how many lines were consumed.
    fn harvest(&self, span: &mut RecordSpan<'a>) -> usize {
        let mut consumed = 0;
        loop {
            if self.rules.lookahead.is_some_and(|max| consumed >= max) {
                break;
            }
            let Some(line) = self.lines.get(self.cursor + 1 + consumed) else {
                break;
            };
            if self.rules.is_terminator(line.text) {
                break;
            }
            if let Some(value) = self.rules.starts_with_anchor(line.text) {
                let opens_next = match self.rules.boundary {
                    Boundary::AnyAnchor => true,
                    Boundary::DifferentAnchor => value != span.anchor_value,
                };
                if opens_next {
                    break;
                }
            }
            consumed += 1;
            if (self.rules.skip_continuation)(line.text) {
                continue;
            }
            span.continuation.push(*line);
        }
        consumed
    }
}
