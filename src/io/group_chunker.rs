//! Boundary-aware group chunker
//!
//! Streams lines from a partition and yields maximal runs of consecutive lines
//! that share a grouping key (the first delimited token of each line).
//!
//! # Design
//!
//! The input is read in batches of `buffer_size` lines. A batch is only a unit
//! of I/O: the chunker carries a pending buffer of lines for the key currently
//! being accumulated, and a group is closed only when a line with a different
//! key shows up. A group that straddles a batch edge therefore comes out whole,
//! and the output does not depend on the batch size.
//!
//! ```text
//! batch 1: 1 1 1 | 2 2        batch 2: 2 2 | 3
//!          -----   ---                 ---   -
//!          yield   pending ----------> yield pending (flushed at EOF)
//!          [1 1 1]                     [2 2 2 2]     [3]
//! ```
//!
//! # Memory Efficiency
//!
//! At most one group is in flight. Memory use is bounded by the largest group
//! plus one batch, not by the size of the partition.
//!
//! # Error Handling
//!
//! Blank lines carry no record and are skipped. Read failures and malformed
//! keys end the sequence: the error is yielded once and the iterator is fused
//! afterwards.

use crate::types::{parse_account_id, AccountId, Group, RawLine, SummaryError};
use std::collections::VecDeque;
use std::io::BufRead;
use std::iter::FusedIterator;
use std::mem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChunkerState {
    Reading,
    Exhausted,
    Failed,
}

/// Streaming chunker over a sorted line stream
///
/// One instance owns the pending-buffer state for exactly one partition.
///
/// # Examples
///
/// ```
/// use rust_account_summary::io::GroupChunker;
/// use std::io::Cursor;
///
/// let input = "1|a\n1|b\n2|c\n";
/// let groups: Vec<_> = GroupChunker::new(Cursor::new(input), b'|', 1)
///     .collect::<Result<_, _>>()
///     .unwrap();
///
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups[0].key, 1);
/// assert_eq!(groups[0].lines.len(), 2);
/// ```
#[derive(Debug)]
pub struct GroupChunker<R> {
    reader: R,
    delimiter: u8,
    buffer_size: usize,
    verify_order: bool,
    pending: Vec<RawLine>,
    pending_key: Option<AccountId>,
    ready: VecDeque<Group>,
    line_number: usize,
    state: ChunkerState,
}

impl<R: BufRead> GroupChunker<R> {
    /// Create a chunker reading `buffer_size` lines per batch
    ///
    /// A `buffer_size` of zero is treated as one.
    pub fn new(reader: R, delimiter: u8, buffer_size: usize) -> Self {
        Self {
            reader,
            delimiter,
            buffer_size: buffer_size.max(1),
            verify_order: false,
            pending: Vec::new(),
            pending_key: None,
            ready: VecDeque::new(),
            line_number: 0,
            state: ChunkerState::Reading,
        }
    }

    /// Reject keys that are lower than their predecessor
    pub fn verify_order(mut self, enabled: bool) -> Self {
        self.verify_order = enabled;
        self
    }

    /// Consume one line without grouping it
    ///
    /// Used for the header row. Line numbering still counts the skipped line.
    /// Returns `Ok(None)` on an empty stream.
    pub fn skip_line(&mut self) -> Result<Option<RawLine>, SummaryError> {
        let line = self.read_line()?;
        if line.is_none() {
            self.state = ChunkerState::Exhausted;
        }
        Ok(line)
    }

    fn read_line(&mut self) -> Result<Option<RawLine>, SummaryError> {
        let mut text = String::new();
        let read = self
            .reader
            .read_line(&mut text)
            .map_err(|e| SummaryError::stream(self.line_number + 1, &e))?;
        if read == 0 {
            return Ok(None);
        }

        self.line_number += 1;
        if text.ends_with('\n') {
            text.pop();
            if text.ends_with('\r') {
                text.pop();
            }
        }
        Ok(Some(RawLine {
            number: self.line_number,
            text,
        }))
    }

    /// Read up to `buffer_size` non-blank lines
    ///
    /// Blank lines are dropped but still advance the line counter.
    fn read_batch(&mut self) -> Result<Vec<RawLine>, SummaryError> {
        let mut batch = Vec::with_capacity(self.buffer_size);
        while batch.len() < self.buffer_size {
            match self.read_line()? {
                Some(line) if line.text.trim().is_empty() => {}
                Some(line) => batch.push(line),
                None => {
                    self.state = ChunkerState::Exhausted;
                    break;
                }
            }
        }
        Ok(batch)
    }

    fn key_of(&self, line: &RawLine) -> Result<AccountId, SummaryError> {
        let token = match line.text.bytes().position(|b| b == self.delimiter) {
            Some(end) => &line.text[..end],
            None => line.text.as_str(),
        };
        parse_account_id(token).ok_or_else(|| SummaryError::malformed_key(line.number, token))
    }

    /// Split one batch at its key-change boundaries
    ///
    /// Lines up to the first boundary extend the pending group. Every boundary
    /// closes the pending group and opens a new one; the segment after the last
    /// boundary stays pending for the next batch.
    fn absorb(&mut self, mut batch: Vec<RawLine>) -> Result<(), SummaryError> {
        let keys = batch
            .iter()
            .map(|line| self.key_of(line))
            .collect::<Result<Vec<_>, _>>()?;

        let mut boundaries = Vec::new();
        let mut previous = self.pending_key;
        for (idx, &key) in keys.iter().enumerate() {
            if let Some(prev) = previous {
                if key != prev {
                    if self.verify_order && key < prev {
                        return Err(SummaryError::OutOfOrderKey {
                            line: batch[idx].number,
                            previous: prev,
                            found: key,
                        });
                    }
                    boundaries.push(idx);
                }
            }
            previous = Some(key);
        }

        if self.pending_key.is_none() {
            self.pending_key = keys.first().copied();
        }

        // Cut from the back so the remaining indices stay valid
        let mut segments = Vec::with_capacity(boundaries.len());
        for &boundary in boundaries.iter().rev() {
            segments.push((keys[boundary], batch.split_off(boundary)));
        }
        self.pending.append(&mut batch);

        for (key, segment) in segments.into_iter().rev() {
            let lines = mem::replace(&mut self.pending, segment);
            if let Some(closed) = self.pending_key.replace(key) {
                self.ready.push_back(Group { key: closed, lines });
            }
        }

        Ok(())
    }

    fn fill(&mut self) -> Result<(), SummaryError> {
        let batch = self.read_batch()?;
        self.absorb(batch)
    }
}

impl<R: BufRead> Iterator for GroupChunker<R> {
    type Item = Result<Group, SummaryError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(group) = self.ready.pop_front() {
                return Some(Ok(group));
            }

            match self.state {
                ChunkerState::Failed => return None,
                ChunkerState::Exhausted => {
                    let key = self.pending_key.take()?;
                    let lines = mem::take(&mut self.pending);
                    return Some(Ok(Group { key, lines }));
                }
                ChunkerState::Reading => {}
            }

            if let Err(e) = self.fill() {
                self.state = ChunkerState::Failed;
                self.pending.clear();
                self.pending_key = None;
                self.ready.clear();
                return Some(Err(e));
            }
        }
    }
}

impl<R: BufRead> FusedIterator for GroupChunker<R> {}
