//! Marker diff engine.
//!
//! Computes a word-level diff between an old and a new field value and
//! renders it with channel-specific markers around additions and removals:
//!
//! ```text
//! old:  the quick fox
//! new:  the slow fox
//! mark: the <!remove>quick<!remove> <!add>slow<!add> fox
//! slack: the ~quick~ *slow* fox
//! ```

use crate::profile::RenderingProfile;

/// Sentinel wrapped around inserted text before channel substitution.
pub const ADD_SENTINEL: &str = "<!add>";
/// Sentinel wrapped around deleted text before channel substitution.
pub const REMOVE_SENTINEL: &str = "<!remove>";

/// What a diff run does to the old text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Equal,
    Insert,
    Delete,
}

/// A maximal stretch of text sharing one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub op: Operation,
    pub text: String,
}

impl Run {
    #[must_use]
    pub fn new(op: Operation, text: impl Into<String>) -> Self {
        Self {
            op,
            text: text.into(),
        }
    }

    const fn is_edit(&self) -> bool {
        !matches!(self.op, Operation::Equal)
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Split text into alternating word and whitespace tokens.
fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_whitespace: Option<bool> = None;

    for (idx, ch) in text.char_indices() {
        let is_whitespace = ch.is_whitespace();
        match in_whitespace {
            Some(current) if current == is_whitespace => {}
            Some(_) => {
                tokens.push(&text[start..idx]);
                start = idx;
                in_whitespace = Some(is_whitespace);
            }
            None => in_whitespace = Some(is_whitespace),
        }
    }

    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}

/// Token-level longest-common-subsequence diff of `old` against `new`.
///
/// The common prefix and suffix are split off first; the middle is aligned
/// in linear space, so memory stays proportional to the input length.
/// Returned runs are normalized: adjacent runs never share an operation
/// and within an edit region the deletion precedes the insertion.
#[must_use]
pub fn diff_tokens(old: &str, new: &str) -> Vec<Run> {
    let old_tokens = tokenize(old);
    let new_tokens = tokenize(new);

    let prefix = old_tokens
        .iter()
        .zip(&new_tokens)
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = old_tokens[prefix..]
        .iter()
        .rev()
        .zip(new_tokens[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let old_middle = &old_tokens[prefix..old_tokens.len() - suffix];
    let new_middle = &new_tokens[prefix..new_tokens.len() - suffix];

    let mut runs = Vec::with_capacity(old_tokens.len() + new_tokens.len());
    push_all(&mut runs, Operation::Equal, &old_tokens[..prefix]);
    align(old_middle, new_middle, &mut runs);
    push_all(&mut runs, Operation::Equal, &old_tokens[old_tokens.len() - suffix..]);

    normalize(runs)
}

fn push_all(runs: &mut Vec<Run>, op: Operation, tokens: &[&str]) {
    runs.extend(tokens.iter().map(|token| Run::new(op, *token)));
}

/// Hirschberg alignment: split `old` in half, find where the halves meet
/// `new` on an optimal alignment, and recurse on both sides.
fn align(old: &[&str], new: &[&str], runs: &mut Vec<Run>) {
    if old.is_empty() {
        push_all(runs, Operation::Insert, new);
        return;
    }
    if new.is_empty() {
        push_all(runs, Operation::Delete, old);
        return;
    }
    if let [token] = old {
        match new.iter().position(|candidate| candidate == token) {
            Some(pos) => {
                push_all(runs, Operation::Insert, &new[..pos]);
                runs.push(Run::new(Operation::Equal, *token));
                push_all(runs, Operation::Insert, &new[pos + 1..]);
            }
            None => {
                runs.push(Run::new(Operation::Delete, *token));
                push_all(runs, Operation::Insert, new);
            }
        }
        return;
    }

    let mid = old.len() / 2;
    let forward = lcs_row(old[..mid].iter(), new.iter(), new.len());
    let backward = lcs_row(old[mid..].iter().rev(), new.iter().rev(), new.len());

    // forward[j]: LCS of old[..mid] and new[..j]
    // backward[k]: LCS of old[mid..] and new[new.len() - k..]
    let mut split = 0;
    let mut best = 0;
    for j in 0..=new.len() {
        let score = forward[j] + backward[new.len() - j];
        if score > best {
            best = score;
            split = j;
        }
    }

    align(&old[..mid], &new[..split], runs);
    align(&old[mid..], &new[split..], runs);
}

/// Last row of the LCS length table of `a` against every prefix of `b`.
fn lcs_row<T: PartialEq>(
    a: impl Iterator<Item = T>,
    b: impl Iterator<Item = T> + Clone,
    b_len: usize,
) -> Vec<usize> {
    let mut prev = vec![0_usize; b_len + 1];
    let mut cur = vec![0_usize; b_len + 1];

    for x in a {
        for (j, y) in b.clone().enumerate() {
            cur[j + 1] = if x == y {
                prev[j] + 1
            } else {
                prev[j + 1].max(cur[j])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    prev
}

/// Merge neighbouring runs so each edit region is one deletion followed by
/// one insertion and equal runs never touch.
fn normalize(runs: Vec<Run>) -> Vec<Run> {
    let mut out: Vec<Run> = Vec::with_capacity(runs.len());
    let mut deleted = String::new();
    let mut inserted = String::new();

    for run in runs {
        match run.op {
            Operation::Delete => deleted.push_str(&run.text),
            Operation::Insert => inserted.push_str(&run.text),
            Operation::Equal => {
                flush_edits(&mut out, &mut deleted, &mut inserted);
                if run.text.is_empty() {
                    continue;
                }
                match out.last_mut() {
                    Some(last) if last.op == Operation::Equal => last.text.push_str(&run.text),
                    _ => out.push(run),
                }
            }
        }
    }

    flush_edits(&mut out, &mut deleted, &mut inserted);
    out
}

fn flush_edits(out: &mut Vec<Run>, deleted: &mut String, inserted: &mut String) {
    if !deleted.is_empty() {
        out.push(Run::new(Operation::Delete, std::mem::take(deleted)));
    }
    if !inserted.is_empty() {
        out.push(Run::new(Operation::Insert, std::mem::take(inserted)));
    }
}

/// Fold short equalities into the edits around them.
///
/// An equal run between two edit regions is absorbed when it is no longer
/// than the larger side (deleted or inserted) of both neighbours. Repeats
/// until nothing changes, so the result has fewer, longer runs.
#[must_use]
pub fn cleanup_semantic(runs: Vec<Run>) -> Vec<Run> {
    let mut runs = normalize(runs);

    while let Some(idx) = find_absorbable_equality(&runs) {
        let text = std::mem::take(&mut runs[idx].text);
        runs.splice(
            idx..=idx,
            [
                Run::new(Operation::Delete, text.clone()),
                Run::new(Operation::Insert, text),
            ],
        );
        runs = normalize(runs);
    }

    runs
}

fn find_absorbable_equality(runs: &[Run]) -> Option<usize> {
    (1..runs.len().saturating_sub(1)).find(|&idx| {
        let run = &runs[idx];
        let len = run.char_len();
        run.op == Operation::Equal
            && len <= edit_weight(runs[..idx].iter().rev())
            && len <= edit_weight(runs[idx + 1..].iter())
    })
}

/// Larger of deleted and inserted length in the edit region at the head of `runs`.
fn edit_weight<'a>(runs: impl Iterator<Item = &'a Run>) -> usize {
    let (mut deleted, mut inserted) = (0, 0);
    for run in runs.take_while(|run| run.is_edit()) {
        match run.op {
            Operation::Delete => deleted += run.char_len(),
            Operation::Insert => inserted += run.char_len(),
            Operation::Equal => {}
        }
    }
    deleted.max(inserted)
}

/// Diff `old` against `new` and wrap edits in the internal sentinels.
///
/// A missing old value diffs as the empty string. Each run is trimmed and
/// runs are joined with single spaces; runs that trim to nothing are dropped.
#[must_use]
pub fn mark_diff(old: Option<&str>, new: &str) -> String {
    let old = old.unwrap_or_default();

    cleanup_semantic(diff_tokens(old, new))
        .iter()
        .filter_map(|run| {
            let text = run.text.trim();
            if text.is_empty() {
                return None;
            }
            Some(match run.op {
                Operation::Equal => text.to_string(),
                Operation::Insert => format!("{ADD_SENTINEL}{text}{ADD_SENTINEL}"),
                Operation::Delete => format!("{REMOVE_SENTINEL}{text}{REMOVE_SENTINEL}"),
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Replace successive `marker` occurrences alternately with `open` and `close`.
///
/// Pairing is not validated: an odd number of markers leaves a dangling open tag.
#[must_use]
pub fn replace_markers(diff: &str, marker: &str, open: &str, close: &str) -> String {
    let mut out = String::with_capacity(diff.len());
    let mut rest = diff;
    let mut index = 0_usize;

    while let Some(pos) = rest.find(marker) {
        out.push_str(&rest[..pos]);
        out.push_str(if index % 2 == 0 { open } else { close });
        rest = &rest[pos + marker.len()..];
        index += 1;
    }

    out.push_str(rest);
    out
}

/// Render the diff of `old` against `new` with the profile's markers.
#[must_use]
pub fn render_diff<P: RenderingProfile + ?Sized>(
    profile: &P,
    old: Option<&str>,
    new: &str,
) -> String {
    let marked = mark_diff(old, new);
    let marked = replace_markers(
        &marked,
        ADD_SENTINEL,
        profile.add_marker(),
        profile.add_marker_close(),
    );
    replace_markers(
        &marked,
        REMOVE_SENTINEL,
        profile.remove_marker(),
        profile.remove_marker_close(),
    )
}
