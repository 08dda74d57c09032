//! Reply parser — splits a model reply into the four labelled rewrite sections.
//!
//! The reply is folded line by line through a small state machine whose state is
//! the section currently being filled. Parsing is total: malformed or empty input
//! degrades to empty fields, never to an error.

use serde::Serialize;

/// The four rewrite variants recovered from a model reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RewriteResult {
    pub corrected: String,
    pub professional: String,
    pub casual: String,
    pub genz: String,
}

impl RewriteResult {
    /// True when no section produced any text.
    pub fn is_empty(&self) -> bool {
        self.corrected.is_empty()
            && self.professional.is_empty()
            && self.casual.is_empty()
            && self.genz.is_empty()
    }

    fn field_mut(&mut self, section: Section) -> &mut String {
        match section {
            Section::Corrected => &mut self.corrected,
            Section::Professional => &mut self.professional,
            Section::Casual => &mut self.casual,
            Section::GenZ => &mut self.genz,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Corrected,
    Professional,
    Casual,
    GenZ,
}

/// Line prefixes, matched ASCII case-insensitively against the trimmed line.
const SECTION_PREFIXES: &[(&str, Section)] = &[
    ("corrected:", Section::Corrected),
    ("professional:", Section::Professional),
    ("casual:", Section::Casual),
    ("gen-z:", Section::GenZ),
    ("genz:", Section::GenZ),
];

/// Parser state between lines. `cursor` is `None` until the first label is seen.
#[derive(Debug, Default)]
struct ParseState {
    cursor: Option<Section>,
    result: RewriteResult,
}

/// If `line` opens a section, returns it with the remainder after the label.
fn match_prefix(line: &str) -> Option<(Section, &str)> {
    SECTION_PREFIXES.iter().find_map(|&(prefix, section)| {
        // `get` returns None when the cut would split a multi-byte char.
        let head = line.get(..prefix.len())?;
        if head.eq_ignore_ascii_case(prefix) {
            Some((section, &line[prefix.len()..]))
        } else {
            None
        }
    })
}

fn step(mut state: ParseState, raw_line: &str) -> ParseState {
    let line = raw_line.trim();

    if let Some((section, rest)) = match_prefix(line) {
        // A repeated label restarts the section; earlier text is dropped.
        *state.result.field_mut(section) = rest.trim().to_string();
        state.cursor = Some(section);
        return state;
    }

    if let Some(section) = state.cursor {
        if !line.is_empty() {
            let field = state.result.field_mut(section);
            if !field.is_empty() {
                field.push(' ');
            }
            field.push_str(line);
        }
    }

    state
}

/// Parses a raw model reply into a `RewriteResult`.
pub fn parse_reply(reply: &str) -> RewriteResult {
    reply.lines().fold(ParseState::default(), step).result
}
