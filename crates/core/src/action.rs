//! Primitive action alphabet and its text form.
//!
//! A script is a comma-separated run of records like `N,C1,L3,D17`. `N`
//! starts a new piece and carries no count; the other letters carry a
//! repeat count (two digits only from 10 up).

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum ActionKind {
    Down,
    Left,
    Right,
    Rotate,
    New,
}

impl ActionKind {
    pub const fn letter(self) -> char {
        match self {
            ActionKind::Down => 'D',
            ActionKind::Left => 'L',
            ActionKind::Right => 'R',
            ActionKind::Rotate => 'C',
            ActionKind::New => 'N',
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        match c {
            'D' => Some(ActionKind::Down),
            'L' => Some(ActionKind::Left),
            'R' => Some(ActionKind::Right),
            'C' => Some(ActionKind::Rotate),
            'N' => Some(ActionKind::New),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Action {
    pub kind: ActionKind,
    pub by: u8,
}

impl Action {
    pub const fn new_piece() -> Self {
        Self { kind: ActionKind::New, by: 0 }
    }

    pub const fn down(by: u8) -> Self {
        Self { kind: ActionKind::Down, by }
    }

    pub const fn left(by: u8) -> Self {
        Self { kind: ActionKind::Left, by }
    }

    pub const fn right(by: u8) -> Self {
        Self { kind: ActionKind::Right, by }
    }

    pub const fn rotate(by: u8) -> Self {
        Self { kind: ActionKind::Rotate, by }
    }
}

/// Per-piece action list; routes are almost always a handful of records.
pub type ActionList = SmallVec<[Action; 4]>;

fn append_record(out: &mut String, a: Action) {
    if !out.is_empty() {
        out.push(',');
    }
    out.push(a.kind.letter());
    if a.kind != ActionKind::New {
        if a.by < 10 {
            out.push((b'0' + a.by) as char);
        } else {
            out.push((b'0' + a.by / 10) as char);
            out.push((b'0' + a.by % 10) as char);
        }
    }
}

/// Render a script, merging adjacent records of the same kind.
///
/// Merging happens only here: the in-memory lists are routinely truncated
/// back to a checkpoint, which merged records would break.
pub fn join(actions: &[Action]) -> String {
    let mut out = String::new();
    let mut iter = actions.iter();
    let Some(&first) = iter.next() else {
        return out;
    };
    let mut hold = first;
    for &a in iter {
        if a.kind == hold.kind {
            hold.by += a.by;
        } else {
            append_record(&mut out, hold);
            hold = a;
        }
    }
    append_record(&mut out, hold);
    out
}

/// Parse a rendered script back into records. Returns `None` on any
/// malformed record.
pub fn parse(script: &str) -> Option<Vec<Action>> {
    if script.is_empty() {
        return Some(Vec::new());
    }
    let mut out = Vec::new();
    for part in script.split(',') {
        let mut chars = part.chars();
        let kind = ActionKind::from_letter(chars.next()?)?;
        let rest = chars.as_str();
        let by = match kind {
            ActionKind::New => {
                if !rest.is_empty() {
                    return None;
                }
                0
            }
            _ => rest.parse::<u8>().ok()?,
        };
        out.push(Action { kind, by });
    }
    Some(out)
}
