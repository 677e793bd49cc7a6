use std::ops::{Index, IndexMut};

/// Stable handle to a line slot in a [`LineArena`].
///
/// Ids stay valid across unrelated insertions and removals; removing a line
/// marks its slot free without shifting the others, so a stored id can never
/// silently start pointing at a different line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineId(usize);

/// One row of text, independent of display width.
///
/// `text` never contains `\n` or `\r` — line boundaries are structural, kept
/// in `prev`/`next`, not textual. `lineno` is the 1-based position of the
/// line within its buffer and must always equal the previous line's
/// `lineno + 1` (or 1 at the head); the buffer renumbers eagerly after every
/// structural change.
#[derive(Debug)]
pub struct Line {
    pub text: String,
    pub lineno: usize,
    pub prev: Option<LineId>,
    pub next: Option<LineId>,
}

impl Line {
    pub fn new(text: String) -> Self {
        Self {
            text,
            lineno: 0,
            prev: None,
            next: None,
        }
    }

    /// Bytes in use, excluding any terminator.
    pub fn size(&self) -> usize {
        self.text.len()
    }
}

/// Slot arena holding the lines of one buffer.
///
/// Removal pushes the slot onto a free list instead of shifting, so the
/// links held by neighboring lines (and the buffer's `head`/`tail`/`current`)
/// survive every mutation that doesn't explicitly retarget them.
#[derive(Debug, Default)]
pub struct LineArena {
    slots: Vec<Option<Line>>,
    free: Vec<usize>,
    live: usize,
}

impl LineArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, line: Line) -> LineId {
        self.live += 1;
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(line);
                LineId(slot)
            }
            None => {
                self.slots.push(Some(line));
                LineId(self.slots.len() - 1)
            }
        }
    }

    /// Remove a line, returning it. The slot is recycled by later inserts.
    pub fn remove(&mut self, id: LineId) -> Line {
        let line = self.slots[id.0].take().expect("stale LineId");
        self.free.push(id.0);
        self.live -= 1;
        line
    }

    pub fn get(&self, id: LineId) -> Option<&Line> {
        self.slots.get(id.0).and_then(|slot| slot.as_ref())
    }

    /// Number of live lines.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }
}

impl Index<LineId> for LineArena {
    type Output = Line;

    fn index(&self, id: LineId) -> &Line {
        self.slots[id.0].as_ref().expect("stale LineId")
    }
}

impl IndexMut<LineId> for LineArena {
    fn index_mut(&mut self, id: LineId) -> &mut Line {
        self.slots[id.0].as_mut().expect("stale LineId")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_index() {
        let mut arena = LineArena::new();
        let id = arena.insert(Line::new("hello".to_string()));
        assert_eq!(arena[id].text, "hello");
        assert_eq!(arena[id].size(), 5);
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn remove_recycles_slot() {
        let mut arena = LineArena::new();
        let a = arena.insert(Line::new("a".to_string()));
        let b = arena.insert(Line::new("b".to_string()));
        let removed = arena.remove(a);
        assert_eq!(removed.text, "a");
        assert_eq!(arena.len(), 1);
        assert!(arena.get(a).is_none());

        // The freed slot is reused, and the surviving id is untouched.
        let c = arena.insert(Line::new("c".to_string()));
        assert_eq!(c, a);
        assert_eq!(arena[b].text, "b");
        assert_eq!(arena[c].text, "c");
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn stale_id_lookup_is_none() {
        let mut arena = LineArena::new();
        let id = arena.insert(Line::new(String::new()));
        arena.remove(id);
        assert!(arena.get(id).is_none());
    }
}
