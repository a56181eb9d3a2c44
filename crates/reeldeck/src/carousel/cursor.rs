/// Index into the video list, always inside `[0, total - 1]` while the list
/// is non-empty.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct Cursor {
    index: usize,
    total: usize,
}

impl Cursor {
    pub fn new(total: usize) -> Self {
        Self { index: 0, total }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn clamp(&self, target: i64) -> usize {
        if self.total == 0 {
            return 0;
        }

        target.clamp(0, self.total as i64 - 1) as usize
    }

    /// Moves to the clamped target. Returns the new index if it changed.
    pub fn go_to(&mut self, target: i64) -> Option<usize> {
        let index = self.clamp(target);
        if index == self.index {
            return None;
        }

        self.index = index;
        Some(index)
    }

    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.index = self.clamp(self.index as i64);
    }

    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cursor_stays_at_zero() {
        let mut cursor = Cursor::new(0);
        assert_eq!(cursor.go_to(5), None);
        assert_eq!(cursor.go_to(-5), None);
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn go_to_clamps_both_ends() {
        let mut cursor = Cursor::new(4);
        assert_eq!(cursor.go_to(10), Some(3));
        assert_eq!(cursor.go_to(11), None);
        assert_eq!(cursor.go_to(-1), Some(0));
        assert_eq!(cursor.go_to(-100), None);
    }

    #[test]
    fn any_step_sequence_stays_in_bounds() {
        let mut cursor = Cursor::new(5);
        let steps = [1i64, 1, 1, 1, 1, 1, 1, -1, -1, -1, -1, -1, -1, -1, 3, -9, 8];

        for step in steps {
            cursor.go_to(cursor.index() as i64 + step);
            assert!(cursor.index() < cursor.total());
        }
    }

    #[test]
    fn shrinking_total_reclamps() {
        let mut cursor = Cursor::new(10);
        cursor.go_to(8);
        cursor.set_total(3);
        assert_eq!(cursor.index(), 2);
        assert_eq!(cursor.remaining(), 1);
    }
}
