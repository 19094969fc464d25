use ratatui::layout::{Position, Rect};

/// Whether the terminal cell `(x, y)` lies within `rect`.
#[inline]
pub fn is_inside(x: u16, y: u16, rect: Rect) -> bool {
    rect.contains(Position { x, y })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        let rect = Rect::new(2, 3, 4, 2);
        assert!(is_inside(2, 3, rect));
        assert!(is_inside(5, 4, rect));
        assert!(!is_inside(6, 4, rect));
        assert!(!is_inside(2, 5, rect));
        assert!(!is_inside(0, 0, Rect::default()));
    }
}
