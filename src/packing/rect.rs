/// A rectangle in top-left raster space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> u64 {
        u64::from(self.x) + u64::from(self.width)
    }

    pub fn bottom(&self) -> u64 {
        u64::from(self.y) + u64::from(self.height)
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        u64::from(self.x) < other.right()
            && self.right() > u64::from(other.x)
            && u64::from(self.y) < other.bottom()
            && self.bottom() > u64::from(other.y)
    }

    pub fn contains(&self, other: &Rect) -> bool {
        self.x <= other.x
            && self.y <= other.y
            && self.right() >= other.right()
            && self.bottom() >= other.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacent_cells_do_not_intersect() {
        let a = Rect::new(0, 0, 32, 32);
        let b = Rect::new(32, 0, 32, 32);
        let c = Rect::new(16, 16, 32, 32);

        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
        assert!(c.intersects(&b));
    }

    #[test]
    fn test_contains_edges() {
        let canvas = Rect::new(0, 0, 68, 68);

        assert!(canvas.contains(&Rect::new(36, 36, 32, 32)));
        assert!(!canvas.contains(&Rect::new(37, 36, 32, 32)));
        assert!(!canvas.contains(&Rect::new(u32::MAX, 0, 1, 1)));
    }
}
