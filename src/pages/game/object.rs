/// Axis-aligned box in world coordinates, half-open on every side.
/// `y` grows downward from the top of the playfield.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Bounds {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Bounds { left, top, right: left + width, bottom: top + height }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

pub trait Object {
    fn get_size(&self) -> (f64, f64);
    fn get_pos(&self) -> (f64, f64);

    fn bounds(&self) -> Bounds {
        let (x, y) = self.get_pos();
        let (width, height) = self.get_size();
        Bounds::new(x, y, width, height)
    }

    /// Strict overlap on both axes; boxes that only share an edge do not collide.
    fn collides_with<T: Object>(&self, other: &T) -> bool {
        let a = self.bounds();
        let b = other.bounds();

        interval_sec(a.left, a.right, b.left, b.right) && interval_sec(a.top, a.bottom, b.top, b.bottom)
    }
}

impl Object for Bounds {
    fn get_size(&self) -> (f64, f64) {
        (self.width(), self.height())
    }

    fn get_pos(&self) -> (f64, f64) {
        (self.left, self.top)
    }

    fn bounds(&self) -> Bounds {
        *self
    }
}

fn interval_sec(l1: f64, r1: f64, l2: f64, r2: f64) -> bool {
    r1 > l2 && l1 < r2
}
