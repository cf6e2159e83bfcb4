//! Camera of the demo game.

use ultraviolet::Vec2;

/// Part of the map which is visible on the screen.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    /// Top left corner of the view in world coordinates.
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
    map_width: f32,
    map_height: f32,
}

impl Camera {
    /// Creates the camera in the top left corner of the map.
    pub fn new(width: f32, height: f32, map_width: f32, map_height: f32) -> Self {
        Self {
            position: Vec2::zero(),
            width,
            height,
            map_width,
            map_height,
        }
    }

    /// Size of the map the camera moves over.
    pub fn map_size(&self) -> (f32, f32) {
        (self.map_width, self.map_height)
    }

    /// Centers the view on `target`, never showing anything beyond the edges of the map.
    pub fn center_on(&mut self, target: Vec2) {
        let max_x = (self.map_width - self.width).max(0.0);
        let max_y = (self.map_height - self.height).max(0.0);
        self.position = Vec2::new(
            (target.x - self.width / 2.0).clamp(0.0, max_x),
            (target.y - self.height / 2.0).clamp(0.0, max_y),
        );
    }

    /// Converts world coordinates into coordinates on the screen.
    pub fn to_screen(&self, point: Vec2) -> Vec2 {
        point - self.position
    }
}
