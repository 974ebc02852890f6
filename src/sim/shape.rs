//! Collision shapes
//!
//! A shape is anchored at the top-left corner of its owner's rectangle:
//! - `Shape::Rect`: the whole rectangle is solid
//! - `Shape::Mask`: per-pixel opacity, the higher-fidelity model used for
//!   sprites with transparent regions and for spent (destroyed) blocks

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::Rect;
use crate::error::SimError;

/// Alpha values above this count as opaque
pub const ALPHA_THRESHOLD: u8 = 127;

/// Per-pixel opacity bitmap, row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpacityMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
    /// Opaque pixel count, kept in step with `bits`
    opaque: usize,
}

impl OpacityMask {
    /// Fully opaque mask
    pub fn filled(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            bits: vec![true; len],
            opaque: len,
        }
    }

    /// Fully transparent mask
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![false; width as usize * height as usize],
            opaque: 0,
        }
    }

    /// Build from an alpha channel (one byte per pixel, row-major)
    pub fn from_alpha(width: u32, height: u32, alpha: &[u8]) -> Result<Self, SimError> {
        if alpha.len() != width as usize * height as usize {
            return Err(SimError::missing(format!(
                "alpha channel of {}x{} mask ({} bytes supplied)",
                width,
                height,
                alpha.len()
            )));
        }
        let bits: Vec<bool> = alpha.iter().map(|&a| a > ALPHA_THRESHOLD).collect();
        let opaque = bits.iter().filter(|&&b| b).count();
        Ok(Self {
            width,
            height,
            bits,
            opaque,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Opacity at local pixel coordinates; outside the bitmap is transparent
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        self.bits[y as usize * self.width as usize + x as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, opaque: bool) {
        if x < self.width && y < self.height {
            let bit = &mut self.bits[y as usize * self.width as usize + x as usize];
            match (*bit, opaque) {
                (false, true) => self.opaque += 1,
                (true, false) => self.opaque -= 1,
                _ => {}
            }
            *bit = opaque;
        }
    }

    /// Number of opaque pixels
    #[inline]
    pub fn count(&self) -> usize {
        self.opaque
    }

    pub fn clear(&mut self) {
        self.bits.iter_mut().for_each(|b| *b = false);
        self.opaque = 0;
    }

    /// Bitmap matches its dimensions and cached count (deserialized masks)
    pub fn validate(&self) -> Result<(), SimError> {
        let len = self.width as usize * self.height as usize;
        if self.bits.len() != len {
            return Err(SimError::ImpossibleState(format!(
                "{}x{} mask carries {} pixels",
                self.width,
                self.height,
                self.bits.len()
            )));
        }
        let opaque = self.bits.iter().filter(|&&b| b).count();
        if opaque != self.opaque {
            return Err(SimError::ImpossibleState(format!(
                "mask claims {} opaque pixels, has {}",
                self.opaque, opaque
            )));
        }
        Ok(())
    }
}

/// Collision shape of a drawable/collidable entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Solid bounding rectangle (reduced fidelity: ignores transparent pixels)
    Rect,
    /// Per-pixel opacity
    Mask(OpacityMask),
}

impl Shape {
    /// Whether anything can touch this shape at all
    pub fn is_collidable(&self) -> bool {
        match self {
            Shape::Rect => true,
            Shape::Mask(mask) => mask.count() > 0,
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        match self {
            Shape::Rect => Ok(()),
            Shape::Mask(mask) => mask.validate(),
        }
    }

    /// Replace with a fully transparent mask covering `size`
    pub fn make_passable(&mut self, rect: &Rect) {
        match self {
            Shape::Mask(mask) => mask.clear(),
            Shape::Rect => {
                *self = Shape::Mask(OpacityMask::empty(
                    rect.size.x.ceil() as u32,
                    rect.size.y.ceil() as u32,
                ));
            }
        }
    }

    /// Pixel extent used when scanning this shape
    fn extent(&self, rect: &Rect) -> IVec2 {
        match self {
            Shape::Rect => IVec2::new(rect.size.x.ceil() as i32, rect.size.y.ceil() as i32),
            Shape::Mask(mask) => IVec2::new(mask.width as i32, mask.height as i32),
        }
    }

    #[inline]
    fn opaque_at(&self, local: IVec2, extent: IVec2) -> bool {
        match self {
            Shape::Rect => local.x >= 0 && local.y >= 0 && local.x < extent.x && local.y < extent.y,
            Shape::Mask(mask) => mask.get(local.x, local.y),
        }
    }
}

/// Overlap test between two positioned shapes.
///
/// Two rectangles use a strict bounding-box test. As soon as either side
/// carries a mask, the shared pixel region is scanned for a pixel that is
/// opaque in both.
pub fn overlaps(a: &Shape, a_rect: &Rect, b: &Shape, b_rect: &Rect) -> bool {
    if !a_rect.intersects(b_rect) {
        return false;
    }
    if let (Shape::Rect, Shape::Rect) = (a, b) {
        return true;
    }

    let a_origin = a_rect.pos.floor().as_ivec2();
    let b_origin = b_rect.pos.floor().as_ivec2();
    let a_extent = a.extent(a_rect);
    let b_extent = b.extent(b_rect);

    let min = a_origin.max(b_origin);
    let max = (a_origin + a_extent).min(b_origin + b_extent);

    for y in min.y..max.y {
        for x in min.x..max.x {
            let p = IVec2::new(x, y);
            if a.opaque_at(p - a_origin, a_extent) && b.opaque_at(p - b_origin, b_extent) {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_overlap_is_strict() {
        let a = Rect::new(0.0, 0.0, 50.0, 50.0);
        let touching = Rect::new(50.0, 0.0, 10.0, 10.0);
        let inside = Rect::new(49.0, 49.0, 10.0, 10.0);
        assert!(!overlaps(&Shape::Rect, &a, &Shape::Rect, &touching));
        assert!(overlaps(&Shape::Rect, &a, &Shape::Rect, &inside));
    }

    #[test]
    fn test_mask_transparent_corner_misses() {
        // 4x4 mask with only the top-left pixel opaque
        let mut mask = OpacityMask::empty(4, 4);
        mask.set(0, 0, true);
        let shape = Shape::Mask(mask);
        let a = Rect::new(0.0, 0.0, 4.0, 4.0);

        let far_corner = Rect::new(3.0, 3.0, 2.0, 2.0);
        assert!(!overlaps(&shape, &a, &Shape::Rect, &far_corner));

        let near_corner = Rect::new(-1.0, -1.0, 2.0, 2.0);
        assert!(overlaps(&shape, &a, &Shape::Rect, &near_corner));
    }

    #[test]
    fn test_passable_shape_never_overlaps() {
        let rect = Rect::new(0.0, 0.0, 96.0, 96.0);
        let mut shape = Shape::Rect;
        assert!(shape.is_collidable());

        shape.make_passable(&rect);
        assert!(!shape.is_collidable());
        assert!(!overlaps(&shape, &rect, &Shape::Rect, &Rect::new(10.0, 10.0, 50.0, 50.0)));
    }

    #[test]
    fn test_from_alpha_threshold() {
        let mask = OpacityMask::from_alpha(2, 2, &[0, 127, 128, 255]).unwrap();
        assert_eq!(mask.count(), 2);
        assert!(!mask.get(1, 0));
        assert!(mask.get(0, 1));
        assert!(OpacityMask::from_alpha(2, 2, &[255; 3]).is_err());
    }

    #[test]
    fn test_count_tracks_edits() {
        let mut mask = OpacityMask::empty(3, 3);
        mask.set(1, 1, true);
        mask.set(1, 1, true);
        mask.set(2, 0, true);
        assert_eq!(mask.count(), 2);
        mask.set(1, 1, false);
        assert_eq!(mask.count(), 1);
        assert!(mask.validate().is_ok());

        mask.clear();
        assert_eq!(mask.count(), 0);
        assert!(!Shape::Mask(mask).is_collidable());
        assert_eq!(OpacityMask::filled(4, 2).count(), 8);
    }

    #[test]
    fn test_validate_rejects_short_bitmap() {
        let mask: OpacityMask =
            serde_json::from_str(r#"{"width":50,"height":50,"bits":[true],"opaque":1}"#).unwrap();
        assert!(matches!(mask.validate(), Err(SimError::ImpossibleState(_))));

        let stale: OpacityMask =
            serde_json::from_str(r#"{"width":1,"height":2,"bits":[true,true],"opaque":1}"#)
                .unwrap();
        assert!(matches!(stale.validate(), Err(SimError::ImpossibleState(_))));
    }

    #[test]
    fn test_filled_mask_matches_rect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(9.0, 9.0, 10.0, 10.0);
        let mask = Shape::Mask(OpacityMask::filled(10, 10));
        assert!(overlaps(&mask, &a, &Shape::Rect, &b));
        assert!(overlaps(&Shape::Rect, &b, &mask, &a));
    }
}
