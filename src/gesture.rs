//! Input classification: keys, touches and clicks become navigation intents.
//!
//! The router is pure classification. It produces an [`Intent`] or nothing;
//! the viewer decides whether the intent applies (nothing does while closed).
//!
//! ## Swipes
//!
//! A touch that never moved is a tap and navigates nowhere. A touch that moved
//! fires only when the horizontal travel exceeds the threshold *and* dominates
//! the vertical travel, so scrolls and diagonal drags are left alone:
//!
//! ```text
//! dx = -60, dy =  5   → Next   (swipe left)
//! dx =  60, dy =  5   → Prev   (swipe right)
//! dx =  30, dy =  5   → none   (below threshold)
//! dx =  60, dy = 70   → none   (vertical dominates)
//! ```

use serde::Deserialize;
use std::str::FromStr;

/// A navigation command for the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Prev,
    Next,
    Jump(usize),
    /// Ask the modal to hide; the close itself follows its hidden notification.
    Dismiss,
}

/// Keys the viewer reacts to, named as DOM `KeyboardEvent.key` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Escape,
    Other(String),
}

impl FromStr for Key {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            "Escape" | "Esc" => Key::Escape,
            other => Key::Other(other.to_string()),
        })
    }
}

/// Dedicated on-screen affordances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Click {
    Prev,
    Next,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub x: f64,
    pub y: f64,
}

impl TouchPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone)]
pub struct GestureRouter {
    threshold: f64,
    start: Option<TouchPoint>,
    last: Option<TouchPoint>,
}

impl GestureRouter {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            start: None,
            last: None,
        }
    }

    pub fn key(&self, key: &Key) -> Option<Intent> {
        match key {
            Key::ArrowLeft => Some(Intent::Prev),
            Key::ArrowRight => Some(Intent::Next),
            Key::Escape => Some(Intent::Dismiss),
            Key::Other(_) => None,
        }
    }

    pub fn click(&self, click: Click) -> Intent {
        match click {
            Click::Prev => Intent::Prev,
            Click::Next => Intent::Next,
        }
    }

    pub fn touch_start(&mut self, point: TouchPoint) {
        self.start = Some(point);
        self.last = None;
    }

    pub fn touch_move(&mut self, point: TouchPoint) {
        if self.start.is_some() {
            self.last = Some(point);
        }
    }

    /// Finish the current touch and classify it.
    pub fn touch_end(&mut self) -> Option<Intent> {
        let start = self.start.take()?;
        let end = self.last.take()?;
        classify_swipe(end.x - start.x, end.y - start.y, self.threshold)
    }

    pub fn touch_cancel(&mut self) {
        self.start = None;
        self.last = None;
    }
}

/// Map a recorded displacement to an intent.
pub fn classify_swipe(dx: f64, dy: f64, threshold: f64) -> Option<Intent> {
    if dx.abs() <= threshold || dx.abs() <= dy.abs() {
        return None;
    }
    if dx < 0.0 { Some(Intent::Next) } else { Some(Intent::Prev) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swipe(router: &mut GestureRouter, dx: f64, dy: f64) -> Option<Intent> {
        router.touch_start(TouchPoint::new(200.0, 300.0));
        router.touch_move(TouchPoint::new(200.0 + dx / 2.0, 300.0 + dy / 2.0));
        router.touch_move(TouchPoint::new(200.0 + dx, 300.0 + dy));
        router.touch_end()
    }

    // =========================================================================
    // Swipe classification
    // =========================================================================

    #[test]
    fn swipe_left_is_next() {
        assert_eq!(swipe(&mut GestureRouter::new(50.0), -60.0, 5.0), Some(Intent::Next));
    }

    #[test]
    fn swipe_right_is_prev() {
        assert_eq!(swipe(&mut GestureRouter::new(50.0), 60.0, 5.0), Some(Intent::Prev));
    }

    #[test]
    fn short_swipe_is_ignored() {
        assert_eq!(swipe(&mut GestureRouter::new(50.0), 30.0, 5.0), None);
        assert_eq!(swipe(&mut GestureRouter::new(50.0), -50.0, 0.0), None);
    }

    #[test]
    fn vertical_dominant_swipe_is_ignored() {
        assert_eq!(swipe(&mut GestureRouter::new(50.0), 60.0, 70.0), None);
        assert_eq!(swipe(&mut GestureRouter::new(50.0), -60.0, -60.0), None);
    }

    #[test]
    fn tap_without_movement_is_ignored() {
        let mut router = GestureRouter::new(50.0);
        router.touch_start(TouchPoint::new(10.0, 10.0));
        assert_eq!(router.touch_end(), None);
    }

    #[test]
    fn end_without_start_is_ignored() {
        let mut router = GestureRouter::new(50.0);
        router.touch_move(TouchPoint::new(400.0, 10.0));
        assert_eq!(router.touch_end(), None);
    }

    #[test]
    fn each_touch_starts_fresh() {
        let mut router = GestureRouter::new(50.0);
        assert_eq!(swipe(&mut router, -80.0, 0.0), Some(Intent::Next));
        router.touch_start(TouchPoint::new(0.0, 0.0));
        assert_eq!(router.touch_end(), None);
    }

    #[test]
    fn cancelled_touch_is_forgotten() {
        let mut router = GestureRouter::new(50.0);
        router.touch_start(TouchPoint::new(0.0, 0.0));
        router.touch_move(TouchPoint::new(-100.0, 0.0));
        router.touch_cancel();
        assert_eq!(router.touch_end(), None);
    }

    #[test]
    fn threshold_is_configurable() {
        assert_eq!(swipe(&mut GestureRouter::new(20.0), 30.0, 5.0), Some(Intent::Prev));
    }

    // =========================================================================
    // Keys and clicks
    // =========================================================================

    #[test]
    fn arrow_keys_map_to_navigation() {
        let router = GestureRouter::new(50.0);
        assert_eq!(router.key(&Key::ArrowLeft), Some(Intent::Prev));
        assert_eq!(router.key(&Key::ArrowRight), Some(Intent::Next));
        assert_eq!(router.key(&Key::Escape), Some(Intent::Dismiss));
        assert_eq!(router.key(&"Enter".parse().unwrap()), None);
    }

    #[test]
    fn key_names_parse() {
        assert_eq!("ArrowLeft".parse::<Key>().unwrap(), Key::ArrowLeft);
        assert_eq!("Right".parse::<Key>().unwrap(), Key::ArrowRight);
        assert_eq!("a".parse::<Key>().unwrap(), Key::Other("a".to_string()));
    }

    #[test]
    fn clicks_map_directly() {
        let router = GestureRouter::new(50.0);
        assert_eq!(router.click(Click::Prev), Intent::Prev);
        assert_eq!(router.click(Click::Next), Intent::Next);
    }
}
