use std::collections::{HashMap, VecDeque};

use crate::map::LatLon;

pub const DEFAULT_TRAIL_LENGTH: usize = 30;

/// Recent positions of one satellite, oldest first, never longer than its capacity.
#[derive(Debug, Clone)]
pub struct TrailBuffer {
    points: VecDeque<LatLon>,
    capacity: usize,
}

impl TrailBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn push(&mut self, point: LatLon) {
        self.points.push_back(point);
        if self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    pub fn points(&self) -> Vec<LatLon> {
        self.points.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

/// Trail buffers keyed by satellite id, created on first use
#[derive(Debug, Clone)]
pub struct Trails {
    capacity: usize,
    buffers: HashMap<String, TrailBuffer>,
}

impl Trails {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            buffers: HashMap::new(),
        }
    }

    /// Start a fresh trail holding only `point`.
    pub fn start(&mut self, id: &str, point: LatLon) -> &TrailBuffer {
        let mut buffer = TrailBuffer::new(self.capacity);
        buffer.push(point);
        self.buffers.insert(id.to_string(), buffer);
        &self.buffers[id]
    }

    pub fn append(&mut self, id: &str, point: LatLon) -> &TrailBuffer {
        let capacity = self.capacity;
        let buffer = self
            .buffers
            .entry(id.to_string())
            .or_insert_with(|| TrailBuffer::new(capacity));
        buffer.push(point);
        buffer
    }

    pub fn get(&self, id: &str) -> Option<&TrailBuffer> {
        self.buffers.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(i: usize) -> LatLon {
        LatLon::new(i as f64, -(i as f64))
    }

    #[test]
    fn keeps_most_recent_points() {
        let mut trail = TrailBuffer::new(3);
        for i in 1..=5 {
            trail.push(point(i));
        }
        assert_eq!(trail.points(), vec![point(3), point(4), point(5)]);
    }

    #[test]
    fn length_is_min_of_appends_and_cap() {
        for cap in 1..6 {
            let mut trail = TrailBuffer::new(cap);
            for n in 1..12 {
                trail.push(point(n));
                assert_eq!(trail.len(), n.min(cap));
                let expected: Vec<_> = (n + 1 - n.min(cap)..=n).map(point).collect();
                assert_eq!(trail.points(), expected);
            }
        }
    }

    #[test]
    fn zero_capacity_still_holds_latest_point() {
        let mut trail = TrailBuffer::new(0);
        trail.push(point(1));
        trail.push(point(2));
        assert_eq!(trail.points(), vec![point(2)]);
    }

    #[test]
    fn start_resets_and_append_creates() {
        let mut trails = Trails::new(DEFAULT_TRAIL_LENGTH);
        trails.append("a", point(1));
        trails.append("a", point(2));
        assert_eq!(trails.get("a").unwrap().len(), 2);

        trails.start("a", point(9));
        assert_eq!(trails.get("a").unwrap().points(), vec![point(9)]);

        assert!(trails.get("b").is_none());
        trails.append("b", point(1));
        assert_eq!(trails.get("b").unwrap().len(), 1);
    }
}
