use crate::error::TrajectoryError;

/// A fixed-capacity history of points, used to draw trails behind bodies.
///
/// Backed by a ring buffer: once full, each push overwrites the oldest entry
/// in place, so recording a position never allocates.
#[derive(Debug, Clone)]
pub struct Trajectory<T> {
    // Invariants:
    //   - buffer.len() <= capacity, and never shrinks
    //   - once buffer is full, `cursor` indexes the oldest entry
    buffer: Vec<T>,
    capacity: usize,
    cursor: usize,
}

impl<T: Copy> Trajectory<T> {
    /// An empty trajectory that will hold at most `capacity` points.
    pub fn with_capacity(capacity: usize) -> Result<Self, TrajectoryError> {
        if capacity == 0 {
            return Err(TrajectoryError::ZeroCapacity);
        }
        Ok(Self {
            buffer: Vec::with_capacity(capacity),
            capacity,
            cursor: 0,
        })
    }

    /// A full trajectory holding `capacity` copies of `initial`, so there's
    /// already something to draw on the first frame.
    pub fn filled(capacity: usize, initial: T) -> Result<Self, TrajectoryError> {
        let mut trajectory = Self::with_capacity(capacity)?;
        trajectory.buffer.resize(capacity, initial);
        Ok(trajectory)
    }

    pub fn push(&mut self, point: T) {
        if self.buffer.len() < self.capacity {
            self.buffer.push(point);
        } else {
            self.buffer[self.cursor] = point;
            self.cursor = (self.cursor + 1) % self.capacity;
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn oldest(&self) -> Option<T> {
        self.iter().next()
    }

    pub fn latest(&self) -> Option<T> {
        self.iter().next_back()
    }

    /// Iterates from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = T> + '_ {
        let (newer, older) = self.buffer.split_at(self.cursor);
        older.iter().chain(newer.iter()).copied()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_capacity() {
        assert_eq!(
            Trajectory::<i32>::with_capacity(0).unwrap_err(),
            TrajectoryError::ZeroCapacity
        );
        assert_eq!(
            Trajectory::filled(0, 7).unwrap_err(),
            TrajectoryError::ZeroCapacity
        );
    }

    #[test]
    fn test_prefilled() {
        let trajectory = Trajectory::filled(4, 1.5).unwrap();
        assert_eq!(trajectory.len(), 4);
        assert_eq!(trajectory.to_vec(), vec![1.5; 4]);
    }

    #[test]
    fn test_filling_up() {
        let mut trajectory = Trajectory::with_capacity(3).unwrap();
        assert!(trajectory.is_empty());
        assert_eq!(trajectory.latest(), None);

        trajectory.push(1);
        trajectory.push(2);
        assert_eq!(trajectory.to_vec(), vec![1, 2]);
        assert_eq!(trajectory.oldest(), Some(1));
        assert_eq!(trajectory.latest(), Some(2));
    }

    #[test]
    fn test_eviction_order() {
        let capacity = 5;
        let mut trajectory = Trajectory::filled(capacity, 0).unwrap();

        for k in 0..3 * capacity + 2 {
            trajectory.push(k as i32 + 1);
            assert!(trajectory.len() <= capacity);
        }

        // Holds exactly the most recent `capacity` points, oldest first
        let n = (3 * capacity + 2) as i32;
        let expected: Vec<i32> = (n - capacity as i32 + 1..=n).collect();
        assert_eq!(trajectory.to_vec(), expected);
        assert_eq!(trajectory.oldest(), Some(n - capacity as i32 + 1));
        assert_eq!(trajectory.latest(), Some(n));

        let reversed: Vec<i32> = trajectory.iter().rev().collect();
        assert_eq!(reversed, expected.into_iter().rev().collect::<Vec<_>>());
    }

    #[test]
    fn test_capacity_one() {
        let mut trajectory = Trajectory::filled(1, 'a').unwrap();
        trajectory.push('b');
        trajectory.push('c');
        assert_eq!(trajectory.to_vec(), vec!['c']);
    }
}
