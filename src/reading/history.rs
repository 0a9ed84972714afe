//! History buffer
//!
//! Fixed-capacity FIFO of the most recent readings. Once full, every push
//! evicts the oldest reading.

use serde::Serialize;
use std::collections::VecDeque;

use super::error::{ReadingError, ReadingResult};
use super::types::Reading;

/// Bounded buffer of recent readings in arrival order
#[derive(Debug, Clone, Serialize)]
pub struct HistoryBuffer {
    capacity: usize,
    readings: VecDeque<Reading>,
}

impl HistoryBuffer {
    /// Create an empty buffer holding at most `capacity` readings
    pub fn new(capacity: usize) -> ReadingResult<Self> {
        if capacity == 0 {
            return Err(ReadingError::InvalidCapacity(capacity));
        }

        Ok(Self {
            capacity,
            readings: VecDeque::with_capacity(capacity),
        })
    }

    /// Append a reading, returning the evicted one if the buffer was full
    pub fn push(&mut self, reading: Reading) -> Option<Reading> {
        let evicted = if self.readings.len() == self.capacity {
            self.readings.pop_front()
        } else {
            None
        };
        self.readings.push_back(reading);
        evicted
    }

    /// Most recent reading
    pub fn latest(&self) -> Option<&Reading> {
        self.readings.back()
    }

    /// Oldest reading still held
    pub fn oldest(&self) -> Option<&Reading> {
        self.readings.front()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.readings.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &Reading> {
        self.readings.iter()
    }

    /// Copy of the contents, oldest first
    pub fn to_vec(&self) -> Vec<Reading> {
        self.readings.iter().copied().collect()
    }

    /// Temperatures, oldest first
    pub fn temperatures(&self) -> Vec<f64> {
        self.readings.iter().map(|r| r.temp).collect()
    }

    pub fn clear(&mut self) {
        self.readings.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn base_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn reading(i: i64) -> Reading {
        Reading::at(-18.0 + i as f64 * 0.1, base_time() + Duration::seconds(i))
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(
            HistoryBuffer::new(0).unwrap_err(),
            ReadingError::InvalidCapacity(0)
        );
    }

    #[test]
    fn test_empty_buffer() {
        let buffer = HistoryBuffer::new(5).unwrap();
        assert!(buffer.is_empty());
        assert!(!buffer.is_full());
        assert!(buffer.latest().is_none());
        assert!(buffer.oldest().is_none());
        assert_eq!(buffer.capacity(), 5);
    }

    #[test]
    fn test_push_until_full() {
        let mut buffer = HistoryBuffer::new(5).unwrap();
        for i in 0..5 {
            assert!(buffer.push(reading(i)).is_none());
        }
        assert!(buffer.is_full());
        assert_eq!(buffer.len(), 5);
        assert_eq!(buffer.oldest(), Some(&reading(0)));
        assert_eq!(buffer.latest(), Some(&reading(4)));
    }

    #[test]
    fn test_evicts_oldest_when_full() {
        let mut buffer = HistoryBuffer::new(3).unwrap();
        for i in 0..3 {
            buffer.push(reading(i));
        }

        let evicted = buffer.push(reading(3));
        assert_eq!(evicted, Some(reading(0)));
        assert_eq!(buffer.to_vec(), vec![reading(1), reading(2), reading(3)]);
    }

    #[test]
    fn test_never_exceeds_capacity_and_keeps_most_recent() {
        let mut buffer = HistoryBuffer::new(5).unwrap();
        for i in 0..23 {
            buffer.push(reading(i));
            assert!(buffer.len() <= 5);
        }

        let expected: Vec<Reading> = (18..23).map(reading).collect();
        assert_eq!(buffer.to_vec(), expected);
    }

    #[test]
    fn test_capacity_one() {
        let mut buffer = HistoryBuffer::new(1).unwrap();
        buffer.push(reading(0));
        assert_eq!(buffer.push(reading(1)), Some(reading(0)));
        assert_eq!(buffer.latest(), buffer.oldest());
    }

    #[test]
    fn test_temperatures_in_arrival_order() {
        let mut buffer = HistoryBuffer::new(5).unwrap();
        buffer.push(Reading::at(-17.0, base_time()));
        buffer.push(Reading::at(-16.5, base_time()));
        buffer.push(Reading::at(-17.8, base_time()));
        assert_eq!(buffer.temperatures(), vec![-17.0, -16.5, -17.8]);
    }

    #[test]
    fn test_clear() {
        let mut buffer = HistoryBuffer::new(2).unwrap();
        buffer.push(reading(0));
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), 2);
    }
}
