use std::sync::{Condvar, Mutex};

/// Counting semaphore shared by pass items and mesh-stage work.
#[derive(Debug, Default)]
pub struct Semaphore {
    permits: Mutex<usize>,
    cv: Condvar,
}

impl Semaphore {
    pub fn new(permits: usize) -> Self {
        Self {
            permits: Mutex::new(permits),
            cv: Condvar::new(),
        }
    }

    /// Blocks until a permit is available and takes it.
    pub fn acquire(&self) {
        let mut n = self.permits.lock().unwrap_or_else(|e| e.into_inner());
        while *n == 0 {
            n = self.cv.wait(n).unwrap_or_else(|e| e.into_inner());
        }
        *n -= 1;
    }

    pub fn try_acquire(&self) -> bool {
        let mut n = self.permits.lock().unwrap_or_else(|e| e.into_inner());
        if *n == 0 {
            return false;
        }
        *n -= 1;
        true
    }

    pub fn release(&self, count: usize) {
        if count == 0 {
            return;
        }
        let mut n = self.permits.lock().unwrap_or_else(|e| e.into_inner());
        *n += count;
        drop(n);
        if count == 1 {
            self.cv.notify_one();
        } else {
            self.cv.notify_all();
        }
    }

    pub fn available(&self) -> usize {
        *self.permits.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn release_wakes_blocked_waiters() {
        let sem = Arc::new(Semaphore::new(0));
        let handles: Vec<_> = (0..3)
            .map(|_| {
                let sem = Arc::clone(&sem);
                thread::spawn(move || sem.acquire())
            })
            .collect();
        sem.release(3);
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(sem.available(), 0);
    }

    #[test]
    fn try_acquire_counts_down() {
        let sem = Semaphore::new(2);
        assert!(sem.try_acquire());
        assert!(sem.try_acquire());
        assert!(!sem.try_acquire());
        sem.release(0);
        assert!(!sem.try_acquire());
    }
}
