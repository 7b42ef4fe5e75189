use std::time::{Duration, Instant};

/// Wall-clock samples for one region of a step, one sample per `start`/`stop` pair.
pub struct Timer {
    pub region: &'static str,
    samples: Vec<Duration>,
    started_at: Option<Instant>,
}

impl Timer {
    pub fn new(region: &'static str, expected_num_iterations: usize) -> Self {
        Timer {
            region,
            samples: Vec::with_capacity(expected_num_iterations),
            started_at: None,
        }
    }

    pub fn start(&mut self) {
        assert!(
            self.started_at.is_none(),
            "Timer for region '{}' was started twice without stop().",
            self.region
        );
        self.started_at = Some(Instant::now());
    }

    pub fn stop(&mut self) {
        match self.started_at.take() {
            Some(started_at) => self.samples.push(started_at.elapsed()),
            None => panic!(
                "Timer for region '{}' was stopped without start().",
                self.region
            ),
        }
    }

    pub fn count(&self) -> usize {
        self.samples.len()
    }

    pub fn total(&self) -> Duration {
        self.samples.iter().sum()
    }

    pub fn mean(&self) -> Option<Duration> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.total() / self.samples.len() as u32)
    }

    pub fn std_dev(&self) -> Option<Duration> {
        let mean = self.mean()?.as_secs_f64();
        let variance = self
            .samples
            .iter()
            .map(|sample| {
                let diff = sample.as_secs_f64() - mean;
                diff * diff
            })
            .sum::<f64>()
            / self.samples.len() as f64;

        Some(Duration::from_secs_f64(variance.sqrt()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_timer_has_no_statistics() {
        let timer = Timer::new("empty", 0);
        assert_eq!(timer.count(), 0);
        assert_eq!(timer.total(), Duration::from_secs(0));
        assert!(timer.mean().is_none());
        assert!(timer.std_dev().is_none());
    }

    #[test]
    fn each_start_stop_pair_adds_a_sample() {
        let mut timer = Timer::new("kernel", 2);
        timer.start();
        timer.stop();
        timer.start();
        timer.stop();

        assert_eq!(timer.count(), 2);
        assert!(timer.mean().is_some());
    }

    #[test]
    #[should_panic(expected = "started twice")]
    fn double_start_panics() {
        let mut timer = Timer::new("kernel", 1);
        timer.start();
        timer.start();
    }

    #[test]
    #[should_panic(expected = "without start")]
    fn stop_without_start_panics() {
        let mut timer = Timer::new("kernel", 1);
        timer.stop();
    }
}
