use crate::timer::Timer;

pub struct AppTimers {
    pub step: Timer,
    pub open_boundary_fluxes: Timer,
    pub boundary_velocities: Timer,
    pub boundary_scalars: Timer,
    pub next: Timer,
}

impl AppTimers {
    pub fn new(total_num_steps: usize) -> Self {
        AppTimers {
            step: Timer::new("Total Step", total_num_steps),
            open_boundary_fluxes: Timer::new("Open Boundary Fluxes", total_num_steps),
            boundary_velocities: Timer::new("Boundary Velocities", total_num_steps),
            boundary_scalars: Timer::new("Boundary Scalars", total_num_steps),
            next: Timer::new("Next", total_num_steps),
        }
    }

    fn all(&self) -> [&Timer; 5] {
        [
            &self.step,
            &self.open_boundary_fluxes,
            &self.boundary_velocities,
            &self.boundary_scalars,
            &self.next,
        ]
    }

    pub fn generate_report(&self) -> String {
        let rule = "-".repeat(85);
        let mut lines = vec![
            rule.clone(),
            format!(
                "{:<30}{:<10}{:>15}{:>15}{:>15}",
                "Region", "Count", "Total", "Average", "Std Dev"
            ),
            rule,
        ];

        for timer in self.all().iter() {
            let mean = timer
                .mean()
                .map_or_else(|| "-".to_owned(), |mean| format!("{:3.5?}", mean));
            let std_dev = timer
                .std_dev()
                .map_or_else(|| "-".to_owned(), |std_dev| format!("{:3.5?}", std_dev));

            lines.push(format!(
                "{:<30}{:<10}{:>15}{:>15}{:>15}",
                timer.region,
                timer.count(),
                format!("{:3.5?}", timer.total()),
                mean,
                std_dev,
            ));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_lists_every_region_even_when_unused() {
        let mut app_timers = AppTimers::new(1);
        app_timers.step.start();
        app_timers.step.stop();

        let report = app_timers.generate_report();

        for region in &[
            "Total Step",
            "Open Boundary Fluxes",
            "Boundary Velocities",
            "Boundary Scalars",
            "Next",
        ] {
            assert!(report.contains(region), "missing {}", region);
        }
        assert_eq!(report.lines().count(), 3 + 5);
    }
}
