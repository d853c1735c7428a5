//! Geometry of the SVG consumption chart.

use powerhub_domain::consumption::ConsumptionSeries;

pub const WIDTH: u64 = 600;
pub const HEIGHT: u64 = 200;

/// One x-axis label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartTick {
    pub x: u64,
    pub label: String,
}

/// Everything the template needs to draw the line chart.
///
/// The vertical scale goes from zero to the larger of the energy cap and
/// the highest sample, so the cap line is always visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartView {
    pub width: u64,
    pub height: u64,
    /// `points` attribute of the `<polyline>`.
    pub points: String,
    pub ticks: Vec<ChartTick>,
    /// Vertical position of the cap line.
    pub cap_y: u64,
    /// Watts at the top of the chart.
    pub top_watts: u64,
}

impl ChartView {
    #[must_use]
    pub fn from_series(series: &ConsumptionSeries, max_energy: u32) -> Self {
        let top_watts = series.peak().max(u64::from(max_energy)).max(1);
        let step = match series.capacity() {
            0 | 1 => 0,
            slots => WIDTH / (slots as u64 - 1),
        };
        let y_of = |watts: u64| HEIGHT - watts.min(top_watts) * HEIGHT / top_watts;

        let mut points = Vec::with_capacity(series.len());
        let mut ticks = Vec::with_capacity(series.len());
        for (index, sample) in series.iter().enumerate() {
            let x = index as u64 * step;
            points.push(format!("{x},{}", y_of(sample.watts)));
            ticks.push(ChartTick {
                x,
                label: sample.label.clone(),
            });
        }

        Self {
            width: WIDTH,
            height: HEIGHT,
            points: points.join(" "),
            ticks,
            cap_y: y_of(u64::from(max_energy)),
            top_watts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use powerhub_domain::consumption::ConsumptionSample;
    use powerhub_domain::time::now;

    fn sample(label: &str, watts: u64) -> ConsumptionSample {
        ConsumptionSample {
            label: label.to_string(),
            watts,
            recorded_at: now(),
        }
    }

    #[test]
    fn should_plot_seed_point_on_the_baseline() {
        let chart = ChartView::from_series(&ConsumptionSeries::new(10), 2000);
        assert_eq!(chart.points, "0,200");
        assert_eq!(chart.cap_y, 0);
        assert_eq!(chart.ticks.len(), 1);
        assert_eq!(chart.ticks[0].label, "0s");
    }

    #[test]
    fn should_scale_samples_against_the_cap() {
        let mut series = ConsumptionSeries::new(10);
        series.push(sample("1s", 1000));
        series.push(sample("2s", 2000));

        let chart = ChartView::from_series(&series, 2000);
        assert_eq!(chart.points, "0,200 66,100 132,0");
        assert_eq!(chart.top_watts, 2000);
    }

    #[test]
    fn should_raise_scale_when_a_sample_exceeds_the_cap() {
        let mut series = ConsumptionSeries::new(10);
        series.push(sample("1s", 2000));

        let chart = ChartView::from_series(&series, 1000);
        assert_eq!(chart.top_watts, 2000);
        assert_eq!(chart.cap_y, 100);
        assert_eq!(chart.points, "0,200 66,0");
    }
}
