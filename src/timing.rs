//! Frame timing statistics for the debug readout.

use std::time::Duration;

use circular_buffer::CircularBuffer;
use num_width::NumberWidth;
use smallvec::SmallVec;
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{EnumCount, EnumIter, IntoStaticStr};

/// The number of durations kept per phase.
const TIMING_WINDOW_SIZE: usize = 60;

/// The measured parts of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum TimingPhase {
    /// The whole frame, excluding the sleep.
    Frame,
    Update,
    Render,
}

/// A window of recent durations.
#[derive(Debug, Default)]
pub struct TimingBuffer {
    buffer: CircularBuffer<TIMING_WINDOW_SIZE, Duration>,
}

impl TimingBuffer {
    pub fn record(&mut self, duration: Duration) {
        self.buffer.push_back(duration);
    }

    pub fn latest(&self) -> Duration {
        self.buffer.back().copied().unwrap_or(Duration::ZERO)
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Mean and sample standard deviation of the window.
    pub fn stats(&self) -> (Duration, Duration) {
        // Welford's algorithm
        let mut count = 0u32;
        let mut mean = 0.0f64;
        let mut sum_squared_diff = 0.0f64;

        for duration in self.buffer.iter() {
            let secs = duration.as_secs_f64();
            count += 1;
            let diff = secs - mean;
            mean += diff / count as f64;
            sum_squared_diff += diff * (secs - mean);
        }

        if count == 0 {
            return (Duration::ZERO, Duration::ZERO);
        }
        let variance = if count > 1 {
            sum_squared_diff / (count - 1) as f64
        } else {
            0.0
        };
        (
            Duration::from_secs_f64(mean.max(0.0)),
            Duration::from_secs_f64(variance.max(0.0).sqrt()),
        )
    }
}

#[derive(Debug, Default)]
pub struct FrameTimings {
    phases: [TimingBuffer; TimingPhase::COUNT],
    frames: u64,
}

impl FrameTimings {
    pub fn record(&mut self, phase: TimingPhase, duration: Duration) {
        if phase == TimingPhase::Frame {
            self.frames += 1;
        }
        self.phases[phase as usize].record(duration);
    }

    pub fn phase(&self, phase: TimingPhase) -> &TimingBuffer {
        &self.phases[phase as usize]
    }

    /// Number of frames recorded since startup.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// One aligned line per phase: `name : mean ± deviation`.
    pub fn lines(&self) -> SmallVec<[String; TimingPhase::COUNT]> {
        format_timing_display(TimingPhase::iter().map(|phase| {
            let (mean, deviation) = self.phase(phase).stats();
            let name: &'static str = phase.into();
            (name, mean, deviation)
        }))
    }
}

// Splits a duration into an integer part, a three-digit decimal part and a unit.
fn split_duration(duration: Duration) -> (u64, u32, &'static str) {
    if duration >= Duration::from_secs(1) {
        (duration.as_secs(), duration.subsec_millis(), "s")
    } else if duration >= Duration::from_millis(1) {
        (duration.as_millis() as u64, (duration.as_micros() % 1000) as u32, "ms")
    } else if duration >= Duration::from_micros(1) {
        (duration.as_micros() as u64, (duration.as_nanos() % 1000) as u32, "µs")
    } else {
        (duration.as_nanos() as u64, 0, "ns")
    }
}

/// Formats timing rows so that names, decimal points and units line up.
pub fn format_timing_display<'a>(
    rows: impl IntoIterator<Item = (&'a str, Duration, Duration)>,
) -> SmallVec<[String; TimingPhase::COUNT]> {
    struct Row<'a> {
        name: &'a str,
        mean: (u64, u32, &'static str),
        deviation: (u64, u32, &'static str),
    }

    let rows = rows
        .into_iter()
        .map(|(name, mean, deviation)| Row {
            name,
            mean: split_duration(mean),
            deviation: split_duration(deviation),
        })
        .collect::<SmallVec<[Row; TimingPhase::COUNT]>>();

    let (name_w, mean_w, deviation_w) = rows.iter().fold((0, 0, 0), |(name_w, mean_w, deviation_w), row| {
        (
            name_w.max(row.name.len()),
            mean_w.max(row.mean.0.width() as usize),
            deviation_w.max(row.deviation.0.width() as usize),
        )
    });

    rows.iter()
        .map(|row| {
            format!(
                "{name:name_w$} : {mean_int:mean_w$}.{mean_dec:03}{mean_unit:<2} ± {dev_int:deviation_w$}.{dev_dec:03}{dev_unit}",
                name = row.name,
                mean_int = row.mean.0,
                mean_dec = row.mean.1,
                mean_unit = row.mean.2,
                dev_int = row.deviation.0,
                dev_dec = row.deviation.1,
                dev_unit = row.deviation.2,
            )
        })
        .collect()
}
