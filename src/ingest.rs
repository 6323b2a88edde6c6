//! Handoff of samples from producer threads to the thread that owns a plot.
//!
//! Producers hold a cloneable [`SampleSink`]; the render thread drains the
//! matching [`SampleQueue`] into its [`Plot`] once per frame. The plot itself
//! is never shared.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use crate::error::SampleError;
use crate::geom::Sample;
use crate::line::SeriesId;
use crate::plot::Plot;

/// A pending change to one line.
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// Append a value stamped when it is applied.
    Point {
        /// Target line.
        series: SeriesId,
        /// Observed value.
        value: f64,
    },
    /// Replace every sample of a line.
    Replace {
        /// Target line.
        series: SeriesId,
        /// New samples, in any order.
        samples: Vec<Sample>,
    },
}

/// Producer side of the handoff. Cheap to clone and `Send`.
#[derive(Debug, Clone)]
pub struct SampleSink {
    tx: Sender<Update>,
}

impl SampleSink {
    /// Queue an update.
    pub fn send(&self, update: Update) -> Result<(), SampleError> {
        self.tx.send(update).map_err(|_| SampleError::Disconnected)
    }

    /// Queue a value for `series`.
    pub fn push(&self, series: SeriesId, value: f64) -> Result<(), SampleError> {
        self.send(Update::Point { series, value })
    }

    /// Queue a full replacement of `series`.
    pub fn replace<I>(&self, series: SeriesId, samples: I) -> Result<(), SampleError>
    where
        I: IntoIterator<Item = Sample>,
    {
        self.send(Update::Replace {
            series,
            samples: samples.into_iter().collect(),
        })
    }
}

/// Consumer side of the handoff, owned by the render thread.
#[derive(Debug)]
pub struct SampleQueue {
    rx: Receiver<Update>,
}

impl SampleQueue {
    /// Apply every queued update to `plot` without blocking.
    ///
    /// Returns the number of updates applied. Updates that fail (unknown line,
    /// non-finite value) are logged and skipped.
    pub fn drain_into(&self, plot: &mut Plot) -> usize {
        let mut applied = 0;
        loop {
            let update = match self.rx.try_recv() {
                Ok(update) => update,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::trace!("sample queue has no producers left");
                    break;
                }
            };
            let result = match update {
                Update::Point { series, value } => plot.add_point(series, value),
                Update::Replace { series, samples } => plot.set_points(series, samples),
            };
            match result {
                Ok(()) => applied += 1,
                Err(err) => log::debug!("skipped queued update: {err}"),
            }
        }
        applied
    }
}

/// Create a connected sink/queue pair.
pub fn channel() -> (SampleSink, SampleQueue) {
    let (tx, rx) = mpsc::channel();
    (SampleSink { tx }, SampleQueue { rx })
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::clock::ManualClock;

    #[test_log::test]
    fn producers_on_other_threads() {
        let clock = ManualClock::new(50.0);
        let mut plot = Plot::builder().clock(clock).build().unwrap();
        let id = plot.add_line();
        let (sink, queue) = channel();

        let workers: Vec<_> = (0..4)
            .map(|n| {
                let sink = sink.clone();
                thread::spawn(move || sink.push(id, f64::from(n)))
            })
            .collect();
        for worker in workers {
            worker.join().unwrap().unwrap();
        }

        assert_eq!(queue.drain_into(&mut plot), 4);
        assert_eq!(plot.line(id).unwrap().len(), 4);
        assert_eq!(queue.drain_into(&mut plot), 0);
    }

    #[test_log::test]
    fn bad_updates_are_skipped() {
        let mut plot = Plot::builder().clock(ManualClock::new(0.0)).build().unwrap();
        let id = plot.add_line();
        let other = plot.add_line();
        plot.remove_line(other);
        let (sink, queue) = channel();

        sink.push(id, f64::NAN).unwrap();
        sink.push(other, 1.0).unwrap();
        sink.replace(id, [Sample::new(-1.0, 2.0), Sample::new(-2.0, 1.0)])
            .unwrap();

        assert_eq!(queue.drain_into(&mut plot), 1);
        let timestamps: Vec<f64> = plot
            .line(id)
            .unwrap()
            .samples()
            .iter()
            .map(|s| s.timestamp)
            .collect();
        assert_eq!(timestamps, vec![-2.0, -1.0]);
    }

    #[test]
    fn dropped_queue_disconnects_sink() {
        let (sink, queue) = channel();
        drop(queue);
        let mut plot = Plot::builder().clock(ManualClock::new(0.0)).build().unwrap();
        let id = plot.add_line();
        assert_eq!(sink.push(id, 1.0), Err(SampleError::Disconnected));
    }
}
