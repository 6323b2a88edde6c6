use std::time::Duration;

use gpui_sparklines::render::path_extent;
use gpui_sparklines::{
    ManualClock, PathCommand, Plot, RefreshScheduler, Sample, TimerHost, channel,
};

fn plot_at(now: f64) -> (Plot, ManualClock) {
    let clock = ManualClock::new(now);
    let plot = Plot::builder()
        .duration(Duration::from_secs(3))
        .value_range(0.0, 100.0)
        .clock(clock.clone())
        .build()
        .expect("valid configuration");
    (plot, clock)
}

fn is_sorted(samples: &[Sample]) -> bool {
    samples.windows(2).all(|w| w[0].timestamp <= w[1].timestamp)
}

#[test_log::test]
fn scenario_a_retains_everything_within_two_windows() {
    let (mut plot, clock) = plot_at(0.0);
    let id = plot.add_line();

    for (at, value) in [(0.0, 10.0), (1.0, 20.0), (2.0, 15.0), (3.5, 30.0)] {
        clock.set(at);
        plot.add_point(id, value).unwrap();
        assert!(is_sorted(plot.line(id).unwrap().samples()));
    }

    let samples = plot.line(id).unwrap().samples();
    for (at, value) in [(0.0, 10.0), (1.0, 20.0), (2.0, 15.0), (3.5, 30.0)] {
        assert!(
            samples.contains(&Sample::new(at, value)),
            "missing ({at}, {value}) in {samples:?}"
        );
    }
    // one held copy before each of the three later points
    assert_eq!(samples.len(), 7);
}

#[test_log::test]
fn retention_bound_holds_while_scrolling() {
    let (mut plot, clock) = plot_at(0.0);
    let id = plot.add_line();
    for step in 0..200 {
        clock.set(step as f64 * 0.05);
        plot.add_point(id, (step % 100) as f64).unwrap();
    }
    clock.advance(1.0);
    plot.invalidate_time();

    let bound = plot.window().start - 3.0;
    let samples = plot.line(id).unwrap().samples();
    let below = samples.iter().filter(|s| s.timestamp < bound).count();
    assert!(below <= 1, "{below} samples below the retention bound");
    assert!(is_sorted(samples));
}

#[test]
fn scenario_b_reschedules_three_times() {
    #[derive(Default)]
    struct CountingHost {
        scheduled: usize,
    }

    impl TimerHost for CountingHost {
        type Handle = ();

        fn schedule_repeating(&mut self, _interval: Duration) {
            self.scheduled += 1;
        }

        fn cancel(&mut self, _handle: ()) {}
    }

    let mut host = CountingHost::default();
    let mut scheduler = RefreshScheduler::new();
    for fps in [60.0, 60.0, 60.0, 30.0, 30.0, 60.0] {
        scheduler.observe_fps(fps, &mut host);
    }
    assert_eq!(host.scheduled, 3);
}

#[test]
fn scenario_c_set_points_sorts() {
    let (mut plot, _) = plot_at(3.0);
    let id = plot.add_line();
    let unordered = [(2.0, 5.0), (0.0, 1.0), (1.0, 3.0)];
    plot.set_points(id, unordered.into_iter().map(Sample::from))
        .unwrap();
    assert_eq!(
        plot.line(id).unwrap().samples(),
        &[
            Sample::new(0.0, 1.0),
            Sample::new(1.0, 3.0),
            Sample::new(2.0, 5.0),
        ]
    );
}

#[test]
fn path_touches_both_edges() {
    let (mut plot, clock) = plot_at(1_700_000_000.0);
    let id = plot.add_line();
    for value in [40.0, 70.0, 55.0] {
        clock.advance(0.4);
        plot.add_point(id, value).unwrap();
    }
    clock.advance(0.2);
    plot.invalidate_time();

    let size = (320.0, 80.0);
    let window = plot.window();
    let list = plot.render(size);
    let transform = plot.transform(size).unwrap();
    let (first, last) = path_extent(list.commands()).unwrap();

    // nothing precedes the window, so the left anchor sits at the top
    assert_eq!(first, transform.sample_to_screen(Sample::new(window.start, 100.0)));
    assert_eq!(last, transform.sample_to_screen(Sample::new(window.end, 55.0)));
    assert!(matches!(list.commands().last(), Some(PathCommand::Stroke(_))));
}

#[test]
fn time_maps_monotonically_at_epoch_scale() {
    let (plot, _) = plot_at(1_700_000_000.0);
    let window = plot.window();
    let transform = plot.transform((1000.0, 100.0)).unwrap();
    let mut previous = f32::NEG_INFINITY;
    for step in 0..=300 {
        let x = transform.time_to_x(window.start + step as f64 * 0.01);
        assert!(x > previous);
        previous = x;
    }
}

#[test_log::test]
fn queued_samples_reach_the_plot() {
    let (mut plot, clock) = plot_at(10.0);
    let intensity = plot.add_line();
    let signal = plot.add_line();
    let (sink, queue) = channel();

    let producer = std::thread::spawn(move || {
        sink.push(intensity, 25.0).unwrap();
        sink.push(signal, 80.0).unwrap();
    });
    producer.join().unwrap();

    clock.advance(0.5);
    assert_eq!(queue.drain_into(&mut plot), 2);
    assert_eq!(
        plot.line(intensity).unwrap().samples(),
        &[Sample::new(10.5, 25.0)]
    );
    assert_eq!(
        plot.line(signal).unwrap().samples(),
        &[Sample::new(10.5, 80.0)]
    );
    assert!(plot.take_redraw_request());
}
