use std::time::Duration;

use gpui::{App, AsyncWindowContext, Task, Timer, WeakEntity, Window};

use crate::refresh::TimerHost;

use super::view::GpuiSparklineView;

/// Repeating timers spawned on a window's foreground executor.
///
/// Each tick lets the view poll its plot. The task only holds a weak handle,
/// so it ends on its own once the view is released; cancelling drops it early.
pub(crate) struct WindowTimers<'a> {
    pub(crate) window: &'a Window,
    pub(crate) cx: &'a App,
    pub(crate) view: WeakEntity<GpuiSparklineView>,
}

impl TimerHost for WindowTimers<'_> {
    type Handle = Task<()>;

    fn schedule_repeating(&mut self, interval: Duration) -> Task<()> {
        let view = self.view.clone();
        self.window
            .spawn(self.cx, move |cx: &mut AsyncWindowContext| {
                let mut cx = cx.clone();
                async move {
                    loop {
                        Timer::after(interval).await;
                        let ticked = view.update(&mut cx, |view, view_cx| view.tick(view_cx));
                        if ticked.is_err() {
                            log::debug!("sparkline view released, stopping redraw timer");
                            break;
                        }
                    }
                }
            })
    }

    fn cancel(&mut self, handle: Task<()>) {
        drop(handle);
    }
}
