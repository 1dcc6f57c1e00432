/// A row of the image handed to a render thread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Task {
    pub row: u32,
}

/// Hands out image rows to render threads in order, one at a time.
///
/// `on_progress(done, total)` fires at roughly every tenth of the image,
/// counted in dispatched rows.
pub struct Manager {
    rows: u32,
    next_row: u32,
    report_every: u32,
    rows_per_thread: Vec<usize>,
    on_progress: Box<dyn FnMut(u32, u32) + Send>,
}

impl Manager {
    pub fn new(rows: u32, nthread: usize, on_progress: Box<dyn FnMut(u32, u32) + Send>) -> Self {
        Manager {
            rows,
            next_row: 0,
            report_every: (rows / 10).max(1),
            rows_per_thread: vec![0; nthread],
            on_progress,
        }
    }

    pub fn next(&mut self, thid: usize) -> Option<Task> {
        if self.next_row >= self.rows {
            return None;
        }
        let row = self.next_row;
        if row % self.report_every == 0 {
            (self.on_progress)(row, self.rows);
        }
        self.next_row += 1;
        if let Some(n) = self.rows_per_thread.get_mut(thid) {
            *n += 1;
        }
        Some(Task { row })
    }

    pub fn rows_per_thread(&self) -> &[usize] {
        &self.rows_per_thread
    }
}
