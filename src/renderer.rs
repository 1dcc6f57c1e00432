use crate::black_hole::BlackHole;
use crate::camera::Camera;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::image::Image;
use crate::manager::*;
use crate::*;

use log::*;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};

pub mod background;
pub mod tracer;

/// Contrast, optional gamma and clamping applied to an averaged pixel.
pub fn post_process(mut color: RGB, config: &Config) -> RGB {
    let post = &config.post;
    if config.rendering.post_processing {
        color = color.enhance_contrast(post.contrast);
        if post.apply_gamma {
            color = color.gamma_correct(post.gamma);
        }
    }
    if post.clamp_colors {
        color = color.clamp();
    }
    color
}

pub struct Renderer;

impl Renderer {
    /// Renders a full frame with `config.rendering` dimensions.
    pub fn render<C: Camera + Clone + Send + 'static>(
        &self,
        black_hole: &BlackHole,
        camera: &C,
        config: &Config,
    ) -> Result<Image> {
        use std::thread;
        config.validate()?;
        let (w, h) = (config.rendering.width, config.rendering.height);
        let nthread = config.system.threads();
        info!("rendering {}x{} on {} thread(s)", w, h, nthread);

        let show_progress = config.output.show_progress;
        let manager = Manager::new(
            h,
            nthread,
            Box::new(move |done, total| {
                if show_progress {
                    info!("progress: {}%", 100 * done / total);
                }
            }),
        );
        let manager = Arc::new(Mutex::new(manager));
        let black_hole = Arc::new(black_hole.clone());
        let config = Arc::new(config.clone());
        let (tx, rx) = mpsc::channel();

        let mut threads = vec![];
        for i in 0..nthread {
            let camera = camera.clone();
            let black_hole = black_hole.clone();
            let config = config.clone();
            let manager = manager.clone();
            let tx = tx.clone();
            let thread = thread::spawn(move || {
                Self::render_thread(&black_hole, &camera, &config, i, manager, tx)
            });
            threads.push(thread);
        }
        drop(tx);

        let mut image = Image::new(w, h);
        for (row, pixels) in rx {
            image.set_row(row, &pixels);
        }
        for (i, thread) in threads.into_iter().enumerate() {
            thread.join().map_err(|_| Error::WorkerPanicked(i))?;
        }
        if let Ok(manager) = manager.lock() {
            debug!("rows per thread: {:?}", manager.rows_per_thread());
        }
        info!("rendering done");
        Ok(image)
    }

    fn render_thread<C: Camera>(
        black_hole: &BlackHole,
        camera: &C,
        config: &Config,
        thread_id: usize,
        manager: Arc<Mutex<Manager>>,
        tx: Sender<(u32, Vec<RGB>)>,
    ) {
        loop {
            // a poisoned lock means another worker died; join reports it
            let task = match manager.lock() {
                Ok(mut manager) => manager.next(thread_id),
                Err(_) => None,
            };
            let task = match task {
                Some(task) => task,
                None => break,
            };

            let pixels = (0..config.rendering.width)
                .map(|x| Self::render_pixel(black_hole, camera, config, x, task.row))
                .collect();
            if tx.send((task.row, pixels)).is_err() {
                break;
            }
        }
    }

    /// Averages an `n x n` grid of sub-pixel samples, then post-processes.
    pub fn render_pixel<C: Camera>(
        black_hole: &BlackHole,
        camera: &C,
        config: &Config,
        x: u32,
        y: u32,
    ) -> RGB {
        let (w, h) = (config.rendering.width, config.rendering.height);
        let n = config.rendering.samples_per_edge();
        let mut samples = Vec::with_capacity(n as usize * n as usize);
        for dx in 0..n {
            for dy in 0..n {
                let sx = x as f64 + (dx as f64 + 0.5) / n as f64;
                let sy = y as f64 + (dy as f64 + 0.5) / n as f64;
                samples.push(tracer::trace(&camera.ray(sx, sy, w, h), black_hole, config));
            }
        }
        match average_finite(&samples) {
            Some(color) => post_process(color, config),
            None => {
                warn!("pixel ({}, {}) has no finite sample", x, y);
                RGB::BLACK
            }
        }
    }
}

/// Mean of the finite samples, `None` if there is none.
fn average_finite(samples: &[RGB]) -> Option<RGB> {
    let mut sum = RGB::BLACK;
    let mut count = 0usize;
    for color in samples {
        if color.is_finite() {
            sum += *color;
            count += 1;
        } else {
            warn!("skipping non-finite sample {:?}", color);
        }
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::PinHole;

    fn small_config() -> Config {
        let mut config = Config::default();
        config.rendering.width = 24;
        config.rendering.height = 18;
        config.output.show_progress = false;
        config
    }

    fn front() -> PinHole {
        PinHole::look_at(P3::new(0.0, 2.0, -8.0), P3::origin(), V3::y(), 45.0)
    }

    #[test]
    fn post_process_contrast_and_clamp() {
        let config = Config::default();
        let c = post_process(RGB::new(0.03, 0.5, 3.0), &config);
        assert!((c.r - 0.0).abs() < 1e-12);
        assert!((c.g - 0.5).abs() < 1e-12);
        assert_eq!(c.b, 1.0);

        let mut raw = Config::default();
        raw.rendering.post_processing = false;
        raw.post.clamp_colors = false;
        assert_eq!(post_process(RGB::all(3.0), &raw), RGB::all(3.0));
    }

    #[test]
    fn render_stays_in_display_range() {
        let bh = BlackHole::new(P3::origin(), 1.0).unwrap();
        let config = small_config();
        let image = Renderer.render(&bh, &front(), &config).unwrap();
        assert_eq!((image.w(), image.h()), (24, 18));
        for c in image.pixels() {
            assert!(c.is_finite());
            for v in &[c.r, c.g, c.b] {
                assert!(*v >= 0.0 && *v <= 1.0);
            }
        }
        // the hole's shadow sits in the middle of the frame
        assert!(image.at(12, 9).is_black());
    }

    #[test]
    fn thread_count_does_not_change_the_image() {
        let bh = BlackHole::new(P3::origin(), 1.0).unwrap();
        let single = small_config();
        let mut multi = small_config();
        multi.system.multithreading = true;
        multi.system.max_threads = 3;
        let a = Renderer.render(&bh, &front(), &single).unwrap();
        let b = Renderer.render(&bh, &front(), &multi).unwrap();
        assert_eq!(a.to_bytes(), b.to_bytes());
    }

    #[test]
    fn pixel_averages_sub_samples() {
        let bh = BlackHole::new(P3::origin(), 1.0).unwrap();
        let mut config = small_config();
        config.rendering.post_processing = false;
        let cam = front();
        let x = 3;
        let y = 2;
        let mut expected = RGB::BLACK;
        for &(dx, dy) in &[(0.25, 0.25), (0.25, 0.75), (0.75, 0.25), (0.75, 0.75)] {
            let ray = cam.ray(x as f64 + dx, y as f64 + dy, 24, 18);
            expected += tracer::trace(&ray, &bh, &config);
        }
        let expected = (expected / 4.0).clamp();
        let got = Renderer::render_pixel(&bh, &cam, &config, x, y);
        assert!((got.r - expected.r).abs() < 1e-12);
        assert!((got.g - expected.g).abs() < 1e-12);
        assert!((got.b - expected.b).abs() < 1e-12);
    }

    #[test]
    fn non_finite_samples_are_left_out_of_the_mean() {
        let samples = [
            RGB::new(0.25, 0.5, 1.0),
            RGB::new(f64::NAN, 0.0, 0.0),
            RGB::new(0.75, 0.0, 0.5),
            RGB::new(0.0, f64::INFINITY, 0.0),
        ];
        assert_eq!(average_finite(&samples), Some(RGB::new(0.5, 0.25, 0.75)));
        assert_eq!(average_finite(&[RGB::all(f64::NAN)]), None);
        assert_eq!(average_finite(&[]), None);
    }

    #[test]
    fn front_view_matches_reference_bytes() {
        let bh = BlackHole::new(P3::origin(), 1.0).unwrap();

        // top corners see the far side of the disk bent over the shadow;
        // (23, 0) also picks up a nebula sample
        let image = Renderer.render(&bh, &front(), &small_config()).unwrap();
        assert_eq!(image.at(0, 0).to_bytes(), [39, 9, 5]);
        assert_eq!(image.at(23, 0).to_bytes(), [52, 14, 8]);
        assert_eq!(image.at(1, 0).to_bytes(), [0, 0, 0]);
        assert_eq!(image.at(12, 9).to_bytes(), [0, 0, 0]);

        // without contrast the empty sky keeps its base color
        let mut raw = small_config();
        raw.rendering.post_processing = false;
        let image = Renderer.render(&bh, &front(), &raw).unwrap();
        assert_eq!(image.at(0, 0).to_bytes(), [54, 29, 25]);
        assert_eq!(image.at(23, 0).to_bytes(), [64, 32, 28]);
        assert_eq!(image.at(1, 0).to_bytes(), [3, 3, 10]);
        assert_eq!(image.at(1, 17).to_bytes(), [9, 4, 6]);
        assert_eq!(image.at(23, 17).to_bytes(), [7, 7, 20]);
        assert_eq!(image.at(12, 9).to_bytes(), [0, 0, 0]);
    }

    #[test]
    fn rejects_empty_frame() {
        let bh = BlackHole::new(P3::origin(), 1.0).unwrap();
        let mut config = small_config();
        config.rendering.height = 0;
        match Renderer.render(&bh, &front(), &config) {
            Err(Error::InvalidDimensions { .. }) => {}
            other => panic!("unexpected {:?}", other.map(|i| i.w())),
        }
    }
}
