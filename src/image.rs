use crate::error::Result;
use crate::*;
use std::io::{BufWriter, Write};

/// Row-major color buffer, origin at the top left.
#[derive(Clone, Debug)]
pub struct Image {
    w: u32,
    h: u32,
    buf: Vec<RGB>,
}

impl Image {
    pub fn new(w: u32, h: u32) -> Self {
        let mut buf = Vec::new();
        buf.resize(w as usize * h as usize, RGB::BLACK);
        Image { w, h, buf }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.w as usize + x as usize
    }

    pub fn at(&self, x: u32, y: u32) -> &RGB {
        &self.buf[self.index(x, y)]
    }

    pub fn set_row(&mut self, y: u32, row: &[RGB]) {
        let start = self.index(0, y);
        self.buf[start..start + self.w as usize].copy_from_slice(row);
    }

    pub fn pixels(&self) -> &[RGB] {
        &self.buf[..]
    }

    pub fn w(&self) -> u32 {
        self.w
    }
    pub fn h(&self) -> u32 {
        self.h
    }

    /// Interleaved RGB bytes, top to bottom.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.buf.iter().flat_map(|c| c.to_bytes().to_vec()).collect()
    }

    /// Plain-text PPM (`P3`), one pixel per line.
    pub fn write_ppm_to<W: Write>(&self, out: W) -> std::io::Result<()> {
        let mut out = BufWriter::new(out);
        write!(out, "P3\n{} {}\n255\n", self.w, self.h)?;
        for c in &self.buf {
            let [r, g, b] = c.to_bytes();
            writeln!(out, "{} {} {}", r, g, b)?;
        }
        out.flush()
    }

    pub fn write_ppm(&self, filename: &str) -> Result<()> {
        let file = std::fs::File::create(filename)?;
        self.write_ppm_to(file)?;
        Ok(())
    }
}
