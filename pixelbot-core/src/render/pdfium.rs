use std::path::PathBuf;

use async_trait::async_trait;
use pdfium_render::prelude::*;
use tracing::debug;

use pixelbot_common::traits::api::{PageRasterizer, RasterPage};

use crate::Error;

/// Rasterizes with the pdfium library, loaded from `library_dir` or from the
/// system library path.
#[derive(Debug, Clone, Default)]
pub struct PdfiumRasterizer {
    library_dir: Option<PathBuf>,
}

impl PdfiumRasterizer {
    pub fn new(library_dir: Option<PathBuf>) -> Self {
        Self { library_dir }
    }
}

fn render_err(e: impl std::fmt::Display) -> Error {
    Error::Render(e.to_string())
}

fn rasterize_blocking(library_dir: Option<PathBuf>, pdf: &[u8], dpi: u32) -> Result<RasterPage, Error> {
    let bindings = match library_dir {
        Some(dir) => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&dir)),
        None => Pdfium::bind_to_system_library(),
    }
    .map_err(render_err)?;
    let pdfium = Pdfium::new(bindings);

    let document = pdfium.load_pdf_from_byte_slice(pdf, None).map_err(render_err)?;
    let page = document.pages().get(0).map_err(render_err)?;
    let config = PdfRenderConfig::new().scale_page_by_factor(dpi as f32 / 72.0);
    let bitmap = page.render_with_config(&config).map_err(render_err)?;

    let width = bitmap.width() as u32;
    let height = bitmap.height() as u32;
    let pixels: Vec<u8> = bitmap
        .as_rgba_bytes()
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();
    debug!("(Pdfium) Rasterized first page at {dpi} dpi => {width}x{height}");

    Ok(RasterPage { width, height, pixels })
}

#[async_trait]
impl PageRasterizer for PdfiumRasterizer {
    async fn rasterize_first_page(&self, pdf: Vec<u8>, dpi: u32) -> Result<RasterPage, Error> {
        let library_dir = self.library_dir.clone();
        tokio::task::spawn_blocking(move || rasterize_blocking(library_dir, &pdf, dpi))
            .await
            .map_err(|e| Error::Render(format!("rasterizer task failed: {e}")))?
    }
}
