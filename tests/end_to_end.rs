use image::{ImageFormat, Rgba};
use qrexport::{
    ClipboardHost, EncodingRequest, ErrorKind, ExportArtifact, ExportOrchestrator, ExportSettings, ExportState,
    ExportTarget, FileSink, QrSurface,
};

#[derive(Default)]
struct Downloads {
    files: Vec<ExportArtifact>,
}

impl FileSink for Downloads {
    fn deliver(&mut self, artifact: &ExportArtifact) -> qrexport::Result<()> {
        self.files.push(artifact.clone());
        Ok(())
    }
}

#[derive(Default)]
struct Pasteboard {
    png: Option<Vec<u8>>,
}

impl ClipboardHost for Pasteboard {
    fn write_png(&mut self, artifact: &ExportArtifact) -> Result<(), String> {
        self.png = Some(artifact.bytes.clone());
        Ok(())
    }
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn exporter() -> ExportOrchestrator<Downloads, Pasteboard> {
    ExportOrchestrator::new(ExportSettings::default(), Downloads::default(), Pasteboard::default())
}

#[tokio::test]
async fn example_url_exports_to_every_format() {
    init_logging();
    let request = EncodingRequest::new("https://example.com").unwrap().with_size(256);
    let surface = QrSurface::for_request(&request).unwrap().expect("text renders a surface");
    let mut exporter = exporter();

    for target in ExportTarget::ALL {
        let notice = exporter.export(Some(&surface), target).await;
        assert!(notice.is_success(), "{}: {}", target, notice.message);
    }
    let files = &exporter.files().files;
    let names: Vec<&str> = files.iter().map(|f| f.suggested_filename.as_str()).collect();
    assert_eq!(names, ["qrcode.svg", "qrcode.png", "qrcode.jpeg"]);

    let svg = String::from_utf8(files[0].bytes.clone()).unwrap();
    assert!(svg.contains("<svg "));
    assert!(svg.contains("width=\"256\" height=\"256\""));
    assert_eq!(files[0].mime_type, "image/svg+xml");

    let png = image::load_from_memory_with_format(&files[1].bytes, ImageFormat::Png)
        .unwrap()
        .to_rgba8();
    assert_eq!(png.dimensions(), (1024, 1024));
    assert_eq!(*png.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
    let module_px = 1024.0 / surface.dimension() as f32;
    let finder_edge = ((surface.margin() as f32 + 0.5) * module_px) as u32;
    assert_eq!(*png.get_pixel(finder_edge, finder_edge), Rgba([0, 0, 0, 255]));

    let jpeg = image::load_from_memory_with_format(&files[2].bytes, ImageFormat::Jpeg).unwrap();
    assert_eq!((jpeg.width(), jpeg.height()), (1024, 1024));

    let notice = exporter.copy_to_clipboard(Some(&surface)).await;
    assert_eq!(notice.message, "QR Code copied to clipboard!");
    let pasted = exporter.clipboard().png.as_ref().expect("clipboard holds an image");
    let pasted = image::load_from_memory_with_format(pasted, ImageFormat::Png).unwrap();
    assert_eq!((pasted.width(), pasted.height()), (256, 256));
}

#[tokio::test]
async fn repeated_exports_are_identical() {
    init_logging();
    let request = EncodingRequest::new("repeat me").unwrap();
    let surface = QrSurface::render(&request).unwrap();
    let mut exporter = exporter();

    for target in [ExportTarget::Vector, ExportTarget::RasterLossless] {
        exporter.export(Some(&surface), target).await;
        exporter.export(Some(&surface), target).await;
    }
    let files = &exporter.files().files;
    assert_eq!(files[0], files[1]);

    let first = image::load_from_memory(&files[2].bytes).unwrap().to_rgba8();
    let second = image::load_from_memory(&files[3].bytes).unwrap().to_rgba8();
    assert_eq!(first, second);
}

#[tokio::test]
async fn empty_text_has_nothing_to_export() {
    init_logging();
    let request = EncodingRequest::new("").unwrap();
    let surface = QrSurface::for_request(&request).unwrap();
    assert!(surface.is_none());

    let mut exporter = exporter();
    let notice = exporter.export(surface.as_ref(), ExportTarget::Vector).await;
    assert!(!notice.is_success());
    assert_eq!(exporter.state(), ExportState::Failed(ErrorKind::NoContent));
    assert!(exporter.files().files.is_empty());

    let notice = exporter.copy_to_clipboard(surface.as_ref()).await;
    assert!(!notice.is_success());
    assert!(exporter.clipboard().png.is_none());
}

#[tokio::test]
async fn lossless_export_matches_upscaled_size() {
    let request = EncodingRequest::new("size check").unwrap().with_size(136);
    let surface = QrSurface::render(&request).unwrap();
    let settings = ExportSettings::from_toml_str("upscale_factor = 2").unwrap();
    let mut exporter = ExportOrchestrator::new(settings, Downloads::default(), Pasteboard::default());

    exporter.export(Some(&surface), ExportTarget::RasterLossless).await;
    let png = image::load_from_memory(&exporter.files().files[0].bytes).unwrap();
    assert_eq!((png.width(), png.height()), (272, 272));
}

fn module_mismatches(img: &image::RgbImage, surface: &QrSurface, tolerance: u8) -> usize {
    let module_px = img.width() as f32 / surface.dimension() as f32;
    let margin = surface.margin() as i32;
    let mut mismatches = 0;
    for my in 0..surface.dimension() as i32 {
        for mx in 0..surface.dimension() as i32 {
            let px = ((mx as f32 + 0.5) * module_px) as u32;
            let py = ((my as f32 + 0.5) * module_px) as u32;
            let expected = if surface.is_dark(mx - margin, my - margin) { 0u8 } else { 255u8 };
            let pixel = img.get_pixel(px, py);
            if pixel.0.iter().any(|&c| c.abs_diff(expected) > tolerance) {
                mismatches += 1;
            }
        }
    }
    mismatches
}

#[tokio::test]
async fn raster_formats_agree_with_module_grid() {
    init_logging();
    let request = EncodingRequest::new("https://example.com").unwrap().with_size(264);
    let surface = QrSurface::render(&request).unwrap();
    let mut exporter = exporter();

    exporter.export(Some(&surface), ExportTarget::RasterLossless).await;
    exporter.export(Some(&surface), ExportTarget::RasterLossy).await;
    let files = &exporter.files().files;
    assert_eq!(files.len(), 2);

    let png = image::load_from_memory_with_format(&files[0].bytes, ImageFormat::Png)
        .unwrap()
        .to_rgb8();
    let jpeg = image::load_from_memory_with_format(&files[1].bytes, ImageFormat::Jpeg)
        .unwrap()
        .to_rgb8();
    assert_eq!(png.dimensions(), jpeg.dimensions());

    assert_eq!(module_mismatches(&png, &surface, 0), 0);
    assert_eq!(module_mismatches(&jpeg, &surface, 40), 0);
}
