//! Card face rasterization
//!
//! Faces are drawn at `pixel_ratio` times the 340x540 base card. The front
//! carries the member photo between two navy bands; the back carries the
//! verification QR code. Text fields are not rasterized here, the exporter
//! lays them out as PDF text.

use crate::auth::RoutePath;
use crate::config::CardConfig;
use crate::models::{CardSide, IdCard};
use crate::storage::files::{FileStorage, blob_id_from_url};
use crate::utils::error::{PortalError, Result};
use async_trait::async_trait;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Rgb, RgbImage};
use qrcode::QrCode;
use reqwest::redirect;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::{Host, Url};

/// Base card width in pixels
pub const BASE_WIDTH: u32 = 340;
/// Base card height in pixels
pub const BASE_HEIGHT: u32 = 540;

const NAVY: Rgb<u8> = Rgb([11, 29, 58]);
const GOLD: Rgb<u8> = Rgb([212, 175, 55]);
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

const MAX_PHOTO_REDIRECTS: usize = 3;

/// Where profile photos come from
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PhotoSource: Send + Sync {
    /// Raw image bytes behind a photo URL
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Resolves uploaded blobs locally and everything else over HTTP
#[derive(Debug, Clone)]
pub struct HttpPhotoSource {
    client: reqwest::Client,
    files: Arc<dyn FileStorage>,
    max_bytes: usize,
    allow_private_hosts: bool,
}

impl HttpPhotoSource {
    pub fn new(files: Arc<dyn FileStorage>, config: &CardConfig) -> Result<Self> {
        let allow_private_hosts = config.allow_private_photo_hosts;
        let redirects = redirect::Policy::custom(move |attempt| {
            if attempt.previous().len() >= MAX_PHOTO_REDIRECTS {
                attempt.error("too many redirects")
            } else if check_photo_url(attempt.url(), allow_private_hosts).is_err() {
                attempt.error("redirect to a disallowed photo host")
            } else {
                attempt.follow()
            }
        });

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.photo_timeout))
            .redirect(redirects)
            .build()?;
        Ok(Self {
            client,
            files,
            max_bytes: config.max_photo_size,
            allow_private_hosts,
        })
    }
}

#[async_trait]
impl PhotoSource for HttpPhotoSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        if let Some(id) = blob_id_from_url(url) {
            if self.files.exists(id).await? {
                debug!(id, "Loading photo from blob storage");
                return Ok(self.files.get(id).await?.content);
            }
        }

        let url = Url::parse(url)?;
        check_photo_url(&url, self.allow_private_hosts)?;

        let mut response = self.client.get(url).send().await?.error_for_status()?;
        if response
            .content_length()
            .is_some_and(|len| len > self.max_bytes as u64)
        {
            return Err(photo_too_large(self.max_bytes));
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if bytes.len() + chunk.len() > self.max_bytes {
                return Err(photo_too_large(self.max_bytes));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

fn photo_too_large(limit: usize) -> PortalError {
    PortalError::export(format!("Profile photo exceeds {} bytes", limit))
}

/// Only http(s) photos; internal hosts unless explicitly allowed
pub fn check_photo_url(url: &Url, allow_private_hosts: bool) -> Result<()> {
    if !matches!(url.scheme(), "http" | "https") {
        return Err(PortalError::export(format!(
            "Unsupported photo URL scheme: {}",
            url.scheme()
        )));
    }
    if allow_private_hosts {
        return Ok(());
    }

    let internal = match url.host() {
        None => true,
        Some(Host::Domain(domain)) => {
            let domain = domain.trim_end_matches('.').to_ascii_lowercase();
            domain == "localhost" || domain.ends_with(".localhost")
        }
        Some(Host::Ipv4(ip)) => is_internal_v4(ip),
        Some(Host::Ipv6(ip)) => {
            let first = ip.segments()[0];
            ip.is_loopback()
                || ip.is_unspecified()
                || (first & 0xfe00) == 0xfc00
                || (first & 0xffc0) == 0xfe80
                || ip.to_ipv4_mapped().is_some_and(is_internal_v4)
        }
    };

    if internal {
        Err(PortalError::export(format!(
            "Photo host is not allowed: {}",
            url.host_str().unwrap_or_default()
        )))
    } else {
        Ok(())
    }
}

fn is_internal_v4(ip: Ipv4Addr) -> bool {
    ip.is_loopback()
        || ip.is_private()
        || ip.is_link_local()
        || ip.is_unspecified()
        || ip.is_broadcast()
}

/// Run CPU-heavy image and document work off the async workers
pub(crate) async fn run_blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| PortalError::export(format!("Export task failed: {}", e)))?
}

/// Draws card faces
#[derive(Clone)]
pub struct CardRenderer {
    photos: Arc<dyn PhotoSource>,
    pixel_ratio: u32,
    verify_base_url: String,
}

impl std::fmt::Debug for CardRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardRenderer")
            .field("pixel_ratio", &self.pixel_ratio)
            .field("verify_base_url", &self.verify_base_url)
            .finish_non_exhaustive()
    }
}

impl CardRenderer {
    pub fn new(config: &CardConfig, photos: Arc<dyn PhotoSource>) -> Self {
        Self {
            photos,
            pixel_ratio: config.pixel_ratio.max(1),
            verify_base_url: config.verify_base_url.clone(),
        }
    }

    /// Output size in pixels
    pub fn dimensions(&self) -> (u32, u32) {
        (BASE_WIDTH * self.pixel_ratio, BASE_HEIGHT * self.pixel_ratio)
    }

    /// Link encoded in the back-face QR code
    pub fn verify_link(&self, uid: &str) -> String {
        RoutePath::verify_link(&self.verify_base_url, uid)
    }

    /// Rasterize one face; every failure is reported as an export error
    pub async fn render(&self, card: &IdCard, side: CardSide) -> Result<RgbImage> {
        match side {
            CardSide::Front => {
                let bytes = self
                    .photos
                    .fetch(&card.profile_image)
                    .await
                    .map_err(|e| PortalError::export(format!("Failed to fetch profile photo: {}", e)))?;
                let renderer = self.clone();
                run_blocking(move || {
                    let photo = image::load_from_memory(&bytes).map_err(|e| {
                        PortalError::export(format!("Failed to decode profile photo: {}", e))
                    })?;
                    Ok(renderer.draw_front(&photo))
                })
                .await
            }
            CardSide::Back => {
                let renderer = self.clone();
                let uid = card.uid.clone();
                run_blocking(move || renderer.draw_back(&uid)).await
            }
        }
    }

    fn px(&self, base: u32) -> u32 {
        base * self.pixel_ratio
    }

    fn draw_front(&self, photo: &DynamicImage) -> RgbImage {
        let (width, height) = self.dimensions();
        let mut canvas = RgbImage::from_pixel(width, height, WHITE);

        fill_rect(&mut canvas, 0, 0, width, self.px(110), NAVY);
        fill_rect(&mut canvas, 0, self.px(110), width, self.px(6), GOLD);

        let (photo_w, photo_h) = (self.px(150), self.px(180));
        let photo_x = (width - photo_w) / 2;
        let photo_y = self.px(150);
        let border = self.px(3);
        fill_rect(
            &mut canvas,
            photo_x - border,
            photo_y - border,
            photo_w + 2 * border,
            photo_h + 2 * border,
            GOLD,
        );
        let fitted = photo
            .resize_to_fill(photo_w, photo_h, FilterType::Triangle)
            .to_rgb8();
        imageops::overlay(&mut canvas, &fitted, i64::from(photo_x), i64::from(photo_y));

        self.draw_footer(&mut canvas);
        canvas
    }

    fn draw_back(&self, uid: &str) -> Result<RgbImage> {
        let (width, height) = self.dimensions();
        let mut canvas = RgbImage::from_pixel(width, height, WHITE);

        fill_rect(&mut canvas, 0, 0, width, self.px(80), NAVY);
        fill_rect(&mut canvas, 0, self.px(80), width, self.px(6), GOLD);

        let qr = DynamicImage::ImageLuma8(qr_image(&self.verify_link(uid), self.px(200))?).to_rgb8();
        let qr_x = width.saturating_sub(qr.width()) / 2;
        imageops::overlay(&mut canvas, &qr, i64::from(qr_x), i64::from(self.px(140)));

        self.draw_footer(&mut canvas);
        Ok(canvas)
    }

    fn draw_footer(&self, canvas: &mut RgbImage) {
        let (width, height) = self.dimensions();
        fill_rect(canvas, 0, height - self.px(66), width, self.px(6), GOLD);
        fill_rect(canvas, 0, height - self.px(60), width, self.px(60), NAVY);
    }
}

/// Paint a rectangle, clipped to the canvas
fn fill_rect(canvas: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    let x_end = x.saturating_add(w).min(canvas.width());
    let y_end = y.saturating_add(h).min(canvas.height());
    for py in y.min(y_end)..y_end {
        for px in x.min(x_end)..x_end {
            canvas.put_pixel(px, py, color);
        }
    }
}

/// Render `data` as a QR code no wider than `target_px` (quiet zone included)
pub fn qr_image(data: &str, target_px: u32) -> Result<GrayImage> {
    let code = QrCode::new(data.as_bytes())?;

    let modules = code.to_colors();
    let width = code.width() as u32;
    let border = 4_u32;
    let scale = (target_px / (width + border * 2)).max(1);
    let img_size = (width + border * 2) * scale;

    let mut img_buf = vec![255u8; (img_size * img_size) as usize];
    for (i, color) in modules.iter().enumerate() {
        if *color != qrcode::types::Color::Dark {
            continue;
        }
        let x = (i as u32) % width;
        let y = (i as u32) / width;
        let px = (x + border) * scale;
        let py = (y + border) * scale;
        for dy in 0..scale {
            let row = ((py + dy) * img_size) as usize;
            let start = row + px as usize;
            img_buf[start..start + scale as usize].fill(0);
        }
    }

    GrayImage::from_raw(img_size, img_size, img_buf)
        .ok_or_else(|| PortalError::export("Failed to assemble QR image"))
}
