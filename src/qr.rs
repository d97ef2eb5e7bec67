/// QR codes
///
/// When a session proposal creates a new pairing, the wallet has to scan the
/// `wc:` URI. The client context hands that URI to a [`QrCodeModal`], which
/// decides how to show it.
///
use log::{debug, info};
use qrcode::render::{svg, unicode};
use qrcode::{EcLevel, QrCode};

use crate::error::Result;

/// Displays a pairing URI until the proposal is settled
pub trait QrCodeModal: Send + Sync + 'static {
    fn open(&self, uri: &str) -> Result<()>;

    fn close(&self);
}

/// Prints the pairing URI as a Unicode QR code on stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalQrModal;

impl QrCodeModal for TerminalQrModal {
    fn open(&self, uri: &str) -> Result<()> {
        let rendered = render_unicode(uri)?;
        println!("{rendered}");
        println!("Scan with your Chia wallet or paste: {uri}");
        info!("QR Code Modal opened");
        Ok(())
    }

    fn close(&self) {
        debug!("QR Code Modal closed");
    }
}

/// For headless callers that share the URI some other way.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopQrModal;

impl QrCodeModal for NoopQrModal {
    fn open(&self, uri: &str) -> Result<()> {
        debug!("pairing uri: {uri}");
        Ok(())
    }

    fn close(&self) {}
}

/// Renders with half-height blocks so the code stays square in a terminal.
pub fn render_unicode(uri: &str) -> Result<String> {
    let code = QrCode::with_error_correction_level(uri, EcLevel::M)?;
    Ok(code
        .render::<unicode::Dense1x2>()
        .dark_color(unicode::Dense1x2::Light)
        .light_color(unicode::Dense1x2::Dark)
        .build())
}

pub fn render_svg(uri: &str) -> Result<String> {
    let code = QrCode::with_error_correction_level(uri, EcLevel::M)?;
    Ok(code
        .render::<svg::Color>()
        .min_dimensions(200, 200)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build())
}
