//! Friend QR codes: `{scheme}://friend/{user_id}`.

use qrcode::render::unicode::Dense1x2;
use qrcode::QrCode;

use crate::config::DEFAULT_FRIEND_QR_SCHEME;
use crate::error::{AppError, Result};

/// Encodes and decodes friend QR payloads for one URI scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriendQr {
    scheme: String,
}

impl Default for FriendQr {
    fn default() -> Self {
        Self::new(DEFAULT_FRIEND_QR_SCHEME)
    }
}

impl FriendQr {
    pub fn new(scheme: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
        }
    }

    fn prefix(&self) -> String {
        format!("{}://friend/", self.scheme)
    }

    pub fn uri(&self, user_id: &str) -> String {
        format!("{}{}", self.prefix(), user_id)
    }

    /// Extract the user id from a scanned payload.
    pub fn parse(&self, payload: &str) -> Result<String> {
        let user_id = payload
            .trim()
            .strip_prefix(&self.prefix())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::Validation("not a friend QR code".to_string()))?;
        Ok(user_id.to_string())
    }

    /// Render the user's friend QR code for a terminal.
    pub fn render(&self, user_id: &str) -> Result<String> {
        let code = QrCode::new(self.uri(user_id).as_bytes())
            .map_err(|e| AppError::Internal(anyhow::anyhow!("QR encoding failed: {}", e)))?;

        Ok(code
            .render::<Dense1x2>()
            .dark_color(Dense1x2::Light)
            .light_color(Dense1x2::Dark)
            .quiet_zone(true)
            .build())
    }
}

pub fn friend_uri(user_id: &str) -> String {
    FriendQr::default().uri(user_id)
}

pub fn parse_friend_uri(payload: &str) -> Result<String> {
    FriendQr::default().parse(payload)
}

pub fn render_friend_qr(user_id: &str) -> Result<String> {
    FriendQr::default().render(user_id)
}
