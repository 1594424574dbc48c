//! PIX "copia e cola" payload encoder.
//!
//! Emits the EMV-style TLV payload used by Brazilian PIX static codes: fixed
//! header fields, a nested merchant-account block (GUI + key), the amount as
//! a fixed two-decimal string, merchant name and city, a nested
//! additional-data block carrying the transaction id, and a trailing CRC16
//! checksum. Output is byte-for-byte deterministic for identical inputs.
//!
//! Values are expected to be ASCII (the EMV alphanumeric charset); the
//! configuration layer enforces this for merchant fields, and transaction
//! ids are validated upstream.

use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// GUI identifying the PIX arrangement inside the merchant account field.
pub const PIX_GUI: &str = "br.gov.bcb.pix";

/// EMV caps for the free-text fields.
pub const MAX_MERCHANT_NAME_LEN: usize = 25;
pub const MAX_MERCHANT_CITY_LEN: usize = 15;
pub const MAX_TRANSACTION_ID_LEN: usize = 25;

/// Static merchant configuration, supplied by deployment config rather than
/// user input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PixConfig {
    pub key: String,
    pub merchant_name: String,
    pub merchant_city: String,
}

impl PixConfig {
    /// Builds a config with the merchant fields trimmed and truncated to
    /// their EMV caps.
    pub fn new(
        key: impl Into<String>,
        merchant_name: &str,
        merchant_city: &str,
    ) -> Self {
        Self {
            key: key.into(),
            merchant_name: truncate(merchant_name.trim(), MAX_MERCHANT_NAME_LEN),
            merchant_city: truncate(merchant_city.trim(), MAX_MERCHANT_CITY_LEN),
        }
    }
}

fn truncate(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}

/// Generates the full PIX payload string for `amount`.
///
/// The amount must be positive; more than two decimal places is rounded
/// half-away-from-zero to exactly two. When `transaction_id` is absent an
/// advisory-unique id is derived from the current time. Identical inputs
/// (with an explicit transaction id) always produce identical output.
pub fn generate_pix_code(
    amount: Decimal,
    config: &PixConfig,
    transaction_id: Option<&str>,
) -> Result<String, AppError> {
    let amount_str = normalize_amount(amount)?;
    let txid = resolve_transaction_id(transaction_id);

    let merchant_account = format!(
        "{}{}",
        emv_field("00", PIX_GUI),
        emv_field("01", &config.key)
    );
    let additional_data = emv_field("05", &txid);

    let mut payload = String::with_capacity(160);
    payload.push_str(&emv_field("00", "01"));
    payload.push_str(&emv_field("26", &merchant_account));
    payload.push_str(&emv_field("52", "0000"));
    payload.push_str(&emv_field("53", "986"));
    payload.push_str(&emv_field("54", &amount_str));
    payload.push_str(&emv_field("58", "BR"));
    payload.push_str(&emv_field("59", &config.merchant_name));
    payload.push_str(&emv_field("60", &config.merchant_city));
    payload.push_str(&emv_field("62", &additional_data));
    // The checksum covers everything up to and including the "6304" marker.
    payload.push_str("6304");
    let crc = crc16_ccitt(payload.as_bytes());
    payload.push_str(&format!("{:04X}", crc));
    Ok(payload)
}

/// Renders a payload string as an SVG QR image.
pub fn generate_pix_qr_svg(code: &str) -> Result<String, AppError> {
    let qr = qrcode::QrCode::new(code.as_bytes())
        .map_err(|e| AppError::Internal(format!("QR encoding failed: {}", e)))?;
    let svg = qr
        .render::<qrcode::render::svg::Color>()
        .min_dimensions(256, 256)
        .build();
    Ok(svg)
}

/// One TLV field: two-digit id, two-digit length, value.
fn emv_field(id: &str, value: &str) -> String {
    format!("{}{:02}{}", id, value.len(), value)
}

/// CRC16-CCITT: polynomial 0x1021, initial value 0xFFFF, one byte at a
/// time, eight left shifts per byte with XOR on carry.
pub fn crc16_ccitt(data: &[u8]) -> u16 {
    let mut crc: u16 = 0xFFFF;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ 0x1021;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}

/// Resolves the transaction id a payload will carry: the trimmed caller id
/// truncated to the EMV cap when present, a fresh advisory id otherwise.
/// Callers that echo the id back must use this rather than the raw input.
pub fn resolve_transaction_id(transaction_id: Option<&str>) -> String {
    match transaction_id.map(str::trim).filter(|t| !t.is_empty()) {
        Some(id) => truncate(id, MAX_TRANSACTION_ID_LEN),
        None => auto_transaction_id(),
    }
}

/// Canonical two-decimal amount string carried in field 54.
pub fn normalize_amount(amount: Decimal) -> Result<String, AppError> {
    if amount <= Decimal::ZERO {
        return Err(AppError::InvalidAmount(format!(
            "amount must be positive, got {}",
            amount
        )));
    }
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded <= Decimal::ZERO {
        // Sub-cent amounts round to 0.00, which is not a payable value.
        return Err(AppError::InvalidAmount(format!(
            "amount {} rounds to zero",
            amount
        )));
    }
    rounded.rescale(2);
    Ok(rounded.to_string())
}

/// Advisory-unique transaction id: a short prefix plus the current unix
/// millisecond count in base 36. Collisions are harmless; the id is never
/// used as a lookup key.
fn auto_transaction_id() -> String {
    format!("LF{}", to_base36(Utc::now().timestamp_millis() as u64))
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let mut buf = [0u8; 13];
    let mut i = buf.len();
    loop {
        i -= 1;
        buf[i] = DIGITS[(n % 36) as usize];
        n /= 36;
        if n == 0 {
            break;
        }
    }
    buf[i..].iter().map(|&b| b as char).collect()
}
