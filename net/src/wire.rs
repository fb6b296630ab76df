use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Utc};
use sensor::{Frame, PixelFormat, SensorError};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Upper bound on an announced payload length.
///
/// A malformed or hostile length prefix past this is a protocol error; the
/// caller resets the connection rather than allocating whatever the header
/// claims.
pub const MAX_PAYLOAD_LEN: u64 = 64 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("payload encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("announced payload of {0} bytes exceeds limit")]
    OversizedPayload(u64),
    #[error("pixel data is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("decoded frame is inconsistent: {0}")]
    BadFrame(#[from] SensorError),
}

/// Serialized form of a [`Frame`]: JSON with base64 pixel data.
#[derive(Serialize, Deserialize)]
struct WireFrame {
    seq: u64,
    taken_at: DateTime<Utc>,
    width: u32,
    height: u32,
    format: PixelFormat,
    data: String,
}

/// Serialize `frame` into one complete wire message, prefix included.
pub fn encode_frame(frame: &Frame) -> Result<Vec<u8>, WireError> {
    let wire = WireFrame {
        seq: frame.seq,
        taken_at: frame.taken_at,
        width: frame.width,
        height: frame.height,
        format: frame.format,
        data: BASE64.encode(frame.data()),
    };
    let payload = serde_json::to_vec(&wire)?;
    let mut message = Vec::with_capacity(8 + payload.len());
    message.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    message.extend_from_slice(&payload);
    Ok(message)
}

/// Read exactly one framed message off `reader`.
///
/// Any error here invalidates the stream: the length prefix and payload are
/// only meaningful relative to the bytes already consumed.
pub async fn read_frame<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Frame, WireError> {
    let mut header = [0u8; 8];
    reader.read_exact(&mut header).await?;
    let len = u64::from_le_bytes(header);
    if len > MAX_PAYLOAD_LEN {
        return Err(WireError::OversizedPayload(len));
    }
    let mut payload = vec![0u8; len as usize];
    reader.read_exact(&mut payload).await?;
    decode_payload(&payload)
}

fn decode_payload(payload: &[u8]) -> Result<Frame, WireError> {
    let wire: WireFrame = serde_json::from_slice(payload)?;
    let data = BASE64.decode(&wire.data)?;
    let frame = Frame::from_wire(
        wire.seq,
        wire.taken_at,
        wire.width,
        wire.height,
        wire.format,
        data,
    )?;
    Ok(frame)
}
