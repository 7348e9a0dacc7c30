//! Binary glTF container validation and model slot bookkeeping.
//!
//! Only the GLB framing is checked (header, then JSON and optional BIN
//! chunks). Geometry is drawn with procedural proxies by the renderer.

use thiserror::Error;

const GLB_MAGIC: u32 = 0x4654_6C67; // "glTF"
const GLB_VERSION: u32 = 2;
const CHUNK_JSON: u32 = 0x4E4F_534A;
const CHUNK_BIN: u32 = 0x004E_4942;
const HEADER_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssetError {
    #[error("fetch of {path} failed: {reason}")]
    Fetch { path: String, reason: String },
    #[error("{0} bytes is too short for a GLB header")]
    TooShort(usize),
    #[error("bad GLB magic {0:#010x}")]
    BadMagic(u32),
    #[error("unsupported GLB version {0}")]
    UnsupportedVersion(u32),
    #[error("header declares {declared} bytes but {actual} were read")]
    LengthMismatch { declared: usize, actual: usize },
    #[error("malformed chunk at offset {offset}: {reason}")]
    BadChunk { offset: usize, reason: &'static str },
}

/// A validated GLB payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelAsset {
    pub name: String,
    pub byte_len: usize,
    pub json_len: usize,
    pub bin_len: usize,
}

fn read_u32(bytes: &[u8], at: usize) -> Option<u32> {
    let b = bytes.get(at..at + 4)?;
    Some(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

impl ModelAsset {
    pub fn from_glb_bytes(name: &str, bytes: &[u8]) -> Result<Self, AssetError> {
        if bytes.len() < HEADER_LEN {
            return Err(AssetError::TooShort(bytes.len()));
        }
        let magic = read_u32(bytes, 0).ok_or(AssetError::TooShort(bytes.len()))?;
        if magic != GLB_MAGIC {
            return Err(AssetError::BadMagic(magic));
        }
        let version = read_u32(bytes, 4).ok_or(AssetError::TooShort(bytes.len()))?;
        if version != GLB_VERSION {
            return Err(AssetError::UnsupportedVersion(version));
        }
        let declared = read_u32(bytes, 8).ok_or(AssetError::TooShort(bytes.len()))? as usize;
        if declared != bytes.len() {
            return Err(AssetError::LengthMismatch {
                declared,
                actual: bytes.len(),
            });
        }

        let mut offset = HEADER_LEN;
        let mut json_len = None;
        let mut bin_len = 0usize;
        while offset < bytes.len() {
            let (Some(len), Some(kind)) = (read_u32(bytes, offset), read_u32(bytes, offset + 4))
            else {
                return Err(AssetError::BadChunk {
                    offset,
                    reason: "truncated chunk header",
                });
            };
            let len = len as usize;
            if len % 4 != 0 {
                return Err(AssetError::BadChunk {
                    offset,
                    reason: "chunk length not 4-byte aligned",
                });
            }
            // usize is 32 bits on wasm, so a hostile length can wrap
            let Some(end) = offset
                .checked_add(CHUNK_HEADER_LEN)
                .and_then(|o| o.checked_add(len))
                .filter(|&end| end <= bytes.len())
            else {
                return Err(AssetError::BadChunk {
                    offset,
                    reason: "chunk runs past end of file",
                });
            };
            match (kind, json_len.is_some()) {
                (CHUNK_JSON, false) => json_len = Some(len),
                (CHUNK_JSON, true) => {
                    return Err(AssetError::BadChunk {
                        offset,
                        reason: "duplicate JSON chunk",
                    })
                }
                (_, false) => {
                    return Err(AssetError::BadChunk {
                        offset,
                        reason: "first chunk must be JSON",
                    })
                }
                (CHUNK_BIN, true) => bin_len += len,
                // unknown chunk types are skipped
                _ => {}
            }
            offset = end;
        }

        let json_len = json_len.ok_or(AssetError::BadChunk {
            offset: HEADER_LEN,
            reason: "missing JSON chunk",
        })?;
        Ok(Self {
            name: name.to_string(),
            byte_len: bytes.len(),
            json_len,
            bin_len,
        })
    }
}

/// Opaque id for renderer-side resources bound to a model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ModelHandle(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Material {
    Standard,
    /// Vertex-displacing material used when the final ball deflates.
    Deflatable,
    Emissive,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoadedModel {
    pub asset: ModelAsset,
    pub handle: ModelHandle,
    pub material: Material,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum ModelSlot {
    #[default]
    Empty,
    Loaded(LoadedModel),
    Failed,
    Disposed,
}

impl ModelSlot {
    pub fn loaded(&self) -> Option<&LoadedModel> {
        match self {
            ModelSlot::Loaded(m) => Some(m),
            _ => None,
        }
    }

    pub fn loaded_mut(&mut self) -> Option<&mut LoadedModel> {
        match self {
            ModelSlot::Loaded(m) => Some(m),
            _ => None,
        }
    }

    /// Move to `Disposed`, yielding the handle only the first time.
    pub fn take_for_dispose(&mut self) -> Option<ModelHandle> {
        match std::mem::replace(self, ModelSlot::Disposed) {
            ModelSlot::Loaded(m) => Some(m.handle),
            _ => None,
        }
    }
}

/// Frees renderer resources for a model. Implemented by the GPU layer and by
/// test doubles that count releases.
pub trait ResourceRelease {
    fn release(&mut self, handle: ModelHandle);
}

#[cfg(test)]
pub(crate) fn glb_fixture(json: &[u8], bin: &[u8]) -> Vec<u8> {
    fn pad(mut v: Vec<u8>, fill: u8) -> Vec<u8> {
        while v.len() % 4 != 0 {
            v.push(fill);
        }
        v
    }
    let json = pad(json.to_vec(), b' ');
    let bin = pad(bin.to_vec(), 0);
    let mut out = Vec::new();
    let total = HEADER_LEN
        + CHUNK_HEADER_LEN
        + json.len()
        + if bin.is_empty() { 0 } else { CHUNK_HEADER_LEN + bin.len() };
    out.extend_from_slice(&GLB_MAGIC.to_le_bytes());
    out.extend_from_slice(&GLB_VERSION.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(&CHUNK_JSON.to_le_bytes());
    out.extend_from_slice(&json);
    if !bin.is_empty() {
        out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        out.extend_from_slice(&CHUNK_BIN.to_le_bytes());
        out.extend_from_slice(&bin);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_json_and_bin_chunks() {
        let bytes = glb_fixture(br#"{"asset":{"version":"2.0"}}"#, &[1, 2, 3, 4, 5]);
        let asset = ModelAsset::from_glb_bytes("ball", &bytes).unwrap();
        assert_eq!(asset.byte_len, bytes.len());
        assert_eq!(asset.json_len, 28);
        assert_eq!(asset.bin_len, 8);
    }

    #[test]
    fn rejects_short_and_foreign_payloads() {
        assert_eq!(
            ModelAsset::from_glb_bytes("x", &[0; 4]),
            Err(AssetError::TooShort(4))
        );
        let html = b"<!doctype html><html></html>";
        assert!(matches!(
            ModelAsset::from_glb_bytes("x", html),
            Err(AssetError::BadMagic(_))
        ));
    }

    #[test]
    fn rejects_wrong_version_and_length() {
        let mut bytes = glb_fixture(b"{}", &[]);
        bytes[4] = 1;
        assert_eq!(
            ModelAsset::from_glb_bytes("x", &bytes),
            Err(AssetError::UnsupportedVersion(1))
        );

        let mut bytes = glb_fixture(b"{}", &[]);
        bytes.push(0);
        assert!(matches!(
            ModelAsset::from_glb_bytes("x", &bytes),
            Err(AssetError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn rejects_bin_before_json() {
        let mut bytes = glb_fixture(b"{}", &[]);
        bytes[16..20].copy_from_slice(&CHUNK_BIN.to_le_bytes());
        assert!(matches!(
            ModelAsset::from_glb_bytes("x", &bytes),
            Err(AssetError::BadChunk { offset: 12, .. })
        ));
    }

    #[test]
    fn rejects_huge_chunk_length() {
        let mut bytes = glb_fixture(b"{}", &[9, 9, 9, 9]);
        bytes[24..28].copy_from_slice(&0xFFFF_FFF4u32.to_le_bytes());
        assert_eq!(
            ModelAsset::from_glb_bytes("x", &bytes),
            Err(AssetError::BadChunk {
                offset: 24,
                reason: "chunk runs past end of file",
            })
        );
    }

    #[test]
    fn slot_yields_handle_once() {
        let asset = ModelAsset::from_glb_bytes("x", &glb_fixture(b"{}", &[])).unwrap();
        let mut slot = ModelSlot::Loaded(LoadedModel {
            asset,
            handle: ModelHandle(7),
            material: Material::Standard,
        });
        assert_eq!(slot.take_for_dispose(), Some(ModelHandle(7)));
        assert_eq!(slot.take_for_dispose(), None);
        assert_eq!(slot, ModelSlot::Disposed);
    }
}
