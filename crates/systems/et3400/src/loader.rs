//! Program images written straight into memory, bypassing the CPU
//!
//! Two JSON shapes are accepted:
//!
//! ```json
//! {"pairs": [[0, 134], [1, 66]]}
//! {"block": {"start": 0, "bytes": [134, 66]}}
//! ```

use emu_core::logging::{log, LogCategory, LogLevel};
use serde::{Deserialize, Serialize};

use crate::bus::Et3400Bus;
use crate::Et3400Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramImage {
    /// Individual `(address, value)` bytes, written in order
    Pairs(Vec<(u16, u8)>),
    /// Contiguous bytes starting at `start`
    Block { start: u16, bytes: Vec<u8> },
}

/// Outcome of a load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoadReport {
    /// Bytes stored in RAM
    pub written: usize,
    /// Bytes dropped because they targeted ROM
    pub rejected: usize,
}

impl ProgramImage {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn len(&self) -> usize {
        match self {
            ProgramImage::Pairs(pairs) => pairs.len(),
            ProgramImage::Block { bytes, .. } => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lowest address the image touches
    pub fn start(&self) -> Option<u16> {
        match self {
            ProgramImage::Pairs(pairs) => pairs.iter().map(|&(a, _)| a).min(),
            ProgramImage::Block { start, bytes } => (!bytes.is_empty()).then_some(*start),
        }
    }

    /// Flatten into `(address, value)` writes, rejecting a block that runs past $FFFF
    pub fn writes(&self) -> Result<Vec<(u16, u8)>, Et3400Error> {
        match self {
            ProgramImage::Pairs(pairs) => Ok(pairs.clone()),
            ProgramImage::Block { start, bytes } => {
                if *start as usize + bytes.len() > 0x10000 {
                    return Err(Et3400Error::ImageOverflow {
                        start: *start,
                        len: bytes.len(),
                    });
                }
                Ok(bytes
                    .iter()
                    .enumerate()
                    .map(|(i, &b)| (start.wrapping_add(i as u16), b))
                    .collect())
            }
        }
    }
}

/// Store every byte of `image` through the bus write path
pub(crate) fn load(bus: &mut Et3400Bus, image: &ProgramImage) -> Result<LoadReport, Et3400Error> {
    let writes = image.writes()?;
    let mut report = LoadReport::default();
    for (addr, value) in writes {
        if bus.rom.contains(addr) {
            report.rejected += 1;
        } else {
            report.written += 1;
        }
        bus.write_checked(addr, value)?;
    }
    log(LogCategory::Loader, LogLevel::Info, || {
        format!(
            "loaded {} bytes ({} rejected by ROM)",
            report.written, report.rejected
        )
    });
    Ok(report)
}
