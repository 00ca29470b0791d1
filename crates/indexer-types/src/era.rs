//! # Eras and Native Headers
//!
//! The chain-sync client delivers each block as a discriminator tag plus one
//! of several era-specific header shapes. The shapes form a closed set, so
//! they are modelled as the [`NativeHeader`] enum whose variants all
//! implement the [`HeaderView`] capability set.

use crate::errors::MappingError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Slots per Byron epoch (10k with k = 2160).
pub const BYRON_SLOTS_PER_EPOCH: u64 = 21_600;

// =============================================================================
// DISCRIMINATOR
// =============================================================================

/// Native block-type discriminator as delivered by the chain-sync client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum BlockType {
    ByronEbb = 0,
    ByronMain = 1,
    Shelley = 2,
    Allegra = 3,
    Mary = 4,
    Alonzo = 5,
    Babbage = 6,
    Conway = 7,
}

impl BlockType {
    /// Parse a raw discriminator.
    pub fn from_u8(value: u8) -> Result<Self, MappingError> {
        match value {
            0 => Ok(Self::ByronEbb),
            1 => Ok(Self::ByronMain),
            2 => Ok(Self::Shelley),
            3 => Ok(Self::Allegra),
            4 => Ok(Self::Mary),
            5 => Ok(Self::Alonzo),
            6 => Ok(Self::Babbage),
            7 => Ok(Self::Conway),
            other => Err(MappingError::UnknownBlockType(other)),
        }
    }

    /// Header family this block type is delivered with.
    pub const fn family(self) -> HeaderFamily {
        match self {
            Self::ByronEbb => HeaderFamily::Ebb,
            Self::ByronMain => HeaderFamily::Main,
            Self::Shelley | Self::Allegra | Self::Mary | Self::Alonzo => {
                HeaderFamily::ShelleyFamily
            }
            Self::Babbage | Self::Conway => HeaderFamily::BabbageFamily,
        }
    }

    /// Era this block type belongs to.
    pub fn era(self) -> Era {
        match self {
            Self::ByronEbb | Self::ByronMain => Era::new(0, "Byron"),
            Self::Shelley => Era::new(1, "Shelley"),
            Self::Allegra => Era::new(2, "Allegra"),
            Self::Mary => Era::new(3, "Mary"),
            Self::Alonzo => Era::new(4, "Alonzo"),
            Self::Babbage => Era::new(5, "Babbage"),
            Self::Conway => Era::new(6, "Conway"),
        }
    }
}

impl TryFrom<u8> for BlockType {
    type Error = MappingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_u8(value)
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Header shape families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderFamily {
    Ebb,
    Main,
    ShelleyFamily,
    BabbageFamily,
}

impl fmt::Display for HeaderFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ebb => "EBB",
            Self::Main => "Byron main",
            Self::ShelleyFamily => "Shelley-family",
            Self::BabbageFamily => "Babbage-family",
        };
        f.write_str(name)
    }
}

/// Ledger era identifier and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Era {
    pub id: u8,
    pub name: String,
}

impl Era {
    pub fn new(id: u8, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

// =============================================================================
// HEADER CAPABILITY
// =============================================================================

/// Accessors shared by every native header shape.
pub trait HeaderView {
    /// Block hash as a hex string.
    fn hash(&self) -> &str;
    /// Absolute slot number.
    fn slot(&self) -> u64;
    /// Embedded block number, or 0 when the shape does not carry one.
    fn block_number(&self) -> u64;
    fn era(&self) -> &Era;
}

/// Byron epoch-boundary block header. Carries no block number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EbbHeader {
    pub hash: String,
    pub epoch: u64,
    pub era: Era,
}

impl HeaderView for EbbHeader {
    fn hash(&self) -> &str {
        &self.hash
    }

    fn slot(&self) -> u64 {
        self.epoch.saturating_mul(BYRON_SLOTS_PER_EPOCH)
    }

    fn block_number(&self) -> u64 {
        0
    }

    fn era(&self) -> &Era {
        &self.era
    }
}

/// Byron main block header. The chain difficulty doubles as block number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainHeader {
    pub hash: String,
    pub epoch: u64,
    pub slot_in_epoch: u64,
    pub difficulty: u64,
    pub era: Era,
}

impl HeaderView for MainHeader {
    fn hash(&self) -> &str {
        &self.hash
    }

    fn slot(&self) -> u64 {
        self.epoch
            .saturating_mul(BYRON_SLOTS_PER_EPOCH)
            .saturating_add(self.slot_in_epoch)
    }

    fn block_number(&self) -> u64 {
        self.difficulty
    }

    fn era(&self) -> &Era {
        &self.era
    }
}

/// Header used by Shelley, Allegra, Mary and Alonzo blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShelleyFamilyHeader {
    pub hash: String,
    pub slot: u64,
    pub block_number: u64,
    pub era: Era,
}

impl HeaderView for ShelleyFamilyHeader {
    fn hash(&self) -> &str {
        &self.hash
    }

    fn slot(&self) -> u64 {
        self.slot
    }

    fn block_number(&self) -> u64 {
        self.block_number
    }

    fn era(&self) -> &Era {
        &self.era
    }
}

/// Header used by Babbage and Conway blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BabbageFamilyHeader {
    pub hash: String,
    pub slot: u64,
    pub block_number: u64,
    pub protocol_version: (u64, u64),
    pub era: Era,
}

impl HeaderView for BabbageFamilyHeader {
    fn hash(&self) -> &str {
        &self.hash
    }

    fn slot(&self) -> u64 {
        self.slot
    }

    fn block_number(&self) -> u64 {
        self.block_number
    }

    fn era(&self) -> &Era {
        &self.era
    }
}

/// Closed set of native header shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeHeader {
    Ebb(EbbHeader),
    Main(MainHeader),
    ShelleyFamily(ShelleyFamilyHeader),
    BabbageFamily(BabbageFamilyHeader),
}

impl NativeHeader {
    pub const fn family(&self) -> HeaderFamily {
        match self {
            Self::Ebb(_) => HeaderFamily::Ebb,
            Self::Main(_) => HeaderFamily::Main,
            Self::ShelleyFamily(_) => HeaderFamily::ShelleyFamily,
            Self::BabbageFamily(_) => HeaderFamily::BabbageFamily,
        }
    }

    /// The variant behind the shared capability set.
    pub fn view(&self) -> &dyn HeaderView {
        match self {
            Self::Ebb(h) => h,
            Self::Main(h) => h,
            Self::ShelleyFamily(h) => h,
            Self::BabbageFamily(h) => h,
        }
    }
}

impl HeaderView for NativeHeader {
    fn hash(&self) -> &str {
        self.view().hash()
    }

    fn slot(&self) -> u64 {
        self.view().slot()
    }

    fn block_number(&self) -> u64 {
        self.view().block_number()
    }

    fn era(&self) -> &Era {
        self.view().era()
    }
}
