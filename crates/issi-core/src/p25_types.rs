//! P25 enumerations shared between the FNE side and the ISSI side of the gateway

/// Length of one IMBE voice codeword in bytes
pub const IMBE_BUF_LEN: usize = 11;

/// Size of the FNE network message header preceding the DFSI payload
pub const P25_MSG_HDR_SIZE: usize = 24;

/// P25 data unit identifier, as carried in the NID and in the FNE message header
/// Bits: 4
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum P25Duid {
    Hdu = 0x0,
    Tdu = 0x3,
    Ldu1 = 0x5,
    Tsdu = 0x7,
    Ldu2 = 0xA,
    Pdu = 0xC,
    Tdulc = 0xF,
}

impl std::convert::TryFrom<u64> for P25Duid {
    type Error = ();
    fn try_from(x: u64) -> Result<Self, Self::Error> {
        match x {
            0x0 => Ok(P25Duid::Hdu),
            0x3 => Ok(P25Duid::Tdu),
            0x5 => Ok(P25Duid::Ldu1),
            0x7 => Ok(P25Duid::Tsdu),
            0xA => Ok(P25Duid::Ldu2),
            0xC => Ok(P25Duid::Pdu),
            0xF => Ok(P25Duid::Tdulc),
            _ => Err(()),
        }
    }
}

impl P25Duid {
    /// Convert this enum back into the raw integer value
    pub fn into_raw(self) -> u64 {
        self as u64
    }

    /// TDU and TDULC both end a voice transmission
    pub fn is_terminator(self) -> bool {
        matches!(self, P25Duid::Tdu | P25Duid::Tdulc)
    }

    pub fn is_voice(self) -> bool {
        matches!(self, P25Duid::Ldu1 | P25Duid::Ldu2)
    }
}

impl core::fmt::Display for P25Duid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            P25Duid::Hdu => write!(f, "HDU"),
            P25Duid::Tdu => write!(f, "TDU"),
            P25Duid::Ldu1 => write!(f, "LDU1"),
            P25Duid::Tsdu => write!(f, "TSDU"),
            P25Duid::Ldu2 => write!(f, "LDU2"),
            P25Duid::Pdu => write!(f, "PDU"),
            P25Duid::Tdulc => write!(f, "TDULC"),
        }
    }
}

/// Group or unit-to-unit call, as flagged by the FNE
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CallType {
    Group = 0,
    Private = 1,
}

impl std::convert::TryFrom<u64> for CallType {
    type Error = ();
    fn try_from(x: u64) -> Result<Self, Self::Error> {
        match x {
            0 => Ok(CallType::Group),
            1 => Ok(CallType::Private),
            _ => Err(()),
        }
    }
}

impl core::fmt::Display for CallType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CallType::Group => write!(f, "group"),
            CallType::Private => write!(f, "private"),
        }
    }
}

/// Frame type field of the FNE message header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FneFrameType {
    DataUnit = 0x00,
    HduValid = 0x01,
    HduLateEntry = 0x02,
    Terminator = 0x03,
}

impl std::convert::TryFrom<u64> for FneFrameType {
    type Error = ();
    fn try_from(x: u64) -> Result<Self, Self::Error> {
        match x {
            0x00 => Ok(FneFrameType::DataUnit),
            0x01 => Ok(FneFrameType::HduValid),
            0x02 => Ok(FneFrameType::HduLateEntry),
            0x03 => Ok(FneFrameType::Terminator),
            _ => Err(()),
        }
    }
}

impl core::fmt::Display for FneFrameType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FneFrameType::DataUnit => write!(f, "DataUnit"),
            FneFrameType::HduValid => write!(f, "HduValid"),
            FneFrameType::HduLateEntry => write!(f, "HduLateEntry"),
            FneFrameType::Terminator => write!(f, "Terminator"),
        }
    }
}
