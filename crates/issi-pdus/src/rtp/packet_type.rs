use core::fmt;

use issi_core::{BitBuffer, PduParseErr, let_field};

/// ISSI packet type
/// Bits: 7
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PacketType {
    PttTransmitRequest = 0,
    PttTransmitGrant = 1,
    PttTransmitProgress = 2,
    PttTransmitEnd = 3,
    PttTransmitStart = 4,
    PttTransmitMute = 5,
    PttTransmitUnmute = 6,
    PttTransmitWait = 7,
    PttTransmitDeny = 8,
    Heartbeat = 9,
    HeartbeatQuery = 10,
}

impl std::convert::TryFrom<u64> for PacketType {
    type Error = ();
    fn try_from(x: u64) -> Result<Self, Self::Error> {
        match x {
            0 => Ok(PacketType::PttTransmitRequest),
            1 => Ok(PacketType::PttTransmitGrant),
            2 => Ok(PacketType::PttTransmitProgress),
            3 => Ok(PacketType::PttTransmitEnd),
            4 => Ok(PacketType::PttTransmitStart),
            5 => Ok(PacketType::PttTransmitMute),
            6 => Ok(PacketType::PttTransmitUnmute),
            7 => Ok(PacketType::PttTransmitWait),
            8 => Ok(PacketType::PttTransmitDeny),
            9 => Ok(PacketType::Heartbeat),
            10 => Ok(PacketType::HeartbeatQuery),
            _ => Err(()),
        }
    }
}

impl PacketType {
    /// Convert this enum back into the raw integer value
    pub fn into_raw(self) -> u64 {
        self as u64
    }
}

impl From<PacketType> for u64 {
    fn from(e: PacketType) -> Self { e.into_raw() }
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PacketType::PttTransmitRequest => write!(f, "PttTransmitRequest"),
            PacketType::PttTransmitGrant => write!(f, "PttTransmitGrant"),
            PacketType::PttTransmitProgress => write!(f, "PttTransmitProgress"),
            PacketType::PttTransmitEnd => write!(f, "PttTransmitEnd"),
            PacketType::PttTransmitStart => write!(f, "PttTransmitStart"),
            PacketType::PttTransmitMute => write!(f, "PttTransmitMute"),
            PacketType::PttTransmitUnmute => write!(f, "PttTransmitUnmute"),
            PacketType::PttTransmitWait => write!(f, "PttTransmitWait"),
            PacketType::PttTransmitDeny => write!(f, "PttTransmitDeny"),
            PacketType::Heartbeat => write!(f, "Heartbeat"),
            PacketType::HeartbeatQuery => write!(f, "HeartbeatQuery"),
        }
    }
}

/// ISSI packet type block, 4 octets: M(1) PT(7) SO(8) TSN(7) L(1) Interval(8)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssiPacketType {
    /// 1 bit, mute status
    pub mute_status: bool,
    pub packet_type: PacketType,
    pub service_options: u8,
    /// 7 bits, transmission sequence number
    pub transmission_sequence_number: u8,
    /// 1 bit, losing audio
    pub losing_audio: bool,
    pub interval: u8,
}

impl IssiPacketType {
    pub const LENGTH: usize = 4;

    pub fn new(packet_type: PacketType) -> Self {
        IssiPacketType {
            mute_status: false,
            packet_type,
            service_options: 0,
            transmission_sequence_number: 0,
            losing_audio: false,
            interval: 0,
        }
    }

    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let mute_status = buffer.read_flag("mute_status")?;
        let_field!(buffer, packet_type, 7);
        let packet_type = PacketType::try_from(packet_type)
            .map_err(|_| PduParseErr::InvalidValue { field: "packet_type", value: packet_type })?;
        let_field!(buffer, service_options, 8);
        let_field!(buffer, transmission_sequence_number, 7);
        let losing_audio = buffer.read_flag("losing_audio")?;
        let_field!(buffer, interval, 8);

        Ok(IssiPacketType {
            mute_status,
            packet_type,
            service_options: service_options as u8,
            transmission_sequence_number: transmission_sequence_number as u8,
            losing_audio,
            interval: interval as u8,
        })
    }

    pub fn to_bitbuf(&self, buffer: &mut BitBuffer) {
        buffer.write_flag(self.mute_status);
        buffer.write_bits(self.packet_type.into_raw(), 7);
        buffer.write_bits(self.service_options as u64, 8);
        buffer.write_bits((self.transmission_sequence_number & 0x7F) as u64, 7);
        buffer.write_flag(self.losing_audio);
        buffer.write_bits(self.interval as u64, 8);
    }
}

impl fmt::Display for IssiPacketType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "IssiPacketType {{ {} mute: {} so: 0x{:02X} tsn: {} losing_audio: {} interval: {} }}",
            self.packet_type,
            self.mute_status,
            self.service_options,
            self.transmission_sequence_number,
            self.losing_audio,
            self.interval,
        )
    }
}
