pub const YSF_DATA_MAGIC: &[u8; 4] = b"YSFD";
pub const YSF_POLL_MAGIC: &[u8; 4] = b"YSFP";
pub const YSF_UNLINK_MAGIC: &[u8; 4] = b"YSFU";

pub const YSF_CALLSIGN_LENGTH: usize = usrp2ysf_core::callsign::YSF_CALLSIGN_LENGTH;

pub const YSF_SYNC_BYTES: [u8; 5] = [0xD4, 0x71, 0xC9, 0x63, 0x4D];
pub const YSF_SYNC_LENGTH_BYTES: usize = 5;
pub const YSF_FICH_LENGTH_BYTES: usize = 25;
pub const YSF_PAYLOAD_LENGTH_BYTES: usize = 90;

/// Sync + FICH + payload, as carried on the air
pub const YSF_FRAME_LENGTH_BYTES: usize = YSF_SYNC_LENGTH_BYTES + YSF_FICH_LENGTH_BYTES + YSF_PAYLOAD_LENGTH_BYTES;

/// Network datagram: magic, three callsigns, counter, air frame
pub const YSF_NET_HEADER_LENGTH: usize = 35;
pub const YSF_NET_FRAME_LENGTH: usize = YSF_NET_HEADER_LENGTH + YSF_FRAME_LENGTH_BYTES;
pub const YSF_POLL_LENGTH: usize = 4 + YSF_CALLSIGN_LENGTH;

/// The payload is split into five blocks, one per vocoder frame
pub const YSF_BLOCKS_PER_FRAME: usize = 5;
pub const YSF_BLOCK_LENGTH_BYTES: usize = 18;
/// VD mode 2: 5 DCH bytes followed by one 13-byte VCH per block
pub const YSF_VD2_DCH_BYTES_PER_BLOCK: usize = 5;
pub const YSF_VCH_LENGTH_BYTES: usize = 13;

pub const YSF_DEST_ALL: &[u8; YSF_CALLSIGN_LENGTH] = b"ALL       ";

pub const WHITENING_DATA: [u8; 20] = [
    0x93, 0xD7, 0x51, 0x21, 0x9C, 0x2F, 0x6C, 0xD0, 0xEF, 0x0F, 0xF8, 0x3D, 0xF1, 0x73, 0x20, 0x94, 0xED, 0x1E, 0x7C, 0xD8,
];

/// Frame indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameIndicator {
    Header = 0,
    Communications = 1,
    Terminator = 2,
    Test = 3,
}

impl FrameIndicator {
    pub fn from_raw(raw: u64) -> Option<Self> {
        match raw {
            0 => Some(FrameIndicator::Header),
            1 => Some(FrameIndicator::Communications),
            2 => Some(FrameIndicator::Terminator),
            3 => Some(FrameIndicator::Test),
            _ => None,
        }
    }

    pub fn into_raw(self) -> u64 {
        self as u64
    }
}

/// Payload data type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    VdMode1 = 0,
    DataFr = 1,
    VdMode2 = 2,
    VoiceFr = 3,
}

impl DataType {
    pub fn from_raw(raw: u64) -> Option<Self> {
        match raw {
            0 => Some(DataType::VdMode1),
            1 => Some(DataType::DataFr),
            2 => Some(DataType::VdMode2),
            3 => Some(DataType::VoiceFr),
            _ => None,
        }
    }

    pub fn into_raw(self) -> u64 {
        self as u64
    }
}

/// One VCH per block of a voice frame
pub type VchBlocks = [[u8; YSF_VCH_LENGTH_BYTES]; YSF_BLOCKS_PER_FRAME];
