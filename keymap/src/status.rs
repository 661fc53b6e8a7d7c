use crate::conf::RAW_REPORT_LEN;

/// Byte of the raw report that carries the status code.
const CODE_OFFSET: usize = 1;
/// The companion repeats the code over the head of the report.
const CODE_COPIES: usize = 5;

const MIC_MUTED_VIDEO_STOPPED: u8 = 0x01;
const MIC_MUTED_VIDEO_STARTED: u8 = 0x02;
const MIC_LIVE_VIDEO_STOPPED: u8 = 0x03;
const MIC_LIVE_VIDEO_STARTED: u8 = 0x04;

/// Meeting state pushed by the companion over raw HID.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    pub mic_muted: bool,
    pub video_muted: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusError {
    TooShort(usize),
    Unknown(u8),
}

impl Status {
    pub const fn new(mic_muted: bool, video_muted: bool) -> Self {
        Status { mic_muted, video_muted }
    }

    pub fn code(&self) -> u8 {
        match (self.mic_muted, self.video_muted) {
            (true, true) => MIC_MUTED_VIDEO_STOPPED,
            (true, false) => MIC_MUTED_VIDEO_STARTED,
            (false, true) => MIC_LIVE_VIDEO_STOPPED,
            (false, false) => MIC_LIVE_VIDEO_STARTED,
        }
    }

    pub fn from_code(code: u8) -> Result<Self, StatusError> {
        match code {
            MIC_MUTED_VIDEO_STOPPED => Ok(Status::new(true, true)),
            MIC_MUTED_VIDEO_STARTED => Ok(Status::new(true, false)),
            MIC_LIVE_VIDEO_STOPPED => Ok(Status::new(false, true)),
            MIC_LIVE_VIDEO_STARTED => Ok(Status::new(false, false)),
            other => Err(StatusError::Unknown(other)),
        }
    }

    /// Reads a raw report as delivered by the USB stack (report id stripped).
    pub fn decode(data: &[u8]) -> Result<Self, StatusError> {
        match data.get(CODE_OFFSET) {
            Some(code) => Status::from_code(*code),
            None => Err(StatusError::TooShort(data.len())),
        }
    }

    pub fn encode(&self) -> [u8; RAW_REPORT_LEN] {
        let mut report = [0u8; RAW_REPORT_LEN];
        report[..CODE_COPIES].fill(self.code());
        report
    }

    pub fn describe(&self) -> &'static str {
        match (self.mic_muted, self.video_muted) {
            (true, true) => "mic muted, video stopped",
            (true, false) => "mic muted, video started",
            (false, true) => "mic unmuted, video stopped",
            (false, false) => "mic unmuted, video started",
        }
    }
}
