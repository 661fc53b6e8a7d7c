//! What the status script prints, and how that maps onto a pad status code.

use serde::Deserialize;
use thiserror::Error;
use zoomer_keymap::Status;

#[derive(Debug, Error)]
pub enum MeetingError {
    #[error("status script printed invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("in a call but the script did not report {0}")]
    Missing(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Stat {
    Closed,
    Open,
    Call,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Mute {
    Muted,
    Unmuted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Video {
    Stop,
    Start,
}

#[derive(Debug, Deserialize)]
struct ScriptOutput {
    stat: Stat,
    mute: Option<Mute>,
    video: Option<Video>,
}

/// State of the conferencing app as seen by the status script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meeting {
    /// The app is not running.
    Closed,
    /// The app is running but no call is active.
    Open,
    Call(Status),
}

impl Meeting {
    pub fn parse(stdout: &str) -> Result<Self, MeetingError> {
        let out: ScriptOutput = serde_json::from_str(stdout.trim())?;
        Ok(match out.stat {
            Stat::Closed => Meeting::Closed,
            Stat::Open => Meeting::Open,
            Stat::Call => {
                let mute = out.mute.ok_or(MeetingError::Missing("mute"))?;
                let video = out.video.ok_or(MeetingError::Missing("video"))?;
                Meeting::Call(Status::new(mute == Mute::Muted, video == Video::Stop))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_maps_to_status_codes() {
        let cases = [
            ("muted", "stop", 1),
            ("muted", "start", 2),
            ("unmuted", "stop", 3),
            ("unmuted", "start", 4),
        ];
        for (mute, video, code) in cases {
            let json = format!(r#"{{"stat":"call","mute":"{mute}","video":"{video}"}}"#);
            match Meeting::parse(&json).unwrap() {
                Meeting::Call(status) => assert_eq!(status.code(), code, "{mute}/{video}"),
                other => panic!("expected a call, got {other:?}"),
            }
        }
    }

    #[test]
    fn closed_and_open_need_no_details() {
        assert_eq!(Meeting::parse(r#"{"stat":"closed"}"#).unwrap(), Meeting::Closed);
        assert_eq!(
            Meeting::parse("{\"stat\":\"open\",\"mute\":\"muted\"}\n").unwrap(),
            Meeting::Open
        );
    }

    #[test]
    fn call_without_video_is_an_error() {
        let err = Meeting::parse(r#"{"stat":"call","mute":"muted"}"#).unwrap_err();
        assert!(matches!(err, MeetingError::Missing("video")));
    }

    #[test]
    fn garbage_is_a_json_error() {
        assert!(matches!(
            Meeting::parse("execution error: Zoom got an error"),
            Err(MeetingError::Json(_))
        ));
        assert!(matches!(
            Meeting::parse(r#"{"stat":"call","mute":"maybe","video":"stop"}"#),
            Err(MeetingError::Json(_))
        ));
    }
}
