use strum_macros::{Display, IntoStaticStr};

/// Host event ids.
///
/// Discriminants match the host's event numbering; gaps are ids the host
/// has retired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum EventId {
    None,
    Shutdown,
    LogMessage,
    GetPropertyReply,
    SetPropertyReply,
    CommandReply,
    StartFile,
    EndFile,
    FileLoaded,
    /// Generic message carrying a string list; used for script key bindings
    ClientMessage,
    VideoReconfig,
    AudioReconfig,
    Seek,
    PlaybackRestart,
    PropertyChange,
    QueueOverflow,
    Hook,
}

impl EventId {
    pub const ALL: [EventId; 17] = [
        EventId::None,
        EventId::Shutdown,
        EventId::LogMessage,
        EventId::GetPropertyReply,
        EventId::SetPropertyReply,
        EventId::CommandReply,
        EventId::StartFile,
        EventId::EndFile,
        EventId::FileLoaded,
        EventId::ClientMessage,
        EventId::VideoReconfig,
        EventId::AudioReconfig,
        EventId::Seek,
        EventId::PlaybackRestart,
        EventId::PropertyChange,
        EventId::QueueOverflow,
        EventId::Hook,
    ];

    /// Convert a host event id to an EventId
    pub fn from_discriminant(id: i32) -> Option<Self> {
        match id {
            0 => Some(EventId::None),
            1 => Some(EventId::Shutdown),
            2 => Some(EventId::LogMessage),
            3 => Some(EventId::GetPropertyReply),
            4 => Some(EventId::SetPropertyReply),
            5 => Some(EventId::CommandReply),
            6 => Some(EventId::StartFile),
            7 => Some(EventId::EndFile),
            8 => Some(EventId::FileLoaded),
            16 => Some(EventId::ClientMessage),
            17 => Some(EventId::VideoReconfig),
            18 => Some(EventId::AudioReconfig),
            20 => Some(EventId::Seek),
            21 => Some(EventId::PlaybackRestart),
            22 => Some(EventId::PropertyChange),
            24 => Some(EventId::QueueOverflow),
            25 => Some(EventId::Hook),
            _ => None,
        }
    }

    /// Get the host event id for this event
    pub fn to_discriminant(&self) -> i32 {
        match self {
            EventId::None => 0,
            EventId::Shutdown => 1,
            EventId::LogMessage => 2,
            EventId::GetPropertyReply => 3,
            EventId::SetPropertyReply => 4,
            EventId::CommandReply => 5,
            EventId::StartFile => 6,
            EventId::EndFile => 7,
            EventId::FileLoaded => 8,
            EventId::ClientMessage => 16,
            EventId::VideoReconfig => 17,
            EventId::AudioReconfig => 18,
            EventId::Seek => 20,
            EventId::PlaybackRestart => 21,
            EventId::PropertyChange => 22,
            EventId::QueueOverflow => 24,
            EventId::Hook => 25,
        }
    }

    /// Host-facing event name, e.g. `client-message`
    pub fn name(&self) -> &'static str {
        (*self).into()
    }

    /// Look up an event by its host-facing name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.name() == name)
    }
}
