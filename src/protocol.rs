//! Wire protocol constants.
//!
//! Every packet starts with a one-byte code. Event codes occupy the low
//! seven bits with bit 7 flagging the start edge of a paired event; setup
//! codes live in `0x70..=0x7F` and never carry the flag.

/// Emitted once at session start so a host decoder attaching mid-stream can
/// find the first valid packet.
pub const SYNC_MARKER: [u8; 12] = [
    0x56, 0x41, 0x5A, 0x01, 0x53, 0x59, 0x4E, 0x43, 0x30, 0x31, 0xAA, 0x55,
];

/// Start-edge flag OR-ed into event codes.
pub const FLAG_START: u8 = 0x80;

/// Mask selecting the event code from a type byte.
pub const EVENT_TYPE_MASK: u8 = 0x7F;

/// Timestamped event codes.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    TaskSwitch = 0x01,
    Isr = 0x02,
    TaskCreate = 0x03,
    UserTrace = 0x04,
    TaskNotify = 0x05,
    Semaphore = 0x06,
    Mutex = 0x07,
    Queue = 0x08,
    StackUsage = 0x09,
    UserToggle = 0x0A,
    UserFunction = 0x0B,
    MutexContention = 0x0C,
}

/// Which side of a paired event a packet marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Start,
    End,
}

impl EventType {
    /// Type byte for this event at the given edge.
    pub const fn type_byte(self, edge: Edge) -> u8 {
        match edge {
            Edge::Start => FLAG_START | self as u8,
            Edge::End => self as u8,
        }
    }
}

/// Identity advertisement codes.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupCode {
    TaskMap = 0x70,
    IsrMap = 0x71,
    UserTrace = 0x72,
    SemaphoreMap = 0x73,
    MutexMap = 0x74,
    QueueMap = 0x75,
    UserFunctionMap = 0x76,
    ConfigFlags = 0x77,
    Info = 0x7F,
}

/// Classification of a queue-backed kernel object.
///
/// Discriminants match the queue-type byte used by FreeRTOS.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Queue = 0,
    Mutex = 1,
    CountingSemaphore = 2,
    BinarySemaphore = 3,
    RecursiveMutex = 4,
}

impl ObjectKind {
    /// Decode a kernel queue-type byte.
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Queue),
            1 => Some(Self::Mutex),
            2 => Some(Self::CountingSemaphore),
            3 => Some(Self::BinarySemaphore),
            4 => Some(Self::RecursiveMutex),
            _ => None,
        }
    }

    /// Whether the object can be held by a task.
    pub const fn is_mutex(self) -> bool {
        matches!(self, Self::Mutex | Self::RecursiveMutex)
    }

    /// Event code used for give/take on this kind.
    pub const fn event_type(self) -> EventType {
        match self {
            Self::Mutex | Self::RecursiveMutex => EventType::Mutex,
            Self::CountingSemaphore | Self::BinarySemaphore => EventType::Semaphore,
            Self::Queue => EventType::Queue,
        }
    }

    /// Setup code advertising an object of this kind.
    pub const fn setup_code(self) -> SetupCode {
        match self {
            Self::Mutex | Self::RecursiveMutex => SetupCode::MutexMap,
            Self::CountingSemaphore | Self::BinarySemaphore => SetupCode::SemaphoreMap,
            Self::Queue => SetupCode::QueueMap,
        }
    }

    /// Default display name when the kernel supplies none.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Queue => "Queue",
            Self::Mutex => "Mutex",
            Self::CountingSemaphore => "CountingSem",
            Self::BinarySemaphore => "BinarySem",
            Self::RecursiveMutex => "RecursiveMutex",
        }
    }

    /// Short suffix appended to hints that do not already name the kind.
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Queue => "Queue",
            Self::Mutex => "Mutex",
            Self::CountingSemaphore => "CountSem",
            Self::BinarySemaphore => "BinSem",
            Self::RecursiveMutex => "RecMutex",
        }
    }

    /// Whether `hint` already spells out this kind.
    pub fn named_by(self, hint: &str) -> bool {
        hint.contains(self.suffix()) || hint.contains(self.display_name())
    }

    /// Classify an object from a kernel type hint such as `"Mutex"`.
    ///
    /// Unrecognised hints classify as [`ObjectKind::Queue`].
    pub fn from_hint(hint: &str) -> Self {
        // Recursive first: "RecMutex" also contains "Mutex".
        if Self::RecursiveMutex.named_by(hint) {
            Self::RecursiveMutex
        } else if Self::Mutex.named_by(hint) {
            Self::Mutex
        } else if Self::CountingSemaphore.named_by(hint) {
            Self::CountingSemaphore
        } else if Self::BinarySemaphore.named_by(hint) {
            Self::BinarySemaphore
        } else {
            Self::Queue
        }
    }
}

/// How the host should visualise a user trace channel.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserTraceKind {
    Graph = 0,
    Bar = 1,
    Gauge = 2,
    Counter = 3,
    Table = 4,
    Histogram = 5,
    Toggle = 6,
    Task = 7,
    Isr = 8,
}

impl UserTraceKind {
    /// Decode a category byte.
    pub const fn from_raw(raw: u8) -> Option<Self> {
        Some(match raw {
            0 => Self::Graph,
            1 => Self::Bar,
            2 => Self::Gauge,
            3 => Self::Counter,
            4 => Self::Table,
            5 => Self::Histogram,
            6 => Self::Toggle,
            7 => Self::Task,
            8 => Self::Isr,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_flag_sets_bit_seven() {
        assert_eq!(EventType::TaskSwitch.type_byte(Edge::Start), 0x81);
        assert_eq!(EventType::TaskSwitch.type_byte(Edge::End), 0x01);
        assert_eq!(
            EventType::Queue.type_byte(Edge::Start) & EVENT_TYPE_MASK,
            EventType::Queue as u8
        );
    }

    #[test]
    fn hints_classify_objects() {
        assert_eq!(ObjectKind::from_hint("Mutex"), ObjectKind::Mutex);
        assert_eq!(ObjectKind::from_hint("RecMutex"), ObjectKind::RecursiveMutex);
        assert_eq!(
            ObjectKind::from_hint("RecursiveMutex"),
            ObjectKind::RecursiveMutex
        );
        assert_eq!(ObjectKind::from_hint("CountSem"), ObjectKind::CountingSemaphore);
        assert_eq!(ObjectKind::from_hint("BinarySem"), ObjectKind::BinarySemaphore);
        assert_eq!(ObjectKind::from_hint("Queue"), ObjectKind::Queue);
        assert_eq!(ObjectKind::from_hint(""), ObjectKind::Queue);
    }

    #[test]
    fn raw_kind_roundtrip() {
        for raw in 0..=4u8 {
            assert_eq!(ObjectKind::from_raw(raw).map(|k| k as u8), Some(raw));
        }
        assert_eq!(ObjectKind::from_raw(5), None);
        assert_eq!(UserTraceKind::from_raw(8), Some(UserTraceKind::Isr));
        assert_eq!(UserTraceKind::from_raw(9), None);
    }
}
