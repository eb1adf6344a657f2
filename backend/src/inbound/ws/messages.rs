//! Frames pushed to connected dashboard sessions.

use serde::Serialize;

use crate::domain::kind::RecordKind;
use crate::domain::notice::Notice;
use crate::domain::record::Record;
use crate::domain::view::ViewNode;

/// Connection indicator states shown in the dashboard header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionState {
    Connected,
    Error,
}

/// One server-to-dashboard frame.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerFrame {
    /// Full recomputed list for one kind, with its rendered projection.
    Snapshot {
        kind: RecordKind,
        total: usize,
        records: Vec<Record>,
        view: ViewNode,
    },
    /// Transient toast notice.
    Notice { notice: Notice },
    /// Connection indicator update.
    ConnectionStatus { state: ConnectionState },
}
