//! Structural violation errors.
//!
//! These indicate a caller broke a database precondition (double-driving a
//! net, binding an occupied bel). They are programmer errors: the embedding
//! tool reports them and aborts the run. Recoverable legality rejections
//! never take this path; they are plain `bool`/`Option` returns.

use basalt_common::Ident;
use basalt_device::{BelId, PipId, WireId};

/// A structural violation of the design database invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DesignError {
    /// A cell with this name already exists.
    #[error("duplicate cell name {0:?}")]
    DuplicateCell(Ident),
    /// A net with this name already exists.
    #[error("duplicate net name {0:?}")]
    DuplicateNet(Ident),
    /// The named port does not exist on the cell.
    #[error("cell {cell:?} has no port {port:?}")]
    PortNotFound {
        /// Cell name.
        cell: Ident,
        /// Port name.
        port: Ident,
    },
    /// The port is already connected to a net.
    #[error("port {port:?} of cell {cell:?} is already connected")]
    PortConnected {
        /// Cell name.
        cell: Ident,
        /// Port name.
        port: Ident,
    },
    /// The net already has a driver.
    #[error("net {0:?} is already driven")]
    NetAlreadyDriven(Ident),
    /// The bel is already bound to a cell.
    #[error("bel {0:?} is already bound")]
    BelAlreadyBound(BelId),
    /// The bel is not bound.
    #[error("bel {0:?} is not bound")]
    BelNotBound(BelId),
    /// The cell is already placed on some bel.
    #[error("cell {0:?} is already placed")]
    CellAlreadyPlaced(Ident),
    /// The wire is already bound to a net.
    #[error("wire {0:?} is already bound")]
    WireAlreadyBound(WireId),
    /// The wire is not bound.
    #[error("wire {0:?} is not bound")]
    WireNotBound(WireId),
    /// The pip is already bound to a net.
    #[error("pip {0:?} is already bound")]
    PipAlreadyBound(PipId),
    /// The pip is not bound.
    #[error("pip {0:?} is not bound")]
    PipNotBound(PipId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_context() {
        let err = DesignError::NetAlreadyDriven(Ident::from_raw(5));
        assert!(format!("{err}").contains("already driven"));
        let err = DesignError::BelAlreadyBound(BelId::from_raw(3));
        assert!(format!("{err}").contains("already bound"));
    }

    #[test]
    fn errors_compare() {
        assert_eq!(
            DesignError::WireNotBound(WireId::from_raw(1)),
            DesignError::WireNotBound(WireId::from_raw(1))
        );
        assert_ne!(
            DesignError::WireNotBound(WireId::from_raw(1)),
            DesignError::WireNotBound(WireId::from_raw(2))
        );
    }
}
