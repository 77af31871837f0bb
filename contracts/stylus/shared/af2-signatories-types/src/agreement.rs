use alloc::vec::Vec;

use alloy_primitives::{Address, FixedBytes};

/// Agreement identifier: `keccak256(addrA || addrB || service || payloadHash)`.
pub type AgreementId = FixedBytes<32>;

/// Lifecycle of an agreement. `Signed` and `Canceled` are terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Status {
    #[default]
    Undefined = 0,
    Signed = 1,
    Canceled = 2,
}

impl Status {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    pub const fn is_terminal(self) -> bool {
        !matches!(self, Status::Undefined)
    }

    /// Label carried by the `Result` outcome for a transition into this status.
    pub const fn outcome_label(self) -> &'static str {
        match self {
            Status::Undefined => "Undefined",
            Status::Signed => "Signed",
            Status::Canceled => "Canceled",
        }
    }
}

impl TryFrom<u8> for Status {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        let status = match value {
            0 => Status::Undefined,
            1 => Status::Signed,
            2 => Status::Canceled,
            _ => return Err(()),
        };
        Ok(status)
    }
}

impl From<Status> for u8 {
    fn from(status: Status) -> Self {
        status.as_u8()
    }
}

/// Stored record for one agreement id.
///
/// An id that was never written reads as the default: `Undefined` with empty evidence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Agreement {
    pub status: Status,
    /// Signature that moved the record into its terminal status.
    pub evidence: Vec<u8>,
}

impl Agreement {
    pub fn new(status: Status, evidence: Vec<u8>) -> Self {
        Self { status, evidence }
    }
}

/// Observable result of a committed transition (`Result(actor, id, outcome)`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub actor: Address,
    pub id: AgreementId,
    pub status: Status,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        self.status.outcome_label()
    }
}
