use core::fmt;

/// Party whose evidence failed to verify.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Party {
    A,
    B,
}

/// Coarse classification of a rejected transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller and addresses do not reproduce the supplied id.
    Authorization,
    /// A signature does not recover to the expected party.
    Evidence,
    /// The agreement is already terminal.
    StateConflict,
}

/// Errors returned by `sign`/`cancel`. Every variant leaves the record untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AgreementError {
    InvalidIdentifier,
    InvalidEvidence(Party),
    AlreadySigned,
    AlreadyCanceled,
}

impl AgreementError {
    pub const fn kind(self) -> ErrorKind {
        match self {
            AgreementError::InvalidIdentifier => ErrorKind::Authorization,
            AgreementError::InvalidEvidence(_) => ErrorKind::Evidence,
            AgreementError::AlreadySigned | AgreementError::AlreadyCanceled => {
                ErrorKind::StateConflict
            }
        }
    }

    /// Revert reason string, byte-identical to the deployed contract's.
    pub const fn reason(self) -> &'static str {
        match self {
            AgreementError::InvalidIdentifier => "Invalid identifier",
            AgreementError::InvalidEvidence(Party::A) => "A Invalid evidence",
            AgreementError::InvalidEvidence(Party::B) => "B Invalid evidence",
            AgreementError::AlreadySigned => "Already signed",
            AgreementError::AlreadyCanceled => "Already canceled",
        }
    }
}

impl fmt::Display for AgreementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

impl core::error::Error for AgreementError {}
