use thiserror::Error;

/// Rejections produced by the reservation rules. Storage failures are not
/// represented here; they travel as `AppError::Database`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReservationError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0} is at full capacity")]
    AtCapacity(&'static str),
    #[error("{0} is already reserved")]
    AlreadyReserved(&'static str),
    #[error("{0} has no active reservation for this principal")]
    NotReserved(&'static str),
    #[error("Not authorized to release this {0} reservation")]
    Unauthorized(&'static str),
}

impl ReservationError {
    pub fn kind(&self) -> &'static str {
        match self {
            ReservationError::NotFound(_) => "NOT_FOUND",
            ReservationError::AtCapacity(_) => "AT_CAPACITY",
            ReservationError::AlreadyReserved(_) => "ALREADY_RESERVED",
            ReservationError::NotReserved(_) => "NOT_RESERVED",
            ReservationError::Unauthorized(_) => "UNAUTHORIZED",
        }
    }
}

/// Who is asking to give a reservation back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Releaser {
    Claimant(String),
    /// Host override: releases whatever reservation is active.
    Host,
}

/// A finite resource handed out to a deduplicated set of claimants,
/// at most `seats()` of them at a time.
pub trait Reservable {
    const LABEL: &'static str;

    fn seats(&self) -> usize;

    fn holders(&self) -> Vec<&str>;

    /// Error reported when every seat is taken by someone else.
    fn exhausted(&self) -> ReservationError;

    /// Exclusive resources belong to their single holder, so a foreign
    /// release attempt is an authorization failure rather than a missing claim.
    fn is_exclusive(&self) -> bool {
        false
    }

    fn is_held_by(&self, claimant_id: &str) -> bool {
        self.holders().contains(&claimant_id)
    }

    fn check_reserve(&self, claimant_id: &str) -> Result<(), ReservationError> {
        if self.is_held_by(claimant_id) {
            return Err(ReservationError::AlreadyReserved(Self::LABEL));
        }
        if self.holders().len() >= self.seats() {
            return Err(self.exhausted());
        }
        Ok(())
    }

    fn check_release(&self, releaser: &Releaser) -> Result<(), ReservationError> {
        let holders = self.holders();
        match releaser {
            Releaser::Host if !holders.is_empty() => Ok(()),
            Releaser::Host => Err(ReservationError::NotReserved(Self::LABEL)),
            Releaser::Claimant(id) if holders.contains(&id.as_str()) => Ok(()),
            Releaser::Claimant(_) if self.is_exclusive() && !holders.is_empty() => {
                Err(ReservationError::Unauthorized(Self::LABEL))
            }
            Releaser::Claimant(_) => Err(ReservationError::NotReserved(Self::LABEL)),
        }
    }
}

/// Turns the result of a conditional write into the reservation contract.
/// `applied` is the row returned by the write when its guard held; otherwise
/// `current` is the freshly re-read resource used to explain the refusal.
pub fn settle_reserve<R: Reservable>(
    applied: Option<R>,
    current: Option<R>,
    claimant_id: &str,
) -> Result<R, ReservationError> {
    if let Some(resource) = applied {
        return Ok(resource);
    }
    let resource = current.ok_or(ReservationError::NotFound(R::LABEL))?;
    // The guard failed, so if the re-read looks admissible a concurrent
    // release landed in between; the write still lost to a full resource.
    Err(resource.check_reserve(claimant_id).err().unwrap_or_else(|| resource.exhausted()))
}

pub fn settle_release<R: Reservable>(
    applied: Option<R>,
    current: Option<R>,
    releaser: &Releaser,
) -> Result<R, ReservationError> {
    if let Some(resource) = applied {
        return Ok(resource);
    }
    let resource = current.ok_or(ReservationError::NotFound(R::LABEL))?;
    Err(resource.check_release(releaser).err().unwrap_or(ReservationError::NotReserved(R::LABEL)))
}
