pub mod changes;
pub mod desk;
pub mod dispatch;
pub mod error;
pub mod lifecycle;
pub mod memory;
pub mod models;
pub mod notify;
pub mod registry;
pub mod tracking;

pub use changes::{AppliedChange, ChangeError, ChangeHandler, StaffUpdate};
pub use desk::{NotificationOutcome, ReservationDesk, StaffUpdateOutcome, SubmissionReceipt};
pub use dispatch::{CircuitBreaker, CircuitState, DispatchSettings, GuardedDispatcher, NotificationAudit};
pub use error::{RepositoryError, ReservationError};
pub use lifecycle::{LifecycleError, ReservationLifecycle, TransitionPolicy};
pub use memory::InMemoryReservationRepository;
pub use models::{Reservation, ReservationDetails, ReservationKind, ReservationStatus, Submission};
pub use registry::{ReservationRegistry, ReservationRepository};
pub use tracking::{Tracker, TrackingError, TrackingView};
