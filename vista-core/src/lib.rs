pub mod airport;
pub mod geo;
pub mod iata;
pub mod notification;
pub mod schedule;

pub use airport::{Airport, AirportDirectory, DirectoryError};
pub use geo::{Coordinate, GeoError, SpeedMode};
pub use iata::IataCode;
pub use notification::{DispatchError, Notification, NotificationDispatcher, NotificationReceipt};
pub use schedule::{DateRange, ScheduleError};
