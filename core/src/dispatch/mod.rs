pub mod driver;
pub mod policy;
pub mod session;

pub use driver::ClockDriver;
pub use policy::{DispatchPolicy, LIVE_GOLDEN_HOUR_SECONDS, SIMULATION_GOLDEN_HOUR_SECONDS};
pub use session::{
    Countdown, DispatchEvent, DispatchSession, DispatchSnapshot, DispatchStatus, GoldenHourStatus,
};
