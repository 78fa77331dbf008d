//! Schedule aggregate: timetable entries and change requests

pub mod model;
pub mod repository;

pub use model::{
    ChangeRequestFilter, CreateChangeRequestDto, RequestStatus, Schedule, ScheduleChangeRequest,
    ScheduleFilter, ScheduleInput,
};
pub use repository::{ChangeRequestRepositoryInterface, ScheduleRepositoryInterface};
