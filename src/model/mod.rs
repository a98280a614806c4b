pub mod attendance;
pub mod subject;
