pub mod coverage;
pub mod instructor;
pub mod lesson;
pub mod swimmer;
pub mod waitlist;
